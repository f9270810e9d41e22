//! Directory scanner building a catalog from a folder tree
//!
//! Layout convention:
//! - every directory below the root is a course (nested directories become
//!   their own courses, titled with their relative path)
//! - every Markdown file inside a course directory is a lesson
//! - Markdown files directly in the root form a course named after the root

use super::{Catalog, CatalogBase, Course, LessonPath, LessonRef};
use crate::utils::{path::is_markdown, text::title_from_name};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Configuration for directory scanning
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum directory depth to scan
    pub max_depth: usize,

    /// Whether to include hidden files and directories (starting with .)
    pub show_hidden: bool,

    /// Maximum number of lessons to collect
    pub max_lessons: usize,

    /// Directories to always ignore
    pub ignored_dirs: HashSet<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let ignored_dirs = [
            ".git",
            "node_modules",
            "target",
            "__pycache__",
            ".venv",
            "venv",
            "build",
            "dist",
            "assets",
            "img",
            "images",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            max_depth: 4,
            show_hidden: false,
            max_lessons: 5_000,
            ignored_dirs,
        }
    }
}

/// Scan `root` and group Markdown files into courses
pub fn scan_courses(root: &Path, config: &ScanConfig) -> Catalog {
    let start = std::time::Instant::now();

    // Keyed by directory so courses come out sorted by path
    let mut by_dir: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    let mut collected = 0usize;

    let walker = WalkDir::new(root)
        .max_depth(config.max_depth + 1)
        .follow_links(false)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()));

    for entry in walker
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || should_descend(e, config))
        .filter_map(Result::ok)
    {
        if entry.file_type().is_dir() || !is_markdown(entry.path()) {
            continue;
        }
        if collected >= config.max_lessons {
            log::warn!(
                "Stopped scanning {} after {} lessons",
                root.display(),
                config.max_lessons
            );
            break;
        }

        let dir = entry
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root.to_path_buf());
        by_dir.entry(dir).or_default().push(entry.into_path());
        collected += 1;
    }

    let root_title = root
        .file_name()
        .map(|n| title_from_name(&n.to_string_lossy()))
        .unwrap_or_else(|| "Lessons".to_string());

    let courses = by_dir
        .into_iter()
        .map(|(dir, files)| Course {
            title: course_title(root, &dir, &root_title),
            lessons: files
                .into_iter()
                .map(|file| LessonRef::new(None, LessonPath::Local(file)))
                .collect(),
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Scanned {} in {} ms: {} courses, {} lessons",
        root.display(),
        start.elapsed().as_millis(),
        courses.len(),
        collected
    );

    Catalog {
        title: root_title,
        base: CatalogBase::Directory(root.to_path_buf()),
        courses,
    }
}

/// Course title from its directory relative to the root
fn course_title(root: &Path, dir: &Path, root_title: &str) -> String {
    match dir.strip_prefix(root) {
        Ok(relative) if relative.as_os_str().is_empty() => root_title.to_string(),
        Ok(relative) => relative
            .components()
            .map(|c| title_from_name(&c.as_os_str().to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" / "),
        Err(_) => title_from_name(&dir.to_string_lossy()),
    }
}

/// Check if a directory entry should be included during traversal
fn should_descend(entry: &DirEntry, config: &ScanConfig) -> bool {
    let hidden = crate::utils::path::is_hidden(entry.path());
    if !config.show_hidden && hidden {
        return false;
    }
    if entry.file_type().is_dir() {
        if let Some(name) = entry.file_name().to_str() {
            if config.ignored_dirs.contains(name) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let base = dir.path();

        fs::write(base.join("welcome.md"), "# Welcome").unwrap();
        fs::write(base.join("notes.txt"), "").unwrap();
        fs::create_dir(base.join("01-rust")).unwrap();
        fs::write(base.join("01-rust/02-ownership.md"), "# Ownership").unwrap();
        fs::write(base.join("01-rust/01-intro.md"), "# Intro").unwrap();
        fs::create_dir(base.join("02-python")).unwrap();
        fs::write(base.join("02-python/01-basics.md"), "# Basics").unwrap();
        fs::create_dir(base.join(".hidden")).unwrap();
        fs::write(base.join(".hidden/secret.md"), "Secret").unwrap();
        fs::create_dir(base.join("node_modules")).unwrap();
        fs::write(base.join("node_modules/pkg.md"), "Pkg").unwrap();

        dir
    }

    #[test]
    fn test_scan_groups_by_directory() {
        let dir = setup_test_dir();
        let catalog = scan_courses(dir.path(), &ScanConfig::default());

        let titles: Vec<_> = catalog.courses.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles.len(), 3);
        assert!(titles.contains(&"Rust"));
        assert!(titles.contains(&"Python"));
        assert_eq!(catalog.lesson_count(), 4);
    }

    #[test]
    fn test_scan_sorts_lessons_by_name() {
        let dir = setup_test_dir();
        let catalog = scan_courses(dir.path(), &ScanConfig::default());

        let rust = catalog.courses.iter().find(|c| c.title == "Rust").unwrap();
        let lessons: Vec<_> = rust.lessons.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(lessons, vec!["Intro", "Ownership"]);
    }

    #[test]
    fn test_scan_skips_hidden_and_ignored() {
        let dir = setup_test_dir();
        let catalog = scan_courses(dir.path(), &ScanConfig::default());

        let all_paths: Vec<String> = catalog
            .courses
            .iter()
            .flat_map(|c| c.lessons.iter().map(|l| l.path.to_string()))
            .collect();
        assert!(!all_paths.iter().any(|p| p.contains("node_modules")));
        assert!(!all_paths.iter().any(|p| p.contains(".hidden")));
    }

    #[test]
    fn test_scan_hidden_when_enabled() {
        let dir = setup_test_dir();
        let config = ScanConfig {
            show_hidden: true,
            ..ScanConfig::default()
        };
        let catalog = scan_courses(dir.path(), &config);
        assert_eq!(catalog.lesson_count(), 5);
    }

    #[test]
    fn test_scan_depth_limit() {
        let dir = setup_test_dir();
        let config = ScanConfig {
            max_depth: 0,
            ..ScanConfig::default()
        };
        let catalog = scan_courses(dir.path(), &config);
        assert_eq!(catalog.lesson_count(), 1);
    }
}
