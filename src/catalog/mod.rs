//! Course catalog for the lesson sidebar
//!
//! A catalog is the ordered list of courses and their lessons. It comes
//! either from a `courses.json` manifest or from scanning a directory tree
//! where every sub-directory is a course and every Markdown file a lesson.

pub mod manifest;
pub mod scanner;

pub use manifest::*;
pub use scanner::*;

use crate::config::MANIFEST_FILE_NAME;
use crate::error::{CatalogError, CatalogResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a lesson's Markdown lives
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LessonPath {
    /// File on the local filesystem
    Local(PathBuf),
    /// `http` or `https` URL
    Remote(String),
}

impl LessonPath {
    /// Interpret a raw path attribute
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_remote(trimmed) {
            LessonPath::Remote(trimmed.to_string())
        } else {
            LessonPath::Local(PathBuf::from(trimmed))
        }
    }

    /// Resolve a possibly relative path against the catalog base
    pub fn resolve(&self, base: &CatalogBase) -> LessonPath {
        match (self, base) {
            (LessonPath::Local(path), CatalogBase::Url(url)) if path.is_relative() => {
                let relative = path.to_string_lossy().replace('\\', "/");
                match Url::parse(url).and_then(|u| u.join(&relative)) {
                    Ok(joined) => LessonPath::Remote(joined.to_string()),
                    Err(e) => {
                        log::warn!("Could not join {} onto {}: {}", relative, url, e);
                        self.clone()
                    }
                }
            }
            (LessonPath::Local(path), CatalogBase::Directory(dir)) if path.is_relative() => {
                LessonPath::Local(dir.join(path))
            }
            _ => self.clone(),
        }
    }

    /// File stem of the lesson, used as fallback title
    pub fn file_stem(&self) -> Option<String> {
        match self {
            LessonPath::Local(path) => path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string()),
            LessonPath::Remote(url) => url
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .map(|last| last.split(['?', '#']).next().unwrap_or(last))
                .map(|last| match last.rsplit_once('.') {
                    Some((stem, _)) if !stem.is_empty() => stem.to_string(),
                    _ => last.to_string(),
                })
                .filter(|s| !s.is_empty()),
        }
    }

    /// Whether the lesson is fetched over HTTP
    pub fn is_remote(&self) -> bool {
        matches!(self, LessonPath::Remote(_))
    }
}

impl fmt::Display for LessonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LessonPath::Local(path) => write!(f, "{}", path.display()),
            LessonPath::Remote(url) => write!(f, "{}", url),
        }
    }
}

fn is_remote(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// What relative lesson paths are resolved against
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogBase {
    /// Relative paths stay as they are
    #[default]
    None,
    /// Relative paths are files under this directory
    Directory(PathBuf),
    /// Relative paths are joined onto this URL
    Url(String),
}

impl CatalogBase {
    /// Build a base from a raw string (URL or directory)
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_remote(trimmed) {
            // A base without trailing slash would drop its last segment on join
            if trimmed.ends_with('/') {
                CatalogBase::Url(trimmed.to_string())
            } else {
                CatalogBase::Url(format!("{}/", trimmed))
            }
        } else {
            CatalogBase::Directory(PathBuf::from(trimmed))
        }
    }
}

/// Index of a course within the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId(pub usize);

/// Position of a lesson within the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LessonKey {
    pub course: CourseId,
    pub lesson: usize,
}

impl LessonKey {
    pub fn new(course: usize, lesson: usize) -> Self {
        Self {
            course: CourseId(course),
            lesson,
        }
    }
}

/// A sidebar-selectable lesson
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonRef {
    /// Display title
    pub title: String,
    /// Resolved location of the Markdown source
    pub path: LessonPath,
}

impl LessonRef {
    /// Create a lesson, deriving the title from the path when none is given
    pub fn new(title: Option<String>, path: LessonPath) -> Self {
        let title = title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                path.file_stem()
                    .map(|stem| crate::utils::text::title_from_name(&stem))
            })
            .unwrap_or_else(|| path.to_string());
        Self { title, path }
    }
}

/// A named group of lessons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub title: String,
    pub lessons: Vec<LessonRef>,
}

/// The complete list of courses shown in the sidebar
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Catalog title shown in the sidebar header
    pub title: String,
    /// Base used to resolve relative lesson paths
    pub base: CatalogBase,
    /// Courses in display order
    pub courses: Vec<Course>,
}

impl Catalog {
    /// Load a catalog for `root`.
    ///
    /// An explicit manifest wins, then `root/courses.json`, then a directory
    /// scan. `base_url` overrides where relative manifest paths point.
    pub fn load(
        root: &Path,
        manifest: Option<&Path>,
        base_url: Option<&str>,
    ) -> CatalogResult<Self> {
        let manifest_path = manifest
            .map(Path::to_path_buf)
            .or_else(|| Some(root.join(MANIFEST_FILE_NAME)).filter(|p| p.is_file()));

        let catalog = match manifest_path {
            Some(path) => {
                log::info!("Loading course manifest {}", path.display());
                CourseManifest::read(&path)?.into_catalog(&path, base_url)
            }
            None => {
                if !root.is_dir() {
                    return Err(CatalogError::DirectoryNotFound {
                        path: root.to_path_buf(),
                    });
                }
                log::info!("Scanning {} for courses", root.display());
                scan_courses(root, &ScanConfig::default())
            }
        };

        if catalog.lesson_count() == 0 {
            return Err(CatalogError::Empty {
                path: root.to_path_buf(),
            });
        }

        log::debug!(
            "Catalog '{}' has {} courses, {} lessons",
            catalog.title,
            catalog.courses.len(),
            catalog.lesson_count()
        );
        Ok(catalog)
    }

    /// Load on a blocking thread
    pub async fn load_async(
        root: PathBuf,
        manifest: Option<PathBuf>,
        base_url: Option<String>,
    ) -> Result<Self, String> {
        tokio::task::spawn_blocking(move || {
            Self::load(&root, manifest.as_deref(), base_url.as_deref()).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| format!("Catalog loading was interrupted: {}", e))?
    }

    /// Look up a course
    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.get(id.0)
    }

    /// Look up a lesson
    pub fn lesson(&self, key: LessonKey) -> Option<&LessonRef> {
        self.course(key.course)
            .and_then(|course| course.lessons.get(key.lesson))
    }

    /// Find where a lesson path sits in the catalog
    pub fn find_lesson(&self, path: &LessonPath) -> Option<LessonKey> {
        self.courses
            .iter()
            .enumerate()
            .find_map(|(ci, course)| {
                course
                    .lessons
                    .iter()
                    .position(|lesson| &lesson.path == path)
                    .map(|li| LessonKey::new(ci, li))
            })
    }

    /// Total lesson count
    pub fn lesson_count(&self) -> usize {
        self.courses.iter().map(|c| c.lessons.len()).sum()
    }
}
