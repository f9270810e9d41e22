//! `courses.json` manifest format
//!
//! ```json
//! {
//!   "title": "Rust desde cero",
//!   "base": "https://example.org/lessons/",
//!   "courses": [
//!     { "title": "Fundamentos",
//!       "lessons": [ { "title": "Intro", "path": "basics/01-intro.md" } ] }
//!   ]
//! }
//! ```

use super::{Catalog, CatalogBase, Course, LessonPath, LessonRef};
use crate::error::{CatalogError, CatalogResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level manifest document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseManifest {
    /// Catalog title
    #[serde(default)]
    pub title: Option<String>,

    /// Base URL or directory for relative lesson paths
    #[serde(default)]
    pub base: Option<String>,

    /// Courses in display order
    pub courses: Vec<ManifestCourse>,
}

/// One course entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestCourse {
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<ManifestLesson>,
}

/// One lesson entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestLesson {
    /// Display title; the file name is used when absent
    #[serde(default)]
    pub title: Option<String>,
    /// Path or URL of the Markdown source
    pub path: String,
}

impl CourseManifest {
    /// Read and parse a manifest file
    pub fn read(path: &Path) -> CatalogResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|source| CatalogError::ManifestRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&content).map_err(|reason| CatalogError::ManifestParse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse manifest JSON
    pub fn parse(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    /// Turn the manifest into a catalog.
    ///
    /// Relative lesson paths resolve against `base_override`, then the
    /// manifest's own `base`, then the manifest's directory.
    pub fn into_catalog(self, manifest_path: &Path, base_override: Option<&str>) -> Catalog {
        let base = base_override
            .or(self.base.as_deref())
            .map(|raw| match CatalogBase::parse(raw) {
                CatalogBase::Directory(dir) if dir.is_relative() => manifest_path
                    .parent()
                    .map(|parent| CatalogBase::Directory(parent.join(&dir)))
                    .unwrap_or(CatalogBase::Directory(dir)),
                other => other,
            })
            .or_else(|| {
                manifest_path
                    .parent()
                    .map(|dir| CatalogBase::Directory(dir.to_path_buf()))
            })
            .unwrap_or_default();

        let title = self
            .title
            .or_else(|| {
                manifest_path
                    .parent()
                    .and_then(|p| p.file_name())
                    .map(|n| crate::utils::text::title_from_name(&n.to_string_lossy()))
            })
            .unwrap_or_else(|| "Lessons".to_string());

        let courses = self
            .courses
            .into_iter()
            .map(|course| Course {
                title: course.title,
                lessons: course
                    .lessons
                    .into_iter()
                    .map(|lesson| {
                        let path = LessonPath::parse(&lesson.path).resolve(&base);
                        LessonRef::new(lesson.title, path)
                    })
                    .collect(),
            })
            .collect();

        Catalog {
            title,
            base,
            courses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const MANIFEST: &str = r#"{
        "title": "Rust desde cero",
        "courses": [
            { "title": "Fundamentos",
              "lessons": [
                { "title": "Intro", "path": "basics/01-intro.md" },
                { "path": "basics/02-variables.md" }
              ] },
            { "title": "Remoto",
              "lessons": [ { "path": "https://example.org/extra.md" } ] }
        ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = CourseManifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.courses.len(), 2);
        assert_eq!(manifest.courses[0].lessons.len(), 2);
        assert!(manifest.courses[0].lessons[1].title.is_none());
    }

    #[test]
    fn test_into_catalog_resolves_against_manifest_dir() {
        let manifest = CourseManifest::parse(MANIFEST).unwrap();
        let catalog = manifest.into_catalog(Path::new("/srv/course/courses.json"), None);

        assert_eq!(catalog.title, "Rust desde cero");
        let first = &catalog.courses[0].lessons[0];
        assert_eq!(
            first.path,
            LessonPath::Local(PathBuf::from("/srv/course/basics/01-intro.md"))
        );
        assert_eq!(catalog.courses[0].lessons[1].title, "Variables");
        assert!(catalog.courses[1].lessons[0].path.is_remote());
    }

    #[test]
    fn test_into_catalog_with_base_override() {
        let manifest = CourseManifest::parse(MANIFEST).unwrap();
        let catalog = manifest.into_catalog(
            Path::new("/srv/course/courses.json"),
            Some("https://cdn.example.org/course"),
        );

        assert_eq!(
            catalog.courses[0].lessons[0].path,
            LessonPath::Remote("https://cdn.example.org/course/basics/01-intro.md".to_string())
        );
        assert_eq!(
            catalog.courses[1].lessons[0].path,
            LessonPath::Remote("https://example.org/extra.md".to_string())
        );
    }

    #[test]
    fn test_parse_error() {
        assert!(CourseManifest::parse(r#"{ "title": "x" }"#).is_err());
    }
}
