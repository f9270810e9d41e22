//! Session state for persistence
//!
//! Remembers where the user left off: the catalog that was open, the last
//! lesson, expanded course sections and recently viewed lessons.

use crate::catalog::{CourseId, LessonPath};
use crate::config::Config;
use crate::error::{SessionError, SessionResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Maximum number of remembered lessons
const MAX_RECENT: usize = 20;

/// Session state that can be serialized and restored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    /// Catalog root that was open
    pub last_root: Option<PathBuf>,

    /// Explicit manifest that was open, if any
    pub last_manifest: Option<PathBuf>,

    /// Lesson shown at exit
    pub last_lesson: Option<LessonPath>,

    /// Expanded course sections (catalog indices)
    pub expanded_courses: Vec<usize>,

    /// Sidebar visibility
    pub sidebar_visible: bool,

    /// Outline pane visibility
    pub toc_visible: bool,

    /// Content zoom factor
    pub zoom: f32,

    /// Recently viewed lessons, newest first
    pub recent_lessons: Vec<RecentLesson>,

    /// Session version for migration
    pub version: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            last_root: None,
            last_manifest: None,
            last_lesson: None,
            expanded_courses: Vec::new(),
            sidebar_visible: true,
            toc_visible: true,
            zoom: 1.0,
            recent_lessons: Vec::new(),
            version: 1,
        }
    }
}

impl SessionState {
    /// Create a new session state
    pub fn new() -> Self {
        Self::default()
    }

    /// Load session state from the data directory
    pub fn load() -> SessionResult<Self> {
        Self::load_from(&Self::session_file_path()?)
    }

    /// Load session state from a specific file; a missing file is an empty session
    pub fn load_from(path: &Path) -> SessionResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| SessionError::LoadError(e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| SessionError::ParseError(e.to_string()))
    }

    /// Save session state to the data directory
    pub fn save(&self) -> SessionResult<()> {
        self.save_to(&Self::session_file_path()?)
    }

    /// Save session state to a specific file
    pub fn save_to(&self, path: &Path) -> SessionResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SessionError::SaveError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SessionError::SaveError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| SessionError::SaveError(e.to_string()))
    }

    /// Get the session file path
    fn session_file_path() -> SessionResult<PathBuf> {
        Config::data_dir()
            .map(|p| p.join("session.json"))
            .map_err(|_| SessionError::DirectoryError)
    }

    /// Record a viewed lesson
    pub fn add_recent_lesson(&mut self, path: LessonPath, title: String) {
        // Remove if already exists (to move to top)
        self.recent_lessons.retain(|r| r.path != path);

        self.recent_lessons.insert(
            0,
            RecentLesson {
                path,
                title,
                last_opened: chrono::Utc::now(),
            },
        );
        self.recent_lessons.truncate(MAX_RECENT);
    }

    /// Expanded sections as course ids
    pub fn expanded(&self) -> impl Iterator<Item = CourseId> + '_ {
        self.expanded_courses.iter().copied().map(CourseId)
    }

    /// Store expanded sections, sorted for a stable file
    pub fn set_expanded(&mut self, courses: impl IntoIterator<Item = CourseId>) {
        self.expanded_courses = courses.into_iter().map(|c| c.0).collect();
        self.expanded_courses.sort_unstable();
    }
}

/// A recently viewed lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentLesson {
    /// Lesson location
    pub path: LessonPath,

    /// Title at the time it was viewed
    pub title: String,

    /// When the lesson was last opened
    pub last_opened: chrono::DateTime<chrono::Utc>,
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn local(path: &str) -> LessonPath {
        LessonPath::Local(PathBuf::from(path))
    }

    #[test]
    fn test_session_default() {
        let session = SessionState::default();
        assert!(session.sidebar_visible);
        assert!(session.last_lesson.is_none());
        assert_eq!(session.version, 1);
    }

    #[test]
    fn test_add_recent_lesson() {
        let mut session = SessionState::new();

        session.add_recent_lesson(local("/a.md"), "A".to_string());
        session.add_recent_lesson(local("/b.md"), "B".to_string());
        assert_eq!(session.recent_lessons.len(), 2);
        assert_eq!(session.recent_lessons[0].path, local("/b.md"));

        // Adding same lesson moves it to top
        session.add_recent_lesson(local("/a.md"), "A".to_string());
        assert_eq!(session.recent_lessons.len(), 2);
        assert_eq!(session.recent_lessons[0].path, local("/a.md"));
    }

    #[test]
    fn test_recent_lessons_are_capped() {
        let mut session = SessionState::new();
        for i in 0..30 {
            session.add_recent_lesson(local(&format!("/{}.md", i)), i.to_string());
        }
        assert_eq!(session.recent_lessons.len(), MAX_RECENT);
        assert_eq!(session.recent_lessons[0].title, "29");
    }


    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut session = SessionState::new();
        session.last_root = Some(PathBuf::from("/courses"));
        session.last_lesson = Some(LessonPath::Remote("https://example.org/a.md".to_string()));
        session.set_expanded([CourseId(2), CourseId(0)]);
        session.save_to(&path).unwrap();

        let loaded = SessionState::load_from(&path).unwrap();
        assert_eq!(loaded.last_root, session.last_root);
        assert_eq!(loaded.last_lesson, session.last_lesson);
        assert_eq!(loaded.expanded().collect::<Vec<_>>(), vec![CourseId(0), CourseId(2)]);
    }

    #[test]
    fn test_corrupt_session_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            SessionState::load_from(&path),
            Err(SessionError::ParseError(_))
        ));
    }
}
