//! Root application state container
//!
//! Holds the catalog, the sidebar, the content pane and the status bar. The
//! methods here tie sidebar selection to lesson loads; the actual fetch is
//! started by the app with the returned [`LoadTicket`].

use super::{LoadTicket, SidebarState, ViewerState};
use crate::catalog::{Catalog, LessonKey, LessonPath, LessonRef};
use crate::config::{Config, ViewerConfig};
use crate::viewer::LayoutMetrics;

/// Zoom bounds and step for the content pane
pub const MIN_ZOOM: f32 = 0.6;
pub const MAX_ZOOM: f32 = 2.5;
pub const ZOOM_STEP: f32 = 0.1;

/// Root application state
#[derive(Debug)]
pub struct AppState {
    /// Loaded course catalog
    pub catalog: Option<Catalog>,

    /// Sidebar state
    pub sidebar: SidebarState,

    /// Content pane state
    pub viewer: ViewerState,

    /// Whether the outline pane is shown
    pub toc_visible: bool,

    /// Outline pane width in pixels
    pub toc_width: u32,

    /// Content zoom factor
    pub zoom: f32,

    /// Status bar message
    pub status_message: Option<StatusMessage>,

    next_status_id: u64,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: &Config) -> Self {
        let mut sidebar = SidebarState::new();
        sidebar.visible = config.ui.sidebar_visible;
        sidebar.width = config.ui.sidebar_width;

        Self {
            catalog: None,
            sidebar,
            viewer: ViewerState::new(&config.viewer),
            toc_visible: config.ui.toc_visible,
            toc_width: config.ui.toc_width,
            zoom: 1.0,
            status_message: None,
            next_status_id: 0,
        }
    }

    /// Replace the catalog, forgetting sidebar state tied to the old one
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.sidebar.reset();
        self.sidebar.is_loading = false;
        self.catalog = Some(catalog);
    }

    /// Activate a sidebar lesson and start loading it
    pub fn select_lesson(&mut self, key: LessonKey) -> Option<LoadTicket> {
        let catalog = self.catalog.as_ref()?;
        let lesson = self.sidebar.activate_lesson(catalog, key)?;
        Some(self.viewer.begin_load(lesson))
    }

    /// Open a lesson by path. Lessons in the catalog are activated in the
    /// sidebar (and their course expanded); others load without a sidebar entry.
    pub fn open_path(&mut self, path: &LessonPath) -> LoadTicket {
        let key = self.catalog.as_ref().and_then(|c| c.find_lesson(path));
        if let Some(key) = key {
            self.sidebar.expand_course(key.course);
            if let Some(ticket) = self.select_lesson(key) {
                return ticket;
            }
        }
        self.viewer.begin_load(LessonRef::new(None, path.clone()))
    }

    /// Load the current lesson again
    pub fn reload(&mut self) -> Option<LoadTicket> {
        let lesson = self.viewer.lesson()?.clone();
        Some(self.viewer.begin_load(lesson))
    }

    /// Show a status message. Returns its id for [`AppState::clear_status_if`].
    pub fn set_status(&mut self, message: impl Into<String>, level: StatusLevel) -> u64 {
        self.next_status_id += 1;
        self.status_message = Some(StatusMessage {
            id: self.next_status_id,
            text: message.into(),
            level,
        });
        self.next_status_id
    }

    /// Clear the status message only if it is still the one with `id`
    pub fn clear_status_if(&mut self, id: u64) {
        if self.status_message.as_ref().map(|m| m.id) == Some(id) {
            self.status_message = None;
        }
    }

    /// Toggle sidebar visibility
    pub fn toggle_sidebar(&mut self) {
        self.sidebar.toggle();
    }

    /// Toggle outline pane visibility
    pub fn toggle_toc(&mut self) {
        self.toc_visible = !self.toc_visible;
    }

    /// Set the zoom factor and re-estimate the layout
    pub fn set_zoom(&mut self, zoom: f32, config: &ViewerConfig) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.viewer
            .set_metrics(LayoutMetrics::from_config(config, self.zoom));
    }

    pub fn zoom_in(&mut self, config: &ViewerConfig) {
        self.set_zoom(self.zoom + ZOOM_STEP, config);
    }

    pub fn zoom_out(&mut self, config: &ViewerConfig) {
        self.set_zoom(self.zoom - ZOOM_STEP, config);
    }

    pub fn reset_zoom(&mut self, config: &ViewerConfig) {
        self.set_zoom(1.0, config);
    }
}

/// Status message for the status bar
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub id: u64,

    /// Message text
    pub text: String,

    /// Message level (info, warning, error)
    pub level: StatusLevel,
}

/// Status message level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogBase, Course, CourseId};
    use std::path::PathBuf;

    fn catalog() -> Catalog {
        let lesson = |name: &str| {
            LessonRef::new(None, LessonPath::Local(PathBuf::from(format!("/c/{}.md", name))))
        };
        Catalog {
            title: "Cursos".to_string(),
            base: CatalogBase::None,
            courses: vec![
                Course {
                    title: "Uno".to_string(),
                    lessons: vec![lesson("a"), lesson("b")],
                },
                Course {
                    title: "Dos".to_string(),
                    lessons: vec![lesson("c")],
                },
            ],
        }
    }

    fn state() -> AppState {
        let mut state = AppState::new(&Config::default());
        state.set_catalog(catalog());
        state
    }

    #[test]
    fn test_select_lesson_starts_load() {
        let mut state = state();
        let ticket = state.select_lesson(LessonKey::new(0, 1)).unwrap();

        assert_eq!(ticket.lesson.title, "B");
        assert!(state.viewer.is_loading());
        assert!(state.sidebar.is_active(LessonKey::new(0, 1)));
    }

    #[test]
    fn test_select_unknown_lesson() {
        let mut state = state();
        assert!(state.select_lesson(LessonKey::new(9, 0)).is_none());
        assert!(!state.viewer.is_loading());
    }

    #[test]
    fn test_open_path_expands_course() {
        let mut state = state();
        let ticket = state.open_path(&LessonPath::Local(PathBuf::from("/c/c.md")));

        assert_eq!(ticket.lesson.title, "C");
        assert!(state.sidebar.is_expanded(CourseId(1)));
        assert!(state.sidebar.is_active(LessonKey::new(1, 0)));
    }

    #[test]
    fn test_open_path_outside_catalog() {
        let mut state = state();
        let ticket = state.open_path(&LessonPath::Local(PathBuf::from("/elsewhere/x.md")));
        assert_eq!(ticket.lesson.title, "X");
        assert!(state.sidebar.active_lesson.is_none());
    }

    #[test]
    fn test_reload_bumps_generation() {
        let mut state = state();
        assert!(state.reload().is_none());

        let first = state.select_lesson(LessonKey::new(0, 0)).unwrap();
        let again = state.reload().unwrap();
        assert!(again.generation > first.generation);
        assert_eq!(again.lesson, first.lesson);
    }

    #[test]
    fn test_transient_status_is_cleared_only_by_its_timer() {
        let mut state = state();
        let first = state.set_status("copy failed", StatusLevel::Error);
        let second = state.set_status("copy failed again", StatusLevel::Error);

        state.clear_status_if(first);
        assert!(state.status_message.is_some());
        state.clear_status_if(second);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut state = state();
        let config = ViewerConfig::default();
        for _ in 0..50 {
            state.zoom_in(&config);
        }
        assert_eq!(state.zoom, MAX_ZOOM);
        state.reset_zoom(&config);
        assert_eq!(state.zoom, 1.0);
        assert_eq!(state.viewer.metrics().font_size, config.font_size);
    }
}
