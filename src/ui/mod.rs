//! UI module for Cosmic Lessons
//!
//! Contains all user interface components:
//! - Main window layout
//! - Course sidebar
//! - Lesson content pane
//! - Outline pane
//! - Status bar

mod content;
mod main_window;
mod sidebar;
mod status_bar;
mod toc_panel;

use crate::message::Message;
use crate::state::AppState;
use crate::viewer::CopyLabels;
use cosmic::Element;

pub use content::content_scroll_id;

/// Build the main application view
pub fn view<'a>(state: &'a AppState, labels: &'a CopyLabels) -> Element<'a, Message> {
    main_window::view(state, labels)
}
