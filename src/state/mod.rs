//! State management module for Cosmic Lessons
//!
//! This module contains all application state types organized by concern:
//! - `app_state`: Root application state container
//! - `viewer_state`: Content pane (lesson, outline, observer, code blocks)
//! - `sidebar_state`: Course list state
//! - `session_state`: Persistent session data

mod app_state;
mod session_state;
mod sidebar_state;
mod viewer_state;

pub use app_state::*;
pub use session_state::*;
pub use sidebar_state::*;
pub use viewer_state::*;
