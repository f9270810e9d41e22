//! Application message types
//!
//! Defines all messages that can be sent to the application's update function.
//! Messages are organized by category for clear handling and routing.

use crate::catalog::{Catalog, CourseId, LessonKey, LessonPath};
use crate::error::FetchResult;
use crate::markdown::{CodeBlockId, HeadingId};
use crate::state::LoadTicket;
use crate::viewer::{CopyTicket, ObserverGeneration, Viewport};
use std::path::PathBuf;

/// Main application message enum
#[derive(Debug, Clone)]
pub enum Message {
    /// Course catalog loading
    Catalog(CatalogMessage),

    /// Sidebar interaction
    Sidebar(SidebarMessage),

    /// Lesson loading and export
    Lesson(LessonMessage),

    /// Outline pane interaction
    Toc(TocMessage),

    /// Content pane scrolling
    Content(ContentMessage),

    /// Copy buttons on code blocks
    CodeBlock(CodeBlockMessage),

    /// View operations
    View(ViewMessage),

    /// System/window events
    System(SystemMessage),

    /// Surface actions (for menu bar support)
    Surface(cosmic::surface::Action),

    /// No-op message (for subscriptions that don't need action)
    None,
}

/// Catalog-related messages
#[derive(Debug, Clone)]
pub enum CatalogMessage {
    /// Load the catalog of a root directory
    Load {
        root: PathBuf,
        manifest: Option<PathBuf>,
    },

    /// Load the current catalog again
    Reload,

    /// Catalog finished loading
    Loaded(Result<Catalog, String>),
}

/// Sidebar messages
#[derive(Debug, Clone)]
pub enum SidebarMessage {
    /// Show or hide a course's lessons
    ToggleCourse(CourseId),

    /// Lesson clicked
    SelectLesson(LessonKey),

    /// Filter input changed
    SetFilter(String),

    /// Clear the filter input
    ClearFilter,
}

/// Lesson loading messages
#[derive(Debug, Clone)]
pub enum LessonMessage {
    /// Open a lesson by path (CLI, session restore)
    Open(LessonPath),

    /// Fetch finished for the load identified by the ticket
    Fetched {
        ticket: LoadTicket,
        result: FetchResult<String>,
    },

    /// Fetch the current lesson again
    Reload,

    /// Export the current lesson as HTML
    Export,

    /// Export finished
    Exported(Result<PathBuf, String>),
}

/// Outline pane messages
#[derive(Debug, Clone)]
pub enum TocMessage {
    /// Outline entry clicked
    Navigate(HeadingId),
}

/// Content pane messages
#[derive(Debug, Clone)]
pub enum ContentMessage {
    /// Scroll offset or size changed; tagged with the observer that was
    /// armed when the view was built
    Scrolled {
        generation: Option<ObserverGeneration>,
        viewport: Viewport,
    },

    /// Smooth scroll frame
    AnimationTick,
}

/// Code block messages
#[derive(Debug, Clone)]
pub enum CodeBlockMessage {
    /// Copy button pressed
    Copy(CodeBlockId),

    /// Confirmation window elapsed
    RevertLabel(CopyTicket),
}

/// View-related messages
#[derive(Debug, Clone)]
pub enum ViewMessage {
    /// Toggle sidebar visibility
    ToggleSidebar,

    /// Toggle outline pane visibility
    ToggleToc,

    /// Zoom in
    ZoomIn,

    /// Zoom out
    ZoomOut,

    /// Reset zoom
    ZoomReset,
}

/// System-level messages
#[derive(Debug, Clone)]
pub enum SystemMessage {
    /// Application is closing (window close or Ctrl+Q)
    CloseRequested,

    /// Save the session and exit
    Quit,

    /// Clear the status message if it is still the one with this id
    ClearStatus(u64),
}

impl From<CatalogMessage> for Message {
    fn from(msg: CatalogMessage) -> Self {
        Message::Catalog(msg)
    }
}

impl From<SidebarMessage> for Message {
    fn from(msg: SidebarMessage) -> Self {
        Message::Sidebar(msg)
    }
}

impl From<LessonMessage> for Message {
    fn from(msg: LessonMessage) -> Self {
        Message::Lesson(msg)
    }
}

impl From<TocMessage> for Message {
    fn from(msg: TocMessage) -> Self {
        Message::Toc(msg)
    }
}

impl From<ContentMessage> for Message {
    fn from(msg: ContentMessage) -> Self {
        Message::Content(msg)
    }
}

impl From<CodeBlockMessage> for Message {
    fn from(msg: CodeBlockMessage) -> Self {
        Message::CodeBlock(msg)
    }
}

impl From<ViewMessage> for Message {
    fn from(msg: ViewMessage) -> Self {
        Message::View(msg)
    }
}

impl From<SystemMessage> for Message {
    fn from(msg: SystemMessage) -> Self {
        Message::System(msg)
    }
}
