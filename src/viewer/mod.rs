//! Lesson viewer components
//!
//! Everything that acts on a rendered lesson inside the content pane:
//! - `toc`: outline built from headings
//! - `scroll_sync`: heading visibility tracking for the outline
//! - `layout`: estimated heading positions
//! - `smooth_scroll`: animated outline navigation
//! - `code_blocks`: highlighting and copy buttons
//! - `clipboard`: system clipboard access

pub mod clipboard;
pub mod code_blocks;
pub mod layout;
pub mod scroll_sync;
pub mod smooth_scroll;
pub mod toc;

pub use clipboard::ClipboardManager;
pub use code_blocks::{CodeBlocks, CopyLabels, CopyTicket};
pub use layout::{DocumentLayout, LayoutMetrics, Viewport};
pub use scroll_sync::{ObserverGeneration, ScrollObserver};
pub use smooth_scroll::SmoothScroll;
pub use toc::{TableOfContents, TocEntry};
