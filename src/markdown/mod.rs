//! Markdown module for Cosmic Lessons
//!
//! Handles everything between raw lesson text and what the content pane shows:
//! - Markdown parsing into a block document with heading ids
//! - Code block syntax highlighting
//! - Standalone HTML export

pub mod export;
pub mod highlight;
pub mod render;

pub use export::{suggest_output_path, HtmlExportOptions, HtmlExporter};
pub use highlight::{CodeHighlighter, CodeSpan, HighlightedCode};
pub use render::{
    plain_text, Block, CodeBlockId, HeadingId, LessonDocument, LessonRenderer,
    ListItem, StyledText, TableAlignment,
};
