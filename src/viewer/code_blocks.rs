//! Code block enhancement: highlighting plus copy buttons
//!
//! Each code block of a freshly rendered lesson is highlighted once and gets a
//! copy button. A successful copy switches the button label to the copied
//! label; the app schedules a revert and hands back the [`CopyTicket`] when
//! the timer fires. Only the ticket of the latest copy on a block may revert
//! it, so clicking again restarts the confirmation window.

use super::clipboard::ClipboardSink;
use crate::config::ViewerConfig;
use crate::error::ClipboardError;
use crate::markdown::{Block, CodeBlockId, CodeHighlighter, HighlightedCode, LessonDocument};

/// Copy button state of one code block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyState {
    #[default]
    Idle,
    /// Confirmation showing; `token` identifies the copy that set it
    Copied { token: u64 },
}

/// Identifies one successful copy, for scheduling its revert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyTicket {
    pub block: CodeBlockId,
    /// Load generation the block belongs to
    pub generation: u64,
    pub token: u64,
}

/// A highlighted code block with its copy button
#[derive(Debug, Clone)]
pub struct EnhancedCodeBlock {
    pub id: CodeBlockId,
    pub language: Option<String>,
    pub source: String,
    pub highlighted: HighlightedCode,
    pub copy: CopyState,
}

/// Copy button labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyLabels {
    pub idle: String,
    pub copied: String,
}

impl From<&ViewerConfig> for CopyLabels {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            idle: config.copy_label.clone(),
            copied: config.copied_label.clone(),
        }
    }
}

impl Default for CopyLabels {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

/// All enhanced code blocks of the current lesson
#[derive(Debug, Clone, Default)]
pub struct CodeBlocks {
    generation: u64,
    blocks: Vec<EnhancedCodeBlock>,
    next_token: u64,
}

impl CodeBlocks {
    /// Highlight every code block of `document`
    pub fn enhance(
        document: &LessonDocument,
        highlighter: &CodeHighlighter,
        generation: u64,
    ) -> Self {
        let mut blocks = Vec::with_capacity(document.code_block_count);
        collect(&document.blocks, &mut |id, language, code| {
            blocks.push(EnhancedCodeBlock {
                id,
                language: language.clone(),
                source: code.to_string(),
                highlighted: highlighter.highlight(language.as_deref(), code),
                copy: CopyState::Idle,
            });
        });
        blocks.sort_by_key(|b| b.id);

        log::debug!("Enhanced {} code blocks", blocks.len());
        Self {
            generation,
            blocks,
            next_token: 0,
        }
    }

    pub fn get(&self, id: CodeBlockId) -> Option<&EnhancedCodeBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    fn get_mut(&mut self, id: CodeBlockId) -> Option<&mut EnhancedCodeBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Label of the block's copy button
    pub fn label<'a>(&self, id: CodeBlockId, labels: &'a CopyLabels) -> &'a str {
        match self.get(id).map(|b| b.copy) {
            Some(CopyState::Copied { .. }) => &labels.copied,
            _ => &labels.idle,
        }
    }

    /// Copy the block's trimmed source. On failure the button is left as it was.
    ///
    /// Returns `Ok(None)` for ids not in this lesson.
    pub fn copy(
        &mut self,
        id: CodeBlockId,
        clipboard: &mut dyn ClipboardSink,
    ) -> Result<Option<CopyTicket>, ClipboardError> {
        let generation = self.generation;
        let token = self.next_token;
        let block = match self.get_mut(id) {
            Some(block) => block,
            None => return Ok(None),
        };

        clipboard.set_text(block.source.trim())?;
        block.copy = CopyState::Copied { token };
        self.next_token += 1;

        Ok(Some(CopyTicket {
            block: id,
            generation,
            token,
        }))
    }

    /// Revert a confirmation. Returns false when the ticket was superseded.
    pub fn revert(&mut self, ticket: CopyTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        match self.get_mut(ticket.block) {
            Some(block) if block.copy == (CopyState::Copied { token: ticket.token }) => {
                block.copy = CopyState::Idle;
                true
            }
            _ => false,
        }
    }
}

fn collect(blocks: &[Block], visit: &mut impl FnMut(CodeBlockId, &Option<String>, &str)) {
    for block in blocks {
        match block {
            Block::CodeBlock { id, language, code } => visit(*id, language, code),
            Block::Blockquote(children)
            | Block::FootnoteDefinition {
                content: children, ..
            } => collect(children, visit),
            Block::UnorderedList(items) | Block::OrderedList { items, .. } => {
                for item in items {
                    collect(&item.content, visit);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::LessonRenderer;
    use crate::viewer::clipboard::testing::MemoryClipboard;

    fn blocks(markdown: &str) -> CodeBlocks {
        let document = LessonRenderer::new().render(markdown);
        CodeBlocks::enhance(&document, &CodeHighlighter::default(), 1)
    }

    const LESSON: &str = "# A\n\n```rust\n\n  let x = 1;  \n\n```\n\n> ```\n> quoted\n> ```\n";

    #[test]
    fn test_enhance_finds_nested_blocks() {
        let blocks = blocks(LESSON);
        assert_eq!(blocks.len(), 2);
        assert!(blocks.get(CodeBlockId(0)).unwrap().highlighted.is_highlighted());
        assert_eq!(blocks.get(CodeBlockId(1)).unwrap().source, "quoted\n");
    }

    #[test]
    fn test_copy_writes_trimmed_text_and_confirms() {
        let mut blocks = blocks(LESSON);
        let labels = CopyLabels::default();
        let mut clipboard = MemoryClipboard::default();

        assert_eq!(blocks.label(CodeBlockId(0), &labels), "Copiar");
        let ticket = blocks.copy(CodeBlockId(0), &mut clipboard).unwrap().unwrap();

        assert_eq!(clipboard.contents.as_deref(), Some("let x = 1;"));
        assert_eq!(blocks.label(CodeBlockId(0), &labels), "Copiado ✔");
        assert_eq!(blocks.label(CodeBlockId(1), &labels), "Copiar");

        assert!(blocks.revert(ticket));
        assert_eq!(blocks.label(CodeBlockId(0), &labels), "Copiar");
    }

    #[test]
    fn test_second_click_restarts_window() {
        let mut blocks = blocks(LESSON);
        let labels = CopyLabels::default();
        let mut clipboard = MemoryClipboard::default();

        let first = blocks.copy(CodeBlockId(0), &mut clipboard).unwrap().unwrap();
        let second = blocks.copy(CodeBlockId(0), &mut clipboard).unwrap().unwrap();

        // The first timer fires while the second confirmation is showing
        assert!(!blocks.revert(first));
        assert_eq!(blocks.label(CodeBlockId(0), &labels), "Copiado ✔");
        assert!(blocks.revert(second));
        assert_eq!(blocks.label(CodeBlockId(0), &labels), "Copiar");
    }

    #[test]
    fn test_clipboard_failure_leaves_label() {
        let mut blocks = blocks(LESSON);
        let labels = CopyLabels::default();
        let mut clipboard = MemoryClipboard {
            deny: true,
            ..MemoryClipboard::default()
        };

        let err = blocks.copy(CodeBlockId(0), &mut clipboard).unwrap_err();
        assert!(matches!(err, ClipboardError::AccessDenied(_)));
        assert_eq!(blocks.label(CodeBlockId(0), &labels), "Copiar");
    }

    #[test]
    fn test_ticket_from_previous_lesson_is_ignored() {
        let mut old = blocks(LESSON);
        let ticket = old
            .copy(CodeBlockId(0), &mut MemoryClipboard::default())
            .unwrap()
            .unwrap();

        let document = LessonRenderer::new().render(LESSON);
        let mut new = CodeBlocks::enhance(&document, &CodeHighlighter::default(), 2);
        new.copy(CodeBlockId(0), &mut MemoryClipboard::default())
            .unwrap();
        assert!(!new.revert(ticket));
    }

    #[test]
    fn test_unknown_block() {
        let mut blocks = blocks("no code");
        let result = blocks.copy(CodeBlockId(3), &mut MemoryClipboard::default());
        assert_eq!(result, Ok(None));
    }
}
