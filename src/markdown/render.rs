//! Markdown to lesson document rendering
//!
//! Parses Markdown with pulldown-cmark into a tree of [`Block`]s that the
//! content pane displays. Every heading gets a [`HeadingId`] at render time,
//! and every code block a [`CodeBlockId`], so the outline and the copy
//! buttons can refer to them without comparing text.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Stable identifier of a heading within one rendered lesson
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeadingId {
    /// Position among all headings of the document
    pub index: usize,
    /// De-duplicated anchor slug (`example`, `example-1`, ...)
    pub slug: String,
}

impl fmt::Display for HeadingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.slug)
    }
}

/// Identifier of a code block within one rendered lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodeBlockId(pub usize);

/// A rendered block in the content pane
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A paragraph of styled text
    Paragraph(Vec<StyledText>),
    /// A heading with its generated id
    Heading {
        id: HeadingId,
        level: u8,
        content: Vec<StyledText>,
    },
    /// A fenced or indented code block
    CodeBlock {
        id: CodeBlockId,
        language: Option<String>,
        code: String,
    },
    /// A blockquote
    Blockquote(Vec<Block>),
    /// A bullet list
    UnorderedList(Vec<ListItem>),
    /// A numbered list with starting number
    OrderedList { start: u64, items: Vec<ListItem> },
    /// A table
    Table {
        headers: Vec<Vec<StyledText>>,
        rows: Vec<Vec<Vec<StyledText>>>,
        alignments: Vec<TableAlignment>,
    },
    /// A horizontal rule
    HorizontalRule,
    /// Raw HTML, displayed as text
    Html(String),
    /// Footnote definition
    FootnoteDefinition { label: String, content: Vec<Block> },
}

/// A list item; `task` is `Some(checked)` for task list entries
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItem {
    pub task: Option<bool>,
    pub content: Vec<Block>,
}

/// Table column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableAlignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// Styled text with formatting
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledText {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub link: Option<String>,
}

impl StyledText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Concatenate the text of styled spans
pub fn plain_text(spans: &[StyledText]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

/// A heading as seen by the outline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingInfo {
    pub id: HeadingId,
    pub level: u8,
    pub text: String,
}

/// A fully rendered lesson
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LessonDocument {
    /// Top-level blocks in document order
    pub blocks: Vec<Block>,
    /// Every heading in document order, nested ones included
    pub headings: Vec<HeadingInfo>,
    /// Number of code blocks (ids are `0..code_block_count`)
    pub code_block_count: usize,
}

impl LessonDocument {
    /// Text of the first level-1 heading, if any
    pub fn title(&self) -> Option<&str> {
        self.headings
            .iter()
            .find(|h| h.level == 1)
            .map(|h| h.text.as_str())
    }
}

/// Inline formatting state while walking events
#[derive(Debug, Default)]
struct InlineContext {
    bold: bool,
    italic: bool,
    strikethrough: bool,
    link_url: Option<String>,
    /// Alt text collection while inside an image
    image: Option<(String, String)>,
    buffer: Vec<StyledText>,
}

impl InlineContext {
    fn push_text(&mut self, text: &str, code: bool) {
        if text.is_empty() {
            return;
        }
        if let Some((_, alt)) = self.image.as_mut() {
            alt.push_str(text);
            return;
        }
        self.buffer.push(StyledText {
            text: text.to_string(),
            bold: self.bold,
            italic: self.italic,
            strikethrough: self.strikethrough,
            code,
            link: self.link_url.clone(),
        });
    }

    fn take_buffer(&mut self) -> Vec<StyledText> {
        std::mem::take(&mut self.buffer)
    }
}

/// Builder for blocks under construction
#[derive(Debug)]
enum BlockBuilder {
    Paragraph,
    Heading { level: u8 },
    CodeBlock { language: Option<String>, code: String },
    Blockquote(Vec<Block>),
    UnorderedList(Vec<ListItem>),
    OrderedList { start: u64, items: Vec<ListItem> },
    ListItem(ListItem),
    Table {
        headers: Vec<Vec<StyledText>>,
        rows: Vec<Vec<Vec<StyledText>>>,
        alignments: Vec<TableAlignment>,
    },
    TableRow(Vec<Vec<StyledText>>),
    TableCell,
    FootnoteDefinition { label: String, content: Vec<Block> },
}

impl BlockBuilder {
    fn add_child(&mut self, block: Block) {
        match self {
            BlockBuilder::Blockquote(children) => children.push(block),
            BlockBuilder::ListItem(item) => item.content.push(block),
            BlockBuilder::FootnoteDefinition { content, .. } => content.push(block),
            _ => {}
        }
    }
}

/// Markdown renderer producing [`LessonDocument`]s
#[derive(Debug, Clone)]
pub struct LessonRenderer {
    options: Options,
}

impl LessonRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }

    /// Parser options, shared with the HTML exporter
    pub fn options(&self) -> Options {
        self.options
    }

    /// Parse and render Markdown into a lesson document
    pub fn render(&self, markdown: &str) -> LessonDocument {
        let mut walker = Walker::default();
        for event in Parser::new_ext(markdown, self.options) {
            walker.handle(event);
        }
        walker.finish()
    }
}

impl Default for LessonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Event walker state for one render
#[derive(Default)]
struct Walker {
    blocks: Vec<Block>,
    headings: Vec<HeadingInfo>,
    stack: Vec<BlockBuilder>,
    inline: InlineContext,
    slug_counts: HashMap<String, usize>,
    issued_slugs: HashSet<String>,
    code_blocks: usize,
}

impl Walker {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => {
                if let Some(block) = self.end(tag) {
                    self.emit(block);
                }
            }
            Event::Text(text) => match self.stack.last_mut() {
                Some(BlockBuilder::CodeBlock { code, .. }) => code.push_str(&text),
                _ => self.inline.push_text(&text, false),
            },
            Event::Code(code) => self.inline.push_text(&code, true),
            Event::SoftBreak => self.inline.push_text(" ", false),
            Event::HardBreak => self.inline.push_text("\n", false),
            Event::Rule => self.emit(Block::HorizontalRule),
            Event::Html(html) => {
                if matches!(self.stack.last(), Some(BlockBuilder::Paragraph)) {
                    self.inline.push_text(&html, false);
                } else {
                    self.emit(Block::Html(html.to_string()));
                }
            }
            Event::FootnoteReference(label) => {
                self.inline.push_text(&format!("[^{}]", label), false);
            }
            Event::TaskListMarker(checked) => {
                if let Some(BlockBuilder::ListItem(item)) = self.stack.last_mut() {
                    item.task = Some(checked);
                }
            }
        }
    }

    /// Attach a finished block to its parent, or to the top level
    fn emit(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some(parent) => parent.add_child(block),
            None => self.blocks.push(block),
        }
    }

    /// Loose text inside a list item becomes a paragraph before a nested block starts
    fn flush_item_text(&mut self) {
        if let Some(BlockBuilder::ListItem(item)) = self.stack.last_mut() {
            let buffer = self.inline.take_buffer();
            if !buffer.is_empty() {
                item.content.push(Block::Paragraph(buffer));
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.flush_item_text();
                self.stack.push(BlockBuilder::Paragraph);
            }
            Tag::Heading(level, _, _) => {
                self.flush_item_text();
                self.stack.push(BlockBuilder::Heading {
                    level: heading_level(level),
                });
            }
            Tag::BlockQuote => {
                self.flush_item_text();
                self.stack.push(BlockBuilder::Blockquote(Vec::new()));
            }
            Tag::CodeBlock(kind) => {
                self.flush_item_text();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split(|c: char| c == ',' || c.is_whitespace())
                        .next()
                        .filter(|lang| !lang.is_empty())
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.stack.push(BlockBuilder::CodeBlock {
                    language,
                    code: String::new(),
                });
            }
            Tag::List(start) => {
                self.flush_item_text();
                self.stack.push(match start {
                    Some(start) => BlockBuilder::OrderedList {
                        start,
                        items: Vec::new(),
                    },
                    None => BlockBuilder::UnorderedList(Vec::new()),
                });
            }
            Tag::Item => self.stack.push(BlockBuilder::ListItem(ListItem::default())),
            Tag::Table(alignments) => self.stack.push(BlockBuilder::Table {
                headers: Vec::new(),
                rows: Vec::new(),
                alignments: alignments.iter().map(table_alignment).collect(),
            }),
            // Header cells arrive without a row of their own
            Tag::TableHead | Tag::TableRow => self.stack.push(BlockBuilder::TableRow(Vec::new())),
            Tag::TableCell => self.stack.push(BlockBuilder::TableCell),
            Tag::Emphasis => self.inline.italic = true,
            Tag::Strong => self.inline.bold = true,
            Tag::Strikethrough => self.inline.strikethrough = true,
            Tag::Link(_, dest, _) => self.inline.link_url = Some(dest.to_string()),
            Tag::Image(_, dest, _) => self.inline.image = Some((dest.to_string(), String::new())),
            Tag::FootnoteDefinition(label) => {
                self.stack.push(BlockBuilder::FootnoteDefinition {
                    label: label.to_string(),
                    content: Vec::new(),
                });
            }
        }
    }

    fn end(&mut self, tag: Tag<'_>) -> Option<Block> {
        match tag {
            Tag::Paragraph => {
                self.stack.pop();
                let content = self.inline.take_buffer();
                (!content.is_empty()).then_some(Block::Paragraph(content))
            }
            Tag::Heading(..) => {
                let level = match self.stack.pop() {
                    Some(BlockBuilder::Heading { level }) => level,
                    _ => return None,
                };
                let content = self.inline.take_buffer();
                let text = plain_text(&content).trim().to_string();
                let id = HeadingId {
                    index: self.headings.len(),
                    slug: self.unique_slug(&text),
                };
                self.headings.push(HeadingInfo {
                    id: id.clone(),
                    level,
                    text,
                });
                Some(Block::Heading { id, level, content })
            }
            Tag::BlockQuote => match self.stack.pop() {
                Some(BlockBuilder::Blockquote(children)) => Some(Block::Blockquote(children)),
                _ => None,
            },
            Tag::CodeBlock(_) => match self.stack.pop() {
                Some(BlockBuilder::CodeBlock { language, code }) => {
                    let id = CodeBlockId(self.code_blocks);
                    self.code_blocks += 1;
                    Some(Block::CodeBlock { id, language, code })
                }
                _ => None,
            },
            Tag::List(_) => match self.stack.pop() {
                Some(BlockBuilder::OrderedList { start, items }) => {
                    Some(Block::OrderedList { start, items })
                }
                Some(BlockBuilder::UnorderedList(items)) => Some(Block::UnorderedList(items)),
                _ => None,
            },
            Tag::Item => {
                self.flush_item_text();
                if let Some(BlockBuilder::ListItem(item)) = self.stack.pop() {
                    match self.stack.last_mut() {
                        Some(BlockBuilder::UnorderedList(items))
                        | Some(BlockBuilder::OrderedList { items, .. }) => items.push(item),
                        _ => {}
                    }
                }
                None
            }
            Tag::Table(_) => match self.stack.pop() {
                Some(BlockBuilder::Table {
                    headers,
                    rows,
                    alignments,
                }) => Some(Block::Table {
                    headers,
                    rows,
                    alignments,
                }),
                _ => None,
            },
            Tag::TableHead => {
                if let Some(BlockBuilder::TableRow(cells)) = self.stack.pop() {
                    if let Some(BlockBuilder::Table { headers, .. }) = self.stack.last_mut() {
                        *headers = cells;
                    }
                }
                None
            }
            Tag::TableRow => {
                if let Some(BlockBuilder::TableRow(cells)) = self.stack.pop() {
                    if let Some(BlockBuilder::Table { rows, .. }) = self.stack.last_mut() {
                        rows.push(cells);
                    }
                }
                None
            }
            Tag::TableCell => {
                self.stack.pop();
                let content = self.inline.take_buffer();
                if let Some(BlockBuilder::TableRow(cells)) = self.stack.last_mut() {
                    cells.push(content);
                }
                None
            }
            Tag::Emphasis => {
                self.inline.italic = false;
                None
            }
            Tag::Strong => {
                self.inline.bold = false;
                None
            }
            Tag::Strikethrough => {
                self.inline.strikethrough = false;
                None
            }
            Tag::Link(..) => {
                self.inline.link_url = None;
                None
            }
            Tag::Image(..) => {
                // Images are shown as a labelled link to their source
                if let Some((url, alt)) = self.inline.image.take() {
                    let label = if alt.is_empty() { url.clone() } else { alt };
                    let mut span = StyledText::plain(format!("[{}]", label));
                    span.italic = true;
                    span.link = Some(url);
                    self.inline.buffer.push(span);
                }
                None
            }
            Tag::FootnoteDefinition(_) => match self.stack.pop() {
                Some(BlockBuilder::FootnoteDefinition { label, content }) => {
                    Some(Block::FootnoteDefinition { label, content })
                }
                _ => None,
            },
        }
    }

    fn unique_slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.slug_counts.entry(base.clone()).or_insert(0);
        let mut slug = base.clone();
        // A heading's own text may already read like a suffixed slug
        while self.issued_slugs.contains(&slug) {
            *count += 1;
            slug = format!("{}-{}", base, count);
        }
        self.issued_slugs.insert(slug.clone());
        slug
    }

    fn finish(self) -> LessonDocument {
        LessonDocument {
            blocks: self.blocks,
            headings: self.headings,
            code_block_count: self.code_blocks,
        }
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn table_alignment(alignment: &Alignment) -> TableAlignment {
    match alignment {
        Alignment::None => TableAlignment::None,
        Alignment::Left => TableAlignment::Left,
        Alignment::Center => TableAlignment::Center,
        Alignment::Right => TableAlignment::Right,
    }
}

/// Anchor slug: lowercase alphanumerics, whitespace and dashes collapse to `-`
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(ch.to_lowercase());
        } else if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_dash = true;
        }
    }
    if out.is_empty() {
        "section".to_string()
    } else {
        out
    }
}
