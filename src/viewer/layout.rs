//! Vertical layout estimate of a rendered lesson
//!
//! The content pane only reports its scroll offset, not where each widget
//! landed. Heading positions are therefore estimated from the same metrics
//! the content pane renders with: font sizes, line height, block spacing and
//! wrap width.

use crate::config::ViewerConfig;
use crate::markdown::{plain_text, Block, HeadingId, LessonDocument, ListItem};

/// Average glyph advance as a fraction of the font size
const GLYPH_WIDTH_FACTOR: f32 = 0.55;

/// Indentation for blockquotes and list items
pub const NEST_INDENT: f32 = 24.0;

/// Height of the bar above each code block holding the language and copy button
pub const CODE_TOOLBAR_HEIGHT: f32 = 32.0;

/// Inner padding of code blocks
pub const CODE_PADDING: f32 = 8.0;

/// Vertical padding of table cells
pub const TABLE_CELL_PADDING: f32 = 4.0;

/// Font metrics used both for rendering and for the estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub font_size: f32,
    pub code_font_size: f32,
    /// Line height as a multiple of the font size
    pub line_height: f32,
    /// Space between consecutive blocks
    pub block_spacing: f32,
    /// Padding around the whole document
    pub padding: f32,
    /// Available width for text
    pub width: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            font_size: 15.0,
            code_font_size: 13.0,
            line_height: 1.4,
            block_spacing: 12.0,
            padding: 24.0,
            width: 720.0,
        }
    }
}

impl LayoutMetrics {
    pub fn from_config(config: &ViewerConfig, zoom: f32) -> Self {
        Self {
            font_size: config.font_size * zoom,
            code_font_size: config.code_font_size * zoom,
            ..Self::default()
        }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width.max(1.0);
        self
    }

    /// Text size for a heading level
    pub fn heading_size(&self, level: u8) -> f32 {
        let scale = match level {
            1 => 2.0,
            2 => 1.6,
            3 => 1.3,
            4 => 1.15,
            5 => 1.05,
            _ => 1.0,
        };
        self.font_size * scale
    }

    fn line(&self, size: f32) -> f32 {
        size * self.line_height
    }

    /// Height of wrapped text at `size` in `width`
    fn text_height(&self, text: &str, size: f32, width: f32) -> f32 {
        let per_line = ((width / (size * GLYPH_WIDTH_FACTOR)).floor() as usize).max(1);
        let lines: usize = text
            .split('\n')
            .map(|line| line.chars().count().div_ceil(per_line).max(1))
            .sum();
        lines as f32 * self.line(size)
    }
}

/// A vertical extent in content coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub top: f32,
    pub height: f32,
}

impl Region {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Fraction of this region inside the viewport, in `0.0..=1.0`
    pub fn visible_fraction(&self, viewport: &Viewport) -> f32 {
        if self.height <= 0.0 {
            return 0.0;
        }
        let top = self.top.max(viewport.offset_y);
        let bottom = self.bottom().min(viewport.bottom());
        ((bottom - top) / self.height).clamp(0.0, 1.0)
    }
}

/// Visible window of the content pane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub offset_y: f32,
    pub height: f32,
    pub width: f32,
}

impl Viewport {
    pub fn bottom(&self) -> f32 {
        self.offset_y + self.height
    }
}

/// Estimated positions of a document's blocks and headings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentLayout {
    /// Regions of the top-level blocks
    pub blocks: Vec<Region>,
    /// Every heading in document order
    pub headings: Vec<(HeadingId, Region)>,
    pub content_height: f32,
    pub metrics: LayoutMetrics,
}

impl DocumentLayout {
    pub fn estimate(document: &LessonDocument, metrics: LayoutMetrics) -> Self {
        let mut layout = Self {
            metrics,
            ..Self::default()
        };

        let mut y = metrics.padding;
        for (i, block) in document.blocks.iter().enumerate() {
            if i > 0 {
                y += metrics.block_spacing;
            }
            let height = layout.measure(block, y, metrics.width);
            layout.blocks.push(Region { top: y, height });
            y += height;
        }
        layout.content_height = y + metrics.padding;
        layout
    }

    pub fn heading(&self, id: &HeadingId) -> Option<Region> {
        self.headings
            .iter()
            .find(|(heading, _)| heading == id)
            .map(|(_, region)| *region)
    }

    /// Scroll offset that brings `id` to the top of a viewport of `height`
    pub fn scroll_target(&self, id: &HeadingId, viewport_height: f32) -> Option<f32> {
        let region = self.heading(id)?;
        let max = (self.content_height - viewport_height).max(0.0);
        Some((region.top - self.metrics.padding).clamp(0.0, max))
    }

    fn measure(&mut self, block: &Block, top: f32, width: f32) -> f32 {
        let m = self.metrics;
        match block {
            Block::Paragraph(spans) => m.text_height(&plain_text(spans), m.font_size, width),
            Block::Heading { id, level, content } => {
                let height = m.text_height(&plain_text(content), m.heading_size(*level), width);
                self.headings.push((id.clone(), Region { top, height }));
                height
            }
            Block::CodeBlock { code, .. } => {
                // Code does not wrap; it scrolls horizontally
                let lines = code.trim_end_matches('\n').split('\n').count().max(1);
                CODE_TOOLBAR_HEIGHT + 2.0 * CODE_PADDING + lines as f32 * m.line(m.code_font_size)
            }
            Block::Blockquote(children) | Block::FootnoteDefinition { content: children, .. } => {
                self.measure_stack(children, top, width - NEST_INDENT)
            }
            Block::UnorderedList(items) | Block::OrderedList { items, .. } => {
                self.measure_items(items, top, width - NEST_INDENT)
            }
            Block::Table { rows, .. } => {
                (rows.len() + 1) as f32 * (m.line(m.font_size) + 2.0 * TABLE_CELL_PADDING)
            }
            Block::HorizontalRule => 1.0,
            Block::Html(html) => m.text_height(html.trim_end(), m.code_font_size, width),
        }
    }

    fn measure_stack(&mut self, blocks: &[Block], top: f32, width: f32) -> f32 {
        let mut y = top;
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                y += self.metrics.block_spacing;
            }
            y += self.measure(block, y, width);
        }
        y - top
    }

    fn measure_items(&mut self, items: &[ListItem], top: f32, width: f32) -> f32 {
        let spacing = self.metrics.block_spacing / 2.0;
        let mut y = top;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                y += spacing;
            }
            let height = self.measure_stack(&item.content, y, width);
            y += height.max(self.metrics.line(self.metrics.font_size));
        }
        y - top
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::LessonRenderer;

    fn layout(markdown: &str) -> DocumentLayout {
        let document = LessonRenderer::new().render(markdown);
        DocumentLayout::estimate(&document, LayoutMetrics::default())
    }

    #[test]
    fn test_headings_are_ordered_top_to_bottom() {
        let layout = layout("# Intro\n\ntext\n\n## Setup\n\nmore\n\n## Usage\n");
        assert_eq!(layout.headings.len(), 3);
        for pair in layout.headings.windows(2) {
            assert!(pair[0].1.bottom() <= pair[1].1.top);
        }
        assert!(layout.content_height > layout.headings[2].1.bottom());
    }

    #[test]
    fn test_long_paragraph_wraps() {
        let short = layout("word");
        let long = layout(&"word ".repeat(400));
        assert!(long.blocks[0].height > short.blocks[0].height * 5.0);
    }

    #[test]
    fn test_code_block_height_grows_with_lines() {
        let one = layout("```\na\n```\n");
        let three = layout("```\na\nb\nc\n```\n");
        let line = LayoutMetrics::default().code_font_size * 1.4;
        assert!((three.blocks[0].height - one.blocks[0].height - 2.0 * line).abs() < 0.01);
    }

    #[test]
    fn test_nested_heading_is_recorded() {
        let layout = layout("> ## Quoted\n");
        assert_eq!(layout.headings.len(), 1);
        assert_eq!(layout.headings[0].1.top, LayoutMetrics::default().padding);
    }

    #[test]
    fn test_visible_fraction() {
        let region = Region {
            top: 100.0,
            height: 40.0,
        };
        let viewport = |offset_y| Viewport {
            offset_y,
            height: 200.0,
            width: 600.0,
        };
        assert_eq!(region.visible_fraction(&viewport(0.0)), 1.0);
        assert_eq!(region.visible_fraction(&viewport(120.0)), 0.5);
        assert_eq!(region.visible_fraction(&viewport(300.0)), 0.0);
    }

    #[test]
    fn test_scroll_target_is_clamped() {
        let layout = layout("# Top\n\ntext\n\n## Bottom\n");
        let top = layout.headings[0].0.clone();
        let bottom = layout.headings[1].0.clone();

        assert_eq!(layout.scroll_target(&top, 100.0), Some(0.0));
        // Viewport taller than the content: nothing to scroll
        assert_eq!(layout.scroll_target(&bottom, 10_000.0), Some(0.0));
        let target = layout.scroll_target(&bottom, 10.0).unwrap();
        assert!(target > 0.0);
    }
}
