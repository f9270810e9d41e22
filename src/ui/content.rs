//! Content pane widget
//!
//! Shows the current lesson as a scrollable column of blocks, or the loading
//! placeholder, the inline fetch error, or the welcome text. Scroll reports
//! carry the observer generation that was armed when the view was built.

use crate::markdown::{Block, CodeBlockId, CodeSpan, ListItem, StyledText, TableAlignment};
use crate::message::{CodeBlockMessage, ContentMessage, LessonMessage, Message};
use crate::state::{ContentState, ViewerState};
use crate::viewer::layout::{CODE_PADDING, NEST_INDENT, TABLE_CELL_PADDING};
use crate::viewer::{CodeBlocks, CopyLabels, LayoutMetrics, Viewport};
use cosmic::iced::font::{Style, Weight};
use cosmic::iced::widget::{rich_text, span, text::Span};
use cosmic::iced::{Alignment, Color, Font, Length};
use cosmic::widget::{button, container, divider, horizontal_space, scrollable, text, Column, Row};
use cosmic::Element;

/// Id of the lesson scrollable, target of outline navigation
pub fn content_scroll_id() -> cosmic::widget::Id {
    cosmic::widget::Id::new("lesson-content")
}

const LINK_COLOR: Color = Color::from_rgb(0.2, 0.45, 0.85);

/// Shared inputs for rendering blocks
struct BlockContext<'a> {
    metrics: &'a LayoutMetrics,
    code_blocks: &'a CodeBlocks,
    labels: &'a CopyLabels,
}

/// Build the content pane
pub fn view_content<'a>(viewer: &'a ViewerState, labels: &'a CopyLabels) -> Element<'a, Message> {
    match &viewer.content {
        ContentState::Idle => view_welcome(),
        ContentState::Loading { lesson } => centered(
            Column::new()
                .push(text(lesson.title.as_str()).size(18))
                .push(text("Loading lesson...").size(14))
                .spacing(8)
                .align_x(Alignment::Center),
        ),
        ContentState::Failed { lesson, error } => centered(
            Column::new()
                .push(text(lesson.title.as_str()).size(18))
                .push(text(error.user_message()).size(14))
                .push(text(error.to_string()).size(11))
                .push(
                    button::text("Try again")
                        .on_press(Message::Lesson(LessonMessage::Reload)),
                )
                .spacing(8)
                .align_x(Alignment::Center),
        ),
        ContentState::Loaded { document, .. } => {
            let ctx = BlockContext {
                metrics: viewer.metrics(),
                code_blocks: &viewer.code_blocks,
                labels,
            };
            let body = view_blocks(&document.blocks, &ctx).padding(ctx.metrics.padding as u16);

            let generation = viewer.observer.generation();
            scrollable(body)
                .id(content_scroll_id())
                .on_scroll(move |viewport| {
                    let bounds = viewport.bounds();
                    Message::Content(ContentMessage::Scrolled {
                        generation,
                        viewport: Viewport {
                            offset_y: viewport.absolute_offset().y,
                            height: bounds.height,
                            width: bounds.width,
                        },
                    })
                })
                .width(Length::Fill)
                .height(Length::Fill)
                .into()
        }
    }
}

fn view_welcome<'a>() -> Element<'a, Message> {
    centered(
        Column::new()
            .push(text("Welcome to Cosmic Lessons").size(24))
            .push(text("Pick a course in the sidebar and open a lesson").size(14))
            .push(text("Ctrl+B toggles the sidebar, Ctrl+T the outline").size(12))
            .spacing(8)
            .align_x(Alignment::Center),
    )
}

fn centered<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(16)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

fn view_blocks<'a>(blocks: &'a [Block], ctx: &BlockContext<'a>) -> Column<'a, Message> {
    blocks
        .iter()
        .fold(Column::new(), |column, block| {
            column.push(view_block(block, ctx))
        })
        .spacing(ctx.metrics.block_spacing as u16)
        .width(Length::Fill)
}

fn view_block<'a>(block: &'a Block, ctx: &BlockContext<'a>) -> Element<'a, Message> {
    let metrics = ctx.metrics;
    match block {
        Block::Paragraph(content) => styled(content, metrics.font_size, false),
        Block::Heading { level, content, .. } => {
            styled(content, metrics.heading_size(*level), true)
        }
        Block::CodeBlock { id, language, code } => view_code_block(*id, language, code, ctx),
        Block::Blockquote(children) => Row::new()
            .push(divider::vertical::default())
            .push(view_blocks(children, ctx))
            .spacing(12)
            .into(),
        Block::UnorderedList(items) => view_list(items, ctx, |_| "•".to_string()),
        Block::OrderedList { start, items } => {
            let start = *start;
            view_list(items, ctx, move |i| format!("{}.", start + i as u64))
        }
        Block::Table {
            headers,
            rows,
            alignments,
        } => view_table(headers, rows, alignments, metrics),
        Block::HorizontalRule => divider::horizontal::default().into(),
        Block::Html(html) => text(html.as_str())
            .size(metrics.code_font_size)
            .font(Font::MONOSPACE)
            .into(),
        Block::FootnoteDefinition { label, content } => Row::new()
            .push(text(format!("[{}]", label)).size(metrics.font_size * 0.85))
            .push(view_blocks(content, ctx))
            .spacing(8)
            .into(),
    }
}

/// Render a run of styled text; `strong` makes every span bold (headings)
fn styled<'a>(content: &'a [StyledText], size: f32, strong: bool) -> Element<'a, Message> {
    let spans: Vec<Span<'a, (), Font>> = content
        .iter()
        .map(|part| {
            let mut font = if part.code {
                Font::MONOSPACE
            } else {
                Font::DEFAULT
            };
            if part.bold || strong {
                font.weight = Weight::Bold;
            }
            if part.italic {
                font.style = Style::Italic;
            }

            let mut piece = span(part.text.as_str())
                .font(font)
                .strikethrough(part.strikethrough);
            if part.link.is_some() {
                piece = piece.color(LINK_COLOR).underline(true);
            }
            piece
        })
        .collect();

    rich_text(spans).size(size).width(Length::Fill).into()
}

fn view_list<'a>(
    items: &'a [ListItem],
    ctx: &BlockContext<'a>,
    marker: impl Fn(usize) -> String,
) -> Element<'a, Message> {
    items
        .iter()
        .enumerate()
        .fold(Column::new().spacing(4), |column, (i, item)| {
            let bullet = match item.task {
                Some(true) => "☑".to_string(),
                Some(false) => "☐".to_string(),
                None => marker(i),
            };
            column.push(
                Row::new()
                    .push(
                        container(text(bullet).size(ctx.metrics.font_size))
                            .width(Length::Fixed(NEST_INDENT)),
                    )
                    .push(view_blocks(&item.content, ctx).spacing(4)),
            )
        })
        .into()
}

fn view_table<'a>(
    headers: &'a [Vec<StyledText>],
    rows: &'a [Vec<Vec<StyledText>>],
    alignments: &'a [TableAlignment],
    metrics: &LayoutMetrics,
) -> Element<'a, Message> {
    let row_view = |cells: &'a [Vec<StyledText>], strong: bool| {
        cells
            .iter()
            .enumerate()
            .fold(Row::new(), |row, (i, cell)| {
                let cell = container(styled(cell, metrics.font_size, strong))
                    .padding(TABLE_CELL_PADDING as u16)
                    .width(Length::FillPortion(1));
                let cell = match alignments.get(i).copied().unwrap_or_default() {
                    TableAlignment::Center => cell.center_x(Length::FillPortion(1)),
                    TableAlignment::Right => cell.align_right(Length::FillPortion(1)),
                    _ => cell,
                };
                row.push(cell)
            })
    };

    let mut table = Column::new().push(row_view(headers, true));
    table = table.push(divider::horizontal::default());
    for row in rows {
        table = table.push(row_view(row, false));
    }

    container(table)
        .width(Length::Fill)
        .class(cosmic::theme::Container::Card)
        .into()
}

fn view_code_block<'a>(
    id: CodeBlockId,
    language: &'a Option<String>,
    code: &'a str,
    ctx: &BlockContext<'a>,
) -> Element<'a, Message> {
    let metrics = ctx.metrics;

    let toolbar = Row::new()
        .push(text(language.as_deref().unwrap_or("text")).size(12))
        .push(horizontal_space())
        .push(
            button::text(ctx.code_blocks.label(id, ctx.labels))
                .class(cosmic::theme::Button::Text)
                .padding([2, 8])
                .on_press(Message::CodeBlock(CodeBlockMessage::Copy(id))),
        )
        .align_y(Alignment::Center)
        .spacing(8);

    let lines: Element<'a, Message> = match ctx.code_blocks.get(id) {
        Some(block) if block.highlighted.is_highlighted() => block
            .highlighted
            .lines
            .iter()
            .fold(Column::new(), |column, line| {
                column.push(code_line(line, metrics.code_font_size))
            })
            .into(),
        _ => text(code)
            .size(metrics.code_font_size)
            .font(Font::MONOSPACE)
            .into(),
    };

    container(
        Column::new()
            .push(toolbar)
            .push(scrollable::horizontal(lines))
            .spacing(4),
    )
    .padding(CODE_PADDING as u16)
    .width(Length::Fill)
    .class(cosmic::theme::Container::Card)
    .into()
}

fn code_line<'a>(line: &'a [CodeSpan], size: f32) -> Element<'a, Message> {
    let spans: Vec<Span<'a, (), Font>> = line
        .iter()
        .map(|part| {
            let mut font = Font::MONOSPACE;
            if part.bold {
                font.weight = Weight::Bold;
            }
            if part.italic {
                font.style = Style::Italic;
            }
            let piece = span(part.text.trim_end_matches('\n')).font(font);
            match part.color {
                Some([r, g, b]) => piece.color(Color::from_rgb8(r, g, b)),
                None => piece,
            }
        })
        .collect();

    rich_text(spans).size(size).into()
}
