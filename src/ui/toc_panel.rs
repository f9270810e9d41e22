//! Outline pane widget
//!
//! Lists the lesson's level 1-3 headings, indented by level, with the entry
//! of the heading in view highlighted. Clicking an entry scrolls to it.

use crate::message::{Message, TocMessage};
use crate::utils::text::truncate;
use crate::viewer::{TableOfContents, TocEntry};
use cosmic::iced::Length;
use cosmic::widget::{button, container, scrollable, text, Column, Row};
use cosmic::Element;

/// Indentation per heading level in pixels
const INDENT_PER_LEVEL: f32 = 12.0;

/// Longer heading texts are cut with an ellipsis
const MAX_ENTRY_CHARS: usize = 48;

/// Build the outline pane
pub fn view_toc<'a>(toc: &'a TableOfContents, width: u32) -> Element<'a, Message> {
    let mut content = Column::new()
        .push(container(text("On this page").size(14)).padding([8, 8]))
        .spacing(2);

    if toc.is_empty() {
        content = content.push(container(text("No headings").size(12)).padding(8));
    } else {
        let entries = toc
            .entries()
            .iter()
            .fold(Column::new().spacing(2), |column, entry| {
                column.push(view_entry(entry, toc.is_active(&entry.id)))
            });
        content = content.push(scrollable(entries).height(Length::Fill));
    }

    container(content)
        .width(Length::Fixed(width as f32))
        .height(Length::Fill)
        .into()
}

fn view_entry<'a>(entry: &'a TocEntry, active: bool) -> Element<'a, Message> {
    let indent = f32::from(entry.level.saturating_sub(1)) * INDENT_PER_LEVEL;
    let size = if entry.level == 1 { 13 } else { 12 };

    let label = Row::new()
        .push(cosmic::widget::horizontal_space().width(Length::Fixed(indent)))
        .push(text(truncate(&entry.text, MAX_ENTRY_CHARS)).size(size));

    button::custom(label)
        .class(if active {
            cosmic::theme::Button::Suggested
        } else {
            cosmic::theme::Button::Text
        })
        .on_press(Message::Toc(TocMessage::Navigate(entry.id.clone())))
        .width(Length::Fill)
        .padding([4, 8])
        .into()
}
