//! Sidebar widget for the course catalog
//!
//! Provides the course list with:
//! - Lesson filter input
//! - Collapsible course sections
//! - Active lesson highlight
//! - Click handlers

use crate::catalog::{Catalog, CourseId, LessonKey, LessonRef};
use crate::message::{CatalogMessage, Message, SidebarMessage};
use crate::state::SidebarState;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, container, scrollable, text, text_input, Column, Row};
use cosmic::Element;

/// Indentation of lesson rows under their course
const LESSON_INDENT: f32 = 16.0;

/// Row height for lesson entries
const ROW_HEIGHT: f32 = 28.0;

/// Build the sidebar view
pub fn view_sidebar<'a>(
    state: &'a SidebarState,
    catalog: Option<&'a Catalog>,
) -> Element<'a, Message> {
    if !state.visible {
        return container(Column::new()).width(Length::Shrink).into();
    }

    let content = Column::new()
        .push(view_sidebar_header(catalog))
        .push(view_filter_bar(state))
        .push(view_course_list(state, catalog))
        .spacing(4)
        .padding(4);

    container(content)
        .width(Length::Fixed(state.width as f32))
        .height(Length::Fill)
        .class(cosmic::theme::Container::Card)
        .into()
}

/// Catalog title with a reload button
fn view_sidebar_header<'a>(catalog: Option<&'a Catalog>) -> Element<'a, Message> {
    let title = catalog.map(|c| c.title.as_str()).unwrap_or("Courses");

    Row::new()
        .push(text(title).size(14))
        .push(cosmic::widget::horizontal_space())
        .push(
            button::text("⟳")
                .class(cosmic::theme::Button::Text)
                .padding([4, 8])
                .on_press(Message::Catalog(CatalogMessage::Reload)),
        )
        .spacing(8)
        .padding(8)
        .align_y(Alignment::Center)
        .into()
}

fn view_filter_bar<'a>(state: &'a SidebarState) -> Element<'a, Message> {
    let mut input = text_input("Filter lessons...", state.filter_text.as_str())
        .on_input(|value| Message::Sidebar(SidebarMessage::SetFilter(value)))
        .width(Length::Fill);

    if state.is_filtering() {
        input = input.on_clear(Message::Sidebar(SidebarMessage::ClearFilter));
    }

    container(input).width(Length::Fill).padding([0, 4]).into()
}

fn view_course_list<'a>(
    state: &'a SidebarState,
    catalog: Option<&'a Catalog>,
) -> Element<'a, Message> {
    if state.is_loading {
        return message_box("Loading courses...");
    }

    if let Some(ref error) = state.error_message {
        return message_box(error);
    }

    let catalog = match catalog {
        Some(catalog) => catalog,
        None => return message_box("No courses loaded"),
    };

    let mut items = Column::new().spacing(2);
    let mut listed = 0;

    for (index, course) in catalog.courses.iter().enumerate() {
        let id = CourseId(index);
        if !state.course_matches(catalog, id) {
            continue;
        }
        listed += 1;

        let expanded = state.is_expanded(id) || state.is_filtering();
        items = items.push(view_course_header(id, &course.title, expanded));

        for (lesson_index, lesson) in state.visible_lessons(catalog, id) {
            let key = LessonKey::new(index, lesson_index);
            items = items.push(view_lesson_entry(key, lesson, state.is_active(key)));
        }
    }

    if listed == 0 {
        return message_box("No matching lessons");
    }

    scrollable(items).height(Length::Fill).into()
}

fn message_box<'a>(message: &'a str) -> Element<'a, Message> {
    container(text(message).size(14))
        .width(Length::Fill)
        .padding(16)
        .into()
}

fn view_course_header<'a>(id: CourseId, title: &'a str, expanded: bool) -> Element<'a, Message> {
    let row = Row::new()
        .push(text(if expanded { "▾" } else { "▸" }).size(14))
        .push(text(title).size(14))
        .spacing(8)
        .align_y(Alignment::Center)
        .padding([4, 8]);

    button::custom(row)
        .class(cosmic::theme::Button::Text)
        .on_press(Message::Sidebar(SidebarMessage::ToggleCourse(id)))
        .width(Length::Fill)
        .padding(0)
        .into()
}

fn view_lesson_entry<'a>(key: LessonKey, lesson: &'a LessonRef, active: bool) -> Element<'a, Message> {
    let row = Row::new()
        .push(cosmic::widget::horizontal_space().width(Length::Fixed(LESSON_INDENT)))
        .push(text(lesson.title.as_str()).size(13))
        .align_y(Alignment::Center)
        .padding([4, 8]);

    let clickable = button::custom(row)
        .class(if active {
            cosmic::theme::Button::Suggested
        } else {
            cosmic::theme::Button::Text
        })
        .on_press(Message::Sidebar(SidebarMessage::SelectLesson(key)))
        .width(Length::Fill)
        .padding(0);

    container(clickable)
        .width(Length::Fill)
        .height(Length::Fixed(ROW_HEIGHT))
        .into()
}
