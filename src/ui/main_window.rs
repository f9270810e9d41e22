//! Main window layout and composition
//!
//! Sidebar on the left, the lesson with its status bar in the middle, and the
//! outline pane on the right.

use crate::message::Message;
use crate::state::AppState;
use crate::ui::content::view_content;
use crate::ui::sidebar::view_sidebar;
use crate::ui::status_bar::{build_status_info, StatusBar};
use crate::ui::toc_panel::view_toc;
use crate::viewer::CopyLabels;
use cosmic::iced::Length;
use cosmic::widget::{container, divider, Column, Row};
use cosmic::Element;

/// Build the main window view
pub fn view<'a>(state: &'a AppState, labels: &'a CopyLabels) -> Element<'a, Message> {
    let mut main_row = Row::new();

    if state.sidebar.visible {
        main_row = main_row
            .push(view_sidebar(&state.sidebar, state.catalog.as_ref()))
            .push(divider::vertical::default());
    }

    let lesson_area = Column::new()
        .push(
            container(view_content(&state.viewer, labels))
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .push(divider::horizontal::default())
        .push(StatusBar::view(build_status_info(state)));
    main_row = main_row.push(container(lesson_area).width(Length::Fill).height(Length::Fill));

    if state.toc_visible && state.viewer.document().is_some() {
        main_row = main_row
            .push(divider::vertical::default())
            .push(view_toc(&state.viewer.toc, state.toc_width));
    }

    container(main_row)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
