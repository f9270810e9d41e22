//! Status bar UI component
//!
//! Displays the current lesson, its outline and code block counts, the zoom
//! level, and transient notices such as clipboard failures.

use cosmic::iced::Length;
use cosmic::widget::{container, horizontal_space, text, Row};
use cosmic::Element;

use crate::message::Message;
use crate::state::{AppState, ContentState, StatusLevel};

/// Information to display in the status bar
#[derive(Debug, Clone, Default)]
pub struct StatusBarInfo {
    /// Current lesson title
    pub lesson: Option<String>,
    /// Whether the lesson is remote
    pub remote: bool,
    /// Outline entry count
    pub headings: usize,
    /// Code block count
    pub code_blocks: usize,
    /// Zoom factor
    pub zoom: f32,
    /// Transient notice and its level
    pub notice: Option<(String, StatusLevel)>,
    /// Whether a load is in flight
    pub loading: bool,
}

impl StatusBarInfo {
    /// Format the lesson display
    pub fn lesson_display(&self) -> String {
        match (&self.lesson, self.loading) {
            (Some(title), true) => format!("{} (loading)", title),
            (Some(title), false) if self.remote => format!("{} (remote)", title),
            (Some(title), false) => title.clone(),
            (None, _) => "Ready".to_string(),
        }
    }

    /// Format document statistics
    pub fn stats_display(&self) -> String {
        format!("{} sections, {} code blocks", self.headings, self.code_blocks)
    }

    pub fn zoom_display(&self) -> String {
        format!("{:.0}%", self.zoom * 100.0)
    }

    fn notice_display(&self) -> Option<String> {
        self.notice.as_ref().map(|(message, level)| match level {
            StatusLevel::Info => message.clone(),
            StatusLevel::Warning => format!("⚠ {}", message),
            StatusLevel::Error => format!("✖ {}", message),
        })
    }
}

/// Build StatusBarInfo from the app state
pub fn build_status_info(state: &AppState) -> StatusBarInfo {
    let viewer = &state.viewer;
    let loaded = matches!(viewer.content, ContentState::Loaded { .. });

    StatusBarInfo {
        lesson: viewer.lesson().map(|l| l.title.clone()),
        remote: viewer.lesson().map(|l| l.path.is_remote()).unwrap_or(false),
        headings: if loaded { viewer.toc.len() } else { 0 },
        code_blocks: if loaded { viewer.code_blocks.len() } else { 0 },
        zoom: state.zoom,
        notice: state
            .status_message
            .as_ref()
            .map(|m| (m.text.clone(), m.level)),
        loading: viewer.is_loading(),
    }
}

/// Status bar widget
pub struct StatusBar;

impl StatusBar {
    /// Create the status bar view
    pub fn view<'a>(info: StatusBarInfo) -> Element<'a, Message> {
        let mut status_row: Row<'_, Message> = Row::new().spacing(16);

        status_row = status_row.push(text(info.lesson_display()).size(12));

        if let Some(notice) = info.notice_display() {
            status_row = status_row.push(text(notice).size(12));
        }

        // Spacer
        status_row = status_row.push(horizontal_space());

        if info.lesson.is_some() && !info.loading {
            status_row = status_row.push(text(info.stats_display()).size(12));
        }
        status_row = status_row.push(text(info.zoom_display()).size(12));

        container(status_row)
            .width(Length::Fill)
            .padding([4, 12])
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_display() {
        let mut info = StatusBarInfo {
            lesson: Some("Intro".to_string()),
            zoom: 1.0,
            ..Default::default()
        };
        assert_eq!(info.lesson_display(), "Intro");

        info.loading = true;
        assert_eq!(info.lesson_display(), "Intro (loading)");

        info.lesson = None;
        assert_eq!(info.lesson_display(), "Ready");
    }

    #[test]
    fn test_zoom_display() {
        let info = StatusBarInfo {
            zoom: 1.25,
            ..Default::default()
        };
        assert_eq!(info.zoom_display(), "125%");
    }

    #[test]
    fn test_error_notice_is_marked() {
        let info = StatusBarInfo {
            notice: Some(("Copying failed".to_string(), StatusLevel::Error)),
            ..Default::default()
        };
        assert_eq!(info.notice_display().as_deref(), Some("✖ Copying failed"));
    }
}
