//! Menu bar and keyboard shortcut handling
//!
//! Provides the application menu bar and keyboard shortcut definitions.

use cosmic::iced::keyboard::Key;
use cosmic::iced::{event, keyboard, Event, Subscription};
use cosmic::iced_futures::event::listen_raw;
use cosmic::widget::menu::action::MenuAction;
use cosmic::widget::menu::key_bind::Modifier;
use cosmic::widget::menu::{Item, KeyBind};
use std::collections::HashMap;

use crate::message::{CatalogMessage, LessonMessage, Message, SystemMessage, ViewMessage};

/// Menu actions that can be triggered from the menu bar or keyboard shortcuts
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    // Lesson actions
    ReloadLesson,
    ExportHtml,
    ReloadCatalog,
    Quit,

    // View actions
    ToggleSidebar,
    ToggleToc,
    ZoomIn,
    ZoomOut,
    ZoomReset,
}

impl MenuAction for Action {
    type Message = Message;

    fn message(&self) -> Self::Message {
        self.to_message()
    }
}

impl Action {
    /// Convert action to application message
    pub fn to_message(self) -> Message {
        match self {
            Action::ReloadLesson => Message::Lesson(LessonMessage::Reload),
            Action::ExportHtml => Message::Lesson(LessonMessage::Export),
            Action::ReloadCatalog => Message::Catalog(CatalogMessage::Reload),
            Action::Quit => Message::System(SystemMessage::CloseRequested),

            Action::ToggleSidebar => Message::View(ViewMessage::ToggleSidebar),
            Action::ToggleToc => Message::View(ViewMessage::ToggleToc),
            Action::ZoomIn => Message::View(ViewMessage::ZoomIn),
            Action::ZoomOut => Message::View(ViewMessage::ZoomOut),
            Action::ZoomReset => Message::View(ViewMessage::ZoomReset),
        }
    }

    /// Action for a character key pressed together with Ctrl
    pub fn from_shortcut(key: &str, shift: bool) -> Option<Self> {
        let action = match (key, shift) {
            ("r", true) => Action::ReloadCatalog,
            ("r", false) => Action::ReloadLesson,
            ("e", false) => Action::ExportHtml,
            ("q", false) => Action::Quit,
            ("b", false) => Action::ToggleSidebar,
            ("t", false) => Action::ToggleToc,
            ("=" | "+", _) => Action::ZoomIn,
            ("-", false) => Action::ZoomOut,
            ("0", false) => Action::ZoomReset,
            _ => return None,
        };
        Some(action)
    }
}

fn ctrl(key: &str) -> KeyBind {
    KeyBind {
        modifiers: vec![Modifier::Ctrl],
        key: Key::Character(key.into()),
    }
}

/// Create default keyboard shortcuts
pub fn key_binds() -> HashMap<KeyBind, Action> {
    let mut binds = HashMap::new();

    // Lesson shortcuts
    binds.insert(ctrl("r"), Action::ReloadLesson);
    binds.insert(ctrl("e"), Action::ExportHtml);
    binds.insert(
        KeyBind {
            modifiers: vec![Modifier::Ctrl, Modifier::Shift],
            key: Key::Character("r".into()),
        },
        Action::ReloadCatalog,
    );
    binds.insert(ctrl("q"), Action::Quit);

    // View shortcuts
    binds.insert(ctrl("b"), Action::ToggleSidebar);
    binds.insert(ctrl("t"), Action::ToggleToc);
    binds.insert(ctrl("="), Action::ZoomIn);
    binds.insert(ctrl("-"), Action::ZoomOut);
    binds.insert(ctrl("0"), Action::ZoomReset);

    binds
}

/// Type alias for menu items with our action type
pub type MenuItems = Vec<(&'static str, Vec<Item<Action, &'static str>>)>;

/// Create menu bar items
pub fn menu_items() -> MenuItems {
    vec![
        (
            "Lesson",
            vec![
                Item::Button("Reload Lesson", None, Action::ReloadLesson),
                Item::Button("Export as HTML", None, Action::ExportHtml),
                Item::Divider,
                Item::Button("Reload Courses", None, Action::ReloadCatalog),
                Item::Divider,
                Item::Button("Quit", None, Action::Quit),
            ],
        ),
        (
            "View",
            vec![
                Item::Button("Toggle Sidebar", None, Action::ToggleSidebar),
                Item::Button("Toggle Outline", None, Action::ToggleToc),
                Item::Divider,
                Item::Button("Zoom In", None, Action::ZoomIn),
                Item::Button("Zoom Out", None, Action::ZoomOut),
                Item::Button("Reset Zoom", None, Action::ZoomReset),
            ],
        ),
    ]
}

/// Keyboard shortcuts subscription
///
/// Listens for keyboard events and matches against defined shortcuts.
pub fn keyboard_shortcuts_subscription() -> Subscription<Message> {
    listen_raw(|event, status, _| {
        // Only process if event wasn't already handled
        if event::Status::Ignored != status {
            return None;
        }

        if let Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) = event {
            if let Key::Character(ref c) = key {
                if modifiers.control() && !modifiers.alt() {
                    return Action::from_shortcut(&c.to_lowercase(), modifiers.shift())
                        .map(Action::to_message);
                }
            }
        }

        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcuts_match_key_binds() {
        for (bind, action) in key_binds() {
            let key = match &bind.key {
                Key::Character(c) => c.to_string(),
                other => panic!("unexpected key {:?}", other),
            };
            let shift = bind.modifiers.contains(&Modifier::Shift);
            assert_eq!(Action::from_shortcut(&key, shift), Some(action), "{:?}", bind);
        }
    }

    #[test]
    fn test_unbound_shortcut() {
        assert_eq!(Action::from_shortcut("x", false), None);
        assert_eq!(Action::from_shortcut("b", true), None);
    }
}
