//! Clipboard access for the copy buttons
//!
//! Uses the arboard crate. The handle is opened lazily and kept, since on
//! X11 the copied text is only served while a clipboard handle is alive.

use crate::error::ClipboardError;
use arboard::Clipboard;

/// Anything code text can be copied into
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard
#[derive(Default)]
pub struct ClipboardManager {
    clipboard: Option<Clipboard>,
}

impl ClipboardManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut Clipboard, ClipboardError> {
        if self.clipboard.is_none() {
            let clipboard =
                Clipboard::new().map_err(|e| ClipboardError::AccessDenied(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| ClipboardError::AccessDenied("clipboard unavailable".to_string()))
    }
}

impl ClipboardSink for ClipboardManager {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let result = self.handle()?.set_text(text.to_string());
        result.map_err(|e| {
            // A broken handle is reopened on the next attempt
            self.clipboard = None;
            match e {
                arboard::Error::ClipboardNotSupported | arboard::Error::ClipboardOccupied => {
                    ClipboardError::AccessDenied(e.to_string())
                }
                other => ClipboardError::WriteError(other.to_string()),
            }
        })
    }
}

impl std::fmt::Debug for ClipboardManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClipboardManager")
            .field("open", &self.clipboard.is_some())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// In-memory clipboard for tests
    #[derive(Debug, Default)]
    pub struct MemoryClipboard {
        pub contents: Option<String>,
        pub deny: bool,
    }

    impl ClipboardSink for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.deny {
                return Err(ClipboardError::AccessDenied("denied".to_string()));
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MemoryClipboard;
    use super::*;

    #[test]
    fn test_clipboard_manager_starts_closed() {
        let manager = ClipboardManager::new();
        assert!(manager.clipboard.is_none());
    }

    #[test]
    fn test_memory_clipboard() {
        let mut clipboard = MemoryClipboard::default();
        clipboard.set_text("hola").unwrap();
        assert_eq!(clipboard.contents.as_deref(), Some("hola"));

        clipboard.deny = true;
        assert!(matches!(
            clipboard.set_text("x"),
            Err(ClipboardError::AccessDenied(_))
        ));
    }
}
