//! Utilities module for Cosmic Lessons
//!
//! Shared helper functions:
//! - Path utilities
//! - Text utilities for titles and labels

use std::path::{Path, PathBuf};

/// Path utilities
pub mod path {
    use super::*;

    /// Check if path has a markdown extension
    pub fn is_markdown(path: &Path) -> bool {
        matches!(
            path.extension()
                .and_then(|s| s.to_str())
                .map(|s| s.to_ascii_lowercase())
                .as_deref(),
            Some("md" | "markdown" | "mdown" | "mkd")
        )
    }

    /// Check if the final path component starts with a dot
    pub fn is_hidden(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false)
    }

    /// Expand tilde to home directory
    pub fn expand_tilde(path: &Path) -> PathBuf {
        if let Ok(stripped) = path.strip_prefix("~") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        }
        path.to_path_buf()
    }
}

/// Text utilities
pub mod text {
    use regex::Regex;
    use std::borrow::Cow;
    use std::sync::OnceLock;

    /// Ordering prefix such as `01-` or `3_`
    fn order_prefix() -> Option<&'static Regex> {
        static ORDER_PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
        ORDER_PREFIX
            .get_or_init(|| Regex::new(r"^\d+[\s._-]*").ok())
            .as_ref()
    }

    /// Turn a file or directory name such as `02-getting_started` into
    /// a display title (`Getting started`)
    pub fn title_from_name(name: &str) -> String {
        let stripped = match order_prefix() {
            Some(re) => re.replace(name, ""),
            None => Cow::Borrowed(name),
        };
        let base = if stripped.trim().is_empty() {
            name
        } else {
            stripped.as_ref()
        };

        let spaced: String = base
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect();
        let spaced = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Truncate string with ellipsis, counting characters rather than bytes
    pub fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else if max_len <= 3 {
            "...".to_string()
        } else {
            let head: String = s.chars().take(max_len - 3).collect();
            format!("{}...", head)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_markdown() {
        assert!(path::is_markdown(Path::new("test.md")));
        assert!(path::is_markdown(Path::new("TEST.MD")));
        assert!(path::is_markdown(Path::new("test.markdown")));
        assert!(!path::is_markdown(Path::new("test.txt")));
    }

    #[test]
    fn test_is_hidden() {
        assert!(path::is_hidden(Path::new("/a/.git")));
        assert!(!path::is_hidden(Path::new("/a/lesson.md")));
    }

    #[test]
    fn test_title_from_name() {
        assert_eq!(text::title_from_name("01-intro"), "Intro");
        assert_eq!(text::title_from_name("02_getting_started"), "Getting started");
        assert_eq!(text::title_from_name("10 advanced-topics"), "Advanced topics");
        assert_eq!(text::title_from_name("rust"), "Rust");
        assert_eq!(text::title_from_name("2024"), "2024");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(text::truncate("hello", 10), "hello");
        assert_eq!(text::truncate("hello world", 8), "hello...");
        assert_eq!(text::truncate("lección número", 8), "lecci...");
    }
}
