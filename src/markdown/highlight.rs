//! Code block syntax highlighting
//!
//! Wraps syntect. Highlighting never fails from the caller's point of view:
//! unknown languages and highlighter errors fall back to plain text.

use std::sync::Arc;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// Theme used when the configured one is not bundled
pub const FALLBACK_THEME: &str = "InspiredGitHub";

/// Theme used for dark appearance
pub const DARK_THEME: &str = "base16-ocean.dark";

/// One colored run of code text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSpan {
    pub text: String,
    /// Foreground as RGB; `None` means the default text color
    pub color: Option<[u8; 3]>,
    pub bold: bool,
    pub italic: bool,
}

impl CodeSpan {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            color: None,
            bold: false,
            italic: false,
        }
    }
}

/// A highlighted code block, one entry per source line (newlines stripped)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighlightedCode {
    pub lines: Vec<Vec<CodeSpan>>,
    /// Name of the grammar used, `None` for the plain-text fallback
    pub syntax: Option<String>,
}

impl HighlightedCode {
    /// Unhighlighted rendition of `code`
    pub fn plain(code: &str) -> Self {
        Self {
            lines: code
                .lines()
                .map(|line| vec![CodeSpan::plain(line)])
                .collect(),
            syntax: None,
        }
    }

    pub fn is_highlighted(&self) -> bool {
        self.syntax.is_some()
    }
}

/// Shared syntect state; cloning is cheap
#[derive(Clone)]
pub struct CodeHighlighter {
    syntax_set: Arc<SyntaxSet>,
    theme_set: Arc<ThemeSet>,
    theme_name: String,
}

impl std::fmt::Debug for CodeHighlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeHighlighter")
            .field("theme_name", &self.theme_name)
            .finish_non_exhaustive()
    }
}

impl CodeHighlighter {
    /// Load the bundled grammars and themes
    pub fn new(theme_name: &str) -> Self {
        let theme_set = ThemeSet::load_defaults();
        let theme_name = if theme_set.themes.contains_key(theme_name) {
            theme_name.to_string()
        } else {
            log::warn!("Unknown code theme '{}', using {}", theme_name, FALLBACK_THEME);
            FALLBACK_THEME.to_string()
        };

        Self {
            syntax_set: Arc::new(SyntaxSet::load_defaults_newlines()),
            theme_set: Arc::new(theme_set),
            theme_name,
        }
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.get(FALLBACK_THEME))
    }

    /// Background color of the active theme
    pub fn background(&self) -> Option<[u8; 3]> {
        self.theme()
            .and_then(|theme| theme.settings.background)
            .map(|c| [c.r, c.g, c.b])
    }

    /// Resolve a fence language to a grammar
    fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        let lang = language.to_lowercase();
        if let Some(syntax) = self
            .syntax_set
            .find_syntax_by_token(&lang)
            .or_else(|| self.syntax_set.find_syntax_by_name(language))
        {
            return Some(syntax);
        }

        let extension = match lang.as_str() {
            "rust" => "rs",
            "python" | "py3" => "py",
            "javascript" | "node" => "js",
            "typescript" => "ts",
            "c++" => "cpp",
            "c#" | "csharp" => "cs",
            "shell" | "bash" | "zsh" | "console" => "sh",
            "yaml" => "yml",
            "markdown" => "md",
            "ruby" => "rb",
            "golang" => "go",
            other => other,
        };
        self.syntax_set.find_syntax_by_extension(extension)
    }

    /// Highlight `code`; falls back to plain text
    pub fn highlight(&self, language: Option<&str>, code: &str) -> HighlightedCode {
        let syntax = match language.and_then(|lang| self.find_syntax(lang)) {
            Some(syntax) => syntax,
            None => return HighlightedCode::plain(code),
        };
        let theme = match self.theme() {
            Some(theme) => theme,
            None => return HighlightedCode::plain(code),
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let ranges = match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => ranges,
                Err(e) => {
                    log::debug!("Highlighting {} failed: {}", syntax.name, e);
                    return HighlightedCode::plain(code);
                }
            };

            let spans = ranges
                .into_iter()
                .filter_map(|(style, text)| {
                    let text = text.trim_end_matches(['\n', '\r']);
                    if text.is_empty() {
                        return None;
                    }
                    let fg = style.foreground;
                    Some(CodeSpan {
                        text: text.to_string(),
                        color: Some([fg.r, fg.g, fg.b]),
                        bold: style.font_style.contains(FontStyle::BOLD),
                        italic: style.font_style.contains(FontStyle::ITALIC),
                    })
                })
                .collect();
            lines.push(spans);
        }

        HighlightedCode {
            lines,
            syntax: Some(syntax.name.clone()),
        }
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new(FALLBACK_THEME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &[CodeSpan]) -> String {
        line.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_highlight_known_language() {
        let highlighter = CodeHighlighter::default();
        let code = "fn main() {\n    println!(\"hola\");\n}\n";
        let highlighted = highlighter.highlight(Some("rust"), code);

        assert!(highlighted.is_highlighted());
        assert_eq!(highlighted.lines.len(), 3);
        assert_eq!(line_text(&highlighted.lines[1]), "    println!(\"hola\");");
        assert!(highlighted.lines[0].iter().all(|s| s.color.is_some()));
    }

    #[test]
    fn test_language_aliases() {
        let highlighter = CodeHighlighter::default();
        assert!(highlighter.highlight(Some("Python"), "x = 1\n").is_highlighted());
        assert!(highlighter.highlight(Some("bash"), "ls -la\n").is_highlighted());
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let highlighter = CodeHighlighter::default();
        let highlighted = highlighter.highlight(Some("no-such-lang"), "a\nb\n");
        assert!(!highlighted.is_highlighted());
        assert_eq!(highlighted.lines.len(), 2);
        assert_eq!(highlighted.lines[0][0].color, None);
    }

    #[test]
    fn test_missing_language_is_plain() {
        let highlighter = CodeHighlighter::default();
        assert_eq!(
            highlighter.highlight(None, "text"),
            HighlightedCode::plain("text")
        );
    }

    #[test]
    fn test_unknown_theme_uses_fallback() {
        let highlighter = CodeHighlighter::new("not-a-theme");
        assert_eq!(highlighter.theme_name(), FALLBACK_THEME);

        let dark = CodeHighlighter::new(DARK_THEME);
        assert_eq!(dark.theme_name(), DARK_THEME);
        assert!(dark.background().is_some());
    }
}
