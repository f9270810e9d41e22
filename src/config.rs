//! Configuration management for Cosmic Lessons
//!
//! Handles loading, validating and saving the application configuration.
//! Configuration is stored as JSON in the user's config directory; a missing
//! file means defaults.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier following reverse-DNS convention
pub const APP_ID: &str = "com.cosmic.Lessons";

/// Name of the course manifest looked up in a catalog root
pub const MANIFEST_FILE_NAME: &str = "courses.json";

/// Maximum lesson size to render (in bytes) - 5MB
pub const MAX_LESSON_SIZE: u64 = 5 * 1024 * 1024;

/// Default request timeout for remote lessons in seconds
pub const DEFAULT_FETCH_TIMEOUT: u64 = 15;

/// Default visibility fraction a heading needs to count as visible
pub const DEFAULT_SCROLL_THRESHOLD: f32 = 0.3;

/// How long the copy confirmation stays on a code block button
pub const DEFAULT_COPY_FEEDBACK_MS: u64 = 1500;

/// How long transient notices stay in the status bar
pub const NOTICE_DURATION_MS: u64 = 4000;

/// Label of an idle copy button
pub const DEFAULT_COPY_LABEL: &str = "Copiar";

/// Label of a copy button right after a successful copy
pub const DEFAULT_COPIED_LABEL: &str = "Copiado ✔";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Lesson viewer configuration
    pub viewer: ViewerConfig,

    /// Lesson fetching configuration
    pub fetch: FetchConfig,

    /// UI configuration
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from the config directory. On first run the
    /// defaults are written out so there is a file to edit.
    pub fn load_or_init() -> ConfigResult<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            let config = Self::default();
            match config.save_to(&path) {
                Ok(()) => log::info!("Wrote default configuration to {}", path.display()),
                Err(e) => log::warn!("Could not write default configuration: {}", e),
            }
            return Ok(config);
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Config =
            serde_json::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::SaveError(e.to_string()))
    }

    /// Reject values the viewer cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        let threshold = self.viewer.scroll_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidValue {
                key: "viewer.scroll_threshold".to_string(),
                reason: format!("{} is outside 0.0..=1.0", threshold),
            });
        }

        if self.viewer.font_size < 6.0 || self.viewer.code_font_size < 6.0 {
            return Err(ConfigError::InvalidValue {
                key: "viewer.font_size".to_string(),
                reason: "font sizes must be at least 6".to_string(),
            });
        }

        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "fetch.timeout_secs".to_string(),
                reason: "timeout must be positive".to_string(),
            });
        }

        Ok(())
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Get the data directory path (for session data)
    pub fn data_dir() -> ConfigResult<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    fn config_file_path() -> ConfigResult<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }
}

/// Lesson viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Fraction of a heading that must be visible to activate its TOC entry
    pub scroll_threshold: f32,

    /// Copy confirmation duration in milliseconds
    pub copy_feedback_ms: u64,

    /// Idle copy button label
    pub copy_label: String,

    /// Copy button label after a successful copy
    pub copied_label: String,

    /// Animate TOC navigation
    pub smooth_scroll: bool,

    /// Smooth scroll animation length in milliseconds
    pub smooth_scroll_ms: u64,

    /// Body text size
    pub font_size: f32,

    /// Code block text size
    pub code_font_size: f32,

    /// syntect theme used for code blocks
    pub code_theme: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
            copy_feedback_ms: DEFAULT_COPY_FEEDBACK_MS,
            copy_label: DEFAULT_COPY_LABEL.to_string(),
            copied_label: DEFAULT_COPIED_LABEL.to_string(),
            smooth_scroll: true,
            smooth_scroll_ms: 250,
            font_size: 15.0,
            code_font_size: 13.0,
            code_theme: "InspiredGitHub".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Copy confirmation duration
    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }

    /// Smooth scroll duration, zero when animation is disabled
    pub fn scroll_animation(&self) -> Duration {
        if self.smooth_scroll {
            Duration::from_millis(self.smooth_scroll_ms)
        } else {
            Duration::ZERO
        }
    }
}

/// Lesson fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout for remote lessons in seconds
    pub timeout_secs: u64,

    /// Maximum lesson size in bytes
    pub max_lesson_size: u64,

    /// Base URL relative lesson paths resolve against (overrides the catalog)
    pub base_url: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_FETCH_TIMEOUT,
            max_lesson_size: MAX_LESSON_SIZE,
            base_url: None,
        }
    }
}

impl FetchConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Sidebar visible by default
    pub sidebar_visible: bool,

    /// Sidebar width in pixels
    pub sidebar_width: u32,

    /// Table of contents pane visible by default
    pub toc_visible: bool,

    /// Table of contents pane width in pixels
    pub toc_width: u32,

    /// Theme preference (follows system by default)
    pub theme: ThemePreference,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sidebar_visible: true,
            sidebar_width: 260,
            toc_visible: true,
            toc_width: 220,
            theme: ThemePreference::System,
        }
    }
}

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemePreference {
    /// Follow system theme
    #[default]
    System,
    /// Always use light theme
    Light,
    /// Always use dark theme
    Dark,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.viewer.copy_label, "Copiar");
        assert_eq!(config.viewer.copied_label, "Copiado ✔");
        assert_eq!(config.viewer.copy_feedback(), Duration::from_millis(1500));
        assert!(config.ui.sidebar_visible);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_round_trip_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.viewer.scroll_threshold = 0.25;
        config.fetch.base_url = Some("https://example.org/lessons/".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.viewer.scroll_threshold, 0.25);
        assert_eq!(loaded.fetch.base_url.as_deref(), Some("https://example.org/lessons/"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.viewer.scroll_threshold, DEFAULT_SCROLL_THRESHOLD);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "viewer": { "smooth_scroll": false } }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.viewer.smooth_scroll);
        assert_eq!(config.viewer.scroll_animation(), Duration::ZERO);
        assert_eq!(config.fetch.timeout_secs, DEFAULT_FETCH_TIMEOUT);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut config = Config::default();
        config.viewer.scroll_threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
