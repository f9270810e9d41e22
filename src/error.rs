//! Error types for Cosmic Lessons
//!
//! This module defines the error types used throughout the application.
//! Errors are grouped by the component that produces them, and the ones shown
//! to the user carry a `user_message()` for display.

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type encompassing all error categories
#[derive(Error, Debug)]
pub enum AppError {
    /// Lesson fetching errors
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Catalog loading errors
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Clipboard errors
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    /// Export errors
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Session persistence errors
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors raised while retrieving a lesson's Markdown text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Local lesson file does not exist
    #[error("Lesson not found: {path}")]
    NotFound { path: PathBuf },

    /// Local lesson file exceeds the configured limit
    #[error("Lesson too large: {path} ({size} bytes, max {max_size} bytes)")]
    TooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Remote lesson body exceeds the configured limit; `size` is how much
    /// was received (or announced) before giving up
    #[error("Lesson too large: {url} (over {max_size} bytes, got {size})")]
    RemoteTooLarge {
        url: String,
        size: u64,
        max_size: u64,
    },

    /// Local read failure other than "not found"
    #[error("Could not read lesson {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// Transport-level failure (DNS, refused connection, timeout, ...)
    #[error("Network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    /// Server answered with a non-2xx status
    #[error("HTTP error fetching {url}: {status} {reason}")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    /// The lesson path could not be turned into a request
    #[error("Invalid lesson URL: {0}")]
    InvalidUrl(String),
}

/// Catalog (course list) errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Root directory does not exist
    #[error("Course directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Manifest could not be read
    #[error("Could not read course manifest: {path}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest is not valid JSON or misses fields
    #[error("Invalid course manifest {path}: {reason}")]
    ManifestParse { path: PathBuf, reason: String },

    /// Nothing to show
    #[error("No lessons found in {path}")]
    Empty { path: PathBuf },
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Could not load configuration: {0}")]
    LoadError(String),

    /// Error saving configuration
    #[error("Could not save configuration: {0}")]
    SaveError(String),

    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Configuration directory error
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Clipboard related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// Could not access clipboard
    #[error("Could not access clipboard: {0}")]
    AccessDenied(String),

    /// Error setting clipboard content
    #[error("Could not write to clipboard: {0}")]
    WriteError(String),
}

/// HTML export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing is loaded
    #[error("No lesson is loaded")]
    NothingToExport,

    /// Writing the output failed
    #[error("Could not write export file: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Session persistence errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// Reading the session file failed
    #[error("Could not load session: {0}")]
    LoadError(String),

    /// Writing the session file failed
    #[error("Could not save session: {0}")]
    SaveError(String),

    /// Session file is not valid JSON
    #[error("Invalid session format: {0}")]
    ParseError(String),

    /// No data directory on this system
    #[error("Could not access data directory")]
    DirectoryError,
}

/// Result type alias for lesson fetching
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for session persistence
pub type SessionResult<T> = Result<T, SessionError>;

impl FetchError {
    /// Create a user-friendly error message for the content pane
    pub fn user_message(&self) -> String {
        match self {
            FetchError::NotFound { .. } => {
                "This lesson could not be found. It may have been moved or deleted.".to_string()
            }
            FetchError::TooLarge { max_size, .. }
            | FetchError::RemoteTooLarge { max_size, .. } => {
                format!(
                    "This lesson is too large to display. Maximum size is {} bytes.",
                    max_size
                )
            }
            FetchError::Network { .. } => {
                "The lesson could not be downloaded. Check your network connection.".to_string()
            }
            FetchError::Status { status: 404, .. } => {
                "The server does not have this lesson (404).".to_string()
            }
            FetchError::Status { status, reason, .. } => {
                format!("The server refused the lesson: {} {}.", status, reason)
            }
            _ => self.to_string(),
        }
    }
}

impl ClipboardError {
    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ClipboardError::AccessDenied(_) => {
                "Could not access the clipboard. Another application may be using it.".to_string()
            }
            ClipboardError::WriteError(_) => "Copying to the clipboard failed.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::NotFound {
            path: PathBuf::from("/lessons/intro.md"),
        };
        assert!(err.to_string().contains("/lessons/intro.md"));
    }

    #[test]
    fn test_fetch_error_user_message() {
        let err = FetchError::Status {
            url: "https://example.org/a.md".to_string(),
            status: 404,
            reason: "Not Found".to_string(),
        };
        assert!(err.user_message().contains("404"));

        let err = FetchError::Status {
            url: "https://example.org/a.md".to_string(),
            status: 500,
            reason: "Internal Server Error".to_string(),
        };
        assert!(err.user_message().contains("500 Internal Server Error"));
    }

    #[test]
    fn test_app_error_from_fetch_error() {
        let fetch_err = FetchError::InvalidUrl("::".to_string());
        let app_err: AppError = fetch_err.into();
        assert!(matches!(app_err, AppError::Fetch(_)));
    }

    #[test]
    fn test_clipboard_user_message() {
        let err = ClipboardError::AccessDenied("no display".to_string());
        assert!(err.user_message().contains("clipboard"));
    }
}
