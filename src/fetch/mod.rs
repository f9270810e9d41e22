//! Markdown fetcher
//!
//! Retrieves the raw Markdown text of a lesson, either from disk or over
//! HTTP, and reports failures as [`FetchError`]s.

pub mod http;
pub mod local;

use crate::catalog::LessonPath;
use crate::config::FetchConfig;
use crate::error::{FetchError, FetchResult};

/// Cheap-to-clone handle used by load tasks
#[derive(Debug, Clone)]
pub struct LessonFetcher {
    client: Option<reqwest::Client>,
    max_size: u64,
}

impl LessonFetcher {
    /// Create a fetcher from configuration
    pub fn new(config: &FetchConfig) -> Self {
        let client = match http::build_client(config.timeout()) {
            Ok(client) => Some(client),
            Err(e) => {
                log::warn!("HTTP client unavailable, remote lessons will fail: {}", e);
                None
            }
        };

        Self {
            client,
            max_size: config.max_lesson_size,
        }
    }

    /// Retrieve the lesson's Markdown text
    pub async fn fetch(&self, path: &LessonPath) -> FetchResult<String> {
        log::debug!("Fetching lesson {}", path);
        match path {
            LessonPath::Local(file) => local::read_lesson_file(file, self.max_size).await,
            LessonPath::Remote(url) => match &self.client {
                Some(client) => http::fetch_remote(client, url, self.max_size).await,
                None => Err(FetchError::Network {
                    url: url.clone(),
                    reason: "HTTP client unavailable".to_string(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_fetch_local_lesson() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.md");
        std::fs::write(&file, "# A").unwrap();

        let fetcher = LessonFetcher::new(&FetchConfig::default());
        let text = fetcher.fetch(&LessonPath::Local(file)).await.unwrap();
        assert_eq!(text, "# A");
    }

    #[tokio::test]
    async fn test_fetch_refused_connection() {
        let fetcher = LessonFetcher::new(&FetchConfig::default());
        // Port 9 (discard) is essentially never listening on loopback
        let err = fetcher
            .fetch(&LessonPath::Remote("http://127.0.0.1:9/a.md".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
    }
}
