//! Remote lesson retrieval over HTTP
//!
//! A plain GET; the body is treated as UTF-8 Markdown whatever the
//! content type says.

use crate::error::{FetchError, FetchResult};
use reqwest::{Client, Url};
use std::time::Duration;

/// User agent sent with lesson requests
const USER_AGENT: &str = concat!("cosmic-lessons/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// GET `url` and return its body as text
pub async fn fetch_remote(client: &Client, url: &str, max_size: u64) -> FetchResult<String> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

    let mut response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| network_error(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        });
    }

    if let Some(length) = response.content_length() {
        if length > max_size {
            return Err(too_large(url, length, max_size));
        }
    }

    // Chunked bodies announce no length, so the limit is enforced while reading
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|e| network_error(url, &e))? {
        let received = (body.len() + chunk.len()) as u64;
        if received > max_size {
            return Err(too_large(url, received, max_size));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

fn too_large(url: &str, size: u64, max_size: u64) -> FetchError {
    log::warn!("Remote lesson {} exceeds {} bytes", url, max_size);
    FetchError::RemoteTooLarge {
        url: url.to_string(),
        size,
        max_size,
    }
}

fn network_error(url: &str, error: &reqwest::Error) -> FetchError {
    let reason = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("could not connect ({})", error)
    } else {
        error.to_string()
    };
    FetchError::Network {
        url: url.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a random local port
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/lesson.md", addr)
    }

    #[tokio::test]
    async fn test_fetch_remote_ok() {
        let url = serve_once("200 OK", "# Remote\n").await;
        let client = build_client(Duration::from_secs(5)).unwrap();

        let text = fetch_remote(&client, &url, 1024).await.unwrap();
        assert_eq!(text, "# Remote\n");
    }

    #[tokio::test]
    async fn test_fetch_remote_not_found() {
        let url = serve_once("404 Not Found", "nope").await;
        let client = build_client(Duration::from_secs(5)).unwrap();

        let err = fetch_remote(&client, &url, 1024).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fetch_remote_size_limit() {
        let url = serve_once("200 OK", "0123456789").await;
        let client = build_client(Duration::from_secs(5)).unwrap();

        let err = fetch_remote(&client, &url, 4).await.unwrap_err();
        assert!(matches!(
            err,
            FetchError::RemoteTooLarge {
                size: 10,
                max_size: 4,
                ..
            }
        ));
    }

    /// Serve one chunked response without a Content-Length header
    async fn serve_chunked(chunks: &'static [&'static str]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let mut response = String::from(
                "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n",
            );
            for chunk in chunks {
                response.push_str(&format!("{:x}\r\n{}\r\n", chunk.len(), chunk));
            }
            response.push_str("0\r\n\r\n");
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}/lesson.md", addr)
    }

    #[tokio::test]
    async fn test_fetch_remote_chunked_body_within_limit() {
        let url = serve_chunked(&["# Re", "mote\n"]).await;
        let client = build_client(Duration::from_secs(5)).unwrap();

        let text = fetch_remote(&client, &url, 1024).await.unwrap();
        assert_eq!(text, "# Remote\n");
    }

    #[tokio::test]
    async fn test_fetch_remote_chunked_body_over_limit() {
        let url = serve_chunked(&["0123456789", "0123456789"]).await;
        let client = build_client(Duration::from_secs(5)).unwrap();

        let err = fetch_remote(&client, &url, 12).await.unwrap_err();
        assert!(matches!(err, FetchError::RemoteTooLarge { max_size: 12, .. }));
        assert!(err.user_message().contains("too large"));
    }

    #[tokio::test]
    async fn test_fetch_remote_invalid_url() {
        let client = build_client(Duration::from_secs(5)).unwrap();
        let err = fetch_remote(&client, "http://", 1024).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
