//! HTTP fetching of supplier feeds.
//!
//! A single shared [`reqwest::Client`] with a request timeout. Bodies are
//! streamed and the download is aborted once it passes the size cap.

use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Url};
use tracing::{debug, info};

use feedhub_core::config::FeedConfig;
use feedhub_core::error::{AppError, ErrorKind};
use feedhub_core::result::AppResult;
use feedhub_entity::supplier::FeedCredentials;

/// A downloaded feed body.
#[derive(Debug, Clone)]
pub struct FetchedFeed {
    /// Body bytes, possibly truncated for samples.
    pub bytes: Bytes,
    /// `Content-Type` of the response.
    pub content_type: Option<String>,
    /// Whether the body was cut at the sample limit.
    pub truncated: bool,
}

/// Downloads supplier feeds.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
    max_bytes: u64,
}

impl FeedFetcher {
    /// Creates a fetcher from feed configuration.
    pub fn new(config: &FeedConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            client,
            max_bytes: config.max_feed_bytes,
        })
    }

    /// Download a whole feed. Bodies above the size cap fail the fetch.
    pub async fn fetch(&self, url: &str, credentials: &FeedCredentials) -> AppResult<FetchedFeed> {
        let fetched = self.download(url, credentials, self.max_bytes, false).await?;
        info!(url, bytes = fetched.bytes.len(), "Fetched supplier feed");
        Ok(fetched)
    }

    /// Download at most `limit` bytes from the start of a feed.
    pub async fn fetch_sample(
        &self,
        url: &str,
        credentials: &FeedCredentials,
        limit: usize,
    ) -> AppResult<FetchedFeed> {
        self.download(url, credentials, limit as u64, true).await
    }

    async fn download(
        &self,
        url: &str,
        credentials: &FeedCredentials,
        limit: u64,
        truncate: bool,
    ) -> AppResult<FetchedFeed> {
        let url = parse_feed_url(url)?;
        let request = with_credentials(self.client.get(url.clone()), credentials);

        let response = request.send().await.map_err(|e| fetch_error(&url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external(format!(
                "Supplier endpoint returned HTTP {}",
                status.as_u16()
            )));
        }

        if !truncate && response.content_length().is_some_and(|len| len > limit) {
            return Err(AppError::external(format!(
                "Feed exceeds the maximum size of {limit} bytes"
            )));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut body = BytesMut::new();
        let mut truncated = false;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| fetch_error(&url, e))?;
            let remaining = limit.saturating_sub(body.len() as u64) as usize;
            if chunk.len() > remaining {
                if !truncate {
                    return Err(AppError::external(format!(
                        "Feed exceeds the maximum size of {limit} bytes"
                    )));
                }
                body.extend_from_slice(&chunk[..remaining]);
                truncated = true;
                break;
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url = %url, bytes = body.len(), truncated, "Downloaded feed body");
        Ok(FetchedFeed {
            bytes: body.freeze(),
            content_type,
            truncated,
        })
    }
}

/// Parse a feed URL, accepting only `http` and `https`.
pub fn parse_feed_url(url: &str) -> AppResult<Url> {
    let parsed = Url::parse(url.trim())
        .map_err(|_| AppError::validation(format!("Invalid feed URL: {url}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(AppError::validation(format!(
            "Unsupported feed URL scheme: {scheme}"
        ))),
    }
}

fn with_credentials(request: RequestBuilder, credentials: &FeedCredentials) -> RequestBuilder {
    match credentials {
        FeedCredentials::None => request,
        FeedCredentials::Basic { username, password } => {
            request.basic_auth(username, Some(password))
        }
        FeedCredentials::Bearer { token } => request.bearer_auth(token),
        FeedCredentials::Header { name, value } => request.header(name.as_str(), value.as_str()),
    }
}

fn fetch_error(url: &Url, err: reqwest::Error) -> AppError {
    let host = url.host_str().unwrap_or("supplier");
    let message = if err.is_timeout() {
        format!("Timed out fetching feed from {host}")
    } else if err.is_builder() {
        "Invalid feed request (check credentials)".to_string()
    } else {
        format!("Failed to fetch feed from {host}")
    };
    AppError::with_source(ErrorKind::ExternalService, message, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_url_schemes() {
        assert!(parse_feed_url("https://supplier.example.com/feed.csv").is_ok());
        assert!(parse_feed_url(" http://10.0.0.1:8080/x ").is_ok());
        assert_eq!(
            parse_feed_url("ftp://supplier.example.com/feed.csv")
                .unwrap_err()
                .kind,
            ErrorKind::Validation
        );
        assert!(parse_feed_url("not a url").is_err());
    }

    #[test]
    fn test_fetcher_builds_from_defaults() {
        let fetcher = FeedFetcher::new(&FeedConfig::default()).unwrap();
        assert_eq!(fetcher.max_bytes, FeedConfig::default().max_feed_bytes);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_external_error() {
        let config = FeedConfig {
            fetch_timeout_seconds: 2,
            ..FeedConfig::default()
        };
        let fetcher = FeedFetcher::new(&config).unwrap();
        let err = fetcher
            .fetch("http://127.0.0.1:1/feed.csv", &FeedCredentials::None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
    }
}
