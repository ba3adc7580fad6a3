//! HTTP transport seam.
//!
//! [`FeedFetcher`](crate::FeedFetcher) talks to the network only through
//! [`FeedTransport`], which issues a single GET and hands back the status and
//! an unread body. [`HttpTransport`] is the `reqwest` implementation.

use std::future::Future;
use std::pin::Pin;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use sheetfeed_core::FeedTreeBuilder;
use tracing::trace;
use url::Url;

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};

/// A boxed future for async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A GET request for a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    /// Full request URL, including query.
    pub url: Url,
    /// Value of the `Authorization` header, if any.
    pub authorization: Option<String>,
}

/// Status and body of a feed response.
pub struct FeedResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response body, not yet read.
    pub body: FeedBody,
}

/// A response body that can be streamed into a [`FeedTreeBuilder`].
pub enum FeedBody {
    /// A live `reqwest` response, read chunk by chunk.
    Stream(reqwest::Response),
    /// A body that is already in memory.
    Bytes(Vec<u8>),
}

impl FeedBody {
    /// Reads the whole body into `builder`.
    pub async fn pipe_into(self, builder: &mut FeedTreeBuilder) -> FeedResult<()> {
        match self {
            FeedBody::Stream(mut response) => {
                while let Some(chunk) = response.chunk().await.map_err(|e| {
                    FeedError::transport_with_source("failed to read response body", e)
                })? {
                    builder.write(&chunk);
                }
            }
            FeedBody::Bytes(bytes) => builder.write(&bytes),
        }
        Ok(())
    }
}

impl std::fmt::Debug for FeedBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedBody::Stream(_) => f.write_str("FeedBody::Stream"),
            FeedBody::Bytes(bytes) => write!(f, "FeedBody::Bytes({} bytes)", bytes.len()),
        }
    }
}

/// Issues feed GET requests.
///
/// Implementations perform exactly one request per call and never retry.
pub trait FeedTransport: Send + Sync {
    /// Sends `request` and returns the response without reading its body.
    fn get(&self, request: FeedRequest) -> BoxFuture<'_, FeedResult<FeedResponse>>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport using the timeout and user agent of `config`.
    pub fn new(config: &FeedConfig) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| FeedError::config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl FeedTransport for HttpTransport {
    fn get(&self, request: FeedRequest) -> BoxFuture<'_, FeedResult<FeedResponse>> {
        Box::pin(async move {
            let mut builder = self.client.get(request.url.clone());
            if let Some(ref authorization) = request.authorization {
                builder = builder.header(AUTHORIZATION, authorization);
            }

            trace!(url = %request.url, "sending feed request");

            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    FeedError::transport_with_source("request timeout", e)
                } else if e.is_connect() {
                    FeedError::transport_with_source("connection failed", e)
                } else {
                    FeedError::transport_with_source("request failed", e)
                }
            })?;

            Ok(FeedResponse {
                status: response.status(),
                body: FeedBody::Stream(response),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bytes_body_is_piped() {
        let mut builder = FeedTreeBuilder::new();
        FeedBody::Bytes(b"<feed><title>t</title></feed>".to_vec())
            .pipe_into(&mut builder)
            .await
            .unwrap();

        let tree = builder.end().unwrap();
        assert_eq!(tree.text_at("title"), Some("t"));
    }

    #[test]
    fn http_transport_creation() {
        let transport = HttpTransport::new(&FeedConfig::default());
        assert!(transport.is_ok());
    }

    #[test]
    fn body_debug_does_not_dump_contents() {
        let body = FeedBody::Bytes(b"secret".to_vec());
        assert_eq!(format!("{:?}", body), "FeedBody::Bytes(6 bytes)");
    }
}
