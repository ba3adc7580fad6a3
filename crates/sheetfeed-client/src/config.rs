//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{FeedError, FeedResult};

/// Root URL of the spreadsheets feed API.
pub const DEFAULT_FEED_ROOT: &str = "https://spreadsheets.google.com/feeds/";

/// Configuration for [`SpreadsheetsClient`](crate::SpreadsheetsClient).
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Root URL that feed paths are appended to.
    pub feed_root: String,

    /// Request timeout, applied by the HTTP transport.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            feed_root: DEFAULT_FEED_ROOT.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("sheetfeed/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FeedConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the feed root (e.g. a local mirror or proxy).
    pub fn with_feed_root(mut self, feed_root: impl Into<String>) -> Self {
        self.feed_root = feed_root.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Parses and validates the feed root.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] if the root is not an absolute
    /// http(s) URL that paths can be appended to.
    pub fn feed_root_url(&self) -> FeedResult<Url> {
        let url = Url::parse(&self.feed_root)
            .map_err(|e| FeedError::config(format!("invalid feed root {:?}: {}", self.feed_root, e)))?;

        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(FeedError::config(format!(
                "feed root must be an http(s) URL: {}",
                self.feed_root
            )));
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = FeedConfig::default();
        assert_eq!(config.feed_root, DEFAULT_FEED_ROOT);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("sheetfeed/"));
        assert!(config.feed_root_url().is_ok());
    }

    #[test]
    fn custom_config() {
        let config = FeedConfig::new()
            .with_feed_root("http://localhost:8080/feeds/")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent");

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent");
        assert_eq!(
            config.feed_root_url().unwrap().as_str(),
            "http://localhost:8080/feeds/"
        );
    }

    #[test]
    fn invalid_feed_roots() {
        for root in ["not a url", "mailto:someone@example.com", "ftp://example.com/feeds/"] {
            let err = FeedConfig::new().with_feed_root(root).feed_root_url().unwrap_err();
            assert!(matches!(err, FeedError::Config(_)), "{root}");
        }
    }
}
