//! Feed fetching: URL construction, status handling and body parsing.

use std::sync::Arc;

use reqwest::StatusCode;
use sheetfeed_core::{FeedNode, FeedTreeBuilder, QueryParams};
use tracing::{debug, warn};
use url::Url;

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::transport::{FeedRequest, FeedTransport};

/// Scheme prefix of the `Authorization` header value.
pub const AUTH_SCHEME: &str = "GoogleLogin auth=";

/// Feed access level, selected by the presence of a credential.
///
/// Visibility and projection always switch together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No credential: `public` visibility, `values` projection.
    Public,
    /// With credential: `private` visibility, `full` projection.
    Private,
}

impl Access {
    /// Picks the access level for an optional credential. An empty token
    /// counts as no credential.
    pub fn for_auth(auth: Option<&str>) -> Self {
        match auth {
            Some(token) if !token.is_empty() => Access::Private,
            _ => Access::Public,
        }
    }

    /// The visibility path segment.
    pub fn visibility(self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Private => "private",
        }
    }

    /// The projection path segment.
    pub fn projection(self) -> &'static str {
        match self {
            Access::Public => "values",
            Access::Private => "full",
        }
    }
}

/// Fetches feeds and turns response bodies into [`FeedNode`] trees.
#[derive(Clone)]
pub struct FeedFetcher {
    root: Url,
    transport: Arc<dyn FeedTransport>,
}

impl FeedFetcher {
    /// Creates a fetcher for the feed root of `config`.
    pub fn new(config: &FeedConfig, transport: Arc<dyn FeedTransport>) -> FeedResult<Self> {
        Ok(Self {
            root: config.feed_root_url()?,
            transport,
        })
    }

    /// Builds `<root>/<segments>/<visibility>/<projection>?<params>`.
    ///
    /// The query string is only added when `params` is non-empty.
    pub fn feed_url(&self, segments: &[&str], auth: Option<&str>, params: &QueryParams) -> Url {
        let access = Access::for_auth(auth);
        let mut url = self.root.clone();

        // The root was validated as a base URL, so it has path segments.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(segments)
                .push(access.visibility())
                .push(access.projection());
        }

        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(name, value)| (*name, value.as_str())));
        }
        url
    }

    /// Fetches one feed and returns its parsed tree.
    ///
    /// A 401 yields [`FeedError::Auth`] and any other status of 400 or above
    /// yields [`FeedError::Http`]; in both cases the body is left unread.
    /// Otherwise the whole body is read before the tree is built.
    pub async fn fetch(
        &self,
        segments: &[&str],
        auth: Option<&str>,
        params: &QueryParams,
    ) -> FeedResult<FeedNode> {
        let url = self.feed_url(segments, auth, params);
        let authorization = match Access::for_auth(auth) {
            Access::Private => auth.map(|token| format!("{}{}", AUTH_SCHEME, token)),
            Access::Public => None,
        };

        debug!(url = %url, authenticated = authorization.is_some(), "fetching feed");

        let response = self
            .transport
            .get(FeedRequest { url, authorization })
            .await
            .inspect_err(log_failure)?;

        let status = response.status;
        if status == StatusCode::UNAUTHORIZED {
            return Err(FeedError::Auth);
        }
        if status.as_u16() >= 400 {
            let err = FeedError::http(status);
            log_failure(&err);
            return Err(err);
        }

        let mut builder = FeedTreeBuilder::new();
        response.body.pipe_into(&mut builder).await?;
        debug!(status = %status, bytes = builder.len(), "feed received");

        Ok(builder.end()?)
    }
}

fn log_failure(err: &FeedError) {
    warn!(error = %err, retryable = err.is_retryable(), "feed request failed");
}

impl std::fmt::Debug for FeedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedFetcher")
            .field("root", &self.root.as_str())
            .finish_non_exhaustive()
    }
}
