//! Recording transport for tests.

use std::sync::{Arc, Mutex};

use reqwest::StatusCode;

use crate::error::{FeedError, FeedResult};
use crate::transport::{BoxFuture, FeedBody, FeedRequest, FeedResponse, FeedTransport};

enum Reply {
    Status(StatusCode, Vec<u8>),
    Fail(String),
}

/// Answers every request with the same canned reply and records requests.
pub(crate) struct StubTransport {
    reply: Reply,
    requests: Mutex<Vec<FeedRequest>>,
}

impl StubTransport {
    pub(crate) fn ok(body: &str) -> Arc<Self> {
        Self::with_status(200, body)
    }

    pub(crate) fn with_status(status: u16, body: &str) -> Arc<Self> {
        let status = StatusCode::from_u16(status).unwrap();
        Self::new(Reply::Status(status, body.as_bytes().to_vec()))
    }

    pub(crate) fn failing(message: &str) -> Arc<Self> {
        Self::new(Reply::Fail(message.to_string()))
    }

    fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn requests(&self) -> Vec<FeedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl FeedTransport for StubTransport {
    fn get(&self, request: FeedRequest) -> BoxFuture<'_, FeedResult<FeedResponse>> {
        self.requests.lock().unwrap().push(request);
        let result = match &self.reply {
            Reply::Status(status, body) => Ok(FeedResponse {
                status: *status,
                body: FeedBody::Bytes(body.clone()),
            }),
            Reply::Fail(message) => Err(FeedError::transport(message.clone())),
        };
        Box::pin(async move { result })
    }
}
