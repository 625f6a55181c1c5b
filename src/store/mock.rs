use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{StoreRequest, StoreResponse, Transport};
use crate::audit::Method;
use crate::error::{Error, Result};

/// A canned answer for [`MockTransport`].
#[derive(Debug, Clone)]
pub struct MockReply(Result<StoreResponse>);

impl MockReply {
    /// `200 OK` with the given body.
    pub fn ok(body: Value) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self(Ok(StoreResponse { status, body }))
    }

    /// No HTTP response at all.
    pub fn transport(message: &str) -> Self {
        Self(Err(Error::Transport(message.to_string())))
    }
}

/// A scripted transport for tests.
///
/// Routes (method + URL suffix) answer every matching request; anything
/// else takes the next reply from the queue. Every request is recorded.
pub struct MockTransport {
    routes: Vec<(Method, String, MockReply)>,
    queue: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<StoreRequest>>,
}

impl MockTransport {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            routes: Vec::new(),
            queue: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every `method` request whose URL ends with `suffix`.
    pub fn route(mut self, method: Method, suffix: &str, reply: MockReply) -> Self {
        self.routes.push((method, suffix.to_string(), reply));
        self
    }

    /// Everything sent so far, in arrival order.
    pub fn requests(&self) -> Vec<StoreRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests sent with the given method.
    pub fn requests_with(&self, method: Method) -> Vec<StoreRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &StoreRequest) -> Result<StoreResponse> {
        let n = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        if let Some((_, _, reply)) = self
            .routes
            .iter()
            .find(|(method, suffix, _)| *method == request.method && request.url.ends_with(suffix))
        {
            return reply.0.clone();
        }

        let reply = self.queue.lock().unwrap().pop_front().ok_or_else(|| {
            Error::Transport(format!(
                "MockTransport: no reply scripted for {} {} (request {n})",
                request.method, request.url
            ))
        })?;
        reply.0
    }
}
