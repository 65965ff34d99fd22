//! Scripted transport for tests.
//!
//! Routes are matched by URL substring; when several match, the longest
//! pattern wins. Each route replays its replies in order and keeps repeating
//! the last one, so a single `.respond(..)` serves every call.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::HeaderName;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::error::FetchError;
use crate::transport::{FetchRequest, FetchResponse, Transport};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this response.
    Response(FetchResponse),
    /// Fail with [`FetchError::Transport`].
    Error(String),
}

impl MockReply {
    /// A response with the given status and body.
    ///
    /// # Panics
    ///
    /// Panics if `status` is not a valid HTTP status code.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or_else(|_| panic!("bad status {status}"));
        Self::Response(FetchResponse::new(status, body))
    }

    /// A transport failure.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    fn to_result(&self) -> Result<FetchResponse, FetchError> {
        match self {
            Self::Response(response) => Ok(response.clone()),
            Self::Error(message) => Err(FetchError::Transport(message.clone())),
        }
    }
}

#[derive(Debug)]
struct Route {
    pattern: String,
    replies: VecDeque<MockReply>,
}

/// A [`Transport`] that replays scripted replies and records every request.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl MockTransport {
    /// Creates a transport with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for URLs containing `pattern`.
    #[must_use]
    pub fn on(self, pattern: &str, reply: MockReply) -> Self {
        {
            let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
            match routes.iter_mut().find(|r| r.pattern == pattern) {
                Some(route) => route.replies.push_back(reply),
                None => routes.push(Route {
                    pattern: pattern.to_string(),
                    replies: VecDeque::from([reply]),
                }),
            }
        }
        self
    }

    /// Queues a response with the given status and body.
    #[must_use]
    pub fn respond(self, pattern: &str, status: u16, body: impl Into<String>) -> Self {
        self.on(pattern, MockReply::status(status, body))
    }

    /// Queues a response carrying one extra header.
    #[must_use]
    pub fn respond_with_header(
        self,
        pattern: &str,
        status: u16,
        body: impl Into<String>,
        header: (HeaderName, &str),
    ) -> Self {
        let reply = match MockReply::status(status, body) {
            MockReply::Response(response) => {
                MockReply::Response(response.with_header(header.0, header.1))
            }
            other => other,
        };
        self.on(pattern, reply)
    }

    /// Queues a transport failure.
    #[must_use]
    pub fn fail(self, pattern: &str, message: &str) -> Self {
        self.on(pattern, MockReply::error(message))
    }

    /// Total number of requests sent.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of requests whose URL contains `pattern`.
    pub fn calls_matching(&self, pattern: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.url.as_str().contains(pattern))
            .count()
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &FetchRequest) -> Result<FetchResponse, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(route) = routes
            .iter_mut()
            .filter(|r| request.url.as_str().contains(&r.pattern))
            .max_by_key(|r| r.pattern.len())
        else {
            return Err(FetchError::Transport(format!("no mock route for {}", request.url)));
        };

        let reply = if route.replies.len() > 1 {
            route.replies.pop_front()
        } else {
            route.replies.front().cloned()
        };

        match reply {
            Some(reply) => reply.to_result(),
            None => Err(FetchError::Transport(format!("no reply queued for {}", route.pattern))),
        }
    }
}
