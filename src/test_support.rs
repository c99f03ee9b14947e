//! In-memory transport used by unit tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{FetchError, Result};
use crate::gateway::{RequestOptions, Transport};

#[derive(Clone)]
struct Reply {
    outcome: Result<Value>,
    delay: Option<Duration>,
}

/// Scripted transport recording every call it receives.
///
/// URLs without a scripted reply fail with HTTP 404.
#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<(String, RequestOptions)>>,
    delay: Duration,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Delay applied to every reply without its own.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn reply(&self, url: &str, outcome: Result<Value>) {
        self.replies
            .lock()
            .insert(url.to_string(), Reply { outcome, delay: None });
    }

    pub(crate) fn reply_after(&self, url: &str, delay: Duration, outcome: Result<Value>) {
        self.replies.lock().insert(
            url.to_string(),
            Reply {
                outcome,
                delay: Some(delay),
            },
        );
    }

    pub(crate) fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().iter().filter(|(u, _)| u == url).count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }

    pub(crate) fn last_request(&self, url: &str) -> Option<RequestOptions> {
        self.calls
            .lock()
            .iter()
            .rev()
            .find(|(u, _)| u == url)
            .map(|(_, options)| options.clone())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, url: &str, options: &RequestOptions) -> Result<Value> {
        self.calls.lock().push((url.to_string(), options.clone()));

        let reply = self.replies.lock().get(url).cloned();
        let delay = reply
            .as_ref()
            .and_then(|r| r.delay)
            .unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(reply) => reply.outcome,
            None => Err(FetchError::Http {
                status: 404,
                status_text: "Not Found".to_string(),
            }),
        }
    }
}
