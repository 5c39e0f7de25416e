//! In-memory transport that counts calls per URL.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};

use crate::fetch::error::TransportError;
use crate::fetch::transport::Transport;

enum Reply {
    Body(String),
    Status(u16),
    FailThen { remaining: u32, body: String },
}

#[derive(Default)]
pub(crate) struct StaticTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<HashMap<String, u32>>,
    delay: Duration,
}

impl StaticTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every call, so concurrent callers overlap.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn respond(&self, url: &str, body: &str) {
        self.set(url, Reply::Body(body.to_string()));
    }

    pub(crate) fn fail(&self, url: &str, status: u16) {
        self.set(url, Reply::Status(status));
    }

    /// Answer 503 `times` times, then `body`.
    pub(crate) fn fail_times(&self, url: &str, times: u32, body: &str) {
        self.set(
            url,
            Reply::FailThen {
                remaining: times,
                body: body.to_string(),
            },
        );
    }

    pub(crate) fn calls(&self, url: &str) -> u32 {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    fn set(&self, url: &str, reply: Reply) {
        self.replies.lock().unwrap().insert(url.to_string(), reply);
    }

    fn answer(&self, url: &str) -> Result<String, TransportError> {
        let mut replies = self.replies.lock().unwrap();
        match replies.get_mut(url) {
            Some(Reply::Body(body)) => Ok(body.clone()),
            Some(Reply::Status(status)) => Err(TransportError::Status(*status)),
            Some(Reply::FailThen { remaining, body }) => {
                if *remaining > 0 {
                    *remaining -= 1;
                    Err(TransportError::Status(503))
                } else {
                    Ok(body.clone())
                }
            }
            None => Err(TransportError::Status(404)),
        }
    }
}

impl Transport for StaticTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, TransportError>> {
        async move {
            *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.answer(url)
        }
        .boxed()
    }
}
