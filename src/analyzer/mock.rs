use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::ApiError;

use super::Backend;

/// A scripted backend for tests. Returns a fixed reply (or failure) and
/// records what it was asked.
pub struct MockBackend {
    reply: Result<String, String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<(String, String, f64)>>,
}

impl MockBackend {
    /// A backend whose every call succeeds with `reply`.
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A backend whose every call fails with an upstream error.
    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// How many times `complete` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The (system, prompt, temperature) of the most recent call, if any.
    pub fn last_request(&self) -> Option<(String, String, f64)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f64,
    ) -> Result<String, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() =
            Some((system.to_string(), prompt.to_string(), temperature));

        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(ApiError::UpstreamCall(message.clone())),
        }
    }
}
