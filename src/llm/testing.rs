use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::{LLMAdapter, LLMRequest, LLMTask};
use crate::error::ProviderError;

type Responder = dyn Fn(&LLMRequest) -> Result<String, ProviderError> + Send + Sync;

/// Test double that answers every request with a closure and records what it saw.
pub struct ScriptedAdapter {
    responder: Box<Responder>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    seen: Mutex<Vec<LLMRequest>>,
}

impl ScriptedAdapter {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&LLMRequest) -> Result<String, ProviderError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delay: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// An adapter whose every call fails.
    pub fn failing() -> Self {
        Self::new(|_| Err(ProviderError::Request("provider unavailable".to_string())))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, task: LLMTask) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.task == task)
            .count()
    }

    pub fn requests(&self) -> Vec<LLMRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMAdapter for ScriptedAdapter {
    async fn complete(&self, request: &LLMRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        (self.responder)(request)
    }
}
