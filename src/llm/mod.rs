//! Uniform access to a structured-output text model.
//!
//! Stages describe what they expect as a Rust type deriving
//! [`schemars::JsonSchema`]; [`invoke`] renders that type's JSON schema into
//! the request, enforces the caller's timeout, and parses the reply. Any
//! failure along the way comes back as a [`ProviderError`].

mod client;
#[cfg(test)]
pub(crate) mod testing;

pub use client::{LLMClient, LLMParams};

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::{debug, warn};

use crate::error::ProviderError;
use crate::util::{strip_code_blocks, truncate_chars};
use crate::TARGET_LLM_REQUEST;

/// Which stage is asking. Used for logging and by test doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LLMTask {
    Quality,
    Topics,
    Relevance,
    Summary,
    Similarity,
}

impl fmt::Display for LLMTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LLMTask::Quality => write!(f, "quality"),
            LLMTask::Topics => write!(f, "topics"),
            LLMTask::Relevance => write!(f, "relevance"),
            LLMTask::Summary => write!(f, "summary"),
            LLMTask::Similarity => write!(f, "similarity"),
        }
    }
}

/// A fully rendered request. `system` already contains the output schema.
#[derive(Debug, Clone)]
pub struct LLMRequest {
    pub task: LLMTask,
    pub system: String,
    pub user: String,
}

/// A text model that answers with raw JSON text.
#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn complete(&self, request: &LLMRequest) -> Result<String, ProviderError>;
}

/// Sends `system` and `user` to the model and decodes the reply as `T`.
///
/// The call is bounded by `limit`; running out of time is reported as
/// [`ProviderError::Timeout`].
pub async fn invoke<T>(
    adapter: &dyn LLMAdapter,
    task: LLMTask,
    system: &str,
    user: &str,
    limit: Duration,
) -> Result<T, ProviderError>
where
    T: DeserializeOwned + JsonSchema,
{
    let schema = serde_json::to_string(&schemars::schema_for!(T))
        .map_err(|e| ProviderError::MalformedOutput(format!("unrenderable schema: {}", e)))?;
    let request = LLMRequest {
        task,
        system: format!(
            "{}\n\nRespond with a single JSON object that matches this JSON schema, and nothing else:\n{}",
            system.trim_end(),
            schema
        ),
        user: user.to_string(),
    };

    let start = Instant::now();
    debug!(target: TARGET_LLM_REQUEST, "Sending {} request ({} prompt chars)", task, request.user.len());

    let raw = match timeout(limit, adapter.complete(&request)).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => {
            warn!(target: TARGET_LLM_REQUEST, "{} request failed after {:?}: {}", task, start.elapsed(), e);
            return Err(e);
        }
        Err(_) => {
            warn!(target: TARGET_LLM_REQUEST, "{} request timed out after {:?}", task, limit);
            return Err(ProviderError::Timeout(limit));
        }
    };

    let body = strip_code_blocks(&raw);
    if body.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }

    serde_json::from_str(body).map_err(|e| {
        warn!(
            target: TARGET_LLM_REQUEST,
            "Failed to parse {} response: {}. Raw content: {}",
            task, e, truncate_chars(body, 500)
        );
        ProviderError::MalformedOutput(e.to_string())
    })
}
