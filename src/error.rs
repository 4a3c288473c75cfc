//! Error types shared by the processing stages.
//!
//! Only [`ConfigError`] ever crosses a stage boundary. Provider and cache
//! failures are recovered where they happen and only show up in logs and in
//! the `reasoning` text of the stage result.

use std::time::Duration;
use thiserror::Error;

/// Failure talking to the text model. Timeouts are reported here too so that
/// every stage treats them the same way as an error response.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("LLM request timed out after {0:?}")]
    Timeout(Duration),

    #[error("LLM request failed: {0}")]
    Request(String),

    #[error("LLM returned an empty response")]
    EmptyResponse,

    #[error("LLM returned malformed output: {0}")]
    MalformedOutput(String),
}

/// Caller programming errors. These are fatal and never defaulted away.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid configuration: unsupported summary style '{0}'")]
    InvalidStyle(String),

    #[error("invalid configuration: similarity threshold {0} is outside [0, 1]")]
    InvalidSimilarityThreshold(f32),

    #[error("invalid configuration: boost factor {0} is outside [0.5, 2.0]")]
    InvalidBoostFactor(f32),

    #[error("invalid configuration: relevance threshold {0} is outside [0, 100]")]
    InvalidRelevanceThreshold(i64),

    #[error("invalid configuration: {name} = '{value}'")]
    InvalidValue { name: String, value: String },
}

/// Cache backend failures. The [`crate::cache::Cache`] wrapper turns these
/// into misses.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    #[error("cache value could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}
