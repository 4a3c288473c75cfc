//! Per-article processing stages.
//!
//! Every stage borrows the article, takes its cache and model adapter as
//! explicit collaborators, and returns an immutable result value. Model
//! failures degrade to a deterministic fallback; only configuration errors
//! are returned to the caller.

pub mod quality;
pub mod relevance;
pub mod summary;
pub mod topics;
mod types;

pub use quality::QualityScorer;
pub use relevance::RelevanceScorer;
pub use summary::Summarizer;
pub use topics::TopicExtractor;
pub use types::{QualityResult, RelevanceResult, SummaryResult};

/// Articles with less trimmed content than this skip every model call.
pub const MIN_CONTENT_CHARS: usize = 100;
