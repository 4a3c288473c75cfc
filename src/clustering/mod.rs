// Module declarations
pub mod detector;
pub mod graph;
#[cfg(test)]
mod tests;
pub mod types;

pub use types::*;

pub use detector::{SimilarityDetector, TopicIndex};
pub use graph::{group_id, SimilarityGraph};

/// Default confidence at or above which two articles are merged
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.8;
