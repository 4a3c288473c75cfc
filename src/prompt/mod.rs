// Declare submodules
mod common;
mod quality;
mod relevance;
mod similarity;
mod summarization;
mod topics;

pub use common::*;
pub use quality::{quality_prompt, quality_system_prompt, QUALITY_CONTENT_CHARS};
pub use relevance::{
    semantic_relevance_prompt, semantic_relevance_system_prompt, RELEVANCE_DIGEST_CHARS,
};
pub use similarity::{similarity_prompt, similarity_system_prompt, SIMILARITY_CONTENT_CHARS};
pub use summarization::{summary_prompt, summary_system_prompt, SUMMARY_CONTENT_CHARS};
pub use topics::{topics_prompt, topics_system_prompt, TOPICS_CONTENT_CHARS};
