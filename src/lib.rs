pub mod analysis;
pub mod article;
pub mod cache;
pub mod clustering;
pub mod environment;
pub mod error;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod prompt;
pub mod settings;
pub mod util;

pub use article::{Article, InterestProfile};
pub use cache::{Cache, CacheStore, MemoryCache};
pub use clustering::{ArticleGroup, SimilarityDetector};
pub use error::{CacheError, ConfigError, ProviderError};
pub use llm::{LLMAdapter, LLMClient, LLMParams, LLMRequest, LLMTask};
pub use pipeline::{DigestBatch, EnrichedArticle, Pipeline};
pub use settings::{CacheTtls, Settings, SummaryStyle};

pub const TARGET_LLM_REQUEST: &str = "llm_request";
pub const TARGET_CACHE: &str = "cache";
pub const TARGET_ANALYSIS: &str = "analysis";
pub const TARGET_CLUSTERING: &str = "clustering";
pub const TARGET_PIPELINE: &str = "pipeline";
