use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::article::Article;
use crate::cache::{keys, Cache};
use crate::llm::{invoke, LLMAdapter, LLMTask};
use crate::prompt;
use crate::settings::Settings;
use crate::TARGET_ANALYSIS;

#[derive(Debug, Deserialize, JsonSchema)]
struct TopicExtraction {
    topics: Vec<String>,
}

/// Cached extraction together with the cap it was produced under.
#[derive(Debug, Serialize, Deserialize)]
struct CachedTopics {
    max_topics: usize,
    topics: Vec<String>,
}

impl CachedTopics {
    /// A list cut at a smaller cap than requested may be missing topics.
    fn covers(&self, max_topics: usize) -> bool {
        self.max_topics >= max_topics || self.topics.len() < self.max_topics
    }
}

/// Lowercases, trims, drops blanks and duplicates, and caps the list.
pub fn normalize_topics(topics: Vec<String>, max_topics: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    topics
        .into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .take(max_topics)
        .collect()
}

/// Model-derived topic labels, cached by article fingerprint.
pub struct TopicExtractor {
    llm: Arc<dyn LLMAdapter>,
    cache: Cache,
}

impl TopicExtractor {
    pub fn new(llm: Arc<dyn LLMAdapter>, cache: Cache) -> Self {
        Self { llm, cache }
    }

    /// Returns up to `settings.max_topics` topics.
    ///
    /// An empty list means "no additional signal"; it is also what a model
    /// failure produces.
    pub async fn extract(&self, article: &Article, settings: &Settings) -> Vec<String> {
        let key = keys::topics(&article.fingerprint());
        if let Some(cached) = self.cache.get_json::<CachedTopics>(&key).await {
            if cached.covers(settings.max_topics) {
                return normalize_topics(cached.topics, settings.max_topics);
            }
            debug!(target: TARGET_ANALYSIS, "Cached topics for {} were capped at {}, extracting again", article.source_url, cached.max_topics);
        }

        if article.title.trim().is_empty() && article.content.trim().is_empty() {
            debug!(target: TARGET_ANALYSIS, "Nothing to extract topics from: {}", article.source_url);
            return Vec::new();
        }

        let extraction: Result<TopicExtraction, _> = invoke(
            self.llm.as_ref(),
            LLMTask::Topics,
            &prompt::topics_system_prompt(settings.max_topics),
            &prompt::topics_prompt(article),
            settings.ai_timeout,
        )
        .await;

        match extraction {
            Ok(extraction) => {
                let topics = normalize_topics(extraction.topics, settings.max_topics);
                debug!(target: TARGET_ANALYSIS, "Extracted {} topics for {}", topics.len(), article.source_url);
                let entry = CachedTopics {
                    max_topics: settings.max_topics,
                    topics: topics.clone(),
                };
                self.cache
                    .set_json(&key, &entry, settings.cache_ttls.topics)
                    .await;
                topics
            }
            Err(e) => {
                warn!(target: TARGET_ANALYSIS, "Topic extraction failed for {}: {}", article.source_url, e);
                Vec::new()
            }
        }
    }
}
