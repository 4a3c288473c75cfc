use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::analysis::{
    QualityResult, QualityScorer, RelevanceResult, RelevanceScorer, Summarizer, SummaryResult,
    TopicExtractor,
};
use crate::article::{Article, InterestProfile};
use crate::cache::Cache;
use crate::clustering::{ArticleGroup, SimilarityDetector, TopicIndex};
use crate::error::ConfigError;
use crate::llm::LLMAdapter;
use crate::settings::Settings;
use crate::TARGET_PIPELINE;

/// Everything the stages produced for one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedArticle {
    pub article: Article,
    pub quality: QualityResult,
    pub topics: Vec<String>,
    pub relevance: RelevanceResult,
    pub summary: SummaryResult,
}

/// Output of one pipeline run, handed back to digest assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestBatch {
    /// One entry per input article, in input order.
    pub items: Vec<EnrichedArticle>,
    pub groups: Vec<ArticleGroup>,
}

/// Runs quality, topics, relevance and summary per article, then clustering.
///
/// Every stage shares the same model adapter and cache. Model and cache
/// failures degrade the affected stage; only configuration errors stop a run.
pub struct Pipeline {
    quality: QualityScorer,
    topics: TopicExtractor,
    relevance: RelevanceScorer,
    summarizer: Summarizer,
    similarity: SimilarityDetector,
}

impl Pipeline {
    pub fn new(llm: Arc<dyn LLMAdapter>, cache: Cache) -> Self {
        Self {
            quality: QualityScorer::new(llm.clone(), cache.clone()),
            topics: TopicExtractor::new(llm.clone(), cache.clone()),
            relevance: RelevanceScorer::new(llm.clone(), cache.clone()),
            summarizer: Summarizer::new(llm.clone(), cache.clone()),
            similarity: SimilarityDetector::new(llm, cache),
        }
    }

    pub async fn process(
        &self,
        articles: &[Article],
        profile: &InterestProfile,
        settings: &Settings,
    ) -> Result<DigestBatch, ConfigError> {
        self.process_at(articles, profile, settings, Utc::now()).await
    }

    /// Processes a batch with an explicit reference time for freshness.
    ///
    /// Settings and profile are validated once up front, so an invalid
    /// configuration fails before any model call is made.
    pub async fn process_at(
        &self,
        articles: &[Article],
        profile: &InterestProfile,
        settings: &Settings,
        now: DateTime<Utc>,
    ) -> Result<DigestBatch, ConfigError> {
        settings.validate()?;
        profile.validate()?;

        let start = Instant::now();
        info!(
            target: TARGET_PIPELINE,
            "Processing {} articles for profile {}", articles.len(), profile.profile_id
        );

        let results: Vec<Result<EnrichedArticle, ConfigError>> = stream::iter(articles)
            .map(|article| self.enrich(article, profile, settings, now))
            .buffered(settings.article_concurrency.max(1))
            .collect()
            .await;
        let items = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        let topic_index: TopicIndex = items
            .iter()
            .map(|item| (item.article.fingerprint(), item.topics.clone()))
            .collect();
        let groups = self
            .similarity
            .group_with_topics(articles, &topic_index, settings)
            .await?;

        let passing = items.iter().filter(|i| i.relevance.passes_threshold).count();
        info!(
            target: TARGET_PIPELINE,
            "Processed {} articles ({} relevant) into {} groups in {:?}",
            items.len(), passing, groups.len(), start.elapsed()
        );

        Ok(DigestBatch { items, groups })
    }

    async fn enrich(
        &self,
        article: &Article,
        profile: &InterestProfile,
        settings: &Settings,
        now: DateTime<Utc>,
    ) -> Result<EnrichedArticle, ConfigError> {
        let quality = self.quality.score(article, settings).await;
        let topics = self.topics.extract(article, settings).await;
        let relevance = self
            .relevance
            .score_at(article, profile, Some(quality.score), &topics, settings, now)
            .await?;
        let summary = self
            .summarizer
            .summarize(article, settings.summary_style, &topics, settings)
            .await;

        debug!(
            target: TARGET_PIPELINE,
            "Enriched {}: quality {}, relevance {}, {} topics",
            article.source_url, quality.score, relevance.score, topics.len()
        );

        Ok(EnrichedArticle {
            article: article.clone(),
            quality,
            topics,
            relevance,
            summary,
        })
    }
}
