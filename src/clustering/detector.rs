use futures::stream::{self, StreamExt};
use schemars::JsonSchema;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::graph::{group_id, SimilarityGraph};
use super::types::{ArticleGroup, PairJudgment};
use crate::article::Article;
use crate::cache::{keys, Cache};
use crate::error::ConfigError;
use crate::llm::{invoke, LLMAdapter, LLMTask};
use crate::prompt;
use crate::settings::Settings;
use crate::TARGET_CLUSTERING;

/// Topics per article, keyed by fingerprint.
pub type TopicIndex = HashMap<String, Vec<String>>;

#[derive(Debug, Deserialize, JsonSchema)]
struct SimilarityVerdict {
    /// Probability that both articles cover the same story, 0.0-1.0.
    confidence: f64,
    #[serde(default)]
    reasoning: String,
}

/// Pairwise model comparison reduced to connected components.
pub struct SimilarityDetector {
    llm: Arc<dyn LLMAdapter>,
    cache: Cache,
}

impl SimilarityDetector {
    pub fn new(llm: Arc<dyn LLMAdapter>, cache: Cache) -> Self {
        Self { llm, cache }
    }

    /// Groups `articles` without topic information.
    pub async fn group(
        &self,
        articles: &[Article],
        settings: &Settings,
    ) -> Result<Vec<ArticleGroup>, ConfigError> {
        self.group_with_topics(articles, &TopicIndex::new(), settings)
            .await
    }

    /// Groups near-duplicate articles.
    ///
    /// Every input article ends up in exactly one group. A pair whose
    /// comparison fails is treated as not similar and is not cached.
    ///
    /// # Arguments
    /// * `articles` - Batch to group; input order decides each group's primary article.
    /// * `topics` - Extracted topics by fingerprint, merged into `common_topics`.
    /// * `settings` - Threshold, timeout, concurrency and TTL.
    ///
    /// # Returns
    /// * `Err` only for an out-of-range similarity threshold.
    pub async fn group_with_topics(
        &self,
        articles: &[Article],
        topics: &TopicIndex,
        settings: &Settings,
    ) -> Result<Vec<ArticleGroup>, ConfigError> {
        if !(0.0..=1.0).contains(&settings.similarity_threshold) {
            return Err(ConfigError::InvalidSimilarityThreshold(
                settings.similarity_threshold,
            ));
        }
        if articles.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let fingerprints: Vec<String> = articles.iter().map(Article::fingerprint).collect();

        // Pairs sharing a key (duplicate fingerprints in the batch) share one judgment.
        let mut pairs_by_key: HashMap<String, Vec<(usize, usize)>> = HashMap::new();
        let mut key_order = Vec::new();
        for i in 0..articles.len() {
            for j in (i + 1)..articles.len() {
                let key = keys::similarity(&fingerprints[i], &fingerprints[j]);
                let pairs = pairs_by_key.entry(key.clone()).or_default();
                if pairs.is_empty() {
                    key_order.push(key);
                }
                pairs.push((i, j));
            }
        }

        let mut confidences: HashMap<String, f32> = HashMap::new();
        let mut pending = Vec::new();
        for key in &key_order {
            let (i, j) = pairs_by_key[key][0];
            if fingerprints[i] == fingerprints[j] {
                // Same title and URL: the same article delivered twice.
                confidences.insert(key.clone(), 1.0);
                continue;
            }
            match self.cache.get_json::<PairJudgment>(key).await {
                Some(judgment) => {
                    confidences.insert(key.clone(), judgment.confidence);
                }
                None => pending.push((key.clone(), i, j)),
            }
        }

        let known = confidences.len();
        let requested = pending.len();
        let judgments: Vec<(String, Option<PairJudgment>)> = stream::iter(pending)
            .map(|(key, i, j)| async move {
                let judgment = self.judge(&articles[i], &articles[j], settings).await;
                (key, judgment)
            })
            .buffer_unordered(settings.similarity_concurrency.max(1))
            .collect()
            .await;

        let mut failed = 0;
        for (key, judgment) in judgments {
            match judgment {
                Some(judgment) => {
                    self.cache
                        .set_json(&key, &judgment, settings.cache_ttls.similarity)
                        .await;
                    confidences.insert(key, judgment.confidence);
                }
                None => failed += 1,
            }
        }

        let mut graph = SimilarityGraph::new(articles.len());
        for key in &key_order {
            let similar = confidences
                .get(key)
                .is_some_and(|confidence| *confidence >= settings.similarity_threshold);
            if similar {
                for &(i, j) in &pairs_by_key[key] {
                    graph.add_edge(i, j);
                }
            }
        }

        let groups: Vec<ArticleGroup> = graph
            .connected_components()
            .into_iter()
            .filter_map(|members| build_group(articles, &fingerprints, &members, topics))
            .collect();

        let largest = groups.iter().map(ArticleGroup::member_count).max().unwrap_or(0);
        info!(
            target: TARGET_CLUSTERING,
            "Grouped {} articles into {} groups, largest {} ({} pairs: {} known, {} compared, {} failed, {} edges) in {:?}",
            articles.len(), groups.len(), largest, key_order.len(), known, requested, failed,
            graph.edge_count(), start.elapsed()
        );

        Ok(groups)
    }

    /// One model comparison. `None` means the pair could not be judged.
    async fn judge(&self, first: &Article, second: &Article, settings: &Settings) -> Option<PairJudgment> {
        let verdict: Result<SimilarityVerdict, _> = invoke(
            self.llm.as_ref(),
            LLMTask::Similarity,
            &prompt::similarity_system_prompt(),
            &prompt::similarity_prompt(first, second),
            settings.ai_timeout,
        )
        .await;

        match verdict {
            Ok(verdict) if verdict.confidence.is_finite() => {
                let confidence = (verdict.confidence as f32).clamp(0.0, 1.0);
                debug!(
                    target: TARGET_CLUSTERING,
                    "'{}' vs '{}': confidence {:.2} ({})",
                    first.title, second.title, confidence, verdict.reasoning
                );
                Some(PairJudgment {
                    confidence,
                    reasoning: verdict.reasoning,
                })
            }
            Ok(verdict) => {
                warn!(target: TARGET_CLUSTERING, "Non-numeric confidence {} for '{}' vs '{}', treating as not similar", verdict.confidence, first.title, second.title);
                None
            }
            Err(e) => {
                warn!(target: TARGET_CLUSTERING, "Similarity check failed for '{}' vs '{}', treating as not similar: {}", first.title, second.title, e);
                None
            }
        }
    }
}

fn build_group(
    articles: &[Article],
    fingerprints: &[String],
    members: &[usize],
    topics: &TopicIndex,
) -> Option<ArticleGroup> {
    // Members are sorted by input position, so the first one is the primary.
    let (&primary, rest) = members.split_first()?;

    let common_topics: BTreeSet<String> = members
        .iter()
        .filter_map(|&idx| topics.get(&fingerprints[idx]))
        .flatten()
        .map(|topic| topic.trim().to_lowercase())
        .filter(|topic| !topic.is_empty())
        .collect();

    Some(ArticleGroup {
        group_id: group_id(members.iter().map(|&idx| articles[idx].source_url.as_str())),
        primary_article: articles[primary].clone(),
        similar_articles: rest.iter().map(|&idx| articles[idx].clone()).collect(),
        common_topics,
    })
}
