use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::QualityResult;
use super::MIN_CONTENT_CHARS;
use crate::article::Article;
use crate::cache::{keys, Cache};
use crate::llm::{invoke, LLMAdapter, LLMTask};
use crate::prompt;
use crate::settings::Settings;
use crate::TARGET_ANALYSIS;

pub const MAX_METADATA_COMPONENT: u32 = 50;
pub const MAX_AI_COMPONENT: u32 = 50;

/// Model judgment, one field per graded dimension.
#[derive(Debug, Deserialize, JsonSchema)]
struct QualityJudgment {
    /// Clarity, structure and grammar, 0-20.
    writing_quality: f64,
    /// Concrete, new information, 0-20.
    informativeness: f64,
    /// Sourcing and balance, 0-10.
    credibility: f64,
    #[serde(default)]
    reasoning: String,
}

impl QualityJudgment {
    fn ai_component(&self) -> u32 {
        let total = clamp_points(self.writing_quality, 20.0)
            + clamp_points(self.informativeness, 20.0)
            + clamp_points(self.credibility, 10.0);
        (total.round() as u32).min(MAX_AI_COMPONENT)
    }
}

fn clamp_points(value: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

/// Presence and length heuristics, 0-50.
///
/// * author present: 10
/// * publish date present: 10
/// * 2 per tag, up to 10
/// * content length: 5 / 10 / 15 / 20 at 300 / 1000 / 2500 / 5000 characters
pub fn metadata_component(article: &Article) -> u32 {
    let mut points = 0;

    if article
        .author
        .as_deref()
        .is_some_and(|author| !author.trim().is_empty())
    {
        points += 10;
    }
    if article.published_at.is_some() {
        points += 10;
    }

    let tag_count = article.tags.iter().filter(|t| !t.trim().is_empty()).count() as u32;
    points += (tag_count * 2).min(10);

    points += match article.content_len() {
        n if n >= 5000 => 20,
        n if n >= 2500 => 15,
        n if n >= 1000 => 10,
        n if n >= 300 => 5,
        _ => 0,
    };

    points.min(MAX_METADATA_COMPONENT)
}

/// Hybrid rule + model quality scorer.
pub struct QualityScorer {
    llm: Arc<dyn LLMAdapter>,
    cache: Cache,
}

impl QualityScorer {
    pub fn new(llm: Arc<dyn LLMAdapter>, cache: Cache) -> Self {
        Self { llm, cache }
    }

    /// Scores an article on a 0-100 scale.
    ///
    /// Never fails: insufficient content scores 0 without a model call, and a
    /// model failure falls back to the metadata-only score.
    pub async fn score(&self, article: &Article, settings: &Settings) -> QualityResult {
        if article.content_len() < MIN_CONTENT_CHARS {
            debug!(target: TARGET_ANALYSIS, "Insufficient content for quality scoring: {}", article.source_url);
            return QualityResult {
                score: 0,
                metadata_component: 0,
                ai_component: 0,
                reasoning: format!(
                    "insufficient content: fewer than {} characters",
                    MIN_CONTENT_CHARS
                ),
            };
        }

        let metadata = metadata_component(article);
        if !settings.ai_quality_scoring {
            return metadata_only(metadata, "AI quality scoring disabled".to_string());
        }

        let key = keys::quality(&article.fingerprint());
        if let Some(cached) = self.cache.get_json::<QualityResult>(&key).await {
            return cached;
        }

        let judgment: Result<QualityJudgment, _> = invoke(
            self.llm.as_ref(),
            LLMTask::Quality,
            &prompt::quality_system_prompt(),
            &prompt::quality_prompt(article),
            settings.ai_timeout,
        )
        .await;

        match judgment {
            Ok(judgment) => {
                let ai = judgment.ai_component();
                let result = QualityResult {
                    score: (metadata + ai).min(100),
                    metadata_component: metadata,
                    ai_component: ai,
                    reasoning: judgment.reasoning.trim().to_string(),
                };
                self.cache
                    .set_json(&key, &result, settings.cache_ttls.quality)
                    .await;
                result
            }
            Err(e) => {
                warn!(target: TARGET_ANALYSIS, "AI quality scoring failed for {}, using metadata only: {}", article.source_url, e);
                metadata_only(
                    metadata,
                    format!("AI quality scoring failed ({}); metadata-only score", e),
                )
            }
        }
    }
}

/// Metadata scaled by two so it spans the full 0-100 range.
fn metadata_only(metadata: u32, reasoning: String) -> QualityResult {
    QualityResult {
        score: (metadata * 2).min(100),
        metadata_component: metadata,
        ai_component: 0,
        reasoning,
    }
}
