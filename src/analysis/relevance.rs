//! Per-user relevance scoring.
//!
//! The score is assembled in four stages with fixed point budgets:
//!
//! 1. keyword hits, 0-60 (title 3, content 2, tag or topic 4 per keyword)
//! 2. semantic lift from the model, 0-30, only inside [`SEMANTIC_WINDOW`]
//! 3. boosts, 0-10 (freshness 0-5, quality +5)
//! 4. the profile's boost factor, applied once to the sum of 1-3, then
//!    clamped to 0-100
//!
//! A profile without keywords always passes its threshold.

use chrono::{DateTime, Utc};
use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::RelevanceResult;
use crate::article::{Article, InterestProfile};
use crate::cache::{keys, Cache};
use crate::error::ConfigError;
use crate::llm::{invoke, LLMAdapter, LLMTask};
use crate::prompt;
use crate::settings::Settings;
use crate::TARGET_ANALYSIS;

pub const TITLE_WEIGHT: u32 = 3;
pub const CONTENT_WEIGHT: u32 = 2;
pub const TAG_WEIGHT: u32 = 4;
pub const MAX_KEYWORD_COMPONENT: u32 = 60;

/// Keyword scores where the keyword signal alone is inconclusive.
pub const SEMANTIC_WINDOW: RangeInclusive<u32> = 16..=54;
pub const MAX_SEMANTIC_COMPONENT: f32 = 30.0;

pub const MAX_TEMPORAL_BOOST: u32 = 5;
pub const TEMPORAL_WINDOW_HOURS: f64 = 24.0;
pub const QUALITY_BOOST: u32 = 5;
pub const QUALITY_BOOST_MIN_SCORE: u32 = 80;

#[derive(Debug, Deserialize, JsonSchema)]
struct SemanticJudgment {
    /// Semantic relevance, 0-30.
    score: f64,
    #[serde(default)]
    reasoning: String,
}

/// Outcome of the keyword stage.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatch {
    pub score: u32,
    pub matched: Vec<String>,
}

/// Case-insensitive whole-term matcher for one keyword.
struct TermMatcher {
    keyword: String,
    pattern: Option<Regex>,
}

impl TermMatcher {
    fn new(keyword: &str) -> Self {
        // `\b` misbehaves for keywords that start or end with punctuation
        // ("c++", ".net"), so boundaries are spelled out.
        let pattern = Regex::new(&format!(r"(?i)(?:^|\W){}(?:\W|$)", regex::escape(keyword))).ok();
        Self {
            keyword: keyword.to_lowercase(),
            pattern,
        }
    }

    fn is_match(&self, haystack: &str) -> bool {
        match &self.pattern {
            Some(pattern) => pattern.is_match(haystack),
            None => haystack.to_lowercase().contains(&self.keyword),
        }
    }
}

/// Weighted keyword hits, clamped to [`MAX_KEYWORD_COMPONENT`].
///
/// `keywords` must already be normalized (see
/// [`InterestProfile::normalized_keywords`]).
pub fn keyword_stage(keywords: &[String], article: &Article, topics: &[String]) -> KeywordMatch {
    let labels: Vec<String> = article
        .tags
        .iter()
        .chain(topics.iter())
        .map(|label| label.trim().to_lowercase())
        .filter(|label| !label.is_empty())
        .collect();

    let mut score = 0;
    let mut matched = Vec::new();

    for keyword in keywords {
        let matcher = TermMatcher::new(keyword);
        let mut hits = 0;

        if matcher.is_match(&article.title) {
            hits += TITLE_WEIGHT;
        }
        if matcher.is_match(&article.content) {
            hits += CONTENT_WEIGHT;
        }
        if labels.iter().any(|label| matcher.is_match(label)) {
            hits += TAG_WEIGHT;
        }

        if hits > 0 {
            score += hits;
            matched.push(keyword.clone());
        }
    }

    KeywordMatch {
        score: score.min(MAX_KEYWORD_COMPONENT),
        matched,
    }
}

/// Linear freshness boost: full at publish time, zero from 24 hours on.
///
/// Articles dated in the future count as brand new; undated articles get no
/// boost.
pub fn temporal_boost(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    let Some(published_at) = published_at else {
        return 0;
    };

    let age_hours = ((now - published_at).num_seconds() as f64 / 3600.0).max(0.0);
    if age_hours >= TEMPORAL_WINDOW_HOURS {
        return 0;
    }

    let boost = MAX_TEMPORAL_BOOST as f64 * (1.0 - age_hours / TEMPORAL_WINDOW_HOURS);
    (boost.round() as u32).min(MAX_TEMPORAL_BOOST)
}

/// Flat boost for high quality articles that also matched a keyword.
pub fn quality_boost(quality_score: Option<u32>, keyword_matched: bool) -> u32 {
    match quality_score {
        Some(score) if score >= QUALITY_BOOST_MIN_SCORE && keyword_matched => QUALITY_BOOST,
        _ => 0,
    }
}

/// Combines the stage outputs and applies the profile boost factor once.
pub fn combine(
    keyword: u32,
    semantic: f32,
    temporal: u32,
    quality: u32,
    boost_factor: f32,
) -> u32 {
    let subtotal = keyword as f32 + semantic + temporal as f32 + quality as f32;
    (subtotal * boost_factor).round().clamp(0.0, 100.0) as u32
}

pub struct RelevanceScorer {
    llm: Arc<dyn LLMAdapter>,
    cache: Cache,
}

impl RelevanceScorer {
    pub fn new(llm: Arc<dyn LLMAdapter>, cache: Cache) -> Self {
        Self { llm, cache }
    }

    /// Scores `article` for `profile` as of now.
    pub async fn score(
        &self,
        article: &Article,
        profile: &InterestProfile,
        quality_score: Option<u32>,
        topics: &[String],
        settings: &Settings,
    ) -> Result<RelevanceResult, ConfigError> {
        self.score_at(article, profile, quality_score, topics, settings, Utc::now())
            .await
    }

    /// Scores `article` for `profile` with an explicit clock.
    ///
    /// # Arguments
    /// * `quality_score` - Result of the quality stage, if it ran. Only used for the quality boost.
    /// * `topics` - Extracted topics; matched with tag weight.
    /// * `now` - Reference time for the freshness boost.
    ///
    /// # Returns
    /// * `Err` only when the profile itself is invalid.
    pub async fn score_at(
        &self,
        article: &Article,
        profile: &InterestProfile,
        quality_score: Option<u32>,
        topics: &[String],
        settings: &Settings,
        now: DateTime<Utc>,
    ) -> Result<RelevanceResult, ConfigError> {
        profile.validate()?;

        let key = keys::relevance(&profile.profile_id, &article.source_url);
        if let Some(cached) = self.cache.get_json::<RelevanceResult>(&key).await {
            return Ok(cached);
        }

        let keywords = profile.normalized_keywords();
        let keyword_match = keyword_stage(&keywords, article, topics);

        let mut degraded = false;
        let semantic = if settings.semantic_scoring
            && !keywords.is_empty()
            && SEMANTIC_WINDOW.contains(&keyword_match.score)
        {
            match self.semantic_stage(article, topics, &keywords, settings).await {
                Some(lift) => lift,
                None => {
                    degraded = true;
                    0.0
                }
            }
        } else {
            0.0
        };

        let temporal = temporal_boost(article.published_at, now);
        let quality = quality_boost(quality_score, !keyword_match.matched.is_empty());
        let score = combine(
            keyword_match.score,
            semantic,
            temporal,
            quality,
            profile.boost_factor,
        );

        let passes_threshold = keywords.is_empty() || i64::from(score) >= profile.relevance_threshold;

        let result = RelevanceResult {
            score,
            keyword_component: keyword_match.score,
            semantic_component: semantic,
            temporal_boost: temporal,
            quality_boost: quality,
            matched_keywords: keyword_match.matched,
            passes_threshold,
        };

        debug!(
            target: TARGET_ANALYSIS,
            "Relevance for {} / {}: {} (keyword {}, semantic {:.1}, temporal {}, quality {})",
            profile.profile_id, article.source_url, result.score, result.keyword_component,
            result.semantic_component, result.temporal_boost, result.quality_boost
        );

        if !degraded {
            self.cache
                .set_json(&key, &result, settings.cache_ttls.relevance)
                .await;
        }
        Ok(result)
    }

    /// Model-assessed lift, or `None` when the model could not be used.
    async fn semantic_stage(
        &self,
        article: &Article,
        topics: &[String],
        keywords: &[String],
        settings: &Settings,
    ) -> Option<f32> {
        let judgment: Result<SemanticJudgment, _> = invoke(
            self.llm.as_ref(),
            LLMTask::Relevance,
            &prompt::semantic_relevance_system_prompt(),
            &prompt::semantic_relevance_prompt(article, topics, keywords),
            settings.ai_timeout,
        )
        .await;

        match judgment {
            Ok(judgment) if judgment.score.is_finite() => {
                debug!(target: TARGET_ANALYSIS, "Semantic lift for {}: {} ({})", article.source_url, judgment.score, judgment.reasoning);
                Some((judgment.score as f32).clamp(0.0, MAX_SEMANTIC_COMPONENT))
            }
            Ok(judgment) => {
                warn!(target: TARGET_ANALYSIS, "Semantic score for {} was not a number: {}", article.source_url, judgment.score);
                None
            }
            Err(e) => {
                warn!(target: TARGET_ANALYSIS, "Semantic relevance failed for {}, keyword score only: {}", article.source_url, e);
                None
            }
        }
    }
}
