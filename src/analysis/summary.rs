use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::SummaryResult;
use super::MIN_CONTENT_CHARS;
use crate::article::Article;
use crate::cache::{keys, Cache};
use crate::error::ConfigError;
use crate::llm::{invoke, LLMAdapter, LLMTask};
use crate::prompt;
use crate::settings::{Settings, SummaryStyle};
use crate::util::excerpt;
use crate::TARGET_ANALYSIS;

/// Length of the excerpt used whenever the model is skipped or fails.
pub const FALLBACK_EXCERPT_CHARS: usize = 300;

#[derive(Debug, Deserialize, JsonSchema)]
struct SummaryDraft {
    summary: String,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default)]
    reasoning: String,
}

fn clean_key_points(points: Vec<String>) -> Vec<String> {
    points
        .into_iter()
        .map(|p| {
            p.trim()
                .trim_start_matches(['-', '*', '•'])
                .trim()
                .to_string()
        })
        .filter(|p| !p.is_empty())
        .collect()
}

/// Turns the model's draft into the final text for `style`.
fn materialize(style: SummaryStyle, summary: &str, key_points: &[String]) -> String {
    match style {
        SummaryStyle::Brief | SummaryStyle::Detailed => summary.to_string(),
        SummaryStyle::BulletPoints => {
            let bullets = key_points
                .iter()
                .map(|p| format!("- {}", p))
                .collect::<Vec<_>>()
                .join("\n");
            match (bullets.is_empty(), summary.is_empty()) {
                (true, _) => summary.to_string(),
                (false, true) => bullets,
                (false, false) => format!("{}\n\n{}", bullets, summary),
            }
        }
    }
}

/// Style-conditioned summaries with an excerpt fallback.
pub struct Summarizer {
    llm: Arc<dyn LLMAdapter>,
    cache: Cache,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LLMAdapter>, cache: Cache) -> Self {
        Self { llm, cache }
    }

    /// Like [`Summarizer::summarize`], with the style given by name.
    ///
    /// An unknown style name is a configuration error.
    pub async fn summarize_as(
        &self,
        article: &Article,
        style: &str,
        topics: &[String],
        settings: &Settings,
    ) -> Result<SummaryResult, ConfigError> {
        let style: SummaryStyle = style.parse()?;
        Ok(self.summarize(article, style, topics, settings).await)
    }

    /// Summarizes `article` in `style`.
    ///
    /// The summary is never empty when the article has content: short
    /// articles and model failures both produce a leading excerpt.
    pub async fn summarize(
        &self,
        article: &Article,
        style: SummaryStyle,
        topics: &[String],
        settings: &Settings,
    ) -> SummaryResult {
        if article.content.trim().is_empty() {
            return SummaryResult {
                summary: article.title.trim().to_string(),
                key_points: Vec::new(),
                reasoning: "no content; using title".to_string(),
            };
        }

        if article.content_len() < MIN_CONTENT_CHARS {
            debug!(target: TARGET_ANALYSIS, "Content below {} characters, using excerpt: {}", MIN_CONTENT_CHARS, article.source_url);
            return SummaryResult {
                summary: excerpt(&article.content, FALLBACK_EXCERPT_CHARS),
                key_points: Vec::new(),
                reasoning: format!(
                    "content shorter than {} characters; using excerpt",
                    MIN_CONTENT_CHARS
                ),
            };
        }

        let key = keys::summary(
            style,
            settings.custom_prompt.as_deref(),
            &article.fingerprint(),
        );
        if let Some(cached) = self.cache.get_json::<SummaryResult>(&key).await {
            return cached;
        }

        let draft: Result<SummaryDraft, _> = invoke(
            self.llm.as_ref(),
            LLMTask::Summary,
            &prompt::summary_system_prompt(style, settings.custom_prompt.as_deref()),
            &prompt::summary_prompt(article, topics),
            settings.ai_timeout,
        )
        .await;

        let failure = match draft {
            Ok(draft) => {
                let summary = draft.summary.trim().to_string();
                let key_points = clean_key_points(draft.key_points);
                let text = materialize(style, &summary, &key_points);

                if !text.is_empty() {
                    let result = SummaryResult {
                        summary: text,
                        key_points,
                        reasoning: draft.reasoning.trim().to_string(),
                    };
                    self.cache
                        .set_json(&key, &result, settings.cache_ttls.summary)
                        .await;
                    return result;
                }
                "model returned an empty summary".to_string()
            }
            Err(e) => e.to_string(),
        };

        warn!(target: TARGET_ANALYSIS, "Summarization failed for {}, using excerpt: {}", article.source_url, failure);
        SummaryResult {
            summary: excerpt(&article.content, FALLBACK_EXCERPT_CHARS),
            key_points: Vec::new(),
            reasoning: format!("AI summarization failed ({}); using leading excerpt", failure),
        }
    }
}
