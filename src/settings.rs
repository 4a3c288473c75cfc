use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::environment::{get_env_var_bool, get_env_var_parsed, get_env_var_secs};
use crate::error::ConfigError;

const HOUR: u64 = 60 * 60;

/// How the summarizer should shape its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryStyle {
    Brief,
    Detailed,
    BulletPoints,
}

impl fmt::Display for SummaryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryStyle::Brief => write!(f, "brief"),
            SummaryStyle::Detailed => write!(f, "detailed"),
            SummaryStyle::BulletPoints => write!(f, "bullet_points"),
        }
    }
}

impl FromStr for SummaryStyle {
    type Err = ConfigError;

    /// Unknown styles are a configuration error, never a silent default.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "brief" => Ok(SummaryStyle::Brief),
            "detailed" => Ok(SummaryStyle::Detailed),
            "bullet_points" => Ok(SummaryStyle::BulletPoints),
            _ => Err(ConfigError::InvalidStyle(s.to_string())),
        }
    }
}

/// Time-to-live for each stage's cache entries.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheTtls {
    pub quality: Duration,
    pub topics: Duration,
    pub relevance: Duration,
    pub summary: Duration,
    pub similarity: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            quality: Duration::from_secs(24 * HOUR),
            topics: Duration::from_secs(24 * HOUR),
            relevance: Duration::from_secs(12 * HOUR),
            summary: Duration::from_secs(24 * HOUR),
            similarity: Duration::from_secs(7 * 24 * HOUR),
        }
    }
}

/// Settings bundle shared by every stage of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub ai_quality_scoring: bool,
    pub max_topics: usize,
    pub semantic_scoring: bool,
    pub similarity_threshold: f32,
    pub cache_ttls: CacheTtls,
    pub summary_style: SummaryStyle,
    /// Extra summarizer instructions. Checked for prompt injection upstream.
    pub custom_prompt: Option<String>,
    /// Upper bound on every single model call.
    pub ai_timeout: Duration,
    /// Maximum in-flight pairwise similarity calls.
    pub similarity_concurrency: usize,
    /// Maximum articles enriched at the same time.
    pub article_concurrency: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ai_quality_scoring: true,
            max_topics: 5,
            semantic_scoring: true,
            similarity_threshold: crate::clustering::DEFAULT_SIMILARITY_THRESHOLD,
            cache_ttls: CacheTtls::default(),
            summary_style: SummaryStyle::Brief,
            custom_prompt: None,
            ai_timeout: Duration::from_secs(30),
            similarity_concurrency: 4,
            article_concurrency: 4,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(ConfigError::InvalidSimilarityThreshold(
                self.similarity_threshold,
            ));
        }
        if self.max_topics == 0 {
            return Err(invalid("max_topics", self.max_topics));
        }
        if self.ai_timeout.is_zero() {
            return Err(invalid("ai_timeout", format!("{:?}", self.ai_timeout)));
        }
        if self.similarity_concurrency == 0 {
            return Err(invalid("similarity_concurrency", self.similarity_concurrency));
        }
        if self.article_concurrency == 0 {
            return Err(invalid("article_concurrency", self.article_concurrency));
        }
        Ok(())
    }

    /// Builds settings from `BRIEFING_*` environment variables.
    ///
    /// Unset variables keep their defaults; set but unparseable ones are an
    /// error. The result is validated before it is returned.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Settings::default();

        if let Some(v) = get_env_var_bool("BRIEFING_AI_QUALITY_SCORING")? {
            settings.ai_quality_scoring = v;
        }
        if let Some(v) = get_env_var_parsed("BRIEFING_MAX_TOPICS")? {
            settings.max_topics = v;
        }
        if let Some(v) = get_env_var_bool("BRIEFING_SEMANTIC_SCORING")? {
            settings.semantic_scoring = v;
        }
        if let Some(v) = get_env_var_parsed("BRIEFING_SIMILARITY_THRESHOLD")? {
            settings.similarity_threshold = v;
        }
        if let Some(v) = get_env_var_parsed::<SummaryStyle>("BRIEFING_SUMMARY_STYLE")? {
            settings.summary_style = v;
        }
        if let Ok(prompt) = std::env::var("BRIEFING_CUSTOM_PROMPT") {
            if !prompt.trim().is_empty() {
                settings.custom_prompt = Some(prompt);
            }
        }
        if let Some(v) = get_env_var_secs("BRIEFING_AI_TIMEOUT_SECS")? {
            settings.ai_timeout = v;
        }
        if let Some(v) = get_env_var_parsed("BRIEFING_SIMILARITY_CONCURRENCY")? {
            settings.similarity_concurrency = v;
        }
        if let Some(v) = get_env_var_parsed("BRIEFING_ARTICLE_CONCURRENCY")? {
            settings.article_concurrency = v;
        }

        let ttls = &mut settings.cache_ttls;
        if let Some(v) = get_env_var_secs("BRIEFING_QUALITY_TTL_SECS")? {
            ttls.quality = v;
        }
        if let Some(v) = get_env_var_secs("BRIEFING_TOPICS_TTL_SECS")? {
            ttls.topics = v;
        }
        if let Some(v) = get_env_var_secs("BRIEFING_RELEVANCE_TTL_SECS")? {
            ttls.relevance = v;
        }
        if let Some(v) = get_env_var_secs("BRIEFING_SUMMARY_TTL_SECS")? {
            ttls.summary = v;
        }
        if let Some(v) = get_env_var_secs("BRIEFING_SIMILARITY_TTL_SECS")? {
            ttls.similarity = v;
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn invalid(name: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_style_parsing() {
        assert_eq!("brief".parse::<SummaryStyle>(), Ok(SummaryStyle::Brief));
        assert_eq!(" Detailed ".parse::<SummaryStyle>(), Ok(SummaryStyle::Detailed));
        assert_eq!(
            "bullet_points".parse::<SummaryStyle>(),
            Ok(SummaryStyle::BulletPoints)
        );
        assert_eq!(
            "haiku".parse::<SummaryStyle>(),
            Err(ConfigError::InvalidStyle("haiku".to_string()))
        );
    }

    #[test]
    fn test_summary_style_display_round_trips() {
        for style in [
            SummaryStyle::Brief,
            SummaryStyle::Detailed,
            SummaryStyle::BulletPoints,
        ] {
            assert_eq!(style.to_string().parse::<SummaryStyle>(), Ok(style));
        }
    }

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.cache_ttls.relevance, Duration::from_secs(12 * HOUR));
    }

    #[test]
    fn test_invalid_similarity_threshold_is_rejected() {
        let settings = Settings {
            similarity_threshold: 1.5,
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(ConfigError::InvalidSimilarityThreshold(1.5))
        );
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let settings = Settings {
            similarity_concurrency: 0,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
