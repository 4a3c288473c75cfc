use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;

use crate::error::ConfigError;

/// A normalized article as handed over by the feed layer.
///
/// Stages only ever borrow an `Article`; results are returned as separate
/// values and merged by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub source_url: String,
    #[serde(default)]
    pub author: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>, content: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: BTreeSet::new(),
            published_at: None,
            source_url: source_url.into(),
            author: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Stable identity of the article: hex SHA-256 of `title + source_url`.
    ///
    /// Used as the cache key component for every per-article stage.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        hasher.update(self.source_url.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Length of the trimmed content in characters.
    pub fn content_len(&self) -> usize {
        self.content.trim().chars().count()
    }
}

/// A user's interests, owned by the account system and read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestProfile {
    pub profile_id: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_boost_factor")]
    pub boost_factor: f32,
    #[serde(default = "default_relevance_threshold")]
    pub relevance_threshold: i64,
}

fn default_boost_factor() -> f32 {
    1.0
}

fn default_relevance_threshold() -> i64 {
    50
}

impl InterestProfile {
    pub fn new<I, S>(profile_id: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            profile_id: profile_id.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            boost_factor: default_boost_factor(),
            relevance_threshold: default_relevance_threshold(),
        }
    }

    pub fn with_boost_factor(mut self, boost_factor: f32) -> Self {
        self.boost_factor = boost_factor;
        self
    }

    pub fn with_relevance_threshold(mut self, relevance_threshold: i64) -> Self {
        self.relevance_threshold = relevance_threshold;
        self
    }

    /// Keywords lowercased, trimmed and deduplicated, first occurrence wins.
    pub fn normalized_keywords(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .filter(|k| seen.insert(k.clone()))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.5..=2.0).contains(&self.boost_factor) {
            return Err(ConfigError::InvalidBoostFactor(self.boost_factor));
        }
        if !(0..=100).contains(&self.relevance_threshold) {
            return Err(ConfigError::InvalidRelevanceThreshold(
                self.relevance_threshold,
            ));
        }
        Ok(())
    }
}
