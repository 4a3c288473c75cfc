use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::article::Article;

/// Struct representing a group of articles covering the same story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleGroup {
    /// Hash over the sorted member URLs; independent of input order.
    pub group_id: String,
    /// Earliest member in input order.
    pub primary_article: Article,
    /// Remaining members, in input order.
    pub similar_articles: Vec<Article>,
    /// Union of the members' extracted topics.
    pub common_topics: BTreeSet<String>,
}

impl ArticleGroup {
    pub fn member_count(&self) -> usize {
        1 + self.similar_articles.len()
    }
}

/// Cached outcome of one pairwise comparison.
///
/// The confidence is kept rather than a yes/no so a later run with another
/// threshold reuses it correctly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairJudgment {
    pub confidence: f32,
    #[serde(default)]
    pub reasoning: String,
}
