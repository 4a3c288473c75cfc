use serde::{Deserialize, Serialize};

/// Rule + model hybrid quality score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityResult {
    /// 0-100.
    pub score: u32,
    /// 0-50, from presence and length heuristics.
    pub metadata_component: u32,
    /// 0-50, zero when the model was not used.
    pub ai_component: u32,
    pub reasoning: String,
}

/// Personalized relevance of one article for one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceResult {
    /// 0-100, after the profile boost factor.
    pub score: u32,
    /// 0-60.
    pub keyword_component: u32,
    /// 0-30.
    pub semantic_component: f32,
    /// 0-5.
    pub temporal_boost: u32,
    /// 0 or 5.
    pub quality_boost: u32,
    pub matched_keywords: Vec<String>,
    pub passes_threshold: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub summary: String,
    pub key_points: Vec<String>,
    pub reasoning: String,
}
