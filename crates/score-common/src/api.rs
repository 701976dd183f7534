use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetPageScoreParams {
    /// Title of the wiki page to score.
    pub page: String,
    /// Bypass the cached report and recompute (default: false).
    pub refresh: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct RescorePageParams {
    /// Title of the wiki page to rescore in the background.
    pub page: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FactorScoreEntry {
    pub factor: String,
    pub score: u8,
    /// HTML block markup (paragraphs and lists) explaining the score.
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScoreReportResponse {
    pub page_id: u64,
    pub page_title: String,
    pub overall_score: u8,
    pub factors: Vec<FactorScoreEntry>,
    /// Unix seconds at which the report was generated.
    pub timestamp: u64,
    /// True when the report was served from the cache rather than recomputed.
    pub cached: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RescoreQueuedResponse {
    pub queued: bool,
}
