use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One of the five scoring dimensions a page is evaluated on.
///
/// The set is fixed; serde names double as the wire/cache names.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Bias,
    LlmGenerated,
    Language,
    Grammar,
    Conciseness,
}

impl Factor {
    pub const ALL: [Factor; 5] = [
        Factor::Bias,
        Factor::LlmGenerated,
        Factor::Language,
        Factor::Grammar,
        Factor::Conciseness,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Factor::Bias => "bias",
            Factor::LlmGenerated => "llm_generated",
            Factor::Language => "language",
            Factor::Grammar => "grammar",
            Factor::Conciseness => "conciseness",
        }
    }
}

/// One factor's result: a 0-100 score and formatted detail markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreFactor {
    pub score: u8,
    /// HTML block markup produced by the details formatter.
    pub details: String,
}

/// A complete scoring run for one page. Immutable once produced; a refresh
/// replaces the stored report rather than appending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreReport {
    pub overall_score: u8,
    pub factors: BTreeMap<Factor, ScoreFactor>,
    /// Unix seconds at generation time.
    pub timestamp: u64,
    pub page_id: u64,
    pub page_title: String,
}

/// Per-factor weight and the default score substituted when that factor's
/// chat query fails.
#[derive(Debug, Clone, Copy)]
pub struct FactorConfig {
    pub weight: f64,
    pub default_score: u8,
}

/// Injected scoring configuration.
///
/// Defaults carry the canonical values; tests construct alternates to exercise
/// the aggregate with other weight sets. Default scores lean optimistic so a
/// transient chat failure does not tank an article's score.
#[derive(Debug, Clone)]
pub struct ScoringProfile {
    pub bias: FactorConfig,
    pub llm_generated: FactorConfig,
    pub language: FactorConfig,
    pub grammar: FactorConfig,
    pub conciseness: FactorConfig,
    /// Content shorter than this (in chars) is not worth a remote call.
    pub min_content_chars: usize,
    /// Outbound payloads are capped to this many chars.
    pub max_content_chars: usize,
    /// Fixed score used for every factor of a too-short page.
    pub short_content_score: u8,
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self {
            bias: FactorConfig { weight: 1.5, default_score: 80 },
            llm_generated: FactorConfig { weight: 1.0, default_score: 70 },
            language: FactorConfig { weight: 1.2, default_score: 75 },
            grammar: FactorConfig { weight: 1.2, default_score: 80 },
            conciseness: FactorConfig { weight: 1.0, default_score: 75 },
            min_content_chars: 50,
            max_content_chars: 3000,
            short_content_score: 50,
        }
    }
}

impl ScoringProfile {
    pub fn factor(&self, factor: Factor) -> FactorConfig {
        match factor {
            Factor::Bias => self.bias,
            Factor::LlmGenerated => self.llm_generated,
            Factor::Language => self.language,
            Factor::Grammar => self.grammar,
            Factor::Conciseness => self.conciseness,
        }
    }
}

/// Weighted average of the factor scores, rounded to the nearest integer.
///
/// The aggregator always supplies all five factors; the divisor is the sum of
/// the weights actually present, so the result stays in [0,100] regardless.
pub fn weighted_overall(profile: &ScoringProfile, factors: &BTreeMap<Factor, ScoreFactor>) -> u8 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for (factor, result) in factors {
        let config = profile.factor(*factor);
        weighted_sum += f64::from(result.score) * config.weight;
        total_weight += config.weight;
    }
    if total_weight == 0.0 {
        return 0;
    }
    (weighted_sum / total_weight).round() as u8
}
