//! Risk and health scoring
//!
//! Two independent 0-100 summaries of a wallet. Each is a sum of weighted
//! components clamped into range; the weights live in their own tables so
//! they can be tuned without touching the aggregation.

use serde::{Deserialize, Serialize};

use crate::models::FeatureVector;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// Weights for the risk score (higher = riskier)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    /// Points per transaction/day
    pub tx_frequency_rate: f64,
    pub tx_frequency_cap: f64,
    /// Points per whole native unit of average transaction value
    pub avg_value_rate: f64,
    pub avg_value_cap: f64,
    /// Points at zero token diversity
    pub low_diversity: f64,
    /// Points at zero recency
    pub staleness: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            tx_frequency_rate: 5.0,
            tx_frequency_cap: 25.0,
            avg_value_rate: 30.0,
            avg_value_cap: 50.0,
            low_diversity: 15.0,
            staleness: 20.0,
        }
    }
}

/// Weights for the health score (higher = healthier)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthWeights {
    /// Points per distinct token held
    pub token_count_rate: f64,
    pub token_count_cap: f64,
    pub nft_focus: f64,
    pub dao_engagement: f64,
    pub activity_recency: f64,
}

impl Default for HealthWeights {
    fn default() -> Self {
        Self {
            token_count_rate: 1.5,
            token_count_cap: 30.0,
            nft_focus: 20.0,
            dao_engagement: 25.0,
            activity_recency: 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RiskBreakdown {
    pub tx_frequency: f64,
    pub avg_tx_value: f64,
    pub low_diversity: f64,
    pub staleness: f64,
}

impl RiskBreakdown {
    pub fn compute(features: &FeatureVector, weights: &RiskWeights) -> Self {
        Self {
            tx_frequency: (features.tx_frequency * weights.tx_frequency_rate)
                .min(weights.tx_frequency_cap),
            avg_tx_value: (features.avg_tx_value * weights.avg_value_rate)
                .min(weights.avg_value_cap),
            low_diversity: (1.0 - features.token_diversity) * weights.low_diversity,
            staleness: (1.0 - features.activity_recency) * weights.staleness,
        }
    }

    pub fn total(&self) -> f64 {
        clamp_score(self.tx_frequency + self.avg_tx_value + self.low_diversity + self.staleness)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HealthBreakdown {
    pub token_count: f64,
    pub nft_focus: f64,
    pub dao_engagement: f64,
    pub activity_recency: f64,
}

impl HealthBreakdown {
    pub fn compute(features: &FeatureVector, weights: &HealthWeights) -> Self {
        Self {
            token_count: (features.token_count as f64 * weights.token_count_rate)
                .min(weights.token_count_cap),
            nft_focus: features.nft_focus * weights.nft_focus,
            dao_engagement: features.dao_engagement * weights.dao_engagement,
            activity_recency: features.activity_recency * weights.activity_recency,
        }
    }

    pub fn total(&self) -> f64 {
        clamp_score(self.token_count + self.nft_focus + self.dao_engagement + self.activity_recency)
    }
}

pub fn risk_score(features: &FeatureVector, weights: &RiskWeights) -> f64 {
    RiskBreakdown::compute(features, weights).total()
}

pub fn health_score(features: &FeatureVector, weights: &HealthWeights) -> f64 {
    HealthBreakdown::compute(features, weights).total()
}

/// Both scores under the default weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WalletScores {
    pub risk_score: f64,
    pub health_score: f64,
}

impl WalletScores {
    pub fn compute(features: &FeatureVector) -> Self {
        Self {
            risk_score: risk_score(features, &RiskWeights::default()),
            health_score: health_score(features, &HealthWeights::default()),
        }
    }
}

fn clamp_score(raw: f64) -> f64 {
    if raw.is_nan() {
        return SCORE_MIN;
    }
    raw.clamp(SCORE_MIN, SCORE_MAX)
}
