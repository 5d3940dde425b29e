use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use persona_core::{ClassificationResult, FeatureVector, PersonaBio, PersonaType, Recommendations};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// POST /api/v1/analyze
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub address: String,
    /// Raw activity record from the chain-data provider, read leniently
    #[serde(default)]
    pub activity: Value,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub address: String,
    pub persona: PersonaType,
    pub confidence: f64,
    pub all_confidences: BTreeMap<PersonaType, f64>,
    pub risk_score: f64,
    pub health_score: f64,
    pub features: FeatureVector,
    pub recommendations: Recommendations,
    pub persona_bio: String,
    pub is_ai_generated: bool,
    pub analyzed_at: DateTime<Utc>,
}

impl AnalyzeResponse {
    pub fn new(
        address: String,
        result: ClassificationResult,
        recommendations: Recommendations,
        bio: PersonaBio,
    ) -> Self {
        Self {
            address,
            persona: result.persona,
            confidence: result.confidence,
            all_confidences: result.all_confidences,
            risk_score: result.risk_score,
            health_score: result.health_score,
            features: result.features,
            recommendations,
            persona_bio: bio.text,
            is_ai_generated: bio.is_ai_generated,
            analyzed_at: Utc::now(),
        }
    }
}

// ============================================================================
// GET /api/v1/personas
// ============================================================================

#[derive(Debug, Serialize)]
pub struct PersonasResponse {
    pub personas: Vec<PersonaInfo>,
}

#[derive(Debug, Serialize)]
pub struct PersonaInfo {
    pub persona: PersonaType,
    pub slug: &'static str,
    pub recommendations: Recommendations,
}

// ============================================================================
// Health check
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
