use axum::{
    extract::{Path, State},
    Json,
};
use persona_core::{classify, extract_value, recommendations_for, PersonaType, WalletActivityRecord};
use serde::Deserialize;
use std::time::Instant;

use super::dto::*;
use crate::error::{AppError, AppResult};
use crate::AppState;

/// `0x` followed by 40 hex digits
pub fn validate_eth_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    tracing::debug!("Processing health check request");

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn analyze_wallet(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> AppResult<Json<AnalyzeResponse>> {
    let start = Instant::now();
    let address = request.address;
    tracing::info!(address = %address, "Processing wallet analysis request");

    if !validate_eth_address(&address) {
        return Err(AppError::InvalidAddress(address));
    }

    let features = extract_value(&request.activity);
    let result = classify(&features)?;

    // The bio only needs holdings context, so an unreadable record just means a bare template
    let record = WalletActivityRecord::deserialize(&request.activity).unwrap_or_default();
    let bio = state.bio.generate(&record, &result);
    let recommendations = *recommendations_for(result.persona);

    let duration = start.elapsed().as_millis();
    tracing::info!(
        address = %address,
        persona = %result.persona,
        confidence = result.confidence,
        risk_score = result.risk_score,
        health_score = result.health_score,
        duration_ms = %duration,
        "Wallet analysis completed"
    );

    Ok(Json(AnalyzeResponse::new(address, result, recommendations, bio)))
}

pub async fn list_personas() -> Json<PersonasResponse> {
    let personas = PersonaType::ALL
        .iter()
        .map(|persona| PersonaInfo {
            persona: *persona,
            slug: persona.slug(),
            recommendations: *recommendations_for(*persona),
        })
        .collect();

    Json(PersonasResponse { personas })
}

pub async fn get_recommendations(
    Path(persona): Path<String>,
) -> AppResult<Json<PersonaInfo>> {
    tracing::debug!(persona = %persona, "Processing recommendations request");

    let persona: PersonaType = persona.parse()?;

    Ok(Json(PersonaInfo {
        persona,
        slug: persona.slug(),
        recommendations: *recommendations_for(persona),
    }))
}
