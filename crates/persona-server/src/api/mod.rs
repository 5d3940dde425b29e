pub mod dto;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Analysis
        .route("/api/v1/analyze", post(handlers::analyze_wallet))
        // Recommendation table
        .route("/api/v1/personas", get(handlers::list_personas))
        .route(
            "/api/v1/personas/{persona}/recommendations",
            get(handlers::get_recommendations),
        )
}
