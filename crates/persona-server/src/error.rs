use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use persona_core::PersonaError;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Invalid feature vector: {0}")]
    InvalidFeatures(String),

    /// Built by a chain-data provider placed in front of `classify`; the engine never raises it.
    #[error("Upstream data error: {0}")]
    UpstreamData(String),
}

impl From<PersonaError> for AppError {
    fn from(err: PersonaError) -> Self {
        match err {
            PersonaError::InvalidFeatureVector { .. } => AppError::InvalidFeatures(err.to_string()),
            PersonaError::UnknownPersona(name) => AppError::UnknownPersona(name),
            PersonaError::UpstreamData(msg) => AppError::UpstreamData(msg),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidAddress(_) => (StatusCode::BAD_REQUEST, "INVALID_ADDRESS"),
            AppError::UnknownPersona(_) => (StatusCode::NOT_FOUND, "UNKNOWN_PERSONA"),
            AppError::InvalidFeatures(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_FEATURES"),
            AppError::UpstreamData(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_DATA_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        match &self {
            AppError::InvalidAddress(address) => {
                tracing::warn!(address = %address, error_code = code, "Invalid wallet address");
            }
            AppError::UnknownPersona(persona) => {
                tracing::info!(persona = %persona, error_code = code, "Unknown persona requested");
            }
            AppError::InvalidFeatures(msg) => {
                tracing::error!(message = %msg, error_code = code, "Feature vector rejected");
            }
            AppError::UpstreamData(msg) => {
                tracing::error!(message = %msg, error_code = code, "Upstream data error");
            }
        }

        tracing::debug!(
            status_code = %status.as_u16(),
            error_code = %code,
            error_message = %self,
            "Returning error response"
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
