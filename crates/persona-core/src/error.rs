//! Error types for Persona Core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersonaError {
    /// A feature vector reached the engine with a non-finite or out-of-domain value.
    #[error("Invalid feature vector: {field} = {value}")]
    InvalidFeatureVector { field: &'static str, value: f64 },

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    /// Chain-data provider failure, raised by callers before the engine runs.
    #[error("Upstream data error: {0}")]
    UpstreamData(String),
}

pub type PersonaResult<T> = Result<T, PersonaError>;
