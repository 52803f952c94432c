use thiserror::Error;

use models::ModelName;

/// Errors raised by the bundled JSON document store.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unique constraint failed: {0}")]
    UniqueConstraint(String),
    #[error("unknown model: {0}")]
    UnknownModel(ModelName),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(model: &ModelName) -> Self { Self::NotFound(format!("no {} record matches the filter", model)) }

    pub fn storage(err: impl std::fmt::Display) -> Self { Self::Storage(err.to_string()) }
}
