use thiserror::Error;

use crate::api::ApiError;
use crate::api::create::CardValidationError;
use crate::board::BoardError;
use crate::export::ExportError;
use crate::storage::StoreError;

/// Crate-wide error. Each concern keeps its own enum and converts into this one.
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Validation(#[from] CardValidationError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown formation: {0}")]
    UnknownFormation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PlannerError {
    /// Whether the UI can stay on the current screen and offer a retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            PlannerError::Api(err) => err.is_recoverable(),
            PlannerError::Store(err) => err.is_recoverable(),
            PlannerError::Board(_) => true,
            PlannerError::Export(_) => true,
            PlannerError::Validation(_) => true,
            PlannerError::Config(_) => false,
            PlannerError::UnknownFormation(_) => false,
            PlannerError::Serialization(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
