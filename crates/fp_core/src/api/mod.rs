//! Card API client
//!
//! The card generator runs as a separate HTTP service. This module holds the
//! wire models for its endpoints and the [`CardApi`] seam the planner talks
//! through, so the controller can be driven by a fake in tests.

pub mod create;
pub mod http;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{CardImage, CardMetadata};

pub use create::{CardValidationError, CreateCardRequest};
pub use http::HttpCardApi;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Invalid card data: {0}")]
    Invalid(#[from] CardValidationError),
}

impl ApiError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            ApiError::Http(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            ApiError::Rejected(_) => false,
            ApiError::Invalid(_) => true,
        }
    }
}

/// One card in a list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEntry {
    #[serde(rename = "imageData")]
    pub image_data: CardImage,
    /// Left as raw JSON: a malformed record must not sink the whole list.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl CardEntry {
    /// Metadata as JSON text, the form a drag payload carries.
    pub fn metadata_json(&self) -> Option<String> {
        match &self.metadata {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => Some(value.to_string()),
        }
    }

    pub fn parsed_metadata(&self) -> Option<CardMetadata> {
        self.metadata
            .as_ref()
            .filter(|v| !v.is_null())
            .and_then(|v| CardMetadata::deserialize(v).ok())
    }
}

/// Body of `get-cards` and `random-players`.
#[derive(Debug, Clone, Deserialize)]
pub struct CardListResponse {
    pub success: bool,
    #[serde(default)]
    pub cards: Vec<CardEntry>,
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `create-card`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCardResponse {
    pub success: bool,
    #[serde(default, rename = "imageData")]
    pub image_data: Option<CardImage>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A freshly generated card.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedCard {
    pub image: CardImage,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub version: String,
}

/// Everything the planner needs from the card service.
pub trait CardApi {
    /// Cards available for the sidebar, newest first.
    fn get_cards(&self) -> Result<Vec<CardEntry>, ApiError>;

    /// A random selection of up to `count` stored players.
    fn random_players(&self, count: usize) -> Result<Vec<CardEntry>, ApiError>;

    fn create_card(&self, request: &CreateCardRequest) -> Result<CreatedCard, ApiError>;

    fn health(&self) -> Result<HealthResponse, ApiError>;
}

impl CardListResponse {
    pub(crate) fn into_cards(self) -> Result<Vec<CardEntry>, ApiError> {
        if self.success {
            Ok(self.cards)
        } else {
            Err(ApiError::Rejected(self.error.unwrap_or_else(|| "card list unavailable".into())))
        }
    }
}

impl CreateCardResponse {
    pub(crate) fn into_created(self) -> Result<CreatedCard, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.error.unwrap_or_else(|| "card creation failed".into()),
            ));
        }
        let image = self
            .image_data
            .ok_or_else(|| ApiError::Rejected("response carried no image".into()))?;
        Ok(CreatedCard { image, filename: self.filename.unwrap_or_default() })
    }
}
