//! Wire types for the background-generation and card-assembly endpoints.

use crate::error::{CardError, Result};
use serde::{Deserialize, Serialize};

/// Reason surfaced when the backend fails without saying why.
const UNKNOWN_ERROR: &str = "unknown error";

/// Body of `POST /api/generate-background`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundRequest {
    /// Free-text description of the desired background.
    pub prompt: String,
}

/// Response of `POST /api/generate-background`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundResponse {
    /// Whether the backend produced an image.
    pub success: bool,
    /// Reference to the generated background (usually a data URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Human-readable failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackgroundResponse {
    /// Builds a successful response.
    pub fn ok(image_url: impl Into<String>) -> Self {
        Self {
            success: true,
            image_url: Some(image_url.into()),
            error: None,
        }
    }

    /// Builds a failed response.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            image_url: None,
            error: Some(error.into()),
        }
    }

    /// Resolves the response into the background reference or a [`CardError::Service`].
    pub fn into_result(self) -> Result<String> {
        resolve(self.success, self.image_url, self.error, "image")
    }
}

/// Body of `POST /api/create-card`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRequest {
    /// Background reference from a prior generation.
    pub background_url: String,
    /// Message to composite onto the background.
    pub message: String,
}

/// Response of `POST /api/create-card`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardResponse {
    /// Whether the backend produced a card.
    pub success: bool,
    /// Reference to the finished card (usually a data URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_url: Option<String>,
    /// Human-readable failure reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CardResponse {
    /// Builds a successful response.
    pub fn ok(card_url: impl Into<String>) -> Self {
        Self {
            success: true,
            card_url: Some(card_url.into()),
            error: None,
        }
    }

    /// Builds a failed response.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            card_url: None,
            error: Some(error.into()),
        }
    }

    /// Resolves the response into the card reference or a [`CardError::Service`].
    pub fn into_result(self) -> Result<String> {
        resolve(self.success, self.card_url, self.error, "card")
    }
}

fn resolve(
    success: bool,
    reference: Option<String>,
    error: Option<String>,
    what: &str,
) -> Result<String> {
    if !success {
        let reason = error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
        return Err(CardError::Service(reason));
    }
    match reference {
        Some(r) if !r.is_empty() => Ok(r),
        _ => Err(CardError::Service(format!(
            "backend reported success but returned no {what}"
        ))),
    }
}
