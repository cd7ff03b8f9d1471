//! Card service trait.

use crate::error::Result;
use crate::service::types::{BackgroundResponse, CardResponse};
use async_trait::async_trait;

/// Backend that generates backgrounds and composites cards.
///
/// Implementations return the decoded backend response as-is; an
/// application-level failure (`success: false`) is an `Ok` value; only
/// transport and decoding problems are `Err`.
#[async_trait]
pub trait CardService: Send + Sync {
    /// Asks the backend for a background image matching `prompt`.
    async fn generate_background(&self, prompt: &str) -> Result<BackgroundResponse>;

    /// Asks the backend to composite `message` onto the background.
    async fn create_card(&self, background_url: &str, message: &str) -> Result<CardResponse>;

    /// Returns the name of this service for display.
    fn name(&self) -> &str {
        "card service"
    }
}

