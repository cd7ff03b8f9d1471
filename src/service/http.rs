//! HTTP card service talking JSON to the card backend.

use crate::error::{sanitize_error_message, CardError, Result};
use crate::service::provider::CardService;
use crate::service::types::{BackgroundRequest, BackgroundResponse, CardRequest, CardResponse};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "CARDGEN_BASE_URL";

/// Base URL used when neither the builder nor the environment provides one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

const GENERATE_BACKGROUND_PATH: &str = "/api/generate-background";
const CREATE_CARD_PATH: &str = "/api/create-card";

/// Builder for HttpCardService.
#[derive(Debug, Clone, Default)]
pub struct HttpCardServiceBuilder {
    base_url: Option<String>,
    client: Option<reqwest::Client>,
}

impl HttpCardServiceBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the backend base URL. Falls back to `CARDGEN_BASE_URL`, then `http://localhost:8080`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Uses a preconfigured reqwest client (proxies, TLS roots, ...).
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the service, resolving and validating the base URL.
    pub fn build(self) -> Result<HttpCardService> {
        let base_url = self
            .base_url
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|e| CardError::Config(format!("invalid base URL {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CardError::Config(format!(
                "base URL must be http or https, got {:?}",
                parsed.scheme()
            )));
        }

        Ok(HttpCardService {
            client: self.client.unwrap_or_default(),
            base_url,
        })
    }
}

/// Card service backed by the card backend's JSON API.
#[derive(Debug, Clone)]
pub struct HttpCardService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCardService {
    /// Creates a new `HttpCardServiceBuilder`.
    pub fn builder() -> HttpCardServiceBuilder {
        HttpCardServiceBuilder::new()
    }

    /// Returns the resolved base URL (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Posts `body` as JSON and decodes the JSON answer.
    ///
    /// The backend answers with a `{ success, error }` body on 4xx/5xx too,
    /// so the body is decoded regardless of status. Only an undecodable
    /// error body turns into [`CardError::Api`].
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let start = Instant::now();
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "sending card backend request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            duration_ms = start.elapsed().as_millis() as u64,
            "card backend responded"
        );

        match serde_json::from_str::<R>(&text) {
            Ok(decoded) => Ok(decoded),
            Err(e) if status.is_success() => Err(e.into()),
            Err(_) => Err(CardError::Api {
                status: status.as_u16(),
                message: sanitize_error_message(&text),
            }),
        }
    }
}

#[async_trait]
impl CardService for HttpCardService {
    async fn generate_background(&self, prompt: &str) -> Result<BackgroundResponse> {
        let body = BackgroundRequest {
            prompt: prompt.to_string(),
        };
        self.post_json(GENERATE_BACKGROUND_PATH, &body).await
    }

    async fn create_card(&self, background_url: &str, message: &str) -> Result<CardResponse> {
        let body = CardRequest {
            background_url: background_url.to_string(),
            message: message.to_string(),
        };
        self.post_json(CREATE_CARD_PATH, &body).await
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}
