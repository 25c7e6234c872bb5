//! Gemini HTTP client

use super::types::ApiError;
use crate::{GatewayError, GatewayResult};
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;

pub(crate) const PROVIDER_ID: &str = "gemini";

/// Default public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model for structured execution updates.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub request_timeout: Duration,
}

impl GeminiConfig {
    /// Defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: api_key.into(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Gemini API client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client.
    ///
    /// # Errors
    /// `GatewayError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                GatewayError::transport(PROVIDER_ID, None, format!("HTTP client setup failed: {}", e))
            })?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` to `endpoint` and decode the JSON reply.
    ///
    /// Network failures, non-success statuses and undecodable bodies are all
    /// transport errors. An error body's message is surfaced when present.
    pub async fn request<Req: Serialize, Res: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &Req,
    ) -> GatewayResult<Res> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                GatewayError::transport(PROVIDER_ID, None, format!("HTTP request failed: {}", e))
            })?;

        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                GatewayError::transport(
                    PROVIDER_ID,
                    Some(status.as_u16()),
                    format!("Failed to parse response: {}", e),
                )
            })
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let error_msg = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => api_error.error.message,
                Err(_) => error_text,
            };

            Err(GatewayError::transport(
                PROVIDER_ID,
                Some(status.as_u16()),
                error_msg,
            ))
        }
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_api_key() {
        let config = GeminiConfig::new("secret-key");
        assert!(!format!("{:?}", config).contains("secret-key"));
        let client = GeminiClient::new(&config).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = GeminiConfig::new("k").with_base_url("http://localhost:9000/v1beta/");
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000/v1beta");
    }

    #[test]
    fn test_defaults() {
        let config = GeminiConfig::new("k");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, DEFAULT_TIMEOUT);
    }
}
