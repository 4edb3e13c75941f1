//! Anthropic Messages API client.
//!
//! The conversation driver talks to the model through the [`ModelClient`]
//! trait so tests can substitute scripted responses.

mod types;

pub use types::{
    ContentBlock, Message, MessageContent, MessagesRequest, MessagesResponse, Role, StopReason,
    ToolChoice, ToolDefinition,
};

use crate::error::{KursError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

/// Default timeout for model API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Default API host.
const DEFAULT_HOST: &str = "https://api.anthropic.com";

/// Trait for issuing Messages API requests.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Issue a single model request and return the parsed response.
    async fn create_message(&self, request: &MessagesRequest) -> Result<MessagesResponse>;
}

/// Production client for the Anthropic Messages API.
pub struct AnthropicClient {
    http: reqwest::Client,
    host: String,
    api_key: String,
}

impl AnthropicClient {
    /// Create a client with the default host and timeout.
    pub fn new(api_key: &str) -> Self {
        Self::with_host(api_key, DEFAULT_HOST)
    }

    /// Create a client against a custom host (used by tests).
    pub fn with_host(api_key: &str, host: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            host: host.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    async fn create_message(&self, request: &MessagesRequest) -> Result<MessagesResponse> {
        let url = format!("{}/v1/messages", self.host);

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(KursError::Api(format!("{} - {}", status, body)))
            }
        }
    }
}
