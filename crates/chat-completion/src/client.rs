use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::types::{ChatRequest, ChatResponse};
use crate::{ChatError, Provider, Result};

const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ─── ClientConfig ─────────────────────────────────────────────────────────

/// Connection settings for a [`ChatClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    /// Base URL without the trailing `/chat/completions`.
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Settings for a provider preset's public endpoint.
    pub fn for_provider(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: provider.base_url().to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ─── ChatClient ───────────────────────────────────────────────────────────

/// HTTP client for an OpenAI-compatible `chat/completions` endpoint.
///
/// One call is one request: no retries, no streaming.
#[derive(Clone)]
pub struct ChatClient {
    endpoint: String,
    api_key: String,
    http: reqwest::Client,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl ChatClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            endpoint: completions_endpoint(&config.base_url),
            api_key: config.api_key,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one chat-completion request and decode the response.
    pub async fn create(&self, request: &ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(endpoint = %self.endpoint, model = %request.model, "chat completion request");

        let response = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = extract_error_message(&body).unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    body.clone()
                }
            });
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|source| ChatError::Decode { body, source })
    }

    /// Send `request` and return the first choice's text content verbatim.
    pub async fn first_choice_text(&self, request: &ChatRequest) -> Result<String> {
        let response = self.create(request).await?;
        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "chat completion usage"
            );
        }
        response
            .first_text()
            .map(str::to_string)
            .ok_or(ChatError::EmptyChoices)
    }
}

fn completions_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/chat/completions") {
        base.to_string()
    } else {
        format!("{base}/chat/completions")
    }
}

/// Pull a human-readable message out of an OpenAI-style error body:
/// `{"error": {"message": "..."}}`, `{"error": "..."}` or `{"message": "..."}`.
fn extract_error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok()?;
    let error = parsed.get("error");
    if let Some(msg) = error
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
    {
        return Some(msg.to_string());
    }
    if let Some(msg) = error.and_then(|e| e.as_str()) {
        return Some(msg.to_string());
    }
    parsed
        .get("message")
        .and_then(|m| m.as_str())
        .map(ToOwned::to_owned)
}
