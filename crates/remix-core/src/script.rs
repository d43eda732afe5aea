//! Completion boundary: turns a composed prompt into a script, or a labelled
//! failure the caller can show and retry.

use async_trait::async_trait;
use chat_completion::{ChatClient, ChatRequest};
use serde::{Deserialize, Serialize};

use crate::credentials::ENV_COMPLETION_KEY;
use crate::error::{RemixError, Result};

/// Anything that can answer a single-message completion.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Model name, for display.
    fn model(&self) -> &str;
}

/// [`CompletionBackend`] over an OpenAI-compatible chat endpoint.
#[derive(Debug, Clone)]
pub struct ChatBackend {
    client: ChatClient,
    model: String,
    temperature: f32,
}

impl ChatBackend {
    pub fn new(client: ChatClient, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
        }
    }
}

#[async_trait]
impl CompletionBackend for ChatBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request =
            ChatRequest::single_user(&self.model, prompt).with_temperature(self.temperature);
        Ok(self.client.first_choice_text(&request).await?)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Stand-in for when no completion key is configured. Every call fails with
/// [`RemixError::MissingSecret`].
#[derive(Debug, Clone)]
pub struct Unconfigured {
    model: String,
}

impl Unconfigured {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }
}

#[async_trait]
impl CompletionBackend for Unconfigured {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(RemixError::MissingSecret(ENV_COMPLETION_KEY.to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScriptOutcome {
    Written { text: String },
    Failed { message: String },
}

impl ScriptOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            ScriptOutcome::Written { text } => Some(text),
            ScriptOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ScriptOutcome::Written { .. } => None,
            ScriptOutcome::Failed { message } => Some(message),
        }
    }
}

/// Ask `backend` for a script. Never fails: errors become [`ScriptOutcome::Failed`].
pub async fn generate(backend: &dyn CompletionBackend, prompt: &str) -> ScriptOutcome {
    match backend.complete(prompt).await {
        Ok(text) => ScriptOutcome::Written { text },
        Err(e) => {
            tracing::warn!(model = backend.model(), error = %e, "script generation failed");
            ScriptOutcome::Failed {
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_completion::{ClientConfig, Provider};
    use mockito::Matcher;

    struct FixedBackend(std::result::Result<String, String>);

    #[async_trait]
    impl CompletionBackend for FixedBackend {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.0.clone().map_err(RemixError::Completion)
        }

        fn model(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn success_returns_text_verbatim() {
        let backend = FixedBackend(Ok("### 🎬 剧名：催婚泰坦尼克\n".into()));
        let outcome = generate(&backend, "prompt").await;
        assert_eq!(outcome.text(), Some("### 🎬 剧名：催婚泰坦尼克\n"));
        assert!(matches!(outcome, ScriptOutcome::Written { .. }));
    }

    #[tokio::test]
    async fn transport_failure_is_labelled_not_fatal() {
        let backend = FixedBackend(Err("connection reset".into()));
        let outcome = generate(&backend, "prompt").await;
        assert!(matches!(outcome, ScriptOutcome::Failed { .. }));
        assert_eq!(outcome.text(), None);
        let message = outcome.error().unwrap();
        assert!(message.contains("connection reset"));
        assert!(message.starts_with("completion request failed"));
    }

    #[tokio::test]
    async fn unconfigured_backend_names_the_missing_key() {
        let outcome = generate(&Unconfigured::new("deepseek-chat"), "prompt").await;
        assert!(outcome.error().unwrap().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(ScriptOutcome::Failed {
            message: "boom".into(),
        })
        .unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["message"], "boom");
    }

    #[tokio::test]
    async fn chat_backend_sends_model_and_temperature() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "deepseek-chat",
                "temperature": 0.9,
                "messages": [{"role": "user", "content": "写一个闪剧"}]
            })))
            .with_status(200)
            .with_body(
                r#"{"id":"c1","model":"deepseek-chat","choices":[{"index":0,"message":{"role":"assistant","content":"脚本"},"finish_reason":"stop"}]}"#,
            )
            .create_async()
            .await;

        let client = ChatClient::new(
            ClientConfig::for_provider(Provider::DeepSeek, "sk-test").with_base_url(server.url()),
        )
        .unwrap();
        let backend = ChatBackend::new(client, "deepseek-chat", 0.9);
        let outcome = generate(&backend, "写一个闪剧").await;

        assert_eq!(outcome.text(), Some("脚本"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn chat_backend_api_error_becomes_failed_outcome() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(402)
            .with_body(r#"{"error":{"message":"Insufficient Balance","type":"unknown_error"}}"#)
            .create_async()
            .await;

        let client = ChatClient::new(
            ClientConfig::for_provider(Provider::DeepSeek, "sk-test").with_base_url(server.url()),
        )
        .unwrap();
        let backend = ChatBackend::new(client, "deepseek-chat", 0.9);
        let outcome = generate(&backend, "p").await;

        assert!(outcome.error().unwrap().contains("Insufficient Balance"));
    }
}
