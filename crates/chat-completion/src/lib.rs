//! `chat-completion`: minimal client for OpenAI-compatible chat-completion APIs.
//!
//! Covers exactly what the remix pipeline needs: a single blocking-style
//! request/response round trip, typed request and response bodies, and
//! endpoint presets for the providers the tool is deployed against.
//!
//! # Architecture
//!
//! ```text
//! ClientConfig (api key, base URL, timeout)
//!     │
//!     ▼
//! ChatClient      ← POST {base_url}/chat/completions, bearer auth
//!     │
//!     ▼
//! ChatResponse    ← choices[0].message.content is the answer
//! ```
//!
//! # Quick start
//!
//! ```rust,ignore
//! use chat_completion::{ChatClient, ChatRequest, ClientConfig, Provider};
//!
//! let client = ChatClient::new(ClientConfig::for_provider(Provider::DeepSeek, key))?;
//! let request = ChatRequest::single_user("deepseek-chat", "写一个闪剧脚本").with_temperature(0.9);
//! let text = client.first_choice_text(&request).await?;
//! ```

pub mod client;
pub mod error;
pub mod provider;
pub mod types;


pub use client::{ChatClient, ClientConfig};
pub use error::ChatError;
pub use provider::Provider;
pub use types::{ChatMessage, ChatRequest, ChatResponse, Choice, ResponseMessage, Role, Usage};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ChatError>;
