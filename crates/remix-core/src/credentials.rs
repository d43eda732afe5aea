//! Secrets read from the environment. Values never appear in `Debug` output.

use crate::error::{RemixError, Result};

pub const ENV_STORE_TOKEN: &str = "AIRTABLE_TOKEN";
pub const ENV_STORE_BASE_ID: &str = "AIRTABLE_BASE_ID";
pub const ENV_STORE_TABLE_ID: &str = "AIRTABLE_TABLE_ID";
pub const ENV_COMPLETION_KEY: &str = "OPENAI_API_KEY";
pub const ENV_COMPLETION_BASE_URL: &str = "OPENAI_BASE_URL";

#[derive(Clone)]
pub struct StoreCredentials {
    pub token: String,
    pub base_id: String,
    pub table_id: String,
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("token", &"[REDACTED]")
            .field("base_id", &self.base_id)
            .field("table_id", &self.table_id)
            .finish()
    }
}

#[derive(Clone)]
pub struct CompletionCredentials {
    pub api_key: String,
    /// Endpoint override; takes precedence over the configured provider.
    pub base_url: Option<String>,
}

impl std::fmt::Debug for CompletionCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionCredentials")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl StoreCredentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup. Blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            token: required(&lookup, ENV_STORE_TOKEN)?,
            base_id: required(&lookup, ENV_STORE_BASE_ID)?,
            table_id: required(&lookup, ENV_STORE_TABLE_ID)?,
        })
    }
}

impl CompletionCredentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            api_key: required(&lookup, ENV_COMPLETION_KEY)?,
            base_url: optional(&lookup, ENV_COMPLETION_BASE_URL),
        })
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    optional(lookup, key).ok_or_else(|| RemixError::MissingSecret(key.to_string()))
}
