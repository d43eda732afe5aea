//! Record store client: lists every row of the action table.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::credentials::StoreCredentials;
use crate::error::{RemixError, Result};
use crate::record::{ActionRecord, Table};

pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// Airtable's maximum page size for list requests.
const PAGE_SIZE: u32 = 100;

/// Source of the action table.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch every row currently in the table, normalized to [`ActionRecord`].
    async fn fetch_all(&self) -> Result<Table>;
}

// ---------------------------------------------------------------------------
// AirtableStore
// ---------------------------------------------------------------------------

/// [`RecordStore`] backed by the Airtable REST API.
#[derive(Clone)]
pub struct AirtableStore {
    api_url: String,
    credentials: StoreCredentials,
    http: reqwest::Client,
}

impl std::fmt::Debug for AirtableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AirtableStore")
            .field("api_url", &self.api_url)
            .field("base_id", &self.credentials.base_id)
            .field("table_id", &self.credentials.table_id)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl AirtableStore {
    pub fn new(
        api_url: impl Into<String>,
        credentials: StoreCredentials,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemixError::Store {
                status: None,
                message: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            credentials,
            http,
        })
    }

    fn table_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.api_url, self.credentials.base_id, self.credentials.table_id
        )
    }

    async fn fetch_page(&self, offset: Option<&str>) -> Result<ListPage> {
        let mut query: Vec<(&str, String)> = vec![("pageSize", PAGE_SIZE.to_string())];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let response = self
            .http
            .get(self.table_url())
            .header(AUTHORIZATION, format!("Bearer {}", self.credentials.token))
            .query(&query)
            .send()
            .await
            .map_err(|e| RemixError::Store {
                status: e.status().map(|s| s.as_u16()),
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| RemixError::Store {
            status: None,
            message: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            let message = extract_error_message(&body).unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                } else {
                    body.clone()
                }
            });
            return Err(RemixError::Store {
                status: Some(status.as_u16()),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| RemixError::Store {
            status: Some(status.as_u16()),
            message: format!("failed to parse response: {e}"),
        })
    }
}

#[async_trait]
impl RecordStore for AirtableStore {
    async fn fetch_all(&self) -> Result<Table> {
        let mut records = Vec::new();
        let mut offset: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self.fetch_page(offset.as_deref()).await?;
            pages += 1;
            records.extend(
                page.records
                    .into_iter()
                    .map(|row| ActionRecord::from_fields(row.id, &row.fields)),
            );
            match page.offset {
                Some(next) if !next.is_empty() => offset = Some(next),
                _ => break,
            }
        }

        tracing::info!(records = records.len(), pages, "fetched action table");
        Ok(Table::new(records))
    }
}

#[derive(Debug, Deserialize)]
struct ListPage {
    #[serde(default)]
    records: Vec<StoreRow>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoreRow {
    id: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Airtable errors come as `{"error": {"type", "message"}}` or `{"error": "TYPE"}`.
fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<Value>(body).ok()?;
    let error = parsed.get("error")?;
    if let Some(msg) = error.get("message").and_then(Value::as_str) {
        return Some(msg.to_string());
    }
    if let Some(kind) = error.get("type").and_then(Value::as_str) {
        return Some(kind.to_string());
    }
    error.as_str().map(ToOwned::to_owned)
}
