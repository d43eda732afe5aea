//! The remix pipeline: cached table → selector → composer → completion.

use chat_completion::{ChatClient, ClientConfig};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::TableCache;
use crate::config::Config;
use crate::credentials::{CompletionCredentials, StoreCredentials};
use crate::error::Result;
use crate::prompt::{PromptComposer, PromptVariant, Style, Topic};
use crate::record::{ActionRecord, Table};
use crate::script::{self, ChatBackend, CompletionBackend, ScriptOutcome, Unconfigured};
use crate::selector::{self, DifficultyFilter};
use crate::store::AirtableStore;

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RemixRequest {
    pub topic: String,
    pub style: Style,
    pub difficulty: DifficultyFilter,
}

impl RemixRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_difficulty(mut self, difficulty: DifficultyFilter) -> Self {
        self.difficulty = difficulty;
        self
    }
}

/// Everything a remix produces short of the completion call.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub record: ActionRecord,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Remix {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub record: ActionRecord,
    pub prompt: String,
    pub script: ScriptOutcome,
}

// ---------------------------------------------------------------------------
// Remixer
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct Remixer {
    cache: Arc<TableCache>,
    backend: Arc<dyn CompletionBackend>,
    composer: PromptComposer,
    max_topic_chars: usize,
}

impl std::fmt::Debug for Remixer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Remixer")
            .field("cache", &self.cache)
            .field("model", &self.backend.model())
            .field("composer", &self.composer)
            .field("max_topic_chars", &self.max_topic_chars)
            .finish()
    }
}

impl Remixer {
    pub fn new(
        cache: Arc<TableCache>,
        backend: Arc<dyn CompletionBackend>,
        composer: PromptComposer,
        max_topic_chars: usize,
    ) -> Self {
        Self {
            cache,
            backend,
            composer,
            max_topic_chars,
        }
    }

    /// Wire the Airtable store and chat backend described by `config`.
    pub fn from_config(
        config: &Config,
        store_credentials: StoreCredentials,
        completion_credentials: CompletionCredentials,
    ) -> Result<Self> {
        let CompletionCredentials { api_key, base_url } = completion_credentials;
        let client_config = ClientConfig::for_provider(config.completion.provider, api_key)
            .with_base_url(config.completion.effective_base_url(base_url.as_deref()))
            .with_timeout(config.completion.timeout());
        let client = ChatClient::new(client_config)?;
        tracing::debug!(endpoint = client.endpoint(), "completion client ready");

        let backend = ChatBackend::new(
            client,
            config.completion.effective_model(),
            config.temperature(),
        );
        Self::with_backend(config, store_credentials, Arc::new(backend))
    }

    /// Like [`Remixer::from_config`] but without a completion key: drawing
    /// and previewing work, generation reports the missing secret.
    pub fn without_completion(config: &Config, store_credentials: StoreCredentials) -> Result<Self> {
        let backend = Unconfigured::new(config.completion.effective_model());
        Self::with_backend(config, store_credentials, Arc::new(backend))
    }

    fn with_backend(
        config: &Config,
        store_credentials: StoreCredentials,
        backend: Arc<dyn CompletionBackend>,
    ) -> Result<Self> {
        let store = AirtableStore::new(
            config.store.api_url.as_str(),
            store_credentials,
            config.store.timeout(),
        )?;
        Ok(Self::new(
            Arc::new(TableCache::new(Arc::new(store), config.cache.ttl())),
            backend,
            PromptComposer::new(config.prompt.variant),
            config.prompt.max_topic_chars,
        ))
    }

    pub fn variant(&self) -> PromptVariant {
        self.composer.variant
    }

    pub fn max_topic_chars(&self) -> usize {
        self.max_topic_chars
    }

    pub fn model(&self) -> &str {
        self.backend.model()
    }

    /// The current cached table.
    pub async fn table(&self) -> Result<Table> {
        self.cache.get().await
    }

    /// Force a refetch of the table.
    pub async fn refresh(&self) -> Result<Table> {
        self.cache.refresh().await
    }

    pub async fn draw<R: Rng + ?Sized>(
        &self,
        filter: &DifficultyFilter,
        rng: &mut R,
    ) -> Result<ActionRecord> {
        let table = self.cache.get().await?;
        selector::select(&table, filter, rng)
    }

    /// Validate, draw and compose without calling the completion backend.
    pub async fn preview<R: Rng + ?Sized>(
        &self,
        request: &RemixRequest,
        rng: &mut R,
    ) -> Result<Preview> {
        let topic = Topic::parse(&request.topic, self.max_topic_chars)?;
        let record = self.draw(&request.difficulty, rng).await?;
        let prompt = self.composer.compose(&record, &topic, request.style);
        Ok(Preview { record, prompt })
    }

    /// Run the full pipeline. A completion failure still returns `Ok`, with
    /// [`ScriptOutcome::Failed`] carrying the message.
    pub async fn remix<R: Rng + ?Sized>(
        &self,
        request: &RemixRequest,
        rng: &mut R,
    ) -> Result<Remix> {
        let Preview { record, prompt } = self.preview(request, rng).await?;
        let id = Uuid::new_v4();
        tracing::info!(%id, record = %record.id, action = %record.name, style = %request.style, "remixing");

        let script = script::generate(self.backend.as_ref(), &prompt).await;

        Ok(Remix {
            id,
            created_at: Utc::now(),
            record,
            prompt,
            script,
        })
    }
}
