//! Time-boxed memoization of the record store fetch.
//!
//! The slot is guarded by an async mutex that stays held for the duration of
//! a refresh, so callers arriving during a miss wait for the one in-flight
//! fetch instead of issuing their own.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::Result;
use crate::record::Table;
use crate::store::RecordStore;

pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

struct CachedTable {
    table: Table,
    fetched_at: Instant,
}

pub struct TableCache {
    store: Arc<dyn RecordStore>,
    ttl: Duration,
    slot: Mutex<Option<CachedTable>>,
}

impl std::fmt::Debug for TableCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableCache")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TableCache {
    pub fn new(store: Arc<dyn RecordStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Return the cached table, fetching it when absent or older than the TTL.
    pub async fn get(&self) -> Result<Table> {
        let mut slot = self.slot.lock().await;
        if let Some(cached) = slot.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                tracing::debug!(records = cached.table.len(), "table cache hit");
                return Ok(cached.table.clone());
            }
            tracing::debug!("table cache expired");
        }
        self.fill(&mut slot).await
    }

    /// Fetch unconditionally and replace the cached table.
    pub async fn refresh(&self) -> Result<Table> {
        let mut slot = self.slot.lock().await;
        self.fill(&mut slot).await
    }

    // Errors leave the slot untouched: a failed refresh is never cached.
    async fn fill(&self, slot: &mut Option<CachedTable>) -> Result<Table> {
        tracing::debug!("table cache miss, fetching from store");
        let table = self.store.fetch_all().await?;
        *slot = Some(CachedTable {
            table: table.clone(),
            fetched_at: Instant::now(),
        });
        Ok(table)
    }
}
