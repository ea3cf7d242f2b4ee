use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::error;

use crate::config::get_config;
use crate::errors::{Result, ShortmapError};

pub mod memory;
pub mod models;
pub mod sqlite;

pub use models::{Mapping, NewMapping};

/// Narrow contract the lifecycle layer holds against the record store.
///
/// Uniqueness of `code` is the store's own constraint; a violation on insert
/// surfaces as `AliasConflict` so the constraint stays the final arbiter of
/// the check-then-insert race.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Persist a new record, assigning a monotonically increasing id that is
    /// never reused. Returns the full record with `click_count == 0`.
    async fn insert(&self, new: NewMapping) -> Result<Mapping>;

    /// Persist the mutable fields of an existing record.
    async fn update(&self, mapping: &Mapping) -> Result<()>;

    /// Look up by short code. Records with no code assigned never match.
    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>>;

    /// Transactional resolve primitive: in one atomic step, look up by code,
    /// return `None` if the record is absent or already expired at `now`,
    /// otherwise add exactly 1 to its click count, persist, and return the
    /// updated record. Concurrent calls must never lose an increment.
    async fn increment_click(&self, code: &str, now: DateTime<Utc>) -> Result<Option<Mapping>>;

    /// Bulk-delete every record whose expiry is set and strictly before
    /// `cutoff`. Returns the number of deleted rows.
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64>;

    async fn backend_name(&self) -> &'static str;
}

pub struct StoreFactory;

impl StoreFactory {
    pub async fn create() -> Result<Arc<dyn MappingStore>> {
        let config = get_config();
        let backend = config.storage.backend.as_str();

        match backend {
            "sqlite" => {
                let store = sqlite::SqliteStore::open(&config.storage.database_url)?;
                Ok(Arc::new(store) as Arc<dyn MappingStore>)
            }
            "memory" => Ok(Arc::new(memory::MemoryStore::new()) as Arc<dyn MappingStore>),
            _ => {
                error!("Unknown storage backend: {}", backend);
                Err(ShortmapError::storage_backend_not_found(format!(
                    "Unknown storage backend: {}. Supported: sqlite, memory",
                    backend
                )))
            }
        }
    }
}
