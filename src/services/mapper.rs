//! Mapping lifecycle service.
//!
//! Owns the create / resolve / stats / sweep operations against the record
//! store, and delegates code allocation to [`crate::codec`]. This is the
//! whole business-logic layer; HTTP concerns stay in `api`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::codec::{encode_id, is_valid_alias, MAX_ALIAS_LEN};
use crate::errors::{Result, ShortmapError};
use crate::storage::{Mapping, MappingStore, NewMapping};
use crate::utils::validate_url;

/// Request to create a new mapping.
#[derive(Debug, Clone)]
pub struct CreateMappingRequest {
    /// Target URL to shorten.
    pub target: String,
    /// Caller-chosen short code. `None` means derive one from the record id.
    pub alias: Option<String>,
    /// Hours until expiry. `None` means the mapping never expires.
    pub ttl_hours: Option<i64>,
}

pub struct MapperService {
    store: Arc<dyn MappingStore>,
}

impl MapperService {
    pub fn new(store: Arc<dyn MappingStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> Arc<dyn MappingStore> {
        self.store.clone()
    }

    /// Create a mapping and return the persisted record, code assigned.
    pub async fn create(&self, req: CreateMappingRequest) -> Result<Mapping> {
        validate_url(&req.target)
            .map_err(|e| ShortmapError::validation(e.to_string()))?;

        let created_at = Utc::now();
        let expires_at = match req.ttl_hours {
            Some(hours) if hours > 0 => {
                // Checked arithmetic: a huge TTL is bad input, not a panic
                let expires_at = Duration::try_hours(hours)
                    .and_then(|ttl| created_at.checked_add_signed(ttl))
                    .ok_or_else(|| {
                        ShortmapError::validation(format!(
                            "ttlHours {} puts the expiry out of range",
                            hours
                        ))
                    })?;
                Some(expires_at)
            }
            Some(hours) => {
                return Err(ShortmapError::validation(format!(
                    "ttlHours must be a positive integer, got {}",
                    hours
                )));
            }
            None => None,
        };

        match req.alias.filter(|a| !a.is_empty()) {
            Some(alias) => self.create_with_alias(req.target, alias, created_at, expires_at).await,
            None => self.create_with_derived_code(req.target, created_at, expires_at).await,
        }
    }

    /// Custom-alias path: one insert, code known up front. The existence
    /// check gives the friendly error; the store's uniqueness constraint
    /// settles the race when two callers pass the check at once.
    async fn create_with_alias(
        &self,
        target: String,
        alias: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Mapping> {
        if !is_valid_alias(&alias) {
            return Err(ShortmapError::validation(format!(
                "Invalid alias '{}'. Up to {} characters from [0-9a-zA-Z]",
                alias, MAX_ALIAS_LEN
            )));
        }

        if self.store.find_by_code(&alias).await?.is_some() {
            return Err(ShortmapError::alias_conflict(format!(
                "Alias '{}' is already in use",
                alias
            )));
        }

        let mapping = self
            .store
            .insert(NewMapping {
                target,
                code: Some(alias),
                created_at,
                expires_at,
            })
            .await?;

        info!(
            "MapperService: created '{}' -> '{}' (custom alias)",
            mapping.code.as_deref().unwrap_or_default(),
            mapping.target
        );
        Ok(mapping)
    }

    /// Auto path: two-phase write. The code is a function of the
    /// store-assigned id, so the record is inserted codeless first, then
    /// patched. A crash between the phases leaves a codeless row; it never
    /// matches a lookup, so it is harmless garbage rather than a broken link.
    ///
    /// A custom alias may already occupy `encode_id(id)` for some later id;
    /// when that id comes up, the phase-two write hits the uniqueness
    /// constraint and this returns `AliasConflict`, leaving one more
    /// codeless row behind. Accepted rather than retried: aliases and
    /// derived codes share one namespace, and a retry would need a fresh
    /// insert anyway.
    async fn create_with_derived_code(
        &self,
        target: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Mapping> {
        let mut mapping = self
            .store
            .insert(NewMapping {
                target,
                code: None,
                created_at,
                expires_at,
            })
            .await?;

        let code = encode_id(mapping.id as u64);
        debug!("MapperService: id {} encodes to '{}'", mapping.id, code);

        mapping.code = Some(code);
        self.store.update(&mapping).await?;

        info!(
            "MapperService: created '{}' -> '{}'",
            mapping.code.as_deref().unwrap_or_default(),
            mapping.target
        );
        Ok(mapping)
    }

    /// Resolve a short code to its target URL, counting the click.
    ///
    /// Expired mappings are indistinguishable from missing ones here; the
    /// store's `increment_click` performs the lookup, expiry check,
    /// increment and persist as one atomic unit, so concurrent resolves
    /// never lose an update and a failed resolve never counts.
    pub async fn resolve(&self, code: &str) -> Result<String> {
        match self.store.increment_click(code, Utc::now()).await? {
            Some(mapping) => Ok(mapping.target),
            None => Err(ShortmapError::not_found(format!(
                "URL not found for short code: {}",
                code
            ))),
        }
    }

    /// Pure read. Expired mappings ARE still reported here: expiration
    /// affects resolution, not introspection.
    pub async fn stats(&self, code: &str) -> Result<Mapping> {
        match self.store.find_by_code(code).await? {
            Some(mapping) => Ok(mapping),
            None => Err(ShortmapError::not_found(format!(
                "No statistics found for short code: {}",
                code
            ))),
        }
    }

    /// Bulk-delete every mapping expired strictly before `now`; returns the
    /// count. Idempotent, and safe to run concurrently with resolves: only
    /// records that already fail the expiry check are touched.
    pub async fn expire_sweep(&self, now: DateTime<Utc>) -> Result<u64> {
        let deleted = self.store.delete_expired_before(now).await?;

        if deleted > 0 {
            info!("MapperService: swept {} expired mappings", deleted);
        } else {
            debug!("MapperService: no expired mappings to sweep");
        }
        Ok(deleted)
    }
}
