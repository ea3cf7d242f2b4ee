//! In-process store backend.
//!
//! Used by the test suite and for ephemeral deployments. A single `RwLock`
//! over the table is the transaction facility here: every multi-step
//! operation (existence check + insert, read + increment) runs under one
//! lock guard, so the contract's atomicity guarantees hold trivially.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use super::{Mapping, MappingStore, NewMapping};
use crate::errors::{Result, ShortmapError};

#[derive(Default)]
struct Table {
    rows: HashMap<i64, Mapping>,
    by_code: HashMap<String, i64>,
    // Next identity; never decremented, so ids are never reused even after
    // the sweep deletes rows.
    next_id: i64,
}

pub struct MemoryStore {
    table: RwLock<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: HashMap::new(),
                by_code: HashMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MappingStore for MemoryStore {
    async fn insert(&self, new: NewMapping) -> Result<Mapping> {
        let mut table = self.table.write();

        if let Some(code) = &new.code {
            if table.by_code.contains_key(code) {
                return Err(ShortmapError::alias_conflict(format!(
                    "Short code '{}' is already in use",
                    code
                )));
            }
        }

        let id = table.next_id;
        table.next_id += 1;

        let mapping = Mapping {
            id,
            target: new.target,
            code: new.code,
            created_at: new.created_at,
            expires_at: new.expires_at,
            click_count: 0,
        };

        if let Some(code) = &mapping.code {
            table.by_code.insert(code.clone(), id);
        }
        table.rows.insert(id, mapping.clone());

        Ok(mapping)
    }

    async fn update(&self, mapping: &Mapping) -> Result<()> {
        let mut table = self.table.write();

        let Some(existing) = table.rows.get(&mapping.id).cloned() else {
            return Err(ShortmapError::storage_operation(format!(
                "No record with id {}",
                mapping.id
            )));
        };

        if let Some(code) = &mapping.code {
            let owner = table.by_code.get(code).copied();
            if owner.is_some_and(|id| id != mapping.id) {
                return Err(ShortmapError::alias_conflict(format!(
                    "Short code '{}' is already in use",
                    code
                )));
            }
            table.by_code.insert(code.clone(), mapping.id);
        }
        if let Some(old_code) = &existing.code {
            if existing.code != mapping.code {
                table.by_code.remove(old_code);
            }
        }

        table.rows.insert(mapping.id, mapping.clone());
        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>> {
        let table = self.table.read();
        let id = match table.by_code.get(code) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(table.rows.get(&id).cloned())
    }

    async fn increment_click(&self, code: &str, now: DateTime<Utc>) -> Result<Option<Mapping>> {
        let mut table = self.table.write();

        let id = match table.by_code.get(code) {
            Some(id) => *id,
            None => return Ok(None),
        };
        let Some(mapping) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        if mapping.is_expired_at(now) {
            return Ok(None);
        }

        mapping.click_count += 1;
        Ok(Some(mapping.clone()))
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut table = self.table.write();

        let dead: Vec<i64> = table
            .rows
            .values()
            .filter(|m| matches!(m.expires_at, Some(expires_at) if expires_at < cutoff))
            .map(|m| m.id)
            .collect();

        for id in &dead {
            if let Some(removed) = table.rows.remove(id) {
                if let Some(code) = removed.code {
                    table.by_code.remove(&code);
                }
            }
        }

        debug!("MemoryStore: swept {} expired mappings", dead.len());
        Ok(dead.len() as u64)
    }

    async fn backend_name(&self) -> &'static str {
        "memory"
    }
}
