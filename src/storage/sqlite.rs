//! Embedded SQLite backend.
//!
//! The connection sits behind a mutex and every trait operation holds it for
//! its full duration, so the multi-step operations (existence check + insert,
//! read + increment) are atomic with respect to each other. The UNIQUE
//! constraint on `short_code` is the final arbiter against racing custom
//! aliases; `AUTOINCREMENT` keeps ids monotonic and never reused.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use tracing::info;

use super::{Mapping, MappingStore, NewMapping};
use crate::errors::{Result, ShortmapError};

pub struct SqliteStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).map_err(|e| {
            ShortmapError::storage_operation(format!("Failed to open database {}: {}", db_path, e))
        })?;

        let store = SqliteStore {
            connection: Arc::new(Mutex::new(conn)),
        };
        store.init_db()?;

        info!("SqliteStore ready, database path: {}", db_path);
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = self.connection.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS mappings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                target_url TEXT NOT NULL,
                short_code TEXT UNIQUE,
                created_at TEXT NOT NULL,
                expires_at TEXT,
                click_count INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        Ok(())
    }

    fn mapping_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Mapping> {
        let created_at: String = row.get(3)?;
        let expires_at: Option<String> = row.get(4)?;

        Ok(Mapping {
            id: row.get(0)?,
            target: row.get(1)?,
            code: row.get(2)?,
            created_at: parse_ts(&created_at).unwrap_or_else(Utc::now),
            expires_at: expires_at.as_deref().and_then(parse_ts),
            click_count: row.get::<_, i64>(5)?.max(0) as u64,
        })
    }

    fn is_unique_violation(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
        )
    }
}

const SELECT_COLUMNS: &str =
    "id, target_url, short_code, created_at, expires_at, click_count";

fn parse_ts(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[async_trait]
impl MappingStore for SqliteStore {
    async fn insert(&self, new: NewMapping) -> Result<Mapping> {
        let conn = self.connection.lock().unwrap();

        let created_at = new.created_at.to_rfc3339();
        let expires_at = new.expires_at.map(|dt| dt.to_rfc3339());

        let inserted = conn.execute(
            "INSERT INTO mappings (target_url, short_code, created_at, expires_at, click_count)
             VALUES (?1, ?2, ?3, ?4, 0)",
            params![new.target, new.code, created_at, expires_at],
        );

        if let Err(err) = inserted {
            if Self::is_unique_violation(&err) {
                return Err(ShortmapError::alias_conflict(format!(
                    "Short code '{}' is already in use",
                    new.code.as_deref().unwrap_or_default()
                )));
            }
            return Err(ShortmapError::storage_operation(format!(
                "Failed to insert mapping: {}",
                err
            )));
        }

        Ok(Mapping {
            id: conn.last_insert_rowid(),
            target: new.target,
            code: new.code,
            created_at: new.created_at,
            expires_at: new.expires_at,
            click_count: 0,
        })
    }

    async fn update(&self, mapping: &Mapping) -> Result<()> {
        let conn = self.connection.lock().unwrap();

        let expires_at = mapping.expires_at.map(|dt| dt.to_rfc3339());

        let rows = conn
            .execute(
                "UPDATE mappings
                 SET target_url = ?2, short_code = ?3, expires_at = ?4, click_count = ?5
                 WHERE id = ?1",
                params![
                    mapping.id,
                    mapping.target,
                    mapping.code,
                    expires_at,
                    mapping.click_count as i64
                ],
            )
            .map_err(|err| {
                if Self::is_unique_violation(&err) {
                    ShortmapError::alias_conflict(format!(
                        "Short code '{}' is already in use",
                        mapping.code.as_deref().unwrap_or_default()
                    ))
                } else {
                    ShortmapError::storage_operation(format!("Failed to update mapping: {}", err))
                }
            })?;

        if rows == 0 {
            return Err(ShortmapError::storage_operation(format!(
                "No record with id {}",
                mapping.id
            )));
        }
        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Mapping>> {
        let conn = self.connection.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM mappings WHERE short_code = ?1",
            SELECT_COLUMNS
        ))?;

        let mapping = stmt
            .query_row(params![code], Self::mapping_from_row)
            .optional()
            .map_err(|e| {
                ShortmapError::storage_operation(format!("Failed to query mapping: {}", e))
            })?;

        Ok(mapping)
    }

    async fn increment_click(&self, code: &str, now: DateTime<Utc>) -> Result<Option<Mapping>> {
        // The lock is held across the read and the write, which is what makes
        // the read-check-increment-write sequence atomic per call.
        let conn = self.connection.lock().unwrap();

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM mappings WHERE short_code = ?1",
            SELECT_COLUMNS
        ))?;
        let mapping = stmt
            .query_row(params![code], Self::mapping_from_row)
            .optional()
            .map_err(|e| {
                ShortmapError::storage_operation(format!("Failed to query mapping: {}", e))
            })?;

        let Some(mut mapping) = mapping else {
            return Ok(None);
        };
        if mapping.is_expired_at(now) {
            return Ok(None);
        }

        conn.execute(
            "UPDATE mappings SET click_count = click_count + 1 WHERE id = ?1",
            params![mapping.id],
        )
        .map_err(|e| {
            ShortmapError::storage_operation(format!("Failed to record click: {}", e))
        })?;

        mapping.click_count += 1;
        Ok(Some(mapping))
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let conn = self.connection.lock().unwrap();

        // datetime() normalizes the stored RFC 3339 text so the comparison is
        // chronological, not lexicographic.
        let deleted = conn
            .execute(
                "DELETE FROM mappings
                 WHERE expires_at IS NOT NULL AND datetime(expires_at) < datetime(?1)",
                params![cutoff.to_rfc3339()],
            )
            .map_err(|e| {
                ShortmapError::storage_operation(format!("Failed to sweep mappings: {}", e))
            })?;

        Ok(deleted as u64)
    }

    async fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}
