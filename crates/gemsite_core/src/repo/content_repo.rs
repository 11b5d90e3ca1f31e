//! Persistence adapter for the site content document.
//!
//! # Responsibility
//! - Save/load the whole content document under one well-known key.
//! - Gate the destructive reset behind an explicit operator confirmation.
//!
//! # Invariants
//! - The slot always holds compact JSON of a shape-valid document, or nothing.
//! - Writes larger than the configured quota are refused before touching SQL.
//! - Read paths report corrupt data instead of masking it; callers decide
//!   whether to fall back to defaults.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::document::{ContentDocument, ShapeError};
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Well-known key of the content slot.
pub const CONTENT_STORAGE_KEY: &str = "gem_persistence_v1";

/// Default slot quota (5 MiB), in line with browser local-storage limits.
pub const DEFAULT_STORAGE_QUOTA_BYTES: usize = 5 * 1024 * 1024;

pub type StorageResult<T> = Result<T, StorageError>;

/// Persisted save/load failures. The in-memory document stays authoritative.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Serialized document exceeds the slot quota.
    QuotaExceeded { size: usize, quota: usize },
    Serialize(serde_json::Error),
    /// Slot content is not a valid document.
    Corrupt(ShapeError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::QuotaExceeded { size, quota } => write!(
                f,
                "storage limit reached ({size} bytes, quota {quota}); try using smaller images"
            ),
            Self::Serialize(err) => write!(f, "failed to serialize content: {err}"),
            Self::Corrupt(err) => write!(f, "persisted content is corrupt: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "content repository requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Corrupt(err) => Some(err),
            Self::QuotaExceeded { .. } | Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Query(value))
    }
}

/// Proof that an operator explicitly agreed to a factory reset.
///
/// Only obtainable from an affirmative answer, so no code path can clear
/// storage without one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetConfirmation {
    _private: (),
}

impl ResetConfirmation {
    /// Accepts `y` / `yes` (case-insensitive, surrounding whitespace ignored).
    pub fn from_operator_answer(answer: &str) -> Option<Self> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Some(Self { _private: () }),
            _ => None,
        }
    }
}

/// Repository interface for the content slot.
pub trait ContentRepository {
    /// Replaces the persisted document.
    fn save_document(&self, document: &ContentDocument) -> StorageResult<()>;
    /// Returns `None` when nothing has been saved yet.
    fn load_document(&self) -> StorageResult<Option<ContentDocument>>;
    /// Clears the slot; returns whether a document was present.
    fn clear_document(&self, confirmation: ResetConfirmation) -> StorageResult<bool>;
}

/// SQLite-backed content slot in the `kv_store` table.
pub struct SqliteContentRepository<'conn> {
    conn: &'conn Connection,
    quota_bytes: usize,
}

impl<'conn> SqliteContentRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(StorageError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self {
            conn,
            quota_bytes: DEFAULT_STORAGE_QUOTA_BYTES,
        })
    }

    pub fn with_quota(mut self, quota_bytes: usize) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn quota_bytes(&self) -> usize {
        self.quota_bytes
    }

    fn read_slot(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?)
    }

    fn write_slot(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_slot(&self, key: &str) -> StorageResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(removed > 0)
    }
}

impl ContentRepository for SqliteContentRepository<'_> {
    fn save_document(&self, document: &ContentDocument) -> StorageResult<()> {
        let json = document.to_json_string().map_err(StorageError::Serialize)?;
        if json.len() > self.quota_bytes {
            warn!(
                "event=content_save module=repo status=error error_code=quota_exceeded size={} quota={}",
                json.len(),
                self.quota_bytes
            );
            return Err(StorageError::QuotaExceeded {
                size: json.len(),
                quota: self.quota_bytes,
            });
        }

        self.write_slot(CONTENT_STORAGE_KEY, &json)?;
        info!(
            "event=content_save module=repo status=ok size={}",
            json.len()
        );
        Ok(())
    }

    fn load_document(&self) -> StorageResult<Option<ContentDocument>> {
        let Some(json) = self.read_slot(CONTENT_STORAGE_KEY)? else {
            info!("event=content_load module=repo status=ok found=false");
            return Ok(None);
        };

        match ContentDocument::from_json_str(&json) {
            Ok(document) => {
                info!(
                    "event=content_load module=repo status=ok found=true size={}",
                    json.len()
                );
                Ok(Some(document))
            }
            Err(err) => {
                warn!(
                    "event=content_load module=repo status=error error_code=corrupt size={} error={err}",
                    json.len()
                );
                Err(StorageError::Corrupt(err))
            }
        }
    }

    fn clear_document(&self, _confirmation: ResetConfirmation) -> StorageResult<bool> {
        let removed = self.remove_slot(CONTENT_STORAGE_KEY)?;
        info!("event=content_reset module=repo status=ok removed={removed}");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::ResetConfirmation;

    #[test]
    fn reset_confirmation_requires_affirmative_answer() {
        assert!(ResetConfirmation::from_operator_answer("yes").is_some());
        assert!(ResetConfirmation::from_operator_answer(" Y \n").is_some());
        assert!(ResetConfirmation::from_operator_answer("YES").is_some());
        assert!(ResetConfirmation::from_operator_answer("").is_none());
        assert!(ResetConfirmation::from_operator_answer("no").is_none());
        assert!(ResetConfirmation::from_operator_answer("yess").is_none());
    }
}
