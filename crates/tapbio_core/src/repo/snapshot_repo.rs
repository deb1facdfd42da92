//! Local snapshot storage.
//!
//! # Responsibility
//! - Persist the whole page aggregate as one JSON blob under a fixed key.
//! - Restore it atomically on startup.
//!
//! # Invariants
//! - Blobs are written as `{"state": <snapshot>, "version": 0}`.
//! - A blob that parses is returned as stored, even when `Snapshot::validate()`
//!   flags it; whatever the store can write, the store can read back.
//! - Last writer wins; there is no conflict detection.

use crate::model::snapshot::Snapshot;
use crate::repo::{RepoError, RepoResult};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

/// Storage key used by the studio for its persisted state.
pub const STORAGE_KEY: &str = "andokore-storage";

const ENVELOPE_VERSION: u32 = 0;

#[derive(Serialize, Deserialize)]
struct Envelope<S> {
    state: S,
    version: u32,
}

/// Storage contract for persisted snapshots.
pub trait SnapshotRepository {
    /// Returns the snapshot under `key`, or `None` when nothing is stored.
    fn load_snapshot(&self, key: &str) -> RepoResult<Option<Snapshot>>;
    /// Replaces whatever is stored under `key`.
    fn save_snapshot(&self, key: &str, snapshot: &Snapshot) -> RepoResult<()>;
    /// Deletes the value under `key`; returns whether one existed.
    fn clear_snapshot(&self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed key/value snapshot storage.
pub struct SqliteSnapshotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSnapshotRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SnapshotRepository for SqliteSnapshotRepository<'_> {
    fn load_snapshot(&self, key: &str) -> RepoResult<Option<Snapshot>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let envelope: Envelope<Snapshot> = serde_json::from_str(&raw).map_err(|err| {
            RepoError::InvalidData(format!("kv_store value for `{key}` is not a snapshot: {err}"))
        })?;
        if let Err(err) = envelope.state.validate() {
            warn!(
                "event=snapshot_load module=repo status=degraded key={} reason={}",
                key, err
            );
        }
        Ok(Some(envelope.state))
    }

    fn save_snapshot(&self, key: &str, snapshot: &Snapshot) -> RepoResult<()> {
        let value = serde_json::to_string(&Envelope {
            state: snapshot,
            version: ENVELOPE_VERSION,
        })
        .map_err(RepoError::Encode)?;

        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn clear_snapshot(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}
