//! SQLite-backed single-row snapshot store.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::{core::ledger::LedgerSnapshot, types::Revision};

use super::{PersistError, PersistResult, SnapshotStore};

const SNAPSHOT_FORMAT_VERSION: u16 = 1;
/// Fixed row key the state blob lives under.
const STATE_KEY: &str = "questlog_state";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotEnvelope {
    format_version: u16,
    revision: Revision,
    snapshot: LedgerSnapshot,
}

/// SQLite implementation of [`SnapshotStore`].
pub struct SqliteSnapshotStore {
    conn: Connection,
}

impl SqliteSnapshotStore {
    /// Opens or creates a snapshot store at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory store.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Replaces the stored blob under the fixed key.
    pub fn write_snapshot(
        &mut self,
        snapshot: &LedgerSnapshot,
        revision: Revision,
    ) -> PersistResult<()> {
        let env = SnapshotEnvelope {
            format_version: SNAPSHOT_FORMAT_VERSION,
            revision,
            snapshot: snapshot.clone(),
        };
        let payload = serde_json::to_vec(&env)?;
        self.conn.execute(
            "INSERT INTO state(key, revision, ts_ms, payload) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET revision = ?2, ts_ms = ?3, payload = ?4",
            params![STATE_KEY, revision as i64, now_ms() as i64, payload],
        )?;
        Ok(())
    }

    /// Loads the stored snapshot, if any.
    ///
    /// A payload that fails to decode, or carries an unsupported format
    /// version, is an error; use [`SnapshotStore::load_or_default`] to fall
    /// back to a fresh state instead.
    pub fn load_snapshot(&self) -> PersistResult<Option<LedgerSnapshot>> {
        let payload: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT payload FROM state WHERE key = ?1",
                params![STATE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        let env: SnapshotEnvelope = serde_json::from_slice(&payload)?;
        if env.format_version != SNAPSHOT_FORMAT_VERSION {
            return Err(PersistError::Message(
                "unsupported snapshot format".to_string(),
            ));
        }
        Ok(Some(env.snapshot))
    }

    /// Deletes the stored blob.
    pub fn clear(&mut self) -> PersistResult<()> {
        self.conn
            .execute("DELETE FROM state WHERE key = ?1", params![STATE_KEY])?;
        Ok(())
    }

    /// Revision of the stored blob, 0 when empty.
    pub fn stored_revision(&self) -> PersistResult<Revision> {
        let revision: Option<i64> = self
            .conn
            .query_row(
                "SELECT revision FROM state WHERE key = ?1",
                params![STATE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(revision.unwrap_or(0) as Revision)
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn write_snapshot(
        &mut self,
        snapshot: &LedgerSnapshot,
        revision: Revision,
    ) -> PersistResult<()> {
        SqliteSnapshotStore::write_snapshot(self, snapshot, revision)
    }

    fn load_snapshot(&self) -> PersistResult<Option<LedgerSnapshot>> {
        SqliteSnapshotStore::load_snapshot(self)
    }

    fn clear(&mut self) -> PersistResult<()> {
        SqliteSnapshotStore::clear(self)
    }

    fn flush(&mut self) -> PersistResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);")?;
        Ok(())
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
