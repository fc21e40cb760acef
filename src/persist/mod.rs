pub mod sqlite;

use crate::{core::ledger::LedgerSnapshot, types::Revision};

/// Persistence-layer failure.
#[derive(Debug)]
pub enum PersistError {
    /// Underlying SQLite failure.
    Sqlite(rusqlite::Error),
    /// Snapshot payload (de)serialization failure.
    Serde(serde_json::Error),
    /// Anything else, stringified.
    Message(String),
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Result alias for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Full-state snapshot store keyed by a single fixed key.
///
/// Every write replaces the previous blob wholesale; there are no
/// incremental writes and no migrations.
pub trait SnapshotStore: Send {
    /// Replaces the stored snapshot.
    fn write_snapshot(&mut self, snapshot: &LedgerSnapshot, revision: Revision)
    -> PersistResult<()>;

    /// Loads the stored snapshot, `None` when nothing was ever written.
    fn load_snapshot(&self) -> PersistResult<Option<LedgerSnapshot>>;

    /// Removes the stored snapshot (logout).
    fn clear(&mut self) -> PersistResult<()>;

    /// Forces buffered writes to stable storage.
    fn flush(&mut self) -> PersistResult<()> {
        Ok(())
    }

    /// Loads the snapshot, falling back to a fresh default state.
    ///
    /// A structurally incompatible blob is fatal to the load path only: the
    /// parse error is logged and a default state returned, never surfaced.
    fn load_or_default(&self) -> LedgerSnapshot {
        match self.load_snapshot() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => LedgerSnapshot::default(),
            Err(err) => {
                tracing::warn!(?err, "stored snapshot unreadable, starting fresh");
                LedgerSnapshot::default()
            }
        }
    }
}
