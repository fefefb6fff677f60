//! Durable backing for the game record
//!
//! The record store is an external collaborator: an append-only store keyed
//! by the same monotonically increasing id as the history, supporting
//! insert-at-max, delete-max (for undo) and range reads. Anything beyond
//! this contract (schema, file format) is out of scope; an in-memory
//! implementation ships for tests and non-persistent sessions.

use crate::error::{SessionError, SessionResult};
use crate::snapshot::BoardSnapshot;

/// Append-only record persistence contract
pub trait RecordStore: Send {
    /// Append a snapshot; its id must be exactly one past the current max
    fn insert_max(&mut self, snapshot: &BoardSnapshot) -> SessionResult<()>;

    /// Remove the snapshot with the highest id
    fn delete_max(&mut self) -> SessionResult<()>;

    /// Read snapshots with ids in `[from, to]` inclusive, ascending
    fn read_range(&self, from: u64, to: u64) -> SessionResult<Vec<BoardSnapshot>>;

    /// Drop every record (new game)
    fn clear(&mut self) -> SessionResult<()>;
}

/// In-memory record store
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Vec<BoardSnapshot>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    fn insert_max(&mut self, snapshot: &BoardSnapshot) -> SessionResult<()> {
        let expected = self.records.len() as u64 + 1;
        if snapshot.id != expected {
            return Err(SessionError::RecordStore {
                message: format!("insert id {} but next id is {expected}", snapshot.id),
            });
        }
        self.records.push(snapshot.clone());
        Ok(())
    }

    fn delete_max(&mut self) -> SessionResult<()> {
        if self.records.pop().is_none() {
            return Err(SessionError::RecordStore {
                message: "delete_max on empty store".into(),
            });
        }
        Ok(())
    }

    fn read_range(&self, from: u64, to: u64) -> SessionResult<Vec<BoardSnapshot>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.id >= from && r.id <= to)
            .cloned()
            .collect())
    }

    fn clear(&mut self) -> SessionResult<()> {
        self.records.clear();
        Ok(())
    }
}
