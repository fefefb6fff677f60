//! Game record history
//!
//! Maintains the append-only sequence of board snapshots for one session.
//! This enables undo, history review, repetition detection and rollback
//! animation planning.
//!
//! # Invariants
//!
//! - Ids are contiguous integers starting at 1 with no gaps; `max_id` is
//!   always the most recently appended id.
//! - The current pointer is any id in `[1, max_id]`. Navigation moves the
//!   pointer; it never changes the records.
//! - Records are appended only at the tip. There are no branch or overwrite
//!   semantics: a commit attempted while viewing a historical snapshot is
//!   rejected by the controller, which snaps the pointer back to the tip.
//!
//! # Stale-result guard
//!
//! Every mutation (reset, append, undo) and every pointer move bumps a
//! `mutation_serial`. Code that suspends on a search or animation records
//! the serial first and compares on resumption; a mismatch means the user
//! changed the game meanwhile and the suspended result must be discarded.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::engine::{Engine, EngineFactory};
use crate::snapshot::BoardSnapshot;
use crate::store::RecordStore;
use crate::types::{state_slot, Square};

/// Ordered, append-only sequence of board snapshots with a current pointer
pub struct GameRecordHistory {
    records: BTreeMap<u64, BoardSnapshot>,
    current: u64,
    mutation_serial: u64,
    store: Option<Box<dyn RecordStore>>,
}

impl Default for GameRecordHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRecordHistory {
    /// History without durable backing
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            current: 0,
            mutation_serial: 0,
            store: None,
        }
    }

    /// History persisted through the given record store
    pub fn with_store(store: Box<dyn RecordStore>) -> Self {
        Self {
            store: Some(store),
            ..Self::new()
        }
    }

    /// Discard all snapshots and reinitialize from the standard starting
    /// position as snapshot id 1, with the given clock offsets
    pub fn reset(&mut self, engine: &mut dyn Engine, white_clock: i64, black_clock: i64) {
        engine.new_game();

        let mut initial = BoardSnapshot::capture(1, engine, "");
        initial.state[state_slot::WHITE_CLOCK] = white_clock;
        initial.state[state_slot::BLACK_CLOCK] = black_clock;

        self.records.clear();
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.clear() {
                warn!("[HISTORY] record store clear failed: {e}");
            }
            if let Err(e) = store.insert_max(&initial) {
                warn!("[HISTORY] record store insert failed: {e}");
            }
        }
        self.records.insert(1, initial);
        self.current = 1;
        self.mutation_serial += 1;
        debug!("[HISTORY] reset to initial position");
    }

    /// Snapshot the engine's current arrays and append at `max_id + 1`
    ///
    /// The given clock offsets overwrite the engine's clock slots so the
    /// record reflects wall time actually spent, not engine state. Returns
    /// the number of records appended: 1 on success, 0 if the history was
    /// never initialized.
    pub fn record_game_state(
        &mut self,
        engine: &dyn Engine,
        white_clock: i64,
        black_clock: i64,
        move_san: impl Into<String>,
    ) -> u64 {
        if self.records.is_empty() {
            warn!("[HISTORY] record_game_state before reset; ignoring");
            return 0;
        }

        let id = self.max_id() + 1;
        let mut snapshot = BoardSnapshot::capture(id, engine, move_san);
        snapshot.state[state_slot::WHITE_CLOCK] = white_clock;
        snapshot.state[state_slot::BLACK_CLOCK] = black_clock;

        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.insert_max(&snapshot) {
                warn!("[HISTORY] record store insert failed: {e}");
            }
        }
        debug!("[HISTORY] recorded snapshot {id} ({})", snapshot.move_san);
        self.records.insert(id, snapshot);
        self.current = id;
        self.mutation_serial += 1;
        1
    }

    /// Remove the single most recent snapshot
    ///
    /// Returns `false`, leaving everything unchanged, if only the initial
    /// snapshot remains.
    pub fn undo(&mut self) -> bool {
        let max = self.max_id();
        if max <= 1 {
            return false;
        }
        self.records.remove(&max);
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.delete_max() {
                warn!("[HISTORY] record store delete failed: {e}");
            }
        }
        if self.current >= max {
            self.current = max - 1;
        }
        self.mutation_serial += 1;
        debug!("[HISTORY] undid snapshot {max}");
        true
    }

    /// Snapshot by id
    pub fn get(&self, id: u64) -> Option<&BoardSnapshot> {
        self.records.get(&id)
    }

    /// Snapshot at the current pointer
    pub fn current(&self) -> Option<&BoardSnapshot> {
        self.records.get(&self.current)
    }

    pub fn current_id(&self) -> u64 {
        self.current
    }

    /// Snapshot at the tip
    pub fn tip(&self) -> Option<&BoardSnapshot> {
        self.records.get(&self.max_id())
    }

    /// Most recently appended id, 0 before the first reset
    pub fn max_id(&self) -> u64 {
        self.records.keys().next_back().copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the current pointer sits at the tip
    ///
    /// Moves and arrange edits are only accepted here.
    pub fn at_tip(&self) -> bool {
        !self.records.is_empty() && self.current == self.max_id()
    }

    /// Move the current pointer; `false` if `id` is out of range
    ///
    /// Navigation is read-only with respect to records but still bumps the
    /// mutation serial, so suspended search results from before the move
    /// are recognized as stale.
    pub fn set_current(&mut self, id: u64) -> bool {
        if id == 0 || id > self.max_id() {
            return false;
        }
        if id != self.current {
            self.current = id;
            self.mutation_serial += 1;
        }
        true
    }

    /// Snap the current pointer to the tip
    pub fn go_to_tip(&mut self) {
        let max = self.max_id();
        if max > 0 {
            self.set_current(max);
        }
    }

    /// A fresh engine handle loaded from the snapshot at the current pointer
    pub fn current_game(&self, factory: &dyn EngineFactory) -> Option<Box<dyn Engine>> {
        let snapshot = self.current()?;
        let mut engine = factory.create();
        snapshot.load_into(engine.as_mut());
        Some(engine)
    }

    /// Square indexes whose occupant differs between snapshots `a` and `b`
    ///
    /// Empty set if either snapshot is absent.
    pub fn board_square_changes(&self, a: u64, b: u64) -> BTreeSet<Square> {
        match (self.get(a), self.get(b)) {
            (Some(sa), Some(sb)) => sa.square_changes(sb),
            _ => BTreeSet::new(),
        }
    }

    /// All snapshots in id order, for repetition scanning
    pub fn game_history(&self) -> Vec<&BoardSnapshot> {
        self.records.values().collect()
    }

    /// Counter bumped on every mutation or pointer move (stale guard)
    pub fn mutation_serial(&self) -> u64 {
        self.mutation_serial
    }
}
