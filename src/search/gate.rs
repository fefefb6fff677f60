//! Mutual-exclusion gate for computer-move and hint searches
//!
//! Two flags, never simultaneously true: a computer-move search and a hint
//! search may not overlap, and a user action that would start one while the
//! other runs must report busy and take no effect. The flags are atomics so
//! they can be checked from outside the control task while a search is in
//! flight.
//!
//! The panel lock is advisory: it is checked before accepting new
//! interactions, but every guarded operation still re-validates its own
//! preconditions rather than trusting the lock alone.

use std::sync::atomic::{AtomicBool, Ordering};

/// Single-flight state shared between the coordinator and the controller
#[derive(Debug, Default)]
pub struct SearchGate {
    computer_move: AtomicBool,
    hint: AtomicBool,
    panel_locked: AtomicBool,
}

impl SearchGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the computer-move slot; fails while either search runs
    pub fn try_begin_computer_move(&self) -> bool {
        if self.hint.load(Ordering::SeqCst) {
            return false;
        }
        self.computer_move
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Claim the hint slot; fails while either search runs
    pub fn try_begin_hint(&self) -> bool {
        if self.computer_move.load(Ordering::SeqCst) {
            return false;
        }
        self.hint
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn end_computer_move(&self) {
        self.computer_move.store(false, Ordering::SeqCst);
    }

    pub fn end_hint(&self) {
        self.hint.store(false, Ordering::SeqCst);
    }

    pub fn computer_move_processing(&self) -> bool {
        self.computer_move.load(Ordering::SeqCst)
    }

    pub fn hint_processing(&self) -> bool {
        self.hint.load(Ordering::SeqCst)
    }

    /// Either search is in flight
    pub fn busy(&self) -> bool {
        self.computer_move_processing() || self.hint_processing()
    }

    pub fn lock_panel(&self) {
        self.panel_locked.store(true, Ordering::SeqCst);
    }

    pub fn unlock_panel(&self) {
        self.panel_locked.store(false, Ordering::SeqCst);
    }

    pub fn panel_locked(&self) -> bool {
        self.panel_locked.load(Ordering::SeqCst)
    }
}
