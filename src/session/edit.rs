//! Edit selection for arrange (free-placement) mode
//!
//! While arrange mode is on, taps toggle membership in a selection set
//! instead of proposing moves. Tapping an already-selected square again
//! extends the selection to every square holding the same piece, which is
//! the "select all pieces of this type" gesture.

use std::collections::BTreeSet;

use crate::types::{BoardArray, Square};

/// Squares selected while in arrange mode
#[derive(Debug, Default)]
pub struct EditSelection {
    selected: BTreeSet<Square>,
    last_tapped: Option<Square>,
}

impl EditSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one tap; returns whether the square ends up selected
    pub fn toggle(&mut self, square: Square, board: &BoardArray) -> bool {
        let repeat_tap = self.last_tapped == Some(square) && self.selected.contains(&square);
        self.last_tapped = Some(square);

        if repeat_tap {
            // Second tap on a selected square: select all of this type
            let spin = board[square as usize];
            if spin != 0 {
                for (sq, &s) in board.iter().enumerate() {
                    if s == spin {
                        self.selected.insert(sq as Square);
                    }
                }
            }
            return true;
        }

        if self.selected.contains(&square) {
            self.selected.remove(&square);
            false
        } else {
            self.selected.insert(square);
            true
        }
    }

    pub fn contains(&self, square: Square) -> bool {
        self.selected.contains(&square)
    }

    pub fn selected(&self) -> impl Iterator<Item = Square> + '_ {
        self.selected.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.last_tapped = None;
    }
}
