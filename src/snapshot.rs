//! Immutable board snapshots
//!
//! A [`BoardSnapshot`] freezes the engine's board and state arrays at the
//! moment a move or edit was committed. Snapshots are created only by a
//! successful commit and never mutated; the "current game" is materialized
//! by loading a snapshot's arrays back into an engine handle.

use std::collections::BTreeSet;

use crate::engine::Engine;
use crate::types::{
    state_slot, BoardArray, GameStatus, PieceColor, Spin, Square, StateArray, BOARD_SQUARES,
};

/// One frozen position in the game record
///
/// `id` is assigned by the history: 1 for the initial position, incrementing
/// by exactly 1 per committed move or edit.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub id: u64,
    pub board: BoardArray,
    pub state: StateArray,
    /// SAN text of the move that produced this position, empty for id 1
    /// and for arrange edits
    pub move_san: String,
}

impl BoardSnapshot {
    /// Freeze the engine's current arrays under the given id
    pub fn capture(id: u64, engine: &dyn Engine, move_san: impl Into<String>) -> Self {
        Self {
            id,
            board: engine.board_array(),
            state: engine.state_array(),
            move_san: move_san.into(),
        }
    }

    /// Load this snapshot's arrays into an engine handle
    pub fn load_into(&self, engine: &mut dyn Engine) {
        engine.set_board_array(&self.board);
        engine.set_state_array(&self.state);
    }

    pub fn spin_at(&self, sq: Square) -> Spin {
        self.board[sq as usize]
    }

    pub fn active_colour(&self) -> PieceColor {
        PieceColor::from_i64(self.state[state_slot::ACTIVE_COLOUR])
    }

    pub fn game_status(&self) -> GameStatus {
        GameStatus::from_i64(self.state[state_slot::STATUS])
    }

    pub fn full_move_count(&self) -> u32 {
        self.state[state_slot::FULL_MOVE].max(1) as u32
    }

    /// White's recorded clock offset in seconds
    pub fn white_clock(&self) -> i64 {
        self.state[state_slot::WHITE_CLOCK]
    }

    /// Black's recorded clock offset in seconds
    pub fn black_clock(&self) -> i64 {
        self.state[state_slot::BLACK_CLOCK]
    }

    /// Square indexes whose occupant differs between the two snapshots
    pub fn square_changes(&self, other: &BoardSnapshot) -> BTreeSet<Square> {
        (0..BOARD_SQUARES as Square)
            .filter(|&sq| self.spin_at(sq) != other.spin_at(sq))
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    //! Hand-built snapshots for unit tests in this crate

    use super::*;
    use crate::types::{spin, STATE_LEN};

    /// Standard chess starting position as spin codes
    pub fn starting_board() -> BoardArray {
        let mut board = [spin::EMPTY; BOARD_SQUARES];
        let back_rank = [
            spin::ROOK,
            spin::KNIGHT,
            spin::BISHOP,
            spin::QUEEN,
            spin::KING,
            spin::BISHOP,
            spin::KNIGHT,
            spin::ROOK,
        ];
        for (file, &piece) in back_rank.iter().enumerate() {
            board[file] = piece;
            board[8 + file] = spin::PAWN;
            board[48 + file] = -spin::PAWN;
            board[56 + file] = -piece;
        }
        board
    }

    pub fn snapshot_with(id: u64, board: BoardArray, to_move: PieceColor) -> BoardSnapshot {
        let mut state = [0i64; STATE_LEN];
        state[state_slot::ACTIVE_COLOUR] = to_move.to_i64();
        state[state_slot::FULL_MOVE] = 1;
        BoardSnapshot {
            id,
            board,
            state,
            move_san: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_fixtures::{snapshot_with, starting_board};
    use super::*;
    use crate::types::spin;

    #[test]
    fn test_identical_snapshots_have_no_changes() {
        let a = snapshot_with(1, starting_board(), PieceColor::White);
        let b = snapshot_with(2, starting_board(), PieceColor::White);
        assert!(a.square_changes(&b).is_empty());
    }

    #[test]
    fn test_square_changes_after_pawn_push() {
        //! e2-e4 changes exactly squares 12 and 28
        let before = snapshot_with(1, starting_board(), PieceColor::White);
        let mut board = starting_board();
        board[28] = board[12];
        board[12] = spin::EMPTY;
        let after = snapshot_with(2, board, PieceColor::Black);

        let changes = before.square_changes(&after);
        assert_eq!(changes, [12u8, 28u8].into_iter().collect());
    }

    #[test]
    fn test_state_accessors() {
        let snap = snapshot_with(1, starting_board(), PieceColor::Black);
        assert_eq!(snap.active_colour(), PieceColor::Black);
        assert_eq!(snap.game_status(), GameStatus::InProgress);
        assert_eq!(snap.full_move_count(), 1);
        assert_eq!(snap.white_clock(), 0);
    }
}
