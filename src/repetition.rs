//! Repeated-position detection
//!
//! Scans the game record for the current position recurring earlier with
//! the same side to move. Used only to set the search's alternate-move-bias
//! flag so the computer varies its play instead of shuffling; never to
//! enforce a draw outcome.

use crate::snapshot::BoardSnapshot;

/// Detects recurring positions in the snapshot history
pub struct RepetitionDetector;

impl RepetitionDetector {
    /// Whether the tip position already occurred at a same-parity backward
    /// distance of at least 4 snapshots (two full move-pairs)
    ///
    /// Walks backward from the tip in steps of 2, preserving side-to-move
    /// parity, comparing raw board arrays for exact equality. Histories
    /// shorter than 5 snapshots can never repeat.
    pub fn is_repeat_move(history: &[&BoardSnapshot]) -> bool {
        let len = history.len();
        if len < 5 {
            return false;
        }
        let tip = history[len - 1];
        let mut distance = 4;
        while distance < len {
            if history[len - 1 - distance].board == tip.board {
                return true;
            }
            distance += 2;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::test_fixtures::{snapshot_with, starting_board};
    use crate::snapshot::BoardSnapshot;
    use crate::types::{spin, PieceColor};

    fn shuffle_sequence(boards: Vec<crate::types::BoardArray>) -> Vec<BoardSnapshot> {
        boards
            .into_iter()
            .enumerate()
            .map(|(i, board)| {
                let colour = if i % 2 == 0 {
                    PieceColor::White
                } else {
                    PieceColor::Black
                };
                snapshot_with(i as u64 + 1, board, colour)
            })
            .collect()
    }

    /// Board after moving `from` to `to` blindly
    fn moved(mut board: crate::types::BoardArray, from: usize, to: usize) -> crate::types::BoardArray {
        board[to] = board[from];
        board[from] = spin::EMPTY;
        board
    }

    #[test]
    fn test_short_histories_never_repeat() {
        //! False for histories shorter than 5 snapshots
        let start = starting_board();
        let snaps = shuffle_sequence(vec![start, start, start, start]);
        let refs: Vec<&BoardSnapshot> = snaps.iter().collect();
        assert!(!RepetitionDetector::is_repeat_move(&refs));
    }

    #[test]
    fn test_knight_shuffle_is_detected() {
        //! Ng1-f3, Ng8-f6, Nf3-g1, Nf6-g8 returns to the start position
        let start = starting_board();
        let b1 = moved(start, 6, 21); // Nf3
        let b2 = moved(b1, 62, 45); // Nf6
        let b3 = moved(b2, 21, 6); // Ng1
        let b4 = moved(b3, 45, 62); // Ng8 - identical to start, distance 4

        let snaps = shuffle_sequence(vec![start, b1, b2, b3, b4]);
        let refs: Vec<&BoardSnapshot> = snaps.iter().collect();
        assert!(RepetitionDetector::is_repeat_move(&refs));
    }

    #[test]
    fn test_distinct_positions_do_not_repeat() {
        let start = starting_board();
        let b1 = moved(start, 12, 28);
        let b2 = moved(b1, 52, 36);
        let b3 = moved(b2, 6, 21);
        let b4 = moved(b3, 62, 45);

        let snaps = shuffle_sequence(vec![start, b1, b2, b3, b4]);
        let refs: Vec<&BoardSnapshot> = snaps.iter().collect();
        assert!(!RepetitionDetector::is_repeat_move(&refs));
    }

    #[test]
    fn test_match_at_wrong_parity_is_ignored() {
        //! A board equal to the tip at odd backward distance must not count
        let start = starting_board();
        let b1 = moved(start, 6, 21);
        let b2 = moved(b1, 62, 45);
        let b3 = moved(b2, 21, 6);
        let b4 = moved(b3, 45, 62); // == start
        let b5 = moved(b4, 12, 28); // tip, equal to nothing earlier

        let snaps = shuffle_sequence(vec![start, b1, b2, b3, b4, b5]);
        let refs: Vec<&BoardSnapshot> = snaps.iter().collect();
        assert!(!RepetitionDetector::is_repeat_move(&refs));
    }

    #[test]
    fn test_repeat_at_deeper_distance() {
        //! Bias triggers on matches deeper than the minimum distance too
        let start = starting_board();
        let b1 = moved(start, 6, 21);
        let b2 = moved(b1, 62, 45);
        let b3 = moved(b2, 1, 18); // Nc3
        let b4 = moved(b3, 57, 42); // Nc6
        let b5 = moved(b4, 18, 1);
        let b6 = moved(b5, 42, 57); // back to the b2 position
        let b7 = moved(b6, 21, 6);
        let b8 = moved(b7, 45, 62); // == start, distance 8

        let snaps = shuffle_sequence(vec![start, b1, b2, b3, b4, b5, b6, b7, b8]);
        let refs: Vec<&BoardSnapshot> = snaps.iter().collect();
        assert!(RepetitionDetector::is_repeat_move(&refs));
    }
}
