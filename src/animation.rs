//! Board animation planning
//!
//! Diffs two snapshots into an ordered list of animation instructions for
//! the UI shell to play back. Playback mechanics are out of scope; the
//! planner only decides which piece image travels between which points and
//! which squares the shell must hide while the instruction runs.
//!
//! # Classification
//!
//! Changed squares are split into departures (a piece left) and arrivals
//! (a piece appeared). Each arrival is matched to a departure of the same
//! piece identity: a quiet match is a `Move`, a match landing on a
//! previously occupied square is a `MoveFade` (the victim underneath fades
//! via its own `Take`). Unmatched departures are `Take`s - captures seen
//! from the victim's side, including the en passant victim square, which
//! vacates with no destination. Unmatched arrivals are `Put`s - promotion
//! entrances and arrange placements. Castling matches king and rook
//! independently and so yields two concurrent `Move`s.

use std::collections::BTreeSet;

use crate::snapshot::BoardSnapshot;
use crate::types::{spin_to_fen_char, Spin, Square};

/// What a single instruction does on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// Slide a piece between two squares
    Move,
    /// Slide a piece onto an occupied square while the occupant fades
    MoveFade,
    /// Fade a piece out in place
    Take,
    /// Fade a piece in at its square
    Put,
    /// Topple the piece in place (end-of-game king feedback)
    Fall,
}

/// Board-plane point of a square (file, rank)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardPoint {
    pub x: u8,
    pub y: u8,
}

impl BoardPoint {
    pub fn of(sq: Square) -> Self {
        Self { x: sq % 8, y: sq / 8 }
    }
}

/// One planned animation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationInstruction {
    pub kind: AnimationKind,
    /// FEN character naming the piece image to draw
    pub piece_image: char,
    pub from: BoardPoint,
    pub to: BoardPoint,
    /// Squares the shell must not draw statically while this plays
    pub hidden_squares: BTreeSet<Square>,
}

impl AnimationInstruction {
    fn in_place(kind: AnimationKind, piece: Spin, sq: Square) -> Option<Self> {
        Some(Self {
            kind,
            piece_image: spin_to_fen_char(piece)?,
            from: BoardPoint::of(sq),
            to: BoardPoint::of(sq),
            hidden_squares: BTreeSet::from([sq]),
        })
    }

    fn travel(kind: AnimationKind, piece: Spin, from: Square, to: Square) -> Option<Self> {
        Some(Self {
            kind,
            piece_image: spin_to_fen_char(piece)?,
            from: BoardPoint::of(from),
            to: BoardPoint::of(to),
            hidden_squares: BTreeSet::from([from, to]),
        })
    }
}

/// Plans animation lists from snapshot pairs
pub struct BoardAnimationPlanner;

impl BoardAnimationPlanner {
    /// Ordered instructions turning the `before` position into `after`
    ///
    /// Diffing two identical snapshots yields an empty list.
    pub fn create_animation_list(
        before: &BoardSnapshot,
        after: &BoardSnapshot,
    ) -> Vec<AnimationInstruction> {
        let changes = before.square_changes(after);

        let mut departures: Vec<(Square, Spin)> = Vec::new();
        let mut arrivals: Vec<(Square, Spin)> = Vec::new();
        for &sq in &changes {
            let was = before.spin_at(sq);
            let now = after.spin_at(sq);
            if was != 0 {
                departures.push((sq, was));
            }
            if now != 0 {
                arrivals.push((sq, now));
            }
        }

        let mut instructions = Vec::new();
        let mut matched_departure = vec![false; departures.len()];

        // Travel instructions: arrivals matched by piece identity
        let mut unmatched_arrivals: Vec<(Square, Spin)> = Vec::new();
        for (to, piece) in arrivals {
            let source = departures
                .iter()
                .enumerate()
                .find(|(i, (_, s))| !matched_departure[*i] && *s == piece);
            match source {
                Some((i, &(from, _))) => {
                    matched_departure[i] = true;
                    let kind = if before.spin_at(to) != 0 {
                        AnimationKind::MoveFade
                    } else {
                        AnimationKind::Move
                    };
                    instructions.extend(AnimationInstruction::travel(kind, piece, from, to));
                }
                None => unmatched_arrivals.push((to, piece)),
            }
        }

        // Fades: departures whose piece reappears nowhere
        for (i, &(sq, piece)) in departures.iter().enumerate() {
            if !matched_departure[i] {
                instructions.extend(AnimationInstruction::in_place(AnimationKind::Take, piece, sq));
            }
        }

        // Entrances: promotions and arrange placements
        for (sq, piece) in unmatched_arrivals {
            instructions.extend(AnimationInstruction::in_place(AnimationKind::Put, piece, sq));
        }

        instructions
    }

    /// Single toppling instruction for end-of-game king feedback
    pub fn create_animation_fall(
        snapshot: &BoardSnapshot,
        square: Square,
    ) -> Vec<AnimationInstruction> {
        AnimationInstruction::in_place(AnimationKind::Fall, snapshot.spin_at(square), square)
            .into_iter()
            .collect()
    }
}
