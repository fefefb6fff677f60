//! Move proposal assembly
//!
//! Converts a sequence of square selections into a two-square move
//! proposal. The first selection must be an occupied square owned by the
//! side to move; it records the source and fetches the engine's legal
//! destinations for highlighting. The second selection supplies the
//! destination and marks the proposal ready for the controller to commit.
//!
//! A second tap on another square of the player's own colour restarts the
//! proposal with that square rather than being treated as an illegal
//! destination. `clear` is unconditional and safe at any time, including
//! mid-search.

use tracing::debug;

use crate::engine::Engine;
use crate::types::{HighlightMode, PieceColor, Square};

/// Incrementally built two-square move proposal
#[derive(Debug, Default)]
pub struct MoveAssembler {
    from: Option<Square>,
    to: Option<Square>,
    highlight: HighlightMode,
    targets: Vec<Square>,
}

impl MoveAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one square selection; returns `true` when the proposal is
    /// complete and the controller should attempt a commit
    ///
    /// `view` is the engine materializing the position the user is looking
    /// at (the authoritative handle at the tip, a scratch handle when
    /// reviewing history).
    pub fn add(&mut self, square: Square, view: &dyn Engine, highlight: HighlightMode) -> bool {
        let occupant = view.spin_at(square);
        let owner = PieceColor::of_spin(occupant);
        let to_move = view.active_colour();

        match self.from {
            None => {
                if owner != Some(to_move) {
                    // Empty or enemy-owned square: nothing to propose
                    self.clear();
                    return false;
                }
                self.begin(square, view, highlight);
                false
            }
            Some(from) => {
                if owner == Some(to_move) && square != from {
                    // Own-piece reselection restarts the proposal
                    self.begin(square, view, highlight);
                    return false;
                }
                if square == from {
                    // Tapping the selected square again keeps it selected
                    return false;
                }
                self.to = Some(square);
                true
            }
        }
    }

    fn begin(&mut self, square: Square, view: &dyn Engine, highlight: HighlightMode) {
        self.from = Some(square);
        self.to = None;
        self.highlight = highlight;
        self.targets = match highlight {
            HighlightMode::MovePath => view.legal_destinations(square),
            HighlightMode::Select => Vec::new(),
        };
        debug!(
            "[ASSEMBLER] selected {} with {} highlighted destinations",
            crate::types::square_name(square),
            self.targets.len()
        );
    }

    /// Reset to the empty state unconditionally
    pub fn clear(&mut self) {
        self.from = None;
        self.to = None;
        self.targets.clear();
        self.highlight = HighlightMode::default();
    }

    pub fn from_square(&self) -> Option<Square> {
        self.from
    }

    pub fn to_square(&self) -> Option<Square> {
        self.to
    }

    /// The completed proposal, if both squares are set
    pub fn proposal(&self) -> Option<(Square, Square)> {
        Some((self.from?, self.to?))
    }

    pub fn highlight_mode(&self) -> HighlightMode {
        self.highlight
    }

    /// Destinations to highlight for the current selection
    pub fn targets(&self) -> &[Square] {
        &self.targets
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}
