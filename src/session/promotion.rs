//! Pending pawn-promotion prompt
//!
//! When a pawn move needs a piece choice and auto-promote is off, the
//! controller issues a request and pauses the commit. The shell resolves it
//! exactly once with the chosen piece, or cancels it; at most one request
//! is outstanding per controller.

use crate::types::{PieceColor, Square};

/// Details of the move awaiting a promotion choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionPrompt {
    pub from: Square,
    pub to: Square,
    pub colour: PieceColor,
}

/// Single-slot request/response handle for promotion choices
#[derive(Debug, Default)]
pub struct PromotionGate {
    pending: Option<PromotionPrompt>,
}

impl PromotionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a request; `false` if one is already outstanding
    pub fn issue(&mut self, prompt: PromotionPrompt) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(prompt);
        true
    }

    /// Take the outstanding request for resolution or cancellation
    pub fn take(&mut self) -> Option<PromotionPrompt> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<PromotionPrompt> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
