//! Per-side game clock
//!
//! Tracks elapsed seconds per side as count-up offsets; the offsets are
//! what gets frozen into each snapshot, so undo and history navigation can
//! restore the clock display exactly. Fischer increment support is carried
//! for incremental time controls (an increment of 0 disables it).
//!
//! The clock never decides that time has expired: the shell reports
//! expiry through the controller's time-expired action, which owns the
//! status transition.

use std::time::Instant;

use crate::types::PieceColor;

/// Count-up game clock with optional Fischer increment
#[derive(Debug)]
pub struct ChessClock {
    white_offset: i64,
    black_offset: i64,
    increment: i64,
    running: Option<(PieceColor, Instant)>,
}

impl Default for ChessClock {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ChessClock {
    pub fn new(increment_seconds: i64) -> Self {
        Self {
            white_offset: 0,
            black_offset: 0,
            increment: increment_seconds,
            running: None,
        }
    }

    /// Reset both offsets and stop the clock
    pub fn reset(&mut self, white_seconds: i64, black_seconds: i64) {
        self.white_offset = white_seconds;
        self.black_offset = black_seconds;
        self.running = None;
    }

    /// Restore offsets from a snapshot without starting the clock
    pub fn restore(&mut self, white_seconds: i64, black_seconds: i64) {
        self.reset(white_seconds, black_seconds);
    }

    /// Start counting for the given side, folding in any running time
    pub fn start(&mut self, side: PieceColor) {
        self.stop();
        self.running = Some((side, Instant::now()));
    }

    /// Stop counting, folding elapsed time into the running side's offset
    pub fn stop(&mut self) {
        if let Some((side, since)) = self.running.take() {
            let elapsed = since.elapsed().as_secs() as i64;
            match side {
                PieceColor::White => self.white_offset += elapsed,
                PieceColor::Black => self.black_offset += elapsed,
            }
        }
    }

    /// Subtract the Fischer increment from the mover's offset
    ///
    /// Offsets count up, so "gaining time" means the offset shrinks. The
    /// offset never goes below zero.
    pub fn apply_increment(&mut self, mover: PieceColor) {
        if self.increment <= 0 {
            return;
        }
        let offset = match mover {
            PieceColor::White => &mut self.white_offset,
            PieceColor::Black => &mut self.black_offset,
        };
        *offset = (*offset - self.increment).max(0);
    }

    /// Current offset for one side, including running time
    pub fn offset(&self, side: PieceColor) -> i64 {
        let base = match side {
            PieceColor::White => self.white_offset,
            PieceColor::Black => self.black_offset,
        };
        match self.running {
            Some((running, since)) if running == side => {
                base + since.elapsed().as_secs() as i64
            }
            _ => base,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}
