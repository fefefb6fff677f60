//! Engine collaborator seam
//!
//! Move legality, board representation and search strength are owned by an
//! opaque native rules/search engine. This module defines the trait through
//! which the session layer talks to it, one instance per logical board:
//! the authoritative game, a scratch instance for hinting, and a scratch
//! instance for board editing.
//!
//! # Cancellation
//!
//! Search cancellation is cooperative, not preemptive. The coordinator and
//! the engine share a [`CancelToken`]; cancelling sets the token, but the
//! search still runs to completion and reports `cancelled` in its
//! [`SearchResult`](crate::search::SearchResult). Tearing a native search
//! down mid-flight could leave engine-internal state inconsistent, so the
//! coordinator always awaits the actual completion before reusing a handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::search::{SearchOptions, SearchResult};
use crate::types::{BoardArray, GameStatus, PieceColor, PromotionPiece, Spin, Square, StateArray};

/// Outcome of a move request against the engine
///
/// `success == false` with a non-empty `message` signals the engine declined
/// an apparently legal-looking move; the session layer treats that as
/// desynchronization, clears the proposal and records nothing.
#[derive(Debug, Clone, Default)]
pub struct MoveOutcome {
    pub success: bool,
    /// SAN text of the committed move, empty when not committed
    pub san: String,
    /// User-facing message on failure
    pub message: String,
}

/// Outcome of an arrange (free-placement) request
#[derive(Debug, Clone, Default)]
pub struct ArrangeOutcome {
    pub success: bool,
    pub message: String,
}

/// Shared cooperative cancellation flag for one search
///
/// Cloned between the coordinator and the searching engine. Setting it never
/// interrupts anything by force; the engine polls it at its own pace.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The opaque native rules/search engine, one instance per logical board
///
/// The session layer never inspects rules; it loads and reads flat arrays,
/// asks for legal destinations to drive highlighting, and delegates move
/// validation, arrange edits and searches wholesale.
pub trait Engine: Send {
    /// Reset to the standard starting position
    fn new_game(&mut self);

    fn board_array(&self) -> BoardArray;
    fn set_board_array(&mut self, board: &BoardArray);
    fn state_array(&self) -> StateArray;
    fn set_state_array(&mut self, state: &StateArray);

    fn active_colour(&self) -> PieceColor;
    fn game_status(&self) -> GameStatus;
    fn set_game_status(&mut self, status: GameStatus);
    /// Fullmove number, starts at 1 and increments after black's move
    fn full_move_count(&self) -> u32;

    fn is_king_check(&self, colour: PieceColor) -> bool;
    fn king_index(&self, colour: PieceColor) -> Option<Square>;

    /// Legal destination squares for the piece on `from`, empty when none
    fn legal_destinations(&self, from: Square) -> Vec<Square>;

    /// Validate and optionally commit a move
    ///
    /// With `commit == false` the engine only validates; board and state
    /// arrays are unchanged either way unless `commit` succeeds.
    fn try_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PromotionPiece>,
        validate: bool,
        commit: bool,
    ) -> MoveOutcome;

    /// Free-placement move between two squares, bypassing legality
    fn arrange(&mut self, from: Square, to: Square) -> ArrangeOutcome;

    /// Free-placement put of a piece (FEN character) onto a square
    fn arrange_update(&mut self, fen_char: char, to: Square) -> ArrangeOutcome;

    /// Run a search to completion, observing `cancel` cooperatively
    ///
    /// Blocking call; the coordinator runs it on a blocking worker thread.
    /// A cancelled search must still return, with `cancelled` set.
    fn search(&mut self, options: &SearchOptions, cancel: &CancelToken) -> SearchResult;

    /// Spin code of the occupant of `sq`, 0 for empty
    fn spin_at(&self, sq: Square) -> Spin {
        self.board_array()[sq as usize]
    }
}

/// Shared, lockable handle to one engine instance
pub type EngineHandle = Arc<Mutex<Box<dyn Engine>>>;

/// Wrap a boxed engine into a shared handle
pub fn share_engine(engine: Box<dyn Engine>) -> EngineHandle {
    Arc::new(Mutex::new(engine))
}

/// Creates fresh engine instances for scratch boards
///
/// The hint search and history materialization never touch the
/// authoritative handle; they each load a private instance built here.
pub trait EngineFactory: Send + Sync {
    fn create(&self) -> Box<dyn Engine>;
}

impl<F> EngineFactory for F
where
    F: Fn() -> Box<dyn Engine> + Send + Sync,
{
    fn create(&self) -> Box<dyn Engine> {
        self()
    }
}
