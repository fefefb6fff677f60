//! Engine-agnostic chess session control
//!
//! This crate is the layer between a board UI shell and a chess engine:
//! it assembles taps into move proposals, keeps the append-only record
//! history, detects move repetition, plans piece animations between
//! positions, and runs computer-move and hint searches on a background
//! worker with cooperative cancellation.
//!
//! The engine itself is an external collaborator behind the [`Engine`]
//! trait: the crate never interprets chess rules, it only moves opaque
//! board and state arrays in and out of whatever implementation the shell
//! provides through an [`EngineFactory`].
//!
//! The main entry point is [`BoardSessionController`]; the individual
//! pieces (assembler, history, planner, coordinator) are public for shells
//! that need finer-grained control.

pub mod animation;
pub mod assembler;
pub mod clock;
pub mod engine;
pub mod error;
pub mod history;
pub mod repetition;
pub mod search;
pub mod session;
pub mod settings;
pub mod snapshot;
pub mod store;
pub mod types;

pub use animation::{AnimationInstruction, AnimationKind, BoardAnimationPlanner, BoardPoint};
pub use assembler::MoveAssembler;
pub use clock::ChessClock;
pub use engine::{
    share_engine, ArrangeOutcome, CancelToken, Engine, EngineFactory, EngineHandle, MoveOutcome,
};
pub use error::{SessionError, SessionResult};
pub use history::GameRecordHistory;
pub use repetition::RepetitionDetector;
pub use search::{
    EngineSearchCoordinator, SearchGate, SearchKind, SearchOptions, SearchResult, StrengthRow,
    StrengthTable,
};
pub use session::{
    BoardSessionController, SessionEvent, SessionObserver, SessionOutcome, SubscriberId,
};
pub use settings::{load_settings, save_settings, BoardColour, GameSettings, MoveSpeed};
pub use snapshot::BoardSnapshot;
pub use store::{MemoryRecordStore, RecordStore};
pub use types::{
    BoardArray, GameStatus, HighlightMode, PieceColor, PromotionPiece, Spin, Square, StateArray,
};
