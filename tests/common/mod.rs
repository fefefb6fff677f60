//! Shared test doubles for the integration suite
//!
//! `FakeEngine` is a scripted engine: it applies any requested move
//! blindly (legality is the real engine's concern, not the session's),
//! answers searches from a queue, and can simulate slow searches and
//! scripted game-over statuses so tests can drive cancellation and
//! end-of-game flows deterministically.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chess_session::search::SearchOptions;
use chess_session::types::{spin, square_name, state_slot, STATE_LEN};
use chess_session::{
    ArrangeOutcome, BoardArray, CancelToken, Engine, GameStatus, MoveOutcome, PieceColor,
    PromotionPiece, SearchResult, SessionEvent, SessionObserver, Spin, Square, StateArray,
};

/// Install the test log subscriber; later calls are no-ops
///
/// Run a single test with `RUST_LOG=debug` to see the session's
/// subsystem logs interleaved with its assertions.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Scripted search behaviour shared between an engine and its clones
#[derive(Default)]
pub struct SearchScript {
    pub results: VecDeque<SearchResult>,
    /// When set, the search polls its cancel token for this long before
    /// answering; a cancel observed meanwhile wins
    pub delay: Option<Duration>,
}

pub struct FakeEngine {
    pub board: BoardArray,
    pub state: StateArray,
    /// Destinations reported per source square
    pub legal: BTreeMap<Square, Vec<Square>>,
    /// Status the engine reports after the next committed move
    pub status_after_move: Option<GameStatus>,
    pub in_check: bool,
    script: Arc<Mutex<SearchScript>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        let mut engine = Self {
            board: [spin::EMPTY; 64],
            state: [0; STATE_LEN],
            legal: BTreeMap::new(),
            status_after_move: None,
            in_check: false,
            script: Arc::new(Mutex::new(SearchScript::default())),
        };
        engine.new_game();
        engine
    }

    /// Handle onto the search script, shared with every factory clone
    pub fn script(&self) -> Arc<Mutex<SearchScript>> {
        Arc::clone(&self.script)
    }

    /// A fresh engine answering searches from an existing script
    pub fn with_script(script: Arc<Mutex<SearchScript>>) -> Self {
        let mut engine = Self::new();
        engine.script = script;
        engine
    }

    pub fn push_search(&self, result: SearchResult) {
        self.script.lock().unwrap().results.push_back(result);
    }
}

/// Standard starting position, white on ranks 1-2
pub fn starting_board() -> BoardArray {
    let mut board = [spin::EMPTY; 64];
    let back = [
        spin::ROOK,
        spin::KNIGHT,
        spin::BISHOP,
        spin::QUEEN,
        spin::KING,
        spin::BISHOP,
        spin::KNIGHT,
        spin::ROOK,
    ];
    for (file, &piece) in back.iter().enumerate() {
        board[file] = piece;
        board[8 + file] = spin::PAWN;
        board[48 + file] = -spin::PAWN;
        board[56 + file] = -piece;
    }
    board
}

impl Engine for FakeEngine {
    fn new_game(&mut self) {
        // Scripted behaviour (status_after_move, search script) survives a
        // reset so tests can arrange it before handing the engine over
        self.board = starting_board();
        self.state = [0; STATE_LEN];
        self.state[state_slot::FULL_MOVE] = 1;
    }

    fn board_array(&self) -> BoardArray {
        self.board
    }

    fn set_board_array(&mut self, board: &BoardArray) {
        self.board = *board;
    }

    fn state_array(&self) -> StateArray {
        self.state
    }

    fn set_state_array(&mut self, state: &StateArray) {
        self.state = *state;
    }

    fn active_colour(&self) -> PieceColor {
        PieceColor::from_i64(self.state[state_slot::ACTIVE_COLOUR])
    }

    fn game_status(&self) -> GameStatus {
        GameStatus::from_i64(self.state[state_slot::STATUS])
    }

    fn set_game_status(&mut self, status: GameStatus) {
        self.state[state_slot::STATUS] = status.to_i64();
    }

    fn full_move_count(&self) -> u32 {
        self.state[state_slot::FULL_MOVE].max(1) as u32
    }

    fn is_king_check(&self, _colour: PieceColor) -> bool {
        self.in_check
    }

    fn king_index(&self, colour: PieceColor) -> Option<Square> {
        let wanted = spin::KING * colour.spin_sign();
        self.board
            .iter()
            .position(|&s| s == wanted)
            .map(|i| i as Square)
    }

    fn legal_destinations(&self, from: Square) -> Vec<Square> {
        self.legal.get(&from).cloned().unwrap_or_default()
    }

    fn try_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PromotionPiece>,
        _validate: bool,
        commit: bool,
    ) -> MoveOutcome {
        let moved = self.board[from as usize];
        if moved == spin::EMPTY {
            return MoveOutcome {
                success: false,
                san: String::new(),
                message: "no piece on source square".into(),
            };
        }
        if !commit {
            return MoveOutcome {
                success: true,
                san: String::new(),
                message: String::new(),
            };
        }

        let placed = match promotion {
            Some(p) => p.spin_magnitude() * moved.signum(),
            None => moved,
        };
        self.board[to as usize] = placed;
        self.board[from as usize] = spin::EMPTY;

        let mover = self.active_colour();
        self.state[state_slot::ACTIVE_COLOUR] = mover.opponent().to_i64();
        if mover == PieceColor::Black {
            self.state[state_slot::FULL_MOVE] += 1;
        }
        if let Some(status) = self.status_after_move.take() {
            self.set_game_status(status);
        }

        let san = if moved.abs() == spin::PAWN {
            square_name(to)
        } else {
            let letter = match moved.abs() {
                spin::KNIGHT => 'N',
                spin::BISHOP => 'B',
                spin::ROOK => 'R',
                spin::QUEEN => 'Q',
                _ => 'K',
            };
            format!("{letter}{}", square_name(to))
        };
        MoveOutcome {
            success: true,
            san,
            message: String::new(),
        }
    }

    fn arrange(&mut self, from: Square, to: Square) -> ArrangeOutcome {
        self.board[to as usize] = self.board[from as usize];
        self.board[from as usize] = spin::EMPTY;
        ArrangeOutcome {
            success: true,
            message: String::new(),
        }
    }

    fn arrange_update(&mut self, fen_char: char, to: Square) -> ArrangeOutcome {
        let magnitude = match fen_char.to_ascii_lowercase() {
            'p' => spin::PAWN,
            'n' => spin::KNIGHT,
            'b' => spin::BISHOP,
            'r' => spin::ROOK,
            'q' => spin::QUEEN,
            'k' => spin::KING,
            other => {
                return ArrangeOutcome {
                    success: false,
                    message: format!("unknown piece character '{other}'"),
                }
            }
        };
        let signed: Spin = if fen_char.is_ascii_uppercase() {
            magnitude
        } else {
            -magnitude
        };
        self.board[to as usize] = signed;
        ArrangeOutcome {
            success: true,
            message: String::new(),
        }
    }

    fn search(&mut self, _options: &SearchOptions, cancel: &CancelToken) -> SearchResult {
        let delay = self.script.lock().unwrap().delay;
        if let Some(delay) = delay {
            let deadline = std::time::Instant::now() + delay;
            while std::time::Instant::now() < deadline {
                if cancel.is_cancelled() {
                    return SearchResult::cancelled();
                }
                std::thread::sleep(Duration::from_millis(2));
            }
        }
        if cancel.is_cancelled() {
            return SearchResult::cancelled();
        }
        self.script
            .lock()
            .unwrap()
            .results
            .pop_front()
            .unwrap_or(SearchResult {
                error: true,
                error_message: "search script exhausted".into(),
                ..SearchResult::default()
            })
    }
}

/// Observer that records every emitted event for later assertions
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl SessionObserver for Recorder {
    fn on_event(&mut self, event: &SessionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
