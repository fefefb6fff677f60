//! Board session controller
//!
//! Orchestrates one game session: assembles taps into move proposals,
//! routes commits through the engine and the record history, plans
//! animations, and coordinates computer-move and hint searches. Every
//! user-facing action is a guarded transition that re-validates its own
//! preconditions; no internal error escapes this boundary — everything
//! surfaces as a [`SessionOutcome`] or a [`SessionEvent`].
//!
//! # Concurrency
//!
//! All mutation of the history and the authoritative engine handle happens
//! on the control task. Searches run on a blocking worker while the
//! controller suspends on [`finish_search`](BoardSessionController::finish_search);
//! results are applied only if the history's mutation serial still matches
//! the value recorded when the search was spawned. History navigation is
//! serialized through a single-slot gate so one record's navigation and
//! animation completes before the next is accepted.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::animation::{AnimationInstruction, BoardAnimationPlanner};
use crate::assembler::MoveAssembler;
use crate::clock::ChessClock;
use crate::engine::{share_engine, Engine, EngineFactory, EngineHandle};
use crate::history::GameRecordHistory;
use crate::repetition::RepetitionDetector;
use crate::search::{EngineSearchCoordinator, PendingSearch, SearchKind};
use crate::session::edit::EditSelection;
use crate::session::events::{ObserverSet, SessionEvent, SessionObserver, SubscriberId};
use crate::session::promotion::{PromotionGate, PromotionPrompt};
use crate::settings::GameSettings;
use crate::store::RecordStore;
use crate::types::{spin, GameStatus, HighlightMode, PieceColor, PromotionPiece, Square};

/// Result of one user-facing action
#[derive(Debug)]
pub enum SessionOutcome {
    /// Nothing to do (guards not met, or no-op)
    Idle,
    /// A search or navigation is in flight; the action was refused
    Busy,
    /// A move or edit was committed and recorded
    Committed {
        record_id: u64,
        san: String,
        animations: Vec<AnimationInstruction>,
    },
    /// First square selected, destinations available for highlighting
    SelectionChanged {
        from: Option<Square>,
        targets: Vec<Square>,
    },
    /// Arrange-mode selection changed
    EditSelectionChanged { selected: Vec<Square> },
    /// The commit needs a promotion choice from the shell
    PromotionRequired { from: Square, to: Square },
    /// A hint is highlighted without mutating history
    HintShown { from: Square, to: Square },
    /// The current pointer moved to a historical record
    Navigated {
        record_id: u64,
        animations: Vec<AnimationInstruction>,
    },
    /// The most recent record was removed
    Undone {
        record_id: u64,
        animations: Vec<AnimationInstruction>,
    },
    /// History was reinitialized to the starting position
    Reset { record_id: u64 },
    /// Arrange mode toggled
    ArrangeMode { enabled: bool },
    /// A search task was spawned
    SearchStarted,
    /// A search was cancelled or its result discarded as stale
    Cancelled,
    /// The action was refused with a user-visible message
    Rejected { message: String },
}

/// One game session: authoritative engine, record history and search state
pub struct BoardSessionController {
    engine: EngineHandle,
    factory: Arc<dyn EngineFactory>,
    history: GameRecordHistory,
    assembler: MoveAssembler,
    coordinator: EngineSearchCoordinator,
    clock: ChessClock,
    settings: GameSettings,
    arrange_mode: bool,
    edit_selection: EditSelection,
    promotion: PromotionGate,
    pending_search: Option<PendingSearch>,
    nav_gate: Arc<tokio::sync::Mutex<()>>,
    observers: ObserverSet,
}

impl BoardSessionController {
    /// Session without durable backing
    pub fn new(
        engine: Box<dyn Engine>,
        factory: Arc<dyn EngineFactory>,
        settings: GameSettings,
    ) -> Self {
        Self::build(engine, factory, settings, None)
    }

    /// Session persisted through the given record store
    pub fn with_store(
        engine: Box<dyn Engine>,
        factory: Arc<dyn EngineFactory>,
        settings: GameSettings,
        store: Box<dyn RecordStore>,
    ) -> Self {
        Self::build(engine, factory, settings, Some(store))
    }

    fn build(
        engine: Box<dyn Engine>,
        factory: Arc<dyn EngineFactory>,
        settings: GameSettings,
        store: Option<Box<dyn RecordStore>>,
    ) -> Self {
        let mut history = match store {
            Some(store) => GameRecordHistory::with_store(store),
            None => GameRecordHistory::new(),
        };
        let start = if settings.clock_enabled {
            settings.clock_default_seconds
        } else {
            0
        };
        let mut clock = ChessClock::new(settings.clock_increment_seconds);
        clock.reset(start, start);
        let engine = share_engine(engine);
        {
            let mut guard = engine.lock();
            history.reset(&mut **guard, start, start);
        }
        Self {
            engine,
            factory,
            history,
            assembler: MoveAssembler::new(),
            coordinator: EngineSearchCoordinator::default(),
            clock,
            settings,
            arrange_mode: false,
            edit_selection: EditSelection::new(),
            promotion: PromotionGate::new(),
            pending_search: None,
            nav_gate: Arc::new(tokio::sync::Mutex::new(())),
            observers: ObserverSet::new(),
        }
    }

    // ---- accessors -------------------------------------------------------

    pub fn history(&self) -> &GameRecordHistory {
        &self.history
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GameSettings {
        &mut self.settings
    }

    pub fn assembler(&self) -> &MoveAssembler {
        &self.assembler
    }

    pub fn clock(&self) -> &ChessClock {
        &self.clock
    }

    pub fn arrange_mode(&self) -> bool {
        self.arrange_mode
    }

    pub fn edit_selection(&self) -> &EditSelection {
        &self.edit_selection
    }

    pub fn computer_move_processing(&self) -> bool {
        self.coordinator.gate().computer_move_processing()
    }

    pub fn hint_processing(&self) -> bool {
        self.coordinator.gate().hint_processing()
    }

    pub fn panel_locked(&self) -> bool {
        self.coordinator.gate().panel_locked()
    }

    pub fn search_pending(&self) -> bool {
        self.pending_search.is_some()
    }

    /// Initial per-side clock offset for a fresh game
    fn starting_clock_seconds(&self) -> i64 {
        if self.settings.clock_enabled {
            self.settings.clock_default_seconds
        } else {
            0
        }
    }

    /// Side played by the computer when computer play is enabled
    pub fn computer_colour(&self) -> PieceColor {
        if self.settings.computer_moves_first {
            PieceColor::White
        } else {
            PieceColor::Black
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) -> SubscriberId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ---- taps and drags --------------------------------------------------

    /// Feed one tapped square into the session
    pub fn square_tapped(&mut self, square: Square) -> SessionOutcome {
        if self.coordinator.gate().busy() || self.coordinator.gate().panel_locked() {
            return SessionOutcome::Busy;
        }
        if self.promotion.is_pending() {
            return SessionOutcome::Busy;
        }
        if self.arrange_mode {
            return self.edit_tap(square);
        }

        let mode = if self.settings.move_highlight {
            HighlightMode::MovePath
        } else {
            HighlightMode::Select
        };

        let ready = if self.history.at_tip() {
            let engine = self.engine.lock();
            self.assembler.add(square, &**engine, mode)
        } else {
            match self.history.current_game(self.factory.as_ref()) {
                Some(view) => self.assembler.add(square, view.as_ref(), mode),
                None => return SessionOutcome::Idle,
            }
        };

        if !ready {
            let from = self.assembler.from_square();
            let targets = self.assembler.targets().to_vec();
            if from.is_some() {
                self.observers.emit(SessionEvent::Highlight {
                    squares: targets.clone(),
                    mode,
                });
            }
            return SessionOutcome::SelectionChanged { from, targets };
        }

        let Some((from, to)) = self.assembler.proposal() else {
            return SessionOutcome::Idle;
        };
        self.commit_user_move(from, to)
    }

    /// Feed a completed drag; equivalent to tapping both squares
    pub fn square_dragged(&mut self, from: Square, to: Square) -> SessionOutcome {
        if self.coordinator.gate().busy() || self.coordinator.gate().panel_locked() {
            return SessionOutcome::Busy;
        }
        if self.promotion.is_pending() {
            return SessionOutcome::Busy;
        }
        if self.arrange_mode {
            return self.arrange_move(from, to);
        }

        self.assembler.clear();
        let owner = {
            let engine = self.engine.lock();
            PieceColor::of_spin(engine.spin_at(from))
        };
        let to_move = self.engine.lock().active_colour();
        if owner != Some(to_move) {
            return SessionOutcome::Idle;
        }
        self.commit_user_move(from, to)
    }

    /// Commit path for user input (taps, drags, resolved promotions)
    fn commit_user_move(&mut self, from: Square, to: Square) -> SessionOutcome {
        // Tip rule: history is append-only and navigation is read-only
        // except at the tip
        if !self.history.at_tip() {
            self.history.go_to_tip();
            self.assembler.clear();
            self.observers.emit(SessionEvent::Message(
                "Returned to the latest position".into(),
            ));
            return SessionOutcome::Rejected {
                message: "cannot move while viewing history".into(),
            };
        }

        let status = self.engine.lock().game_status();
        if !status.is_in_progress() {
            self.assembler.clear();
            return SessionOutcome::Rejected {
                message: "the game is over".into(),
            };
        }

        // Pawn reaching the last rank needs a piece choice
        let promotion = match self.promotion_needed(from, to) {
            Some(colour) if !self.settings.auto_promote => {
                let prompt = PromotionPrompt { from, to, colour };
                if !self.promotion.issue(prompt) {
                    return SessionOutcome::Busy;
                }
                return SessionOutcome::PromotionRequired { from, to };
            }
            Some(_) => Some(PromotionPiece::Queen),
            None => None,
        };

        let outcome = self.apply_move(from, to, promotion);
        if matches!(outcome, SessionOutcome::Committed { .. }) {
            self.maybe_start_computer_reply();
        }
        outcome
    }

    fn promotion_needed(&self, from: Square, to: Square) -> Option<PieceColor> {
        let piece = self.engine.lock().spin_at(from);
        if piece.abs() != spin::PAWN {
            return None;
        }
        let colour = PieceColor::of_spin(piece)?;
        let last_rank = match colour {
            PieceColor::White => to / 8 == 7,
            PieceColor::Black => to / 8 == 0,
        };
        last_rank.then_some(colour)
    }

    /// Shared commit path for user, computer and auto-played hint moves
    fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PromotionPiece>,
    ) -> SessionOutcome {
        let mover = self.engine.lock().active_colour();
        let result = self
            .engine
            .lock()
            .try_move(from, to, promotion, true, true);

        if !result.success {
            // The engine declining here signals desynchronization; drop the
            // proposal and record nothing
            warn!("[SESSION] engine declined move {from}->{to}: {}", result.message);
            self.assembler.clear();
            self.observers.emit(SessionEvent::Shake { square: from });
            self.observers
                .emit(SessionEvent::Message(result.message.clone()));
            return SessionOutcome::Rejected {
                message: result.message,
            };
        }

        self.clock.stop();
        self.clock.apply_increment(mover);
        let white = self.clock.offset(PieceColor::White);
        let black = self.clock.offset(PieceColor::Black);

        let previous_tip = self.history.max_id();
        {
            let engine = self.engine.lock();
            self.history
                .record_game_state(&**engine, white, black, &result.san);
        }
        let record_id = self.history.max_id();

        let mut animations = match (self.history.get(previous_tip), self.history.tip()) {
            (Some(before), Some(after)) => {
                BoardAnimationPlanner::create_animation_list(before, after)
            }
            _ => Vec::new(),
        };

        let (status, next, in_check, king) = {
            let engine = self.engine.lock();
            let next = engine.active_colour();
            (
                engine.game_status(),
                next,
                engine.is_king_check(next),
                engine.king_index(next),
            )
        };

        self.update_indicators(status, next, in_check, king);
        if let Some(fallen) = self.fallen_king(status, next) {
            if let Some(tip) = self.history.tip() {
                animations.extend(BoardAnimationPlanner::create_animation_fall(tip, fallen));
            }
        }
        self.maybe_auto_level_up(status);

        if status.is_in_progress() && self.settings.clock_enabled {
            self.clock.start(next);
        }
        self.assembler.clear();

        info!("[SESSION] committed {} as record {record_id}", result.san);
        SessionOutcome::Committed {
            record_id,
            san: result.san,
            animations,
        }
    }

    fn update_indicators(
        &mut self,
        status: GameStatus,
        next: PieceColor,
        in_check: bool,
        king: Option<Square>,
    ) {
        self.observers.emit(SessionEvent::TurnChanged(next));
        self.observers.emit(SessionEvent::CheckIndicator {
            colour: next,
            king,
            in_check,
        });
        if !status.is_in_progress() {
            self.observers.emit(SessionEvent::StatusChanged(status));
        }
    }

    /// King that should topple for end-of-game feedback, if any
    fn fallen_king(&self, status: GameStatus, to_move: PieceColor) -> Option<Square> {
        let loser = match status {
            GameStatus::CheckmateWhiteWins => PieceColor::Black,
            GameStatus::CheckmateBlackWins => PieceColor::White,
            GameStatus::Resigned | GameStatus::TimeExpired => to_move,
            _ => return None,
        };
        self.engine.lock().king_index(loser)
    }

    fn maybe_auto_level_up(&mut self, status: GameStatus) {
        if !self.settings.auto_level_up || !self.settings.computer_player {
            return;
        }
        let winner = match status {
            GameStatus::CheckmateWhiteWins => PieceColor::White,
            GameStatus::CheckmateBlackWins => PieceColor::Black,
            _ => return,
        };
        if winner == self.computer_colour() {
            return;
        }
        let max = self.coordinator.strength().max_index();
        if self.settings.skill_index < max {
            self.settings.skill_index += 1;
            info!(
                "[SESSION] auto level-up to skill index {}",
                self.settings.skill_index
            );
            self.observers
                .emit(SessionEvent::Message("Skill level increased".into()));
        }
    }

    // ---- promotion prompt ------------------------------------------------

    /// Resolve the outstanding promotion request with a piece choice
    ///
    /// The commit guards run again here: the game may have been navigated
    /// away from the tip or finished while the prompt was outstanding, and
    /// a stale prompt must not append a record.
    pub fn resolve_promotion(&mut self, piece: PromotionPiece) -> SessionOutcome {
        let Some(prompt) = self.promotion.take() else {
            return SessionOutcome::Rejected {
                message: "no promotion pending".into(),
            };
        };
        if !self.history.at_tip() {
            self.history.go_to_tip();
            self.assembler.clear();
            return SessionOutcome::Rejected {
                message: "cannot move while viewing history".into(),
            };
        }
        if !self.engine.lock().game_status().is_in_progress() {
            self.assembler.clear();
            return SessionOutcome::Rejected {
                message: "the game is over".into(),
            };
        }
        let outcome = self.apply_move(prompt.from, prompt.to, Some(piece));
        if matches!(outcome, SessionOutcome::Committed { .. }) {
            self.maybe_start_computer_reply();
        }
        outcome
    }

    /// Cancel the outstanding promotion request
    pub fn cancel_promotion(&mut self) -> SessionOutcome {
        if self.promotion.take().is_none() {
            return SessionOutcome::Idle;
        }
        self.assembler.clear();
        SessionOutcome::Cancelled
    }

    // ---- searches --------------------------------------------------------

    fn maybe_start_computer_reply(&mut self) {
        if !self.settings.computer_player || self.arrange_mode {
            return;
        }
        let (status, active) = {
            let engine = self.engine.lock();
            (engine.game_status(), engine.active_colour())
        };
        if status.is_in_progress() && active == self.computer_colour() {
            self.start_computer_move_task();
        }
    }

    /// Spawn the computer-move search if every guard holds
    pub fn start_computer_move_task(&mut self) -> SessionOutcome {
        if self.arrange_mode || !self.settings.computer_player {
            return SessionOutcome::Idle;
        }
        let (status, active) = {
            let engine = self.engine.lock();
            (engine.game_status(), engine.active_colour())
        };
        if !status.is_in_progress() || active != self.computer_colour() {
            return SessionOutcome::Idle;
        }
        if !self.history.at_tip() {
            return SessionOutcome::Idle;
        }
        if self.pending_search.is_some() || !self.coordinator.gate().try_begin_computer_move() {
            return SessionOutcome::Busy;
        }

        self.coordinator.gate().lock_panel();
        self.assembler.clear();

        let bias = RepetitionDetector::is_repeat_move(&self.history.game_history());
        let options = self.coordinator.computer_move_options(&self.settings, bias);
        let pending = self.coordinator.spawn_search(
            SearchKind::ComputerMove,
            Arc::clone(&self.engine),
            options,
            self.history.mutation_serial(),
        );
        self.pending_search = Some(pending);
        SessionOutcome::SearchStarted
    }

    /// Spawn a hint search against a scratch engine for the viewed snapshot
    pub fn start_hint_task(&mut self) -> SessionOutcome {
        if self.arrange_mode {
            return SessionOutcome::Rejected {
                message: "no hints in arrange mode".into(),
            };
        }
        let Some(snapshot) = self.history.current().cloned() else {
            return SessionOutcome::Idle;
        };
        if !snapshot.game_status().is_in_progress() {
            return SessionOutcome::Rejected {
                message: "the game is over".into(),
            };
        }
        if self.pending_search.is_some() || !self.coordinator.gate().try_begin_hint() {
            return SessionOutcome::Busy;
        }

        // Hints never touch the authoritative handle
        let mut scratch = self.factory.create();
        snapshot.load_into(scratch.as_mut());
        let handle = share_engine(scratch);

        let options = self.coordinator.hint_options();
        let pending = self.coordinator.spawn_search(
            SearchKind::Hint,
            handle,
            options,
            self.history.mutation_serial(),
        );
        self.pending_search = Some(pending);
        SessionOutcome::SearchStarted
    }

    /// Await the in-flight search and apply or discard its result
    pub async fn finish_search(&mut self) -> SessionOutcome {
        let Some(pending) = self.pending_search.take() else {
            return SessionOutcome::Idle;
        };
        let kind = pending.kind;
        let spawned_serial = pending.history_serial;
        let result = pending.complete().await;
        self.coordinator.finish(kind);

        if result.cancelled {
            debug!("[SEARCH] {kind:?} search cancelled");
            return SessionOutcome::Cancelled;
        }
        if spawned_serial != self.history.mutation_serial() {
            // The user changed the game while we were thinking
            info!("[SEARCH] discarding stale {kind:?} result");
            return SessionOutcome::Cancelled;
        }
        if result.error {
            warn!("[SEARCH] {kind:?} search failed: {}", result.error_message);
            self.observers
                .emit(SessionEvent::Message(result.error_message.clone()));
            return SessionOutcome::Rejected {
                message: result.error_message,
            };
        }
        let Some((from, to)) = result.best_move() else {
            return SessionOutcome::Rejected {
                message: "search returned no move".into(),
            };
        };

        match kind {
            SearchKind::ComputerMove => {
                let (status, active) = {
                    let engine = self.engine.lock();
                    (engine.game_status(), engine.active_colour())
                };
                if !status.is_in_progress()
                    || active != self.computer_colour()
                    || !self.history.at_tip()
                {
                    return SessionOutcome::Cancelled;
                }
                self.apply_move(from, to, result.promotion)
            }
            SearchKind::Hint => {
                if self.settings.auto_play_hint && self.history.at_tip() {
                    let outcome = self.apply_move(from, to, result.promotion);
                    if matches!(outcome, SessionOutcome::Committed { .. }) {
                        self.maybe_start_computer_reply();
                    }
                    outcome
                } else {
                    self.observers.emit(SessionEvent::Hint { from, to });
                    self.observers.emit(SessionEvent::Highlight {
                        squares: vec![from, to],
                        mode: HighlightMode::Select,
                    });
                    SessionOutcome::HintShown { from, to }
                }
            }
        }
    }

    /// Cancel any in-flight search and await its cooperative exit
    ///
    /// Idempotent; leaves the history unchanged and the move proposal
    /// empty. Callable at any time, including with no search running.
    pub async fn stop_search_job(&mut self) -> SessionOutcome {
        self.coordinator.stop_search_job();
        if let Some(pending) = self.pending_search.take() {
            let kind = pending.kind;
            // Await the actual completion before the handle is reused
            let _ = pending.complete().await;
            self.coordinator.finish(kind);
        }
        self.assembler.clear();
        SessionOutcome::Idle
    }

    // ---- game lifecycle --------------------------------------------------

    /// Start a new game from the standard position
    pub async fn new_game(&mut self) -> SessionOutcome {
        self.stop_search_job().await;
        self.arrange_mode = false;
        self.edit_selection.clear();
        self.promotion.take();

        let start = self.starting_clock_seconds();
        self.clock.reset(start, start);
        {
            let mut engine = self.engine.lock();
            self.history.reset(&mut **engine, start, start);
        }
        self.observers
            .emit(SessionEvent::StatusChanged(GameStatus::InProgress));
        self.observers
            .emit(SessionEvent::TurnChanged(PieceColor::White));

        if self.settings.computer_player && self.settings.computer_moves_first {
            self.start_computer_move_task();
        }
        SessionOutcome::Reset { record_id: 1 }
    }

    /// Remove the most recent record and roll the board back
    pub async fn undo(&mut self) -> SessionOutcome {
        self.stop_search_job().await;

        let before = self.history.tip().cloned();
        if !self.history.undo() {
            return SessionOutcome::Rejected {
                message: "nothing to undo".into(),
            };
        }
        // Undo always ends at the tip, even when the user was reviewing
        // an older record
        self.history.go_to_tip();
        let Some(tip) = self.history.tip().cloned() else {
            return SessionOutcome::Idle;
        };

        {
            let mut engine = self.engine.lock();
            tip.load_into(&mut **engine);
        }
        self.clock
            .restore(tip.white_clock(), tip.black_clock());

        let animations = match &before {
            Some(before) => BoardAnimationPlanner::create_animation_list(before, &tip),
            None => Vec::new(),
        };
        let (next, in_check, king) = {
            let engine = self.engine.lock();
            let next = engine.active_colour();
            (next, engine.is_king_check(next), engine.king_index(next))
        };
        self.update_indicators(tip.game_status(), next, in_check, king);
        self.observers.emit(SessionEvent::ClockDisplay {
            white_offset: tip.white_clock(),
            black_offset: tip.black_clock(),
        });
        if !animations.is_empty() {
            self.observers
                .emit(SessionEvent::Animations(animations.clone()));
        }

        SessionOutcome::Undone {
            record_id: tip.id,
            animations,
        }
    }

    /// Resign the game for the side to move
    pub fn resign(&mut self) -> SessionOutcome {
        if self.arrange_mode {
            return SessionOutcome::Rejected {
                message: "cannot resign in arrange mode".into(),
            };
        }
        let (status, active, full_moves) = {
            let engine = self.engine.lock();
            (
                engine.game_status(),
                engine.active_colour(),
                engine.full_move_count(),
            )
        };
        if self.settings.computer_player && active == self.computer_colour() {
            return SessionOutcome::Rejected {
                message: "cannot resign on the computer's turn".into(),
            };
        }
        if !status.is_in_progress() {
            return SessionOutcome::Rejected {
                message: "the game is over".into(),
            };
        }
        if full_moves < 2 {
            return SessionOutcome::Rejected {
                message: "nothing to resign yet".into(),
            };
        }

        self.finish_game(GameStatus::Resigned, active)
    }

    /// Record that the given side's time ran out
    pub fn time_expired(&mut self, side: PieceColor) -> SessionOutcome {
        if self.arrange_mode {
            return SessionOutcome::Rejected {
                message: "no clocks in arrange mode".into(),
            };
        }
        if !self.engine.lock().game_status().is_in_progress() {
            return SessionOutcome::Rejected {
                message: "the game is over".into(),
            };
        }
        self.finish_game(GameStatus::TimeExpired, side)
    }

    /// Terminal status transition shared by resign and time-expired
    fn finish_game(&mut self, status: GameStatus, loser: PieceColor) -> SessionOutcome {
        self.clock.stop();
        let white = self.clock.offset(PieceColor::White);
        let black = self.clock.offset(PieceColor::Black);

        {
            let mut engine = self.engine.lock();
            engine.set_game_status(status);
            self.history
                .record_game_state(&**engine, white, black, "");
        }
        self.assembler.clear();

        let king = self.engine.lock().king_index(loser);
        let mut animations = Vec::new();
        if let (Some(king), Some(tip)) = (king, self.history.tip()) {
            animations.extend(BoardAnimationPlanner::create_animation_fall(tip, king));
        }
        self.observers.emit(SessionEvent::StatusChanged(status));

        info!("[SESSION] game finished: {status:?}");
        SessionOutcome::Committed {
            record_id: self.history.max_id(),
            san: String::new(),
            animations,
        }
    }

    // ---- arrange mode ----------------------------------------------------

    /// Toggle free-placement mode; cancels any search either way
    pub async fn toggle_arrange_mode(&mut self) -> SessionOutcome {
        self.stop_search_job().await;
        self.arrange_mode = !self.arrange_mode;
        self.edit_selection.clear();
        self.assembler.clear();
        SessionOutcome::ArrangeMode {
            enabled: self.arrange_mode,
        }
    }

    fn edit_tap(&mut self, square: Square) -> SessionOutcome {
        let board = self.engine.lock().board_array();
        self.edit_selection.toggle(square, &board);
        let selected: Vec<Square> = self.edit_selection.selected().collect();
        self.observers.emit(SessionEvent::Highlight {
            squares: selected.clone(),
            mode: HighlightMode::Select,
        });
        SessionOutcome::EditSelectionChanged { selected }
    }

    /// Commit a free-placement move between two squares
    pub fn arrange_move(&mut self, from: Square, to: Square) -> SessionOutcome {
        if !self.arrange_mode {
            return SessionOutcome::Rejected {
                message: "not in arrange mode".into(),
            };
        }
        if !self.history.at_tip() {
            self.history.go_to_tip();
            self.edit_selection.clear();
            return SessionOutcome::Rejected {
                message: "cannot edit while viewing history".into(),
            };
        }

        let result = self.engine.lock().arrange(from, to);
        if !result.success {
            return SessionOutcome::Rejected {
                message: result.message,
            };
        }
        self.record_edit()
    }

    /// Commit a free placement of a piece onto a square
    pub fn arrange_put(&mut self, fen_char: char, to: Square) -> SessionOutcome {
        if !self.arrange_mode {
            return SessionOutcome::Rejected {
                message: "not in arrange mode".into(),
            };
        }
        if !self.history.at_tip() {
            self.history.go_to_tip();
            self.edit_selection.clear();
            return SessionOutcome::Rejected {
                message: "cannot edit while viewing history".into(),
            };
        }

        let result = self.engine.lock().arrange_update(fen_char, to);
        if !result.success {
            return SessionOutcome::Rejected {
                message: result.message,
            };
        }
        self.record_edit()
    }

    fn record_edit(&mut self) -> SessionOutcome {
        let white = self.clock.offset(PieceColor::White);
        let black = self.clock.offset(PieceColor::Black);
        let previous_tip = self.history.max_id();
        {
            let engine = self.engine.lock();
            self.history
                .record_game_state(&**engine, white, black, "");
        }
        let record_id = self.history.max_id();
        let animations = match (self.history.get(previous_tip), self.history.tip()) {
            (Some(before), Some(after)) => {
                BoardAnimationPlanner::create_animation_list(before, after)
            }
            _ => Vec::new(),
        };
        self.edit_selection.clear();
        SessionOutcome::Committed {
            record_id,
            san: String::new(),
            animations,
        }
    }

    // ---- history navigation ----------------------------------------------

    /// Move the current pointer to a record and plan the transition
    ///
    /// Serialized through a single-slot gate: a second navigation request
    /// waits until the first has finished applying.
    pub async fn navigate_to(&mut self, id: u64) -> SessionOutcome {
        let gate = Arc::clone(&self.nav_gate);
        let _slot = gate.lock().await;

        let Some(from_snapshot) = self.history.current().cloned() else {
            return SessionOutcome::Idle;
        };
        if !self.history.set_current(id) {
            return SessionOutcome::Rejected {
                message: format!("record {id} does not exist"),
            };
        }
        let Some(target) = self.history.current().cloned() else {
            return SessionOutcome::Idle;
        };
        self.assembler.clear();

        let animations = BoardAnimationPlanner::create_animation_list(&from_snapshot, &target);

        // Indicators come from a scratch handle; the authoritative engine
        // stays at the tip
        if let Some(view) = self.history.current_game(self.factory.as_ref()) {
            let next = view.active_colour();
            self.update_indicators(target.game_status(), next, view.is_king_check(next), view.king_index(next));
        }
        self.observers.emit(SessionEvent::ClockDisplay {
            white_offset: target.white_clock(),
            black_offset: target.black_clock(),
        });

        debug!("[SESSION] navigated to record {id}");
        SessionOutcome::Navigated {
            record_id: id,
            animations,
        }
    }
}
