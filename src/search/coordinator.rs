//! Engine search coordination
//!
//! Runs computer-move and hint searches against engine handles under the
//! single-flight [`SearchGate`]. A search occupies a blocking worker thread
//! while the control task suspends on its join handle; this is the only
//! suspension point in the session besides history navigation.
//!
//! The coordinator never applies results itself: the session controller
//! awaits the [`PendingSearch`], re-validates its transaction serial against
//! the history, and routes a surviving move through the normal commit path.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::{CancelToken, EngineHandle};
use crate::search::{SearchGate, SearchOptions, SearchResult, StrengthTable};
use crate::settings::GameSettings;

/// Which kind of search a pending task is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    ComputerMove,
    Hint,
}

/// An in-flight search task
///
/// Holds the join handle, the shared cancel token and the history mutation
/// serial observed when the search was spawned. A result whose serial no
/// longer matches the history is stale and must be discarded, not applied.
#[derive(Debug)]
pub struct PendingSearch {
    pub kind: SearchKind,
    pub cancel: CancelToken,
    pub history_serial: u64,
    pub task: JoinHandle<SearchResult>,
}

impl PendingSearch {
    /// Await the search's actual completion
    ///
    /// Never tears the engine down: a cancelled search still runs to its
    /// cooperative exit and reports `cancelled` in the result.
    pub async fn complete(self) -> SearchResult {
        match self.task.await {
            Ok(result) => result,
            Err(e) => SearchResult {
                error: true,
                error_message: format!("search task failed: {e}"),
                ..SearchResult::default()
            },
        }
    }
}

/// Coordinates searches: options, single-flight flags, cancellation
pub struct EngineSearchCoordinator {
    gate: Arc<SearchGate>,
    strength: StrengthTable,
    active_cancel: parking_lot::Mutex<Option<CancelToken>>,
}

impl Default for EngineSearchCoordinator {
    fn default() -> Self {
        Self::new(StrengthTable::default())
    }
}

impl EngineSearchCoordinator {
    pub fn new(strength: StrengthTable) -> Self {
        Self {
            gate: Arc::new(SearchGate::new()),
            strength,
            active_cancel: parking_lot::Mutex::new(None),
        }
    }

    /// The single-flight gate shared with the controller
    pub fn gate(&self) -> &Arc<SearchGate> {
        &self.gate
    }

    pub fn strength(&self) -> &StrengthTable {
        &self.strength
    }

    /// Options for a computer move
    ///
    /// In advanced mode the user-supplied depth/time/node/thread overrides
    /// win; otherwise the skill index selects a strength-table row. The
    /// alternate-move bias comes from repetition detection on the history.
    pub fn computer_move_options(
        &self,
        settings: &GameSettings,
        alternate_move_bias: bool,
    ) -> SearchOptions {
        let mut options = if settings.advanced_mode {
            SearchOptions {
                skill_index: settings.skill_index,
                depth_limit: settings.advanced_depth,
                node_limit: settings.advanced_nodes,
                time_limit_ms: settings.advanced_time_ms,
                threads: settings.advanced_threads,
                randomise_opening: false,
                alternate_move_bias: false,
            }
        } else {
            SearchOptions::from_row(settings.skill_index, self.strength.row(settings.skill_index))
        };
        options.randomise_opening = settings.randomise_opening;
        options.alternate_move_bias = alternate_move_bias;
        options
    }

    /// Options for a hint: always the maximum configured strength, with the
    /// randomise-opening and alternate-move-bias flags off
    pub fn hint_options(&self) -> SearchOptions {
        let max = self.strength.max_index();
        SearchOptions::from_row(max, self.strength.row(max))
    }

    /// Spawn a search on a blocking worker against the given handle
    ///
    /// The handle's lock is taken inside the worker, so the handle is
    /// unavailable to everyone else for the duration of the search. The
    /// caller must have claimed the matching gate slot first.
    pub fn spawn_search(
        &self,
        kind: SearchKind,
        engine: EngineHandle,
        options: SearchOptions,
        history_serial: u64,
    ) -> PendingSearch {
        let cancel = CancelToken::new();
        *self.active_cancel.lock() = Some(cancel.clone());

        info!(
            "[SEARCH] spawning {:?} search: depth={} nodes={} time={}ms bias={}",
            kind, options.depth_limit, options.node_limit, options.time_limit_ms,
            options.alternate_move_bias
        );

        let worker_cancel = cancel.clone();
        let task = tokio::task::spawn_blocking(move || {
            let mut guard = engine.lock();
            guard.search(&options, &worker_cancel)
        });

        PendingSearch {
            kind,
            cancel,
            history_serial,
            task,
        }
    }

    /// Cancel any in-flight search
    ///
    /// Idempotent and callable at any time, including when no search is
    /// running. Cancellation is a request: the pending task still completes
    /// and the controller discards its result.
    pub fn stop_search_job(&self) {
        if let Some(cancel) = self.active_cancel.lock().as_ref() {
            debug!("[SEARCH] stop requested, cancelling in-flight search");
            cancel.cancel();
        }
    }

    /// Release the gate slot for a finished search
    pub fn finish(&self, kind: SearchKind) {
        match kind {
            SearchKind::ComputerMove => self.gate.end_computer_move(),
            SearchKind::Hint => self.gate.end_hint(),
        }
        self.gate.unlock_panel();
        *self.active_cancel.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computer_move_options_honor_skill_table() {
        //! Non-advanced mode pulls the triple straight from the table row
        let coordinator = EngineSearchCoordinator::default();
        let settings = GameSettings {
            skill_index: 0,
            advanced_mode: false,
            ..GameSettings::default()
        };

        let options = coordinator.computer_move_options(&settings, false);
        let row = *coordinator.strength().row(0);
        assert_eq!(options.depth_limit, row.depth);
        assert_eq!(options.node_limit, row.nodes);
        assert_eq!(options.time_limit_ms, row.time_ms);
    }

    #[test]
    fn test_advanced_mode_overrides_table() {
        let coordinator = EngineSearchCoordinator::default();
        let settings = GameSettings {
            advanced_mode: true,
            advanced_depth: 33,
            advanced_nodes: 77,
            advanced_time_ms: 99,
            advanced_threads: 4,
            ..GameSettings::default()
        };

        let options = coordinator.computer_move_options(&settings, true);
        assert_eq!(options.depth_limit, 33);
        assert_eq!(options.node_limit, 77);
        assert_eq!(options.time_limit_ms, 99);
        assert_eq!(options.threads, 4);
        assert!(options.alternate_move_bias);
    }

    #[test]
    fn test_hint_options_use_max_strength_with_biases_off() {
        let coordinator = EngineSearchCoordinator::default();
        let options = coordinator.hint_options();
        let max_row = *coordinator.strength().row(coordinator.strength().max_index());

        assert_eq!(options.depth_limit, max_row.depth);
        assert!(!options.randomise_opening);
        assert!(!options.alternate_move_bias);
    }

    #[test]
    fn test_stop_with_no_search_is_a_no_op() {
        //! stop_search_job is idempotent and safe with nothing in flight
        let coordinator = EngineSearchCoordinator::default();
        coordinator.stop_search_job();
        coordinator.stop_search_job();
        assert!(!coordinator.gate().busy());
    }
}
