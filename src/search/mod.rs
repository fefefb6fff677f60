//! Search orchestration
//!
//! Builds [`SearchOptions`] from the strength table or advanced overrides,
//! enforces single-flight between computer-move and hint searches, and runs
//! engine searches on a blocking worker while the session awaits the result.

mod coordinator;
mod gate;
mod options;

pub use coordinator::{EngineSearchCoordinator, PendingSearch, SearchKind};
pub use gate::SearchGate;
pub use options::{SearchOptions, SearchResult, StrengthRow, StrengthTable};
