//! Session orchestration
//!
//! The controller ties the assembler, history, animation planner and
//! search coordinator into one guarded surface for the shell, with
//! observer-based event delivery for everything that should reach the
//! screen.

mod controller;
mod edit;
mod events;
mod promotion;

pub use controller::{BoardSessionController, SessionOutcome};
pub use edit::EditSelection;
pub use events::{ObserverSet, SessionEvent, SessionObserver, SubscriberId};
pub use promotion::{PromotionGate, PromotionPrompt};
