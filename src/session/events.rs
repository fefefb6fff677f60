//! Session event broadcasting
//!
//! UI shells subscribe for highlight, shake and indicator effects instead
//! of polling controller state. Subscription is explicit: `subscribe`
//! returns an id, `unsubscribe` removes it. Lifetime is managed by the
//! owner, so no weak references are involved.

use crate::animation::AnimationInstruction;
use crate::types::{GameStatus, HighlightMode, PieceColor, Square};

/// Something the shell should reflect on screen
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Highlight these squares in the given mode
    Highlight {
        squares: Vec<Square>,
        mode: HighlightMode,
    },
    /// Shake the piece on this square (rejected move feedback)
    Shake { square: Square },
    /// Check indicator for the side to move
    CheckIndicator {
        colour: PieceColor,
        king: Option<Square>,
        in_check: bool,
    },
    /// Game status changed (checkmate, resignation, ...)
    StatusChanged(GameStatus),
    /// Side to move changed (direction indicator)
    TurnChanged(PieceColor),
    /// Clock display should show these elapsed offsets
    ClockDisplay {
        white_offset: i64,
        black_offset: i64,
    },
    /// Hint squares to announce and highlight
    Hint { from: Square, to: Square },
    /// Animations to play (undo rollback, hint auto-play)
    Animations(Vec<AnimationInstruction>),
    /// User-visible message (engine errors, rejected actions)
    Message(String),
}

/// Receives session events
pub trait SessionObserver: Send {
    fn on_event(&mut self, event: &SessionEvent);
}

/// Id handed out by [`ObserverSet::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

/// Explicit subscriber list with subscribe/unsubscribe
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<(SubscriberId, Box<dyn SessionObserver>)>,
    next_id: u64,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) -> SubscriberId {
        self.next_id += 1;
        let id = SubscriberId(self.next_id);
        self.observers.push((id, observer));
        id
    }

    /// Remove a subscriber; `false` if the id was already gone
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    pub fn emit(&mut self, event: SessionEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer.on_event(&event);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct Recorder(Arc<Mutex<Vec<SessionEvent>>>);

    impl SessionObserver for Recorder {
        fn on_event(&mut self, event: &SessionEvent) {
            self.0.lock().unwrap().push(event.clone());
        }
    }

    #[test]
    fn test_subscribe_and_emit() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut set = ObserverSet::new();
        set.subscribe(Box::new(Recorder(seen.clone())));

        set.emit(SessionEvent::TurnChanged(PieceColor::Black));

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], SessionEvent::TurnChanged(PieceColor::Black));
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut set = ObserverSet::new();
        let id = set.subscribe(Box::new(Recorder(seen.clone())));

        assert!(set.unsubscribe(id));
        assert!(!set.unsubscribe(id), "double unsubscribe reports false");

        set.emit(SessionEvent::Message("ignored".into()));
        assert!(seen.lock().unwrap().is_empty());
    }
}
