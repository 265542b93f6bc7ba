//! Outbound notifications.
//!
//! The session publishes what happened to a `CardEventSink`. Delivery is
//! fire-and-forget: the session never waits on or inspects the sink.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::PlayerId;
use crate::effects::EffectResult;
use crate::inventory::HandEvent;

/// Something observers (network layer, UI) may want to hear about.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A card was used; `result` is the effect outcome.
    CardUsed {
        player: PlayerId,
        card: CardId,
        target: Option<PlayerId>,
        result: EffectResult,
    },
    /// Free-form text for the players.
    Message { text: String },
    /// A hand changed.
    Hand(HandEvent),
    /// A card moved between two hands.
    CardTransferred {
        from: PlayerId,
        to: PlayerId,
        card: CardId,
    },
    /// A player's usage opportunity was restored.
    UsageReset { player: PlayerId },
}

/// Receiver of session events.
pub trait CardEventSink: Send {
    /// Deliver one event.
    fn publish(&mut self, event: SessionEvent);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl CardEventSink for NullSink {
    fn publish(&mut self, _event: SessionEvent) {}
}

/// Stores events in a shared buffer.
///
/// Clones share the buffer, so a test can keep one clone and hand the
/// other to the session.
///
/// ```
/// use quiz_cards::session::{CardEventSink, RecordingSink, SessionEvent};
///
/// let sink = RecordingSink::new();
/// let mut handle = sink.clone();
/// handle.publish(SessionEvent::Message { text: "hello".into() });
///
/// assert_eq!(sink.len(), 1);
/// assert_eq!(sink.take().len(), 1);
/// assert!(sink.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every recorded event.
    #[must_use]
    pub fn events(&self) -> Vec<SessionEvent> {
        self.buffer().clone()
    }

    /// Remove and return every recorded event.
    pub fn take(&self) -> Vec<SessionEvent> {
        std::mem::take(&mut *self.buffer())
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    /// Was nothing recorded?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer().is_empty()
    }

    fn buffer(&self) -> std::sync::MutexGuard<'_, Vec<SessionEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CardEventSink for RecordingSink {
    fn publish(&mut self, event: SessionEvent) {
        self.buffer().push(event);
    }
}
