//! A single player's hand.
//!
//! `HandState` enforces the hand rules on every insertion and records a
//! `HandEvent` for every mutation. Callers drain the events and forward
//! them to whoever displays hand sizes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardId;
use crate::core::{HandRules, PlayerId};

/// Change notifications emitted by hand mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandEvent {
    /// A card entered the hand.
    CardAdded { player: PlayerId, card: CardId },
    /// A card left the hand.
    CardRemoved { player: PlayerId, card: CardId },
    /// The hand size changed; `count` is the new size.
    SizeChanged { player: PlayerId, count: usize },
}

/// Ordered cards held by one player plus their per-round usage gate.
///
/// Invariants, maintained by every method:
/// - `len() <= max_hand_size`
/// - no card id appears more than `max_same_card_in_hand` times
///   (or more than once when duplicates are disallowed)
/// - banned ids never appear
#[derive(Clone, Debug)]
pub struct HandState {
    player: PlayerId,
    display_name: String,
    cards: SmallVec<[CardId; 8]>,
    can_use_card_this_round: bool,
    rules: Arc<HandRules>,
    events: Vec<HandEvent>,
}

impl HandState {
    /// Create an empty hand. The player may use a card immediately.
    pub fn new(player: PlayerId, display_name: impl Into<String>, rules: Arc<HandRules>) -> Self {
        let display_name = display_name.into();
        let display_name = if display_name.is_empty() {
            format!("Player{}", player.raw())
        } else {
            display_name
        };

        Self {
            player,
            display_name,
            cards: SmallVec::new(),
            can_use_card_this_round: true,
            rules,
            events: Vec::new(),
        }
    }

    /// Owner of the hand.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Owner's display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Cards in the order they were received.
    #[must_use]
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    /// Number of cards held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Is the hand empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Capacity of the hand.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.rules.max_hand_size
    }

    /// Is the hand at capacity?
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cards.len() >= self.rules.max_hand_size
    }

    /// Free slots left.
    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        self.rules.max_hand_size.saturating_sub(self.cards.len())
    }

    /// Does the hand hold at least one copy of `card`?
    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }

    /// Copies of `card` in the hand.
    #[must_use]
    pub fn count_of(&self, card: CardId) -> usize {
        self.cards.iter().filter(|&&c| c == card).count()
    }

    /// Would `add(card)` succeed?
    #[must_use]
    pub fn can_accept(&self, card: CardId) -> bool {
        if self.is_full() || card.is_wildcard() || self.rules.is_banned(card) {
            return false;
        }

        let held = self.count_of(card);
        if !self.rules.allow_duplicates && held > 0 {
            return false;
        }
        held < self.rules.max_same_card_in_hand
    }

    /// Add a card if the rules allow it.
    pub fn add(&mut self, card: CardId) -> bool {
        if !self.can_accept(card) {
            return false;
        }

        self.cards.push(card);
        self.events.push(HandEvent::CardAdded {
            player: self.player,
            card,
        });
        self.push_size_changed();
        true
    }

    /// Remove one copy of a card (the earliest received).
    pub fn remove(&mut self, card: CardId) -> bool {
        let Some(index) = self.cards.iter().position(|&c| c == card) else {
            return false;
        };

        self.cards.remove(index);
        self.events.push(HandEvent::CardRemoved {
            player: self.player,
            card,
        });
        self.push_size_changed();
        true
    }

    /// Empty the hand. Emits a size notification only if it held cards.
    pub fn clear(&mut self) {
        if self.cards.is_empty() {
            return;
        }

        for card in std::mem::take(&mut self.cards) {
            self.events.push(HandEvent::CardRemoved {
                player: self.player,
                card,
            });
        }
        self.push_size_changed();
    }

    /// May the player still use a card this round?
    #[must_use]
    pub fn can_use_card_this_round(&self) -> bool {
        self.can_use_card_this_round
    }

    /// Spend this round's usage opportunity.
    pub fn mark_card_used(&mut self) {
        self.can_use_card_this_round = false;
    }

    /// Restore the usage opportunity for a new round.
    pub fn reset_round(&mut self) {
        self.can_use_card_this_round = true;
    }

    /// Take the queued change notifications.
    pub fn drain_events(&mut self) -> Vec<HandEvent> {
        std::mem::take(&mut self.events)
    }

    /// Summary of this hand.
    #[must_use]
    pub fn summary(&self) -> HandSummary {
        HandSummary {
            player: self.player,
            name: self.display_name.clone(),
            count: self.cards.len(),
            max: self.rules.max_hand_size,
            can_use: self.can_use_card_this_round,
        }
    }

    fn push_size_changed(&mut self) {
        self.events.push(HandEvent::SizeChanged {
            player: self.player,
            count: self.cards.len(),
        });
    }
}

/// Snapshot of a hand for status displays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandSummary {
    pub player: PlayerId,
    pub name: String,
    pub count: usize,
    pub max: usize,
    pub can_use: bool,
}

impl std::fmt::Display for HandSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: hand {}/{}, can use card: {}",
            self.name,
            self.count,
            self.max,
            if self.can_use { "yes" } else { "no" }
        )
    }
}
