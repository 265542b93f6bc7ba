//! Card system configuration.
//!
//! Sessions are configured at construction by providing:
//! - `HandRules`: capacity, duplicate and ban rules for every hand
//! - `RoundRules`: how often and when cards may be used
//! - `CardSystemConfig`: combines both with the executor budget
//!
//! All types derive serde so an embedding application can load them from
//! whatever format it uses. Defaults match the shipped classroom rules.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use crate::cards::CardId;

/// Largest hand size a configuration may request.
pub const MAX_HAND_SIZE_LIMIT: usize = 20;

/// Capacity and composition rules applied to every hand.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandRules {
    /// Maximum number of cards a hand can hold.
    pub max_hand_size: usize,

    /// Cards dealt when a player joins.
    pub starting_card_count: usize,

    /// Can a hand hold more than one copy of the same card?
    pub allow_duplicates: bool,

    /// Maximum copies of one card id in a hand.
    pub max_same_card_in_hand: usize,

    /// Card ids that may never enter a hand.
    pub banned_cards: Vec<CardId>,
}

impl Default for HandRules {
    fn default() -> Self {
        Self {
            max_hand_size: 5,
            starting_card_count: 3,
            allow_duplicates: true,
            max_same_card_in_hand: 3,
            banned_cards: Vec::new(),
        }
    }
}

impl HandRules {
    /// Set the maximum hand size.
    #[must_use]
    pub fn with_max_hand_size(mut self, max: usize) -> Self {
        self.max_hand_size = max;
        self
    }

    /// Set the number of cards dealt on join.
    #[must_use]
    pub fn with_starting_cards(mut self, count: usize) -> Self {
        self.starting_card_count = count;
        self
    }

    /// Forbid duplicate card ids in a hand.
    #[must_use]
    pub fn without_duplicates(mut self) -> Self {
        self.allow_duplicates = false;
        self
    }

    /// Set the per-card copy limit.
    #[must_use]
    pub fn with_max_same_card(mut self, max: usize) -> Self {
        self.max_same_card_in_hand = max;
        self
    }

    /// Ban a card id from all hands.
    #[must_use]
    pub fn with_banned(mut self, card: CardId) -> Self {
        if !self.banned_cards.contains(&card) {
            self.banned_cards.push(card);
        }
        self
    }

    /// Check whether a card id is banned.
    #[must_use]
    pub fn is_banned(&self, card: CardId) -> bool {
        self.banned_cards.contains(&card)
    }

    /// Validate the rules.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_hand_size == 0 || self.max_hand_size > MAX_HAND_SIZE_LIMIT {
            return Err(ConfigError::InvalidHandSize {
                got: self.max_hand_size,
                max: MAX_HAND_SIZE_LIMIT,
            });
        }
        if self.starting_card_count > self.max_hand_size {
            return Err(ConfigError::StartingCardsExceedHand {
                starting: self.starting_card_count,
                max_hand: self.max_hand_size,
            });
        }
        if self.max_same_card_in_hand == 0 {
            return Err(ConfigError::InvalidSameCardLimit);
        }
        Ok(())
    }
}

/// Card usage rules for a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundRules {
    /// At most one card use per player until their turn ends.
    pub one_card_per_round: bool,

    /// When false, every card is restricted to the owner's turn regardless
    /// of its own off-turn flag.
    pub allow_off_turn_use: bool,
}

impl Default for RoundRules {
    fn default() -> Self {
        Self {
            one_card_per_round: true,
            allow_off_turn_use: true,
        }
    }
}

/// Complete card system configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardSystemConfig {
    /// Rules for every hand.
    pub hand: HandRules,

    /// Rules for card usage within a round.
    pub round: RoundRules,

    /// Wall-clock budget for one effect execution. Exceeding it is logged,
    /// not enforced.
    pub executor_budget: Duration,
}

impl Default for CardSystemConfig {
    fn default() -> Self {
        Self {
            hand: HandRules::default(),
            round: RoundRules::default(),
            executor_budget: Duration::from_secs(10),
        }
    }
}

impl CardSystemConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hand rules.
    #[must_use]
    pub fn with_hand_rules(mut self, hand: HandRules) -> Self {
        self.hand = hand;
        self
    }

    /// Set the round rules.
    #[must_use]
    pub fn with_round_rules(mut self, round: RoundRules) -> Self {
        self.round = round;
        self
    }

    /// Set the executor budget.
    #[must_use]
    pub fn with_executor_budget(mut self, budget: Duration) -> Self {
        self.executor_budget = budget;
        self
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hand.validate()
    }
}
