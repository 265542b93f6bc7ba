//! Error types.
//!
//! Validation failures and contained execution faults are never surfaced as
//! panics or propagated errors from the public "use card" path: they are
//! turned into a failed `EffectResult` whose message is the `Display` text of
//! the error. The enums exist so callers that want structure can match on it.

use thiserror::Error;

use super::player::PlayerId;
use crate::cards::{CardId, EffectKind};

/// Invalid configuration or catalog data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("max hand size must be between 1 and {max}, got {got}")]
    InvalidHandSize { got: usize, max: usize },

    #[error("starting card count {starting} exceeds max hand size {max_hand}")]
    StartingCardsExceedHand { starting: usize, max_hand: usize },

    #[error("max copies of one card in hand must be at least 1")]
    InvalidSameCardLimit,

    #[error("card id 0 is reserved for wildcard draws")]
    ReservedCardId,

    #[error("duplicate card id {0}")]
    DuplicateCard(CardId),

    #[error("{card} has hit chance {value}, expected a value in [0, 1]")]
    InvalidHitChance { card: CardId, value: f32 },
}

/// Reasons a card use is rejected before its effect runs.
///
/// None of these consume the card or the round's usage opportunity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UseCardError {
    #[error("{0} has no hand in this session")]
    UnknownPlayer(PlayerId),

    #[error("{0} has already used a card this round")]
    UsageSpent(PlayerId),

    #[error("{player} does not hold {card}")]
    CardNotInHand { player: PlayerId, card: CardId },

    #[error("{0} is not in the catalog")]
    UnknownCard(CardId),

    #[error("{0} can only be used on your own turn")]
    NotYourTurn(CardId),

    #[error("{0} needs a target player")]
    MissingTarget(CardId),

    #[error("{target} is not a legal target")]
    IllegalTarget { target: PlayerId },

    #[error("no effect registered for {0:?}")]
    EffectNotRegistered(EffectKind),

    #[error("cannot use this card right now")]
    CannotUse,
}

/// Faults raised while an effect executes.
///
/// The executor contains these and reports them as
/// `execution failed: <cause>`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    #[error("{0} has no hand")]
    MissingHand(PlayerId),

    #[error("effect needs a target player")]
    MissingTarget,

    #[error("{0}")]
    Fault(String),
}

/// The session could not be made ready.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("session is missing its {0}")]
    MissingCollaborator(&'static str),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{card} uses {kind:?}, which has no registered effect")]
    UnboundEffect { card: CardId, kind: EffectKind },
}
