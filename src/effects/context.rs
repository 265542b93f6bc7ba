//! Request and result values for a single card use.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::core::{PlayerId, UseCardError};

/// A request to use one card.
///
/// Built by the caller, consumed by one `use_card` call.
///
/// ```
/// use quiz_cards::cards::CardId;
/// use quiz_cards::core::PlayerId;
/// use quiz_cards::effects::EffectContext;
///
/// let ctx = EffectContext::new(PlayerId::new(1), CardId::new(9))
///     .with_target(PlayerId::new(2))
///     .at(12.5);
/// assert_eq!(ctx.target, Some(PlayerId::new(2)));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectContext {
    /// Player using the card.
    pub actor: PlayerId,
    /// Card being used.
    pub card: CardId,
    /// Chosen target, if any.
    pub target: Option<PlayerId>,
    /// Game-clock time of the request, in seconds.
    pub timestamp: f64,
}

impl EffectContext {
    /// Request without a target at time zero.
    #[must_use]
    pub fn new(actor: PlayerId, card: CardId) -> Self {
        Self {
            actor,
            card,
            target: None,
            timestamp: 0.0,
        }
    }

    /// Set the target player (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: PlayerId) -> Self {
        self.target = Some(target);
        self
    }

    /// Set the request time (builder pattern).
    #[must_use]
    pub fn at(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The target, if it is someone other than the actor.
    #[must_use]
    pub fn other_target(&self) -> Option<PlayerId> {
        self.target.filter(|&t| t != self.actor)
    }
}

/// Outcome of a card use: success flag plus a message for the players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectResult {
    pub success: bool,
    pub message: String,
}

impl EffectResult {
    /// A successful outcome.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A failed outcome.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Did the effect succeed?
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl From<UseCardError> for EffectResult {
    fn from(err: UseCardError) -> Self {
        Self::failure(err.to_string())
    }
}

impl std::fmt::Display for EffectResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.success { "ok" } else { "failed" };
        write!(f, "[{}] {}", status, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_target() {
        let ctx = EffectContext::new(PlayerId::new(1), CardId::new(10));
        assert_eq!(ctx.other_target(), None);

        let ctx = ctx.with_target(PlayerId::new(1));
        assert_eq!(ctx.other_target(), None);

        let ctx = ctx.with_target(PlayerId::new(2));
        assert_eq!(ctx.other_target(), Some(PlayerId::new(2)));
    }

    #[test]
    fn test_result_from_error() {
        let result: EffectResult = UseCardError::CannotUse.into();
        assert!(!result.is_success());
        assert_eq!(result.message, "cannot use this card right now");
        assert_eq!(result.to_string(), "[failed] cannot use this card right now");
    }

    #[test]
    fn test_context_serialization() {
        let ctx = EffectContext::new(PlayerId::new(3), CardId::new(2)).at(4.0);
        let json = serde_json::to_string(&ctx).unwrap();
        let back: EffectContext = serde_json::from_str(&json).unwrap();
        assert_eq!(ctx, back);
    }
}
