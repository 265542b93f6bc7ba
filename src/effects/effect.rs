//! The `CardEffect` trait and the state it runs against.
//!
//! An effect never reaches for global state. The session lends it an
//! `EffectEnv` holding mutable access to health, hands, deferred state
//! and randomness for the duration of one call.

use crate::cards::{CardCatalog, CardDefinition};
use crate::core::{EffectError, HealthService, PlayerId, RandomSource};
use crate::deferred::DeferredStateCache;
use crate::inventory::HandManager;

use super::context::{EffectContext, EffectResult};

/// Everything an effect may read or change.
///
/// Effects write deferred modifiers through `deferred`; hooks are the only
/// readers that consume them.
pub struct EffectEnv<'a> {
    /// Player health collaborator.
    pub health: &'a mut dyn HealthService,
    /// Pending one-shot modifiers.
    pub deferred: &'a mut DeferredStateCache,
    /// Every player's hand.
    pub hands: &'a mut HandManager,
    /// Card definitions, for draws.
    pub catalog: &'a CardCatalog,
    /// Randomness for rolls and draws.
    pub rng: &'a mut dyn RandomSource,
}

impl EffectEnv<'_> {
    /// The request's target if it is another, alive player.
    #[must_use]
    pub fn legal_target(&self, ctx: &EffectContext) -> Option<PlayerId> {
        ctx.other_target().filter(|&t| self.health.is_alive(t))
    }
}

/// Behavior bound to an effect key.
///
/// `can_use` must not mutate anything; `execute` is only called after
/// `can_use` returned `true` for the same request. Errors returned from
/// `execute` are contained by the executor and reported as a failed result.
pub trait CardEffect: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Can this card be used for this request right now?
    fn can_use(&self, ctx: &EffectContext, card: &CardDefinition, env: &EffectEnv<'_>) -> bool;

    /// Apply the effect.
    fn execute(
        &self,
        ctx: &EffectContext,
        card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectResult, EffectError>;

    /// Player-facing description of what the card does.
    fn describe(&self, card: &CardDefinition) -> String {
        card.description.clone()
    }
}
