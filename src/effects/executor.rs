//! Runs effects behind a failure boundary.
//!
//! `check` asks the effect whether it can be used; `run` executes it and
//! turns any error or panic into a failed `EffectResult`. Execution time is
//! measured against an advisory budget: overruns are logged, not cancelled.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use crate::cards::CardDefinition;
use crate::core::UseCardError;

use super::context::{EffectContext, EffectResult};
use super::effect::{CardEffect, EffectEnv};

/// Default execution budget.
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(10);

/// Executes resolved effects.
///
/// ## Example
///
/// ```
/// use quiz_cards::cards::{CardCatalog, CardDefinition, CardId, EffectKind};
/// use quiz_cards::core::{HandRules, HealthLedger, PlayerId, ScriptedRandom};
/// use quiz_cards::deferred::DeferredStateCache;
/// use quiz_cards::effects::{EffectContext, EffectEnv, EffectExecutor, SkipQuestion};
/// use quiz_cards::inventory::HandManager;
///
/// let mut health = HealthLedger::new(3);
/// let mut deferred = DeferredStateCache::new();
/// let mut hands = HandManager::new(HandRules::default());
/// let catalog = CardCatalog::standard();
/// let mut rng = ScriptedRandom::new();
///
/// let mut env = EffectEnv {
///     health: &mut health,
///     deferred: &mut deferred,
///     hands: &mut hands,
///     catalog: &catalog,
///     rng: &mut rng,
/// };
///
/// let card = CardDefinition::new(CardId::new(2), "Leave Note", EffectKind::SkipQuestion);
/// let ctx = EffectContext::new(PlayerId::new(1), card.id);
///
/// let result = EffectExecutor::default().execute(&SkipQuestion, &ctx, &card, &mut env);
/// assert!(result.success);
/// assert!(deferred.is_skip_pending(PlayerId::new(1)));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct EffectExecutor {
    budget: Duration,
}

impl Default for EffectExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_BUDGET)
    }
}

impl EffectExecutor {
    /// Create an executor with an execution budget.
    #[must_use]
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    /// The execution budget.
    #[must_use]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Check, then run. A refused check returns the fixed "cannot use"
    /// failure without touching any state.
    pub fn execute(
        &self,
        effect: &dyn CardEffect,
        ctx: &EffectContext,
        card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> EffectResult {
        match self.check(effect, ctx, card, env) {
            Ok(()) => self.run(effect, ctx, card, env),
            Err(err) => err.into(),
        }
    }

    /// Ask the effect whether this request may proceed.
    ///
    /// A panicking `can_use` counts as a refusal.
    pub fn check(
        &self,
        effect: &dyn CardEffect,
        ctx: &EffectContext,
        card: &CardDefinition,
        env: &EffectEnv<'_>,
    ) -> Result<(), UseCardError> {
        let allowed = catch_unwind(AssertUnwindSafe(|| effect.can_use(ctx, card, env)))
            .unwrap_or_else(|payload| {
                error!(
                    effect = effect.name(),
                    cause = %panic_message(payload.as_ref()),
                    "can_use panicked"
                );
                false
            });

        if allowed {
            Ok(())
        } else {
            debug!(effect = effect.name(), actor = %ctx.actor, card = %ctx.card, "effect refused use");
            Err(UseCardError::CannotUse)
        }
    }

    /// Run an effect that already passed `check`.
    ///
    /// Errors and panics are logged and reported as
    /// `execution failed: <cause>`; nothing escapes.
    pub fn run(
        &self,
        effect: &dyn CardEffect,
        ctx: &EffectContext,
        card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> EffectResult {
        let started = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| effect.execute(ctx, card, env)));
        let elapsed = started.elapsed();

        if elapsed > self.budget {
            warn!(
                effect = effect.name(),
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = self.budget.as_millis() as u64,
                "effect exceeded execution budget"
            );
        }

        let cause = match outcome {
            Ok(Ok(result)) => {
                debug!(
                    effect = effect.name(),
                    actor = %ctx.actor,
                    success = result.success,
                    message = %result.message,
                    "effect executed"
                );
                return result;
            }
            Ok(Err(err)) => err.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        error!(effect = effect.name(), actor = %ctx.actor, card = %ctx.card, %cause, "effect execution failed");
        EffectResult::failure(format!("execution failed: {cause}"))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic".to_string()
    }
}
