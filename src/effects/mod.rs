//! Card effects: what happens when a card is used.
//!
//! - `CardEffect`: Behavior bound to an effect key (`can_use` + `execute`)
//! - `EffectEnv`: Mutable view of health, hands, deferred state and randomness
//! - `EffectRegistry`: Effect key to implementation mapping
//! - `EffectExecutor`: Runs an effect behind a failure boundary
//!
//! ## Design Philosophy
//!
//! Effects are small stateless values. All state they touch is lent to them
//! through `EffectEnv`, so one registry can serve any number of sessions and
//! effects are trivially testable against in-memory collaborators.
//!
//! Immediate effects (heals, damage, card draws) change health or hands
//! directly. Deferred effects only write into the `DeferredStateCache`; the
//! change becomes visible when the game loop calls the matching hook.

mod context;
mod effect;
mod executor;
mod kinds;
mod registry;

pub use context::{EffectContext, EffectResult};
pub use effect::{CardEffect, EffectEnv};
pub use executor::{EffectExecutor, DEFAULT_BUDGET};
pub use kinds::{
    AddTime, AnswerDelegate, DamageMultiplier, DrawRandom, DrawSpecific, ForceQuestionType,
    GroupHeal, Heal, ProbabilityDamage, ReduceTime, SkipQuestion, StealCard,
    PROBABILITY_HIT_DAMAGE,
};
pub use registry::EffectRegistry;
