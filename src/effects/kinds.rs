//! The effect implementations bound to each `EffectKind`.
//!
//! Numeric parameters come from the card's `value`: health points for
//! heals, seconds for time effects, the multiplier for damage boosts, the
//! hit chance for probability damage and the card count for random draws.

use tracing::debug;

use crate::cards::{ids, CardDefinition, CardId};
use crate::core::{EffectError, PlayerId};
use crate::deferred::QuestionType;

use super::context::{EffectContext, EffectResult};
use super::effect::{CardEffect, EffectEnv};

/// Health lost by the target when a probability-damage card hits.
pub const PROBABILITY_HIT_DAMAGE: i32 = 10;

fn target_of(ctx: &EffectContext) -> Result<PlayerId, EffectError> {
    ctx.other_target().ok_or(EffectError::MissingTarget)
}

// === Health ===

/// Restore `value` health to the actor.
#[derive(Clone, Copy, Debug, Default)]
pub struct Heal;

impl CardEffect for Heal {
    fn name(&self) -> &'static str {
        "heal"
    }

    fn can_use(&self, ctx: &EffectContext, _card: &CardDefinition, env: &EffectEnv<'_>) -> bool {
        env.health.is_alive(ctx.actor)
    }

    fn execute(
        &self,
        ctx: &EffectContext,
        card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectResult, EffectError> {
        let amount = card.amount();
        if env.health.modify_health(ctx.actor, amount) {
            Ok(EffectResult::success(format!("restored {amount} health")))
        } else {
            Ok(EffectResult::failure(format!("could not restore {amount} health")))
        }
    }
}

/// Restore `value` health to every alive player.
///
/// Succeeds if at least one player was healed.
#[derive(Clone, Copy, Debug, Default)]
pub struct GroupHeal;

impl CardEffect for GroupHeal {
    fn name(&self) -> &'static str {
        "group_heal"
    }

    fn can_use(&self, _ctx: &EffectContext, _card: &CardDefinition, env: &EffectEnv<'_>) -> bool {
        !env.health.alive_player_ids().is_empty()
    }

    fn execute(
        &self,
        _ctx: &EffectContext,
        card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectResult, EffectError> {
        let amount = card.amount();
        let alive = env.health.alive_player_ids();
        let healed = alive
            .iter()
            .filter(|&&player| env.health.modify_health(player, amount))
            .count();
        debug!(amount, healed, alive = alive.len(), "group heal applied");

        if healed > 0 {
            Ok(EffectResult::success(format!(
                "{healed} players restored {amount} health"
            )))
        } else {
            Ok(EffectResult::failure(format!(
                "no player could restore {amount} health"
            )))
        }
    }
}

/// Hit another player for `PROBABILITY_HIT_DAMAGE` with chance `value`.
///
/// A fresh roll is drawn on every use; the roll hits when `roll <= value`.
#[derive(Clone, Copy, Debug)]
pub struct ProbabilityDamage {
    pub damage: i32,
}

impl Default for ProbabilityDamage {
    fn default() -> Self {
        Self {
            damage: PROBABILITY_HIT_DAMAGE,
        }
    }
}

impl CardEffect for ProbabilityDamage {
    fn name(&self) -> &'static str {
        "probability_damage"
    }

    fn can_use(&self, ctx: &EffectContext, _card: &CardDefinition, env: &EffectEnv<'_>) -> bool {
        env.legal_target(ctx).is_some()
    }

    fn execute(
        &self,
        ctx: &EffectContext,
        card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectResult, EffectError> {
        let target = target_of(ctx)?;
        let roll = env.rng.next_unit();
        let hit = roll <= card.value;
        debug!(%target, roll, chance = card.value, hit, "probability roll");

        if !hit {
            return Ok(EffectResult::success(format!("missed {target}")));
        }
        if env.health.modify_health(target, -self.damage) {
            Ok(EffectResult::success(format!(
                "hit {target} for {} damage",
                self.damage
            )))
        } else {
            Ok(EffectResult::failure(format!(
                "hit {target} but the damage was rejected"
            )))
        }
    }
}

// === Deferred modifiers ===

/// Multiply the next damage calculation by `value`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DamageMultiplier;

impl CardEffect for DamageMultiplier {
    fn name(&self) -> &'static str {
        "damage_multiplier"
    }

    fn can_use(&self, _ctx: &EffectContext, _card: &CardDefinition, _env: &EffectEnv<'_>) -> bool {
        true
    }

    fn execute(
        &self,
        _ctx: &EffectContext,
        card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectResult, EffectError> {
        env.deferred.set_damage_multiplier(card.value);
        Ok(EffectResult::success(format!(
            "next wrong answer deals x{} damage",
            card.value
        )))
    }
}

/// `value` extra seconds on the actor's next question.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddTime;

impl CardEffect for AddTime {
    fn name(&self) -> &'static str {
        "add_time"
    }

    fn can_use(&self, _ctx: &EffectContext, _card: &CardDefinition, _env: &EffectEnv<'_>) -> bool {
        true
    }

    fn execute(
        &self,
        ctx: &EffectContext,
        card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectResult, EffectError> {
        env.deferred.set_time_bonus(ctx.actor, card.value);
        Ok(EffectResult::success(format!(
            "{} extra seconds on your next question",
            card.value
        )))
    }
}

/// `value` fewer seconds on the target's next question.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReduceTime;

impl CardEffect for ReduceTime {
    fn name(&self) -> &'static str {
        "reduce_time"
    }

    fn can_use(&self, ctx: &EffectContext, _card: &CardDefinition, env: &EffectEnv<'_>) -> bool {
        env.legal_target(ctx).is_some()
    }

    fn execute(
        &self,
        ctx: &EffectContext,
        card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectResult, EffectError> {
        let target = target_of(ctx)?;
        env.deferred.set_time_penalty(target, card.value);
        Ok(EffectResult::success(format!(
            "{target} loses {} seconds on their next question",
            card.value
        )))
    }
}

/// Skip the actor's next question.
#[derive(Clone, Copy, Debug, Default)]
pub struct SkipQuestion;

impl CardEffect for SkipQuestion {
    fn name(&self) -> &'static str {
        "skip_question"
    }

    fn can_use(&self, _ctx: &EffectContext, _card: &CardDefinition, _env: &EffectEnv<'_>) -> bool {
        true
    }

    fn execute(
        &self,
        ctx: &EffectContext,
        _card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectResult, EffectError> {
        env.deferred.set_skip(ctx.actor);
        Ok(EffectResult::success("your next question will be skipped"))
    }
}

/// Fix the type of the actor's next question.
#[derive(Clone, Copy, Debug)]
pub struct ForceQuestionType {
    pub question_type: QuestionType,
}

impl ForceQuestionType {
    #[must_use]
    pub const fn new(question_type: QuestionType) -> Self {
        Self { question_type }
    }
}

impl CardEffect for ForceQuestionType {
    fn name(&self) -> &'static str {
        match self.question_type {
            QuestionType::IdiomChain => "force_idiom_chain",
            QuestionType::TrueFalse => "force_true_false",
        }
    }

    fn can_use(&self, _ctx: &EffectContext, _card: &CardDefinition, _env: &EffectEnv<'_>) -> bool {
        true
    }

    fn execute(
        &self,
        ctx: &EffectContext,
        _card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectResult, EffectError> {
        env.deferred.force_question_type(ctx.actor, self.question_type);
        let kind = match self.question_type {
            QuestionType::IdiomChain => "an idiom chain",
            QuestionType::TrueFalse => "a true/false question",
        };
        Ok(EffectResult::success(format!("your next question is {kind}")))
    }
}

/// Let the target answer the actor's next question.
#[derive(Clone, Copy, Debug, Default)]
pub struct AnswerDelegate;

impl CardEffect for AnswerDelegate {
    fn name(&self) -> &'static str {
        "answer_delegate"
    }

    fn can_use(&self, ctx: &EffectContext, _card: &CardDefinition, env: &EffectEnv<'_>) -> bool {
        env.legal_target(ctx).is_some()
    }

    fn execute(
        &self,
        ctx: &EffectContext,
        _card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectResult, EffectError> {
        let target = target_of(ctx)?;
        env.deferred.set_answer_delegate(ctx.actor, target);
        Ok(EffectResult::success(format!(
            "{target} will answer your next question"
        )))
    }
}

// === Card manipulation ===

/// Draw `value` weighted random cards into the actor's hand.
///
/// Stops at the first card the hand rejects; cards already drawn stay.
#[derive(Clone, Copy, Debug, Default)]
pub struct DrawRandom;

impl CardEffect for DrawRandom {
    fn name(&self) -> &'static str {
        "draw_random"
    }

    fn can_use(&self, _ctx: &EffectContext, _card: &CardDefinition, _env: &EffectEnv<'_>) -> bool {
        true
    }

    fn execute(
        &self,
        ctx: &EffectContext,
        card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectResult, EffectError> {
        if !env.hands.contains(ctx.actor) {
            return Err(EffectError::MissingHand(ctx.actor));
        }

        let count = usize::try_from(card.amount()).unwrap_or(0);
        let before = env.hands.count(ctx.actor);
        let complete = env
            .hands
            .give(ctx.actor, CardId::WILDCARD, count, env.catalog, &mut *env.rng);
        let drawn = env.hands.count(ctx.actor) - before;

        if complete {
            Ok(EffectResult::success(format!("drew {drawn} cards")))
        } else {
            Ok(EffectResult::failure(format!(
                "drew {drawn} of {count} cards before the hand was full"
            )))
        }
    }
}

/// Take one random card from the target's hand.
#[derive(Clone, Copy, Debug, Default)]
pub struct StealCard;

impl CardEffect for StealCard {
    fn name(&self) -> &'static str {
        "steal_card"
    }

    fn can_use(&self, ctx: &EffectContext, _card: &CardDefinition, env: &EffectEnv<'_>) -> bool {
        env.legal_target(ctx).is_some()
    }

    fn execute(
        &self,
        ctx: &EffectContext,
        _card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectResult, EffectError> {
        let target = target_of(ctx)?;
        if env.hands.count(target) == 0 {
            return Ok(EffectResult::failure(format!("{target} has no cards to take")));
        }

        match env
            .hands
            .steal_random(target, ctx.actor, &*env.health, &mut *env.rng)
        {
            Some(stolen) => {
                let name = env
                    .catalog
                    .get(stolen)
                    .map_or_else(|| stolen.to_string(), |c| c.name.clone());
                Ok(EffectResult::success(format!("took {name} from {target}")))
            }
            None => Ok(EffectResult::failure(format!(
                "could not take a card from {target}"
            ))),
        }
    }
}

/// Give the actor a fixed number of copies of one card.
#[derive(Clone, Copy, Debug)]
pub struct DrawSpecific {
    pub card: CardId,
    pub count: usize,
}

impl DrawSpecific {
    #[must_use]
    pub const fn new(card: CardId, count: usize) -> Self {
        Self { card, count }
    }
}

impl Default for DrawSpecific {
    /// Two copies of Two Chalks.
    fn default() -> Self {
        Self::new(ids::TWO_CHALKS, 2)
    }
}

impl CardEffect for DrawSpecific {
    fn name(&self) -> &'static str {
        "draw_specific"
    }

    fn can_use(&self, _ctx: &EffectContext, _card: &CardDefinition, _env: &EffectEnv<'_>) -> bool {
        true
    }

    fn execute(
        &self,
        ctx: &EffectContext,
        _card: &CardDefinition,
        env: &mut EffectEnv<'_>,
    ) -> Result<EffectResult, EffectError> {
        if !env.hands.contains(ctx.actor) {
            return Err(EffectError::MissingHand(ctx.actor));
        }

        let name = env
            .catalog
            .get(self.card)
            .map_or_else(|| self.card.to_string(), |c| c.name.clone());
        if env
            .hands
            .give(ctx.actor, self.card, self.count, env.catalog, &mut *env.rng)
        {
            Ok(EffectResult::success(format!("gained {} x {name}", self.count)))
        } else {
            Ok(EffectResult::failure(format!(
                "could not gain {} x {name}",
                self.count
            )))
        }
    }
}
