//! The card session: one game's card state and its public operations.
//!
//! `CardSession` combines the registry, executor, hands and deferred cache
//! into the externally visible operations:
//! - `use_card`: validate, spend the card, run its effect
//! - `give_card` / `transfer_card`: move cards into and between hands
//! - the four deferred-state hooks
//! - lifecycle signals (join, leave, turn ended) and queries
//!
//! Requests are handled one at a time to completion. Hosts that share a
//! session between threads wrap it in a mutex.

use tracing::{debug, info};

use crate::cards::{CardCatalog, CardCategory, CardId};
use crate::core::{
    CardSystemConfig, HealthService, PlayerId, RandomSource, UseCardError,
};
use crate::deferred::{DeferredStateCache, QuestionStart, QuestionType};
use crate::effects::{EffectContext, EffectEnv, EffectExecutor, EffectRegistry, EffectResult};
use crate::inventory::{HandManager, HandSummary};

use super::events::{CardEventSink, SessionEvent};

/// All card state for one game session.
///
/// Created by `SessionBuilder::build`.
pub struct CardSession {
    pub(super) config: CardSystemConfig,
    pub(super) catalog: CardCatalog,
    pub(super) registry: EffectRegistry,
    pub(super) executor: EffectExecutor,
    pub(super) deferred: DeferredStateCache,
    pub(super) hands: HandManager,
    pub(super) health: Box<dyn HealthService + Send>,
    pub(super) rng: Box<dyn RandomSource + Send>,
    pub(super) sink: Box<dyn CardEventSink>,
    pub(super) current_turn: Option<PlayerId>,
}

impl CardSession {
    // === Card use ===

    /// Use a card.
    ///
    /// Validation failures leave every hand untouched and report the reason.
    /// Once validation passes, the card leaves the hand and the round's
    /// usage opportunity is spent before the effect runs, so a failing
    /// effect still consumes both.
    pub fn use_card(&mut self, ctx: EffectContext) -> EffectResult {
        let ctx = match self.validate(ctx) {
            Ok(ctx) => ctx,
            Err(err) => {
                debug!(actor = %ctx.actor, card = %ctx.card, reason = %err, "card use rejected");
                return err.into();
            }
        };

        let Some(card) = self.catalog.get(ctx.card) else {
            return UseCardError::UnknownCard(ctx.card).into();
        };
        let Some(effect) = self.registry.resolve(card.effect) else {
            return UseCardError::EffectNotRegistered(card.effect).into();
        };

        let mut env = EffectEnv {
            health: &mut *self.health,
            deferred: &mut self.deferred,
            hands: &mut self.hands,
            catalog: &self.catalog,
            rng: &mut *self.rng,
        };

        if let Err(err) = self.executor.check(effect, &ctx, card, &env) {
            debug!(actor = %ctx.actor, card = %ctx.card, "card use refused by effect");
            return err.into();
        }

        env.hands.remove_card(ctx.actor, ctx.card);
        if self.config.round.one_card_per_round {
            env.hands.mark_used(ctx.actor);
        }

        let result = self.executor.run(effect, &ctx, card, &mut env);
        info!(
            actor = %ctx.actor,
            card = %card.name,
            target = ?ctx.target,
            success = result.success,
            "card used"
        );

        let text = format!("{} used {}: {}", ctx.actor, card.name, result.message);
        self.flush_hand_events();
        self.sink.publish(SessionEvent::CardUsed {
            player: ctx.actor,
            card: ctx.card,
            target: ctx.target,
            result: result.clone(),
        });
        self.sink.publish(SessionEvent::Message { text });
        result
    }

    /// Check a request and prepare its target.
    ///
    /// Self-targeting cards get the actor as target; player-targeting cards
    /// need a present, alive target; special cards keep whatever was sent.
    fn validate(&self, mut ctx: EffectContext) -> Result<EffectContext, UseCardError> {
        let actor = ctx.actor;
        let hand = self
            .hands
            .get(actor)
            .ok_or(UseCardError::UnknownPlayer(actor))?;

        if self.config.round.one_card_per_round && !hand.can_use_card_this_round() {
            return Err(UseCardError::UsageSpent(actor));
        }
        if !hand.contains(ctx.card) {
            return Err(UseCardError::CardNotInHand {
                player: actor,
                card: ctx.card,
            });
        }

        let card = self
            .catalog
            .get(ctx.card)
            .ok_or(UseCardError::UnknownCard(ctx.card))?;

        let off_turn_allowed = card.usable_off_turn && self.config.round.allow_off_turn_use;
        if !off_turn_allowed && self.current_turn.is_some_and(|turn| turn != actor) {
            return Err(UseCardError::NotYourTurn(ctx.card));
        }

        match card.category {
            CardCategory::SelfTarget => ctx.target = Some(actor),
            CardCategory::PlayerTarget => {
                let target = ctx.target.ok_or(UseCardError::MissingTarget(ctx.card))?;
                if !self.health.is_alive(target) {
                    return Err(UseCardError::IllegalTarget { target });
                }
            }
            CardCategory::Special => {}
        }

        if !self.registry.contains(card.effect) {
            return Err(UseCardError::EffectNotRegistered(card.effect));
        }
        Ok(ctx)
    }

    // === Giving and moving cards ===

    /// Give `count` copies of a card, or `count` random cards for
    /// `CardId::WILDCARD`. Returns `true` only if all were added.
    pub fn give_card(&mut self, player: PlayerId, card: CardId, count: usize) -> bool {
        let given = self
            .hands
            .give(player, card, count, &self.catalog, &mut *self.rng);
        debug!(%player, %card, count, given, "give card");
        self.flush_hand_events();
        given
    }

    /// Move a card between two alive players. On failure nothing changes.
    pub fn transfer_card(&mut self, from: PlayerId, to: PlayerId, card: CardId) -> bool {
        let moved = self.hands.transfer(from, to, card, &*self.health);
        self.flush_hand_events();
        if moved {
            self.sink
                .publish(SessionEvent::CardTransferred { from, to, card });
        }
        moved
    }

    // === Deferred-state hooks ===

    /// Call before starting a player's question timer.
    pub fn on_timer_starting(&mut self, player: PlayerId, base_seconds: f32) -> f32 {
        self.deferred.on_timer_starting(player, base_seconds)
    }

    /// Call before a player's question begins.
    pub fn on_question_starting(&mut self, player: PlayerId) -> QuestionStart {
        self.deferred.on_question_starting(player)
    }

    /// Call before choosing the type of a player's next question.
    pub fn on_question_type_selecting(&mut self, player: PlayerId) -> Option<QuestionType> {
        self.deferred.on_question_type_selecting(player)
    }

    /// Call before finalizing a damage amount.
    pub fn on_damage_calculating(&mut self, raw_damage: i32) -> i32 {
        self.deferred.on_damage_calculating(raw_damage)
    }

    // === Lifecycle ===

    /// A player joined: create their hand and deal the starting cards.
    /// Returns `false` if the player already has a hand.
    pub fn player_joined(&mut self, player: PlayerId, display_name: impl Into<String>) -> bool {
        if !self.hands.register(player, display_name) {
            return false;
        }
        let dealt = self
            .hands
            .deal_starting(player, &self.catalog, &mut *self.rng);
        info!(%player, dealt, "player joined");
        self.flush_hand_events();
        true
    }

    /// A player left: drop their hand and pending deferred state.
    pub fn player_left(&mut self, player: PlayerId) -> bool {
        let removed = self.hands.remove(player).is_some();
        self.deferred.clear_player(player);
        if self.current_turn == Some(player) {
            self.current_turn = None;
        }
        if removed {
            info!(%player, "player left");
        }
        self.flush_hand_events();
        removed
    }

    /// Apply an authoritative hand. Cards the rules reject are dropped.
    /// Returns the number of cards kept, `None` for an unknown player.
    pub fn replace_hand(&mut self, player: PlayerId, cards: &[CardId]) -> Option<usize> {
        let kept = self.hands.replace_hand(player, cards);
        self.flush_hand_events();
        kept
    }

    /// Record whose turn it is, for cards restricted to their owner's turn.
    pub fn set_current_turn(&mut self, player: Option<PlayerId>) {
        self.current_turn = player;
    }

    /// A player's turn ended: restore their usage opportunity.
    pub fn turn_ended(&mut self, player: PlayerId) {
        if self.hands.reset_usage(player) {
            debug!(%player, "card usage reset");
            self.sink.publish(SessionEvent::UsageReset { player });
        }
    }

    /// Restore every player's usage opportunity.
    pub fn reset_all_usage(&mut self) {
        self.hands.reset_all_usage();
        for player in self.hands.players() {
            self.sink.publish(SessionEvent::UsageReset { player });
        }
    }

    /// Drop all pending deferred state, e.g. when a new game starts.
    pub fn clear_deferred_state(&mut self) {
        self.deferred.clear_all();
    }

    // === Queries ===

    /// Cards held by a player.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[CardId] {
        self.hands.cards(player)
    }

    /// Number of cards held by a player.
    #[must_use]
    pub fn hand_count(&self, player: PlayerId) -> usize {
        self.hands.count(player)
    }

    /// Could the player use a card right now, as far as the round gate goes?
    #[must_use]
    pub fn can_use_card(&self, player: PlayerId) -> bool {
        match self.hands.get(player) {
            Some(hand) => !self.config.round.one_card_per_round || hand.can_use_card_this_round(),
            None => false,
        }
    }

    /// Hand summary of one player.
    #[must_use]
    pub fn summary(&self, player: PlayerId) -> Option<HandSummary> {
        self.hands.summary(player)
    }

    /// Hand summaries of every player.
    #[must_use]
    pub fn all_summaries(&self) -> Vec<HandSummary> {
        self.hands.summaries()
    }

    /// Players with a hand, ascending.
    #[must_use]
    pub fn players(&self) -> Vec<PlayerId> {
        self.hands.players()
    }

    /// Pending deferred state (read-only).
    #[must_use]
    pub fn deferred(&self) -> &DeferredStateCache {
        &self.deferred
    }

    /// The card catalog.
    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    /// The effect registry.
    #[must_use]
    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    /// Mutable access to the effect registry, for runtime rebinding.
    pub fn registry_mut(&mut self) -> &mut EffectRegistry {
        &mut self.registry
    }

    /// The health service.
    #[must_use]
    pub fn health(&self) -> &dyn HealthService {
        &*self.health
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &CardSystemConfig {
        &self.config
    }

    /// Whose turn it is, if known.
    #[must_use]
    pub fn current_turn(&self) -> Option<PlayerId> {
        self.current_turn
    }

    fn flush_hand_events(&mut self) {
        for event in self.hands.drain_events() {
            self.sink.publish(SessionEvent::Hand(event));
        }
    }
}

impl std::fmt::Debug for CardSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardSession")
            .field("config", &self.config)
            .field("cards", &self.catalog.len())
            .field("registry", &self.registry)
            .field("hands", &self.hands.summaries())
            .field("deferred", &self.deferred.summary())
            .field("current_turn", &self.current_turn)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::cards::ids;
    use crate::core::{HealthLedger, RoundRules, ScriptedRandom};
    use crate::inventory::HandEvent;
    use crate::session::{RecordingSink, SessionBuilder};

    fn p(n: u32) -> PlayerId {
        PlayerId::new(n)
    }

    struct Fixture {
        session: CardSession,
        health: Arc<Mutex<HealthLedger>>,
        sink: RecordingSink,
    }

    fn fixture_with(config: CardSystemConfig, rng: ScriptedRandom) -> Fixture {
        let mut ledger = HealthLedger::new(3);
        for n in 1..=3 {
            ledger.add_player_with(p(n), 2);
        }
        let health = Arc::new(Mutex::new(ledger));
        let sink = RecordingSink::new();

        let mut session = SessionBuilder::new()
            .with_config(config)
            .with_catalog(CardCatalog::standard())
            .with_health(Arc::clone(&health))
            .with_rng(rng)
            .with_sink(sink.clone())
            .build()
            .unwrap();
        for n in 1..=3 {
            session.hands.register(p(n), format!("P{n}"));
        }
        sink.take();

        Fixture {
            session,
            health,
            sink,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(CardSystemConfig::default(), ScriptedRandom::new())
    }

    #[test]
    fn test_use_self_card() {
        let mut f = fixture();
        f.session.replace_hand(p(1), &[ids::MILK_CARTON]);

        let result = f
            .session
            .use_card(EffectContext::new(p(1), ids::MILK_CARTON));
        assert!(result.success, "{result}");
        assert_eq!(f.health.lock().unwrap().health(p(1)), Some(3));
        assert_eq!(f.session.hand_count(p(1)), 0);
        assert!(!f.session.can_use_card(p(1)));
    }

    #[test]
    fn test_second_use_in_round_rejected() {
        let mut f = fixture();
        f.session
            .replace_hand(p(1), &[ids::LEAVE_NOTE, ids::THINK_AGAIN]);

        assert!(f.session.use_card(EffectContext::new(p(1), ids::LEAVE_NOTE)).success);
        let second = f.session.use_card(EffectContext::new(p(1), ids::THINK_AGAIN));
        assert!(!second.success);
        assert_eq!(second.message, "Player 1 has already used a card this round");
        assert_eq!(f.session.hand(p(1)), &[ids::THINK_AGAIN]);

        f.session.turn_ended(p(1));
        assert!(f.session.use_card(EffectContext::new(p(1), ids::THINK_AGAIN)).success);
    }

    #[test]
    fn test_gate_disabled() {
        let config = CardSystemConfig::new().with_round_rules(RoundRules {
            one_card_per_round: false,
            allow_off_turn_use: true,
        });
        let mut f = fixture_with(config, ScriptedRandom::new());
        f.session
            .replace_hand(p(1), &[ids::LEAVE_NOTE, ids::THINK_AGAIN]);

        assert!(f.session.use_card(EffectContext::new(p(1), ids::LEAVE_NOTE)).success);
        assert!(f.session.can_use_card(p(1)));
        assert!(f.session.use_card(EffectContext::new(p(1), ids::THINK_AGAIN)).success);
    }

    #[test]
    fn test_card_not_held() {
        let mut f = fixture();
        let result = f.session.use_card(EffectContext::new(p(1), ids::LEAVE_NOTE));
        assert_eq!(result.message, "Player 1 does not hold Card(2)");

        let result = f.session.use_card(EffectContext::new(p(9), ids::LEAVE_NOTE));
        assert_eq!(result.message, "Player 9 has no hand in this session");
    }

    #[test]
    fn test_off_turn_rule() {
        let config = CardSystemConfig::new().with_round_rules(RoundRules {
            one_card_per_round: true,
            allow_off_turn_use: false,
        });
        let mut f = fixture_with(config, ScriptedRandom::new());
        f.session.replace_hand(p(1), &[ids::LEAVE_NOTE]);

        f.session.set_current_turn(Some(p(2)));
        let result = f.session.use_card(EffectContext::new(p(1), ids::LEAVE_NOTE));
        assert_eq!(result.message, "Card(2) can only be used on your own turn");
        assert_eq!(f.session.hand_count(p(1)), 1);

        f.session.set_current_turn(Some(p(1)));
        assert!(f.session.use_card(EffectContext::new(p(1), ids::LEAVE_NOTE)).success);
    }

    #[test]
    fn test_target_preparation() {
        let mut f = fixture();
        f.session
            .replace_hand(p(1), &[ids::TIME_CUT, ids::TIME_CUT, ids::THINK_AGAIN]);

        // player-target card without target
        let result = f.session.use_card(EffectContext::new(p(1), ids::TIME_CUT));
        assert_eq!(result.message, "Card(10) needs a target player");

        // dead target
        f.health.lock().unwrap().add_player_with(p(2), 0);
        let result = f
            .session
            .use_card(EffectContext::new(p(1), ids::TIME_CUT).with_target(p(2)));
        assert_eq!(result.message, "Player 2 is not a legal target");
        assert_eq!(f.session.hand_count(p(1)), 3);

        // self card ignores the requested target
        let result = f
            .session
            .use_card(EffectContext::new(p(1), ids::THINK_AGAIN).with_target(p(3)));
        assert!(result.success);
        assert_eq!(f.session.deferred().time_bonus(p(1)), Some(5.0));
        assert_eq!(f.session.deferred().time_bonus(p(3)), None);
    }

    #[test]
    fn test_unregistered_effect_at_use_time() {
        let mut f = fixture();
        f.session.replace_hand(p(1), &[ids::LEAVE_NOTE]);
        f.session
            .registry_mut()
            .unregister(crate::cards::EffectKind::SkipQuestion);

        let result = f.session.use_card(EffectContext::new(p(1), ids::LEAVE_NOTE));
        assert_eq!(result.message, "no effect registered for SkipQuestion");
        assert_eq!(f.session.hand_count(p(1)), 1);
        assert!(f.session.can_use_card(p(1)));
    }

    #[test]
    fn test_refused_effect_keeps_card() {
        let mut f = fixture();
        f.session.replace_hand(p(1), &[ids::TIME_CUT]);

        let result = f
            .session
            .use_card(EffectContext::new(p(1), ids::TIME_CUT).with_target(p(1)));
        assert_eq!(result.message, "cannot use this card right now");
        assert_eq!(f.session.hand(p(1)), &[ids::TIME_CUT]);
        assert!(f.session.can_use_card(p(1)));
        assert!(f.session.deferred().is_empty());
    }

    #[test]
    fn test_failed_effect_still_spends_card() {
        let mut f = fixture();
        // P2 holds nothing to steal
        f.session.replace_hand(p(1), &[ids::BORROW_ERASER]);

        let result = f
            .session
            .use_card(EffectContext::new(p(1), ids::BORROW_ERASER).with_target(p(2)));
        assert!(!result.success);
        assert_eq!(f.session.hand_count(p(1)), 0);
        assert!(!f.session.can_use_card(p(1)));
    }

    #[test]
    fn test_events_published() {
        let mut f = fixture();
        f.session.replace_hand(p(1), &[ids::LEAVE_NOTE]);
        f.sink.take();

        f.session.use_card(EffectContext::new(p(1), ids::LEAVE_NOTE));
        let events = f.sink.take();

        assert_eq!(
            events[..2],
            [
                SessionEvent::Hand(HandEvent::CardRemoved {
                    player: p(1),
                    card: ids::LEAVE_NOTE
                }),
                SessionEvent::Hand(HandEvent::SizeChanged {
                    player: p(1),
                    count: 0
                }),
            ]
        );
        assert!(matches!(
            &events[2],
            SessionEvent::CardUsed { player, result, .. } if *player == p(1) && result.success
        ));
        assert_eq!(
            events[3],
            SessionEvent::Message {
                text: "Player 1 used Leave Note: your next question will be skipped".to_string()
            }
        );
    }

    #[test]
    fn test_transfer_card() {
        let mut f = fixture();
        f.session.replace_hand(p(1), &[ids::TIME_CUT]);
        f.sink.take();

        assert!(f.session.transfer_card(p(1), p(2), ids::TIME_CUT));
        assert_eq!(f.session.hand(p(2)), &[ids::TIME_CUT]);
        assert!(f.sink.events().contains(&SessionEvent::CardTransferred {
            from: p(1),
            to: p(2),
            card: ids::TIME_CUT,
        }));

        assert!(!f.session.transfer_card(p(1), p(2), ids::TIME_CUT));
    }

    #[test]
    fn test_player_lifecycle() {
        let mut f = fixture_with(
            CardSystemConfig::default(),
            ScriptedRandom::new().with_units([0.0, 0.0, 0.0]),
        );

        assert!(f.session.player_joined(p(4), "Dora"));
        assert!(!f.session.player_joined(p(4), "Dora"));
        assert_eq!(f.session.hand(p(4)), &[ids::MILK_CARTON; 3]);

        f.session.set_current_turn(Some(p(4)));
        f.session.replace_hand(p(4), &[ids::LEAVE_NOTE]);
        f.session.use_card(EffectContext::new(p(4), ids::LEAVE_NOTE));
        assert!(f.session.deferred().is_skip_pending(p(4)));

        assert!(f.session.player_left(p(4)));
        assert!(!f.session.deferred().is_skip_pending(p(4)));
        assert_eq!(f.session.current_turn(), None);
        assert!(!f.session.player_left(p(4)));
        assert_eq!(f.session.players(), vec![p(1), p(2), p(3)]);
    }

    #[test]
    fn test_reset_all_usage() {
        let mut f = fixture();
        f.session.replace_hand(p(1), &[ids::LEAVE_NOTE]);
        f.session.replace_hand(p(2), &[ids::LEAVE_NOTE]);
        f.session.use_card(EffectContext::new(p(1), ids::LEAVE_NOTE));
        f.session.use_card(EffectContext::new(p(2), ids::LEAVE_NOTE));
        f.sink.take();

        f.session.reset_all_usage();
        assert!(f.session.can_use_card(p(1)));
        assert!(f.session.can_use_card(p(2)));
        assert_eq!(f.sink.len(), 3);
    }

    #[test]
    fn test_summaries_and_debug() {
        let mut f = fixture();
        f.session.replace_hand(p(2), &[ids::LEAVE_NOTE]);

        assert_eq!(
            f.session.summary(p(2)).unwrap().to_string(),
            "P2: hand 1/5, can use card: yes"
        );
        assert_eq!(f.session.all_summaries().len(), 3);
        assert!(format!("{:?}", f.session).starts_with("CardSession"));
    }
}
