//! Hand manager: every player's hand in one session.
//!
//! The `HandManager` owns the `HandState` of each registered player and
//! implements the operations that span hands or need collaborators:
//! - Giving cards, including wildcard draws from the catalog
//! - Dealing starting hands and applying authoritative redistributions
//! - Atomic transfer and random steal between players
//! - The per-round usage gate
//!
//! Hand events are collected into one ordered outbox after each operation.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use super::hand::{HandEvent, HandState, HandSummary};
use crate::cards::{CardCatalog, CardId};
use crate::core::{HandRules, HealthService, PlayerId, RandomSource};

/// Manages the hands of every player in a session.
///
/// ## Usage
///
/// ```
/// use quiz_cards::cards::{CardCatalog, CardId};
/// use quiz_cards::core::{HandRules, PlayerId, ScriptedRandom};
/// use quiz_cards::inventory::HandManager;
///
/// let catalog = CardCatalog::standard();
/// let mut rng = ScriptedRandom::new();
/// let mut hands = HandManager::new(HandRules::default());
///
/// let alice = PlayerId::new(1);
/// hands.register(alice, "Alice");
/// assert!(hands.give(alice, CardId::new(3), 2, &catalog, &mut rng));
/// assert_eq!(hands.count(alice), 2);
/// ```
#[derive(Clone, Debug)]
pub struct HandManager {
    rules: Arc<HandRules>,
    hands: FxHashMap<PlayerId, HandState>,
    events: Vec<HandEvent>,
}

impl HandManager {
    /// Create a manager whose hands all follow `rules`.
    #[must_use]
    pub fn new(rules: HandRules) -> Self {
        Self {
            rules: Arc::new(rules),
            hands: FxHashMap::default(),
            events: Vec::new(),
        }
    }

    /// The shared hand rules.
    #[must_use]
    pub fn rules(&self) -> &HandRules {
        &self.rules
    }

    // === Players ===

    /// Create an empty hand for a player.
    ///
    /// Returns `false` (and keeps the existing hand) if the player is
    /// already registered.
    pub fn register(&mut self, player: PlayerId, display_name: impl Into<String>) -> bool {
        if self.hands.contains_key(&player) {
            return false;
        }
        let hand = HandState::new(player, display_name, Arc::clone(&self.rules));
        debug!(%player, name = hand.display_name(), "hand created");
        self.hands.insert(player, hand);
        true
    }

    /// Destroy a player's hand.
    pub fn remove(&mut self, player: PlayerId) -> Option<HandState> {
        let mut hand = self.hands.remove(&player)?;
        self.events.extend(hand.drain_events());
        debug!(%player, cards = hand.len(), "hand removed");
        Some(hand)
    }

    /// Is the player registered?
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.hands.contains_key(&player)
    }

    /// Get a player's hand.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&HandState> {
        self.hands.get(&player)
    }

    /// Registered players in ascending id order.
    #[must_use]
    pub fn players(&self) -> Vec<PlayerId> {
        let mut players: Vec<_> = self.hands.keys().copied().collect();
        players.sort();
        players
    }

    /// Cards held by a player, empty if unknown.
    #[must_use]
    pub fn cards(&self, player: PlayerId) -> &[CardId] {
        self.hands.get(&player).map_or(&[], |h| h.cards())
    }

    /// Number of cards held by a player, 0 if unknown.
    #[must_use]
    pub fn count(&self, player: PlayerId) -> usize {
        self.hands.get(&player).map_or(0, HandState::len)
    }

    // === Giving cards ===

    /// Add a concrete card to a player's hand, subject to the hand rules.
    pub fn add_card(&mut self, player: PlayerId, card: CardId) -> bool {
        let Some(hand) = self.hands.get_mut(&player) else {
            debug!(%player, %card, "add rejected: unknown player");
            return false;
        };
        let added = hand.add(card);
        if !added {
            debug!(%player, %card, "add rejected by hand rules");
        }
        self.collect(player);
        added
    }

    /// Remove one copy of a card from a player's hand.
    pub fn remove_card(&mut self, player: PlayerId, card: CardId) -> bool {
        let Some(hand) = self.hands.get_mut(&player) else {
            return false;
        };
        let removed = hand.remove(card);
        self.collect(player);
        removed
    }

    /// Give one card. `CardId::WILDCARD` draws a weighted random card from
    /// the catalog; any other id must exist in the catalog.
    pub fn give_card(
        &mut self,
        player: PlayerId,
        card: CardId,
        catalog: &CardCatalog,
        rng: &mut dyn RandomSource,
    ) -> bool {
        let resolved = if card.is_wildcard() {
            match catalog.draw_random(rng) {
                Some(def) => def.id,
                None => {
                    debug!(%player, "wildcard draw failed: empty catalog");
                    return false;
                }
            }
        } else if catalog.contains(card) {
            card
        } else {
            debug!(%player, %card, "give rejected: unknown card");
            return false;
        };

        self.add_card(player, resolved)
    }

    /// Give `count` cards, stopping at the first rejection.
    ///
    /// Returns `true` only if every card was added. Cards added before a
    /// rejection stay in the hand.
    pub fn give(
        &mut self,
        player: PlayerId,
        card: CardId,
        count: usize,
        catalog: &CardCatalog,
        rng: &mut dyn RandomSource,
    ) -> bool {
        (0..count).all(|_| self.give_card(player, card, catalog, rng))
    }

    /// Deal the starting hand: `starting_card_count` weighted draws.
    /// Draws the hand rules reject are skipped. Returns the number dealt.
    pub fn deal_starting(
        &mut self,
        player: PlayerId,
        catalog: &CardCatalog,
        rng: &mut dyn RandomSource,
    ) -> usize {
        let dealt = (0..self.rules.starting_card_count)
            .filter(|_| self.give_card(player, CardId::WILDCARD, catalog, rng))
            .count();
        debug!(%player, dealt, "starting hand dealt");
        dealt
    }

    /// Replace a hand wholesale with an authoritative card list.
    ///
    /// Cards the rules reject are dropped. Returns the number kept, or
    /// `None` for an unknown player.
    pub fn replace_hand(&mut self, player: PlayerId, cards: &[CardId]) -> Option<usize> {
        let hand = self.hands.get_mut(&player)?;
        hand.clear();
        let kept = cards.iter().filter(|&&card| hand.add(card)).count();
        if kept < cards.len() {
            debug!(%player, kept, dropped = cards.len() - kept, "redistribution trimmed");
        }
        self.collect(player);
        Some(kept)
    }

    // === Transfers ===

    /// Move one card between two players as a single step.
    ///
    /// Succeeds only if the players differ, both are alive, the source holds
    /// the card and the destination accepts it. On failure neither hand
    /// changes.
    pub fn transfer(
        &mut self,
        from: PlayerId,
        to: PlayerId,
        card: CardId,
        health: &dyn HealthService,
    ) -> bool {
        if !self.can_transfer(from, to, card, health) {
            return false;
        }

        let removed = self.hands.get_mut(&from).is_some_and(|h| h.remove(card));
        let added = removed && self.hands.get_mut(&to).is_some_and(|h| h.add(card));
        debug_assert!(added, "validated transfer must complete");

        self.collect(from);
        self.collect(to);
        debug!(%from, %to, %card, "card transferred");
        added
    }

    /// Take one uniformly random card from `victim` and give it to `thief`.
    ///
    /// Returns the card taken, or `None` with no mutation when the victim's
    /// hand is empty or the transfer is not allowed.
    pub fn steal_random(
        &mut self,
        victim: PlayerId,
        thief: PlayerId,
        health: &dyn HealthService,
        rng: &mut dyn RandomSource,
    ) -> Option<CardId> {
        let cards = self.cards(victim);
        if cards.is_empty() {
            debug!(%victim, "steal failed: empty hand");
            return None;
        }
        let card = cards[rng.next_index(cards.len()) % cards.len()];
        self.transfer(victim, thief, card, health).then_some(card)
    }

    fn can_transfer(
        &self,
        from: PlayerId,
        to: PlayerId,
        card: CardId,
        health: &dyn HealthService,
    ) -> bool {
        let reason = if from == to {
            "same player"
        } else if !health.is_alive(from) || !health.is_alive(to) {
            "player not alive"
        } else {
            match (self.hands.get(&from), self.hands.get(&to)) {
                (Some(source), Some(dest)) => {
                    if !source.contains(card) {
                        "source does not hold card"
                    } else if !dest.can_accept(card) {
                        "destination cannot accept card"
                    } else {
                        return true;
                    }
                }
                _ => "unknown player",
            }
        };
        debug!(%from, %to, %card, reason, "transfer rejected");
        false
    }

    // === Usage gate ===

    /// May the player use a card this round?
    #[must_use]
    pub fn can_use_card(&self, player: PlayerId) -> bool {
        self.hands
            .get(&player)
            .is_some_and(HandState::can_use_card_this_round)
    }

    /// Spend the player's usage opportunity for this round.
    pub fn mark_used(&mut self, player: PlayerId) {
        if let Some(hand) = self.hands.get_mut(&player) {
            hand.mark_card_used();
        }
    }

    /// Restore one player's usage opportunity. Returns `false` for an
    /// unknown player.
    pub fn reset_usage(&mut self, player: PlayerId) -> bool {
        match self.hands.get_mut(&player) {
            Some(hand) => {
                hand.reset_round();
                true
            }
            None => false,
        }
    }

    /// Restore every player's usage opportunity.
    pub fn reset_all_usage(&mut self) {
        for hand in self.hands.values_mut() {
            hand.reset_round();
        }
    }

    // === Reporting ===

    /// Summary of one hand.
    #[must_use]
    pub fn summary(&self, player: PlayerId) -> Option<HandSummary> {
        self.hands.get(&player).map(HandState::summary)
    }

    /// Summaries of every hand, by ascending player id.
    #[must_use]
    pub fn summaries(&self) -> Vec<HandSummary> {
        self.players()
            .into_iter()
            .filter_map(|p| self.summary(p))
            .collect()
    }

    /// Take the hand events collected since the last call, in order.
    pub fn drain_events(&mut self) -> Vec<HandEvent> {
        std::mem::take(&mut self.events)
    }

    fn collect(&mut self, player: PlayerId) {
        if let Some(hand) = self.hands.get_mut(&player) {
            self.events.extend(hand.drain_events());
        }
    }
}
