//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores every card definition for a session. It is read
//! only once the session is built: effects and hands look cards up by id and
//! wildcard draws pick from it by weight.

use rustc_hash::FxHashMap;

use super::definition::{CardCategory, CardDefinition, CardId, EffectKind};
use crate::core::{ConfigError, RandomSource};

/// Ids of the standard classroom cards.
pub mod ids {
    use super::CardId;

    pub const MILK_CARTON: CardId = CardId::new(1);
    pub const LEAVE_NOTE: CardId = CardId::new(2);
    pub const TWO_CHALKS: CardId = CardId::new(3);
    pub const THINK_AGAIN: CardId = CardId::new(4);
    pub const IDIOM_CHAIN: CardId = CardId::new(5);
    pub const TRUE_OR_FALSE: CardId = CardId::new(6);
    pub const ART_SHOW: CardId = CardId::new(7);
    pub const EXTRA_TUTORING: CardId = CardId::new(8);
    pub const PAPER_BALL: CardId = CardId::new(9);
    pub const TIME_CUT: CardId = CardId::new(10);
    pub const BORROW_ERASER: CardId = CardId::new(11);
    pub const BOX_OF_CHALK: CardId = CardId::new(12);
}

/// Catalog of card definitions.
///
/// Iteration follows registration order so weighted draws are reproducible
/// for a given random source.
///
/// ## Example
///
/// ```
/// use quiz_cards::cards::{CardCatalog, CardDefinition, CardId, EffectKind};
///
/// let mut catalog = CardCatalog::new();
/// catalog
///     .register(CardDefinition::new(CardId::new(1), "Milk Carton", EffectKind::Heal))
///     .unwrap();
///
/// let found = catalog.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Milk Carton");
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
    order: Vec<CardId>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The twelve standard classroom cards.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for card in standard_cards() {
            // Standard ids are unique and non-zero
            let _ = catalog.register(card);
        }
        catalog
    }

    /// Register a card definition.
    ///
    /// Rejects the wildcard id, duplicate ids, and probability cards whose
    /// hit chance lies outside `[0, 1]`.
    pub fn register(&mut self, card: CardDefinition) -> Result<(), ConfigError> {
        if card.id.is_wildcard() {
            return Err(ConfigError::ReservedCardId);
        }
        if self.cards.contains_key(&card.id) {
            return Err(ConfigError::DuplicateCard(card.id));
        }
        if card.effect == EffectKind::ProbabilityDamage && !(0.0..=1.0).contains(&card.value) {
            return Err(ConfigError::InvalidHitChance {
                card: card.id,
                value: card.value,
            });
        }
        self.order.push(card.id);
        self.cards.insert(card.id, card);
        Ok(())
    }

    /// Build a catalog from definitions, failing on the first invalid one.
    pub fn from_definitions(
        cards: impl IntoIterator<Item = CardDefinition>,
    ) -> Result<Self, ConfigError> {
        let mut catalog = Self::new();
        for card in cards {
            catalog.register(card)?;
        }
        Ok(catalog)
    }

    /// Get a card definition by ID.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Check if a card ID is registered.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.order.iter().filter_map(move |id| self.cards.get(id))
    }

    /// Find cards bound to an effect key.
    pub fn find_by_effect(&self, effect: EffectKind) -> impl Iterator<Item = &CardDefinition> {
        self.iter().filter(move |c| c.effect == effect)
    }

    /// Find cards by targeting category.
    pub fn find_by_category(
        &self,
        category: CardCategory,
    ) -> impl Iterator<Item = &CardDefinition> {
        self.iter().filter(move |c| c.category == category)
    }

    /// Find cards matching a predicate.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &CardDefinition>
    where
        F: Fn(&CardDefinition) -> bool,
    {
        self.iter().filter(move |c| predicate(c))
    }

    /// Draw a card at random, weighted by `draw_weight`.
    ///
    /// Returns `None` for an empty catalog. If every weight is zero the
    /// first registered card is returned.
    pub fn draw_random(&self, rng: &mut dyn RandomSource) -> Option<&CardDefinition> {
        let weights: Vec<f32> = self.iter().map(|c| c.draw_weight).collect();
        match rng.choose_weighted(&weights) {
            Some(index) => self.order.get(index).and_then(|id| self.cards.get(id)),
            None => self.iter().next(),
        }
    }
}

fn standard_cards() -> Vec<CardDefinition> {
    use CardCategory::{PlayerTarget, Special};

    vec![
        CardDefinition::new(ids::MILK_CARTON, "Milk Carton", EffectKind::Heal)
            .with_description("Restore 1 health to yourself")
            .with_draw_weight(15.0),
        CardDefinition::new(ids::LEAVE_NOTE, "Leave Note", EffectKind::SkipQuestion)
            .with_description("Skip your next question")
            .with_draw_weight(12.0),
        CardDefinition::new(ids::TWO_CHALKS, "Two Chalks", EffectKind::DamageMultiplier)
            .with_description("The next wrong answer deals double damage")
            .with_value(2.0)
            .with_draw_weight(8.0),
        CardDefinition::new(ids::THINK_AGAIN, "Think Again", EffectKind::AddTime)
            .with_description("Get 5 extra seconds on your next question")
            .with_value(5.0)
            .with_draw_weight(10.0),
        CardDefinition::new(ids::IDIOM_CHAIN, "Idiom Chain", EffectKind::IdiomChain)
            .with_description("Your next question is an idiom chain")
            .with_draw_weight(5.0),
        CardDefinition::new(ids::TRUE_OR_FALSE, "True or False", EffectKind::TrueFalse)
            .with_description("Your next question is a true/false question")
            .with_draw_weight(12.0),
        CardDefinition::new(ids::ART_SHOW, "Art Show", EffectKind::GroupHeal)
            .with_description("Every alive player restores 1 health")
            .with_category(Special)
            .with_draw_weight(8.0),
        CardDefinition::new(ids::EXTRA_TUTORING, "Extra Tutoring", EffectKind::DrawRandom)
            .with_description("Draw two random cards")
            .with_value(2.0)
            .with_draw_weight(4.0),
        CardDefinition::new(ids::PAPER_BALL, "Paper Ball", EffectKind::ProbabilityDamage)
            .with_description("50% chance to hit another player")
            .with_value(0.5)
            .with_category(PlayerTarget)
            .with_draw_weight(6.0),
        CardDefinition::new(ids::TIME_CUT, "Time Cut", EffectKind::ReduceTime)
            .with_description("Another player loses 3 seconds on their next question")
            .with_value(3.0)
            .with_category(PlayerTarget)
            .with_draw_weight(10.0),
        CardDefinition::new(ids::BORROW_ERASER, "Borrow an Eraser", EffectKind::StealCard)
            .with_description("Take a random card from another player")
            .with_category(PlayerTarget)
            .with_draw_weight(6.0),
        CardDefinition::new(ids::BOX_OF_CHALK, "Box of Chalk", EffectKind::DrawSpecific)
            .with_description("Gain two Two Chalks cards")
            .with_value(2.0)
            .with_draw_weight(2.0),
    ]
}
