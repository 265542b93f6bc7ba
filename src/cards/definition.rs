//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: what effect it
//! triggers, with which numeric value, whether it needs a target, and how
//! likely it is to be drawn. Definitions are loaded once and never change;
//! hands only store `CardId`s.

use serde::{Deserialize, Serialize};

/// Unique identifier for a card definition.
///
/// `CardId::WILDCARD` (0) never names a real card. Passing it to a give
/// operation requests a weighted random draw from the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Wildcard id: "draw a random card".
    pub const WILDCARD: CardId = CardId(0);

    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Is this the wildcard id?
    #[must_use]
    pub const fn is_wildcard(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// How a card picks who it affects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    /// Used on oneself; the target is always the acting player.
    #[default]
    SelfTarget,
    /// Needs another player chosen as target.
    PlayerTarget,
    /// Resolves its own targets (e.g. every alive player).
    Special,
}

/// Effect-type key. Each key is bound to one effect in the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Heal,
    GroupHeal,
    DamageMultiplier,
    ProbabilityDamage,
    AddTime,
    ReduceTime,
    SkipQuestion,
    IdiomChain,
    TrueFalse,
    AnswerDelegate,
    DrawRandom,
    StealCard,
    DrawSpecific,
}

impl EffectKind {
    /// Every effect key, in declaration order.
    pub const ALL: [EffectKind; 13] = [
        EffectKind::Heal,
        EffectKind::GroupHeal,
        EffectKind::DamageMultiplier,
        EffectKind::ProbabilityDamage,
        EffectKind::AddTime,
        EffectKind::ReduceTime,
        EffectKind::SkipQuestion,
        EffectKind::IdiomChain,
        EffectKind::TrueFalse,
        EffectKind::AnswerDelegate,
        EffectKind::DrawRandom,
        EffectKind::StealCard,
        EffectKind::DrawSpecific,
    ];
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use quiz_cards::cards::{CardCategory, CardDefinition, CardId, EffectKind};
///
/// let cut = CardDefinition::new(CardId::new(10), "Time Cut", EffectKind::ReduceTime)
///     .with_value(3.0)
///     .with_category(CardCategory::PlayerTarget);
///
/// assert!(cut.requires_target());
/// assert_eq!(cut.amount(), 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Card name (for display/logging).
    pub name: String,

    /// Rules text.
    pub description: String,

    /// Which registered effect this card triggers.
    pub effect: EffectKind,

    /// Effect parameter: health points, seconds, multiplier, hit chance or
    /// card count, depending on `effect`.
    pub value: f32,

    /// Targeting category.
    pub category: CardCategory,

    /// Can the card be used outside the owner's turn?
    pub usable_off_turn: bool,

    /// Relative weight for random draws.
    pub draw_weight: f32,
}

impl CardDefinition {
    /// Create a new card definition with value 1, self-targeting, usable
    /// off-turn and draw weight 10.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, effect: EffectKind) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            effect,
            value: 1.0,
            category: CardCategory::SelfTarget,
            usable_off_turn: true,
            draw_weight: 10.0,
        }
    }

    /// Set the rules text (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the effect value (builder pattern).
    #[must_use]
    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value;
        self
    }

    /// Set the targeting category (builder pattern).
    #[must_use]
    pub fn with_category(mut self, category: CardCategory) -> Self {
        self.category = category;
        self
    }

    /// Restrict the card to its owner's turn (builder pattern).
    #[must_use]
    pub fn own_turn_only(mut self) -> Self {
        self.usable_off_turn = false;
        self
    }

    /// Set the draw weight (builder pattern).
    #[must_use]
    pub fn with_draw_weight(mut self, weight: f32) -> Self {
        self.draw_weight = weight;
        self
    }

    /// Does this card need a chosen target player?
    #[must_use]
    pub fn requires_target(&self) -> bool {
        self.category == CardCategory::PlayerTarget
    }

    /// The value rounded to a whole amount (health points, cards).
    #[must_use]
    pub fn amount(&self) -> i32 {
        self.value.round() as i32
    }

    /// Display text: name, followed by the value when it is positive.
    #[must_use]
    pub fn display_text(&self) -> String {
        if self.value > 0.0 {
            format!("{} ({})", self.name, self.value)
        } else {
            self.name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Card(42)");
        assert!(!id.is_wildcard());
        assert!(CardId::WILDCARD.is_wildcard());
    }

    #[test]
    fn test_card_definition_defaults() {
        let card = CardDefinition::new(CardId::new(1), "Milk Carton", EffectKind::Heal);
        assert_eq!(card.value, 1.0);
        assert_eq!(card.category, CardCategory::SelfTarget);
        assert!(card.usable_off_turn);
        assert_eq!(card.draw_weight, 10.0);
        assert!(!card.requires_target());
    }

    #[test]
    fn test_card_definition_builder() {
        let card = CardDefinition::new(CardId::new(9), "Paper Ball", EffectKind::ProbabilityDamage)
            .with_description("Throw a paper ball at another player")
            .with_value(0.5)
            .with_category(CardCategory::PlayerTarget)
            .own_turn_only()
            .with_draw_weight(6.0);

        assert_eq!(card.name, "Paper Ball");
        assert_eq!(card.value, 0.5);
        assert!(card.requires_target());
        assert!(!card.usable_off_turn);
        assert_eq!(card.draw_weight, 6.0);
    }

    #[test]
    fn test_amount_rounds() {
        let card = CardDefinition::new(CardId::new(1), "Heal", EffectKind::Heal).with_value(19.6);
        assert_eq!(card.amount(), 20);
    }

    #[test]
    fn test_display_text() {
        let card = CardDefinition::new(CardId::new(4), "Think Again", EffectKind::AddTime)
            .with_value(5.0);
        assert_eq!(card.display_text(), "Think Again (5)");

        let card = card.with_value(0.0);
        assert_eq!(card.display_text(), "Think Again");
    }

    #[test]
    fn test_card_definition_serialization() {
        let card = CardDefinition::new(CardId::new(3), "Two Chalks", EffectKind::DamageMultiplier)
            .with_value(2.0);

        let json = serde_json::to_string(&card).unwrap();
        let deserialized: CardDefinition = serde_json::from_str(&json).unwrap();

        assert_eq!(card, deserialized);
    }
}
