//! Effect registry: binds each `EffectKind` to one `CardEffect`.

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::cards::EffectKind;
use crate::deferred::QuestionType;

use super::effect::CardEffect;
use super::kinds::{
    AddTime, AnswerDelegate, DamageMultiplier, DrawRandom, DrawSpecific, ForceQuestionType,
    GroupHeal, Heal, ProbabilityDamage, ReduceTime, SkipQuestion, StealCard,
};

/// Mapping from effect key to effect implementation.
///
/// ## Example
///
/// ```
/// use quiz_cards::cards::EffectKind;
/// use quiz_cards::effects::{EffectRegistry, Heal};
///
/// let mut registry = EffectRegistry::new();
/// registry.register(EffectKind::Heal, Heal);
///
/// assert!(registry.resolve(EffectKind::Heal).is_some());
/// assert!(registry.resolve(EffectKind::StealCard).is_none());
/// ```
#[derive(Default)]
pub struct EffectRegistry {
    effects: FxHashMap<EffectKind, Box<dyn CardEffect>>,
}

impl EffectRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in effect bound to its key.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(EffectKind::Heal, Heal);
        registry.register(EffectKind::GroupHeal, GroupHeal);
        registry.register(EffectKind::DamageMultiplier, DamageMultiplier);
        registry.register(EffectKind::ProbabilityDamage, ProbabilityDamage::default());
        registry.register(EffectKind::AddTime, AddTime);
        registry.register(EffectKind::ReduceTime, ReduceTime);
        registry.register(EffectKind::SkipQuestion, SkipQuestion);
        registry.register(
            EffectKind::IdiomChain,
            ForceQuestionType::new(QuestionType::IdiomChain),
        );
        registry.register(
            EffectKind::TrueFalse,
            ForceQuestionType::new(QuestionType::TrueFalse),
        );
        registry.register(EffectKind::AnswerDelegate, AnswerDelegate);
        registry.register(EffectKind::DrawRandom, DrawRandom);
        registry.register(EffectKind::StealCard, StealCard);
        registry.register(EffectKind::DrawSpecific, DrawSpecific::default());
        registry
    }

    /// Bind an effect to a key, replacing any existing binding.
    pub fn register(&mut self, kind: EffectKind, effect: impl CardEffect + 'static) {
        self.register_boxed(kind, Box::new(effect));
    }

    /// Bind an already boxed effect to a key.
    pub fn register_boxed(&mut self, kind: EffectKind, effect: Box<dyn CardEffect>) {
        let name = effect.name();
        if let Some(old) = self.effects.insert(kind, effect) {
            warn!(?kind, old = old.name(), new = name, "effect binding replaced");
        } else {
            debug!(?kind, effect = name, "effect registered");
        }
    }

    /// Remove a binding. Returns `false` if the key was not bound.
    pub fn unregister(&mut self, kind: EffectKind) -> bool {
        if self.effects.remove(&kind).is_some() {
            debug!(?kind, "effect unregistered");
            true
        } else {
            debug!(?kind, "unregister ignored: no effect bound");
            false
        }
    }

    /// Look up the effect bound to a key.
    #[must_use]
    pub fn resolve(&self, kind: EffectKind) -> Option<&dyn CardEffect> {
        self.effects.get(&kind).map(|e| e.as_ref())
    }

    /// Is the key bound?
    #[must_use]
    pub fn contains(&self, kind: EffectKind) -> bool {
        self.effects.contains_key(&kind)
    }

    /// Number of bound keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Is the registry empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Bound keys with their effects, in `EffectKind::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (EffectKind, &dyn CardEffect)> {
        EffectKind::ALL
            .into_iter()
            .filter_map(move |kind| self.resolve(kind).map(|e| (kind, e)))
    }
}

impl std::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(kind, effect)| (kind, effect.name())))
            .finish()
    }
}
