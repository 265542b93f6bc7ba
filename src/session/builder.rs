//! Session construction and readiness checks.

use tracing::info;

use crate::cards::CardCatalog;
use crate::core::{CardSystemConfig, HealthService, RandomSource, SessionError};
use crate::deferred::DeferredStateCache;
use crate::effects::{EffectExecutor, EffectRegistry};
use crate::inventory::HandManager;

use super::coordinator::CardSession;
use super::events::{CardEventSink, NullSink};

/// Builder for a `CardSession`.
///
/// `build` is the readiness gate: it fails unless the configuration is
/// valid, every collaborator is present and every catalog card's effect
/// key is registered. A `CardSession` therefore never exists in a
/// half-initialized state.
///
/// ## Example
///
/// ```
/// use quiz_cards::cards::CardCatalog;
/// use quiz_cards::core::{GameRng, HealthLedger};
/// use quiz_cards::session::SessionBuilder;
///
/// let session = SessionBuilder::new()
///     .with_catalog(CardCatalog::standard())
///     .with_health(HealthLedger::new(3))
///     .with_rng(GameRng::new(7))
///     .build()
///     .unwrap();
///
/// assert!(session.players().is_empty());
/// ```
pub struct SessionBuilder {
    config: CardSystemConfig,
    catalog: Option<CardCatalog>,
    registry: EffectRegistry,
    health: Option<Box<dyn HealthService + Send>>,
    rng: Option<Box<dyn RandomSource + Send>>,
    sink: Box<dyn CardEventSink>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    /// Default configuration, built-in effects, no collaborators, and a
    /// sink that discards events.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: CardSystemConfig::default(),
            catalog: None,
            registry: EffectRegistry::with_defaults(),
            health: None,
            rng: None,
            sink: Box::new(NullSink),
        }
    }

    /// Set the configuration.
    #[must_use]
    pub fn with_config(mut self, config: CardSystemConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the card catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: CardCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Replace the effect registry.
    #[must_use]
    pub fn with_registry(mut self, registry: EffectRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Set the health service.
    #[must_use]
    pub fn with_health(mut self, health: impl HealthService + Send + 'static) -> Self {
        self.health = Some(Box::new(health));
        self
    }

    /// Set the random source.
    #[must_use]
    pub fn with_rng(mut self, rng: impl RandomSource + Send + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Set the event sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl CardEventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Validate everything and create the session.
    pub fn build(self) -> Result<CardSession, SessionError> {
        self.config.validate()?;
        let catalog = self
            .catalog
            .ok_or(SessionError::MissingCollaborator("card catalog"))?;
        let health = self
            .health
            .ok_or(SessionError::MissingCollaborator("health service"))?;
        let rng = self
            .rng
            .ok_or(SessionError::MissingCollaborator("random source"))?;

        if let Some(card) = catalog.iter().find(|c| !self.registry.contains(c.effect)) {
            return Err(SessionError::UnboundEffect {
                card: card.id,
                kind: card.effect,
            });
        }

        info!(
            cards = catalog.len(),
            effects = self.registry.len(),
            max_hand_size = self.config.hand.max_hand_size,
            "card session ready"
        );

        Ok(CardSession {
            executor: EffectExecutor::new(self.config.executor_budget),
            hands: HandManager::new(self.config.hand.clone()),
            deferred: DeferredStateCache::new(),
            config: self.config,
            catalog,
            registry: self.registry,
            health,
            rng,
            sink: self.sink,
            current_turn: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId, EffectKind};
    use crate::core::{ConfigError, HandRules, HealthLedger, ScriptedRandom};

    fn complete() -> SessionBuilder {
        SessionBuilder::new()
            .with_catalog(CardCatalog::standard())
            .with_health(HealthLedger::new(3))
            .with_rng(ScriptedRandom::new())
    }

    #[test]
    fn test_build_complete() {
        let session = complete().build().unwrap();
        assert_eq!(session.catalog().len(), 12);
        assert_eq!(session.config().hand.max_hand_size, 5);
    }

    #[test]
    fn test_missing_collaborators() {
        let err = SessionBuilder::new()
            .with_health(HealthLedger::new(3))
            .with_rng(ScriptedRandom::new())
            .build()
            .unwrap_err();
        assert_eq!(err, SessionError::MissingCollaborator("card catalog"));

        let err = SessionBuilder::new()
            .with_catalog(CardCatalog::standard())
            .with_rng(ScriptedRandom::new())
            .build()
            .unwrap_err();
        assert_eq!(err, SessionError::MissingCollaborator("health service"));

        let err = SessionBuilder::new()
            .with_catalog(CardCatalog::standard())
            .with_health(HealthLedger::new(3))
            .build()
            .unwrap_err();
        assert_eq!(err, SessionError::MissingCollaborator("random source"));
    }

    #[test]
    fn test_invalid_config() {
        let config =
            CardSystemConfig::new().with_hand_rules(HandRules::default().with_max_hand_size(0));
        let err = complete().with_config(config).build().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Config(ConfigError::InvalidHandSize { got: 0, .. })
        ));
    }

    #[test]
    fn test_unbound_effect() {
        let mut registry = EffectRegistry::with_defaults();
        registry.unregister(EffectKind::StealCard);

        let err = complete().with_registry(registry).build().unwrap_err();
        assert_eq!(
            err,
            SessionError::UnboundEffect {
                card: CardId::new(11),
                kind: EffectKind::StealCard,
            }
        );
    }

    #[test]
    fn test_empty_registry_with_empty_catalog() {
        let catalog = CardCatalog::new();
        let session = complete()
            .with_catalog(catalog)
            .with_registry(EffectRegistry::new())
            .build();
        assert!(session.is_ok());

        let catalog = CardCatalog::from_definitions([CardDefinition::new(
            CardId::new(1),
            "Milk",
            EffectKind::Heal,
        )])
        .unwrap();
        let err = complete()
            .with_catalog(catalog)
            .with_registry(EffectRegistry::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, SessionError::UnboundEffect { .. }));
    }
}
