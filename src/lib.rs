//! # quiz-cards
//!
//! Card effect engine for a multiplayer quiz game.
//!
//! Players hold a hand of cards. Using a card validates the request, spends
//! the card and runs its effect against shared game state. Some effects act
//! immediately (heals, damage, card draws); others are *deferred* and only
//! change the outcome of a later game-loop event such as the next question
//! timer or the next damage calculation.
//!
//! ## Design Principles
//!
//! 1. **One Session, No Globals**: `CardSession` owns the registry, the
//!    executor, every hand and the deferred cache. Create one per game.
//!
//! 2. **Collaborators Behind Traits**: Health, randomness and notification
//!    delivery are injected (`HealthService`, `RandomSource`,
//!    `CardEventSink`). Scripted randomness makes every effect testable.
//!
//! 3. **Exactly-Once Deferred Effects**: Every hook consumes what it applies.
//!
//! 4. **Failures Are Results**: Validation failures and effect faults come
//!    back as a failed `EffectResult`, never as a panic.
//!
//! ## Modules
//!
//! - `core`: Players, configuration, errors, randomness, health
//! - `cards`: Card definitions and the catalog
//! - `inventory`: Hands, transfers and the per-round usage gate
//! - `effects`: Effect trait, implementations, registry and executor
//! - `deferred`: Deferred-state cache and game-loop hooks
//! - `session`: Session builder and the public card operations
//!
//! ## Example
//!
//! ```
//! use quiz_cards::{
//!     CardCatalog, EffectContext, GameRng, HealthLedger, PlayerId, SessionBuilder,
//! };
//! use quiz_cards::cards::ids;
//!
//! let mut health = HealthLedger::new(3);
//! health.add_player(PlayerId::new(1));
//!
//! let mut session = SessionBuilder::new()
//!     .with_catalog(CardCatalog::standard())
//!     .with_health(health)
//!     .with_rng(GameRng::new(42))
//!     .build()
//!     .unwrap();
//!
//! let alice = PlayerId::new(1);
//! session.player_joined(alice, "Alice");
//! session.replace_hand(alice, &[ids::TWO_CHALKS]);
//!
//! let result = session.use_card(EffectContext::new(alice, ids::TWO_CHALKS));
//! assert!(result.success);
//!
//! // Deferred: the next damage calculation is doubled, once.
//! assert_eq!(session.on_damage_calculating(10), 20);
//! assert_eq!(session.on_damage_calculating(10), 10);
//! ```

pub mod core;
pub mod cards;
pub mod inventory;
pub mod effects;
pub mod deferred;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    PlayerId,
    GameRng, RandomSource, ScriptedRandom,
    CardSystemConfig, HandRules, RoundRules,
    HealthLedger, HealthService,
    ConfigError, EffectError, SessionError, UseCardError,
};

pub use crate::cards::{CardCatalog, CardCategory, CardDefinition, CardId, EffectKind};

pub use crate::inventory::{HandEvent, HandManager, HandState, HandSummary};

pub use crate::effects::{
    CardEffect, EffectContext, EffectEnv, EffectExecutor, EffectRegistry, EffectResult,
};

pub use crate::deferred::{DeferredStateCache, QuestionStart, QuestionType};

pub use crate::session::{CardEventSink, CardSession, NullSink, RecordingSink, SessionBuilder, SessionEvent};
