//! Core engine types: players, configuration, errors, randomness, health.
//!
//! This module contains the building blocks shared by the card, effect,
//! deferred-state and session layers.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;
pub mod health;

pub use player::PlayerId;
pub use rng::{GameRng, RandomSource, ScriptedRandom};
pub use config::{CardSystemConfig, HandRules, RoundRules, MAX_HAND_SIZE_LIMIT};
pub use health::{HealthLedger, HealthService};
pub use error::{ConfigError, EffectError, SessionError, UseCardError};
