//! Health service seam.
//!
//! The card engine does not own player health. It asks a `HealthService`
//! to apply deltas and to report who is alive. `HealthLedger` is a plain
//! in-memory implementation used by tests and by hosts without their own
//! health tracking.

use std::sync::{Arc, Mutex, PoisonError};

use rustc_hash::FxHashMap;
use tracing::debug;

use super::player::PlayerId;

/// Health operations the card engine depends on.
pub trait HealthService {
    /// Apply a health delta. Returns `false` if the change was rejected
    /// (unknown or dead player, healing at full health, zero delta).
    fn modify_health(&mut self, player: PlayerId, delta: i32) -> bool;

    /// Is the player known and alive?
    fn is_alive(&self, player: PlayerId) -> bool;

    /// Every alive player, in ascending id order.
    fn alive_player_ids(&self) -> Vec<PlayerId>;
}

/// A shared service: the session drives it while the host keeps a handle
/// to read health between card uses.
impl<H: HealthService + ?Sized> HealthService for Arc<Mutex<H>> {
    fn modify_health(&mut self, player: PlayerId, delta: i32) -> bool {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .modify_health(player, delta)
    }

    fn is_alive(&self, player: PlayerId) -> bool {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_alive(player)
    }

    fn alive_player_ids(&self) -> Vec<PlayerId> {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .alive_player_ids()
    }
}

/// In-memory health table.
///
/// A player is alive while their health is above zero. Healing is capped at
/// `max_health`; a heal on a player already at the cap is rejected.
///
/// ```
/// use quiz_cards::core::{HealthLedger, HealthService, PlayerId};
///
/// let mut ledger = HealthLedger::new(3);
/// ledger.add_player(PlayerId::new(1));
///
/// assert!(ledger.modify_health(PlayerId::new(1), -1));
/// assert_eq!(ledger.health(PlayerId::new(1)), Some(2));
/// assert!(ledger.modify_health(PlayerId::new(1), 5));
/// assert_eq!(ledger.health(PlayerId::new(1)), Some(3));
/// ```
#[derive(Clone, Debug)]
pub struct HealthLedger {
    max_health: i32,
    health: FxHashMap<PlayerId, i32>,
}

impl HealthLedger {
    /// Create an empty ledger with the given health cap.
    #[must_use]
    pub fn new(max_health: i32) -> Self {
        Self {
            max_health,
            health: FxHashMap::default(),
        }
    }

    /// Add a player at full health. Existing players are reset.
    pub fn add_player(&mut self, player: PlayerId) {
        self.health.insert(player, self.max_health);
    }

    /// Add a player with explicit health, clamped to `0..=max_health`.
    pub fn add_player_with(&mut self, player: PlayerId, health: i32) {
        self.health.insert(player, health.clamp(0, self.max_health));
    }

    /// Remove a player.
    pub fn remove_player(&mut self, player: PlayerId) {
        self.health.remove(&player);
    }

    /// Current health of a player.
    #[must_use]
    pub fn health(&self, player: PlayerId) -> Option<i32> {
        self.health.get(&player).copied()
    }

    /// The health cap.
    #[must_use]
    pub fn max_health(&self) -> i32 {
        self.max_health
    }
}

impl HealthService for HealthLedger {
    fn modify_health(&mut self, player: PlayerId, delta: i32) -> bool {
        let max = self.max_health;
        let Some(current) = self.health.get_mut(&player) else {
            debug!(%player, delta, "health change rejected: unknown player");
            return false;
        };

        if delta == 0 || *current <= 0 {
            debug!(%player, delta, health = *current, "health change rejected");
            return false;
        }
        if delta > 0 && *current >= max {
            debug!(%player, delta, "heal rejected: already at full health");
            return false;
        }

        *current = (*current + delta).clamp(0, max);
        debug!(%player, delta, health = *current, "health changed");
        true
    }

    fn is_alive(&self, player: PlayerId) -> bool {
        self.health.get(&player).is_some_and(|&h| h > 0)
    }

    fn alive_player_ids(&self) -> Vec<PlayerId> {
        let mut alive: Vec<_> = self
            .health
            .iter()
            .filter(|(_, &h)| h > 0)
            .map(|(&p, _)| p)
            .collect();
        alive.sort();
        alive
    }
}
