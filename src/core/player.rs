//! Player identification.
//!
//! Players are identified by the id the session host assigns when they join.
//! Ids are not dense (players leave and rejoin), so per-player data is kept in
//! hash maps keyed by `PlayerId` rather than in an indexed vector.

use serde::{Deserialize, Serialize};

/// Player identifier assigned by the session host.
///
/// "No player" is expressed as `Option<PlayerId>`, never as a sentinel value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

impl From<u32> for PlayerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p = PlayerId::new(7);
        assert_eq!(p.raw(), 7);
        assert_eq!(format!("{}", p), "Player 7");
        assert_eq!(PlayerId::from(7), p);
    }

    #[test]
    fn test_player_id_ordering() {
        let mut ids = vec![PlayerId::new(3), PlayerId::new(1), PlayerId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![PlayerId::new(1), PlayerId::new(2), PlayerId::new(3)]);
    }

    #[test]
    fn test_player_id_serialization() {
        let p = PlayerId::new(4);
        let json = serde_json::to_string(&p).unwrap();
        let deserialized: PlayerId = serde_json::from_str(&json).unwrap();
        assert_eq!(p, deserialized);
    }
}
