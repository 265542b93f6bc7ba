//! Player hands and card movement.
//!
//! ## Key Types
//!
//! - `HandState`: One player's ordered cards and usage gate
//! - `HandEvent`: Change notification queued by every hand mutation
//! - `HandSummary`: Status-line snapshot of a hand
//! - `HandManager`: All hands in a session, transfers and steals

pub mod hand;
pub mod manager;

pub use hand::{HandEvent, HandState, HandSummary};
pub use manager::HandManager;
