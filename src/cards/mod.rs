//! Card system: definitions and catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions (0 is the wildcard)
//! - `EffectKind`: Effect-type key a card is bound to
//! - `CardCategory`: Self-targeting, player-targeting or special
//! - `CardDefinition`: Static card data
//! - `CardCatalog`: Card definition lookup and weighted draws

pub mod catalog;
pub mod definition;

pub use catalog::{ids, CardCatalog};
pub use definition::{CardCategory, CardDefinition, CardId, EffectKind};
