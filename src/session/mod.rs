//! Game session: the externally visible card operations.
//!
//! ## Key Types
//!
//! - `SessionBuilder`: Collects collaborators and checks readiness
//! - `CardSession`: Use, give and transfer cards; deferred hooks; lifecycle
//! - `CardEventSink`: Receiver of `SessionEvent` notifications

mod builder;
mod coordinator;
mod events;

pub use builder::SessionBuilder;
pub use coordinator::CardSession;
pub use events::{CardEventSink, NullSink, RecordingSink, SessionEvent};
