//! # Wren Session Store
//!
//! Store traits and the in-memory implementation behind which the two
//! front-end processes coordinate. All cross-process invariants (readiness
//! latch, single active session, message ordering) are re-derivable purely
//! from store contents; there is no shared in-process state.

pub mod error;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::{EmotionFeed, NewSession, SessionStore};
