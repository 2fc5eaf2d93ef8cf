//! # Wren Runtime
//!
//! The two polling loops (clinician producer, child consumer/executor),
//! the observable sync phase machine, message reconciliation, and
//! cooperative playback pacing.

pub mod audio;
pub mod child;
pub mod clinician;
pub mod error;
pub mod sync;

pub use audio::{estimate_duration, PlaybackGate};
pub use child::{wait_for_session, ChildLoop, TurnOutcome};
pub use clinician::{ClinicianLoop, SessionEvent};
pub use error::{RuntimeError, RuntimeResult};
pub use sync::{Reconciler, SyncPhase};
