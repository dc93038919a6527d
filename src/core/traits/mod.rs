//! Platform-agnostic traits used by the firmware layer
//!
//! `SharedState` lives here because its interrupt-safe backend depends on
//! `embassy-sync`; the pure `TimeSource` comes from the core crate and is
//! re-exported for convenience.

pub mod sync;

pub use lighthouse_tracker_core::traits::{MockTime, TimeSource};
pub use sync::{CriticalSectionState, MockState, SharedState};
