//! Lighthouse subsystem
//!
//! Connects the photodiode capture hardware to the pulse-decoding state
//! machine and hands committed sweep periods to the pose tracker.
//!
//! ```text
//! capture IRQ ──► LighthouseReceiver ──► SharedState<PulseData>
//!                                               │ read_timings
//!                          SimulatedLighthouse  ▼
//!                          ─────────────► TimingSource ──► PoseTracker
//! ```

pub mod receiver;
pub mod simulated;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use receiver::LighthouseReceiver;
pub use simulated::SimulatedLighthouse;
pub use traits::TimingSource;
