//! Sweep timing source abstraction
//!
//! The pose tracker pulls one committed base-station period per tick through
//! `TimingSource`. The live receiver and the recorded replay both implement
//! it, so the tracker carries no simulation switch.

use lighthouse_tracker_core::lighthouse::types::{BaseStationMode, StationTimings};

/// Source of committed base-station periods
pub trait TimingSource {
    /// Next unread period of the station broadcasting `mode`
    ///
    /// Returns `None` when no new period is available; callers retry on the
    /// next tick.
    fn read_timings(&mut self, mode: BaseStationMode) -> Option<StationTimings>;
}
