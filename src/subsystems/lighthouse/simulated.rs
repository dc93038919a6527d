//! Recorded sweep replay
//!
//! Replays a fixed table of eight-channel tick offsets, one row per call,
//! wrapping back to the first row after the last. Base-station tilt stays
//! constant for the whole recording.

use lighthouse_tracker_core::lighthouse::types::{
    BaseStationMode, StationTimings, CHANNEL_COUNT,
};

use super::traits::TimingSource;

/// Wrap-around replay of recorded sweep timings
pub struct SimulatedLighthouse<'a> {
    table: &'a [[u32; CHANNEL_COUNT]],
    index: usize,
    pitch_deg: f64,
    roll_deg: f64,
}

impl<'a> SimulatedLighthouse<'a> {
    pub fn new(table: &'a [[u32; CHANNEL_COUNT]], pitch_deg: f64, roll_deg: f64) -> Self {
        Self {
            table,
            index: 0,
            pitch_deg,
            roll_deg,
        }
    }

    /// Row returned by the next read
    pub fn position(&self) -> usize {
        self.index
    }
}

impl TimingSource for SimulatedLighthouse<'_> {
    /// Every recorded row is reported as a clean period of the requested
    /// station: one detection per channel, zero pulse widths.
    fn read_timings(&mut self, mode: BaseStationMode) -> Option<StationTimings> {
        let ticks = *self.table.get(self.index)?;
        self.index = (self.index + 1) % self.table.len();
        Some(StationTimings {
            ticks,
            detections: [1; CHANNEL_COUNT],
            widths: [0; CHANNEL_COUNT],
            pitch_deg: self.pitch_deg,
            roll_deg: self.roll_deg,
            mode,
        })
    }
}
