//! Recorded IMU replay
//!
//! Replays a fixed table of `[gx, gy, gz, ax, ay, az]` rows (deg/s, m/s²)
//! at a fixed 500 Hz rate, wrapping back to the first row after the last.
//! Lets the tracker run on a bench without a sensor attached.

use crate::devices::traits::{ImuError, ImuSample, ImuSensor};

/// Stamp spacing of replayed samples, microseconds
pub const SIMULATED_IMU_PERIOD_US: u64 = 2_000;

/// Wrap-around replay of a recorded sample table
pub struct SimulatedImu<'a> {
    table: &'a [[f64; 6]],
    index: usize,
    timestamp_us: u64,
}

impl<'a> SimulatedImu<'a> {
    pub fn new(table: &'a [[f64; 6]]) -> Self {
        Self {
            table,
            index: 0,
            timestamp_us: 0,
        }
    }

    /// Row returned by the next poll
    pub fn position(&self) -> usize {
        self.index
    }
}

impl ImuSensor for SimulatedImu<'_> {
    fn init(&mut self) -> Result<(), ImuError> {
        if self.table.is_empty() {
            return Err(ImuError::InvalidData);
        }
        Ok(())
    }

    fn poll(&mut self) -> Option<ImuSample> {
        let row = self.table.get(self.index)?;
        self.timestamp_us += SIMULATED_IMU_PERIOD_US;
        self.index = (self.index + 1) % self.table.len();
        Some(ImuSample::from_row(row, self.timestamp_us))
    }
}
