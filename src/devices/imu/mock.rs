//! Mock IMU implementation for testing
//!
//! Provides a scripted IMU that implements the `ImuSensor` trait. Samples
//! are stamped from the injected `TimeSource` when polled, so tests control
//! the integration step by advancing the clock.
//!
//! ## Usage
//!
//! ```ignore
//! use lighthouse_tracker::core::traits::MockTime;
//! use lighthouse_tracker::devices::imu::MockImu;
//!
//! let mut imu = MockImu::new(MockTime::new());
//! imu.push_reading(gyro, accel).unwrap();
//! imu.time().advance(2_000);
//! let sample = imu.poll();
//! ```

use heapless::Deque;
use nalgebra::Vector3;

use crate::core::traits::TimeSource;
use crate::devices::traits::{ImuError, ImuSample, ImuSensor};
use crate::platform::I2cError;

/// Queued readings the mock can hold
pub const MOCK_IMU_QUEUE: usize = 64;

/// Mock IMU for testing
pub struct MockImu<T: TimeSource> {
    /// Queue of (gyro, accel) readings to return
    readings: Deque<(Vector3<f64>, Vector3<f64>), MOCK_IMU_QUEUE>,

    /// Reading returned when the queue is empty; `None` means not ready
    default_reading: Option<(Vector3<f64>, Vector3<f64>)>,

    /// Simulated bus fault (can be set for testing error handling)
    bus_fault: Option<I2cError>,

    initialized: bool,

    time: T,
}

impl<T: TimeSource> MockImu<T> {
    /// Mock with an empty queue and no default reading
    pub fn new(time: T) -> Self {
        Self {
            readings: Deque::new(),
            default_reading: None,
            bus_fault: None,
            initialized: false,
            time,
        }
    }

    /// Mock that reports a stationary, level board on every poll
    pub fn at_rest(time: T) -> Self {
        let mut imu = Self::new(time);
        let rest = ImuSample::default();
        imu.set_default_reading(Some((rest.gyro, rest.accel)));
        imu
    }

    pub fn set_default_reading(&mut self, reading: Option<(Vector3<f64>, Vector3<f64>)>) {
        self.default_reading = reading;
    }

    /// Queue one reading; returns it back if the queue is full
    pub fn push_reading(
        &mut self,
        gyro: Vector3<f64>,
        accel: Vector3<f64>,
    ) -> Result<(), (Vector3<f64>, Vector3<f64>)> {
        self.readings.push_back((gyro, accel))
    }

    /// Make `init` fail and `poll` return nothing
    pub fn set_bus_fault(&mut self, fault: Option<I2cError>) {
        self.bus_fault = fault;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn pending(&self) -> usize {
        self.readings.len()
    }

    /// Clock used to stamp samples
    pub fn time(&self) -> &T {
        &self.time
    }
}

impl<T: TimeSource> ImuSensor for MockImu<T> {
    fn init(&mut self) -> Result<(), ImuError> {
        if let Some(fault) = self.bus_fault {
            return Err(fault.into());
        }
        self.initialized = true;
        Ok(())
    }

    fn poll(&mut self) -> Option<ImuSample> {
        if self.bus_fault.is_some() {
            return None;
        }
        let (gyro, accel) = self.readings.pop_front().or(self.default_reading)?;
        Some(ImuSample::new(gyro, accel, self.time.now_us()))
    }
}
