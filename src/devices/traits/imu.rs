//! IMU Sensor Trait and Errors
//!
//! Device-independent interface for the 6-axis IMU consumed by the
//! orientation tracker. Register configuration and bus handling stay in the
//! driver; the tracker only sees timestamped samples.
//!
//! ## Usage
//!
//! ```ignore
//! use lighthouse_tracker::devices::traits::ImuSensor;
//!
//! fn spin<I: ImuSensor>(imu: &mut I) {
//!     if let Some(sample) = imu.poll() {
//!         // sample.gyro in deg/s, sample.accel in m/s²
//!     }
//! }
//! ```

use core::fmt;

pub use lighthouse_tracker_core::imu::ImuSample;

use crate::platform::I2cError;

/// IMU error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImuError {
    /// Bus stuck or device did not answer
    BusError,

    /// Driver not initialized
    NotInitialized,

    /// Device identity or data failed validation
    InvalidData,
}

impl ImuError {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImuError::BusError => "IMU bus error",
            ImuError::NotInitialized => "IMU not initialized",
            ImuError::InvalidData => "IMU data invalid",
        }
    }
}

impl fmt::Display for ImuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<I2cError> for ImuError {
    fn from(_: I2cError) -> Self {
        ImuError::BusError
    }
}

/// Device-independent IMU interface
///
/// Units: gyro deg/s, accel m/s², both in the sensor frame.
pub trait ImuSensor {
    /// Bring the device up
    ///
    /// Failure is not fatal to the tracker: polling simply yields nothing.
    fn init(&mut self) -> Result<(), ImuError>;

    /// Next sample, or `None` while the data-ready flag is clear
    fn poll(&mut self) -> Option<ImuSample>;
}
