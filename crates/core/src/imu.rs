//! IMU sample type
//!
//! Device-independent reading consumed by the orientation filters.
//! Units follow the tracker convention:
//! - Gyroscope: deg/s, sensor frame
//! - Accelerometer: m/s², sensor frame (includes gravity)

use nalgebra::Vector3;

/// Standard gravity, m/s²
pub const GRAVITY: f64 = 9.80665;

/// One gyro + accelerometer reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuSample {
    /// Angular rate, deg/s
    pub gyro: Vector3<f64>,
    /// Specific force, m/s²
    pub accel: Vector3<f64>,
    /// Microseconds since boot
    pub timestamp_us: u64,
}

impl Default for ImuSample {
    /// At rest with +y up
    fn default() -> Self {
        Self {
            gyro: Vector3::zeros(),
            accel: Vector3::new(0.0, GRAVITY, 0.0),
            timestamp_us: 0,
        }
    }
}

impl ImuSample {
    pub fn new(gyro: Vector3<f64>, accel: Vector3<f64>, timestamp_us: u64) -> Self {
        Self {
            gyro,
            accel,
            timestamp_us,
        }
    }

    /// Build from a `[gx, gy, gz, ax, ay, az]` row
    pub fn from_row(row: &[f64; 6], timestamp_us: u64) -> Self {
        Self::new(
            Vector3::new(row[0], row[1], row[2]),
            Vector3::new(row[3], row[4], row[5]),
            timestamp_us,
        )
    }
}
