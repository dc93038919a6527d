//! IMU orientation estimation
//!
//! Gyro-only integration, the quaternion complementary filter, the 1-DOF
//! flatland roll filters and stationary bias/variance calibration.

pub mod calibration;
pub mod estimate;
pub mod filter;

pub use calibration::{
    compute_statistics, BiasVarianceEstimator, ImuStatistics, DEFAULT_CALIBRATION_SAMPLES,
};
pub use estimate::OrientationEstimate;
pub use filter::{
    accel_pitch, accel_roll, complementary_update, flatland_roll_accel, flatland_roll_comp,
    flatland_roll_gyro, integrate_gyro,
};
