//! Device drivers
//!
//! ## Modules
//!
//! - `imu`: IMU sources (mock, simulated replay)
//! - `traits`: Device trait definitions (ImuSensor)

pub mod imu;
pub mod traits;
