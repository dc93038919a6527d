//! Device traits
//!
//! Hardware-independent trait definitions for device drivers. These let the
//! trackers run against mock and simulated devices on the host.

pub mod imu;

pub use imu::{ImuError, ImuSample, ImuSensor};
