//! lighthouse_tracker_core - Pure no_std tracking algorithms
//!
//! This crate holds the platform-agnostic part of the tracker: lighthouse
//! pulse decoding, homography pose estimation and IMU orientation filters.
//! Everything here is testable on the host without hardware.
//!
//! # Design Principles
//!
//! - **Pure no_std**: no std outside of tests
//! - **No allocation**: fixed-capacity `heapless` buffers only
//! - **Trait abstractions**: platform services injected via traits
//!
//! # Modules
//!
//! - [`lighthouse`]: Pulse classification, OOTX decoding, edge state machine
//! - [`pose`]: Homography pose estimation from sweep timings
//! - [`orientation`]: Gyro/accelerometer orientation filters and calibration
//! - [`math`]: Quaternion primitives
//! - [`imu`]: Device-independent IMU sample
//! - [`parameters`]: Named tracker configuration
//! - [`telemetry`]: Text lines streamed to the visualizer
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)
//! - [`logging`]: Logging macros shared with the firmware crate

#![cfg_attr(not(test), no_std)]

pub mod imu;
pub mod lighthouse;
pub mod logging;
pub mod math;
pub mod orientation;
pub mod parameters;
pub mod pose;
pub mod telemetry;
pub mod traits;
