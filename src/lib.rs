#![cfg_attr(not(test), no_std)]

//! lighthouse_tracker - Lighthouse and IMU pose tracking for a VR peripheral
//!
//! This library wires the pure algorithms of `lighthouse_tracker_core` to
//! hardware: photodiode edge capture, IMU drivers and the trackers that fuse
//! them into an orientation and pose estimate.

// Platform abstraction layer (edge capture, GPIO)
pub mod platform;

// IMU drivers using platform abstraction
pub mod devices;

// Shared state and time abstractions
pub mod core;

// Lighthouse receiver and trackers
pub mod subsystems;

pub use lighthouse_tracker_core::{log_debug, log_error, log_info, log_trace, log_warn};
