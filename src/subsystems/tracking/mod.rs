//! Tracking orchestration
//!
//! `OrientationTracker` owns the IMU and its filters; `PoseTracker` composes
//! one with a sweep timing source and the homography solver.

pub mod orientation;
pub mod pose;

pub use orientation::{OrientationTracker, MAX_IDLE_POLLS};
pub use pose::{LighthouseError, PoseTracker, INITIAL_POSITION_MM};
