//! Subsystems
//!
//! - `lighthouse`: Photodiode capture wiring and sweep timing sources
//! - `tracking`: Orientation and pose trackers

pub mod lighthouse;
pub mod tracking;
