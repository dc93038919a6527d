//! Platform-agnostic service traits
//!
//! Trait definitions carry no feature gates; the hand-driven mocks live next
//! to them so host tests need no firmware dependencies.

pub mod time;

pub use time::{step_seconds, MockTime, TimeSource, MICROS_PER_SECOND};
