//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod gpio;
pub mod input_capture;

pub use gpio::{GpioInterface, GpioMode};
pub use input_capture::{EdgeHandler, EdgeSink, InputCaptureInterface};
