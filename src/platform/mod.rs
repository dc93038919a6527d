//! Platform abstraction layer
//!
//! Hardware collaborators of the tracker: the edge-capture timer and the
//! receiver standby GPIO. Board implementations live in the firmware
//! binary; host tests use the mocks.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{GpioError, I2cError, InputCaptureError, PlatformError, Result};
pub use traits::{EdgeHandler, EdgeSink, GpioInterface, GpioMode, InputCaptureInterface};
