//! Parameter management types
//!
//! Named runtime configuration for the tracker. Each parameter block
//! registers its defaults in a `ParameterStore` and loads itself back with
//! range clamping.

pub mod error;
pub mod pins;
pub mod storage;
pub mod tracking;

pub use error::ParameterError;
pub use pins::{SensorPinPair, SensorPins};
pub use storage::{ParamFlags, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
pub use tracking::TrackingParams;
