//! IMU Sources
//!
//! Implementations of the `ImuSensor` trait that need no hardware.
//!
//! ## Available Sources
//!
//! - `mock`: Scripted samples for tests (requires `test` or `mock` feature)
//! - `simulated`: Wrap-around replay of a recorded sample table
//!
//! ## Usage
//!
//! ```
//! use lighthouse_tracker::devices::imu::SimulatedImu;
//! use lighthouse_tracker::devices::traits::ImuSensor;
//!
//! static TABLE: [[f64; 6]; 2] = [
//!     [0.0, 0.0, 1.0, 0.0, 9.8, 0.0],
//!     [0.0, 0.0, 2.0, 0.0, 9.8, 0.0],
//! ];
//! let mut imu = SimulatedImu::new(&TABLE);
//! let sample = imu.poll().unwrap();
//! assert_eq!(sample.gyro.z, 1.0);
//! ```

#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod simulated;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockImu;
pub use simulated::{SimulatedImu, SIMULATED_IMU_PERIOD_US};
