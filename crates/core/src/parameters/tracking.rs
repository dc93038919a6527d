//! Tracking Parameter Definitions
//!
//! # Parameters
//!
//! - `TRK_IMU_ALPHA` - Complementary filter weight of the gyro estimate (0..1)
//! - `LH_BS_MODE` - Base station to track (0=A, 1=B, 2=C)
//! - `IMU_CAL_N` - Stationary samples averaged for bias calibration

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::lighthouse::types::BaseStationMode;
use crate::orientation::calibration::DEFAULT_CALIBRATION_SAMPLES;

/// Default complementary filter alpha
const DEFAULT_ALPHA: f64 = 0.9;

/// Default base station (mode A)
const DEFAULT_MODE: i32 = 0;

/// Calibration sample bounds
const MIN_CAL_SAMPLES: u32 = 10;
const MAX_CAL_SAMPLES: u32 = 10_000;

/// Widen a stored f32 to f64, dropping digits below f32 precision
///
/// Keeps a stored 0.9 at 0.9 instead of 0.89999997615814.
fn widen(value: f32) -> f64 {
    libm::round(value as f64 * 1e6) / 1e6
}

/// Tracking parameters loaded from parameter store
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingParams {
    /// Weight of the gyro estimate in the complementary filters
    pub imu_alpha: f64,
    /// Base station whose sweeps drive the pose estimate
    pub base_station_mode: BaseStationMode,
    /// Samples averaged by bias/variance calibration
    pub calibration_samples: u32,
}

impl Default for TrackingParams {
    fn default() -> Self {
        Self {
            imu_alpha: DEFAULT_ALPHA,
            base_station_mode: BaseStationMode::A,
            calibration_samples: DEFAULT_CALIBRATION_SAMPLES,
        }
    }
}

impl TrackingParams {
    /// Register tracking parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "TRK_IMU_ALPHA",
            ParamValue::Float(DEFAULT_ALPHA as f32),
            ParamFlags::empty(),
        )?;

        store.register(
            "LH_BS_MODE",
            ParamValue::Int(DEFAULT_MODE),
            ParamFlags::empty(),
        )?;

        store.register(
            "IMU_CAL_N",
            ParamValue::Int(DEFAULT_CALIBRATION_SAMPLES as i32),
            ParamFlags::empty(),
        )?;

        Ok(())
    }

    /// Load tracking parameters from parameter store
    ///
    /// Out-of-range values are clamped; missing values fall back to defaults.
    pub fn from_store(store: &ParameterStore) -> Self {
        let imu_alpha = match store.get("TRK_IMU_ALPHA") {
            Some(value) => widen(value.as_f32().clamp(0.0, 1.0)),
            None => DEFAULT_ALPHA,
        };

        let base_station_mode = match store.get("LH_BS_MODE") {
            Some(value) => {
                let mode = (value.as_f32() as i32).clamp(0, 2) as u8;
                BaseStationMode::from_byte(mode).unwrap_or(BaseStationMode::A)
            }
            None => BaseStationMode::A,
        };

        let calibration_samples = match store.get("IMU_CAL_N") {
            Some(value) => (value.as_f32().max(0.0) as u32).clamp(MIN_CAL_SAMPLES, MAX_CAL_SAMPLES),
            None => DEFAULT_CALIBRATION_SAMPLES,
        };

        Self {
            imu_alpha,
            base_station_mode,
            calibration_samples,
        }
    }
}
