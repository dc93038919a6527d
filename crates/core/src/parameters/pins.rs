//! Photodiode Pin Parameter Definitions
//!
//! Each photodiode drives two capture pins, one armed for rising and one for
//! falling edges. A shared standby pin powers the receivers down when high.
//!
//! # Parameters
//!
//! - `LH_S{n}_RISE` / `LH_S{n}_FALL` - Capture pins of photodiode `n` (0..4)
//! - `LH_STBY_PIN` - Receiver standby pin
//!
//! Pin assignments are board wiring, so they are registered read-only.

use super::error::ParameterError;
use super::storage::{ParamFlags, ParamValue, ParameterStore};
use crate::lighthouse::types::SENSOR_COUNT;

const RISE_NAMES: [&str; SENSOR_COUNT] = ["LH_S0_RISE", "LH_S1_RISE", "LH_S2_RISE", "LH_S3_RISE"];
const FALL_NAMES: [&str; SENSOR_COUNT] = ["LH_S0_FALL", "LH_S1_FALL", "LH_S2_FALL", "LH_S3_FALL"];
const STANDBY_NAME: &str = "LH_STBY_PIN";

/// Default (rising, falling) pins per photodiode
const DEFAULT_PINS: [(u8, u8); SENSOR_COUNT] = [(5, 6), (9, 10), (20, 21), (22, 23)];

/// Default receiver standby pin
const DEFAULT_STANDBY: u8 = 12;

/// Capture pin pair of one photodiode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorPinPair {
    pub rising: u8,
    pub falling: u8,
}

/// Capture wiring of the photodiode board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorPins {
    pub sensors: [SensorPinPair; SENSOR_COUNT],
    pub standby: u8,
}

impl Default for SensorPins {
    fn default() -> Self {
        Self {
            sensors: DEFAULT_PINS.map(|(rising, falling)| SensorPinPair { rising, falling }),
            standby: DEFAULT_STANDBY,
        }
    }
}

fn pin_from(store: &ParameterStore, name: &str, default: u8) -> u8 {
    match store.get(name) {
        Some(ParamValue::Int(v)) => u8::try_from(*v).unwrap_or(default),
        _ => default,
    }
}

impl SensorPins {
    /// Register pin parameters with the default wiring
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        for (sensor, (rising, falling)) in DEFAULT_PINS.iter().enumerate() {
            store.register(
                RISE_NAMES[sensor],
                ParamValue::Int(*rising as i32),
                ParamFlags::READ_ONLY,
            )?;
            store.register(
                FALL_NAMES[sensor],
                ParamValue::Int(*falling as i32),
                ParamFlags::READ_ONLY,
            )?;
        }
        store.register(
            STANDBY_NAME,
            ParamValue::Int(DEFAULT_STANDBY as i32),
            ParamFlags::READ_ONLY,
        )?;
        Ok(())
    }

    /// Load pin wiring; invalid entries keep their default
    pub fn from_store(store: &ParameterStore) -> Self {
        let mut pins = Self::default();
        for (sensor, pair) in pins.sensors.iter_mut().enumerate() {
            pair.rising = pin_from(store, RISE_NAMES[sensor], pair.rising);
            pair.falling = pin_from(store, FALL_NAMES[sensor], pair.falling);
        }
        pins.standby = pin_from(store, STANDBY_NAME, pins.standby);
        pins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wiring() {
        let pins = SensorPins::default();
        assert_eq!(pins.sensors[0], SensorPinPair { rising: 5, falling: 6 });
        assert_eq!(pins.sensors[3], SensorPinPair { rising: 22, falling: 23 });
        assert_eq!(pins.standby, 12);
    }

    #[test]
    fn test_pins_round_trip_through_store() {
        let mut store = ParameterStore::new();
        SensorPins::register_defaults(&mut store).unwrap();
        assert_eq!(store.len(), 2 * SENSOR_COUNT + 1);
        assert_eq!(SensorPins::from_store(&store), SensorPins::default());
    }

    #[test]
    fn test_pins_are_read_only() {
        let mut store = ParameterStore::new();
        SensorPins::register_defaults(&mut store).unwrap();
        assert_eq!(
            store.set("LH_S2_RISE", ParamValue::Int(3)),
            Err(ParameterError::ReadOnly)
        );
    }
}
