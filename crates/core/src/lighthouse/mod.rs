//! Lighthouse optical decoding
//!
//! Pulse width classification, the OOTX telemetry decoder and the
//! per-station edge-timing state machine.

pub mod ootx;
pub mod pulse;
pub mod station;
pub mod types;

pub use ootx::{OotxDecoder, OotxFrame};
pub use pulse::{classify_pulse_ticks, decode_pulse_length, PulseClass, SyncBits};
pub use station::{PulseData, Station, SweepBuffer};
pub use types::{
    Axis, BaseStationMode, EdgePolarity, StationTimings, CHANNEL_COUNT, CLOCKS_PER_MICROSECOND,
    CLOCKS_PER_SECOND, SENSOR_COUNT, STATION_COUNT,
};
