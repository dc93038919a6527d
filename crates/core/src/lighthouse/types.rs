//! Lighthouse data types
//!
//! Shared vocabulary between the edge-timing state machine, the receiver
//! and the pose tracker.

/// Number of photodiodes on the sensor board
pub const SENSOR_COUNT: usize = 4;

/// Sweep channels: one horizontal and one vertical per photodiode
pub const CHANNEL_COUNT: usize = 2 * SENSOR_COUNT;

/// Station slots tracked concurrently (dual-synced base-station rigs)
pub const STATION_COUNT: usize = 2;

/// Timer ticks per microsecond of the edge-capture clock
pub const CLOCKS_PER_MICROSECOND: u32 = 48;

/// Timer ticks per second of the edge-capture clock
pub const CLOCKS_PER_SECOND: u32 = CLOCKS_PER_MICROSECOND * 1_000_000;

/// Logical base-station identity broadcast in the OOTX mode byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaseStationMode {
    A,
    B,
    C,
}

impl BaseStationMode {
    /// Interpret an OOTX mode byte; values other than 0..=2 are unknown
    pub fn from_byte(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::A),
            1 => Some(Self::B),
            2 => Some(Self::C),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
        }
    }
}

/// Capture edge polarity
///
/// The photodiode front-end is active low: a pulse starts on the falling
/// edge and ends on the rising edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgePolarity {
    Rising,
    Falling,
}

/// Sweep axis announced by a sync pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Offset within a sensor's channel pair
    pub const fn index(&self) -> usize {
        match self {
            Axis::Horizontal => 0,
            Axis::Vertical => 1,
        }
    }

    /// Channel index for a photodiode on this axis: `2 * sensor + axis`
    pub const fn channel(&self, sensor: usize) -> usize {
        2 * sensor + self.index()
    }
}

/// One committed sweep period copied out of a station slot
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StationTimings {
    /// Sweep hit offsets from the period's sync pulse, in ticks
    pub ticks: [u32; CHANNEL_COUNT],
    /// Hits seen per channel during the period
    pub detections: [u32; CHANNEL_COUNT],
    /// Width of the accepted sweep pulse, in ticks
    pub widths: [u32; CHANNEL_COUNT],
    /// Base-station pitch from OOTX, degrees
    pub pitch_deg: f64,
    /// Base-station roll from OOTX, degrees
    pub roll_deg: f64,
    pub mode: BaseStationMode,
}

impl StationTimings {
    /// True when every channel saw exactly one hit
    pub fn has_single_detections(&self) -> bool {
        self.detections.iter().all(|&count| count == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_byte() {
        assert_eq!(BaseStationMode::from_byte(0), Some(BaseStationMode::A));
        assert_eq!(BaseStationMode::from_byte(1), Some(BaseStationMode::B));
        assert_eq!(BaseStationMode::from_byte(2), Some(BaseStationMode::C));
        assert_eq!(BaseStationMode::from_byte(3), None);
        assert_eq!(BaseStationMode::C.as_byte(), 2);
    }

    #[test]
    fn test_axis_channel_layout() {
        assert_eq!(Axis::Horizontal.channel(0), 0);
        assert_eq!(Axis::Vertical.channel(0), 1);
        assert_eq!(Axis::Horizontal.channel(3), 6);
        assert_eq!(Axis::Vertical.channel(3), 7);
    }

    #[test]
    fn test_single_detections() {
        let mut timings = StationTimings {
            ticks: [0; CHANNEL_COUNT],
            detections: [1; CHANNEL_COUNT],
            widths: [0; CHANNEL_COUNT],
            pitch_deg: 0.0,
            roll_deg: 0.0,
            mode: BaseStationMode::A,
        };
        assert!(timings.has_single_detections());

        timings.detections[5] = 2;
        assert!(!timings.has_single_detections());

        timings.detections[5] = 0;
        assert!(!timings.has_single_detections());
    }
}
