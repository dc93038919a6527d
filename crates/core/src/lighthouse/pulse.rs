//! Pulse width classification
//!
//! A light pulse is either a short sweep hit or a width-coded sync pulse.
//! Sync widths fall into eight bands roughly 10.4 µs apart; the band index
//! carries three bits (skip, data, axis) from most to least significant.

use super::types::{Axis, CLOCKS_PER_MICROSECOND};

/// Widths up to this many ticks are sweeps without consulting the band table
pub const SWEEP_MAX_TICKS: u32 = 60 * CLOCKS_PER_MICROSECOND;

/// Widest sweep pulse accepted by the band decoder, µs
pub const SWEEP_MAX_US: f32 = 57.5;

/// Sync band centers, µs, indexed by the encoded bit triple
pub const SYNC_BAND_CENTERS_US: [f32; 8] = [62.5, 72.9, 83.3, 93.8, 104.0, 115.0, 125.0, 135.0];

/// Half-width of each sync band, µs
pub const SYNC_BAND_TOLERANCE_US: f32 = 5.0;

/// Bits carried by a sync pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SyncBits {
    /// Station is not sweeping this period
    pub skip: bool,
    /// OOTX data bit
    pub data: bool,
    /// Axis swept after this pulse
    pub axis: Axis,
}

impl SyncBits {
    /// Decode the bit triple from a band index (0..8)
    pub const fn from_band(band: usize) -> Self {
        Self {
            skip: band & 0b100 != 0,
            data: band & 0b010 != 0,
            axis: if band & 0b001 != 0 {
                Axis::Vertical
            } else {
                Axis::Horizontal
            },
        }
    }

    /// Band index carrying these bits
    pub const fn band(&self) -> usize {
        (self.skip as usize) << 2 | (self.data as usize) << 1 | self.axis.index()
    }

    /// Nominal pulse width for these bits, capture ticks
    pub fn width_ticks(&self) -> u32 {
        (SYNC_BAND_CENTERS_US[self.band()] * CLOCKS_PER_MICROSECOND as f32) as u32
    }
}

/// Pulse classification result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseClass {
    Sweep,
    Sync(SyncBits),
    Invalid,
}

/// Classify a pulse by its width in microseconds
pub fn decode_pulse_length(width_us: f32) -> PulseClass {
    if width_us <= SWEEP_MAX_US {
        return PulseClass::Sweep;
    }

    SYNC_BAND_CENTERS_US
        .iter()
        .position(|&center| {
            width_us > center - SYNC_BAND_TOLERANCE_US && width_us <= center + SYNC_BAND_TOLERANCE_US
        })
        .map(|band| PulseClass::Sync(SyncBits::from_band(band)))
        .unwrap_or(PulseClass::Invalid)
}

/// Classify a pulse by its width in capture ticks
pub fn classify_pulse_ticks(width_ticks: u32) -> PulseClass {
    if width_ticks <= SWEEP_MAX_TICKS {
        return PulseClass::Sweep;
    }
    decode_pulse_length(width_ticks as f32 / CLOCKS_PER_MICROSECOND as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sync_bands() {
        for (band, &center) in SYNC_BAND_CENTERS_US.iter().enumerate() {
            let expected = PulseClass::Sync(SyncBits::from_band(band));
            for width in [center - 4.9, center, center + 4.9] {
                assert_eq!(
                    decode_pulse_length(width),
                    expected,
                    "band {band} at {width} us"
                );
            }
        }
    }

    #[test]
    fn test_band_bits() {
        assert_eq!(
            SyncBits::from_band(0),
            SyncBits { skip: false, data: false, axis: Axis::Horizontal }
        );
        assert_eq!(
            SyncBits::from_band(3),
            SyncBits { skip: false, data: true, axis: Axis::Vertical }
        );
        assert_eq!(
            SyncBits::from_band(5),
            SyncBits { skip: true, data: false, axis: Axis::Vertical }
        );
        assert_eq!(
            SyncBits::from_band(6),
            SyncBits { skip: true, data: true, axis: Axis::Horizontal }
        );
    }

    #[test]
    fn test_sweep_widths() {
        assert_eq!(decode_pulse_length(0.0), PulseClass::Sweep);
        assert_eq!(decode_pulse_length(10.0), PulseClass::Sweep);
        assert_eq!(decode_pulse_length(57.5), PulseClass::Sweep);
    }

    #[test]
    fn test_invalid_widths() {
        // Above the last band
        assert_eq!(decode_pulse_length(140.5), PulseClass::Invalid);
        assert_eq!(decode_pulse_length(300.0), PulseClass::Invalid);
        // Gap between band 0 (up to 67.5) and band 1 (from 67.9)
        assert_eq!(decode_pulse_length(67.7), PulseClass::Invalid);
    }

    #[test]
    fn test_band_edges() {
        // Upper edge is inclusive, lower edge exclusive
        assert_eq!(
            decode_pulse_length(140.0),
            PulseClass::Sync(SyncBits::from_band(7))
        );
        assert_eq!(
            decode_pulse_length(67.5),
            PulseClass::Sync(SyncBits::from_band(0))
        );
    }

    #[test]
    fn test_classify_ticks_fast_path() {
        assert_eq!(classify_pulse_ticks(0), PulseClass::Sweep);
        assert_eq!(classify_pulse_ticks(SWEEP_MAX_TICKS), PulseClass::Sweep);
        // 62.5 us
        assert_eq!(
            classify_pulse_ticks(3000),
            PulseClass::Sync(SyncBits::from_band(0))
        );
        // 135 us
        assert_eq!(
            classify_pulse_ticks(6480),
            PulseClass::Sync(SyncBits::from_band(7))
        );
        // 200 us
        assert_eq!(classify_pulse_ticks(9600), PulseClass::Invalid);
    }

    #[test]
    fn test_nominal_width_classifies_back() {
        for band in 0..SYNC_BAND_CENTERS_US.len() {
            let bits = SyncBits::from_band(band);
            assert_eq!(bits.band(), band);
            assert_eq!(classify_pulse_ticks(bits.width_ticks()), PulseClass::Sync(bits));
        }
    }
}
