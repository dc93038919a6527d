//! Edge-timing state machine
//!
//! `PulseData` turns raw capture edges from the four photodiodes into
//! committed per-period sweep timings for up to two base stations.
//!
//! Writers are the edge handlers, which run one at a time. The single reader
//! takes a snapshot with [`PulseData::take_timings`]; the owner is expected to
//! hold the data behind a critical-section lock so that a snapshot never
//! interleaves with an edge.
//!
//! Each station keeps a temporary buffer filled during a sync period and a
//! committed buffer that only changes at a sync boundary. A committed period
//! is handed out exactly once through the `data_available` flag.

use super::ootx::OotxDecoder;
use super::pulse::{classify_pulse_ticks, PulseClass, SyncBits};
use super::types::{
    Axis, BaseStationMode, EdgePolarity, StationTimings, CHANNEL_COUNT, SENSOR_COUNT,
    STATION_COUNT,
};

/// Sync gaps at or above this many ticks start a new station cycle (slot 0)
pub const STATION_GAP_TICKS: u32 = 40_000;

/// Photodiode that drives sync decoding
pub const PRIMARY_SENSOR: usize = 0;

/// Per-channel sweep readings for one sync period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepBuffer {
    pub ticks: [u32; CHANNEL_COUNT],
    pub widths: [u32; CHANNEL_COUNT],
    pub detections: [u32; CHANNEL_COUNT],
    /// Distance of the accepted hit from the previous period's value
    min_diff: [u32; CHANNEL_COUNT],
}

impl SweepBuffer {
    pub const fn new() -> Self {
        Self {
            ticks: [0; CHANNEL_COUNT],
            widths: [0; CHANNEL_COUNT],
            detections: [0; CHANNEL_COUNT],
            min_diff: [u32::MAX; CHANNEL_COUNT],
        }
    }

    fn reset_axis(&mut self, axis: Axis) {
        for sensor in 0..SENSOR_COUNT {
            let channel = axis.channel(sensor);
            self.ticks[channel] = 0;
            self.widths[channel] = 0;
            self.detections[channel] = 0;
            self.min_diff[channel] = u32::MAX;
        }
    }

    fn copy_axis_from(&mut self, other: &SweepBuffer, axis: Axis) {
        for sensor in 0..SENSOR_COUNT {
            let channel = axis.channel(sensor);
            self.ticks[channel] = other.ticks[channel];
            self.widths[channel] = other.widths[channel];
            self.detections[channel] = other.detections[channel];
        }
    }
}

impl Default for SweepBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// State for one base-station slot
#[derive(Debug, Clone)]
pub struct Station {
    pending: SweepBuffer,
    committed: SweepBuffer,
    axis: Axis,
    skip: bool,
    data_available: bool,
    pitch_deg: f64,
    roll_deg: f64,
    mode: Option<BaseStationMode>,
    ootx: OotxDecoder,
    /// OOTX frames decoded since start, wrapping
    frames_decoded: u32,
}

impl Default for Station {
    fn default() -> Self {
        Self::new()
    }
}

impl Station {
    /// Starts skipped so the first sync pulse does not commit an empty period
    pub const fn new() -> Self {
        Self {
            pending: SweepBuffer::new(),
            committed: SweepBuffer::new(),
            axis: Axis::Horizontal,
            skip: true,
            data_available: false,
            pitch_deg: 0.0,
            roll_deg: 0.0,
            mode: None,
            ootx: OotxDecoder::new(),
            frames_decoded: 0,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn skip(&self) -> bool {
        self.skip
    }

    pub fn data_available(&self) -> bool {
        self.data_available
    }

    /// Decoded mode; `None` until an OOTX frame has been received
    pub fn mode(&self) -> Option<BaseStationMode> {
        self.mode
    }

    pub fn pitch_deg(&self) -> f64 {
        self.pitch_deg
    }

    pub fn roll_deg(&self) -> f64 {
        self.roll_deg
    }

    pub fn ootx(&self) -> &OotxDecoder {
        &self.ootx
    }

    /// Lets the reader notice new frames without logging from the edge path
    pub fn frames_decoded(&self) -> u32 {
        self.frames_decoded
    }

    /// Last committed period, regardless of whether it was consumed
    pub fn committed(&self) -> &SweepBuffer {
        &self.committed
    }

    fn timings(&self, mode: BaseStationMode) -> StationTimings {
        StationTimings {
            ticks: self.committed.ticks,
            detections: self.committed.detections,
            widths: self.committed.widths,
            pitch_deg: self.pitch_deg,
            roll_deg: self.roll_deg,
            mode,
        }
    }
}

/// Shared pulse-decoding state for all photodiodes and stations
#[derive(Debug, Clone)]
pub struct PulseData {
    stations: [Station; STATION_COUNT],
    /// Pending pulse start per photodiode
    falling_ticks: [u32; SENSOR_COUNT],
    /// Slot whose sweep is in progress
    current_station: usize,
    /// Tick of the last non-skip sync pulse; sweep offsets are measured from it
    last_valid_sync: u32,
    /// Tick of the last sync pulse of either station
    last_any_sync: Option<u32>,
}

impl Default for PulseData {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseData {
    pub const fn new() -> Self {
        Self {
            stations: [Station::new(), Station::new()],
            falling_ticks: [0; SENSOR_COUNT],
            current_station: 0,
            last_valid_sync: 0,
            last_any_sync: None,
        }
    }

    pub fn station(&self, slot: usize) -> Option<&Station> {
        self.stations.get(slot)
    }

    pub fn current_station(&self) -> usize {
        self.current_station
    }

    /// Process one capture edge
    ///
    /// Out-of-range sensor indices are ignored.
    pub fn on_edge(&mut self, sensor: usize, polarity: EdgePolarity, tick: u32) {
        if sensor >= SENSOR_COUNT {
            return;
        }

        match polarity {
            EdgePolarity::Falling => self.falling_ticks[sensor] = tick,
            EdgePolarity::Rising => {
                let start = self.falling_ticks[sensor];
                let width = tick.wrapping_sub(start);
                match classify_pulse_ticks(width) {
                    PulseClass::Sweep => self.on_sweep(sensor, start, width),
                    PulseClass::Sync(bits) if sensor == PRIMARY_SENSOR => {
                        self.on_sync(bits, start)
                    }
                    // Sync pulses on secondary sensors and malformed pulses
                    PulseClass::Sync(_) | PulseClass::Invalid => {}
                }
            }
        }
    }

    fn on_sweep(&mut self, sensor: usize, start: u32, width: u32) {
        let offset = start.wrapping_sub(self.last_valid_sync);
        let station = &mut self.stations[self.current_station];
        let channel = station.axis.channel(sensor);
        let pending = &mut station.pending;

        pending.detections[channel] = pending.detections[channel].saturating_add(1);

        // Among reflections keep the hit closest to last period's value
        let diff = offset.abs_diff(station.committed.ticks[channel]);
        if pending.detections[channel] == 1 || diff < pending.min_diff[channel] {
            pending.ticks[channel] = offset;
            pending.widths[channel] = width;
            pending.min_diff[channel] = diff;
        }
    }

    fn on_sync(&mut self, bits: SyncBits, start: u32) {
        let slot = match self.last_any_sync {
            Some(last) if start.wrapping_sub(last) < STATION_GAP_TICKS => 1,
            _ => 0,
        };

        let station = &mut self.stations[slot];

        if station.ootx.add_bit(bits.data as u8) {
            // Frames too short for telemetry keep the previous mode and tilt
            if let Some(frame) = station.ootx.frame().filter(|frame| frame.has_telemetry()) {
                station.pitch_deg = frame.pitch_deg;
                station.roll_deg = frame.roll_deg;
                station.mode = frame.mode;
            }
            station.frames_decoded = station.frames_decoded.wrapping_add(1);
        }

        // Close the period this station just finished sweeping
        if !station.skip {
            let axis = station.axis;
            let pending = station.pending;
            station.committed.copy_axis_from(&pending, axis);
            station.data_available = true;
        }

        // A non-skip pulse opens a new sweep period for this station
        if !bits.skip {
            station.pending.reset_axis(bits.axis);
            self.last_valid_sync = start;
            self.current_station = slot;
        }

        station.axis = bits.axis;
        station.skip = bits.skip;
        self.last_any_sync = Some(start);
    }

    /// Copy out and consume the committed period of the station with `mode`
    ///
    /// When both slots match, the later slot wins. Returns `None` when no
    /// slot has decoded `mode` or its period was already consumed.
    pub fn take_timings(&mut self, mode: BaseStationMode) -> Option<StationTimings> {
        let station = self
            .stations
            .iter_mut()
            .rev()
            .find(|station| station.data_available && station.mode == Some(mode))?;

        station.data_available = false;
        Some(station.timings(mode))
    }
}
