//! Lighthouse receiver
//!
//! Owns the pulse-decoding state shared between the capture interrupt and
//! the tracking loop. The interrupt side enters through [`EdgeSink`]; the
//! loop side snapshots committed periods with [`LighthouseReceiver::read_timings`].
//!
//! Both sides go through [`SharedState`], so with [`CriticalSectionState`]
//! a snapshot never interleaves with an edge.
//!
//! # Example
//!
//! ```ignore
//! static RECEIVER: LighthouseReceiver<CriticalSectionState<PulseData>> =
//!     LighthouseReceiver::new(CriticalSectionState::new(PulseData::new()));
//!
//! RECEIVER.attach(&mut capture, &SensorPins::default())?;
//! RECEIVER.enable_sensors(&mut standby)?;
//! ```
//!
//! [`CriticalSectionState`]: crate::core::traits::CriticalSectionState

use core::sync::atomic::{AtomicU32, Ordering};

use lighthouse_tracker_core::lighthouse::ootx::OotxFrame;
use lighthouse_tracker_core::lighthouse::station::PulseData;
use lighthouse_tracker_core::lighthouse::types::{
    BaseStationMode, EdgePolarity, StationTimings, SENSOR_COUNT, STATION_COUNT,
};
use lighthouse_tracker_core::parameters::{SensorPinPair, SensorPins};

use super::traits::TimingSource;
use crate::core::traits::SharedState;
use crate::platform::{
    EdgeHandler, EdgeSink, GpioInterface, GpioMode, InputCaptureError, InputCaptureInterface,
    Result,
};

/// Photodiode front end plus its decoding state
pub struct LighthouseReceiver<S: SharedState<PulseData>> {
    state: S,
    /// OOTX frame count per slot already reported by the loop
    reported_frames: [AtomicU32; STATION_COUNT],
}

impl<S: SharedState<PulseData>> LighthouseReceiver<S> {
    pub const fn new(state: S) -> Self {
        Self {
            state,
            reported_frames: [AtomicU32::new(0), AtomicU32::new(0)],
        }
    }

    /// Arm rising and falling capture for every photodiode
    pub fn attach<'a, C>(&'a self, capture: &mut C, pins: &SensorPins) -> Result<()>
    where
        C: InputCaptureInterface<'a>,
    {
        for (sensor, pair) in pins.sensors.iter().enumerate() {
            self.attach_sensor(capture, sensor, pair)?;
        }
        Ok(())
    }

    /// Arm capture for one photodiode
    pub fn attach_sensor<'a, C>(
        &'a self,
        capture: &mut C,
        sensor: usize,
        pins: &SensorPinPair,
    ) -> Result<()>
    where
        C: InputCaptureInterface<'a>,
    {
        if sensor >= SENSOR_COUNT {
            return Err(InputCaptureError::InvalidSensor.into());
        }
        let handler = EdgeHandler::new(self, sensor);
        capture.begin(pins.rising, EdgePolarity::Rising, handler)?;
        capture.begin(pins.falling, EdgePolarity::Falling, handler)
    }

    /// Power the photodiode receivers by pulling standby low
    pub fn enable_sensors<G: GpioInterface>(&self, standby: &mut G) -> Result<()> {
        standby.set_mode(GpioMode::OutputPushPull)?;
        standby.set_low()
    }

    /// Consume the committed period of the station broadcasting `mode`
    ///
    /// Runs with exclusive access to the pulse state. Each committed period
    /// is returned at most once.
    pub fn read_timings(&self, mode: BaseStationMode) -> Option<StationTimings> {
        let (timings, frames) = self.state.with_mut(|data| {
            let mut frames = [0u32; STATION_COUNT];
            for (slot, count) in frames.iter_mut().enumerate() {
                if let Some(station) = data.station(slot) {
                    *count = station.frames_decoded();
                }
            }
            (data.take_timings(mode), frames)
        });
        self.report_new_frames(frames);
        timings
    }

    /// Latest OOTX frame decoded in `slot`
    pub fn ootx_frame(&self, slot: usize) -> Option<OotxFrame> {
        self.state
            .with(|data| data.station(slot).and_then(|s| s.ootx().frame().cloned()))
    }

    /// Shared pulse state, for diagnostics
    pub fn state(&self) -> &S {
        &self.state
    }

    fn report_new_frames(&self, frames: [u32; STATION_COUNT]) {
        for (slot, &count) in frames.iter().enumerate() {
            if self.reported_frames[slot].load(Ordering::Relaxed) == count {
                continue;
            }
            self.reported_frames[slot].store(count, Ordering::Relaxed);
            if let Some(frame) = self.ootx_frame(slot) {
                crate::log_info!(
                    "OOTX slot {}: mode {} pitch {} roll {} crc_ok {}",
                    slot,
                    frame.mode_byte,
                    frame.pitch_deg,
                    frame.roll_deg,
                    frame.crc_matches()
                );
            }
        }
    }
}

impl<S: SharedState<PulseData>> EdgeSink for LighthouseReceiver<S> {
    fn on_edge(&self, sensor: usize, polarity: EdgePolarity, tick: u32) {
        self.state.with_mut(|data| data.on_edge(sensor, polarity, tick));
    }
}

impl<S: SharedState<PulseData>> TimingSource for &LighthouseReceiver<S> {
    fn read_timings(&mut self, mode: BaseStationMode) -> Option<StationTimings> {
        LighthouseReceiver::read_timings(*self, mode)
    }
}
