//! End-to-end lighthouse tests: capture edges → receiver → pose tracker
//!
//! Edges are delivered through the public `EdgeSink` interface, exactly as
//! the capture interrupt handlers would.

use lighthouse_tracker::core::traits::CriticalSectionState;
use lighthouse_tracker::devices::imu::SimulatedImu;
use lighthouse_tracker::platform::traits::EdgeSink;
use lighthouse_tracker::subsystems::lighthouse::LighthouseReceiver;
use lighthouse_tracker::subsystems::tracking::{LighthouseError, PoseTracker};
use lighthouse_tracker_core::lighthouse::ootx::encode_frame;
use lighthouse_tracker_core::lighthouse::types::{
    Axis, BaseStationMode, EdgePolarity, CHANNEL_COUNT, CLOCKS_PER_MICROSECOND, CLOCKS_PER_SECOND,
    SENSOR_COUNT,
};
use lighthouse_tracker_core::lighthouse::{PulseData, SyncBits};
use lighthouse_tracker_core::parameters::TrackingParams;
use lighthouse_tracker_core::pose::SENSOR_LAYOUT_MM;
use nalgebra::Vector3;

type Receiver = LighthouseReceiver<CriticalSectionState<PulseData>>;

const PERIOD_TICKS: u32 = 400_000;
const STATION_OFFSET_TICKS: u32 = 20_000;
const SWEEP_WIDTH: u32 = 10 * CLOCKS_PER_MICROSECOND;

static LEVEL_IMU: [[f64; 6]; 1] = [[0.0, 0.0, 0.0, 0.0, 9.80665, 0.0]];

fn receiver() -> Receiver {
    LighthouseReceiver::new(CriticalSectionState::new(PulseData::new()))
}

fn pulse(receiver: &Receiver, sensor: usize, start: u32, width: u32) {
    receiver.on_edge(sensor, EdgePolarity::Falling, start);
    receiver.on_edge(sensor, EdgePolarity::Rising, start.wrapping_add(width));
}

fn sync(receiver: &Receiver, start: u32, skip: bool, data: bool, axis: Axis) {
    pulse(receiver, 0, start, SyncBits { skip, data, axis }.width_ticks());
}

/// OOTX bitstream for a 33-byte payload with a valid CRC
fn ootx_bits(mode: u8, accel_dir: [i8; 3], station_id: u32) -> Vec<bool> {
    let mut payload = [0u8; 33];
    payload[2..6].copy_from_slice(&station_id.to_le_bytes());
    for (i, v) in accel_dir.iter().enumerate() {
        payload[20 + i] = *v as u8;
    }
    payload[31] = mode;
    encode_frame(&payload).collect()
}

fn alternate_axis(i: usize) -> Axis {
    if i % 2 == 0 {
        Axis::Horizontal
    } else {
        Axis::Vertical
    }
}

/// Ticks a perfect receiver reports for the level board at `position`
fn ticks_for(position: Vector3<f64>) -> [u32; CHANNEL_COUNT] {
    let mut ticks = [0u32; CHANNEL_COUNT];
    for sensor in 0..SENSOR_COUNT {
        let p = Vector3::new(SENSOR_LAYOUT_MM[2 * sensor], SENSOR_LAYOUT_MM[2 * sensor + 1], 0.0)
            + position;
        for (axis, coordinate) in [p.x, p.y].into_iter().enumerate() {
            let angle = (coordinate / -p.z).atan().to_degrees();
            let swept = if axis == 0 { 90.0 - angle } else { angle + 90.0 };
            ticks[2 * sensor + axis] =
                (swept / (60.0 * 360.0) * CLOCKS_PER_SECOND as f64).round() as u32;
        }
    }
    ticks
}

/// Sweep every photodiode once on `axis` of the period opened at `sync_start`
fn sweep_axis(receiver: &Receiver, sync_start: u32, ticks: &[u32; CHANNEL_COUNT], axis: Axis) {
    for sensor in 0..SENSOR_COUNT {
        pulse(receiver, sensor, sync_start + ticks[axis.channel(sensor)], SWEEP_WIDTH);
    }
}

/// Single station: frame, then a horizontal and a vertical period
///
/// Returns the tick of the sync that closes the vertical period.
fn single_station(receiver: &Receiver, mode: u8, position: Vector3<f64>) -> u32 {
    let mut t = 1_000u32;
    for (i, bit) in ootx_bits(mode, [0, 127, 0], 0x1234_5678).into_iter().enumerate() {
        sync(receiver, t, false, bit, alternate_axis(i));
        t += PERIOD_TICKS;
    }
    let ticks = ticks_for(position);
    sync(receiver, t, false, false, Axis::Horizontal);
    sweep_axis(receiver, t, &ticks, Axis::Horizontal);
    t += PERIOD_TICKS;
    sync(receiver, t, false, false, Axis::Vertical);
    sweep_axis(receiver, t, &ticks, Axis::Vertical);
    t += PERIOD_TICKS;
    sync(receiver, t, false, false, Axis::Horizontal);
    t
}

#[test]
fn ootx_frame_reaches_receiver() {
    let receiver = receiver();
    let mut t = 1_000u32;
    for (i, bit) in ootx_bits(2, [0, 90, 90], 0xCAFE_F00D).into_iter().enumerate() {
        sync(&receiver, t, false, bit, alternate_axis(i));
        t += PERIOD_TICKS;
    }

    let frame = receiver.ootx_frame(0).expect("frame decoded");
    assert_eq!(frame.mode, Some(BaseStationMode::C));
    assert_eq!(frame.station_id, 0xCAFE_F00D);
    assert_eq!(frame.payload_len, 33);
    assert!(frame.crc_matches());
    assert!((frame.pitch_deg + 45.0).abs() < 1e-9, "pitch {}", frame.pitch_deg);
    assert!(frame.roll_deg.abs() < 1e-9, "roll {}", frame.roll_deg);
    assert!(receiver.ootx_frame(1).is_none());
}

#[test]
fn pose_from_captured_edges() {
    let truth = Vector3::new(25.0, 15.0, -650.0);
    let receiver = receiver();
    let mut t = single_station(&receiver, 0, truth);

    let mut tracker = PoseTracker::new(SimulatedImu::new(&LEVEL_IMU), &receiver, &TrackingParams::default());
    tracker.process_lighthouse().unwrap();
    assert!((tracker.position() - truth).norm() < 1.0, "position {:?}", tracker.position());
    assert_eq!(tracker.detections(), &[1; CHANNEL_COUNT]);
    assert_eq!(tracker.widths(), &[SWEEP_WIDTH; CHANNEL_COUNT]);
    assert!(tracker.base_station_pitch_deg().abs() < 1e-9);

    // Each committed period is delivered once
    assert_eq!(tracker.process_lighthouse(), Err(LighthouseError::NoData));
    assert_eq!(tracker.process_lighthouse(), Err(LighthouseError::NoData));

    // Board moves; the next vertical period commits
    let moved = Vector3::new(-10.0, 15.0, -650.0);
    let ticks = ticks_for(moved);
    sweep_axis(&receiver, t, &ticks, Axis::Horizontal);
    t += PERIOD_TICKS;
    sync(&receiver, t, false, false, Axis::Vertical);
    sweep_axis(&receiver, t, &ticks, Axis::Vertical);
    t += PERIOD_TICKS;
    sync(&receiver, t, false, false, Axis::Horizontal);

    tracker.process_lighthouse().unwrap();
    assert!((tracker.position() - moved).norm() < 1.0, "position {:?}", tracker.position());
}

#[test]
fn other_station_mode_is_not_delivered() {
    let receiver = receiver();
    single_station(&receiver, 1, Vector3::new(0.0, 0.0, -500.0));

    let mut tracker = PoseTracker::new(SimulatedImu::new(&LEVEL_IMU), &receiver, &TrackingParams::default());
    assert_eq!(tracker.process_lighthouse(), Err(LighthouseError::NoData));

    tracker.set_mode(BaseStationMode::B);
    assert!(tracker.process_lighthouse().is_ok());
}

#[test]
fn occluded_diode_is_rejected() {
    let receiver = receiver();
    let mut t = 1_000u32;
    for (i, bit) in ootx_bits(0, [0, 127, 0], 1).into_iter().enumerate() {
        sync(&receiver, t, false, bit, alternate_axis(i));
        t += PERIOD_TICKS;
    }
    let ticks = ticks_for(Vector3::new(0.0, 0.0, -500.0));
    sync(&receiver, t, false, false, Axis::Horizontal);
    // Photodiode 3 never sees the horizontal sweep
    for sensor in 0..SENSOR_COUNT - 1 {
        pulse(&receiver, sensor, t + ticks[2 * sensor], SWEEP_WIDTH);
    }
    t += PERIOD_TICKS;
    sync(&receiver, t, false, false, Axis::Vertical);
    sweep_axis(&receiver, t, &ticks, Axis::Vertical);
    t += PERIOD_TICKS;
    sync(&receiver, t, false, false, Axis::Horizontal);

    let mut tracker = PoseTracker::new(SimulatedImu::new(&LEVEL_IMU), &receiver, &TrackingParams::default());
    assert_eq!(tracker.process_lighthouse(), Err(LighthouseError::BadDetectionCount));
    assert_eq!(tracker.detections()[6], 0);
    assert!(!tracker.has_pose());
}

#[test]
fn dual_station_slots_follow_sync_spacing() {
    let receiver = receiver();
    let bits_a = ootx_bits(0, [0, 127, 0], 0xA);
    let bits_b = ootx_bits(1, [0, 127, 0], 0xB);
    assert_eq!(bits_a.len(), bits_b.len());

    let mut t = 1_000u32;
    for (i, (a, b)) in bits_a.into_iter().zip(bits_b).enumerate() {
        sync(&receiver, t, false, a, alternate_axis(i));
        sync(&receiver, t + STATION_OFFSET_TICKS, false, b, alternate_axis(i));
        t += PERIOD_TICKS;
    }
    assert_eq!(receiver.ootx_frame(0).map(|f| f.station_id), Some(0xA));
    assert_eq!(receiver.ootx_frame(1).map(|f| f.station_id), Some(0xB));

    // Periods committed while the frames were still in flight
    let _ = receiver.read_timings(BaseStationMode::A);
    let _ = receiver.read_timings(BaseStationMode::B);

    let ticks_a = ticks_for(Vector3::new(0.0, 0.0, -500.0));
    let ticks_b = ticks_for(Vector3::new(50.0, 0.0, -800.0));

    // A sweeps horizontally while B skips
    sync(&receiver, t, false, false, Axis::Horizontal);
    sync(&receiver, t + STATION_OFFSET_TICKS, true, false, Axis::Horizontal);
    sweep_axis(&receiver, t, &ticks_a, Axis::Horizontal);
    t += PERIOD_TICKS;

    // A closes its period and skips; B sweeps vertically
    sync(&receiver, t, true, false, Axis::Vertical);
    let b_start = t + STATION_OFFSET_TICKS;
    sync(&receiver, b_start, false, false, Axis::Vertical);
    sweep_axis(&receiver, b_start, &ticks_b, Axis::Vertical);
    t += PERIOD_TICKS;

    // B closes its period
    sync(&receiver, t, false, false, Axis::Horizontal);
    sync(&receiver, t + STATION_OFFSET_TICKS, true, false, Axis::Horizontal);

    let a = receiver.read_timings(BaseStationMode::A).expect("station A period");
    for sensor in 0..SENSOR_COUNT {
        assert_eq!(a.ticks[2 * sensor], ticks_a[2 * sensor]);
        assert_eq!(a.detections[2 * sensor], 1);
    }
    let b = receiver.read_timings(BaseStationMode::B).expect("station B period");
    assert_eq!(b.mode, BaseStationMode::B);
    for sensor in 0..SENSOR_COUNT {
        assert_eq!(b.ticks[2 * sensor + 1], ticks_b[2 * sensor + 1]);
        assert_eq!(b.detections[2 * sensor + 1], 1);
    }

    assert!(receiver.read_timings(BaseStationMode::A).is_none());
    assert!(receiver.read_timings(BaseStationMode::B).is_none());
}
