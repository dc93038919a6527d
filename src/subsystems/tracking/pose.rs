//! Pose tracker
//!
//! Combines the IMU orientation tracker with one base station's sweep
//! timings. Each lighthouse update solves the board pose from a committed
//! sweep period; IMU updates run independently at the sensor rate.

use core::fmt;

use lighthouse_tracker_core::lighthouse::types::{BaseStationMode, CHANNEL_COUNT};
use lighthouse_tracker_core::math::Quaternion;
use lighthouse_tracker_core::parameters::TrackingParams;
use lighthouse_tracker_core::pose::{pose_from_projections, ticks_to_2d, PoseError, SENSOR_LAYOUT_MM};
use lighthouse_tracker_core::telemetry::{OpticalTelemetry, TelemetryFrame};
use nalgebra::Vector3;

use super::orientation::OrientationTracker;
use crate::devices::traits::ImuSensor;
use crate::subsystems::lighthouse::TimingSource;

/// Position before the first solve, mm
pub const INITIAL_POSITION_MM: [f64; 3] = [0.0, 0.0, -500.0];

/// Lighthouse update failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LighthouseError {
    /// No new period from the tracked station; retry next tick
    NoData,
    /// A channel saw zero or several hits (occlusion or reflections)
    BadDetectionCount,
    /// The period could not be turned into a pose
    Pose(PoseError),
}

impl LighthouseError {
    pub fn as_str(&self) -> &'static str {
        match self {
            LighthouseError::NoData => "no lighthouse data",
            LighthouseError::BadDetectionCount => "bad detection count",
            LighthouseError::Pose(e) => e.as_str(),
        }
    }
}

impl fmt::Display for LighthouseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PoseError> for LighthouseError {
    fn from(e: PoseError) -> Self {
        LighthouseError::Pose(e)
    }
}

/// Optical plus inertial tracking of the board
pub struct PoseTracker<I: ImuSensor, L: TimingSource> {
    orientation: OrientationTracker<I>,
    lighthouse: L,
    mode: BaseStationMode,
    /// Board position in the base-station frame, mm
    position: Vector3<f64>,
    quaternion_homography: Quaternion,
    projections: [f64; CHANNEL_COUNT],
    ticks: [u32; CHANNEL_COUNT],
    detections: [u32; CHANNEL_COUNT],
    widths: [u32; CHANNEL_COUNT],
    base_station_pitch_deg: f64,
    base_station_roll_deg: f64,
    /// At least one period has been solved
    solved: bool,
}

impl<I: ImuSensor, L: TimingSource> PoseTracker<I, L> {
    pub fn new(imu: I, lighthouse: L, params: &TrackingParams) -> Self {
        Self {
            orientation: OrientationTracker::new(imu, params),
            lighthouse,
            mode: params.base_station_mode,
            position: Vector3::from(INITIAL_POSITION_MM),
            quaternion_homography: Quaternion::IDENTITY,
            projections: [0.0; CHANNEL_COUNT],
            ticks: [0; CHANNEL_COUNT],
            detections: [0; CHANNEL_COUNT],
            widths: [0; CHANNEL_COUNT],
            base_station_pitch_deg: 0.0,
            base_station_roll_deg: 0.0,
            solved: false,
        }
    }

    /// Solve the pose from the next committed period of the tracked station
    ///
    /// The raw timings and base-station tilt are kept even when the period
    /// is rejected; position and homography quaternion only change on
    /// success.
    pub fn process_lighthouse(&mut self) -> Result<(), LighthouseError> {
        let timings = self
            .lighthouse
            .read_timings(self.mode)
            .ok_or(LighthouseError::NoData)?;

        self.ticks = timings.ticks;
        self.detections = timings.detections;
        self.widths = timings.widths;
        self.base_station_pitch_deg = timings.pitch_deg;
        self.base_station_roll_deg = timings.roll_deg;

        // Reflections add hits, occlusions drop them
        if !timings.has_single_detections() {
            return Err(LighthouseError::BadDetectionCount);
        }

        self.projections = ticks_to_2d(&self.ticks);
        let pose = pose_from_projections(&SENSOR_LAYOUT_MM, &self.projections).map_err(|e| {
            crate::log_debug!("pose solve failed: {}", e.as_str());
            LighthouseError::from(e)
        })?;

        self.position = pose.position;
        self.quaternion_homography = pose.orientation;
        self.solved = true;
        Ok(())
    }

    /// Poll the IMU and update the orientation estimates
    pub fn process_imu(&mut self) -> bool {
        self.orientation.process_imu()
    }

    pub fn orientation(&self) -> &OrientationTracker<I> {
        &self.orientation
    }

    pub fn orientation_mut(&mut self) -> &mut OrientationTracker<I> {
        &mut self.orientation
    }

    /// Track a different base station from the next update on
    pub fn set_mode(&mut self, mode: BaseStationMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> BaseStationMode {
        self.mode
    }

    pub fn position(&self) -> Vector3<f64> {
        self.position
    }

    pub fn quaternion_homography(&self) -> Quaternion {
        self.quaternion_homography
    }

    /// Normalized projections of the last accepted period
    pub fn projections(&self) -> &[f64; CHANNEL_COUNT] {
        &self.projections
    }

    pub fn ticks(&self) -> &[u32; CHANNEL_COUNT] {
        &self.ticks
    }

    pub fn detections(&self) -> &[u32; CHANNEL_COUNT] {
        &self.detections
    }

    pub fn widths(&self) -> &[u32; CHANNEL_COUNT] {
        &self.widths
    }

    pub fn base_station_pitch_deg(&self) -> f64 {
        self.base_station_pitch_deg
    }

    pub fn base_station_roll_deg(&self) -> f64 {
        self.base_station_roll_deg
    }

    pub fn has_pose(&self) -> bool {
        self.solved
    }

    pub fn lighthouse(&self) -> &L {
        &self.lighthouse
    }

    /// Telemetry lines for the current estimates
    ///
    /// Optical lines are included once a pose has been solved.
    pub fn telemetry(&self) -> TelemetryFrame {
        let frame = self.orientation.telemetry();
        if !self.solved {
            return frame;
        }
        frame.with_optical(OpticalTelemetry {
            position: self.position,
            quaternion_homography: self.quaternion_homography,
            base_station_pitch_deg: self.base_station_pitch_deg,
            base_station_roll_deg: self.base_station_roll_deg,
            projections: self.projections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MockTime;
    use crate::devices::imu::MockImu;
    use crate::subsystems::lighthouse::SimulatedLighthouse;
    use lighthouse_tracker_core::lighthouse::types::{StationTimings, CLOCKS_PER_SECOND};

    /// Ticks a perfect receiver reports for the board at `position`, level
    fn ticks_for(position: Vector3<f64>) -> [u32; CHANNEL_COUNT] {
        let mut ticks = [0u32; CHANNEL_COUNT];
        for point in 0..CHANNEL_COUNT / 2 {
            let p = Vector3::new(SENSOR_LAYOUT_MM[2 * point], SENSOR_LAYOUT_MM[2 * point + 1], 0.0)
                + position;
            for (axis, coordinate) in [p.x, p.y].into_iter().enumerate() {
                let angle = (coordinate / -p.z).atan().to_degrees();
                let swept = if axis == 0 { 90.0 - angle } else { angle + 90.0 };
                ticks[2 * point + axis] =
                    (swept / (60.0 * 360.0) * CLOCKS_PER_SECOND as f64).round() as u32;
            }
        }
        ticks
    }

    /// Timing source returning scripted periods
    struct Scripted(std::vec::Vec<StationTimings>);

    impl TimingSource for Scripted {
        fn read_timings(&mut self, mode: BaseStationMode) -> Option<StationTimings> {
            let index = self.0.iter().position(|t| t.mode == mode)?;
            Some(self.0.remove(index))
        }
    }

    fn period(ticks: [u32; CHANNEL_COUNT], mode: BaseStationMode) -> StationTimings {
        StationTimings {
            ticks,
            detections: [1; CHANNEL_COUNT],
            widths: [480; CHANNEL_COUNT],
            pitch_deg: 2.0,
            roll_deg: -1.0,
            mode,
        }
    }

    fn tracker<L: TimingSource>(lighthouse: L) -> PoseTracker<MockImu<MockTime>, L> {
        PoseTracker::new(
            MockImu::at_rest(MockTime::new()),
            lighthouse,
            &TrackingParams::default(),
        )
    }

    #[test]
    fn test_initial_state() {
        let tracker = tracker(Scripted(std::vec::Vec::new()));
        assert_eq!(tracker.position(), Vector3::new(0.0, 0.0, -500.0));
        assert_eq!(tracker.quaternion_homography(), Quaternion::IDENTITY);
        assert_eq!(tracker.mode(), BaseStationMode::A);
        assert!(!tracker.has_pose());
        assert!(tracker.telemetry().optical.is_none());
    }

    #[test]
    fn test_no_data() {
        let mut tracker = tracker(Scripted(std::vec::Vec::new()));
        assert_eq!(tracker.process_lighthouse(), Err(LighthouseError::NoData));
    }

    #[test]
    fn test_recovers_position() {
        let truth = Vector3::new(40.0, -25.0, -700.0);
        let mut tracker = tracker(Scripted(std::vec![period(ticks_for(truth), BaseStationMode::A)]));

        tracker.process_lighthouse().unwrap();
        assert!((tracker.position() - truth).norm() < 0.5, "{:?}", tracker.position());

        let q = tracker.quaternion_homography();
        assert!((q.w.abs() - 1.0).abs() < 1e-3, "{q:?}");
        assert_eq!(tracker.widths(), &[480; CHANNEL_COUNT]);
        assert_eq!(tracker.base_station_pitch_deg(), 2.0);
        assert_eq!(tracker.base_station_roll_deg(), -1.0);
        assert!(tracker.has_pose());
    }

    #[test]
    fn test_bad_detection_count_keeps_previous_pose() {
        let mut reflected = period(ticks_for(Vector3::new(0.0, 0.0, -400.0)), BaseStationMode::A);
        reflected.detections[3] = 2;
        let mut occluded = reflected;
        occluded.detections[3] = 0;

        let mut tracker = tracker(Scripted(std::vec![reflected, occluded]));
        assert_eq!(tracker.process_lighthouse(), Err(LighthouseError::BadDetectionCount));
        assert_eq!(tracker.detections()[3], 2);
        assert_eq!(tracker.process_lighthouse(), Err(LighthouseError::BadDetectionCount));
        assert_eq!(tracker.position(), Vector3::new(0.0, 0.0, -500.0));
        assert!(!tracker.has_pose());
    }

    #[test]
    fn test_pose_error_converts() {
        let e: LighthouseError = PoseError::SingularMatrix.into();
        assert_eq!(e, LighthouseError::Pose(PoseError::SingularMatrix));
        assert_ne!(e, LighthouseError::NoData);
        assert_ne!(e, LighthouseError::BadDetectionCount);
    }

    #[test]
    fn test_set_mode_selects_station() {
        let ticks = ticks_for(Vector3::new(0.0, 0.0, -500.0));
        let mut tracker = tracker(Scripted(std::vec![period(ticks, BaseStationMode::B)]));
        assert_eq!(tracker.process_lighthouse(), Err(LighthouseError::NoData));

        tracker.set_mode(BaseStationMode::B);
        assert!(tracker.process_lighthouse().is_ok());
    }

    #[test]
    fn test_simulated_replay() {
        let table = [
            ticks_for(Vector3::new(0.0, 0.0, -500.0)),
            ticks_for(Vector3::new(10.0, 0.0, -500.0)),
        ];
        let mut tracker = tracker(SimulatedLighthouse::new(&table, 0.5, 0.25));

        tracker.process_lighthouse().unwrap();
        assert!(tracker.position().x.abs() < 0.5);
        tracker.process_lighthouse().unwrap();
        assert!((tracker.position().x - 10.0).abs() < 0.5);
        tracker.process_lighthouse().unwrap();
        assert!(tracker.position().x.abs() < 0.5);
        assert_eq!(tracker.base_station_pitch_deg(), 0.5);
    }

    #[test]
    fn test_imu_and_telemetry() {
        let ticks = ticks_for(Vector3::new(0.0, 0.0, -500.0));
        let mut tracker = tracker(Scripted(std::vec![period(ticks, BaseStationMode::A)]));
        assert!(tracker.process_imu());
        tracker.process_lighthouse().unwrap();

        let frame = tracker.telemetry();
        let optical = frame.optical.unwrap();
        assert_eq!(optical.position, tracker.position());
        assert_eq!(optical.projections, *tracker.projections());

        let mut out = heapless::String::<1024>::new();
        frame.write_lines(&mut out).unwrap();
        assert!(out.starts_with("PS "));
        assert_eq!(out.lines().count(), 8);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            std::format!("{}", LighthouseError::Pose(PoseError::SingularMatrix)),
            "singular homography matrix"
        );
        assert_eq!(LighthouseError::NoData.as_str(), "no lighthouse data");
    }
}
