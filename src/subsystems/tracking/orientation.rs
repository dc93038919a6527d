//! Orientation tracker
//!
//! Polls the IMU, removes the calibrated gyro bias and advances every
//! orientation estimate by the time between consecutive samples.
//!
//! ## Usage
//!
//! ```ignore
//! let mut tracker = OrientationTracker::new(imu, &TrackingParams::default());
//! let _ = tracker.init_imu();
//! tracker.measure_bias_variance()?;
//! loop {
//!     if tracker.process_imu() {
//!         let q = tracker.estimate().quaternion_comp;
//!     }
//! }
//! ```

use lighthouse_tracker_core::orientation::{
    BiasVarianceEstimator, ImuStatistics, OrientationEstimate,
};
use lighthouse_tracker_core::parameters::TrackingParams;
use lighthouse_tracker_core::telemetry::TelemetryFrame;
use lighthouse_tracker_core::traits::step_seconds;
use nalgebra::Vector3;

use crate::devices::traits::{ImuError, ImuSample, ImuSensor};

/// Consecutive empty polls after which calibration gives up
pub const MAX_IDLE_POLLS: u32 = 1_000_000;

/// IMU-only orientation tracking
pub struct OrientationTracker<I: ImuSensor> {
    imu: I,
    alpha: f64,
    calibration_samples: u32,
    /// Bias-corrected gyro of the last sample, deg/s
    gyro: Vector3<f64>,
    /// Accelerometer of the last sample, m/s²
    accel: Vector3<f64>,
    statistics: ImuStatistics,
    previous_timestamp_us: Option<u64>,
    /// Step of the last update, seconds
    dt: f64,
    estimate: OrientationEstimate,
}

impl<I: ImuSensor> OrientationTracker<I> {
    pub fn new(imu: I, params: &TrackingParams) -> Self {
        Self {
            imu,
            alpha: params.imu_alpha,
            calibration_samples: params.calibration_samples,
            gyro: Vector3::zeros(),
            accel: Vector3::zeros(),
            statistics: ImuStatistics::default(),
            previous_timestamp_us: None,
            dt: 0.0,
            estimate: OrientationEstimate::default(),
        }
    }

    /// Bring the IMU up
    ///
    /// A failure is reported once and otherwise ignored: polling simply
    /// yields no samples until the device answers.
    pub fn init_imu(&mut self) -> Result<(), ImuError> {
        let result = self.imu.init();
        if let Err(e) = result {
            crate::log_warn!("IMU init failed: {}, check the IMU connection", e.as_str());
        }
        result
    }

    /// Average stationary samples into per-axis bias and variance
    ///
    /// Blocks until the configured number of samples has been read. The
    /// gyro bias is subtracted from every later sample; the accelerometer
    /// statistics are informational.
    ///
    /// # Errors
    ///
    /// `ImuError::NotInitialized` if the IMU stays silent for
    /// [`MAX_IDLE_POLLS`] consecutive polls.
    pub fn measure_bias_variance(&mut self) -> Result<ImuStatistics, ImuError> {
        let mut estimator = BiasVarianceEstimator::new(self.calibration_samples);
        let mut idle = 0u32;

        while !estimator.is_complete() {
            match self.imu.poll() {
                Some(sample) => {
                    idle = 0;
                    estimator.push(&sample);
                }
                None => {
                    idle += 1;
                    if idle >= MAX_IDLE_POLLS {
                        crate::log_error!(
                            "IMU calibration stalled after {} samples",
                            estimator.count()
                        );
                        return Err(ImuError::NotInitialized);
                    }
                }
            }
        }

        self.statistics = estimator.statistics();
        let bias = self.statistics.gyro_bias;
        crate::log_info!(
            "IMU calibrated over {} samples, gyro bias ({}, {}, {})",
            estimator.count(),
            bias.x,
            bias.y,
            bias.z
        );
        Ok(self.statistics)
    }

    /// Override the gyro bias, deg/s
    pub fn set_gyro_bias(&mut self, bias: Vector3<f64>) {
        self.statistics.gyro_bias = bias;
    }

    /// Zero every estimate; quaternions return to identity
    pub fn reset_orientation(&mut self) {
        self.estimate.reset();
    }

    /// Poll the IMU and update the estimates
    ///
    /// Returns `false` when no sample was ready.
    pub fn process_imu(&mut self) -> bool {
        match self.imu.poll() {
            Some(sample) => {
                self.process_sample(&sample);
                true
            }
            None => false,
        }
    }

    /// Update the estimates from one sample
    ///
    /// The first sample only establishes the time base (dt = 0).
    pub fn process_sample(&mut self, sample: &ImuSample) {
        self.dt = match self.previous_timestamp_us {
            Some(previous) => step_seconds(previous, sample.timestamp_us),
            None => 0.0,
        };
        self.previous_timestamp_us = Some(sample.timestamp_us);

        self.gyro = sample.gyro - self.statistics.gyro_bias;
        self.accel = sample.accel;
        self.estimate
            .update(&self.gyro, &self.accel, self.dt, self.alpha);
    }

    pub fn estimate(&self) -> &OrientationEstimate {
        &self.estimate
    }

    /// Bias-corrected gyro of the last sample, deg/s
    pub fn gyro(&self) -> Vector3<f64> {
        self.gyro
    }

    pub fn accel(&self) -> Vector3<f64> {
        self.accel
    }

    pub fn gyro_bias(&self) -> Vector3<f64> {
        self.statistics.gyro_bias
    }

    pub fn gyro_variance(&self) -> Vector3<f64> {
        self.statistics.gyro_variance
    }

    pub fn accel_bias(&self) -> Vector3<f64> {
        self.statistics.accel_bias
    }

    pub fn accel_variance(&self) -> Vector3<f64> {
        self.statistics.accel_variance
    }

    pub fn statistics(&self) -> &ImuStatistics {
        &self.statistics
    }

    /// Step of the last update, seconds
    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn imu(&self) -> &I {
        &self.imu
    }

    pub fn imu_mut(&mut self) -> &mut I {
        &mut self.imu
    }

    /// IMU telemetry lines for the current estimates
    pub fn telemetry(&self) -> TelemetryFrame {
        TelemetryFrame::new(self.estimate)
    }
}
