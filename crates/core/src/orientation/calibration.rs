//! IMU bias and variance calibration
//!
//! Stationary samples are accumulated and reduced to a per-axis mean (bias)
//! and variance `E[x²] - E[x]²` for both sensors.
//!
//! Only the gyro bias is subtracted during tracking. The accelerometer must
//! keep gravity as its absolute reference, so its statistics are
//! informational.

use nalgebra::Vector3;

use crate::imu::ImuSample;

/// Default number of samples averaged during calibration
pub const DEFAULT_CALIBRATION_SAMPLES: u32 = 1000;

/// Per-axis mean and variance of both sensors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuStatistics {
    pub gyro_bias: Vector3<f64>,
    pub gyro_variance: Vector3<f64>,
    pub accel_bias: Vector3<f64>,
    pub accel_variance: Vector3<f64>,
}

impl Default for ImuStatistics {
    fn default() -> Self {
        Self {
            gyro_bias: Vector3::zeros(),
            gyro_variance: Vector3::zeros(),
            accel_bias: Vector3::zeros(),
            accel_variance: Vector3::zeros(),
        }
    }
}

/// Running sums for bias/variance estimation
#[derive(Debug, Clone)]
pub struct BiasVarianceEstimator {
    target: u32,
    count: u32,
    gyro_sum: Vector3<f64>,
    gyro_sq_sum: Vector3<f64>,
    accel_sum: Vector3<f64>,
    accel_sq_sum: Vector3<f64>,
}

impl BiasVarianceEstimator {
    /// Estimator that completes after `target` samples (at least one)
    pub fn new(target: u32) -> Self {
        Self {
            target: target.max(1),
            count: 0,
            gyro_sum: Vector3::zeros(),
            gyro_sq_sum: Vector3::zeros(),
            accel_sum: Vector3::zeros(),
            accel_sq_sum: Vector3::zeros(),
        }
    }

    /// Add a sample; returns `true` once the target count is reached
    ///
    /// Samples beyond the target are ignored.
    pub fn push(&mut self, sample: &ImuSample) -> bool {
        if self.is_complete() {
            return true;
        }
        self.gyro_sum += sample.gyro;
        self.gyro_sq_sum += sample.gyro.component_mul(&sample.gyro);
        self.accel_sum += sample.accel;
        self.accel_sq_sum += sample.accel.component_mul(&sample.accel);
        self.count += 1;
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.count >= self.target
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Statistics over the samples seen so far; zero when empty
    pub fn statistics(&self) -> ImuStatistics {
        if self.count == 0 {
            return ImuStatistics::default();
        }
        let n = self.count as f64;
        let gyro_bias = self.gyro_sum / n;
        let accel_bias = self.accel_sum / n;
        ImuStatistics {
            gyro_bias,
            gyro_variance: self.gyro_sq_sum / n - gyro_bias.component_mul(&gyro_bias),
            accel_bias,
            accel_variance: self.accel_sq_sum / n - accel_bias.component_mul(&accel_bias),
        }
    }
}

/// Statistics over a batch of samples
pub fn compute_statistics(samples: &[ImuSample]) -> ImuStatistics {
    let mut estimator = BiasVarianceEstimator::new(samples.len() as u32);
    for sample in samples {
        estimator.push(sample);
    }
    estimator.statistics()
}
