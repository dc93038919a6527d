//! Orientation estimate state
//!
//! Holds every estimate the tracker maintains and advances them together
//! from one bias-corrected sample.

use nalgebra::Vector3;

use super::filter;
use crate::math::Quaternion;

/// All orientation estimates for one tracking cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationEstimate {
    /// Roll from gyro integration about z, degrees
    pub flatland_roll_gyro: f64,
    /// Roll from the accelerometer, degrees
    pub flatland_roll_accel: f64,
    /// Complementary-filtered roll, degrees
    pub flatland_roll_comp: f64,
    /// Gyro-only integrated orientation
    pub quaternion_gyro: Quaternion,
    /// Accelerometer Euler angles (pitch, yaw, roll), degrees; yaw stays 0
    pub euler_accel: Vector3<f64>,
    /// Complementary-filtered orientation
    pub quaternion_comp: Quaternion,
}

impl Default for OrientationEstimate {
    fn default() -> Self {
        Self {
            flatland_roll_gyro: 0.0,
            flatland_roll_accel: 0.0,
            flatland_roll_comp: 0.0,
            quaternion_gyro: Quaternion::IDENTITY,
            euler_accel: Vector3::zeros(),
            quaternion_comp: Quaternion::IDENTITY,
        }
    }
}

impl OrientationEstimate {
    /// Advance all estimates by one sample
    ///
    /// `gyro` must already have its bias removed.
    pub fn update(&mut self, gyro: &Vector3<f64>, accel: &Vector3<f64>, dt: f64, alpha: f64) {
        self.flatland_roll_gyro = filter::flatland_roll_gyro(self.flatland_roll_gyro, gyro, dt);
        self.flatland_roll_accel = filter::flatland_roll_accel(accel);
        self.flatland_roll_comp = filter::flatland_roll_comp(
            self.flatland_roll_comp,
            gyro,
            self.flatland_roll_accel,
            dt,
            alpha,
        );

        self.quaternion_gyro = filter::integrate_gyro(&self.quaternion_gyro, gyro, dt);

        self.euler_accel = Vector3::new(filter::accel_pitch(accel), 0.0, filter::accel_roll(accel));

        self.quaternion_comp =
            filter::complementary_update(&self.quaternion_comp, gyro, accel, dt, alpha);
    }

    /// Back to level: zero rolls and angles, identity quaternions
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_update_advances_every_estimate() {
        let mut estimate = OrientationEstimate::default();
        let gyro = Vector3::new(0.0, 0.0, 20.0);
        let accel = Vector3::new(1.0, 1.0, 0.0);

        estimate.update(&gyro, &accel, 0.5, 0.9);

        assert!((estimate.flatland_roll_gyro - 10.0).abs() < EPSILON);
        assert!((estimate.flatland_roll_accel - 45.0).abs() < EPSILON);
        assert!((estimate.flatland_roll_comp - (0.9 * 10.0 + 0.1 * 45.0)).abs() < EPSILON);
        assert!((estimate.euler_accel.z - 45.0).abs() < EPSILON);
        assert_eq!(estimate.euler_accel.y, 0.0);
        assert!(estimate.quaternion_gyro.z > 0.0);
        assert_ne!(estimate.quaternion_comp, Quaternion::IDENTITY);
    }

    #[test]
    fn test_reset() {
        let mut estimate = OrientationEstimate::default();
        estimate.update(&Vector3::new(5.0, 1.0, 3.0), &Vector3::new(0.3, 9.0, 0.2), 0.1, 0.5);
        estimate.reset();
        assert_eq!(estimate, OrientationEstimate::default());
    }
}
