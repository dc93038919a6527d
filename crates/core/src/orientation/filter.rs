//! Orientation filter math
//!
//! Pure update functions for the gyro-only and complementary estimators.
//! Gyro rates are in deg/s and `dt` in seconds; the accelerometer is only
//! used for its direction, so its units do not matter.
//!
//! The complementary filter blends a drift-prone gyro integration with the
//! accelerometer's absolute tilt reference:
//!
//! ```text
//! q_gyro = normalize(q_prev * q_delta(gyro, dt))
//! q_new  = normalize(q_tilt((1 - alpha) * phi) * q_gyro)
//! ```
//!
//! `alpha = 1` ignores the accelerometer; `alpha = 0` applies the full tilt
//! correction each step.

use nalgebra::Vector3;

use crate::math::Quaternion;

/// Norms below this are treated as zero to avoid dividing by nothing
pub const MIN_NORM: f64 = 1e-8;

/// Rotation accumulated over `dt` at angular rate `gyro`
///
/// Identity when the rate is (numerically) zero.
pub fn gyro_delta(gyro: &Vector3<f64>, dt: f64) -> Quaternion {
    let norm = gyro.norm();
    if norm < MIN_NORM {
        return Quaternion::IDENTITY;
    }
    Quaternion::from_angle_axis(dt * norm, gyro / norm)
}

/// Gyro-only quaternion integration
///
/// Body-frame rates compose on the right of the accumulated orientation.
pub fn integrate_gyro(q: &Quaternion, gyro: &Vector3<f64>, dt: f64) -> Quaternion {
    q.multiply(&gyro_delta(gyro, dt)).normalize()
}

/// Tilt correction rotating `up` (world frame) towards +y by `fraction` of
/// the tilt angle
///
/// Returns identity when the vector is already (anti)parallel to +y or has
/// no length.
pub fn tilt_correction(up: &Vector3<f64>, fraction: f64) -> Quaternion {
    let norm = up.norm();
    let horizontal = libm::sqrt(up.x * up.x + up.z * up.z);
    if norm < MIN_NORM || horizontal < MIN_NORM {
        return Quaternion::IDENTITY;
    }

    let phi = libm::acos((up.y / norm).clamp(-1.0, 1.0)).to_degrees();
    let axis = Vector3::new(-up.z / horizontal, 0.0, up.x / horizontal);
    Quaternion::from_angle_axis(fraction * phi, axis).normalize()
}

/// Quaternion complementary filter step
pub fn complementary_update(
    q: &Quaternion,
    gyro: &Vector3<f64>,
    accel: &Vector3<f64>,
    dt: f64,
    alpha: f64,
) -> Quaternion {
    let q_gyro = integrate_gyro(q, gyro, dt);

    // Accelerometer direction in the world frame
    let up = Quaternion::pure(*accel).rotate(&q_gyro).vector();

    tilt_correction(&up, 1.0 - alpha)
        .multiply(&q_gyro)
        .normalize()
}

/// Pitch from the accelerometer, degrees
///
/// A zero y component counts as positive.
pub fn accel_pitch(accel: &Vector3<f64>) -> f64 {
    let sign_y = if accel.y >= 0.0 { 1.0 } else { -1.0 };
    let horizontal = libm::sqrt(accel.x * accel.x + accel.y * accel.y);
    -libm::atan2(accel.z, sign_y * horizontal).to_degrees()
}

/// Roll from the accelerometer, degrees
pub fn accel_roll(accel: &Vector3<f64>) -> f64 {
    -libm::atan2(-accel.x, accel.y).to_degrees()
}

/// Flatland roll from gyro integration about z, degrees
pub fn flatland_roll_gyro(previous: f64, gyro: &Vector3<f64>, dt: f64) -> f64 {
    previous + dt * gyro.z
}

/// Flatland roll from the accelerometer, degrees
pub fn flatland_roll_accel(accel: &Vector3<f64>) -> f64 {
    libm::atan2(accel.x, accel.y).to_degrees()
}

/// Flatland complementary roll, degrees
pub fn flatland_roll_comp(
    previous: f64,
    gyro: &Vector3<f64>,
    roll_accel: f64,
    dt: f64,
    alpha: f64,
) -> f64 {
    alpha * (previous + dt * gyro.z) + (1.0 - alpha) * roll_accel
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn gravity_up() -> Vector3<f64> {
        Vector3::new(0.0, 9.81, 0.0)
    }

    fn rotation_angle_deg(q: &Quaternion) -> f64 {
        2.0 * q.vector().norm().atan2(q.w.abs()).to_degrees()
    }

    #[test]
    fn test_zero_gyro_is_identity_delta() {
        let q = Quaternion::from_angle_axis(10.0, Vector3::x());
        let out = integrate_gyro(&q, &Vector3::zeros(), 0.01);
        assert!((out.w - q.w).abs() < EPSILON);
        assert!((out.x - q.x).abs() < EPSILON);
    }

    #[test]
    fn test_gyro_integration_accumulates_angle() {
        // 90 deg/s about z for one second
        let gyro = Vector3::new(0.0, 0.0, 90.0);
        let mut q = Quaternion::IDENTITY;
        for _ in 0..500 {
            q = integrate_gyro(&q, &gyro, 0.002);
        }
        let expected = Quaternion::from_angle_axis(90.0, Vector3::z());
        assert!((q.w - expected.w).abs() < 1e-9);
        assert!((q.z - expected.z).abs() < 1e-9);
        assert!((q.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_comp_converges_for_any_alpha() {
        let start = Quaternion::from_angle_axis(30.0, Vector3::x());
        for alpha in [0.0, 0.5, 0.9] {
            let mut q = start;
            for _ in 0..1000 {
                q = complementary_update(&q, &Vector3::zeros(), &gravity_up(), 0.002, alpha);
            }
            assert!(
                rotation_angle_deg(&q) < 1e-4,
                "alpha {alpha} left {} deg",
                rotation_angle_deg(&q)
            );
        }
    }

    #[test]
    fn test_comp_alpha_zero_corrects_in_one_step() {
        let start = Quaternion::from_angle_axis(30.0, Vector3::x());
        let q = complementary_update(&start, &Vector3::zeros(), &gravity_up(), 0.002, 0.0);
        assert!(rotation_angle_deg(&q) < 1e-4);
    }

    #[test]
    fn test_comp_alpha_one_matches_gyro_only() {
        let gyro = Vector3::new(12.0, -7.5, 30.0);
        let accel = Vector3::new(1.2, 9.5, -0.7);
        let mut q_gyro = Quaternion::IDENTITY;
        let mut q_comp = Quaternion::IDENTITY;
        for _ in 0..1000 {
            q_gyro = integrate_gyro(&q_gyro, &gyro, 0.002);
            q_comp = complementary_update(&q_comp, &gyro, &accel, 0.002, 1.0);
        }
        assert!((q_gyro.w - q_comp.w).abs() < 1e-12);
        assert!((q_gyro.x - q_comp.x).abs() < 1e-12);
        assert!((q_gyro.y - q_comp.y).abs() < 1e-12);
        assert!((q_gyro.z - q_comp.z).abs() < 1e-12);
    }

    #[test]
    fn test_comp_vertical_accel_skips_correction() {
        let q = Quaternion::from_angle_axis(5.0, Vector3::y());
        let out = complementary_update(&q, &Vector3::zeros(), &gravity_up(), 0.002, 0.0);
        assert!((out.w - q.w).abs() < EPSILON);
        assert!((out.y - q.y).abs() < EPSILON);
    }

    #[test]
    fn test_comp_zero_accel_is_finite() {
        let q = Quaternion::from_angle_axis(20.0, Vector3::z());
        let out = complementary_update(&q, &Vector3::zeros(), &Vector3::zeros(), 0.002, 0.5);
        assert!(out.w.is_finite() && out.x.is_finite() && out.y.is_finite() && out.z.is_finite());
        assert!((out.w - q.w).abs() < EPSILON);
    }

    #[test]
    fn test_accel_angles() {
        assert!(accel_pitch(&gravity_up()).abs() < EPSILON);
        assert!(accel_roll(&gravity_up()).abs() < EPSILON);

        // Tipped nose-down: gravity appears on +z
        let tipped = Vector3::new(0.0, 1.0, 1.0);
        assert!((accel_pitch(&tipped) - -45.0).abs() < EPSILON);

        let rolled = Vector3::new(-1.0, 1.0, 0.0);
        assert!((accel_roll(&rolled) - -45.0).abs() < EPSILON);

        // Upside down keeps a sensible pitch sign
        assert!((accel_pitch(&Vector3::new(0.0, -1.0, 1.0)) - -135.0).abs() < EPSILON);
    }

    #[test]
    fn test_flatland_rolls() {
        let gyro = Vector3::new(0.0, 0.0, 10.0);
        assert!((flatland_roll_gyro(1.0, &gyro, 0.1) - 2.0).abs() < EPSILON);
        assert!((flatland_roll_accel(&Vector3::new(1.0, 1.0, 0.0)) - 45.0).abs() < EPSILON);

        let comp = flatland_roll_comp(1.0, &gyro, 45.0, 0.1, 0.9);
        assert!((comp - (0.9 * 2.0 + 0.1 * 45.0)).abs() < EPSILON);

        // alpha = 1 is pure gyro, alpha = 0 pure accel
        assert!((flatland_roll_comp(1.0, &gyro, 45.0, 0.1, 1.0) - 2.0).abs() < EPSILON);
        assert!((flatland_roll_comp(1.0, &gyro, 45.0, 0.1, 0.0) - 45.0).abs() < EPSILON);
    }
}
