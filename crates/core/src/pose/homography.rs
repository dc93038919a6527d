//! Homography pose estimation
//!
//! Converts the eight sweep timings of one base-station period into the
//! board's rotation and position in the base-station frame.
//!
//! # Pipeline
//!
//! 1. Each tick offset becomes a sweep angle and then a normalized image
//!    coordinate `tan(angle)`.
//! 2. The four photodiode correspondences give an 8×8 linear system for the
//!    planar homography `H` (with `h33 = 1`).
//! 3. `H` is decomposed into an orthonormal rotation and a translation.
//! 4. The rotation is converted to a quaternion.
//!
//! The base station looks down its −z axis, so a board in front of it has a
//! negative z position.

use core::fmt;

use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

use crate::lighthouse::types::{CHANNEL_COUNT, CLOCKS_PER_SECOND};
use crate::math::Quaternion;

/// Photodiode positions on the board, mm, as (x, y) pairs
pub const SENSOR_LAYOUT_MM: [f64; CHANNEL_COUNT] =
    [-42.0, 25.0, 42.0, 25.0, 42.0, -25.0, -42.0, -25.0];

/// Degrees swept per second by a 60 Hz rotor
const SWEEP_DEG_PER_SECOND: f64 = 60.0 * 360.0;

/// 8×8 homography constraint matrix
pub type HomographyMatrix = SMatrix<f64, 8, 8>;

/// The eight free homography entries h11..h32
pub type HomographyVector = SVector<f64, 8>;

/// Pose estimation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PoseError {
    /// The homography system has no unique solution
    SingularMatrix,
}

impl PoseError {
    pub fn as_str(&self) -> &'static str {
        match self {
            PoseError::SingularMatrix => "singular homography matrix",
        }
    }
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rotation and translation recovered from a homography
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidTransform {
    pub rotation: Matrix3<f64>,
    /// Board origin in the base-station frame, mm
    pub position: Vector3<f64>,
}

/// Result of one pose update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseEstimate {
    /// Board origin in the base-station frame, mm
    pub position: Vector3<f64>,
    pub orientation: Quaternion,
    /// Normalized projections the pose was solved from
    pub projections: [f64; CHANNEL_COUNT],
}

/// Normalized image coordinates from sweep tick offsets
///
/// Even channels are horizontal sweeps, odd channels vertical.
pub fn ticks_to_2d(ticks: &[u32; CHANNEL_COUNT]) -> [f64; CHANNEL_COUNT] {
    let mut projections = [0.0; CHANNEL_COUNT];
    for (i, &tick) in ticks.iter().enumerate() {
        let swept = tick as f64 / CLOCKS_PER_SECOND as f64 * SWEEP_DEG_PER_SECOND;
        let angle = if i % 2 == 0 { 90.0 - swept } else { swept - 90.0 };
        projections[i] = libm::tan(angle.to_radians());
    }
    projections
}

/// Build the homography constraint matrix
///
/// Two rows per correspondence between a layout point `(x, y)` and its
/// measured projection `(xn, yn)`.
pub fn form_a(
    layout: &[f64; CHANNEL_COUNT],
    projections: &[f64; CHANNEL_COUNT],
) -> HomographyMatrix {
    let mut a = HomographyMatrix::zeros();
    for point in 0..CHANNEL_COUNT / 2 {
        let (x, y) = (layout[2 * point], layout[2 * point + 1]);
        let (xn, yn) = (projections[2 * point], projections[2 * point + 1]);

        let row = 2 * point;
        a[(row, 0)] = x;
        a[(row, 1)] = y;
        a[(row, 2)] = 1.0;
        a[(row, 6)] = -x * xn;
        a[(row, 7)] = -y * xn;

        a[(row + 1, 3)] = x;
        a[(row + 1, 4)] = y;
        a[(row + 1, 5)] = 1.0;
        a[(row + 1, 6)] = -x * yn;
        a[(row + 1, 7)] = -y * yn;
    }
    a
}

/// Solve `A h = b` for the homography entries
pub fn solve_for_h(
    layout: &[f64; CHANNEL_COUNT],
    projections: &[f64; CHANNEL_COUNT],
) -> Result<HomographyVector, PoseError> {
    let a_inv = form_a(layout, projections)
        .try_inverse()
        .ok_or(PoseError::SingularMatrix)?;
    let b = HomographyVector::from_column_slice(projections);
    Ok(a_inv * b)
}

/// Decompose a homography into rotation and translation
///
/// The first rotation column comes straight from `H`; the second is made
/// orthogonal to it by Gram-Schmidt and the third is their cross product.
/// The z entries of both columns flip sign because `h31`/`h32` carry `-r31`
/// and `-r32` of the −z-looking projection model.
pub fn rt_from_h(h: &HomographyVector) -> RigidTransform {
    let col1 = Vector3::new(h[0], h[3], h[6]);
    let col2 = Vector3::new(h[1], h[4], h[7]);
    let scale = 2.0 / (col1.norm() + col2.norm());

    let position = Vector3::new(scale * h[2], scale * h[5], -scale);

    let r1 = Vector3::new(h[0], h[3], -h[6]).normalize();
    let raw2 = Vector3::new(h[1], h[4], -h[7]);
    let r2 = (raw2 - r1 * r1.dot(&raw2)).normalize();
    let r3 = r1.cross(&r2);

    RigidTransform {
        rotation: Matrix3::from_columns(&[r1, r2, r3]),
        position,
    }
}

/// Rotation matrix to unit quaternion
///
/// Branches on the largest of the trace and diagonal entries so the divisor
/// stays well away from zero, including for rotations near 180°.
pub fn quaternion_from_rotation(r: &Matrix3<f64>) -> Quaternion {
    let trace = r[(0, 0)] + r[(1, 1)] + r[(2, 2)];

    let q = if trace > 0.0 {
        let s = libm::sqrt(trace + 1.0) * 2.0;
        Quaternion::new(
            0.25 * s,
            (r[(2, 1)] - r[(1, 2)]) / s,
            (r[(0, 2)] - r[(2, 0)]) / s,
            (r[(1, 0)] - r[(0, 1)]) / s,
        )
    } else if r[(0, 0)] > r[(1, 1)] && r[(0, 0)] > r[(2, 2)] {
        let s = libm::sqrt(1.0 + r[(0, 0)] - r[(1, 1)] - r[(2, 2)]) * 2.0;
        Quaternion::new(
            (r[(2, 1)] - r[(1, 2)]) / s,
            0.25 * s,
            (r[(0, 1)] + r[(1, 0)]) / s,
            (r[(0, 2)] + r[(2, 0)]) / s,
        )
    } else if r[(1, 1)] > r[(2, 2)] {
        let s = libm::sqrt(1.0 + r[(1, 1)] - r[(0, 0)] - r[(2, 2)]) * 2.0;
        Quaternion::new(
            (r[(0, 2)] - r[(2, 0)]) / s,
            (r[(0, 1)] + r[(1, 0)]) / s,
            0.25 * s,
            (r[(1, 2)] + r[(2, 1)]) / s,
        )
    } else {
        let s = libm::sqrt(1.0 + r[(2, 2)] - r[(0, 0)] - r[(1, 1)]) * 2.0;
        Quaternion::new(
            (r[(1, 0)] - r[(0, 1)]) / s,
            (r[(0, 2)] + r[(2, 0)]) / s,
            (r[(1, 2)] + r[(2, 1)]) / s,
            0.25 * s,
        )
    };

    q.normalize()
}

/// Pose from normalized projections of the layout points
pub fn pose_from_projections(
    layout: &[f64; CHANNEL_COUNT],
    projections: &[f64; CHANNEL_COUNT],
) -> Result<PoseEstimate, PoseError> {
    let h = solve_for_h(layout, projections)?;
    let rt = rt_from_h(&h);
    Ok(PoseEstimate {
        position: rt.position,
        orientation: quaternion_from_rotation(&rt.rotation),
        projections: *projections,
    })
}

/// Pose from one period of sweep tick offsets
pub fn estimate_pose(
    ticks: &[u32; CHANNEL_COUNT],
    layout: &[f64; CHANNEL_COUNT],
) -> Result<PoseEstimate, PoseError> {
    pose_from_projections(layout, &ticks_to_2d(ticks))
}
