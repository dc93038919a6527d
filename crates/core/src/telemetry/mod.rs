//! Text telemetry lines
//!
//! Estimates are streamed to the visualizer as space-separated lines, one
//! estimate per line, each starting with a short tag:
//!
//! | Tag    | Fields                        | Units            |
//! |--------|-------------------------------|------------------|
//! | `PS`   | x y z                         | mm               |
//! | `QH`   | w x y z                       | homography quat  |
//! | `QC`   | w x y z                       | complementary    |
//! | `QG`   | w x y z                       | gyro-only        |
//! | `EA`   | pitch yaw roll                | degrees          |
//! | `FLAT` | gyr acc comp                  | degrees          |
//! | `BS`   | pitch roll                    | degrees          |
//! | `PD`   | d0x d0y d1x d1y … d3x d3y     | normalized       |
//!
//! Formatting goes through `core::fmt::Write`, so any serial or socket
//! writer (or a `heapless::String`) can carry it.

use core::fmt::{self, Write};

use nalgebra::Vector3;

use crate::lighthouse::types::CHANNEL_COUNT;
use crate::math::Quaternion;
use crate::orientation::OrientationEstimate;

/// Decimal places written for every value
pub const TELEMETRY_PRECISION: usize = 4;

/// Optical estimate of one lighthouse period
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpticalTelemetry {
    /// Board position, mm
    pub position: Vector3<f64>,
    pub quaternion_homography: Quaternion,
    /// Base-station pitch and roll, degrees
    pub base_station_pitch_deg: f64,
    pub base_station_roll_deg: f64,
    pub projections: [f64; CHANNEL_COUNT],
}

/// Everything the tracker streams after one update
///
/// `optical` is `None` when no lighthouse period was solved this cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryFrame {
    pub orientation: OrientationEstimate,
    pub optical: Option<OpticalTelemetry>,
}

fn write_values<W: Write>(out: &mut W, tag: &str, values: &[f64]) -> fmt::Result {
    out.write_str(tag)?;
    for value in values {
        write!(out, " {:.*}", TELEMETRY_PRECISION, value)?;
    }
    out.write_str("\n")
}

fn write_quaternion<W: Write>(out: &mut W, tag: &str, q: &Quaternion) -> fmt::Result {
    write_values(out, tag, &[q.w, q.x, q.y, q.z])
}

impl TelemetryFrame {
    pub fn new(orientation: OrientationEstimate) -> Self {
        Self {
            orientation,
            optical: None,
        }
    }

    pub fn with_optical(mut self, optical: OpticalTelemetry) -> Self {
        self.optical = Some(optical);
        self
    }

    /// Write the IMU lines (`QC`, `QG`, `EA`, `FLAT`)
    pub fn write_orientation_lines<W: Write>(&self, out: &mut W) -> fmt::Result {
        let estimate = &self.orientation;
        write_quaternion(out, "QC", &estimate.quaternion_comp)?;
        write_quaternion(out, "QG", &estimate.quaternion_gyro)?;
        write_values(
            out,
            "EA",
            &[estimate.euler_accel.x, estimate.euler_accel.y, estimate.euler_accel.z],
        )?;
        write_values(
            out,
            "FLAT",
            &[
                estimate.flatland_roll_gyro,
                estimate.flatland_roll_accel,
                estimate.flatland_roll_comp,
            ],
        )
    }

    /// Write the optical lines (`PS`, `QH`, `BS`, `PD`); nothing without a solve
    pub fn write_optical_lines<W: Write>(&self, out: &mut W) -> fmt::Result {
        let Some(optical) = &self.optical else {
            return Ok(());
        };
        write_values(
            out,
            "PS",
            &[optical.position.x, optical.position.y, optical.position.z],
        )?;
        write_quaternion(out, "QH", &optical.quaternion_homography)?;
        write_values(
            out,
            "BS",
            &[optical.base_station_pitch_deg, optical.base_station_roll_deg],
        )?;
        write_values(out, "PD", &optical.projections)
    }

    /// Write every available line
    pub fn write_lines<W: Write>(&self, out: &mut W) -> fmt::Result {
        self.write_optical_lines(out)?;
        self.write_orientation_lines(out)
    }
}
