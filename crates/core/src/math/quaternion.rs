//! Quaternion algebra for orientation tracking
//!
//! Scalar-first Hamilton quaternions over `f64`. All operations are pure and
//! return new values; the filters recreate their estimate every step.

use core::ops::Mul;

use nalgebra::Vector3;

/// Quaternion `w + xi + yj + zk` with `w` the scalar part
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    /// Identity rotation (1, 0, 0, 0)
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    /// Pure quaternion (zero scalar part) carrying a 3-vector
    pub fn pure(v: Vector3<f64>) -> Self {
        Self::new(0.0, v.x, v.y, v.z)
    }

    /// Rotation of `angle_deg` degrees about `axis`
    ///
    /// The axis is used as given; callers pass a unit vector.
    pub fn from_angle_axis(angle_deg: f64, axis: Vector3<f64>) -> Self {
        let half = angle_deg.to_radians() / 2.0;
        let s = libm::sin(half);
        Self::new(libm::cos(half), axis.x * s, axis.y * s, axis.z * s)
    }

    /// Vector (imaginary) part
    pub fn vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    pub fn norm_squared(&self) -> f64 {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Euclidean length of all four components
    pub fn length(&self) -> f64 {
        libm::sqrt(self.norm_squared())
    }

    /// Unit-length copy
    ///
    /// A zero quaternion has no direction and is returned unchanged.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return *self;
        }
        Self::new(self.w / len, self.x / len, self.y / len, self.z / len)
    }

    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// General inverse: conjugate divided by the squared norm
    ///
    /// Valid for non-unit quaternions. A zero quaternion is returned unchanged.
    pub fn inverse(&self) -> Self {
        let n2 = self.norm_squared();
        if n2 == 0.0 {
            return *self;
        }
        Self::new(self.w / n2, -self.x / n2, -self.y / n2, -self.z / n2)
    }

    /// Hamilton product `self * rhs`
    pub fn multiply(&self, rhs: &Self) -> Self {
        Self::new(
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        )
    }

    /// Conjugate `self` by `r`: `r * self * r⁻¹`
    ///
    /// For a pure quaternion and unit `r` this rotates the carried vector by `r`.
    pub fn rotate(&self, r: &Self) -> Self {
        r.multiply(self).multiply(&r.inverse())
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        self.multiply(&rhs)
    }
}

impl From<Quaternion> for nalgebra::Quaternion<f64> {
    fn from(q: Quaternion) -> Self {
        nalgebra::Quaternion::new(q.w, q.x, q.y, q.z)
    }
}

impl From<nalgebra::Quaternion<f64>> for Quaternion {
    fn from(q: nalgebra::Quaternion<f64>) -> Self {
        Self::new(q.w, q.i, q.j, q.k)
    }
}
