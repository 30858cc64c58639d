//! Quaternion for tracked-device orientations

use crate::vector::Vec3;
use core::ops::{Mul, MulAssign};

/// Quaternion representing a 3D rotation, `(x, y, z)` vector part and `w` scalar part
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Create from axis and angle (radians)
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        let axis = axis.normalize();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::new(sin, 0.0, 0.0, cos)
    }

    #[inline]
    pub fn from_rotation_y(angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::new(0.0, sin, 0.0, cos)
    }

    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::new(0.0, 0.0, sin, cos)
    }

    /// Create from Euler angles (radians, YXZ order): `Ry(y) * Rx(x) * Rz(z)`
    pub fn from_euler_yxz(y: f32, x: f32, z: f32) -> Self {
        let (sx, cx) = (x * 0.5).sin_cos();
        let (sy, cy) = (y * 0.5).sin_cos();
        let (sz, cz) = (z * 0.5).sin_cos();

        Self::new(
            cy * sx * cz + sy * cx * sz,
            sy * cx * cz - cy * sx * sz,
            cy * cx * sz - sy * sx * cz,
            cy * cx * cz + sy * sx * sz,
        )
    }

    /// Vector part
    #[inline]
    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    #[inline]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
        } else {
            Self::IDENTITY
        }
    }

    /// Conjugate (inverse for unit quaternions)
    #[inline]
    pub fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Rotate a vector.
    ///
    /// `v' = 2(u·v)u + (s² - u·u)v + 2s(u×v)` with `u` the vector part and
    /// `s` the scalar part.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let u = self.xyz();
        let s = self.w;

        let uv_dot = u.dot(v);
        let uu_dot = u.dot(u);
        let uv_cross = u.cross(v);

        u * (2.0 * uv_dot) + v * (s * s - uu_dot) + uv_cross * (2.0 * s)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quat {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

impl MulAssign for Quat {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vec3> for Quat {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Vec3 {
        self.rotate(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample_rotations() -> Vec<Quat> {
        let mut out = Vec::new();
        for i in 0..7 {
            for j in 0..5 {
                let axis = Vec3::new(i as f32 - 3.0, 1.0 + j as f32, 2.0 - j as f32);
                out.push(Quat::from_axis_angle(axis, 0.37 * (i * 5 + j) as f32));
            }
        }
        out
    }

    #[test]
    fn test_quaternion_identity() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let result = Quat::IDENTITY * v;
        assert!((result - v).length() < 1e-6);
    }

    #[test]
    fn test_quaternion_rotation_y() {
        let q = Quat::from_rotation_y(core::f32::consts::PI / 2.0);
        let result = q * Vec3::X;
        assert!((result - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn test_rotate_preserves_norm() {
        let v = Vec3::new(0.3, -1.7, 2.2);
        for q in sample_rotations() {
            assert_abs_diff_eq!(q.rotate(v).length(), v.length(), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_rotate_matches_sandwich_product() {
        let v = Vec3::new(-0.4, 0.9, 1.3);
        for q in sample_rotations() {
            let p = Quat::new(v.x, v.y, v.z, 0.0);
            let expected = (q * p * q.conjugate()).xyz();
            assert!((q.rotate(v) - expected).length() < 1e-5);
        }
    }

    #[test]
    fn test_euler_yxz_is_product_of_axis_rotations() {
        let (y, x, z) = (0.7, -0.3, 1.1);
        let composed = Quat::from_rotation_y(y) * Quat::from_rotation_x(x) * Quat::from_rotation_z(z);
        let direct = Quat::from_euler_yxz(y, x, z);
        assert_abs_diff_eq!(composed.dot(direct).abs(), 1.0, epsilon = 1e-5);
    }
}
