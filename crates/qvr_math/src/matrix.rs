//! Matrix types
//!
//! `Mat3`/`Mat4` are column-major, matching what the renderer consumes.
//! `Mat34`/`Mat44` are row-major, matching what the tracking runtime reports.

use crate::quaternion::Quat;
use crate::vector::{Vec3, Vec4};
use core::ops::{Mul, MulAssign};

/// 3x3 matrix (column-major)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat3 {
    pub cols: [Vec3; 3],
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        cols: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    #[inline]
    pub const fn from_cols(c0: Vec3, c1: Vec3, c2: Vec3) -> Self {
        Self { cols: [c0, c1, c2] }
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(
            Vec3::new(self.cols[0].x, self.cols[1].x, self.cols[2].x),
            Vec3::new(self.cols[0].y, self.cols[1].y, self.cols[2].y),
            Vec3::new(self.cols[0].z, self.cols[1].z, self.cols[2].z),
        )
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z
    }
}

impl Mul for Mat3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_cols(self * rhs.cols[0], self * rhs.cols[1], self * rhs.cols[2])
    }
}

/// 4x4 matrix (column-major)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub cols: [Vec4; 4],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    #[inline]
    pub const fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self { cols: [c0, c1, c2, c3] }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::from_cols(Vec4::X, Vec4::Y, Vec4::Z, translation.extend(1.0))
    }

    #[inline]
    pub fn from_scale(scale: Vec3) -> Self {
        Self::from_cols(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, scale.z, 0.0),
            Vec4::W,
        )
    }

    /// Rotation about +X by `angle` radians
    #[inline]
    pub fn from_rotation_x(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_cols(
            Vec4::X,
            Vec4::new(0.0, cos, sin, 0.0),
            Vec4::new(0.0, -sin, cos, 0.0),
            Vec4::W,
        )
    }

    /// Rotation about +Z by `angle` radians
    #[inline]
    pub fn from_rotation_z(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(cos, sin, 0.0, 0.0),
            Vec4::new(-sin, cos, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        )
    }

    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(
            Vec4::new(self.cols[0].x, self.cols[1].x, self.cols[2].x, self.cols[3].x),
            Vec4::new(self.cols[0].y, self.cols[1].y, self.cols[2].y, self.cols[3].y),
            Vec4::new(self.cols[0].z, self.cols[1].z, self.cols[2].z, self.cols[3].z),
            Vec4::new(self.cols[0].w, self.cols[1].w, self.cols[2].w, self.cols[3].w),
        )
    }

    /// Get the translation component
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.cols[3].truncate()
    }

    /// Transform a point (w=1)
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        let v = *self * point.extend(1.0);
        v.truncate() * (1.0 / v.w)
    }

    /// Transform a direction (w=0)
    #[inline]
    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        (*self * vector.extend(0.0)).truncate()
    }

    /// Convert to 2D array (column-major) - what a GL-style `LoadMatrix` expects
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        [
            self.cols[0].to_array(),
            self.cols[1].to_array(),
            self.cols[2].to_array(),
            self.cols[3].to_array(),
        ]
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_cols(
            self * rhs.cols[0],
            self * rhs.cols[1],
            self * rhs.cols[2],
            self * rhs.cols[3],
        )
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    #[inline]
    fn mul(self, rhs: Vec4) -> Vec4 {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

impl MulAssign for Mat4 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

/// Row-major 3x4 rigid transform (`m[row][col]`), the runtime's device-to-tracking pose
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat34 {
    pub m: [[f32; 4]; 3],
}

impl Mat34 {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };

    /// Build a pose matrix from an orientation and a position
    pub fn from_rotation_translation(rotation: Quat, translation: Vec3) -> Self {
        let q = rotation;
        let (x2, y2, z2) = (q.x + q.x, q.y + q.y, q.z + q.z);
        let (xx, xy, xz) = (q.x * x2, q.x * y2, q.x * z2);
        let (yy, yz, zz) = (q.y * y2, q.y * z2, q.z * z2);
        let (wx, wy, wz) = (q.w * x2, q.w * y2, q.w * z2);

        Self {
            m: [
                [1.0 - (yy + zz), xy - wz, xz + wy, translation.x],
                [xy + wz, 1.0 - (xx + zz), yz - wx, translation.y],
                [xz - wy, yz + wx, 1.0 - (xx + yy), translation.z],
            ],
        }
    }

    /// Position: the last column
    #[inline]
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    /// Orientation of the rotation block.
    ///
    /// Each component magnitude comes from `sqrt(max(0, 1 ± m00 ± m11 ± m22)) / 2`
    /// and the vector-part signs from the off-diagonal differences. The
    /// `max(0, ..)` keeps near-degenerate traces out of `sqrt`'s NaN range.
    pub fn to_quat(&self) -> Quat {
        let m = &self.m;
        let w = (1.0 + m[0][0] + m[1][1] + m[2][2]).max(0.0).sqrt() * 0.5;
        let x = (1.0 + m[0][0] - m[1][1] - m[2][2]).max(0.0).sqrt() * 0.5;
        let y = (1.0 - m[0][0] + m[1][1] - m[2][2]).max(0.0).sqrt() * 0.5;
        let z = (1.0 - m[0][0] - m[1][1] + m[2][2]).max(0.0).sqrt() * 0.5;

        Quat::new(
            x.copysign(m[2][1] - m[1][2]),
            y.copysign(m[0][2] - m[2][0]),
            z.copysign(m[1][0] - m[0][1]),
            w,
        )
    }

    /// Split into position and orientation
    #[inline]
    pub fn decompose(&self) -> (Vec3, Quat) {
        (self.translation(), self.to_quat())
    }
}

impl Default for Mat34 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Row-major 4x4 matrix (`m[row][col]`), the runtime's projection layout
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat44 {
    pub m: [[f32; 4]; 4],
}

impl Mat44 {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn transpose(&self) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (y, row) in self.m.iter().enumerate() {
            for (x, value) in row.iter().enumerate() {
                out[x][y] = *value;
            }
        }
        Self { m: out }
    }

    /// Reinterpret as the column-major `Mat4` the renderer loads.
    ///
    /// The rows of the transposed matrix are the original's columns.
    pub fn to_mat4(&self) -> Mat4 {
        let t = self.transpose();
        let col = |r: [f32; 4]| Vec4::new(r[0], r[1], r[2], r[3]);
        Mat4::from_cols(col(t.m[0]), col(t.m[1]), col(t.m[2]), col(t.m[3]))
    }
}

impl Default for Mat44 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mat4_translation() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let result = m.transform_point(Vec3::ZERO);
        assert!((result - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn test_mat44_transpose_swaps_indices() {
        let mut src = Mat44::IDENTITY;
        src.m[0][3] = 7.0;
        src.m[2][1] = -2.0;
        let t = src.transpose();
        assert_eq!(t.m[3][0], 7.0);
        assert_eq!(t.m[1][2], -2.0);
        assert_eq!(t.transpose(), src);
    }

    #[test]
    fn test_mat44_to_mat4_keeps_row_major_translation_in_last_column() {
        let mut src = Mat44::IDENTITY;
        src.m[0][3] = 4.0;
        src.m[1][3] = 5.0;
        src.m[2][3] = 6.0;
        let m = src.to_mat4();
        assert_eq!(m.translation(), Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_decompose_round_trip() {
        let q = Quat::from_axis_angle(Vec3::new(0.2, 1.0, -0.4), 1.3);
        let t = Vec3::new(0.1, 1.6, -0.3);
        let (pos, rot) = Mat34::from_rotation_translation(q, t).decompose();
        assert_eq!(pos, t);
        assert_abs_diff_eq!(rot.dot(q).abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_decompose_half_turn_stays_finite() {
        // 180 degrees about X: trace is -1, w collapses to zero
        let m = Mat34 {
            m: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, -1.0, 0.0, 0.0],
                [0.0, 0.0, -1.0, 0.0],
            ],
        };
        let q = m.to_quat();
        assert!(q.x.is_finite() && q.w.is_finite());
        assert_abs_diff_eq!(q.x.abs(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(q.w, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_decompose_clamps_noisy_trace() {
        // Slightly non-orthonormal input pushes 1 + trace below zero
        let m = Mat34 {
            m: [
                [-1.0000001, 0.0, 0.0, 0.0],
                [0.0, -1.0000001, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
        };
        let q = m.to_quat();
        assert_eq!(q.w, 0.0);
        assert!(q.z.is_finite());
    }
}
