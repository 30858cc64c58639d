//! Engine-convention Euler angles
//!
//! Angles are in degrees. Pitch is positive looking down, yaw is positive
//! turning left (from +X toward +Y), roll is positive tilting right.

use crate::matrix::Mat3;
use crate::quaternion::Quat;
use crate::vector::Vec3;
use crate::{degrees, radians};

/// Pitch/yaw/roll in degrees
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Angles {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Angles {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Convert a tracking-space orientation into engine angles.
    ///
    /// `yaw_offset` (degrees) is added to the yaw so that the result is
    /// expressed relative to the player's accumulated turn.
    pub fn from_tracking_quat(q: Quat, yaw_offset: f32) -> Self {
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        let (xx, yy, zz, ww) = (x * x, y * y, z * z, w * w);

        let roll = -(2.0 * (x * y + w * z)).atan2(ww - xx + yy - zz);
        // Sensor noise can push the sine slightly past +/-1
        let pitch = -(-2.0 * (y * z - w * x)).clamp(-1.0, 1.0).asin();
        let yaw = (2.0 * (x * z + w * y)).atan2(ww - xx - yy + zz);

        Self::new(degrees(pitch), degrees(yaw) + yaw_offset, degrees(roll))
    }

    /// Inverse of [`Angles::from_tracking_quat`] away from the poles
    pub fn to_tracking_quat(self, yaw_offset: f32) -> Quat {
        Quat::from_euler_yxz(
            radians(self.yaw - yaw_offset),
            radians(-self.pitch),
            radians(-self.roll),
        )
    }

    /// Forward, right and up direction vectors in game space
    pub fn vectors(self) -> (Vec3, Vec3, Vec3) {
        let (sy, cy) = radians(self.yaw).sin_cos();
        let (sp, cp) = radians(self.pitch).sin_cos();
        let (sr, cr) = radians(self.roll).sin_cos();

        let forward = Vec3::new(cp * cy, cp * sy, -sp);
        let right = Vec3::new(
            -sr * sp * cy + cr * sy,
            -sr * sp * sy - cr * cy,
            -sr * cp,
        );
        let up = Vec3::new(cr * sp * cy + sr * sy, cr * sp * sy - sr * cy, cr * cp);

        (forward, right, up)
    }

    #[inline]
    pub fn forward(self) -> Vec3 {
        self.vectors().0
    }

    /// Rotation matrix with columns forward, left, up
    pub fn to_rotation_matrix(self) -> Mat3 {
        let (forward, right, up) = self.vectors();
        Mat3::from_cols(forward, -right, up)
    }

    /// Recover angles from a forward/left/up rotation matrix
    pub fn from_rotation_matrix(m: Mat3) -> Self {
        let [forward, left, up] = m.cols;
        let pitch = -forward.z.clamp(-1.0, 1.0).asin();
        let yaw = forward.y.atan2(forward.x);
        let roll = left.z.atan2(up.z);
        Self::new(degrees(pitch), degrees(yaw), degrees(roll))
    }

    /// Apply a local pitch on top of these angles (e.g. a weapon tilt)
    pub fn with_local_pitch(self, pitch: f32) -> Self {
        let local = Angles::new(pitch, 0.0, 0.0).to_rotation_matrix();
        Self::from_rotation_matrix(self.to_rotation_matrix() * local)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.pitch, self.yaw, self.roll]
    }
}

impl From<[f32; 3]> for Angles {
    fn from(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

/// Wrap an angle in degrees into `(-180, 180]`
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
