//! # qvr_math - Tracking and Angle Math
//!
//! Math primitives shared by the VR pipeline:
//! - `Vec3`/`Vec4` for positions and homogeneous coordinates
//! - `Quat` for tracked-device orientations
//! - `Mat3`/`Mat4` plus `Mat34`/`Mat44` for the runtime's row-major pose
//!   and projection matrices
//! - `Angles` for the engine's pitch/yaw/roll (degrees) convention
//!
//! ## Coordinate systems
//!
//! Tracking space is right-handed, Y up, -Z forward, meters.
//! Game space is X forward, Y left, Z up, game units.

pub mod vector;
pub mod matrix;
pub mod quaternion;
pub mod angles;

pub use vector::*;
pub use matrix::*;
pub use quaternion::*;
pub use angles::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

/// Clamp value between min and max
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min { min }
    else if value > max { max }
    else { value }
}

pub mod prelude {
    pub use crate::vector::{Vec3, Vec4};
    pub use crate::matrix::{Mat3, Mat4, Mat34, Mat44};
    pub use crate::quaternion::Quat;
    pub use crate::angles::Angles;
    pub use crate::{radians, degrees, clamp};
}
