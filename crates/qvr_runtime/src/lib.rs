//! # qvr_runtime - Tracking/Compositor Runtime Boundary
//!
//! Everything the VR integration needs from the external tracking runtime:
//! - Device poses (HMD and hand controllers) in tracking space
//! - Per-eye projection data and eye-to-head transforms
//! - Controller button and axis snapshots
//! - Submitting rendered eye textures to the compositor
//!
//! The runtime is abstracted behind [`TrackingRuntime`] so the session can
//! be driven by a real runtime binding or by the scripted [`MockRuntime`].
//!
//! ## Example
//!
//! ```ignore
//! use qvr_runtime::prelude::*;
//!
//! let mut runtime = MockRuntime::new();
//! runtime.init()?;
//!
//! let poses = runtime.wait_for_poses()?;
//! for (index, pose) in poses.iter().enumerate() {
//!     if pose.valid && runtime.device_class(index) == DeviceClass::Hmd {
//!         // ...
//!     }
//! }
//! ```

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "mock")]
pub use mock::MockRuntime;

use qvr_math::{Mat34, Mat44};
use thiserror::Error;

/// Upper bound on tracked devices reported per frame
pub const MAX_TRACKED_DEVICES: usize = 16;

/// Number of axis slots on a controller
pub const CONTROLLER_AXIS_COUNT: usize = 5;

/// Eye being rendered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Eye {
    Left,
    Right,
}

impl Eye {
    /// Both eyes in render order
    pub const BOTH: [Eye; 2] = [Eye::Left, Eye::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Eye::Left => 0,
            Eye::Right => 1,
        }
    }
}

/// Tracked device class
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeviceClass {
    #[default]
    Invalid,
    Hmd,
    Controller,
    TrackingReference,
    Other,
}

/// Which hand a controller is assigned to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ControllerRole {
    #[default]
    Invalid,
    LeftHand,
    RightHand,
}

/// What a controller axis slot is wired to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AxisType {
    #[default]
    None,
    TrackPad,
    Joystick,
    Trigger,
}

/// Tracking universe origin
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TrackingSpace {
    Seated,
    #[default]
    Standing,
    RawUncalibrated,
}

/// Controller button ids, as numbered by the runtime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ButtonId {
    System = 0,
    ApplicationMenu = 1,
    Grip = 2,
    A = 7,
    Touchpad = 32,
    Trigger = 33,
}

impl ButtonId {
    /// Bit for this button in [`ControllerSnapshot::buttons`]
    #[inline]
    pub fn mask(self) -> u64 {
        1u64 << (self as u32)
    }
}

/// Pose of one tracked device for the current frame
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct DevicePose {
    /// The runtime had tracking for this device
    pub valid: bool,
    /// Device-to-tracking-space transform (meters)
    pub device_to_tracking: Mat34,
}

impl DevicePose {
    pub fn new(device_to_tracking: Mat34) -> Self {
        Self {
            valid: true,
            device_to_tracking,
        }
    }

    pub fn invalid() -> Self {
        Self::default()
    }
}

/// One axis slot reading
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct AxisValue {
    pub x: f32,
    pub y: f32,
}

impl AxisValue {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Button and axis state of a controller at one instant
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ControllerSnapshot {
    /// Pressed buttons, one bit per [`ButtonId`]
    pub buttons: u64,
    pub axes: [AxisValue; CONTROLLER_AXIS_COUNT],
}

impl ControllerSnapshot {
    #[inline]
    pub fn is_pressed(&self, button: ButtonId) -> bool {
        self.buttons & button.mask() != 0
    }

    pub fn press(&mut self, button: ButtonId) {
        self.buttons |= button.mask();
    }

    pub fn release(&mut self, button: ButtonId) {
        self.buttons &= !button.mask();
    }
}

/// Raw projection half-extents as tangents (left/up negative)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionRaw {
    pub left: f32,
    pub right: f32,
    pub up: f32,
    pub down: f32,
}

impl ProjectionRaw {
    /// Horizontal and vertical field of view in degrees
    pub fn fov_degrees(&self) -> (f32, f32) {
        let fov_x = (-self.left).atan() + self.right.atan();
        let fov_y = (-self.up).atan() + self.down.atan();
        (fov_x.to_degrees(), fov_y.to_degrees())
    }

    /// Row-major off-axis perspective projection for `near`/`far`
    pub fn to_matrix(&self, near: f32, far: f32) -> Mat44 {
        let idx = 1.0 / (self.right - self.left);
        let idy = 1.0 / (self.down - self.up);
        let idz = 1.0 / (far - near);
        let sx = self.right + self.left;
        let sy = self.down + self.up;

        Mat44 {
            m: [
                [2.0 * idx, 0.0, sx * idx, 0.0],
                [0.0, 2.0 * idy, sy * idy, 0.0],
                [0.0, 0.0, -far * idz, -far * near * idz],
                [0.0, 0.0, -1.0, 0.0],
            ],
        }
    }
}

/// Renderer texture handle handed to the compositor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Runtime error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("failed to initialize VR runtime: {0}")]
    InitFailed(String),

    #[error("VR runtime not initialized")]
    NotInitialized,

    #[error("compositor unavailable")]
    CompositorUnavailable,

    #[error("compositor rejected {eye:?} eye texture: {reason}")]
    SubmitFailed { eye: Eye, reason: String },

    #[error("invalid tracked device index {0}")]
    InvalidDevice(usize),
}

/// Tracking and compositor runtime
pub trait TrackingRuntime {
    /// Runtime name, for logging
    fn name(&self) -> &str;

    /// Connect to the runtime
    fn init(&mut self) -> Result<(), RuntimeError>;

    /// Disconnect from the runtime
    fn shutdown(&mut self);

    fn is_initialized(&self) -> bool;

    /// Recommended per-eye render target size in pixels
    fn recommended_target_size(&self, eye: Eye) -> (u32, u32);

    /// Projection tangents for an eye
    fn projection_raw(&self, eye: Eye) -> ProjectionRaw;

    /// Row-major projection matrix for an eye
    fn projection_matrix(&self, eye: Eye, near: f32, far: f32) -> Mat44;

    /// Eye position and orientation relative to the head
    fn eye_to_head(&self, eye: Eye) -> Mat34;

    /// Select the tracking universe
    fn set_tracking_space(&mut self, space: TrackingSpace);

    /// Block until the compositor hands out this frame's poses.
    ///
    /// The returned list is indexed by device.
    fn wait_for_poses(&mut self) -> Result<Vec<DevicePose>, RuntimeError>;

    fn device_class(&self, device: usize) -> DeviceClass;

    fn controller_role(&self, device: usize) -> ControllerRole;

    /// Current button/axis state, `None` if the device has none
    fn controller_state(&self, device: usize) -> Option<ControllerSnapshot>;

    /// What a controller axis slot is wired to
    fn axis_type(&self, device: usize, slot: usize) -> AxisType;

    /// Hand a rendered eye texture to the compositor
    fn submit(&mut self, eye: Eye, texture: TextureId) -> Result<(), RuntimeError>;
}

pub mod prelude {
    pub use crate::{
        AxisType, AxisValue, ButtonId, ControllerRole, ControllerSnapshot, DeviceClass,
        DevicePose, Eye, ProjectionRaw, RuntimeError, TextureId, TrackingRuntime,
        TrackingSpace, CONTROLLER_AXIS_COUNT, MAX_TRACKED_DEVICES,
    };

    #[cfg(feature = "mock")]
    pub use crate::mock::MockRuntime;
}
