//! Scripted runtime for tests and headless runs
//!
//! Reports an HMD plus two hand controllers with a fixed display layout.
//! Poses, controller states and axis wiring can be changed between frames,
//! and initialization/submission failures can be injected.

use crate::{
    AxisType, ControllerRole, ControllerSnapshot, DeviceClass, DevicePose, Eye, ProjectionRaw,
    RuntimeError, TextureId, TrackingRuntime, TrackingSpace, CONTROLLER_AXIS_COUNT,
    MAX_TRACKED_DEVICES,
};
use qvr_math::{Mat34, Mat44, Quat, Vec3};
use std::cell::Cell;

/// Interpupillary half-distance of the mock display (meters)
const EYE_HALF_SEPARATION: f32 = 0.035949998;
/// Forward eye offset from the head's tracking point (meters)
const EYE_DEPTH: f32 = 0.015;
/// Standing head height used for the default HMD pose (meters)
const DEFAULT_HEAD_HEIGHT: f32 = 1.6;

#[derive(Clone, Debug)]
struct MockDevice {
    class: DeviceClass,
    role: ControllerRole,
    pose: DevicePose,
    state: Option<ControllerSnapshot>,
    axes: [AxisType; CONTROLLER_AXIS_COUNT],
}

impl MockDevice {
    fn controller(role: ControllerRole, position: Vec3) -> Self {
        let mut axes = [AxisType::None; CONTROLLER_AXIS_COUNT];
        axes[0] = AxisType::Joystick;
        axes[1] = AxisType::Trigger;
        Self {
            class: DeviceClass::Controller,
            role,
            pose: DevicePose::new(Mat34::from_rotation_translation(Quat::IDENTITY, position)),
            state: Some(ControllerSnapshot::default()),
            axes,
        }
    }
}

/// Scripted [`TrackingRuntime`]
#[derive(Debug)]
pub struct MockRuntime {
    initialized: bool,
    init_error: Option<String>,
    submit_error: Option<String>,
    target_size: (u32, u32),
    projections: [ProjectionRaw; 2],
    eye_to_head: [Mat34; 2],
    devices: Vec<MockDevice>,
    tracking_space: Option<TrackingSpace>,
    submissions: Vec<(Eye, TextureId)>,
    init_calls: usize,
    shutdown_calls: usize,
    frames: u64,
    axis_queries: Cell<usize>,
}

impl MockRuntime {
    pub const HMD: usize = 0;
    pub const LEFT_CONTROLLER: usize = 1;
    pub const RIGHT_CONTROLLER: usize = 2;

    pub fn new() -> Self {
        let eye_offset = |x: f32| {
            Mat34::from_rotation_translation(Quat::IDENTITY, Vec3::new(x, 0.0, EYE_DEPTH))
        };
        let hmd = MockDevice {
            class: DeviceClass::Hmd,
            role: ControllerRole::Invalid,
            pose: DevicePose::new(Mat34::from_rotation_translation(
                Quat::IDENTITY,
                Vec3::new(0.0, DEFAULT_HEAD_HEIGHT, 0.0),
            )),
            state: None,
            axes: [AxisType::None; CONTROLLER_AXIS_COUNT],
        };

        Self {
            initialized: false,
            init_error: None,
            submit_error: None,
            target_size: (1512, 1680),
            projections: [
                ProjectionRaw { left: -1.39, right: 1.24, up: -1.47, down: 1.46 },
                ProjectionRaw { left: -1.24, right: 1.39, up: -1.47, down: 1.46 },
            ],
            eye_to_head: [eye_offset(-EYE_HALF_SEPARATION), eye_offset(EYE_HALF_SEPARATION)],
            devices: vec![
                hmd,
                MockDevice::controller(ControllerRole::LeftHand, Vec3::new(-0.2, 1.0, -0.3)),
                MockDevice::controller(ControllerRole::RightHand, Vec3::new(0.2, 1.0, -0.3)),
            ],
            tracking_space: None,
            submissions: Vec::new(),
            init_calls: 0,
            shutdown_calls: 0,
            frames: 0,
            axis_queries: Cell::new(0),
        }
    }

    /// Make every following `init` fail with `reason`
    pub fn fail_init(&mut self, reason: impl Into<String>) {
        self.init_error = Some(reason.into());
    }

    /// Make every following `submit` fail with `reason`
    pub fn fail_submit(&mut self, reason: impl Into<String>) {
        self.submit_error = Some(reason.into());
    }

    pub fn clear_failures(&mut self) {
        self.init_error = None;
        self.submit_error = None;
    }

    pub fn set_target_size(&mut self, width: u32, height: u32) {
        self.target_size = (width, height);
    }

    pub fn set_projection(&mut self, eye: Eye, raw: ProjectionRaw) {
        self.projections[eye.index()] = raw;
    }

    pub fn set_eye_to_head(&mut self, eye: Eye, transform: Mat34) {
        self.eye_to_head[eye.index()] = transform;
    }

    /// Add a device and return its index
    pub fn add_device(&mut self, class: DeviceClass, role: ControllerRole) -> usize {
        let mut device = MockDevice::controller(role, Vec3::ZERO);
        device.class = class;
        self.devices.push(device);
        self.devices.len() - 1
    }

    pub fn set_pose(&mut self, device: usize, rotation: Quat, position: Vec3) {
        if let Some(d) = self.devices.get_mut(device) {
            d.pose = DevicePose::new(Mat34::from_rotation_translation(rotation, position));
        }
    }

    pub fn set_pose_valid(&mut self, device: usize, valid: bool) {
        if let Some(d) = self.devices.get_mut(device) {
            d.pose.valid = valid;
        }
    }

    pub fn set_role(&mut self, device: usize, role: ControllerRole) {
        if let Some(d) = self.devices.get_mut(device) {
            d.role = role;
        }
    }

    pub fn set_controller_state(&mut self, device: usize, state: ControllerSnapshot) {
        if let Some(d) = self.devices.get_mut(device) {
            d.state = Some(state);
        }
    }

    /// Mutable access to a controller's scripted state
    pub fn controller_state_mut(&mut self, device: usize) -> Option<&mut ControllerSnapshot> {
        self.devices.get_mut(device).and_then(|d| d.state.as_mut())
    }

    pub fn set_axis_types(&mut self, device: usize, axes: [AxisType; CONTROLLER_AXIS_COUNT]) {
        if let Some(d) = self.devices.get_mut(device) {
            d.axes = axes;
        }
    }

    /// Textures submitted so far, in order
    pub fn submissions(&self) -> &[(Eye, TextureId)] {
        &self.submissions
    }

    pub fn tracking_space(&self) -> Option<TrackingSpace> {
        self.tracking_space
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls
    }

    pub fn shutdown_calls(&self) -> usize {
        self.shutdown_calls
    }

    /// Number of completed `wait_for_poses` calls
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of `axis_type` lookups made by callers
    pub fn axis_queries(&self) -> usize {
        self.axis_queries.get()
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingRuntime for MockRuntime {
    fn name(&self) -> &str {
        "mock"
    }

    fn init(&mut self) -> Result<(), RuntimeError> {
        self.init_calls += 1;
        if let Some(reason) = &self.init_error {
            return Err(RuntimeError::InitFailed(reason.clone()));
        }
        self.initialized = true;
        log::debug!("Mock runtime initialized with {} devices", self.devices.len());
        Ok(())
    }

    fn shutdown(&mut self) {
        self.shutdown_calls += 1;
        self.initialized = false;
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn recommended_target_size(&self, _eye: Eye) -> (u32, u32) {
        self.target_size
    }

    fn projection_raw(&self, eye: Eye) -> ProjectionRaw {
        self.projections[eye.index()]
    }

    fn projection_matrix(&self, eye: Eye, near: f32, far: f32) -> Mat44 {
        self.projections[eye.index()].to_matrix(near, far)
    }

    fn eye_to_head(&self, eye: Eye) -> Mat34 {
        self.eye_to_head[eye.index()]
    }

    fn set_tracking_space(&mut self, space: TrackingSpace) {
        self.tracking_space = Some(space);
    }

    fn wait_for_poses(&mut self) -> Result<Vec<DevicePose>, RuntimeError> {
        if !self.initialized {
            return Err(RuntimeError::NotInitialized);
        }
        self.frames += 1;
        Ok(self
            .devices
            .iter()
            .take(MAX_TRACKED_DEVICES)
            .map(|d| d.pose)
            .collect())
    }

    fn device_class(&self, device: usize) -> DeviceClass {
        self.devices.get(device).map(|d| d.class).unwrap_or_default()
    }

    fn controller_role(&self, device: usize) -> ControllerRole {
        self.devices.get(device).map(|d| d.role).unwrap_or_default()
    }

    fn controller_state(&self, device: usize) -> Option<ControllerSnapshot> {
        self.devices.get(device).and_then(|d| d.state)
    }

    fn axis_type(&self, device: usize, slot: usize) -> AxisType {
        self.axis_queries.set(self.axis_queries.get() + 1);
        self.devices
            .get(device)
            .and_then(|d| d.axes.get(slot).copied())
            .unwrap_or_default()
    }

    fn submit(&mut self, eye: Eye, texture: TextureId) -> Result<(), RuntimeError> {
        if !self.initialized {
            return Err(RuntimeError::CompositorUnavailable);
        }
        if let Some(reason) = &self.submit_error {
            return Err(RuntimeError::SubmitFailed {
                eye,
                reason: reason.clone(),
            });
        }
        self.submissions.push((eye, texture));
        Ok(())
    }
}
