//! Device pose ingest
//!
//! Reads every tracked device pose for the frame and converts it into the
//! game's conventions. Tracking space is Y up with -Z forward, in meters;
//! game space is X forward, Y left, Z up, in game units.

use crate::error::Result;
use crate::input::AxisLayout;
use qvr_math::{radians, Angles, Mat34, Quat, Vec3};
use qvr_runtime::{ControllerRole, ControllerSnapshot, DeviceClass, Eye, TrackingRuntime};

/// Reorder a tracking-space vector into game axes: (x, y, z) -> (z, x, y)
#[inline]
pub fn tracking_to_game(v: Vec3) -> Vec3 {
    Vec3::new(v.z, v.x, v.y)
}

/// Eye position in tracking space to a game-space view offset: (x, y, z) -> (-z, -x, y)
#[inline]
pub fn tracking_to_view_offset(v: Vec3) -> Vec3 {
    Vec3::new(-v.z, -v.x, v.y)
}

/// Head pose the eyes are derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyePose {
    /// Tracking-space position relative to the head's floor point, meters
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for EyePose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

/// One hand controller
#[derive(Debug, Clone, Copy, Default)]
pub struct HandController {
    pub state: ControllerSnapshot,
    /// Previous frame's `state`
    pub last_state: ControllerSnapshot,
    /// Game units, relative to the head's floor point
    pub position: Vec3,
    /// Engine angles, yaw offset applied
    pub orientation: Angles,
    pub raw_position: Vec3,
    pub raw_orientation: Quat,
}

/// Pose-derived state, refreshed every frame
#[derive(Debug, Clone, Default)]
pub struct TrackingState {
    pub eyes: [EyePose; 2],
    /// Off hand first
    pub controllers: [HandController; 2],
    /// Horizontal head movement since last frame, game units
    pub room_scale_move: Vec3,
    /// Unset until the first valid HMD pose
    last_head_origin: Option<Vec3>,
    axes: Option<AxisLayout>,
}

impl TrackingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Axis slot layout, once a controller has been seen
    pub fn axis_layout(&self) -> Option<&AxisLayout> {
        self.axes.as_ref()
    }

    /// Head position of the last valid HMD pose, game axes, meters
    pub fn last_head_origin(&self) -> Option<Vec3> {
        self.last_head_origin
    }

    /// Forget the previous head position, controllers and axis layout
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Head orientation as engine angles
    pub fn head_angles(&self, yaw_offset: f32) -> Angles {
        Angles::from_tracking_quat(self.eyes[Eye::Right.index()].orientation, yaw_offset)
    }

    /// Wait for this frame's poses and ingest every device
    pub fn update<R: TrackingRuntime + ?Sized>(
        &mut self,
        runtime: &mut R,
        yaw_offset: f32,
        meters_to_units: f32,
        left_handed: bool,
    ) -> Result<()> {
        let poses = runtime.wait_for_poses()?;

        self.room_scale_move = Vec3::ZERO;
        let mut updated = [false; 2];

        for (device, pose) in poses.iter().enumerate() {
            if !pose.valid {
                continue;
            }
            match runtime.device_class(device) {
                DeviceClass::Hmd => {
                    let eye_to_head = [runtime.eye_to_head(Eye::Left), runtime.eye_to_head(Eye::Right)];
                    self.ingest_hmd(&pose.device_to_tracking, &eye_to_head, yaw_offset, meters_to_units);
                }
                DeviceClass::Controller => {
                    let index = match (runtime.controller_role(device), left_handed) {
                        (ControllerRole::LeftHand, false) | (ControllerRole::RightHand, true) => 0,
                        (ControllerRole::RightHand, false) | (ControllerRole::LeftHand, true) => 1,
                        (ControllerRole::Invalid, _) => continue,
                    };

                    if self.axes.is_none() {
                        let layout = AxisLayout::identify(|slot| runtime.axis_type(device, slot));
                        log::debug!("Controller axis layout: {:?}", layout);
                        self.axes = Some(layout);
                    }

                    let state = runtime.controller_state(device).unwrap_or_default();
                    self.ingest_controller(
                        index,
                        &pose.device_to_tracking,
                        state,
                        yaw_offset,
                        meters_to_units,
                    );
                    updated[index] = true;
                }
                _ => {}
            }
        }

        // A controller without a pose this frame must not replay its last edge
        for (controller, seen) in self.controllers.iter_mut().zip(updated) {
            if !seen {
                controller.last_state = controller.state;
            }
        }

        Ok(())
    }

    /// Fold an HMD pose into the eye poses and the room-scale move
    pub fn ingest_hmd(
        &mut self,
        device_to_tracking: &Mat34,
        eye_to_head: &[Mat34; 2],
        yaw_offset: f32,
        meters_to_units: f32,
    ) {
        let (position, head_quat) = device_to_tracking.decompose();
        let head_origin = tracking_to_game(position);

        // The first pose only seeds the previous head position
        self.room_scale_move = match self.last_head_origin {
            Some(last) => {
                let mut step = head_origin - last;
                step.x *= -meters_to_units;
                step.y *= -meters_to_units;
                step.z = 0.0;
                step.rotate_z(radians(yaw_offset))
            }
            None => Vec3::ZERO,
        };
        self.last_head_origin = Some(head_origin);

        // Horizontal head motion is applied to the player through the room-scale move
        let head_position = Vec3::new(0.0, position.y, 0.0);
        let un_yaw = -radians(yaw_offset);

        for (eye, to_head) in self.eyes.iter_mut().zip(eye_to_head) {
            let offset = head_quat.rotate(to_head.translation()).rotate_y(un_yaw);
            eye.position = head_position + offset;
            eye.orientation = head_quat;
        }
    }

    /// Record a controller pose and state for hand `index` (0 off hand, 1 main hand)
    pub fn ingest_controller(
        &mut self,
        index: usize,
        device_to_tracking: &Mat34,
        state: ControllerSnapshot,
        yaw_offset: f32,
        meters_to_units: f32,
    ) {
        let (raw_position, raw_orientation) = device_to_tracking.decompose();
        let head = self.last_head_origin.unwrap_or(Vec3::ZERO);
        let Some(controller) = self.controllers.get_mut(index) else {
            return;
        };

        controller.last_state = controller.state;
        controller.state = state;
        controller.raw_position = raw_position;
        controller.raw_orientation = raw_orientation;

        let game = tracking_to_game(raw_position);
        controller.position = Vec3::new(game.x - head.x, game.y - head.y, game.z) * meters_to_units;
        controller.orientation = Angles::from_tracking_quat(raw_orientation, yaw_offset);
    }

    /// Controller orientations, off hand first
    pub fn controller_angles(&self) -> [Angles; 2] {
        [self.controllers[0].orientation, self.controllers[1].orientation]
    }

    /// Controller positions, off hand first
    pub fn controller_positions(&self) -> [Vec3; 2] {
        [self.controllers[0].position, self.controllers[1].position]
    }
}
