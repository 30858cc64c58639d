//! Aim reconciliation
//!
//! Each frame the head orientation is folded into two independent angle
//! sets: the view angles the scene is rendered with, and the aim angles
//! the player shoots and moves with. How the two relate is chosen by
//! [`AimMode`]. Decoupled modes evolve from head orientation deltas, so the
//! previous frame's head orientation and aim are kept.

use qvr_math::{radians, Angles, Vec3};
use serde::{Deserialize, Serialize};

/// Policy relating head orientation, view angles and aim angles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum AimMode {
    /// View and aim follow the head; yaw accumulates head deltas
    #[default]
    HeadMyaw = 1,
    /// As `HeadMyaw`, pitch also accumulates head deltas
    HeadMyawMpitch = 2,
    /// View yaw is aim yaw plus head yaw; view pitch is head pitch
    MouseMyaw = 3,
    /// View yaw and pitch are aim plus head
    MouseMyawMpitch = 4,
    /// View follows the head, aim catches up outside a deadzone
    Blended = 5,
    /// As `Blended` without pitch coupling
    BlendedNopitch = 6,
    /// Aim follows the dominant-hand controller
    Controller = 7,
}

impl AimMode {
    pub const ALL: [AimMode; 7] = [
        AimMode::HeadMyaw,
        AimMode::HeadMyawMpitch,
        AimMode::MouseMyaw,
        AimMode::MouseMyawMpitch,
        AimMode::Blended,
        AimMode::BlendedNopitch,
        AimMode::Controller,
    ];

    pub fn value(self) -> i32 {
        self as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::HeadMyaw => "HEAD_MYAW",
            Self::HeadMyawMpitch => "HEAD_MYAW_MPITCH",
            Self::MouseMyaw => "MOUSE_MYAW",
            Self::MouseMyawMpitch => "MOUSE_MYAW_MPITCH",
            Self::Blended => "BLENDED",
            Self::BlendedNopitch => "BLENDED_NOPITCH",
            Self::Controller => "CONTROLLER",
        }
    }

    /// Head-aiming modes keep overlays level
    pub fn is_head_aim(self) -> bool {
        matches!(self, Self::HeadMyaw | Self::HeadMyawMpitch)
    }
}

/// Unknown values fall back to head aiming
impl From<i32> for AimMode {
    fn from(value: i32) -> Self {
        match value {
            2 => Self::HeadMyawMpitch,
            3 => Self::MouseMyaw,
            4 => Self::MouseMyawMpitch,
            5 => Self::Blended,
            6 => Self::BlendedNopitch,
            7 => Self::Controller,
            _ => Self::HeadMyaw,
        }
    }
}

impl From<AimMode> for i32 {
    fn from(mode: AimMode) -> Self {
        mode.value()
    }
}

impl std::fmt::Display for AimMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Inputs to one reconciliation step
#[derive(Debug, Clone, Copy)]
pub struct AimInput {
    pub mode: AimMode,
    /// Head orientation, yaw offset applied
    pub head: Angles,
    /// Blended-mode deadzone, degrees
    pub deadzone: f32,
    /// Weapon tilt relative to the controller, degrees
    pub gun_angle: f32,
    /// Controller orientations, off hand first
    pub controller_angles: [Angles; 2],
    /// Controller positions relative to the head, game units
    pub controller_positions: [Vec3; 2],
    pub yaw_offset: f32,
    pub player_origin: Vec3,
    pub floor_offset: f32,
}

/// View/aim angle state carried between frames
#[derive(Debug, Clone, Default)]
pub struct AimState {
    pub view: Angles,
    pub aim: Angles,
    pub last_orientation: Angles,
    pub last_aim: Angles,
    /// Hand orientations with the gun angle applied, off hand first
    pub hand_angles: [Angles; 2],
    /// Hand positions in the world
    pub hand_positions: [Vec3; 2],
    push_yaw: bool,
}

impl AimState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a recenter of the yaw offset on the next frame
    pub fn push_yaw(&mut self) {
        self.push_yaw = true;
    }

    pub fn push_yaw_pending(&self) -> bool {
        self.push_yaw
    }

    /// Recompute the yaw offset so that `head` lands on the current view yaw.
    ///
    /// `head` and `last_orientation` are shifted by the same amount so the
    /// recenter does not show up as a head delta. Returns the offset change.
    pub fn apply_push_yaw(&mut self, head: &mut Angles, yaw_offset: &mut f32) -> Option<f32> {
        if !self.push_yaw {
            return None;
        }
        self.push_yaw = false;

        let new_offset = self.view.yaw - (head.yaw - *yaw_offset);
        let delta = new_offset - *yaw_offset;
        *yaw_offset = new_offset;
        head.yaw += delta;
        self.last_orientation.yaw += delta;
        Some(delta)
    }

    /// Fold this frame's head orientation into the view and aim angles
    pub fn reconcile(&mut self, input: &AimInput) {
        let head = input.head;

        // Roll only comes from the controller mode; start level
        self.aim.roll = 0.0;

        match input.mode {
            AimMode::HeadMyaw => {
                self.view.pitch = head.pitch;
                self.aim.pitch = head.pitch;
                self.aim.yaw += head.yaw - self.last_orientation.yaw;
                self.view.yaw = self.aim.yaw;
            }
            AimMode::HeadMyawMpitch => {
                self.aim.pitch += head.pitch - self.last_orientation.pitch;
                self.view.pitch = self.aim.pitch;
                self.aim.yaw += head.yaw - self.last_orientation.yaw;
                self.view.yaw = self.aim.yaw;
            }
            AimMode::MouseMyaw => {
                self.view.pitch = head.pitch;
                self.view.yaw = self.aim.yaw + head.yaw;
            }
            AimMode::MouseMyawMpitch => {
                self.view.pitch = self.aim.pitch + head.pitch;
                self.view.yaw = self.aim.yaw + head.yaw;
            }
            AimMode::Blended | AimMode::BlendedNopitch => {
                let diff_head_yaw = head.yaw - self.last_orientation.yaw;
                let diff_head_pitch = head.pitch - self.last_orientation.pitch;
                let diff_aim_yaw = self.aim.yaw - self.last_aim.yaw;

                self.view.yaw += diff_head_yaw;

                let diff_yaw = self.view.yaw - self.aim.yaw;
                if diff_yaw.abs() > input.deadzone / 2.0 {
                    self.aim.yaw += diff_head_yaw;
                    self.view.yaw += diff_aim_yaw;
                }
                if input.mode == AimMode::Blended {
                    self.aim.pitch += diff_head_pitch;
                }
                self.view.pitch = head.pitch;
            }
            AimMode::Controller => {
                self.view.pitch = head.pitch;
                self.view.yaw = head.yaw;

                for i in 0..2 {
                    self.hand_angles[i] = input.controller_angles[i].with_local_pitch(input.gun_angle);
                    self.hand_positions[i] = hand_position(
                        input.controller_positions[i],
                        input.yaw_offset,
                        input.player_origin,
                        input.floor_offset,
                    );
                }

                self.aim = self.hand_angles[1];
            }
        }

        self.view.roll = head.roll;
        self.last_orientation = head;
        self.last_aim = self.aim;
    }

    /// Aim, view and last aim all become `angles`
    pub fn set_angles(&mut self, angles: Angles) {
        self.aim = angles;
        self.view = angles;
        self.last_aim = angles;
    }

    /// Point the aim where the view is looking
    pub fn reset_orientation(&mut self, enabled: bool) {
        self.aim.yaw = self.view.yaw;
        self.aim.pitch = self.view.pitch;
        if enabled {
            self.last_aim = self.aim;
        }
    }
}

/// Add head orientation to externally supplied angles (roll is replaced)
pub fn add_orientation_to_view_angles(angles: Angles, head: Angles) -> Angles {
    Angles::new(angles.pitch + head.pitch, angles.yaw + head.yaw, head.roll)
}

/// World position of a hand from its head-relative controller position
pub fn hand_position(controller: Vec3, yaw_offset: f32, player_origin: Vec3, floor_offset: f32) -> Vec3 {
    let local = controller.rotate_z(radians(yaw_offset));
    Vec3::new(
        -local.x + player_origin.x,
        -local.y + player_origin.y,
        local.z + player_origin.z + floor_offset,
    )
}
