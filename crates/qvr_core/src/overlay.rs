//! World-space placement of the 2D layer and the crosshair
//!
//! The menu/HUD canvas is drawn on a billboard in front of the player, and
//! the status bar on a smaller, more steeply tilted one near the weapon. In
//! controller mode both follow the main hand.

use crate::aim::AimMode;
use crate::host::GameWorld;
use qvr_math::{radians, Angles, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Virtual 2D canvas size the HUD is laid out on
pub const CANVAS_WIDTH: f32 = 320.0;
pub const CANVAS_HEIGHT: f32 = 200.0;

/// Distance from the anchor to the menu/HUD billboard, game units
pub const HUD_DISTANCE: f32 = 48.0;
/// Canvas pixel to game unit scale for the menu/HUD
pub const HUD_SCALE: f32 = 0.13;

/// Canvas pixel to game unit scale for the status bar
pub const SBAR_SCALE: f32 = 0.025;
/// Extra status bar tilt toward the player, degrees
pub const SBAR_TILT: f32 = 45.0;
/// Status bar drop below its anchor, in billboard space
pub const SBAR_DROP: f32 = 10.0;

/// Crosshair trace length, game units
pub const CROSSHAIR_RANGE: f32 = 4096.0;
pub const CROSSHAIR_MAX_SIZE: f32 = 32.0;

/// Crosshair style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum CrosshairStyle {
    Off = 0,
    /// Dot where the aim ray lands
    #[default]
    Point = 1,
    /// Laser from the weapon to the first entity hit
    Line = 2,
}

impl CrosshairStyle {
    pub fn label(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Point => "point",
            Self::Line => "line",
        }
    }
}

impl From<i32> for CrosshairStyle {
    fn from(value: i32) -> Self {
        match value {
            0 => Self::Off,
            2 => Self::Line,
            _ => Self::Point,
        }
    }
}

impl From<CrosshairStyle> for i32 {
    fn from(style: CrosshairStyle) -> Self {
        style as i32
    }
}

/// Where the main hand is and how it is oriented
#[derive(Debug, Clone, Copy, Default)]
pub struct HandPose {
    pub position: Vec3,
    pub angles: Angles,
}

/// Inputs for placing the 2D layer
#[derive(Debug, Clone, Copy)]
pub struct OverlayAnchor {
    pub mode: AimMode,
    pub aim: Angles,
    pub main_hand: HandPose,
    /// Eye origin the scene is rendered from
    pub view_origin: Vec3,
    /// View weapon entity origin
    pub view_entity_origin: Vec3,
}

/// World transforms for the 2D layer, canvas pixels to world units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    pub hud: Mat4,
    pub sbar: Mat4,
}

impl OverlayLayout {
    pub fn compute(anchor: &OverlayAnchor) -> Self {
        Self {
            hud: hud_transform(anchor),
            sbar: sbar_transform(anchor),
        }
    }
}

/// Orientation the billboards face, level in head-aim modes
fn billboard_angles(anchor: &OverlayAnchor) -> Angles {
    if anchor.mode == AimMode::Controller {
        return anchor.main_hand.angles;
    }
    let mut angles = anchor.aim;
    if anchor.mode.is_head_aim() {
        angles.pitch = 0.0;
    }
    angles
}

fn billboard(target: Vec3, angles: Angles, tilt: f32, center: Vec3, scale: f32) -> Mat4 {
    Mat4::from_translation(target)
        * Mat4::from_rotation_z(radians(angles.yaw - 90.0))
        * Mat4::from_rotation_x(-radians(tilt + angles.pitch))
        * Mat4::from_translation(center)
        * Mat4::from_scale(Vec3::splat(scale))
}

/// Menu/HUD billboard `HUD_DISTANCE` units ahead of the anchor
pub fn hud_transform(anchor: &OverlayAnchor) -> Mat4 {
    let angles = billboard_angles(anchor);
    let origin = if anchor.mode == AimMode::Controller {
        anchor.main_hand.position
    } else {
        anchor.view_origin
    };
    let target = origin.mul_add(HUD_DISTANCE, angles.forward());
    let center = Vec3::new(
        -(CANVAS_WIDTH * HUD_SCALE / 2.0),
        -(CANVAS_HEIGHT * HUD_SCALE / 2.0),
        0.0,
    );
    billboard(target, angles, 90.0, center, HUD_SCALE)
}

/// Status bar beside the hand, or just ahead of the view weapon
pub fn sbar_transform(anchor: &OverlayAnchor) -> Mat4 {
    let angles = billboard_angles(anchor);
    let (forward, right, _) = angles.vectors();
    let target = if anchor.mode == AimMode::Controller {
        anchor.main_hand.position.mul_add(-5.0, right)
    } else {
        anchor.view_entity_origin.mul_add(1.0, forward)
    };
    let center = Vec3::new(-(CANVAS_WIDTH * SBAR_SCALE / 2.0), 0.0, SBAR_DROP);
    billboard(target, angles, 90.0 + SBAR_TILT, center, SBAR_SCALE)
}

/// Crosshair settings
#[derive(Debug, Clone, Copy)]
pub struct CrosshairSettings {
    pub style: CrosshairStyle,
    /// Fixed point depth in meters, 0 to trace
    pub depth: f32,
    pub size: f32,
    pub alpha: f32,
    pub meters_to_units: f32,
}

/// Crosshair primitive to draw in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrosshairDraw {
    Point { at: Vec3, size: f32, alpha: f32 },
    Line { from: Vec3, to: Vec3, size: f32, alpha: f32 },
}

/// Where the aim ray starts and which way it points
#[derive(Debug, Clone, Copy)]
pub struct AimRay {
    pub start: Vec3,
    pub forward: Vec3,
}

impl AimRay {
    /// Main hand in controller mode, otherwise just under the view weapon
    pub fn new(anchor: &OverlayAnchor, view_height: f32) -> Self {
        if anchor.mode == AimMode::Controller {
            Self {
                start: anchor.main_hand.position,
                forward: anchor.main_hand.angles.forward(),
            }
        } else {
            let mut start = anchor.view_entity_origin;
            start.z -= view_height - 10.0;
            Self {
                start,
                forward: anchor.aim.forward(),
            }
        }
    }
}

/// Resolve the crosshair, `None` when hidden
pub fn crosshair(
    settings: &CrosshairSettings,
    ray: &AimRay,
    holding_axe: bool,
    world: &mut dyn GameWorld,
) -> Option<CrosshairDraw> {
    if holding_axe || settings.style == CrosshairStyle::Off {
        return None;
    }

    let size = settings.size.clamp(0.0, CROSSHAIR_MAX_SIZE);
    let alpha = settings.alpha.clamp(0.0, 1.0);
    if size <= 0.0 || alpha <= 0.0 {
        return None;
    }

    let end = ray.start.mul_add(CROSSHAIR_RANGE, ray.forward);
    match settings.style {
        CrosshairStyle::Line => Some(CrosshairDraw::Line {
            from: ray.start,
            to: world.trace_line_to_entity(ray.start, end),
            size,
            alpha,
        }),
        _ => {
            let at = if settings.depth <= 0.0 {
                world.trace_line(ray.start, end)
            } else {
                ray.start.mul_add(settings.depth * settings.meters_to_units, ray.forward)
            };
            Some(CrosshairDraw::Point { at, size, alpha })
        }
    }
}
