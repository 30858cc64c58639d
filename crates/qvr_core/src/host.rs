//! Engine-side collaborators
//!
//! The session does not own the game world. Each frame the engine hands it a
//! [`FrameContext`] snapshot and a [`GameWorld`] for traces and view-model
//! adjustments.

use qvr_math::Vec3;

/// Scale and scale origin of an alias model header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub scale: Vec3,
    pub scale_origin: Vec3,
}

/// World queries and model access provided by the engine
pub trait GameWorld {
    /// Trace toward `end`, stopping at the first wall
    fn trace_line(&mut self, start: Vec3, end: Vec3) -> Vec3;

    /// Trace toward `end`, stopping at the first entity other than the player
    fn trace_line_to_entity(&mut self, start: Vec3, end: Vec3) -> Vec3;

    /// Current transform of a loaded model
    fn model_transform(&self, model: &str) -> Option<ModelTransform>;

    fn set_model_transform(&mut self, model: &str, transform: ModelTransform);
}

/// Per-frame snapshot of engine state the session reads
#[derive(Debug, Clone, Default)]
pub struct FrameContext {
    /// Client time in seconds
    pub time: f64,
    /// Host frame time in seconds
    pub frame_time: f32,
    /// Player entity origin
    pub player_origin: Vec3,
    /// Un-offset eye origin the scene is rendered from
    pub view_origin: Vec3,
    /// View weapon entity origin
    pub view_entity_origin: Vec3,
    /// Eye height above the player origin
    pub view_height: f32,
    /// Model of the view weapon, if any
    pub view_model: Option<String>,
    /// The player is holding the axe
    pub holding_axe: bool,
    /// A menu has key focus
    pub menu_active: bool,
    /// Window backbuffer size in pixels
    pub backbuffer: (u32, u32),
}
