//! Stereo render sequencing
//!
//! Renders the scene once per eye into that eye's off-screen target, hands
//! each target to the compositor, then mirrors the left eye to the window.

use crate::error::{Result, VrError};
use crate::overlay::{CrosshairDraw, OverlayAnchor, OverlayLayout};
use crate::tracking::{tracking_to_view_offset, EyePose};
use qvr_math::{radians, Angles, Mat4, Vec3};
use qvr_runtime::{Eye, TextureId, TrackingRuntime};

/// Near clip plane handed to the runtime's projection, game units
pub const NEAR_CLIP: f32 = 4.0;

/// Off-screen color + depth target for one eye
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget {
    pub framebuffer: u32,
    pub color: TextureId,
    pub depth: TextureId,
    pub width: u32,
    pub height: u32,
}

/// Renderer operations the sequencer drives
pub trait GraphicsDevice {
    /// Create a color + depth target
    fn create_eye_target(&mut self, width: u32, height: u32) -> Result<RenderTarget>;

    fn destroy_eye_target(&mut self, target: RenderTarget);

    /// Bind a target for drawing, `None` for the window
    fn bind_target(&mut self, target: Option<&RenderTarget>);

    fn set_viewport(&mut self, width: u32, height: u32);

    /// Clear color and depth
    fn clear(&mut self);

    /// Copy a target's color to the window
    fn blit_to_backbuffer(&mut self, source: &RenderTarget, width: u32, height: u32, flip_vertical: bool);
}

/// Draws the game for one eye into the bound target
pub trait SceneRenderer {
    fn render_eye(&mut self, view: &EyeView);
}

/// Everything the scene renderer needs for one eye
#[derive(Debug, Clone, PartialEq)]
pub struct EyeView {
    pub eye: Eye,
    /// Logical screen size while rendering this eye
    pub viewport: (u32, u32),
    /// Field of view, degrees
    pub fov_x: f32,
    pub fov_y: f32,
    /// Column-major projection
    pub projection: Mat4,
    /// Added to the view origin, game units
    pub view_offset: Vec3,
    pub view_angles: Angles,
    pub aim_angles: Angles,
    /// Shared by both eyes so random effects match
    pub random_seed: i32,
    pub overlay: OverlayLayout,
    pub crosshair: Option<CrosshairDraw>,
}

/// Per-frame inputs to [`StereoRenderer::render_frame`]
#[derive(Debug, Clone, Copy)]
pub struct StereoFrame<'a> {
    pub eye_poses: &'a [EyePose; 2],
    pub view_angles: Angles,
    pub aim_angles: Angles,
    pub yaw_offset: f32,
    pub meters_to_units: f32,
    pub floor_offset: f32,
    pub far_clip: f32,
    /// Client time, seconds
    pub time: f64,
    /// Window size in pixels
    pub backbuffer: (u32, u32),
    /// Overlay anchor with the un-offset view origin
    pub overlay_anchor: OverlayAnchor,
    pub crosshair: Option<CrosshairDraw>,
}

#[derive(Debug, Clone, Copy)]
struct EyeTarget {
    eye: Eye,
    target: RenderTarget,
    fov_x: f32,
    fov_y: f32,
}

/// View offset for an eye, rotated into the current view yaw
pub fn eye_view_offset(
    pose: &EyePose,
    view_yaw: f32,
    yaw_offset: f32,
    meters_to_units: f32,
    floor_offset: f32,
) -> Vec3 {
    let eye_yaw = Angles::from_tracking_quat(pose.orientation, yaw_offset).yaw;
    let local = tracking_to_view_offset(pose.position) * meters_to_units;
    let mut offset = local.rotate_z(radians(view_yaw - eye_yaw));
    offset.z += floor_offset;
    offset
}

/// Seed for the engine's random number generator, shared by both eyes
#[inline]
pub fn frame_seed(time: f64) -> i32 {
    (time * 1000.0) as i32
}

/// Eye targets and their fields of view
#[derive(Debug, Default)]
pub struct StereoRenderer {
    eyes: Vec<EyeTarget>,
}

impl StereoRenderer {
    /// Create both eye targets at the runtime's recommended size
    pub fn create<R, G>(runtime: &R, gfx: &mut G) -> Result<Self>
    where
        R: TrackingRuntime + ?Sized,
        G: GraphicsDevice + ?Sized,
    {
        let mut renderer = Self::default();
        for eye in Eye::BOTH {
            let (width, height) = runtime.recommended_target_size(eye);
            let target = match gfx.create_eye_target(width, height) {
                Ok(target) => target,
                Err(e) => {
                    renderer.release(gfx);
                    return Err(e);
                }
            };
            let (fov_x, fov_y) = runtime.projection_raw(eye).fov_degrees();
            log::debug!(
                "{:?} eye target {}x{}, fov {:.1}x{:.1}",
                eye, width, height, fov_x, fov_y
            );
            renderer.eyes.push(EyeTarget {
                eye,
                target,
                fov_x,
                fov_y,
            });
        }
        Ok(renderer)
    }

    /// Destroy all eye targets
    pub fn release<G: GraphicsDevice + ?Sized>(&mut self, gfx: &mut G) {
        for eye in self.eyes.drain(..) {
            gfx.destroy_eye_target(eye.target);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.eyes.len() == Eye::BOTH.len()
    }

    pub fn target(&self, eye: Eye) -> Option<&RenderTarget> {
        self.eyes.iter().find(|e| e.eye == eye).map(|e| &e.target)
    }

    /// Field of view of an eye, degrees
    pub fn fov(&self, eye: Eye) -> Option<(f32, f32)> {
        self.eyes.iter().find(|e| e.eye == eye).map(|e| (e.fov_x, e.fov_y))
    }

    /// Render, submit and mirror one stereo frame
    pub fn render_frame<R, G, S>(
        &self,
        runtime: &mut R,
        gfx: &mut G,
        scene: &mut S,
        frame: &StereoFrame<'_>,
    ) -> Result<()>
    where
        R: TrackingRuntime + ?Sized,
        G: GraphicsDevice + ?Sized,
        S: SceneRenderer + ?Sized,
    {
        if !self.is_ready() {
            return Err(VrError::NotEnabled);
        }

        let seed = frame_seed(frame.time);

        for eye in &self.eyes {
            let pose = &frame.eye_poses[eye.eye.index()];
            let view_offset = eye_view_offset(
                pose,
                frame.view_angles.yaw,
                frame.yaw_offset,
                frame.meters_to_units,
                frame.floor_offset,
            );

            let mut anchor = frame.overlay_anchor;
            anchor.view_origin += view_offset;

            let target = &eye.target;
            let view = EyeView {
                eye: eye.eye,
                viewport: (target.width, target.height),
                fov_x: eye.fov_x,
                fov_y: eye.fov_y,
                projection: runtime
                    .projection_matrix(eye.eye, NEAR_CLIP, frame.far_clip)
                    .to_mat4(),
                view_offset,
                view_angles: frame.view_angles,
                aim_angles: frame.aim_angles,
                random_seed: seed,
                overlay: OverlayLayout::compute(&anchor),
                crosshair: frame.crosshair,
            };

            gfx.bind_target(Some(target));
            gfx.set_viewport(target.width, target.height);
            gfx.clear();

            scene.render_eye(&view);

            if let Err(e) = runtime.submit(eye.eye, target.color) {
                log::warn!("{}", e);
            }

            gfx.bind_target(None);
        }

        let (width, height) = frame.backbuffer;
        gfx.set_viewport(width, height);
        if let Some(mirror) = self.target(Eye::Left) {
            gfx.blit_to_backbuffer(mirror, width, height, true);
        }

        Ok(())
    }
}
