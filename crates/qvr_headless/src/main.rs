//! Headless VR session driver
//!
//! Runs the session against the mock runtime with stand-in engine hooks,
//! turning the scripted head and pulling the trigger now and then. Useful
//! for watching the frame flow in the log.
//!
//! Run with: cargo run -p qvr_headless -- [config.toml] [frames]

use qvr_core::prelude::*;
use qvr_core::Result;
use std::collections::HashMap;

const DEFAULT_FRAMES: u64 = 90;
const FRAME_TIME: f32 = 1.0 / 90.0;

/// Hands out target ids and otherwise draws nothing
#[derive(Default)]
struct NullGraphics {
    next_id: u32,
}

impl GraphicsDevice for NullGraphics {
    fn create_eye_target(&mut self, width: u32, height: u32) -> Result<RenderTarget> {
        self.next_id += 1;
        log::debug!("Created eye target {} ({}x{})", self.next_id, width, height);
        Ok(RenderTarget {
            framebuffer: self.next_id,
            color: TextureId(self.next_id * 2),
            depth: TextureId(self.next_id * 2 + 1),
            width,
            height,
        })
    }

    fn destroy_eye_target(&mut self, target: RenderTarget) {
        log::debug!("Destroyed eye target {}", target.framebuffer);
    }

    fn bind_target(&mut self, _target: Option<&RenderTarget>) {}

    fn set_viewport(&mut self, _width: u32, _height: u32) {}

    fn clear(&mut self) {}

    fn blit_to_backbuffer(&mut self, _source: &RenderTarget, _width: u32, _height: u32, _flip_vertical: bool) {}
}

#[derive(Default)]
struct CountingScene {
    eyes_rendered: u64,
}

impl SceneRenderer for CountingScene {
    fn render_eye(&mut self, view: &EyeView) {
        self.eyes_rendered += 1;
        log::trace!(
            "{:?} eye: yaw {:.1}, offset ({:.2}, {:.2}, {:.2})",
            view.eye,
            view.view_angles.yaw,
            view.view_offset.x,
            view.view_offset.y,
            view.view_offset.z
        );
    }
}

/// Open room: traces run their full length
#[derive(Default)]
struct EmptyWorld {
    models: HashMap<String, ModelTransform>,
}

impl GameWorld for EmptyWorld {
    fn trace_line(&mut self, _start: Vec3, end: Vec3) -> Vec3 {
        end
    }

    fn trace_line_to_entity(&mut self, _start: Vec3, end: Vec3) -> Vec3 {
        end
    }

    fn model_transform(&self, model: &str) -> Option<ModelTransform> {
        Some(self.models.get(model).copied().unwrap_or(ModelTransform {
            scale: Vec3::new(1.0, 1.0, 1.0),
            scale_origin: Vec3::ZERO,
        }))
    }

    fn set_model_transform(&mut self, model: &str, transform: ModelTransform) {
        self.models.insert(model.to_string(), transform);
    }
}

struct KeyLogger;

impl InputSink for KeyLogger {
    fn key_event(&mut self, key: GameKey, down: bool) {
        log::info!("Key {:?} {}", key, if down { "down" } else { "up" });
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mut config = match args.next() {
        Some(path) => VrConfig::load(path)?,
        None => VrConfig::default(),
    };
    let frames = args
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);
    config.enabled = true;

    let mut session = VrSession::new(MockRuntime::new(), config);
    let mut gfx = NullGraphics::default();
    let mut scene = CountingScene::default();
    let mut world = EmptyWorld::default();
    let mut keys = KeyLogger;

    let mut ctx = FrameContext {
        player_origin: Vec3::new(0.0, 0.0, 24.0),
        view_origin: Vec3::new(0.0, 0.0, 46.0),
        view_entity_origin: Vec3::new(0.0, 0.0, 46.0),
        view_height: 22.0,
        view_model: Some("progs/v_shot.mdl".to_string()),
        frame_time: FRAME_TIME,
        backbuffer: (1280, 720),
        ..FrameContext::default()
    };

    for frame in 0..frames {
        ctx.time = frame as f64 * FRAME_TIME as f64;

        let yaw = (frame as f32 * 0.5).sin() * 30.0;
        let runtime = session.runtime_mut();
        runtime.set_pose(
            MockRuntime::HMD,
            Angles::new(0.0, yaw, 0.0).to_tracking_quat(0.0),
            Vec3::new(0.0, 1.6, 0.0),
        );
        if let Some(state) = runtime.controller_state_mut(MockRuntime::RIGHT_CONTROLLER) {
            let pulled = frame % 30 < 5;
            state.axes[1] = AxisValue::new(if pulled { 1.0 } else { 0.0 }, 0.0);
        }

        if !session.frame(&ctx, &mut gfx, &mut scene, &mut world)? {
            log::warn!("VR is off, stopping");
            break;
        }

        let mut cmd = MoveCommand::default();
        session.update_move(&ctx, MoveSpeeds::default(), &mut cmd, &mut keys);

        if frame % 30 == 0 {
            log::info!(
                "Frame {}: view yaw {:.1}, aim {:?}, crosshair {:?}",
                frame,
                session.view_angles().yaw,
                session.aim_angles(),
                session.crosshair()
            );
        }
    }

    session.exit_level(&mut world);
    let runtime = session.shutdown(&mut gfx);
    log::info!(
        "Rendered {} eyes, submitted {} textures over {} frames",
        scene.eyes_rendered,
        runtime.submissions().len(),
        runtime.frames()
    );
    Ok(())
}
