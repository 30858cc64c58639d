//! Recording doubles for the engine-side traits

#![allow(dead_code)]

use qvr_core::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum GfxEvent {
    Create { framebuffer: u32, width: u32, height: u32 },
    Destroy(u32),
    Bind(Option<u32>),
    Viewport(u32, u32),
    Clear,
    Blit { framebuffer: u32, width: u32, height: u32, flip: bool },
}

/// Graphics device that records every call
#[derive(Debug, Default)]
pub struct RecordingGfx {
    pub events: Vec<GfxEvent>,
    pub next_id: u32,
    /// Fail target creation once this many targets exist
    pub fail_after: Option<usize>,
    pub live: usize,
}

impl RecordingGfx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_targets(&self) -> usize {
        self.live
    }

    pub fn count(&self, pred: impl Fn(&GfxEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl GraphicsDevice for RecordingGfx {
    fn create_eye_target(&mut self, width: u32, height: u32) -> qvr_core::Result<RenderTarget> {
        if self.fail_after.is_some_and(|n| self.live >= n) {
            return Err(VrError::RenderTarget("framebuffer incomplete".into()));
        }
        self.next_id += 1;
        let framebuffer = self.next_id;
        self.live += 1;
        self.events.push(GfxEvent::Create { framebuffer, width, height });
        Ok(RenderTarget {
            framebuffer,
            color: TextureId(framebuffer * 10),
            depth: TextureId(framebuffer * 10 + 1),
            width,
            height,
        })
    }

    fn destroy_eye_target(&mut self, target: RenderTarget) {
        self.live -= 1;
        self.events.push(GfxEvent::Destroy(target.framebuffer));
    }

    fn bind_target(&mut self, target: Option<&RenderTarget>) {
        self.events.push(GfxEvent::Bind(target.map(|t| t.framebuffer)));
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.events.push(GfxEvent::Viewport(width, height));
    }

    fn clear(&mut self) {
        self.events.push(GfxEvent::Clear);
    }

    fn blit_to_backbuffer(&mut self, source: &RenderTarget, width: u32, height: u32, flip_vertical: bool) {
        self.events.push(GfxEvent::Blit {
            framebuffer: source.framebuffer,
            width,
            height,
            flip: flip_vertical,
        });
    }
}

/// Scene renderer that keeps every eye view
#[derive(Debug, Default)]
pub struct RecordingScene {
    pub views: Vec<EyeView>,
}

impl SceneRenderer for RecordingScene {
    fn render_eye(&mut self, view: &EyeView) {
        self.views.push(view.clone());
    }
}

/// World whose traces stop halfway and whose models live in a map
#[derive(Debug, Default)]
pub struct TestWorld {
    pub models: HashMap<String, ModelTransform>,
    pub traces: usize,
}

impl TestWorld {
    pub fn with_model(model: &str, transform: ModelTransform) -> Self {
        let mut world = Self::default();
        world.models.insert(model.to_string(), transform);
        world
    }
}

impl GameWorld for TestWorld {
    fn trace_line(&mut self, start: Vec3, end: Vec3) -> Vec3 {
        self.traces += 1;
        start + (end - start) * 0.5
    }

    fn trace_line_to_entity(&mut self, start: Vec3, end: Vec3) -> Vec3 {
        self.traces += 1;
        start + (end - start) * 0.25
    }

    fn model_transform(&self, model: &str) -> Option<ModelTransform> {
        self.models.get(model).copied()
    }

    fn set_model_transform(&mut self, model: &str, transform: ModelTransform) {
        self.models.insert(model.to_string(), transform);
    }
}

/// Key event log
#[derive(Debug, Default)]
pub struct KeyLog(pub Vec<(GameKey, bool)>);

impl InputSink for KeyLog {
    fn key_event(&mut self, key: GameKey, down: bool) {
        self.0.push((key, down));
    }
}

pub fn frame_context() -> FrameContext {
    FrameContext {
        time: 12.5,
        frame_time: 0.01,
        player_origin: Vec3::new(100.0, 50.0, 24.0),
        view_origin: Vec3::new(100.0, 50.0, 46.0),
        view_entity_origin: Vec3::new(100.0, 50.0, 46.0),
        view_height: 22.0,
        view_model: None,
        holding_axe: false,
        menu_active: false,
        backbuffer: (1280, 720),
    }
}

/// Session over the mock runtime with VR switched on
pub fn enabled_session(aim_mode: AimMode) -> VrSession<MockRuntime> {
    let config = VrConfig {
        enabled: true,
        aim_mode,
        ..VrConfig::default()
    };
    VrSession::new(MockRuntime::new(), config)
}

/// HMD orientation looking along `yaw` (degrees)
pub fn head_yaw(yaw: f32) -> Quat {
    Angles::new(0.0, yaw, 0.0).to_tracking_quat(0.0)
}
