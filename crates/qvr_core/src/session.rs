//! VR session
//!
//! Owns the tracking runtime and the per-frame VR state. The engine calls
//! [`VrSession::frame`] once per rendered frame and [`VrSession::update_move`]
//! once per user command.

use crate::aim::{add_orientation_to_view_angles, AimInput, AimMode, AimState};
use crate::config::{SettingChange, VrConfig};
use crate::error::Result;
use crate::host::{FrameContext, GameWorld};
use crate::input::{InputMapper, InputSink, MoveCommand, MoveInput, MoveSpeeds, MAIN_HAND};
use crate::menu::{MenuAction, MenuKey, VrMenu};
use crate::overlay::{crosshair, AimRay, CrosshairDraw, CrosshairSettings, HandPose, OverlayAnchor};
use crate::stereo::{GraphicsDevice, SceneRenderer, StereoFrame, StereoRenderer};
use crate::tracking::TrackingState;
use crate::weapon::WeaponMods;
use qvr_math::{Angles, Vec3};
use qvr_runtime::{TrackingRuntime, TrackingSpace};

/// VR state driven by the engine
pub struct VrSession<R: TrackingRuntime> {
    runtime: R,
    config: VrConfig,
    initialized: bool,
    /// Added to the headset yaw, degrees
    yaw_offset: f32,
    tracking: TrackingState,
    aim: AimState,
    input: InputMapper,
    stereo: StereoRenderer,
    weapon_mods: WeaponMods,
    menu: VrMenu,
    crosshair: Option<CrosshairDraw>,
}

impl<R: TrackingRuntime> VrSession<R> {
    pub fn new(runtime: R, config: VrConfig) -> Self {
        Self {
            runtime,
            config,
            initialized: false,
            yaw_offset: 0.0,
            tracking: TrackingState::new(),
            aim: AimState::new(),
            input: InputMapper::new(),
            stereo: StereoRenderer::default(),
            weapon_mods: WeaponMods::new(),
            menu: VrMenu::new(),
            crosshair: None,
        }
    }

    /// Bring up the runtime and eye targets.
    ///
    /// On failure everything brought up so far is torn down and `enabled`
    /// is cleared.
    pub fn enable<G: GraphicsDevice + ?Sized>(&mut self, gfx: &mut G) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        log::info!("Enabling VR on {}", self.runtime.name());
        if let Err(e) = self.runtime.init() {
            log::error!("Failed to initialize VR runtime: {}", e);
            self.config.enabled = false;
            return Err(e.into());
        }

        match StereoRenderer::create(&self.runtime, gfx) {
            Ok(stereo) => self.stereo = stereo,
            Err(e) => {
                log::error!("{}", e);
                self.runtime.shutdown();
                self.config.enabled = false;
                return Err(e);
            }
        }

        self.runtime.set_tracking_space(TrackingSpace::Standing);
        self.tracking.reset();
        self.initialized = true;
        self.config.enabled = true;
        self.reset_orientation();

        log::info!("VR enabled");
        Ok(())
    }

    /// Shut the runtime down and release the eye targets
    pub fn disable<G: GraphicsDevice + ?Sized>(&mut self, gfx: &mut G) {
        if !self.initialized {
            return;
        }
        self.runtime.shutdown();
        self.stereo.release(gfx);
        self.initialized = false;
        self.crosshair = None;
        log::info!("VR disabled");
    }

    /// Write a setting by name and react to it
    pub fn set_setting<G: GraphicsDevice + ?Sized>(
        &mut self,
        name: &str,
        value: &str,
        gfx: &mut G,
    ) -> Result<SettingChange> {
        let change = self.config.set(name, value)?;
        Ok(self.react(change, gfx))
    }

    /// Forward a key to the options menu and react to any change
    pub fn menu_key<G: GraphicsDevice + ?Sized>(
        &mut self,
        key: MenuKey,
        max_samples: u32,
        gfx: &mut G,
    ) -> Result<MenuAction> {
        let action = self.menu.key(key, &mut self.config, max_samples)?;
        Ok(match action {
            MenuAction::Changed { option, change } => MenuAction::Changed {
                option,
                change: self.react(change, gfx),
            },
            other => other,
        })
    }

    fn react<G: GraphicsDevice + ?Sized>(&mut self, change: SettingChange, gfx: &mut G) -> SettingChange {
        match change {
            SettingChange::Enabled(on) => {
                self.disable(gfx);
                if on && self.enable(gfx).is_err() {
                    return SettingChange::Enabled(false);
                }
                change
            }
            SettingChange::Clamped { requested, stored } => {
                log::debug!("Clamped setting from {} to {}", requested, stored);
                change
            }
            SettingChange::Stored => change,
        }
    }

    /// Run one VR frame: ingest poses, reconcile angles, render both eyes.
    ///
    /// Returns `false` when VR is off and the engine should render normally.
    pub fn frame<G, S>(
        &mut self,
        ctx: &FrameContext,
        gfx: &mut G,
        scene: &mut S,
        world: &mut dyn GameWorld,
    ) -> Result<bool>
    where
        G: GraphicsDevice + ?Sized,
        S: SceneRenderer + ?Sized,
    {
        if !self.config.enabled {
            return Ok(false);
        }
        // Started with VR on; a failed enable has already cleared the flag
        if !self.initialized && self.enable(gfx).is_err() {
            return Ok(false);
        }

        let meters_to_units = self.config.meters_to_units();
        self.tracking.update(
            &mut self.runtime,
            self.yaw_offset,
            meters_to_units,
            self.config.left_handed,
        )?;

        let mut head = self.tracking.head_angles(self.yaw_offset);
        if let Some(delta) = self.aim.apply_push_yaw(&mut head, &mut self.yaw_offset) {
            for controller in self.tracking.controllers.iter_mut() {
                controller.orientation.yaw += delta;
            }
        }

        let mode = self.config.aim_mode;
        self.aim.reconcile(&AimInput {
            mode,
            head,
            deadzone: self.config.deadzone,
            gun_angle: self.config.gun_angle,
            controller_angles: self.tracking.controller_angles(),
            controller_positions: self.tracking.controller_positions(),
            yaw_offset: self.yaw_offset,
            player_origin: ctx.player_origin,
            floor_offset: self.config.floor_offset,
        });

        if mode == AimMode::Controller {
            if let Some(model) = ctx.view_model.as_deref() {
                self.weapon_mods
                    .apply(model, world, &self.config.weapon_offsets, self.config.world_scale);
            }
        }

        let anchor = OverlayAnchor {
            mode,
            aim: self.aim.aim,
            main_hand: HandPose {
                position: self.aim.hand_positions[MAIN_HAND],
                angles: self.aim.hand_angles[MAIN_HAND],
            },
            view_origin: ctx.view_origin,
            view_entity_origin: ctx.view_entity_origin,
        };

        let settings = CrosshairSettings {
            style: self.config.crosshair,
            depth: self.config.crosshair_depth,
            size: self.config.crosshair_size,
            alpha: self.config.crosshair_alpha,
            meters_to_units,
        };
        self.crosshair = crosshair(&settings, &AimRay::new(&anchor, ctx.view_height), ctx.holding_axe, world);

        let frame = StereoFrame {
            eye_poses: &self.tracking.eyes,
            view_angles: self.aim.view,
            aim_angles: self.aim.aim,
            yaw_offset: self.yaw_offset,
            meters_to_units,
            floor_offset: self.config.floor_offset,
            far_clip: self.config.far_clip,
            time: ctx.time,
            backbuffer: ctx.backbuffer,
            overlay_anchor: anchor,
            crosshair: self.crosshair,
        };
        self.stereo.render_frame(&mut self.runtime, gfx, scene, &frame)?;

        Ok(true)
    }

    /// Map controller input into the user command and key events
    pub fn update_move(
        &mut self,
        ctx: &FrameContext,
        speeds: MoveSpeeds,
        cmd: &mut MoveCommand,
        sink: &mut dyn InputSink,
    ) {
        if !self.config.enabled || !self.initialized {
            return;
        }
        // Nothing to map until a controller has reported its axes
        let Some(layout) = self.tracking.axis_layout().copied() else {
            return;
        };

        let input = MoveInput {
            controllers: &self.tracking.controllers,
            layout: &layout,
            hand_angles: self.aim.hand_angles,
            aim: self.aim.aim,
            menu_active: ctx.menu_active,
            frame_time: ctx.frame_time,
            speeds,
            movement_mode: self.config.movement_mode,
            snap_turn: self.config.snap_turn,
            turn_speed: self.config.turn_speed,
        };
        self.input.process(&input, &mut self.yaw_offset, cmd, sink);
    }

    /// Restore weapon models before the level's models are freed
    pub fn exit_level(&mut self, world: &mut dyn GameWorld) {
        self.weapon_mods.clear(world);
    }

    /// Recenter yaw on the current view direction next frame
    pub fn push_yaw(&mut self) {
        self.aim.push_yaw();
    }

    /// Mouse look: turn the aim, picked up by the next frame
    pub fn turn_aim(&mut self, pitch: f32, yaw: f32) {
        self.aim.aim.pitch += pitch;
        self.aim.aim.yaw += yaw;
    }

    pub fn set_angles(&mut self, angles: Angles) {
        self.aim.set_angles(angles);
    }

    pub fn reset_orientation(&mut self) {
        self.aim.reset_orientation(self.config.enabled);
    }

    /// `angles` plus the current head orientation
    pub fn add_orientation_to_view_angles(&self, angles: Angles) -> Angles {
        add_orientation_to_view_angles(angles, self.tracking.head_angles(self.yaw_offset))
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn config(&self) -> &VrConfig {
        &self.config
    }

    /// Settings access for callers that handle reactions themselves
    pub fn config_mut(&mut self) -> &mut VrConfig {
        &mut self.config
    }

    pub fn yaw_offset(&self) -> f32 {
        self.yaw_offset
    }

    pub fn view_angles(&self) -> Angles {
        self.aim.view
    }

    pub fn aim_angles(&self) -> Angles {
        self.aim.aim
    }

    /// Hand orientations with the gun angle applied, off hand first
    pub fn hand_angles(&self) -> [Angles; 2] {
        self.aim.hand_angles
    }

    /// Hand positions in the world, off hand first
    pub fn hand_positions(&self) -> [Vec3; 2] {
        self.aim.hand_positions
    }

    /// Horizontal head movement to apply to the player this frame
    pub fn room_scale_move(&self) -> Vec3 {
        self.tracking.room_scale_move
    }

    pub fn crosshair(&self) -> Option<CrosshairDraw> {
        self.crosshair
    }

    pub fn tracking(&self) -> &TrackingState {
        &self.tracking
    }

    pub fn stereo(&self) -> &StereoRenderer {
        &self.stereo
    }

    pub fn menu(&self) -> &VrMenu {
        &self.menu
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut R {
        &mut self.runtime
    }

    /// Tear down and hand back the runtime
    pub fn shutdown<G: GraphicsDevice + ?Sized>(mut self, gfx: &mut G) -> R {
        self.disable(gfx);
        self.runtime
    }
}

impl<R: TrackingRuntime> std::fmt::Debug for VrSession<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VrSession")
            .field("runtime", &self.runtime.name())
            .field("initialized", &self.initialized)
            .field("yaw_offset", &self.yaw_offset)
            .field("aim_mode", &self.config.aim_mode)
            .finish()
    }
}

