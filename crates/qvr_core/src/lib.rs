//! # qvr_core - Headset Integration for the Game Client
//!
//! Drives a head-mounted display from the game's frame loop:
//! - Pose ingest for the HMD and both hand controllers
//! - View/aim angle reconciliation across seven aim modes
//! - Per-eye off-screen rendering, compositor submission and the mirror blit
//! - Controller buttons and sticks mapped to key events, movement and turning
//! - World-space placement of the HUD, status bar and crosshair
//! - Per-weapon view model offsets
//! - Settings and the VR options menu model
//!
//! ## Frame flow
//!
//! ```text
//! wait_for_poses ──► TrackingState ──► AimState::reconcile ──► StereoRenderer
//!                          │                                     │   │
//!                          ▼                                     ▼   ▼
//!                     InputMapper (per command)          SceneRenderer  submit
//! ```
//!
//! The engine owns the world and the renderer; it is reached through the
//! [`GameWorld`], [`GraphicsDevice`], [`SceneRenderer`] and [`InputSink`]
//! traits.

pub mod error;
pub mod host;
pub mod weapon;
pub mod aim;
pub mod input;
pub mod tracking;
pub mod overlay;
pub mod stereo;
pub mod config;
pub mod menu;
pub mod session;

pub use error::{Result, VrError};
pub use host::{FrameContext, GameWorld, ModelTransform};
pub use aim::{AimMode, AimState};
pub use input::{GameKey, InputSink, MoveCommand, MoveSpeeds, MovementMode};
pub use tracking::TrackingState;
pub use overlay::{CrosshairDraw, CrosshairStyle, OverlayLayout};
pub use stereo::{EyeView, GraphicsDevice, RenderTarget, SceneRenderer, StereoRenderer};
pub use config::{SettingChange, VrConfig};
pub use menu::{MenuAction, MenuKey, OptionValue, VrMenu, VrOption};
pub use session::VrSession;

/// Prelude for engine integration
pub mod prelude {
    pub use crate::{
        AimMode, CrosshairDraw, EyeView, FrameContext, GameKey, GameWorld, GraphicsDevice,
        InputSink, MenuAction, MenuKey, ModelTransform, MoveCommand, MoveSpeeds, RenderTarget,
        SceneRenderer, SettingChange, VrConfig, VrError, VrSession,
    };
    pub use qvr_math::prelude::*;
    pub use qvr_runtime::prelude::*;
}
