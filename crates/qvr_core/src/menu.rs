//! VR options menu model
//!
//! Cursor navigation, value adjustment and value labels for the VR/HMD
//! options page. Drawing and menu sounds are left to the engine, which
//! reacts to the returned [`MenuAction`].

use crate::aim::AimMode;
use crate::config::{SettingChange, VrConfig};
use crate::error::Result;
use crate::input::MovementMode;
use crate::overlay::CrosshairStyle;
use qvr_math::clamp;

/// Menu page title
pub const MENU_TITLE: &str = "VR/HMD OPTIONS";

/// Largest turn speed, also the slider's full-scale value
pub const MAX_TURN_SPEED: f32 = 10.0;

/// Rows of the options page, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VrOption {
    Enabled,
    AimMode,
    Deadzone,
    Crosshair,
    CrosshairDepth,
    CrosshairSize,
    CrosshairAlpha,
    WorldScale,
    MovementMode,
    SnapTurn,
    TurnSpeed,
    Msaa,
}

impl VrOption {
    pub const ALL: [VrOption; 12] = [
        VrOption::Enabled,
        VrOption::AimMode,
        VrOption::Deadzone,
        VrOption::Crosshair,
        VrOption::CrosshairDepth,
        VrOption::CrosshairSize,
        VrOption::CrosshairAlpha,
        VrOption::WorldScale,
        VrOption::MovementMode,
        VrOption::SnapTurn,
        VrOption::TurnSpeed,
        VrOption::Msaa,
    ];

    /// Row label
    pub fn title(self) -> &'static str {
        match self {
            Self::Enabled => "VR Enabled",
            Self::AimMode => "Aim Mode",
            Self::Deadzone => "Deadzone",
            Self::Crosshair => "Crosshair",
            Self::CrosshairDepth => "Crosshair Depth",
            Self::CrosshairSize => "Crosshair Size",
            Self::CrosshairAlpha => "Crosshair Alpha",
            Self::WorldScale => "World Scale",
            Self::MovementMode => "Movement mode",
            Self::SnapTurn => "Turn",
            Self::TurnSpeed => "Turn Speed",
            Self::Msaa => "MSAA",
        }
    }

    /// Setting written when the row is adjusted
    pub fn setting(self) -> &'static str {
        match self {
            Self::Enabled => "vr_enabled",
            Self::AimMode => "vr_aimmode",
            Self::Deadzone => "vr_deadzone",
            Self::Crosshair => "vr_crosshair",
            Self::CrosshairDepth => "vr_crosshair_depth",
            Self::CrosshairSize => "vr_crosshair_size",
            Self::CrosshairAlpha => "vr_crosshair_alpha",
            Self::WorldScale => "vr_world_scale",
            Self::MovementMode => "vr_movement_mode",
            Self::SnapTurn => "vr_snap_turn",
            Self::TurnSpeed => "vr_turn_speed",
            Self::Msaa => "vr_msaa",
        }
    }

    /// Current value as the menu shows it
    pub fn value(self, config: &VrConfig) -> OptionValue {
        match self {
            Self::Enabled => OptionValue::Checkbox(config.enabled),
            Self::AimMode => OptionValue::Text(config.aim_mode.name().to_string()),
            Self::Deadzone => count_or_off(config.deadzone, "degrees"),
            Self::Crosshair => OptionValue::Text(config.crosshair.label().to_string()),
            Self::CrosshairDepth => count_or_off(config.crosshair_depth, "units"),
            Self::CrosshairSize => count_or_off(config.crosshair_size, "pixels"),
            Self::CrosshairAlpha => OptionValue::Slider(config.crosshair_alpha),
            Self::WorldScale => OptionValue::Slider(config.world_scale / 2.0),
            Self::MovementMode => OptionValue::Text(config.movement_mode.label().to_string()),
            Self::SnapTurn => OptionValue::Text(if config.snap_turn == 0.0 {
                "Smooth".to_string()
            } else {
                format!("{} Degrees", config.snap_turn as i32)
            }),
            Self::TurnSpeed => OptionValue::Slider(config.turn_speed / MAX_TURN_SPEED),
            Self::Msaa => OptionValue::Text(if config.msaa == 0 {
                "Off".to_string()
            } else {
                format!("{} Samples", config.msaa)
            }),
        }
    }
}

fn count_or_off(value: f32, unit: &str) -> OptionValue {
    OptionValue::Text(if value > 0.0 {
        format!("{:.0} {}", value, unit)
    } else {
        "off".to_string()
    })
}

/// How a row's value is drawn
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Text(String),
    Checkbox(bool),
    /// Slider position in [0, 1]
    Slider(f32),
}

/// Menu keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
}

/// Result of a key press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuAction {
    None,
    /// Cursor moved
    Moved,
    /// A setting was written
    Changed { option: VrOption, change: SettingChange },
    /// Leave for the parent options menu
    Close,
}

/// Options page state
#[derive(Debug, Default)]
pub struct VrMenu {
    cursor: usize,
}

impl VrMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> VrOption {
        VrOption::ALL[self.cursor % VrOption::ALL.len()]
    }

    /// Handle a key. `max_samples` is the renderer's MSAA limit.
    pub fn key(&mut self, key: MenuKey, config: &mut VrConfig, max_samples: u32) -> Result<MenuAction> {
        let count = VrOption::ALL.len();
        match key {
            MenuKey::Escape => Ok(MenuAction::Close),
            MenuKey::Up => {
                self.cursor = (self.cursor + count - 1) % count;
                Ok(MenuAction::Moved)
            }
            MenuKey::Down => {
                self.cursor = (self.cursor + 1) % count;
                Ok(MenuAction::Moved)
            }
            MenuKey::Left => self.adjust(false, config, max_samples),
            MenuKey::Right | MenuKey::Enter => self.adjust(true, config, max_samples),
        }
    }

    fn adjust(&self, increase: bool, config: &mut VrConfig, max_samples: u32) -> Result<MenuAction> {
        let option = self.cursor();
        let step = |value: f32, delta: f32, min: f32, max: f32| {
            clamp(if increase { value + delta } else { value - delta }, min, max)
        };
        // Integer rows truncate the current value before stepping
        let whole = |value: f32| value as i32 as f32;

        let value = match option {
            VrOption::Enabled => {
                if config.enabled {
                    0.0
                } else {
                    1.0
                }
            }
            VrOption::AimMode => step(config.aim_mode.value() as f32, 1.0, 1.0, AimMode::ALL.len() as f32),
            VrOption::Deadzone => step(whole(config.deadzone), 5.0, 0.0, 180.0),
            VrOption::Crosshair => step(i32::from(config.crosshair) as f32, 1.0, 0.0, CrosshairStyle::Line as i32 as f32),
            VrOption::CrosshairDepth => step(whole(config.crosshair_depth), 32.0, 0.0, 4096.0),
            VrOption::CrosshairSize => step(whole(config.crosshair_size), 1.0, 0.0, 32.0),
            VrOption::CrosshairAlpha => step(config.crosshair_alpha, 0.05, 0.0, 1.0),
            VrOption::WorldScale => step(config.world_scale, 0.05, 0.0, 2.0),
            VrOption::MovementMode => step(i32::from(config.movement_mode) as f32, 1.0, 0.0, MovementMode::MAX as f32),
            VrOption::SnapTurn => step(whole(config.snap_turn), 45.0, 0.0, 90.0),
            VrOption::TurnSpeed => step(config.turn_speed, 0.25, 0.0, MAX_TURN_SPEED),
            VrOption::Msaa => step(config.msaa as f32, 1.0, 0.0, max_samples as f32 - 1.0),
        };

        let change = config.set(option.setting(), &value.to_string())?;
        Ok(MenuAction::Changed { option, change })
    }
}
