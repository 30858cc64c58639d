//! VR settings
//!
//! Settings live in a TOML file and can also be read and written one at a
//! time by their console variable names, e.g. `vr_aimmode` or
//! `vr_wofs_scale_03`.
//!
//! # Example Config File
//!
//! ```toml
//! enabled = true
//! aim_mode = 7
//! deadzone = 30.0
//! world_scale = 1.0
//!
//! [[weapon_offsets]]
//! model = "progs/v_shot.mdl"
//! offset = { x = 1.5, y = 1.0, z = 10.0 }
//! scale = 0.5
//! ```

use crate::aim::AimMode;
use crate::error::{Result, VrError};
use crate::input::MovementMode;
use crate::overlay::CrosshairStyle;
use crate::weapon::{parse_setting_name, WeaponOffsetTable};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest blended-mode deadzone, degrees
pub const MAX_DEADZONE: f32 = 70.0;

/// Game units per meter at world scale 1 (64 units = 8 ft)
pub const UNITS_PER_METER: f32 = 1.0 / (1.5 * 0.0254);

/// VR configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VrConfig {
    /// Render to the headset
    pub enabled: bool,
    pub aim_mode: AimMode,
    /// Blended-mode deadzone, degrees
    pub deadzone: f32,
    pub crosshair: CrosshairStyle,
    /// Fixed crosshair depth in meters, 0 to trace
    pub crosshair_depth: f32,
    /// Crosshair size in pixels
    pub crosshair_size: f32,
    pub crosshair_alpha: f32,
    /// Player size relative to the world
    pub world_scale: f32,
    /// Height of the tracking floor relative to the player origin, game units
    pub floor_offset: f32,
    /// Snap-turn step in degrees, 0 for smooth turning
    pub snap_turn: f32,
    pub turn_speed: f32,
    pub left_handed: bool,
    /// Weapon tilt relative to the controller, degrees
    pub gun_angle: f32,
    pub movement_mode: MovementMode,
    /// Let damage and recoil kick the view
    pub view_kick: bool,
    /// Eye target MSAA samples, 0 for off
    pub msaa: u32,
    /// Far clip plane, game units
    pub far_clip: f32,
    pub weapon_offsets: WeaponOffsetTable,
}

impl Default for VrConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            aim_mode: AimMode::Controller,
            deadzone: 30.0,
            crosshair: CrosshairStyle::Point,
            crosshair_depth: 0.0,
            crosshair_size: 3.0,
            crosshair_alpha: 0.25,
            world_scale: 1.0,
            floor_offset: -16.0,
            snap_turn: 0.0,
            turn_speed: 1.0,
            left_handed: false,
            gun_angle: 32.0,
            movement_mode: MovementMode::FollowHand,
            view_kick: false,
            msaa: 0,
            far_clip: 16384.0,
            weapon_offsets: WeaponOffsetTable::default(),
        }
    }
}

/// What a named write did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingChange {
    /// Stored as given
    Stored,
    /// Stored after clamping
    Clamped { requested: f32, stored: f32 },
    /// `vr_enabled` was written
    Enabled(bool),
}

impl VrConfig {
    /// Parse from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(text)?;
        if !config.deadzone.is_finite() {
            log::warn!("Ignoring non-finite deadzone {}", config.deadzone);
            config.deadzone = Self::default().deadzone;
        }
        config.deadzone = config.deadzone.clamp(0.0, MAX_DEADZONE);
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded VR config from {}", path.display());
        Ok(config)
    }

    /// Game units per tracking-space meter
    pub fn meters_to_units(&self) -> f32 {
        self.world_scale * UNITS_PER_METER
    }

    /// Read a setting by console variable name
    pub fn get(&self, name: &str) -> Result<String> {
        if let Some((field, slot)) = parse_setting_name(name) {
            return self
                .weapon_offsets
                .get_field(field, slot)
                .ok_or_else(|| VrError::UnknownSetting(name.to_string()));
        }

        let value = match name {
            "vr_enabled" => flag(self.enabled),
            "vr_aimmode" => self.aim_mode.value().to_string(),
            "vr_deadzone" => self.deadzone.to_string(),
            "vr_crosshair" => i32::from(self.crosshair).to_string(),
            "vr_crosshair_depth" => self.crosshair_depth.to_string(),
            "vr_crosshair_size" => self.crosshair_size.to_string(),
            "vr_crosshair_alpha" => self.crosshair_alpha.to_string(),
            "vr_world_scale" => self.world_scale.to_string(),
            "vr_floor_offset" => self.floor_offset.to_string(),
            "vr_snap_turn" => self.snap_turn.to_string(),
            "vr_turn_speed" => self.turn_speed.to_string(),
            "vr_lefthanded" => flag(self.left_handed),
            "vr_gunangle" => self.gun_angle.to_string(),
            "vr_movement_mode" => i32::from(self.movement_mode).to_string(),
            "vr_viewkick" => flag(self.view_kick),
            "vr_msaa" => self.msaa.to_string(),
            "gl_farclip" => self.far_clip.to_string(),
            _ => return Err(VrError::UnknownSetting(name.to_string())),
        };
        Ok(value)
    }

    /// Write a setting by console variable name
    pub fn set(&mut self, name: &str, value: &str) -> Result<SettingChange> {
        if let Some((field, slot)) = parse_setting_name(name) {
            self.weapon_offsets.set_field(field, slot, value)?;
            return Ok(SettingChange::Stored);
        }

        let v = parse_number(name, value)?;
        match name {
            "vr_enabled" => {
                self.enabled = v != 0.0;
                return Ok(SettingChange::Enabled(self.enabled));
            }
            "vr_aimmode" => self.aim_mode = AimMode::from(v as i32),
            "vr_deadzone" => {
                let stored = v.clamp(0.0, MAX_DEADZONE);
                self.deadzone = stored;
                if stored != v {
                    return Ok(SettingChange::Clamped { requested: v, stored });
                }
            }
            "vr_crosshair" => self.crosshair = CrosshairStyle::from(v as i32),
            "vr_crosshair_depth" => self.crosshair_depth = v,
            "vr_crosshair_size" => self.crosshair_size = v,
            "vr_crosshair_alpha" => self.crosshair_alpha = v,
            "vr_world_scale" => self.world_scale = v,
            "vr_floor_offset" => self.floor_offset = v,
            "vr_snap_turn" => self.snap_turn = v,
            "vr_turn_speed" => self.turn_speed = v,
            "vr_lefthanded" => self.left_handed = v != 0.0,
            "vr_gunangle" => self.gun_angle = v,
            "vr_movement_mode" => self.movement_mode = MovementMode::from(v as i32),
            "vr_viewkick" => self.view_kick = v != 0.0,
            "vr_msaa" => self.msaa = v.max(0.0) as u32,
            "gl_farclip" => self.far_clip = v,
            _ => return Err(VrError::UnknownSetting(name.to_string())),
        }
        Ok(SettingChange::Stored)
    }
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

fn parse_number(name: &str, value: &str) -> Result<f32> {
    match value.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(VrError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = VrConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.aim_mode, AimMode::Controller);
        assert_eq!(config.deadzone, 30.0);
        assert_eq!(config.gun_angle, 32.0);
        assert_eq!(config.floor_offset, -16.0);
        assert_eq!(config.crosshair, CrosshairStyle::Point);
        assert_eq!(config.snap_turn, 0.0);
    }

    #[test]
    fn test_meters_to_units() {
        let mut config = VrConfig::default();
        assert_relative_eq!(config.meters_to_units(), 26.24672, epsilon = 1e-3);
        config.world_scale = 0.5;
        assert_relative_eq!(config.meters_to_units(), 13.12336, epsilon = 1e-3);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = VrConfig::from_toml_str("aim_mode = 5\ndeadzone = 120.0\ncrosshair = 2\n").unwrap();
        assert_eq!(config.aim_mode, AimMode::Blended);
        assert_eq!(config.deadzone, MAX_DEADZONE);
        assert_eq!(config.crosshair, CrosshairStyle::Line);
        assert_eq!(config.gun_angle, 32.0);
        assert!(config.weapon_offsets.find("progs/v_shot.mdl").is_some());
    }

    #[test]
    fn test_unknown_aim_mode_falls_back() {
        let config = VrConfig::from_toml_str("aim_mode = 12").unwrap();
        assert_eq!(config.aim_mode, AimMode::HeadMyaw);

        let mut config = VrConfig::default();
        config.set("vr_aimmode", "0").unwrap();
        assert_eq!(config.aim_mode, AimMode::HeadMyaw);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        assert!(matches!(VrConfig::from_toml_str("deadzone = \"wide\""), Err(VrError::Config(_))));
    }

    #[test]
    fn test_deadzone_clamps() {
        let mut config = VrConfig::default();
        assert_eq!(
            config.set("vr_deadzone", "90").unwrap(),
            SettingChange::Clamped {
                requested: 90.0,
                stored: 70.0
            }
        );
        assert_eq!(config.deadzone, 70.0);
        assert_eq!(config.set("vr_deadzone", "45").unwrap(), SettingChange::Stored);
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        let mut config = VrConfig::default();
        for value in ["NaN", "inf", "-infinity"] {
            assert!(matches!(
                config.set("vr_deadzone", value),
                Err(VrError::InvalidValue { .. })
            ));
        }
        assert_eq!(config.deadzone, 30.0);

        let loaded = VrConfig::from_toml_str("deadzone = nan").unwrap();
        assert_eq!(loaded.deadzone, 30.0);
    }

    #[test]
    fn test_enabled_reports_change() {
        let mut config = VrConfig::default();
        assert_eq!(config.set("vr_enabled", "1").unwrap(), SettingChange::Enabled(true));
        assert_eq!(config.get("vr_enabled").unwrap(), "1");
    }

    #[test]
    fn test_named_access() {
        let mut config = VrConfig::default();
        config.set("vr_world_scale", "0.75").unwrap();
        assert_eq!(config.get("vr_world_scale").unwrap(), "0.75");
        config.set("vr_wofs_scale_01", "0.25").unwrap();
        assert_eq!(config.get("vr_wofs_scale_01").unwrap(), "0.25");
        config.set("vr_wofs_id_20", "progs/v_custom.mdl").unwrap();
        assert_eq!(config.weapon_offsets.find("progs/v_custom.mdl"), Some(19));

        assert!(matches!(config.set("vr_bogus", "1"), Err(VrError::UnknownSetting(_))));
        assert!(matches!(config.set("vr_gunangle", "up"), Err(VrError::InvalidValue { .. })));
    }
}
