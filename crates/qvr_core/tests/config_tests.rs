//! Config file loading

use qvr_core::config::VrConfig;
use qvr_core::weapon::MAX_WEAPON_SLOTS;
use qvr_core::{AimMode, CrosshairStyle, VrError};
use std::path::PathBuf;

fn temp_config(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("qvr_{}_{}.toml", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_full_file() {
    let path = temp_config(
        "full",
        r#"
enabled = true
aim_mode = 5
deadzone = 20.0
crosshair = 0
world_scale = 0.75
left_handed = true

[[weapon_offsets]]
model = "progs/v_custom.mdl"
offset = { x = 2.0, y = 3.0, z = 4.0 }
scale = 0.4
"#,
    );

    let config = VrConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(config.enabled);
    assert_eq!(config.aim_mode, AimMode::Blended);
    assert_eq!(config.deadzone, 20.0);
    assert_eq!(config.crosshair, CrosshairStyle::Off);
    assert!(config.left_handed);
    assert_eq!(config.weapon_offsets.find("progs/v_custom.mdl"), Some(0));
    assert_eq!(config.weapon_offsets.slots().len(), MAX_WEAPON_SLOTS);
    assert_eq!(config.get("vr_wofs_z_01").unwrap(), "4");
}

#[test]
fn test_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("qvr_definitely_missing.toml");
    assert!(matches!(VrConfig::load(&path), Err(VrError::Io(_))));
}

#[test]
fn test_round_trip_through_toml() {
    let mut config = VrConfig::default();
    config.set("vr_snap_turn", "45").unwrap();
    config.set("vr_wofs_scale_02", "0.3").unwrap();

    let text = toml::to_string(&config).unwrap();
    let parsed = VrConfig::from_toml_str(&text).unwrap();
    assert_eq!(parsed, config);
}
