//! Per-weapon view model offsets
//!
//! Weapon models are authored for a flat screen. In VR the view model is
//! held in the hand, so each model gets a position offset and a scale.
//! The originals are remembered the first time a model is adjusted and
//! restored on level exit, so repeated application never drifts.

use crate::error::{Result, VrError};
use crate::host::{GameWorld, ModelTransform};
use qvr_math::Vec3;
use serde::{Deserialize, Serialize};

/// Number of offset slots, stock weapons included
pub const MAX_WEAPON_SLOTS: usize = 20;

/// Model id of an unused slot
pub const BLANK_MODEL: &str = "-1";

/// World scale the stock offsets were tuned for
const REFERENCE_WORLD_SCALE: f32 = 0.75;

/// Offset and scale for one weapon model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponOffset {
    /// Model path, e.g. `progs/v_axe.mdl`
    pub model: String,
    /// Added to the model's scale origin, in model units
    pub offset: Vec3,
    /// Multiplies the model's scale
    pub scale: f32,
}

impl WeaponOffset {
    pub fn new(model: impl Into<String>, x: f32, y: f32, z: f32, scale: f32) -> Self {
        Self {
            model: model.into(),
            offset: Vec3::new(x, y, z),
            scale,
        }
    }

    fn blank() -> Self {
        Self::new(BLANK_MODEL, 1.5, 1.0, 10.0, 0.5)
    }
}

/// Field of a weapon slot addressable by setting name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponField {
    X,
    Y,
    Z,
    Scale,
    Id,
}

impl WeaponField {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "x" => Some(Self::X),
            "y" => Some(Self::Y),
            "z" => Some(Self::Z),
            "scale" => Some(Self::Scale),
            "id" => Some(Self::Id),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::Scale => "scale",
            Self::Id => "id",
        }
    }
}

/// Parse `vr_wofs_<field>_<NN>` into a field and zero-based slot
pub fn parse_setting_name(name: &str) -> Option<(WeaponField, usize)> {
    let rest = name.strip_prefix("vr_wofs_")?;
    let (field, number) = rest.rsplit_once('_')?;
    let field = WeaponField::parse(field)?;
    if number.len() != 2 {
        return None;
    }
    let slot: usize = number.parse().ok()?;
    if slot == 0 || slot > MAX_WEAPON_SLOTS {
        return None;
    }
    Some((field, slot - 1))
}

/// Setting name for a zero-based slot, e.g. `vr_wofs_scale_03`
pub fn setting_name(field: WeaponField, slot: usize) -> String {
    format!("vr_wofs_{}_{:02}", field.as_str(), slot + 1)
}

/// Offset slots, stock weapons first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<WeaponOffset>", into = "Vec<WeaponOffset>")]
pub struct WeaponOffsetTable {
    slots: Vec<WeaponOffset>,
}

impl Default for WeaponOffsetTable {
    fn default() -> Self {
        vec![
            WeaponOffset::new("progs/v_axe.mdl", -4.0, 24.0, 37.0, 0.33),
            WeaponOffset::new("progs/v_shot.mdl", 1.5, 1.0, 10.0, 0.5),
            WeaponOffset::new("progs/v_shot2.mdl", 3.5, 1.0, 10.0, 0.5),
            WeaponOffset::new("progs/v_nail.mdl", -5.0, 3.0, 15.0, 0.5),
            WeaponOffset::new("progs/v_nail2.mdl", 0.0, 3.0, 19.0, 0.5),
            WeaponOffset::new("progs/v_rock.mdl", 10.0, 1.5, 13.0, 0.5),
            WeaponOffset::new("progs/v_rock2.mdl", 10.0, 7.0, 19.0, 0.5),
            WeaponOffset::new("progs/v_light.mdl", 3.0, 4.0, 13.0, 0.5),
        ]
        .into()
    }
}

impl From<Vec<WeaponOffset>> for WeaponOffsetTable {
    fn from(mut slots: Vec<WeaponOffset>) -> Self {
        slots.truncate(MAX_WEAPON_SLOTS);
        slots.resize_with(MAX_WEAPON_SLOTS, WeaponOffset::blank);
        Self { slots }
    }
}

impl From<WeaponOffsetTable> for Vec<WeaponOffset> {
    fn from(table: WeaponOffsetTable) -> Self {
        table.slots
    }
}

impl WeaponOffsetTable {
    /// Slot holding `model`
    pub fn find(&self, model: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.model == model)
    }

    pub fn get(&self, slot: usize) -> Option<&WeaponOffset> {
        self.slots.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut WeaponOffset> {
        self.slots.get_mut(slot)
    }

    pub fn slots(&self) -> &[WeaponOffset] {
        &self.slots
    }

    /// Read one slot field as a setting string
    pub fn get_field(&self, field: WeaponField, slot: usize) -> Option<String> {
        let s = self.slots.get(slot)?;
        Some(match field {
            WeaponField::X => s.offset.x.to_string(),
            WeaponField::Y => s.offset.y.to_string(),
            WeaponField::Z => s.offset.z.to_string(),
            WeaponField::Scale => s.scale.to_string(),
            WeaponField::Id => s.model.clone(),
        })
    }

    /// Write one slot field from a setting string
    pub fn set_field(&mut self, field: WeaponField, slot: usize, value: &str) -> Result<()> {
        let name = setting_name(field, slot);
        let s = self
            .slots
            .get_mut(slot)
            .ok_or_else(|| VrError::UnknownSetting(name.clone()))?;

        if field == WeaponField::Id {
            s.model = value.trim().to_string();
            return Ok(());
        }

        let v = match value.trim().parse::<f32>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                return Err(VrError::InvalidValue {
                    name,
                    value: value.to_string(),
                })
            }
        };
        match field {
            WeaponField::X => s.offset.x = v,
            WeaponField::Y => s.offset.y = v,
            WeaponField::Z => s.offset.z = v,
            WeaponField::Scale => s.scale = v,
            WeaponField::Id => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct InitialWeaponState {
    model: String,
    original: ModelTransform,
    slot: Option<usize>,
}

/// Applied weapon adjustments and the transforms they replaced
#[derive(Debug, Default)]
pub struct WeaponMods {
    states: Vec<InitialWeaponState>,
}

impl WeaponMods {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjust `model` from its original transform.
    ///
    /// The first call for a model records its original transform and looks
    /// up its slot; later calls recompute from that original.
    pub fn apply(
        &mut self,
        model: &str,
        world: &mut dyn GameWorld,
        table: &WeaponOffsetTable,
        world_scale: f32,
    ) {
        let index = match self.states.iter().position(|s| s.model == model) {
            Some(index) => index,
            None => {
                let Some(original) = world.model_transform(model) else {
                    return;
                };
                let slot = table.find(model);
                if slot.is_none() {
                    log::info!("No VR offset for weapon: {}", model);
                }
                self.states.push(InitialWeaponState {
                    model: model.to_string(),
                    original,
                    slot,
                });
                self.states.len() - 1
            }
        };

        let state = &self.states[index];
        let Some(offset) = state.slot.and_then(|slot| table.get(slot)) else {
            return;
        };

        let correct = world_scale / REFERENCE_WORLD_SCALE;
        let adjusted = ModelTransform {
            scale: state.original.scale * (offset.scale * correct),
            scale_origin: (state.original.scale_origin + offset.offset) * correct,
        };
        world.set_model_transform(model, adjusted);
    }

    /// Restore every adjusted model and forget them
    pub fn clear(&mut self, world: &mut dyn GameWorld) {
        for state in self.states.drain(..) {
            world.set_model_transform(&state.model, state.original);
        }
    }

    /// Number of models with a remembered original
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
