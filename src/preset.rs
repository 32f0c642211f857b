//! Named emotion presets: partial snapshots of [`Params`].
//!
//! A preset only carries the fields it was saved with. Applying it overwrites
//! exactly those fields and leaves the rest of the record alone, so presets
//! written by older builds (or by hand) keep working.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{Modifier, Params};

/// File name used for exported preset collections.
pub const EXPORT_FILE_NAME: &str = "emotions_dataset.json";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amplitude: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bloom: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_texture: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<Modifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rib_amp: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rib_freq: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub noise_speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transmission: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearcoat: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clearcoat_roughness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_map_intensity: Option<f32>,
}

impl Preset {
    /// Built-in presets only carry the core look.
    pub fn core(amplitude: f32, frequency: f32, bloom: f32, color: u32, modifier: Modifier) -> Self {
        Self {
            amplitude: Some(amplitude),
            frequency: Some(frequency),
            bloom: Some(bloom),
            color: Some(color),
            modifier: Some(modifier),
            ..Self::default()
        }
    }

    /// Snapshot of the fields a user save records.
    pub fn capture(params: &Params) -> Self {
        Self {
            amplitude: Some(params.amplitude),
            frequency: Some(params.frequency),
            bloom: Some(params.bloom),
            color: Some(params.color),
            modifier: Some(params.modifier),
            rib_amp: Some(params.rib_amp),
            rib_freq: Some(params.rib_freq),
            ..Self::default()
        }
    }

    /// Overwrite every field present in the snapshot.
    pub fn apply_to(&self, params: &mut Params) {
        fn set<T: Copy>(dst: &mut T, src: Option<T>) {
            if let Some(v) = src {
                *dst = v;
            }
        }
        set(&mut params.amplitude, self.amplitude);
        set(&mut params.frequency, self.frequency);
        set(&mut params.bloom, self.bloom);
        set(&mut params.color, self.color);
        set(&mut params.background_color, self.background_color);
        set(&mut params.point_mode, self.point_mode);
        set(&mut params.use_texture, self.use_texture);
        set(&mut params.modifier, self.modifier);
        set(&mut params.rib_amp, self.rib_amp);
        set(&mut params.rib_freq, self.rib_freq);
        set(&mut params.noise_speed, self.noise_speed);
        set(&mut params.rotation_speed, self.rotation_speed);
        set(&mut params.point_size, self.point_size);
        set(&mut params.metalness, self.metalness);
        set(&mut params.roughness, self.roughness);
        set(&mut params.transmission, self.transmission);
        set(&mut params.thickness, self.thickness);
        set(&mut params.clearcoat, self.clearcoat);
        set(&mut params.clearcoat_roughness, self.clearcoat_roughness);
        set(&mut params.env_map_intensity, self.env_map_intensity);
    }
}

/// Name -> preset. Names are case-sensitive; iteration order is by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresetBook {
    presets: BTreeMap<String, Preset>,
}

impl PresetBook {
    pub fn builtin() -> Self {
        let mut book = Self::default();
        book.insert("Neutral", Preset::core(0.2, 1.5, 0.3, 0xccccff, Modifier::None));
        book.insert("Angry", Preset::core(0.5, 3.0, 0.6, 0xff4444, Modifier::None));
        book.insert("Sad", Preset::core(0.1, 0.8, 0.1, 0x4444ff, Modifier::Droopy));
        book.insert("Curious", Preset::core(0.3, 2.2, 0.4, 0x44ff44, Modifier::None));
        book
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, preset: Preset) -> Option<Preset> {
        self.presets.insert(name.into(), preset)
    }

    pub fn remove(&mut self, name: &str) -> Option<Preset> {
        self.presets.remove(name)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// First name in collection order that isn't `name`.
    pub fn first_other(&self, name: &str) -> Option<&str> {
        self.names().find(|n| *n != name)
    }

    /// Pretty JSON with 2-space indentation, the export artifact format.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_leaves_absent_fields_untouched() {
        let mut params = Params {
            rib_amp: 0.9,
            metalness: 0.7,
            ..Params::default()
        };
        let preset = Preset::core(0.5, 3.0, 0.6, 0xff4444, Modifier::Ribbed);
        preset.apply_to(&mut params);
        assert_eq!(params.amplitude, 0.5);
        assert_eq!(params.frequency, 3.0);
        assert_eq!(params.bloom, 0.6);
        assert_eq!(params.color, 0xff4444);
        assert_eq!(params.modifier, Modifier::Ribbed);
        assert_eq!(params.rib_amp, 0.9);
        assert_eq!(params.metalness, 0.7);
    }

    #[test]
    fn capture_records_fixed_subset() {
        let params = Params {
            amplitude: 0.4,
            metalness: 0.9,
            ..Params::default()
        };
        let p = Preset::capture(&params);
        assert_eq!(p.amplitude, Some(0.4));
        assert_eq!(p.rib_freq, Some(params.rib_freq));
        assert_eq!(p.metalness, None);
        assert_eq!(p.noise_speed, None);
    }

    #[test]
    fn reads_exported_dataset_shape() {
        let json = r#"{
            "Neutral": { "amplitude": 0.2, "frequency": 1.5, "bloom": 0.3, "color": 13421823, "modifier": 0 },
            "Glass": { "amplitude": 0.1, "envMapIntensity": 1.5, "clearcoatRoughness": 0.05, "ribFreq": 12 }
        }"#;
        let book: PresetBook = serde_json::from_str(json).unwrap();
        assert_eq!(book.len(), 2);
        assert_eq!(book.get("Neutral").unwrap().color, Some(0xccccff));
        let glass = book.get("Glass").unwrap();
        assert_eq!(glass.env_map_intensity, Some(1.5));
        assert_eq!(glass.clearcoat_roughness, Some(0.05));
        assert_eq!(glass.rib_freq, Some(12.0));
        assert_eq!(glass.modifier, None);
    }

    #[test]
    fn look_toggles_survive_load_and_apply() {
        let json = r#"{"Night":{"amplitude":0.3,"backgroundColor":1193046,"pointMode":true,"useTexture":false}}"#;
        let book: PresetBook = serde_json::from_str(json).unwrap();
        let night = book.get("Night").unwrap();
        assert_eq!(night.background_color, Some(0x123456));
        assert_eq!(night.point_mode, Some(true));
        assert_eq!(night.use_texture, Some(false));

        let mut params = Params::default();
        night.apply_to(&mut params);
        assert_eq!(params.background_color, 0x123456);
        assert!(params.point_mode);
        assert!(!params.use_texture);

        let back: serde_json::Value = serde_json::from_str(&book.to_pretty_json().unwrap()).unwrap();
        let orig: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(back, orig);
    }

    #[test]
    fn export_uses_two_space_indent() {
        let json = PresetBook::builtin().to_pretty_json().unwrap();
        assert!(json.contains("\n  \"Angry\": {\n    \"amplitude\": 0.5"));
    }

    #[test]
    fn first_other_skips_the_named_entry() {
        let book = PresetBook::builtin();
        assert_eq!(book.first_other("Angry"), Some("Curious"));
        let mut one = PresetBook::default();
        one.insert("Solo", Preset::default());
        assert_eq!(one.first_other("Solo"), None);
    }
}
