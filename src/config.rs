use serde::{Deserialize, Serialize};

/// Shape distortion applied after noise displacement. Stored as 0/1/2 on disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Modifier {
    #[default]
    None,
    Droopy,
    Ribbed,
}

impl Modifier {
    pub const ALL: [Modifier; 3] = [Modifier::None, Modifier::Droopy, Modifier::Ribbed];

    pub fn label(self) -> &'static str {
        match self {
            Modifier::None => "None",
            Modifier::Droopy => "Droopy",
            Modifier::Ribbed => "Ribbed",
        }
    }
}

impl TryFrom<u8> for Modifier {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Modifier::None),
            1 => Ok(Modifier::Droopy),
            2 => Ok(Modifier::Ribbed),
            other => Err(format!("unknown modifier {other}")),
        }
    }
}

impl From<Modifier> for u8 {
    fn from(m: Modifier) -> u8 {
        match m {
            Modifier::None => 0,
            Modifier::Droopy => 1,
            Modifier::Ribbed => 2,
        }
    }
}

/// All tunable parameters, exposed as panel controls and overwritten by presets.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    // Displacement
    pub amplitude: f32,
    pub frequency: f32,
    pub noise_speed: f32,
    pub rotation_speed: f32,
    pub modifier: Modifier,
    pub rib_amp: f32,
    pub rib_freq: f32,

    // Look
    pub bloom: f32,
    pub color: u32,
    pub background_color: u32,
    pub point_mode: bool,
    pub point_size: f32,
    pub use_texture: bool,

    // Physical material
    pub metalness: f32,
    pub roughness: f32,
    pub transmission: f32,
    pub thickness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub env_map_intensity: f32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            amplitude: 0.2,
            frequency: 1.5,
            noise_speed: 0.3,
            rotation_speed: 0.2,
            modifier: Modifier::None,
            rib_amp: 0.2,
            rib_freq: 10.0,
            bloom: 0.3,
            color: 0xccccff,
            background_color: 0xb6b69e,
            point_mode: false,
            point_size: 0.03,
            use_texture: true,
            metalness: 0.1,
            roughness: 0.35,
            transmission: 0.8,
            thickness: 0.4,
            clearcoat: 0.2,
            clearcoat_roughness: 0.1,
            env_map_intensity: 1.2,
        }
    }
}

/// Scene construction settings. Fixed for the lifetime of a blob.
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub radius: f32,
    pub width_segments: usize,
    pub height_segments: usize,
    pub point_count: usize,
    pub seed: u64,
    pub default_preset: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 64,
            height_segments: 64,
            point_count: 50_000,
            seed: 42,
            default_preset: "Neutral".to_string(),
        }
    }
}
