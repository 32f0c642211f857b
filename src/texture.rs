use std::path::Path;

use base64::Engine;

use crate::error::TextureError;

/// Decoded RGBA8 image, sampled with repeat wrapping by the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Texture {
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let rgba = color.repeat((width * height) as usize);
        Self { width, height, rgba }
    }

    /// Any format `image` can sniff from the bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// `data:<mime>;base64,<payload>`, as produced by a browser file reader.
    pub fn from_data_url(url: &str) -> Result<Self, TextureError> {
        let rest = url.strip_prefix("data:").ok_or(TextureError::NotDataUrl)?;
        let (meta, payload) = rest.split_once(',').ok_or(TextureError::NotDataUrl)?;
        if !meta.ends_with(";base64") {
            return Err(TextureError::NotDataUrl);
        }
        let bytes = base64::engine::general_purpose::STANDARD.decode(payload.trim())?;
        Self::from_bytes(&bytes)
    }

    /// Load from a data URL or a file path.
    pub fn load(source: &str) -> Result<Self, TextureError> {
        if source.starts_with("data:") {
            Self::from_data_url(source)
        } else {
            Self::from_path(Path::new(source))
        }
    }
}
