use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("store contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// User-facing preset failures. None of these change state.
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("Please enter an emotion name")]
    EmptyName,
    #[error("Cannot delete the last emotion!")]
    LastPreset,
    #[error("failed to persist presets: {0}")]
    Persist(#[from] StoreError),
    #[error("failed to serialize presets: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("not a base64 data URL")]
    NotDataUrl,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("could not decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("could not read texture file: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("no control named {0:?}")]
    Unknown(String),
    #[error("control {key:?} expects {expected}")]
    WrongKind { key: String, expected: &'static str },
}
