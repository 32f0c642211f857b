//! `POST /save_emotion`: merge one preset into the JSON dataset on disk.
//!
//! Read-modify-write with no locking; two concurrent saves can lose one.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tower_http::services::ServeDir;
use tracing::{error, info};

/// Both fields are required; an incomplete body is rejected by the `Json`
/// extractor before the dataset is read.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEmotionRequest {
    pub emotion_name: String,
    pub emotion: Value,
}

#[derive(Serialize)]
pub struct SaveEmotionResponse {
    pub success: bool,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("reading dataset: {0}")]
    Read(std::io::Error),
    #[error("parsing dataset: {0}")]
    Parse(serde_json::Error),
    #[error("dataset is not a JSON object")]
    NotAnObject,
    #[error("encoding dataset: {0}")]
    Encode(serde_json::Error),
    #[error("writing dataset: {0}")]
    Write(std::io::Error),
}

impl IntoResponse for SaveError {
    fn into_response(self) -> Response {
        error!(error = %self, "Error saving emotion");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: "Failed to save emotion",
            }),
        )
            .into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<PathBuf>,
}

/// Insert or overwrite `name` in the dataset and rewrite it pretty-printed.
/// The file is left untouched unless it was read and parsed successfully.
pub async fn merge_into_dataset(path: &Path, name: &str, emotion: Value) -> Result<(), SaveError> {
    let text = tokio::fs::read_to_string(path).await.map_err(SaveError::Read)?;
    let parsed: Value = serde_json::from_str(&text).map_err(SaveError::Parse)?;
    let mut emotions: Map<String, Value> = match parsed {
        Value::Object(map) => map,
        _ => return Err(SaveError::NotAnObject),
    };
    emotions.insert(name.to_string(), emotion);
    let out = serde_json::to_string_pretty(&emotions).map_err(SaveError::Encode)?;
    tokio::fs::write(path, out).await.map_err(SaveError::Write)?;
    Ok(())
}

pub async fn save_emotion(
    State(state): State<AppState>,
    Json(req): Json<SaveEmotionRequest>,
) -> Result<Json<SaveEmotionResponse>, SaveError> {
    merge_into_dataset(&state.dataset, &req.emotion_name, req.emotion).await?;
    info!(emotion = %req.emotion_name, "saved emotion");
    Ok(Json(SaveEmotionResponse { success: true }))
}

/// The endpoint plus static files from `static_dir` for everything else.
pub fn router(dataset: PathBuf, static_dir: PathBuf) -> Router {
    let state = AppState {
        dataset: Arc::new(dataset),
    };
    Router::new()
        .route("/save_emotion", post(save_emotion))
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}
