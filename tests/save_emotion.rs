use std::path::PathBuf;
use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{Value, json};

use emoblob::server::{AppState, SaveEmotionRequest, save_emotion};

fn state(path: PathBuf) -> AppState {
    AppState {
        dataset: Arc::new(path),
    }
}

fn request(name: &str, emotion: Value) -> Json<SaveEmotionRequest> {
    Json(SaveEmotionRequest {
        emotion_name: name.to_string(),
        emotion,
    })
}

async fn call(path: PathBuf, name: &str, emotion: Value) -> (StatusCode, Value) {
    let resp = save_emotion(State(state(path)), request(name, emotion))
        .await
        .into_response();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn merges_into_existing_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emotions_dataset.json");
    std::fs::write(&path, r#"{"Neutral":{"amplitude":0.2}}"#).unwrap();

    let (status, body) = call(path.clone(), "Test", json!({ "amplitude": 0.1 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
    let text = std::fs::read_to_string(&path).unwrap();
    let saved: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(saved["Test"], json!({ "amplitude": 0.1 }));
    assert_eq!(saved["Neutral"], json!({ "amplitude": 0.2 }));
    assert!(text.contains("\n  \"Neutral\""), "not pretty-printed: {text}");
}

#[tokio::test]
async fn overwrites_same_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emotions_dataset.json");
    std::fs::write(&path, r#"{"Test":{"amplitude":0.9}}"#).unwrap();

    let (status, _) = call(path.clone(), "Test", json!({ "amplitude": 0.3 })).await;

    assert_eq!(status, StatusCode::OK);
    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved, json!({ "Test": { "amplitude": 0.3 } }));
}

#[tokio::test]
async fn missing_dataset_is_500_and_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emotions_dataset.json");

    let (status, body) = call(path.clone(), "Test", json!({ "amplitude": 0.1 })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to save emotion" }));
    assert!(!path.exists());
}

#[tokio::test]
async fn corrupt_dataset_is_500_and_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emotions_dataset.json");
    std::fs::write(&path, "{ broken").unwrap();

    let (status, body) = call(path.clone(), "Test", json!({ "amplitude": 0.1 })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to save emotion" }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ broken");
}

#[tokio::test]
async fn non_object_dataset_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("emotions_dataset.json");
    std::fs::write(&path, "[1, 2]").unwrap();

    let (status, _) = call(path.clone(), "Test", json!({})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[1, 2]");
}

#[test]
fn request_body_uses_camel_case() {
    let req: SaveEmotionRequest =
        serde_json::from_str(r#"{"emotionName":"Test","emotion":{"amplitude":0.1}}"#).unwrap();
    assert_eq!(req.emotion_name, "Test");
    assert_eq!(req.emotion, json!({ "amplitude": 0.1 }));
}

#[test]
fn incomplete_request_body_is_rejected() {
    assert!(serde_json::from_str::<SaveEmotionRequest>(r#"{"emotion":{"amplitude":0.1}}"#).is_err());
    assert!(serde_json::from_str::<SaveEmotionRequest>(r#"{"emotionName":"Test"}"#).is_err());
}

#[test]
fn router_builds() {
    let dir = tempfile::tempdir().unwrap();
    let _ = emoblob::server::router(dir.path().join("d.json"), dir.path().to_path_buf());
}
