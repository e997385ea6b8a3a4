//! Export job lifecycle through the HTTP API.
//!
//! These run on the real clock with tiny frames and sub-second loops.

mod common;

use axum::http::StatusCode;
use common::*;
use pretty_assertions::assert_eq;
use retro_dither::NamedPalette;
use tempfile::TempDir;

#[tokio::test]
async fn test_status_is_idle_before_any_export() {
    let app = TestApp::new();
    let response = app.get("/api/export").await;
    assert_ok(&response);

    let json: serde_json::Value = response.json();
    assert_eq!(json["state"], "idle");
    assert_eq!(json["frames"], 0);
}

#[tokio::test]
async fn test_png_sequence_export_completes() {
    let dir = TempDir::new().unwrap();
    let app = TestApp::with_output_dir(dir.path());

    let response = app.post_json("/api/export", r#"{"palette": "c64"}"#).await;
    assert_status(&response, StatusCode::ACCEPTED);
    let started: serde_json::Value = response.json();
    assert_eq!(started["state"], "running");
    assert_eq!(started["target_frames"], 3);
    assert_eq!(started["format"], "png");

    let status = app.wait_for_export().await;
    assert_eq!(status["state"], "completed", "status: {status}");
    assert_eq!(status["frames"], 3);
    assert_eq!(status["progress"], 1.0);
    assert!(status["finished_at"].is_string());

    let out = dir.path().join("export");
    for i in 0..3 {
        let path = out.join(format!("frame_{:05}.png", i));
        let bytes = std::fs::read(&path).unwrap_or_else(|_| panic!("missing {}", path.display()));
        let frame = decode_png(&bytes);
        assert_eq!((frame.width(), frame.height()), (32, 32));
        assert_palette_only(&frame, &NamedPalette::C64.palette());
    }
    assert!(!out.join("frame_00003.png").exists());
}

#[tokio::test]
async fn test_second_export_while_running_conflicts() {
    let dir = TempDir::new().unwrap();
    let app = TestApp::with_output_dir(dir.path());

    let first = app
        .post_json("/api/export", r#"{"loop_duration": 2.0}"#)
        .await;
    assert_status(&first, StatusCode::ACCEPTED);

    let second = app.post_json("/api/export", "{}").await;
    assert_json_error(&second, StatusCode::CONFLICT);

    let cancel = app.delete("/api/export").await;
    assert_status(&cancel, StatusCode::ACCEPTED);
    let status = app.wait_for_export().await;
    assert_eq!(status["state"], "cancelled");
}

#[tokio::test]
async fn test_cancel_discards_partial_output() {
    let dir = TempDir::new().unwrap();
    let app = TestApp::with_output_dir(dir.path());

    let response = app
        .post_json("/api/export", r#"{"loop_duration": 5.0}"#)
        .await;
    assert_status(&response, StatusCode::ACCEPTED);
    tokio::time::sleep(std::time::Duration::from_millis(250)).await;

    let cancel = app.delete("/api/export").await;
    assert_status(&cancel, StatusCode::ACCEPTED);

    let status = app.wait_for_export().await;
    assert_eq!(status["state"], "cancelled");
    assert!(status["frames"].as_u64().unwrap() < 50);
    assert!(!dir.path().join("export").exists());
}

#[tokio::test]
async fn test_cancel_without_running_export_is_not_found() {
    let app = TestApp::new();
    let response = app.delete("/api/export").await;
    assert_json_error(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_settings_are_rejected_up_front() {
    let dir = TempDir::new().unwrap();
    let app = TestApp::with_output_dir(dir.path());

    let response = app.post_json("/api/export", r#"{"fps": 0}"#).await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);

    let response = app
        .post_json("/api/export", r#"{"palette": "not-a-palette"}"#)
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);

    let response = app
        .post_json("/api/export", r#"{"format": "mp4", "width": 33}"#)
        .await;
    assert_json_error(&response, StatusCode::BAD_REQUEST);

    // nothing was started
    let status: serde_json::Value = app.get("/api/export").await.json();
    assert_eq!(status["state"], "idle");
}

#[tokio::test]
async fn test_export_can_run_again_after_completion() {
    let dir = TempDir::new().unwrap();
    let app = TestApp::with_output_dir(dir.path());

    let first = app.post_json("/api/export", "{}").await;
    assert_status(&first, StatusCode::ACCEPTED);
    assert_eq!(app.wait_for_export().await["state"], "completed");

    let second = app
        .post_json("/api/export", r#"{"mode": "ascii", "fps": 5, "loop_duration": 0.4}"#)
        .await;
    assert_status(&second, StatusCode::ACCEPTED);
    let status = app.wait_for_export().await;
    assert_eq!(status["state"], "completed");
    // 0.4s at 5 fps
    assert_eq!(status["frames"], 2);
}
