//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

use retroloop::models::{AppConfig, ExportFormat};
use retroloop::server::{build_router, create_app_state, AppState};
use retroloop::services::ExportManager;

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub export_manager: Arc<ExportManager>,
}

impl TestApp {
    /// Create a test application with a small, fast configuration
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application writing exports under `dir`
    pub fn with_output_dir(dir: &Path) -> Self {
        let mut config = test_config();
        config.export.output = dir.join("export");
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        let state = create_app_state(config);
        let export_manager = state.export_manager.clone();

        // Build router using shared server module (same as production)
        let router = build_router(state);

        Self {
            router,
            export_manager,
        }
    }

    /// Create state for custom router configuration
    pub fn create_state() -> AppState {
        create_app_state(test_config())
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.request(request).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request(Request::delete(path).body(Body::empty()).unwrap())
            .await
    }

    /// Poll `GET /api/export` until the job leaves the running state
    pub async fn wait_for_export(&self) -> serde_json::Value {
        for _ in 0..300 {
            let response = self.get("/api/export").await;
            assert_eq!(response.status, StatusCode::OK);
            let json: serde_json::Value = response.json();
            if json["state"] != "running" {
                return json;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        panic!("export did not finish in time");
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Small frames and short loops so tests finish quickly
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.scene.width = 64;
    config.scene.height = 48;
    config.scene.shapes = 4;
    config.export.width = 32;
    config.export.height = 32;
    config.export.fps = 10;
    config.export.loop_duration = 0.3;
    config.export.format = ExportFormat::Png;
    config
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }
}
