#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use reel_api::config::{LogFormat, ServerConfig, StoreBackend};
use reel_api::media::MediaStorage;
use reel_api::router::build_app_router;
use reel_api::state::AppState;
use reel_db::store::{MemoryMovieStore, MovieStore};

/// Build a test `ServerConfig` with safe defaults and an in-memory store.
pub fn test_config(media_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store: StoreBackend::Memory,
        media_root: media_root.to_path_buf(),
        media_url: "/media".to_string(),
        max_upload_bytes: 1024 * 1024,
        log_format: LogFormat::Pretty,
    }
}

/// The full application router plus the temp directory backing its media
/// root. Keep the struct alive for the duration of the test.
pub struct TestApp {
    pub router: Router,
    pub media_dir: TempDir,
}

/// Build the full application router with all middleware layers over a
/// fresh in-memory movie store.
pub fn build_test_app() -> TestApp {
    build_test_app_with_store(Arc::new(MemoryMovieStore::new()))
}

/// Same as [`build_test_app`] over a caller-supplied store.
pub fn build_test_app_with_store(store: Arc<dyn MovieStore>) -> TestApp {
    let media_dir = tempfile::tempdir().expect("Failed to create temp media dir");
    let config = test_config(media_dir.path());

    let state = AppState {
        store,
        media: Arc::new(MediaStorage::new(
            config.media_root.clone(),
            config.media_url.clone(),
        )),
    };

    TestApp {
        router: build_app_router(state, &config),
        media_dir,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &TestApp, request: Request<Body>) -> Response {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &TestApp, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(app: &TestApp, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &TestApp, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: &TestApp, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn post_multipart(app: &TestApp, uri: &str, form: MultipartForm) -> Response {
    send_multipart(app, Method::POST, uri, form).await
}

pub async fn put_multipart(app: &TestApp, uri: &str, form: MultipartForm) -> Response {
    send_multipart(app, Method::PUT, uri, form).await
}

async fn send_multipart(app: &TestApp, method: Method, uri: &str, form: MultipartForm) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", form.content_type())
        .body(Body::from(form.finish()))
        .unwrap();
    send(app, request).await
}

/// POST an `application/x-www-form-urlencoded` body.
pub async fn post_form(app: &TestApp, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Number of poster files currently under the media root.
pub fn poster_file_count(app: &TestApp) -> usize {
    match std::fs::read_dir(app.media_dir.path().join("posters")) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

// ---------------------------------------------------------------------------
// Payload helpers
// ---------------------------------------------------------------------------

/// The Dune example used throughout the tests.
pub fn dune() -> serde_json::Value {
    serde_json::json!({
        "title": "Dune",
        "genre": "Sci-Fi",
        "director": "Villeneuve",
        "release_year": 2021,
        "rating": 8.0,
    })
}

/// Minimal `multipart/form-data` body builder.
pub struct MultipartForm {
    boundary: &'static str,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: "reel-test-boundary",
            body: Vec::new(),
        }
    }

    /// Text parts for every field of a JSON object.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut form = Self::new();
        for (name, value) in value.as_object().unwrap() {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            form = form.text(name, &text);
        }
        form
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n",
                self.boundary
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        self.body
    }
}

/// A small valid PNG.
pub fn png_bytes() -> Vec<u8> {
    png_of_size(4, 6)
}

/// A valid PNG with the given dimensions; different sizes give different bytes.
pub fn png_of_size(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height))
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}
