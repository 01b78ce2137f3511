//! Fixtures: in-memory repositories and an HTTP router wired the way the
//! binary wires them, plus request helpers for `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use delicious_core::{
    config::Config,
    store::{MemoryStore, StoreRepository},
    StoreDraft,
};
use delicious_server::{mail::MemoryMailer, router, AppState};
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;

/// A [`MemoryStore`] holding `drafts`, all written by one author.
pub async fn store_with(drafts: Vec<StoreDraft>) -> MemoryStore {
    let store = MemoryStore::new();
    let author = Uuid::new_v4();
    for draft in drafts {
        store.create(draft, author).await.expect("fixture draft is valid");
    }
    store
}

/// Everything an API test needs: the router, the state behind it, the
/// outbox of the mailer, and the upload directory (removed on drop).
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mailer: Arc<MemoryMailer>,
    pub uploads: tempfile::TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let uploads = tempfile::tempdir().expect("create upload dir");
        let mut config = Config::defaults();
        config.uploads.dir = uploads.path().to_path_buf();
        config.server.public_url = "http://delicious.test".to_string();

        let mailer = Arc::new(MemoryMailer::new());
        let state = AppState::in_memory(config).with_mailer(mailer.clone());
        Self {
            router: router(state.clone()),
            state,
            mailer,
            uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        self.send(request("GET", uri, token, Body::empty(), None)).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.send(request(
            "POST",
            uri,
            token,
            Body::from(body.to_string()),
            Some("application/json"),
        ))
        .await
    }

    /// Register a user and return their session token and id.
    pub async fn register(&self, name: &str, email: &str) -> (String, String) {
        let (status, body) = self
            .post_json(
                "/register",
                None,
                serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": "secret",
                    "password-confirm": "secret",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        (
            body["token"].as_str().expect("token").to_string(),
            body["user"]["id"].as_str().expect("user id").to_string(),
        )
    }

    /// Create a store as the holder of `token` and return its JSON.
    pub async fn create_store(&self, token: &str, draft: &StoreDraft) -> serde_json::Value {
        let (status, body) = self
            .post_json(
                "/stores",
                Some(token),
                serde_json::to_value(draft).expect("draft serialises"),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body
    }
}

pub fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Body,
    content_type: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(body).expect("valid request")
}

/// A `multipart/form-data` body with one file field.
pub fn multipart_body(field: &str, content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "delicious-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}

/// PNG bytes of a solid `width` x `height` image.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([10, 120, 200]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).expect("encode png");
    out.into_inner()
}
