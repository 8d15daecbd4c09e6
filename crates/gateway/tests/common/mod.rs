//! Shared test utilities for gateway router tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use bytes::Bytes;
use tower::ServiceExt;
use url::Url;

use mixtape_gateway::{http_server, GatewayState};
use object_store::{ArchiveStore, Result, Storage, StoreError};

pub const BASE_URL: &str = "http://tapes.test";
pub const BOUNDARY: &str = "mixtape-test-boundary";

/// In-memory store that records how it was used.
pub struct RecordingStore {
    inner: Storage,
    pub calls: AtomicUsize,
    pub content_types: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: Storage::memory(),
            calls: AtomicUsize::new(0),
            content_types: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ArchiveStore for RecordingStore {
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.content_types
            .lock()
            .unwrap()
            .push(content_type.to_string());
        self.inner.put(key, data, content_type).await
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.exists(key).await
    }

    fn backend(&self) -> &str {
        "memory"
    }
}

/// Which operation of [`FailingStore`] fails.
#[derive(Debug, Clone, Copy)]
pub enum FailOn {
    Put,
    Exists,
    Get,
    /// `exists` says yes, `get` says not found
    VanishedBeforeGet,
}

/// Store whose selected operation fails as if the backend were unreachable.
pub struct FailingStore(pub FailOn);

fn backend_down() -> StoreError {
    StoreError::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

#[async_trait]
impl ArchiveStore for FailingStore {
    async fn put(&self, _key: &str, _data: Bytes, _content_type: &str) -> Result<()> {
        match self.0 {
            FailOn::Put => Err(backend_down()),
            _ => Ok(()),
        }
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        match self.0 {
            FailOn::VanishedBeforeGet => Err(StoreError::NotFound(key.to_string())),
            _ => Err(backend_down()),
        }
    }

    async fn exists(&self, _key: &str) -> Result<bool> {
        match self.0 {
            FailOn::Exists => Err(backend_down()),
            _ => Ok(true),
        }
    }

    fn backend(&self) -> &str {
        "failing"
    }
}

pub fn app(store: Arc<dyn ArchiveStore>) -> Router {
    let state = GatewayState::new(store, Url::parse(BASE_URL).unwrap());
    http_server::router(state)
}

/// One part of a multipart/form-data body.
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn archive(file_name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name: "archive",
            file_name: Some(file_name),
            content_type: Some(content_type),
            data,
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(file_name) = part.file_name {
            disposition.push_str(&format!("; filename=\"{}\"", file_name));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Upload an archive and return the issued id.
pub async fn upload(app: &Router, file_name: &str, data: &[u8]) -> String {
    let response = send(
        app,
        upload_request(&[Part::archive(file_name, "application/octet-stream", data)]),
    )
    .await;
    assert_eq!(response.status(), 200);
    body_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string()
}
