//! In-process fake of the knowledge service (plus an archive endpoint) for integration tests.
#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

pub const API_KEY: &str = "test-key";

#[derive(Debug, Clone)]
pub struct FakeCollection {
    pub id: String,
    pub name: String,
    pub description: String,
    pub file_ids: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub collections: Vec<FakeCollection>,
    /// Every request as "METHOD path".
    pub calls: Vec<String>,
    /// Raw multipart bodies received by the upload endpoint.
    pub upload_bodies: Vec<Vec<u8>>,
    /// Uploads whose body contains this marker are answered with 500.
    pub fail_uploads_containing: Option<String>,
    pub archive: Vec<u8>,
    pub next_file: usize,
    pub next_collection: usize,
}

pub type Shared = Arc<Mutex<FakeState>>;

impl FakeState {
    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| c.as_str() == call).count()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {API_KEY}"))
        .unwrap_or(false)
}

fn collection_json(c: &FakeCollection) -> Value {
    json!({
        "id": c.id,
        "name": c.name,
        "description": c.description,
        "data": { "file_ids": c.file_ids },
    })
}

async fn list(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut s = state.lock().unwrap();
    s.calls.push("GET knowledge/list".into());
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let body: Vec<Value> = s.collections.iter().map(collection_json).collect();
    Json(body).into_response()
}

async fn create(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    s.calls.push("POST knowledge/create".into());
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if body["data"]["file_ids"] != json!([]) {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    }
    s.next_collection += 1;
    let created = FakeCollection {
        id: format!("kb-{}", s.next_collection),
        name: body["name"].as_str().unwrap_or_default().to_string(),
        description: body["description"].as_str().unwrap_or_default().to_string(),
        file_ids: vec![],
    };
    let out = collection_json(&created);
    s.collections.push(created);
    Json(out).into_response()
}

async fn reset(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let mut s = state.lock().unwrap();
    s.calls.push(format!("POST knowledge/{id}/reset"));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match s.collections.iter_mut().find(|c| c.id == id) {
        Some(c) => {
            c.file_ids.clear();
            Json(collection_json(c)).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn get_one(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> Response {
    let mut s = state.lock().unwrap();
    s.calls.push(format!("GET knowledge/{id}"));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match s.collections.iter().find(|c| c.id == id) {
        Some(c) => Json(collection_json(c)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn upload(State(state): State<Shared>, headers: HeaderMap, body: Bytes) -> Response {
    let mut s = state.lock().unwrap();
    s.calls.push("POST files/".into());
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let text = String::from_utf8_lossy(&body).to_string();
    s.upload_bodies.push(body.to_vec());
    if !text.contains("name=\"file\"") {
        return StatusCode::BAD_REQUEST.into_response();
    }
    if let Some(marker) = &s.fail_uploads_containing {
        if text.contains(marker.as_str()) {
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    }
    s.next_file += 1;
    Json(json!({ "id": format!("file-{}", s.next_file), "filename": "upload" })).into_response()
}

async fn add(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock().unwrap();
    s.calls.push(format!("POST knowledge/{id}/file/add"));
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let Some(file_id) = body["file_id"].as_str().map(str::to_string) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    match s.collections.iter_mut().find(|c| c.id == id) {
        Some(c) if c.file_ids.contains(&file_id) => StatusCode::BAD_REQUEST.into_response(),
        Some(c) => {
            c.file_ids.push(file_id);
            Json(collection_json(c)).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn archive(State(state): State<Shared>) -> Response {
    let s = state.lock().unwrap();
    s.archive.clone().into_response()
}

pub fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v1/knowledge/list", get(list))
        .route("/api/v1/knowledge/create", post(create))
        .route("/api/v1/knowledge/:id", get(get_one))
        .route("/api/v1/knowledge/:id/reset", post(reset))
        .route("/api/v1/knowledge/:id/file/add", post(add))
        .route("/api/v1/files/", post(upload))
        .route("/docs.zip", get(archive))
        .with_state(state)
}

/// Start the fake on the current tokio runtime.
pub async fn spawn(state: Shared) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Start the fake on a dedicated thread with its own runtime, for blocking tests.
pub fn spawn_on_thread(state: Shared) -> SocketAddr {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let addr = spawn(state).await;
            tx.send(addr).unwrap();
            std::future::pending::<()>().await;
        });
    });
    rx.recv().unwrap()
}

pub fn api_url(addr: SocketAddr) -> String {
    format!("http://{addr}/api/v1/")
}

/// Zip with the given entries; names ending in '/' are directories.
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, body) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
    }
    zip.finish().unwrap().into_inner()
}
