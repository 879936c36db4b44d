//! In-process mock of the edge-detection API
//!
//! - `POST /edge-detect`: `bad*` names fail with a `detail` message,
//!   `boom*` names fail with a plain-text 500
//! - `POST /batch-edge-detect`: one result per zip entry, skipping
//!   `corrupt*` entries; a `malformed*` entry drops the `results` key
//! - `GET /image/:id/:variant`: a small PNG for ids starting with `id-`

#![allow(dead_code)]

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use image::{ImageBuffer, ImageFormat, Luma};
use serde_json::json;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct Upload {
    pub field: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Default)]
pub struct MockState {
    pub uploads: Arc<Mutex<Vec<Upload>>>,
}

impl MockState {
    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, Luma([255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn result_json(name: &str) -> serde_json::Value {
    let id = format!("id-{}", name);
    json!({
        "filename": name,
        "image_id": id,
        "images": {
            "canny": format!("/image/{}/canny", id),
            "fuzzy": format!("/image/{}/fuzzy", id)
        },
        "timing_sec": {"preprocess": 0.01, "canny": 0.002, "fuzzy": 0.3, "total": 0.32}
    })
}

async fn read_upload(state: &MockState, mut multipart: Multipart) -> Option<Upload> {
    let mut found = None;
    while let Some(field) = multipart.next_field().await.unwrap() {
        let upload = Upload {
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().unwrap_or_default().to_string(),
            content_type: field.content_type().unwrap_or_default().to_string(),
            bytes: field.bytes().await.unwrap().to_vec(),
        };
        state.uploads.lock().unwrap().push(upload.clone());
        found = Some(upload);
    }
    found
}

async fn edge_detect(State(state): State<MockState>, multipart: Multipart) -> Response {
    let Some(upload) = read_upload(&state, multipart).await else {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": [{"msg": "field required"}]})))
            .into_response();
    };

    if upload.file_name.starts_with("bad") {
        return (StatusCode::BAD_REQUEST, Json(json!({"detail": "unsupported format"}))).into_response();
    }
    if upload.file_name.starts_with("boom") {
        return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
    }
    Json(result_json(&upload.file_name)).into_response()
}

async fn batch_edge_detect(State(state): State<MockState>, multipart: Multipart) -> Response {
    let Some(upload) = read_upload(&state, multipart).await else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "No file"}))).into_response();
    };

    if !upload.file_name.to_lowercase().ends_with(".zip") {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Only ZIP files supported"}))).into_response();
    }

    let mut archive = zip::ZipArchive::new(Cursor::new(upload.bytes)).unwrap();
    let mut results = Vec::new();
    let mut malformed = false;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        let name = entry.name().to_string();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        if name.starts_with("corrupt") {
            continue;
        }
        if name.starts_with("malformed") {
            malformed = true;
        }
        results.push(result_json(&name));
    }

    if malformed {
        return Json(json!({"batch_id": "b-1"})).into_response();
    }
    Json(json!({"batch_id": "b-1", "results": results})).into_response()
}

async fn image(Path((image_id, variant)): Path<(String, String)>) -> Response {
    if variant != "canny" && variant != "fuzzy" {
        return (StatusCode::BAD_REQUEST, Json(json!({"detail": "Invalid edge type"}))).into_response();
    }
    if !image_id.starts_with("id-") {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Image not found"}))).into_response();
    }
    if image_id.contains("garbled") {
        return ([(header::CONTENT_TYPE, "image/png")], b"not a png".to_vec()).into_response();
    }
    let (w, h) = if variant == "canny" { (8, 6) } else { (6, 8) };
    ([(header::CONTENT_TYPE, "image/png")], png(w, h)).into_response()
}

/// Start the mock on an ephemeral port. Returns its base URL.
pub async fn spawn_mock_api() -> (String, MockState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = MockState::default();
    let app = Router::new()
        .route("/edge-detect", post(edge_detect))
        .route("/batch-edge-detect", post(batch_edge_detect))
        .route("/image/:image_id/:variant", get(image))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

/// A base URL nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
