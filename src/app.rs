use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::loader;
use crate::store::SessionStore;
use crate::table::Value;
use crate::transform;

/// The one user-facing failure message; decode causes stay in the log.
const PROCESSING_ERROR: &str = "There was an error processing this file.";

pub struct AppState {
    store: Mutex<SessionStore>,
}

/// One file out of the browser's selection: a base64 data URL plus the name
/// it was uploaded under. The timestamp is carried by the upload event but
/// never consumed.
#[derive(Deserialize)]
pub struct UploadedFile {
    pub content: String,
    pub filename: String,
    #[serde(default)]
    pub last_modified: Option<i64>,
}

#[derive(Deserialize)]
pub struct UploadRequest {
    #[serde(default)]
    pub files: Vec<UploadedFile>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub filename: Option<String>,
    pub message: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub show_download: bool,
}

#[derive(Deserialize)]
struct DownloadQuery {
    #[serde(default)]
    filename: String,
}

pub async fn run(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app_state = Arc::new(AppState {
        store: Mutex::new(SessionStore::new()),
    });

    // Build router
    let app = Router::new()
        .route("/", get(serve_index))
        .route("/api/upload", post(upload))
        .route("/api/download", get(download))
        .with_state(app_state);

    // Start server
    let listener = TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_index() -> Html<&'static str> {
    Html(include_str!("./static/index.html"))
}

async fn upload(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UploadRequest>,
) -> Json<UploadResponse> {
    let mut store = state.store.lock().unwrap();
    Json(process_upload(&payload.files, &mut store))
}

/// Run one upload through the pipeline: decode, parse, clean, store.
///
/// Only the first selected file is used; any further files are silently
/// ignored. An empty selection produces an empty view, any decode or parse
/// failure the single generic error, and either way the download control
/// stays hidden.
pub fn process_upload(files: &[UploadedFile], store: &mut SessionStore) -> UploadResponse {
    let first = match files.first() {
        Some(file) => file,
        None => {
            return UploadResponse {
                status: "empty".to_string(),
                filename: None,
                message: None,
                columns: Vec::new(),
                rows: Vec::new(),
                show_download: false,
            };
        }
    };

    let parsed = loader::decode_data_url(&first.content)
        .and_then(|payload| loader::parse_upload(&payload, &first.filename));

    match parsed {
        Ok(table) => {
            let cleaned = transform::clean(table);
            let response = UploadResponse {
                status: "ok".to_string(),
                filename: Some(first.filename.clone()),
                message: None,
                columns: cleaned.columns.clone(),
                rows: cleaned.rows.clone(),
                show_download: true,
            };
            store.put(cleaned);
            response
        }
        Err(e) => {
            log::warn!("failed to process upload {:?}: {}", first.filename, e);
            UploadResponse {
                status: "error".to_string(),
                filename: None,
                message: Some(PROCESSING_ERROR.to_string()),
                columns: Vec::new(),
                rows: Vec::new(),
                show_download: false,
            }
        }
    }
}

async fn download(
    Query(params): Query<DownloadQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let store = state.store.lock().unwrap();

    // Nothing uploaded yet: deliver nothing, not an error
    let table = match store.get() {
        Some(table) => table,
        None => return StatusCode::NO_CONTENT.into_response(),
    };

    let csv = match table.to_csv() {
        Ok(csv) => csv,
        Err(e) => {
            log::error!("failed to serialize stored table: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download_filename(&params.filename)),
        )
        .body(axum::body::Body::from(csv));

    match response {
        Ok(response) => response,
        Err(e) => {
            log::error!("failed to build download response: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// The delivered name is whatever the field held plus `.csv`; an empty field
/// degenerates to literally `.csv`. Control characters are dropped because
/// they cannot travel in a `Content-Disposition` header; everything else is
/// left to the browser's delivery mechanism.
fn download_filename(stem: &str) -> String {
    let stem: String = stem.chars().filter(|c| !c.is_control()).collect();
    format!("{}.csv", stem)
}
