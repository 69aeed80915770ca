//! HTTP matching service
//!
//! JSON API under `/api/v1`, plus the web front end served from a static
//! directory. Every error leaves as `{"detail": "..."}`.

use crate::error::{MapperError, Result};
use crate::matcher::Matcher;
use crate::processor;
use crate::reference::ReferenceMap;
use crate::store::FileStore;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Path as AxumPath, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use snomed_mapper_common::api::{
    DOWNLOAD_ENDPOINT, MATCH_ENDPOINT, PROCESS_EXCEL_ENDPOINT, STATUS_ENDPOINT, UPLOAD_FIELD,
};
use snomed_mapper_common::{ServiceStatus, TariffRequest, TariffResponse, UploadResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Clone)]
pub struct AppState {
    pub matcher: Arc<Matcher>,
    pub store: Arc<FileStore>,
    /// Request body cap, also reported in the 413 detail
    pub max_upload_bytes: usize,
}

/// Everything `serve` needs, resolved from config and CLI flags
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    pub reference_path: PathBuf,
    pub static_dir: PathBuf,
    pub output_dir: PathBuf,
    pub retention: Duration,
    pub max_upload_bytes: usize,
}

pub fn router(state: AppState, static_dir: &Path) -> Router {
    let index_file = static_dir.join("index.html");
    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route_service("/", ServeFile::new(index_file))
        .nest_service("/static", ServeDir::new(static_dir))
        .route(STATUS_ENDPOINT, get(status))
        .route(MATCH_ENDPOINT, post(match_tariffs))
        .route(PROCESS_EXCEL_ENDPOINT, post(process_excel))
        .route(&format!("{}/:file_id", DOWNLOAD_ENDPOINT), get(download))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load the reference map, fit the matcher and serve until shutdown
pub async fn serve(options: ServeOptions) -> Result<()> {
    let reference = ReferenceMap::load(&options.reference_path)?;
    tracing::info!(
        entries = reference.len(),
        path = %options.reference_path.display(),
        "reference map loaded"
    );

    let matcher = Matcher::new(reference)?;
    let store = FileStore::open(&options.output_dir)?.with_retention(options.retention);
    let state = AppState {
        matcher: Arc::new(matcher),
        store: Arc::new(store),
        max_upload_bytes: options.max_upload_bytes,
    };
    let app = router(state, &options.static_dir);

    let addr = format!("{}:{}", options.host, options.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        addr = %addr,
        static_dir = %options.static_dir.display(),
        output_dir = %options.output_dir.display(),
        "SNOMED mapper listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

async fn status() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

async fn match_tariffs(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TariffRequest>, JsonRejection>,
) -> Result<Json<TariffResponse>> {
    let Json(request) = payload.map_err(|e| MapperError::InvalidBody(e.body_text()))?;
    if request.tariff_names.is_empty() {
        return Err(MapperError::EmptyNameList);
    }

    let count = request.tariff_names.len();
    let matcher = state.matcher.clone();
    let results = tokio::task::spawn_blocking(move || matcher.match_names(&request.tariff_names))
        .await
        .map_err(|e| MapperError::Internal(e.to_string()))??;

    tracing::info!(count, "matched tariff names");
    Ok(Json(TariffResponse { results }))
}

async fn process_excel(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResult>> {
    let limit = state.max_upload_bytes;
    let mut multipart = multipart.map_err(|e| rejection_error(&e, limit))?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, limit))?;
        upload = Some((file_name, bytes.to_vec()));
    }
    let (file_name, bytes) = upload
        .ok_or_else(|| MapperError::InvalidBody(format!("missing form field '{}'", UPLOAD_FIELD)))?;

    tracing::info!(file_name = %file_name, size = bytes.len(), "processing upload");
    let matcher = state.matcher.clone();
    let store = state.store.clone();
    let result = tokio::task::spawn_blocking(move || -> Result<UploadResult> {
        let processed = processor::process_upload(&file_name, &bytes, &matcher)?;
        let file_id = store.save(&processed.bytes)?;
        Ok(UploadResult {
            total_rows: processed.total_rows,
            duplicated_rows: processed.duplicated_rows,
            file_id,
        })
    })
    .await
    .map_err(|e| MapperError::Internal(e.to_string()))??;

    tracing::info!(
        total_rows = result.total_rows,
        duplicated_rows = result.duplicated_rows,
        file_id = %result.file_id,
        "upload processed"
    );
    Ok(Json(result))
}

fn multipart_error(err: MultipartError, limit: usize) -> MapperError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        MapperError::PayloadTooLarge(limit)
    } else {
        MapperError::BadRequest(err.body_text())
    }
}

fn rejection_error(rejection: &MultipartRejection, limit: usize) -> MapperError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        MapperError::PayloadTooLarge(limit)
    } else {
        MapperError::BadRequest(rejection.body_text())
    }
}

async fn download(
    State(state): State<AppState>,
    AxumPath(file_id): AxumPath<String>,
) -> Result<Response> {
    let path = state
        .store
        .path_for(&file_id)
        .ok_or_else(|| MapperError::DownloadNotFound(file_id.clone()))?;
    let bytes = tokio::fs::read(&path).await?;

    let disposition = format!("attachment; filename=\"{}\"", FileStore::download_name(&file_id));
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
