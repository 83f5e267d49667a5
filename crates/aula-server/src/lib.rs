//! HTTP server for the Aula course portal.
//!
//! Binds one listener that serves three surfaces: the JSON API under
//! `/api`, uploaded course files under `/files`, and the pre-built SPA
//! bundle for everything else.

pub mod spa;
pub mod storage;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json,
  body::Body,
  extract::{Path, Query, Request, State},
  http::{StatusCode, Uri, header},
  response::{IntoResponse, Response},
  routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use aula_api::{ApiError, auth::authenticate};
use aula_core::{content::MaterialKind, store::CourseStore, user::Role};
use storage::{DiskStorage, MAX_UPLOAD_BYTES, StorageError};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`. Every
/// field has a default so the server starts with no config file at all.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_base_url")]
  pub base_url:   String,
  /// Directory holding the built SPA bundle.
  #[serde(default = "default_public_dir")]
  pub public_dir: PathBuf,
  /// Directory uploaded files are stored under.
  #[serde(default = "default_data_dir")]
  pub data_dir:   PathBuf,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 10000 }
fn default_base_url() -> String { "http://localhost:10000".to_string() }
fn default_public_dir() -> PathBuf { PathBuf::from("dist") }
fn default_data_dir() -> PathBuf { PathBuf::from("uploads") }
fn default_store_path() -> PathBuf { PathBuf::from("aula.db") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       default_host(),
      port:       default_port(),
      base_url:   default_base_url(),
      public_dir: default_public_dir(),
      data_dir:   default_data_dir(),
      store_path: default_store_path(),
    }
  }
}

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S: CourseStore> {
  pub store:   Arc<S>,
  pub config:  Arc<ServerConfig>,
  pub storage: DiskStorage,
}

impl<S: CourseStore> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:   self.store.clone(),
      config:  self.config.clone(),
      storage: self.storage.clone(),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the full application router: API, file storage, health and debug
/// endpoints, SPA fallback.
pub fn router<S>(state: AppState<S>) -> axum::Router
where
  S: CourseStore + 'static,
{
  axum::Router::new()
    .route("/health", get(health))
    .route("/debug-files", get(debug_files::<S>))
    .route("/files/{bucket}", post(upload::<S>))
    .route("/files/{bucket}/{*path}", get(serve_file::<S>))
    .nest_service("/api", aula_api::api_router(state.store.clone()))
    .fallback(spa_fallback::<S>)
    .with_state(state)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "OK" }

/// `GET /debug-files` — plain-text recursive listing of the bundle
/// directory, for diagnosing broken deployments.
async fn debug_files<S>(State(state): State<AppState<S>>) -> Response
where
  S: CourseStore,
{
  let dir = &state.config.public_dir;
  let mut entries = Vec::new();
  if let Err(e) = list_files(dir, "", &mut entries) {
    return (
      StatusCode::OK,
      format!("cannot read {}: {e}", dir.display()),
    )
      .into_response();
  }
  entries.sort();
  entries.join("\n").into_response()
}

fn list_files(
  dir: &std::path::Path,
  prefix: &str,
  out: &mut Vec<String>,
) -> std::io::Result<()> {
  for entry in std::fs::read_dir(dir)? {
    let entry = entry?;
    let name = entry.file_name().to_string_lossy().into_owned();
    let rel = if prefix.is_empty() {
      name.clone()
    } else {
      format!("{prefix}/{name}")
    };
    if entry.file_type()?.is_dir() {
      list_files(&entry.path(), &rel, out)?;
    } else {
      out.push(rel);
    }
  }
  Ok(())
}

async fn spa_fallback<S>(
  State(state): State<AppState<S>>,
  uri: Uri,
) -> Response
where
  S: CourseStore,
{
  spa::serve(&state.config.public_dir, uri.path()).await
}

// ─── File storage routes ─────────────────────────────────────────────────────

/// `GET /files/{bucket}/{*path}`
async fn serve_file<S>(
  State(state): State<AppState<S>>,
  Path((bucket, path)): Path<(String, String)>,
) -> Response
where
  S: CourseStore,
{
  match state.storage.open(&bucket, &path).await {
    Ok(bytes) => (
      [(header::CONTENT_TYPE, spa::content_type_for(&path))],
      bytes,
    )
      .into_response(),
    Err(StorageError::NotFound) => {
      StatusCode::NOT_FOUND.into_response()
    }
    Err(StorageError::InvalidSegment(_)) => {
      StatusCode::BAD_REQUEST.into_response()
    }
    Err(e) => {
      tracing::error!(error = %e, "file read failed");
      StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
  }
}

#[derive(Debug, Deserialize)]
struct UploadParams {
  folder: String,
  /// The client-side file name; only its extension is kept.
  name:   String,
}

#[derive(Debug, Serialize)]
struct UploadResponse {
  url:       String,
  file_name: String,
  kind:      MaterialKind,
}

/// `POST /files/{bucket}?folder=...&name=...` — teacher only, raw body.
async fn upload<S>(
  State(state): State<AppState<S>>,
  Path(bucket): Path<String>,
  Query(params): Query<UploadParams>,
  req: Request<Body>,
) -> Response
where
  S: CourseStore,
{
  let user = match authenticate(req.headers(), state.store.as_ref()).await {
    Ok(user) => user,
    Err(e) => return e.into_response(),
  };
  if user.profile.role != Role::Teacher {
    return ApiError::Forbidden("teacher role required".into())
      .into_response();
  }

  let bytes =
    match axum::body::to_bytes(req.into_body(), MAX_UPLOAD_BYTES).await {
      Ok(bytes) => bytes,
      Err(_) => {
        return (StatusCode::PAYLOAD_TOO_LARGE, "upload exceeds 50 MiB")
          .into_response();
      }
    };

  match state
    .storage
    .save(&bucket, &params.folder, &params.name, &bytes)
    .await
  {
    Ok(stored) => Json(UploadResponse {
      url:       stored.public_url,
      file_name: stored.file_name,
      kind:      stored.kind,
    })
    .into_response(),
    Err(e @ StorageError::InvalidSegment(_)) => {
      (StatusCode::BAD_REQUEST, e.to_string()).into_response()
    }
    Err(e) => {
      tracing::error!(error = %e, "upload failed");
      StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
  }
}

// ─── Integration tests ───────────────────────────────────────────────────────
