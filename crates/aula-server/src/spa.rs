//! Single-page-app bundle serving.
//!
//! Any path with a file extension is looked up in the bundle directory; any
//! extensionless path (a client-side route) and any missing file serve
//! `index.html`, so deep links into the app survive a refresh.

use std::path::Path;

use axum::{
  http::{StatusCode, header},
  response::{IntoResponse, Response},
};

/// Content type by file extension. The fallback is octet-stream, which also
/// covers the downloadables under `/files`.
pub fn content_type_for(path: &str) -> &'static str {
  let ext = path.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
  match ext.to_ascii_lowercase().as_str() {
    "html" => "text/html; charset=utf-8",
    "js" | "mjs" => "application/javascript",
    "css" => "text/css",
    "json" => "application/json",
    "png" => "image/png",
    "jpg" | "jpeg" => "image/jpeg",
    "svg" => "image/svg+xml",
    "ico" => "image/x-icon",
    "pdf" => "application/pdf",
    "mp4" => "video/mp4",
    _ => "application/octet-stream",
  }
}

fn is_safe(rel: &str) -> bool {
  !rel.is_empty()
    && rel
      .split('/')
      .all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

/// Serve `uri_path` from `public_dir`, falling back to `index.html`.
pub async fn serve(public_dir: &Path, uri_path: &str) -> Response {
  let rel = uri_path.trim_start_matches('/');

  if is_safe(rel) && rel.contains('.') {
    match tokio::fs::read(public_dir.join(rel)).await {
      Ok(bytes) => {
        return (
          [(header::CONTENT_TYPE, content_type_for(rel))],
          bytes,
        )
          .into_response();
      }
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        // fall through to index.html
      }
      Err(e) => {
        tracing::error!(error = %e, path = rel, "failed to read asset");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
      }
    }
  }

  match tokio::fs::read(public_dir.join("index.html")).await {
    Ok(bytes) => (
      [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
      bytes,
    )
      .into_response(),
    Err(e) => {
      tracing::error!(error = %e, "index.html unreadable");
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        "index.html not found in public directory",
      )
        .into_response()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn content_types_cover_the_bundle() {
    assert_eq!(content_type_for("index.html"), "text/html; charset=utf-8");
    assert_eq!(content_type_for("assets/app.js"), "application/javascript");
    assert_eq!(content_type_for("style.css"), "text/css");
    assert_eq!(content_type_for("manifest.json"), "application/json");
    assert_eq!(content_type_for("logo.svg"), "image/svg+xml");
    assert_eq!(content_type_for("photo.JPG"), "image/jpeg");
    assert_eq!(content_type_for("blob"), "application/octet-stream");
  }

  #[test]
  fn traversal_paths_are_unsafe() {
    assert!(!is_safe("../etc/passwd"));
    assert!(!is_safe("a/../../b.js"));
    assert!(!is_safe(""));
    assert!(is_safe("assets/app.js"));
  }
}
