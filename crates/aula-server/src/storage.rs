//! Disk-backed object storage for uploaded course files.
//!
//! Files land under `{root}/{bucket}/{folder}/` with a generated name, and
//! are served back through `GET /files/{bucket}/{*path}`. Path segments are
//! validated on both directions; a segment that could escape the root is
//! rejected before any filesystem call.

use std::path::PathBuf;

use aula_core::content::MaterialKind;
use thiserror::Error;
use uuid::Uuid;

/// Uploads larger than this are rejected outright.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum StorageError {
  #[error("invalid path segment: {0:?}")]
  InvalidSegment(String),

  #[error("file not found")]
  NotFound,

  #[error("i/o error: {0}")]
  Io(#[from] std::io::Error),
}

/// What an upload produced: where the client can fetch it, and the material
/// kind inferred from the original file name.
#[derive(Debug)]
pub struct StoredFile {
  pub public_url: String,
  pub file_name:  String,
  pub kind:       MaterialKind,
}

#[derive(Clone)]
pub struct DiskStorage {
  root: PathBuf,
}

impl DiskStorage {
  pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

  /// Store `bytes` under `{bucket}/{folder}` with a collision-free name and
  /// return its public URL.
  pub async fn save(
    &self,
    bucket:        &str,
    folder:        &str,
    original_name: &str,
    bytes:         &[u8],
  ) -> Result<StoredFile, StorageError> {
    check_segment(bucket)?;
    check_segment(folder)?;

    let ext = extension_of(original_name);
    let file_name = format!(
      "{}_{}.{}",
      Uuid::new_v4().simple(),
      chrono::Utc::now().timestamp_millis(),
      ext
    );

    let dir = self.root.join(bucket).join(folder);
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join(&file_name), bytes).await?;

    Ok(StoredFile {
      public_url: format!("/files/{bucket}/{folder}/{file_name}"),
      file_name,
      kind: MaterialKind::for_extension(ext),
    })
  }

  /// Read a stored file back. `path` is the `{folder}/{file}` remainder of
  /// the public URL and may contain multiple segments.
  pub async fn open(
    &self,
    bucket: &str,
    path:   &str,
  ) -> Result<Vec<u8>, StorageError> {
    check_segment(bucket)?;
    for segment in path.split('/') {
      check_segment(segment)?;
    }

    match tokio::fs::read(self.root.join(bucket).join(path)).await {
      Ok(bytes) => Ok(bytes),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        Err(StorageError::NotFound)
      }
      Err(e) => Err(e.into()),
    }
  }
}

fn check_segment(segment: &str) -> Result<(), StorageError> {
  if segment.is_empty()
    || segment == "."
    || segment == ".."
    || segment.contains(['/', '\\'])
  {
    return Err(StorageError::InvalidSegment(segment.to_string()));
  }
  Ok(())
}

fn extension_of(name: &str) -> &str {
  name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("bin")
}
