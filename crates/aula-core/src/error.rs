//! Error types for `aula-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("a material must reference exactly one of a week or a day")]
  AmbiguousMaterialParent,

  #[error("unknown material kind: {0:?}")]
  UnknownMaterialKind(String),

  #[error("unknown library category: {0:?}")]
  UnknownLibraryCategory(String),

  #[error("unknown role: {0:?}")]
  UnknownRole(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
