//! The document library — standalone reference files outside the weekly
//! course structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The closed set of library categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryCategory {
  Checklist,
  Table,
  Guide,
  Pdf,
}

impl LibraryCategory {
  /// The string stored in the `category` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Checklist => "checklist",
      Self::Table => "table",
      Self::Guide => "guide",
      Self::Pdf => "pdf",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "checklist" => Ok(Self::Checklist),
      "table" => Ok(Self::Table),
      "guide" => Ok(Self::Guide),
      "pdf" => Ok(Self::Pdf),
      other => Err(Error::UnknownLibraryCategory(other.to_string())),
    }
  }
}

/// A single library entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryItem {
  pub item_id:     Uuid,
  pub title:       String,
  pub category:    LibraryCategory,
  pub file_url:    String,
  pub description: Option<String>,
  pub created_at:  DateTime<Utc>,
}

/// Input for library item creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLibraryItem {
  pub title:       String,
  pub category:    LibraryCategory,
  pub file_url:    String,
  pub description: Option<String>,
}
