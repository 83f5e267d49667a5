//! Course content — the week / day / material hierarchy.
//!
//! Raw row types mirror the store's nested query result. View models are
//! what [`crate::tree::build_course_tree`] assembles for the client; they
//! carry the derived fields (`is_locked`, `is_completed`) that are never
//! persisted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Materials ───────────────────────────────────────────────────────────────

/// The closed set of material categories. Wire names match the store's
/// column constraint (`pptx`, `doc`, `zip` rather than the long forms).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
  Video,
  Pdf,
  #[serde(rename = "pptx")]
  SlideDeck,
  #[serde(rename = "doc")]
  Document,
  Link,
  #[serde(rename = "zip")]
  Archive,
}

impl MaterialKind {
  /// The string stored in the `kind` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Video => "video",
      Self::Pdf => "pdf",
      Self::SlideDeck => "pptx",
      Self::Document => "doc",
      Self::Link => "link",
      Self::Archive => "zip",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "video" => Ok(Self::Video),
      "pdf" => Ok(Self::Pdf),
      "pptx" => Ok(Self::SlideDeck),
      "doc" => Ok(Self::Document),
      "link" => Ok(Self::Link),
      "zip" => Ok(Self::Archive),
      other => Err(Error::UnknownMaterialKind(other.to_string())),
    }
  }

  /// Classify an uploaded file by its extension. Anything unrecognised
  /// (images included) is filed as a plain document.
  pub fn for_extension(ext: &str) -> Self {
    match ext.to_ascii_lowercase().as_str() {
      "mp4" | "mov" | "avi" | "mkv" => Self::Video,
      "pdf" => Self::Pdf,
      "zip" | "rar" | "7z" => Self::Archive,
      "pptx" | "ppt" => Self::SlideDeck,
      _ => Self::Document,
    }
  }
}

/// A material as shown to the client, with its parent references stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
  pub material_id: Uuid,
  pub title:       String,
  pub kind:        MaterialKind,
  pub url:         String,
  pub is_homework: bool,
}

/// The parent a material hangs off — exactly one, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialParent {
  Week(Uuid),
  Day(Uuid),
}

/// A raw `materials` row, parent foreign keys included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialRow {
  pub material_id: Uuid,
  pub title:       String,
  pub kind:        MaterialKind,
  pub url:         String,
  pub week_id:     Option<Uuid>,
  pub day_id:      Option<Uuid>,
  pub is_homework: bool,
}

impl MaterialRow {
  /// Which parent this row belongs to. Errors if both or neither foreign
  /// key is set, which the store schema forbids.
  pub fn parent(&self) -> Result<MaterialParent> {
    match (self.week_id, self.day_id) {
      (Some(w), None) => Ok(MaterialParent::Week(w)),
      (None, Some(d)) => Ok(MaterialParent::Day(d)),
      _ => Err(Error::AmbiguousMaterialParent),
    }
  }

  pub fn into_material(self) -> Material {
    Material {
      material_id: self.material_id,
      title:       self.title,
      kind:        self.kind,
      url:         self.url,
      is_homework: self.is_homework,
    }
  }
}

/// Input for material creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMaterial {
  pub title:       String,
  pub kind:        MaterialKind,
  pub url:         String,
  pub week_id:     Option<Uuid>,
  pub day_id:      Option<Uuid>,
  #[serde(default)]
  pub is_homework: bool,
}

impl NewMaterial {
  /// Validate the mutual-exclusivity invariant before the store is touched.
  pub fn parent(&self) -> Result<MaterialParent> {
    match (self.week_id, self.day_id) {
      (Some(w), None) => Ok(MaterialParent::Week(w)),
      (None, Some(d)) => Ok(MaterialParent::Day(d)),
      _ => Err(Error::AmbiguousMaterialParent),
    }
  }
}

// ─── Days ────────────────────────────────────────────────────────────────────

/// A raw `days` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRow {
  pub day_id:      Uuid,
  pub week_id:     Uuid,
  pub title:       String,
  pub description: Option<String>,
  pub order_index: i64,
  /// Primary lesson video, YouTube host.
  pub video_url:   Option<String>,
  /// The same lesson on the alternative host, where one exists.
  pub rutube_url:  Option<String>,
  pub date:        Option<NaiveDate>,
  pub homework:    Option<String>,
}

/// A day as shown to the client, with completion resolved for the
/// requesting user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
  pub day_id:       Uuid,
  pub title:        String,
  pub description:  Option<String>,
  pub order_index:  i64,
  pub video_url:    Option<String>,
  pub rutube_url:   Option<String>,
  pub date:         Option<NaiveDate>,
  pub is_completed: bool,
  pub homework:     Option<String>,
  pub materials:    Vec<Material>,
}

impl Day {
  /// Build the view model from a raw row. The one assembly point for day
  /// views; both the course tree and the single-day read go through it.
  pub fn assemble(
    row:          DayRow,
    materials:    Vec<Material>,
    is_completed: bool,
  ) -> Self {
    Self {
      day_id: row.day_id,
      title: row.title,
      description: row.description,
      order_index: row.order_index,
      video_url: row.video_url,
      rutube_url: row.rutube_url,
      date: row.date,
      is_completed,
      homework: row.homework,
      materials,
    }
  }
}

/// Input for day creation. New days default to a high order index so they
/// sort after existing ones until the teacher reorders them.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDay {
  pub week_id:     Uuid,
  pub title:       String,
  #[serde(default = "default_day_order")]
  pub order_index: i64,
}

/// Order index given to days created without an explicit position; high
/// enough to sort after any hand-numbered day.
pub const DEFAULT_DAY_ORDER: i64 = 99;

fn default_day_order() -> i64 { DEFAULT_DAY_ORDER }

/// Teacher edits to an existing day. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayPatch {
  pub title:       Option<String>,
  pub description: Option<String>,
  pub order_index: Option<i64>,
  pub video_url:   Option<String>,
  pub rutube_url:  Option<String>,
  pub date:        Option<NaiveDate>,
  pub homework:    Option<String>,
}

// ─── Weeks ───────────────────────────────────────────────────────────────────

/// A raw `weeks` row with its nested day and material rows, in store order
/// (weeks ascending by order index; days and materials unordered).
///
/// `materials` holds every row referencing this week or one of its days;
/// partitioning happens in the tree builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekRow {
  pub week_id:        Uuid,
  pub title:          String,
  pub description:    Option<String>,
  pub order_index:    i64,
  pub is_locked:      bool,
  pub available_from: Option<DateTime<Utc>>,
  pub days:           Vec<DayRow>,
  pub materials:      Vec<MaterialRow>,
}

/// A week as shown to the client. `is_locked` is derived on every fetch
/// from the stored flag and the availability date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Week {
  pub week_id:        Uuid,
  pub title:          String,
  pub description:    Option<String>,
  pub order_index:    i64,
  pub is_locked:      bool,
  pub available_from: Option<DateTime<Utc>>,
  pub days:           Vec<Day>,
  pub week_materials: Vec<Material>,
}

/// Input for week creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewWeek {
  pub title:       String,
  pub order_index: i64,
}
