//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings; calendar dates as
//! `YYYY-MM-DD`. UUIDs are stored as hyphenated lowercase strings. Closed
//! enums use the wire names their core types define.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use aula_core::{
  content::{DayRow, MaterialKind, MaterialRow},
  library::{LibraryCategory, LibraryItem},
  stream::{LiveStream, StreamComment},
  user::{Profile, Role},
};

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse()
    .map_err(|e: chrono::ParseError| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `profiles` row.
pub struct RawProfile {
  pub profile_id: String,
  pub email:      String,
  pub full_name:  Option<String>,
  pub role:       String,
  pub avatar_url: Option<String>,
  pub created_at: String,
}

impl RawProfile {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      profile_id: row.get(0)?,
      email:      row.get(1)?,
      full_name:  row.get(2)?,
      role:       row.get(3)?,
      avatar_url: row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      profile_id: decode_uuid(&self.profile_id)?,
      email:      self.email,
      full_name:  self.full_name,
      role:       Role::parse(&self.role).map_err(Error::Core)?,
      avatar_url: self.avatar_url,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `days` row.
pub struct RawDay {
  pub day_id:      String,
  pub week_id:     String,
  pub title:       String,
  pub description: Option<String>,
  pub order_index: i64,
  pub video_url:   Option<String>,
  pub rutube_url:  Option<String>,
  pub date:        Option<String>,
  pub homework:    Option<String>,
}

impl RawDay {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      day_id:      row.get(0)?,
      week_id:     row.get(1)?,
      title:       row.get(2)?,
      description: row.get(3)?,
      order_index: row.get(4)?,
      video_url:   row.get(5)?,
      rutube_url:  row.get(6)?,
      date:        row.get(7)?,
      homework:    row.get(8)?,
    })
  }

  pub fn into_day(self) -> Result<DayRow> {
    Ok(DayRow {
      day_id:      decode_uuid(&self.day_id)?,
      week_id:     decode_uuid(&self.week_id)?,
      title:       self.title,
      description: self.description,
      order_index: self.order_index,
      video_url:   self.video_url,
      rutube_url:  self.rutube_url,
      date:        self.date.as_deref().map(decode_date).transpose()?,
      homework:    self.homework,
    })
  }
}

/// Raw strings read directly from a `materials` row.
pub struct RawMaterial {
  pub material_id: String,
  pub title:       String,
  pub kind:        String,
  pub url:         String,
  pub week_id:     Option<String>,
  pub day_id:      Option<String>,
  pub is_homework: bool,
}

impl RawMaterial {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      material_id: row.get(0)?,
      title:       row.get(1)?,
      kind:        row.get(2)?,
      url:         row.get(3)?,
      week_id:     row.get(4)?,
      day_id:      row.get(5)?,
      is_homework: row.get(6)?,
    })
  }

  pub fn into_material(self) -> Result<MaterialRow> {
    Ok(MaterialRow {
      material_id: decode_uuid(&self.material_id)?,
      title:       self.title,
      kind:        MaterialKind::parse(&self.kind).map_err(Error::Core)?,
      url:         self.url,
      week_id:     self.week_id.as_deref().map(decode_uuid).transpose()?,
      day_id:      self.day_id.as_deref().map(decode_uuid).transpose()?,
      is_homework: self.is_homework,
    })
  }
}

/// Raw strings read directly from a `live_streams` row.
pub struct RawStream {
  pub stream_id:      String,
  pub title:          String,
  pub date:           String,
  pub video_url:      Option<String>,
  pub rutube_url:     Option<String>,
  pub description:    Option<String>,
  pub topics:         Option<String>,
  pub best_questions: Option<String>,
  pub created_at:     String,
}

impl RawStream {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      stream_id:      row.get(0)?,
      title:          row.get(1)?,
      date:           row.get(2)?,
      video_url:      row.get(3)?,
      rutube_url:     row.get(4)?,
      description:    row.get(5)?,
      topics:         row.get(6)?,
      best_questions: row.get(7)?,
      created_at:     row.get(8)?,
    })
  }

  pub fn into_stream(self) -> Result<LiveStream> {
    Ok(LiveStream {
      stream_id:      decode_uuid(&self.stream_id)?,
      title:          self.title,
      date:           decode_dt(&self.date)?,
      video_url:      self.video_url,
      rutube_url:     self.rutube_url,
      description:    self.description,
      topics:         self.topics,
      best_questions: self.best_questions,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `stream_comments` row.
pub struct RawComment {
  pub comment_id: String,
  pub stream_id:  String,
  pub author_id:  String,
  pub body:       String,
  pub created_at: String,
}

impl RawComment {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      comment_id: row.get(0)?,
      stream_id:  row.get(1)?,
      author_id:  row.get(2)?,
      body:       row.get(3)?,
      created_at: row.get(4)?,
    })
  }

  pub fn into_comment(self) -> Result<StreamComment> {
    Ok(StreamComment {
      comment_id: decode_uuid(&self.comment_id)?,
      stream_id:  decode_uuid(&self.stream_id)?,
      author_id:  decode_uuid(&self.author_id)?,
      body:       self.body,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `library_items` row.
pub struct RawLibraryItem {
  pub item_id:     String,
  pub title:       String,
  pub category:    String,
  pub file_url:    String,
  pub description: Option<String>,
  pub created_at:  String,
}

impl RawLibraryItem {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      item_id:     row.get(0)?,
      title:       row.get(1)?,
      category:    row.get(2)?,
      file_url:    row.get(3)?,
      description: row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_item(self) -> Result<LibraryItem> {
    Ok(LibraryItem {
      item_id:     decode_uuid(&self.item_id)?,
      title:       self.title,
      category:    LibraryCategory::parse(&self.category).map_err(Error::Core)?,
      file_url:    self.file_url,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `weeks` row, before its days and
/// materials are attached.
pub struct RawWeek {
  pub week_id:        String,
  pub title:          String,
  pub description:    Option<String>,
  pub order_index:    i64,
  pub is_locked:      bool,
  pub available_from: Option<String>,
}

impl RawWeek {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      week_id:        row.get(0)?,
      title:          row.get(1)?,
      description:    row.get(2)?,
      order_index:    row.get(3)?,
      is_locked:      row.get(4)?,
      available_from: row.get(5)?,
    })
  }
}
