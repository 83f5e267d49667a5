//! The `CourseStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `aula-store-sqlite`).
//! Higher layers (`aula-api`, `aula-server`) depend on this abstraction,
//! not on any concrete backend.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::{collections::HashSet, future::Future};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  content::{
    DayPatch, DayRow, MaterialRow, NewDay, NewMaterial, NewWeek, WeekRow,
  },
  library::{LibraryItem, NewLibraryItem},
  stream::{LiveStream, NewLiveStream, NewStreamComment, StreamComment},
  user::{NewProfile, Profile, ProfilePatch},
};

/// Abstraction over a course portal storage backend.
///
/// Delete operations return whether a row was actually removed, so callers
/// can distinguish "deleted" from "was never there". There is no optimistic
/// concurrency anywhere: concurrent teacher edits are last-write-wins.
pub trait CourseStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Course content — reads ────────────────────────────────────────────

  /// All weeks with their day and material rows, ordered by week order
  /// index ascending. Day order within a week is left to the caller; a
  /// week's `materials` holds every row referencing the week or its days.
  fn course_weeks(
    &self,
  ) -> impl Future<Output = Result<Vec<WeekRow>, Self::Error>> + Send + '_;

  /// A single day row. Returns `None` if not found.
  fn get_day(
    &self,
    day_id: Uuid,
  ) -> impl Future<Output = Result<Option<DayRow>, Self::Error>> + Send + '_;

  /// The materials attached directly to a day.
  fn day_materials(
    &self,
    day_id: Uuid,
  ) -> impl Future<Output = Result<Vec<MaterialRow>, Self::Error>> + Send + '_;

  // ── Course content — teacher writes ───────────────────────────────────

  fn create_week(
    &self,
    input: NewWeek,
  ) -> impl Future<Output = Result<WeekRow, Self::Error>> + Send + '_;

  fn rename_week(
    &self,
    week_id: Uuid,
    title: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Set or clear the availability date. `None` clears it.
  fn set_week_availability(
    &self,
    week_id: Uuid,
    available_from: Option<DateTime<Utc>>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn set_week_locked(
    &self,
    week_id: Uuid,
    locked: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete a week and, through the schema's cascade, its days, their
  /// materials, and any progress rows.
  fn delete_week(
    &self,
    week_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn create_day(
    &self,
    input: NewDay,
  ) -> impl Future<Output = Result<DayRow, Self::Error>> + Send + '_;

  fn update_day(
    &self,
    day_id: Uuid,
    patch: DayPatch,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_day(
    &self,
    day_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Insert a material. The input's parent invariant (exactly one of
  /// week/day) must already have been validated.
  fn add_material(
    &self,
    input: NewMaterial,
  ) -> impl Future<Output = Result<MaterialRow, Self::Error>> + Send + '_;

  fn delete_material(
    &self,
    material_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Progress ──────────────────────────────────────────────────────────

  /// The set of day IDs the user has marked complete. Completion is row
  /// existence, not a flag.
  fn completed_days(
    &self,
    profile_id: Uuid,
  ) -> impl Future<Output = Result<HashSet<Uuid>, Self::Error>> + Send + '_;

  /// Mark or unmark a day complete for a user. Idempotent in both
  /// directions.
  fn set_day_completion(
    &self,
    profile_id: Uuid,
    day_id: Uuid,
    done: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Live streams ──────────────────────────────────────────────────────

  /// All streams, date descending.
  fn list_streams(
    &self,
  ) -> impl Future<Output = Result<Vec<LiveStream>, Self::Error>> + Send + '_;

  fn create_stream(
    &self,
    input: NewLiveStream,
  ) -> impl Future<Output = Result<LiveStream, Self::Error>> + Send + '_;

  fn delete_stream(
    &self,
    stream_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Comments under a stream, oldest first.
  fn stream_comments(
    &self,
    stream_id: Uuid,
  ) -> impl Future<Output = Result<Vec<StreamComment>, Self::Error>> + Send + '_;

  fn add_stream_comment(
    &self,
    input: NewStreamComment,
  ) -> impl Future<Output = Result<StreamComment, Self::Error>> + Send + '_;

  // ── Library ───────────────────────────────────────────────────────────

  /// All library items, title ascending.
  fn list_library(
    &self,
  ) -> impl Future<Output = Result<Vec<LibraryItem>, Self::Error>> + Send + '_;

  fn create_library_item(
    &self,
    input: NewLibraryItem,
  ) -> impl Future<Output = Result<LibraryItem, Self::Error>> + Send + '_;

  fn delete_library_item(
    &self,
    item_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Create a profile. Errors if the email is already registered.
  fn create_profile(
    &self,
    input: NewProfile,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  /// Look up a profile and its password hash by email. Returns `None` if
  /// no profile carries that email.
  fn profile_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<(Profile, String)>, Self::Error>> + Send + '_;

  fn get_profile(
    &self,
    profile_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// All student profiles, newest registration first.
  fn list_students(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  fn update_profile(
    &self,
    profile_id: Uuid,
    patch: ProfilePatch,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn set_password_hash(
    &self,
    profile_id: Uuid,
    password_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Record a session. `token_hash` is a digest of the bearer token; the
  /// cleartext token never reaches the store.
  fn create_session(
    &self,
    profile_id: Uuid,
    token_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Resolve a session token digest to its profile.
  fn session_profile(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  fn delete_session(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Password reset ────────────────────────────────────────────────────

  fn create_reset_token(
    &self,
    profile_id: Uuid,
    token_hash: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Consume a reset token. Single use: returns the profile it was issued
  /// for and removes it, or `None` if it was never issued or already used.
  fn consume_reset_token(
    &self,
    token_hash: String,
  ) -> impl Future<Output = Result<Option<Uuid>, Self::Error>> + Send + '_;
}
