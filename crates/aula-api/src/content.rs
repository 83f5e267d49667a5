//! Teacher CRUD over weeks, days, and materials. Every handler here is
//! guarded by [`TeacherOnly`].

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use aula_core::{
  content::{
    DEFAULT_DAY_ORDER, DayPatch, NewDay, NewMaterial, NewWeek,
  },
  store::CourseStore,
  video::embed_url,
};

use crate::{auth::TeacherOnly, error::ApiError};

// ─── Weeks ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewWeekBody {
  pub title: String,
}

/// `POST /weeks` — appends after the existing weeks.
pub async fn create_week<S>(
  State(store): State<Arc<S>>,
  TeacherOnly(_): TeacherOnly,
  Json(body): Json<NewWeekBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CourseStore,
{
  let order_index = store
    .course_weeks()
    .await
    .map_err(ApiError::store)?
    .len() as i64
    + 1;

  let week = store
    .create_week(NewWeek { title: body.title, order_index })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(week)))
}

/// Distinguishes "field absent" (no change) from "field null" (clear it)
/// for the availability date.
fn double_option<'de, D>(
  deserializer: D,
) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
  D: Deserializer<'de>,
{
  Option::<DateTime<Utc>>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct WeekPatchBody {
  pub title:          Option<String>,
  pub is_locked:      Option<bool>,
  #[serde(default, deserialize_with = "double_option")]
  pub available_from: Option<Option<DateTime<Utc>>>,
}

/// `PATCH /weeks/{id}` — any combination of rename, lock flag, and
/// availability date.
pub async fn update_week<S>(
  State(store): State<Arc<S>>,
  TeacherOnly(_): TeacherOnly,
  Path(week_id): Path<Uuid>,
  Json(body): Json<WeekPatchBody>,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  if let Some(title) = body.title {
    store
      .rename_week(week_id, title)
      .await
      .map_err(ApiError::store)?;
  }
  if let Some(locked) = body.is_locked {
    store
      .set_week_locked(week_id, locked)
      .await
      .map_err(ApiError::store)?;
  }
  if let Some(available_from) = body.available_from {
    store
      .set_week_availability(week_id, available_from)
      .await
      .map_err(ApiError::store)?;
  }
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /weeks/{id}` — cascades to days, materials, and progress.
pub async fn delete_week<S>(
  State(store): State<Arc<S>>,
  TeacherOnly(_): TeacherOnly,
  Path(week_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  deleted_or_404(
    store.delete_week(week_id).await.map_err(ApiError::store)?,
    "week",
    week_id,
  )
}

// ─── Days ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewDayBody {
  pub title:       String,
  pub order_index: Option<i64>,
}

/// `POST /weeks/{id}/days`
pub async fn create_day<S>(
  State(store): State<Arc<S>>,
  TeacherOnly(_): TeacherOnly,
  Path(week_id): Path<Uuid>,
  Json(body): Json<NewDayBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CourseStore,
{
  let day = store
    .create_day(NewDay {
      week_id,
      title: body.title,
      order_index: body.order_index.unwrap_or(DEFAULT_DAY_ORDER),
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(day)))
}

/// `PATCH /days/{id}` — pasted video links are normalised to embed URLs
/// before they are stored.
pub async fn update_day<S>(
  State(store): State<Arc<S>>,
  TeacherOnly(_): TeacherOnly,
  Path(day_id): Path<Uuid>,
  Json(mut patch): Json<DayPatch>,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  patch.video_url = patch.video_url.as_deref().map(embed_url);
  patch.rutube_url = patch.rutube_url.as_deref().map(embed_url);

  store
    .update_day(day_id, patch)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /days/{id}`
pub async fn delete_day<S>(
  State(store): State<Arc<S>>,
  TeacherOnly(_): TeacherOnly,
  Path(day_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  deleted_or_404(
    store.delete_day(day_id).await.map_err(ApiError::store)?,
    "day",
    day_id,
  )
}

// ─── Materials ───────────────────────────────────────────────────────────────

/// `POST /materials` — body carries exactly one of `week_id` / `day_id`.
pub async fn add_material<S>(
  State(store): State<Arc<S>>,
  TeacherOnly(_): TeacherOnly,
  Json(body): Json<NewMaterial>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CourseStore,
{
  body.parent().map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let material = store
    .add_material(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(material)))
}

/// `DELETE /materials/{id}`
pub async fn delete_material<S>(
  State(store): State<Arc<S>>,
  TeacherOnly(_): TeacherOnly,
  Path(material_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  deleted_or_404(
    store
      .delete_material(material_id)
      .await
      .map_err(ApiError::store)?,
    "material",
    material_id,
  )
}

fn deleted_or_404(
  deleted: bool,
  noun: &str,
  id: Uuid,
) -> Result<StatusCode, ApiError> {
  if deleted {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("{noun} {id} not found")))
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn week_patch_distinguishes_absent_from_null() {
    let absent: WeekPatchBody = serde_json::from_value(json!({})).unwrap();
    assert!(absent.available_from.is_none());

    let cleared: WeekPatchBody =
      serde_json::from_value(json!({ "available_from": null })).unwrap();
    assert_eq!(cleared.available_from, Some(None));

    let set: WeekPatchBody = serde_json::from_value(
      json!({ "available_from": "2030-01-01T00:00:00Z" }),
    )
    .unwrap();
    assert!(matches!(set.available_from, Some(Some(_))));
  }

  #[test]
  fn new_day_defaults_to_the_tail_order() {
    let body: NewDayBody =
      serde_json::from_value(json!({ "title": "Day" })).unwrap();
    assert_eq!(body.order_index.unwrap_or(DEFAULT_DAY_ORDER), 99);
  }
}
