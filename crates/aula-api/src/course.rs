//! Student-facing course reads and progress toggles.
//!
//! `GET /course` never fails: if either store read errors, the handler logs
//! and serves the built-in sample course in full, so the client always has
//! a complete tree to render.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use aula_core::{
  content::{Day, MaterialRow, Week},
  sample::sample_course,
  store::CourseStore,
  tree::build_course_tree,
};

use crate::{auth::CurrentUser, error::ApiError};

/// `GET /course` — the full week/day/material tree with lock state and the
/// caller's completion flags resolved.
pub async fn get_course<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
) -> Json<Vec<Week>>
where
  S: CourseStore,
{
  match fetch_course(&*store, user.profile.profile_id).await {
    Ok(weeks) => Json(weeks),
    Err(e) => {
      tracing::error!(error = %e, "course fetch failed, serving sample");
      Json(sample_course())
    }
  }
}

async fn fetch_course<S>(
  store: &S,
  profile_id: Uuid,
) -> Result<Vec<Week>, S::Error>
where
  S: CourseStore,
{
  let rows = store.course_weeks().await?;
  let completed = store.completed_days(profile_id).await?;
  Ok(build_course_tree(rows, &completed, Utc::now()))
}

/// `GET /days/{id}` — a single day with materials and the caller's
/// completion flag.
pub async fn get_day<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(day_id): Path<Uuid>,
) -> Result<Json<Day>, ApiError>
where
  S: CourseStore,
{
  let row = store
    .get_day(day_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("day {day_id} not found")))?;

  let materials = store
    .day_materials(day_id)
    .await
    .map_err(ApiError::store)?
    .into_iter()
    .map(MaterialRow::into_material)
    .collect();

  let is_completed = store
    .completed_days(user.profile.profile_id)
    .await
    .map_err(ApiError::store)?
    .contains(&day_id);

  Ok(Json(Day::assemble(row, materials, is_completed)))
}

/// `PUT /days/{id}/complete`
pub async fn complete_day<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(day_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  set_completion(&*store, user.profile.profile_id, day_id, true).await
}

/// `DELETE /days/{id}/complete`
pub async fn uncomplete_day<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(day_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  set_completion(&*store, user.profile.profile_id, day_id, false).await
}

async fn set_completion<S>(
  store: &S,
  profile_id: Uuid,
  day_id: Uuid,
  done: bool,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  // The day must exist; marking a deleted day complete is a 404, not a
  // silent no-op.
  store
    .get_day(day_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("day {day_id} not found")))?;

  store
    .set_day_completion(profile_id, day_id, done)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use aula_core::{
    content::{DayRow, WeekRow},
    sample::sample_course,
  };
  use uuid::Uuid;

  use super::*;
  use crate::{
    auth::CurrentUser,
    test_store::{StubStore, student_profile},
  };

  fn current(profile: aula_core::user::Profile) -> CurrentUser {
    CurrentUser { profile, token_hash: "unused".into() }
  }

  fn one_week() -> WeekRow {
    let week_id = Uuid::new_v4();
    WeekRow {
      week_id,
      title: "Week 1".into(),
      description: None,
      order_index: 1,
      is_locked: false,
      available_from: None,
      days: vec![DayRow {
        day_id:      Uuid::new_v4(),
        week_id,
        title:       "Day 1".into(),
        description: None,
        order_index: 1,
        video_url:   None,
        rutube_url:  None,
        date:        None,
        homework:    None,
      }],
      materials: vec![],
    }
  }

  #[tokio::test]
  async fn course_renders_store_contents() {
    let store = Arc::new(StubStore {
      weeks: vec![one_week()],
      ..Default::default()
    });

    let Json(weeks) =
      get_course(State(store), current(student_profile("s@example.com")))
        .await;
    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0].title, "Week 1");
    assert_eq!(weeks[0].days.len(), 1);
  }

  #[tokio::test]
  async fn read_failure_serves_the_full_sample_course() {
    let store = Arc::new(StubStore {
      weeks: vec![one_week()],
      fail_reads: true,
      ..Default::default()
    });

    let Json(weeks) =
      get_course(State(store), current(student_profile("s@example.com")))
        .await;
    // The whole sample, never a partial mix of real and sample data.
    assert_eq!(weeks, sample_course());
  }

  #[tokio::test]
  async fn get_day_reports_completion() {
    let week = one_week();
    let day_id = week.days[0].day_id;
    let store = Arc::new(StubStore {
      weeks: vec![week],
      completed: [day_id].into(),
      ..Default::default()
    });

    let Json(day) = get_day(
      State(store),
      current(student_profile("s@example.com")),
      Path(day_id),
    )
    .await
    .unwrap();
    assert!(day.is_completed);
    assert_eq!(day.title, "Day 1");
  }

  #[tokio::test]
  async fn completing_a_missing_day_is_not_found() {
    let store = Arc::new(StubStore::default());
    let result = complete_day(
      State(store),
      current(student_profile("s@example.com")),
      Path(Uuid::new_v4()),
    )
    .await;
    assert!(matches!(result, Err(ApiError::NotFound(_))));
  }
}
