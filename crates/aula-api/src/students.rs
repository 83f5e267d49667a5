//! Teacher view of the student roster.

use std::sync::Arc;

use axum::{Json, extract::State};

use aula_core::{store::CourseStore, user::Profile};

use crate::{auth::TeacherOnly, error::ApiError};

/// `GET /students` — newest registration first.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  TeacherOnly(_): TeacherOnly,
) -> Result<Json<Vec<Profile>>, ApiError>
where
  S: CourseStore,
{
  let students = store.list_students().await.map_err(ApiError::store)?;
  Ok(Json(students))
}
