//! The downloadable resource library.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use uuid::Uuid;

use aula_core::{
  library::{LibraryItem, NewLibraryItem},
  store::CourseStore,
};

use crate::{
  auth::{CurrentUser, TeacherOnly},
  error::ApiError,
};

/// `GET /library` — title ascending.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  _user: CurrentUser,
) -> Result<Json<Vec<LibraryItem>>, ApiError>
where
  S: CourseStore,
{
  let items = store.list_library().await.map_err(ApiError::store)?;
  Ok(Json(items))
}

/// `POST /library`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  TeacherOnly(_): TeacherOnly,
  Json(body): Json<NewLibraryItem>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CourseStore,
{
  let item = store
    .create_library_item(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(item)))
}

/// `DELETE /library/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  TeacherOnly(_): TeacherOnly,
  Path(item_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  if store
    .delete_library_item(item_id)
    .await
    .map_err(ApiError::store)?
  {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("library item {item_id} not found")))
  }
}
