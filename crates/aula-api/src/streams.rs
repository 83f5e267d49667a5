//! Live stream listing, comments, and teacher CRUD.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aula_core::{
  store::CourseStore,
  stream::{LiveStream, NewLiveStream, NewStreamComment, StreamComment, split_by_date},
  video::embed_url,
};

use crate::{
  auth::{CurrentUser, TeacherOnly},
  error::ApiError,
};

/// Streams partitioned around the request time.
#[derive(Debug, Serialize)]
pub struct StreamsResponse {
  pub upcoming: Vec<LiveStream>,
  pub past:     Vec<LiveStream>,
}

/// `GET /streams`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  _user: CurrentUser,
) -> Result<Json<StreamsResponse>, ApiError>
where
  S: CourseStore,
{
  let streams = store.list_streams().await.map_err(ApiError::store)?;
  let (upcoming, past) = split_by_date(streams, Utc::now());
  Ok(Json(StreamsResponse { upcoming, past }))
}

/// `POST /streams` — video links are normalised to embed URLs on the way
/// in, like day videos.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  TeacherOnly(_): TeacherOnly,
  Json(mut body): Json<NewLiveStream>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CourseStore,
{
  body.video_url = body.video_url.as_deref().map(embed_url);
  body.rutube_url = body.rutube_url.as_deref().map(embed_url);

  let stream = store.create_stream(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(stream)))
}

/// `DELETE /streams/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  TeacherOnly(_): TeacherOnly,
  Path(stream_id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  if store
    .delete_stream(stream_id)
    .await
    .map_err(ApiError::store)?
  {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("stream {stream_id} not found")))
  }
}

/// `GET /streams/{id}/comments` — oldest first.
pub async fn comments<S>(
  State(store): State<Arc<S>>,
  _user: CurrentUser,
  Path(stream_id): Path<Uuid>,
) -> Result<Json<Vec<StreamComment>>, ApiError>
where
  S: CourseStore,
{
  let comments = store
    .stream_comments(stream_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(comments))
}

#[derive(Debug, Deserialize)]
pub struct NewCommentBody {
  pub body: String,
}

/// `POST /streams/{id}/comments` — the author is always the caller.
pub async fn add_comment<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Path(stream_id): Path<Uuid>,
  Json(body): Json<NewCommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CourseStore,
{
  if body.body.trim().is_empty() {
    return Err(ApiError::BadRequest("comment body is empty".into()));
  }

  let comment = store
    .add_stream_comment(NewStreamComment {
      stream_id,
      author_id: user.profile.profile_id,
      body: body.body,
    })
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(comment)))
}
