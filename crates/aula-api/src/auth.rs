//! Session auth: registration, login, bearer-token extraction, password
//! lifecycle.
//!
//! Tokens are 32 random bytes, hex-encoded. Only a SHA-256 digest of the
//! token is ever stored, so a leaked database cannot be replayed against the
//! API. Passwords are argon2 PHC strings.

use std::sync::Arc;

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{
  Json,
  extract::{FromRequestParts, State},
  http::{HeaderMap, StatusCode, request::Parts},
  response::IntoResponse,
};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use aula_core::{
  store::CourseStore,
  user::{NewProfile, Profile, ProfilePatch, Role},
};

use crate::error::ApiError;

const MIN_PASSWORD_LEN: usize = 6;

// ─── Token and password primitives ───────────────────────────────────────────

/// A fresh bearer token: 32 random bytes, hex-encoded.
pub fn new_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// The digest under which a token is stored.
pub fn token_digest(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

/// Hash a cleartext password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Store(e.to_string().into()))
}

/// Verify a cleartext password against a stored PHC string. Malformed
/// stored hashes count as a failed verification.
pub fn verify_password(password: &str, phc: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(phc) else {
    return false;
  };
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .is_ok()
}

// ─── Extractors ──────────────────────────────────────────────────────────────

/// The authenticated caller, resolved from the `Authorization: Bearer`
/// header via the session table.
pub struct CurrentUser {
  pub profile:    Profile,
  /// Digest of the presented token, kept so logout can remove the session.
  pub token_hash: String,
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
  headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .ok_or(ApiError::Unauthorized)
}

/// Resolve the caller directly from headers — used by handlers outside the
/// API router (e.g. the upload endpoint) that authenticate manually.
pub async fn authenticate<S>(
  headers: &HeaderMap,
  store: &S,
) -> Result<CurrentUser, ApiError>
where
  S: CourseStore,
{
  let token_hash = token_digest(bearer_token(headers)?);
  let profile = store
    .session_profile(token_hash.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or(ApiError::Unauthorized)?;
  Ok(CurrentUser { profile, token_hash })
}

impl<S> FromRequestParts<Arc<S>> for CurrentUser
where
  S: CourseStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    store: &Arc<S>,
  ) -> Result<Self, Self::Rejection> {
    authenticate(&parts.headers, store.as_ref()).await
  }
}

/// Like [`CurrentUser`], but rejects callers without the teacher role.
/// Present in a handler's signature means the route is teacher-only.
pub struct TeacherOnly(pub Profile);

impl<S> FromRequestParts<Arc<S>> for TeacherOnly
where
  S: CourseStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    store: &Arc<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = CurrentUser::from_request_parts(parts, store).await?;
    match user.profile.role {
      Role::Teacher => Ok(TeacherOnly(user.profile)),
      Role::Student => {
        Err(ApiError::Forbidden("teacher role required".into()))
      }
    }
  }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub email:     String,
  pub full_name: Option<String>,
  pub password:  String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

/// Returned by register and login: the cleartext token (shown exactly once)
/// plus the signed-in profile.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
  pub token:   String,
  pub profile: Profile,
}

fn check_password_strength(password: &str) -> Result<(), ApiError> {
  if password.chars().count() < MIN_PASSWORD_LEN {
    return Err(ApiError::BadRequest(format!(
      "password must be at least {MIN_PASSWORD_LEN} characters"
    )));
  }
  Ok(())
}

/// `POST /auth/register` — always creates a student account. Teacher
/// accounts are seeded from the server CLI, never over HTTP.
pub async fn register<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CourseStore,
{
  check_password_strength(&body.password)?;
  if !body.email.contains('@') {
    return Err(ApiError::BadRequest("invalid email address".into()));
  }

  if store
    .profile_by_email(body.email.clone())
    .await
    .map_err(ApiError::store)?
    .is_some()
  {
    return Err(ApiError::Conflict("email already registered".into()));
  }

  let profile = store
    .create_profile(NewProfile {
      email:         body.email,
      full_name:     body.full_name,
      role:          Role::Student,
      password_hash: hash_password(&body.password)?,
    })
    .await
    .map_err(ApiError::store)?;

  let token = new_token();
  store
    .create_session(profile.profile_id, token_digest(&token))
    .await
    .map_err(ApiError::store)?;

  Ok((StatusCode::CREATED, Json(SessionResponse { token, profile })))
}

/// `POST /auth/login`
pub async fn login<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<SessionResponse>, ApiError>
where
  S: CourseStore,
{
  let Some((profile, stored_hash)) = store
    .profile_by_email(body.email)
    .await
    .map_err(ApiError::store)?
  else {
    return Err(ApiError::Unauthorized);
  };

  if !verify_password(&body.password, &stored_hash) {
    return Err(ApiError::Unauthorized);
  }

  let token = new_token();
  store
    .create_session(profile.profile_id, token_digest(&token))
    .await
    .map_err(ApiError::store)?;

  Ok(Json(SessionResponse { token, profile }))
}

/// `POST /auth/logout` — removes the presented session.
pub async fn logout<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  store
    .delete_session(user.token_hash)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /auth/session` — the profile behind the presented token.
pub async fn session<S>(user: CurrentUser) -> Json<Profile>
where
  S: CourseStore,
{
  Json(user.profile)
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordBody {
  pub email: String,
}

/// Issued reset token. Delivery to the user is out of scope; the caller
/// relays it.
#[derive(Debug, Serialize)]
pub struct ResetIssued {
  pub reset_token: String,
}

/// `POST /auth/forgot-password`
pub async fn forgot_password<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<ForgotPasswordBody>,
) -> Result<Json<ResetIssued>, ApiError>
where
  S: CourseStore,
{
  let Some((profile, _)) = store
    .profile_by_email(body.email)
    .await
    .map_err(ApiError::store)?
  else {
    return Err(ApiError::NotFound("no account with that email".into()));
  };

  let token = new_token();
  store
    .create_reset_token(profile.profile_id, token_digest(&token))
    .await
    .map_err(ApiError::store)?;

  Ok(Json(ResetIssued { reset_token: token }))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordBody {
  pub token:    String,
  pub password: String,
}

/// `POST /auth/reset-password` — consumes the token; single use.
pub async fn reset_password<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<ResetPasswordBody>,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  check_password_strength(&body.password)?;

  let profile_id = store
    .consume_reset_token(token_digest(&body.token))
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::BadRequest("invalid or already used reset token".into())
    })?;

  store
    .set_password_hash(profile_id, hash_password(&body.password)?)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordBody {
  pub current_password: String,
  pub new_password:     String,
}

/// `POST /auth/password` — authenticated change; re-checks the current
/// password.
pub async fn change_password<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Json(body): Json<ChangePasswordBody>,
) -> Result<StatusCode, ApiError>
where
  S: CourseStore,
{
  check_password_strength(&body.new_password)?;

  let Some((_, stored_hash)) = store
    .profile_by_email(user.profile.email.clone())
    .await
    .map_err(ApiError::store)?
  else {
    return Err(ApiError::Unauthorized);
  };

  if !verify_password(&body.current_password, &stored_hash) {
    return Err(ApiError::Unauthorized);
  }

  store
    .set_password_hash(user.profile.profile_id, hash_password(&body.new_password)?)
    .await
    .map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /auth/profile` — returns the updated profile.
pub async fn patch_profile<S>(
  State(store): State<Arc<S>>,
  user: CurrentUser,
  Json(patch): Json<ProfilePatch>,
) -> Result<Json<Profile>, ApiError>
where
  S: CourseStore,
{
  store
    .update_profile(user.profile.profile_id, patch)
    .await
    .map_err(ApiError::store)?;

  let profile = store
    .get_profile(user.profile.profile_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("profile vanished".into()))?;
  Ok(Json(profile))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::http::{Request, header};

  use super::*;
  use crate::test_store::{StubStore, student_profile, teacher_profile};

  async fn extract_user(
    req: Request<axum::body::Body>,
    store: &Arc<StubStore>,
  ) -> Result<CurrentUser, ApiError> {
    let (mut parts, _) = req.into_parts();
    CurrentUser::from_request_parts(&mut parts, store).await
  }

  fn bearer(token: &str) -> String { format!("Bearer {token}") }

  #[tokio::test]
  async fn valid_token_resolves_profile() {
    let token = new_token();
    let profile = student_profile("alice@example.com");
    let store = Arc::new(StubStore {
      session: Some((token_digest(&token), profile.clone())),
      ..Default::default()
    });

    let req = Request::builder()
      .header(header::AUTHORIZATION, bearer(&token))
      .body(axum::body::Body::empty())
      .unwrap();
    let user = extract_user(req, &store).await.unwrap();
    assert_eq!(user.profile.profile_id, profile.profile_id);
    assert_eq!(user.token_hash, token_digest(&token));
  }

  #[tokio::test]
  async fn unknown_token_is_unauthorized() {
    let store = Arc::new(StubStore::default());
    let req = Request::builder()
      .header(header::AUTHORIZATION, bearer(&new_token()))
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract_user(req, &store).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn missing_header_is_unauthorized() {
    let store = Arc::new(StubStore::default());
    let req = Request::builder()
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract_user(req, &store).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn basic_scheme_is_rejected() {
    let store = Arc::new(StubStore::default());
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract_user(req, &store).await,
      Err(ApiError::Unauthorized)
    ));
  }

  #[tokio::test]
  async fn teacher_guard_rejects_students() {
    let token = new_token();
    let store = Arc::new(StubStore {
      session: Some((token_digest(&token), student_profile("s@example.com"))),
      ..Default::default()
    });
    let req = Request::builder()
      .header(header::AUTHORIZATION, bearer(&token))
      .body(axum::body::Body::empty())
      .unwrap();
    let (mut parts, _) = req.into_parts();
    let result = TeacherOnly::from_request_parts(&mut parts, &store).await;
    assert!(matches!(result, Err(ApiError::Forbidden(_))));
  }

  #[tokio::test]
  async fn teacher_guard_admits_teachers() {
    let token = new_token();
    let store = Arc::new(StubStore {
      session: Some((token_digest(&token), teacher_profile("t@example.com"))),
      ..Default::default()
    });
    let req = Request::builder()
      .header(header::AUTHORIZATION, bearer(&token))
      .body(axum::body::Body::empty())
      .unwrap();
    let (mut parts, _) = req.into_parts();
    let result = TeacherOnly::from_request_parts(&mut parts, &store).await;
    assert!(result.is_ok());
  }

  #[test]
  fn password_hash_roundtrip() {
    let hash = hash_password("hunter42").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("hunter42", &hash));
    assert!(!verify_password("hunter43", &hash));
  }

  #[test]
  fn malformed_stored_hash_fails_closed() {
    assert!(!verify_password("anything", "not-a-phc-string"));
  }

  #[test]
  fn tokens_are_unique_and_digests_stable() {
    let a = new_token();
    let b = new_token();
    assert_ne!(a, b);
    assert_eq!(a.len(), 64);
    assert_eq!(token_digest(&a), token_digest(&a));
    assert_eq!(token_digest(&a).len(), 64);
  }
}
