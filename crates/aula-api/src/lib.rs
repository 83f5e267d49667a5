//! JSON REST API for the Aula course portal.
//!
//! Exposes an axum [`Router`] backed by any [`aula_core::store::CourseStore`].
//! TLS, static assets, and file uploads are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", aula_api::api_router(store.clone()))
//! ```

pub mod auth;
pub mod content;
pub mod course;
pub mod error;
pub mod library;
pub mod streams;
pub mod students;

#[cfg(test)]
pub(crate) mod test_store;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, patch, post, put},
};
use aula_core::store::CourseStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CourseStore + 'static,
{
  Router::new()
    // Auth and profile
    .route("/auth/register", post(auth::register::<S>))
    .route("/auth/login", post(auth::login::<S>))
    .route("/auth/logout", post(auth::logout::<S>))
    .route("/auth/session", get(auth::session::<S>))
    .route("/auth/forgot-password", post(auth::forgot_password::<S>))
    .route("/auth/reset-password", post(auth::reset_password::<S>))
    .route("/auth/password", post(auth::change_password::<S>))
    .route("/auth/profile", patch(auth::patch_profile::<S>))
    // Course tree and progress
    .route("/course", get(course::get_course::<S>))
    .route(
      "/days/{id}",
      get(course::get_day::<S>)
        .patch(content::update_day::<S>)
        .delete(content::delete_day::<S>),
    )
    .route(
      "/days/{id}/complete",
      put(course::complete_day::<S>).delete(course::uncomplete_day::<S>),
    )
    // Teacher CRUD
    .route("/weeks", post(content::create_week::<S>))
    .route(
      "/weeks/{id}",
      patch(content::update_week::<S>).delete(content::delete_week::<S>),
    )
    .route("/weeks/{id}/days", post(content::create_day::<S>))
    .route("/materials", post(content::add_material::<S>))
    .route("/materials/{id}", delete(content::delete_material::<S>))
    // Live streams
    .route(
      "/streams",
      get(streams::list::<S>).post(streams::create::<S>),
    )
    .route("/streams/{id}", delete(streams::delete::<S>))
    .route(
      "/streams/{id}/comments",
      get(streams::comments::<S>).post(streams::add_comment::<S>),
    )
    // Library
    .route(
      "/library",
      get(library::list::<S>).post(library::create::<S>),
    )
    .route("/library/{id}", delete(library::delete::<S>))
    // Roster
    .route("/students", get(students::list::<S>))
    .with_state(store)
}
