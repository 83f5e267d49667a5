//! Domain model for the Aula course portal: the week/day/material tree,
//! profiles and roles, live streams, the resource library, and the
//! [`store::CourseStore`] trait every backend implements.
//!
//! No HTTP or database dependency lives here; the API and store crates
//! both build on this one.

// Backends implement the store trait's `impl Future` methods with plain
// `async fn` (stabilised in Rust 1.75).
#![allow(async_fn_in_trait)]

pub mod content;
pub mod error;
pub mod library;
pub mod sample;
pub mod store;
pub mod stream;
pub mod tree;
pub mod user;
pub mod video;

pub use error::{Error, Result};
