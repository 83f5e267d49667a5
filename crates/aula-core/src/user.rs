//! Profiles and roles.
//!
//! The role is a closed enumeration, never a free-form string: every guard
//! in the API layer matches on it exhaustively.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// What a signed-in user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  Teacher,
}

impl Role {
  /// The string stored in the `role` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Student => "student",
      Self::Teacher => "teacher",
    }
  }

  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "student" => Ok(Self::Student),
      "teacher" => Ok(Self::Teacher),
      other => Err(Error::UnknownRole(other.to_string())),
    }
  }
}

/// A registered user of the portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub profile_id: Uuid,
  pub email:      String,
  pub full_name:  Option<String>,
  pub role:       Role,
  pub avatar_url: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Input for profile creation. The password hash is produced by the caller;
/// the store never sees a cleartext password.
#[derive(Debug, Clone)]
pub struct NewProfile {
  pub email:         String,
  pub full_name:     Option<String>,
  pub role:          Role,
  pub password_hash: String,
}

/// Fields a user can change about their own profile.
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
  pub full_name:  Option<String>,
  pub avatar_url: Option<String>,
}
