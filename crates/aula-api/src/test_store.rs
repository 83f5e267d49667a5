//! A configurable in-memory stub store for handler and extractor tests.

use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use aula_core::{
  content::{
    DayPatch, DayRow, MaterialRow, NewDay, NewMaterial, NewWeek, WeekRow,
  },
  library::{LibraryItem, NewLibraryItem},
  store::CourseStore,
  stream::{LiveStream, NewLiveStream, NewStreamComment, StreamComment},
  user::{NewProfile, Profile, ProfilePatch, Role},
};

pub fn student_profile(email: &str) -> Profile {
  Profile {
    profile_id: Uuid::new_v4(),
    email:      email.into(),
    full_name:  None,
    role:       Role::Student,
    avatar_url: None,
    created_at: Utc::now(),
  }
}

pub fn teacher_profile(email: &str) -> Profile {
  Profile {
    role: Role::Teacher,
    ..student_profile(email)
  }
}

/// Stub backend. Only the read paths the tests exercise are implemented;
/// everything else panics.
#[derive(Clone, Default)]
pub struct StubStore {
  pub weeks:      Vec<WeekRow>,
  pub completed:  HashSet<Uuid>,
  /// `(token_hash, profile)` for the one valid session.
  pub session:    Option<(String, Profile)>,
  /// When set, every content read fails with an I/O error.
  pub fail_reads: bool,
}

fn read_failure() -> std::io::Error {
  std::io::Error::other("stub backend failure")
}

impl CourseStore for StubStore {
  type Error = std::io::Error;

  async fn course_weeks(&self) -> Result<Vec<WeekRow>, Self::Error> {
    if self.fail_reads {
      return Err(read_failure());
    }
    Ok(self.weeks.clone())
  }

  async fn get_day(&self, day_id: Uuid) -> Result<Option<DayRow>, Self::Error> {
    if self.fail_reads {
      return Err(read_failure());
    }
    Ok(
      self
        .weeks
        .iter()
        .flat_map(|w| w.days.iter())
        .find(|d| d.day_id == day_id)
        .cloned(),
    )
  }

  async fn day_materials(
    &self,
    day_id: Uuid,
  ) -> Result<Vec<MaterialRow>, Self::Error> {
    if self.fail_reads {
      return Err(read_failure());
    }
    Ok(
      self
        .weeks
        .iter()
        .flat_map(|w| w.materials.iter())
        .filter(|m| m.day_id == Some(day_id))
        .cloned()
        .collect(),
    )
  }

  async fn completed_days(
    &self,
    _profile_id: Uuid,
  ) -> Result<HashSet<Uuid>, Self::Error> {
    if self.fail_reads {
      return Err(read_failure());
    }
    Ok(self.completed.clone())
  }

  async fn session_profile(
    &self,
    token_hash: String,
  ) -> Result<Option<Profile>, Self::Error> {
    Ok(self.session.as_ref().and_then(|(hash, profile)| {
      (*hash == token_hash).then(|| profile.clone())
    }))
  }

  async fn create_week(&self, _: NewWeek) -> Result<WeekRow, Self::Error> { unimplemented!() }
  async fn rename_week(&self, _: Uuid, _: String) -> Result<(), Self::Error> { unimplemented!() }
  async fn set_week_availability(&self, _: Uuid, _: Option<chrono::DateTime<Utc>>) -> Result<(), Self::Error> { unimplemented!() }
  async fn set_week_locked(&self, _: Uuid, _: bool) -> Result<(), Self::Error> { unimplemented!() }
  async fn delete_week(&self, _: Uuid) -> Result<bool, Self::Error> { unimplemented!() }
  async fn create_day(&self, _: NewDay) -> Result<DayRow, Self::Error> { unimplemented!() }
  async fn update_day(&self, _: Uuid, _: DayPatch) -> Result<(), Self::Error> { unimplemented!() }
  async fn delete_day(&self, _: Uuid) -> Result<bool, Self::Error> { unimplemented!() }
  async fn add_material(&self, _: NewMaterial) -> Result<MaterialRow, Self::Error> { unimplemented!() }
  async fn delete_material(&self, _: Uuid) -> Result<bool, Self::Error> { unimplemented!() }
  async fn set_day_completion(&self, _: Uuid, _: Uuid, _: bool) -> Result<(), Self::Error> { unimplemented!() }
  async fn list_streams(&self) -> Result<Vec<LiveStream>, Self::Error> { unimplemented!() }
  async fn create_stream(&self, _: NewLiveStream) -> Result<LiveStream, Self::Error> { unimplemented!() }
  async fn delete_stream(&self, _: Uuid) -> Result<bool, Self::Error> { unimplemented!() }
  async fn stream_comments(&self, _: Uuid) -> Result<Vec<StreamComment>, Self::Error> { unimplemented!() }
  async fn add_stream_comment(&self, _: NewStreamComment) -> Result<StreamComment, Self::Error> { unimplemented!() }
  async fn list_library(&self) -> Result<Vec<LibraryItem>, Self::Error> { unimplemented!() }
  async fn create_library_item(&self, _: NewLibraryItem) -> Result<LibraryItem, Self::Error> { unimplemented!() }
  async fn delete_library_item(&self, _: Uuid) -> Result<bool, Self::Error> { unimplemented!() }
  async fn create_profile(&self, _: NewProfile) -> Result<Profile, Self::Error> { unimplemented!() }
  async fn profile_by_email(&self, _: String) -> Result<Option<(Profile, String)>, Self::Error> { unimplemented!() }
  async fn get_profile(&self, _: Uuid) -> Result<Option<Profile>, Self::Error> { unimplemented!() }
  async fn list_students(&self) -> Result<Vec<Profile>, Self::Error> { unimplemented!() }
  async fn update_profile(&self, _: Uuid, _: ProfilePatch) -> Result<(), Self::Error> { unimplemented!() }
  async fn set_password_hash(&self, _: Uuid, _: String) -> Result<(), Self::Error> { unimplemented!() }
  async fn create_session(&self, _: Uuid, _: String) -> Result<(), Self::Error> { unimplemented!() }
  async fn delete_session(&self, _: String) -> Result<(), Self::Error> { unimplemented!() }
  async fn create_reset_token(&self, _: Uuid, _: String) -> Result<(), Self::Error> { unimplemented!() }
  async fn consume_reset_token(&self, _: String) -> Result<Option<Uuid>, Self::Error> { unimplemented!() }
}
