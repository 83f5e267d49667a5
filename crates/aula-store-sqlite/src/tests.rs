//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use aula_core::{
  content::{DayPatch, NewDay, NewMaterial, NewWeek, MaterialKind},
  library::{LibraryCategory, NewLibraryItem},
  store::CourseStore,
  stream::{NewLiveStream, NewStreamComment},
  user::{NewProfile, ProfilePatch, Role},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn student(email: &str) -> NewProfile {
  NewProfile {
    email:         email.into(),
    full_name:     Some("Test Student".into()),
    role:          Role::Student,
    password_hash: "$argon2id$fake".into(),
  }
}

fn week(title: &str, order_index: i64) -> NewWeek {
  NewWeek { title: title.into(), order_index }
}

fn day(week_id: Uuid, title: &str, order_index: i64) -> NewDay {
  NewDay { week_id, title: title.into(), order_index }
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_profile() {
  let s = store().await;

  let p = s.create_profile(student("a@example.com")).await.unwrap();
  assert_eq!(p.role, Role::Student);

  let fetched = s.get_profile(p.profile_id).await.unwrap().unwrap();
  assert_eq!(fetched.profile_id, p.profile_id);
  assert_eq!(fetched.email, "a@example.com");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.create_profile(student("dup@example.com")).await.unwrap();

  let err = s
    .create_profile(student("dup@example.com"))
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::EmailTaken(e) if e == "dup@example.com"));
}

#[tokio::test]
async fn profile_by_email_returns_hash() {
  let s = store().await;
  let p = s.create_profile(student("login@example.com")).await.unwrap();

  let (fetched, hash) = s
    .profile_by_email("login@example.com".into())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(fetched.profile_id, p.profile_id);
  assert_eq!(hash, "$argon2id$fake");

  let missing = s
    .profile_by_email("nobody@example.com".into())
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn list_students_excludes_teachers() {
  let s = store().await;
  s.create_profile(student("s1@example.com")).await.unwrap();
  s.create_profile(NewProfile {
    email:         "t@example.com".into(),
    full_name:     None,
    role:          Role::Teacher,
    password_hash: "$argon2id$fake".into(),
  })
  .await
  .unwrap();

  let students = s.list_students().await.unwrap();
  assert_eq!(students.len(), 1);
  assert_eq!(students[0].email, "s1@example.com");
}

#[tokio::test]
async fn update_profile_patches_only_given_fields() {
  let s = store().await;
  let p = s.create_profile(student("patch@example.com")).await.unwrap();

  s.update_profile(p.profile_id, ProfilePatch {
    full_name:  Some("Renamed".into()),
    avatar_url: None,
  })
  .await
  .unwrap();

  let fetched = s.get_profile(p.profile_id).await.unwrap().unwrap();
  assert_eq!(fetched.full_name.as_deref(), Some("Renamed"));
  assert!(fetched.avatar_url.is_none());
}

#[tokio::test]
async fn update_missing_profile_errors() {
  let s = store().await;
  let err = s
    .update_profile(Uuid::new_v4(), ProfilePatch::default())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::ProfileNotFound(_)));
}

// ─── Sessions ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_roundtrip_and_logout() {
  let s = store().await;
  let p = s.create_profile(student("sess@example.com")).await.unwrap();

  s.create_session(p.profile_id, "hash-1".into())
    .await
    .unwrap();

  let found = s.session_profile("hash-1".into()).await.unwrap().unwrap();
  assert_eq!(found.profile_id, p.profile_id);

  s.delete_session("hash-1".into()).await.unwrap();
  assert!(s.session_profile("hash-1".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn unknown_session_token_is_none() {
  let s = store().await;
  assert!(s.session_profile("nope".into()).await.unwrap().is_none());
}

// ─── Password reset ──────────────────────────────────────────────────────────

#[tokio::test]
async fn reset_token_is_single_use() {
  let s = store().await;
  let p = s.create_profile(student("reset@example.com")).await.unwrap();

  s.create_reset_token(p.profile_id, "reset-1".into())
    .await
    .unwrap();

  let first = s.consume_reset_token("reset-1".into()).await.unwrap();
  assert_eq!(first, Some(p.profile_id));

  let second = s.consume_reset_token("reset-1".into()).await.unwrap();
  assert!(second.is_none());
}

// ─── Weeks and days ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_week_and_list() {
  let s = store().await;
  s.create_week(week("Week 2", 2)).await.unwrap();
  s.create_week(week("Week 1", 1)).await.unwrap();

  let weeks = s.course_weeks().await.unwrap();
  assert_eq!(weeks.len(), 2);
  assert_eq!(weeks[0].title, "Week 1");
  assert_eq!(weeks[1].title, "Week 2");
  assert!(!weeks[0].is_locked);
  assert!(weeks[0].available_from.is_none());
}

#[tokio::test]
async fn rename_and_lock_week() {
  let s = store().await;
  let w = s.create_week(week("Draft", 1)).await.unwrap();

  s.rename_week(w.week_id, "Final".into()).await.unwrap();
  s.set_week_locked(w.week_id, true).await.unwrap();
  let from = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
  s.set_week_availability(w.week_id, Some(from)).await.unwrap();

  let weeks = s.course_weeks().await.unwrap();
  assert_eq!(weeks[0].title, "Final");
  assert!(weeks[0].is_locked);
  assert_eq!(weeks[0].available_from, Some(from));
}

#[tokio::test]
async fn rename_missing_week_errors() {
  let s = store().await;
  let err = s
    .rename_week(Uuid::new_v4(), "x".into())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::WeekNotFound(_)));
}

#[tokio::test]
async fn update_day_patch_leaves_other_fields() {
  let s = store().await;
  let w = s.create_week(week("W", 1)).await.unwrap();
  let d = s.create_day(day(w.week_id, "Day 1", 1)).await.unwrap();

  s.update_day(d.day_id, DayPatch {
    video_url: Some("https://youtu.be/abc".into()),
    homework: Some("Read chapter 2".into()),
    ..Default::default()
  })
  .await
  .unwrap();

  let fetched = s.get_day(d.day_id).await.unwrap().unwrap();
  assert_eq!(fetched.title, "Day 1");
  assert_eq!(fetched.video_url.as_deref(), Some("https://youtu.be/abc"));
  assert_eq!(fetched.homework.as_deref(), Some("Read chapter 2"));
  assert!(fetched.description.is_none());
}

#[tokio::test]
async fn delete_week_cascades_to_days_and_materials() {
  let s = store().await;
  let w = s.create_week(week("W", 1)).await.unwrap();
  let d = s.create_day(day(w.week_id, "D", 1)).await.unwrap();
  s.add_material(NewMaterial {
    title:       "Slides".into(),
    kind:        MaterialKind::SlideDeck,
    url:         "https://example.com/slides.pptx".into(),
    week_id:     None,
    day_id:      Some(d.day_id),
    is_homework: false,
  })
  .await
  .unwrap();

  assert!(s.delete_week(w.week_id).await.unwrap());
  assert!(s.get_day(d.day_id).await.unwrap().is_none());
  assert!(s.day_materials(d.day_id).await.unwrap().is_empty());

  // second delete is a no-op
  assert!(!s.delete_week(w.week_id).await.unwrap());
}

// ─── Materials ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn material_must_have_exactly_one_parent() {
  let s = store().await;
  let w = s.create_week(week("W", 1)).await.unwrap();
  let d = s.create_day(day(w.week_id, "D", 1)).await.unwrap();

  let both = NewMaterial {
    title:       "Bad".into(),
    kind:        MaterialKind::Pdf,
    url:         "https://example.com/a.pdf".into(),
    week_id:     Some(w.week_id),
    day_id:      Some(d.day_id),
    is_homework: false,
  };
  let err = s.add_material(both).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(aula_core::Error::AmbiguousMaterialParent)
  ));

  let neither = NewMaterial {
    title:       "Bad".into(),
    kind:        MaterialKind::Pdf,
    url:         "https://example.com/a.pdf".into(),
    week_id:     None,
    day_id:      None,
    is_homework: false,
  };
  assert!(s.add_material(neither).await.is_err());
}

#[tokio::test]
async fn course_weeks_attaches_week_and_day_materials() {
  let s = store().await;
  let w = s.create_week(week("W", 1)).await.unwrap();
  let d = s.create_day(day(w.week_id, "D", 1)).await.unwrap();

  s.add_material(NewMaterial {
    title:       "Week handout".into(),
    kind:        MaterialKind::Pdf,
    url:         "https://example.com/handout.pdf".into(),
    week_id:     Some(w.week_id),
    day_id:      None,
    is_homework: false,
  })
  .await
  .unwrap();
  s.add_material(NewMaterial {
    title:       "Day homework".into(),
    kind:        MaterialKind::Document,
    url:         "https://example.com/hw.docx".into(),
    week_id:     None,
    day_id:      Some(d.day_id),
    is_homework: true,
  })
  .await
  .unwrap();

  let weeks = s.course_weeks().await.unwrap();
  assert_eq!(weeks.len(), 1);
  assert_eq!(weeks[0].days.len(), 1);
  assert_eq!(weeks[0].materials.len(), 2);

  let day_mats = s.day_materials(d.day_id).await.unwrap();
  assert_eq!(day_mats.len(), 1);
  assert_eq!(day_mats[0].title, "Day homework");
  assert!(day_mats[0].is_homework);
}

// ─── Progress ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn completion_is_idempotent_and_reversible() {
  let s = store().await;
  let p = s.create_profile(student("prog@example.com")).await.unwrap();
  let w = s.create_week(week("W", 1)).await.unwrap();
  let d = s.create_day(day(w.week_id, "D", 1)).await.unwrap();

  s.set_day_completion(p.profile_id, d.day_id, true)
    .await
    .unwrap();
  s.set_day_completion(p.profile_id, d.day_id, true)
    .await
    .unwrap();

  let done = s.completed_days(p.profile_id).await.unwrap();
  assert_eq!(done.len(), 1);
  assert!(done.contains(&d.day_id));

  s.set_day_completion(p.profile_id, d.day_id, false)
    .await
    .unwrap();
  assert!(s.completed_days(p.profile_id).await.unwrap().is_empty());
}

// ─── Streams ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn streams_listed_newest_first_with_ordered_comments() {
  let s = store().await;
  let p = s.create_profile(student("chat@example.com")).await.unwrap();

  let older = s
    .create_stream(NewLiveStream {
      title:          "Kickoff".into(),
      date:           Utc.with_ymd_and_hms(2026, 1, 5, 18, 0, 0).unwrap(),
      video_url:      None,
      rutube_url:     None,
      description:    None,
      topics:         None,
      best_questions: None,
    })
    .await
    .unwrap();
  let newer = s
    .create_stream(NewLiveStream {
      title:          "Q&A".into(),
      date:           Utc.with_ymd_and_hms(2026, 2, 5, 18, 0, 0).unwrap(),
      video_url:      Some("https://youtu.be/xyz".into()),
      rutube_url:     None,
      description:    Some("Open questions".into()),
      topics:         None,
      best_questions: None,
    })
    .await
    .unwrap();

  let streams = s.list_streams().await.unwrap();
  assert_eq!(streams.len(), 2);
  assert_eq!(streams[0].stream_id, newer.stream_id);
  assert_eq!(streams[1].stream_id, older.stream_id);

  s.add_stream_comment(NewStreamComment {
    stream_id: older.stream_id,
    author_id: p.profile_id,
    body:      "first".into(),
  })
  .await
  .unwrap();
  s.add_stream_comment(NewStreamComment {
    stream_id: older.stream_id,
    author_id: p.profile_id,
    body:      "second".into(),
  })
  .await
  .unwrap();

  let comments = s.stream_comments(older.stream_id).await.unwrap();
  assert_eq!(comments.len(), 2);
  assert_eq!(comments[0].body, "first");
  assert_eq!(comments[1].body, "second");

  assert!(s.delete_stream(older.stream_id).await.unwrap());
  assert!(s.stream_comments(older.stream_id).await.unwrap().is_empty());
}

// ─── Library ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn library_sorted_by_title() {
  let s = store().await;

  for (title, category) in [
    ("Zettelkasten guide", LibraryCategory::Guide),
    ("Budget table", LibraryCategory::Table),
    ("Morning checklist", LibraryCategory::Checklist),
  ] {
    s.create_library_item(NewLibraryItem {
      title:       title.into(),
      category,
      file_url:    "https://example.com/f".into(),
      description: None,
    })
    .await
    .unwrap();
  }

  let items = s.list_library().await.unwrap();
  let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
  assert_eq!(titles, [
    "Budget table",
    "Morning checklist",
    "Zettelkasten guide"
  ]);

  let id = items[0].item_id;
  assert!(s.delete_library_item(id).await.unwrap());
  assert!(!s.delete_library_item(id).await.unwrap());
}
