//! [`SqliteStore`] — the SQLite implementation of [`CourseStore`].

use std::{collections::HashSet, path::Path};

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use aula_core::{
  content::{
    DayPatch, DayRow, MaterialRow, NewDay, NewMaterial, NewWeek, WeekRow,
  },
  library::{LibraryItem, NewLibraryItem},
  store::CourseStore,
  stream::{LiveStream, NewLiveStream, NewStreamComment, StreamComment},
  user::{NewProfile, Profile, ProfilePatch},
};

use crate::{
  Error, Result,
  encode::{
    RawComment, RawDay, RawLibraryItem, RawMaterial, RawProfile, RawStream,
    RawWeek, decode_uuid, encode_date, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Aula course store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-statement UPDATE/DELETE and report whether a row matched.
  async fn execute_one(
    &self,
    sql: &'static str,
    params: Vec<String>,
  ) -> Result<bool> {
    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(sql, rusqlite::params_from_iter(params))?)
      })
      .await?;
    Ok(n > 0)
  }
}

// ─── CourseStore impl ────────────────────────────────────────────────────────

impl CourseStore for SqliteStore {
  type Error = Error;

  // ── Course content — reads ──────────────────────────────────────────────

  async fn course_weeks(&self) -> Result<Vec<WeekRow>> {
    // Three queries inside one connection call: weeks, all days, all
    // materials. Nesting happens here, ordering of days is the tree
    // builder's job.
    let (raw_weeks, raw_days, raw_materials) = self
      .conn
      .call(|conn| {
        let raw_weeks = {
          let mut stmt = conn.prepare(
            "SELECT week_id, title, description, order_index, is_locked, \
             available_from FROM weeks ORDER BY order_index ASC",
          )?;
          stmt
            .query_map([], |row| RawWeek::from_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let raw_days = {
          let mut stmt = conn.prepare(
            "SELECT day_id, week_id, title, description, order_index, \
             video_url, rutube_url, date, homework FROM days",
          )?;
          stmt
            .query_map([], |row| RawDay::from_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        let raw_materials = {
          let mut stmt = conn.prepare(
            "SELECT material_id, title, kind, url, week_id, day_id, \
             is_homework FROM materials",
          )?;
          stmt
            .query_map([], |row| RawMaterial::from_row(row))?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };

        Ok((raw_weeks, raw_days, raw_materials))
      })
      .await?;

    let days = raw_days
      .into_iter()
      .map(RawDay::into_day)
      .collect::<Result<Vec<_>>>()?;
    let materials = raw_materials
      .into_iter()
      .map(RawMaterial::into_material)
      .collect::<Result<Vec<_>>>()?;

    raw_weeks
      .into_iter()
      .map(|w| {
        let week_id = decode_uuid(&w.week_id)?;
        let week_days: Vec<DayRow> = days
          .iter()
          .filter(|d| d.week_id == week_id)
          .cloned()
          .collect();
        let day_ids: HashSet<Uuid> =
          week_days.iter().map(|d| d.day_id).collect();
        let week_materials = materials
          .iter()
          .filter(|m| {
            m.week_id == Some(week_id)
              || m.day_id.is_some_and(|d| day_ids.contains(&d))
          })
          .cloned()
          .collect();

        Ok(WeekRow {
          week_id,
          title: w.title,
          description: w.description,
          order_index: w.order_index,
          is_locked: w.is_locked,
          available_from: w
            .available_from
            .as_deref()
            .map(crate::encode::decode_dt)
            .transpose()?,
          days: week_days,
          materials: week_materials,
        })
      })
      .collect()
  }

  async fn get_day(&self, day_id: Uuid) -> Result<Option<DayRow>> {
    let id_str = encode_uuid(day_id);

    let raw: Option<RawDay> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT day_id, week_id, title, description, order_index, \
               video_url, rutube_url, date, homework FROM days \
               WHERE day_id = ?1",
              rusqlite::params![id_str],
              |row| RawDay::from_row(row),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDay::into_day).transpose()
  }

  async fn day_materials(&self, day_id: Uuid) -> Result<Vec<MaterialRow>> {
    let id_str = encode_uuid(day_id);

    let raws: Vec<RawMaterial> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT material_id, title, kind, url, week_id, day_id, \
           is_homework FROM materials WHERE day_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            RawMaterial::from_row(row)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMaterial::into_material).collect()
  }

  // ── Course content — teacher writes ─────────────────────────────────────

  async fn create_week(&self, input: NewWeek) -> Result<WeekRow> {
    let week = WeekRow {
      week_id:        Uuid::new_v4(),
      title:          input.title,
      description:    None,
      order_index:    input.order_index,
      is_locked:      false,
      available_from: None,
      days:           vec![],
      materials:      vec![],
    };

    let id_str = encode_uuid(week.week_id);
    let title = week.title.clone();
    let order_index = week.order_index;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO weeks (week_id, title, order_index) \
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, title, order_index],
        )?;
        Ok(())
      })
      .await?;

    Ok(week)
  }

  async fn rename_week(&self, week_id: Uuid, title: String) -> Result<()> {
    let renamed = self
      .execute_one(
        "UPDATE weeks SET title = ?2 WHERE week_id = ?1",
        vec![encode_uuid(week_id), title],
      )
      .await?;
    if !renamed {
      return Err(Error::WeekNotFound(week_id));
    }
    Ok(())
  }

  async fn set_week_availability(
    &self,
    week_id: Uuid,
    available_from: Option<DateTime<Utc>>,
  ) -> Result<()> {
    let id_str = encode_uuid(week_id);
    let from_str = available_from.map(encode_dt);

    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE weeks SET available_from = ?2 WHERE week_id = ?1",
          rusqlite::params![id_str, from_str],
        )?)
      })
      .await?;
    if n == 0 {
      return Err(Error::WeekNotFound(week_id));
    }
    Ok(())
  }

  async fn set_week_locked(&self, week_id: Uuid, locked: bool) -> Result<()> {
    let id_str = encode_uuid(week_id);

    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE weeks SET is_locked = ?2 WHERE week_id = ?1",
          rusqlite::params![id_str, locked],
        )?)
      })
      .await?;
    if n == 0 {
      return Err(Error::WeekNotFound(week_id));
    }
    Ok(())
  }

  async fn delete_week(&self, week_id: Uuid) -> Result<bool> {
    self
      .execute_one(
        "DELETE FROM weeks WHERE week_id = ?1",
        vec![encode_uuid(week_id)],
      )
      .await
  }

  async fn create_day(&self, input: NewDay) -> Result<DayRow> {
    let day = DayRow {
      day_id:      Uuid::new_v4(),
      week_id:     input.week_id,
      title:       input.title,
      description: None,
      order_index: input.order_index,
      video_url:   None,
      rutube_url:  None,
      date:        None,
      homework:    None,
    };

    let day_str = encode_uuid(day.day_id);
    let week_str = encode_uuid(day.week_id);
    let title = day.title.clone();
    let order_index = day.order_index;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO days (day_id, week_id, title, order_index) \
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![day_str, week_str, title, order_index],
        )?;
        Ok(())
      })
      .await?;

    Ok(day)
  }

  async fn update_day(&self, day_id: Uuid, patch: DayPatch) -> Result<()> {
    let id_str = encode_uuid(day_id);
    let date_str = patch.date.map(encode_date);

    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE days SET \
             title       = COALESCE(?2, title), \
             description = COALESCE(?3, description), \
             order_index = COALESCE(?4, order_index), \
             video_url   = COALESCE(?5, video_url), \
             rutube_url  = COALESCE(?6, rutube_url), \
             date        = COALESCE(?7, date), \
             homework    = COALESCE(?8, homework) \
           WHERE day_id = ?1",
          rusqlite::params![
            id_str,
            patch.title,
            patch.description,
            patch.order_index,
            patch.video_url,
            patch.rutube_url,
            date_str,
            patch.homework,
          ],
        )?)
      })
      .await?;
    if n == 0 {
      return Err(Error::DayNotFound(day_id));
    }
    Ok(())
  }

  async fn delete_day(&self, day_id: Uuid) -> Result<bool> {
    self
      .execute_one(
        "DELETE FROM days WHERE day_id = ?1",
        vec![encode_uuid(day_id)],
      )
      .await
  }

  async fn add_material(&self, input: NewMaterial) -> Result<MaterialRow> {
    // Re-check the parent invariant; the schema CHECK would also reject,
    // but this keeps the error typed.
    input.parent().map_err(Error::Core)?;

    let material = MaterialRow {
      material_id: Uuid::new_v4(),
      title:       input.title,
      kind:        input.kind,
      url:         input.url,
      week_id:     input.week_id,
      day_id:      input.day_id,
      is_homework: input.is_homework,
    };

    let id_str = encode_uuid(material.material_id);
    let title = material.title.clone();
    let kind_str = material.kind.as_str();
    let url = material.url.clone();
    let week_str = material.week_id.map(encode_uuid);
    let day_str = material.day_id.map(encode_uuid);
    let is_homework = material.is_homework;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO materials \
             (material_id, title, kind, url, week_id, day_id, is_homework) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            title,
            kind_str,
            url,
            week_str,
            day_str,
            is_homework
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(material)
  }

  async fn delete_material(&self, material_id: Uuid) -> Result<bool> {
    self
      .execute_one(
        "DELETE FROM materials WHERE material_id = ?1",
        vec![encode_uuid(material_id)],
      )
      .await
  }

  // ── Progress ────────────────────────────────────────────────────────────

  async fn completed_days(&self, profile_id: Uuid) -> Result<HashSet<Uuid>> {
    let id_str = encode_uuid(profile_id);

    let raw: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn
          .prepare("SELECT day_id FROM user_progress WHERE profile_id = ?1")?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raw.iter().map(|s| decode_uuid(s)).collect()
  }

  async fn set_day_completion(
    &self,
    profile_id: Uuid,
    day_id: Uuid,
    done: bool,
  ) -> Result<()> {
    let profile_str = encode_uuid(profile_id);
    let day_str = encode_uuid(day_id);

    self
      .conn
      .call(move |conn| {
        if done {
          conn.execute(
            "INSERT OR IGNORE INTO user_progress (profile_id, day_id) \
             VALUES (?1, ?2)",
            rusqlite::params![profile_str, day_str],
          )?;
        } else {
          conn.execute(
            "DELETE FROM user_progress WHERE profile_id = ?1 AND day_id = ?2",
            rusqlite::params![profile_str, day_str],
          )?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Live streams ────────────────────────────────────────────────────────

  async fn list_streams(&self) -> Result<Vec<LiveStream>> {
    let raws: Vec<RawStream> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT stream_id, title, date, video_url, rutube_url, \
           description, topics, best_questions, created_at \
           FROM live_streams ORDER BY date DESC",
        )?;
        let rows = stmt
          .query_map([], |row| RawStream::from_row(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStream::into_stream).collect()
  }

  async fn create_stream(&self, input: NewLiveStream) -> Result<LiveStream> {
    let stream = LiveStream {
      stream_id:      Uuid::new_v4(),
      title:          input.title,
      date:           input.date,
      video_url:      input.video_url,
      rutube_url:     input.rutube_url,
      description:    input.description,
      topics:         input.topics,
      best_questions: input.best_questions,
      created_at:     Utc::now(),
    };

    let s = stream.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO live_streams \
             (stream_id, title, date, video_url, rutube_url, description, \
              topics, best_questions, created_at) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            encode_uuid(s.stream_id),
            s.title,
            encode_dt(s.date),
            s.video_url,
            s.rutube_url,
            s.description,
            s.topics,
            s.best_questions,
            encode_dt(s.created_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(stream)
  }

  async fn delete_stream(&self, stream_id: Uuid) -> Result<bool> {
    self
      .execute_one(
        "DELETE FROM live_streams WHERE stream_id = ?1",
        vec![encode_uuid(stream_id)],
      )
      .await
  }

  async fn stream_comments(&self, stream_id: Uuid) -> Result<Vec<StreamComment>> {
    let id_str = encode_uuid(stream_id);

    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT comment_id, stream_id, author_id, body, created_at \
           FROM stream_comments WHERE stream_id = ?1 ORDER BY created_at ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            RawComment::from_row(row)
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  async fn add_stream_comment(
    &self,
    input: NewStreamComment,
  ) -> Result<StreamComment> {
    let comment = StreamComment {
      comment_id: Uuid::new_v4(),
      stream_id:  input.stream_id,
      author_id:  input.author_id,
      body:       input.body,
      created_at: Utc::now(),
    };

    let c = comment.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO stream_comments \
             (comment_id, stream_id, author_id, body, created_at) \
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            encode_uuid(c.comment_id),
            encode_uuid(c.stream_id),
            encode_uuid(c.author_id),
            c.body,
            encode_dt(c.created_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(comment)
  }

  // ── Library ─────────────────────────────────────────────────────────────

  async fn list_library(&self) -> Result<Vec<LibraryItem>> {
    let raws: Vec<RawLibraryItem> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT item_id, title, category, file_url, description, \
           created_at FROM library_items ORDER BY title ASC",
        )?;
        let rows = stmt
          .query_map([], |row| RawLibraryItem::from_row(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLibraryItem::into_item).collect()
  }

  async fn create_library_item(
    &self,
    input: NewLibraryItem,
  ) -> Result<LibraryItem> {
    let item = LibraryItem {
      item_id:     Uuid::new_v4(),
      title:       input.title,
      category:    input.category,
      file_url:    input.file_url,
      description: input.description,
      created_at:  Utc::now(),
    };

    let i = item.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO library_items \
             (item_id, title, category, file_url, description, created_at) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            encode_uuid(i.item_id),
            i.title,
            i.category.as_str(),
            i.file_url,
            i.description,
            encode_dt(i.created_at),
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(item)
  }

  async fn delete_library_item(&self, item_id: Uuid) -> Result<bool> {
    self
      .execute_one(
        "DELETE FROM library_items WHERE item_id = ?1",
        vec![encode_uuid(item_id)],
      )
      .await
  }

  // ── Profiles ────────────────────────────────────────────────────────────

  async fn create_profile(&self, input: NewProfile) -> Result<Profile> {
    let profile = Profile {
      profile_id: Uuid::new_v4(),
      email:      input.email,
      full_name:  input.full_name,
      role:       input.role,
      avatar_url: None,
      created_at: Utc::now(),
    };

    let p = profile.clone();
    let password_hash = input.password_hash;
    let result = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles \
             (profile_id, email, full_name, role, password_hash, created_at) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            encode_uuid(p.profile_id),
            p.email,
            p.full_name,
            p.role.as_str(),
            password_hash,
            encode_dt(p.created_at),
          ],
        )?;
        Ok(())
      })
      .await;

    match result {
      Ok(()) => Ok(profile),
      Err(e) if is_unique_violation(&e) => {
        Err(Error::EmailTaken(profile.email))
      }
      Err(e) => Err(e.into()),
    }
  }

  async fn profile_by_email(
    &self,
    email: String,
  ) -> Result<Option<(Profile, String)>> {
    let raw: Option<(RawProfile, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT profile_id, email, full_name, role, avatar_url, \
               created_at, password_hash FROM profiles WHERE email = ?1",
              rusqlite::params![email],
              |row| Ok((RawProfile::from_row(row)?, row.get(6)?)),
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(p, hash)| Ok((p.into_profile()?, hash)))
      .transpose()
  }

  async fn get_profile(&self, profile_id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(profile_id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT profile_id, email, full_name, role, avatar_url, \
               created_at FROM profiles WHERE profile_id = ?1",
              rusqlite::params![id_str],
              |row| RawProfile::from_row(row),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn list_students(&self) -> Result<Vec<Profile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT profile_id, email, full_name, role, avatar_url, \
           created_at FROM profiles WHERE role = 'student' \
           ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map([], |row| RawProfile::from_row(row))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn update_profile(
    &self,
    profile_id: Uuid,
    patch: ProfilePatch,
  ) -> Result<()> {
    let id_str = encode_uuid(profile_id);

    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE profiles SET \
             full_name  = COALESCE(?2, full_name), \
             avatar_url = COALESCE(?3, avatar_url) \
           WHERE profile_id = ?1",
          rusqlite::params![id_str, patch.full_name, patch.avatar_url],
        )?)
      })
      .await?;
    if n == 0 {
      return Err(Error::ProfileNotFound(profile_id));
    }
    Ok(())
  }

  async fn set_password_hash(
    &self,
    profile_id: Uuid,
    password_hash: String,
  ) -> Result<()> {
    let updated = self
      .execute_one(
        "UPDATE profiles SET password_hash = ?2 WHERE profile_id = ?1",
        vec![encode_uuid(profile_id), password_hash],
      )
      .await?;
    if !updated {
      return Err(Error::ProfileNotFound(profile_id));
    }
    Ok(())
  }

  // ── Sessions ────────────────────────────────────────────────────────────

  async fn create_session(
    &self,
    profile_id: Uuid,
    token_hash: String,
  ) -> Result<()> {
    let profile_str = encode_uuid(profile_id);
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, profile_id, created_at) \
           VALUES (?1, ?2, ?3)",
          rusqlite::params![token_hash, profile_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn session_profile(&self, token_hash: String) -> Result<Option<Profile>> {
    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT p.profile_id, p.email, p.full_name, p.role, \
               p.avatar_url, p.created_at \
               FROM sessions s JOIN profiles p USING (profile_id) \
               WHERE s.token_hash = ?1",
              rusqlite::params![token_hash],
              |row| RawProfile::from_row(row),
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn delete_session(&self, token_hash: String) -> Result<()> {
    self
      .execute_one("DELETE FROM sessions WHERE token_hash = ?1", vec![
        token_hash,
      ])
      .await?;
    Ok(())
  }

  // ── Password reset ──────────────────────────────────────────────────────

  async fn create_reset_token(
    &self,
    profile_id: Uuid,
    token_hash: String,
  ) -> Result<()> {
    let profile_str = encode_uuid(profile_id);
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO password_resets (token_hash, profile_id, created_at) \
           VALUES (?1, ?2, ?3)",
          rusqlite::params![token_hash, profile_str, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn consume_reset_token(&self, token_hash: String) -> Result<Option<Uuid>> {
    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        let found: Option<String> = conn
          .query_row(
            "SELECT profile_id FROM password_resets WHERE token_hash = ?1",
            rusqlite::params![token_hash],
            |row| row.get(0),
          )
          .optional()?;

        if found.is_some() {
          conn.execute(
            "DELETE FROM password_resets WHERE token_hash = ?1",
            rusqlite::params![token_hash],
          )?;
        }

        Ok(found)
      })
      .await?;

    raw.as_deref().map(decode_uuid).transpose()
  }
}

/// Detect a UNIQUE-constraint violation inside the tokio wrapper's error.
fn is_unique_violation(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _))
      if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}
