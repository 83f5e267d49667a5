//! Course tree assembly — raw nested rows to ordered week view models.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::content::{Day, Week, WeekRow};

/// A week is locked if its stored flag says so, or if its availability date
/// has not yet passed. Derived on every fetch and never cached, so a week
/// can flip to unlocked between two requests with no explicit event.
pub fn week_is_locked(
  flag:           bool,
  available_from: Option<DateTime<Utc>>,
  now:            DateTime<Utc>,
) -> bool {
  flag || available_from.is_some_and(|from| from > now)
}

/// Assemble ordered week view models from raw rows plus the requesting
/// user's completion set.
///
/// Week order is preserved from the store (sorted by order index at the
/// query level). Days are stable-sorted by order index, so rows sharing an
/// index keep their insertion order. A material attaches to a day when its
/// `day_id` matches, and to the week itself when only its `week_id` is set.
pub fn build_course_tree(
  rows:      Vec<WeekRow>,
  completed: &HashSet<Uuid>,
  now:       DateTime<Utc>,
) -> Vec<Week> {
  rows
    .into_iter()
    .map(|row| {
      let is_locked = week_is_locked(row.is_locked, row.available_from, now);

      let mut day_rows = row.days;
      day_rows.sort_by_key(|d| d.order_index);

      let days = day_rows
        .into_iter()
        .map(|d| {
          let materials = row
            .materials
            .iter()
            .filter(|m| m.day_id == Some(d.day_id))
            .cloned()
            .map(|m| m.into_material())
            .collect();
          let is_completed = completed.contains(&d.day_id);
          Day::assemble(d, materials, is_completed)
        })
        .collect();

      let week_materials = row
        .materials
        .into_iter()
        .filter(|m| m.week_id == Some(row.week_id) && m.day_id.is_none())
        .map(|m| m.into_material())
        .collect();

      Week {
        week_id: row.week_id,
        title: row.title,
        description: row.description,
        order_index: row.order_index,
        is_locked,
        available_from: row.available_from,
        days,
        week_materials,
      }
    })
    .collect()
}
