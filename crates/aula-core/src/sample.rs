//! The fixed fallback course.
//!
//! Served whenever the live store errors so the portal never renders empty.
//! Deterministic by construction: stable IDs, no clock reads, no I/O.

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::content::{Day, Material, MaterialKind, Week};

fn id(n: u128) -> Uuid { Uuid::from_u128(n) }

fn far_future() -> DateTime<Utc> {
  // A date safely past any realistic request time; the sample's second
  // week is meant to render locked.
  Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap()
}

/// The sample course substituted on any fetch failure. Every call returns
/// the same structure — never partial, never empty.
pub fn sample_course() -> Vec<Week> {
  vec![
    Week {
      week_id:        id(0x5a01),
      title:          "Week 1. Getting Oriented".to_string(),
      description:    Some(
        "An introduction to the course: philosophy, scope, and how to work \
         through the weekly material."
          .to_string(),
      ),
      order_index:    1,
      is_locked:      false,
      available_from: None,
      week_materials: vec![
        Material {
          material_id: id(0x5a11),
          title:       "Glossary of terms".to_string(),
          kind:        MaterialKind::Pdf,
          url:         "#".to_string(),
          is_homework: false,
        },
        Material {
          material_id: id(0x5a12),
          title:       "Reading list".to_string(),
          kind:        MaterialKind::Document,
          url:         "#".to_string(),
          is_homework: false,
        },
      ],
      days:           vec![
        Day {
          day_id:       id(0x5a21),
          title:        "Day 1. What this course covers".to_string(),
          description:  Some("History and the core principles.".to_string()),
          order_index:  1,
          video_url:    Some(
            "https://www.youtube.com/embed/dQw4w9WgXcQ".to_string(),
          ),
          rutube_url:   None,
          date:         None,
          is_completed: false,
          homework:     None,
          materials:    vec![
            Material {
              material_id: id(0x5a31),
              title:       "Lesson slides".to_string(),
              kind:        MaterialKind::SlideDeck,
              url:         "#".to_string(),
              is_homework: false,
            },
            Material {
              material_id: id(0x5a32),
              title:       "Self-assessment checklist".to_string(),
              kind:        MaterialKind::Pdf,
              url:         "#".to_string(),
              is_homework: false,
            },
          ],
        },
        Day {
          day_id:       id(0x5a22),
          title:        "Day 2. Finding your bearings".to_string(),
          description:  Some("Orientation and first exercises.".to_string()),
          order_index:  2,
          video_url:    Some(
            "https://www.youtube.com/embed/dQw4w9WgXcQ".to_string(),
          ),
          rutube_url:   None,
          date:         None,
          is_completed: false,
          homework:     None,
          materials:    vec![Material {
            material_id: id(0x5a33),
            title:       "Sector diagram".to_string(),
            kind:        MaterialKind::Pdf,
            url:         "#".to_string(),
            is_homework: false,
          }],
        },
      ],
    },
    Week {
      week_id:        id(0x5a02),
      title:          "Week 2. Zoning".to_string(),
      description:    Some(
        "Laying out functional zones across the space.".to_string(),
      ),
      order_index:    2,
      is_locked:      true,
      available_from: Some(far_future()),
      week_materials: vec![],
      days:           vec![Day {
        day_id:       id(0x5a23),
        title:        "Day 1. The entrance".to_string(),
        description:  Some("Why the main entrance matters.".to_string()),
        order_index:  1,
        video_url:    None,
        rutube_url:   None,
        date:         None,
        is_completed: false,
        homework:     None,
        materials:    vec![],
      }],
    },
  ]
}
