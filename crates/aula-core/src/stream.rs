//! Live streams and their comments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scheduled or recorded live stream. The video may exist on either host,
/// or both; the client offers a source switcher when both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveStream {
  pub stream_id:      Uuid,
  pub title:          String,
  pub date:           DateTime<Utc>,
  pub video_url:      Option<String>,
  pub rutube_url:     Option<String>,
  pub description:    Option<String>,
  /// Newline-separated list of topics covered.
  pub topics:         Option<String>,
  /// Newline-separated highlights from the Q&A.
  pub best_questions: Option<String>,
  pub created_at:     DateTime<Utc>,
}

/// Input for stream creation.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLiveStream {
  pub title:          String,
  pub date:           DateTime<Utc>,
  pub video_url:      Option<String>,
  pub rutube_url:     Option<String>,
  pub description:    Option<String>,
  pub topics:         Option<String>,
  pub best_questions: Option<String>,
}

/// A comment left under a stream recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamComment {
  pub comment_id: Uuid,
  pub stream_id:  Uuid,
  pub author_id:  Uuid,
  pub body:       String,
  pub created_at: DateTime<Utc>,
}

/// Input for posting a comment.
#[derive(Debug, Clone)]
pub struct NewStreamComment {
  pub stream_id: Uuid,
  pub author_id: Uuid,
  pub body:      String,
}

/// Split streams into (upcoming, past) relative to `now`, preserving the
/// store's date-descending order within each half. A stream scheduled for
/// exactly `now` counts as past.
pub fn split_by_date(
  streams: Vec<LiveStream>,
  now:     DateTime<Utc>,
) -> (Vec<LiveStream>, Vec<LiveStream>) {
  streams.into_iter().partition(|s| s.date > now)
}

#[cfg(test)]
mod tests {
  use super::*;

  use chrono::TimeZone;

  fn stream(n: u128, year: i32) -> LiveStream {
    let date = Utc.with_ymd_and_hms(year, 6, 1, 12, 0, 0).unwrap();
    LiveStream {
      stream_id:      Uuid::from_u128(n),
      title:          format!("Stream {n}"),
      date,
      video_url:      None,
      rutube_url:     None,
      description:    None,
      topics:         None,
      best_questions: None,
      created_at:     date,
    }
  }

  #[test]
  fn splits_around_now() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let streams = vec![stream(1, 2025), stream(2, 2023), stream(3, 2022)];
    let (upcoming, past) = split_by_date(streams, now);
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].stream_id, Uuid::from_u128(1));
    assert_eq!(past.len(), 2);
    // Date-descending store order survives the partition.
    assert_eq!(past[0].stream_id, Uuid::from_u128(2));
    assert_eq!(past[1].stream_id, Uuid::from_u128(3));
  }

  #[test]
  fn stream_at_exactly_now_is_past() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let (upcoming, past) = split_by_date(vec![stream(1, 2024)], now);
    assert!(upcoming.is_empty());
    assert_eq!(past.len(), 1);
  }
}
