//! Video URL normalisation for the embedded player.
//!
//! Teachers paste whatever their video host hands them — watch URLs, short
//! URLs, sometimes a whole `<iframe>` snippet. Everything is normalised to
//! an embeddable URL here, in one place.

/// Normalise a pasted video URL into an embeddable one.
///
/// Recognises Rutube watch URLs, pasted `<iframe>` embed code, YouTube
/// `watch?v=` and `youtu.be` URLs. URLs already pointing at an embed
/// endpoint, and anything unrecognised, pass through unchanged.
pub fn embed_url(url: &str) -> String {
  if url.is_empty() {
    return String::new();
  }

  // Rutube watch URLs: https://rutube.ru/video/<id>/
  if let Some((_, rest)) = url.split_once("rutube.ru/video/") {
    let id = rest.split('/').next().unwrap_or_default();
    if !id.is_empty() {
      return format!("https://rutube.ru/play/embed/{id}");
    }
  }

  // A whole pasted <iframe ...> snippet: take its src attribute.
  if url.contains("<iframe") {
    return iframe_src(url).unwrap_or_default();
  }

  // Standard YouTube watch URLs.
  if url.contains("watch?v=") {
    return url.replacen("watch?v=", "embed/", 1);
  }

  // Short YouTube URLs: https://youtu.be/<id>?t=...
  if let Some((_, rest)) = url.split_once("youtu.be/") {
    let id = rest.split('?').next().unwrap_or_default();
    return format!("https://www.youtube.com/embed/{id}");
  }

  url.to_string()
}

fn iframe_src(snippet: &str) -> Option<String> {
  let start = snippet.find("src=\"")? + 5;
  let end = snippet[start..].find('"')? + start;
  Some(snippet[start..end].to_string())
}
