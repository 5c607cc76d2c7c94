//! Video link parsing. Everything that needs a thumbnail or an embeddable
//! player address goes through `extract_video_id`; a link that does not match
//! simply has neither.

use once_cell::sync::Lazy;
use regex::Regex;

/// Watch (`?v=` / `&v=`), short link, embed, `/v/`, `/e/` and shorts forms.
static VIDEO_ID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtube\.com/(?:.*[?&]v=|(?:v|e(?:mbed)?|shorts)/)|youtu\.be/)([A-Za-z0-9_-]{11})")
        .expect("failed to compile VIDEO_ID_REGEX")
});

const THUMBNAIL_TEMPLATE: &str = "https://img.youtube.com/vi/{id}/hqdefault.jpg";
const EMBED_TEMPLATE: &str = "https://www.youtube.com/embed/{id}";

/// Pull the 11-character video id out of a link, if there is one.
pub fn extract_video_id(url: &str) -> Option<&str> {
    if url.is_empty() {
        return None;
    }
    VIDEO_ID_REGEX
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Preview image address for a link, `None` when no id can be extracted.
pub fn thumbnail_url(url: &str) -> Option<String> {
    extract_video_id(url).map(|id| THUMBNAIL_TEMPLATE.replace("{id}", id))
}

/// Player address for a link, `None` when no id can be extracted.
pub fn embed_url(url: &str) -> Option<String> {
    extract_video_id(url).map(|id| EMBED_TEMPLATE.replace("{id}", id))
}
