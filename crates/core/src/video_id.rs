//! YouTube video-ID extraction.
//!
//! Accepts the common URL shapes (`youtu.be/`, `/v/`, `/u/<w>/`, `embed/`,
//! `watch?v=`) and yields the 11-character video identifier. Anything that
//! does not match, or whose capture is not exactly 11 characters, is
//! absence — never an error.

use std::sync::LazyLock;

use regex::Regex;

/// Required length of a YouTube video identifier.
const VIDEO_ID_LEN: usize = 11;

/// Pattern matching the known YouTube URL shapes. The `id` capture holds
/// whatever follows the shape marker up to a `#`, `&`, or `?` delimiter.
static VIDEO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|/u/\w/|embed/|watch\?)\??v?=?(?P<id>[^#&?]*).*$")
        .expect("video URL pattern must compile")
});

/// Extract the 11-character video ID from a YouTube URL.
///
/// Returns `None` for URLs that do not match a known shape and for captures
/// of the wrong length (e.g. truncated share links).
pub fn extract_video_id(url: &str) -> Option<String> {
    let captures = VIDEO_URL_RE.captures(url)?;
    let id = captures.name("id")?.as_str();
    if id.len() == VIDEO_ID_LEN {
        Some(id.to_string())
    } else {
        None
    }
}

/// Build the maxresdefault thumbnail URL for a video ID.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{video_id}/maxresdefault.jpg")
}
