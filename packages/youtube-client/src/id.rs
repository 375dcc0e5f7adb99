//! Canonical video identifier resolution
//!
//! Accepts either a bare 11-character video id or any of the common URL
//! forms (`youtu.be/<id>`, `youtube.com/watch?v=<id>`, `/embed/<id>`,
//! including the `youtube-nocookie.com` host). Pure and synchronous.

use url::Url;

/// Length of a canonical YouTube video id
const VIDEO_ID_LEN: usize = 11;

/// Check whether a string is a plausible bare video id
fn is_video_id(s: &str) -> bool {
    s.len() == VIDEO_ID_LEN
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Check whether a host belongs to the given domain (exact or subdomain)
fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

/// Extract a canonical video id from a raw string.
///
/// Returns `None` for anything that is neither a bare id nor a
/// recognizable YouTube URL carrying a valid id.
pub fn parse_video_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if is_video_id(trimmed) {
        return Some(trimmed.to_string());
    }

    let url = Url::parse(trimmed).ok()?;
    let host = url.host_str()?;

    // youtu.be/<id>
    if host_matches(host, "youtu.be") {
        let id = url.path_segments()?.find(|s| !s.is_empty())?;
        return is_video_id(id).then(|| id.to_string());
    }

    if host_matches(host, "youtube.com") || host_matches(host, "youtube-nocookie.com") {
        // youtube.com/watch?v=<id>
        if let Some(v) = url.query_pairs().find(|(k, _)| k == "v").map(|(_, v)| v) {
            if is_video_id(&v) {
                return Some(v.into_owned());
            }
        }
        // youtube.com/embed/<id>
        let segments: Vec<_> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
        if let Some(pos) = segments.iter().position(|s| *s == "embed") {
            if let Some(id) = segments.get(pos + 1) {
                return is_video_id(id).then(|| id.to_string());
            }
        }
    }

    None
}
