//! Outbound adapters implementing domain ports.
//!
//! - [`attendance`]: reqwest-backed attendance ledger.
//! - [`directory`]: reqwest-backed backend user directory.
//! - [`identity`]: reqwest-backed identity-provider metadata writes.
//! - [`location`]: location provider reporting a supplied fix.
//! - [`navigation`]: in-process stack router.

pub mod attendance;
pub mod directory;
pub mod identity;
pub mod location;
pub mod navigation;

use reqwest::Url;

/// Collapse whitespace and truncate a response body for error messages.
pub(crate) fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Append path segments to `base`, percent-encoding each one.
///
/// Returns `None` for URLs that cannot carry a path (e.g. `mailto:`).
pub(crate) fn join_segments<'a>(
    base: &Url,
    segments: impl IntoIterator<Item = &'a str>,
) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(segments);
    Some(url)
}
