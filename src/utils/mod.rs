//! Utility functions and helpers.

pub mod clock;
pub mod http;

pub use clock::{Clock, ManualClock, SystemClock};
pub use http::{HttpFetcher, PageFetcher, create_async_client};

use sha2::{Digest, Sha256};
use unicode_segmentation::UnicodeSegmentation;
use url::Url;

const ELLIPSIS: &str = "...";

/// Resolve a potentially relative URL against the site base.
///
/// Relative paths are appended to the base path, so `/x` and `x` both
/// become `{base}/x` even when the base points at a sub-path.
pub fn resolve_url(base: &Url, href: &str) -> String {
    let href = href.trim();
    if Url::parse(href).is_ok() {
        return href.to_string();
    }
    if href.starts_with("//") {
        return base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string());
    }
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        href.trim_start_matches('/')
    )
}

/// Make a scraped `href` absolute. Magnet URIs are returned verbatim.
pub fn normalize_link(base: &Url, href: &str) -> String {
    let href = href.trim();
    if is_magnet(href) {
        return href.to_string();
    }
    resolve_url(base, href)
}

/// Whether an `href` uses the magnet scheme.
pub fn is_magnet(href: &str) -> bool {
    href.get(..7)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("magnet:"))
}

/// Collapse every whitespace run into a single space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Bound a label to `max` characters, ending in `...` when cut.
pub fn truncate_label(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut = take_chars(text, max.saturating_sub(ELLIPSIS.len()));
    cut.push_str(ELLIPSIS);
    cut
}

/// Longest prefix of `text` with at most `n` characters that does not
/// split a grapheme cluster.
pub fn take_chars(text: &str, n: usize) -> String {
    let mut taken = 0;
    let mut end = 0;
    for (offset, grapheme) in text.grapheme_indices(true) {
        taken += grapheme.chars().count();
        if taken > n {
            break;
        }
        end = offset + grapheme.len();
    }
    text[..end].to_string()
}

/// Escape text for HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Stable short identifier for a movie title.
pub fn entry_id(title: &str) -> String {
    let digest = Sha256::digest(title.as_bytes());
    hex::encode(&digest[..8])
}
