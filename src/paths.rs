// src/paths.rs

use url::Url;

/// Appends path segments to `base`, dropping the empty segments left by repeated
/// slashes so `https://idp.example`, `https://idp.example/` and
/// `https://idp.example//` all yield the same result.
///
/// Returns `None` when `base` cannot be a base (e.g. `mailto:` URLs).
pub(crate) fn join_path(base: &Url, segments: &[&str]) -> Option<Url> {
    let kept: Vec<&str> = base.path_segments()?.filter(|segment| !segment.is_empty()).collect();
    let mut joined = base.clone();
    joined.path_segments_mut().ok()?.clear().extend(kept).extend(segments);
    Some(joined)
}

/// Whether `alias` can be embedded verbatim as one segment of a callback path.
pub(crate) fn is_path_safe(alias: &str) -> bool {
    !alias.is_empty()
        && !alias
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '%' | '\\'))
}
