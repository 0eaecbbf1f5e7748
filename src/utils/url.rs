// src/utils/url.rs

//! URL manipulation utilities.

/// Placeholder replaced by the board name in listing URL templates.
pub const BOARD_PLACEHOLDER: &str = "{board}";

/// Build a board's listing root URL from a template.
///
/// # Examples
/// ```
/// use boardwatch::utils::url::board_url;
///
/// assert_eq!(
///     board_url("https://www.ptt.cc/bbs/{board}/index.html", "Soft_Job"),
///     "https://www.ptt.cc/bbs/Soft_Job/index.html"
/// );
/// ```
pub fn board_url(template: &str, board: &str) -> String {
    template.replace(BOARD_PLACEHOLDER, board)
}

/// Extract a post identifier from its canonical URL.
///
/// The identifier is the last path segment with any `.html` suffix removed,
/// e.g. `M.1700000000.A.1B2` for `.../bbs/Test/M.1700000000.A.1B2.html`.
pub fn extract_post_id(url: &str) -> Option<String> {
    let path = url.trim().split(['?', '#']).next()?;
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    let id = segment
        .strip_suffix(".html")
        .or_else(|| segment.strip_suffix(".htm"))
        .unwrap_or(segment);
    (!id.is_empty() && !id.contains(':')).then(|| id.to_string())
}
