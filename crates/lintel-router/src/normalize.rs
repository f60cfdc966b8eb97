//! Request path normalization.

use std::borrow::Cow;

/// Normalizes a request path for pattern matching.
///
/// - the query string and fragment are dropped
/// - repeated `/` collapse into one
/// - `.` segments are removed and `..` segments pop their parent
/// - a trailing `/` is removed (the root stays `/`)
/// - a leading `/` is always present
///
/// Already-normal paths are returned borrowed.
///
/// # Example
///
/// ```rust
/// use lintel_router::normalize_path;
///
/// assert_eq!(normalize_path("/api/users/"), "/api/users");
/// assert_eq!(normalize_path("//api//users?page=2"), "/api/users");
/// assert_eq!(normalize_path("/api/./v1/../users"), "/api/users");
/// assert_eq!(normalize_path(""), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let path = match path.find(|c| c == '?' || c == '#') {
        Some(end) => &path[..end],
        None => path,
    };

    if is_normal(path) {
        return Cow::Borrowed(path);
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Cow::Borrowed("/");
    }

    let mut normalized = String::with_capacity(path.len());
    for segment in segments {
        normalized.push('/');
        normalized.push_str(segment);
    }
    Cow::Owned(normalized)
}

/// Splits a normalized path into its segments.
pub(crate) fn segments(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split('/').filter(|s| !s.is_empty())
}

fn is_normal(path: &str) -> bool {
    if path == "/" {
        return true;
    }
    if !path.starts_with('/') || path.ends_with('/') {
        return false;
    }
    path[1..]
        .split('/')
        .all(|segment| !matches!(segment, "" | "." | ".."))
}
