//! Compiled glob path patterns.

use std::fmt;

use regex::Regex;
use smallvec::SmallVec;

use crate::error::PatternError;
use crate::normalize::{normalize_path, segments};

/// One segment of a compiled [`PathPattern`].
#[derive(Debug, Clone)]
pub enum Segment {
    /// Static segment (e.g. `users`), compared byte for byte.
    Literal(String),
    /// Segment containing `*` or `?` (e.g. `*.js`, `v?`).
    Wildcard {
        /// The segment as written in the pattern.
        source: String,
        /// Anchored regex compiled from `source`.
        regex: Regex,
    },
    /// `*`: exactly one segment.
    AnySegment,
    /// `**`: zero or more segments.
    AnyDepth,
}

impl Segment {
    fn parse(pattern: &str, segment: &str) -> Result<Self, PatternError> {
        if segment == "**" {
            return Ok(Self::AnyDepth);
        }
        if segment.contains("**") {
            return Err(PatternError::InvalidDoubleStar {
                pattern: pattern.to_string(),
                segment: segment.to_string(),
            });
        }
        if segment == "*" {
            return Ok(Self::AnySegment);
        }
        if segment.contains(['*', '?']) {
            return Self::wildcard(segment);
        }
        Ok(Self::Literal(segment.to_string()))
    }

    fn wildcard(segment: &str) -> Result<Self, PatternError> {
        let mut expr = String::with_capacity(segment.len() + 8);
        expr.push('^');
        let mut literal = [0u8; 4];
        for c in segment.chars() {
            match c {
                '*' => expr.push_str("[^/]*"),
                '?' => expr.push_str("[^/]"),
                other => expr.push_str(&regex::escape(other.encode_utf8(&mut literal))),
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| PatternError::InvalidWildcard {
            segment: segment.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self::Wildcard {
            source: segment.to_string(),
            regex,
        })
    }

    /// Returns true if this segment matches a single path segment.
    ///
    /// Always true for [`Segment::AnyDepth`]; callers handle its
    /// multi-segment behaviour.
    #[must_use]
    pub fn matches(&self, path_segment: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == path_segment,
            Self::Wildcard { regex, .. } => regex.is_match(path_segment),
            Self::AnySegment | Self::AnyDepth => true,
        }
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Wildcard { source: a, .. }, Self::Wildcard { source: b, .. }) => a == b,
            (Self::AnySegment, Self::AnySegment) | (Self::AnyDepth, Self::AnyDepth) => true,
            _ => false,
        }
    }
}

impl Eq for Segment {}

/// A compiled hierarchical glob pattern.
///
/// # Example
///
/// ```rust
/// use lintel_router::PathPattern;
///
/// let pattern = PathPattern::parse("/assets/**/*.css").unwrap();
/// assert!(pattern.matches("/assets/site.css"));
/// assert!(pattern.matches("/assets/themes/dark/site.css"));
/// assert!(!pattern.matches("/assets/site.js"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: SmallVec<[Segment; 6]>,
}

impl PathPattern {
    /// Compiles a pattern.
    ///
    /// Empty segments are ignored, so `/api/` and `/api` compile to the same
    /// pattern.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if the pattern is empty, does not start with
    /// `/`, or uses `**` inside a segment.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }
        if !pattern.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash {
                pattern: pattern.to_string(),
            });
        }

        let mut compiled = SmallVec::new();
        for segment in pattern.split('/').filter(|s| !s.is_empty()) {
            let segment = Segment::parse(pattern, segment)?;
            // `**/**` is the same as `**`
            if segment == Segment::AnyDepth && compiled.last() == Some(&Segment::AnyDepth) {
                continue;
            }
            compiled.push(segment);
        }

        Ok(Self {
            source: pattern.to_string(),
            segments: compiled,
        })
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the compiled segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if the pattern contains no wildcard segment.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|s| matches!(s, Segment::Literal(_)))
    }

    /// Matches a raw request path (normalized first).
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.matches_normalized(&normalize_path(path))
    }

    /// Matches a path that has already been through [`normalize_path`].
    #[must_use]
    pub fn matches_normalized(&self, normalized: &str) -> bool {
        let parts: SmallVec<[&str; 12]> = segments(normalized).collect();
        match_segments(&self.segments, &parts)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Matches compiled segments against path segments in
/// `O(pattern × path)` time.
///
/// `reachable[j]` holds when the pattern prefix consumed so far matches the
/// first `j` path segments.
fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    let mut reachable: SmallVec<[bool; 16]> = SmallVec::from_elem(false, path.len() + 1);
    reachable[0] = true;

    for segment in pattern {
        if *segment == Segment::AnyDepth {
            let mut seen = false;
            for slot in &mut reachable {
                seen |= *slot;
                *slot = seen;
            }
        } else {
            for j in (1..=path.len()).rev() {
                reachable[j] = reachable[j - 1] && segment.matches(path[j - 1]);
            }
            reachable[0] = false;
        }

        if !reachable.contains(&true) {
            return false;
        }
    }

    reachable[path.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal() {
        let pattern = PathPattern::parse("/users/list").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("users".to_string()),
                Segment::Literal("list".to_string())
            ]
        );
        assert!(pattern.is_literal());
    }

    #[test]
    fn test_parse_wildcards() {
        let pattern = PathPattern::parse("/files/*/**").unwrap();
        assert_eq!(pattern.segments().len(), 3);
        assert_eq!(pattern.segments()[1], Segment::AnySegment);
        assert_eq!(pattern.segments()[2], Segment::AnyDepth);
        assert!(!pattern.is_literal());
    }

    #[test]
    fn test_parse_collapses_repeated_any_depth() {
        let pattern = PathPattern::parse("/a/**/**/b").unwrap();
        assert_eq!(pattern.segments().len(), 3);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(PathPattern::parse(""), Err(PatternError::Empty));
        assert!(matches!(
            PathPattern::parse("api/**"),
            Err(PatternError::MissingLeadingSlash { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/api/v**"),
            Err(PatternError::InvalidDoubleStar { .. })
        ));
    }

    #[test]
    fn test_root_pattern() {
        let pattern = PathPattern::parse("/").unwrap();
        assert!(pattern.matches("/"));
        assert!(pattern.matches(""));
        assert!(!pattern.matches("/a"));
    }

    #[test]
    fn test_any_depth_matches_zero_segments() {
        let pattern = PathPattern::parse("/api/**").unwrap();
        assert!(pattern.matches("/api"));
        assert!(pattern.matches("/api/"));
        assert!(pattern.matches("/api/a/b/c"));
        assert!(!pattern.matches("/apix"));
    }

    #[test]
    fn test_any_depth_in_the_middle() {
        let pattern = PathPattern::parse("/api/**/edit").unwrap();
        assert!(pattern.matches("/api/edit"));
        assert!(pattern.matches("/api/users/1/edit"));
        assert!(!pattern.matches("/api/users/1/edit/more"));
    }

    #[test]
    fn test_in_segment_wildcards() {
        let pattern = PathPattern::parse("/static/*.js").unwrap();
        assert!(pattern.matches("/static/app.js"));
        assert!(pattern.matches("/static/.js"));
        assert!(!pattern.matches("/static/app.css"));
        assert!(!pattern.matches("/static/js/app.js"));

        let pattern = PathPattern::parse("/api/v?/users").unwrap();
        assert!(pattern.matches("/api/v1/users"));
        assert!(!pattern.matches("/api/v10/users"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let pattern = PathPattern::parse("/files/a+b(*).txt").unwrap();
        assert!(pattern.matches("/files/a+b(1).txt"));
        assert!(!pattern.matches("/files/aab(1).txt"));
    }

    #[test]
    fn test_many_any_depth_segments_on_long_path() {
        let pattern = PathPattern::parse("/**/a/**/b/**/c/**/d/**/e/**/f/**/g/**/z").unwrap();
        let miss = "/x".repeat(200);
        assert!(!pattern.matches(&miss));

        let hit = format!("{}/a/b/c/d/e/f/g{}/z", "/x".repeat(50), "/y".repeat(50));
        assert!(pattern.matches(&hit));
    }

    #[test]
    fn test_any_depth_then_literal_tail() {
        let pattern = PathPattern::parse("/**/edit").unwrap();
        assert!(pattern.matches("/edit"));
        assert!(pattern.matches("/edit/edit"));
        assert!(!pattern.matches("/edit/view"));
        assert!(!pattern.matches("/"));
    }

    #[test]
    fn test_display() {
        let pattern = PathPattern::parse("/api/**").unwrap();
        assert_eq!(pattern.to_string(), "/api/**");
        assert_eq!(pattern.as_str(), "/api/**");
    }
}
