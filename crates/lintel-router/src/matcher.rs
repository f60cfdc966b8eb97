//! Include/exclude path matching.

use http::Uri;

use crate::error::PatternError;
use crate::normalize::normalize_path;
use crate::pattern::PathPattern;

/// Decides whether a request path is routed to one interceptor.
///
/// A path matches when at least one include pattern matches it and no
/// exclude pattern does.
///
/// # Example
///
/// ```rust
/// use lintel_router::PathMatcher;
///
/// let matcher = PathMatcher::new(["/admin/**", "/ops/*"], ["/admin/login"]).unwrap();
///
/// assert!(matcher.matches("/admin/users"));
/// assert!(matcher.matches("/ops/metrics"));
/// assert!(!matcher.matches("/admin/login"));
/// assert!(!matcher.matches("/ops/a/b"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatcher {
    include: Vec<PathPattern>,
    exclude: Vec<PathPattern>,
}

impl PathMatcher {
    /// Compiles include and exclude patterns into a matcher.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NoIncludePatterns`] if `include` is empty, or
    /// the first error produced while compiling a pattern.
    pub fn new<I, E>(include: I, exclude: E) -> Result<Self, PatternError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let include = include
            .into_iter()
            .map(|p| PathPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        if include.is_empty() {
            return Err(PatternError::NoIncludePatterns);
        }

        let exclude = exclude
            .into_iter()
            .map(|p| PathPattern::parse(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { include, exclude })
    }

    /// Returns the include patterns.
    #[must_use]
    pub fn include(&self) -> &[PathPattern] {
        &self.include
    }

    /// Returns the exclude patterns.
    #[must_use]
    pub fn exclude(&self) -> &[PathPattern] {
        &self.exclude
    }

    /// Matches a raw request path.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.matches_normalized(&normalize_path(path))
    }

    /// Matches the path component of a request URI.
    #[must_use]
    pub fn matches_uri(&self, uri: &Uri) -> bool {
        self.matches(uri.path())
    }

    /// Matches a path that has already been through [`normalize_path`].
    ///
    /// Used by the pipeline, which normalizes once per request and then
    /// asks every installed matcher.
    #[must_use]
    pub fn matches_normalized(&self, normalized: &str) -> bool {
        self.include
            .iter()
            .any(|p| p.matches_normalized(normalized))
            && !self
                .exclude
                .iter()
                .any(|p| p.matches_normalized(normalized))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_include() {
        let result = PathMatcher::new(Vec::<&str>::new(), ["/a"]);
        assert_eq!(result, Err(PatternError::NoIncludePatterns));
    }

    #[test]
    fn test_invalid_exclude_is_reported() {
        let result = PathMatcher::new(["/**"], ["no-slash"]);
        assert!(matches!(
            result,
            Err(PatternError::MissingLeadingSlash { .. })
        ));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let matcher = PathMatcher::new(["/api/**"], ["/api/**"]).unwrap();
        assert!(!matcher.matches("/api/users"));
    }

    #[test]
    fn test_multiple_includes() {
        let matcher = PathMatcher::new(["/a/**", "/b"], Vec::<&str>::new()).unwrap();
        assert!(matcher.matches("/a/x"));
        assert!(matcher.matches("/b"));
        assert!(!matcher.matches("/b/x"));
        assert!(!matcher.matches("/c"));
    }

    #[test]
    fn test_matches_uri() {
        let matcher = PathMatcher::new(["/api/**"], ["/api/health"]).unwrap();
        let uri: Uri = "http://localhost:8080/api/users?limit=10".parse().unwrap();
        assert!(matcher.matches_uri(&uri));

        let uri: Uri = "/api/health/".parse().unwrap();
        assert!(!matcher.matches_uri(&uri));
    }

    #[test]
    fn test_accessors() {
        let matcher = PathMatcher::new(["/a", "/b"], ["/c"]).unwrap();
        assert_eq!(matcher.include().len(), 2);
        assert_eq!(matcher.exclude().len(), 1);
        assert_eq!(matcher.exclude()[0].as_str(), "/c");
    }
}
