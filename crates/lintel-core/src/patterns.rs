//! Declared path patterns.

use serde::{Deserialize, Serialize};

/// Include/exclude glob patterns declared on an interceptor type.
///
/// A type without a `PatternSpec` is never installed by discovery.
///
/// # Example
///
/// ```
/// use lintel_core::PatternSpec;
///
/// let spec = PatternSpec::new(["/api/**"], ["/api/health"]);
/// assert_eq!(spec.include(), ["/api/**"]);
/// assert_eq!(spec.exclude(), ["/api/health"]);
///
/// assert_eq!(PatternSpec::match_all().include(), ["/**"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawPatternSpec")]
pub struct PatternSpec {
    include: Vec<String>,
    exclude: Vec<String>,
}

/// Wire form of [`PatternSpec`]; deserialized values go through
/// [`PatternSpec::new`].
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPatternSpec {
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    exclude: Vec<String>,
}

impl From<RawPatternSpec> for PatternSpec {
    fn from(raw: RawPatternSpec) -> Self {
        Self::new(raw.include, raw.exclude)
    }
}

impl PatternSpec {
    /// The include pattern used when none is declared.
    pub const MATCH_ALL: &'static str = "/**";

    /// Creates a spec from include and exclude patterns.
    ///
    /// An empty include list falls back to [`PatternSpec::MATCH_ALL`].
    pub fn new<I, E>(include: I, exclude: E) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        let mut include: Vec<String> = include.into_iter().map(Into::into).collect();
        if include.is_empty() {
            include.push(Self::MATCH_ALL.to_string());
        }
        Self {
            include,
            exclude: exclude.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a spec that matches every path.
    #[must_use]
    pub fn match_all() -> Self {
        Self {
            include: vec![Self::MATCH_ALL.to_string()],
            exclude: Vec::new(),
        }
    }

    /// Creates a spec with include patterns only.
    pub fn including<I>(include: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::new(include, Vec::<String>::new())
    }

    /// Adds an exclude pattern.
    #[must_use]
    pub fn excluding(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Returns the include patterns (never empty).
    #[must_use]
    pub fn include(&self) -> &[String] {
        &self.include
    }

    /// Returns the exclude patterns.
    #[must_use]
    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }
}

impl Default for PatternSpec {
    fn default() -> Self {
        Self::match_all()
    }
}

/// Path patterns declared on a type.
///
/// Usually implemented through `#[interceptor(include = "...")]`.
pub trait DeclaredPatterns {
    /// Returns the declared patterns.
    fn patterns() -> PatternSpec;
}
