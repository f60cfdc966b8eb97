//! Type identity.

use crate::error::KeyError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, unique identity of an interceptor type.
///
/// A key is a `::`-separated path such as `app::interceptors::Auth`. The part
/// before the last `::` is the key's module path; namespaces are matched
/// against it.
///
/// # Example
///
/// ```
/// use lintel_core::TypeKey;
///
/// let key = TypeKey::new("app::interceptors::Auth");
/// assert_eq!(key.module_path(), "app::interceptors");
/// assert_eq!(key.name(), "Auth");
/// assert!(key.is_within("app"));
/// assert!(key.is_within("app::interceptors"));
/// assert!(!key.is_within("app::inter"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(String);

impl TypeKey {
    /// Creates a key without validating it.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Parses and validates a key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError`] if the path is empty or malformed.
    pub fn parse(path: &str) -> Result<Self, KeyError> {
        if path.is_empty() {
            return Err(KeyError::Empty);
        }
        if !is_valid_path(path) {
            return Err(KeyError::Malformed {
                path: path.to_string(),
            });
        }
        Ok(Self(path.to_string()))
    }

    /// Returns the key for a Rust type, derived from its type name.
    ///
    /// Generic parameters are stripped, so `Wrapper<u8>` and `Wrapper<u16>`
    /// share a key.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full = std::any::type_name::<T>();
        let path = full.find('<').map_or(full, |end| &full[..end]);
        Self(path.to_string())
    }

    /// Returns the key as a string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns everything before the last `::`, or `""` for a bare name.
    #[must_use]
    pub fn module_path(&self) -> &str {
        self.0.rfind("::").map_or("", |idx| &self.0[..idx])
    }

    /// Returns the last path segment.
    #[must_use]
    pub fn name(&self) -> &str {
        self.0.rfind("::").map_or(&self.0, |idx| &self.0[idx + 2..])
    }

    /// Returns true if the key's module path equals `namespace` or is
    /// nested below it.
    #[must_use]
    pub fn is_within(&self, namespace: &str) -> bool {
        let module = self.module_path();
        match module.strip_prefix(namespace) {
            Some("") => true,
            Some(rest) => rest.starts_with("::"),
            None => false,
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for TypeKey {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl AsRef<str> for TypeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns true if `path` is a non-empty `::`-separated list of identifiers.
///
/// Used to validate both type keys and scan namespaces.
#[must_use]
pub fn is_valid_path(path: &str) -> bool {
    !path.is_empty() && path.split("::").all(is_identifier)
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
