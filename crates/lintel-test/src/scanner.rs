//! Scripted scanners.

use lintel_core::TypeKey;
use lintel_discovery::{DiscoveryError, Scanner};
use parking_lot::Mutex;

/// A scanner that returns a fixed key list for any namespace.
///
/// Records the namespaces it was asked for.
#[derive(Debug, Default)]
pub struct StaticScanner {
    keys: Vec<TypeKey>,
    requests: Mutex<Vec<String>>,
}

impl StaticScanner {
    /// Creates a scanner returning `keys`, in order.
    pub fn new<I>(keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TypeKey>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns the namespaces scanned so far.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl Scanner for StaticScanner {
    fn scan(&self, namespace: &str) -> Result<Vec<TypeKey>, DiscoveryError> {
        self.requests.lock().push(namespace.to_string());
        Ok(self.keys.clone())
    }
}

/// A scanner that always fails.
#[derive(Debug, Clone)]
pub struct FailingScanner {
    reason: String,
}

impl FailingScanner {
    /// Creates a scanner failing with `reason`.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for FailingScanner {
    fn default() -> Self {
        Self::new("module index unavailable")
    }
}

impl Scanner for FailingScanner {
    fn scan(&self, namespace: &str) -> Result<Vec<TypeKey>, DiscoveryError> {
        Err(DiscoveryError::unavailable(namespace, self.reason.clone()))
    }
}
