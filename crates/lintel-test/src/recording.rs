//! Recording install target.

use lintel_core::Interceptor;
use lintel_middleware::{InstallError, InterceptorPipeline, InterceptorRegistry};
use std::collections::HashSet;
use std::sync::Arc;

/// One `install` call seen by a [`RecordingRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCall {
    /// The interceptor's name.
    pub name: &'static str,
    /// Include patterns passed to `install`.
    pub include: Vec<String>,
    /// Exclude patterns passed to `install`.
    pub exclude: Vec<String>,
}

/// An [`InterceptorRegistry`] that records installs.
///
/// Accepted installs are also forwarded to a real [`InterceptorPipeline`],
/// so tests can run requests through what was installed.
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    calls: Vec<InstallCall>,
    refuse: HashSet<&'static str>,
    pipeline: InterceptorPipeline,
}

impl RecordingRegistry {
    /// Creates a registry that accepts every install.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses installs of the interceptor named `name`.
    #[must_use]
    pub fn refusing(mut self, name: &'static str) -> Self {
        self.refuse.insert(name);
        self
    }

    /// Returns every accepted install call, in order.
    #[must_use]
    pub fn calls(&self) -> &[InstallCall] {
        &self.calls
    }

    /// Returns the installed interceptor names, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.calls.iter().map(|c| c.name).collect()
    }

    /// Returns the number of accepted installs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Returns true if nothing was installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Returns how many times `name` was installed.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.calls.iter().filter(|c| c.name == name).count()
    }

    /// Returns the pipeline the accepted installs were forwarded to.
    #[must_use]
    pub fn pipeline(&self) -> &InterceptorPipeline {
        &self.pipeline
    }

    /// Consumes the registry, returning its pipeline.
    #[must_use]
    pub fn into_pipeline(self) -> InterceptorPipeline {
        self.pipeline
    }
}

impl InterceptorRegistry for RecordingRegistry {
    fn install(
        &mut self,
        interceptor: Arc<dyn Interceptor>,
        include: &[String],
        exclude: &[String],
    ) -> Result<(), InstallError> {
        let name = interceptor.name();
        if self.refuse.contains(name) {
            return Err(InstallError::rejected(name, "refused by test registry"));
        }

        self.pipeline.install(interceptor, include, exclude)?;
        self.calls.push(InstallCall {
            name,
            include: include.to_vec(),
            exclude: exclude.to_vec(),
        });
        Ok(())
    }
}
