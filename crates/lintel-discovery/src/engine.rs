//! The configuration pass.
//!
//! [`Engine::configure`] runs one pass:
//!
//! 0. on restart, start a new ledger epoch
//! 1. scan the namespace (skipped when absent or blank; a failed scan counts
//!    as empty)
//! 2. resolve, filter, register and install every scanned key, in scan order
//! 3. do the same for application-supplied keys
//! 4. install the fallback interceptor if the epoch would otherwise be empty
//!
//! Only an install failure aborts the pass. Everything else is logged,
//! counted, and collected into the [`PassReport`].

use crate::error::EngineError;
use crate::fallback::FallbackState;
use crate::filter::{Candidate, CandidateFilter, Filtered};
use crate::ledger::{Epoch, RegistrationLedger};
use crate::registry::TypeRegistry;
use crate::report::{InstallSource, InstalledInterceptor, IssueKind, PassReport, SkipReason};
use crate::scanner::{RegistryScanner, Scanner};
use lintel_core::{InterceptorType, TypeKey};
use lintel_middleware::{DefaultInterceptor, InterceptorRegistry};
use lintel_telemetry::metrics;
use std::fmt;
use std::sync::Arc;

/// Inputs of one configuration pass.
///
/// # Example
///
/// ```
/// use lintel_discovery::PassConfig;
///
/// let pass = PassConfig::new()
///     .with_namespace("app::interceptors")
///     .with_application("app::audit::AuditTrail")
///     .with_restart(true);
///
/// assert_eq!(pass.namespace(), Some("app::interceptors"));
/// assert!(PassConfig::new().with_namespace("  ").namespace().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassConfig {
    /// Namespace to scan. Absent or blank skips scanning.
    pub namespace: Option<String>,
    /// Start a new registration epoch before the pass.
    pub restart: bool,
    /// Application-supplied candidates, installed after scanned ones.
    pub application: Vec<TypeKey>,
}

impl PassConfig {
    /// Creates a pass that scans nothing and does not restart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace to scan.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the restart flag.
    #[must_use]
    pub fn with_restart(mut self, restart: bool) -> Self {
        self.restart = restart;
        self
    }

    /// Appends an application-supplied candidate.
    #[must_use]
    pub fn with_application(mut self, key: impl Into<TypeKey>) -> Self {
        self.application.push(key.into());
        self
    }

    /// Returns the trimmed namespace, or `None` if scanning is skipped.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace
            .as_deref()
            .map(str::trim)
            .filter(|ns| !ns.is_empty())
    }
}

/// Discovers interceptors and installs them into a pipeline.
pub struct Engine {
    scanner: Arc<dyn Scanner>,
    registry: Arc<TypeRegistry>,
    ledger: Arc<RegistrationLedger>,
    filter: CandidateFilter,
    fallback: InterceptorType,
}

/// Mutable state threaded through one pass.
struct Pass<'a> {
    epoch: Epoch,
    target: &'a mut dyn InterceptorRegistry,
    state: FallbackState,
    report: PassReport,
}

impl Engine {
    /// Creates an engine.
    ///
    /// The fallback is [`DefaultInterceptor`].
    #[must_use]
    pub fn new(
        scanner: Arc<dyn Scanner>,
        registry: Arc<TypeRegistry>,
        ledger: Arc<RegistrationLedger>,
    ) -> Self {
        Self {
            scanner,
            registry,
            ledger,
            filter: CandidateFilter::default(),
            fallback: DefaultInterceptor::metadata(),
        }
    }

    /// Creates an engine that scans `registry` itself.
    #[must_use]
    pub fn from_registry(registry: Arc<TypeRegistry>, ledger: Arc<RegistrationLedger>) -> Self {
        let scanner = Arc::new(RegistryScanner::new(Arc::clone(&registry)));
        Self::new(scanner, registry, ledger)
    }

    /// Replaces the fallback interceptor.
    ///
    /// The fallback's key becomes the sentinel: scanning and application
    /// candidates never install it.
    #[must_use]
    pub fn with_fallback(mut self, fallback: InterceptorType) -> Self {
        self.filter = CandidateFilter::new(fallback.key().clone());
        self.fallback = fallback;
        self
    }

    /// Returns the registration ledger.
    #[must_use]
    pub fn ledger(&self) -> &Arc<RegistrationLedger> {
        &self.ledger
    }

    /// Returns the type registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// Returns the candidate filter.
    #[must_use]
    pub fn filter(&self) -> &CandidateFilter {
        &self.filter
    }

    /// Runs one configuration pass against `target`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Install`] if `target` refuses an interceptor.
    /// The refused key is released from the ledger; interceptors installed
    /// earlier in the pass stay installed.
    pub fn configure(
        &self,
        config: &PassConfig,
        target: &mut dyn InterceptorRegistry,
    ) -> Result<PassReport, EngineError> {
        let epoch = if config.restart {
            self.ledger.restart()
        } else {
            self.ledger.current_epoch()
        };

        let span = tracing::info_span!("configure", epoch = %epoch, restart = config.restart);
        let _enter = span.enter();

        metrics::record_pass(config.restart);

        let mut pass = Pass {
            epoch,
            target,
            state: FallbackState::default(),
            report: PassReport::new(epoch, config.restart),
        };

        let scanned = self.scan(config.namespace(), &mut pass.report);
        for key in &scanned {
            self.process(key, InstallSource::Scan, &mut pass)?;
        }

        for key in &config.application {
            self.process(key, InstallSource::Application, &mut pass)?;
        }

        if pass.state.needs_fallback(self.ledger.live_count()) {
            self.install_fallback(&mut pass)?;
        }

        let report = pass.report;
        tracing::info!(
            epoch = %epoch,
            installed = report.installed.len(),
            skipped = report.skipped.len(),
            issues = report.issues.len(),
            fallback = report.fallback_activated,
            "configuration pass complete"
        );
        Ok(report)
    }

    fn scan(&self, namespace: Option<&str>, report: &mut PassReport) -> Vec<TypeKey> {
        let Some(namespace) = namespace else {
            tracing::debug!("no namespace configured, skipping scan");
            return Vec::new();
        };

        match self.scanner.scan(namespace) {
            Ok(keys) => {
                tracing::debug!(namespace, candidates = keys.len(), "namespace scanned");
                keys
            }
            Err(err) => {
                tracing::warn!(namespace, error = %err, "namespace scan failed, continuing without scanned candidates");
                metrics::record_discovery_failure();
                report.issue(IssueKind::Discovery, None, err.to_string());
                Vec::new()
            }
        }
    }

    fn process(
        &self,
        key: &TypeKey,
        source: InstallSource,
        pass: &mut Pass<'_>,
    ) -> Result<(), EngineError> {
        let metadata = match self.registry.resolve(key) {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::error!(interceptor = %key, error = %err, "interceptor type did not resolve");
                metrics::record_resolution_failure();
                pass.report
                    .issue(IssueKind::Resolution, Some(key), err.to_string());
                return Ok(());
            }
        };

        match self.filter.admit(metadata) {
            Filtered::Accepted(candidate) => {
                self.register(candidate, source, pass)?;
            }
            Filtered::Rejected(rejection) => {
                tracing::debug!(interceptor = %key, reason = %rejection, "candidate rejected");
                metrics::record_rejection(rejection.as_str());
                pass.report.skip(key, SkipReason::Rejected(rejection));
            }
            Filtered::Failed(err) => {
                tracing::error!(interceptor = %key, error = %err, "interceptor instantiation failed");
                metrics::record_instantiation_failure();
                pass.report
                    .issue(IssueKind::Instantiation, Some(key), err.to_string());
            }
        }
        Ok(())
    }

    /// Returns true if the candidate was installed.
    fn register(
        &self,
        candidate: Candidate,
        source: InstallSource,
        pass: &mut Pass<'_>,
    ) -> Result<bool, EngineError> {
        let Candidate {
            descriptor,
            instance,
        } = candidate;
        let key = descriptor.key();

        if !self.ledger.try_register(&descriptor, pass.epoch) {
            tracing::debug!(
                interceptor = %key,
                reason = "already_registered",
                epoch = %pass.epoch,
                "candidate already registered in this epoch"
            );
            pass.report.skip(key, SkipReason::AlreadyRegistered);
            return Ok(false);
        }

        let name = instance.name();
        if let Err(err) = pass
            .target
            .install(instance, descriptor.include(), descriptor.exclude())
        {
            self.ledger.release(key, pass.epoch);
            tracing::error!(interceptor = %key, error = %err, "interceptor install failed");
            return Err(EngineError::Install {
                key: key.clone(),
                source: err,
            });
        }

        tracing::info!(
            interceptor = %key,
            name,
            source = source.as_str(),
            include = ?descriptor.include(),
            exclude = ?descriptor.exclude(),
            epoch = %pass.epoch,
            "interceptor installed"
        );
        metrics::record_install(source.as_str());
        pass.state.record_install();
        pass.report.installed.push(InstalledInterceptor {
            key: key.clone(),
            name,
            source,
        });
        Ok(true)
    }

    fn install_fallback(&self, pass: &mut Pass<'_>) -> Result<(), EngineError> {
        let key = self.fallback.key();

        match self.filter.admit_fallback(&self.fallback) {
            Filtered::Accepted(candidate) => {
                if self.register(candidate, InstallSource::Fallback, pass)? {
                    tracing::info!(interceptor = %key, epoch = %pass.epoch, "fallback interceptor activated");
                    metrics::record_fallback_activation();
                    pass.report.fallback_activated = true;
                }
            }
            Filtered::Rejected(rejection) => {
                tracing::warn!(interceptor = %key, reason = %rejection, "fallback interceptor rejected");
                metrics::record_rejection(rejection.as_str());
                pass.report.skip(key, SkipReason::Rejected(rejection));
            }
            Filtered::Failed(err) => {
                tracing::error!(interceptor = %key, error = %err, "fallback instantiation failed");
                metrics::record_instantiation_failure();
                pass.report
                    .issue(IssueKind::Instantiation, Some(key), err.to_string());
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry.len())
            .field("ledger", &self.ledger)
            .field("filter", &self.filter)
            .field("fallback", self.fallback.key())
            .finish_non_exhaustive()
    }
}
