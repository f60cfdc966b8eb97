//! Startup and hot-reload configuration passes over a shared pipeline.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lintel_config::{ConfigError, ConfigLoader, FileChangeKind, FileWatcher, LintelConfig};
use lintel_core::{BoxFuture, InterceptorContext, Request, Response};
use lintel_discovery::{Engine, PassConfig, PassReport, RegistrationLedger, TypeRegistry};
use lintel_middleware::InterceptorPipeline;
use lintel_telemetry::{init_telemetry, TelemetryGuard};
use parking_lot::{Mutex, RwLock};

use crate::error::LintelResult;

/// Owns the discovery engine and the live interceptor pipeline.
///
/// Requests run against an `Arc` snapshot of the pipeline, so a pass never
/// blocks request handling for longer than a pointer swap. Passes are
/// serialized.
///
/// - a restart pass builds a fresh pipeline and swaps it in
/// - any other pass installs into a copy of the live pipeline, swapped in
///   once the pass succeeds
///
/// A failed pass leaves the previous pipeline live. The next pass is then
/// forced to restart, since the ledger may record interceptors the live
/// pipeline never received.
///
/// # Example
///
/// ```
/// use lintel::prelude::*;
///
/// let registry = TypeRegistry::new().with(InterceptorType::declared::<TimingInterceptor>());
/// let config = LintelConfig::builder().namespace("lintel_middleware").build();
///
/// let bootstrap = Bootstrap::new(config, registry);
/// let report = bootstrap.start().unwrap();
///
/// assert!(!report.fallback_activated);
/// assert_eq!(bootstrap.pipeline().names(), ["timing"]);
/// ```
pub struct Bootstrap {
    config: RwLock<LintelConfig>,
    engine: Engine,
    pipeline: RwLock<Arc<InterceptorPipeline>>,
    passes: Mutex<()>,
    stale: AtomicBool,
}

impl Bootstrap {
    /// Creates a bootstrap that scans `registry` with a fresh ledger.
    #[must_use]
    pub fn new(config: LintelConfig, registry: TypeRegistry) -> Self {
        let engine = Engine::from_registry(
            Arc::new(registry),
            Arc::new(RegistrationLedger::new()),
        );
        Self::with_engine(config, engine)
    }

    /// Creates a bootstrap around a configured engine.
    #[must_use]
    pub fn with_engine(config: LintelConfig, engine: Engine) -> Self {
        Self {
            config: RwLock::new(config),
            engine,
            pipeline: RwLock::new(Arc::new(InterceptorPipeline::new())),
            passes: Mutex::new(()),
            stale: AtomicBool::new(false),
        }
    }

    /// Returns the engine.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Returns the registration ledger.
    #[must_use]
    pub fn ledger(&self) -> &Arc<RegistrationLedger> {
        self.engine.ledger()
    }

    /// Returns the registry scanned by the engine.
    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        self.engine.registry()
    }

    /// Returns a copy of the current configuration.
    #[must_use]
    pub fn config(&self) -> LintelConfig {
        self.config.read().clone()
    }

    /// Returns a snapshot of the live pipeline.
    #[must_use]
    pub fn pipeline(&self) -> Arc<InterceptorPipeline> {
        Arc::clone(&self.pipeline.read())
    }

    /// Initializes logging and metrics from the current configuration.
    ///
    /// Call once, before [`start`](Self::start).
    pub fn init_telemetry(&self) -> LintelResult<TelemetryGuard> {
        let telemetry = self.config.read().telemetry_config();
        Ok(init_telemetry(telemetry)?)
    }

    /// Runs the startup pass, restarting if the configuration says so.
    pub fn start(&self) -> LintelResult<PassReport> {
        let pass = self.config.read().startup_pass();
        self.run(pass)
    }

    /// Validates `config` and runs a pass with it.
    ///
    /// The configuration is kept only if the pass succeeds.
    pub fn reload(&self, config: LintelConfig, restart: bool) -> LintelResult<PassReport> {
        config.validate()?;
        let report = self.run(config.pass_config(restart))?;
        *self.config.write() = config;
        Ok(report)
    }

    /// Loads `path` and runs a restart pass with it.
    pub fn reload_from(&self, path: impl AsRef<Path>) -> LintelResult<PassReport> {
        let config = ConfigLoader::new().with_file(path)?.load()?;
        self.reload(config, true)
    }

    /// Runs a request through the live pipeline and `handler`.
    pub async fn handle<H>(&self, request: Request, handler: H) -> Response
    where
        H: FnOnce(&mut InterceptorContext, Request) -> BoxFuture<'static, Response> + Send,
    {
        let mut ctx = InterceptorContext::new();
        self.handle_with(&mut ctx, request, handler).await
    }

    /// Like [`handle`](Self::handle), with a caller-provided context.
    pub async fn handle_with<H>(
        &self,
        ctx: &mut InterceptorContext,
        request: Request,
        handler: H,
    ) -> Response
    where
        H: FnOnce(&mut InterceptorContext, Request) -> BoxFuture<'static, Response> + Send,
    {
        let pipeline = self.pipeline();
        pipeline.process(ctx, request, handler).await
    }

    /// Reloads from `path` whenever it changes, while `reload.watch` is set.
    ///
    /// Returns immediately if the current configuration does not enable
    /// watching, and stops once a reload disables it. Otherwise the directory holding `path` is watched, so
    /// editors that save through a rename are seen too. Each change runs a
    /// restart pass on the blocking pool. A change that fails to load or
    /// configure is logged and the previous pipeline stays live. Returns
    /// when the watcher stops.
    ///
    /// ```no_run
    /// use lintel::prelude::*;
    /// use std::sync::Arc;
    ///
    /// # async fn example(bootstrap: Arc<Bootstrap>) {
    /// let _watcher = tokio::spawn(Arc::clone(&bootstrap).watch("lintel.toml"));
    /// # }
    /// ```
    pub async fn watch(self: Arc<Self>, path: impl Into<PathBuf>) -> LintelResult<()> {
        let path = path.into();
        let reload = self.config.read().reload.clone();

        if !reload.watch {
            tracing::debug!(path = %path.display(), "configuration watching disabled");
            return Ok(());
        }
        if !path.is_file() {
            return Err(ConfigError::file_not_found(&path).into());
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut watcher = FileWatcher::builder()
            .with_debounce(Duration::from_millis(reload.debounce_ms))
            .watch_path(&dir)?
            .build()?;

        tracing::info!(path = %path.display(), "watching configuration");

        while let Some(event) = watcher.next().await {
            if event.path.file_name() != path.file_name() {
                continue;
            }
            if event.kind == FileChangeKind::Deleted {
                tracing::warn!(path = %path.display(), "configuration file removed, keeping current pipeline");
                continue;
            }

            let this = Arc::clone(&self);
            let target = path.clone();
            match tokio::task::spawn_blocking(move || this.reload_from(&target)).await {
                Ok(Ok(report)) => {
                    tracing::info!(
                        epoch = report.epoch.get(),
                        installed = report.installed.len(),
                        fallback = report.fallback_activated,
                        "configuration reloaded"
                    );
                    if !self.config.read().reload.watch {
                        tracing::info!(path = %path.display(), "configuration watching disabled by reload");
                        break;
                    }
                }
                Ok(Err(e)) => tracing::error!(
                    error = %e,
                    path = %path.display(),
                    "configuration reload failed, keeping current pipeline"
                ),
                Err(e) => tracing::error!(error = %e, "configuration reload task failed"),
            }
        }

        Ok(())
    }

    fn run(&self, mut pass: PassConfig) -> LintelResult<PassReport> {
        let _serial = self.passes.lock();

        if self.stale.load(Ordering::Acquire) && !pass.restart {
            tracing::debug!("previous pass failed, forcing restart");
            pass.restart = true;
        }

        let mut next = if pass.restart {
            InterceptorPipeline::new()
        } else {
            InterceptorPipeline::clone(&self.pipeline.read())
        };

        let report = match self.engine.configure(&pass, &mut next) {
            Ok(report) => report,
            Err(e) => {
                self.stale.store(true, Ordering::Release);
                return Err(e.into());
            }
        };

        self.stale.store(false, Ordering::Release);
        *self.pipeline.write() = Arc::new(next);
        Ok(report)
    }
}

impl fmt::Debug for Bootstrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bootstrap")
            .field("engine", &self.engine)
            .field("pipeline", &self.pipeline.read().names())
            .field("stale", &self.stale.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintel_core::InterceptorType;
    use lintel_middleware::{DefaultInterceptor, TimingInterceptor};

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(InterceptorType::declared::<TimingInterceptor>())
            .with(DefaultInterceptor::metadata())
    }

    #[test]
    fn test_start_without_namespace_installs_fallback() {
        let bootstrap = Bootstrap::new(LintelConfig::default(), registry());

        let report = bootstrap.start().unwrap();

        assert!(report.fallback_activated);
        assert_eq!(bootstrap.pipeline().names(), [DefaultInterceptor::NAME]);
    }

    #[test]
    fn test_snapshot_survives_restart() {
        let config = LintelConfig::builder().namespace("lintel_middleware").build();
        let bootstrap = Bootstrap::new(config.clone(), registry());
        bootstrap.start().unwrap();

        let before = bootstrap.pipeline();
        bootstrap.reload(config, true).unwrap();
        let after = bootstrap.pipeline();

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.names(), after.names());
    }

    #[test]
    fn test_invalid_reload_keeps_config() {
        let bootstrap = Bootstrap::new(LintelConfig::default(), registry());
        bootstrap.start().unwrap();

        let bad = LintelConfig::builder().application("not a key").build();
        assert!(bootstrap.reload(bad, false).is_err());
        assert!(bootstrap.config().interceptors.application.is_empty());
    }

    #[test]
    fn test_debug() {
        let bootstrap = Bootstrap::new(LintelConfig::default(), registry());
        let debug = format!("{bootstrap:?}");
        assert!(debug.contains("Bootstrap"));
        assert!(debug.contains("stale: false"));
    }
}
