//! Configuration pass scenarios.

use http::StatusCode;
use lintel_core::{InterceptorContext, PatternSpec, Request, Response, ResponseExt, TypeKey};
use lintel_discovery::{
    Engine, EngineError, InstallSource, IssueKind, PassConfig, Rejection, RegistrationLedger,
    SkipReason, TypeRegistry,
};
use lintel_middleware::{DefaultInterceptor, InstallError};
use lintel_test::{types, FailingScanner, RecordingRegistry, StaticScanner, TestRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn key(path: &str) -> TypeKey {
    TypeKey::new(path)
}

fn engine_with(scanned: &[&str], registry: TypeRegistry) -> Engine {
    let sentinel = DefaultInterceptor::key();
    let keys: Vec<TypeKey> = scanned
        .iter()
        .map(|k| if *k == "sentinel" { sentinel.clone() } else { key(k) })
        .collect();
    Engine::new(
        Arc::new(StaticScanner::new(keys)),
        Arc::new(registry.with(DefaultInterceptor::metadata())),
        Arc::new(RegistrationLedger::new()),
    )
}

fn scan(namespace: &str) -> PassConfig {
    PassConfig::new().with_namespace(namespace)
}

fn ok_handler(
    _ctx: &mut InterceptorContext,
    _request: Request,
) -> lintel_core::BoxFuture<'static, Response> {
    Box::pin(async { Response::text(StatusCode::OK, "ok") })
}

#[test]
fn test_only_eligible_candidate_installed() {
    let registry = TypeRegistry::new()
        .with(types::abstract_base("app::A"))
        .with(types::probe("app::B", "b", ["/api/**"], ["/api/health"]));
    let engine = engine_with(&["app::A", "app::B", "sentinel"], registry);
    let mut target = RecordingRegistry::new();

    let report = engine.configure(&scan("app"), &mut target).unwrap();

    assert_eq!(target.names(), ["b"]);
    assert_eq!(target.calls()[0].include, ["/api/**"]);
    assert_eq!(target.calls()[0].exclude, ["/api/health"]);
    assert!(!report.fallback_activated);
    assert_eq!(
        report.skip_reason(&key("app::A")),
        Some(SkipReason::Rejected(Rejection::Abstract))
    );
    assert_eq!(
        report.skip_reason(&DefaultInterceptor::key()),
        Some(SkipReason::Rejected(Rejection::Sentinel))
    );
    assert!(report.is_clean());
}

#[tokio::test]
async fn test_installed_patterns_route_requests() {
    let registry =
        TypeRegistry::new().with(types::probe("app::B", "b", ["/api/**"], ["/api/health"]));
    let engine = engine_with(&["app::B"], registry);
    let mut target = RecordingRegistry::new();
    engine.configure(&scan("app"), &mut target).unwrap();
    let pipeline = target.into_pipeline();

    let mut ctx = InterceptorContext::new();
    let response = pipeline
        .process(
            &mut ctx,
            TestRequest::get("/api/users").build().unwrap(),
            ok_handler,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ctx.trail(), ["b"]);

    let mut ctx = InterceptorContext::new();
    pipeline
        .process(
            &mut ctx,
            TestRequest::get("/api/health").build().unwrap(),
            ok_handler,
        )
        .await;
    assert!(ctx.trail().is_empty());
}

#[test]
fn test_empty_namespace_installs_fallback() {
    let engine = engine_with(&["app::B"], TypeRegistry::new());
    let mut target = RecordingRegistry::new();

    for blank in [scan(""), scan("   ")] {
        let report = engine_with(&["app::B"], TypeRegistry::new())
            .configure(&blank, &mut RecordingRegistry::new())
            .unwrap();
        assert!(report.fallback_activated);
        assert!(report.is_clean());
    }

    let report = engine.configure(&PassConfig::new(), &mut target).unwrap();

    assert!(report.fallback_activated);
    assert_eq!(target.names(), [DefaultInterceptor::NAME]);
    assert_eq!(target.calls()[0].include, [PatternSpec::MATCH_ALL]);
    assert!(target.calls()[0].exclude.is_empty());
    assert_eq!(report.installed[0].source, InstallSource::Fallback);
    assert!(engine.ledger().is_installed(&DefaultInterceptor::key()));
}

#[test]
fn test_scan_is_skipped_without_namespace() {
    let scanner = Arc::new(StaticScanner::new(["app::B"]));
    let engine = Engine::new(
        Arc::clone(&scanner) as Arc<dyn lintel_discovery::Scanner>,
        Arc::new(TypeRegistry::new().with(types::probe_all("app::B", "b"))),
        Arc::new(RegistrationLedger::new()),
    );

    engine
        .configure(&PassConfig::new(), &mut RecordingRegistry::new())
        .unwrap();
    assert!(scanner.requests().is_empty());

    engine
        .configure(&scan(" app "), &mut RecordingRegistry::new())
        .unwrap();
    assert_eq!(scanner.requests(), ["app"]);
}

#[test]
fn test_discovery_failure_still_runs_application_candidates() {
    let engine = Engine::new(
        Arc::new(FailingScanner::new("index corrupt")),
        Arc::new(TypeRegistry::new().with(types::probe_all("lib::Audit", "audit"))),
        Arc::new(RegistrationLedger::new()),
    );
    let mut target = RecordingRegistry::new();

    let report = engine
        .configure(&scan("app").with_application("lib::Audit"), &mut target)
        .unwrap();

    assert_eq!(target.names(), ["audit"]);
    assert!(!report.fallback_activated);
    let issues: Vec<_> = report.issues_of(IssueKind::Discovery).collect();
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("index corrupt"));
    assert!(issues[0].key.is_none());
}

#[test]
fn test_discovery_failure_falls_back() {
    let engine = Engine::new(
        Arc::new(FailingScanner::default()),
        Arc::new(TypeRegistry::new()),
        Arc::new(RegistrationLedger::new()),
    );
    let mut target = RecordingRegistry::new();

    let report = engine.configure(&scan("app"), &mut target).unwrap();

    assert!(report.fallback_activated);
    assert_eq!(target.names(), [DefaultInterceptor::NAME]);
}

#[test]
fn test_instantiation_failure_skips_candidate() {
    let registry = TypeRegistry::new()
        .with(types::probe_all("app::A", "a"))
        .with(types::failing("app::C", "database unreachable"))
        .with(types::probe_all("app::D", "d"));
    let engine = engine_with(&["app::A", "app::C", "app::D"], registry);
    let mut target = RecordingRegistry::new();

    let report = engine.configure(&scan("app"), &mut target).unwrap();

    assert_eq!(target.names(), ["a", "d"]);
    let issues: Vec<_> = report.issues_of(IssueKind::Instantiation).collect();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].key, Some(key("app::C")));
    assert!(!engine.ledger().is_installed(&key("app::C")));
}

#[test]
fn test_unresolved_key_is_skipped() {
    let registry = TypeRegistry::new().with(types::probe_all("app::A", "a"));
    let engine = engine_with(&["app::Gone", "app::A"], registry);
    let mut target = RecordingRegistry::new();

    let report = engine.configure(&scan("app"), &mut target).unwrap();

    assert_eq!(target.names(), ["a"]);
    let issues: Vec<_> = report.issues_of(IssueKind::Resolution).collect();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].key, Some(key("app::Gone")));
}

#[test]
fn test_rejections_never_reach_install() {
    let registry = TypeRegistry::new()
        .with(types::unannotated("app::U"))
        .with(types::not_interceptor("app::N"))
        .with(types::abstract_base("app::A"));
    let engine = engine_with(&["app::U", "app::N", "app::A", "sentinel"], registry);
    let mut target = RecordingRegistry::new();

    let report = engine.configure(&scan("app"), &mut target).unwrap();

    // Only the fallback, which the policy installs after scanning.
    assert_eq!(target.names(), [DefaultInterceptor::NAME]);
    assert_eq!(report.installed.len(), 1);
    assert_eq!(report.installed[0].source, InstallSource::Fallback);
    assert_eq!(
        report.skip_reason(&key("app::U")),
        Some(SkipReason::Rejected(Rejection::MissingPatterns))
    );
    assert_eq!(
        report.skip_reason(&key("app::N")),
        Some(SkipReason::Rejected(Rejection::NotAnInterceptor))
    );
}

#[test]
fn test_application_sentinel_is_rejected() {
    let engine = engine_with(&[], TypeRegistry::new());
    let mut target = RecordingRegistry::new();

    let report = engine
        .configure(
            &PassConfig::new().with_application(DefaultInterceptor::key()),
            &mut target,
        )
        .unwrap();

    // Rejected as a candidate, installed once by the fallback policy.
    assert_eq!(target.count(DefaultInterceptor::NAME), 1);
    assert!(report.fallback_activated);
    assert_eq!(
        report.skipped[0].reason,
        SkipReason::Rejected(Rejection::Sentinel)
    );
}

#[test]
fn test_repeated_pass_installs_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = TypeRegistry::new()
        .with(types::counted("app::A", "a", Arc::clone(&calls)))
        .with(types::probe_all("app::B", "b"));
    let engine = engine_with(&["app::A", "app::B"], registry);
    let mut target = RecordingRegistry::new();

    let first = engine.configure(&scan("app"), &mut target).unwrap();
    let second = engine.configure(&scan("app"), &mut target).unwrap();

    assert_eq!(target.names(), ["a", "b"]);
    assert_eq!(first.installed.len(), 2);
    assert!(second.installed.is_empty());
    assert!(!second.fallback_activated);
    assert_eq!(
        second.skip_reason(&key("app::A")),
        Some(SkipReason::AlreadyRegistered)
    );
    assert_eq!(first.epoch, second.epoch);
    // A fresh instance is built on every pass, even when it is not installed.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_repeated_fallback_pass_installs_once() {
    let engine = engine_with(&[], TypeRegistry::new());
    let mut target = RecordingRegistry::new();

    engine.configure(&PassConfig::new(), &mut target).unwrap();
    let second = engine.configure(&PassConfig::new(), &mut target).unwrap();

    assert_eq!(target.count(DefaultInterceptor::NAME), 1);
    assert!(!second.fallback_activated);
    assert_eq!(engine.ledger().live_count(), 1);
}

#[test]
fn test_restart_reinstalls() {
    let registry = TypeRegistry::new().with(types::probe_all("app::A", "a"));
    let engine = engine_with(&["app::A"], registry);

    let mut first_target = RecordingRegistry::new();
    let first = engine.configure(&scan("app"), &mut first_target).unwrap();

    let mut second_target = RecordingRegistry::new();
    let second = engine
        .configure(&scan("app").with_restart(true), &mut second_target)
        .unwrap();

    assert_eq!(first_target.names(), ["a"]);
    assert_eq!(second_target.names(), ["a"]);
    assert!(second.restarted);
    assert!(second.epoch > first.epoch);
    assert_eq!(engine.ledger().live_count(), 1);
    assert_eq!(engine.ledger().snapshot().len(), 1);
}

#[test]
fn test_restart_with_nothing_eligible_falls_back_again() {
    let engine = engine_with(&[], TypeRegistry::new());

    let mut target = RecordingRegistry::new();
    engine.configure(&PassConfig::new(), &mut target).unwrap();

    let mut target = RecordingRegistry::new();
    let report = engine
        .configure(&PassConfig::new().with_restart(true), &mut target)
        .unwrap();

    assert!(report.fallback_activated);
    assert_eq!(target.names(), [DefaultInterceptor::NAME]);
}

#[test]
fn test_install_failure_is_fatal_and_released() {
    let registry = TypeRegistry::new()
        .with(types::probe_all("app::A", "a"))
        .with(types::probe_all("app::B", "b"))
        .with(types::probe_all("app::C", "c"));
    let engine = engine_with(&["app::A", "app::B", "app::C"], registry);
    let mut target = RecordingRegistry::new().refusing("b");

    let err = engine.configure(&scan("app"), &mut target).unwrap_err();

    let EngineError::Install { key: failed, source } = err;
    assert_eq!(failed, key("app::B"));
    assert!(matches!(source, InstallError::Rejected { .. }));

    // Earlier installs stay; the failed key is free to register again.
    assert_eq!(target.names(), ["a"]);
    assert!(engine.ledger().is_installed(&key("app::A")));
    assert!(!engine.ledger().is_installed(&key("app::B")));
    assert!(!engine.ledger().is_installed(&key("app::C")));
}

#[test]
fn test_invalid_pattern_is_fatal() {
    let registry = TypeRegistry::new().with(types::probe("app::Bad", "bad", ["api/**"], ["/x"]));
    let engine = engine_with(&["app::Bad"], registry);

    let err = engine
        .configure(&scan("app"), &mut RecordingRegistry::new())
        .unwrap_err();

    assert_eq!(err.key(), &key("app::Bad"));
    assert!(matches!(
        err,
        EngineError::Install {
            source: InstallError::InvalidPattern { .. },
            ..
        }
    ));
}

#[test]
fn test_install_order() {
    let registry = TypeRegistry::new()
        .with(types::probe_all("lib::First", "app-1"))
        .with(types::probe_all("app::Z", "z"))
        .with(types::probe_all("app::Y", "y"))
        .with(types::probe_all("lib::Second", "app-2"));
    let engine = engine_with(&["app::Z", "app::Y"], registry);
    let mut target = RecordingRegistry::new();

    let report = engine
        .configure(
            &scan("app")
                .with_application("lib::First")
                .with_application("lib::Second"),
            &mut target,
        )
        .unwrap();

    assert_eq!(target.names(), ["z", "y", "app-1", "app-2"]);
    let sources: Vec<_> = report.installed.iter().map(|i| i.source).collect();
    assert_eq!(
        sources,
        [
            InstallSource::Scan,
            InstallSource::Scan,
            InstallSource::Application,
            InstallSource::Application
        ]
    );
}

#[test]
fn test_scanned_and_application_duplicate_installs_once() {
    let registry = TypeRegistry::new().with(types::probe_all("app::A", "a"));
    let engine = engine_with(&["app::A"], registry);
    let mut target = RecordingRegistry::new();

    let report = engine
        .configure(&scan("app").with_application("app::A"), &mut target)
        .unwrap();

    assert_eq!(target.names(), ["a"]);
    assert_eq!(
        report.skip_reason(&key("app::A")),
        Some(SkipReason::AlreadyRegistered)
    );
}

#[tokio::test]
async fn test_blocking_candidate_short_circuits() {
    let registry = TypeRegistry::new()
        .with(types::probe_all("app::A", "a"))
        .with(types::blocking("app::Guard", "guard", StatusCode::UNAUTHORIZED))
        .with(types::probe_all("app::Z", "z"));
    let engine = engine_with(&["app::A", "app::Guard", "app::Z"], registry);
    let mut target = RecordingRegistry::new();
    engine.configure(&scan("app"), &mut target).unwrap();

    let mut ctx = InterceptorContext::new();
    let response = target
        .pipeline()
        .process(&mut ctx, TestRequest::get("/x").build().unwrap(), ok_handler)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.trail(), ["a", "guard"]);
}
