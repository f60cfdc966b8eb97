//! Startup, reload and request handling through `Bootstrap`.

use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use lintel::prelude::*;
use lintel::config::ReloadConfig;
use lintel::LintelError;
use lintel_test::{types, TestRequest, TestResponse};
use tempfile::TempDir;

fn ok(_ctx: &mut InterceptorContext, _req: Request) -> BoxFuture<'static, Response> {
    Box::pin(async { Response::text(StatusCode::OK, "handled") })
}

fn registry() -> TypeRegistry {
    TypeRegistry::new()
        .with(types::abstract_base("app::interceptors::Base"))
        .with(types::probe(
            "app::interceptors::Api",
            "api",
            ["/api/**"],
            ["/api/health"],
        ))
        .with(types::probe_all("app::extra::Audit", "audit"))
        .with(DefaultInterceptor::metadata())
}

fn scanning(namespace: &str) -> LintelConfig {
    LintelConfig::builder().namespace(namespace).build()
}

#[tokio::test]
async fn start_routes_requests() {
    let bootstrap = Bootstrap::new(scanning("app::interceptors"), registry());
    let report = bootstrap.start().unwrap();

    assert_eq!(
        report.installed_keys(),
        [&TypeKey::new("app::interceptors::Api")]
    );

    let mut ctx = InterceptorContext::new();
    let request = TestRequest::get("/api/users").build().unwrap();
    let response = bootstrap.handle_with(&mut ctx, request, ok).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ctx.trail(), ["api"]);

    let mut ctx = InterceptorContext::new();
    let request = TestRequest::get("/api/health").build().unwrap();
    bootstrap.handle_with(&mut ctx, request, ok).await;
    assert!(ctx.trail().is_empty());
}

#[tokio::test]
async fn empty_configuration_installs_default() {
    let bootstrap = Bootstrap::new(LintelConfig::default(), registry());
    let report = bootstrap.start().unwrap();
    assert!(report.fallback_activated);

    let mut ctx = InterceptorContext::new();
    let request = TestRequest::get("/anything/at/all").build().unwrap();
    let response = bootstrap.handle_with(&mut ctx, request, ok).await;

    let response = TestResponse::from_response(response).await.unwrap();
    assert_eq!(response.text(), "handled");
    assert_eq!(ctx.trail(), [DefaultInterceptor::NAME]);
}

#[test]
fn reload_without_restart_adds_to_live_pipeline() {
    let bootstrap = Bootstrap::new(scanning("app::interceptors"), registry());
    bootstrap.start().unwrap();

    let config = LintelConfig::builder()
        .namespace("app::interceptors")
        .application("app::extra::Audit")
        .build();
    let report = bootstrap.reload(config, false).unwrap();

    assert_eq!(
        report.installed_keys(),
        [&TypeKey::new("app::extra::Audit")]
    );
    assert_eq!(
        report.skip_reason(&TypeKey::new("app::interceptors::Api")),
        Some(SkipReason::AlreadyRegistered)
    );
    assert_eq!(bootstrap.pipeline().names(), ["api", "audit"]);
    assert_eq!(bootstrap.config().interceptors.application, ["app::extra::Audit"]);
}

#[test]
fn restart_reload_replaces_pipeline() {
    let bootstrap = Bootstrap::new(scanning("app::interceptors"), registry());
    bootstrap.start().unwrap();
    let before = bootstrap.pipeline();

    let report = bootstrap.reload(scanning("app::extra"), true).unwrap();

    assert!(report.restarted);
    assert_eq!(bootstrap.pipeline().names(), ["audit"]);
    assert_eq!(before.names(), ["api"]);
}

#[test]
fn repeated_start_installs_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry =
        TypeRegistry::new().with(types::counted("app::interceptors::Counted", "counted", Arc::clone(&calls)));
    let bootstrap = Bootstrap::new(scanning("app::interceptors"), registry);

    bootstrap.start().unwrap();
    let second = bootstrap.start().unwrap();

    assert!(second.installed.is_empty());
    assert_eq!(bootstrap.pipeline().names(), ["counted"]);
}

#[test]
fn failed_pass_keeps_previous_pipeline_and_forces_restart() {
    let registry = registry().with(types::probe(
        "app::broken::BadPattern",
        "bad",
        ["api/**"],
        Vec::<String>::new(),
    ));
    let bootstrap = Bootstrap::new(scanning("app::interceptors"), registry);
    bootstrap.start().unwrap();
    let live = bootstrap.pipeline();

    let err = bootstrap.reload(scanning("app::broken"), false).unwrap_err();
    assert!(matches!(err, LintelError::Engine(_)));
    assert!(Arc::ptr_eq(&live, &bootstrap.pipeline()));
    assert_eq!(bootstrap.config().interceptors.namespace, "app::interceptors");

    let report = bootstrap.reload(scanning("app::interceptors"), false).unwrap();
    assert!(report.restarted);
    assert_eq!(bootstrap.pipeline().names(), ["api"]);
}

#[test]
fn reload_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lintel.toml");
    fs::write(&path, "[interceptors]\nnamespace = \"app::extra\"\n").unwrap();

    let bootstrap = Bootstrap::new(LintelConfig::default(), registry());
    bootstrap.start().unwrap();

    let report = bootstrap.reload_from(&path).unwrap();
    assert!(report.restarted);
    assert_eq!(bootstrap.pipeline().names(), ["audit"]);

    fs::write(&path, "[interceptors]\nnamespace = \"app..extra\"\n").unwrap();
    let err = bootstrap.reload_from(&path).unwrap_err();
    assert!(matches!(err, LintelError::Config(_)));
    assert_eq!(bootstrap.pipeline().names(), ["audit"]);
}

fn watching(namespace: &str) -> LintelConfig {
    LintelConfig::builder()
        .namespace(namespace)
        .reload(ReloadConfig {
            watch: true,
            debounce_ms: 50,
        })
        .build()
}

/// Replaces `path` through a rename, the way editors save.
fn save(path: &Path, namespace: &str) {
    let staged = path.with_extension("toml.tmp");
    let content = format!(
        "[interceptors]\nnamespace = \"{namespace}\"\n\n[reload]\nwatch = true\ndebounce_ms = 50\n"
    );
    fs::write(&staged, content).unwrap();
    fs::rename(&staged, path).unwrap();
}

async fn wait_for_names(bootstrap: &Bootstrap, expected: &[&str]) -> bool {
    for _ in 0..100 {
        if bootstrap.pipeline().names() == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn watch_returns_when_disabled() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lintel.toml");
    fs::write(&path, "").unwrap();

    let bootstrap = Arc::new(Bootstrap::new(LintelConfig::default(), registry()));
    assert!(!bootstrap.config().reload.watch);

    let result = tokio::time::timeout(Duration::from_millis(300), bootstrap.watch(&path)).await;
    assert!(matches!(result, Ok(Ok(()))));
}

#[tokio::test]
async fn watch_requires_existing_file() {
    let bootstrap = Arc::new(Bootstrap::new(watching("app::interceptors"), registry()));
    let err = bootstrap.watch("/nonexistent/lintel.toml").await.unwrap_err();
    assert!(matches!(err, LintelError::Config(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn watch_reloads_on_change_and_survives_bad_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lintel.toml");
    save(&path, "app::interceptors");

    let bootstrap = Arc::new(Bootstrap::new(watching("app::interceptors"), registry()));
    bootstrap.start().unwrap();
    assert_eq!(bootstrap.pipeline().names(), ["api"]);

    let watcher = tokio::spawn(Arc::clone(&bootstrap).watch(path.clone()));
    tokio::time::sleep(Duration::from_millis(200)).await;

    save(&path, "app::extra");
    assert!(wait_for_names(&bootstrap, &["audit"]).await);
    let live = bootstrap.pipeline();

    tokio::time::sleep(Duration::from_millis(100)).await;
    save(&path, "app..extra");
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(Arc::ptr_eq(&live, &bootstrap.pipeline()));
    assert_eq!(bootstrap.config().interceptors.namespace, "app::extra");

    // The loop is still running after the failed reload.
    save(&path, "app::interceptors");
    assert!(wait_for_names(&bootstrap, &["api"]).await);

    watcher.abort();
}
