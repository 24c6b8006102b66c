//! Wiring for the switchboard dashboard daemon.
//!
//! Assembles the poller, the live view and the HTTP surface:
//!
//! ```text
//! HttpBackendSource ──poll_backends()──▶ BackendsView ◀── dashboard_router()
//!                                                          ├── ServeDir fallback (page.static_dir)
//!                                                          └── TraceLayer, CatchPanicLayer
//! ```

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use switchboard_core::DashboardConfig;
use switchboard_dashboard::pages::render_document;
use switchboard_dashboard::{DashboardState, dashboard_router};
use switchboard_monitor::{BackendsView, HttpBackendSource, poll_backends};

/// Build the complete HTTP router with request tracing and panic recovery.
///
/// When `page.static_dir` is set, paths no dashboard route claims are
/// served from that directory.
pub fn build_router(state: DashboardState) -> Router {
    let static_dir = state.config.page.static_dir.clone();
    let mut router = dashboard_router(state);
    if let Some(dir) = static_dir {
        info!(dir = ?dir, "serving static files");
        router = router.fallback_service(ServeDir::new(dir));
    }
    router
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
}

/// Write the first-paint document to `out`, creating parent directories.
///
/// Needs no runtime and never contacts the upstream.
pub fn render_to(config: &DashboardConfig, out: &Path) -> anyhow::Result<()> {
    let html = render_document(config)?;
    if let Some(dir) = out.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(out, html)?;
    info!(path = ?out, "document written");
    Ok(())
}

/// Bind `config.listen` and serve until `shutdown` resolves.
pub async fn run(
    config: DashboardConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.listen).await?;
    run_with_listener(listener, config, shutdown).await
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// The poller starts before the server and is stopped after it drains.
pub async fn run_with_listener(
    listener: TcpListener,
    config: DashboardConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let view = BackendsView::new();
    let source = Arc::new(HttpBackendSource::from_config(&config.upstream));
    info!(upstream = %source.uri(), "polling upstream backends");

    let poller = poll_backends(source, view.clone(), config.poll_interval());

    let state = DashboardState {
        view,
        config: Arc::new(config),
    };
    let router = build_router(state);

    let addr = listener.local_addr()?;
    info!(%addr, "dashboard server starting");

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await;

    poller.stop().await;
    info!("dashboard server stopped");

    served?;
    Ok(())
}
