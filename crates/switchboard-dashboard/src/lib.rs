//! switchboard-dashboard — server-rendered backend health view.
//!
//! Renders the summary banner and the sorted backend table with Askama.
//! The same view code runs twice: once ahead of time for the first-paint
//! document (empty list, embedded client config), and on every client
//! tick for the live fragment built from the poller's snapshot.
//!
//! # Routes
//!
//! | Route | Handler |
//! |---|---|
//! | `/` | First-paint document |
//! | `/view` | Live presenter fragment |
//! | `/v0/backends` | Last polled backend list (JSON) |
//! | `/healthz` | Dashboard liveness |
//! | `/application.js`, `/application.css` | Embedded assets |

pub mod api;
pub mod assets;
pub mod pages;
pub mod partials;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use switchboard_core::DashboardConfig;
use switchboard_monitor::BackendsView;

/// Path of the live fragment, also embedded in the client config.
pub const VIEW_PATH: &str = "/view";

/// Shared state for dashboard handlers.
#[derive(Clone)]
pub struct DashboardState {
    pub view: BackendsView,
    pub config: Arc<DashboardConfig>,
}

/// Build the dashboard router.
pub fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route(VIEW_PATH, get(partials::live_view))
        .route("/v0/backends", get(api::list_backends))
        .route("/healthz", get(api::healthz))
        .route("/application.js", get(assets::application_js))
        .route("/application.css", get(assets::application_css))
        .with_state(state)
}
