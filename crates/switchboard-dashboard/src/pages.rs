//! Static renderer for the first page load.
//!
//! The document embeds the presenter rendered with an empty backend list
//! and the `switchboard.config` object the client script boots from.
//! Rendering it never touches the poller.

use askama::Template;
use axum::extract::State;
use axum::response::Html;
use tracing::error;

use switchboard_core::DashboardConfig;

use crate::DashboardState;
use crate::views::{ApplicationView, ClientConfig};

pub(crate) fn render(result: askama::Result<String>) -> Html<String> {
    Html(result.unwrap_or_else(|e| {
        error!(error = %e, "template render failed");
        format!("<pre>Template error: {e}</pre>")
    }))
}

// ── Presenter ───────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "_partials/application.html")]
struct ApplicationTemplate<'a> {
    view: &'a ApplicationView,
}

/// Render the presenter (banner, proxy panel and backend table).
pub fn render_application(view: &ApplicationView) -> askama::Result<String> {
    ApplicationTemplate { view }.render()
}

// ── Document ────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "layout.html")]
struct DocumentTemplate<'a> {
    title: &'a str,
    stylesheets: &'a [String],
    scripts: &'a [String],
    body_class: &'a str,
    app_html: String,
    config_script: String,
}

/// Render the complete first-paint document.
pub fn render_document(config: &DashboardConfig) -> askama::Result<String> {
    let app_html = render_application(&ApplicationView::empty(config))?;
    let config_script = ClientConfig::from_config(config).to_script();

    DocumentTemplate {
        title: &config.page.title,
        stylesheets: &config.page.stylesheets,
        scripts: &config.page.scripts,
        body_class: &config.page.body_class,
        app_html,
        config_script,
    }
    .render()
}

pub async fn index(State(state): State<DashboardState>) -> Html<String> {
    render(render_document(&state.config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard_core::BackendRecord;

    #[test]
    fn document_contains_empty_state_and_boot_config() {
        let html = render_document(&DashboardConfig::default()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<link rel="stylesheet" type="text/css" href="pivotal-ui.min.css">"#));
        assert!(html.contains(r#"<link rel="stylesheet" type="text/css" href="application.css">"#));
        assert!(html.contains(r#"<div id="root">"#));
        assert!(html.contains("All nodes are healthy!"));
        assert!(html.contains("alert alert-success bg-brand-4"));
        assert!(html.contains("Last Update: never"));
        assert!(html.contains(">Pivotal Switchboard</h1>"));
        assert!(!html.contains("backend-row"));
        assert!(html.contains("var switchboard = {}; switchboard.config = {"));
        assert!(html.contains(r#"<script type="text/javascript" src="application.js"></script>"#));
    }

    #[test]
    fn config_script_precedes_client_bundle() {
        let html = render_document(&DashboardConfig::default()).unwrap();
        let config_at = html.find("switchboard.config").unwrap();
        let bundle_at = html.find(r#"src="application.js""#).unwrap();
        assert!(config_at < bundle_at);
    }

    #[test]
    fn hostile_page_values_are_escaped() {
        let mut config = DashboardConfig::default();
        config.page.proxy_name = "<script>alert(1)</script>".to_string();
        let html = render_document(&config).unwrap();
        assert!(!html.contains("<script>alert(1)"));
    }

    #[test]
    fn application_renders_sorted_rows_with_badges() {
        let records = vec![
            BackendRecord::new("node-b", "10.0.0.2", false, 3),
            BackendRecord::new("node-a", "10.0.0.1", true, 9),
        ];
        let view = ApplicationView::build(&records, None, &DashboardConfig::default());
        let html = render_application(&view).unwrap();

        assert_eq!(html.matches("backend-row").count(), 2);
        let a = html.find("node-a").unwrap();
        let b = html.find("node-b").unwrap();
        assert!(a < b);
        assert!(html.contains("1 out of 2 nodes are unhealthy."));
        assert!(html.contains("alert alert-error"));
        assert!(html.contains("fa fa-exclamation-triangle"));
        assert!(html.contains("label label-primary mlm plm bg-error-2"));
        assert!(html.contains("UNHEALTHY"));
        assert!(html.contains("IP Address: 0.0.0.16"));
    }
}
