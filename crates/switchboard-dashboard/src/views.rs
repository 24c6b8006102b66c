//! View types for dashboard template rendering.
//!
//! These types are purpose-built for Askama templates: they carry
//! pre-formatted strings and style classes so templates stay simple.
//! Everything here is a pure function of its input, which lets the same
//! code build the first-paint document and the live fragment.

use std::time::SystemTime;

use serde::Serialize;

use switchboard_core::{BackendRecord, DashboardConfig};

// ── Cluster Summary ─────────────────────────────────────────────

/// Aggregate health of the current backend list. Recomputed on every
/// render, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSummary {
    pub total: usize,
    pub healthy_count: usize,
    pub all_healthy: bool,
    pub message: String,
}

/// Count healthy backends and phrase the banner message.
///
/// An empty list counts as healthy.
pub fn summarize(records: &[BackendRecord]) -> ClusterSummary {
    let total = records.len();
    let healthy_count = records.iter().filter(|r| r.healthy).count();
    let all_healthy = healthy_count == total;

    let message = if all_healthy {
        "All nodes are healthy!".to_string()
    } else {
        format!(
            "{} out of {} nodes are unhealthy.",
            total - healthy_count,
            total
        )
    };

    ClusterSummary {
        total,
        healthy_count,
        all_healthy,
        message,
    }
}

// ── Banner ──────────────────────────────────────────────────────

pub struct BannerView {
    pub alert_class: &'static str,
    pub icon_class: &'static str,
    pub message: String,
}

impl BannerView {
    pub fn from_summary(summary: &ClusterSummary) -> Self {
        let (alert_class, icon_class) = banner_classes(summary.all_healthy);
        Self {
            alert_class,
            icon_class,
            message: summary.message.clone(),
        }
    }
}

/// Alert and icon classes for the summary banner.
pub fn banner_classes(all_healthy: bool) -> (&'static str, &'static str) {
    if all_healthy {
        ("alert alert-success bg-brand-4", "fa fa-check-circle")
    } else {
        ("alert alert-error", "fa fa-exclamation-triangle")
    }
}

// ── Backend Row ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRowView {
    pub name: String,
    pub badge_text: &'static str,
    pub badge_class: &'static str,
    pub badge_icon: &'static str,
    pub session_count: String,
    pub host: String,
}

impl BackendRowView {
    pub fn from_record(record: &BackendRecord) -> Self {
        let (badge_text, badge_class, badge_icon) = badge(record.healthy);
        Self {
            name: record.name.clone(),
            badge_text,
            badge_class,
            badge_icon,
            session_count: record.current_session_count.to_string(),
            host: record.host.clone(),
        }
    }
}

/// Text, label class and icon class of a row's status badge.
pub fn badge(healthy: bool) -> (&'static str, &'static str, &'static str) {
    if healthy {
        ("HEALTHY", "label label-primary mlm plm", "fa fa-check fa-fw")
    } else {
        (
            "UNHEALTHY",
            "label label-primary mlm plm bg-error-2",
            "fa fa-remove fa-fw",
        )
    }
}

/// Rows sorted by name, ascending. Equal names keep their input order.
/// The input slice is left as it was.
pub fn sorted_rows(records: &[BackendRecord]) -> Vec<BackendRowView> {
    let mut sorted: Vec<&BackendRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted.into_iter().map(BackendRowView::from_record).collect()
}

// ── Application View ────────────────────────────────────────────

/// Everything the presenter template needs for one render.
pub struct ApplicationView {
    pub brand: String,
    pub title: String,
    pub last_update: String,
    pub banner: BannerView,
    pub proxy_name: String,
    pub proxy_address: String,
    pub rows: Vec<BackendRowView>,
}

impl ApplicationView {
    pub fn build(
        records: &[BackendRecord],
        last_updated: Option<SystemTime>,
        config: &DashboardConfig,
    ) -> Self {
        let summary = summarize(records);
        Self {
            brand: config.page.brand.clone(),
            title: config.page.title.clone(),
            last_update: format_last_update(last_updated, SystemTime::now()),
            banner: BannerView::from_summary(&summary),
            proxy_name: config.page.proxy_name.clone(),
            proxy_address: config.page.proxy_address.clone(),
            rows: sorted_rows(records),
        }
    }

    /// The state before the first poll: no records, never updated.
    pub fn empty(config: &DashboardConfig) -> Self {
        Self::build(&[], None, config)
    }
}

// ── Client Config ───────────────────────────────────────────────

/// Configuration embedded in the document for the client script.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub view_path: String,
    pub poll_interval_ms: u64,
    pub proxy_name: String,
}

impl ClientConfig {
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            view_path: crate::VIEW_PATH.to_string(),
            poll_interval_ms: config.poll_interval_ms,
            proxy_name: config.page.proxy_name.clone(),
        }
    }

    /// Inline script defining the global `switchboard.config` object.
    ///
    /// `<` is escaped so no value can close the surrounding script element.
    pub fn to_script(&self) -> String {
        let json = serde_json::to_string(self)
            .unwrap_or_else(|_| "{}".to_string())
            .replace('<', "\\u003c");
        format!("var switchboard = {{}}; switchboard.config = {json};")
    }
}

// ── Formatting ──────────────────────────────────────────────────

/// "Last Update" text relative to `now`.
pub fn format_last_update(last_updated: Option<SystemTime>, now: SystemTime) -> String {
    let Some(at) = last_updated else {
        return "never".to_string();
    };
    let secs = now.duration_since(at).unwrap_or_default().as_secs();
    if secs < 5 {
        "Just now".to_string()
    } else if secs < 60 {
        format!("{secs}s ago")
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86400)
    }
}
