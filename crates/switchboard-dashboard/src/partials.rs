//! Live view fragment.
//!
//! The client script fetches this on every tick and swaps it into
//! `#root`. It is the same presenter markup the document embeds, built
//! from the poller's latest snapshot instead of an empty list.

use axum::extract::State;
use axum::response::Html;

use crate::DashboardState;
use crate::pages::{render, render_application};
use crate::views::ApplicationView;

pub async fn live_view(State(state): State<DashboardState>) -> Html<String> {
    let snapshot = state.view.snapshot().await;
    let view = ApplicationView::build(&snapshot.records, snapshot.last_updated, &state.config);
    render(render_application(&view))
}
