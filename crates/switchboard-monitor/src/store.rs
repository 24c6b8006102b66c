//! Live backend list shared between the poll loop and the HTTP handlers.
//!
//! Each successful poll replaces the list wholesale. A failed poll leaves
//! it untouched, and once the view is unmounted every result is dropped.

use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use switchboard_core::BackendRecord;

use crate::fetcher::FetchResult;

/// What [`BackendsView::apply`] did with a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The list was replaced.
    Replaced,
    /// The fetch failed; the previous list is still displayed.
    KeptPrevious,
    /// The view was torn down before the result arrived.
    Discarded,
}

/// Point-in-time copy of the view, handed to the renderer.
#[derive(Debug, Clone, Default)]
pub struct ViewSnapshot {
    pub records: Vec<BackendRecord>,
    /// Wall-clock time of the last successful poll.
    pub last_updated: Option<SystemTime>,
    /// Number of successful polls applied so far.
    pub generation: u64,
    pub consecutive_failures: u32,
}

#[derive(Debug)]
struct ViewState {
    records: Vec<BackendRecord>,
    mounted: bool,
    last_updated: Option<SystemTime>,
    generation: u64,
    consecutive_failures: u32,
}

/// Shared handle to the live backend list.
#[derive(Debug, Clone)]
pub struct BackendsView {
    inner: Arc<RwLock<ViewState>>,
}

impl Default for BackendsView {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendsView {
    /// A mounted view with an empty list. There is no separate loading state.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<BackendRecord>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ViewState {
                records,
                mounted: true,
                last_updated: None,
                generation: 0,
                consecutive_failures: 0,
            })),
        }
    }

    /// Apply the outcome of one poll.
    ///
    /// Responses are applied in the order they resolve, not the order they
    /// were requested: with overlapping fetches the slowest one wins.
    pub async fn apply(&self, result: FetchResult<Vec<BackendRecord>>) -> ApplyOutcome {
        let mut state = self.inner.write().await;
        if !state.mounted {
            debug!("view unmounted, dropping poll result");
            return ApplyOutcome::Discarded;
        }

        match result {
            Ok(records) => {
                if state.consecutive_failures > 0 {
                    info!(
                        failures = state.consecutive_failures,
                        "backends fetch recovered"
                    );
                }
                state.records = records;
                state.last_updated = Some(SystemTime::now());
                state.generation += 1;
                state.consecutive_failures = 0;
                ApplyOutcome::Replaced
            }
            Err(e) => {
                state.consecutive_failures += 1;
                if state.consecutive_failures == 1 {
                    warn!(error = %e, "backends fetch failed, keeping previous list");
                } else {
                    debug!(
                        error = %e,
                        failures = state.consecutive_failures,
                        "backends fetch still failing"
                    );
                }
                ApplyOutcome::KeptPrevious
            }
        }
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let state = self.inner.read().await;
        ViewSnapshot {
            records: state.records.clone(),
            last_updated: state.last_updated,
            generation: state.generation,
            consecutive_failures: state.consecutive_failures,
        }
    }

    pub async fn records(&self) -> Vec<BackendRecord> {
        self.inner.read().await.records.clone()
    }

    /// Tear the view down. Later results are discarded.
    pub async fn unmount(&self) {
        self.inner.write().await.mounted = false;
    }

    pub async fn is_mounted(&self) -> bool {
        self.inner.read().await.mounted
    }
}
