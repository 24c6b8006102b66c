//! switchboard-monitor — keeps the dashboard's backend list current.
//!
//! Polls the proxy API's `/v0/backends` endpoint on a fixed cadence and
//! holds the most recent successful response for the renderer.
//!
//! # Architecture
//!
//! ```text
//! poll_backends()
//!   ├── start_polling() → fixed-rate ticks, one task per tick
//!   │   └── BackendSource::fetch() → FetchResult<Vec<BackendRecord>>
//!   └── BackendsView::apply()
//!       ├── Ok  → replace list wholesale
//!       └── Err → keep previous list (logged, not surfaced)
//! ```
//!
//! Fetch failures are never retried out of band: the next tick is the
//! retry. Stopping the poller unmounts the view so late responses are
//! dropped.

pub mod fetcher;
pub mod poller;
pub mod store;

pub use fetcher::{BackendSource, FetchError, FetchResult, HttpBackendSource};
pub use poller::{DEFAULT_POLL_INTERVAL, PollHandle, poll_backends, start_polling};
pub use store::{ApplyOutcome, BackendsView, ViewSnapshot};
