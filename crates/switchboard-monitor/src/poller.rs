//! Poll scheduler: fixed-rate ticks measured from the start instant.
//!
//! The callback fires immediately, then at `start + k * period`. Each tick
//! runs the callback as its own task, so a slow callback never pushes the
//! next tick back. If the runtime itself stalls past a tick, the missed
//! slots are skipped and the cadence stays aligned to the start instant.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::fetcher::BackendSource;
use crate::store::BackendsView;

/// Default time between polls.
pub const DEFAULT_POLL_INTERVAL: Duration =
    Duration::from_millis(switchboard_core::config::DEFAULT_POLL_INTERVAL_MS);

/// Handle to a running poll loop.
///
/// Dropping the handle also ends the loop, so a torn-down view never
/// leaves a timer behind.
pub struct PollHandle {
    handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
    view: Option<BackendsView>,
}

impl PollHandle {
    /// Stop ticking and unmount the attached view.
    ///
    /// Fetches already in flight are allowed to finish; their results are
    /// dropped by the unmounted view.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(view) = &self.view {
            view.unmount().await;
        }
        let _ = self.handle.await;
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Run `callback` now and then every `period` until the handle is stopped.
pub fn start_polling<F, Fut>(callback: F, period: Duration) -> PollHandle
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let period = period.max(Duration::from_millis(1));

    let handle = tokio::spawn(async move {
        run_poll_loop(callback, period, shutdown_rx).await;
    });

    PollHandle {
        handle,
        shutdown_tx,
        view: None,
    }
}

/// Poll `source` every `period` and apply each result to `view`.
///
/// Overlapping fetches are not guarded: if one outlives the period, the
/// next tick starts another, and whichever resolves last is displayed.
pub fn poll_backends<S: BackendSource>(
    source: Arc<S>,
    view: BackendsView,
    period: Duration,
) -> PollHandle {
    let tick_view = view.clone();
    let mut handle = start_polling(
        move || {
            let source = Arc::clone(&source);
            let view = tick_view.clone();
            async move {
                let result = source.fetch().await;
                view.apply(result).await;
            }
        },
        period,
    );
    handle.view = Some(view);

    info!(period_ms = period.as_millis() as u64, "backends poller started");
    handle
}

async fn run_poll_loop<F, Fut>(callback: F, period: Duration, mut shutdown: watch::Receiver<bool>)
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    // The first tick of a tokio interval completes immediately.
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => {
                debug!("poll loop shutting down");
                break;
            }
            _ = ticker.tick() => {
                tokio::spawn(callback());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::StatusCode;
    use switchboard_core::BackendRecord;
    use tokio::time::Instant;

    use crate::fetcher::{FetchError, FetchResult};

    /// Replays scripted responses, each after its own delay.
    struct ScriptedSource {
        script: Mutex<VecDeque<(Duration, FetchResult<Vec<BackendRecord>>)>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(script: Vec<(Duration, FetchResult<Vec<BackendRecord>>)>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl BackendSource for ScriptedSource {
        async fn fetch(&self) -> FetchResult<Vec<BackendRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some((delay, result)) => {
                    tokio::time::sleep(delay).await;
                    result
                }
                None => Err(FetchError::Status(StatusCode::SERVICE_UNAVAILABLE)),
            }
        }
    }

    fn named(names: &[&str]) -> Vec<BackendRecord> {
        names
            .iter()
            .map(|n| BackendRecord::new(n, "127.0.0.1", true, 0))
            .collect()
    }

    fn offsets_ms(start: Instant, fired: &[Instant]) -> Vec<u128> {
        fired.iter().map(|t| (*t - start).as_millis()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn fires_immediately_then_every_period() {
        let start = Instant::now();
        let fired = Arc::new(Mutex::new(Vec::new()));
        let f = Arc::clone(&fired);

        let handle = start_polling(
            move || {
                let f = Arc::clone(&f);
                async move {
                    f.lock().unwrap().push(Instant::now());
                }
            },
            Duration::from_millis(1000),
        );

        tokio::time::sleep(Duration::from_millis(2500)).await;
        handle.stop().await;

        assert_eq!(offsets_ms(start, &fired.lock().unwrap()), vec![0, 1000, 2000]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_callback_does_not_shift_cadence() {
        let start = Instant::now();
        let fired = Arc::new(Mutex::new(Vec::new()));
        let f = Arc::clone(&fired);

        let handle = start_polling(
            move || {
                let f = Arc::clone(&f);
                async move {
                    f.lock().unwrap().push(Instant::now());
                    tokio::time::sleep(Duration::from_millis(1500)).await;
                }
            },
            Duration::from_millis(1000),
        );

        tokio::time::sleep(Duration::from_millis(4500)).await;
        handle.stop().await;

        // Nominal 1000ms cadence, not 1500 + 1000.
        assert_eq!(
            offsets_ms(start, &fired.lock().unwrap()),
            vec![0, 1000, 2000, 3000, 4000]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_ticking() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let handle = start_polling(
            move || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                }
            },
            Duration::from_millis(1000),
        );

        tokio::time::sleep(Duration::from_millis(1500)).await;
        handle.stop().await;
        let after_stop = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
        assert_eq!(after_stop, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_poll_keeps_previously_displayed_list() {
        let source = ScriptedSource::new(vec![
            (Duration::ZERO, Ok(named(&["b", "a", "c"]))),
            (
                Duration::ZERO,
                Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
            ),
        ]);
        let view = BackendsView::new();
        let handle = poll_backends(Arc::clone(&source), view.clone(), Duration::from_millis(1000));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(view.records().await, named(&["b", "a", "c"]));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        let snap = view.snapshot().await;
        assert_eq!(snap.records, named(&["b", "a", "c"]));
        assert_eq!(snap.consecutive_failures, 1);

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_fetches_last_to_resolve_wins() {
        // First fetch resolves at 1500ms, second at 1100ms.
        let source = ScriptedSource::new(vec![
            (Duration::from_millis(1500), Ok(named(&["first"]))),
            (Duration::from_millis(100), Ok(named(&["second"]))),
        ]);
        let view = BackendsView::new();
        let handle = poll_backends(Arc::clone(&source), view.clone(), Duration::from_millis(1000));

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert_eq!(view.records().await, named(&["second"]));

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(view.records().await, named(&["first"]));

        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_discards_in_flight_results() {
        let source = ScriptedSource::new(vec![(Duration::from_millis(500), Ok(named(&["late"])))]);
        let view = BackendsView::new();
        let handle = poll_backends(Arc::clone(&source), view.clone(), Duration::from_millis(1000));

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.stop().await;

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(!view.is_mounted().await);
        assert!(view.records().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_stops_loop() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let handle = start_polling(
            move || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                }
            },
            Duration::from_millis(1000),
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(handle);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
