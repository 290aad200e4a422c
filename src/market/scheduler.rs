use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::model::symbol::TrackedSymbol;

use super::builder::build_snapshots;
use super::format::DisplayLocale;
use super::state::RefreshState;
use super::TickerSource;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
pub struct FeedSettings {
    pub interval: Duration,
    pub locale: DisplayLocale,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            locale: DisplayLocale::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshRequest {
    /// A cycle will start shortly.
    Accepted,
    /// A cycle is already running; nothing was queued.
    InFlight,
    /// The feed has shut down.
    Stopped,
}

/// Owner of the refresh loop and its state.
///
/// The loop runs until [`MarketFeed::shutdown`] is awaited or the handle is
/// dropped; either way no state is written after the request, including by a
/// fetch that was in flight.
pub struct MarketFeed {
    refresher: Refresher,
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl MarketFeed {
    pub fn spawn<S: TickerSource>(
        source: Arc<S>,
        symbols: Vec<TrackedSymbol>,
        settings: FeedSettings,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(RefreshState::new(settings.locale, &symbols));
        let (refresh_tx, refresh_rx) = mpsc::channel::<()>(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let runner = FeedRunner {
            source,
            symbols,
            locale: settings.locale,
            state_tx,
            refresh_rx,
            shutdown_rx,
        };
        let task = tokio::spawn(runner.run(settings.interval));

        Self {
            refresher: Refresher {
                refresh_tx,
                state_rx,
            },
            shutdown_tx,
            task: Some(task),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<RefreshState> {
        self.refresher.state_rx.clone()
    }

    pub fn state(&self) -> RefreshState {
        self.refresher.state()
    }

    /// Manual refresh. Shares the timer's code path; never overlaps a running cycle.
    pub fn request_refresh(&self) -> RefreshRequest {
        self.refresher.request_refresh()
    }

    /// A cloneable trigger for collaborators that do not own the feed.
    pub fn refresher(&self) -> Refresher {
        self.refresher.clone()
    }

    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Market feed task ended abnormally");
            }
        }
    }
}

impl Drop for MarketFeed {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Manual refresh trigger detached from the feed handle.
///
/// Does not keep the feed alive; once the feed stops, requests report `Stopped`.
#[derive(Clone)]
pub struct Refresher {
    refresh_tx: mpsc::Sender<()>,
    state_rx: watch::Receiver<RefreshState>,
}

impl Refresher {
    pub fn request_refresh(&self) -> RefreshRequest {
        if self.refresh_tx.is_closed() {
            return RefreshRequest::Stopped;
        }
        if self.state_rx.borrow().is_loading() {
            return RefreshRequest::InFlight;
        }
        match self.refresh_tx.try_send(()) {
            Ok(()) => RefreshRequest::Accepted,
            Err(mpsc::error::TrySendError::Full(())) => RefreshRequest::InFlight,
            Err(mpsc::error::TrySendError::Closed(())) => RefreshRequest::Stopped,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state_rx.borrow().clone()
    }
}

struct FeedRunner<S> {
    source: Arc<S>,
    symbols: Vec<TrackedSymbol>,
    locale: DisplayLocale,
    state_tx: watch::Sender<RefreshState>,
    refresh_rx: mpsc::Receiver<()>,
    shutdown_rx: watch::Receiver<bool>,
}

impl<S: TickerSource> FeedRunner<S> {
    async fn run(mut self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            symbols = self.symbols.len(),
            interval_secs = interval.as_secs_f64(),
            "Market feed started"
        );

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown_rx.changed() => break,
                trigger = self.refresh_rx.recv() => {
                    if trigger.is_none() {
                        break;
                    }
                    tracing::debug!("Manual refresh requested");
                }
                _ = ticker.tick() => {}
            }
            if !self.run_cycle().await {
                break;
            }
        }

        tracing::info!("Market feed stopped");
    }

    /// One fetch-and-build cycle. Returns `false` when the feed must stop.
    async fn run_cycle(&mut self) -> bool {
        if self.shutdown_requested() {
            return false;
        }
        if !self.state_tx.send_if_modified(RefreshState::begin_cycle) {
            tracing::debug!("Refresh already in flight, cycle skipped");
            return true;
        }

        let started = Instant::now();
        let fetch = self.source.fetch_snapshot(&self.symbols);
        tokio::pin!(fetch);

        let outcome = loop {
            tokio::select! {
                biased;
                _ = self.shutdown_rx.changed() => {
                    tracing::info!("Shutdown during refresh, in-flight cycle dropped");
                    return false;
                }
                result = &mut fetch => break result,
                trigger = self.refresh_rx.recv() => {
                    if trigger.is_none() {
                        return false;
                    }
                    tracing::debug!("Refresh already in flight, trigger dropped");
                }
            }
        };

        if self.shutdown_requested() {
            return false;
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(tickers) => {
                let snapshots = build_snapshots(self.locale, &self.symbols, &tickers);
                let degraded = snapshots.iter().filter(|s| s.degraded).count();
                self.state_tx
                    .send_modify(|state| state.complete_success(snapshots, chrono::Utc::now()));
                tracing::info!(
                    symbols = self.symbols.len(),
                    degraded,
                    elapsed_ms,
                    "Market snapshot refreshed"
                );
            }
            Err(e) => {
                self.state_tx.send_modify(RefreshState::complete_failure);
                tracing::warn!(
                    symbol = e.symbol(),
                    error = %e,
                    elapsed_ms,
                    "Market refresh failed, keeping last snapshot"
                );
            }
        }
        true
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown_rx.borrow()
    }
}
