use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::sinks::ClockSink;
use crate::utils::sync::lock;

use super::{format_elapsed, StopwatchState};

const ENABLE_LOGS: bool = true;

use crate::log_debug;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

struct Refresher {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl Refresher {
    fn stop(self) {
        self.cancel_token.cancel();
        self.handle.abort();
    }
}

/// Wall-clock stopwatch with a periodic display refresh.
///
/// Elapsed time is measured from `Instant` anchors; the refresh task only
/// folds the running window into the total and reports it, so a late or
/// skipped refresh never loses time.
#[derive(Clone)]
pub struct Stopwatch {
    state: Arc<Mutex<StopwatchState>>,
    refresher: Arc<Mutex<Option<Refresher>>>,
    clock: Arc<dyn ClockSink>,
    refresh_interval: Duration,
}

impl Stopwatch {
    pub fn new(clock: Arc<dyn ClockSink>, refresh_interval: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(StopwatchState::new())),
            refresher: Arc::new(Mutex::new(None)),
            clock,
            refresh_interval,
        }
    }

    pub fn state(&self) -> StopwatchState {
        lock(&self.state).clone()
    }

    pub fn is_running(&self) -> bool {
        lock(&self.state).running
    }

    pub fn elapsed_ms(&self) -> u64 {
        lock(&self.state).current_elapsed_ms(Instant::now())
    }

    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed_ms())
    }

    /// No-op while already running. Must be called inside a tokio runtime.
    pub fn start(&self) {
        if !lock(&self.state).resume(Instant::now()) {
            return;
        }
        log_debug!("stopwatch resumed");
        self.spawn_refresher();
    }

    pub fn pause(&self) {
        if !lock(&self.state).pause(Instant::now()) {
            return;
        }
        self.cancel_refresher();
        log_debug!("stopwatch paused at {} ms", lock(&self.state).elapsed_ms);
    }

    pub fn reset(&self) {
        self.pause();
        lock(&self.state).reset();
        self.clock.report_elapsed(&format_elapsed(0));
    }

    fn spawn_refresher(&self) {
        let mut slot = lock(&self.refresher);
        if let Some(previous) = slot.take() {
            previous.stop();
        }

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(refresh_loop(
            self.state.clone(),
            self.clock.clone(),
            self.refresh_interval,
            cancel_token.clone(),
        ));

        *slot = Some(Refresher {
            handle,
            cancel_token,
        });
    }

    fn cancel_refresher(&self) {
        if let Some(refresher) = lock(&self.refresher).take() {
            refresher.stop();
        }
    }
}

async fn refresh_loop(
    state: Arc<Mutex<StopwatchState>>,
    clock: Arc<dyn ClockSink>,
    period: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let formatted = {
                    let mut guard = lock(&state);
                    if !guard.running {
                        break;
                    }
                    guard.accumulate(Instant::now());
                    guard.formatted()
                };
                clock.report_elapsed(&formatted);
            }
            _ = cancel_token.cancelled() => {
                break;
            }
        }
    }
}
