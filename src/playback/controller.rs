use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::segmentation::{Document, WordList};
use crate::sinks::Sinks;
use crate::timer::{format_elapsed, Stopwatch};
use crate::utils::sync::lock;

use super::state::{PlaybackSnapshot, PlaybackState, PlaybackStatus, TickOutcome};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

pub const EMPTY_TEXT_MESSAGE: &str = "No text to play!";
pub const END_OF_TEXT_MESSAGE: &str = "End of text reached!";

/// Drives the word cursor of one reading session from a repeating timer.
///
/// At most one reveal timer is alive at a time: every operation that arms a
/// timer aborts the previous handle first, and ticks from an aborted timer are
/// rejected by epoch. The embedded [`Stopwatch`] runs exactly while playback
/// does.
///
/// Operations are synchronous but spawn tokio tasks, so they must be called
/// from within a runtime.
#[derive(Clone)]
pub struct PlaybackController {
    state: Arc<Mutex<PlaybackState>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    stopwatch: Stopwatch,
    sinks: Sinks,
}

impl PlaybackController {
    pub fn new(sinks: Sinks, wpm: u32, stopwatch_refresh: Duration) -> Self {
        if wpm == 0 {
            log_warn!("playback created with 0 wpm; using 1 wpm");
        }

        Self {
            state: Arc::new(Mutex::new(PlaybackState::new(wpm))),
            ticker: Arc::new(Mutex::new(None)),
            stopwatch: Stopwatch::new(sinks.clock.clone(), stopwatch_refresh),
            sinks,
        }
    }

    pub fn state(&self) -> PlaybackState {
        lock(&self.state).clone()
    }

    pub fn words(&self) -> Arc<WordList> {
        lock(&self.state).words.clone()
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let elapsed_ms = self.stopwatch.elapsed_ms();
        let guard = lock(&self.state);
        PlaybackSnapshot {
            status: guard.status,
            word_index: guard.word_index,
            total_words: guard.total_words(),
            wpm: guard.wpm,
            elapsed_ms,
            elapsed: format_elapsed(elapsed_ms),
        }
    }

    /// Replaces the word list and parks the cursor on the first word.
    pub fn load_document(&self, document: &Document) -> PlaybackSnapshot {
        let total = {
            let mut guard = lock(&self.state);
            guard.begin_session(Arc::new(document.words()));
            guard.total_words()
        };
        self.halt();

        self.sinks.reveal.clear_highlight();
        self.sinks.stat.report_stat(0, total);
        self.stopwatch.reset();

        log_info!("reading session loaded with {} words", total);
        self.snapshot()
    }

    /// Stops playback and returns to Idle. The returned snapshot is taken just
    /// before the session state is discarded.
    pub fn end_session(&self) -> PlaybackSnapshot {
        self.pause();
        let final_snapshot = self.snapshot();

        lock(&self.state).end_session();
        self.sinks.reveal.clear_highlight();
        self.sinks.stat.report_stat(0, 0);
        self.stopwatch.reset();

        log_info!(
            "reading session closed at word {} of {}",
            final_snapshot.word_index,
            final_snapshot.total_words
        );
        final_snapshot
    }

    pub fn start(&self) -> PlaybackSnapshot {
        self.halt();

        let armed = {
            let mut guard = lock(&self.state);
            if guard.total_words() == 0 {
                if guard.status != PlaybackStatus::Idle {
                    guard.status = PlaybackStatus::Paused;
                }
                None
            } else {
                guard.status = PlaybackStatus::Playing;
                let epoch = guard.arm_timer();
                Some((
                    guard.display_index(),
                    guard.total_words(),
                    guard.tick_delay(),
                    epoch,
                ))
            }
        };

        match armed {
            None => {
                self.sinks.message.show_message(EMPTY_TEXT_MESSAGE);
                self.sinks.stat.report_stat(0, 0);
            }
            Some((index, total, delay, epoch)) => {
                self.spawn_ticker(delay, epoch);
                self.sinks.stat.report_stat(index, total);
                self.stopwatch.start();
                log_info!(
                    "playback started at word {} of {} ({:?} per word)",
                    index + 1,
                    total,
                    delay
                );
            }
        }

        self.snapshot()
    }

    /// Safe from any state; Idle stays Idle.
    pub fn pause(&self) -> PlaybackSnapshot {
        {
            let mut guard = lock(&self.state);
            if guard.status != PlaybackStatus::Idle {
                guard.status = PlaybackStatus::Paused;
            }
        }
        self.halt();
        self.snapshot()
    }

    /// Moves the cursor by `offset` words, clamped to the word list.
    ///
    /// Active playback is rescheduled from the new position; the part of the
    /// tick interval already elapsed is discarded.
    pub fn jump(&self, offset: i64) -> PlaybackSnapshot {
        let was_playing = lock(&self.state).is_playing();
        self.pause();

        let (index, total) = {
            let mut guard = lock(&self.state);
            guard.word_index = guard.jump_target(offset);
            (guard.word_index, guard.total_words())
        };

        if total == 0 {
            self.sinks.reveal.clear_highlight();
            self.sinks.stat.report_stat(0, 0);
        } else {
            self.sinks.reveal.reveal_word(index, total);
            self.sinks.stat.report_stat(index, total);
        }
        log_debug!("jumped {} words to index {}", offset, index);

        if was_playing {
            self.start()
        } else {
            self.snapshot()
        }
    }

    /// Applies a new rate. Active playback restarts its timer with the new
    /// delay, so the next reveal is one full new interval away.
    pub fn set_wpm(&self, wpm: u32) -> PlaybackSnapshot {
        let wpm = if wpm == 0 {
            log_warn!("ignoring 0 wpm; using 1 wpm");
            1
        } else {
            wpm
        };

        let was_playing = {
            let mut guard = lock(&self.state);
            guard.wpm = wpm;
            guard.is_playing()
        };

        if was_playing {
            self.pause();
            self.start();
        }

        let (index, total) = {
            let guard = lock(&self.state);
            (guard.display_index(), guard.total_words())
        };
        self.sinks.stat.report_stat(index, total);

        self.snapshot()
    }

    /// Suspends playback while hidden and resumes it on return, but only when
    /// it was playing at the most recent hide signal.
    pub fn set_visibility(&self, hidden: bool) -> PlaybackSnapshot {
        if hidden {
            let was_playing = {
                let mut guard = lock(&self.state);
                let playing = guard.is_playing();
                guard.resume_on_visible = playing;
                playing
            };
            if was_playing {
                log_info!("page hidden; suspending playback");
                self.pause();
            }
        } else {
            let resume = std::mem::take(&mut lock(&self.state).resume_on_visible);
            if resume {
                log_info!("page visible; resuming playback");
                self.start();
            }
        }

        self.snapshot()
    }

    /// Moves the cursor back to the first word and zeroes the stopwatch.
    pub fn rewind(&self) {
        lock(&self.state).word_index = 0;
        self.sinks.reveal.clear_highlight();
        self.stopwatch.reset();
    }

    fn halt(&self) {
        self.cancel_ticker();
        self.stopwatch.pause();
    }

    fn spawn_ticker(&self, delay: Duration, epoch: u64) {
        let mut ticker_guard = lock(&self.ticker);
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let sinks = self.sinks.clone();
        let stopwatch = self.stopwatch.clone();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + delay, delay);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let outcome = {
                    let mut guard = lock(&state);
                    if !guard.accepts_tick(epoch) {
                        break;
                    }
                    guard.advance()
                };

                match outcome {
                    TickOutcome::Reveal { index, total } => {
                        log_debug!("tick: word {} of {}", index + 1, total);
                        sinks.reveal.reveal_word(index, total);
                        sinks.stat.report_stat(index, total);
                    }
                    TickOutcome::Finished { total } => {
                        stopwatch.pause();
                        sinks.reveal.clear_highlight();
                        sinks.message.show_message(END_OF_TEXT_MESSAGE);
                        sinks.stat.report_stat(total.saturating_sub(1), total);
                        log_info!("end of text reached after {} words", total);
                        break;
                    }
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    fn cancel_ticker(&self) {
        if let Some(handle) = lock(&self.ticker).take() {
            handle.abort();
        }
    }
}
