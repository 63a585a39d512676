use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::SessionSummary;
use crate::playback::{PlaybackController, PlaybackSnapshot, PlaybackStatus};
use crate::segmentation::{calculate_reading_time, count_words, tokenize, truncate, Document};
use crate::settings::{ReaderSettings, SettingsStore};
use crate::sinks::Sinks;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EditorStatus {
    pub word_count: usize,
    pub can_start: bool,
    pub was_truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum SessionStart {
    #[serde(rename_all = "camelCase")]
    Started {
        total_words: usize,
        reading_time: String,
    },
    #[serde(rename_all = "camelCase")]
    Rejected { word_count: usize, min_words: usize },
}

struct ActiveSession {
    id: String,
    started_at: DateTime<Utc>,
    document: Arc<Document>,
}

/// Editing buffer plus the reading session built from it.
///
/// This is the layer that applies the word budget while editing, gates
/// session start on the minimum word count, and decides when a play action
/// means "play again from the top" rather than "resume".
pub struct Reader {
    settings: SettingsStore,
    source: String,
    session: Option<ActiveSession>,
    playback: PlaybackController,
    sinks: Sinks,
}

impl Reader {
    pub fn new(settings: SettingsStore, sinks: Sinks) -> Self {
        let current = settings.settings();
        let playback = PlaybackController::new(
            sinks.clone(),
            current.wpm,
            Duration::from_millis(current.stopwatch_refresh_ms),
        );

        Self {
            settings,
            source: String::new(),
            session: None,
            playback,
            sinks,
        }
    }

    pub fn text(&self) -> &str {
        &self.source
    }

    pub fn settings(&self) -> ReaderSettings {
        self.settings.settings()
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    pub fn document(&self) -> Option<Arc<Document>> {
        self.session.as_ref().map(|session| session.document.clone())
    }

    pub fn is_reading(&self) -> bool {
        self.session.is_some()
    }

    pub fn wpm(&self) -> u32 {
        self.playback.state().wpm
    }

    /// Estimated time to read the loaded words at the current rate.
    pub fn reading_time(&self) -> String {
        calculate_reading_time(self.playback.state().total_words(), self.wpm())
    }

    /// Replaces the editing buffer, cutting it down to the word budget.
    pub fn set_text(&mut self, text: &str) -> EditorStatus {
        let limits = self.settings.settings().limits;
        let truncation = truncate(text, limits.word_limit);
        if truncation.was_truncated {
            self.sinks
                .message
                .show_message(&format!("Exceeded {}-word limit", limits.word_limit));
        }

        let was_truncated = truncation.was_truncated;
        self.source = truncation.text.into_owned();
        let word_count = count_words(&self.source);

        EditorStatus {
            word_count,
            can_start: word_count >= limits.min_words_for_start,
            was_truncated,
        }
    }

    /// Tokenizes the buffer and loads it for playback, paused on the first
    /// word. Refused below the minimum word count.
    pub fn start_session(&mut self) -> SessionStart {
        let source = std::mem::take(&mut self.source);
        let status = self.set_text(&source);

        if !status.can_start {
            let min_words = self.settings.settings().limits.min_words_for_start;
            self.sinks
                .message
                .show_message(&format!("Please enter at least {min_words} words to start."));
            return SessionStart::Rejected {
                word_count: status.word_count,
                min_words,
            };
        }

        let document = Arc::new(tokenize(&self.source));
        self.playback.load_document(&document);

        let total_words = document.word_count();
        let reading_time = calculate_reading_time(total_words, self.wpm());
        self.sinks.clock.report_reading_estimate(&reading_time);

        let id = Uuid::new_v4().to_string();
        log_info!("session {} started with {} words", id, total_words);
        self.session = Some(ActiveSession {
            id,
            started_at: Utc::now(),
            document,
        });

        SessionStart::Started {
            total_words,
            reading_time,
        }
    }

    /// Returns to editing. The summary is `None` when no session was open.
    pub fn close_session(&mut self) -> Option<SessionSummary> {
        let last = self.playback.end_session();
        let session = self.session.take()?;

        let finished = last.status == PlaybackStatus::Finished;
        let summary = SessionSummary {
            id: session.id,
            started_at: session.started_at,
            ended_at: Utc::now(),
            total_words: last.total_words,
            words_reached: last.word_index.min(last.total_words),
            elapsed_ms: last.elapsed_ms,
            wpm: last.wpm,
            finished,
        };

        log_info!(
            "session {} closed after {} ms ({} of {} words)",
            summary.id,
            summary.elapsed_ms,
            summary.words_reached,
            summary.total_words
        );
        Some(summary)
    }

    /// Play/pause button. Playing from the last word starts over from the top
    /// with a fresh stopwatch.
    pub fn toggle_play(&self) -> PlaybackSnapshot {
        let state = self.playback.state();
        if state.is_playing() {
            return self.playback.pause();
        }

        let total = state.total_words();
        if total > 0 && state.word_index >= total - 1 {
            log_info!("restarting from the first word");
            self.playback.rewind();
        }
        self.playback.start()
    }

    pub fn jump(&self, offset: i64) -> PlaybackSnapshot {
        self.playback.jump(offset)
    }

    pub fn set_visibility(&self, hidden: bool) -> PlaybackSnapshot {
        self.playback.set_visibility(hidden)
    }

    /// Applies a rate clamped to the configured bounds. Failing to persist the
    /// preference is logged and otherwise ignored.
    pub fn set_wpm(&self, wpm: u32) -> PlaybackSnapshot {
        let wpm = match self.settings.update_wpm(wpm) {
            Ok(stored) => stored,
            Err(err) => {
                log_error!("failed to persist wpm {}: {err:?}", wpm);
                self.settings.settings().wpm_range.clamp(wpm)
            }
        };

        let total = self.playback.state().total_words();
        self.sinks
            .clock
            .report_reading_estimate(&calculate_reading_time(total, wpm));

        self.playback.set_wpm(wpm)
    }

    /// Rate typed by hand, e.g. into a label next to a slider.
    pub fn apply_wpm_input(&self, input: &str) -> PlaybackSnapshot {
        let wpm = self.settings.settings().wpm_range.parse_clamped(input);
        self.set_wpm(wpm)
    }
}
