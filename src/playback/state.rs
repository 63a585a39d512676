use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::segmentation::WordList;

/// Shortest reveal interval; faster rates are held at this pace.
pub const MIN_TICK_DELAY: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PlaybackStatus {
    /// No reading session is loaded.
    #[default]
    Idle,
    Paused,
    Playing,
    /// The cursor ran past the last word; the timer is stopped.
    Finished,
}

/// What a single reveal tick should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Reveal { index: usize, total: usize },
    Finished { total: usize },
}

/// Per-session playback state, replaced wholesale on session boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub status: PlaybackStatus,
    /// Next word to reveal. Equals `total_words()` only after the final tick.
    pub word_index: usize,
    pub wpm: u32,
    #[serde(skip)]
    pub words: Arc<WordList>,
    /// Set when a hide signal paused active playback.
    #[serde(skip)]
    pub resume_on_visible: bool,
    /// Bumped every time a reveal timer is armed; a tick carrying an older
    /// epoch belongs to a cancelled timer and must not advance the cursor.
    #[serde(skip)]
    pub timer_epoch: u64,
}

impl PlaybackState {
    pub fn new(wpm: u32) -> Self {
        Self {
            status: PlaybackStatus::Idle,
            word_index: 0,
            wpm: wpm.max(1),
            words: Arc::new(WordList::default()),
            resume_on_visible: false,
            timer_epoch: 0,
        }
    }

    pub fn total_words(&self) -> usize {
        self.words.len()
    }

    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Index shown to the reader: the cursor clamped to the last word.
    pub fn display_index(&self) -> usize {
        self.word_index.min(self.total_words().saturating_sub(1))
    }

    pub fn tick_delay(&self) -> Duration {
        Duration::from_micros(60_000_000 / u64::from(self.wpm.max(1))).max(MIN_TICK_DELAY)
    }

    pub fn begin_session(&mut self, words: Arc<WordList>) {
        *self = Self {
            words,
            status: PlaybackStatus::Paused,
            timer_epoch: self.timer_epoch,
            ..Self::new(self.wpm)
        };
    }

    pub fn end_session(&mut self) {
        *self = Self {
            timer_epoch: self.timer_epoch,
            ..Self::new(self.wpm)
        };
    }

    /// Invalidates every outstanding tick and returns the epoch for a new timer.
    pub fn arm_timer(&mut self) -> u64 {
        self.timer_epoch = self.timer_epoch.wrapping_add(1);
        self.timer_epoch
    }

    pub fn accepts_tick(&self, epoch: u64) -> bool {
        self.is_playing() && self.timer_epoch == epoch
    }

    /// Cursor after moving by `offset`, clamped to `[0, max(0, total - 1)]`.
    pub fn jump_target(&self, offset: i64) -> usize {
        let last = i64::try_from(self.total_words().saturating_sub(1)).unwrap_or(i64::MAX);
        let current = i64::try_from(self.word_index).unwrap_or(i64::MAX);
        let target = current.saturating_add(offset).clamp(0, last);
        usize::try_from(target).unwrap_or(0)
    }

    /// Advances the cursor by one tick, or marks the session finished.
    pub fn advance(&mut self) -> TickOutcome {
        let total = self.total_words();
        if self.word_index < total {
            let index = self.word_index;
            self.word_index += 1;
            TickOutcome::Reveal { index, total }
        } else {
            self.status = PlaybackStatus::Finished;
            TickOutcome::Finished { total }
        }
    }
}

/// Point-in-time view of the scheduler handed back to the host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub word_index: usize,
    pub total_words: usize,
    pub wpm: u32,
    pub elapsed_ms: u64,
    pub elapsed: String,
}
