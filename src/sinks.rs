//! Collaborator interfaces the engine reports through.
//!
//! The engine never renders anything itself: every visible effect of a
//! playback transition is a call on one of these sinks. Hosts implement them
//! for their surface (terminal, GUI, test recorder).

use std::sync::Arc;

use log::{debug, info};

pub trait RevealSink: Send + Sync {
    /// Highlight word `index` of `total`.
    fn reveal_word(&self, index: usize, total: usize);

    fn clear_highlight(&self);
}

pub trait StatSink: Send + Sync {
    fn report_stat(&self, index: usize, total: usize);
}

/// Transient notices. The host owns display and dismissal timing.
pub trait MessageSink: Send + Sync {
    fn show_message(&self, text: &str);
}

pub trait ClockSink: Send + Sync {
    /// Stopwatch readout, `HH:MM:SS`.
    fn report_elapsed(&self, formatted: &str);

    /// Estimated total reading time for the loaded text, `HH:MM:SS`.
    fn report_reading_estimate(&self, _formatted: &str) {}
}

#[derive(Clone)]
pub struct Sinks {
    pub reveal: Arc<dyn RevealSink>,
    pub stat: Arc<dyn StatSink>,
    pub message: Arc<dyn MessageSink>,
    pub clock: Arc<dyn ClockSink>,
}

impl Sinks {
    /// Routes all four channels to one object.
    pub fn shared<T>(sink: Arc<T>) -> Self
    where
        T: RevealSink + StatSink + MessageSink + ClockSink + 'static,
    {
        Self {
            reveal: sink.clone(),
            stat: sink.clone(),
            message: sink.clone(),
            clock: sink,
        }
    }
}

/// Human readable stat line, e.g. `0001 / 120 words`.
pub fn format_word_stat(index: usize, total: usize) -> String {
    format!("{:04} / {} words", index + 1, total)
}

pub fn word_count_label(count: usize) -> String {
    if count == 1 {
        "1 word".to_string()
    } else {
        format!("{count} words")
    }
}

/// Sink that only writes to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl RevealSink for LogSink {
    fn reveal_word(&self, index: usize, total: usize) {
        debug!("reveal word {} of {}", index + 1, total);
    }

    fn clear_highlight(&self) {
        debug!("clear highlight");
    }
}

impl StatSink for LogSink {
    fn report_stat(&self, index: usize, total: usize) {
        debug!("{}", format_word_stat(index, total));
    }
}

impl MessageSink for LogSink {
    fn show_message(&self, text: &str) {
        info!("{text}");
    }
}

impl ClockSink for LogSink {
    fn report_elapsed(&self, formatted: &str) {
        debug!("elapsed {formatted}");
    }

    fn report_reading_estimate(&self, formatted: &str) {
        info!("estimated reading time {formatted}");
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_line_is_one_based_and_padded() {
        assert_eq!(format_word_stat(0, 120), "0001 / 120 words");
        assert_eq!(format_word_stat(9_999, 10_000), "10000 / 10000 words");
    }

    #[test]
    fn word_count_label_pluralises() {
        assert_eq!(word_count_label(0), "0 words");
        assert_eq!(word_count_label(1), "1 word");
        assert_eq!(word_count_label(12), "12 words");
    }
}
