use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one reading session, handed to the host when it closes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub total_words: usize,
    /// Words revealed before the session closed.
    pub words_reached: usize,
    pub elapsed_ms: u64,
    pub wpm: u32,
    pub finished: bool,
}

impl SessionSummary {
    /// Reading rate actually achieved, from stopwatch time.
    pub fn effective_wpm(&self) -> f64 {
        if self.elapsed_ms == 0 {
            return 0.0;
        }
        self.words_reached as f64 * 60_000.0 / self.elapsed_ms as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(words_reached: usize, elapsed_ms: u64) -> SessionSummary {
        let now = Utc::now();
        SessionSummary {
            id: "session".into(),
            started_at: now,
            ended_at: now,
            total_words: 100,
            words_reached,
            elapsed_ms,
            wpm: 60,
            finished: false,
        }
    }

    #[test]
    fn effective_wpm_uses_stopwatch_time() {
        assert_eq!(summary(30, 30_000).effective_wpm(), 60.0);
        assert_eq!(summary(30, 0).effective_wpm(), 0.0);
    }

    #[test]
    fn serializes_in_camel_case() {
        let json = serde_json::to_value(summary(3, 1_000)).unwrap();
        assert_eq!(json["wordsReached"], 3);
        assert_eq!(json["elapsedMs"], 1_000);
        assert!(json.get("startedAt").is_some());
    }
}
