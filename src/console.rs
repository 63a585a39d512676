use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tokio::time::Instant;

use crate::segmentation::WordList;
use crate::session::{Reader, SessionStart};
use crate::settings::{SettingsStore, WpmRange};
use crate::sinks::{
    format_word_stat, word_count_label, ClockSink, MessageSink, RevealSink, Sinks, StatSink,
};
use crate::utils::sync::lock;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_warn};

const HELP: &str = "commands: [enter]/p play-pause | f [n] forward | b [n] back | w <wpm> speed | h hide | v show | q quit";

/// Single notice slot: a message stays up for `duration`, and posting the
/// same text while it is still up does not show it again.
struct NoticeBoard {
    duration: Duration,
    current: Option<(String, Instant)>,
}

impl NoticeBoard {
    fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
        }
    }

    fn active(&self, now: Instant) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|(_, shown_at)| now.duration_since(*shown_at) < self.duration)
            .map(|(text, _)| text.as_str())
    }

    /// Returns true when `text` should be printed.
    fn post(&mut self, text: &str, now: Instant) -> bool {
        if self.active(now) == Some(text) {
            return false;
        }
        self.current = Some((text.to_string(), now));
        true
    }
}

/// Terminal surface: prints each revealed word on its own line.
struct ConsoleSink {
    words: Mutex<Arc<WordList>>,
    notices: Mutex<NoticeBoard>,
}

impl ConsoleSink {
    fn new(message_duration: Duration) -> Self {
        Self {
            words: Mutex::new(Arc::default()),
            notices: Mutex::new(NoticeBoard::new(message_duration)),
        }
    }

    fn load(&self, words: Arc<WordList>) {
        *lock(&self.words) = words;
    }

    fn print(&self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{line}") {
            log_warn!("failed to write to stdout: {err}");
        }
    }
}

impl RevealSink for ConsoleSink {
    fn reveal_word(&self, index: usize, total: usize) {
        let words = lock(&self.words).clone();
        let word = words.get(index).unwrap_or("");
        self.print(&format!("[{}]  {word}", format_word_stat(index, total)));
    }

    fn clear_highlight(&self) {}
}

impl StatSink for ConsoleSink {
    fn report_stat(&self, index: usize, total: usize) {
        log::debug!("{}", format_word_stat(index, total));
    }
}

impl MessageSink for ConsoleSink {
    fn show_message(&self, text: &str) {
        if lock(&self.notices).post(text, Instant::now()) {
            self.print(&format!("** {text}"));
        }
    }
}

impl ClockSink for ConsoleSink {
    fn report_elapsed(&self, formatted: &str) {
        log::debug!("elapsed {formatted}");
    }

    fn report_reading_estimate(&self, formatted: &str) {
        self.print(&format!("estimated reading time {formatted}"));
    }
}

enum Command {
    Toggle,
    Jump(i64),
    Wpm(String),
    Visibility { hidden: bool },
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or("p");
    let arg = parts.next();
    let steps = || arg.and_then(|n| n.parse::<i64>().ok()).unwrap_or(1);

    match head {
        "p" => Some(Command::Toggle),
        "f" => Some(Command::Jump(steps())),
        "b" => Some(Command::Jump(steps().saturating_neg())),
        "w" => Some(Command::Wpm(arg.unwrap_or("").to_string())),
        "h" => Some(Command::Visibility { hidden: true }),
        "v" => Some(Command::Visibility { hidden: false }),
        "q" => Some(Command::Quit),
        _ => None,
    }
}

fn wpm_feedback(range: &WpmRange, input: &str, applied: u32) -> String {
    if range.is_out_of_range(input) {
        format!(
            "speed {applied} W.P.M. (allowed {}-{})",
            range.min(),
            range.max()
        )
    } else {
        format!("speed {applied} W.P.M.")
    }
}

/// Interactive reading session over the text file at `path`.
pub async fn run_console(settings: SettingsStore, path: PathBuf) -> Result<()> {
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read text from {}", path.display()))?;

    let current = settings.settings();
    let console = Arc::new(ConsoleSink::new(Duration::from_millis(
        current.message_duration_ms,
    )));
    let mut reader = Reader::new(settings, Sinks::shared(console.clone()));

    let status = reader.set_text(&text);
    console.print(&word_count_label(status.word_count));

    match reader.start_session() {
        SessionStart::Rejected { .. } => return Ok(()),
        SessionStart::Started { total_words, .. } => {
            console.load(reader.playback().words());
            console.print(&format!(
                "{} @ {} W.P.M.",
                word_count_label(total_words),
                reader.wpm()
            ));
        }
    }
    console.print(HELP);

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                log_error!("failed to read command: {err}");
                break;
            }
        };

        match parse_command(line.trim()) {
            Some(Command::Toggle) => {
                reader.toggle_play();
            }
            Some(Command::Jump(offset)) => {
                reader.jump(offset);
            }
            Some(Command::Wpm(input)) => {
                let snapshot = reader.apply_wpm_input(&input);
                console.print(&wpm_feedback(&current.wpm_range, &input, snapshot.wpm));
            }
            Some(Command::Visibility { hidden }) => {
                reader.set_visibility(hidden);
            }
            Some(Command::Quit) => break,
            None => {
                log_warn!("unknown command {:?}", line);
                console.print(HELP);
            }
        }
    }

    if let Some(summary) = reader.close_session() {
        console.print(&serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_toggles_playback() {
        assert!(matches!(parse_command(""), Some(Command::Toggle)));
        assert!(matches!(parse_command("p"), Some(Command::Toggle)));
    }

    #[test]
    fn jumps_default_to_one_word() {
        assert!(matches!(parse_command("f"), Some(Command::Jump(1))));
        assert!(matches!(parse_command("b"), Some(Command::Jump(-1))));
        assert!(matches!(parse_command("f 10"), Some(Command::Jump(10))));
        assert!(matches!(parse_command("b 3"), Some(Command::Jump(-3))));
    }

    #[test]
    fn other_commands() {
        assert!(matches!(parse_command("w 120"), Some(Command::Wpm(ref v)) if v == "120"));
        assert!(matches!(
            parse_command("h"),
            Some(Command::Visibility { hidden: true })
        ));
        assert!(matches!(parse_command("q"), Some(Command::Quit)));
        assert!(parse_command("zzz").is_none());
    }

    #[test]
    fn out_of_range_speed_is_flagged() {
        let range = WpmRange::default();
        assert_eq!(wpm_feedback(&range, "120", 120), "speed 120 W.P.M.");
        assert_eq!(
            wpm_feedback(&range, "900", 150),
            "speed 150 W.P.M. (allowed 30-150)"
        );
        assert_eq!(wpm_feedback(&range, "", 30), "speed 30 W.P.M.");
    }

    #[tokio::test(start_paused = true)]
    async fn notice_stays_up_for_the_message_duration() {
        let mut board = NoticeBoard::new(Duration::from_millis(4_000));
        let start = Instant::now();

        assert!(board.post("Exceeded 2000-word limit", start));
        assert!(!board.post("Exceeded 2000-word limit", start + Duration::from_millis(3_999)));
        assert_eq!(
            board.active(start + Duration::from_millis(3_999)),
            Some("Exceeded 2000-word limit")
        );

        let later = start + Duration::from_millis(4_000);
        assert_eq!(board.active(later), None);
        assert!(board.post("Exceeded 2000-word limit", later));
    }

    #[tokio::test(start_paused = true)]
    async fn a_different_notice_replaces_the_current_one() {
        let mut board = NoticeBoard::new(Duration::from_millis(4_000));
        let now = Instant::now();

        assert!(board.post("No text to play!", now));
        assert!(board.post("End of text reached!", now));
        assert_eq!(board.active(now), Some("End of text reached!"));
    }
}
