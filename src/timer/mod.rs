pub mod controller;
pub mod state;

pub use controller::Stopwatch;
pub use state::StopwatchState;

/// Zero-padded `HH:MM:SS`; hours are not capped at 99.
pub fn format_clock(hours: u64, minutes: u64, seconds: u64) -> String {
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

pub fn format_elapsed(elapsed_ms: u64) -> String {
    let total_secs = elapsed_ms / 1000;
    format_clock(total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_floored_to_whole_seconds() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(999), "00:00:00");
        assert_eq!(format_elapsed(59_999), "00:00:59");
        assert_eq!(format_elapsed(3_723_000), "01:02:03");
        assert_eq!(format_elapsed(360_000_000), "100:00:00");
    }
}
