use crate::timer::format_clock;

pub const ZERO_CLOCK: &str = "00:00:00";

/// Estimated time to read `word_count` words at `wpm`, as `HH:MM:SS`.
///
/// Seconds are rounded from the fractional minute, not truncated.
pub fn calculate_reading_time(word_count: usize, wpm: u32) -> String {
    if wpm == 0 {
        return ZERO_CLOCK.to_string();
    }

    let total_minutes = word_count as f64 / f64::from(wpm);
    let hours = (total_minutes / 60.0).floor() as u64;
    let minutes = (total_minutes % 60.0).floor() as u64;
    let seconds = ((total_minutes * 60.0) % 60.0).round() as u64;

    format_clock(hours, minutes, seconds)
}
