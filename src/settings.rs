use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

use crate::segmentation::TextLimits;

/// Fastest rate a range may allow: one word per millisecond.
pub const MAX_WPM: u32 = 60_000;

/// Inclusive bounds for the reading rate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WpmRange {
    min: u32,
    max: u32,
}

impl WpmRange {
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min == 0 {
            bail!("wpm lower bound must be at least 1");
        }
        if min > max {
            bail!("wpm range {min}..={max} is empty");
        }
        if max > MAX_WPM {
            bail!("wpm upper bound {max} exceeds {MAX_WPM}");
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn clamp(&self, wpm: u32) -> u32 {
        wpm.clamp(self.min, self.max)
    }

    /// Interprets free-form rate input: non-digits are dropped, empty input
    /// falls back to the lower bound, anything else is clamped.
    pub fn parse_clamped(&self, input: &str) -> u32 {
        match digits(input).parse::<u64>() {
            Ok(value) => {
                let value = u32::try_from(value).unwrap_or(u32::MAX);
                self.clamp(value)
            }
            // Empty input, or more digits than fit in a u64.
            Err(_) if digits(input).is_empty() => self.min,
            Err(_) => self.max,
        }
    }

    /// True when the input holds digits that fall outside the bounds.
    pub fn is_out_of_range(&self, input: &str) -> bool {
        let digits = digits(input);
        if digits.is_empty() {
            return false;
        }
        match digits.parse::<u64>() {
            Ok(value) => value < u64::from(self.min) || value > u64::from(self.max),
            Err(_) => true,
        }
    }
}

impl Default for WpmRange {
    fn default() -> Self {
        Self { min: 30, max: 150 }
    }
}

fn digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReaderSettings {
    pub wpm: u32,
    pub wpm_range: WpmRange,
    pub limits: TextLimits,
    pub stopwatch_refresh_ms: u64,
    /// How long hosts should keep a transient message on screen.
    pub message_duration_ms: u64,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            wpm: 90,
            wpm_range: WpmRange::default(),
            limits: TextLimits::default(),
            stopwatch_refresh_ms: 1000,
            message_duration_ms: 4000,
        }
    }
}

impl ReaderSettings {
    /// Brings loaded values back inside their bounds.
    fn normalized(mut self) -> Self {
        if WpmRange::new(self.wpm_range.min, self.wpm_range.max).is_err() {
            self.wpm_range = WpmRange::default();
        }
        self.wpm = self.wpm_range.clamp(self.wpm);
        self.stopwatch_refresh_ms = self.stopwatch_refresh_ms.max(1);
        self
    }
}

pub struct SettingsStore {
    path: Option<PathBuf>,
    data: RwLock<ReaderSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str::<ReaderSettings>(&contents).unwrap_or_default()
        } else {
            ReaderSettings::default()
        };

        Ok(Self {
            path: Some(path),
            data: RwLock::new(data.normalized()),
        })
    }

    /// Store that never touches the filesystem.
    pub fn in_memory(settings: ReaderSettings) -> Self {
        Self {
            path: None,
            data: RwLock::new(settings.normalized()),
        }
    }

    pub fn settings(&self) -> ReaderSettings {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stores the clamped rate and returns the value actually kept.
    pub fn update_wpm(&self, wpm: u32) -> Result<u32> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.wpm = guard.wpm_range.clamp(wpm);
        self.persist(&guard)?;
        Ok(guard.wpm)
    }

    fn persist(&self, data: &ReaderSettings) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write settings to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_settings_path() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        (dir, path)
    }

    #[test]
    fn range_rejects_invalid_bounds() {
        assert!(WpmRange::new(0, 10).is_err());
        assert!(WpmRange::new(20, 10).is_err());
        assert!(WpmRange::new(10, 10).is_ok());
        assert!(WpmRange::new(30, MAX_WPM).is_ok());
        assert!(WpmRange::new(30, MAX_WPM + 1).is_err());
    }

    #[test]
    fn typed_rate_is_sanitised_and_clamped() {
        let range = WpmRange::default();
        assert_eq!(range.parse_clamped("120"), 120);
        assert_eq!(range.parse_clamped("1a2b0"), 120);
        assert_eq!(range.parse_clamped(""), 30);
        assert_eq!(range.parse_clamped("fast"), 30);
        assert_eq!(range.parse_clamped("5"), 30);
        assert_eq!(range.parse_clamped("900"), 150);
        assert_eq!(range.parse_clamped("99999999999999999999999"), 150);
    }

    #[test]
    fn out_of_range_marker() {
        let range = WpmRange::default();
        assert!(!range.is_out_of_range(""));
        assert!(!range.is_out_of_range("30"));
        assert!(!range.is_out_of_range("150"));
        assert!(range.is_out_of_range("29"));
        assert!(range.is_out_of_range("151"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (_dir, path) = temp_settings_path();
        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.settings(), ReaderSettings::default());
    }

    #[test]
    fn wpm_updates_are_clamped_and_persisted() {
        let (_dir, path) = temp_settings_path();
        let store = SettingsStore::new(path.clone()).unwrap();

        assert_eq!(store.update_wpm(500).unwrap(), 150);
        let reloaded = SettingsStore::new(path).unwrap();
        assert_eq!(reloaded.settings().wpm, 150);
    }

    #[test]
    fn partial_and_out_of_bounds_files_are_normalised() {
        let (_dir, path) = temp_settings_path();
        fs::write(&path, r#"{ "wpm": 5, "limits": { "wordLimit": 50 } }"#).unwrap();

        let settings = SettingsStore::new(path).unwrap().settings();
        assert_eq!(settings.wpm, 30);
        assert_eq!(settings.limits.word_limit, 50);
        assert_eq!(settings.limits.min_words_for_start, 10);
        assert_eq!(settings.stopwatch_refresh_ms, 1000);
    }

    #[test]
    fn unbounded_range_in_file_falls_back_to_default_range() {
        let (_dir, path) = temp_settings_path();
        fs::write(
            &path,
            r#"{ "wpmRange": { "min": 30, "max": 100000000 }, "wpm": 100000000 }"#,
        )
        .unwrap();

        let settings = SettingsStore::new(path).unwrap().settings();
        assert_eq!(settings.wpm_range, WpmRange::default());
        assert_eq!(settings.wpm, 150);
    }

    #[test]
    fn garbage_file_falls_back_to_defaults() {
        let (_dir, path) = temp_settings_path();
        fs::write(&path, "not json").unwrap();
        assert_eq!(
            SettingsStore::new(path).unwrap().settings(),
            ReaderSettings::default()
        );
    }

    #[test]
    fn in_memory_store_does_not_write() {
        let store = SettingsStore::in_memory(ReaderSettings::default());
        assert_eq!(store.update_wpm(60).unwrap(), 60);
        assert_eq!(store.settings().wpm, 60);
    }
}
