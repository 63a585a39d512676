mod cli;
mod console;
mod utils;

pub mod models;
pub mod playback;
pub mod segmentation;
pub mod session;
pub mod settings;
pub mod sinks;
pub mod timer;

use anyhow::Result;
use clap::Parser;

use crate::cli::CliArgs;

pub use models::SessionSummary;
pub use playback::{PlaybackController, PlaybackSnapshot, PlaybackState, PlaybackStatus};
pub use segmentation::{
    calculate_reading_time, count_words, tokenize, truncate, Document, Segment, SegmentKind,
    TextLimits, Truncation, WordList,
};
pub use session::{EditorStatus, Reader, SessionStart};
pub use settings::{ReaderSettings, SettingsStore, WpmRange};
pub use sinks::{ClockSink, LogSink, MessageSink, RevealSink, Sinks, StatSink};
pub use timer::{Stopwatch, StopwatchState};

/// Entry point of the `speedread` binary.
///
/// Usage: `speedread <TEXT_FILE> [--settings FILE]`. The settings path may
/// also come from `SPEEDREAD_SETTINGS`.
pub fn run() -> Result<()> {
    let args = CliArgs::parse();

    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("speedread starting up...");

    let settings = match args.settings {
        Some(path) => SettingsStore::new(path)?,
        None => SettingsStore::in_memory(ReaderSettings::default()),
    };

    // Playback callbacks and user commands share one execution context.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(console::run_console(settings, args.text_path))
}
