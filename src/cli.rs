use std::path::PathBuf;

use clap::Parser;

/// More info: <https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html>
#[derive(Debug, Parser)]
#[command(bin_name = "speedread")]
#[command(about = "Read a text file one word at a time at a steady pace")]
#[command(version)]
pub struct CliArgs {
    /// Plain text file to read.
    #[arg(value_name = "TEXT_FILE")]
    pub text_path: PathBuf,

    #[arg(
        long,
        short = 's',
        env = "SPEEDREAD_SETTINGS",
        value_name = "FILE",
        help = "JSON settings file. The chosen speed is saved back to it."
    )]
    pub settings: Option<PathBuf>,
}
