//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "study-clock")]
#[command(about = "A study/break interval timer with persistent study-time tracking")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20877")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Study phase duration in minutes
    #[arg(short, long, default_value = "25", value_parser = clap::value_parser!(u64).range(1..))]
    pub study: u64,

    /// Break phase duration in minutes
    #[arg(short, long = "break", default_value = "5", value_parser = clap::value_parser!(u64).range(1..))]
    pub break_minutes: u64,

    /// Path of the file holding the persisted study-time counter
    #[arg(long, default_value = "study-clock.json")]
    pub counter_file: PathBuf,

    /// External command used to play the background audio source
    #[arg(long, default_value = "mpv")]
    pub player: String,

    /// Audio file to play during study phases
    #[arg(long)]
    pub audio: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
