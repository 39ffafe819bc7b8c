use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Verbosity of the stderr log; the transcript on stdout is unaffected
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    /// Used when neither `--log-level` nor `--verbose` is given
    Warn,
    /// Menu lifecycle: start, timeout, exit
    Info,
    /// Every wait and dispatch; what `--verbose` selects
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Sample menu to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MenuKind {
    /// Four pet buttons
    #[default]
    Pets,
    /// A payload button, a button group and a select menu
    Elements,
}

#[derive(Debug, Parser)]
#[command(name = "neon-demo")]
#[command(about = "Run a component menu against a scripted console host")]
#[command(version)]
pub struct Cli {
    /// TOML config file with a [menu] table
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Seconds to wait for each interaction (overrides config file)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Let any user operate the menu, not just the requester
    #[arg(long)]
    pub allow_anyone: bool,

    /// Which sample menu to run
    #[arg(short, long, value_enum, default_value_t = MenuKind::Pets)]
    pub menu: MenuKind,

    /// Interaction script; defaults to a built-in script for the menu
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Keep the event stream open after the script so the menu times out
    #[arg(long)]
    pub linger: bool,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Effective log level: explicit level, then `--verbose`, then warnings only
    pub fn level_filter(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::WARN,
        }
    }
}
