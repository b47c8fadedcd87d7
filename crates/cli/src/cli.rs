//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// tiltwatch - Motion/orientation event-detection pipeline for IMU units
#[derive(Parser, Debug)]
#[command(
    name = "tiltwatch",
    author,
    version,
    about = "IMU motion event-detection pipeline",
    long_about = "Watches a stream of orientation/acceleration samples, debounces\n\
                  tipping, movement, stop and tamper events, derives a single\n\
                  device state, and dispatches confirmed events to configured sinks."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TILTWATCH_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TILTWATCH_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the detection pipeline
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "watch.toml", env = "TILTWATCH_CONFIG")]
    pub config: PathBuf,

    /// Override the mock motion profile from configuration
    #[arg(long, env = "TILTWATCH_PROFILE")]
    pub profile: Option<ProfileArg>,

    /// Maximum number of samples to process (0 = unlimited)
    #[arg(long, default_value = "0", env = "TILTWATCH_MAX_SAMPLES")]
    pub max_samples: u64,

    /// Pipeline timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "TILTWATCH_TIMEOUT")]
    pub timeout: u64,

    /// Validate configuration and exit without running pipeline
    #[arg(long)]
    pub dry_run: bool,

    /// Channel buffer size for internal queues
    #[arg(long, default_value = "100", env = "TILTWATCH_BUFFER_SIZE")]
    pub buffer_size: usize,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "TILTWATCH_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "watch.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "watch.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show detector threshold details
    #[arg(long)]
    pub detectors: bool,

    /// Show sink configuration
    #[arg(long)]
    pub sinks: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

/// Mock motion profile override
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ProfileArg {
    Stationary,
    Driving,
    TippedLeft,
    TippedRight,
    Shaken,
}

impl From<ProfileArg> for contracts::MotionProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Stationary => contracts::MotionProfile::Stationary,
            ProfileArg::Driving => contracts::MotionProfile::Driving,
            ProfileArg::TippedLeft => contracts::MotionProfile::TippedLeft,
            ProfileArg::TippedRight => contracts::MotionProfile::TippedRight,
            ProfileArg::Shaken => contracts::MotionProfile::Shaken,
        }
    }
}
