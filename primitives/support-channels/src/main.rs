//! Support Channels CLI
//!
//! # Usage
//!
//! ```bash
//! # Join all customer channels and the default support channels
//! support-channels joinSupport --key "xoxp-..."
//!
//! # Preview which customer channels would be left
//! SLACK_KEY=xoxp-... support-channels leaveSupport --dry
//!
//! # Override the default support channels
//! support-channels joinSupport --default-channel frame,sentry
//! ```

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use support_channels::{
    DEFAULT_API_BASE, DEFAULT_SUPPORT_CHANNELS, Driver, RunConfig, RunError, RunMode,
    SelectionPolicy, SlackDirectory,
};
use tokio::signal::unix::{SignalKind, signal};
use tracing_subscriber::EnvFilter;

/// Exit status used when the run is interrupted by a signal.
const INTERRUPTED: u8 = 130;

/// Joins and leaves support channels via the command line.
#[derive(Parser, Debug)]
#[command(name = "support-channels")]
#[command(about = "Joins and leaves Slack support channels via the command line")]
struct Cli {
    /// Slack API key (user token).
    #[arg(short, long, global = true, env = "SLACK_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Perform a dry run only, don't change any settings.
    #[arg(short, long, global = true)]
    dry: bool,

    /// Non-customer channels that also count as support channels.
    #[arg(
        long = "default-channel",
        global = true,
        env = "SUPPORT_DEFAULT_CHANNELS",
        value_delimiter = ',',
        default_values = DEFAULT_SUPPORT_CHANNELS
    )]
    default_channels: Vec<String>,

    /// Seconds to wait after joining before marking channels as read.
    #[arg(long, global = true, env = "SUPPORT_SETTLE_DELAY_SECS", default_value = "5")]
    settle_delay_secs: u64,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, env = "SUPPORT_TIMEOUT_SECS", default_value = "30")]
    timeout_secs: u64,

    /// Slack Web API base URL.
    #[arg(long, global = true, env = "SLACK_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Join all customer channels and the default support channels.
    #[command(name = "joinSupport")]
    JoinSupport,

    /// Leave all customer channels (not the default support ones).
    #[command(name = "leaveSupport")]
    LeaveSupport,
}

impl Command {
    fn mode(self) -> RunMode {
        match self {
            Self::JoinSupport => RunMode::Join,
            Self::LeaveSupport => RunMode::Leave,
        }
    }
}

impl Cli {
    /// The Slack key, rejecting a missing or blank value.
    fn credential(&self) -> Result<String, RunError> {
        self.key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or(RunError::MissingCredential)
    }

    fn run_config(&self) -> RunConfig {
        let defaults = self
            .default_channels
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty());

        RunConfig {
            mode: self.command.mode(),
            dry_run: self.dry,
            policy: SelectionPolicy::with_default_channels(defaults),
            settle_delay: Duration::from_secs(self.settle_delay_secs),
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let directory = SlackDirectory::new(cli.credential()?)
        .with_api_base(&cli.api_base)
        .with_timeout(Duration::from_secs(cli.timeout_secs))?;
    let mut driver = Driver::new(directory, cli.run_config(), io::stdout());

    // Set up SIGTERM handler; dropping the run future stops further calls
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = driver.run() => {
            result?;
            Ok(ExitCode::SUCCESS)
        }

        _ = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            Ok(ExitCode::from(INTERRUPTED))
        }

        _ = sigterm.recv() => {
            eprintln!("Interrupted");
            Ok(ExitCode::from(INTERRUPTED))
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
