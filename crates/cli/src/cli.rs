//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use config_loader::{vars, Overrides};
use std::path::PathBuf;

/// metric-proxy - HTTP metric ingestion proxy
#[derive(Parser, Debug)]
#[command(
    name = "metric-proxy",
    author,
    version,
    about = "HTTP metric ingestion proxy",
    long_about = "Accepts JSON metric batches on POST /metric, normalizes them to\n\
                  `<path> <value> <timestamp>` lines and relays them to a line-protocol\n\
                  transmitter. Optionally mirrors raw request bodies to a second endpoint."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "METRIC_PROXY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "json",
        global = true,
        env = "METRIC_PROXY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the proxy
    Run(RunArgs),

    /// Resolve and validate configuration without running
    Validate(ValidateArgs),
}

/// Configuration sources shared by every command
///
/// Values stay raw strings so fallback rules (`METRIC_BUFFER_SIZE`,
/// `SERIALIZATION`) are applied in one place by the config loader.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Optional configuration file (TOML or JSON) supplying defaults
    #[arg(short, long, env = "METRIC_PROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Request encoding: SFIA, SSSS, SCDF (anything else = string batch)
    #[arg(long, env = vars::SERIALIZATION)]
    pub serialization: Option<String>,

    /// Forwarding buffer capacity (invalid or zero = 100)
    #[arg(long, env = vars::METRIC_BUFFER_SIZE)]
    pub buffer_size: Option<String>,

    /// Mirror destination URL (empty = disabled)
    #[arg(long, env = vars::MIRROR_URL)]
    pub mirror_url: Option<String>,

    /// Mirror request timeout in seconds
    #[arg(long, env = vars::MIRROR_TIMEOUT_SECS)]
    pub mirror_timeout_secs: Option<String>,

    /// HTTP listen address
    #[arg(long, env = vars::LISTEN_ADDR)]
    pub listen_addr: Option<String>,

    /// Request body limit in bytes
    #[arg(long, env = vars::MAX_BODY_BYTES)]
    pub max_body_bytes: Option<String>,

    /// Transmitter: log or udp
    #[arg(long, env = vars::TRANSMITTER)]
    pub transmitter: Option<String>,

    /// UDP transmitter target address
    #[arg(long, env = vars::TRANSMITTER_ADDR)]
    pub transmitter_addr: Option<String>,

    /// Relay drain bound at shutdown, in seconds
    #[arg(long, env = vars::SHUTDOWN_DRAIN_SECS)]
    pub shutdown_drain_secs: Option<String>,
}

impl ConfigArgs {
    /// Raw overrides for the config loader
    pub fn overrides(&self) -> Overrides {
        Overrides {
            serialization: self.serialization.clone(),
            buffer_size: self.buffer_size.clone(),
            mirror_url: self.mirror_url.clone(),
            mirror_timeout_secs: self.mirror_timeout_secs.clone(),
            listen_addr: self.listen_addr.clone(),
            max_body_bytes: self.max_body_bytes.clone(),
            transmitter: self.transmitter.clone(),
            transmitter_addr: self.transmitter_addr.clone(),
            shutdown_drain_secs: self.shutdown_drain_secs.clone(),
        }
    }
}

/// Arguments for the `run` command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Resolve configuration, print it and exit without serving
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    #[default]
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
