use clap::Parser;
use std::time::Duration;

use super::defaults::DEFAULT_BASE_URL;
use super::parsers::{parse_bool_env, parse_duration_arg, parse_positive_usize, parse_shelf_id};
use super::types::PositiveUsize;

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Smoke-test client for bookshelf REST services - creates, reads, updates and deletes synthetic books on every shelf and prints what the server answers."
)]
pub struct SmokeArgs {
    /// Base URL of the bookshelf service
    #[arg(long, short, env = "SHELFCHECK_URL", default_value = DEFAULT_BASE_URL)]
    pub url: String,

    /// Number of times the full sequence runs
    #[arg(long, short = 'p', default_value = "2", value_parser = parse_positive_usize)]
    pub passes: PositiveUsize,

    /// Books created per shelf in each pass
    #[arg(long, short = 'b', default_value = "10", value_parser = parse_positive_usize)]
    pub books: PositiveUsize,

    /// Only exercise these shelves (repeatable; defaults to every listed shelf)
    #[arg(long = "shelf", short = 's', value_parser = parse_shelf_id)]
    pub shelves: Vec<String>,

    /// Seed for book generation (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = "10s",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Timeout for establishing a new connection (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = "5s",
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Exit with an error when the server breaks a round-trip check
    #[arg(long)]
    pub verify: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by SHELFCHECK_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,

    /// Path to config file (TOML/JSON). Defaults to ./shelfcheck.toml or ./shelfcheck.json if present.
    #[arg(long)]
    pub config: Option<String>,
}
