//! nskv CLI - read and write one namespace of a Redis-backed store.

use clap::{Parser, Subcommand};

mod commands;

/// nskv CLI - namespaced key-value storage.
///
/// Keys live under `nskv:{namespace}:{key}`. Values are stored with the
/// codec named in the config (JSON by default).
///
/// Connection settings come from ~/.nskv/config.yaml unless --config or
/// --url is given.
#[derive(Parser)]
#[command(name = "nskv")]
#[command(about = "Namespaced key-value storage CLI")]
#[command(version)]
pub struct Cli {
    /// Storage config file (default is ~/.nskv/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Redis URL; skips the config file
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Namespace to operate on
    #[arg(short = 'n', long, global = true, default_value = "default")]
    pub namespace: String,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Print the value stored at a key
    Get {
        key: String,
    },
    /// Store a value; parsed as JSON, otherwise stored as a string
    Set {
        key: String,
        value: String,
    },
    /// Delete a key
    Rm {
        key: String,
    },
    /// List keys in the namespace
    Keys,
    /// Count keys in the namespace
    Count,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    commands::run(&cli)
}
