//! hearth - signed cookie session server
//!
//! Main entry point for the hearth CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::writer::MakeWriterExt;

mod commands;

use commands::{keygen, start};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// hearth - signed cookie session server
#[derive(Parser)]
#[command(name = "hearth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the session server
    Start(start::StartArgs),

    /// Print a fresh random session key
    Keygen(keygen::KeygenArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console (warn and above on stderr, the rest on stdout) + rotating JSON file
    let filter = if cli.verbose {
        "hearth=debug,hearth_server=debug,hearth_session=debug,hearth_config=debug,info"
    } else {
        "hearth=info,hearth_server=info,hearth_session=info,warn"
    };

    let log_dir = hearth_config::config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "hearth.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let console = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .or_else(std::io::stdout);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(console)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "hearth=trace,hearth_server=trace,hearth_session=trace,hearth_config=trace,info",
                )),
        )
        .init();

    let ctx = commands::Context {
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Start(args) => start::run(args, &ctx).await,
        Commands::Keygen(args) => keygen::run(args, &ctx),
    }
}
