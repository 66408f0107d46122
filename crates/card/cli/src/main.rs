use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

mod commands;
mod config;
mod display;

use commands::*;
use config::{BenchConfig, BenchOp, Service};

#[derive(Parser)]
#[command(version, about = "Drive the cardlab card simulator")]
struct Cli {
    /// Debug level output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file (defaults to ./cardlab.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send raw frames and print the responses
    Send {
        /// Frames as hex strings without separators, e.g. B0530000021234
        #[arg(required = true)]
        frames: Vec<String>,

        /// Service to select before sending
        #[arg(short, long)]
        select: Option<Service>,
    },

    /// Exercise every instruction of both services
    Run,

    /// Time one operation over many iterations
    Bench {
        /// Operation to time
        #[arg(long, value_enum)]
        op: BenchOp,

        /// Number of iterations
        #[arg(short = 'n', long)]
        iterations: Option<u32>,

        /// Payload size in bytes
        #[arg(long)]
        size: Option<usize>,
    },
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = BenchConfig::load(cli.config.as_deref())?;
    debug!(?config, "Loaded configuration");

    match cli.command {
        Commands::Send { frames, select } => send_command(&config, &frames, select)?,
        Commands::Run => run_command(&config)?,
        Commands::Bench {
            op,
            iterations,
            size,
        } => {
            let config = config.with_overrides(iterations, size);
            bench_command(&config, op)?
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(true)
        .init();
}
