//! Bodywave CLI - amplitude and period measurement on filtered seismic traces.

mod commands;
mod trace;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bodywave")]
#[command(author, version, about = "Body-wave amplitude and period measurement", long_about = None)]
struct Cli {
    /// Log per-stage debug events (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure amplitude and period in a filtered trace
    Measure(commands::measure::MeasureArgs),

    /// Generate a synthetic test trace
    Generate(commands::generate::GenerateArgs),

    /// List measurement profiles or print one as TOML
    Profiles(commands::profiles::ProfilesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `measure --json` keeps stdout machine-readable.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Measure(args) => commands::measure::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Profiles(args) => commands::profiles::run(args),
    }
}
