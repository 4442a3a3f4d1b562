//! # Main — CLI Entry Point
//!
//! Routes CLI subcommands to the fixture pipeline and the one-off
//! classifier. Handles the shared concerns: logging setup, env loading,
//! and the Rayon thread pool configuration.
//!
//! ## Subcommands
//!
//! - `generate`: classify all four candidate lists and write the
//!   `{n, d, s}` test vectors consumed by the contract test suite's
//!   ABI-encoding stage.
//! - `classify`: classify a single decimal candidate and print the verdict.
//!
//! ## Global Options
//!
//! - `--trials` / `MR_TRIALS`: Miller–Rabin witness trials (default 14).
//! - `--seed` / `MR_SEED`: witness-selection seed for reproducible runs.
//! - `--threads`: Rayon thread pool size (0 = all cores).

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "millstone", about = "Generate Miller-Rabin primality fixtures for contract test suites")]
struct Cli {
    /// Miller-Rabin witness trials per candidate (higher = more certain but slower)
    #[arg(long, env = "MR_TRIALS", default_value_t = millstone::oracle::DEFAULT_TRIALS)]
    trials: u32,

    /// Seed for witness selection (defaults to per-process entropy)
    #[arg(long, env = "MR_SEED")]
    seed: Option<u64>,

    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every fixture candidate and write the {n, d, s} test vectors
    Generate {
        /// JSON array of small prime candidates (native integers)
        #[arg(long, default_value = "data/first-primes.json")]
        small_primes: PathBuf,
        /// JSON array of large prime candidates (decimal strings)
        #[arg(long, default_value = "data/large-primes.json")]
        large_primes: PathBuf,
        /// JSON array of small composite candidates (native integers)
        #[arg(long, default_value = "data/first-composites.json")]
        small_composites: PathBuf,
        /// JSON array of large composite candidates (decimal strings)
        #[arg(long, default_value = "data/large-composites.json")]
        large_composites: PathBuf,
        /// Output path for the generated fixture JSON
        #[arg(long, default_value = "tests.json")]
        out: PathBuf,
    },
    /// Classify a single candidate and print the verdict with its (d, s)
    Classify {
        /// Candidate integer in decimal
        n: String,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize structured logging: LOG_FORMAT=json for CI, human-readable otherwise
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads);

    match &cli.command {
        Commands::Generate {
            small_primes,
            large_primes,
            small_composites,
            large_composites,
            out,
        } => cli::run_generate(
            &cli,
            small_primes,
            large_primes,
            small_composites,
            large_composites,
            out,
        ),
        Commands::Classify { n } => cli::run_classify(&cli, n),
    }
}
