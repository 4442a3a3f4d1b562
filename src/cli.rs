//! # CLI Execution Functions
//!
//! Extracted from `main.rs` to keep the entry point slim. Contains the
//! execution logic for the subcommands plus rayon configuration.

use anyhow::{anyhow, Result};
use millstone::fixtures;
use millstone::oracle::{Classification, PrimalityOracle};
use millstone::{estimate_digits, exact_digits};
use rug::Integer;
use std::path::Path;
use tracing::{info, warn};

use super::Cli;

/// Run the fixture pipeline end to end.
pub fn run_generate(
    cli: &Cli,
    small_primes: &Path,
    large_primes: &Path,
    small_composites: &Path,
    large_composites: &Path,
    out: &Path,
) -> Result<()> {
    let oracle = PrimalityOracle::new(cli.trials, cli.seed);
    info!(
        trials = cli.trials,
        cores = rayon::current_num_threads(),
        "millstone starting"
    );

    let set = fixtures::generate(
        &oracle,
        small_primes,
        large_primes,
        small_composites,
        large_composites,
        out,
    )?;

    println!(
        "Wrote {} fixtures ({} small primes, {} large primes, {} small composites, {} large composites) to {}",
        set.small_primes.len()
            + set.large_primes.len()
            + set.small_composites.len()
            + set.large_composites.len(),
        set.small_primes.len(),
        set.large_primes.len(),
        set.small_composites.len(),
        set.large_composites.len(),
        out.display()
    );
    Ok(())
}

/// Classify one decimal candidate and print the verdict to stdout.
pub fn run_classify(cli: &Cli, candidate: &str) -> Result<()> {
    let n = Integer::parse(candidate)
        .map(Integer::from)
        .map_err(|_| anyhow!("invalid decimal candidate: {:?}", candidate))?;

    let oracle = PrimalityOracle::new(cli.trials, cli.seed);
    let result = oracle.classify(&n)?;

    let digits = if estimate_digits(&n) > 10_000 {
        estimate_digits(&n)
    } else {
        exact_digits(&n)
    };

    match result.classification {
        Classification::ProbablyPrime => {
            println!("{} is probably prime ({} digits, {} trials)", n, digits, cli.trials);
        }
        Classification::Composite => {
            println!("{} is composite ({} digits)", n, digits);
        }
    }
    if let Some(decomposition) = result.decomposition {
        println!("n - 1 = d * 2^s with d = {}, s = {}", decomposition.d, decomposition.s);
    }
    Ok(())
}

/// Configure the global rayon thread pool. 0 or absent = all logical cores.
pub fn configure_rayon(threads: Option<usize>) {
    let num_threads = threads.unwrap_or(0);
    if num_threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
        {
            warn!(error = %e, "Could not configure rayon thread pool");
        }
    }
}
