//! # Fixtures — Categorized Test-Vector Generation
//!
//! Loads four categorized candidate lists (small/large primes and
//! composites), classifies every value through the oracle, asserts the
//! verdict matches the list the value came from, and serializes the
//! resulting (n, d, s) records into a single JSON document. A downstream
//! encoding stage reads that document and packs each record into an ABI
//! tuple for the contract test suite; the record shape here is its input
//! contract.
//!
//! Small lists hold native-width integers; large lists hold decimal strings
//! so multi-hundred-digit values survive JSON without precision loss. A
//! category mismatch anywhere fails the whole run before output is written:
//! the assertion gates the fixture data itself, so there is no
//! partial-success mode.

use anyhow::{anyhow, bail, Context, Result};
use rayon::prelude::*;
use rug::Integer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::estimate_digits;
use crate::oracle::PrimalityOracle;

/// One generated test vector: the candidate and its witness decomposition,
/// with n and d in decimal so arbitrary precision survives serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureRecord {
    pub n: String,
    pub d: String,
    pub s: u32,
}

/// The four output buckets, keyed by source category, each in input order.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureSet {
    pub small_primes: Vec<FixtureRecord>,
    pub large_primes: Vec<FixtureRecord>,
    pub small_composites: Vec<FixtureRecord>,
    pub large_composites: Vec<FixtureRecord>,
}

/// Source category of a candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    SmallPrimes,
    LargePrimes,
    SmallComposites,
    LargeComposites,
}

impl Category {
    pub fn key(self) -> &'static str {
        match self {
            Category::SmallPrimes => "smallPrimes",
            Category::LargePrimes => "largePrimes",
            Category::SmallComposites => "smallComposites",
            Category::LargeComposites => "largeComposites",
        }
    }

    fn expects_prime(self) -> bool {
        matches!(self, Category::SmallPrimes | Category::LargePrimes)
    }
}

/// The four parsed input lists.
#[derive(Debug)]
pub struct FixtureInputs {
    pub small_primes: Vec<Integer>,
    pub large_primes: Vec<Integer>,
    pub small_composites: Vec<Integer>,
    pub large_composites: Vec<Integer>,
}

impl FixtureInputs {
    pub fn len(&self) -> usize {
        self.small_primes.len()
            + self.large_primes.len()
            + self.small_composites.len()
            + self.large_composites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load the four input lists. Small lists are JSON arrays of unsigned
/// integers; large lists are JSON arrays of decimal strings.
pub fn load_inputs(
    small_primes: &Path,
    large_primes: &Path,
    small_composites: &Path,
    large_composites: &Path,
) -> Result<FixtureInputs> {
    Ok(FixtureInputs {
        small_primes: load_small_list(small_primes)?,
        large_primes: load_large_list(large_primes)?,
        small_composites: load_small_list(small_composites)?,
        large_composites: load_large_list(large_composites)?,
    })
}

fn load_small_list(path: &Path) -> Result<Vec<Integer>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read candidate list {}", path.display()))?;
    let values: Vec<u64> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of integers", path.display()))?;
    Ok(values.into_iter().map(Integer::from).collect())
}

fn load_large_list(path: &Path) -> Result<Vec<Integer>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read candidate list {}", path.display()))?;
    let values: Vec<String> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of decimal strings", path.display()))?;
    values
        .iter()
        .map(|v| {
            Integer::parse(v)
                .map(Integer::from)
                .map_err(|e| anyhow!("invalid decimal candidate {:?} in {}: {}", v, path.display(), e))
        })
        .collect()
}

/// Classify all four lists and assemble the output buckets.
///
/// Candidates within a category are classified in parallel (the oracle is
/// `Sync`; trials for one candidate stay sequential so a compositeness proof
/// still short-circuits). Order within each bucket follows input order.
pub fn build(oracle: &PrimalityOracle, inputs: &FixtureInputs) -> Result<FixtureSet> {
    Ok(FixtureSet {
        small_primes: build_category(oracle, &inputs.small_primes, Category::SmallPrimes)?,
        large_primes: build_category(oracle, &inputs.large_primes, Category::LargePrimes)?,
        small_composites: build_category(oracle, &inputs.small_composites, Category::SmallComposites)?,
        large_composites: build_category(oracle, &inputs.large_composites, Category::LargeComposites)?,
    })
}

fn build_category(
    oracle: &PrimalityOracle,
    candidates: &[Integer],
    category: Category,
) -> Result<Vec<FixtureRecord>> {
    let records: Vec<FixtureRecord> = candidates
        .par_iter()
        .map(|n| {
            let result = oracle.classify(n)?;
            if result.classification.is_probably_prime() != category.expects_prime() {
                bail!(
                    "{} candidate {} classified as {} after {} trials; fixture list is wrong",
                    category.key(),
                    n,
                    if category.expects_prime() { "composite" } else { "prime" },
                    oracle.trials(),
                );
            }
            let decomposition = result.decomposition.ok_or_else(|| {
                anyhow!(
                    "{} candidate {} is below the witness range (n <= 4) and cannot be encoded",
                    category.key(),
                    n
                )
            })?;
            Ok(FixtureRecord {
                n: n.to_string(),
                d: decomposition.d.to_string(),
                s: decomposition.s,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let max_digits = candidates.iter().map(estimate_digits).max().unwrap_or(0);
    info!(
        category = category.key(),
        count = records.len(),
        max_digits,
        "category classified"
    );

    Ok(records)
}

/// Serialize the fixture set to `path` atomically (temp file + rename), so a
/// failed run never leaves a truncated output behind.
pub fn write_fixtures(path: &Path, set: &FixtureSet) -> Result<()> {
    let json = serde_json::to_string(set)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &json)
        .with_context(|| format!("failed to write fixture output {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to move fixture output into place at {}", path.display()))?;
    Ok(())
}

/// Load, classify, assert, and write in one pass. Returns the set for
/// logging and inspection.
pub fn generate(
    oracle: &PrimalityOracle,
    small_primes: &Path,
    large_primes: &Path,
    small_composites: &Path,
    large_composites: &Path,
    out: &Path,
) -> Result<FixtureSet> {
    let inputs = load_inputs(small_primes, large_primes, small_composites, large_composites)?;
    info!(candidates = inputs.len(), trials = oracle.trials(), "fixture generation starting");

    let set = build(oracle, &inputs)?;
    write_fixtures(out, &set)?;
    info!(out = %out.display(), "fixture output written");
    Ok(set)
}
