//! Property-based tests for the primality oracle.
//!
//! These use `proptest` to verify mathematical invariants across thousands of
//! randomly generated candidates, rather than fixed example values. The key
//! cross-check classifies candidates independently through GMP's own
//! Miller–Rabin (`rug`'s `is_probably_prime`) and requires agreement — a
//! disagreement would mean a bug in our decomposition, witness loop, or
//! trial-division fast path.
//!
//! # How to run
//!
//! ```bash
//! cargo test --test property_tests
//!
//! # Increase case count for thorough testing (default is 256):
//! PROPTEST_CASES=10000 cargo test --test property_tests
//! ```

use millstone::fixtures::{FixtureRecord, FixtureSet};
use millstone::oracle::{decompose, Classification, PrimalityOracle};
use proptest::prelude::*;
use rug::integer::IsPrime;
use rug::Integer;

fn oracle() -> PrimalityOracle {
    PrimalityOracle::new(14, Some(0xFEED))
}

proptest! {
    /// n - 1 = d * 2^s with d odd, exactly, for every candidate above the
    /// exact small cases. This identity is what the downstream verifier
    /// recomputes from the fixture record.
    #[test]
    fn prop_decomposition_identity(n in 5u64..) {
        let n_int = Integer::from(n);
        let decomposition = decompose(&n_int);
        prop_assert!(decomposition.d.is_odd());
        let recomposed = decomposition.d.clone() * (Integer::from(1u32) << decomposition.s) + 1u32;
        prop_assert_eq!(recomposed, n_int);
    }

    /// Classification agrees with GMP's independent Miller-Rabin across
    /// arbitrary u64 candidates. `is_probably_prime` uses its own witness
    /// strategy, so agreement cross-validates the whole classify path.
    #[test]
    fn prop_classify_matches_gmp(n in 0u64..1_000_000_000) {
        let n_int = Integer::from(n);
        let ours = oracle().classify(&n_int).unwrap().classification.is_probably_prime();
        let gmp = n_int.is_probably_prime(30) != IsPrime::No;
        prop_assert_eq!(ours, gmp, "disagreement on {}", n);
    }

    /// The exact small cases never carry a decomposition; everything above
    /// them always does, composite or not.
    #[test]
    fn prop_decomposition_presence(n in 0u64..100_000) {
        let result = oracle().classify(&Integer::from(n)).unwrap();
        if n <= 4 {
            prop_assert!(result.decomposition.is_none());
        } else {
            prop_assert!(result.decomposition.is_some());
        }
    }

    /// A product of two factors >= 2 must always classify composite,
    /// regardless of which code path (trial division or witness trials)
    /// rejects it.
    #[test]
    fn prop_products_classify_composite(a in 2u64..1_000_000, b in 2u64..1_000_000) {
        let n = Integer::from(a) * Integer::from(b);
        let result = oracle().classify(&n).unwrap();
        prop_assert_eq!(result.classification, Classification::Composite,
            "accepted {} * {} as prime", a, b);
    }

    /// classify is total over non-negative candidates: no input in domain
    /// may produce an error.
    #[test]
    fn prop_classify_total(n in 0u64..) {
        prop_assert!(oracle().classify(&Integer::from(n)).is_ok());
    }

    /// Fixture sets survive a JSON roundtrip bit-for-bit, bucket order and
    /// record order included.
    #[test]
    fn prop_fixture_set_roundtrip(values in proptest::collection::vec(5u64..1_000_000, 0..20)) {
        let records: Vec<FixtureRecord> = values.iter().map(|&n| {
            let decomposition = decompose(&Integer::from(n));
            FixtureRecord {
                n: n.to_string(),
                d: decomposition.d.to_string(),
                s: decomposition.s,
            }
        }).collect();
        let set = FixtureSet {
            small_primes: records.clone(),
            large_composites: records,
            ..FixtureSet::default()
        };
        let json = serde_json::to_string(&set).unwrap();
        let back: FixtureSet = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, set);
    }
}
