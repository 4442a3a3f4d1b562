pub mod fixtures;
pub mod oracle;

use rug::Integer;

/// Estimate decimal digit count from bit length, avoiding expensive to_string conversion.
pub fn estimate_digits(n: &Integer) -> u64 {
    let bits = n.significant_bits();
    if bits == 0 {
        return 1;
    }
    (bits as f64 * std::f64::consts::LOG10_2) as u64 + 1
}

/// Exact decimal digit count (expensive for very large numbers).
pub fn exact_digits(n: &Integer) -> u64 {
    n.to_string_radix(10).len() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rug::ops::Pow;

    #[test]
    fn estimate_digits_within_one_of_exact() {
        let values: Vec<Integer> = vec![
            Integer::from(1u32),
            Integer::from(9u32),
            Integer::from(10u32),
            Integer::from(7919u32),
            Integer::from(10u32).pow(77),
            Integer::from(10u32).pow(308) - 1u32,
            Integer::from(2u32).pow(4096),
        ];
        for v in &values {
            let est = estimate_digits(v);
            let exact = exact_digits(v);
            assert!(
                (est as i64 - exact as i64).abs() <= 1,
                "estimate_digits({}) = {} but exact = {}",
                v,
                est,
                exact
            );
        }
    }

    #[test]
    fn exact_digits_known_values() {
        assert_eq!(exact_digits(&Integer::from(0u32)), 1);
        assert_eq!(exact_digits(&Integer::from(9u32)), 1);
        assert_eq!(exact_digits(&Integer::from(10u32)), 2);
        assert_eq!(exact_digits(&Integer::from(999u32)), 3);
        // 2^127 - 1 has 39 decimal digits
        assert_eq!(exact_digits(&((Integer::from(1u32) << 127u32) - 1u32)), 39);
    }

    #[test]
    fn estimate_digits_zero() {
        assert_eq!(estimate_digits(&Integer::from(0u32)), 1);
    }
}
