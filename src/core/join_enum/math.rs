//! Closed-form sizes of the join search space.

/// n! (with 0! = 1). Overflows `u64` past n = 20.
pub fn factorial(n: u64) -> u64 {
    (1..=n).product()
}

/// The n-th Catalan number: the count of full binary tree shapes with n + 1 leaves.
pub fn catalan(n: u64) -> u64 {
    // C(k+1) = C(k) * 2(2k+1) / (k+2); every intermediate quotient is exact.
    let mut c: u128 = 1;
    for k in 0..n as u128 {
        c = c * 2 * (2 * k + 1) / (k + 2);
    }
    c as u64
}

/// Number of (order, template) pairs evaluated for `inputs` relations.
pub fn search_space_size(inputs: usize) -> u64 {
    match inputs {
        0 => 0,
        n => factorial(n as u64) * catalan(n as u64 - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(1), 1);
        assert_eq!(factorial(5), 120);
        assert_eq!(factorial(8), 40_320);
        assert_eq!(factorial(20), 2_432_902_008_176_640_000);
    }

    #[test]
    fn test_catalan() {
        let expected = [1, 1, 2, 5, 14, 42, 132, 429, 1430, 4862];
        for (n, &c) in expected.iter().enumerate() {
            assert_eq!(catalan(n as u64), c, "catalan({})", n);
        }
        assert_eq!(catalan(19), 1_767_263_190);
    }

    #[test]
    fn test_search_space_size() {
        assert_eq!(search_space_size(0), 0);
        assert_eq!(search_space_size(1), 1);
        assert_eq!(search_space_size(3), 12);
        assert_eq!(search_space_size(8), 40_320 * 429);
    }
}
