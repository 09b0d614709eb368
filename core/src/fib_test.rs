#[cfg(test)]
mod tests {
    use crate::fib::*;

    #[test]
    fn test_fib_base_cases() {
        for f in [fib_recursive, fib_iterative, fib_matrix] {
            assert_eq!(f(0), 0);
            assert_eq!(f(1), 1);
        }
    }

    #[test]
    fn test_fib_known_values() {
        let known = [(2u64, 1u64), (10, 55), (20, 6_765), (30, 832_040), (50, 12_586_269_025)];
        for (n, expected) in known {
            assert_eq!(fib_iterative(n), expected, "iterative fib({n})");
            assert_eq!(fib_matrix(n), expected, "matrix fib({n})");
        }
    }

    #[test]
    fn test_variants_agree_up_to_thirty() {
        for n in 0..=30 {
            let r = fib_recursive(n);
            assert_eq!(r, fib_iterative(n), "recursive vs iterative at {n}");
            assert_eq!(r, fib_matrix(n), "recursive vs matrix at {n}");
        }
    }

    #[test]
    fn test_variants_agree_at_recursive_limit() {
        assert_eq!(RECURSIVE_LIMIT, 40);
        let r = fib_recursive(RECURSIVE_LIMIT);
        assert_eq!(r, 102_334_155);
        assert_eq!(r, fib_iterative(RECURSIVE_LIMIT));
        assert_eq!(r, fib_matrix(RECURSIVE_LIMIT));
    }

    #[test]
    #[ignore = "naive recursion for every n in 31..40 takes seconds without optimizations"]
    fn test_variants_agree_between_thirty_and_limit() {
        for n in 31..RECURSIVE_LIMIT {
            assert_eq!(fib_recursive(n), fib_iterative(n));
        }
    }

    #[test]
    fn test_iterative_and_matrix_agree_past_u64_overflow() {
        for n in [92u64, 93, 94, 100, 500, 10_000] {
            assert_eq!(fib_iterative(n), fib_matrix(n), "wrapping mismatch at {n}");
        }
    }

    #[test]
    fn test_fib_93_is_largest_exact() {
        assert_eq!(fib_matrix(93), 12_200_160_415_121_876_738);
    }

    #[test]
    fn test_recursive_bounded_guard() {
        assert_eq!(fib_recursive_bounded(10), Some(55));
        assert_eq!(fib_recursive_bounded(RECURSIVE_LIMIT + 1), None);
    }

    #[test]
    fn test_matrix_pow_identity_and_square() {
        assert_eq!(Matrix2x2::FIB.pow(0), Matrix2x2::IDENTITY);
        assert_eq!(Matrix2x2::FIB.pow(1), Matrix2x2::FIB);
        assert_eq!(Matrix2x2::FIB.pow(2), Matrix2x2 { m: [[2, 1], [1, 1]] });
        // F^n = [[F(n+1), F(n)], [F(n), F(n-1)]]
        assert_eq!(Matrix2x2::FIB.pow(10), Matrix2x2 { m: [[89, 55], [55, 34]] });
    }

    #[test]
    fn test_matrix_mul_identity() {
        let m = Matrix2x2 { m: [[3, 5], [7, 11]] };
        assert_eq!(m * Matrix2x2::IDENTITY, m);
        assert_eq!(Matrix2x2::IDENTITY * m, m);
    }
}
