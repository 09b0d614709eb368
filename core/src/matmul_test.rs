#[cfg(test)]
mod tests {
    use crate::matmul::*;
    use crate::rng::Lcg;

    fn random_pair(n: usize, seed: u64) -> (SquareMatrix, SquareMatrix) {
        let mut rng = Lcg::new(seed);
        let a = SquareMatrix::random(n, &mut rng).expect("alloc a");
        let b = SquareMatrix::random(n, &mut rng).expect("alloc b");
        (a, b)
    }

    #[test]
    fn test_naive_small_known_product() {
        let a = SquareMatrix::from_fn(2, |i, j| [[1.0, 2.0], [3.0, 4.0]][i][j]).unwrap();
        let b = SquareMatrix::from_fn(2, |i, j| [[5.0, 6.0], [7.0, 8.0]][i][j]).unwrap();
        let mut c = SquareMatrix::zeroed(2).unwrap();
        multiply_naive(&a, &b, &mut c);
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_identity_is_neutral() {
        let (a, _) = random_pair(70, 3);
        let id = SquareMatrix::from_fn(70, |i, j| if i == j { 1.0 } else { 0.0 }).unwrap();
        let mut c = SquareMatrix::zeroed(70).unwrap();
        multiply_blocked(&a, &id, &mut c);
        assert_eq!(c, a);
    }

    #[test]
    fn test_blocked_matches_naive_on_tail_sizes() {
        // 1 and 63 sit inside one tile, 64 is exact, 65 and 130 leave clipped tails.
        for n in [1usize, 63, 64, 65, 130] {
            let (a, b) = random_pair(n, 42);
            let mut naive = SquareMatrix::zeroed(n).unwrap();
            let mut blocked = SquareMatrix::zeroed(n).unwrap();
            multiply_naive(&a, &b, &mut naive);
            multiply_blocked(&a, &b, &mut blocked);
            assert!(
                checksums_match(checksum(&naive), checksum(&blocked)),
                "n={n}: naive {} vs blocked {}",
                checksum(&naive),
                checksum(&blocked)
            );
            for (x, y) in naive.as_slice().iter().zip(blocked.as_slice()) {
                assert!((x - y).abs() < 1e-9, "n={n}: element {x} vs {y}");
            }
        }
    }

    #[test]
    fn test_blocked_overwrites_stale_output() {
        let (a, b) = random_pair(20, 9);
        let mut fresh = SquareMatrix::zeroed(20).unwrap();
        multiply_blocked(&a, &b, &mut fresh);

        let mut stale = SquareMatrix::from_fn(20, |_, _| 123.0).unwrap();
        multiply_blocked(&a, &b, &mut stale);
        assert_eq!(stale, fresh);
    }

    #[test]
    fn test_parallel_is_bit_identical_to_blocked() {
        for (n, threads) in [(130usize, 2usize), (200, 3), (64, 8), (257, 4)] {
            let (a, b) = random_pair(n, 11);
            let mut seq = SquareMatrix::zeroed(n).unwrap();
            let mut par = SquareMatrix::zeroed(n).unwrap();
            multiply_blocked(&a, &b, &mut seq);
            multiply_blocked_parallel(&a, &b, &mut par, threads);
            assert_eq!(seq, par, "n={n} threads={threads}");
        }
    }

    #[test]
    fn test_parallel_single_thread_and_zero_threads() {
        let (a, b) = random_pair(33, 5);
        let mut seq = SquareMatrix::zeroed(33).unwrap();
        multiply_blocked(&a, &b, &mut seq);
        for threads in [0usize, 1] {
            let mut par = SquareMatrix::zeroed(33).unwrap();
            multiply_blocked_parallel(&a, &b, &mut par, threads);
            assert_eq!(seq, par);
        }
    }

    #[test]
    fn test_zero_sized_matrices() {
        let a = SquareMatrix::zeroed(0).unwrap();
        let b = SquareMatrix::zeroed(0).unwrap();
        let mut c = SquareMatrix::zeroed(0).unwrap();
        multiply_naive(&a, &b, &mut c);
        multiply_blocked(&a, &b, &mut c);
        multiply_blocked_parallel(&a, &b, &mut c, 4);
        assert_eq!(checksum(&c), 0.0);
    }

    #[test]
    #[should_panic(expected = "matrix dimension mismatch")]
    fn test_dimension_mismatch_panics() {
        let a = SquareMatrix::zeroed(2).unwrap();
        let b = SquareMatrix::zeroed(3).unwrap();
        let mut c = SquareMatrix::zeroed(2).unwrap();
        multiply_naive(&a, &b, &mut c);
    }

    #[test]
    fn test_comparison_operands_layout() {
        let (a, b) = comparison_operands(4).unwrap();
        assert_eq!(a.get(0, 0), 0.0);
        assert_eq!(a.get(1, 2), 0.75);
        assert_eq!(b.get(0, 3), -0.75);
        assert_eq!(b.get(3, 0), 0.75);
    }

    #[test]
    fn test_checksums_match_tolerance() {
        assert!(checksums_match(1.0e6, 1.0e6 + 1.0e-4));
        assert!(!checksums_match(1.0e6, 1.0e6 + 1.0));
        assert!(checksums_match(0.0, 0.0));
    }
}
