//! Fibonacci kernels: naive recursion, two-accumulator loop and 2x2 matrix
//! exponentiation.
//!
//! All arithmetic wraps modulo 2^64 so the variants keep agreeing past
//! fib(93), where the true value no longer fits a `u64`.

use std::ops::Mul;

/// Largest `n` the recursive variant is run for.
pub const RECURSIVE_LIMIT: u64 = 40;

/// Default `n` of the fibonacci program.
pub const DEFAULT_N: u64 = 40;

pub fn fib_recursive(n: u64) -> u64 {
    if n <= 1 {
        return n;
    }
    fib_recursive(n - 1).wrapping_add(fib_recursive(n - 2))
}

pub fn fib_iterative(n: u64) -> u64 {
    if n <= 1 {
        return n;
    }
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 2..=n {
        let next = a.wrapping_add(b);
        a = b;
        b = next;
    }
    b
}

pub fn fib_matrix(n: u64) -> u64 {
    if n <= 1 {
        return n;
    }
    Matrix2x2::FIB.pow(n - 1).m[0][0]
}

/// `fib_recursive` guarded by [`RECURSIVE_LIMIT`].
pub fn fib_recursive_bounded(n: u64) -> Option<u64> {
    (n <= RECURSIVE_LIMIT).then(|| fib_recursive(n))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matrix2x2 {
    pub m: [[u64; 2]; 2],
}

impl Matrix2x2 {
    pub const IDENTITY: Self = Self { m: [[1, 0], [0, 1]] };
    pub const FIB: Self = Self { m: [[1, 1], [1, 0]] };

    /// Exponentiation by squaring; `pow(0)` is the identity.
    pub fn pow(self, mut exp: u64) -> Self {
        let mut base = self;
        let mut result = Self::IDENTITY;
        while exp > 0 {
            if exp & 1 == 1 {
                result = result * base;
            }
            base = base * base;
            exp >>= 1;
        }
        result
    }
}

impl Mul for Matrix2x2 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let a = &self.m;
        let b = &rhs.m;
        let dot = |r: usize, c: usize| a[r][0].wrapping_mul(b[0][c]).wrapping_add(a[r][1].wrapping_mul(b[1][c]));
        Self {
            m: [[dot(0, 0), dot(0, 1)], [dot(1, 0), dot(1, 1)]],
        }
    }
}
