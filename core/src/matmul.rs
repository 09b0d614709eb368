//! Square matrix multiplication: naive i-j-k, cache-blocked, and a
//! band-parallel blocked variant.
//!
//! Matrices are flat row-major `f64` buffers. The blocked kernels
//! accumulate into C with `+=`, so they zero C first.

use tracing::debug;

use crate::alloc::{AllocError, square_len, try_filled};
use crate::rng::Lcg;

/// Tile edge used by the blocked kernels.
pub const BLOCK_SIZE: usize = 64;

/// Default `n` of the matrix program.
pub const DEFAULT_N: usize = 1000;

/// The naive kernel is only run (and compared against) up to this size.
pub const NAIVE_VALIDATION_LIMIT: usize = 500;

/// Relative tolerance used when comparing checksums of different kernels.
pub const CHECKSUM_REL_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SquareMatrix {
    pub fn zeroed(n: usize) -> Result<Self, AllocError> {
        let len = square_len("matrix", n)?;
        Ok(Self {
            n,
            data: try_filled("matrix", len, 0.0)?,
        })
    }

    /// Uniform values in `[0, 1]` drawn from `rng`, row by row.
    pub fn random(n: usize, rng: &mut Lcg) -> Result<Self, AllocError> {
        let mut m = Self::zeroed(n)?;
        m.data.iter_mut().for_each(|x| *x = rng.next_unit());
        Ok(m)
    }

    /// Fill from a closure of `(row, col)`.
    pub fn from_fn(n: usize, f: impl Fn(usize, usize) -> f64) -> Result<Self, AllocError> {
        let mut m = Self::zeroed(n)?;
        for (idx, x) in m.data.iter_mut().enumerate() {
            *x = f(idx / n, idx % n);
        }
        Ok(m)
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    pub fn fill_zero(&mut self) {
        self.data.fill(0.0);
    }
}

fn assert_same_dims(a: &SquareMatrix, b: &SquareMatrix, c: &SquareMatrix) {
    assert!(
        a.n == b.n && b.n == c.n,
        "matrix dimension mismatch: {} x {} -> {}",
        a.n,
        b.n,
        c.n
    );
}

pub fn multiply_naive(a: &SquareMatrix, b: &SquareMatrix, c: &mut SquareMatrix) {
    assert_same_dims(a, b, c);
    let n = a.n;
    let (a, b) = (&a.data, &b.data);
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += a[i * n + k] * b[k * n + j];
            }
            c.data[i * n + j] = sum;
        }
    }
}

pub fn multiply_blocked(a: &SquareMatrix, b: &SquareMatrix, c: &mut SquareMatrix) {
    assert_same_dims(a, b, c);
    let n = a.n;
    c.fill_zero();
    for ii in (0..n).step_by(BLOCK_SIZE) {
        multiply_row_band(&a.data, &b.data, &mut c.data[ii * n..], n, ii, (ii + BLOCK_SIZE).min(n));
    }
}

/// Blocked multiply with C split into bands of whole tile rows, one scoped
/// worker per band. Per-element summation order matches [`multiply_blocked`]
/// so results are bit-identical.
pub fn multiply_blocked_parallel(a: &SquareMatrix, b: &SquareMatrix, c: &mut SquareMatrix, threads: usize) {
    assert_same_dims(a, b, c);
    let n = a.n;
    let tile_rows = n.div_ceil(BLOCK_SIZE);
    let threads = threads.clamp(1, tile_rows.max(1));
    if threads == 1 || n == 0 {
        multiply_blocked(a, b, c);
        return;
    }

    c.fill_zero();
    let tiles_per_band = tile_rows.div_ceil(threads);
    let band_len = tiles_per_band * BLOCK_SIZE * n;
    let (a, b) = (&a.data, &b.data);
    debug!(n, threads, tiles_per_band, "parallel blocked multiply");

    crossbeam::scope(|scope| {
        for (band_idx, band) in c.data.chunks_mut(band_len).enumerate() {
            scope.spawn(move |_| {
                let band_start = band_idx * tiles_per_band * BLOCK_SIZE;
                let band_end = (band_start + tiles_per_band * BLOCK_SIZE).min(n);
                for ii in (band_start..band_end).step_by(BLOCK_SIZE) {
                    let local = (ii - band_start) * n;
                    multiply_row_band(a, b, &mut band[local..], n, ii, (ii + BLOCK_SIZE).min(band_end));
                }
            });
        }
    })
    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
}

/// Accumulate rows `ii..i_end` of `A * B` into `c_rows`, which starts at row `ii`.
#[inline]
fn multiply_row_band(a: &[f64], b: &[f64], c_rows: &mut [f64], n: usize, ii: usize, i_end: usize) {
    for jj in (0..n).step_by(BLOCK_SIZE) {
        let j_end = (jj + BLOCK_SIZE).min(n);
        for kk in (0..n).step_by(BLOCK_SIZE) {
            let k_end = (kk + BLOCK_SIZE).min(n);
            for i in ii..i_end {
                let c_row = &mut c_rows[(i - ii) * n..(i - ii) * n + n];
                for k in kk..k_end {
                    let a_ik = a[i * n + k];
                    let b_row = &b[k * n..k * n + n];
                    for j in jj..j_end {
                        c_row[j] += a_ik * b_row[j];
                    }
                }
            }
        }
    }
}

/// Sum of all elements. Lossy, but enough to catch a broken kernel.
pub fn checksum(m: &SquareMatrix) -> f64 {
    m.data.iter().sum()
}

pub fn checksums_match(lhs: f64, rhs: f64) -> bool {
    let scale = lhs.abs().max(rhs.abs()).max(1.0);
    (lhs - rhs).abs() <= CHECKSUM_REL_TOLERANCE * scale
}

/// Deterministic operands from the cross-language comparison suite:
/// `a[i][j] = (i + j) / n`, `b[i][j] = (i - j) / n`.
pub fn comparison_operands(n: usize) -> Result<(SquareMatrix, SquareMatrix), AllocError> {
    let scale = n.max(1) as f64;
    let a = SquareMatrix::from_fn(n, |i, j| (i + j) as f64 / scale)?;
    let b = SquareMatrix::from_fn(n, |i, j| (i as f64 - j as f64) / scale)?;
    Ok((a, b))
}
