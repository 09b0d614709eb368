//! The benchmark programs: build input, time each variant once, and report.
//!
//! Reports render the human-readable summary through `Display` and also
//! serialize, so the CLI can print either form.

use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::alloc::{AllocError, try_clone_slice, try_filled};
use crate::fib::{fib_iterative, fib_matrix, fib_recursive_bounded};
use crate::matmul::{
    NAIVE_VALIDATION_LIMIT, SquareMatrix, checksum, checksums_match, comparison_operands, multiply_blocked,
    multiply_blocked_parallel, multiply_naive,
};
use crate::perf::timed;
use crate::rng::Lcg;
use crate::sort::{fill_lcg, is_sorted, quicksort, quicksort_hybrid, quicksort_lomuto, shuffled_sequence};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FibVariant {
    pub value: u64,
    pub seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FibReport {
    pub n: u64,
    /// `None` above the recursion guard.
    pub recursive: Option<FibVariant>,
    pub iterative: FibVariant,
    pub matrix: FibVariant,
}

impl FibReport {
    pub fn consistent(&self) -> bool {
        self.iterative.value == self.matrix.value
            && self.recursive.is_none_or(|r| r.value == self.iterative.value)
    }
}

pub fn run_fibonacci(n: u64) -> FibReport {
    let recursive = {
        let (value, elapsed) = timed(|| fib_recursive_bounded(n));
        value.map(|value| FibVariant {
            value,
            seconds: elapsed.as_secs_f64(),
        })
    };
    let (value, elapsed) = timed(|| fib_iterative(n));
    let iterative = FibVariant {
        value,
        seconds: elapsed.as_secs_f64(),
    };
    let (value, elapsed) = timed(|| fib_matrix(n));
    let matrix = FibVariant {
        value,
        seconds: elapsed.as_secs_f64(),
    };

    let report = FibReport {
        n,
        recursive,
        iterative,
        matrix,
    };
    debug!(n, consistent = report.consistent(), "fibonacci run complete");
    report
}

impl fmt::Display for FibReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Computing fib({})...", self.n)?;
        if let Some(r) = &self.recursive {
            writeln!(f, "Recursive: fib({}) = {} ({:.6} s)", self.n, r.value, r.seconds)?;
        }
        writeln!(
            f,
            "Iterative: fib({}) = {} ({:.6} s)",
            self.n, self.iterative.value, self.iterative.seconds
        )?;
        write!(
            f,
            "Matrix:    fib({}) = {} ({:.6} s)",
            self.n, self.matrix.value, self.matrix.seconds
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatrixVariant {
    pub seconds: f64,
    pub checksum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixReport {
    pub n: usize,
    /// Worker count when the parallel blocked kernel was used.
    pub threads: Option<usize>,
    pub blocked: MatrixVariant,
    /// Only measured for `n <= NAIVE_VALIDATION_LIMIT`.
    pub naive: Option<MatrixVariant>,
}

impl MatrixReport {
    /// `None` when the naive kernel was skipped.
    pub fn checksums_agree(&self) -> Option<bool> {
        self.naive
            .map(|naive| checksums_match(naive.checksum, self.blocked.checksum))
    }
}

pub fn run_matrix(n: usize, seed: u64, threads: Option<usize>) -> Result<MatrixReport, AllocError> {
    let mut rng = Lcg::new(seed);
    let a = SquareMatrix::random(n, &mut rng)?;
    let b = SquareMatrix::random(n, &mut rng)?;
    let mut c = SquareMatrix::zeroed(n)?;

    let ((), elapsed) = timed(|| match threads {
        Some(t) => multiply_blocked_parallel(&a, &b, &mut c, t),
        None => multiply_blocked(&a, &b, &mut c),
    });
    let blocked = MatrixVariant {
        seconds: elapsed.as_secs_f64(),
        checksum: checksum(&c),
    };

    let naive = (n <= NAIVE_VALIDATION_LIMIT).then(|| {
        c.fill_zero();
        let ((), elapsed) = timed(|| multiply_naive(&a, &b, &mut c));
        MatrixVariant {
            seconds: elapsed.as_secs_f64(),
            checksum: checksum(&c),
        }
    });

    let report = MatrixReport {
        n,
        threads,
        blocked,
        naive,
    };
    if report.checksums_agree() == Some(false) {
        warn!(
            n,
            blocked = report.blocked.checksum,
            naive = ?report.naive.map(|v| v.checksum),
            "blocked and naive checksums differ"
        );
    }
    debug!(n, blocked_secs = report.blocked.seconds, "matrix run complete");
    Ok(report)
}

impl fmt::Display for MatrixReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix multiplication: {} x {}", self.n, self.n)?;
        let label = match self.threads {
            Some(t) => format!("Blocked ({t} threads)"),
            None => "Blocked".to_string(),
        };
        write!(
            f,
            "{label}: {:.3} seconds (checksum: {:.2})",
            self.blocked.seconds, self.blocked.checksum
        )?;
        if let Some(naive) = &self.naive {
            write!(
                f,
                "\nNaive:   {:.3} seconds (checksum: {:.2})",
                naive.seconds, naive.checksum
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SortVariant {
    pub seconds: f64,
    pub sorted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortReport {
    pub n: usize,
    pub basic: SortVariant,
    pub hybrid: SortVariant,
    /// Both variants produced the same sequence from the same input copy.
    pub identical: bool,
}

pub fn run_quicksort(n: usize, seed: u64) -> Result<SortReport, AllocError> {
    let mut arr = shuffled_sequence(n, seed)?;
    let pristine = try_clone_slice("sort input copy", &arr)?;

    let ((), elapsed) = timed(|| quicksort(&mut arr));
    let basic = SortVariant {
        seconds: elapsed.as_secs_f64(),
        sorted: is_sorted(&arr),
    };
    let basic_out = try_clone_slice("basic output", &arr)?;

    arr.copy_from_slice(&pristine);
    let ((), elapsed) = timed(|| quicksort_hybrid(&mut arr));
    let hybrid = SortVariant {
        seconds: elapsed.as_secs_f64(),
        sorted: is_sorted(&arr),
    };

    let report = SortReport {
        n,
        basic,
        hybrid,
        identical: basic_out == arr,
    };
    debug!(n, identical = report.identical, "quicksort run complete");
    Ok(report)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

impl fmt::Display for SortReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quicksort: {} elements", self.n)?;
        writeln!(
            f,
            "Basic:  {:.3} seconds (sorted: {})",
            self.basic.seconds,
            yes_no(self.basic.sorted)
        )?;
        write!(
            f,
            "Hybrid: {:.3} seconds (sorted: {})",
            self.hybrid.seconds,
            yes_no(self.hybrid.sorted)
        )
    }
}

/// Sizes and repeat counts of the cross-language comparison programs.
pub const COMPARE_SORT_N: usize = 1_000_000;
pub const COMPARE_SORT_RUNS: u64 = 5;
pub const COMPARE_MATRIX_N: usize = 512;
pub const COMPARE_MATRIX_RUNS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareReport {
    pub sort_n: usize,
    pub sort_runs: u64,
    pub sort_millis: f64,
    pub sort_all_sorted: bool,
    pub matrix_n: usize,
    pub matrix_runs: usize,
    pub matrix_millis: f64,
    pub c00: f64,
}

/// Lomuto quicksort over freshly LCG-filled data (seeds `seed..seed + runs`)
/// and repeated naive multiplies of the deterministic comparison operands.
pub fn run_compare(sort_n: usize, matrix_n: usize, seed: u64) -> Result<CompareReport, AllocError> {
    let mut arr = try_filled("comparison sort input", sort_n, 0i64)?;
    let mut all_sorted = true;
    let ((), sort_elapsed) = timed(|| {
        for run in 0..COMPARE_SORT_RUNS {
            fill_lcg(&mut arr, seed.wrapping_add(run));
            quicksort_lomuto(&mut arr);
            all_sorted &= is_sorted(&arr);
        }
    });

    let (a, b) = comparison_operands(matrix_n)?;
    let mut c = SquareMatrix::zeroed(matrix_n)?;
    let ((), matrix_elapsed) = timed(|| {
        for _ in 0..COMPARE_MATRIX_RUNS {
            multiply_naive(&a, &b, &mut c);
        }
    });
    let c00 = if matrix_n > 0 { c.get(0, 0) } else { 0.0 };

    Ok(CompareReport {
        sort_n,
        sort_runs: COMPARE_SORT_RUNS,
        sort_millis: sort_elapsed.as_secs_f64() * 1000.0,
        sort_all_sorted: all_sorted,
        matrix_n,
        matrix_runs: COMPARE_MATRIX_RUNS,
        matrix_millis: matrix_elapsed.as_secs_f64() * 1000.0,
        c00,
    })
}

impl fmt::Display for CompareReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Rust: QuickSort {} elements, Time: {:.2} ms ({} runs)",
            self.sort_n, self.sort_millis, self.sort_runs
        )?;
        write!(
            f,
            "Rust: {}x{} matrix mult, Time: {:.2} ms ({} runs), C[0][0]={:.4}",
            self.matrix_n, self.matrix_n, self.matrix_millis, self.matrix_runs, self.c00
        )
    }
}
