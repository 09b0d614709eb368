use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use tracing::debug;

use crate::alloc::try_clone_slice;
use crate::config::BenchConfig;
use crate::fib::{RECURSIVE_LIMIT, fib_iterative, fib_matrix, fib_recursive};
use crate::matmul::{
    NAIVE_VALIDATION_LIMIT, SquareMatrix, checksum, checksums_match, multiply_blocked, multiply_blocked_parallel,
    multiply_naive,
};
use crate::perf::timed;
use crate::rng::Lcg;
use crate::sort::{fill_lcg, is_sorted, quicksort, quicksort_hybrid, quicksort_lomuto, shuffled_sequence};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    Fibonacci,
    Matmul,
    Quicksort,
}

/// Input sizes for one preparation of the scenario table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSizes {
    pub fib_n: u64,
    /// Clamped to [`RECURSIVE_LIMIT`].
    pub fib_recursive_n: u64,
    pub matrix_n: usize,
    pub sort_n: usize,
    pub seed: u64,
    pub threads: usize,
}

impl ScenarioSizes {
    /// Sizes small enough for Criterion to take many samples.
    pub fn bench() -> Self {
        Self {
            fib_n: 90,
            fib_recursive_n: 25,
            matrix_n: 128,
            sort_n: 100_000,
            seed: crate::config::DEFAULT_SEED,
            threads: crate::config::default_threads(),
        }
    }
}

impl From<&BenchConfig> for ScenarioSizes {
    fn from(cfg: &BenchConfig) -> Self {
        Self {
            fib_n: cfg.fib_n,
            fib_recursive_n: cfg.fib_n.min(RECURSIVE_LIMIT),
            matrix_n: cfg.matrix_n,
            sort_n: cfg.sort_n,
            seed: cfg.seed,
            threads: cfg.threads,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Kernel {
    FibRecursive,
    FibIterative,
    FibMatrix,
    MatmulNaive,
    MatmulBlocked,
    MatmulBlockedParallel,
    QsortBasic,
    QsortHybrid,
    QsortLomuto,
}

#[derive(Debug)]
struct Scenario {
    key: &'static str,
    title: &'static str,
    family: Family,
    kernel: Kernel,
}

static SCENARIOS: &[Scenario] = &[
    Scenario {
        key: "fib_recursive",
        title: "Fibonacci, naive recursion",
        family: Family::Fibonacci,
        kernel: Kernel::FibRecursive,
    },
    Scenario {
        key: "fib_iterative",
        title: "Fibonacci, two-accumulator loop",
        family: Family::Fibonacci,
        kernel: Kernel::FibIterative,
    },
    Scenario {
        key: "fib_matrix",
        title: "Fibonacci, 2x2 matrix exponentiation",
        family: Family::Fibonacci,
        kernel: Kernel::FibMatrix,
    },
    Scenario {
        key: "matmul_naive",
        title: "Matrix multiply, naive i-j-k",
        family: Family::Matmul,
        kernel: Kernel::MatmulNaive,
    },
    Scenario {
        key: "matmul_blocked",
        title: "Matrix multiply, 64x64 tiles",
        family: Family::Matmul,
        kernel: Kernel::MatmulBlocked,
    },
    Scenario {
        key: "matmul_blocked_parallel",
        title: "Matrix multiply, tiles across worker threads",
        family: Family::Matmul,
        kernel: Kernel::MatmulBlockedParallel,
    },
    Scenario {
        key: "qsort_basic",
        title: "Quicksort, recursive Hoare",
        family: Family::Quicksort,
        kernel: Kernel::QsortBasic,
    },
    Scenario {
        key: "qsort_hybrid",
        title: "Quicksort, Hoare + insertion sort",
        family: Family::Quicksort,
        kernel: Kernel::QsortHybrid,
    },
    Scenario {
        key: "qsort_lomuto",
        title: "Quicksort, Lomuto over LCG data",
        family: Family::Quicksort,
        kernel: Kernel::QsortLomuto,
    },
];

/// Keys of every registered scenario, in table order.
pub fn scenario_keys() -> impl Iterator<Item = &'static str> {
    SCENARIOS.iter().map(|s| s.key)
}

#[derive(Debug, Clone)]
enum Input {
    Fib(u64),
    Matrix {
        a: Arc<SquareMatrix>,
        b: Arc<SquareMatrix>,
    },
    Sort(Arc<Vec<i64>>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expected {
    Value(u64),
    Checksum(f64),
    /// Larger than the naive validation limit; nothing to compare against.
    Unchecked,
    /// The input sorted once at prepare time by the standard library.
    SortedAs(Arc<Vec<i64>>),
}

/// What a single run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Observed {
    Value(u64),
    Checksum(f64),
    Sorted { len: usize, sorted: bool, sum: i128 },
}

impl Expected {
    /// `output` is the sorted buffer for sort scenarios and ignored otherwise.
    pub(crate) fn verify(&self, actual: &Observed, output: &[i64]) -> Result<()> {
        match (self, actual) {
            (Expected::Value(v), Observed::Value(a)) if v == a => Ok(()),
            (Expected::Checksum(v), Observed::Checksum(a)) if checksums_match(*v, *a) => Ok(()),
            (Expected::Unchecked, Observed::Checksum(_)) => Ok(()),
            (Expected::SortedAs(reference), Observed::Sorted { .. }) => {
                if reference.len() != output.len() {
                    bail!("expected {} sorted elements but observed {}", reference.len(), output.len());
                }
                match reference.iter().zip(output).position(|(r, o)| r != o) {
                    Some(i) => bail!("output[{}] = {} but the sorted input has {}", i, output[i], reference[i]),
                    None => Ok(()),
                }
            }
            (Expected::SortedAs(reference), _) => {
                bail!("expected {} sorted elements but observed {:?}", reference.len(), actual)
            }
            _ => bail!("expected {:?} but observed {:?}", self, actual),
        }
    }
}

/// Reusable output buffers so repeated runs do not measure allocation.
#[derive(Debug, Default)]
pub struct Scratch {
    matrix: Option<SquareMatrix>,
    sort: Vec<i64>,
}

impl Scratch {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub observed: Observed,
    #[serde(skip)]
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct PreparedScenario {
    scenario: &'static Scenario,
    input: Input,
    expected: Expected,
    size: u64,
    threads: usize,
}

impl PreparedScenario {
    pub fn key(&self) -> &'static str {
        self.scenario.key
    }

    pub fn title(&self) -> &'static str {
        self.scenario.title
    }

    pub fn family(&self) -> Family {
        self.scenario.family
    }

    /// The `n` this scenario was prepared with.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn bench_case_name(&self) -> String {
        format!("{}_{}", self.scenario.key, self.size)
    }

    /// Bytes held by the input plus the output buffer a run needs.
    pub fn working_set_bytes(&self) -> u64 {
        let bytes = match &self.input {
            Input::Fib(_) => 0,
            Input::Matrix { a, .. } => 3 * a.as_slice().len() * std::mem::size_of::<f64>(),
            Input::Sort(v) => 2 * v.len() * std::mem::size_of::<i64>(),
        };
        bytes as u64
    }

    pub fn run(&self) -> Result<ScenarioOutcome> {
        self.run_with(&mut Scratch::new())
    }

    pub fn run_with(&self, scratch: &mut Scratch) -> Result<ScenarioOutcome> {
        let (observed, elapsed) = match &self.input {
            Input::Fib(n) => {
                let n = *n;
                let f: fn(u64) -> u64 = match self.scenario.kernel {
                    Kernel::FibRecursive => fib_recursive,
                    Kernel::FibMatrix => fib_matrix,
                    _ => fib_iterative,
                };
                let (value, elapsed) = timed(|| f(n));
                (Observed::Value(value), elapsed)
            }
            Input::Matrix { a, b } => {
                let c = match scratch.matrix.take() {
                    Some(c) if c.n() == a.n() => scratch.matrix.insert(c),
                    _ => scratch
                        .matrix
                        .insert(SquareMatrix::zeroed(a.n()).context("allocate scenario output matrix")?),
                };
                let ((), elapsed) = timed(|| match self.scenario.kernel {
                    Kernel::MatmulNaive => multiply_naive(a, b, c),
                    Kernel::MatmulBlockedParallel => multiply_blocked_parallel(a, b, c, self.threads),
                    _ => multiply_blocked(a, b, c),
                });
                (Observed::Checksum(checksum(c)), elapsed)
            }
            Input::Sort(data) => {
                scratch.sort.clear();
                scratch
                    .sort
                    .try_reserve_exact(data.len())
                    .context("allocate scenario sort buffer")?;
                scratch.sort.extend_from_slice(data);
                let buf = scratch.sort.as_mut_slice();
                let ((), elapsed) = timed(|| match self.scenario.kernel {
                    Kernel::QsortLomuto => quicksort_lomuto(buf),
                    Kernel::QsortHybrid => quicksort_hybrid(buf),
                    _ => quicksort(buf),
                });
                (
                    Observed::Sorted {
                        len: buf.len(),
                        sorted: is_sorted(&*buf),
                        sum: wide_sum(buf),
                    },
                    elapsed,
                )
            }
        };

        self.expected
            .verify(&observed, &scratch.sort)
            .with_context(|| format!("scenario {} produced a wrong result", self.scenario.key))?;
        debug!(scenario = self.scenario.key, elapsed_us = elapsed.as_micros() as u64, "scenario run");
        Ok(ScenarioOutcome { observed, elapsed })
    }
}

fn wide_sum(values: &[i64]) -> i128 {
    values.iter().map(|&v| i128::from(v)).sum()
}

fn sorted_reference(input: &[i64]) -> Result<Vec<i64>> {
    let mut reference = try_clone_slice("sorted reference", input).context("allocate sorted reference")?;
    reference.sort_unstable();
    Ok(reference)
}

pub fn prepare_scenarios(sizes: &ScenarioSizes) -> Result<Vec<PreparedScenario>> {
    let mut rng = Lcg::new(sizes.seed);
    let a = Arc::new(SquareMatrix::random(sizes.matrix_n, &mut rng).context("allocate matrix A")?);
    let b = Arc::new(SquareMatrix::random(sizes.matrix_n, &mut rng).context("allocate matrix B")?);
    let matrix_expected = if sizes.matrix_n <= NAIVE_VALIDATION_LIMIT {
        let mut c = SquareMatrix::zeroed(sizes.matrix_n).context("allocate reference matrix")?;
        multiply_naive(&a, &b, &mut c);
        Expected::Checksum(checksum(&c))
    } else {
        Expected::Unchecked
    };

    let shuffled = Arc::new(shuffled_sequence(sizes.sort_n, sizes.seed).context("allocate shuffled input")?);
    let lcg_data = {
        let mut v = try_clone_slice("lomuto input", shuffled.as_slice()).context("allocate lomuto input")?;
        fill_lcg(&mut v, sizes.seed);
        Arc::new(v)
    };
    let shuffled_sorted = Arc::new(sorted_reference(&shuffled)?);
    let lcg_sorted = Arc::new(sorted_reference(&lcg_data)?);

    SCENARIOS
        .iter()
        .map(|scenario| {
            let (input, expected, size) = match scenario.kernel {
                Kernel::FibRecursive => {
                    let n = sizes.fib_recursive_n.min(RECURSIVE_LIMIT);
                    (Input::Fib(n), Expected::Value(fib_iterative(n)), n)
                }
                Kernel::FibIterative => {
                    let n = sizes.fib_n;
                    (Input::Fib(n), Expected::Value(fib_matrix(n)), n)
                }
                Kernel::FibMatrix => {
                    let n = sizes.fib_n;
                    (Input::Fib(n), Expected::Value(fib_iterative(n)), n)
                }
                Kernel::MatmulNaive | Kernel::MatmulBlocked | Kernel::MatmulBlockedParallel => (
                    Input::Matrix {
                        a: Arc::clone(&a),
                        b: Arc::clone(&b),
                    },
                    matrix_expected.clone(),
                    sizes.matrix_n as u64,
                ),
                Kernel::QsortBasic | Kernel::QsortHybrid => (
                    Input::Sort(Arc::clone(&shuffled)),
                    Expected::SortedAs(Arc::clone(&shuffled_sorted)),
                    sizes.sort_n as u64,
                ),
                Kernel::QsortLomuto => (
                    Input::Sort(Arc::clone(&lcg_data)),
                    Expected::SortedAs(Arc::clone(&lcg_sorted)),
                    sizes.sort_n as u64,
                ),
            };
            Ok(PreparedScenario {
                scenario,
                input,
                expected,
                size,
                threads: sizes.threads,
            })
        })
        .collect()
}

/// Prepare only the scenarios whose key is listed (all of them when `keys` is empty).
pub fn prepare_selected(sizes: &ScenarioSizes, keys: &[String]) -> Result<Vec<PreparedScenario>> {
    if let Some(unknown) = keys.iter().find(|k| !SCENARIOS.iter().any(|s| s.key == k.as_str())) {
        return Err(anyhow!(
            "unknown scenario '{}'; known scenarios: {}",
            unknown,
            scenario_keys().collect::<Vec<_>>().join(", ")
        ));
    }
    let all = prepare_scenarios(sizes)?;
    if keys.is_empty() {
        return Ok(all);
    }
    Ok(all.into_iter().filter(|s| keys.iter().any(|k| k == s.key())).collect())
}
