//! Plumbing shared by the `cmpbench` binary and the standalone programs.

use std::sync::Once;

use clap::Parser;

static TRACE_INIT: Once = Once::new();
const DEFAULT_TRACE_FILTER: &str = "cmpbench_core=debug,cmpbench_cli=info,cmpbench=info";

/// Environment variable that turns on diagnostic logging to stderr.
pub const TRACE_ENV: &str = "CMPBENCH_TRACE";

pub fn env_toggle_enabled(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }
    !(trimmed.eq_ignore_ascii_case("0") || trimmed.eq_ignore_ascii_case("false") || trimmed.eq_ignore_ascii_case("off"))
}

pub fn filter_expr_from(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("1")
        || trimmed.eq_ignore_ascii_case("true")
        || trimmed.eq_ignore_ascii_case("on")
    {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Install a stderr subscriber when `CMPBENCH_TRACE` is set. stdout stays
/// reserved for the benchmark summary.
pub fn maybe_init_tracing() {
    let raw = match std::env::var(TRACE_ENV) {
        Ok(value) => value,
        Err(_) => return,
    };

    if !env_toggle_enabled(&raw) {
        return;
    }

    TRACE_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::fmt;

        let filter_expr = filter_expr_from(&raw).or_else(|| std::env::var("RUST_LOG").ok());

        let builder = fmt().with_writer(std::io::stderr);

        let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
            Some(filter) => builder.with_env_filter(filter),
            None => builder.with_env_filter(DEFAULT_TRACE_FILTER),
        };

        let _ = builder.try_init();
    });
}

/// Arguments of the standalone `fibonacci` program.
#[derive(Debug, Parser)]
#[command(name = "fibonacci", version, about = "Recursive, iterative and matrix Fibonacci")]
pub struct FibArgs {
    /// Index of the Fibonacci number; the recursive variant only runs up to 40
    #[arg(value_name = "N", default_value_t = cmpbench_core::fib::DEFAULT_N)]
    pub n: u64,
}

/// Arguments of the standalone `matrix_mult` program.
#[derive(Debug, Parser)]
#[command(name = "matrix_mult", version, about = "Naive and cache-blocked matrix multiplication")]
pub struct MatrixArgs {
    /// Matrix dimension; the naive kernel only runs up to 500
    #[arg(value_name = "N", default_value_t = cmpbench_core::matmul::DEFAULT_N)]
    pub n: usize,
}

/// Arguments of the standalone `quicksort` program.
#[derive(Debug, Parser)]
#[command(name = "quicksort", version, about = "Basic and hybrid Hoare quicksort")]
pub struct SortArgs {
    /// Number of elements to sort
    #[arg(value_name = "N", default_value_t = cmpbench_core::sort::DEFAULT_N)]
    pub n: usize,
}
