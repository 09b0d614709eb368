use clap::Parser;
use cmpbench_cli::{MatrixArgs, maybe_init_tracing};
use cmpbench_core::config::DEFAULT_SEED;
use cmpbench_core::programs::run_matrix;

// An allocation failure surfaces as `Err` from main: message on stderr, exit code 1.
fn main() -> anyhow::Result<()> {
    maybe_init_tracing();
    let MatrixArgs { n } = MatrixArgs::parse();
    println!("{}", run_matrix(n, DEFAULT_SEED, None)?);
    Ok(())
}
