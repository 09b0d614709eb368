use clap::Parser;
use cmpbench_cli::{SortArgs, maybe_init_tracing};
use cmpbench_core::config::DEFAULT_SEED;
use cmpbench_core::programs::run_quicksort;

fn main() -> anyhow::Result<()> {
    maybe_init_tracing();
    let SortArgs { n } = SortArgs::parse();
    println!("{}", run_quicksort(n, DEFAULT_SEED)?);
    Ok(())
}
