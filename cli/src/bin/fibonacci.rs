use clap::Parser;
use cmpbench_cli::{FibArgs, maybe_init_tracing};
use cmpbench_core::programs::run_fibonacci;

fn main() {
    maybe_init_tracing();
    let FibArgs { n } = FibArgs::parse();
    println!("{}", run_fibonacci(n));
}
