use std::path::PathBuf;

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;

use cmpbench_cli::maybe_init_tracing;
use cmpbench_core::{
    config::{BenchConfig, DEFAULT_SEED},
    fib, matmul,
    perf::scenarios::{Family, Observed, ScenarioSizes, Scratch, prepare_selected},
    programs::{self, COMPARE_MATRIX_N, COMPARE_SORT_N},
    sort,
};


#[derive(Debug, Parser)]
#[command(
    name = "cmpbench",
    author,
    version,
    about = "Compute micro-benchmarks: Fibonacci, matrix multiplication, quicksort",
    long_about = None
)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,

    /// Print reports as JSON instead of summary lines
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Recursive (n <= 40), iterative and matrix-exponentiation Fibonacci.
    Fib {
        #[arg(value_name = "N", default_value_t = fib::DEFAULT_N)]
        n: u64,
    },
    /// Blocked matrix multiply, plus the naive kernel for n <= 500.
    Matmul {
        #[arg(value_name = "N", default_value_t = matmul::DEFAULT_N)]
        n: usize,
        /// Run the blocked kernel on this many worker threads
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        threads: Option<u32>,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Basic and hybrid quicksort over a seeded shuffle of 0..N.
    Qsort {
        #[arg(value_name = "N", default_value_t = sort::DEFAULT_N)]
        n: usize,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Lomuto quicksort over LCG data (5 runs) and naive multiply of fixed operands (3 runs).
    Compare {
        #[arg(long, default_value_t = COMPARE_SORT_N)]
        sort_n: usize,
        #[arg(long, default_value_t = COMPARE_MATRIX_N)]
        matrix_n: usize,
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Run every registered scenario once and verify its result.
    Suite {
        /// TOML file overriding the default sizes
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Restrict the run to these scenario keys (repeatable)
        #[arg(long = "only", value_name = "KEY")]
        only: Vec<String>,
    },
}

#[derive(Debug, Serialize)]
struct SuiteEntry {
    key: &'static str,
    title: &'static str,
    family: Family,
    n: u64,
    seconds: f64,
    working_set_bytes: u64,
    observed: Observed,
}

#[derive(Debug, Serialize)]
struct SuiteReport {
    generated_at: String,
    config: BenchConfig,
    results: Vec<SuiteEntry>,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<BenchConfig> {
    match path {
        Some(path) => BenchConfig::load(path),
        None => Ok(BenchConfig::default()),
    }
}

fn run_suite(config: BenchConfig, only: &[String]) -> anyhow::Result<SuiteReport> {
    let sizes = ScenarioSizes::from(&config);
    let scenarios = prepare_selected(&sizes, only).context("prepare scenarios")?;
    let mut scratch = Scratch::new();
    let mut results = Vec::with_capacity(scenarios.len());
    for scenario in &scenarios {
        tracing::info!(scenario = scenario.key(), n = scenario.size(), "running scenario");
        let outcome = scenario.run_with(&mut scratch)?;
        results.push(SuiteEntry {
            key: scenario.key(),
            title: scenario.title(),
            family: scenario.family(),
            n: scenario.size(),
            seconds: outcome.elapsed.as_secs_f64(),
            working_set_bytes: scenario.working_set_bytes(),
            observed: outcome.observed,
        });
    }
    Ok(SuiteReport {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        config,
        results,
    })
}

fn print_suite(report: &SuiteReport) {
    for entry in &report.results {
        println!(
            "{:<24} n={:<10} {:>12.6} s  ok  ({})",
            entry.key, entry.n, entry.seconds, entry.title
        );
    }
}

fn emit<T: Serialize + std::fmt::Display>(report: &T, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report).context("serialize report")?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    maybe_init_tracing();

    let CliArgs { command, json } = CliArgs::parse();

    match command {
        Commands::Fib { n } => emit(&programs::run_fibonacci(n), json),
        Commands::Matmul { n, threads, seed } => {
            let report = programs::run_matrix(n, seed, threads.map(|t| t as usize))?;
            emit(&report, json)
        }
        Commands::Qsort { n, seed } => emit(&programs::run_quicksort(n, seed)?, json),
        Commands::Compare { sort_n, matrix_n, seed } => emit(&programs::run_compare(sort_n, matrix_n, seed)?, json),
        Commands::Suite { config, only } => {
            let config = load_config(config.as_ref())?;
            let report = run_suite(config, &only)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report).context("serialize suite report")?);
            } else {
                print_suite(&report);
            }
            Ok(())
        }
    }
}
