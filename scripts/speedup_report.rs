//! Reads the Criterion output of the kernel benches and reports, for every
//! input size, how each variant compares to the baseline kernel of its
//! family: blocked and parallel matmul against naive, hybrid and Lomuto
//! quicksort against basic, matrix Fibonacci against iterative.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result, bail};
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cmpbench_cli::maybe_init_tracing;

#[derive(Debug, Parser)]
#[command(
    name = "speedup_report",
    about = "Per-size speedups of each kernel variant over its baseline, from Criterion output",
    long_about = None
)]
struct ReportArgs {
    /// Criterion output directory
    #[arg(long, value_name = "DIR", default_value = "target/criterion")]
    criterion_dir: PathBuf,

    /// Also write the report as JSON to this file
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Run the kernel benches before reading their output
    #[arg(long)]
    run_bench: bool,
}

/// A Criterion group and the variant the others are measured against.
struct Comparison {
    bench: &'static str,
    group: &'static str,
    baseline: &'static str,
    variants: &'static [&'static str],
}

static COMPARISONS: &[Comparison] = &[
    Comparison {
        bench: "matmul_bench",
        group: "matmul",
        baseline: "naive",
        variants: &["blocked", "blocked_parallel"],
    },
    Comparison {
        bench: "sort_bench",
        group: "quicksort",
        baseline: "basic",
        // lomuto sorts LCG data with duplicates, not the shuffled permutation
        variants: &["hybrid", "lomuto"],
    },
    Comparison {
        bench: "fib_bench",
        group: "fib_iterative_vs_matrix",
        baseline: "iterative",
        variants: &["matrix"],
    },
];

#[derive(Debug, Serialize)]
struct VariantTiming {
    variant: &'static str,
    mean_ns: f64,
    /// Baseline mean divided by this variant's mean; above 1 means faster.
    speedup: f64,
}

#[derive(Debug, Serialize)]
struct SpeedupRow {
    group: &'static str,
    n: u64,
    baseline: &'static str,
    baseline_mean_ns: f64,
    variants: Vec<VariantTiming>,
}

#[derive(Debug, Serialize)]
struct SpeedupReport {
    generated_at: String,
    criterion_dir: PathBuf,
    rows: Vec<SpeedupRow>,
}

#[derive(Deserialize)]
struct EstimateFile {
    mean: EstimateEntry,
}

#[derive(Deserialize)]
struct EstimateEntry {
    point_estimate: f64,
}

fn main() -> Result<()> {
    maybe_init_tracing();
    let args = ReportArgs::parse();
    if args.run_bench {
        run_kernel_benches()?;
    }

    let report = build_report(&args.criterion_dir)?;
    if report.rows.is_empty() {
        bail!(
            "no benchmark results under {}; run `cargo bench -p cmpbench-core` or pass --run-bench",
            args.criterion_dir.display()
        );
    }
    for row in &report.rows {
        println!("{}", render_row(row));
    }
    if let Some(path) = &args.output {
        let json = serde_json::to_string_pretty(&report).context("serialize speedup report")?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        println!("Speedup report written to {}", path.display());
    }
    Ok(())
}

fn run_kernel_benches() -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["bench", "-p", "cmpbench-core"]);
    for comparison in COMPARISONS {
        cmd.args(["--bench", comparison.bench]);
    }
    cmd.args(["--", "--noplot"]);
    let status = cmd.status().context("failed to spawn cargo bench")?;
    if !status.success() {
        bail!("cargo bench exited with {}", status);
    }
    Ok(())
}

fn build_report(criterion_dir: &Path) -> Result<SpeedupReport> {
    let mut rows = Vec::new();
    for comparison in COMPARISONS {
        rows.extend(comparison_rows(criterion_dir, comparison)?);
    }
    Ok(SpeedupReport {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        criterion_dir: criterion_dir.to_path_buf(),
        rows,
    })
}

/// One row per size the baseline was benchmarked at. Variants without a
/// result for that size are left out of the row.
fn comparison_rows(criterion_dir: &Path, comparison: &Comparison) -> Result<Vec<SpeedupRow>> {
    let group_dir = criterion_dir.join(comparison.group);
    let baseline_dir = group_dir.join(comparison.baseline);
    if !baseline_dir.is_dir() {
        warn!(group = comparison.group, dir = %baseline_dir.display(), "no baseline results, skipping");
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    for n in benchmarked_sizes(&baseline_dir)? {
        let baseline_mean_ns = load_mean_ns(&estimates_path(&group_dir, comparison.baseline, n))?;
        let mut variants = Vec::with_capacity(comparison.variants.len());
        for &variant in comparison.variants {
            let path = estimates_path(&group_dir, variant, n);
            if !path.is_file() {
                debug!(group = comparison.group, variant, n, "missing variant result");
                continue;
            }
            let mean_ns = load_mean_ns(&path)?;
            variants.push(VariantTiming {
                variant,
                mean_ns,
                speedup: speedup(baseline_mean_ns, mean_ns),
            });
        }
        rows.push(SpeedupRow {
            group: comparison.group,
            n,
            baseline: comparison.baseline,
            baseline_mean_ns,
            variants,
        });
    }
    Ok(rows)
}

fn estimates_path(group_dir: &Path, variant: &str, n: u64) -> PathBuf {
    group_dir.join(variant).join(n.to_string()).join("new").join("estimates.json")
}

/// Numeric parameter directories of a benchmark function, ascending.
fn benchmarked_sizes(function_dir: &Path) -> Result<Vec<u64>> {
    let mut sizes: Vec<u64> = fs::read_dir(function_dir)
        .with_context(|| format!("read {}", function_dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().and_then(|name| name.parse().ok()))
        .collect();
    sizes.sort_unstable();
    Ok(sizes)
}

fn load_mean_ns(path: &Path) -> Result<f64> {
    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let estimates: EstimateFile = serde_json::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(estimates.mean.point_estimate)
}

fn speedup(baseline_ns: f64, variant_ns: f64) -> f64 {
    if variant_ns > 0.0 { baseline_ns / variant_ns } else { 0.0 }
}

fn format_ns(ns: f64) -> String {
    if ns >= 1e9 {
        format!("{:.3} s", ns / 1e9)
    } else if ns >= 1e6 {
        format!("{:.3} ms", ns / 1e6)
    } else if ns >= 1e3 {
        format!("{:.3} us", ns / 1e3)
    } else {
        format!("{:.1} ns", ns)
    }
}

fn render_row(row: &SpeedupRow) -> String {
    let mut line = format!(
        "{:<24} n={:<8} {} {}",
        row.group,
        row.n,
        row.baseline,
        format_ns(row.baseline_mean_ns)
    );
    for v in &row.variants {
        line.push_str(&format!(" | {} {} ({:.2}x)", v.variant, format_ns(v.mean_ns), v.speedup));
    }
    line
}
