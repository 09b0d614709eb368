use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn bin(name: &str) -> Command {
    Command::cargo_bin(name).expect("binary should be built by cargo")
}

#[test]
fn test_fibonacci_prints_all_variants() {
    bin("fibonacci")
        .arg("20")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Computing fib(20)...\n"))
        .stdout(predicate::str::contains("Recursive: fib(20) = 6765"))
        .stdout(predicate::str::contains("Iterative: fib(20) = 6765"))
        .stdout(predicate::str::contains("Matrix:    fib(20) = 6765"));
}

#[test]
fn test_fibonacci_skips_recursive_above_guard() {
    bin("fibonacci")
        .arg("90")
        .assert()
        .success()
        .stdout(predicate::str::contains("Recursive").not())
        .stdout(predicate::str::contains("Matrix:    fib(90) = 2880067194370816120"));
}

#[test]
fn test_fibonacci_zero() {
    bin("fibonacci")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::contains("Iterative: fib(0) = 0"));
}

#[test]
fn test_matrix_small_prints_both_kernels() {
    bin("matrix_mult")
        .arg("100")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Matrix multiplication: 100 x 100\n"))
        .stdout(predicate::str::contains("Blocked: "))
        .stdout(predicate::str::contains("Naive:   "));
}

#[test]
fn test_matrix_allocation_failure_exits_one() {
    bin("matrix_mult")
        .arg(usize::MAX.to_string())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to allocate memory"));
}

#[test]
fn test_quicksort_reports_sorted() {
    bin("quicksort")
        .arg("20000")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Quicksort: 20000 elements\n"))
        .stdout(predicate::str::contains("Basic:  "))
        .stdout(predicate::str::contains("Hybrid: "))
        .stdout(predicate::str::contains("(sorted: no)").not());
}

#[test]
fn test_quicksort_allocation_failure_exits_one() {
    bin("quicksort")
        .arg(usize::MAX.to_string())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to allocate memory"));
}

#[test]
fn test_standalone_rejects_extra_arguments() {
    bin("quicksort").args(["10", "20"]).assert().failure();
}

#[test]
fn test_cmpbench_fib_json() {
    let output = bin("cmpbench").args(["fib", "12", "--json"]).output().expect("run cmpbench");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(value["iterative"]["value"], 144);
    assert_eq!(value["recursive"]["value"], 144);
}

#[test]
fn test_cmpbench_matmul_threads() {
    bin("cmpbench")
        .args(["matmul", "130", "--threads", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Blocked (3 threads): "));
}

#[test]
fn test_cmpbench_compare_small() {
    bin("cmpbench")
        .args(["compare", "--sort-n", "2000", "--matrix-n", "16"])
        .assert()
        .success()
        .stdout(predicate::str::contains("QuickSort 2000 elements"))
        .stdout(predicate::str::contains("16x16 matrix mult"));
}

#[test]
fn test_cmpbench_suite_with_config() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cfg = dir.path().join("bench.toml");
    fs::write(&cfg, "fib_n = 25\nmatrix_n = 32\nsort_n = 1000\nthreads = 2\n").expect("write config");

    bin("cmpbench")
        .args(["suite", "--config"])
        .arg(&cfg)
        .assert()
        .success()
        .stdout(predicate::str::contains("fib_recursive"))
        .stdout(predicate::str::contains("matmul_blocked_parallel"))
        .stdout(predicate::str::contains("qsort_lomuto"));
}

#[test]
fn test_cmpbench_suite_bad_config_fails() {
    let dir = tempfile::tempdir().expect("temp dir");
    let cfg = dir.path().join("bad.toml");
    fs::write(&cfg, "matrix_size = 3\n").expect("write config");

    bin("cmpbench")
        .args(["suite", "--config"])
        .arg(&cfg)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.toml"));
}

#[test]
fn test_cmpbench_suite_unknown_scenario() {
    bin("cmpbench")
        .args(["suite", "--only", "bogosort"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown scenario 'bogosort'"));
}
