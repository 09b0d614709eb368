pub mod alloc;
pub mod config;
pub mod fib;
pub mod matmul;
pub mod programs;
pub mod rng;
pub mod sort;

// Scenario registry shared by the benches and the suite command
pub mod perf;

#[cfg(test)]
mod config_test;
#[cfg(test)]
mod fib_test;
#[cfg(test)]
mod matmul_test;

pub use alloc::AllocError;
pub use config::BenchConfig;
