//! Problem sizes and knobs shared by the programs and the scenario suite.
//!
//! Every field has a default matching the standalone programs. A TOML file
//! may override any subset:
//!
//! ```toml
//! fib_n = 35
//! matrix_n = 256
//! sort_n = 100000
//! seed = 7
//! threads = 4
//! ```

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::{fib, matmul, sort};

pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    pub fib_n: u64,
    pub matrix_n: usize,
    pub sort_n: usize,
    pub seed: u64,
    /// Worker count for the parallel blocked multiply.
    pub threads: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            fib_n: fib::DEFAULT_N,
            matrix_n: matmul::DEFAULT_N,
            sort_n: sort::DEFAULT_N,
            seed: DEFAULT_SEED,
            threads: default_threads(),
        }
    }
}

impl BenchConfig {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(src).context("parse benchmark config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml_str(&src).with_context(|| format!("load config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == 0 {
            bail!("threads must be at least 1");
        }
        Ok(())
    }
}

pub fn default_threads() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}
