// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmark configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! size = 1000
//! iterations = 100
//! scale = 0.5
//! seed = 1111
//! add_value = 5.0
//! memory_budget = "64M"
//! ```

use crate::HarnessError;
use dense_memory::MemoryBudget;
use std::path::Path;

/// Seed the benchmark has always used for its generator.
pub const DEFAULT_SEED: u64 = 1111;

/// Configuration for one benchmark run.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BenchConfig {
    /// Side length of the square `x` and `y` matrices.
    pub size: usize,
    /// Iteration count `N`; the loop body runs `N - 1` times.
    pub iterations: usize,
    /// Coefficient in `y ← x + scale·y`.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Generator seed.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Scalar added in `y ← x + add_value` before each accumulate.
    #[serde(default = "default_add_value")]
    pub add_value: f64,
    /// Optional ceiling on tensor storage (human-readable, e.g. `"64M"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_budget: Option<String>,
}

fn default_scale() -> f64 {
    1.0
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_add_value() -> f64 {
    5.0
}

impl BenchConfig {
    /// Configuration for `SZ N [SCALE]` with every other field defaulted.
    pub fn new(size: usize, iterations: usize, scale: Option<f64>) -> Self {
        Self {
            size,
            iterations,
            scale: scale.unwrap_or_else(default_scale),
            ..Default::default()
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HarnessError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, HarnessError> {
        toml::from_str(toml_str)
            .map_err(|e| HarnessError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, HarnessError> {
        toml::to_string_pretty(self)
            .map_err(|e| HarnessError::Config(format!("TOML serialise error: {e}")))
    }

    /// Parses the memory budget string, if one is set.
    pub fn parse_budget(&self) -> Result<Option<MemoryBudget>, HarnessError> {
        self.memory_budget
            .as_deref()
            .map(|s| {
                MemoryBudget::parse(s)
                    .map_err(|e| HarnessError::Config(format!("invalid budget: {e}")))
            })
            .transpose()
    }

    /// Checks the values a run depends on.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.size == 0 {
            return Err(HarnessError::Config("size must be positive".into()));
        }
        if self.iterations == 0 {
            return Err(HarnessError::Config("iterations must be positive".into()));
        }
        if !self.scale.is_finite() {
            return Err(HarnessError::Config(format!(
                "scale must be finite, got {}",
                self.scale
            )));
        }
        if !self.add_value.is_finite() {
            return Err(HarnessError::Config(format!(
                "add_value must be finite, got {}",
                self.add_value
            )));
        }
        self.parse_budget()?;
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            size: 128,
            iterations: 100,
            scale: default_scale(),
            seed: DEFAULT_SEED,
            add_value: default_add_value(),
            memory_budget: None,
        }
    }
}
