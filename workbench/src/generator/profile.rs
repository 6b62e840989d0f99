use anyhow::Context;
use linalgcore::math::matrix::{self, Matrix};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Cell pattern used when a worksheet asks for a generated matrix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Identity,
    Zeros,
    /// Entry `(i, j)` is `i + j + 1`.
    Sequential,
    /// Entry `(i, j)` is `i + j`.
    IndexSum,
    Random,
}

/// Configuration for generating a matrix from a cell pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub cols: usize,
    pub pattern: Pattern,
    pub seed: u64,
    pub low: f64,
    pub high: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 3,
            pattern: Pattern::Sequential,
            seed: 0,
            low: -1.0,
            high: 1.0,
        }
    }
}

pub fn build_matrix(config: &GeneratorConfig) -> anyhow::Result<Matrix> {
    let (rows, cols) = (config.rows, config.cols);
    let generated = match config.pattern {
        Pattern::Identity => matrix::identity(rows, cols),
        Pattern::Zeros => matrix::zeros(rows, cols),
        Pattern::Sequential => matrix::make_matrix(rows, cols, |i, j| (i + j + 1) as f64),
        Pattern::IndexSum => matrix::make_matrix(rows, cols, |i, j| (i + j) as f64),
        Pattern::Random => {
            if !(config.low < config.high) {
                anyhow::bail!(
                    "random range [{}, {}) is empty",
                    config.low,
                    config.high
                );
            }
            let mut rng = StdRng::seed_from_u64(config.seed);
            matrix::make_matrix(rows, cols, |_, _| rng.gen_range(config.low..config.high))
        }
    };
    generated.with_context(|| format!("generating {:?} matrix {}x{}", config.pattern, rows, cols))
}
