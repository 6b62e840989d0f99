use crate::generator::profile::{GeneratorConfig, Pattern};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A matrix is either spelled out row by row or produced by a generator.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatrixSource {
    Literal(Vec<Vec<f64>>),
    Generated(GeneratorConfig),
}

/// One worksheet operation. `name` is where the result is stored; operands
/// refer to previously defined or computed names.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Add { name: String, lhs: String, rhs: String },
    Subtract { name: String, lhs: String, rhs: String },
    /// Matrix product, matrix-vector product, or entrywise vector product.
    Multiply { name: String, lhs: String, rhs: String },
    ScalarMultiply { name: String, scalar: f64, operand: String },
    Dot { name: String, lhs: String, rhs: String },
    Cross { name: String, lhs: String, rhs: String },
    Proj { name: String, lhs: String, rhs: String },
    AngleR { name: String, lhs: String, rhs: String },
    Less { name: String, lhs: String, rhs: String },
    Equal { name: String, lhs: String, rhs: String },
    Sum { name: String, operand: String },
    Mean { name: String, operand: String },
    Length { name: String, operand: String },
    Unit { name: String, operand: String },
    Transpose { name: String, operand: String },
    Determinant { name: String, operand: String },
    Bracket { name: String, lhs: String, rhs: String },
    Join { name: String, lhs: String, rhs: String },
    AppendRow { name: String, matrix: String, vector: String },
    AppendColumn { name: String, matrix: String, vector: String },
    SetDims { name: String, operand: String, rows: usize, cols: usize },
    SwapRows { name: String, operand: String, i: usize, j: usize },
    SwapCols { name: String, operand: String, i: usize, j: usize },
    SortRows { name: String, operand: String },
}

impl Step {
    pub fn name(&self) -> &str {
        match self {
            Step::Add { name, .. }
            | Step::Subtract { name, .. }
            | Step::Multiply { name, .. }
            | Step::ScalarMultiply { name, .. }
            | Step::Dot { name, .. }
            | Step::Cross { name, .. }
            | Step::Proj { name, .. }
            | Step::AngleR { name, .. }
            | Step::Less { name, .. }
            | Step::Equal { name, .. }
            | Step::Sum { name, .. }
            | Step::Mean { name, .. }
            | Step::Length { name, .. }
            | Step::Unit { name, .. }
            | Step::Transpose { name, .. }
            | Step::Determinant { name, .. }
            | Step::Bracket { name, .. }
            | Step::Join { name, .. }
            | Step::AppendRow { name, .. }
            | Step::AppendColumn { name, .. }
            | Step::SetDims { name, .. }
            | Step::SwapRows { name, .. }
            | Step::SwapCols { name, .. }
            | Step::SortRows { name, .. } => name,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorksheetConfig {
    pub matrices: BTreeMap<String, MatrixSource>,
    pub vectors: BTreeMap<String, Vec<f64>>,
    pub steps: Vec<Step>,
}

impl WorksheetConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading worksheet {}", path_ref.display()))?;
        let config: WorksheetConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing worksheet {}", path_ref.display()))?;
        Ok(config)
    }

    /// The stock walkthrough: two sequential matrices, a vector, their
    /// products and the determinant of the 2x2 `i + j` matrix.
    pub fn demo() -> Self {
        let sequential = |rows, cols| {
            MatrixSource::Generated(GeneratorConfig {
                rows,
                cols,
                pattern: Pattern::Sequential,
                ..Default::default()
            })
        };

        let mut matrices = BTreeMap::new();
        matrices.insert("A".to_string(), sequential(2, 3));
        matrices.insert("B".to_string(), sequential(3, 1));
        matrices.insert(
            "C".to_string(),
            MatrixSource::Generated(GeneratorConfig {
                rows: 2,
                cols: 2,
                pattern: Pattern::IndexSum,
                ..Default::default()
            }),
        );

        let mut vectors = BTreeMap::new();
        vectors.insert("x".to_string(), vec![1.0, 2.0, 3.0]);

        let steps = vec![
            Step::Multiply {
                name: "AB".into(),
                lhs: "A".into(),
                rhs: "B".into(),
            },
            Step::Multiply {
                name: "Ax".into(),
                lhs: "A".into(),
                rhs: "x".into(),
            },
            Step::Determinant {
                name: "det_C".into(),
                operand: "C".into(),
            },
        ];

        Self {
            matrices,
            vectors,
            steps,
        }
    }
}
