use crate::generator::profile::build_matrix;
use crate::workflow::config::{MatrixSource, Step, WorksheetConfig};
use anyhow::{anyhow, bail, Context};
use linalgcore::math::matrix::{self, Matrix};
use linalgcore::math::vector::{self, Vector};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Anything a worksheet name can be bound to.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(f64),
    Flag(bool),
    Vector(Vector),
    Matrix(Matrix),
}

impl Value {
    fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Flag(_) => "flag",
            Value::Vector(_) => "vector",
            Value::Matrix(_) => "matrix",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(x) => write!(f, "{:.3}", x),
            Value::Flag(b) => write!(f, "{}", b),
            Value::Vector(v) => write!(f, "{}", v),
            Value::Matrix(m) => write!(f, "{}", m),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct StepOutcome {
    pub name: String,
    pub kind: &'static str,
    pub rendered: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct WorksheetResult {
    pub inputs: Vec<StepOutcome>,
    pub outcomes: Vec<StepOutcome>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorksheetConfig,
}

impl Runner {
    pub fn new(config: WorksheetConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorksheetResult> {
        let mut env = self.bind_inputs()?;
        let mut result = WorksheetResult {
            inputs: env
                .iter()
                .map(|(name, value)| StepOutcome {
                    name: name.clone(),
                    kind: value.kind(),
                    rendered: value.to_string(),
                })
                .collect(),
            ..Default::default()
        };

        for (index, step) in self.config.steps.iter().enumerate() {
            let context = || format!("step {} ({})", index, step.name());
            if env.contains_key(step.name()) {
                return Err(anyhow!("{} is already bound", step.name()).context(context()));
            }
            let value = evaluate(step, &env).with_context(context)?;
            debug!("{} = {}", step.name(), value);
            result.outcomes.push(StepOutcome {
                name: step.name().to_string(),
                kind: value.kind(),
                rendered: value.to_string(),
            });
            env.insert(step.name().to_string(), value);
        }

        info!(
            "worksheet finished: {} inputs, {} steps",
            self.config.matrices.len() + self.config.vectors.len(),
            result.outcomes.len()
        );
        Ok(result)
    }

    fn bind_inputs(&self) -> anyhow::Result<BTreeMap<String, Value>> {
        let mut env = BTreeMap::new();
        for (name, source) in &self.config.matrices {
            let value = match source {
                MatrixSource::Literal(rows) => {
                    let candidate = Matrix::from(rows.clone());
                    matrix::dimensions(&candidate)
                        .with_context(|| format!("matrix {}", name))?;
                    candidate
                }
                MatrixSource::Generated(generator) => {
                    build_matrix(generator).with_context(|| format!("matrix {}", name))?
                }
            };
            env.insert(name.clone(), Value::Matrix(value));
        }
        for (name, entries) in &self.config.vectors {
            if env.contains_key(name) {
                bail!("{} is defined as both a matrix and a vector", name);
            }
            env.insert(name.clone(), Value::Vector(Vector::from_vec(entries.clone())));
        }
        Ok(env)
    }
}

fn lookup<'a>(env: &'a BTreeMap<String, Value>, name: &str) -> anyhow::Result<&'a Value> {
    env.get(name).ok_or_else(|| anyhow!("unknown operand {}", name))
}

fn as_vector<'a>(env: &'a BTreeMap<String, Value>, name: &str) -> anyhow::Result<&'a Vector> {
    match lookup(env, name)? {
        Value::Vector(v) => Ok(v),
        other => bail!("{} is a {}, expected a vector", name, other.kind()),
    }
}

fn as_matrix<'a>(env: &'a BTreeMap<String, Value>, name: &str) -> anyhow::Result<&'a Matrix> {
    match lookup(env, name)? {
        Value::Matrix(m) => Ok(m),
        other => bail!("{} is a {}, expected a matrix", name, other.kind()),
    }
}

fn evaluate(step: &Step, env: &BTreeMap<String, Value>) -> anyhow::Result<Value> {
    let value = match step {
        Step::Add { lhs, rhs, .. } => match (lookup(env, lhs)?, lookup(env, rhs)?) {
            (Value::Vector(u), Value::Vector(v)) => Value::Vector(vector::add(u, v)?),
            (Value::Matrix(a), Value::Matrix(b)) => Value::Matrix(matrix::add(a, b)?),
            (l, r) => bail!("cannot add {} and {}", l.kind(), r.kind()),
        },
        Step::Subtract { lhs, rhs, .. } => match (lookup(env, lhs)?, lookup(env, rhs)?) {
            (Value::Vector(u), Value::Vector(v)) => Value::Vector(vector::subtract(u, v)?),
            (Value::Matrix(a), Value::Matrix(b)) => Value::Matrix(matrix::subtract(a, b)?),
            (l, r) => bail!("cannot subtract {} from {}", r.kind(), l.kind()),
        },
        Step::Multiply { lhs, rhs, .. } => match (lookup(env, lhs)?, lookup(env, rhs)?) {
            (Value::Vector(u), Value::Vector(v)) => Value::Vector(vector::multiply(u, v)?),
            (Value::Matrix(a), Value::Matrix(b)) => Value::Matrix(matrix::multiply(a, b)?),
            (Value::Matrix(a), Value::Vector(x)) => {
                Value::Matrix(matrix::multiply(a, &matrix::column_matrix(x)?)?)
            }
            (Value::Vector(x), Value::Matrix(b)) => {
                Value::Matrix(matrix::multiply(&matrix::row_matrix(x)?, b)?)
            }
            (l, r) => bail!("cannot multiply {} by {}", l.kind(), r.kind()),
        },
        Step::ScalarMultiply {
            scalar, operand, ..
        } => match lookup(env, operand)? {
            Value::Scalar(x) => Value::Scalar(scalar * x),
            Value::Vector(v) => Value::Vector(vector::scalar_multiply(*scalar, v)),
            Value::Matrix(a) => Value::Matrix(matrix::scalar_multiply(*scalar, a)?),
            other => bail!("cannot scale a {}", other.kind()),
        },
        Step::Dot { lhs, rhs, .. } => {
            Value::Scalar(vector::dot(as_vector(env, lhs)?, as_vector(env, rhs)?)?)
        }
        Step::Cross { lhs, rhs, .. } => {
            Value::Vector(vector::cross(as_vector(env, lhs)?, as_vector(env, rhs)?)?)
        }
        Step::Proj { lhs, rhs, .. } => {
            Value::Vector(vector::proj(as_vector(env, lhs)?, as_vector(env, rhs)?)?)
        }
        Step::AngleR { lhs, rhs, .. } => {
            Value::Scalar(vector::angle_r(as_vector(env, lhs)?, as_vector(env, rhs)?)?)
        }
        Step::Less { lhs, rhs, .. } => {
            Value::Flag(vector::less(as_vector(env, lhs)?, as_vector(env, rhs)?)?)
        }
        Step::Equal { lhs, rhs, .. } => match (lookup(env, lhs)?, lookup(env, rhs)?) {
            (Value::Vector(u), Value::Vector(v)) => Value::Flag(vector::equal(u, v)?),
            (Value::Matrix(a), Value::Matrix(b)) => Value::Flag(matrix::equals(a, b)?),
            (l, r) => bail!("cannot compare {} with {}", l.kind(), r.kind()),
        },
        Step::Sum { operand, .. } => Value::Scalar(vector::sum(as_vector(env, operand)?)),
        Step::Mean { operand, .. } => Value::Scalar(vector::mean(as_vector(env, operand)?)?),
        Step::Length { operand, .. } => Value::Scalar(vector::length(as_vector(env, operand)?)),
        Step::Unit { operand, .. } => Value::Vector(vector::unit(as_vector(env, operand)?)?),
        Step::Transpose { operand, .. } => {
            Value::Matrix(matrix::transpose(as_matrix(env, operand)?)?)
        }
        Step::Determinant { operand, .. } => {
            Value::Scalar(matrix::determinant(as_matrix(env, operand)?)?)
        }
        Step::Bracket { lhs, rhs, .. } => {
            Value::Matrix(matrix::bracket(as_matrix(env, lhs)?, as_matrix(env, rhs)?)?)
        }
        Step::Join { lhs, rhs, .. } => {
            Value::Matrix(matrix::join(as_matrix(env, lhs)?, as_matrix(env, rhs)?)?)
        }
        Step::AppendRow {
            matrix: a, vector: x, ..
        } => Value::Matrix(matrix::append_row(as_matrix(env, a)?, as_vector(env, x)?)?),
        Step::AppendColumn {
            matrix: a, vector: x, ..
        } => Value::Matrix(matrix::append_column(
            as_matrix(env, a)?,
            as_vector(env, x)?,
        )?),
        Step::SetDims {
            operand, rows, cols, ..
        } => Value::Matrix(matrix::set_dims(as_matrix(env, operand)?, *rows, *cols)?),
        Step::SwapRows { operand, i, j, .. } => {
            Value::Matrix(matrix::swap_rows(as_matrix(env, operand)?, *i, *j)?)
        }
        Step::SwapCols { operand, i, j, .. } => {
            Value::Matrix(matrix::swap_cols(as_matrix(env, operand)?, *i, *j)?)
        }
        Step::SortRows { operand, .. } => {
            let mut sorted = as_matrix(env, operand)?.clone();
            sorted.sort_rows_in_place()?;
            Value::Matrix(sorted)
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use linalgcore::LinalgError;

    fn worksheet(yaml: &str) -> WorksheetConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn runner_executes_demo_worksheet() {
        let result = Runner::new(WorksheetConfig::demo()).execute().unwrap();
        let rendered: Vec<_> = result
            .outcomes
            .iter()
            .map(|o| (o.name.as_str(), o.rendered.as_str()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("AB", "[[14.000],[20.000]]"),
                ("Ax", "[[14.000],[20.000]]"),
                ("det_C", "-1.000"),
            ]
        );
        let inputs: Vec<_> = result
            .inputs
            .iter()
            .map(|o| (o.name.as_str(), o.rendered.as_str()))
            .collect();
        assert_eq!(
            inputs,
            vec![
                ("A", "[[1.000,2.000,3.000],[2.000,3.000,4.000]]"),
                ("B", "[[1.000],[2.000],[3.000]]"),
                ("C", "[[0.000,1.000],[1.000,2.000]]"),
                ("x", "[1.000,2.000,3.000]"),
            ]
        );
    }

    #[test]
    fn step_cannot_rebind_an_existing_name() {
        let cfg = worksheet(
            r#"
matrices:
  A: [[1, 2], [3, 4]]
steps:
  - { op: transpose, name: T, operand: A }
  - { op: transpose, name: A, operand: T }
"#,
        );
        let err = Runner::new(cfg).execute().unwrap_err();
        assert_eq!(err.to_string(), "step 1 (A)");
        assert!(format!("{:#}", err).contains("A is already bound"));

        let cfg = worksheet(
            r#"
vectors:
  v: [1, 2]
steps:
  - { op: sum, name: s, operand: v }
  - { op: mean, name: s, operand: v }
"#,
        );
        assert!(Runner::new(cfg).execute().is_err());
    }

    #[test]
    fn steps_can_use_earlier_results() {
        let cfg = worksheet(
            r#"
matrices:
  A: [[1, 2], [3, 4]]
  B: [[5, 6], [7, 8]]
vectors:
  u: [1, 0, 0]
  v: [0, 1, 0]
steps:
  - { op: multiply, name: AB, lhs: A, rhs: B }
  - { op: determinant, name: det, operand: AB }
  - { op: cross, name: w, lhs: u, rhs: v }
  - { op: dot, name: d, lhs: w, rhs: w }
  - { op: equal, name: same, lhs: A, rhs: A }
  - { op: set_dims, name: big, operand: A, rows: 3, cols: 3 }
"#,
        );
        let result = Runner::new(cfg).execute().unwrap();
        assert_eq!(result.outcomes[0].rendered, "[[19.000,22.000],[43.000,50.000]]");
        assert_eq!(result.outcomes[1].rendered, "4.000");
        assert_eq!(result.outcomes[2].rendered, "[0.000,0.000,1.000]");
        assert_eq!(result.outcomes[3].kind, "scalar");
        assert_eq!(result.outcomes[4].rendered, "true");
        assert_eq!(
            result.outcomes[5].rendered,
            "[[1.000,2.000,0.000],[3.000,4.000,0.000],[0.000,0.000,0.000]]"
        );
    }

    #[test]
    fn failing_step_names_the_step_and_keeps_core_error() {
        let cfg = worksheet(
            r#"
vectors:
  a: [1, 2]
  b: [1, 2, 3]
steps:
  - { op: add, name: c, lhs: a, rhs: b }
"#,
        );
        let err = Runner::new(cfg).execute().unwrap_err();
        assert_eq!(err.to_string(), "step 0 (c)");
        assert!(matches!(
            err.root_cause().downcast_ref::<LinalgError>(),
            Some(LinalgError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn ragged_literal_matrix_is_rejected() {
        let cfg = worksheet("matrices:\n  R: [[1, 2], [3]]\n");
        let err = Runner::new(cfg).execute().unwrap_err();
        assert_eq!(err.to_string(), "matrix R");
    }

    #[test]
    fn operand_kinds_are_checked() {
        let cfg = worksheet(
            r#"
matrices:
  A: [[1, 2], [3, 4]]
steps:
  - { op: dot, name: d, lhs: A, rhs: A }
"#,
        );
        let err = Runner::new(cfg).execute().unwrap_err();
        assert!(format!("{:#}", err).contains("A is a matrix, expected a vector"));
    }

    #[test]
    fn sort_rows_leaves_input_untouched() {
        let cfg = worksheet(
            r#"
matrices:
  M: [[5, 6], [1, 2]]
steps:
  - { op: sort_rows, name: S, operand: M }
  - { op: transpose, name: T, operand: M }
"#,
        );
        let result = Runner::new(cfg).execute().unwrap();
        assert_eq!(result.outcomes[0].rendered, "[[1.000,2.000],[5.000,6.000]]");
        assert_eq!(result.outcomes[1].rendered, "[[5.000,1.000],[6.000,2.000]]");
    }
}
