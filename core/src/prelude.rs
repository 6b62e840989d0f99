/// Common error type for vector and matrix operations.
///
/// Every operation validates its operands before building a result, so an
/// error never leaves a partially computed value behind.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    #[error("invalid dimensions {rows}x{cols}: rows and columns must be positive")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),
    #[error("incompatible dimensions: {lhs_cols} columns cannot multiply {rhs_rows} rows")]
    IncompatibleDimensions { lhs_cols: usize, rhs_rows: usize },
    #[error("inconsistent rows: row {row} has {found} entries, expected {expected}")]
    InconsistentRows {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("non-square matrix: {rows}x{cols}")]
    NonSquareMatrix { rows: usize, cols: usize },
    #[error("empty matrix")]
    EmptyMatrix,
    #[error("zero vector cannot be normalized")]
    ZeroVector,
    #[error("empty vector")]
    EmptyVector,
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("row count mismatch: {left} rows against {right}")]
    RowCountMismatch { left: usize, right: usize },
}

pub type LinalgResult<T> = Result<T, LinalgError>;

/// Returns `DimensionMismatch` unless both operands have `left == right` entries.
pub(crate) fn ensure_same_len(op: &str, left: usize, right: usize) -> LinalgResult<()> {
    if left != right {
        return Err(LinalgError::DimensionMismatch(format!(
            "{} requires equal lengths, got {} and {}",
            op, left, right
        )));
    }
    Ok(())
}
