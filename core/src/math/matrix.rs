use std::fmt;
use std::ops::Index;

use log::trace;

use crate::math::vector::{self, Vector};
use crate::prelude::{LinalgError, LinalgResult};

/// Dense matrix stored as a sequence of row vectors.
///
/// Matrices are values: the free functions in this module always return a
/// fresh matrix. The single exception is [`Matrix::swap_in_place`] (and
/// [`Matrix::sort_rows_in_place`], which is built on it). Those mutate
/// without any internal synchronization, so an instance shared between
/// threads must be locked by the caller while it is being swapped.
///
/// [`Matrix::from_rows`] accepts ragged rows as given; any operation that
/// reads the dimensions rejects them with [`LinalgError::InconsistentRows`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Matrix {
    rows: Vec<Vector>,
}

impl Matrix {
    pub fn from_rows(rows: Vec<Vector>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vector] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Vector> {
        self.rows.get(index)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copies column `col` out as a vector.
    pub fn column(&self, col: usize) -> LinalgResult<Vector> {
        let (m, n) = dimensions(self)?;
        check_index(col, n)?;
        Ok(Vector::from_fn(m, |i| self.rows[i][col]))
    }

    /// Compares rows `i` and `j` with [`vector::less`].
    pub fn less(&self, i: usize, j: usize) -> LinalgResult<bool> {
        check_index(i, self.len())?;
        check_index(j, self.len())?;
        vector::less(&self.rows[i], &self.rows[j])
    }

    /// Exchanges rows `i` and `j` of this matrix in place.
    ///
    /// This is the only operation that mutates an existing matrix. Use
    /// [`swap_rows`] for a value-returning swap.
    pub fn swap_in_place(&mut self, i: usize, j: usize) -> LinalgResult<()> {
        check_index(i, self.len())?;
        check_index(j, self.len())?;
        self.rows.swap(i, j);
        Ok(())
    }

    /// Insertion sort of the rows driven by [`Matrix::less`].
    ///
    /// `less` is strict componentwise dominance, a partial order. Each row is
    /// moved in front of the first earlier row it is less than, scanning past
    /// rows it cannot be compared with; rows that are never moved keep their
    /// relative order.
    pub fn sort_rows_in_place(&mut self) -> LinalgResult<()> {
        dimensions(self)?;
        for i in 1..self.len() {
            let mut target = None;
            for k in 0..i {
                if self.less(i, k)? {
                    target = Some(k);
                    break;
                }
            }
            if let Some(k) = target {
                for j in (k + 1..=i).rev() {
                    self.swap_in_place(j, j - 1)?;
                }
            }
        }
        Ok(())
    }
}

impl From<Vec<Vec<f64>>> for Matrix {
    fn from(value: Vec<Vec<f64>>) -> Self {
        Matrix::from_rows(value.into_iter().map(Vector::from_vec).collect())
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.rows[index.0][index.1]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", row)?;
        }
        f.write_str("]")
    }
}

fn check_index(index: usize, len: usize) -> LinalgResult<()> {
    if index >= len {
        return Err(LinalgError::IndexOutOfRange { index, len });
    }
    Ok(())
}

fn ensure_same_shape(op: &str, a: &Matrix, b: &Matrix) -> LinalgResult<(usize, usize)> {
    let (ma, na) = dimensions(a)?;
    let (mb, nb) = dimensions(b)?;
    if ma != mb || na != nb {
        return Err(LinalgError::DimensionMismatch(format!(
            "{} requires equal shapes, got {}x{} and {}x{}",
            op, ma, na, mb, nb
        )));
    }
    Ok((ma, na))
}

/// Builds an `m`-by-`n` matrix whose entry `(i, j)` is `f(i, j)`.
pub fn make_matrix<F>(m: usize, n: usize, mut f: F) -> LinalgResult<Matrix>
where
    F: FnMut(usize, usize) -> f64,
{
    if m < 1 || n < 1 {
        return Err(LinalgError::InvalidDimensions { rows: m, cols: n });
    }
    let rows = (0..m)
        .map(|i| Vector::from_fn(n, |j| f(i, j)))
        .collect();
    Ok(Matrix::from_rows(rows))
}

pub fn zeros(m: usize, n: usize) -> LinalgResult<Matrix> {
    make_matrix(m, n, |_, _| 0.0)
}

/// Ones on the main diagonal, zeros elsewhere. `m` and `n` may differ.
pub fn identity(m: usize, n: usize) -> LinalgResult<Matrix> {
    make_matrix(m, n, |i, j| if i == j { 1.0 } else { 0.0 })
}

/// Deep copy of a well-formed matrix.
pub fn copy(a: &Matrix) -> LinalgResult<Matrix> {
    let (m, n) = dimensions(a)?;
    make_matrix(m, n, |i, j| a[(i, j)])
}

/// Returns `(rows, columns)`.
///
/// Fails with [`LinalgError::EmptyMatrix`] when either count is zero and
/// with [`LinalgError::InconsistentRows`] when the rows differ in length.
pub fn dimensions(a: &Matrix) -> LinalgResult<(usize, usize)> {
    let first = a.rows.first().ok_or(LinalgError::EmptyMatrix)?;
    let n = first.len();
    if let Some((row, found)) = a
        .rows
        .iter()
        .map(Vector::len)
        .enumerate()
        .find(|&(_, len)| len != n)
    {
        return Err(LinalgError::InconsistentRows {
            row,
            expected: n,
            found,
        });
    }
    if n == 0 {
        return Err(LinalgError::EmptyMatrix);
    }
    Ok((a.rows.len(), n))
}

pub fn add(a: &Matrix, b: &Matrix) -> LinalgResult<Matrix> {
    ensure_same_shape("add", a, b)?;
    let rows = a
        .rows
        .iter()
        .zip(b.rows.iter())
        .map(|(u, v)| vector::add(u, v))
        .collect::<LinalgResult<Vec<_>>>()?;
    Ok(Matrix::from_rows(rows))
}

pub fn subtract(a: &Matrix, b: &Matrix) -> LinalgResult<Matrix> {
    ensure_same_shape("subtract", a, b)?;
    let rows = a
        .rows
        .iter()
        .zip(b.rows.iter())
        .map(|(u, v)| vector::subtract(u, v))
        .collect::<LinalgResult<Vec<_>>>()?;
    Ok(Matrix::from_rows(rows))
}

pub fn scalar_multiply(s: f64, a: &Matrix) -> LinalgResult<Matrix> {
    dimensions(a)?;
    Ok(Matrix::from_rows(
        a.rows.iter().map(|row| vector::scalar_multiply(s, row)).collect(),
    ))
}

pub fn transpose(a: &Matrix) -> LinalgResult<Matrix> {
    let (m, n) = dimensions(a)?;
    make_matrix(n, m, |i, j| a[(j, i)])
}

/// Matrix product `a * b`. To multiply by a vector, wrap it with
/// [`column_matrix`] first.
pub fn multiply(a: &Matrix, b: &Matrix) -> LinalgResult<Matrix> {
    let (ma, na) = dimensions(a)?;
    let (mb, nb) = dimensions(b)?;
    if na != mb {
        return Err(LinalgError::IncompatibleDimensions {
            lhs_cols: na,
            rhs_rows: mb,
        });
    }
    trace!("multiply {}x{} by {}x{}", ma, na, mb, nb);

    let columns: Vec<Vector> = (0..nb)
        .map(|j| Vector::from_fn(mb, |i| b[(i, j)]))
        .collect();
    let mut rows = Vec::with_capacity(ma);
    for row in &a.rows {
        let cells = columns
            .iter()
            .map(|col| vector::dot(row, col))
            .collect::<LinalgResult<Vector>>()?;
        rows.push(cells);
    }
    Ok(Matrix::from_rows(rows))
}

/// Determinant of a non-empty square matrix.
///
/// 1x1 and 2x2 use the closed forms. Larger matrices are reduced to upper
/// triangular form by Gaussian elimination with partial pivoting; the result
/// is the signed product of the pivots.
pub fn determinant(a: &Matrix) -> LinalgResult<f64> {
    let (m, n) = dimensions(a)?;
    if m != n {
        return Err(LinalgError::NonSquareMatrix { rows: m, cols: n });
    }

    match n {
        1 => Ok(a[(0, 0)]),
        2 => Ok(a[(0, 0)] * a[(1, 1)] - a[(0, 1)] * a[(1, 0)]),
        _ => {
            trace!("determinant of {}x{} via LU elimination", n, n);
            Ok(lu_determinant(a.rows.iter().map(Vector::to_vec).collect()))
        }
    }
}

fn lu_determinant(mut lu: Vec<Vec<f64>>) -> f64 {
    let n = lu.len();
    let mut det = 1.0;

    for k in 0..n {
        let pivot_row = (k..n)
            .max_by(|&r, &s| lu[r][k].abs().total_cmp(&lu[s][k].abs()))
            .unwrap_or(k);
        if lu[pivot_row][k] == 0.0 {
            return 0.0;
        }
        if pivot_row != k {
            lu.swap(pivot_row, k);
            det = -det;
        }

        let pivot = lu[k][k];
        det *= pivot;
        for r in (k + 1)..n {
            let factor = lu[r][k] / pivot;
            if factor == 0.0 {
                continue;
            }
            for c in k..n {
                lu[r][c] -= factor * lu[k][c];
            }
        }
    }
    det
}

/// Wraps `v` as a 1-by-n matrix.
pub fn row_matrix(v: &Vector) -> LinalgResult<Matrix> {
    make_matrix(1, v.len(), |_, j| v[j])
}

/// Wraps `v` as an n-by-1 matrix.
pub fn column_matrix(v: &Vector) -> LinalgResult<Matrix> {
    make_matrix(v.len(), 1, |i, _| v[i])
}

/// Places `b` to the right of `a`.
pub fn join(a: &Matrix, b: &Matrix) -> LinalgResult<Matrix> {
    let (ma, na) = dimensions(a)?;
    let (mb, nb) = dimensions(b)?;
    if ma != mb {
        return Err(LinalgError::RowCountMismatch {
            left: ma,
            right: mb,
        });
    }
    make_matrix(ma, na + nb, |i, j| {
        if j < na {
            a[(i, j)]
        } else {
            b[(i, j - na)]
        }
    })
}

pub fn append_column(a: &Matrix, x: &Vector) -> LinalgResult<Matrix> {
    let (m, _) = dimensions(a)?;
    if x.len() != m {
        return Err(LinalgError::RowCountMismatch {
            left: m,
            right: x.len(),
        });
    }
    join(a, &column_matrix(x)?)
}

pub fn append_row(a: &Matrix, x: &Vector) -> LinalgResult<Matrix> {
    let (m, n) = dimensions(a)?;
    if x.len() != n {
        return Err(LinalgError::DimensionMismatch(format!(
            "append_row requires {} entries, got {}",
            n,
            x.len()
        )));
    }
    make_matrix(m + 1, n, |i, j| if i < m { a[(i, j)] } else { x[j] })
}

/// Embeds `a` in the top-left corner of a new `m`-by-`n` matrix.
///
/// Cells outside `a` are zero. When the new shape is smaller than `a`, only
/// the overlapping region is kept; truncation is not an error.
pub fn set_dims(a: &Matrix, m: usize, n: usize) -> LinalgResult<Matrix> {
    let (ma, na) = dimensions(a)?;
    make_matrix(m, n, |i, j| if i < ma && j < na { a[(i, j)] } else { 0.0 })
}

/// Returns a copy of `a` with rows `i` and `j` exchanged.
pub fn swap_rows(a: &Matrix, i: usize, j: usize) -> LinalgResult<Matrix> {
    let (m, n) = dimensions(a)?;
    check_index(i, m)?;
    check_index(j, m)?;
    make_matrix(m, n, |r, c| {
        let source = if r == i {
            j
        } else if r == j {
            i
        } else {
            r
        };
        a[(source, c)]
    })
}

/// Returns a copy of `a` with columns `i` and `j` exchanged.
pub fn swap_cols(a: &Matrix, i: usize, j: usize) -> LinalgResult<Matrix> {
    let (m, n) = dimensions(a)?;
    check_index(i, n)?;
    check_index(j, n)?;
    make_matrix(m, n, |r, c| {
        let source = if c == i {
            j
        } else if c == j {
            i
        } else {
            c
        };
        a[(r, source)]
    })
}

/// Lie bracket `[a, b] = ab - ba` of two square matrices.
pub fn bracket(a: &Matrix, b: &Matrix) -> LinalgResult<Matrix> {
    for operand in [a, b] {
        let (m, n) = dimensions(operand)?;
        if m != n {
            return Err(LinalgError::NonSquareMatrix { rows: m, cols: n });
        }
    }
    subtract(&multiply(a, b)?, &multiply(b, a)?)
}

/// True when both matrices share a shape and every row is equal.
pub fn equals(a: &Matrix, b: &Matrix) -> LinalgResult<bool> {
    let (ma, na) = dimensions(a)?;
    let (mb, nb) = dimensions(b)?;
    if ma != mb || na != nb {
        return Ok(false);
    }
    for (u, v) in a.rows.iter().zip(b.rows.iter()) {
        if !vector::equal(u, v)? {
            return Ok(false);
        }
    }
    Ok(true)
}
