use std::fmt;
use std::iter::FromIterator;
use std::ops::Index;
use std::slice::Iter;

use crate::math::stats::StatsHelper;
use crate::prelude::{ensure_same_len, LinalgError, LinalgResult};

/// Fixed-length sequence of `f64` entries.
///
/// Vectors are plain values: every function in this module returns a new
/// vector and leaves its operands untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vector {
    entries: Vec<f64>,
}

impl Vector {
    pub fn new(entries: Vec<f64>) -> Self {
        Self { entries }
    }

    pub fn from_vec(entries: Vec<f64>) -> Self {
        Self::new(entries)
    }

    pub fn zeros(len: usize) -> Self {
        Self::new(vec![0.0; len])
    }

    /// Builds a vector whose entry `i` is `f(i)`.
    pub fn from_fn<F>(len: usize, f: F) -> Self
    where
        F: FnMut(usize) -> f64,
    {
        (0..len).map(f).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, f64> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.entries
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.entries.clone()
    }
}

impl From<Vec<f64>> for Vector {
    fn from(value: Vec<f64>) -> Self {
        Vector::from_vec(value)
    }
}

impl From<Vector> for Vec<f64> {
    fn from(value: Vector) -> Self {
        value.entries
    }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Vector::from_vec(iter.into_iter().collect())
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{:.3}", value)?;
        }
        f.write_str("]")
    }
}

fn zip_with<F>(op: &str, u: &Vector, v: &Vector, f: F) -> LinalgResult<Vector>
where
    F: Fn(f64, f64) -> f64,
{
    ensure_same_len(op, u.len(), v.len())?;
    Ok(u.iter().zip(v.iter()).map(|(&a, &b)| f(a, b)).collect())
}

/// Returns `u + v`.
pub fn add(u: &Vector, v: &Vector) -> LinalgResult<Vector> {
    zip_with("add", u, v, |a, b| a + b)
}

/// Returns `u - v`, computed as `u + (-1)v`.
pub fn subtract(u: &Vector, v: &Vector) -> LinalgResult<Vector> {
    ensure_same_len("subtract", u.len(), v.len())?;
    add(u, &scalar_multiply(-1.0, v))
}

/// Entrywise product.
pub fn multiply(u: &Vector, v: &Vector) -> LinalgResult<Vector> {
    zip_with("multiply", u, v, |a, b| a * b)
}

/// Returns `a * u`. Any scalar is accepted, zero included.
pub fn scalar_multiply(a: f64, u: &Vector) -> Vector {
    u.iter().map(|&x| a * x).collect()
}

pub fn sum(v: &Vector) -> f64 {
    StatsHelper::sum(v.as_slice())
}

pub fn dot(u: &Vector, v: &Vector) -> LinalgResult<f64> {
    ensure_same_len("dot", u.len(), v.len())?;
    Ok(u.iter().zip(v.iter()).map(|(a, b)| a * b).sum())
}

/// Right-handed cross product of two 3-dimensional vectors.
pub fn cross(u: &Vector, v: &Vector) -> LinalgResult<Vector> {
    if u.len() != 3 || v.len() != 3 {
        return Err(LinalgError::DimensionMismatch(format!(
            "cross requires two 3-dimensional vectors, got {} and {}",
            u.len(),
            v.len()
        )));
    }
    Ok(Vector::new(vec![
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ]))
}

pub fn mean(v: &Vector) -> LinalgResult<f64> {
    if v.is_empty() {
        return Err(LinalgError::EmptyVector);
    }
    Ok(sum(v) / v.len() as f64)
}

pub fn max(v: &Vector) -> LinalgResult<f64> {
    StatsHelper::max(v.as_slice()).ok_or(LinalgError::EmptyVector)
}

pub fn min(v: &Vector) -> LinalgResult<f64> {
    StatsHelper::min(v.as_slice()).ok_or(LinalgError::EmptyVector)
}

/// Euclidean norm. This is the geometric length, not the number of entries;
/// use [`Vector::len`] for that.
pub fn length(v: &Vector) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Unit vector parallel to `v`.
pub fn unit(v: &Vector) -> LinalgResult<Vector> {
    let norm = length(v);
    if norm == 0.0 {
        return Err(LinalgError::ZeroVector);
    }
    Ok(v.iter().map(|&x| x / norm).collect())
}

/// Cosine of the angle between `u` and `v`.
///
/// Despite the name this is `dot(unit(u), unit(v))`, not the angle in
/// radians. Apply `acos` to the result to get the angle itself.
pub fn angle_r(u: &Vector, v: &Vector) -> LinalgResult<f64> {
    ensure_same_len("angle_r", u.len(), v.len())?;
    dot(&unit(u)?, &unit(v)?)
}

/// Component of `u` parallel to the non-zero vector `v`.
pub fn proj(u: &Vector, v: &Vector) -> LinalgResult<Vector> {
    ensure_same_len("proj", u.len(), v.len())?;
    let direction = unit(v)?;
    let magnitude = dot(u, &direction)?;
    Ok(scalar_multiply(magnitude, &direction))
}

/// Componentwise strict dominance: every entry of `u` is below the matching
/// entry of `v`. Two empty vectors are not less than each other.
pub fn less(u: &Vector, v: &Vector) -> LinalgResult<bool> {
    ensure_same_len("less", u.len(), v.len())?;
    if u.is_empty() {
        return Ok(false);
    }
    Ok(u.iter().zip(v.iter()).all(|(a, b)| a < b))
}

/// Entrywise equality. Two empty vectors are equal.
pub fn equal(u: &Vector, v: &Vector) -> LinalgResult<bool> {
    ensure_same_len("equal", u.len(), v.len())?;
    Ok(u.iter().zip(v.iter()).all(|(a, b)| a == b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn v(entries: &[f64]) -> Vector {
        Vector::from_vec(entries.to_vec())
    }

    fn random_vector(rng: &mut StdRng, len: usize) -> Vector {
        Vector::from_fn(len, |_| rng.gen_range(-10.0..10.0))
    }

    #[test]
    fn add_and_subtract_are_entrywise() {
        let u = v(&[1.0, 2.0, 3.0]);
        let w = v(&[4.0, 5.0, 6.0]);
        assert_eq!(add(&u, &w).unwrap().to_vec(), vec![5.0, 7.0, 9.0]);
        assert_eq!(subtract(&w, &u).unwrap().to_vec(), vec![3.0, 3.0, 3.0]);
        assert_eq!(multiply(&u, &w).unwrap().to_vec(), vec![4.0, 10.0, 18.0]);
    }

    #[test]
    fn add_rejects_mismatched_lengths() {
        let err = add(&v(&[1.0, 2.0]), &v(&[1.0, 2.0, 3.0])).unwrap_err();
        assert!(matches!(err, LinalgError::DimensionMismatch(_)));
        assert!(subtract(&v(&[1.0]), &v(&[])).is_err());
        assert!(multiply(&v(&[1.0]), &v(&[1.0, 2.0])).is_err());
        assert!(dot(&v(&[1.0]), &v(&[1.0, 2.0])).is_err());
    }

    #[test]
    fn additive_identities_hold_for_random_vectors() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 1..6 {
            let u = random_vector(&mut rng, len);
            let w = random_vector(&mut rng, len);
            let sum_uw = add(&u, &w).unwrap();
            let back = add(&u, &subtract(&sum_uw, &u).unwrap()).unwrap();
            let minus = subtract(&u, &w).unwrap();
            let via_scalar = add(&u, &scalar_multiply(-1.0, &w)).unwrap();
            for i in 0..len {
                assert_relative_eq!(back[i], sum_uw[i], epsilon = 1e-12);
                assert_relative_eq!(sum_uw[i], add(&w, &u).unwrap()[i]);
                assert_relative_eq!(minus[i], via_scalar[i]);
            }
            assert_relative_eq!(dot(&u, &w).unwrap(), dot(&w, &u).unwrap());
        }
    }

    #[test]
    fn scalar_multiply_accepts_zero() {
        let scaled = scalar_multiply(0.0, &v(&[1.0, -2.0]));
        assert!(scaled.iter().all(|&x| x == 0.0));
        assert_eq!(scalar_multiply(2.5, &v(&[2.0])).to_vec(), vec![5.0]);
    }

    #[test]
    fn dot_of_reference_vectors() {
        assert_eq!(dot(&v(&[1.0, 2.0, 3.0]), &v(&[4.0, 5.0, 6.0])).unwrap(), 32.0);
        assert_eq!(dot(&v(&[]), &v(&[])).unwrap(), 0.0);
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let e1 = v(&[1.0, 0.0, 0.0]);
        let e2 = v(&[0.0, 1.0, 0.0]);
        assert_eq!(cross(&e1, &e2).unwrap().to_vec(), vec![0.0, 0.0, 1.0]);
        assert_eq!(cross(&e2, &e1).unwrap().to_vec(), vec![0.0, 0.0, -1.0]);
    }

    #[test]
    fn cross_requires_three_dimensions() {
        let err = cross(&v(&[1.0, 0.0]), &v(&[0.0, 1.0])).unwrap_err();
        assert!(matches!(err, LinalgError::DimensionMismatch(_)));
    }

    #[test]
    fn sum_mean_and_extremes() {
        let data = v(&[2.0, 4.0, 9.0]);
        assert_eq!(sum(&data), 15.0);
        assert_eq!(mean(&data).unwrap(), 5.0);
        assert_eq!(max(&data).unwrap(), 9.0);
        assert_eq!(min(&data).unwrap(), 2.0);
        assert_eq!(sum(&Vector::default()), 0.0);
    }

    #[test]
    fn mean_of_empty_vector_fails() {
        assert_eq!(mean(&Vector::default()), Err(LinalgError::EmptyVector));
        assert_eq!(max(&Vector::default()), Err(LinalgError::EmptyVector));
    }

    #[test]
    fn unit_vectors_have_length_one() {
        let mut rng = StdRng::seed_from_u64(11);
        for len in 1..8 {
            let w = random_vector(&mut rng, len);
            assert_abs_diff_eq!(length(&unit(&w).unwrap()), 1.0, epsilon = 1e-9);
        }
        assert_eq!(length(&v(&[3.0, 4.0])), 5.0);
    }

    #[test]
    fn unit_of_zero_vector_fails() {
        assert_eq!(unit(&Vector::zeros(3)), Err(LinalgError::ZeroVector));
        assert_eq!(
            proj(&v(&[1.0, 2.0]), &Vector::zeros(2)),
            Err(LinalgError::ZeroVector)
        );
    }

    #[test]
    fn angle_r_returns_cosine() {
        let cos = angle_r(&v(&[1.0, 0.0]), &v(&[1.0, 1.0])).unwrap();
        assert_relative_eq!(cos, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_abs_diff_eq!(
            angle_r(&v(&[1.0, 0.0]), &v(&[0.0, 2.0])).unwrap(),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn proj_keeps_parallel_component() {
        let p = proj(&v(&[3.0, 4.0]), &v(&[2.0, 0.0])).unwrap();
        assert_relative_eq!(p[0], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn less_is_strict_componentwise_dominance() {
        assert!(less(&v(&[1.0, 2.0]), &v(&[2.0, 3.0])).unwrap());
        assert!(!less(&v(&[1.0, 3.0]), &v(&[2.0, 3.0])).unwrap());
        assert!(!less(&v(&[0.0, 5.0]), &v(&[1.0, 1.0])).unwrap());
        assert!(!less(&Vector::default(), &Vector::default()).unwrap());
        assert!(less(&v(&[1.0]), &v(&[1.0, 2.0])).is_err());
    }

    #[test]
    fn equal_compares_every_entry() {
        assert!(equal(&v(&[1.0, 2.0]), &v(&[1.0, 2.0])).unwrap());
        assert!(!equal(&v(&[1.0, 2.0]), &v(&[1.0, 2.5])).unwrap());
        assert!(equal(&Vector::default(), &Vector::default()).unwrap());
        assert!(equal(&v(&[1.0]), &v(&[])).is_err());
    }

    #[test]
    fn display_uses_three_decimals() {
        assert_eq!(v(&[1.0, -2.5, 3.14159]).to_string(), "[1.000,-2.500,3.142]");
        assert_eq!(v(&[0.0]).to_string(), "[0.000]");
        assert_eq!(Vector::default().to_string(), "[]");
    }
}
