//! Dense vector and matrix arithmetic.
//!
//! [`Vector`] is a fixed-length run of `f64` values and [`Matrix`] is a
//! sequence of equal-length row vectors. Operations live as free functions in
//! [`math::vector`] and [`math::matrix`], validate shapes up front and return
//! new values; [`Matrix::swap_in_place`] is the one in-place mutation.

pub mod math;
pub mod prelude;

pub use math::{Matrix, Vector};
pub use prelude::{LinalgError, LinalgResult};
