pub mod matrix;
pub mod stats;
pub mod vector;

pub use matrix::Matrix;
pub use stats::StatsHelper;
pub use vector::Vector;
