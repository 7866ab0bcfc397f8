//! Constructors for the affine operators applied to a particle's point matrix.
//!
//! Rotation and scaling are 2x2 and are applied by left-multiplication.
//! Translation is 2xN and is added to a point matrix with the same column count.

use crate::matrix::Matrix;

/// Counter-clockwise rotation by `theta` radians, Cartesian convention.
pub fn rotation(theta: f64) -> Matrix {
    let (sin, cos) = theta.sin_cos();
    let mut m = Matrix::new(2, 2);
    m[(0, 0)] = cos;
    m[(0, 1)] = -sin;
    m[(1, 0)] = sin;
    m[(1, 1)] = cos;
    m
}

/// Uniform scale. Factors below 1 shrink.
pub fn scaling(scale: f64) -> Matrix {
    let mut m = Matrix::new(2, 2);
    m[(0, 0)] = scale;
    m[(1, 1)] = scale;
    m
}

/// `2 x cols` matrix whose every column is `(dx, dy)`.
pub fn translation(dx: f64, dy: f64, cols: usize) -> Matrix {
    let mut m = Matrix::new(2, cols);
    for col in 0..cols {
        m[(0, col)] = dx;
        m[(1, col)] = dy;
    }
    m
}
