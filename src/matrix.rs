use std::{
    fmt,
    ops::{Add, Index, IndexMut, Mul},
};

use crate::error::{Error, Result};

/// Dense row-major `f64` matrix.
///
/// The shape is fixed at construction. Arithmetic never mutates its operands;
/// `checked_add` / `checked_mul` report incompatible shapes as
/// [`Error::DimensionMismatch`], while the `+` and `*` operators treat them as
/// a caller bug and panic.
#[derive(Clone, Debug)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero-filled `rows x cols` matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Copies column `col` out of the matrix.
    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|row| self[(row, col)]).collect()
    }

    pub fn checked_add(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.shape() != rhs.shape() {
            return Err(Error::DimensionMismatch {
                op: "add",
                left: self.shape(),
                right: rhs.shape(),
            });
        }

        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(&rhs.data)
                .map(|(a, b)| a + b)
                .collect(),
        })
    }

    pub fn checked_mul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(Error::DimensionMismatch {
                op: "multiply",
                left: self.shape(),
                right: rhs.shape(),
            });
        }

        let mut result = Matrix::new(self.rows, rhs.cols);
        for i in 0..self.rows {
            for j in 0..rhs.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self[(i, k)] * rhs[(k, j)];
                }
                result[(i, j)] = sum;
            }
        }
        Ok(result)
    }

    fn offset(&self, (row, col): (usize, usize)) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "index ({row}, {col}) out of bounds for {}x{} matrix",
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &f64 {
        &self.data[self.offset(index)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut f64 {
        let offset = self.offset(index);
        &mut self.data[offset]
    }
}

impl PartialEq for Matrix {
    /// Exact comparison, no tolerance. Different shapes are never equal.
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.data == other.data
    }
}

macro_rules! impl_operator {
    ($trait:ident, $method:ident, $checked:ident) => {
        impl $trait<&Matrix> for &Matrix {
            type Output = Matrix;

            fn $method(self, rhs: &Matrix) -> Matrix {
                match self.$checked(rhs) {
                    Ok(matrix) => matrix,
                    Err(err) => panic!("{err}"),
                }
            }
        }

        impl $trait<Matrix> for Matrix {
            type Output = Matrix;

            fn $method(self, rhs: Matrix) -> Matrix {
                (&self).$method(&rhs)
            }
        }
    };
}

impl_operator!(Add, add, checked_add);
impl_operator!(Mul, mul, checked_mul);

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self[(row, col)])?;
            }
        }
        Ok(())
    }
}
