// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Complex column vectors.
//!
//! A [`Vector`] is a [`Matrix`] with a single column; all of its algebra is
//! delegated to the matrix kernel.

use crate::matrix::{Matrix, MatrixError};
use crate::Complex;
use std::fmt;
use std::ops::Index;

/// A dense complex column vector.
#[derive(Clone, Debug, PartialEq)]
pub struct Vector {
    matrix: Matrix,
}

impl Vector {
    /// Builds a vector from its entries.
    pub fn from_values(values: Vec<Complex>) -> Result<Self, MatrixError> {
        if values.is_empty() {
            return Err(MatrixError::EmptyRows);
        }
        let count = values.len();
        Ok(Self {
            matrix: Matrix::from_buffer(values, count, 1),
        })
    }

    /// Fills a vector of `count` entries with `value(index)`, fanning the
    /// entries across up to `workers` parallel workers.
    pub fn build<F>(count: usize, workers: usize, value: F) -> Result<Self, MatrixError>
    where
        F: Fn(usize) -> Complex + Sync,
    {
        Ok(Self {
            matrix: Matrix::build(count, 1, workers, |row, _| value(row))?,
        })
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.matrix.row_count()
    }

    #[must_use]
    pub fn at(&self, index: usize) -> Complex {
        self.matrix.at(index, 0)
    }

    /// The underlying single-column matrix.
    #[must_use]
    pub fn as_matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub(crate) fn as_slice(&self) -> &[Complex] {
        self.matrix.as_slice()
    }

    /// The real squared ℓ²-norm, `Σ |vᵢ|²`.
    #[must_use]
    pub fn squared_norm(&self) -> f64 {
        self.as_slice().iter().map(Complex::norm_sqr).sum()
    }

    /// The plain (unconjugated) product `Σ selfᵢ · otherᵢ`, as used when
    /// multiplying a matrix row into a column vector.
    pub(crate) fn dot(&self, other: &Self) -> Complex {
        debug_assert_eq!(self.count(), other.count());
        self.as_slice()
            .iter()
            .zip(other.as_slice())
            .map(|(lhs, rhs)| lhs * rhs)
            .sum()
    }

    /// Elementwise equality within an absolute tolerance.
    #[must_use]
    pub fn is_approximately_equal(&self, other: &Self, tolerance: f64) -> bool {
        self.matrix.is_approximately_equal(&other.matrix, tolerance)
    }
}

impl Index<usize> for Vector {
    type Output = Complex;

    fn index(&self, index: usize) -> &Complex {
        &self.as_slice()[index]
    }
}

impl From<Matrix> for Vector {
    /// Wraps a single-column matrix. Callers slice multi-column matrices
    /// down to one column first.
    fn from(matrix: Matrix) -> Self {
        debug_assert_eq!(1, matrix.column_count());
        Self { matrix }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.matrix, f)
    }
}

#[cfg(test)]
mod tests;
