// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Column-major dense complex matrices over a shared backing buffer.
//!
//! A [`Matrix`] is an immutable value: every operation returns a new matrix.
//! Slicing by column range shares the backing buffer instead of copying,
//! which lets the density-matrix evolution and the oracle machinery look at
//! submatrices for free. Multiplication and the Hermitian eigenvalue
//! decomposition are delegated to nalgebra's dense kernels; the per-operand
//! [`Transposition`] flags map onto `ad_mul`/`tr_mul` so callers never
//! physically transpose or conjugate an operand ahead of time.

use crate::concurrency;
use crate::{Complex, TOLERANCE};
use nalgebra::{DMatrix, DMatrixView};
use num_traits::{One, Zero};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Iteration cap handed to nalgebra's symmetric eigenvalue solver.
const MAX_EIGEN_ITERATIONS: usize = 1024;

/// Transposition applied to an operand of [`Matrix::product`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transposition {
    /// Use the operand as-is.
    #[default]
    None,
    /// Use the conjugate transpose of the operand.
    Adjoint,
    /// Use the transpose of the operand.
    Transpose,
}

/// A matrix operation error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    /// Construction was attempted from an empty list of rows.
    #[error("cannot build a matrix from an empty list of rows")]
    EmptyRows,
    /// Construction was attempted from rows with no columns.
    #[error("cannot build a matrix from empty rows")]
    EmptyRow,
    /// Construction was attempted from rows of differing lengths.
    #[error("all rows in a matrix must have the same length")]
    UnevenRows,
    /// A builder was asked for a matrix with a zero dimension.
    #[error("matrix dimensions must be at least 1x1, got {rows}x{columns}")]
    NonPositiveDimensions { rows: usize, columns: usize },
    /// A builder was given a worker count of zero.
    #[error("concurrency must be at least one")]
    ZeroConcurrency,
    /// A slice was requested starting past the last column.
    #[error("slice start column {start_column} is out of range")]
    SliceStartOutOfRange { start_column: usize },
    /// A slice was requested with a zero or overflowing column count.
    #[error("slice column count {column_count} is out of range")]
    SliceCountOutOfRange { column_count: usize },
    /// Addition of matrices with different shapes.
    #[error("cannot add a {lhs_rows}x{lhs_columns} matrix to a {rhs_rows}x{rhs_columns} matrix")]
    AdditionShapeMismatch {
        lhs_rows: usize,
        lhs_columns: usize,
        rhs_rows: usize,
        rhs_columns: usize,
    },
    /// Multiplication of operands with incompatible effective shapes.
    #[error(
        "cannot multiply a {lhs_rows}x{lhs_columns} operand by a {rhs_rows}x{rhs_columns} operand"
    )]
    MultiplicationDimensionMismatch {
        lhs_rows: usize,
        lhs_columns: usize,
        rhs_rows: usize,
        rhs_columns: usize,
    },
    /// Eigenvalues were requested for a non-Hermitian matrix.
    #[error("matrix is not hermitian")]
    NotHermitian,
    /// The eigenvalue solver hit its iteration cap.
    #[error("eigenvalue decomposition did not converge")]
    EigenvaluesDidNotConverge,
}

/// A dense complex matrix with column-major storage.
#[derive(Clone, Debug)]
pub struct Matrix {
    buffer: Arc<Vec<Complex>>,
    start: usize,
    row_count: usize,
    column_count: usize,
}

impl Matrix {
    /// Builds a matrix from a list of rows.
    pub fn from_rows(rows: &[Vec<Complex>]) -> Result<Self, MatrixError> {
        let row_count = rows.len();
        if row_count == 0 {
            return Err(MatrixError::EmptyRows);
        }
        let column_count = rows[0].len();
        if column_count == 0 {
            return Err(MatrixError::EmptyRow);
        }
        if rows.iter().any(|row| row.len() != column_count) {
            return Err(MatrixError::UnevenRows);
        }

        let mut buffer = Vec::with_capacity(row_count * column_count);
        for column in 0..column_count {
            for row in rows {
                buffer.push(row[column]);
            }
        }
        Ok(Self::from_buffer(buffer, row_count, column_count))
    }

    /// The identity matrix of the given dimension.
    pub fn identity(dimension: usize) -> Result<Self, MatrixError> {
        if dimension == 0 {
            return Err(MatrixError::NonPositiveDimensions {
                rows: 0,
                columns: 0,
            });
        }
        let mut buffer = vec![Complex::zero(); dimension * dimension];
        for index in 0..dimension {
            buffer[index * dimension + index] = Complex::one();
        }
        Ok(Self::from_buffer(buffer, dimension, dimension))
    }

    /// Fills a `row_count` x `column_count` matrix with `value(row, column)`,
    /// fanning the cells across up to `workers` parallel workers.
    pub fn build<F>(
        row_count: usize,
        column_count: usize,
        workers: usize,
        value: F,
    ) -> Result<Self, MatrixError>
    where
        F: Fn(usize, usize) -> Complex + Sync,
    {
        Self::check_build(row_count, column_count, workers)?;
        let buffer = concurrency::fill(row_count * column_count, workers, |index| {
            value(index % row_count, index / row_count)
        });
        Ok(Self::from_buffer(buffer, row_count, column_count))
    }

    /// Like [`Matrix::build`], but expensive per-row work runs once per row:
    /// `row(r)` is produced a single time and shared by `cell(r, c, &row)`
    /// across that row's columns. Rows are fanned across up to `workers`
    /// parallel workers.
    pub fn build_by_rows<R, RowF, CellF>(
        row_count: usize,
        column_count: usize,
        workers: usize,
        row: RowF,
        cell: CellF,
    ) -> Result<Self, MatrixError>
    where
        RowF: Fn(usize) -> R + Sync,
        CellF: Fn(usize, usize, &R) -> Complex + Sync,
    {
        Self::check_build(row_count, column_count, workers)?;
        let buffer = concurrency::fill_by_rows(row_count, column_count, workers, row, cell);
        Ok(Self::from_buffer(buffer, row_count, column_count))
    }

    fn check_build(row_count: usize, column_count: usize, workers: usize) -> Result<(), MatrixError> {
        if row_count == 0 || column_count == 0 {
            return Err(MatrixError::NonPositiveDimensions {
                rows: row_count,
                columns: column_count,
            });
        }
        if workers == 0 {
            return Err(MatrixError::ZeroConcurrency);
        }
        Ok(())
    }

    pub(crate) fn from_buffer(buffer: Vec<Complex>, row_count: usize, column_count: usize) -> Self {
        debug_assert_eq!(buffer.len(), row_count * column_count);
        Self {
            buffer: Arc::new(buffer),
            start: 0,
            row_count,
            column_count,
        }
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Reads the element at `(row, column)`.
    #[must_use]
    pub fn at(&self, row: usize, column: usize) -> Complex {
        debug_assert!(row < self.row_count && column < self.column_count);
        self.buffer[self.start + column * self.row_count + row]
    }

    /// The column-major elements of this matrix.
    pub(crate) fn as_slice(&self) -> &[Complex] {
        &self.buffer[self.start..self.start + self.row_count * self.column_count]
    }

    /// A view over `column_count` columns starting at `start_column`,
    /// sharing the backing buffer with this matrix.
    pub fn slice(&self, start_column: usize, column_count: usize) -> Result<Self, MatrixError> {
        if start_column >= self.column_count {
            return Err(MatrixError::SliceStartOutOfRange { start_column });
        }
        if column_count == 0 || start_column + column_count > self.column_count {
            return Err(MatrixError::SliceCountOutOfRange { column_count });
        }
        Ok(Self {
            buffer: Arc::clone(&self.buffer),
            start: self.start + start_column * self.row_count,
            row_count: self.row_count,
            column_count,
        })
    }

    /// Elementwise equality within an absolute tolerance.
    #[must_use]
    pub fn is_approximately_equal(&self, other: &Self, tolerance: f64) -> bool {
        self.row_count == other.row_count
            && self.column_count == other.column_count
            && self
                .as_slice()
                .iter()
                .zip(other.as_slice())
                .all(|(lhs, rhs)| approximately_equal(*lhs, *rhs, tolerance))
    }

    /// Whether `M ≈ M*` within an absolute tolerance.
    #[must_use]
    pub fn is_approximately_hermitian(&self, tolerance: f64) -> bool {
        self.row_count == self.column_count
            && (0..self.row_count).all(|row| {
                (row..self.column_count).all(|column| {
                    approximately_equal(self.at(row, column), self.at(column, row).conj(), tolerance)
                })
            })
    }

    /// Whether `M·M* ≈ I` and `M*·M ≈ I` within an absolute tolerance.
    /// Non-square matrices are never unitary.
    #[must_use]
    pub fn is_approximately_unitary(&self, tolerance: f64) -> bool {
        if self.row_count != self.column_count {
            return false;
        }
        let Ok(identity) = Self::identity(self.row_count) else {
            return false;
        };
        let Ok(left) = Self::product(self, Transposition::None, self, Transposition::Adjoint)
        else {
            return false;
        };
        let Ok(right) = Self::product(self, Transposition::Adjoint, self, Transposition::None)
        else {
            return false;
        };
        left.is_approximately_equal(&identity, tolerance)
            && right.is_approximately_equal(&identity, tolerance)
    }

    /// Scalar-times-matrix.
    #[must_use]
    pub fn scaled(&self, factor: Complex) -> Self {
        let buffer = self.as_slice().iter().map(|value| factor * value).collect();
        Self::from_buffer(buffer, self.row_count, self.column_count)
    }

    /// Matrix addition; the shapes must agree.
    pub fn added_to(&self, other: &Self) -> Result<Self, MatrixError> {
        if self.row_count != other.row_count || self.column_count != other.column_count {
            return Err(MatrixError::AdditionShapeMismatch {
                lhs_rows: self.row_count,
                lhs_columns: self.column_count,
                rhs_rows: other.row_count,
                rhs_columns: other.column_count,
            });
        }
        let buffer = self
            .as_slice()
            .iter()
            .zip(other.as_slice())
            .map(|(lhs, rhs)| lhs + rhs)
            .collect();
        Ok(Self::from_buffer(buffer, self.row_count, self.column_count))
    }

    /// General multiplication with a per-operand transposition flag, as the
    /// BLAS-style kernel accepts it. The effective shapes (after applying
    /// the flags) must be compatible.
    pub fn product(
        lhs: &Self,
        lhs_transposition: Transposition,
        rhs: &Self,
        rhs_transposition: Transposition,
    ) -> Result<Self, MatrixError> {
        let (lhs_rows, lhs_columns) = effective_shape(lhs, lhs_transposition);
        let (rhs_rows, rhs_columns) = effective_shape(rhs, rhs_transposition);
        if lhs_columns != rhs_rows {
            return Err(MatrixError::MultiplicationDimensionMismatch {
                lhs_rows,
                lhs_columns,
                rhs_rows,
                rhs_columns,
            });
        }

        let lhs_view = lhs.as_view();
        let rhs_view = rhs.as_view();
        let result: DMatrix<Complex> = match (lhs_transposition, rhs_transposition) {
            (Transposition::None, Transposition::None) => &lhs_view * &rhs_view,
            (Transposition::Adjoint, Transposition::None) => lhs_view.ad_mul(&rhs_view),
            (Transposition::Transpose, Transposition::None) => lhs_view.tr_mul(&rhs_view),
            (Transposition::None, Transposition::Adjoint) => &lhs_view * rhs_view.adjoint(),
            (Transposition::None, Transposition::Transpose) => &lhs_view * rhs_view.transpose(),
            (Transposition::Adjoint, Transposition::Adjoint) => {
                lhs_view.ad_mul(&rhs_view.adjoint())
            }
            (Transposition::Adjoint, Transposition::Transpose) => {
                lhs_view.ad_mul(&rhs_view.transpose())
            }
            (Transposition::Transpose, Transposition::Adjoint) => {
                lhs_view.tr_mul(&rhs_view.adjoint())
            }
            (Transposition::Transpose, Transposition::Transpose) => {
                lhs_view.tr_mul(&rhs_view.transpose())
            }
        };
        Ok(Self::from_buffer(
            result.as_slice().to_vec(),
            lhs_rows,
            rhs_columns,
        ))
    }

    /// Plain multiplication, `self · rhs`.
    pub fn multiplied_by(&self, rhs: &Self) -> Result<Self, MatrixError> {
        Self::product(self, Transposition::None, rhs, Transposition::None)
    }

    /// The eigenvalues of a Hermitian matrix, sorted ascending.
    ///
    /// Fails with [`MatrixError::NotHermitian`] when `M !≈ M*`, and with
    /// [`MatrixError::EigenvaluesDidNotConverge`] when the solver hits its
    /// iteration cap.
    pub fn hermitian_eigenvalues(&self) -> Result<Vec<f64>, MatrixError> {
        if !self.is_approximately_hermitian(TOLERANCE) {
            return Err(MatrixError::NotHermitian);
        }
        let matrix = DMatrix::from_column_slice(self.row_count, self.column_count, self.as_slice());
        let eigen = matrix
            .try_symmetric_eigen(f64::EPSILON, MAX_EIGEN_ITERATIONS)
            .ok_or(MatrixError::EigenvaluesDidNotConverge)?;
        let mut eigenvalues: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
        eigenvalues.sort_by(f64::total_cmp);
        Ok(eigenvalues)
    }

    fn as_view(&self) -> DMatrixView<'_, Complex> {
        DMatrixView::from_slice(self.as_slice(), self.row_count, self.column_count)
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.row_count == other.row_count
            && self.column_count == other.column_count
            && self.as_slice() == other.as_slice()
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.row_count {
            for column in 0..self.column_count {
                if column > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", format_complex(self.at(row, column)))?;
            }
            if row + 1 < self.row_count {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

pub(crate) fn approximately_equal(lhs: Complex, rhs: Complex, tolerance: f64) -> bool {
    (lhs.re - rhs.re).abs() <= tolerance && (lhs.im - rhs.im).abs() <= tolerance
}

/// Formats an element as `re+imi` with four decimals, normalizing negative
/// zero so snapshots stay stable across BLAS kernels.
pub(crate) fn format_complex(value: Complex) -> String {
    let re = if value.re == 0.0 { 0.0 } else { value.re };
    let im = if value.im == 0.0 { 0.0 } else { value.im };
    format!("{re:+.4}{im:+.4}i")
}

fn effective_shape(matrix: &Matrix, transposition: Transposition) -> (usize, usize) {
    match transposition {
        Transposition::None => (matrix.row_count, matrix.column_count),
        Transposition::Adjoint | Transposition::Transpose => {
            (matrix.column_count, matrix.row_count)
        }
    }
}

#[cfg(test)]
mod tests;
