// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Validated density matrices and their evolution through Kraus operators.
//!
//! A [`DensityMatrix`] is a square matrix with a power-of-two side that is
//! Hermitian with non-negative eigenvalues summing to one. Evolution applies
//! `ρ' = Σᵢ KᵢρKᵢ*` where the `Kᵢ` are a unitary gate's single operator or
//! a noise channel's Kraus set, each expanded over the circuit's qubits.

use crate::circuit_matrix::CircuitMatrix;
use crate::matrix::{Matrix, MatrixError, Transposition};
use crate::statevector::Statevector;
use crate::vector::Vector;
use crate::{Complex, TOLERANCE};
use num_traits::Zero;
use thiserror::Error;

/// A density-matrix validation error.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DensityMatrixError {
    /// The matrix is not square.
    #[error("density matrix must be square, got {rows}x{columns}")]
    NotSquare { rows: usize, columns: usize },
    /// The side length is not a power of two.
    #[error("density matrix side {row_count} is not a power of two")]
    SideNotPowerOfTwo { row_count: usize },
    /// The matrix is not Hermitian.
    #[error("density matrix is not hermitian")]
    NotHermitian,
    /// An eigenvalue is negative beyond tolerance.
    #[error("density matrix has negative eigenvalue {eigenvalue}")]
    NegativeEigenvalue { eigenvalue: f64 },
    /// The eigenvalues do not sum to one within tolerance.
    #[error("density matrix eigenvalues sum to {sum}, expected one")]
    EigenvaluesDoNotSumToOne { sum: f64 },
    /// The eigenvalue solver hit its iteration cap.
    #[error("density matrix eigenvalue decomposition did not converge")]
    EigenvaluesDidNotConverge,
}

/// A validated mixed quantum state over `qubit_count` qubits.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityMatrix {
    matrix: Matrix,
}

impl DensityMatrix {
    /// Validates a raw matrix as a density matrix: square with a
    /// power-of-two side, Hermitian, eigenvalues non-negative and summing
    /// to one within tolerance.
    pub fn from_matrix(matrix: Matrix) -> Result<Self, DensityMatrixError> {
        let rows = matrix.row_count();
        let columns = matrix.column_count();
        if rows != columns {
            return Err(DensityMatrixError::NotSquare { rows, columns });
        }
        if rows < 2 || !rows.is_power_of_two() {
            return Err(DensityMatrixError::SideNotPowerOfTwo { row_count: rows });
        }

        let eigenvalues = match matrix.hermitian_eigenvalues() {
            Ok(eigenvalues) => eigenvalues,
            Err(MatrixError::NotHermitian) => return Err(DensityMatrixError::NotHermitian),
            Err(_) => return Err(DensityMatrixError::EigenvaluesDidNotConverge),
        };
        if let Some(&eigenvalue) = eigenvalues.iter().find(|&&value| value < -TOLERANCE) {
            return Err(DensityMatrixError::NegativeEigenvalue { eigenvalue });
        }
        let sum: f64 = eigenvalues.iter().sum();
        if (sum - 1.0).abs() > TOLERANCE {
            return Err(DensityMatrixError::EigenvaluesDoNotSumToOne { sum });
        }
        Ok(Self { matrix })
    }

    /// The pure state `|v⟩⟨v|`.
    #[must_use]
    pub fn from_pure_state(statevector: &Statevector) -> Self {
        let vector = statevector.vector().as_matrix();
        let matrix = Matrix::product(vector, Transposition::None, vector, Transposition::Adjoint)
            .expect("an outer product of a vector with itself is well-formed");
        Self { matrix }
    }

    #[must_use]
    pub fn qubit_count(&self) -> usize {
        self.matrix.row_count().trailing_zeros() as usize
    }

    #[must_use]
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Elementwise equality within an absolute tolerance.
    #[must_use]
    pub fn is_approximately_equal(&self, other: &Self, tolerance: f64) -> bool {
        self.matrix.is_approximately_equal(&other.matrix, tolerance)
    }
}

/// How one evolution step materializes the expanded Kraus operators.
pub(crate) enum DensityEvolution {
    /// Expand each operator to the full `2^N x 2^N` matrix, then multiply.
    FullMatrix { expansion_workers: usize },
    /// Materialize operator rows on demand; never holds the expanded
    /// operator, at the cost of a sum per output element.
    RowByRow {
        calculation_workers: usize,
        expansion_workers: usize,
    },
}

impl DensityEvolution {
    /// Applies `ρ' = Σᵢ KᵢρKᵢ*`, each operator expanded onto `inputs`.
    pub fn apply(
        &self,
        operators: &[Matrix],
        inputs: &[usize],
        qubit_count: usize,
        rho: &Matrix,
    ) -> Matrix {
        let mut accumulator: Option<Matrix> = None;
        for operator in operators {
            let term = self.apply_one(operator, inputs, qubit_count, rho);
            accumulator = Some(match accumulator {
                None => term,
                Some(sum) => sum
                    .added_to(&term)
                    .expect("all terms share the density matrix shape"),
            });
        }
        accumulator.expect("a noise channel carries at least one operator")
    }

    /// One term `KρK*` of the sum.
    fn apply_one(
        &self,
        operator: &Matrix,
        inputs: &[usize],
        qubit_count: usize,
        rho: &Matrix,
    ) -> Matrix {
        let expanded = CircuitMatrix::new(qubit_count, operator, inputs);
        match *self {
            DensityEvolution::FullMatrix { expansion_workers } => {
                let dense = expanded
                    .expand(expansion_workers)
                    .expect("expansion dimensions and workers are valid");
                let left = dense
                    .multiplied_by(rho)
                    .expect("the expanded operator matches the density matrix");
                Matrix::product(&left, Transposition::None, &dense, Transposition::Adjoint)
                    .expect("the expanded operator matches the density matrix")
            }
            DensityEvolution::RowByRow {
                calculation_workers,
                expansion_workers,
            } => {
                let dimension = expanded.dimension();
                // T = K·ρ, one materialized K row per output row.
                let left = Matrix::build_by_rows(
                    dimension,
                    dimension,
                    calculation_workers,
                    |row| {
                        expanded
                            .row(row, expansion_workers)
                            .expect("row dimensions and workers are valid")
                    },
                    |_, column, operator_row: &Vector| {
                        (0..dimension).fold(Complex::zero(), |sum, index| {
                            sum + operator_row[index] * rho.at(index, column)
                        })
                    },
                )
                .expect("output dimensions and workers are valid");
                // W = K·T* has W[c, r] = Σⱼ K[c, j]·conj(T[r, j]), so the
                // conjugate transpose of W is T·K*.
                let crossed = Matrix::build_by_rows(
                    dimension,
                    dimension,
                    calculation_workers,
                    |row| {
                        expanded
                            .row(row, expansion_workers)
                            .expect("row dimensions and workers are valid")
                    },
                    |_, column, operator_row: &Vector| {
                        (0..dimension).fold(Complex::zero(), |sum, index| {
                            sum + operator_row[index] * left.at(column, index).conj()
                        })
                    },
                )
                .expect("output dimensions and workers are valid");
                Matrix::build(dimension, dimension, calculation_workers, |row, column| {
                    crossed.at(column, row).conj()
                })
                .expect("output dimensions and workers are valid")
            }
        }
    }
}

#[cfg(test)]
mod tests;
