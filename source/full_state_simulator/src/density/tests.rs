// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::{DensityEvolution, DensityMatrix, DensityMatrixError};
use crate::gate::Gate;
use crate::matrix::Matrix;
use crate::statevector::Statevector;
use crate::{Complex, TOLERANCE};

fn r(re: f64) -> Complex {
    Complex::new(re, 0.0)
}

fn ground_state(qubit_count: usize) -> DensityMatrix {
    DensityMatrix::from_pure_state(
        &Statevector::from_bit_string(&"0".repeat(qubit_count)).expect("bit string is valid"),
    )
}

#[test]
fn pure_states_make_valid_density_matrices() {
    let rho = ground_state(1);
    assert_eq!(1, rho.qubit_count());
    assert_eq!(r(1.0), rho.matrix().at(0, 0));
    assert!(DensityMatrix::from_matrix(rho.matrix().clone()).is_ok());
}

#[test]
fn superposed_pure_states_spread_the_matrix() {
    let plus = Statevector::from_vector(
        crate::vector::Vector::from_values(vec![
            r(std::f64::consts::FRAC_1_SQRT_2),
            r(std::f64::consts::FRAC_1_SQRT_2),
        ])
        .expect("vector is valid"),
    )
    .expect("statevector is valid");
    let rho = DensityMatrix::from_pure_state(&plus);
    for row in 0..2 {
        for column in 0..2 {
            assert!((rho.matrix().at(row, column).re - 0.5).abs() <= TOLERANCE);
        }
    }
}

#[test]
fn validation_rejects_non_square_matrices() {
    let wide = Matrix::from_rows(&[vec![r(1.0), r(0.0), r(0.0)], vec![r(0.0), r(0.0), r(0.0)]])
        .expect("matrix should be valid");
    assert_eq!(
        Err(DensityMatrixError::NotSquare {
            rows: 2,
            columns: 3,
        }),
        DensityMatrix::from_matrix(wide)
    );
}

#[test]
fn validation_rejects_odd_sides() {
    let odd = Matrix::from_rows(&[
        vec![r(1.0), r(0.0), r(0.0)],
        vec![r(0.0), r(0.0), r(0.0)],
        vec![r(0.0), r(0.0), r(0.0)],
    ])
    .expect("matrix should be valid");
    assert_eq!(
        Err(DensityMatrixError::SideNotPowerOfTwo { row_count: 3 }),
        DensityMatrix::from_matrix(odd)
    );
}

#[test]
fn validation_rejects_non_hermitian_matrices() {
    let skew = Matrix::from_rows(&[vec![r(1.0), r(1.0)], vec![r(0.0), r(0.0)]])
        .expect("matrix should be valid");
    assert_eq!(
        Err(DensityMatrixError::NotHermitian),
        DensityMatrix::from_matrix(skew)
    );
}

#[test]
fn validation_rejects_wrong_traces() {
    let half = Matrix::from_rows(&[vec![r(0.5), r(0.0)], vec![r(0.0), r(0.4)]])
        .expect("matrix should be valid");
    let error = DensityMatrix::from_matrix(half).unwrap_err();
    assert!(matches!(
        error,
        DensityMatrixError::EigenvaluesDoNotSumToOne { .. }
    ));
}

#[test]
fn validation_rejects_negative_eigenvalues() {
    let indefinite = Matrix::from_rows(&[vec![r(1.5), r(0.0)], vec![r(0.0), r(-0.5)]])
        .expect("matrix should be valid");
    let error = DensityMatrix::from_matrix(indefinite).unwrap_err();
    assert!(matches!(
        error,
        DensityMatrixError::NegativeEigenvalue { .. }
    ));
}

#[test]
fn a_unitary_kraus_set_conjugates_the_state() {
    let rho = ground_state(1);
    let x = Gate::not(0).raw_matrix();
    for evolution in [
        DensityEvolution::FullMatrix {
            expansion_workers: 1,
        },
        DensityEvolution::RowByRow {
            calculation_workers: 2,
            expansion_workers: 1,
        },
    ] {
        let next = evolution.apply(std::slice::from_ref(&x), &[0], 1, rho.matrix());
        assert!((next.at(1, 1).re - 1.0).abs() <= TOLERANCE);
        assert!(next.at(0, 0).norm_sqr() <= TOLERANCE);
    }
}

#[test]
fn full_matrix_and_row_by_row_evolutions_agree() {
    let rho = ground_state(2);
    let extracted = Gate::controlled(Gate::hadamard(0), vec![1])
        .extract(2)
        .expect("gate should be valid");

    let full = DensityEvolution::FullMatrix {
        expansion_workers: 2,
    }
    .apply(
        std::slice::from_ref(&extracted.matrix),
        &extracted.inputs,
        2,
        rho.matrix(),
    );
    let rows = DensityEvolution::RowByRow {
        calculation_workers: 2,
        expansion_workers: 2,
    }
    .apply(
        std::slice::from_ref(&extracted.matrix),
        &extracted.inputs,
        2,
        rho.matrix(),
    );
    assert!(full.is_approximately_equal(&rows, TOLERANCE));
}
