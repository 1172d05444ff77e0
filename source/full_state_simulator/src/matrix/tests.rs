// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::{Matrix, MatrixError, Transposition};
use crate::{Complex, TOLERANCE};
use expect_test::expect;
use std::f64::consts::FRAC_1_SQRT_2;

fn c(re: f64, im: f64) -> Complex {
    Complex::new(re, im)
}

fn r(re: f64) -> Complex {
    Complex::new(re, 0.0)
}

fn hadamard() -> Matrix {
    Matrix::from_rows(&[
        vec![r(FRAC_1_SQRT_2), r(FRAC_1_SQRT_2)],
        vec![r(FRAC_1_SQRT_2), r(-FRAC_1_SQRT_2)],
    ])
    .expect("matrix should be valid")
}

#[test]
fn construction_round_trips_elements() {
    let rows = vec![
        vec![r(1.0), r(2.0), r(3.0)],
        vec![r(4.0), r(5.0), r(6.0)],
    ];
    let matrix = Matrix::from_rows(&rows).expect("matrix should be valid");

    assert_eq!(2, matrix.row_count());
    assert_eq!(3, matrix.column_count());
    for (row, values) in rows.iter().enumerate() {
        for (column, value) in values.iter().enumerate() {
            assert_eq!(*value, matrix.at(row, column));
        }
    }
}

#[test]
fn storage_is_column_major() {
    let matrix = Matrix::from_rows(&[vec![r(1.0), r(2.0)], vec![r(3.0), r(4.0)]])
        .expect("matrix should be valid");
    assert_eq!(&[r(1.0), r(3.0), r(2.0), r(4.0)], matrix.as_slice());
}

#[test]
fn construction_rejects_malformed_rows() {
    assert_eq!(Err(MatrixError::EmptyRows), Matrix::from_rows(&[]));
    assert_eq!(Err(MatrixError::EmptyRow), Matrix::from_rows(&[vec![]]));
    assert_eq!(
        Err(MatrixError::UnevenRows),
        Matrix::from_rows(&[vec![r(1.0)], vec![r(1.0), r(2.0)]])
    );
}

#[test]
fn full_width_slice_equals_the_matrix() {
    let matrix = Matrix::from_rows(&[vec![r(1.0), c(2.0, -1.0)], vec![r(3.0), r(4.0)]])
        .expect("matrix should be valid");
    let slice = matrix
        .slice(0, matrix.column_count())
        .expect("slice should be valid");
    assert_eq!(matrix, slice);
}

#[test]
fn slices_share_storage_without_copying() {
    let matrix = Matrix::from_rows(&[
        vec![r(1.0), r(2.0), r(3.0), r(4.0)],
        vec![r(5.0), r(6.0), r(7.0), r(8.0)],
    ])
    .expect("matrix should be valid");

    let slice = matrix.slice(1, 2).expect("slice should be valid");
    assert_eq!(2, slice.row_count());
    assert_eq!(2, slice.column_count());
    assert_eq!(r(2.0), slice.at(0, 0));
    assert_eq!(r(7.0), slice.at(1, 1));

    // A slice of a slice keeps indexing into the shared backing buffer.
    let inner = slice.slice(1, 1).expect("slice should be valid");
    assert_eq!(r(3.0), inner.at(0, 0));
    assert_eq!(r(7.0), inner.at(1, 0));
}

#[test]
fn slicing_rejects_out_of_range_requests() {
    let matrix = Matrix::identity(2).expect("matrix should be valid");
    assert_eq!(
        Err(MatrixError::SliceStartOutOfRange { start_column: 2 }),
        matrix.slice(2, 1)
    );
    assert_eq!(
        Err(MatrixError::SliceCountOutOfRange { column_count: 2 }),
        matrix.slice(1, 2)
    );
    assert_eq!(
        Err(MatrixError::SliceCountOutOfRange { column_count: 0 }),
        matrix.slice(0, 0)
    );
}

#[test]
fn parallel_and_serial_builds_agree() {
    #[allow(clippy::cast_precision_loss)]
    let value = |row: usize, column: usize| c(row as f64, column as f64);
    let serial = Matrix::build(17, 13, 1, value).expect("matrix should be valid");
    for workers in [2, 4, 64] {
        let parallel = Matrix::build(17, 13, workers, value).expect("matrix should be valid");
        assert_eq!(serial, parallel);
    }
}

#[test]
fn builders_reject_invalid_requests() {
    let value = |_, _| r(0.0);
    assert_eq!(
        Err(MatrixError::NonPositiveDimensions { rows: 0, columns: 4 }),
        Matrix::build(0, 4, 1, value)
    );
    assert_eq!(
        Err(MatrixError::ZeroConcurrency),
        Matrix::build(4, 4, 0, value)
    );
}

#[test]
fn scaling_multiplies_every_element() {
    let matrix = Matrix::from_rows(&[vec![r(1.0), r(2.0)], vec![r(3.0), r(4.0)]])
        .expect("matrix should be valid");
    let scaled = matrix.scaled(c(0.0, 1.0));
    assert_eq!(c(0.0, 1.0), scaled.at(0, 0));
    assert_eq!(c(0.0, 4.0), scaled.at(1, 1));
}

#[test]
fn addition_requires_matching_shapes() {
    let square = Matrix::identity(2).expect("matrix should be valid");
    let wide = Matrix::from_rows(&[vec![r(1.0), r(2.0), r(3.0)]]).expect("matrix should be valid");

    let sum = square.added_to(&square).expect("addition should succeed");
    assert_eq!(r(2.0), sum.at(0, 0));
    assert_eq!(r(0.0), sum.at(0, 1));

    assert_eq!(
        Err(MatrixError::AdditionShapeMismatch {
            lhs_rows: 2,
            lhs_columns: 2,
            rhs_rows: 1,
            rhs_columns: 3,
        }),
        square.added_to(&wide)
    );
}

#[test]
fn plain_product_multiplies() {
    let lhs = Matrix::from_rows(&[vec![r(1.0), r(2.0)], vec![r(3.0), r(4.0)]])
        .expect("matrix should be valid");
    let rhs = Matrix::from_rows(&[vec![r(5.0), r(6.0)], vec![r(7.0), r(8.0)]])
        .expect("matrix should be valid");
    let product = lhs.multiplied_by(&rhs).expect("product should succeed");
    assert_eq!(r(19.0), product.at(0, 0));
    assert_eq!(r(22.0), product.at(0, 1));
    assert_eq!(r(43.0), product.at(1, 0));
    assert_eq!(r(50.0), product.at(1, 1));
}

#[test]
fn adjoint_product_conjugates_the_flagged_operand() {
    let phase = Matrix::from_rows(&[vec![r(1.0), r(0.0)], vec![r(0.0), c(0.0, 1.0)]])
        .expect("matrix should be valid");
    let identity = Matrix::identity(2).expect("matrix should be valid");

    let left = Matrix::product(&phase, Transposition::Adjoint, &phase, Transposition::None)
        .expect("product should succeed");
    assert!(left.is_approximately_equal(&identity, TOLERANCE));

    let right = Matrix::product(&phase, Transposition::None, &phase, Transposition::Adjoint)
        .expect("product should succeed");
    assert!(right.is_approximately_equal(&identity, TOLERANCE));
}

#[test]
fn transpose_product_does_not_conjugate() {
    let matrix = Matrix::from_rows(&[vec![c(0.0, 1.0), r(0.0)], vec![r(0.0), r(1.0)]])
        .expect("matrix should be valid");
    let product = Matrix::product(&matrix, Transposition::Transpose, &matrix, Transposition::None)
        .expect("product should succeed");
    // For M = diag(i, 1), MᵀM keeps i² = -1 where M*M would cancel it.
    assert_eq!(r(-1.0), product.at(0, 0));
}

#[test]
fn product_checks_effective_shapes() {
    let wide = Matrix::from_rows(&[vec![r(1.0), r(2.0), r(3.0)], vec![r(4.0), r(5.0), r(6.0)]])
        .expect("matrix should be valid");

    assert_eq!(
        Err(MatrixError::MultiplicationDimensionMismatch {
            lhs_rows: 2,
            lhs_columns: 3,
            rhs_rows: 2,
            rhs_columns: 3,
        }),
        wide.multiplied_by(&wide)
    );

    // The same operands are compatible once the left one is transposed.
    let product = Matrix::product(&wide, Transposition::Transpose, &wide, Transposition::None)
        .expect("product should succeed");
    assert_eq!(3, product.row_count());
    assert_eq!(3, product.column_count());
}

#[test]
fn unitarity_holds_for_known_unitaries() {
    let x = Matrix::from_rows(&[vec![r(0.0), r(1.0)], vec![r(1.0), r(0.0)]])
        .expect("matrix should be valid");
    let y = Matrix::from_rows(&[vec![r(0.0), c(0.0, -1.0)], vec![c(0.0, 1.0), r(0.0)]])
        .expect("matrix should be valid");
    let cnot = Matrix::from_rows(&[
        vec![r(1.0), r(0.0), r(0.0), r(0.0)],
        vec![r(0.0), r(0.0), r(0.0), r(1.0)],
        vec![r(0.0), r(0.0), r(1.0), r(0.0)],
        vec![r(0.0), r(1.0), r(0.0), r(0.0)],
    ])
    .expect("matrix should be valid");

    for unitary in [&hadamard(), &x, &y, &cnot] {
        assert!(unitary.is_approximately_unitary(TOLERANCE));
    }
}

#[test]
fn unitarity_fails_for_singular_and_non_square_matrices() {
    let singular = Matrix::from_rows(&[vec![r(0.0), r(1.0)], vec![r(1.0), r(1.0)]])
        .expect("matrix should be valid");
    assert!(!singular.is_approximately_unitary(TOLERANCE));

    let non_square =
        Matrix::from_rows(&[vec![r(1.0), r(0.0)]]).expect("matrix should be valid");
    assert!(!non_square.is_approximately_unitary(TOLERANCE));
}

#[test]
fn hermitian_eigenvalues_are_sorted_ascending() {
    let diagonal = Matrix::from_rows(&[
        vec![r(3.0), r(0.0), r(0.0)],
        vec![r(0.0), r(1.0), r(0.0)],
        vec![r(0.0), r(0.0), r(2.0)],
    ])
    .expect("matrix should be valid");
    let eigenvalues = diagonal
        .hermitian_eigenvalues()
        .expect("eigenvalues should converge");

    assert_eq!(3, eigenvalues.len());
    for (expected, actual) in [1.0, 2.0, 3.0].iter().zip(&eigenvalues) {
        assert!((expected - actual).abs() <= TOLERANCE);
    }
}

#[test]
fn pauli_x_eigenvalues_are_plus_and_minus_one() {
    let x = Matrix::from_rows(&[vec![r(0.0), r(1.0)], vec![r(1.0), r(0.0)]])
        .expect("matrix should be valid");
    let eigenvalues = x
        .hermitian_eigenvalues()
        .expect("eigenvalues should converge");
    assert!((eigenvalues[0] + 1.0).abs() <= TOLERANCE);
    assert!((eigenvalues[1] - 1.0).abs() <= TOLERANCE);
}

#[test]
fn eigenvalues_require_a_hermitian_matrix() {
    let non_hermitian = Matrix::from_rows(&[vec![r(1.0), r(2.0)], vec![r(3.0), r(4.0)]])
        .expect("matrix should be valid");
    assert_eq!(
        Err(MatrixError::NotHermitian),
        non_hermitian.hermitian_eigenvalues()
    );
}

#[test]
fn display_formats_rows_of_elements() {
    expect![[r"
        +0.7071+0.0000i +0.7071+0.0000i
        +0.7071+0.0000i -0.7071+0.0000i"]]
    .assert_eq(&format!("\n{}", hadamard()));
}
