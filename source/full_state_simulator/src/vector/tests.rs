// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::Vector;
use crate::matrix::MatrixError;
use crate::Complex;

fn c(re: f64, im: f64) -> Complex {
    Complex::new(re, im)
}

#[test]
fn construction_keeps_entry_order() {
    let vector =
        Vector::from_values(vec![c(1.0, 0.0), c(0.0, 1.0), c(-2.0, 0.5)]).expect("vector is valid");
    assert_eq!(3, vector.count());
    assert_eq!(c(1.0, 0.0), vector.at(0));
    assert_eq!(c(0.0, 1.0), vector[1]);
    assert_eq!(c(-2.0, 0.5), vector[2]);
}

#[test]
fn construction_rejects_empty_input() {
    assert_eq!(Err(MatrixError::EmptyRows), Vector::from_values(vec![]));
}

#[test]
fn squared_norm_sums_squared_moduli() {
    let vector = Vector::from_values(vec![c(3.0, 4.0), c(0.0, 2.0)]).expect("vector is valid");
    assert!((vector.squared_norm() - 29.0).abs() < f64::EPSILON);
}

#[test]
fn dot_multiplies_without_conjugating() {
    let lhs = Vector::from_values(vec![c(0.0, 1.0), c(2.0, 0.0)]).expect("vector is valid");
    let rhs = Vector::from_values(vec![c(0.0, 1.0), c(3.0, 0.0)]).expect("vector is valid");
    assert_eq!(c(5.0, 0.0), lhs.dot(&rhs));
}

#[test]
fn parallel_and_serial_builds_agree() {
    #[allow(clippy::cast_precision_loss)]
    let value = |index: usize| c(index as f64, -(index as f64));
    let serial = Vector::build(100, 1, value).expect("vector is valid");
    for workers in [2, 7, 100] {
        assert_eq!(serial, Vector::build(100, workers, value).expect("vector is valid"));
    }
}
