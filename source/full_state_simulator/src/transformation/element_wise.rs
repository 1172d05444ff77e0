// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::Transformation;
use crate::circuit_matrix::CircuitMatrix;
use crate::gate::{Gate, GateError};
use crate::vector::Vector;
use crate::Complex;
use num_traits::Zero;

/// Reads operator elements on demand, accumulating `E[r, c] * v[c]` per
/// output index. Expansion concurrency is meaningless here: no row is ever
/// materialized.
pub(crate) struct ElementWise {
    pub calculation_workers: usize,
}

impl Transformation for ElementWise {
    fn transform(
        &self,
        gate: &Gate,
        qubit_count: usize,
        input: &Vector,
    ) -> Result<Vector, GateError> {
        let extracted = gate.extract(qubit_count)?;
        let expanded = CircuitMatrix::new(qubit_count, &extracted.matrix, &extracted.inputs);
        let dimension = expanded.dimension();
        let next = Vector::build(dimension, self.calculation_workers, |row| {
            (0..dimension).fold(Complex::zero(), |sum, column| {
                sum + expanded.at(row, column) * input[column]
            })
        })
        .expect("output dimensions and workers are valid");
        Ok(next)
    }
}
