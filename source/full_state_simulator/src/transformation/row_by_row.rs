// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::Transformation;
use crate::circuit_matrix::CircuitMatrix;
use crate::gate::{Gate, GateError};
use crate::vector::Vector;

/// Materializes one operator row at a time and dots it with the input
/// statevector. Never holds the `2^N x 2^N` operator.
pub(crate) struct RowByRow {
    pub calculation_workers: usize,
    pub expansion_workers: usize,
}

impl Transformation for RowByRow {
    fn transform(
        &self,
        gate: &Gate,
        qubit_count: usize,
        input: &Vector,
    ) -> Result<Vector, GateError> {
        let extracted = gate.extract(qubit_count)?;
        let expanded = CircuitMatrix::new(qubit_count, &extracted.matrix, &extracted.inputs);
        let next = Vector::build(expanded.dimension(), self.calculation_workers, |row| {
            expanded
                .row(row, self.expansion_workers)
                .expect("row dimensions and workers are valid")
                .dot(input)
        })
        .expect("output dimensions and workers are valid");
        Ok(next)
    }
}
