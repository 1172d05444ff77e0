// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::Transformation;
use crate::circuit_matrix::CircuitMatrix;
use crate::gate::{Gate, GateError};
use crate::vector::Vector;
use crate::Complex;
use num_traits::Zero;

/// Exploits the structure of the expanded operator instead of reading it.
///
/// Only columns that agree with an output row on every untouched bit can
/// contribute to it, and for controlled gates a row whose control bits do
/// not satisfy the activation set passes its input amplitude through
/// unchanged. Each recomputed output sums `2^k` terms for a `k`-qubit
/// target block, independently of the circuit width.
pub(crate) struct Direct {
    pub calculation_workers: usize,
}

impl Transformation for Direct {
    fn transform(
        &self,
        gate: &Gate,
        qubit_count: usize,
        input: &Vector,
    ) -> Result<Vector, GateError> {
        let extracted = gate.extract(qubit_count)?;
        let expanded = CircuitMatrix::new(qubit_count, &extracted.matrix, &extracted.inputs);
        let target_count = extracted.target_qubit_count();
        let target_dimension = 1usize << target_count;

        let next = Vector::build(expanded.dimension(), self.calculation_workers, |row| {
            let base_row = expanded.base_index(row);
            let control_value = base_row >> target_count;
            if !extracted.fires_on(control_value) {
                return input[row];
            }
            let mut sum = Complex::zero();
            for offset in 0..target_dimension {
                let base_column = (control_value << target_count) | offset;
                let column = expanded.with_base_index(row, base_column);
                sum += extracted.matrix.at(base_row, base_column) * input[column];
            }
            sum
        })
        .expect("output dimensions and workers are valid");
        Ok(next)
    }
}
