// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::Transformation;
use crate::circuit_matrix::CircuitMatrix;
use crate::gate::{Gate, GateError};
use crate::vector::Vector;

/// Expands the gate to the full `2^N x 2^N` operator, then multiplies it
/// into the statevector.
pub(crate) struct FullMatrix {
    pub expansion_workers: usize,
}

impl Transformation for FullMatrix {
    fn transform(
        &self,
        gate: &Gate,
        qubit_count: usize,
        input: &Vector,
    ) -> Result<Vector, GateError> {
        let extracted = gate.extract(qubit_count)?;
        let expanded = CircuitMatrix::new(qubit_count, &extracted.matrix, &extracted.inputs)
            .expand(self.expansion_workers)
            .expect("expansion dimensions and workers are valid");
        let next = expanded
            .multiplied_by(input.as_matrix())
            .expect("the expanded operator matches the statevector length");
        Ok(next.into())
    }
}
