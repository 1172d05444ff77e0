// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Unitary accumulation.
//!
//! The composed action of a gate list is accumulated by expanding each gate
//! to the full `2^N x 2^N` operator and left-multiplying it into the
//! accumulator. Only the full-matrix strategy applies here: every gate's
//! operator is needed in its entirety.

use crate::circuit_matrix::CircuitMatrix;
use crate::gate::{Gate, GateError};
use crate::matrix::Matrix;

pub(crate) struct FullMatrixUnitary {
    pub expansion_workers: usize,
}

impl FullMatrixUnitary {
    /// Folds `gate` into the accumulated operator: `U ← E · U`.
    pub fn apply(
        &self,
        gate: &Gate,
        qubit_count: usize,
        accumulator: &Matrix,
    ) -> Result<Matrix, GateError> {
        let extracted = gate.extract(qubit_count)?;
        let expanded = CircuitMatrix::new(qubit_count, &extracted.matrix, &extracted.inputs)
            .expand(self.expansion_workers)
            .expect("expansion dimensions and workers are valid");
        Ok(expanded
            .multiplied_by(accumulator)
            .expect("the expanded operator matches the accumulator"))
    }
}
