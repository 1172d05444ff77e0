// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Gate algebra.
//!
//! A [`Gate`] is a tagged value describing one step of a circuit: a raw
//! single- or multi-qubit matrix, or a controlled/oracle wrapper around
//! another gate. Wrappers recurse freely; [`Gate::extract`] validates the
//! whole tree against a circuit's qubit count and flattens it into the
//! effective matrix, the ordered input positions, and the control
//! activation set the evolution strategies consume.

use crate::matrix::Matrix;
use crate::{Complex, TOLERANCE};
use num_traits::{One, Zero};
use std::f64::consts::FRAC_1_SQRT_2;
use thiserror::Error;

/// Rotation axis for [`Gate::rotation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A gate validation error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GateError {
    /// A controlled or oracle gate was given no controls.
    #[error("controlled and oracle gates need at least one control")]
    EmptyControls,
    /// The same qubit appears more than once among inputs and controls.
    #[error("gate inputs {inputs:?} are not unique")]
    InputsNotUnique { inputs: Vec<usize> },
    /// An input or control lies outside the circuit.
    #[error("gate inputs {inputs:?} are out of bounds for a {qubit_count}-qubit circuit")]
    InputsOutOfBounds {
        inputs: Vec<usize>,
        qubit_count: usize,
    },
    /// The raw matrix row count is not a power of two.
    #[error("gate matrix row count {row_count} is not a power of two")]
    MatrixRowCountNotPowerOfTwo { row_count: usize },
    /// The number of inputs does not match the matrix size.
    #[error("gate matrix acts on {matrix_qubit_count} qubits but {input_count} inputs were provided")]
    InputCountMismatch {
        matrix_qubit_count: usize,
        input_count: usize,
    },
    /// The gate touches more qubits than the circuit has.
    #[error("gate handles {gate_qubit_count} qubits but the circuit only has {qubit_count}")]
    CircuitQubitCountExceeded {
        gate_qubit_count: usize,
        qubit_count: usize,
    },
    /// The raw matrix is not unitary.
    #[error("gate matrix is not unitary")]
    MatrixNotUnitary,
    /// A truth-table entry is empty or contains characters other than 0/1.
    #[error("truth-table entry `{entry}` is not a non-empty string of 0s and 1s")]
    MalformedTruthTableEntry { entry: String },
    /// A truth-table entry names more controls than the gate has.
    #[error("truth-table entries are wider than the {control_count} controls")]
    TruthTableTooWide { control_count: usize },
}

/// One step of a circuit.
#[derive(Clone, Debug, PartialEq)]
pub enum Gate {
    /// Pauli X on `target`.
    Not { target: usize },
    /// Hadamard on `target`.
    Hadamard { target: usize },
    /// Phase shift of the |1⟩ amplitude by `radians` on `target`.
    PhaseShift { radians: f64, target: usize },
    /// Rotation by `radians` around `axis` on `target`.
    Rotation {
        axis: Axis,
        radians: f64,
        target: usize,
    },
    /// A raw matrix over `inputs`; the first input is the most significant
    /// position of the matrix's row index.
    Matrix { matrix: Matrix, inputs: Vec<usize> },
    /// The inner gate, additionally conditioned on every control being 1.
    Controlled { gate: Box<Gate>, controls: Vec<usize> },
    /// The inner gate, conditioned on the joint control value matching one
    /// of the truth-table entries. The leftmost character of an entry is
    /// the first control in the list. An empty truth table never fires.
    Oracle {
        truth_table: Vec<String>,
        controls: Vec<usize>,
        gate: Box<Gate>,
    },
}

impl Gate {
    #[must_use]
    pub fn not(target: usize) -> Self {
        Gate::Not { target }
    }

    #[must_use]
    pub fn hadamard(target: usize) -> Self {
        Gate::Hadamard { target }
    }

    #[must_use]
    pub fn phase_shift(radians: f64, target: usize) -> Self {
        Gate::PhaseShift { radians, target }
    }

    #[must_use]
    pub fn rotation(axis: Axis, radians: f64, target: usize) -> Self {
        Gate::Rotation {
            axis,
            radians,
            target,
        }
    }

    #[must_use]
    pub fn matrix(matrix: Matrix, inputs: Vec<usize>) -> Self {
        Gate::Matrix { matrix, inputs }
    }

    #[must_use]
    pub fn controlled(gate: Gate, controls: Vec<usize>) -> Self {
        Gate::Controlled {
            gate: Box::new(gate),
            controls,
        }
    }

    #[must_use]
    pub fn oracle(truth_table: Vec<String>, controls: Vec<usize>, gate: Gate) -> Self {
        Gate::Oracle {
            truth_table,
            controls,
            gate: Box::new(gate),
        }
    }

    /// NOT on `target` conditioned on `control`.
    #[must_use]
    pub fn controlled_not(target: usize, control: usize) -> Self {
        Self::controlled(Self::not(target), vec![control])
    }

    /// One NOT per qubit in `targets`.
    pub fn not_range(targets: impl IntoIterator<Item = usize>) -> Vec<Self> {
        targets.into_iter().map(Self::not).collect()
    }

    /// One Hadamard per qubit in `targets`.
    pub fn hadamard_range(targets: impl IntoIterator<Item = usize>) -> Vec<Self> {
        targets.into_iter().map(Self::hadamard).collect()
    }

    /// One controlled NOT per qubit in `targets`, all on the same `control`.
    pub fn controlled_not_range(targets: impl IntoIterator<Item = usize>, control: usize) -> Vec<Self> {
        targets
            .into_iter()
            .map(|target| Self::controlled_not(target, control))
            .collect()
    }

    /// The small matrix of the innermost raw gate, before any controls are
    /// folded in.
    #[must_use]
    pub fn raw_matrix(&self) -> Matrix {
        match self {
            Gate::Not { .. } => pauli_x(),
            Gate::Hadamard { .. } => hadamard_matrix(),
            Gate::PhaseShift { radians, .. } => phase_shift_matrix(*radians),
            Gate::Rotation { axis, radians, .. } => rotation_matrix(*axis, *radians),
            Gate::Matrix { matrix, .. } => matrix.clone(),
            Gate::Controlled { gate, .. } | Gate::Oracle { gate, .. } => gate.raw_matrix(),
        }
    }

    /// The highest qubit position this gate touches, used to derive a
    /// default circuit width.
    #[must_use]
    pub(crate) fn highest_qubit(&self) -> usize {
        match self {
            Gate::Not { target }
            | Gate::Hadamard { target }
            | Gate::PhaseShift { target, .. }
            | Gate::Rotation { target, .. } => *target,
            Gate::Matrix { inputs, .. } => inputs.iter().copied().max().unwrap_or(0),
            Gate::Controlled { gate, controls } | Gate::Oracle { gate, controls, .. } => gate
                .highest_qubit()
                .max(controls.iter().copied().max().unwrap_or(0)),
        }
    }

    /// Validates this gate against a circuit of `qubit_count` qubits and
    /// flattens it into the pieces the evolution strategies consume.
    pub(crate) fn extract(&self, qubit_count: usize) -> Result<ExtractedGate, GateError> {
        let components = self.components()?;

        let row_count = components.matrix.row_count();
        if !row_count.is_power_of_two() || row_count < 2 {
            return Err(GateError::MatrixRowCountNotPowerOfTwo { row_count });
        }
        let matrix_qubit_count = row_count.trailing_zeros() as usize;
        if components.gate_inputs.len() != matrix_qubit_count {
            return Err(GateError::InputCountMismatch {
                matrix_qubit_count,
                input_count: components.gate_inputs.len(),
            });
        }

        let inputs: Vec<usize> = components
            .controls
            .iter()
            .chain(&components.gate_inputs)
            .copied()
            .collect();
        if inputs.len() > qubit_count {
            return Err(GateError::CircuitQubitCountExceeded {
                gate_qubit_count: inputs.len(),
                qubit_count,
            });
        }
        let mut sorted = inputs.clone();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.len() != inputs.len() {
            return Err(GateError::InputsNotUnique { inputs });
        }
        if inputs.iter().any(|&qubit| qubit >= qubit_count) {
            return Err(GateError::InputsOutOfBounds {
                inputs,
                qubit_count,
            });
        }

        if !components.matrix.is_approximately_unitary(TOLERANCE) {
            return Err(GateError::MatrixNotUnitary);
        }

        let control_count = components.controls.len();
        let mut activations = components.activations;
        activations.sort_unstable();
        activations.dedup();

        let matrix = if control_count == 0 {
            components.matrix
        } else {
            embed_with_controls(&components.matrix, control_count, &activations)
        };
        Ok(ExtractedGate {
            matrix,
            inputs,
            control_count,
            activations,
        })
    }

    /// Recursively flattens the wrapper cases: the innermost raw matrix, its
    /// inputs, the accumulated controls (outermost first), and the control
    /// values that fire the gate.
    fn components(&self) -> Result<Components, GateError> {
        match self {
            Gate::Controlled { gate, controls } => {
                if controls.is_empty() {
                    return Err(GateError::EmptyControls);
                }
                let inner = gate.components()?;
                let all_high = (1usize << controls.len()) - 1;
                Ok(inner.wrapped_by(controls, vec![all_high]))
            }
            Gate::Oracle {
                truth_table,
                controls,
                gate,
            } => {
                if controls.is_empty() {
                    return Err(GateError::EmptyControls);
                }
                let inner = gate.components()?;
                let activations = parse_truth_table(truth_table, controls.len())?;
                Ok(inner.wrapped_by(controls, activations))
            }
            raw => Ok(Components {
                matrix: raw.raw_matrix(),
                gate_inputs: raw.raw_inputs(),
                controls: Vec::new(),
                activations: Vec::new(),
            }),
        }
    }

    fn raw_inputs(&self) -> Vec<usize> {
        match self {
            Gate::Not { target }
            | Gate::Hadamard { target }
            | Gate::PhaseShift { target, .. }
            | Gate::Rotation { target, .. } => vec![*target],
            Gate::Matrix { inputs, .. } => inputs.clone(),
            Gate::Controlled { .. } | Gate::Oracle { .. } => {
                unreachable!("wrapper cases are flattened by `components`")
            }
        }
    }
}

/// A gate validated against a circuit's qubit count and flattened into the
/// pieces the evolution strategies consume.
#[derive(Clone, Debug)]
pub(crate) struct ExtractedGate {
    /// The effective matrix, controls folded in by block-identity embedding.
    pub matrix: Matrix,
    /// The qubit positions the matrix acts on, most significant first:
    /// controls, then the inner gate's inputs.
    pub inputs: Vec<usize>,
    /// How many leading entries of `inputs` are controls.
    pub control_count: usize,
    /// Control values that fire the gate, sorted. Empty with a nonzero
    /// control count means the gate never fires.
    pub activations: Vec<usize>,
}

impl ExtractedGate {
    /// Whether the joint control value `value` fires the gate.
    #[must_use]
    pub fn fires_on(&self, value: usize) -> bool {
        self.control_count == 0 || self.activations.binary_search(&value).is_ok()
    }

    /// The number of qubits the inner (uncontrolled) gate acts on.
    #[must_use]
    pub fn target_qubit_count(&self) -> usize {
        self.inputs.len() - self.control_count
    }
}

struct Components {
    matrix: Matrix,
    gate_inputs: Vec<usize>,
    controls: Vec<usize>,
    activations: Vec<usize>,
}

impl Components {
    /// Prepends an outer control layer: `outer_controls` become the most
    /// significant controls, and the outer activation values combine with
    /// the inner ones.
    fn wrapped_by(self, outer_controls: &[usize], outer_activations: Vec<usize>) -> Self {
        let inner_width = self.controls.len();
        let activations = if inner_width == 0 {
            outer_activations
        } else {
            let mut combined =
                Vec::with_capacity(outer_activations.len() * self.activations.len());
            for outer in &outer_activations {
                for inner in &self.activations {
                    combined.push((outer << inner_width) | inner);
                }
            }
            combined
        };

        let mut controls = outer_controls.to_vec();
        controls.extend(&self.controls);
        Self {
            matrix: self.matrix,
            gate_inputs: self.gate_inputs,
            controls,
            activations,
        }
    }
}

fn parse_truth_table(
    truth_table: &[String],
    control_count: usize,
) -> Result<Vec<usize>, GateError> {
    let mut activations = Vec::with_capacity(truth_table.len());
    for entry in truth_table {
        if entry.is_empty() || !entry.chars().all(|c| c == '0' || c == '1') {
            return Err(GateError::MalformedTruthTableEntry {
                entry: entry.clone(),
            });
        }
        if entry.len() > control_count {
            return Err(GateError::TruthTableTooWide { control_count });
        }
        let value = usize::from_str_radix(entry, 2).map_err(|_| {
            GateError::MalformedTruthTableEntry {
                entry: entry.clone(),
            }
        })?;
        activations.push(value);
    }
    Ok(activations)
}

/// Block-identity embedding of a raw gate matrix behind `control_count`
/// controls: for every control combination the block acting on the target
/// qubits is the identity, unless the combination is activated, in which
/// case it is the raw matrix. The result is unitary by construction.
fn embed_with_controls(raw: &Matrix, control_count: usize, activations: &[usize]) -> Matrix {
    let block = raw.row_count();
    let dimension = block << control_count;
    Matrix::build(dimension, dimension, 1, |row, column| {
        let (row_value, row_offset) = (row / block, row % block);
        let (column_value, column_offset) = (column / block, column % block);
        if row_value != column_value {
            Complex::zero()
        } else if activations.binary_search(&row_value).is_ok() {
            raw.at(row_offset, column_offset)
        } else if row_offset == column_offset {
            Complex::one()
        } else {
            Complex::zero()
        }
    })
    .expect("gate matrix should be valid")
}

fn pauli_x() -> Matrix {
    let zero = Complex::zero();
    let one = Complex::one();
    Matrix::from_rows(&[vec![zero, one], vec![one, zero]]).expect("gate matrix should be valid")
}

fn hadamard_matrix() -> Matrix {
    let f = Complex::new(FRAC_1_SQRT_2, 0.0);
    Matrix::from_rows(&[vec![f, f], vec![f, -f]]).expect("gate matrix should be valid")
}

fn phase_shift_matrix(radians: f64) -> Matrix {
    let zero = Complex::zero();
    let one = Complex::one();
    let phase = (Complex::i() * radians).exp();
    Matrix::from_rows(&[vec![one, zero], vec![zero, phase]]).expect("gate matrix should be valid")
}

fn rotation_matrix(axis: Axis, radians: f64) -> Matrix {
    let zero = Complex::zero();
    let i = Complex::i();
    let sin = Complex::new((radians / 2.0).sin(), 0.0);
    let cos = Complex::new((radians / 2.0).cos(), 0.0);
    let rows = match axis {
        Axis::X => [vec![cos, -i * sin], vec![-i * sin, cos]],
        Axis::Y => [vec![cos, -sin], vec![sin, cos]],
        Axis::Z => {
            let a = (-i * radians / 2.0).exp();
            let b = (i * radians / 2.0).exp();
            [vec![a, zero], vec![zero, b]]
        }
    };
    Matrix::from_rows(&rows).expect("gate matrix should be valid")
}
