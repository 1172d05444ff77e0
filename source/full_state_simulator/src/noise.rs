// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Noise operators.
//!
//! A [`NoiseOperator`] is either a unitary [`Gate`] or a single-qubit noise
//! channel given by its Kraus operators, each parameterized by a
//! probability in `[0, 1]`. Channels fix their Kraus sets at construction:
//!
//! - Bit-flip: `{√(1−p)·I, √p·X}`
//! - Phase-flip: `{√(1−p)·I, √p·Z}`
//! - Depolarizing: `{√(1−p)·I, √(p/3)·X, √(p/3)·Y, √(p/3)·Z}`
//! - Amplitude-damping: `{[[1,0],[0,√(1−p)]], [[0,√p],[0,0]]}`
//! - Phase-damping: `{[[1,0],[0,√(1−p)]], [[0,0],[0,√p]]}`
//!
//! Kraus completeness (`ΣKᵢ*Kᵢ = I`) holds for every channel constructed
//! here but is not re-verified at runtime; a hand-rolled operator list
//! bypassing these constructors is trusted as-is.

use crate::gate::Gate;
use crate::matrix::Matrix;
use crate::Complex;
use num_traits::{One, Zero};
use thiserror::Error;

/// A noise-channel construction error.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NoiseError {
    /// The channel probability lies outside `[0, 1]`.
    #[error("channel probability must be in [0, 1], got {probability}")]
    ProbabilityOutOfRange { probability: f64 },
}

/// One step of a noise circuit.
#[derive(Clone, Debug, PartialEq)]
pub enum NoiseOperator {
    /// A unitary gate, applied as `UρU*`.
    Gate(Gate),
    /// Bit-flip channel with probability `probability` on `target`.
    BitFlip { probability: f64, target: usize },
    /// Phase-flip channel with probability `probability` on `target`.
    PhaseFlip { probability: f64, target: usize },
    /// Depolarizing channel with probability `probability` on `target`.
    Depolarizing { probability: f64, target: usize },
    /// Amplitude-damping channel with probability `probability` on `target`.
    AmplitudeDamping { probability: f64, target: usize },
    /// Phase-damping channel with probability `probability` on `target`.
    PhaseDamping { probability: f64, target: usize },
}

impl NoiseOperator {
    #[must_use]
    pub fn gate(gate: Gate) -> Self {
        NoiseOperator::Gate(gate)
    }

    pub fn bit_flip(probability: f64, target: usize) -> Result<Self, NoiseError> {
        check_probability(probability)?;
        Ok(NoiseOperator::BitFlip {
            probability,
            target,
        })
    }

    pub fn phase_flip(probability: f64, target: usize) -> Result<Self, NoiseError> {
        check_probability(probability)?;
        Ok(NoiseOperator::PhaseFlip {
            probability,
            target,
        })
    }

    pub fn depolarizing(probability: f64, target: usize) -> Result<Self, NoiseError> {
        check_probability(probability)?;
        Ok(NoiseOperator::Depolarizing {
            probability,
            target,
        })
    }

    pub fn amplitude_damping(probability: f64, target: usize) -> Result<Self, NoiseError> {
        check_probability(probability)?;
        Ok(NoiseOperator::AmplitudeDamping {
            probability,
            target,
        })
    }

    pub fn phase_damping(probability: f64, target: usize) -> Result<Self, NoiseError> {
        check_probability(probability)?;
        Ok(NoiseOperator::PhaseDamping {
            probability,
            target,
        })
    }

    /// The Kraus operators and target qubit of a channel; `None` for gates.
    pub(crate) fn kraus(&self) -> Option<(Vec<Matrix>, usize)> {
        match *self {
            NoiseOperator::Gate(_) => None,
            NoiseOperator::BitFlip {
                probability,
                target,
            } => Some((
                vec![
                    identity().scaled(real((1.0 - probability).sqrt())),
                    pauli_x().scaled(real(probability.sqrt())),
                ],
                target,
            )),
            NoiseOperator::PhaseFlip {
                probability,
                target,
            } => Some((
                vec![
                    identity().scaled(real((1.0 - probability).sqrt())),
                    pauli_z().scaled(real(probability.sqrt())),
                ],
                target,
            )),
            NoiseOperator::Depolarizing {
                probability,
                target,
            } => {
                let pauli_weight = real((probability / 3.0).sqrt());
                Some((
                    vec![
                        identity().scaled(real((1.0 - probability).sqrt())),
                        pauli_x().scaled(pauli_weight),
                        pauli_y().scaled(pauli_weight),
                        pauli_z().scaled(pauli_weight),
                    ],
                    target,
                ))
            }
            NoiseOperator::AmplitudeDamping {
                probability,
                target,
            } => Some((
                vec![
                    damping_survivor(probability),
                    from_rows(&[
                        [Complex::zero(), real(probability.sqrt())],
                        [Complex::zero(), Complex::zero()],
                    ]),
                ],
                target,
            )),
            NoiseOperator::PhaseDamping {
                probability,
                target,
            } => Some((
                vec![
                    damping_survivor(probability),
                    from_rows(&[
                        [Complex::zero(), Complex::zero()],
                        [Complex::zero(), real(probability.sqrt())],
                    ]),
                ],
                target,
            )),
        }
    }

    /// The highest qubit position this operator touches.
    #[must_use]
    pub(crate) fn highest_qubit(&self) -> usize {
        match self {
            NoiseOperator::Gate(gate) => gate.highest_qubit(),
            NoiseOperator::BitFlip { target, .. }
            | NoiseOperator::PhaseFlip { target, .. }
            | NoiseOperator::Depolarizing { target, .. }
            | NoiseOperator::AmplitudeDamping { target, .. }
            | NoiseOperator::PhaseDamping { target, .. } => *target,
        }
    }
}

fn check_probability(probability: f64) -> Result<(), NoiseError> {
    if (0.0..=1.0).contains(&probability) {
        Ok(())
    } else {
        Err(NoiseError::ProbabilityOutOfRange { probability })
    }
}

fn real(value: f64) -> Complex {
    Complex::new(value, 0.0)
}

fn from_rows(rows: &[[Complex; 2]; 2]) -> Matrix {
    Matrix::from_rows(&[rows[0].to_vec(), rows[1].to_vec()])
        .expect("channel matrix should be valid")
}

fn identity() -> Matrix {
    Matrix::identity(2).expect("channel matrix should be valid")
}

fn pauli_x() -> Matrix {
    from_rows(&[
        [Complex::zero(), Complex::one()],
        [Complex::one(), Complex::zero()],
    ])
}

fn pauli_y() -> Matrix {
    from_rows(&[
        [Complex::zero(), -Complex::i()],
        [Complex::i(), Complex::zero()],
    ])
}

fn pauli_z() -> Matrix {
    from_rows(&[
        [Complex::one(), Complex::zero()],
        [Complex::zero(), -Complex::one()],
    ])
}

/// `[[1, 0], [0, √(1−p)]]`, the no-event operator shared by the damping
/// channels.
fn damping_survivor(probability: f64) -> Matrix {
    from_rows(&[
        [Complex::one(), Complex::zero()],
        [Complex::zero(), real((1.0 - probability).sqrt())],
    ])
}
