// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The circuit façade.
//!
//! A [`CircuitFactory`] fixes the evolution configurations once and builds
//! [`Circuit`] values over gate lists; a [`NoiseCircuitFactory`] does the
//! same for [`NoiseCircuit`] values over noise-operator lists. Evolution is
//! sequential over the list; parallelism lives inside a single gate's
//! application, bounded by the configured worker counts.
//!
//! Validation errors raised while applying a gate are wrapped as
//! [`CircuitError::GateFailed`] carrying the offending gate.

use crate::density::{DensityEvolution, DensityMatrix, DensityMatrixError};
use crate::gate::{Gate, GateError};
use crate::matrix::Matrix;
use crate::noise::NoiseOperator;
use crate::statevector::{Statevector, StatevectorError};
use crate::transformation::{Direct, ElementWise, FullMatrix, RowByRow, Transformation};
use crate::unitary::FullMatrixUnitary;
use crate::vector::Vector;
use crate::TOLERANCE;
use log::debug;
use thiserror::Error;

/// A strategy configuration error.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A worker count of zero was requested.
    #[error("worker counts must be at least one")]
    ZeroConcurrency,
}

/// An error produced while evolving a circuit.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CircuitError {
    /// A gate failed validation or application.
    #[error("gate {gate:?} failed: {source}")]
    GateFailed { gate: Gate, source: GateError },
    /// A noise channel names a qubit outside the circuit.
    #[error("noise channel target {target} is out of bounds for a {qubit_count}-qubit circuit")]
    ChannelTargetOutOfBounds { target: usize, qubit_count: usize },
    /// The unitary of an empty circuit was requested.
    #[error("cannot compute the unitary of an empty circuit")]
    EmptyCircuit,
    /// A circuit needs at least one qubit.
    #[error("a circuit needs at least one qubit")]
    NoQubits,
    /// Accumulated floating-point drift broke the unitarity of the result.
    #[error("the resulting matrix drifted away from unitarity")]
    ResultingMatrixNotUnitary,
    /// Accumulated floating-point drift broke the normalization of the
    /// resulting statevector.
    #[error("the resulting statevector is no longer normalized")]
    PrecisionLoss,
    /// An invalid initial or resulting statevector.
    #[error(transparent)]
    Statevector(#[from] StatevectorError),
    /// An invalid initial or resulting density matrix.
    #[error(transparent)]
    DensityMatrix(#[from] DensityMatrixError),
}

/// How the unitary accumulator materializes expanded gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitaryConfiguration {
    expansion_workers: usize,
}

impl UnitaryConfiguration {
    /// Full expansion of every gate, fanning rows across
    /// `expansion_workers`.
    pub fn matrix(expansion_workers: usize) -> Result<Self, ConfigurationError> {
        check_workers(&[expansion_workers])?;
        Ok(Self { expansion_workers })
    }
}

/// How statevector evolution applies each gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatevectorConfiguration {
    strategy: StatevectorStrategy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StatevectorStrategy {
    Matrix {
        expansion_workers: usize,
    },
    Row {
        calculation_workers: usize,
        expansion_workers: usize,
    },
    Value {
        calculation_workers: usize,
    },
    Direct {
        calculation_workers: usize,
    },
}

impl StatevectorConfiguration {
    /// Full-matrix strategy: expand each gate entirely, then multiply.
    pub fn matrix(expansion_workers: usize) -> Result<Self, ConfigurationError> {
        check_workers(&[expansion_workers])?;
        Ok(Self {
            strategy: StatevectorStrategy::Matrix { expansion_workers },
        })
    }

    /// Row-by-row strategy: `calculation_workers` across output indices,
    /// `expansion_workers` across each materialized operator row.
    pub fn row(
        calculation_workers: usize,
        expansion_workers: usize,
    ) -> Result<Self, ConfigurationError> {
        check_workers(&[calculation_workers, expansion_workers])?;
        Ok(Self {
            strategy: StatevectorStrategy::Row {
                calculation_workers,
                expansion_workers,
            },
        })
    }

    /// Element-by-element strategy: operator elements are read on demand,
    /// so only the calculation worker count applies.
    pub fn value(calculation_workers: usize) -> Result<Self, ConfigurationError> {
        check_workers(&[calculation_workers])?;
        Ok(Self {
            strategy: StatevectorStrategy::Value {
                calculation_workers,
            },
        })
    }

    /// Direct strategy: only contributing columns are summed and
    /// passthrough rows are copied, so only the calculation worker count
    /// applies.
    pub fn direct(calculation_workers: usize) -> Result<Self, ConfigurationError> {
        check_workers(&[calculation_workers])?;
        Ok(Self {
            strategy: StatevectorStrategy::Direct {
                calculation_workers,
            },
        })
    }
}

/// How density-matrix evolution materializes expanded Kraus operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DensityMatrixConfiguration {
    strategy: DensityStrategy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DensityStrategy {
    Matrix {
        expansion_workers: usize,
    },
    Row {
        calculation_workers: usize,
        expansion_workers: usize,
    },
}

impl DensityMatrixConfiguration {
    /// Full expansion of every Kraus operator.
    pub fn matrix(expansion_workers: usize) -> Result<Self, ConfigurationError> {
        check_workers(&[expansion_workers])?;
        Ok(Self {
            strategy: DensityStrategy::Matrix { expansion_workers },
        })
    }

    /// Row-at-a-time expansion of every Kraus operator.
    pub fn row(
        calculation_workers: usize,
        expansion_workers: usize,
    ) -> Result<Self, ConfigurationError> {
        check_workers(&[calculation_workers, expansion_workers])?;
        Ok(Self {
            strategy: DensityStrategy::Row {
                calculation_workers,
                expansion_workers,
            },
        })
    }

    fn evolution(self) -> DensityEvolution {
        match self.strategy {
            DensityStrategy::Matrix { expansion_workers } => DensityEvolution::FullMatrix {
                expansion_workers,
            },
            DensityStrategy::Row {
                calculation_workers,
                expansion_workers,
            } => DensityEvolution::RowByRow {
                calculation_workers,
                expansion_workers,
            },
        }
    }
}

fn check_workers(workers: &[usize]) -> Result<(), ConfigurationError> {
    if workers.contains(&0) {
        Err(ConfigurationError::ZeroConcurrency)
    } else {
        Ok(())
    }
}

/// Builds circuits sharing one unitary and one statevector configuration.
#[derive(Clone, Copy, Debug)]
pub struct CircuitFactory {
    unitary: UnitaryConfiguration,
    statevector: StatevectorConfiguration,
}

impl CircuitFactory {
    #[must_use]
    pub fn new(unitary: UnitaryConfiguration, statevector: StatevectorConfiguration) -> Self {
        Self {
            unitary,
            statevector,
        }
    }

    #[must_use]
    pub fn circuit(&self, gates: Vec<Gate>) -> Circuit {
        Circuit {
            gates,
            unitary: self.unitary,
            statevector: self.statevector,
        }
    }
}

/// Builds noise circuits sharing one density-matrix configuration.
#[derive(Clone, Copy, Debug)]
pub struct NoiseCircuitFactory {
    density_matrix: DensityMatrixConfiguration,
}

impl NoiseCircuitFactory {
    #[must_use]
    pub fn new(density_matrix: DensityMatrixConfiguration) -> Self {
        Self { density_matrix }
    }

    #[must_use]
    pub fn noise_circuit(&self, operators: Vec<NoiseOperator>) -> NoiseCircuit {
        NoiseCircuit {
            operators,
            configuration: self.density_matrix,
        }
    }
}

/// An ordered gate list with configured evolution strategies.
#[derive(Clone, Debug)]
pub struct Circuit {
    gates: Vec<Gate>,
    unitary: UnitaryConfiguration,
    statevector: StatevectorConfiguration,
}

impl Circuit {
    #[must_use]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Evolves |0…0⟩ through the gates; the circuit width is one past the
    /// highest qubit any gate touches.
    pub fn statevector(&self) -> Result<Statevector, CircuitError> {
        let initial = Statevector::from_bit_string(&"0".repeat(self.qubit_span()))?;
        self.statevector_from(&initial)
    }

    /// Evolves `initial` through the gates, returning the final statevector
    /// or the first error encountered.
    pub fn statevector_from(&self, initial: &Statevector) -> Result<Statevector, CircuitError> {
        let qubit_count = initial.qubit_count();
        let mut state = initial.vector().clone();
        for gate in &self.gates {
            debug!("applying {gate:?} over {qubit_count} qubits");
            state = self
                .transform(gate, qubit_count, &state)
                .map_err(|source| CircuitError::GateFailed {
                    gate: gate.clone(),
                    source,
                })?;
        }
        match Statevector::from_vector(state) {
            Ok(statevector) => Ok(statevector),
            Err(StatevectorError::NormNotOne { .. }) => Err(CircuitError::PrecisionLoss),
            Err(error) => Err(error.into()),
        }
    }

    /// The composed `2^qubit_count x 2^qubit_count` unitary of the gates.
    pub fn unitary(&self, qubit_count: usize) -> Result<Matrix, CircuitError> {
        if qubit_count == 0 {
            return Err(CircuitError::NoQubits);
        }
        if self.gates.is_empty() {
            return Err(CircuitError::EmptyCircuit);
        }
        let strategy = FullMatrixUnitary {
            expansion_workers: self.unitary.expansion_workers,
        };
        let mut accumulator =
            Matrix::identity(1 << qubit_count).expect("the dimension is positive");
        for gate in &self.gates {
            debug!("folding {gate:?} into the unitary");
            accumulator = strategy
                .apply(gate, qubit_count, &accumulator)
                .map_err(|source| CircuitError::GateFailed {
                    gate: gate.clone(),
                    source,
                })?;
        }
        if !accumulator.is_approximately_unitary(TOLERANCE) {
            return Err(CircuitError::ResultingMatrixNotUnitary);
        }
        Ok(accumulator)
    }

    fn qubit_span(&self) -> usize {
        self.gates
            .iter()
            .map(Gate::highest_qubit)
            .max()
            .map_or(1, |highest| highest + 1)
    }

    fn transform(
        &self,
        gate: &Gate,
        qubit_count: usize,
        state: &Vector,
    ) -> Result<Vector, GateError> {
        match self.statevector.strategy {
            StatevectorStrategy::Matrix { expansion_workers } => FullMatrix { expansion_workers }
                .transform(gate, qubit_count, state),
            StatevectorStrategy::Row {
                calculation_workers,
                expansion_workers,
            } => RowByRow {
                calculation_workers,
                expansion_workers,
            }
            .transform(gate, qubit_count, state),
            StatevectorStrategy::Value {
                calculation_workers,
            } => ElementWise {
                calculation_workers,
            }
            .transform(gate, qubit_count, state),
            StatevectorStrategy::Direct {
                calculation_workers,
            } => Direct {
                calculation_workers,
            }
            .transform(gate, qubit_count, state),
        }
    }
}

/// An ordered noise-operator list with a configured evolution strategy.
#[derive(Clone, Debug)]
pub struct NoiseCircuit {
    operators: Vec<NoiseOperator>,
    configuration: DensityMatrixConfiguration,
}

impl NoiseCircuit {
    #[must_use]
    pub fn operators(&self) -> &[NoiseOperator] {
        &self.operators
    }

    /// Evolves |0…0⟩⟨0…0| through the operators; the circuit width is one
    /// past the highest qubit any operator touches.
    pub fn density_matrix(&self) -> Result<DensityMatrix, CircuitError> {
        let span = self
            .operators
            .iter()
            .map(NoiseOperator::highest_qubit)
            .max()
            .map_or(1, |highest| highest + 1);
        let initial =
            DensityMatrix::from_pure_state(&Statevector::from_bit_string(&"0".repeat(span))?);
        self.density_matrix_from(&initial)
    }

    /// Evolves `initial` through the operators, validating the final state.
    pub fn density_matrix_from(
        &self,
        initial: &DensityMatrix,
    ) -> Result<DensityMatrix, CircuitError> {
        let qubit_count = initial.qubit_count();
        let evolution = self.configuration.evolution();
        let mut rho = initial.matrix().clone();
        for operator in &self.operators {
            debug!("applying {operator:?} over {qubit_count} qubits");
            rho = match operator {
                NoiseOperator::Gate(gate) => {
                    let extracted =
                        gate.extract(qubit_count)
                            .map_err(|source| CircuitError::GateFailed {
                                gate: gate.clone(),
                                source,
                            })?;
                    evolution.apply(
                        std::slice::from_ref(&extracted.matrix),
                        &extracted.inputs,
                        qubit_count,
                        &rho,
                    )
                }
                channel => {
                    let (operators, target) =
                        channel.kraus().expect("non-gate operators are channels");
                    if target >= qubit_count {
                        return Err(CircuitError::ChannelTargetOutOfBounds {
                            target,
                            qubit_count,
                        });
                    }
                    evolution.apply(&operators, &[target], qubit_count, &rho)
                }
            };
        }
        Ok(DensityMatrix::from_matrix(rho)?)
    }
}
