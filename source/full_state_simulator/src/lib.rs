// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! A full-state quantum circuit simulator.
//!
//! Given a circuit expressed as an ordered list of gates over N qubits, this
//! crate produces one of three artifacts: the final statevector obtained by
//! evolving an initial state through the gates, the final density matrix when
//! non-unitary noise operators are included, or the unitary matrix
//! representing the composed action of the gates.
//!
//! Gate application is pluggable: statevector evolution offers four
//! strategies under different memory/compute trade-offs (see
//! [`circuit::StatevectorConfiguration`]), each with bounded parallelism
//! controlled by explicit worker counts.

pub mod circuit;
mod circuit_matrix;
mod concurrency;
pub mod density;
pub mod gate;
pub mod matrix;
pub mod noise;
pub mod statevector;
mod transformation;
mod unitary;
pub mod vector;

/// The complex scalar every amplitude and matrix element is made of.
pub type Complex = nalgebra::Complex<f64>;

/// Absolute tolerance governing every approximate comparison in the crate:
/// matrix equality, unitarity and hermiticity checks, statevector
/// normalization, and density-matrix eigenvalue validation.
pub const TOLERANCE: f64 = 1e-10;

pub use circuit::{
    Circuit, CircuitError, CircuitFactory, ConfigurationError, DensityMatrixConfiguration,
    NoiseCircuit, NoiseCircuitFactory, StatevectorConfiguration, UnitaryConfiguration,
};
pub use density::{DensityMatrix, DensityMatrixError};
pub use gate::{Axis, Gate, GateError};
pub use matrix::{Matrix, MatrixError, Transposition};
pub use noise::{NoiseError, NoiseOperator};
pub use statevector::{Statevector, StatevectorError};
pub use vector::Vector;
