// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Validated statevectors.
//!
//! A [`Statevector`] is a complex vector whose length is a power of two and
//! whose squared moduli add up to one within tolerance. Qubit 0 is the
//! least significant bit of a basis-state index: the amplitude of |01⟩ in a
//! two-qubit state lives at index 1.

use crate::matrix::format_complex;
use crate::vector::Vector;
use crate::{Complex, TOLERANCE};
use num_traits::{One, Zero};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;
use thiserror::Error;

/// A statevector validation error.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StatevectorError {
    /// The vector length is not a power of two (or is shorter than one
    /// qubit's worth of amplitudes).
    #[error("statevector length {length} is not a power of two")]
    LengthNotPowerOfTwo { length: usize },
    /// The squared moduli do not add up to one within tolerance.
    #[error("the squared moduli of a statevector must add up to one, got {squared_norm}")]
    NormNotOne { squared_norm: f64 },
    /// A bit-string constructor was given something other than 0s and 1s.
    #[error("bit string `{value}` must be a non-empty string of 0s and 1s")]
    MalformedBitString { value: String },
}

/// A validated quantum state over `qubit_count` qubits.
#[derive(Clone, Debug, PartialEq)]
pub struct Statevector {
    vector: Vector,
}

impl Statevector {
    /// Validates a raw vector as a statevector.
    pub fn from_vector(vector: Vector) -> Result<Self, StatevectorError> {
        let length = vector.count();
        if length < 2 || !length.is_power_of_two() {
            return Err(StatevectorError::LengthNotPowerOfTwo { length });
        }
        let squared_norm = vector.squared_norm();
        if (squared_norm - 1.0).abs() > TOLERANCE {
            return Err(StatevectorError::NormNotOne { squared_norm });
        }
        Ok(Self { vector })
    }

    /// The one-hot state |bits⟩. The leftmost character is the
    /// highest-index qubit.
    pub fn from_bit_string(bits: &str) -> Result<Self, StatevectorError> {
        if bits.is_empty() || !bits.chars().all(|c| c == '0' || c == '1') {
            return Err(StatevectorError::MalformedBitString { value: bits.into() });
        }
        let index = usize::from_str_radix(bits, 2).map_err(|_| {
            StatevectorError::MalformedBitString { value: bits.into() }
        })?;
        let values = (0..1usize << bits.len())
            .map(|position| {
                if position == index {
                    Complex::one()
                } else {
                    Complex::zero()
                }
            })
            .collect();
        Ok(Self {
            vector: Vector::from_values(values).expect("a bit string has at least one qubit"),
        })
    }

    #[must_use]
    pub fn qubit_count(&self) -> usize {
        self.vector.count().trailing_zeros() as usize
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.vector.count()
    }

    #[must_use]
    pub fn vector(&self) -> &Vector {
        &self.vector
    }

    /// The probability of reading each basis state.
    #[must_use]
    pub fn probabilities(&self) -> Vec<f64> {
        (0..self.count()).map(|index| self[index].norm_sqr()).collect()
    }

    /// Basis states with non-negligible probability, keyed by bit string.
    #[must_use]
    pub fn summarized_probabilities(&self) -> BTreeMap<String, f64> {
        let width = self.qubit_count();
        self.probabilities()
            .into_iter()
            .enumerate()
            .filter(|(_, probability)| *probability > TOLERANCE)
            .map(|(index, probability)| (format!("{index:0width$b}"), probability))
            .collect()
    }

    /// Elementwise equality within an absolute tolerance.
    #[must_use]
    pub fn is_approximately_equal(&self, other: &Self, tolerance: f64) -> bool {
        self.vector.is_approximately_equal(&other.vector, tolerance)
    }
}

impl Index<usize> for Statevector {
    type Output = Complex;

    fn index(&self, index: usize) -> &Complex {
        &self.vector[index]
    }
}

impl fmt::Display for Statevector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.qubit_count();
        for index in 0..self.count() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "|{index:0width$b}⟩: {}", format_complex(self[index]))?;
        }
        Ok(())
    }
}
