// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Observables and measurement requests.

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{Error, Result, ValidationError};
use crate::validation::{validate_distinct, validate_hermitian};

/// Observables the device can estimate.
#[derive(Debug, Clone, PartialEq)]
pub enum Observable {
    /// Identity
    Identity,
    /// Pauli X
    PauliX,
    /// Pauli Y
    PauliY,
    /// Pauli Z
    PauliZ,
    /// Hadamard
    Hadamard,
    /// Arbitrary Hermitian matrix, first wire most significant
    Hermitian(Array2<Complex64>),
}

impl Observable {
    /// Parse a frontend observable name.
    pub fn from_name(name: &str, matrix: Option<Array2<Complex64>>) -> Result<Self> {
        match name {
            "Identity" => Ok(Observable::Identity),
            "PauliX" => Ok(Observable::PauliX),
            "PauliY" => Ok(Observable::PauliY),
            "PauliZ" => Ok(Observable::PauliZ),
            "Hadamard" => Ok(Observable::Hadamard),
            "Hermitian" => matrix.map(Observable::Hermitian).ok_or_else(|| {
                ValidationError::Field {
                    field: "matrix".into(),
                    message: "Hermitian observable requires a matrix".into(),
                }
                .into()
            }),
            other => Err(Error::UnsupportedObservable(format!(
                "observable {} is not supported on this device",
                other
            ))),
        }
    }

    /// Frontend name.
    pub fn name(&self) -> &'static str {
        match self {
            Observable::Identity => "Identity",
            Observable::PauliX => "PauliX",
            Observable::PauliY => "PauliY",
            Observable::PauliZ => "PauliZ",
            Observable::Hadamard => "Hadamard",
            Observable::Hermitian(_) => "Hermitian",
        }
    }
}

/// An observable bound to the wires it is measured on.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservableRequest {
    observable: Observable,
    wires: Vec<usize>,
}

impl ObservableRequest {
    /// Bind `observable` to `wires`.
    ///
    /// Only Hermitian observables may span more than one wire.
    pub fn new(observable: Observable, wires: Vec<usize>) -> Result<Self> {
        validate_distinct("wires", &wires)?;
        match &observable {
            Observable::Hermitian(matrix) => validate_hermitian(matrix, wires.len())?,
            other if wires.len() > 1 => {
                return Err(Error::UnsupportedObservable(format!(
                    "{} on {} wires; only Hermitian observables may act on multiple wires",
                    other.name(),
                    wires.len()
                )))
            }
            _ => {}
        }
        Ok(Self { observable, wires })
    }

    /// The observable.
    pub fn observable(&self) -> &Observable {
        &self.observable
    }

    /// Measured wires.
    pub fn wires(&self) -> &[usize] {
        &self.wires
    }
}
