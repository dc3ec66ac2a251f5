// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Gates and queued operations.

use ndarray::Array2;
use num_complex::Complex64;
use std::fmt;

use crate::error::{Error, Result, ValidationError};
use crate::validation::{validate_distinct, validate_unitary};

/// Gate set understood by the device.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
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
    /// Phase gate
    S,
    /// π/8 gate
    T,
    /// Controlled NOT
    Cnot,
    /// Controlled Z
    Cz,
    /// Swap
    Swap,
    /// Controlled swap (Fredkin)
    CSwap,
    /// Doubly controlled NOT
    Toffoli,
    /// iSWAP
    ISwap,
    /// Parametric swap
    PSwap(f64),
    /// Controlled phase
    CPhase(f64),
    /// Single-qubit phase shift
    PhaseShift(f64),
    /// X rotation
    Rx(f64),
    /// Y rotation
    Ry(f64),
    /// Z rotation
    Rz(f64),
    /// RZ(ω)·RY(θ)·RZ(φ)
    Rot { phi: f64, theta: f64, omega: f64 },
    /// Controlled X rotation
    Crx(f64),
    /// Controlled Y rotation
    Cry(f64),
    /// Controlled Z rotation
    Crz(f64),
    /// Arbitrary unitary, first wire most significant
    QubitUnitary(Array2<Complex64>),
    /// Prepare a computational basis state from |0…0⟩
    BasisState(Vec<u8>),
}

impl Gate {
    /// Build a gate from its frontend name.
    ///
    /// `params` carries rotation angles, or the bits of a `BasisState`.
    /// `matrix` is required by `QubitUnitary` and ignored otherwise.
    pub fn from_name(name: &str, params: &[f64], matrix: Option<Array2<Complex64>>) -> Result<Self> {
        let gate = match name {
            "Identity" => Gate::Identity,
            "PauliX" => Gate::PauliX,
            "PauliY" => Gate::PauliY,
            "PauliZ" => Gate::PauliZ,
            "Hadamard" => Gate::Hadamard,
            "S" => Gate::S,
            "T" => Gate::T,
            "CNOT" => Gate::Cnot,
            "CZ" => Gate::Cz,
            "SWAP" => Gate::Swap,
            "CSWAP" => Gate::CSwap,
            "Toffoli" => Gate::Toffoli,
            "ISWAP" => Gate::ISwap,
            "PSWAP" => Gate::PSwap(angle(name, params, 0)?),
            "CPHASE" => Gate::CPhase(angle(name, params, 0)?),
            "PhaseShift" => Gate::PhaseShift(angle(name, params, 0)?),
            "RX" => Gate::Rx(angle(name, params, 0)?),
            "RY" => Gate::Ry(angle(name, params, 0)?),
            "RZ" => Gate::Rz(angle(name, params, 0)?),
            "Rot" => Gate::Rot {
                phi: angle(name, params, 0)?,
                theta: angle(name, params, 1)?,
                omega: angle(name, params, 2)?,
            },
            "CRX" => Gate::Crx(angle(name, params, 0)?),
            "CRY" => Gate::Cry(angle(name, params, 0)?),
            "CRZ" => Gate::Crz(angle(name, params, 0)?),
            "QubitUnitary" => Gate::QubitUnitary(matrix.ok_or_else(|| ValidationError::Field {
                field: "matrix".into(),
                message: "QubitUnitary requires a matrix".into(),
            })?),
            "BasisState" => Gate::BasisState(basis_bits(params)?),
            other => {
                return Err(ValidationError::Field {
                    field: "name".into(),
                    message: format!("operation {} is not supported on this device", other),
                }
                .into())
            }
        };
        Ok(gate)
    }

    /// Frontend name of the gate.
    pub fn name(&self) -> &'static str {
        match self {
            Gate::Identity => "Identity",
            Gate::PauliX => "PauliX",
            Gate::PauliY => "PauliY",
            Gate::PauliZ => "PauliZ",
            Gate::Hadamard => "Hadamard",
            Gate::S => "S",
            Gate::T => "T",
            Gate::Cnot => "CNOT",
            Gate::Cz => "CZ",
            Gate::Swap => "SWAP",
            Gate::CSwap => "CSWAP",
            Gate::Toffoli => "Toffoli",
            Gate::ISwap => "ISWAP",
            Gate::PSwap(_) => "PSWAP",
            Gate::CPhase(_) => "CPHASE",
            Gate::PhaseShift(_) => "PhaseShift",
            Gate::Rx(_) => "RX",
            Gate::Ry(_) => "RY",
            Gate::Rz(_) => "RZ",
            Gate::Rot { .. } => "Rot",
            Gate::Crx(_) => "CRX",
            Gate::Cry(_) => "CRY",
            Gate::Crz(_) => "CRZ",
            Gate::QubitUnitary(_) => "QubitUnitary",
            Gate::BasisState(_) => "BasisState",
        }
    }

    /// Number of wires the gate acts on.
    ///
    /// Derived from the payload for `QubitUnitary` and `BasisState`.
    pub fn num_wires(&self) -> usize {
        match self {
            Gate::Identity
            | Gate::PauliX
            | Gate::PauliY
            | Gate::PauliZ
            | Gate::Hadamard
            | Gate::S
            | Gate::T
            | Gate::PhaseShift(_)
            | Gate::Rx(_)
            | Gate::Ry(_)
            | Gate::Rz(_)
            | Gate::Rot { .. } => 1,
            Gate::Cnot
            | Gate::Cz
            | Gate::Swap
            | Gate::ISwap
            | Gate::PSwap(_)
            | Gate::CPhase(_)
            | Gate::Crx(_)
            | Gate::Cry(_)
            | Gate::Crz(_) => 2,
            Gate::CSwap | Gate::Toffoli => 3,
            Gate::QubitUnitary(m) => m.nrows().max(1).trailing_zeros() as usize,
            Gate::BasisState(bits) => bits.len(),
        }
    }
}

fn angle(name: &str, params: &[f64], index: usize) -> Result<f64> {
    let value = params.get(index).copied().ok_or_else(|| ValidationError::Field {
        field: "params".into(),
        message: format!("{} expects at least {} parameter(s)", name, index + 1),
    })?;
    if !value.is_finite() {
        return Err(ValidationError::Field {
            field: "params".into(),
            message: format!("{} parameter {} is not finite", name, index),
        }
        .into());
    }
    Ok(value)
}

fn basis_bits(params: &[f64]) -> Result<Vec<u8>> {
    params
        .iter()
        .map(|&p| match p {
            p if p == 0.0 => Ok(0),
            p if p == 1.0 => Ok(1),
            _ => Err(Error::Validation(ValidationError::Field {
                field: "params".into(),
                message: format!("BasisState only accepts 0 or 1, got {}", p),
            })),
        })
        .collect()
}

/// A gate bound to the wires it acts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    gate: Gate,
    wires: Vec<usize>,
}

impl Operation {
    /// Bind `gate` to `wires`, checking arity, distinctness and, for
    /// `QubitUnitary`, unitarity.
    pub fn new(gate: Gate, wires: Vec<usize>) -> Result<Self> {
        if let Gate::QubitUnitary(matrix) = &gate {
            validate_unitary(matrix, wires.len())?;
        }
        if gate.num_wires() != wires.len() {
            return Err(ValidationError::Field {
                field: "wires".into(),
                message: format!(
                    "{} acts on {} wire(s), got {}",
                    gate.name(),
                    gate.num_wires(),
                    wires.len()
                ),
            }
            .into());
        }
        validate_distinct("wires", &wires)?;
        Ok(Self { gate, wires })
    }

    /// The gate.
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Wires in the order the gate sees them.
    pub fn wires(&self) -> &[usize] {
        &self.wires
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.gate.name(), self.wires)
    }
}
