// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quil instructions and their text form.

use ndarray::Array2;
use num_complex::Complex64;
use std::fmt;

/// A single Quil instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `PRAGMA NAME "freeform"`
    Pragma {
        name: String,
        freeform: Option<String>,
    },
    /// `RESET`
    Reset,
    /// `DECLARE name BIT[size]`
    Declare { name: String, size: usize },
    /// `DEFGATE name:` followed by matrix rows
    DefGate {
        name: String,
        matrix: Array2<Complex64>,
    },
    /// Gate application, optionally `CONTROLLED`
    Gate {
        name: String,
        parameters: Vec<f64>,
        qubits: Vec<usize>,
        controlled: bool,
    },
    /// `MEASURE q register[index]`
    Measure {
        qubit: usize,
        register: String,
        index: usize,
    },
}

impl Instruction {
    /// Plain gate with no parameters.
    pub fn gate(name: &str, qubits: &[usize]) -> Self {
        Instruction::Gate {
            name: name.into(),
            parameters: Vec::new(),
            qubits: qubits.to_vec(),
            controlled: false,
        }
    }

    /// Parametric gate.
    pub fn parametric(name: &str, parameters: &[f64], qubits: &[usize]) -> Self {
        Instruction::Gate {
            name: name.into(),
            parameters: parameters.to_vec(),
            qubits: qubits.to_vec(),
            controlled: false,
        }
    }

    /// `CONTROLLED name(θ) control target`
    pub fn controlled(name: &str, parameter: f64, control: usize, target: usize) -> Self {
        Instruction::Gate {
            name: name.into(),
            parameters: vec![parameter],
            qubits: vec![control, target],
            controlled: true,
        }
    }

    /// Qubits this instruction touches.
    pub fn qubits(&self) -> &[usize] {
        match self {
            Instruction::Gate { qubits, .. } => qubits,
            Instruction::Measure { qubit, .. } => std::slice::from_ref(qubit),
            _ => &[],
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Pragma { name, freeform } => {
                write!(f, "PRAGMA {}", name)?;
                if let Some(text) = freeform {
                    write!(f, " \"{}\"", text)?;
                }
                Ok(())
            }
            Instruction::Reset => write!(f, "RESET"),
            Instruction::Declare { name, size } => write!(f, "DECLARE {} BIT[{}]", name, size),
            Instruction::DefGate { name, matrix } => {
                write!(f, "DEFGATE {}:", name)?;
                for row in matrix.rows() {
                    let cells: Vec<String> = row.iter().map(|z| format_complex(*z)).collect();
                    write!(f, "\n    {}", cells.join(", "))?;
                }
                Ok(())
            }
            Instruction::Gate {
                name,
                parameters,
                qubits,
                controlled,
            } => {
                if *controlled {
                    write!(f, "CONTROLLED ")?;
                }
                write!(f, "{}", name)?;
                if !parameters.is_empty() {
                    let params: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
                    write!(f, "({})", params.join(", "))?;
                }
                for q in qubits {
                    write!(f, " {}", q)?;
                }
                Ok(())
            }
            Instruction::Measure {
                qubit,
                register,
                index,
            } => write!(f, "MEASURE {} {}[{}]", qubit, register, index),
        }
    }
}

/// Quil complex literal: `1`, `-0.5i`, `0.5+0.5i`.
fn format_complex(z: Complex64) -> String {
    match (z.re, z.im) {
        (re, im) if im == 0.0 => format!("{}", re),
        (re, im) if re == 0.0 => format!("{}i", im),
        (re, im) if im < 0.0 => format!("{}-{}i", re, -im),
        (re, im) => format!("{}+{}i", re, im),
    }
}
