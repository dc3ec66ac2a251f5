// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quil programs built from queued operations.

use std::collections::BTreeSet;
use std::fmt;

use crate::circuit::{Gate, Operation};

use super::instruction::Instruction;

/// Name of the readout register.
pub const READOUT: &str = "ro";

/// An ordered list of Quil instructions plus a shot count.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    instructions: Vec<Instruction>,
    num_shots: u32,
    defgates: usize,
}

impl Program {
    /// Empty program with one shot.
    pub fn new() -> Self {
        Self {
            instructions: Vec::new(),
            num_shots: 1,
            defgates: 0,
        }
    }

    /// Append an instruction.
    pub fn inst(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    /// Insert an instruction at the start.
    pub fn prepend(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.insert(0, instruction);
        self
    }

    /// Append the Quil form of `operation`.
    pub fn apply(&mut self, operation: &Operation) -> &mut Self {
        let w = operation.wires();
        match operation.gate() {
            Gate::Identity => self.inst(Instruction::gate("I", w)),
            Gate::PauliX => self.inst(Instruction::gate("X", w)),
            Gate::PauliY => self.inst(Instruction::gate("Y", w)),
            Gate::PauliZ => self.inst(Instruction::gate("Z", w)),
            Gate::Hadamard => self.inst(Instruction::gate("H", w)),
            Gate::S => self.inst(Instruction::gate("S", w)),
            Gate::T => self.inst(Instruction::gate("T", w)),
            Gate::Cnot => self.inst(Instruction::gate("CNOT", w)),
            Gate::Cz => self.inst(Instruction::gate("CZ", w)),
            Gate::Swap => self.inst(Instruction::gate("SWAP", w)),
            Gate::CSwap => self.inst(Instruction::gate("CSWAP", w)),
            Gate::Toffoli => self.inst(Instruction::gate("CCNOT", w)),
            Gate::ISwap => self.inst(Instruction::gate("ISWAP", w)),
            Gate::PSwap(theta) => self.inst(Instruction::parametric("PSWAP", &[*theta], w)),
            Gate::CPhase(theta) => self.inst(Instruction::parametric("CPHASE", &[*theta], w)),
            Gate::PhaseShift(phi) => self.inst(Instruction::parametric("PHASE", &[*phi], w)),
            Gate::Rx(theta) => self.inst(Instruction::parametric("RX", &[*theta], w)),
            Gate::Ry(theta) => self.inst(Instruction::parametric("RY", &[*theta], w)),
            Gate::Rz(theta) => self.inst(Instruction::parametric("RZ", &[*theta], w)),
            Gate::Rot { phi, theta, omega } => self
                .inst(Instruction::parametric("RZ", &[*phi], w))
                .inst(Instruction::parametric("RY", &[*theta], w))
                .inst(Instruction::parametric("RZ", &[*omega], w)),
            Gate::Crx(theta) => self.inst(Instruction::controlled("RX", *theta, w[0], w[1])),
            Gate::Cry(theta) => self.inst(Instruction::controlled("RY", *theta, w[0], w[1])),
            Gate::Crz(theta) => self.inst(Instruction::controlled("RZ", *theta, w[0], w[1])),
            Gate::QubitUnitary(matrix) => {
                let name = format!("QUBIT_UNITARY_{}", self.defgates);
                self.defgates += 1;
                self.inst(Instruction::DefGate {
                    name: name.clone(),
                    matrix: matrix.clone(),
                })
                .inst(Instruction::gate(&name, w))
            }
            Gate::BasisState(bits) => {
                for (&wire, _) in w.iter().zip(bits).filter(|&(_, &bit)| bit == 1) {
                    self.inst(Instruction::gate("X", &[wire]));
                }
                self
            }
        }
    }

    /// Qubits touched by any gate or measurement, ascending.
    pub fn get_qubits(&self) -> BTreeSet<usize> {
        self.instructions
            .iter()
            .flat_map(|inst| inst.qubits().iter().copied())
            .collect()
    }

    /// Declare a bit register.
    pub fn declare(&mut self, name: &str, size: usize) -> &mut Self {
        self.inst(Instruction::Declare {
            name: name.into(),
            size,
        })
    }

    /// Measure `qubit` into `ro[index]`.
    pub fn measure(&mut self, qubit: usize, index: usize) -> &mut Self {
        self.inst(Instruction::Measure {
            qubit,
            register: READOUT.into(),
            index,
        })
    }

    /// Run the program `shots` times.
    pub fn wrap_in_numshots_loop(&mut self, shots: u32) -> &mut Self {
        self.num_shots = shots;
        self
    }

    /// Number of trials requested.
    pub fn num_shots(&self) -> u32 {
        self.num_shots
    }

    /// Size of the `ro` register, zero if undeclared.
    pub fn readout_size(&self) -> usize {
        self.instructions
            .iter()
            .find_map(|inst| match inst {
                Instruction::Declare { name, size } if name == READOUT => Some(*size),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Instructions in order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True for a program with no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for inst in &self.instructions {
            writeln!(f, "{}", inst)?;
        }
        Ok(())
    }
}
