// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quil program representation.
//!
//! Only the subset of Quil the device emits is modelled: gate applications
//! (optionally `CONTROLLED`), `DEFGATE`, `PRAGMA`, `RESET`, `DECLARE` and
//! `MEASURE`. Programs render to the text accepted by the QVM and compiler.

pub mod instruction;
pub mod program;

pub use instruction::Instruction;
pub use program::{Program, READOUT};
