// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-wire measurement outcomes from the last execution.

use ndarray::Array2;
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Bit column for every measured wire, one entry per shot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeasurementState {
    columns: BTreeMap<usize, Vec<u8>>,
    shots: usize,
}

impl MeasurementState {
    /// Column `i` of `bits` becomes the column of `qubits[i]`.
    pub fn from_bits(qubits: &[usize], bits: &Array2<u8>) -> Self {
        let columns = qubits
            .iter()
            .enumerate()
            .map(|(i, &q)| (q, bits.column(i).to_vec()))
            .collect();
        Self {
            columns,
            shots: bits.nrows(),
        }
    }

    /// Bits recorded for `wire`.
    pub fn bits(&self, wire: usize) -> Result<&[u8]> {
        self.columns.get(&wire).map(Vec::as_slice).ok_or_else(|| {
            if self.columns.is_empty() {
                Error::Measurement("no measurement results; run pre_measure first".into())
            } else {
                Error::Measurement(format!("wire {} was not measured", wire))
            }
        })
    }

    /// Number of shots recorded.
    pub fn shots(&self) -> usize {
        self.shots
    }

    /// Measured wires, ascending.
    pub fn wires(&self) -> impl Iterator<Item = usize> + '_ {
        self.columns.keys().copied()
    }

    /// True before the first execution.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
