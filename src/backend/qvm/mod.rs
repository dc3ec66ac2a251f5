// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QVM server wire protocol.
//!
//! The QVM accepts a `multishot` request carrying Quil text and the number of
//! trials, and answers with one row of readout bits per trial:
//!
//! ```text
//! → {"type":"multishot","addresses":{"ro":true},"trials":2,"compiled-quil":"…"}
//! ← {"ro":[[0,1],[1,1]]}
//! ```
//!
//! Noisy devices add `gate-noise` and `measurement-noise` Pauli triples.

pub mod client;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::NoiseConfig;
use crate::quil::READOUT;

pub use client::{QvmHttpClient, ReqwestQvmClient};

/// `multishot` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultishotRequest {
    /// Always `"multishot"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Registers to return
    pub addresses: BTreeMap<String, bool>,
    /// Number of trials
    pub trials: u32,
    /// Quil program text
    #[serde(rename = "compiled-quil")]
    pub compiled_quil: String,
    /// Pauli X/Y/Z error probabilities after each gate
    #[serde(rename = "gate-noise", default, skip_serializing_if = "Option::is_none")]
    pub gate_noise: Option<[f64; 3]>,
    /// Pauli X/Y/Z error probabilities before each measurement
    #[serde(
        rename = "measurement-noise",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub measurement_noise: Option<[f64; 3]>,
}

impl MultishotRequest {
    /// Request reading back the `ro` register.
    pub fn new(quil: String, trials: u32, noise: Option<&NoiseConfig>) -> Self {
        let mut addresses = BTreeMap::new();
        addresses.insert(READOUT.to_string(), true);
        Self {
            kind: "multishot".into(),
            addresses,
            trials,
            compiled_quil: quil,
            gate_noise: noise.map(|n| n.gate_noise),
            measurement_noise: noise.map(|n| n.measurement_noise),
        }
    }
}

/// `multishot` reply: register name to `[trials][bits]`.
pub type MultishotResponse = BTreeMap<String, Vec<Vec<i64>>>;

/// `version` probe body.
#[derive(Debug, Clone, Serialize)]
pub struct VersionRequest {
    #[serde(rename = "type")]
    kind: &'static str,
}

impl Default for VersionRequest {
    fn default() -> Self {
        Self { kind: "version" }
    }
}
