// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quil compiler wire protocol.
//!
//! ```text
//! → {"type":"multishot","uncompiled-quil":"…",
//!    "target-device":{"isa":{"1Q":{"0":{}},"2Q":{"0-1":{}}}}}
//! ← {"compiled-quil":"…"}
//! ```

pub mod client;

use serde::{Deserialize, Serialize};

use super::topology::Isa;

pub use client::{CompilerHttpClient, ReqwestCompilerClient};

/// Compiler request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileRequest {
    /// Always `"multishot"`
    #[serde(rename = "type")]
    pub kind: String,
    /// Program text to compile
    #[serde(rename = "uncompiled-quil")]
    pub uncompiled_quil: String,
    /// Device to target
    #[serde(rename = "target-device")]
    pub target_device: TargetDevice,
}

impl CompileRequest {
    /// Compile `quil` against `isa`.
    pub fn new(quil: String, isa: Isa) -> Self {
        Self {
            kind: "multishot".into(),
            uncompiled_quil: quil,
            target_device: TargetDevice { isa },
        }
    }
}

/// Compilation target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDevice {
    /// Instruction-set architecture
    pub isa: Isa,
}

/// Compiler reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileResponse {
    /// Native Quil
    #[serde(rename = "compiled-quil")]
    pub compiled_quil: String,
}
