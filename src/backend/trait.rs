// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Service health types shared by the QVM and compiler backends.

use serde::Serialize;
use std::fmt;

/// Health status of the backing services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// QVM and compiler both answer
    Healthy,
    /// The QVM answers but the compiler does not (built-in devices only)
    Degraded,
    /// The device cannot execute programs
    Unavailable,
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStatus::Healthy => write!(f, "healthy"),
            HealthStatus::Degraded => write!(f, "degraded"),
            HealthStatus::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Result of probing both services.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceHealth {
    /// Overall status
    pub status: HealthStatus,
    /// QVM version, or the probe error
    pub qvm_version: Result<String, String>,
    /// Compiler version, or the probe error
    pub compiler_version: Result<String, String>,
}

impl ServiceHealth {
    /// True unless the device is unusable.
    pub fn is_usable(&self) -> bool {
        self.status != HealthStatus::Unavailable
    }
}
