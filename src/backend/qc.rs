// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! A QVM paired with a compiler and a target topology.
//!
//! # Architecture
//!
//! [`QuantumComputer`] is generic over [`QvmHttpClient`] and
//! [`CompilerHttpClient`], enabling deterministic testing with mock clients
//! while using the reqwest clients in production.

use ndarray::Array2;
use tracing::{debug, info};

use super::compiler::{CompileRequest, CompilerHttpClient, ReqwestCompilerClient};
use super::qvm::{MultishotRequest, QvmHttpClient, ReqwestQvmClient};
use super::r#trait::{HealthStatus, ServiceHealth};
use super::topology::{DeviceSpec, Topology};
use crate::config::{EndpointsConfig, NoiseConfig};
use crate::error::{BackendError, Result};
use crate::quil::{Program, READOUT};

/// Program text ready for the QVM, plus the shape of the expected result.
#[derive(Debug, Clone, PartialEq)]
pub struct Executable {
    /// Quil text sent to the QVM
    pub quil: String,
    /// Trials to run
    pub num_shots: u32,
    /// Width of the `ro` register
    pub readout_size: usize,
}

impl Executable {
    /// Run `program` as written, skipping the compiler.
    pub fn uncompiled(program: &Program) -> Self {
        Self {
            quil: program.to_string(),
            num_shots: program.num_shots(),
            readout_size: program.readout_size(),
        }
    }
}

/// QVM-backed quantum computer.
pub struct QuantumComputer<Q = ReqwestQvmClient, C = ReqwestCompilerClient>
where
    Q: QvmHttpClient,
    C: CompilerHttpClient,
{
    name: String,
    topology: Topology,
    noise: Option<NoiseConfig>,
    qvm: Q,
    compiler: C,
}

impl QuantumComputer {
    /// Connect to the QVM and compiler described by `endpoints`.
    pub fn connect(
        spec: &DeviceSpec,
        noise: Option<NoiseConfig>,
        endpoints: &EndpointsConfig,
    ) -> Result<Self> {
        let qvm = ReqwestQvmClient::from_config(endpoints)?;
        let compiler = ReqwestCompilerClient::from_config(endpoints)?;
        Self::with_clients(spec, noise, qvm, compiler)
    }
}

impl<Q, C> QuantumComputer<Q, C>
where
    Q: QvmHttpClient,
    C: CompilerHttpClient,
{
    /// Build with explicit clients (for testing).
    pub fn with_clients(
        spec: &DeviceSpec,
        noise: Option<NoiseConfig>,
        qvm: Q,
        compiler: C,
    ) -> Result<Self> {
        let (name, topology) = spec.resolve()?;
        info!(
            name = %name,
            qubits = topology.number_of_nodes(),
            noisy = noise.is_some(),
            "Created QVM quantum computer"
        );
        Ok(Self {
            name,
            topology,
            noise,
            qvm,
            compiler,
        })
    }

    /// Device name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// True for built-in QVMs that execute uncompiled programs.
    pub fn is_builtin(&self) -> bool {
        self.name.contains("pyqvm")
    }

    /// QVM client.
    pub fn qvm(&self) -> &Q {
        &self.qvm
    }

    /// Compiler client.
    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// Compile `program` for this device's topology.
    pub async fn compile(&self, program: &Program) -> Result<Executable> {
        let request = CompileRequest::new(program.to_string(), self.topology.to_isa());
        let response = self.compiler.compile(&request).await?;
        debug!(
            device = %self.name,
            compiled_len = response.compiled_quil.len(),
            "Program compiled"
        );
        Ok(Executable {
            quil: response.compiled_quil,
            num_shots: program.num_shots(),
            readout_size: program.readout_size(),
        })
    }

    /// Execute and return a `[shots, readout_size]` array of bits.
    pub async fn run(&self, executable: &Executable) -> Result<Array2<u8>> {
        let request = MultishotRequest::new(
            executable.quil.clone(),
            executable.num_shots,
            self.noise.as_ref(),
        );
        let mut response = self.qvm.run_multishot(&request).await?;
        let rows = response.remove(READOUT).ok_or_else(|| {
            BackendError::ExecutionFailed(format!("QVM response has no '{}' register", READOUT))
        })?;

        let shots = executable.num_shots as usize;
        let width = executable.readout_size;
        if rows.len() != shots {
            return Err(BackendError::ExecutionFailed(format!(
                "expected {} shots from the QVM, got {}",
                shots,
                rows.len()
            ))
            .into());
        }

        let mut bits = Array2::<u8>::zeros((shots, width));
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(BackendError::ExecutionFailed(format!(
                    "shot {} has {} readout bits, expected {}",
                    i,
                    row.len(),
                    width
                ))
                .into());
            }
            for (j, &value) in row.iter().enumerate() {
                bits[[i, j]] = match value {
                    0 => 0,
                    1 => 1,
                    other => {
                        return Err(BackendError::ExecutionFailed(format!(
                            "shot {} readout bit {} is {}, expected 0 or 1",
                            i, j, other
                        ))
                        .into())
                    }
                };
            }
        }

        debug!(device = %self.name, shots, width, "QVM execution complete");
        Ok(bits)
    }

    /// Probe both services.
    pub async fn health_check(&self) -> ServiceHealth {
        let qvm = self.qvm.version().await;
        let compiler = self.compiler.version().await;
        let status = match (&qvm, &compiler) {
            (Ok(_), Ok(_)) => HealthStatus::Healthy,
            // A built-in QVM can still run without the compiler
            (Ok(_), Err(_)) if self.is_builtin() => HealthStatus::Degraded,
            _ => HealthStatus::Unavailable,
        };
        ServiceHealth {
            status,
            qvm_version: qvm.map_err(|e| e.to_string()),
            compiler_version: compiler.map_err(|e| e.to_string()),
        }
    }
}
