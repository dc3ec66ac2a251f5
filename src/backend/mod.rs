// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QVM and compiler backends.
//!
//! - [`qvm`]: QVM server protocol and [`QvmHttpClient`]
//! - [`compiler`]: Quil compiler protocol and [`CompilerHttpClient`]
//! - [`topology`]: device names, connectivity graphs and ISAs
//! - [`QuantumComputer`]: compile-then-run on a named device

pub mod compiler;
pub(crate) mod http;
pub mod qc;
pub mod qvm;
pub mod topology;
pub mod r#trait;

pub use compiler::{CompilerHttpClient, ReqwestCompilerClient};
pub use qc::{Executable, QuantumComputer};
pub use qvm::{QvmHttpClient, ReqwestQvmClient};
pub use r#trait::{HealthStatus, ServiceHealth};
pub use topology::{DeviceSpec, Topology};
