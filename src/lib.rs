// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Forest QVM device
//!
//! This crate executes circuits on Rigetti's Quantum Virtual Machine and
//! turns the returned bitstrings into expectation values, variances,
//! probabilities and samples of observables.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │               QvmDevice                  │
//! │  operation queue · observable queue      │
//! │  eigen-cache · measurement state         │
//! ├─────────────────────────────────────────┤
//! │        Quil Program (quil module)        │
//! ├─────────────────────────────────────────┤
//! │            QuantumComputer               │
//! ├────────────────┬────────────────────────┤
//! │ Compiler client│      QVM client        │
//! │ (reqwest)      │      (reqwest)         │
//! └────────────────┴────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use forest_qvm::backend::DeviceSpec;
//! use forest_qvm::circuit::{Observable, ObservableRequest};
//! use forest_qvm::config::Config;
//! use forest_qvm::device::QvmDevice;
//!
//! # async fn demo() -> forest_qvm::Result<()> {
//! let config = Config::load(None)?;
//! let mut dev = QvmDevice::from_config(DeviceSpec::Name("2q-qvm".into()), &config)?;
//! dev.apply_named("RX", &[0], &[0.5])?;
//! dev.apply_named("CNOT", &[0, 1], &[])?;
//! dev.set_observables(vec![ObservableRequest::new(Observable::PauliZ, vec![1])?])?;
//! dev.pre_measure().await?;
//! let z1 = dev.expval(&Observable::PauliZ, &[1])?;
//! # let _ = z1;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`device`]: The QVM device and its statistics
//! - [`backend`]: QVM and compiler clients, topologies
//! - [`circuit`]: Gates, observables and circuit files
//! - [`quil`]: Quil program representation
//! - [`linalg`]: Hermitian eigendecomposition and caching
//! - [`validation`]: Input validation utilities
//! - [`error`]: Error types

pub mod backend;
pub mod circuit;
pub mod config;
pub mod device;
pub mod error;
pub mod linalg;
pub mod quil;
pub mod validation;

pub use config::Config;
pub use device::QvmDevice;
pub use error::{Error, Result};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
