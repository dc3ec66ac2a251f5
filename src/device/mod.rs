// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Forest QVM device.
//!
//! [`QvmDevice`] collects an operation queue and an observable queue, turns
//! them into a Quil program, executes it on a QVM and estimates observable
//! statistics from the returned bitstrings.
//!
//! # Execution
//!
//! `pre_measure` runs the following pipeline:
//!
//! 1. lower queued operations to Quil
//! 2. append the basis change of each queued observable
//! 3. prepend `PRAGMA INITIAL_REWIRING "PARTIAL"` (and `RESET` when
//!    `active_reset` is set)
//! 4. declare `ro`, measure every touched qubit, loop over `shots`
//! 5. compile (skipped for `pyqvm` devices) and run
//! 6. store one bit column per measured wire
//!
//! # Statistics
//!
//! Single-wire estimates use `⟨Z⟩ = mean(1 − 2b)` and `p0 = (1 + ⟨Z⟩)/2`.
//! Hermitian observables are weighted by their eigenvalues `w` in ascending
//! order; multi-wire Hermitian estimates use the marginal distribution over
//! the observable's wires, first wire most significant.

pub mod basis;
pub mod state;

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::backend::compiler::{CompilerHttpClient, ReqwestCompilerClient};
use crate::backend::qvm::{QvmHttpClient, ReqwestQvmClient};
use crate::backend::{DeviceSpec, Executable, QuantumComputer, ServiceHealth};
use crate::circuit::{Gate, Observable, ObservableRequest, Operation};
use crate::config::{Config, DeviceOptions, EndpointsConfig, NoiseConfig};
use crate::error::{Error, Result, ValidationError};
use crate::linalg::EigenCache;
use crate::quil::{Instruction, Program, READOUT};
use crate::validation::{validate_hermitian, validate_shots, validate_wires, SampleCount};

pub use basis::basis_rotation;
pub use state::MeasurementState;

/// Human-readable device name.
pub const DEVICE_NAME: &str = "Forest QVM Device";

/// Identifier used by frontends to select this device.
pub const SHORT_NAME: &str = "forest.qvm";

/// Forest QVM device.
pub struct QvmDevice<Q = ReqwestQvmClient, C = ReqwestCompilerClient>
where
    Q: QvmHttpClient,
    C: CompilerHttpClient,
{
    qc: QuantumComputer<Q, C>,
    num_wires: usize,
    shots: u32,
    active_reset: bool,
    operations: Vec<Operation>,
    observables: Vec<ObservableRequest>,
    eigen_cache: EigenCache,
    state: MeasurementState,
    program: Option<Program>,
}

impl QvmDevice {
    /// Create a device talking to the services at `endpoints`.
    ///
    /// Noisy devices use the default Pauli noise model.
    pub fn new(device: DeviceSpec, options: DeviceOptions, endpoints: &EndpointsConfig) -> Result<Self> {
        let noise = options.noisy.then(NoiseConfig::default);
        Self::connect(device, options, noise, endpoints)
    }

    /// Create a device from a loaded configuration.
    pub fn from_config(device: DeviceSpec, config: &Config) -> Result<Self> {
        let noise = config.device.noisy.then(|| config.noise.clone());
        Self::connect(device, config.device.clone(), noise, &config.endpoints)
    }

    fn connect(
        device: DeviceSpec,
        options: DeviceOptions,
        noise: Option<NoiseConfig>,
        endpoints: &EndpointsConfig,
    ) -> Result<Self> {
        // Validate before opening clients so argument errors surface first
        device.num_wires()?;
        validate_shots(options.shots)?;
        let qvm = ReqwestQvmClient::from_config(endpoints)?;
        let compiler = ReqwestCompilerClient::from_config(endpoints)?;
        Self::with_clients(device, options, noise, qvm, compiler)
    }
}

impl<Q, C> QvmDevice<Q, C>
where
    Q: QvmHttpClient,
    C: CompilerHttpClient,
{
    /// Create a device with explicit clients (for testing).
    pub fn with_clients(
        device: DeviceSpec,
        options: DeviceOptions,
        noise: Option<NoiseConfig>,
        qvm: Q,
        compiler: C,
    ) -> Result<Self> {
        let num_wires = device.num_wires()?;
        validate_shots(options.shots)?;
        if num_wires == 0 {
            return Err(Error::Config("QVM topology must contain at least one qubit".into()));
        }

        let qc = QuantumComputer::with_clients(&device, noise, qvm, compiler)?;
        info!(
            device = %qc.name(),
            wires = num_wires,
            shots = options.shots,
            active_reset = options.active_reset,
            "Forest QVM device ready"
        );

        Ok(Self {
            qc,
            num_wires,
            shots: options.shots,
            active_reset: options.active_reset,
            operations: Vec::new(),
            observables: Vec::new(),
            eigen_cache: EigenCache::new(),
            state: MeasurementState::default(),
            program: None,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Human-readable device name.
    pub fn name(&self) -> &'static str {
        DEVICE_NAME
    }

    /// Identifier used by frontends to select this device.
    pub fn short_name(&self) -> &'static str {
        SHORT_NAME
    }

    /// Name of the underlying QVM, e.g. `4q-qvm`.
    pub fn device_name(&self) -> &str {
        self.qc.name()
    }

    /// Number of wires.
    pub fn num_wires(&self) -> usize {
        self.num_wires
    }

    /// Shots per execution.
    pub fn shots(&self) -> u32 {
        self.shots
    }

    /// Whether programs start with `RESET`.
    pub fn active_reset(&self) -> bool {
        self.active_reset
    }

    /// Toggle active qubit reset.
    pub fn set_active_reset(&mut self, active_reset: bool) {
        self.active_reset = active_reset;
    }

    /// Outcomes of the last execution.
    pub fn state(&self) -> &MeasurementState {
        &self.state
    }

    /// Program submitted by the last `pre_measure`.
    pub fn program(&self) -> Option<&Program> {
        self.program.as_ref()
    }

    /// Eigendecompositions computed so far.
    pub fn eigen_cache(&self) -> &EigenCache {
        &self.eigen_cache
    }

    /// Queued operations.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Queued observables.
    pub fn observables(&self) -> &[ObservableRequest] {
        &self.observables
    }

    /// Underlying quantum computer.
    pub fn quantum_computer(&self) -> &QuantumComputer<Q, C> {
        &self.qc
    }

    // =========================================================================
    // Queues
    // =========================================================================

    /// Queue an operation.
    pub fn apply(&mut self, operation: Operation) -> Result<()> {
        validate_wires("wires", operation.wires(), self.num_wires)?;
        self.operations.push(operation);
        Ok(())
    }

    /// Queue an operation by frontend name.
    pub fn apply_named(&mut self, name: &str, wires: &[usize], params: &[f64]) -> Result<()> {
        let gate = Gate::from_name(name, params, None)?;
        self.apply(Operation::new(gate, wires.to_vec())?)
    }

    /// Replace the observable queue.
    pub fn set_observables(&mut self, requests: Vec<ObservableRequest>) -> Result<()> {
        for request in &requests {
            validate_wires("wires", request.wires(), self.num_wires)?;
        }
        self.observables = requests;
        Ok(())
    }

    /// Clear queues, measurement state and the last program.
    ///
    /// The eigen-cache survives resets.
    pub fn reset(&mut self) {
        self.operations.clear();
        self.observables.clear();
        self.state = MeasurementState::default();
        self.program = None;
    }

    // =========================================================================
    // Execution
    // =========================================================================

    /// Build, compile and run the program; store per-wire outcomes.
    pub async fn pre_measure(&mut self) -> Result<()> {
        let mut program = Program::new();
        for op in &self.operations {
            program.apply(op);
        }
        for request in &self.observables {
            for op in basis_rotation(request, &mut self.eigen_cache)? {
                program.apply(&op);
            }
        }

        // Observable wires are measured even when no gate touches them
        let mut touched: BTreeSet<usize> = program.get_qubits();
        touched.extend(self.observables.iter().flat_map(|r| r.wires().iter().copied()));
        let qubits: Vec<usize> = touched.into_iter().collect();

        if self.active_reset {
            program.prepend(Instruction::Reset);
        }
        program.prepend(Instruction::Pragma {
            name: "INITIAL_REWIRING".into(),
            freeform: Some("PARTIAL".into()),
        });
        program.declare(READOUT, qubits.len());
        for (i, &q) in qubits.iter().enumerate() {
            program.measure(q, i);
        }
        program.wrap_in_numshots_loop(self.shots);

        debug!(device = %self.qc.name(), program = %program, "Assembled Quil program");

        let executable = if self.qc.is_builtin() {
            Executable::uncompiled(&program)
        } else {
            self.qc.compile(&program).await?
        };
        let bits = self.qc.run(&executable).await?;

        info!(
            device = %self.qc.name(),
            shots = self.shots,
            qubits = ?qubits,
            compiled = !self.qc.is_builtin(),
            "Program executed"
        );

        self.state = MeasurementState::from_bits(&qubits, &bits);
        self.program = Some(program);
        Ok(())
    }

    /// Probe the QVM and compiler.
    pub async fn health_check(&self) -> ServiceHealth {
        self.qc.health_check().await
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Expectation value of `observable` on `wires`.
    pub fn expval(&mut self, observable: &Observable, wires: &[usize]) -> Result<f64> {
        self.check_request(observable, wires)?;

        if let [wire] = wires {
            let ev_z = self.ev_z(*wire)?;
            let p0 = (1.0 + ev_z) / 2.0;
            let p1 = (1.0 - ev_z) / 2.0;
            return match observable {
                Observable::Identity => Ok(p0 + p1),
                Observable::Hermitian(matrix) => {
                    let w = self.eigenvalues(matrix)?;
                    Ok(w[0] * p0 + w[1] * p1)
                }
                _ => Ok(ev_z),
            };
        }

        match observable {
            Observable::Hermitian(matrix) => {
                let w = self.eigenvalues(matrix)?;
                let probs = self.probabilities(wires)?;
                Ok(w.dot(&probs))
            }
            other => Err(multi_wire_unsupported(other, wires)),
        }
    }

    /// Variance of `observable` on `wires`.
    pub fn var(&mut self, observable: &Observable, wires: &[usize]) -> Result<f64> {
        self.check_request(observable, wires)?;

        let probs = if let [wire] = wires {
            match observable {
                Observable::Identity => return Ok(0.0),
                Observable::Hermitian(_) => {
                    let ev_z = self.ev_z(*wire)?;
                    Array1::from(vec![(1.0 + ev_z) / 2.0, (1.0 - ev_z) / 2.0])
                }
                _ => {
                    let values = self.z_values(*wire)?;
                    let mean = values.iter().sum::<f64>() / values.len() as f64;
                    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                        / values.len() as f64;
                    return Ok(var);
                }
            }
        } else {
            self.probabilities(wires)?
        };

        match observable {
            Observable::Hermitian(matrix) => {
                let w = self.eigenvalues(matrix)?;
                let mean = w.dot(&probs);
                Ok(w.mapv(|x| x * x).dot(&probs) - mean * mean)
            }
            other => Err(multi_wire_unsupported(other, wires)),
        }
    }

    /// Marginal distribution over `wires`, indexed by basis state with the
    /// first wire most significant.
    pub fn probabilities(&self, wires: &[usize]) -> Result<Array1<f64>> {
        validate_wires("wires", wires, self.num_wires)?;
        let dim = basis_dimension(wires.len())?;
        let columns = wires
            .iter()
            .map(|&w| self.state.bits(w))
            .collect::<Result<Vec<_>>>()?;

        let mut counts = Array1::<f64>::zeros(dim);
        for shot in 0..self.state.shots() {
            counts[basis_index(&columns, shot)] += 1.0;
        }
        Ok(counts / self.shots as f64)
    }

    /// First `n` shots of `observable` on `wires`, as eigenvalues.
    ///
    /// `n` must be a positive integer no larger than the shot count.
    pub fn sample<N>(&mut self, observable: &Observable, wires: &[usize], n: N) -> Result<Array1<f64>>
    where
        N: TryInto<SampleCount, Error = Error>,
    {
        let n = n.try_into()?.get();
        if n > self.shots as usize {
            return Err(Error::Sampling(format!(
                "Cannot draw {} samples from {} shots",
                n, self.shots
            )));
        }
        self.check_request(observable, wires)?;

        match observable {
            Observable::Identity => {
                self.state.bits(wires[0])?;
                Ok(Array1::ones(n))
            }
            Observable::Hermitian(matrix) => {
                let w = self.eigenvalues(matrix)?;
                let columns = wires
                    .iter()
                    .map(|&wire| self.state.bits(wire))
                    .collect::<Result<Vec<_>>>()?;
                Ok((0..n).map(|shot| w[basis_index(&columns, shot)]).collect())
            }
            _ => {
                let values = self.z_values(wires[0])?;
                Ok(values.into_iter().take(n).collect())
            }
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn check_request(&self, observable: &Observable, wires: &[usize]) -> Result<()> {
        match observable {
            Observable::Hermitian(matrix) => validate_hermitian(matrix, wires.len())?,
            other if wires.len() > 1 => return Err(multi_wire_unsupported(other, wires)),
            _ => {}
        }
        validate_wires("wires", wires, self.num_wires)
    }

    /// `1 − 2b` for every shot on `wire`.
    fn z_values(&self, wire: usize) -> Result<Vec<f64>> {
        Ok(self
            .state
            .bits(wire)?
            .iter()
            .map(|&b| 1.0 - 2.0 * f64::from(b))
            .collect())
    }

    fn ev_z(&self, wire: usize) -> Result<f64> {
        let values = self.z_values(wire)?;
        Ok(values.iter().sum::<f64>() / values.len() as f64)
    }

    fn eigenvalues(&mut self, matrix: &Array2<Complex64>) -> Result<Array1<f64>> {
        Ok(self.eigen_cache.get_or_compute(matrix)?.eigenvalues.clone())
    }
}

/// Largest wire count whose `f64` probability vector ndarray can allocate.
const MAX_PROBABILITY_WIRES: u32 = usize::BITS - 5;

/// Length of the probability vector over `num_wires` wires.
fn basis_dimension(num_wires: usize) -> Result<usize> {
    match u32::try_from(num_wires) {
        Ok(n) if n <= MAX_PROBABILITY_WIRES => Ok(1usize << n),
        _ => Err(ValidationError::ResourceLimit {
            resource: "probability wires".into(),
            limit: u64::from(MAX_PROBABILITY_WIRES),
            requested: num_wires as u64,
        }
        .into()),
    }
}

/// MSB-first basis index of one shot across `columns`.
fn basis_index(columns: &[&[u8]], shot: usize) -> usize {
    columns
        .iter()
        .fold(0, |index, column| (index << 1) | column[shot] as usize)
}

fn multi_wire_unsupported(observable: &Observable, wires: &[usize]) -> Error {
    Error::UnsupportedObservable(format!(
        "{} on wires {:?}; only Hermitian observables may act on multiple wires",
        observable.name(),
        wires
    ))
}
