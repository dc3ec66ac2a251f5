// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! YAML circuit files for the `run` command.
//!
//! ```yaml
//! device: 2q-qvm            # or {nodes: [0, 1], edges: [[0, 1]]}
//! shots: 1000               # optional, overrides configuration
//! operations:
//!   - name: RX
//!     wires: [0]
//!     params: [0.5]
//!   - name: CNOT
//!     wires: [0, 1]
//! measurements:
//!   - return: expval
//!     observable: PauliZ
//!     wires: [1]
//!   - return: sample
//!     observable: Hermitian
//!     wires: [0]
//!     matrix: [[1, 0], [0, -1]]
//!     n: 10
//! ```
//!
//! Matrix entries are real numbers or `[re, im]` pairs.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::backend::compiler::CompilerHttpClient;
use crate::backend::qvm::QvmHttpClient;
use crate::backend::DeviceSpec;
use crate::config::DeviceOptions;
use crate::device::QvmDevice;
use crate::error::{Result, ValidationError};

use super::{Gate, Observable, ObservableRequest, Operation};

/// Parsed circuit file.
#[derive(Debug, Clone, Deserialize)]
pub struct CircuitFile {
    /// Device name or topology
    pub device: serde_yaml::Value,
    /// Shot count override
    #[serde(default)]
    pub shots: Option<u32>,
    /// Active reset override
    #[serde(default)]
    pub active_reset: Option<bool>,
    /// Gates in order
    #[serde(default)]
    pub operations: Vec<OperationEntry>,
    /// Requested results in order
    #[serde(default)]
    pub measurements: Vec<MeasurementEntry>,
}

/// One gate in a circuit file.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationEntry {
    pub name: String,
    pub wires: Vec<usize>,
    #[serde(default)]
    pub params: Vec<f64>,
    #[serde(default)]
    pub matrix: Option<Vec<Vec<MatrixEntry>>>,
}

/// One requested result in a circuit file.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementEntry {
    #[serde(rename = "return")]
    pub kind: ReturnType,
    #[serde(default)]
    pub observable: Option<String>,
    pub wires: Vec<usize>,
    #[serde(default)]
    pub matrix: Option<Vec<Vec<MatrixEntry>>>,
    /// Sample count; kept as a float so non-integral values reach the
    /// device's own check
    #[serde(default)]
    pub n: Option<f64>,
}

/// Statistic to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    Expval,
    Var,
    Sample,
    Probabilities,
}

/// Real or complex matrix entry.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum MatrixEntry {
    Real(f64),
    Complex([f64; 2]),
}

impl From<MatrixEntry> for Complex64 {
    fn from(entry: MatrixEntry) -> Self {
        match entry {
            MatrixEntry::Real(re) => Complex64::new(re, 0.0),
            MatrixEntry::Complex([re, im]) => Complex64::new(re, im),
        }
    }
}

/// A computed result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "return", rename_all = "lowercase")]
pub enum Outcome {
    Expval {
        observable: String,
        wires: Vec<usize>,
        value: f64,
    },
    Var {
        observable: String,
        wires: Vec<usize>,
        value: f64,
    },
    Sample {
        observable: String,
        wires: Vec<usize>,
        values: Vec<f64>,
    },
    Probabilities {
        wires: Vec<usize>,
        values: Vec<f64>,
    },
}

impl CircuitFile {
    /// Load from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse YAML text.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Device argument.
    pub fn device_spec(&self) -> Result<DeviceSpec> {
        DeviceSpec::from_value(&self.device)
    }

    /// `defaults` with this file's overrides applied.
    pub fn options(&self, defaults: &DeviceOptions) -> DeviceOptions {
        DeviceOptions {
            shots: self.shots.unwrap_or(defaults.shots),
            active_reset: self.active_reset.unwrap_or(defaults.active_reset),
            noisy: defaults.noisy,
        }
    }

    /// Queue the circuit on `device`, execute it and compute every requested
    /// result.
    pub async fn execute<Q, C>(&self, device: &mut QvmDevice<Q, C>) -> Result<Vec<Outcome>>
    where
        Q: QvmHttpClient,
        C: CompilerHttpClient,
    {
        for entry in &self.operations {
            let matrix = entry.matrix.as_deref().map(parse_matrix).transpose()?;
            let gate = Gate::from_name(&entry.name, &entry.params, matrix)?;
            device.apply(Operation::new(gate, entry.wires.clone())?)?;
        }

        let mut requests = Vec::new();
        for entry in &self.measurements {
            if let Some(observable) = entry.observable()? {
                requests.push(ObservableRequest::new(observable, entry.wires.clone())?);
            }
        }
        device.set_observables(requests)?;
        device.pre_measure().await?;

        let mut outcomes = Vec::with_capacity(self.measurements.len());
        for entry in &self.measurements {
            let wires = entry.wires.clone();
            let outcome = match (entry.kind, entry.observable()?) {
                (ReturnType::Probabilities, _) => Outcome::Probabilities {
                    values: device.probabilities(&wires)?.to_vec(),
                    wires,
                },
                (kind, Some(observable)) => {
                    let name = observable.name().to_string();
                    match kind {
                        ReturnType::Expval => Outcome::Expval {
                            value: device.expval(&observable, &wires)?,
                            observable: name,
                            wires,
                        },
                        ReturnType::Var => Outcome::Var {
                            value: device.var(&observable, &wires)?,
                            observable: name,
                            wires,
                        },
                        _ => {
                            let n = entry.n.unwrap_or(f64::from(device.shots()));
                            Outcome::Sample {
                                values: device.sample(&observable, &wires, n)?.to_vec(),
                                observable: name,
                                wires,
                            }
                        }
                    }
                }
                (_, None) => {
                    return Err(ValidationError::Field {
                        field: "observable".into(),
                        message: format!("{:?} requires an observable", entry.kind),
                    }
                    .into())
                }
            };
            outcomes.push(outcome);
        }

        info!(
            device = %device.device_name(),
            results = outcomes.len(),
            "Circuit file executed"
        );
        Ok(outcomes)
    }
}

impl MeasurementEntry {
    fn observable(&self) -> Result<Option<Observable>> {
        match (&self.kind, &self.observable) {
            (ReturnType::Probabilities, _) | (_, None) => Ok(None),
            (_, Some(name)) => {
                let matrix = self.matrix.as_deref().map(parse_matrix).transpose()?;
                Observable::from_name(name, matrix).map(Some)
            }
        }
    }
}

fn parse_matrix(rows: &[Vec<MatrixEntry>]) -> Result<Array2<Complex64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != n_cols) {
        return Err(ValidationError::Field {
            field: "matrix".into(),
            message: "rows must all have the same length".into(),
        }
        .into());
    }
    let flat: Vec<Complex64> = rows.iter().flatten().map(|&e| e.into()).collect();
    Array2::from_shape_vec((n_rows, n_cols), flat).map_err(|e| {
        ValidationError::Field {
            field: "matrix".into(),
            message: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockCompilerClient, MockQvmClient};

    const BELL: &str = r#"
device: 2q-qvm
shots: 4
operations:
  - name: Hadamard
    wires: [0]
  - name: CNOT
    wires: [0, 1]
measurements:
  - return: expval
    observable: PauliZ
    wires: [0]
  - return: var
    observable: Hermitian
    wires: [1]
    matrix: [[1, 0], [0, -1]]
  - return: sample
    observable: PauliZ
    wires: [1]
    n: 2
  - return: probabilities
    wires: [0, 1]
"#;

    #[test]
    fn test_parse() {
        let file = CircuitFile::parse(BELL).unwrap();
        assert_eq!(file.shots, Some(4));
        assert_eq!(file.operations.len(), 2);
        assert_eq!(file.measurements[1].kind, ReturnType::Var);
        assert_eq!(file.device_spec().unwrap(), DeviceSpec::Name("2q-qvm".into()));

        let options = file.options(&DeviceOptions::default());
        assert_eq!(options.shots, 4);
        assert!(!options.active_reset);
    }

    #[test]
    fn test_parse_complex_matrix() {
        let rows = vec![
            vec![MatrixEntry::Real(0.0), MatrixEntry::Complex([0.0, -1.0])],
            vec![MatrixEntry::Complex([0.0, 1.0]), MatrixEntry::Real(0.0)],
        ];
        let m = parse_matrix(&rows).unwrap();
        assert_eq!(m[[0, 1]], Complex64::new(0.0, -1.0));

        let ragged = vec![vec![MatrixEntry::Real(1.0)], vec![]];
        assert!(parse_matrix(&ragged).is_err());
    }

    #[tokio::test]
    async fn test_execute_bell() {
        let file = CircuitFile::parse(BELL).unwrap();
        let rows = vec![vec![0, 0], vec![1, 1], vec![1, 1], vec![0, 0]];
        let mut device = QvmDevice::with_clients(
            file.device_spec().unwrap(),
            file.options(&DeviceOptions::default()),
            None,
            MockQvmClient::with_rows(rows),
            MockCompilerClient::new(),
        )
        .unwrap();

        let outcomes = file.execute(&mut device).await.unwrap();
        assert_eq!(outcomes.len(), 4);
        assert_eq!(
            outcomes[0],
            Outcome::Expval {
                observable: "PauliZ".into(),
                wires: vec![0],
                value: 0.0
            }
        );
        match &outcomes[1] {
            Outcome::Var { value, .. } => assert!((value - 1.0).abs() < 1e-12),
            other => panic!("unexpected outcome {:?}", other),
        }
        match &outcomes[2] {
            Outcome::Sample { values, .. } => assert_eq!(values, &vec![1.0, -1.0]),
            other => panic!("unexpected outcome {:?}", other),
        }
        match &outcomes[3] {
            Outcome::Probabilities { values, .. } => {
                assert_eq!(values, &vec![0.5, 0.0, 0.0, 0.5])
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let json = serde_json::to_value(&outcomes[0]).unwrap();
        assert_eq!(json["return"], "expval");
    }

    #[tokio::test]
    async fn test_execute_rejects_bad_sample_count() {
        let file = CircuitFile::parse(
            r#"
device: 1q-qvm
measurements:
  - return: sample
    observable: PauliZ
    wires: [0]
    n: 1.5
"#,
        )
        .unwrap();
        let mut device = QvmDevice::with_clients(
            file.device_spec().unwrap(),
            DeviceOptions {
                shots: 2,
                ..DeviceOptions::default()
            },
            None,
            MockQvmClient::with_rows(vec![vec![0], vec![1]]),
            MockCompilerClient::new(),
        )
        .unwrap();
        let err = file.execute(&mut device).await.unwrap_err();
        assert!(err
            .to_string()
            .contains("The number of samples must be a positive integer"));
    }
}
