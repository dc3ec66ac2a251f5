// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Device topologies and the names that select them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Qubit connectivity graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Qubit indices
    pub nodes: Vec<usize>,
    /// Undirected couplers
    #[serde(default)]
    pub edges: Vec<(usize, usize)>,
}

impl Topology {
    /// Fully connected graph on `0..n`.
    pub fn complete(n: usize) -> Self {
        let nodes = (0..n).collect();
        let edges = (0..n)
            .flat_map(|a| ((a + 1)..n).map(move |b| (a, b)))
            .collect();
        Self { nodes, edges }
    }

    /// `rows × cols` nearest-neighbour lattice, numbered row-major.
    pub fn square_lattice(rows: usize, cols: usize) -> Self {
        let nodes = (0..rows * cols).collect();
        let mut edges = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let q = r * cols + c;
                if c + 1 < cols {
                    edges.push((q, q + 1));
                }
                if r + 1 < rows {
                    edges.push((q, q + cols));
                }
            }
        }
        Self { nodes, edges }
    }

    /// Number of qubits.
    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Instruction-set description understood by the compiler.
    pub fn to_isa(&self) -> Isa {
        let one_q = self
            .nodes
            .iter()
            .map(|q| (q.to_string(), Empty {}))
            .collect();
        let two_q = self
            .edges
            .iter()
            .map(|&(a, b)| (format!("{}-{}", a.min(b), a.max(b)), Empty {}))
            .collect();
        Isa { one_q, two_q }
    }
}

/// Compiler ISA: qubits and couplers keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Isa {
    #[serde(rename = "1Q")]
    pub one_q: BTreeMap<String, Empty>,
    #[serde(rename = "2Q")]
    pub two_q: BTreeMap<String, Empty>,
}

/// Empty JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// How a device is specified at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceSpec {
    /// Named QVM, e.g. `4q-qvm`, `9q-square-pyqvm`
    Name(String),
    /// Explicit connectivity graph
    Topology(Topology),
}

const DEVICE_ARGUMENT: &str = "Required argument device must be a string corresponding to a valid QVM quantum computer, or a topology graph.";

impl DeviceSpec {
    /// Parse a loosely typed device argument: a name string or a
    /// `{nodes, edges}` mapping.
    pub fn from_value(value: &serde_yaml::Value) -> Result<Self> {
        match value {
            serde_yaml::Value::String(name) => Ok(DeviceSpec::Name(name.clone())),
            serde_yaml::Value::Mapping(_) => serde_yaml::from_value::<Topology>(value.clone())
                .map(DeviceSpec::Topology)
                .map_err(|_| Error::Config(DEVICE_ARGUMENT.into())),
            _ => Err(Error::Config(DEVICE_ARGUMENT.into())),
        }
    }

    /// Number of wires the device exposes.
    pub fn num_wires(&self) -> Result<usize> {
        match self {
            DeviceSpec::Name(name) => qubit_count_from_name(name),
            DeviceSpec::Topology(t) => Ok(t.number_of_nodes()),
        }
    }

    /// Resolve to a device name and topology.
    ///
    /// Topology devices are named `device`.
    pub fn resolve(&self) -> Result<(String, Topology)> {
        match self {
            DeviceSpec::Name(name) => {
                let n = qubit_count_from_name(name)?;
                let topology = if name.contains("square") && n == 9 {
                    Topology::square_lattice(3, 3)
                } else {
                    Topology::complete(n)
                };
                Ok((name.clone(), topology))
            }
            DeviceSpec::Topology(t) => Ok(("device".to_string(), t.clone())),
        }
    }
}

/// Qubit count encoded in a device name: the first run of digits that is
/// immediately followed by `q` or `Q`.
///
/// This is the leftmost match of the pattern `(\d+)[qQ]`. A digit run not
/// followed by `q` can never contain the start of a match, so the scan skips
/// it whole.
pub fn qubit_count_from_name(name: &str) -> Result<usize> {
    let missing = || Error::Config("QVM device string does not indicate the number of qubits!".into());
    let bytes = name.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'q' || bytes[i] == b'Q') {
                let n: usize = name[start..i].parse().map_err(|_| missing())?;
                if n == 0 {
                    return Err(Error::Config(format!(
                        "QVM device {} must have at least one qubit",
                        name
                    )));
                }
                return Ok(n);
            }
        } else {
            i += 1;
        }
    }
    Err(missing())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_count_from_name() {
        assert_eq!(qubit_count_from_name("2q-qvm").unwrap(), 2);
        assert_eq!(qubit_count_from_name("9q-square-pyqvm").unwrap(), 9);
        assert_eq!(qubit_count_from_name("Aspen-16Q-qvm").unwrap(), 16);
        // First run of digits not followed by q is skipped
        assert_eq!(qubit_count_from_name("v2-12q").unwrap(), 12);
        assert_eq!(qubit_count_from_name("123x45Q").unwrap(), 45);
        assert_eq!(qubit_count_from_name("007q").unwrap(), 7);
        assert!(qubit_count_from_name("q2").is_err());
        assert!(qubit_count_from_name("12 q").is_err());
    }

    #[test]
    fn test_qubit_count_missing() {
        let err = qubit_count_from_name("qvm").unwrap_err();
        assert!(err
            .to_string()
            .contains("QVM device string does not indicate the number of qubits!"));
        assert!(qubit_count_from_name("0q-qvm").is_err());
    }

    #[test]
    fn test_complete_graph() {
        let t = Topology::complete(3);
        assert_eq!(t.number_of_nodes(), 3);
        assert_eq!(t.edges, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_square_lattice() {
        let t = Topology::square_lattice(3, 3);
        assert_eq!(t.number_of_nodes(), 9);
        assert_eq!(t.edges.len(), 12);
        assert!(t.edges.contains(&(4, 5)));
        assert!(t.edges.contains(&(4, 7)));
        assert!(!t.edges.contains(&(2, 3)));
    }

    #[test]
    fn test_isa_keys() {
        let isa = Topology {
            nodes: vec![0, 1],
            edges: vec![(1, 0)],
        }
        .to_isa();
        assert!(isa.one_q.contains_key("0"));
        assert!(isa.two_q.contains_key("0-1"));
    }

    #[test]
    fn test_device_spec_from_value() {
        let name = serde_yaml::Value::String("4q-qvm".into());
        assert_eq!(
            DeviceSpec::from_value(&name).unwrap(),
            DeviceSpec::Name("4q-qvm".into())
        );

        let graph: serde_yaml::Value =
            serde_yaml::from_str("nodes: [0, 1, 2]\nedges: [[0, 1], [1, 2]]").unwrap();
        let spec = DeviceSpec::from_value(&graph).unwrap();
        assert_eq!(spec.num_wires().unwrap(), 3);

        let number: serde_yaml::Value = serde_yaml::from_str("3").unwrap();
        let err = DeviceSpec::from_value(&number).unwrap_err();
        assert!(err.to_string().contains("Required argument device must be a string"));
    }

    #[test]
    fn test_resolve() {
        let (name, topology) = DeviceSpec::Name("9q-square-qvm".into()).resolve().unwrap();
        assert_eq!(name, "9q-square-qvm");
        assert_eq!(topology, Topology::square_lattice(3, 3));

        let (_, topology) = DeviceSpec::Name("5q-pyqvm".into()).resolve().unwrap();
        assert_eq!(topology, Topology::complete(5));

        let (name, _) = DeviceSpec::Topology(Topology::complete(2)).resolve().unwrap();
        assert_eq!(name, "device");
    }
}
