// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Basis changes that turn an observable measurement into a Z measurement.
//!
//! | Observable | Appended gates |
//! |------------|----------------|
//! | Identity, PauliZ | none |
//! | PauliX | H |
//! | PauliY | Z, S, H |
//! | Hadamard | RY(-π/4) |
//! | Hermitian H | QubitUnitary(U†), U the eigenvectors of H |

use std::f64::consts::FRAC_PI_4;

use crate::circuit::{Gate, Observable, ObservableRequest, Operation};
use crate::error::Result;
use crate::linalg::{adjoint, EigenCache};

/// Operations to append before measuring `request` in the Z basis.
///
/// Hermitian observables are diagonalized through `cache`.
pub fn basis_rotation(request: &ObservableRequest, cache: &mut EigenCache) -> Result<Vec<Operation>> {
    let wires = request.wires().to_vec();
    let gates = match request.observable() {
        Observable::Identity | Observable::PauliZ => Vec::new(),
        Observable::PauliX => vec![Gate::Hadamard],
        Observable::PauliY => vec![Gate::PauliZ, Gate::S, Gate::Hadamard],
        Observable::Hadamard => vec![Gate::Ry(-FRAC_PI_4)],
        Observable::Hermitian(matrix) => {
            let system = cache.get_or_compute(matrix)?;
            vec![Gate::QubitUnitary(adjoint(&system.eigenvectors))]
        }
    };
    gates
        .into_iter()
        .map(|gate| Operation::new(gate, wires.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use num_complex::Complex64;

    fn request(observable: Observable, wires: &[usize]) -> ObservableRequest {
        ObservableRequest::new(observable, wires.to_vec()).unwrap()
    }

    fn gates(ops: &[Operation]) -> Vec<&'static str> {
        ops.iter().map(|op| op.gate().name()).collect()
    }

    #[test]
    fn test_pauli_rotations() {
        let mut cache = EigenCache::new();
        let ops = basis_rotation(&request(Observable::PauliZ, &[0]), &mut cache).unwrap();
        assert!(ops.is_empty());

        let ops = basis_rotation(&request(Observable::PauliX, &[1]), &mut cache).unwrap();
        assert_eq!(gates(&ops), vec!["Hadamard"]);
        assert_eq!(ops[0].wires(), &[1]);

        let ops = basis_rotation(&request(Observable::PauliY, &[0]), &mut cache).unwrap();
        assert_eq!(gates(&ops), vec!["PauliZ", "S", "Hadamard"]);

        let ops = basis_rotation(&request(Observable::Hadamard, &[0]), &mut cache).unwrap();
        assert_eq!(ops[0].gate(), &Gate::Ry(-FRAC_PI_4));
    }

    #[test]
    fn test_hermitian_rotation_diagonalizes() {
        let c = |re: f64, im: f64| Complex64::new(re, im);
        let h = array![[c(4.0, 0.0), c(-1.0, 6.0)], [c(-1.0, -6.0), c(2.0, 0.0)]];
        let mut cache = EigenCache::new();
        let ops = basis_rotation(&request(Observable::Hermitian(h.clone()), &[0]), &mut cache)
            .unwrap();
        assert_eq!(cache.diagonalizations(), 1);

        let Gate::QubitUnitary(u_dag) = ops[0].gate() else {
            panic!("expected QubitUnitary");
        };
        // U†·H·U is diagonal with ascending eigenvalues
        let d = u_dag.dot(&h).dot(&adjoint(u_dag));
        assert!(d[[0, 1]].norm() < 1e-10);
        assert!(d[[0, 0]].re < d[[1, 1]].re);

        // Second use hits the cache
        basis_rotation(&request(Observable::Hermitian(h), &[0]), &mut cache).unwrap();
        assert_eq!(cache.diagonalizations(), 1);
    }
}
