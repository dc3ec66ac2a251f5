// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dense complex linear algebra used by the device.
//!
//! - [`eigh`]: Hermitian eigendecomposition (Jacobi)
//! - [`EigenCache`]: per-device memoization of decompositions

pub mod cache;
pub mod eigh;

pub use cache::{EigenCache, MatrixKey};
pub use eigh::{eigh, Eigensystem};

use ndarray::Array2;
use num_complex::Complex64;

/// Conjugate transpose.
pub fn adjoint(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|z| z.conj())
}

/// True when `m` is square and `‖m − m†‖_max ≤ tol·‖m‖_max`.
pub fn is_hermitian(m: &Array2<Complex64>, tol: f64) -> bool {
    if m.nrows() != m.ncols() {
        return false;
    }
    let bound = tol * m.iter().fold(0.0_f64, |acc, z| acc.max(z.norm()));
    m.indexed_iter()
        .all(|((i, j), z)| (z - m[[j, i]].conj()).norm() <= bound)
}

/// True when `m` is square and `‖m·m† − I‖_max ≤ tol`.
pub fn is_unitary(m: &Array2<Complex64>, tol: f64) -> bool {
    if m.nrows() != m.ncols() {
        return false;
    }
    let product = m.dot(&adjoint(m));
    product.indexed_iter().all(|((i, j), z)| {
        let expected = if i == j { 1.0 } else { 0.0 };
        (z - Complex64::new(expected, 0.0)).norm() <= tol
    })
}
