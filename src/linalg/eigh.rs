// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Eigendecomposition of Hermitian matrices by cyclic complex Jacobi rotations.
//!
//! Each rotation first removes the phase of the pivot element with a diagonal
//! unitary, then applies the classic real Jacobi rotation to the resulting
//! real symmetric 2×2 block:
//!
//! ```text
//! V = D·R,   D = diag(1, e^{-iφ}),   R = [[c, s], [-s, c]]
//! ```
//!
//! The sweep order is fixed and no randomness is involved, so the same input
//! bits always produce the same eigenvalues and eigenvectors.
//!
//! Ref: Golub & Van Loan, "Matrix Computations" (4th ed.), §8.5.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use crate::error::ValidationError;

/// Sweeps before giving up. Jacobi converges quadratically, so a handful
/// suffices for any matrix the device handles.
const MAX_SWEEPS: usize = 64;

/// Relative off-diagonal norm treated as converged.
const TOLERANCE: f64 = 1e-15;

/// Eigenvalues (ascending) and the unitary whose columns are the matching
/// eigenvectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigensystem {
    /// Eigenvalues in ascending order
    pub eigenvalues: Array1<f64>,
    /// Column `i` is the eigenvector of `eigenvalues[i]`
    pub eigenvectors: Array2<Complex64>,
}

/// Diagonalize a Hermitian matrix.
///
/// Only the Hermitian part `(A + A†)/2` is used, so callers are expected to
/// have validated the input.
pub fn eigh(matrix: &Array2<Complex64>) -> Result<Eigensystem, ValidationError> {
    let n = matrix.nrows();
    if n == 0 || n != matrix.ncols() {
        return Err(ValidationError::Field {
            field: "matrix".into(),
            message: format!(
                "expected a non-empty square matrix, got {}x{}",
                matrix.nrows(),
                matrix.ncols()
            ),
        });
    }

    if matrix.iter().any(|z| !z.is_finite()) {
        return Err(ValidationError::Field {
            field: "matrix".into(),
            message: "matrix entries must be finite".into(),
        });
    }
    // Rotate a copy scaled to unit max-abs entry so the norms below can
    // neither underflow nor overflow.
    let max_abs = matrix
        .iter()
        .fold(0.0_f64, |acc, z| acc.max(z.re.abs()).max(z.im.abs()));
    let mut a = if max_abs == 0.0 {
        matrix.to_owned()
    } else {
        hermitian_part(&matrix.mapv(|z| z / max_abs))
    };
    let mut v = Array2::from_diag_elem(n, Complex64::new(1.0, 0.0));

    let scale = frobenius_norm(&a);
    let mut converged = scale == 0.0;

    for _ in 0..MAX_SWEEPS {
        if converged || off_diagonal_norm(&a) <= TOLERANCE * scale {
            converged = true;
            break;
        }
        for p in 0..n {
            for q in (p + 1)..n {
                rotate(&mut a, &mut v, p, q);
            }
        }
    }

    if !converged && off_diagonal_norm(&a) > TOLERANCE * scale {
        return Err(ValidationError::PhysicsConstraint(format!(
            "eigendecomposition of {}x{} matrix did not converge",
            n, n
        )));
    }

    // Sort ascending, carrying eigenvector columns along.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| a[[i, i]].re.total_cmp(&a[[j, j]].re));

    let eigenvalues = Array1::from_iter(order.iter().map(|&i| a[[i, i]].re * max_abs));
    let mut eigenvectors = Array2::zeros((n, n));
    for (dst, &src) in order.iter().enumerate() {
        eigenvectors.column_mut(dst).assign(&v.column(src));
    }

    Ok(Eigensystem {
        eigenvalues,
        eigenvectors,
    })
}

/// Zero the (p, q) element of `a` in place and accumulate the rotation in `v`.
fn rotate(a: &mut Array2<Complex64>, v: &mut Array2<Complex64>, p: usize, q: usize) {
    let apq = a[[p, q]];
    let magnitude = apq.norm();
    if magnitude == 0.0 {
        return;
    }

    let phase = (apq / magnitude).conj(); // e^{-iφ}
    let tau = (a[[q, q]].re - a[[p, p]].re) / (2.0 * magnitude);
    let t = if tau >= 0.0 {
        1.0 / (tau + (1.0 + tau * tau).sqrt())
    } else {
        -1.0 / (-tau + (1.0 + tau * tau).sqrt())
    };
    let c = 1.0 / (1.0 + t * t).sqrt();
    let s = t * c;

    // V restricted to the (p, q) plane
    let vpp = Complex64::new(c, 0.0);
    let vpq = Complex64::new(s, 0.0);
    let vqp = phase * -s;
    let vqq = phase * c;

    let n = a.nrows();

    // A ← A·V (columns p, q)
    for k in 0..n {
        let akp = a[[k, p]];
        let akq = a[[k, q]];
        a[[k, p]] = akp * vpp + akq * vqp;
        a[[k, q]] = akp * vpq + akq * vqq;
    }

    // A ← V†·A (rows p, q)
    for k in 0..n {
        let apk = a[[p, k]];
        let aqk = a[[q, k]];
        a[[p, k]] = vpp.conj() * apk + vqp.conj() * aqk;
        a[[q, k]] = vpq.conj() * apk + vqq.conj() * aqk;
    }

    a[[p, q]] = Complex64::new(0.0, 0.0);
    a[[q, p]] = Complex64::new(0.0, 0.0);
    a[[p, p]] = Complex64::new(a[[p, p]].re, 0.0);
    a[[q, q]] = Complex64::new(a[[q, q]].re, 0.0);

    // V_acc ← V_acc·V
    for k in 0..n {
        let vkp = v[[k, p]];
        let vkq = v[[k, q]];
        v[[k, p]] = vkp * vpp + vkq * vqp;
        v[[k, q]] = vkp * vpq + vkq * vqq;
    }
}

fn hermitian_part(m: &Array2<Complex64>) -> Array2<Complex64> {
    let adjoint = m.t().mapv(|z| z.conj());
    (m + &adjoint).mapv(|z| z * 0.5)
}

fn frobenius_norm(m: &Array2<Complex64>) -> f64 {
    m.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

fn off_diagonal_norm(m: &Array2<Complex64>) -> f64 {
    m.indexed_iter()
        .filter(|((i, j), _)| i != j)
        .map(|(_, z)| z.norm_sqr())
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    /// ‖A·V − V·diag(w)‖ should vanish and V should be unitary.
    fn assert_decomposes(m: &Array2<Complex64>, eig: &Eigensystem) {
        let n = m.nrows();
        let v = &eig.eigenvectors;
        let lhs = m.dot(v);
        for j in 0..n {
            for i in 0..n {
                let rhs = v[[i, j]] * eig.eigenvalues[j];
                assert!(
                    (lhs[[i, j]] - rhs).norm() < 1e-10,
                    "A·v != w·v at ({i}, {j})"
                );
            }
        }
        let gram = v.t().mapv(|z| z.conj()).dot(v);
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((gram[[i, j]] - c(expected, 0.0)).norm() < 1e-10);
            }
        }
    }

    #[test]
    fn test_diagonal_matrix_sorted() {
        let m = array![[c(3.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]];
        let eig = eigh(&m).unwrap();
        assert_eq!(eig.eigenvalues.to_vec(), vec![-1.0, 3.0]);
        // Columns swapped: eigenvector of -1 is |1⟩
        assert_eq!(eig.eigenvectors[[1, 0]], c(1.0, 0.0));
        assert_eq!(eig.eigenvectors[[0, 1]], c(1.0, 0.0));
    }

    #[test]
    fn test_pauli_y_eigenvalues() {
        let m = array![[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]];
        let eig = eigh(&m).unwrap();
        assert_relative_eq!(eig.eigenvalues[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(eig.eigenvalues[1], 1.0, epsilon = 1e-12);
        assert_decomposes(&m, &eig);
    }

    #[test]
    fn test_complex_two_by_two() {
        // Eigenvalues (1 ± √17) / 2
        let m = array![[c(1.0, 0.0), c(0.0, 2.0)], [c(0.0, -2.0), c(0.0, 0.0)]];
        let eig = eigh(&m).unwrap();
        let root = 17.0_f64.sqrt();
        assert_relative_eq!(eig.eigenvalues[0], (1.0 - root) / 2.0, epsilon = 1e-12);
        assert_relative_eq!(eig.eigenvalues[1], (1.0 + root) / 2.0, epsilon = 1e-12);
        assert_decomposes(&m, &eig);
    }

    #[test]
    fn test_four_by_four_hermitian() {
        let m = array![
            [c(-6.0, 0.0), c(2.0, 1.0), c(-3.0, 0.0), c(-5.0, 2.0)],
            [c(2.0, -1.0), c(0.0, 0.0), c(2.0, -1.0), c(-5.0, 4.0)],
            [c(-3.0, 0.0), c(2.0, 1.0), c(0.0, 0.0), c(-4.0, 3.0)],
            [c(-5.0, -2.0), c(-5.0, -4.0), c(-4.0, -3.0), c(-6.0, 0.0)],
        ];
        let eig = eigh(&m).unwrap();
        assert_decomposes(&m, &eig);

        // Trace is preserved
        let trace: f64 = eig.eigenvalues.sum();
        assert_relative_eq!(trace, -12.0, epsilon = 1e-10);

        for pair in eig.eigenvalues.to_vec().windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_deterministic() {
        let m = array![[c(4.0, 0.0), c(-1.0, 6.0)], [c(-1.0, -6.0), c(2.0, 0.0)]];
        let first = eigh(&m).unwrap();
        let second = eigh(&m).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_matrix() {
        let m = Array2::<Complex64>::zeros((2, 2));
        let eig = eigh(&m).unwrap();
        assert_eq!(eig.eigenvalues.to_vec(), vec![0.0, 0.0]);
    }

    /// `scale·[[1, 1], [1, -1]]` has eigenvalues `±√2·scale`.
    fn assert_scaled_reflection(scale: f64) {
        let unit = array![[c(1.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(-1.0, 0.0)]];
        let eig = eigh(&unit.mapv(|z| z * scale)).unwrap();
        let root = 2.0_f64.sqrt();
        assert_relative_eq!(eig.eigenvalues[0], -root * scale, max_relative = 1e-12);
        assert_relative_eq!(eig.eigenvalues[1], root * scale, max_relative = 1e-12);

        let normalized = Eigensystem {
            eigenvalues: eig.eigenvalues.mapv(|w| w / scale),
            eigenvectors: eig.eigenvectors.clone(),
        };
        assert_decomposes(&unit, &normalized);
    }

    #[test]
    fn test_tiny_entries() {
        assert_scaled_reflection(1e-300);
    }

    #[test]
    fn test_huge_entries() {
        assert_scaled_reflection(1e300);
    }

    #[test]
    fn test_non_finite_rejected() {
        let m = array![[c(f64::NAN, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]];
        assert!(eigh(&m).is_err());
        let m = array![[c(f64::INFINITY, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]];
        assert!(eigh(&m).is_err());
    }

    #[test]
    fn test_non_square_rejected() {
        let m = Array2::<Complex64>::zeros((2, 3));
        assert!(eigh(&m).is_err());
    }
}
