// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Memoized Hermitian eigendecompositions.

use std::collections::HashMap;

use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use super::eigh::{eigh, Eigensystem};
use crate::error::ValidationError;

/// Exact content of a matrix: its shape plus the bit pattern of every real
/// and imaginary part in row-major order.
///
/// Matrices that differ only by floating-point noise get distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatrixKey {
    rows: usize,
    bits: Vec<u64>,
}

impl MatrixKey {
    /// Canonical key for `matrix`.
    pub fn of(matrix: &Array2<Complex64>) -> Self {
        let bits = matrix
            .iter()
            .flat_map(|z| [z.re.to_bits(), z.im.to_bits()])
            .collect();
        Self {
            rows: matrix.nrows(),
            bits,
        }
    }
}

/// Cache of eigendecompositions, scoped to one device.
///
/// Entries are never evicted.
#[derive(Debug, Default)]
pub struct EigenCache {
    entries: HashMap<MatrixKey, Eigensystem>,
    diagonalizations: usize,
}

impl EigenCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached decomposition of `matrix`, computing it on first use.
    pub fn get_or_compute(
        &mut self,
        matrix: &Array2<Complex64>,
    ) -> Result<&Eigensystem, ValidationError> {
        let key = MatrixKey::of(matrix);
        if !self.entries.contains_key(&key) {
            let system = eigh(matrix)?;
            self.diagonalizations += 1;
            debug!(
                dim = matrix.nrows(),
                eigenvalues = ?system.eigenvalues.to_vec(),
                "Diagonalized Hermitian observable"
            );
            self.entries.insert(key.clone(), system);
        }
        // Present: inserted above if it was missing
        self.entries.get(&key).ok_or_else(|| {
            ValidationError::PhysicsConstraint("eigen-cache entry vanished".into())
        })
    }

    /// Cached decomposition of `matrix`, if any.
    pub fn get(&self, matrix: &Array2<Complex64>) -> Option<&Eigensystem> {
        self.entries.get(&MatrixKey::of(matrix))
    }

    /// Number of distinct matrices cached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// How many times a diagonalization actually ran.
    pub fn diagonalizations(&self) -> usize {
        self.diagonalizations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_cache_hit_skips_diagonalization() {
        let m = array![[c(4.0, 0.0), c(-1.0, 6.0)], [c(-1.0, -6.0), c(2.0, 0.0)]];
        let mut cache = EigenCache::new();

        let first = cache.get_or_compute(&m).unwrap().clone();
        let second = cache.get_or_compute(&m).unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(cache.diagonalizations(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_near_duplicates_cached_separately() {
        let m = array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]];
        let mut noisy = m.clone();
        noisy[[0, 0]] = c(1.0 + f64::EPSILON, 0.0);

        let mut cache = EigenCache::new();
        cache.get_or_compute(&m).unwrap();
        cache.get_or_compute(&noisy).unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.diagonalizations(), 2);
    }

    #[test]
    fn test_key_distinguishes_shape() {
        let row = Array2::<Complex64>::zeros((1, 4));
        let square = Array2::<Complex64>::zeros((2, 2));
        assert_ne!(MatrixKey::of(&row), MatrixKey::of(&square));
    }

    #[test]
    fn test_get_before_compute() {
        let m = array![[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]];
        let mut cache = EigenCache::new();
        assert!(cache.get(&m).is_none());
        assert!(cache.is_empty());
        cache.get_or_compute(&m).unwrap();
        assert!(cache.get(&m).is_some());
    }
}
