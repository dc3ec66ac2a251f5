// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for device construction and measurement requests.

use std::collections::BTreeSet;

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{Error, Result, ValidationError};
use crate::linalg::{is_hermitian, is_unitary};

/// Tolerance for Hermiticity and unitarity checks on user-supplied matrices.
pub const MATRIX_TOLERANCE: f64 = 1e-8;

/// Validate the shot count given at construction.
pub fn validate_shots(shots: u32) -> Result<()> {
    if shots == 0 {
        return Err(Error::Config(
            "Number of shots must be a positive integer.".into(),
        ));
    }
    Ok(())
}

/// Validate that a wire list is non-empty and has no repeats.
pub fn validate_distinct(field: &str, wires: &[usize]) -> Result<()> {
    if wires.is_empty() {
        return Err(ValidationError::Field {
            field: field.into(),
            message: "at least one wire is required".into(),
        }
        .into());
    }

    let mut seen = BTreeSet::new();
    for &wire in wires {
        if !seen.insert(wire) {
            return Err(ValidationError::Field {
                field: field.into(),
                message: format!("duplicate wire {}", wire),
            }
            .into());
        }
    }
    Ok(())
}

/// Validate a wire list against the device width.
///
/// Wires must be non-empty, distinct and lie in `0..num_wires`.
pub fn validate_wires(field: &str, wires: &[usize], num_wires: usize) -> Result<()> {
    validate_distinct(field, wires)?;
    if let Some(&wire) = wires.iter().find(|&&w| w >= num_wires) {
        return Err(ValidationError::ResourceLimit {
            resource: format!("{} wire index", field),
            limit: num_wires.saturating_sub(1) as u64,
            requested: wire as u64,
        }
        .into());
    }
    Ok(())
}

/// Validate that `matrix` acts on `num_wires` qubits.
fn validate_matrix_shape(field: &str, matrix: &Array2<Complex64>, num_wires: usize) -> Result<()> {
    let dim = 1usize.checked_shl(num_wires as u32).unwrap_or(0);
    if matrix.nrows() != dim || matrix.ncols() != dim {
        return Err(ValidationError::Field {
            field: field.into(),
            message: format!(
                "expected a {}x{} matrix for {} wire(s), got {}x{}",
                dim,
                dim,
                num_wires,
                matrix.nrows(),
                matrix.ncols()
            ),
        }
        .into());
    }
    if matrix.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(ValidationError::Field {
            field: field.into(),
            message: "contains NaN or Inf".into(),
        }
        .into());
    }
    Ok(())
}

/// Validate a Hermitian observable matrix.
pub fn validate_hermitian(matrix: &Array2<Complex64>, num_wires: usize) -> Result<()> {
    validate_matrix_shape("matrix", matrix, num_wires)?;
    if !is_hermitian(matrix, MATRIX_TOLERANCE) {
        return Err(ValidationError::PhysicsConstraint(
            "observable matrix is not Hermitian".into(),
        )
        .into());
    }
    Ok(())
}

/// Validate a gate matrix.
pub fn validate_unitary(matrix: &Array2<Complex64>, num_wires: usize) -> Result<()> {
    validate_matrix_shape("matrix", matrix, num_wires)?;
    if !is_unitary(matrix, MATRIX_TOLERANCE) {
        return Err(ValidationError::PhysicsConstraint(
            "gate matrix is not unitary".into(),
        )
        .into());
    }
    Ok(())
}

/// A validated, strictly positive number of samples.
///
/// Built from integers or floats so that non-integral and non-positive
/// counts are rejected when `sample` is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleCount(usize);

impl SampleCount {
    /// The count as `usize`.
    pub fn get(self) -> usize {
        self.0
    }
}

fn zero_samples() -> Error {
    Error::Sampling("Calling sample with n = 0 is not possible.".into())
}

fn non_positive_samples() -> Error {
    Error::Sampling("The number of samples must be a positive integer.".into())
}

impl TryFrom<i64> for SampleCount {
    type Error = Error;

    fn try_from(n: i64) -> Result<Self> {
        match n {
            0 => Err(zero_samples()),
            n if n < 0 => Err(non_positive_samples()),
            n => usize::try_from(n)
                .map(SampleCount)
                .map_err(|_| non_positive_samples()),
        }
    }
}

impl TryFrom<i32> for SampleCount {
    type Error = Error;

    fn try_from(n: i32) -> Result<Self> {
        SampleCount::try_from(i64::from(n))
    }
}

impl TryFrom<usize> for SampleCount {
    type Error = Error;

    fn try_from(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(zero_samples());
        }
        Ok(SampleCount(n))
    }
}

impl TryFrom<u32> for SampleCount {
    type Error = Error;

    fn try_from(n: u32) -> Result<Self> {
        SampleCount::try_from(n as usize)
    }
}

impl TryFrom<f64> for SampleCount {
    type Error = Error;

    fn try_from(n: f64) -> Result<Self> {
        if n == 0.0 {
            return Err(zero_samples());
        }
        if !n.is_finite() || n < 0.0 || n.fract() != 0.0 || n > usize::MAX as f64 {
            return Err(non_positive_samples());
        }
        Ok(SampleCount(n as usize))
    }
}
