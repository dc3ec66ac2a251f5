// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Circuit description types.
//!
//! Gates and observables are closed enums. Frontend name strings are parsed
//! once, at the boundary, by [`Gate::from_name`] and [`Observable::from_name`].

pub mod file;
pub mod observable;
pub mod operation;

pub use file::{CircuitFile, Outcome};
pub use observable::{Observable, ObservableRequest};
pub use operation::{Gate, Operation};
