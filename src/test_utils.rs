// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities: scripted QVM and compiler clients.

use async_trait::async_trait;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::backend::compiler::{CompileRequest, CompileResponse, CompilerHttpClient};
use crate::backend::qvm::{MultishotRequest, MultishotResponse, QvmHttpClient};
use crate::error::BackendError;
use crate::quil::READOUT;

type Sampler = Box<dyn Fn(&mut StdRng) -> Vec<i64> + Send + Sync>;

enum QvmBehavior {
    /// Same rows for every request
    Rows(Vec<Vec<i64>>),
    /// One sampled row per trial
    Sample { sampler: Sampler, rng: Mutex<StdRng> },
    /// Every request fails
    Fail(BackendError),
}

/// Mock QVM client that records every request.
pub struct MockQvmClient {
    behavior: QvmBehavior,
    requests: Mutex<Vec<MultishotRequest>>,
}

impl MockQvmClient {
    /// Always answer with `rows` as the `ro` register.
    pub fn with_rows(rows: Vec<Vec<i64>>) -> Self {
        Self::from_behavior(QvmBehavior::Rows(rows))
    }

    /// Answer with one row per trial drawn from `sampler`, seeded with `seed`.
    pub fn with_sampler<F>(seed: u64, sampler: F) -> Self
    where
        F: Fn(&mut StdRng) -> Vec<i64> + Send + Sync + 'static,
    {
        Self::from_behavior(QvmBehavior::Sample {
            sampler: Box::new(sampler),
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        })
    }

    /// Fail every request with `error`.
    pub fn failing(error: BackendError) -> Self {
        Self::from_behavior(QvmBehavior::Fail(error))
    }

    fn from_behavior(behavior: QvmBehavior) -> Self {
        Self {
            behavior,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<MultishotRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl QvmHttpClient for MockQvmClient {
    async fn run_multishot(
        &self,
        request: &MultishotRequest,
    ) -> Result<MultishotResponse, BackendError> {
        self.requests.lock().push(request.clone());
        let rows = match &self.behavior {
            QvmBehavior::Rows(rows) => rows.clone(),
            QvmBehavior::Sample { sampler, rng } => {
                let mut rng = rng.lock();
                (0..request.trials).map(|_| sampler(&mut *rng)).collect()
            }
            QvmBehavior::Fail(error) => return Err(error.clone()),
        };
        let mut response = MultishotResponse::new();
        response.insert(READOUT.to_string(), rows);
        Ok(response)
    }

    async fn version(&self) -> Result<String, BackendError> {
        match &self.behavior {
            QvmBehavior::Fail(error) => Err(error.clone()),
            _ => Ok("1.17.1 [mock]".to_string()),
        }
    }
}

/// Mock compiler that echoes its input as the compiled program.
pub struct MockCompilerClient {
    failure: Option<BackendError>,
    requests: Mutex<Vec<CompileRequest>>,
}

impl MockCompilerClient {
    /// Echoing compiler.
    pub fn new() -> Self {
        Self {
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail every request with `error`.
    pub fn failing(error: BackendError) -> Self {
        Self {
            failure: Some(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CompileRequest> {
        self.requests.lock().clone()
    }
}

impl Default for MockCompilerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompilerHttpClient for MockCompilerClient {
    async fn compile(&self, request: &CompileRequest) -> Result<CompileResponse, BackendError> {
        self.requests.lock().push(request.clone());
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        Ok(CompileResponse {
            compiled_quil: request.uncompiled_quil.clone(),
        })
    }

    async fn version(&self) -> Result<String, BackendError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok("1.26.0 [mock]".to_string()),
        }
    }
}
