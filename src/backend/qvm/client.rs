// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP client abstraction for the QVM server.
//!
//! Provides [`QvmHttpClient`] for abstracting HTTP operations and
//! [`ReqwestQvmClient`] for production use.

use async_trait::async_trait;
use tracing::debug;

use crate::backend::http::{build_client, normalize_url, post_json, post_text};
use crate::config::EndpointsConfig;
use crate::error::BackendError;

use super::{MultishotRequest, MultishotResponse, VersionRequest};

/// Trait for QVM HTTP operations.
///
/// This trait enables testing the device without a running QVM.
#[async_trait]
pub trait QvmHttpClient: Send + Sync {
    /// Run a program for the requested number of trials.
    async fn run_multishot(
        &self,
        request: &MultishotRequest,
    ) -> Result<MultishotResponse, BackendError>;

    /// Server version string.
    async fn version(&self) -> Result<String, BackendError>;
}

/// Production HTTP client using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestQvmClient {
    client: reqwest::Client,
    url: String,
}

impl ReqwestQvmClient {
    /// Create a client for the QVM at `url`.
    pub fn new(url: &str, timeout_sec: u64) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(timeout_sec)?,
            url: normalize_url(url),
        })
    }

    /// Create a client from endpoint configuration.
    pub fn from_config(endpoints: &EndpointsConfig) -> Result<Self, BackendError> {
        Self::new(&endpoints.qvm_url, endpoints.timeout_sec)
    }

    /// Base URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QvmHttpClient for ReqwestQvmClient {
    async fn run_multishot(
        &self,
        request: &MultishotRequest,
    ) -> Result<MultishotResponse, BackendError> {
        let url = format!("{}/", self.url);
        debug!(url = %url, trials = request.trials, "Submitting program to QVM");
        post_json(
            &self.client,
            &url,
            "run_multishot",
            request,
            BackendError::ExecutionFailed,
        )
        .await
    }

    async fn version(&self) -> Result<String, BackendError> {
        let url = format!("{}/", self.url);
        let text = post_text(
            &self.client,
            &url,
            "version",
            &VersionRequest::default(),
            BackendError::ExecutionFailed,
        )
        .await?;
        Ok(text.trim().to_string())
    }
}
