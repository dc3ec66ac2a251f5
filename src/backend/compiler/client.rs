// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP client abstraction for the Quil compiler server.

use async_trait::async_trait;
use tracing::debug;

use crate::backend::http::{build_client, normalize_url, post_json, post_text};
use crate::backend::qvm::VersionRequest;
use crate::config::EndpointsConfig;
use crate::error::BackendError;

use super::{CompileRequest, CompileResponse};

/// Trait for compiler HTTP operations.
#[async_trait]
pub trait CompilerHttpClient: Send + Sync {
    /// Compile a program for the target device.
    async fn compile(&self, request: &CompileRequest) -> Result<CompileResponse, BackendError>;

    /// Server version string.
    async fn version(&self) -> Result<String, BackendError>;
}

/// Production HTTP client using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestCompilerClient {
    client: reqwest::Client,
    url: String,
}

impl ReqwestCompilerClient {
    /// Create a client for the compiler at `url`.
    pub fn new(url: &str, timeout_sec: u64) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(timeout_sec)?,
            url: normalize_url(url),
        })
    }

    /// Create a client from endpoint configuration.
    pub fn from_config(endpoints: &EndpointsConfig) -> Result<Self, BackendError> {
        Self::new(&endpoints.compiler_url, endpoints.timeout_sec)
    }
}

#[async_trait]
impl CompilerHttpClient for ReqwestCompilerClient {
    async fn compile(&self, request: &CompileRequest) -> Result<CompileResponse, BackendError> {
        let url = format!("{}/", self.url);
        debug!(url = %url, "Submitting program to compiler");
        post_json(
            &self.client,
            &url,
            "compile",
            request,
            BackendError::CompilationFailed,
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
            BackendError::CompilationFailed,
        )
        .await?;
        Ok(text.trim().to_string())
    }
}
