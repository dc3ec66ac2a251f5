// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared request plumbing for the QVM and compiler HTTP clients.
//!
//! Both services speak JSON over a single `POST /` endpoint. Failures are
//! mapped onto [`BackendError`] without retrying:
//!
//! - connect error, 503: `Unavailable`
//! - timeout, 504: `Timeout`
//! - 400, 422: the caller's rejection kind (`CompilationFailed` or
//!   `ExecutionFailed`)
//! - anything else: `Http`

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::error::BackendError;

/// Build a reqwest client with a per-request timeout.
pub(crate) fn build_client(timeout_sec: u64) -> Result<reqwest::Client, BackendError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_sec))
        .build()
        .map_err(|e| BackendError::Http(format!("Failed to create HTTP client: {e}")))
}

/// Strip trailing slashes so `{base}/` is well formed.
pub(crate) fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// POST `body` and decode a JSON reply.
pub(crate) async fn post_json<B, T>(
    client: &reqwest::Client,
    url: &str,
    operation: &str,
    body: &B,
    rejected: fn(String) -> BackendError,
) -> Result<T, BackendError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let response = send(client, url, operation, body, rejected).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Http(format!("Failed to parse {operation} response: {e}")))
}

/// POST `body` and return the reply as text.
pub(crate) async fn post_text<B>(
    client: &reqwest::Client,
    url: &str,
    operation: &str,
    body: &B,
    rejected: fn(String) -> BackendError,
) -> Result<String, BackendError>
where
    B: Serialize + ?Sized,
{
    let response = send(client, url, operation, body, rejected).await?;
    response
        .text()
        .await
        .map_err(|e| BackendError::Http(format!("Failed to read {operation} response: {e}")))
}

async fn send<B>(
    client: &reqwest::Client,
    url: &str,
    operation: &str,
    body: &B,
    rejected: fn(String) -> BackendError,
) -> Result<reqwest::Response, BackendError>
where
    B: Serialize + ?Sized,
{
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(format!("{operation} timed out: {e}"))
            } else if e.is_connect() {
                BackendError::Unavailable(format!("{operation} could not connect to {url}: {e}"))
            } else {
                BackendError::Http(format!("{operation} request error: {e}"))
            }
        })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            rejected(format!("{operation} rejected ({status}): {body}"))
        }
        StatusCode::SERVICE_UNAVAILABLE => {
            BackendError::Unavailable(format!("{operation} failed ({status}): {body}"))
        }
        StatusCode::GATEWAY_TIMEOUT => {
            BackendError::Timeout(format!("{operation} failed ({status}): {body}"))
        }
        _ => BackendError::Http(format!("{operation} failed ({status}): {body}")),
    })
}
