// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for the QVM device.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. forest.yaml file
//! 3. Environment variables (QVM_URL, COMPILER_URL, FOREST_QVM_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Device options
    #[serde(default)]
    pub device: DeviceOptions,

    /// Service endpoints
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// Noise applied by the QVM when the device is noisy
    #[serde(default)]
    pub noise: NoiseConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            for path in &["forest.yaml", "forest.yml", "/etc/forest-qvm/config.yaml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any key/value source shaped like the environment.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("QVM_URL") {
            self.endpoints.qvm_url = val;
        }
        if let Some(val) = lookup("COMPILER_URL") {
            self.endpoints.compiler_url = val;
        }
        if let Some(val) = lookup("FOREST_QVM_SHOTS") {
            if let Ok(shots) = val.parse() {
                self.device.shots = shots;
            }
        }
        if let Some(val) = lookup("FOREST_QVM_NOISY") {
            self.device.noisy = parse_flag(&val);
        }
        if let Some(val) = lookup("FOREST_QVM_ACTIVE_RESET") {
            self.device.active_reset = parse_flag(&val);
        }
        if let Some(val) = lookup("FOREST_QVM_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.device.shots == 0 {
            return Err(Error::Config(
                "Number of shots must be a positive integer.".into(),
            ));
        }
        if self.endpoints.qvm_url.trim().is_empty() {
            return Err(Error::Config("QVM URL cannot be empty".into()));
        }
        if self.endpoints.compiler_url.trim().is_empty() {
            return Err(Error::Config("Compiler URL cannot be empty".into()));
        }
        if self.endpoints.timeout_sec == 0 {
            return Err(Error::Config("Request timeout cannot be 0".into()));
        }
        for (label, triple) in [
            ("gate_noise", &self.noise.gate_noise),
            ("measurement_noise", &self.noise.measurement_noise),
        ] {
            if triple.iter().any(|p| !(0.0..=1.0).contains(p)) {
                return Err(Error::Config(format!(
                    "{} probabilities must lie in [0, 1], got {:?}",
                    label, triple
                )));
            }
            if triple.iter().sum::<f64>() > 1.0 {
                return Err(Error::Config(format!(
                    "{} probabilities must sum to at most 1, got {:?}",
                    label, triple
                )));
            }
        }
        if self.device.noisy && self.noise.is_silent() {
            tracing::warn!(
                "Device is marked noisy but all noise probabilities are zero. \
                 Set noise.gate_noise or noise.measurement_noise."
            );
        }
        Ok(())
    }
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

/// Per-device options fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceOptions {
    /// Number of circuit evaluations used to estimate statistics
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Ask the QVM to apply its noise model
    #[serde(default)]
    pub noisy: bool,

    /// Prepend a RESET instruction to every program
    #[serde(default)]
    pub active_reset: bool,
}

impl Default for DeviceOptions {
    fn default() -> Self {
        Self {
            shots: default_shots(),
            noisy: false,
            active_reset: false,
        }
    }
}

fn default_shots() -> u32 {
    1024
}

/// QVM and compiler service endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// QVM server URL
    #[serde(default = "default_qvm_url")]
    pub qvm_url: String,

    /// Quil compiler server URL
    #[serde(default = "default_compiler_url")]
    pub compiler_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_sec: u64,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            qvm_url: default_qvm_url(),
            compiler_url: default_compiler_url(),
            timeout_sec: default_timeout(),
        }
    }
}

fn default_qvm_url() -> String {
    "http://127.0.0.1:5000".into()
}

fn default_compiler_url() -> String {
    "http://127.0.0.1:6000".into()
}

fn default_timeout() -> u64 {
    30
}

/// Pauli noise channels understood by the QVM.
///
/// Each triple holds the probabilities of an X, Y and Z error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Error applied after every gate
    #[serde(default = "default_gate_noise")]
    pub gate_noise: [f64; 3],

    /// Error applied before every measurement
    #[serde(default = "default_measurement_noise")]
    pub measurement_noise: [f64; 3],
}

impl NoiseConfig {
    /// True when every probability is zero.
    pub fn is_silent(&self) -> bool {
        self.gate_noise
            .iter()
            .chain(self.measurement_noise.iter())
            .all(|p| *p == 0.0)
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            gate_noise: default_gate_noise(),
            measurement_noise: default_measurement_noise(),
        }
    }
}

fn default_gate_noise() -> [f64; 3] {
    [0.001, 0.001, 0.001]
}

fn default_measurement_noise() -> [f64; 3] {
    [0.01, 0.0, 0.0]
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}
