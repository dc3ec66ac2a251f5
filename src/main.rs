// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Forest QVM command-line tool
//!
//! # Usage
//!
//! ```bash
//! # Execute a circuit file and print results as JSON
//! forest-qvm run circuit.yaml
//!
//! # Use a custom config
//! forest-qvm run circuit.yaml --config /path/to/forest.yaml
//!
//! # Check that the QVM and compiler are reachable
//! forest-qvm health
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use forest_qvm::backend::{DeviceSpec, HealthStatus, QuantumComputer};
use forest_qvm::circuit::CircuitFile;
use forest_qvm::config::{Config, LoggingConfig};
use forest_qvm::{QvmDevice, Result, VERSION};

/// Forest QVM device
#[derive(Parser)]
#[command(name = "forest-qvm")]
#[command(author = "QubitOS Contributors")]
#[command(version = VERSION)]
#[command(about = "Run circuits on the Rigetti QVM and estimate observables")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a circuit file
    Run {
        /// Circuit YAML file
        circuit: PathBuf,

        /// Override the shot count
        #[arg(long)]
        shots: Option<u32>,

        /// Override the device named in the file
        #[arg(long)]
        device: Option<String>,
    },

    /// Check QVM and compiler health
    Health {
        /// Device whose services to probe
        #[arg(long, default_value = "1q-qvm")]
        device: String,
    },

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    // Initialize logging
    init_logging(&config.logging);

    match cli.command {
        Commands::Run {
            circuit,
            shots,
            device,
        } => {
            let file = CircuitFile::load(&circuit)?;
            let mut options = file.options(&config.device);
            if let Some(shots) = shots {
                options.shots = shots;
            }
            config.device = options;
            config.validate()?;

            let spec = match device {
                Some(name) => DeviceSpec::Name(name),
                None => file.device_spec()?,
            };

            info!(
                version = VERSION,
                circuit = %circuit.display(),
                shots = config.device.shots,
                "Executing circuit"
            );

            let mut dev = QvmDevice::from_config(spec, &config)?;
            let outcomes = file.execute(&mut dev).await?;
            println!("{}", serde_json::to_string_pretty(&outcomes)?);
        }

        Commands::Health { device } => {
            let noise = config.device.noisy.then(|| config.noise.clone());
            let qc = QuantumComputer::connect(&DeviceSpec::Name(device), noise, &config.endpoints)?;
            let health = qc.health_check().await;

            match &health.qvm_version {
                Ok(version) => println!("qvm ({}): {}", config.endpoints.qvm_url, version),
                Err(e) => println!("qvm ({}): Error - {}", config.endpoints.qvm_url, e),
            }
            match &health.compiler_version {
                Ok(version) => println!("compiler ({}): {}", config.endpoints.compiler_url, version),
                Err(e) => println!("compiler ({}): Error - {}", config.endpoints.compiler_url, e),
            }
            println!("status: {}", health.status);

            if health.status != HealthStatus::Healthy {
                error!(status = %health.status, "QVM services are not healthy");
                std::process::exit(1);
            }
        }

        Commands::Config => {
            // Show effective configuration
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => {
            // Validate configuration
            match config.validate() {
                Ok(()) => {
                    println!("Configuration is valid");
                }
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Initialize logging with tracing.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
