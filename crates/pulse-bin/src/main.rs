// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Pulse service entrypoint.

mod cli;
mod error;
mod logging;
mod runtime;

use clap::Parser;
use tracing::error;

use pulse_config::PulseConfig;

use crate::cli::{Cli, Command};
use crate::error::{BinError, BinResult};
use crate::runtime::ServiceRuntime;

fn main() {
    let cli = Cli::parse();

    let config = match PulseConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.server.log_level.clone());
    logging::init_logging(&level, cli.log_format);

    let result = match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(config),
        Command::Validate => validate(config),
        Command::Version => {
            println!("pulse {}", pulse_core::VERSION);
            Ok(())
        }
    };

    if let Err(e) = result {
        error!(error = %e, "fatal");
        std::process::exit(1);
    }
}

fn run(config: PulseConfig) -> BinResult<()> {
    config
        .validate()
        .map_err(|e| BinError::Configuration(e.to_string()))?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| BinError::Initialization(format!("tokio runtime: {e}")))?;

    runtime.block_on(ServiceRuntime::new(config).run())
}

fn validate(config: PulseConfig) -> BinResult<()> {
    config
        .validate()
        .map_err(|e| BinError::Configuration(e.to_string()))?;

    println!("configuration OK");
    Ok(())
}
