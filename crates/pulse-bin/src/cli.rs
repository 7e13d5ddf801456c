// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Command-line interface definition.

use clap::{Parser, Subcommand, ValueEnum};

// =============================================================================
// CLI
// =============================================================================

/// Pulse - real-time viral-content intelligence engine.
#[derive(Debug, Parser)]
#[command(name = "pulse", version, about)]
pub struct Cli {
    /// Log level override (defaults to LOG_LEVEL or info).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Subcommand; defaults to `run`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the service (default).
    Run,
    /// Load and validate the configuration, then exit.
    Validate,
    /// Print version information and exit.
    Version,
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable text (default).
    Text,
    /// JSON lines for log aggregation.
    Json,
    /// Minimal single-line output.
    Compact,
}

// =============================================================================
// Tests
// =============================================================================
