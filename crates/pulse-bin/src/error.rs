// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Binary-level errors.

use thiserror::Error;

/// Result type alias for the binary.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that terminate the process.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A component failed to initialize.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// The server failed at runtime.
    #[error("Runtime error: {0}")]
    Runtime(String),
}
