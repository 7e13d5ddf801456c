// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Unified error hierarchy for Pulse.
//!
//! This module defines an error type system that:
//!
//! - Provides clear, descriptive error messages
//! - Distinguishes between retryable and non-retryable errors
//! - Maps errors to appropriate HTTP status codes
//! - Supports structured logging
//!
//! # Error Hierarchy
//!
//! ```text
//! PulseError (root)
//! ├── ConfigError    - Environment configuration loading and validation
//! ├── BusError       - Message bus publish/subscribe operations
//! ├── StoreError     - Document store operations
//! └── EnrichError    - Content enrichment (keyword service)
//! ```
//!
//! # Examples
//!
//! ```
//! use pulse_core::error::{PulseError, StoreError};
//!
//! let error = StoreError::not_found("trending_scores", "post-1");
//! assert!(!error.is_retryable());
//!
//! let pulse_error: PulseError = error.into();
//! assert_eq!(pulse_error.status_code(), 404);
//! ```

use thiserror::Error;

// =============================================================================
// PulseError - Root Error Type
// =============================================================================

/// The root error type for Pulse.
///
/// All errors in Pulse can be converted to this type, providing a unified
/// error handling interface across the entire system.
#[derive(Debug, Error)]
pub enum PulseError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Message bus error.
    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    /// Document store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Content enrichment error.
    #[error("Enrichment error: {0}")]
    Enrich(#[from] EnrichError),

    /// Invalid input rejected before any side effect.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Error message.
        message: String,
    },
}

impl PulseError {
    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            PulseError::Bus(e) => e.is_retryable(),
            PulseError::Store(e) => e.is_retryable(),
            PulseError::Enrich(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Returns the error type as a string for logging/metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            PulseError::Config(_) => "config",
            PulseError::Bus(_) => "bus",
            PulseError::Store(_) => "store",
            PulseError::Enrich(_) => "enrich",
            PulseError::InvalidInput { .. } => "input",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            PulseError::Config(_) => 500,
            PulseError::Bus(_) => 500,
            PulseError::Store(e) => e.status_code(),
            PulseError::Enrich(_) => 500,
            PulseError::InvalidInput { .. } => 400,
        }
    }

    /// Returns a user-friendly error message.
    ///
    /// This message is suitable for display to end users and avoids
    /// exposing internal implementation details.
    pub fn user_message(&self) -> String {
        match self {
            PulseError::Config(e) => format!("설정 오류: {}", e),
            PulseError::Bus(e) => format!("스트림 전송 오류: {}", e),
            PulseError::Store(e) => format!("저장소 오류: {}", e),
            PulseError::Enrich(e) => format!("콘텐츠 분석 오류: {}", e),
            PulseError::InvalidInput { message } => format!("잘못된 요청: {}", message),
        }
    }
}

// =============================================================================
// ConfigError
// =============================================================================

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("Missing required environment variable: {name}")]
    MissingVar {
        /// The missing variable name.
        name: String,
    },

    /// Environment variable could not be parsed.
    #[error("Invalid value for {name}: {message}")]
    InvalidVar {
        /// The variable name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    /// Creates a missing-variable error.
    pub fn missing_var(name: impl Into<String>) -> Self {
        Self::MissingVar { name: name.into() }
    }

    /// Creates an invalid-variable error.
    pub fn invalid_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// BusError
// =============================================================================

/// Message bus errors.
#[derive(Debug, Error)]
pub enum BusError {
    /// Client construction or configuration failed.
    #[error("Bus client error: {message}")]
    Client {
        /// Error message.
        message: String,
    },

    /// Publishing a record failed.
    #[error("Failed to publish to '{topic}': {message}")]
    Publish {
        /// The target topic.
        topic: String,
        /// Error message.
        message: String,
    },

    /// Subscribing to topics failed.
    #[error("Failed to subscribe to topics: {message}")]
    Subscribe {
        /// Error message.
        message: String,
    },

    /// A record could not be decoded.
    #[error("Failed to decode record from '{topic}': {message}")]
    Decode {
        /// The source topic.
        topic: String,
        /// Error message.
        message: String,
    },

    /// Serializing a record for publish failed.
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl BusError {
    /// Creates a client error.
    pub fn client(message: impl Into<String>) -> Self {
        Self::Client {
            message: message.into(),
        }
    }

    /// Creates a publish error.
    pub fn publish(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Publish {
            topic: topic.into(),
            message: message.into(),
        }
    }

    /// Creates a subscribe error.
    pub fn subscribe(message: impl Into<String>) -> Self {
        Self::Subscribe {
            message: message.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            topic: topic.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this error is retryable.
    ///
    /// Publish failures are transient transport conditions; decode and
    /// encode failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BusError::Publish { .. } | BusError::Subscribe { .. })
    }

    /// Returns the error type as a string for logging/metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            BusError::Client { .. } => "client",
            BusError::Publish { .. } => "publish",
            BusError::Subscribe { .. } => "subscribe",
            BusError::Decode { .. } => "decode",
            BusError::Encode(_) => "encode",
        }
    }
}

// =============================================================================
// StoreError
// =============================================================================

/// Document store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A document was not found.
    #[error("Document not found: {collection}/{id}")]
    NotFound {
        /// The logical collection.
        collection: String,
        /// The document ID.
        id: String,
    },

    /// A document failed validation before write.
    #[error("Invalid document: {message}")]
    InvalidDocument {
        /// Error message.
        message: String,
    },

    /// A document could not be encoded or decoded.
    #[error("Document serialization failed: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// The backend rejected or failed the operation.
    #[error("Store backend error: {message}")]
    Backend {
        /// Error message.
        message: String,
    },
}

impl StoreError {
    /// Creates a not-found error.
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates an invalid-document error.
    pub fn invalid_document(message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Creates a backend error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not-found miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Backend { .. })
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound { .. } => 404,
            StoreError::InvalidDocument { .. } => 400,
            _ => 500,
        }
    }

    /// Returns the error type as a string for logging/metrics.
    pub fn error_type(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "not_found",
            StoreError::InvalidDocument { .. } => "invalid",
            StoreError::Serialization { .. } => "serialization",
            StoreError::Backend { .. } => "backend",
        }
    }
}

// =============================================================================
// EnrichError
// =============================================================================

/// Content enrichment errors.
///
/// These never surface to API callers; enrichment falls back to the
/// deterministic keyword extractor instead.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The generative service is unreachable.
    #[error("Enrichment service unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// The generative service returned a malformed response.
    #[error("Malformed enrichment response: {message}")]
    Malformed {
        /// Error message.
        message: String,
    },
}

impl EnrichError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EnrichError::Unavailable { .. })
    }
}

// =============================================================================
// Tests
// =============================================================================
