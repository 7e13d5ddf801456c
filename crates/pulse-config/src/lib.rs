// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # pulse-config
//!
//! Environment-driven configuration for the Pulse engine.
//!
//! Configuration is sourced from environment variables (the deployment
//! shell owns files and secrets). The recognised variable set:
//!
//! - `CONFLUENT_BOOTSTRAP_SERVERS`, `CONFLUENT_API_KEY`,
//!   `CONFLUENT_API_SECRET`, `CONFLUENT_SECURITY_PROTOCOL`,
//!   `CONFLUENT_SASL_MECHANISM`
//! - `GOOGLE_CLOUD_PROJECT`, `VERTEX_AI_LOCATION`, `VERTEX_AI_ENDPOINT_ID`,
//!   `FIRESTORE_PROJECT_ID`
//! - `PORT`, `ENVIRONMENT`, `ALLOWED_ORIGINS`, `LOG_LEVEL`
//! - `TOPIC_*` overrides for every stream name
//! - `LOOPBACK_ANALYTICS` to let the consumer perform the analytics
//!   writes itself (deployments without an external stream processor)
//!
//! ## Example
//!
//! ```rust,ignore
//! use pulse_config::PulseConfig;
//!
//! let config = PulseConfig::from_env()?;
//! config.validate()?;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod loader;
pub mod schema;

pub use loader::{load_from_env, parse_allowed_origins};
pub use schema::{
    BusSettings, CloudSettings, PulseConfig, ServerSettings, TopicSettings, WorkerSettings,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
