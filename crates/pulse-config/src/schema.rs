// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema.
//!
//! Plain serde structs with defaults matching a local development setup.
//! Validation lives on the types so both the loader and the `validate`
//! CLI command share it.

use serde::{Deserialize, Serialize};

use pulse_core::error::ConfigError;

// =============================================================================
// PulseConfig
// =============================================================================

/// Top-level configuration for the Pulse service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PulseConfig {
    /// Message bus settings.
    #[serde(default)]
    pub bus: BusSettings,
    /// Cloud service settings.
    #[serde(default)]
    pub cloud: CloudSettings,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSettings,
    /// Stream/topic name settings.
    #[serde(default)]
    pub topics: TopicSettings,
    /// Background worker settings.
    #[serde(default)]
    pub workers: WorkerSettings,
}

impl PulseConfig {
    /// Loads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        crate::loader::load_from_env()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bus.validate()?;
        self.server.validate()?;
        self.topics.validate()?;
        self.workers.validate()?;
        Ok(())
    }
}

// =============================================================================
// BusSettings
// =============================================================================

/// Connection settings for the Confluent message bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusSettings {
    /// Broker bootstrap servers.
    #[serde(default)]
    pub bootstrap_servers: String,
    /// SASL username.
    #[serde(default)]
    pub api_key: String,
    /// SASL password.
    #[serde(default)]
    pub api_secret: String,
    /// Security protocol.
    #[serde(default = "default_security_protocol")]
    pub security_protocol: String,
    /// SASL mechanism.
    #[serde(default = "default_sasl_mechanism")]
    pub sasl_mechanism: String,
    /// Consumer group ID.
    #[serde(default = "default_group_id")]
    pub group_id: String,
    /// Whether the consumer also subscribes to the raw event streams and
    /// performs the analytics writes itself (no external stream processor).
    #[serde(default)]
    pub loopback_analytics: bool,
}

fn default_security_protocol() -> String {
    "SASL_SSL".to_string()
}

fn default_sasl_mechanism() -> String {
    "PLAIN".to_string()
}

fn default_group_id() -> String {
    "viral-intelligence-consumer".to_string()
}

impl Default for BusSettings {
    fn default() -> Self {
        Self {
            bootstrap_servers: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            security_protocol: default_security_protocol(),
            sasl_mechanism: default_sasl_mechanism(),
            group_id: default_group_id(),
            loopback_analytics: false,
        }
    }
}

impl BusSettings {
    /// Validates the bus settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bootstrap_servers.is_empty() {
            return Err(ConfigError::validation(
                "bus.bootstrap_servers",
                "bootstrap servers must be set",
            ));
        }
        if self.group_id.is_empty() {
            return Err(ConfigError::validation(
                "bus.group_id",
                "consumer group ID must not be empty",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// CloudSettings
// =============================================================================

/// Identifiers for the external cloud services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudSettings {
    /// Google Cloud project ID.
    #[serde(default = "default_project")]
    pub google_project: String,
    /// Vertex AI region.
    #[serde(default = "default_vertex_location")]
    pub vertex_location: String,
    /// Vertex AI endpoint ID.
    #[serde(default)]
    pub vertex_endpoint_id: String,
    /// Document store project ID.
    #[serde(default = "default_project")]
    pub store_project: String,
}

fn default_project() -> String {
    "yarimai".to_string()
}

fn default_vertex_location() -> String {
    "us-central1".to_string()
}

impl Default for CloudSettings {
    fn default() -> Self {
        Self {
            google_project: default_project(),
            vertex_location: default_vertex_location(),
            vertex_endpoint_id: String::new(),
            store_project: default_project(),
        }
    }
}

// =============================================================================
// ServerSettings
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Deployment environment name (development, production).
    #[serde(default = "default_environment")]
    pub environment: String,
    /// Allowed CORS origins; `*` allows any origin.
    #[serde(default = "default_origins")]
    pub allowed_origins: Vec<String>,
    /// Log level (debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    8080
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            environment: default_environment(),
            allowed_origins: default_origins(),
            log_level: default_log_level(),
        }
    }
}

impl ServerSettings {
    /// Returns `true` in the production environment.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Validates the server settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation("server.port", "port must be non-zero"));
        }
        match self.log_level.as_str() {
            "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::validation(
                    "server.log_level",
                    format!("unknown log level '{other}'"),
                ));
            }
        }
        if self.allowed_origins.is_empty() {
            return Err(ConfigError::validation(
                "server.allowed_origins",
                "at least one origin (or '*') is required",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// TopicSettings
// =============================================================================

/// Names of the six logical streams on the bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSettings {
    /// User interaction events.
    #[serde(default = "default_user_interactions")]
    pub user_interactions: String,
    /// Content creation metadata.
    #[serde(default = "default_content_metadata")]
    pub content_metadata: String,
    /// View events.
    #[serde(default = "default_view_events")]
    pub view_events: String,
    /// Remix events.
    #[serde(default = "default_remix_events")]
    pub remix_events: String,
    /// Trending score upserts.
    #[serde(default = "default_trending_scores")]
    pub trending_scores: String,
    /// Recommendation records.
    #[serde(default = "default_recommendations")]
    pub recommendations: String,
}

fn default_user_interactions() -> String {
    "user-interactions".to_string()
}

fn default_content_metadata() -> String {
    "content-metadata".to_string()
}

fn default_view_events() -> String {
    "view-events".to_string()
}

fn default_remix_events() -> String {
    "remix-events".to_string()
}

fn default_trending_scores() -> String {
    "trending-scores".to_string()
}

fn default_recommendations() -> String {
    "recommendations".to_string()
}

impl Default for TopicSettings {
    fn default() -> Self {
        Self {
            user_interactions: default_user_interactions(),
            content_metadata: default_content_metadata(),
            view_events: default_view_events(),
            remix_events: default_remix_events(),
            trending_scores: default_trending_scores(),
            recommendations: default_recommendations(),
        }
    }
}

impl TopicSettings {
    /// Validates the topic settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, name) in [
            ("topics.user_interactions", &self.user_interactions),
            ("topics.content_metadata", &self.content_metadata),
            ("topics.view_events", &self.view_events),
            ("topics.remix_events", &self.remix_events),
            ("topics.trending_scores", &self.trending_scores),
            ("topics.recommendations", &self.recommendations),
        ] {
            if name.is_empty() {
                return Err(ConfigError::validation(field, "topic name must not be empty"));
            }
        }
        Ok(())
    }
}

// =============================================================================
// WorkerSettings
// =============================================================================

/// Background worker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerSettings {
    /// Trending refresher tick interval in seconds.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Whether the bulk indexer runs at startup.
    #[serde(default = "default_true")]
    pub index_on_startup: bool,
}

fn default_refresh_interval_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            index_on_startup: true,
        }
    }
}

impl WorkerSettings {
    /// Validates the worker settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::validation(
                "workers.refresh_interval_secs",
                "refresh interval must be non-zero",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PulseConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, "development");
        assert_eq!(config.bus.security_protocol, "SASL_SSL");
        assert_eq!(config.bus.sasl_mechanism, "PLAIN");
        assert_eq!(config.bus.group_id, "viral-intelligence-consumer");
        assert_eq!(config.topics.trending_scores, "trending-scores");
        assert_eq!(config.workers.refresh_interval_secs, 300);
        assert!(!config.bus.loopback_analytics);
    }

    #[test]
    fn test_validation_requires_bootstrap_servers() {
        let config = PulseConfig::default();
        assert!(config.validate().is_err());

        let mut config = config;
        config.bus.bootstrap_servers = "broker-1:9092".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_log_level() {
        let mut config = PulseConfig::default();
        config.bus.bootstrap_servers = "broker:9092".to_string();
        config.server.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_empty_topic() {
        let mut config = PulseConfig::default();
        config.bus.bootstrap_servers = "broker:9092".to_string();
        config.topics.view_events = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        let mut settings = ServerSettings::default();
        assert!(!settings.is_production());
        settings.environment = "production".to_string();
        assert!(settings.is_production());
    }
}
