// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Environment loader.
//!
//! Reads the recognised environment variable set into a [`PulseConfig`].
//! Unset variables fall back to the schema defaults; parse failures are
//! reported with the offending variable name.

use std::env;

use pulse_core::error::ConfigError;

use crate::schema::{
    BusSettings, CloudSettings, PulseConfig, ServerSettings, TopicSettings, WorkerSettings,
};

// =============================================================================
// Loader
// =============================================================================

/// Loads the configuration from the process environment.
pub fn load_from_env() -> Result<PulseConfig, ConfigError> {
    let defaults = PulseConfig::default();

    Ok(PulseConfig {
        bus: BusSettings {
            bootstrap_servers: var_or("CONFLUENT_BOOTSTRAP_SERVERS", defaults.bus.bootstrap_servers),
            api_key: var_or("CONFLUENT_API_KEY", defaults.bus.api_key),
            api_secret: var_or("CONFLUENT_API_SECRET", defaults.bus.api_secret),
            security_protocol: var_or(
                "CONFLUENT_SECURITY_PROTOCOL",
                defaults.bus.security_protocol,
            ),
            sasl_mechanism: var_or("CONFLUENT_SASL_MECHANISM", defaults.bus.sasl_mechanism),
            group_id: defaults.bus.group_id,
            loopback_analytics: parse_bool_var("LOOPBACK_ANALYTICS", defaults.bus.loopback_analytics)?,
        },
        cloud: CloudSettings {
            google_project: var_or("GOOGLE_CLOUD_PROJECT", defaults.cloud.google_project),
            vertex_location: var_or("VERTEX_AI_LOCATION", defaults.cloud.vertex_location),
            vertex_endpoint_id: var_or("VERTEX_AI_ENDPOINT_ID", defaults.cloud.vertex_endpoint_id),
            store_project: var_or("FIRESTORE_PROJECT_ID", defaults.cloud.store_project),
        },
        server: ServerSettings {
            port: parse_port_var("PORT", defaults.server.port)?,
            environment: var_or("ENVIRONMENT", defaults.server.environment),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .filter(|v| !v.is_empty())
                .map(|v| parse_allowed_origins(&v))
                .unwrap_or(defaults.server.allowed_origins),
            log_level: var_or("LOG_LEVEL", defaults.server.log_level),
        },
        topics: TopicSettings {
            user_interactions: var_or("TOPIC_USER_INTERACTIONS", defaults.topics.user_interactions),
            content_metadata: var_or("TOPIC_CONTENT_METADATA", defaults.topics.content_metadata),
            view_events: var_or("TOPIC_VIEW_EVENTS", defaults.topics.view_events),
            remix_events: var_or("TOPIC_REMIX_EVENTS", defaults.topics.remix_events),
            trending_scores: var_or("TOPIC_TRENDING_SCORES", defaults.topics.trending_scores),
            recommendations: var_or("TOPIC_RECOMMENDATIONS", defaults.topics.recommendations),
        },
        workers: WorkerSettings::default(),
    })
}

/// Parses an `ALLOWED_ORIGINS` value.
///
/// Both comma and semicolon separators are accepted; whitespace around
/// each origin is trimmed and empty entries are dropped.
pub fn parse_allowed_origins(origins: &str) -> Vec<String> {
    origins
        .replace(';', ",")
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Helpers
// =============================================================================

fn var_or(name: &str, default: String) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default,
    }
}

fn parse_port_var(name: &str, default: u16) -> Result<u16, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value
            .parse::<u16>()
            .map_err(|e| ConfigError::invalid_var(name, e.to_string())),
        _ => Ok(default),
    }
}

fn parse_bool_var(name: &str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::invalid_var(
                name,
                format!("expected a boolean, got '{other}'"),
            )),
        },
        _ => Ok(default),
    }
}

// =============================================================================
// Tests
// =============================================================================
