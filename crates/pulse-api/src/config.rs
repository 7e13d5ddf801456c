// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

// =============================================================================
// ApiConfig
// =============================================================================

/// Configuration for the HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listen port.
    pub port: u16,
    /// Deployment environment name.
    pub environment: String,
    /// Allowed CORS origins; `*` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl ApiConfig {
    /// The socket address the server binds.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }

    /// Returns `true` in the production environment.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Returns `true` when any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            environment: "development".to_string(),
            allowed_origins: vec!["*".to_string()],
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig::default();
        assert_eq!(config.socket_addr().port(), 8080);
        assert!(config.socket_addr().ip().is_unspecified());
    }

    #[test]
    fn test_allows_any_origin() {
        let config = ApiConfig::default();
        assert!(config.allows_any_origin());

        let config = ApiConfig {
            allowed_origins: vec!["https://app.example".to_string()],
            ..ApiConfig::default()
        };
        assert!(!config.allows_any_origin());
    }
}
