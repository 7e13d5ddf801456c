// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # pulse-api
//!
//! The HTTP and WebSocket surface of Pulse.
//!
//! JSON-over-HTTP with an axum router:
//!
//! - `POST /api/events/{interaction,content,view,remix}` - ingestion
//! - `GET /api/analytics/...` - trending, per-post stats, recommendations,
//!   dashboard rollups
//! - `POST /api/admin/index-posts` - triggers the bulk indexer
//! - `GET /ws` - WebSocket upgrade for live trending updates and viral
//!   alerts
//! - `GET /health` - liveness
//!
//! Success responses carry `"status": "success"`; errors are
//! `{"error": "<message>"}` with a 4xx/5xx status.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod server;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use server::ApiServer;
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
