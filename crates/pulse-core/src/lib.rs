// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # pulse-core
//!
//! Core abstractions and shared types for the Pulse viral-content
//! intelligence engine.
//!
//! This crate provides the foundational types and pure logic used across
//! all Pulse components:
//!
//! - **Types**: Identifiers and enums like `PostId`, `UserId`, `ContentType`
//! - **Event**: The ingest event model and the stream record union
//! - **Aggregate**: Per-post trending aggregates, content and profile records
//! - **Error**: Unified error hierarchy
//! - **Score**: The trending-score formula (canonical and hot-path variants)
//! - **Viral**: The viral-probability heuristic
//!
//! ## Example
//!
//! ```rust,ignore
//! use pulse_core::types::{PostId, UserId, InteractionKind};
//! use pulse_core::aggregate::TrendingScore;
//! use pulse_core::score;
//! use chrono::Utc;
//!
//! let mut aggregate = TrendingScore::new(PostId::new("post-001"));
//! aggregate.like_count = 8;
//! aggregate.view_count = 15;
//!
//! let score = score::trending_score(&aggregate, Utc::now(), Utc::now());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Core Modules
// =============================================================================

pub mod aggregate;
pub mod error;
pub mod event;
pub mod types;

// =============================================================================
// Pure Logic Modules
// =============================================================================

pub mod score;
pub mod viral;

// =============================================================================
// Re-exports for convenience
// =============================================================================

pub use error::*;
pub use types::*;

// Re-export the event model
pub use event::{ContentCreated, InteractionEvent, RemixEvent, StreamRecord, ViewEvent};

// Re-export aggregate types
pub use aggregate::{
    Content, KeywordProfile, Recommendation, RemixEdge, TrendingScore, UserProfile, ViralForecast,
    ViralSignals,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
