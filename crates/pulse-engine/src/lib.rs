// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # pulse-engine
//!
//! The processing core of Pulse:
//!
//! - **Processor**: glues ingestion to the bus and the bus to the store
//! - **Enrich**: keyword extraction with a deterministic fallback and a
//!   1-hour TTL cache
//! - **Hub**: in-process publish/subscribe fan-out to live clients
//! - **Refresher**: periodic re-scoring of every aggregate
//! - **Indexer**: one-shot import of the content collection into the
//!   trending store
//! - **Analytics**: read-side projections for the dashboard APIs
//!
//! ## Data flow
//!
//! ```text
//! Ingest API ──► Processor ──► Bus ──► Consumer ──► Processor ──► Store
//!                                                        │
//!                                                        ▼
//!                                                       Hub ──► WebSocket clients
//!
//! Refresher / Indexer ──► Store (background)
//! Analytics ──► Store (read-only, per request)
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod analytics;
pub mod enrich;
pub mod hub;
pub mod indexer;
pub mod processor;
pub mod refresher;

pub use analytics::{
    ContentTypeMetrics, CreatorMetrics, DashboardAnalytics, DashboardMetrics, EngagementTrend,
};
pub use enrich::{ContentEnricher, GenerativeClient};
pub use hub::{HubHandle, SubscriberHub, CLIENT_QUEUE_CAPACITY};
pub use indexer::{IndexReport, PostIndexer};
pub use processor::{EventProcessor, VIRAL_ALERT_THRESHOLD};
pub use refresher::{RefreshReport, TrendingRefresher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
