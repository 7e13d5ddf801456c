// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # pulse-store
//!
//! The document store façade for Pulse.
//!
//! The engine talks to five logical collections (`trending_scores`,
//! `recommendations/{user}/items/{post}`, `posts`,
//! `remix_chains/{origin}/remixes/{remix}`, and a read-only `users`
//! collection) through the [`DocumentStore`] capability trait. The
//! production document database is an external service reached through an
//! implementation of this trait; [`MemoryStore`] is the in-process backend
//! used by tests and single-node deployments.
//!
//! Aggregates follow a last-writer-wins policy: event streams are
//! post-keyed (a single consumer writes per partition) and the refresher
//! compares before writing, which bounds the races this can produce.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod memory;
pub mod traits;

pub use memory::MemoryStore;
pub use traits::{DocumentStore, StoreStats, StoreStatsInner, TRENDING_SCAN_LIMIT};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
