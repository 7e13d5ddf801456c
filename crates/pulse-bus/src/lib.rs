// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # pulse-bus
//!
//! Kafka plumbing for the six Pulse event streams.
//!
//! - [`topics`]: the stream registry (names, partition counts, key policy)
//! - [`producer`]: the [`EventPublisher`] seam and its Kafka implementation
//! - [`consumer`]: the long-running consumer loop and the [`RecordHandler`]
//!   dispatch seam
//!
//! Publishing is best-effort durable forwarding: records are enqueued with
//! acks=all and snappy compression, delivery reports are observed by a
//! background task, and a graceful close flushes outstanding messages with
//! a 15-second deadline.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod consumer;
pub mod producer;
pub mod topics;

pub use consumer::{BusConsumer, RecordHandler};
pub use producer::{EventPublisher, KafkaPublisher};
pub use topics::{Stream, TopicRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
