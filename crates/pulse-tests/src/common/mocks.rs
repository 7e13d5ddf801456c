// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Mock implementations for testing components in isolation.
//!
//! - [`MemoryPublisher`]: records everything published, with error
//!   injection
//! - [`UnavailableGenerativeClient`]: always fails, forcing the
//!   deterministic keyword fallback

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use pulse_bus::EventPublisher;
use pulse_core::aggregate::{KeywordProfile, Recommendation, TrendingScore};
use pulse_core::error::{BusError, EnrichError};
use pulse_core::event::{ContentCreated, InteractionEvent, RemixEvent, StreamRecord, ViewEvent};
use pulse_core::types::ContentType;
use pulse_engine::GenerativeClient;

// =============================================================================
// MemoryPublisher
// =============================================================================

/// An in-memory publisher that records every published record.
#[derive(Default)]
pub struct MemoryPublisher {
    records: Mutex<Vec<StreamRecord>>,
    fail_all: AtomicBool,
    closed: AtomicBool,
}

impl MemoryPublisher {
    /// Creates an empty publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every publish fail from now on.
    pub fn fail_all(&self, enabled: bool) {
        self.fail_all.store(enabled, Ordering::SeqCst);
    }

    /// Returns a copy of everything published so far.
    pub fn records(&self) -> Vec<StreamRecord> {
        self.records.lock().clone()
    }

    /// Number of records published.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Returns `true` when nothing was published.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Returns `true` once `close` was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn push(&self, record: StreamRecord) -> Result<(), BusError> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(BusError::publish("memory", "injected failure"));
        }
        self.records.lock().push(record);
        Ok(())
    }
}

impl fmt::Debug for MemoryPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPublisher")
            .field("records", &self.len())
            .finish()
    }
}

#[async_trait]
impl EventPublisher for MemoryPublisher {
    async fn publish_interaction(&self, event: &InteractionEvent) -> Result<(), BusError> {
        self.push(StreamRecord::Interaction(event.clone()))
    }

    async fn publish_content(&self, event: &ContentCreated) -> Result<(), BusError> {
        self.push(StreamRecord::Content(event.clone()))
    }

    async fn publish_view(&self, event: &ViewEvent) -> Result<(), BusError> {
        self.push(StreamRecord::View(event.clone()))
    }

    async fn publish_remix(&self, event: &RemixEvent) -> Result<(), BusError> {
        self.push(StreamRecord::Remix(event.clone()))
    }

    async fn publish_trending_score(&self, score: &TrendingScore) -> Result<(), BusError> {
        self.push(StreamRecord::Trending(score.clone()))
    }

    async fn publish_recommendation(&self, rec: &Recommendation) -> Result<(), BusError> {
        self.push(StreamRecord::Recommendation(rec.clone()))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

// =============================================================================
// UnavailableGenerativeClient
// =============================================================================

/// A generative client that always fails.
pub struct UnavailableGenerativeClient;

#[async_trait]
impl GenerativeClient for UnavailableGenerativeClient {
    async fn extract_keywords(
        &self,
        _prompt: &str,
        _content_type: ContentType,
    ) -> Result<KeywordProfile, EnrichError> {
        Err(EnrichError::unavailable("endpoint offline"))
    }
}
