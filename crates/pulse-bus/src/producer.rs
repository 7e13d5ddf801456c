// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The event publisher seam and its Kafka implementation.
//!
//! [`EventPublisher`] is the trait the engine publishes through; tests
//! substitute a recording implementation. [`KafkaPublisher`] enqueues
//! records on the broker with durable-write settings (acks=all, snappy)
//! and observes delivery reports on background tasks so the caller only
//! waits for the local enqueue.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use serde::Serialize;
use tracing::{debug, trace, warn};

use pulse_config::BusSettings;
use pulse_core::error::BusError;
use pulse_core::event::{ContentCreated, InteractionEvent, RemixEvent, ViewEvent};
use pulse_core::aggregate::{Recommendation, TrendingScore};

use crate::topics::{Stream, TopicRegistry};

/// Deadline for flushing outstanding messages on close.
const FLUSH_DEADLINE: Duration = Duration::from_secs(15);

// =============================================================================
// EventPublisher Trait
// =============================================================================

/// The publish seam for the six event streams.
///
/// Implementations surface enqueue failures to the caller; delivery
/// beyond the enqueue is best-effort and observed asynchronously.
#[async_trait]
pub trait EventPublisher: Send + Sync + fmt::Debug {
    /// Publishes a user interaction, keyed by post.
    async fn publish_interaction(&self, event: &InteractionEvent) -> Result<(), BusError>;

    /// Publishes content creation metadata, keyed by post.
    async fn publish_content(&self, event: &ContentCreated) -> Result<(), BusError>;

    /// Publishes a view event, keyed by post.
    async fn publish_view(&self, event: &ViewEvent) -> Result<(), BusError>;

    /// Publishes a remix event, keyed by the original post.
    async fn publish_remix(&self, event: &RemixEvent) -> Result<(), BusError>;

    /// Publishes a trending-score upsert, keyed by post.
    async fn publish_trending_score(&self, score: &TrendingScore) -> Result<(), BusError>;

    /// Publishes a recommendation, keyed by the receiving user.
    async fn publish_recommendation(&self, rec: &Recommendation) -> Result<(), BusError>;

    /// Flushes outstanding messages and releases transport resources.
    async fn close(&self);
}

// =============================================================================
// KafkaPublisher
// =============================================================================

/// Kafka-backed publisher.
pub struct KafkaPublisher {
    producer: FutureProducer,
    topics: TopicRegistry,
}

impl KafkaPublisher {
    /// Creates a publisher connected per the bus settings.
    pub fn new(settings: &BusSettings, topics: TopicRegistry) -> Result<Self, BusError> {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &settings.bootstrap_servers)
            .set("security.protocol", &settings.security_protocol)
            .set("sasl.mechanisms", &settings.sasl_mechanism)
            .set("sasl.username", &settings.api_key)
            .set("sasl.password", &settings.api_secret)
            .set("acks", "all")
            .set("compression.type", "snappy");

        let producer: FutureProducer = config
            .create()
            .map_err(|e| BusError::client(e.to_string()))?;

        Ok(Self { producer, topics })
    }

    /// Enqueues one record and spawns a task to observe its delivery
    /// report.
    async fn publish<T: Serialize>(
        &self,
        stream: Stream,
        key: &str,
        value: &T,
    ) -> Result<(), BusError> {
        let topic = self.topics.name(stream).to_string();
        let payload = serde_json::to_vec(value)?;

        let record = FutureRecord::to(&topic).key(key).payload(&payload);

        let delivery = self
            .producer
            .send_result(record)
            .map_err(|(e, _)| BusError::publish(&topic, e.to_string()))?;

        trace!(topic = %topic, key = %key, bytes = payload.len(), "record enqueued");

        // Delivery reports are observed in the background; the ingest path
        // only waits for the enqueue.
        tokio::spawn(async move {
            match delivery.await {
                Ok(Ok(_)) => trace!(topic = %topic, "record delivered"),
                Ok(Err((error, _))) => {
                    warn!(topic = %topic, error = %error, "record delivery failed");
                }
                Err(_) => warn!(topic = %topic, "delivery report dropped"),
            }
        });

        Ok(())
    }
}

impl fmt::Debug for KafkaPublisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KafkaPublisher")
            .field("topics", &self.topics)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl EventPublisher for KafkaPublisher {
    async fn publish_interaction(&self, event: &InteractionEvent) -> Result<(), BusError> {
        self.publish(Stream::UserInteractions, event.post_id.as_str(), event)
            .await
    }

    async fn publish_content(&self, event: &ContentCreated) -> Result<(), BusError> {
        self.publish(Stream::ContentMetadata, event.post_id.as_str(), event)
            .await
    }

    async fn publish_view(&self, event: &ViewEvent) -> Result<(), BusError> {
        self.publish(Stream::ViewEvents, event.post_id.as_str(), event)
            .await
    }

    async fn publish_remix(&self, event: &RemixEvent) -> Result<(), BusError> {
        self.publish(Stream::RemixEvents, event.original_post_id.as_str(), event)
            .await
    }

    async fn publish_trending_score(&self, score: &TrendingScore) -> Result<(), BusError> {
        self.publish(Stream::TrendingScores, score.post_id.as_str(), score)
            .await
    }

    async fn publish_recommendation(&self, rec: &Recommendation) -> Result<(), BusError> {
        self.publish(Stream::Recommendations, rec.user_id.as_str(), rec)
            .await
    }

    async fn close(&self) {
        let producer = self.producer.clone();

        debug!("flushing producer before close");
        let result = tokio::task::spawn_blocking(move || {
            producer.flush(Timeout::After(FLUSH_DEADLINE))
        })
        .await;

        match result {
            Ok(Ok(())) => debug!("producer flushed"),
            Ok(Err(error)) => warn!(error = %error, "producer flush failed"),
            Err(error) => warn!(error = %error, "producer flush task panicked"),
        }
    }
}
