// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The long-running bus consumer.
//!
//! One consumer task subscribes to the configured streams and dispatches
//! each decoded record to a [`RecordHandler`]. Offsets are auto-committed
//! on an interval (at-least-once); decode and handler failures are logged
//! and the record is dropped so a bad message never blocks its partition.

use std::sync::Arc;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use pulse_config::BusSettings;
use pulse_core::error::BusError;
use pulse_core::event::StreamRecord;

use crate::topics::{Stream, TopicRegistry};

// =============================================================================
// RecordHandler Trait
// =============================================================================

/// Receives every record the consumer decodes.
///
/// Handlers are expected to be idempotent on aggregate state: records may
/// be redelivered after a rebalance or restart.
#[async_trait]
pub trait RecordHandler: Send + Sync {
    /// Handles one decoded record.
    async fn handle_record(&self, record: StreamRecord);
}

// =============================================================================
// BusConsumer
// =============================================================================

/// The long-running consumer over the configured streams.
pub struct BusConsumer {
    consumer: StreamConsumer,
    topics: TopicRegistry,
    handler: Arc<dyn RecordHandler>,
    loopback_analytics: bool,
}

impl BusConsumer {
    /// Creates a consumer in the fixed consumer group.
    ///
    /// Offset reset is `earliest` on first join and offsets are
    /// auto-committed.
    pub fn new(
        settings: &BusSettings,
        topics: TopicRegistry,
        handler: Arc<dyn RecordHandler>,
    ) -> Result<Self, BusError> {
        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &settings.bootstrap_servers)
            .set("security.protocol", &settings.security_protocol)
            .set("sasl.mechanisms", &settings.sasl_mechanism)
            .set("sasl.username", &settings.api_key)
            .set("sasl.password", &settings.api_secret)
            .set("group.id", &settings.group_id)
            .set("auto.offset.reset", "earliest")
            .set("enable.auto.commit", "true");

        let consumer: StreamConsumer = config
            .create()
            .map_err(|e| BusError::client(e.to_string()))?;

        Ok(Self {
            consumer,
            topics,
            handler,
            loopback_analytics: settings.loopback_analytics,
        })
    }

    /// Runs the consume loop until the shutdown token is cancelled.
    ///
    /// Subscription failure is returned to the caller (fatal at startup);
    /// everything after that is logged and absorbed.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), BusError> {
        let topics = self.topics.consumer_topics(self.loopback_analytics);
        let topic_refs: Vec<&str> = topics.iter().map(String::as_str).collect();

        self.consumer
            .subscribe(&topic_refs)
            .map_err(|e| BusError::subscribe(e.to_string()))?;

        info!(topics = ?topics, "bus consumer subscribed");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("bus consumer shutting down");
                    break;
                }
                result = self.consumer.recv() => {
                    match result {
                        Ok(message) => {
                            let topic = message.topic().to_string();
                            let payload = message.payload().unwrap_or_default().to_vec();

                            debug!(
                                topic = %topic,
                                partition = message.partition(),
                                offset = message.offset(),
                                "received record"
                            );
                            drop(message);

                            match self.decode(&topic, &payload) {
                                Ok(record) => self.handler.handle_record(record).await,
                                Err(error) => {
                                    // The offset still advances; a poison
                                    // record must not wedge the partition.
                                    warn!(topic = %topic, error = %error, "dropping undecodable record");
                                }
                            }
                        }
                        Err(error) => {
                            warn!(error = %error, "consumer read error");
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Decodes a payload according to the stream its topic belongs to.
    fn decode(&self, topic: &str, payload: &[u8]) -> Result<StreamRecord, BusError> {
        let stream = self
            .topics
            .stream_for(topic)
            .ok_or_else(|| BusError::decode(topic, "unknown topic"))?;

        decode_record(stream, payload).map_err(|e| BusError::decode(topic, e.to_string()))
    }
}

/// Decodes a raw payload for a known stream.
pub fn decode_record(stream: Stream, payload: &[u8]) -> Result<StreamRecord, serde_json::Error> {
    let record = match stream {
        Stream::UserInteractions => StreamRecord::Interaction(serde_json::from_slice(payload)?),
        Stream::ContentMetadata => StreamRecord::Content(serde_json::from_slice(payload)?),
        Stream::ViewEvents => StreamRecord::View(serde_json::from_slice(payload)?),
        Stream::RemixEvents => StreamRecord::Remix(serde_json::from_slice(payload)?),
        Stream::TrendingScores => StreamRecord::Trending(serde_json::from_slice(payload)?),
        Stream::Recommendations => StreamRecord::Recommendation(serde_json::from_slice(payload)?),
    };
    Ok(record)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_interaction() {
        let payload = br#"{"post_id":"p1","user_id":"u1","event_type":"like"}"#;
        let record = decode_record(Stream::UserInteractions, payload).unwrap();

        match record {
            StreamRecord::Interaction(event) => {
                assert_eq!(event.post_id.as_str(), "p1");
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn test_decode_trending_score() {
        let payload = br#"{
            "post_id": "p1",
            "score": 42.0,
            "view_count": 10,
            "calculated_at": "2025-06-01T00:00:00Z"
        }"#;
        let record = decode_record(Stream::TrendingScores, payload).unwrap();

        match record {
            StreamRecord::Trending(score) => {
                assert_eq!(score.score, 42.0);
                assert_eq!(score.view_count, 10);
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_malformed_payload() {
        assert!(decode_record(Stream::ViewEvents, b"not json").is_err());
        assert!(decode_record(Stream::Recommendations, b"{}").is_err());
    }

    #[test]
    fn test_decode_wrong_stream_shape_fails() {
        // A view payload on the remix stream is missing required fields.
        let payload = br#"{"post_id":"p","user_id":"u","platform":"web"}"#;
        assert!(decode_record(Stream::RemixEvents, payload).is_err());
    }
}
