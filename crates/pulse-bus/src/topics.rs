// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The logical stream registry.
//!
//! Six streams carry all traffic. Events key on their post ID so a single
//! consumer writes each post's aggregate; remixes key on the original post
//! and recommendations on the receiving user. The trending-scores stream
//! is produced as an upsert-keyed stream.

use std::fmt;

use pulse_config::TopicSettings;

// =============================================================================
// Stream
// =============================================================================

/// One of the six logical streams on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    /// User interaction events (keyed by post).
    UserInteractions,
    /// Content creation metadata (keyed by post).
    ContentMetadata,
    /// View events (keyed by post).
    ViewEvents,
    /// Remix events (keyed by the original post).
    RemixEvents,
    /// Trending score upserts (keyed by post).
    TrendingScores,
    /// Recommendation records (keyed by user).
    Recommendations,
}

impl Stream {
    /// All streams, in declaration order.
    pub const ALL: [Stream; 6] = [
        Stream::UserInteractions,
        Stream::ContentMetadata,
        Stream::ViewEvents,
        Stream::RemixEvents,
        Stream::TrendingScores,
        Stream::Recommendations,
    ];

    /// The default topic name for this stream.
    pub fn default_name(&self) -> &'static str {
        match self {
            Stream::UserInteractions => "user-interactions",
            Stream::ContentMetadata => "content-metadata",
            Stream::ViewEvents => "view-events",
            Stream::RemixEvents => "remix-events",
            Stream::TrendingScores => "trending-scores",
            Stream::Recommendations => "recommendations",
        }
    }

    /// The provisioned partition count for this stream.
    pub fn partitions(&self) -> u32 {
        match self {
            Stream::UserInteractions | Stream::ViewEvents => 6,
            Stream::ContentMetadata
            | Stream::RemixEvents
            | Stream::TrendingScores
            | Stream::Recommendations => 3,
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.default_name())
    }
}

// =============================================================================
// TopicRegistry
// =============================================================================

/// Maps streams to their (possibly overridden) topic names.
#[derive(Debug, Clone)]
pub struct TopicRegistry {
    user_interactions: String,
    content_metadata: String,
    view_events: String,
    remix_events: String,
    trending_scores: String,
    recommendations: String,
}

impl TopicRegistry {
    /// Builds the registry from configuration.
    pub fn new(settings: &TopicSettings) -> Self {
        Self {
            user_interactions: settings.user_interactions.clone(),
            content_metadata: settings.content_metadata.clone(),
            view_events: settings.view_events.clone(),
            remix_events: settings.remix_events.clone(),
            trending_scores: settings.trending_scores.clone(),
            recommendations: settings.recommendations.clone(),
        }
    }

    /// Returns the topic name for a stream.
    pub fn name(&self, stream: Stream) -> &str {
        match stream {
            Stream::UserInteractions => &self.user_interactions,
            Stream::ContentMetadata => &self.content_metadata,
            Stream::ViewEvents => &self.view_events,
            Stream::RemixEvents => &self.remix_events,
            Stream::TrendingScores => &self.trending_scores,
            Stream::Recommendations => &self.recommendations,
        }
    }

    /// Resolves a topic name back to its stream.
    pub fn stream_for(&self, topic: &str) -> Option<Stream> {
        Stream::ALL
            .into_iter()
            .find(|stream| self.name(*stream) == topic)
    }

    /// The topics the consumer subscribes to.
    ///
    /// The derived streams are always consumed; in loopback-analytics mode
    /// the raw event streams are consumed as well and the engine performs
    /// the analytics writes itself.
    pub fn consumer_topics(&self, loopback_analytics: bool) -> Vec<String> {
        let mut topics = vec![
            self.trending_scores.clone(),
            self.recommendations.clone(),
        ];

        if loopback_analytics {
            topics.push(self.user_interactions.clone());
            topics.push(self.view_events.clone());
            topics.push(self.remix_events.clone());
        }

        topics
    }
}

impl Default for TopicRegistry {
    fn default() -> Self {
        Self::new(&TopicSettings::default())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let registry = TopicRegistry::default();
        assert_eq!(registry.name(Stream::UserInteractions), "user-interactions");
        assert_eq!(registry.name(Stream::TrendingScores), "trending-scores");
    }

    #[test]
    fn test_partition_counts() {
        assert_eq!(Stream::UserInteractions.partitions(), 6);
        assert_eq!(Stream::ViewEvents.partitions(), 6);
        assert_eq!(Stream::ContentMetadata.partitions(), 3);
        assert_eq!(Stream::RemixEvents.partitions(), 3);
        assert_eq!(Stream::TrendingScores.partitions(), 3);
        assert_eq!(Stream::Recommendations.partitions(), 3);
    }

    #[test]
    fn test_stream_for_with_overrides() {
        let mut settings = TopicSettings::default();
        settings.trending_scores = "staging.trending-scores".to_string();
        let registry = TopicRegistry::new(&settings);

        assert_eq!(
            registry.stream_for("staging.trending-scores"),
            Some(Stream::TrendingScores)
        );
        assert_eq!(registry.stream_for("trending-scores"), None);
        assert_eq!(registry.stream_for("view-events"), Some(Stream::ViewEvents));
    }

    #[test]
    fn test_consumer_topics_minimal() {
        let registry = TopicRegistry::default();
        let topics = registry.consumer_topics(false);
        assert_eq!(topics, vec!["trending-scores", "recommendations"]);
    }

    #[test]
    fn test_consumer_topics_loopback() {
        let registry = TopicRegistry::default();
        let topics = registry.consumer_topics(true);
        assert_eq!(topics.len(), 5);
        assert!(topics.contains(&"user-interactions".to_string()));
        assert!(topics.contains(&"view-events".to_string()));
        assert!(topics.contains(&"remix-events".to_string()));
        // Content metadata is never consumed; the ingest path writes its
        // derived fields directly.
        assert!(!topics.contains(&"content-metadata".to_string()));
    }
}
