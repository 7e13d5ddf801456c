// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Aggregate and projection record types.
//!
//! The central record here is [`TrendingScore`], the per-post running
//! counters plus the derived score and viral probability. The remaining
//! types mirror the documents held by the external content platform
//! (posts, users, recommendations) as far as the engine reads or updates
//! them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ContentType, PostId, UserId};

// =============================================================================
// Trending Score Aggregate
// =============================================================================

/// The per-post trending aggregate.
///
/// Counts are monotonically non-decreasing over the aggregate's lifetime;
/// `score` and `viral_probability` are derived and recomputed on writes and
/// by the periodic refresher. Display fields are materialised from the
/// content record by the read-side projections and are absent on the hot
/// path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingScore {
    /// The post this aggregate belongs to.
    pub post_id: PostId,
    /// The current trending score.
    #[serde(default)]
    pub score: f64,
    /// Heuristic viral probability in [0, 1].
    #[serde(default)]
    pub viral_probability: f64,
    /// Engagement rate (interactions per view, percent).
    #[serde(default)]
    pub engagement_rate: f64,
    /// Total views.
    #[serde(default)]
    pub view_count: u64,
    /// Total likes.
    #[serde(default)]
    pub like_count: u64,
    /// Total comments.
    #[serde(default)]
    pub comment_count: u64,
    /// Total shares.
    #[serde(default)]
    pub share_count: u64,
    /// Total remixes of this post.
    #[serde(default)]
    pub remix_count: u64,
    /// Non-view engagement per hour since creation.
    #[serde(default)]
    pub engagement_velocity: f64,
    /// When the score was last calculated.
    pub calculated_at: DateTime<Utc>,
    /// The aggregation window tag (1min, 5min, 1hour).
    #[serde(default)]
    pub time_window: String,

    // Display fields, materialised by the read-side projections.
    /// Content type copied from the content record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Media output URLs copied from the content record.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output_urls: Vec<String>,
    /// Title copied from the content record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description copied from the content record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Generation instructions copied from the content record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl TrendingScore {
    /// Creates an empty aggregate for a post, calculated now.
    pub fn new(post_id: PostId) -> Self {
        Self {
            post_id,
            score: 0.0,
            viral_probability: 0.0,
            engagement_rate: 0.0,
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            share_count: 0,
            remix_count: 0,
            engagement_velocity: 0.0,
            calculated_at: Utc::now(),
            time_window: String::new(),
            content_type: None,
            output_urls: Vec::new(),
            title: None,
            description: None,
            instructions: None,
        }
    }

    /// Total non-view engagement (likes + comments + shares + remixes).
    pub fn total_engagement(&self) -> u64 {
        self.like_count + self.comment_count + self.share_count + self.remix_count
    }

    /// Total activity including views.
    pub fn total_activity(&self) -> u64 {
        self.view_count + self.total_engagement()
    }

    /// Returns `true` when the post counts as viral for dashboard rollups
    /// (score above 100 or viral probability above 0.7).
    pub fn is_viral(&self) -> bool {
        self.score > 100.0 || self.viral_probability > 0.7
    }

    /// Returns `true` when the aggregate carries enough materialised
    /// content to be displayable (content type and at least one output URL).
    pub fn has_content(&self) -> bool {
        self.content_type.is_some() && !self.output_urls.is_empty()
    }

    /// Copies the display fields from a content record onto the aggregate.
    pub fn apply_content(&mut self, content: &Content) {
        self.content_type = Some(content.content_type.as_str().to_string());
        self.output_urls = content.output_urls.clone();
        self.title = content.title.clone();
        self.description = content.description.clone();
        self.instructions = content.instructions.clone();
    }
}

// =============================================================================
// Recommendation
// =============================================================================

/// A personalized content recommendation for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The receiving user.
    pub user_id: UserId,
    /// The recommended post.
    pub post_id: PostId,
    /// Recommendation score in [0, 1].
    pub score: f64,
    /// Human-readable recommendation reason.
    #[serde(default)]
    pub reason: String,
    /// Recommendation category.
    #[serde(default)]
    pub category: String,
    /// When the recommendation was generated.
    pub generated_at: DateTime<Utc>,
}

// =============================================================================
// Content Record
// =============================================================================

/// The content record owned by the external platform.
///
/// The engine only updates derived fields (keywords, category, style) and
/// the view counter; everything else is authoritative upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// The post ID.
    pub post_id: PostId,
    /// The creator.
    pub user_id: UserId,
    /// Media type.
    pub content_type: ContentType,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Display description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Generation instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Media output URLs.
    #[serde(default)]
    pub output_urls: Vec<String>,
    /// Derived keywords.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Derived category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Derived style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Whether the post is publicly visible.
    #[serde(default = "default_true")]
    pub is_public: bool,
    /// Authoritative view count.
    #[serde(default)]
    pub view_count: u64,
    /// Authoritative like count.
    #[serde(default)]
    pub like_count: u64,
    /// Authoritative comment count.
    #[serde(default)]
    pub comment_count: u64,
    /// Authoritative share count.
    #[serde(default)]
    pub share_count: u64,
    /// Authoritative remix count.
    #[serde(default)]
    pub remix_count: u64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last derived-field update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Last view time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_viewed_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Content {
    /// Creates a minimal content record.
    pub fn new(post_id: PostId, user_id: UserId, content_type: ContentType) -> Self {
        Self {
            post_id,
            user_id,
            content_type,
            title: None,
            description: None,
            instructions: None,
            output_urls: Vec::new(),
            keywords: Vec::new(),
            category: None,
            style: None,
            is_public: true,
            view_count: 0,
            like_count: 0,
            comment_count: 0,
            share_count: 0,
            remix_count: 0,
            created_at: Utc::now(),
            updated_at: None,
            last_viewed_at: None,
        }
    }
}

// =============================================================================
// User Profile
// =============================================================================

/// The read-only slice of a user record used for creator rollups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user ID.
    pub user_id: UserId,
    /// Login name.
    #[serde(default)]
    pub username: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
    /// Avatar URL.
    #[serde(default)]
    pub photo_url: String,
    /// Follower count.
    #[serde(default)]
    pub follower_count: u64,
}

// =============================================================================
// Remix Edge
// =============================================================================

/// One edge of the remix chain: origin post → remix post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemixEdge {
    /// The remix post.
    pub remix_post_id: PostId,
    /// When the edge was recorded.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Keyword Profile
// =============================================================================

/// The derived keyword profile of a content prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordProfile {
    /// 5-10 relevant keywords.
    pub keywords: Vec<String>,
    /// Main category.
    pub category: String,
    /// Artistic style or genre.
    pub style: String,
    /// Emotional tone.
    pub mood: String,
}

// =============================================================================
// Viral Heuristic I/O
// =============================================================================

/// The inputs to the viral-probability heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViralSignals {
    /// The post being evaluated.
    pub post_id: PostId,
    /// Total views.
    pub view_count: u64,
    /// Total likes.
    pub like_count: u64,
    /// Total comments.
    pub comment_count: u64,
    /// Total shares.
    pub share_count: u64,
    /// Total remixes.
    pub remix_count: u64,
    /// Engagement velocity carried on the aggregate.
    pub engagement_velocity: f64,
    /// Minutes elapsed since the aggregate was calculated.
    pub minutes_elapsed: i64,
}

impl ViralSignals {
    /// Builds heuristic inputs from an aggregate, measuring elapsed time
    /// against the given clock.
    pub fn from_aggregate(score: &TrendingScore, now: DateTime<Utc>) -> Self {
        let minutes_elapsed = now
            .signed_duration_since(score.calculated_at)
            .num_minutes()
            .max(0);

        Self {
            post_id: score.post_id.clone(),
            view_count: score.view_count,
            like_count: score.like_count,
            comment_count: score.comment_count,
            share_count: score.share_count,
            remix_count: score.remix_count,
            engagement_velocity: score.engagement_velocity,
            minutes_elapsed,
        }
    }

    /// Total activity including views; drives the confidence band.
    pub fn total_activity(&self) -> u64 {
        self.view_count + self.like_count + self.comment_count + self.share_count + self.remix_count
    }
}

/// The output of the viral-probability heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViralForecast {
    /// Probability the post is trending upward, in [0, 1].
    pub viral_probability: f64,
    /// Confidence in the probability, in [0, 1].
    pub confidence: f64,
    /// Predicted minutes until peak engagement.
    pub predicted_peak_minutes: u32,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_totals() {
        let mut score = TrendingScore::new(PostId::new("p"));
        score.view_count = 50;
        score.like_count = 30;
        score.comment_count = 15;
        score.share_count = 10;

        assert_eq!(score.total_engagement(), 55);
        assert_eq!(score.total_activity(), 105);
    }

    #[test]
    fn test_aggregate_viral_flag() {
        let mut score = TrendingScore::new(PostId::new("p"));
        assert!(!score.is_viral());

        score.score = 150.0;
        assert!(score.is_viral());

        score.score = 10.0;
        score.viral_probability = 0.8;
        assert!(score.is_viral());
    }

    #[test]
    fn test_aggregate_has_content() {
        let mut score = TrendingScore::new(PostId::new("p"));
        assert!(!score.has_content());

        let mut content = Content::new(
            PostId::new("p"),
            UserId::new("u"),
            ContentType::Video,
        );
        content.output_urls = vec!["https://cdn.example/v.mp4".to_string()];
        content.title = Some("clip".to_string());

        score.apply_content(&content);
        assert!(score.has_content());
        assert_eq!(score.content_type.as_deref(), Some("video"));
        assert_eq!(score.title.as_deref(), Some("clip"));
    }

    #[test]
    fn test_aggregate_decode_partial_document() {
        // Older documents may carry only a subset of fields.
        let json = r#"{"post_id":"p","view_count":3,"calculated_at":"2025-06-01T00:00:00Z"}"#;
        let score: TrendingScore = serde_json::from_str(json).unwrap();
        assert_eq!(score.view_count, 3);
        assert_eq!(score.score, 0.0);
        assert!(score.output_urls.is_empty());
    }

    #[test]
    fn test_viral_signals_from_aggregate() {
        let mut score = TrendingScore::new(PostId::new("p"));
        score.calculated_at = Utc::now() - chrono::Duration::minutes(30);
        score.view_count = 10;
        score.like_count = 5;

        let signals = ViralSignals::from_aggregate(&score, Utc::now());
        assert_eq!(signals.minutes_elapsed, 30);
        assert_eq!(signals.total_activity(), 15);
    }

    #[test]
    fn test_viral_signals_clock_skew_clamps_to_zero() {
        let mut score = TrendingScore::new(PostId::new("p"));
        score.calculated_at = Utc::now() + chrono::Duration::minutes(5);

        let signals = ViralSignals::from_aggregate(&score, Utc::now());
        assert_eq!(signals.minutes_elapsed, 0);
    }

    #[test]
    fn test_content_is_public_default() {
        let json = r#"{"post_id":"p","user_id":"u","content_type":"image","created_at":"2025-06-01T00:00:00Z"}"#;
        let content: Content = serde_json::from_str(json).unwrap();
        assert!(content.is_public);
    }
}
