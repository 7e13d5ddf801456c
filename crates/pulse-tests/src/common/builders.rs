// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Builders for events and aggregates.

use chrono::{DateTime, Duration, Utc};

use pulse_core::aggregate::{Content, Recommendation, TrendingScore, UserProfile};
use pulse_core::event::{ContentCreated, InteractionEvent, RemixEvent, ViewEvent};
use pulse_core::types::{ContentType, InteractionKind, Platform, PostId, UserId};

/// Builds an interaction event stamped now.
pub fn interaction(post: &str, user: &str, kind: InteractionKind) -> InteractionEvent {
    InteractionEvent {
        post_id: PostId::new(post),
        user_id: UserId::new(user),
        kind,
        timestamp: Some(Utc::now()),
        metadata: None,
    }
}

/// Builds a view event stamped now.
pub fn view(post: &str, user: &str) -> ViewEvent {
    ViewEvent {
        post_id: PostId::new(post),
        user_id: UserId::new(user),
        viewed_at: Some(Utc::now()),
        duration: 12,
        platform: Platform::Mobile,
        device_type: None,
    }
}

/// Builds a remix event stamped now.
pub fn remix(original: &str, remix: &str, user: &str) -> RemixEvent {
    RemixEvent {
        original_post_id: PostId::new(original),
        remix_post_id: PostId::new(remix),
        user_id: UserId::new(user),
        remixed_at: Some(Utc::now()),
        remix_type: Some("variation".to_string()),
    }
}

/// Builds a content-created event without derived fields.
pub fn content_created(post: &str, user: &str, prompt: &str) -> ContentCreated {
    ContentCreated {
        post_id: PostId::new(post),
        user_id: UserId::new(user),
        content_type: ContentType::Image,
        prompt: prompt.to_string(),
        created_at: Some(Utc::now()),
        keywords: Vec::new(),
        category: None,
        style: None,
    }
}

/// Builds a recommendation.
pub fn recommendation(user: &str, post: &str, score: f64) -> Recommendation {
    Recommendation {
        user_id: UserId::new(user),
        post_id: PostId::new(post),
        score,
        reason: "similar creators".to_string(),
        category: "image".to_string(),
        generated_at: Utc::now(),
    }
}

/// Builds a user profile.
pub fn user_profile(user: &str, followers: u64) -> UserProfile {
    UserProfile {
        user_id: UserId::new(user),
        username: format!("{user}_name"),
        display_name: format!("{user} display"),
        photo_url: format!("https://cdn.example/{user}.png"),
        follower_count: followers,
    }
}

// =============================================================================
// AggregateBuilder
// =============================================================================

/// Fluent builder for trending aggregates.
pub struct AggregateBuilder {
    inner: TrendingScore,
}

impl AggregateBuilder {
    /// Starts a builder for the given post.
    pub fn new(post: &str) -> Self {
        Self {
            inner: TrendingScore::new(PostId::new(post)),
        }
    }

    /// Sets the stored score.
    pub fn score(mut self, score: f64) -> Self {
        self.inner.score = score;
        self
    }

    /// Sets the counters.
    pub fn counts(mut self, views: u64, likes: u64, comments: u64, shares: u64, remixes: u64) -> Self {
        self.inner.view_count = views;
        self.inner.like_count = likes;
        self.inner.comment_count = comments;
        self.inner.share_count = shares;
        self.inner.remix_count = remixes;
        self
    }

    /// Sets the carried engagement velocity.
    pub fn velocity(mut self, velocity: f64) -> Self {
        self.inner.engagement_velocity = velocity;
        self
    }

    /// Sets the calculation timestamp.
    pub fn calculated_at(mut self, at: DateTime<Utc>) -> Self {
        self.inner.calculated_at = at;
        self
    }

    /// Sets the viral probability.
    pub fn viral_probability(mut self, probability: f64) -> Self {
        self.inner.viral_probability = probability;
        self
    }

    /// Finishes the aggregate.
    pub fn build(self) -> TrendingScore {
        self.inner
    }
}

// =============================================================================
// ContentBuilder
// =============================================================================

/// Fluent builder for content records.
pub struct ContentBuilder {
    inner: Content,
}

impl ContentBuilder {
    /// Starts a builder for the given post and creator.
    pub fn new(post: &str, user: &str, content_type: ContentType) -> Self {
        Self {
            inner: Content::new(PostId::new(post), UserId::new(user), content_type),
        }
    }

    /// Adds one output URL and a title so the post is displayable.
    pub fn displayable(mut self) -> Self {
        let post = self.inner.post_id.as_str().to_string();
        self.inner.output_urls = vec![format!("https://cdn.example/{post}.bin")];
        self.inner.title = Some(format!("{post} title"));
        self
    }

    /// Sets the authoritative counters.
    pub fn counts(mut self, views: u64, likes: u64, comments: u64, shares: u64, remixes: u64) -> Self {
        self.inner.view_count = views;
        self.inner.like_count = likes;
        self.inner.comment_count = comments;
        self.inner.share_count = shares;
        self.inner.remix_count = remixes;
        self
    }

    /// Sets the creation time to `hours` hours ago.
    pub fn age_hours(mut self, hours: i64) -> Self {
        self.inner.created_at = Utc::now() - Duration::hours(hours);
        self
    }

    /// Marks the post private.
    pub fn private(mut self) -> Self {
        self.inner.is_public = false;
        self
    }

    /// Finishes the content record.
    pub fn build(self) -> Content {
        self.inner
    }
}
