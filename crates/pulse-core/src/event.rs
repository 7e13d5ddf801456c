// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The ingest event model.
//!
//! Every user action enters the system as one of the event types in this
//! module. Events have a canonical JSON encoding with snake_case field
//! names; timestamps are RFC-3339 UTC and, when absent on ingest, are
//! stamped by the server. Unknown fields are ignored on decode.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::{Recommendation, TrendingScore};
use crate::types::{ContentType, InteractionKind, Platform, PostId, UserId};

// =============================================================================
// Interaction Event
// =============================================================================

/// A single user interaction with a post (view, like, comment, share).
///
/// Interaction events are immutable; one is produced per user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// The post that was interacted with.
    pub post_id: PostId,
    /// The user who performed the interaction.
    pub user_id: UserId,
    /// The interaction kind.
    #[serde(rename = "event_type")]
    pub kind: InteractionKind,
    /// When the interaction happened. Stamped by the server if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Optional free-form metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl InteractionEvent {
    /// Creates an interaction event with the server clock filled in.
    pub fn new(post_id: PostId, user_id: UserId, kind: InteractionKind) -> Self {
        Self {
            post_id,
            user_id,
            kind,
            timestamp: Some(Utc::now()),
            metadata: None,
        }
    }

    /// Fills a missing timestamp with `now`.
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        if self.timestamp.is_none() {
            self.timestamp = Some(now);
        }
    }
}

// =============================================================================
// Content Created
// =============================================================================

/// A newly created content post entering the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentCreated {
    /// The new post's ID.
    pub post_id: PostId,
    /// The creator.
    pub user_id: UserId,
    /// The media type of the content.
    pub content_type: ContentType,
    /// The generation prompt the content was produced from.
    pub prompt: String,
    /// Creation time. Stamped by the server if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Derived keywords, filled by enrichment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Derived category, filled by enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Derived style, filled by enrichment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl ContentCreated {
    /// Fills a missing creation time with `now`.
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
    }
}

// =============================================================================
// View Event
// =============================================================================

/// A content view with duration and platform attribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewEvent {
    /// The viewed post.
    pub post_id: PostId,
    /// The viewer.
    pub user_id: UserId,
    /// When the view happened. Stamped by the server if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewed_at: Option<DateTime<Utc>>,
    /// View duration in seconds.
    #[serde(default)]
    pub duration: u64,
    /// The client platform.
    pub platform: Platform,
    /// Optional device type string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
}

impl ViewEvent {
    /// Fills a missing view time with `now`.
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        if self.viewed_at.is_none() {
            self.viewed_at = Some(now);
        }
    }
}

// =============================================================================
// Remix Event
// =============================================================================

/// A remix: a new post derived from an existing one.
///
/// Invariant: `original_post_id != remix_post_id`. The ingest surface
/// rejects self-referencing remixes before they reach the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemixEvent {
    /// The post that was remixed.
    pub original_post_id: PostId,
    /// The newly created remix post.
    pub remix_post_id: PostId,
    /// The remixing user.
    pub user_id: UserId,
    /// When the remix happened. Stamped by the server if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remixed_at: Option<DateTime<Utc>>,
    /// Optional remix kind (style_transfer, variation, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remix_type: Option<String>,
}

impl RemixEvent {
    /// Fills a missing remix time with `now`.
    pub fn stamp(&mut self, now: DateTime<Utc>) {
        if self.remixed_at.is_none() {
            self.remixed_at = Some(now);
        }
    }

    /// Returns `true` when the remix references itself as its own origin.
    pub fn is_self_referencing(&self) -> bool {
        self.original_post_id == self.remix_post_id
    }
}

// =============================================================================
// Stream Record
// =============================================================================

/// A decoded record from one of the logical bus streams.
///
/// The bus consumer selects the variant per stream name rather than per
/// object type; this union is also what test publishers record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stream", content = "record", rename_all = "snake_case")]
pub enum StreamRecord {
    /// A record from the user-interactions stream.
    Interaction(InteractionEvent),
    /// A record from the content-metadata stream.
    Content(ContentCreated),
    /// A record from the view-events stream.
    View(ViewEvent),
    /// A record from the remix-events stream.
    Remix(RemixEvent),
    /// A record from the trending-scores stream.
    Trending(TrendingScore),
    /// A record from the recommendations stream.
    Recommendation(Recommendation),
}

impl StreamRecord {
    /// Returns the partition key for this record.
    ///
    /// Events key on their post ID, remixes on the original post, and
    /// recommendations on the receiving user.
    pub fn partition_key(&self) -> &str {
        match self {
            StreamRecord::Interaction(e) => e.post_id.as_str(),
            StreamRecord::Content(e) => e.post_id.as_str(),
            StreamRecord::View(e) => e.post_id.as_str(),
            StreamRecord::Remix(e) => e.original_post_id.as_str(),
            StreamRecord::Trending(s) => s.post_id.as_str(),
            StreamRecord::Recommendation(r) => r.user_id.as_str(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
