// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Read-side analytics projections.
//!
//! Everything here is computed on demand from the store; nothing is
//! persisted. Aggregates without a corresponding content record are
//! filtered out of the content-enriched views but still counted in the
//! totals (an aggregate can briefly precede its content during indexing).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use pulse_core::aggregate::TrendingScore;
use pulse_core::error::StoreError;
use pulse_store::DocumentStore;

/// Scan cap for the content-type breakdown.
const BREAKDOWN_SCAN_LIMIT: usize = 1000;

/// Number of enriched posts embedded in the dashboard metrics.
const DASHBOARD_TOP_POSTS: usize = 3;

// =============================================================================
// Projection Types
// =============================================================================

/// Comprehensive dashboard rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Sum of views over all aggregates.
    pub total_views: u64,
    /// Sum of likes, comments, and shares over all aggregates.
    pub total_interactions: u64,
    /// Aggregates counting as viral (score > 100 or probability > 0.7).
    pub viral_posts: u64,
    /// Total aggregates.
    pub total_posts: u64,
    /// Distinct creators over the tracked posts.
    pub active_users: u64,
    /// Post count per content type.
    pub top_content_types: HashMap<String, u64>,
    /// Interactions per view, in percent.
    pub engagement_rate: f64,
    /// Mean score over all aggregates.
    pub average_score: f64,
    /// The top content-enriched posts.
    pub top_posts: Vec<TrendingScore>,
    /// When the rollup was computed.
    pub calculated_at: DateTime<Utc>,
}

/// Rollup for a single creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorMetrics {
    /// The creator.
    pub user_id: String,
    /// Login name from the user record.
    pub username: String,
    /// Display name from the user record.
    pub display_name: String,
    /// Avatar URL from the user record.
    pub photo_url: String,
    /// Sum of scores over the creator's posts.
    pub total_score: f64,
    /// Sum of views.
    pub total_views: u64,
    /// Sum of likes.
    pub total_likes: u64,
    /// Sum of comments.
    pub total_comments: u64,
    /// Number of tracked posts.
    pub post_count: u64,
    /// Number of viral posts.
    pub viral_post_count: u64,
    /// Follower count from the user record.
    pub follower_count: u64,
    /// Likes + comments per view, in percent.
    pub engagement_rate: f64,
    /// Mean score over the creator's posts.
    pub average_score: f64,
    /// When the rollup was computed.
    pub calculated_at: DateTime<Utc>,
}

/// Histogram entry for one content type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentTypeMetrics {
    /// The content type.
    pub content_type: String,
    /// Public posts of this type.
    pub count: u64,
    /// Sum of views.
    pub total_views: u64,
    /// Sum of likes.
    pub total_likes: u64,
    /// Mean views per post.
    pub avg_views: f64,
    /// Mean likes per post.
    pub avg_likes: f64,
}

/// Engagement metrics for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementTrend {
    /// Start of the day (UTC).
    pub date: DateTime<Utc>,
    /// Posts created on this day.
    pub post_count: u64,
    /// Views on posts created this day.
    pub views: u64,
    /// Likes on posts created this day.
    pub likes: u64,
    /// Comments on posts created this day.
    pub comments: u64,
}

// =============================================================================
// DashboardAnalytics
// =============================================================================

/// On-demand analytics over the document store.
#[derive(Debug)]
pub struct DashboardAnalytics {
    store: Arc<dyn DocumentStore>,
}

impl DashboardAnalytics {
    /// Creates the projection service.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Computes the full dashboard rollup.
    pub async fn dashboard_metrics(&self) -> Result<DashboardMetrics, StoreError> {
        let aggregates = self.store.list_aggregates(0).await?;

        let mut total_views = 0u64;
        let mut total_interactions = 0u64;
        let mut viral_posts = 0u64;
        let mut total_score = 0.0f64;

        for aggregate in &aggregates {
            total_views += aggregate.view_count;
            total_interactions +=
                aggregate.like_count + aggregate.comment_count + aggregate.share_count;
            total_score += aggregate.score;
            if aggregate.is_viral() {
                viral_posts += 1;
            }
        }

        let total_posts = aggregates.len() as u64;
        let average_score = if total_posts > 0 {
            total_score / total_posts as f64
        } else {
            0.0
        };
        let engagement_rate = if total_views > 0 {
            total_interactions as f64 / total_views as f64 * 100.0
        } else {
            0.0
        };

        // Content-type histogram and distinct creators come from the
        // content records behind the aggregates.
        let mut top_content_types: HashMap<String, u64> = HashMap::new();
        let mut active_users: HashSet<String> = HashSet::new();

        for aggregate in &aggregates {
            if let Some(content) = self.store.get_content(&aggregate.post_id).await? {
                *top_content_types
                    .entry(content.content_type.as_str().to_string())
                    .or_insert(0) += 1;
                active_users.insert(content.user_id.into_inner());
            }
        }

        let top_posts = self
            .enriched_top(aggregates, DASHBOARD_TOP_POSTS, None)
            .await?;

        debug!(
            posts = total_posts,
            views = total_views,
            viral = viral_posts,
            "dashboard metrics calculated"
        );

        Ok(DashboardMetrics {
            total_views,
            total_interactions,
            viral_posts,
            total_posts,
            active_users: active_users.len() as u64,
            top_content_types,
            engagement_rate,
            average_score,
            top_posts,
            calculated_at: Utc::now(),
        })
    }

    /// Computes the top creators by total score.
    pub async fn top_creators(&self, limit: usize) -> Result<Vec<CreatorMetrics>, StoreError> {
        let aggregates = self.store.list_aggregates(0).await?;
        let now = Utc::now();

        let mut by_creator: HashMap<String, CreatorMetrics> = HashMap::new();

        for aggregate in &aggregates {
            let Some(content) = self.store.get_content(&aggregate.post_id).await? else {
                continue;
            };
            if content.user_id.is_empty() {
                continue;
            }

            let creator = by_creator
                .entry(content.user_id.as_str().to_string())
                .or_insert_with(|| CreatorMetrics {
                    user_id: content.user_id.as_str().to_string(),
                    username: String::new(),
                    display_name: String::new(),
                    photo_url: String::new(),
                    total_score: 0.0,
                    total_views: 0,
                    total_likes: 0,
                    total_comments: 0,
                    post_count: 0,
                    viral_post_count: 0,
                    follower_count: 0,
                    engagement_rate: 0.0,
                    average_score: 0.0,
                    calculated_at: now,
                });

            creator.post_count += 1;
            creator.total_score += aggregate.score;
            creator.total_views += aggregate.view_count;
            creator.total_likes += aggregate.like_count;
            creator.total_comments += aggregate.comment_count;
            if aggregate.is_viral() {
                creator.viral_post_count += 1;
            }
        }

        // Materialise the profile fields; creators without a user record
        // are dropped from the board.
        let mut creators = Vec::with_capacity(by_creator.len());
        for (user_id, mut creator) in by_creator {
            let Some(profile) = self
                .store
                .get_user(&pulse_core::types::UserId::new(&user_id))
                .await?
            else {
                continue;
            };

            creator.username = profile.username;
            creator.display_name = profile.display_name;
            creator.photo_url = profile.photo_url;
            creator.follower_count = profile.follower_count;

            if creator.post_count > 0 {
                creator.average_score = creator.total_score / creator.post_count as f64;
            }
            if creator.total_views > 0 {
                let engagement = creator.total_likes + creator.total_comments;
                creator.engagement_rate =
                    engagement as f64 / creator.total_views as f64 * 100.0;
            }

            creators.push(creator);
        }

        creators.sort_by(|a, b| {
            b.total_score
                .partial_cmp(&a.total_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        creators.truncate(limit);
        Ok(creators)
    }

    /// Computes the per-content-type histogram over public posts.
    pub async fn content_type_breakdown(
        &self,
    ) -> Result<HashMap<String, ContentTypeMetrics>, StoreError> {
        let posts = self.store.list_content(BREAKDOWN_SCAN_LIMIT).await?;

        let mut breakdown: HashMap<String, ContentTypeMetrics> = HashMap::new();

        for content in posts {
            if !content.is_public {
                continue;
            }

            let key = content.content_type.as_str().to_string();
            let metrics = breakdown.entry(key.clone()).or_default();
            metrics.content_type = key;
            metrics.count += 1;
            metrics.total_views += content.view_count;
            metrics.total_likes += content.like_count;
        }

        for metrics in breakdown.values_mut() {
            if metrics.count > 0 {
                metrics.avg_views = metrics.total_views as f64 / metrics.count as f64;
                metrics.avg_likes = metrics.total_likes as f64 / metrics.count as f64;
            }
        }

        Ok(breakdown)
    }

    /// Computes daily engagement buckets for the last `days` days, in
    /// chronological order.
    pub async fn engagement_trends(&self, days: u32) -> Result<Vec<EngagementTrend>, StoreError> {
        let posts = self.store.list_content(0).await?;

        let today_start = Utc::now()
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc();

        let mut trends = Vec::with_capacity(days as usize);

        for offset in (0..days as i64).rev() {
            let day_start = today_start - Duration::days(offset);
            let day_end = day_start + Duration::days(1);

            let mut trend = EngagementTrend {
                date: day_start,
                post_count: 0,
                views: 0,
                likes: 0,
                comments: 0,
            };

            for content in &posts {
                if !content.is_public {
                    continue;
                }
                if content.created_at >= day_start && content.created_at < day_end {
                    trend.post_count += 1;
                    trend.views += content.view_count;
                    trend.likes += content.like_count;
                    trend.comments += content.comment_count;
                }
            }

            trends.push(trend);
        }

        Ok(trends)
    }

    /// Returns the trending feed: aggregates that have a content record
    /// and at least one output URL, best first.
    pub async fn trending_with_content(
        &self,
        limit: usize,
    ) -> Result<Vec<TrendingScore>, StoreError> {
        let aggregates = self.store.list_aggregates(0).await?;
        self.enriched_top(aggregates, limit, None).await
    }

    /// Returns the trending feed filtered to one content type.
    pub async fn trending_by_content_type(
        &self,
        content_type: &str,
        limit: usize,
    ) -> Result<Vec<TrendingScore>, StoreError> {
        let aggregates = self.store.list_aggregates(0).await?;
        self.enriched_top(aggregates, limit, Some(content_type)).await
    }

    /// Sorts aggregates by score, enriches them with content, and keeps
    /// the displayable ones up to `limit`.
    async fn enriched_top(
        &self,
        mut aggregates: Vec<TrendingScore>,
        limit: usize,
        content_type: Option<&str>,
    ) -> Result<Vec<TrendingScore>, StoreError> {
        aggregates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut enriched = Vec::with_capacity(limit.min(aggregates.len()));

        for mut aggregate in aggregates {
            if enriched.len() >= limit {
                break;
            }

            let Some(content) = self.store.get_content(&aggregate.post_id).await? else {
                debug!(post = %aggregate.post_id, "skipping aggregate without content");
                continue;
            };

            aggregate.apply_content(&content);

            if let Some(wanted) = content_type {
                if aggregate.content_type.as_deref() != Some(wanted) {
                    continue;
                }
            }

            if aggregate.has_content() {
                enriched.push(aggregate);
            }
        }

        Ok(enriched)
    }
}
