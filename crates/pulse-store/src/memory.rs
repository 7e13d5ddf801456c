// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory document store backend.
//!
//! Collections are dashmaps keyed by document ID, so readers never block
//! writers on other keys. Documents are replaced whole on save
//! (last-writer-wins), matching the external store's semantics.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use pulse_core::aggregate::{Content, Recommendation, TrendingScore, UserProfile};
use pulse_core::error::StoreError;
use pulse_core::types::{InteractionKind, PostId, UserId};

use crate::traits::{DocumentStore, StoreStats, StoreStatsInner, TRENDING_SCAN_LIMIT};

// =============================================================================
// MemoryStore
// =============================================================================

/// The in-process document store backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    aggregates: DashMap<String, TrendingScore>,
    recommendations: DashMap<String, HashMap<String, Recommendation>>,
    posts: DashMap<String, Content>,
    remix_chains: DashMap<String, BTreeMap<String, DateTime<Utc>>>,
    users: DashMap<String, UserProfile>,
    stats: Arc<StoreStatsInner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of aggregates held.
    pub fn aggregate_count(&self) -> usize {
        self.aggregates.len()
    }

    /// Returns the number of content records held.
    pub fn content_count(&self) -> usize {
        self.posts.len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn save_aggregate(&self, score: &TrendingScore) -> Result<(), StoreError> {
        if score.post_id.is_empty() {
            self.stats.record_error();
            return Err(StoreError::invalid_document("aggregate post_id is empty"));
        }
        self.aggregates
            .insert(score.post_id.as_str().to_string(), score.clone());
        self.stats.record_write();
        Ok(())
    }

    async fn get_post_stats(&self, post_id: &PostId) -> Result<Option<TrendingScore>, StoreError> {
        match self.aggregates.get(post_id.as_str()) {
            Some(entry) => {
                self.stats.record_read();
                Ok(Some(entry.value().clone()))
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    async fn list_aggregates(&self, limit: usize) -> Result<Vec<TrendingScore>, StoreError> {
        let cap = if limit == 0 { usize::MAX } else { limit };
        let scores: Vec<TrendingScore> = self
            .aggregates
            .iter()
            .take(cap)
            .map(|entry| entry.value().clone())
            .collect();
        Ok(scores)
    }

    async fn get_trending_posts(&self, limit: usize) -> Result<Vec<TrendingScore>, StoreError> {
        let mut scores = self.list_aggregates(TRENDING_SCAN_LIMIT).await?;

        scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scores.truncate(limit);
        Ok(scores)
    }

    async fn save_recommendation(&self, rec: &Recommendation) -> Result<(), StoreError> {
        self.recommendations
            .entry(rec.user_id.as_str().to_string())
            .or_default()
            .insert(rec.post_id.as_str().to_string(), rec.clone());
        self.stats.record_write();
        Ok(())
    }

    async fn get_user_recommendations(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Recommendation>, StoreError> {
        let mut recs: Vec<Recommendation> = match self.recommendations.get(user_id.as_str()) {
            Some(entry) => entry.values().cloned().collect(),
            None => Vec::new(),
        };

        recs.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        recs.truncate(limit);
        self.stats.record_read();
        Ok(recs)
    }

    async fn put_content(&self, content: &Content) -> Result<(), StoreError> {
        self.posts
            .insert(content.post_id.as_str().to_string(), content.clone());
        self.stats.record_write();
        Ok(())
    }

    async fn get_content(&self, post_id: &PostId) -> Result<Option<Content>, StoreError> {
        match self.posts.get(post_id.as_str()) {
            Some(entry) => {
                self.stats.record_read();
                Ok(Some(entry.value().clone()))
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    async fn list_content(&self, limit: usize) -> Result<Vec<Content>, StoreError> {
        let cap = if limit == 0 { usize::MAX } else { limit };
        Ok(self
            .posts
            .iter()
            .take(cap)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn increment_view_count(&self, post_id: &PostId) -> Result<(), StoreError> {
        match self.posts.get_mut(post_id.as_str()) {
            Some(mut entry) => {
                entry.view_count += 1;
                entry.last_viewed_at = Some(Utc::now());
                self.stats.record_write();
                Ok(())
            }
            None => {
                self.stats.record_error();
                Err(StoreError::not_found("posts", post_id.as_str()))
            }
        }
    }

    async fn update_content_metadata(
        &self,
        post_id: &PostId,
        keywords: &[String],
        category: &str,
        style: &str,
    ) -> Result<(), StoreError> {
        match self.posts.get_mut(post_id.as_str()) {
            Some(mut entry) => {
                entry.keywords = keywords.to_vec();
                entry.category = Some(category.to_string());
                entry.style = Some(style.to_string());
                entry.updated_at = Some(Utc::now());
                self.stats.record_write();
                Ok(())
            }
            None => {
                self.stats.record_error();
                Err(StoreError::not_found("posts", post_id.as_str()))
            }
        }
    }

    async fn update_post_analytics(
        &self,
        post_id: &PostId,
        kind: InteractionKind,
    ) -> Result<(), StoreError> {
        if !kind.is_engagement() {
            return Ok(());
        }

        match self.posts.get_mut(post_id.as_str()) {
            Some(mut entry) => {
                match kind {
                    InteractionKind::Like => entry.like_count += 1,
                    InteractionKind::Comment => entry.comment_count += 1,
                    InteractionKind::Share => entry.share_count += 1,
                    InteractionKind::View => {}
                }
                entry.updated_at = Some(Utc::now());
                self.stats.record_write();
                Ok(())
            }
            None => {
                self.stats.record_error();
                Err(StoreError::not_found("posts", post_id.as_str()))
            }
        }
    }

    async fn track_remix_chain(
        &self,
        original: &PostId,
        remix: &PostId,
    ) -> Result<(), StoreError> {
        if original == remix {
            self.stats.record_error();
            return Err(StoreError::invalid_document(
                "remix cannot reference its own origin",
            ));
        }

        self.remix_chains
            .entry(original.as_str().to_string())
            .or_default()
            .entry(remix.as_str().to_string())
            .or_insert_with(Utc::now);
        self.stats.record_write();
        Ok(())
    }

    async fn get_remix_count(&self, post_id: &PostId) -> Result<usize, StoreError> {
        let count = self
            .remix_chains
            .get(post_id.as_str())
            .map(|entry| entry.len())
            .unwrap_or(0);
        self.stats.record_read();
        Ok(count)
    }

    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError> {
        match self.users.get(user_id.as_str()) {
            Some(entry) => {
                self.stats.record_read();
                Ok(Some(entry.value().clone()))
            }
            None => {
                self.stats.record_miss();
                Ok(None)
            }
        }
    }

    async fn put_user(&self, profile: &UserProfile) -> Result<(), StoreError> {
        self.users
            .insert(profile.user_id.as_str().to_string(), profile.clone());
        self.stats.record_write();
        Ok(())
    }

    fn stats(&self) -> StoreStats {
        self.stats.snapshot()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_core::types::ContentType;

    fn aggregate(post: &str, score: f64) -> TrendingScore {
        let mut aggregate = TrendingScore::new(PostId::new(post));
        aggregate.score = score;
        aggregate
    }

    #[tokio::test]
    async fn test_save_and_get_aggregate_roundtrip() {
        let store = MemoryStore::new();
        let mut saved = aggregate("post-1", 42.5);
        saved.view_count = 7;

        store.save_aggregate(&saved).await.unwrap();

        let loaded = store
            .get_post_stats(&PostId::new("post-1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.post_id, saved.post_id);
        assert_eq!(loaded.score, saved.score);
        assert_eq!(loaded.view_count, 7);
    }

    #[tokio::test]
    async fn test_save_aggregate_rejects_empty_id() {
        let store = MemoryStore::new();
        let result = store.save_aggregate(&aggregate("", 1.0)).await;
        assert!(matches!(result, Err(StoreError::InvalidDocument { .. })));
    }

    #[tokio::test]
    async fn test_get_trending_posts_sorted_and_truncated() {
        let store = MemoryStore::new();
        for (post, score) in [("a", 5.0), ("b", 30.0), ("c", 10.0), ("d", 20.0)] {
            store.save_aggregate(&aggregate(post, score)).await.unwrap();
        }

        let top = store.get_trending_posts(3).await.unwrap();
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].post_id.as_str(), "b");
        assert_eq!(top[1].post_id.as_str(), "d");
        assert_eq!(top[2].post_id.as_str(), "c");

        for window in top.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
    }

    #[tokio::test]
    async fn test_remix_chain_idempotent() {
        let store = MemoryStore::new();
        let origin = PostId::new("a");
        let remix = PostId::new("b");

        store.track_remix_chain(&origin, &remix).await.unwrap();
        store.track_remix_chain(&origin, &remix).await.unwrap();

        assert_eq!(store.get_remix_count(&origin).await.unwrap(), 1);
        assert_eq!(store.get_remix_count(&remix).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_remix_chain_rejects_self_edge() {
        let store = MemoryStore::new();
        let post = PostId::new("a");
        let result = store.track_remix_chain(&post, &post).await;
        assert!(matches!(result, Err(StoreError::InvalidDocument { .. })));
    }

    #[tokio::test]
    async fn test_increment_view_count_requires_post() {
        let store = MemoryStore::new();
        let missing = store.increment_view_count(&PostId::new("ghost")).await;
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));

        let content = Content::new(PostId::new("p"), UserId::new("u"), ContentType::Image);
        store.put_content(&content).await.unwrap();

        store.increment_view_count(&PostId::new("p")).await.unwrap();
        store.increment_view_count(&PostId::new("p")).await.unwrap();

        let loaded = store.get_content(&PostId::new("p")).await.unwrap().unwrap();
        assert_eq!(loaded.view_count, 2);
        assert!(loaded.last_viewed_at.is_some());
    }

    #[tokio::test]
    async fn test_update_post_analytics_counts() {
        let store = MemoryStore::new();
        let content = Content::new(PostId::new("p"), UserId::new("u"), ContentType::Video);
        store.put_content(&content).await.unwrap();

        let post = PostId::new("p");
        store
            .update_post_analytics(&post, InteractionKind::Like)
            .await
            .unwrap();
        store
            .update_post_analytics(&post, InteractionKind::Comment)
            .await
            .unwrap();
        // A view is a no-op for this operation.
        store
            .update_post_analytics(&post, InteractionKind::View)
            .await
            .unwrap();

        let loaded = store.get_content(&post).await.unwrap().unwrap();
        assert_eq!(loaded.like_count, 1);
        assert_eq!(loaded.comment_count, 1);
        assert_eq!(loaded.view_count, 0);
    }

    #[tokio::test]
    async fn test_update_trending_from_view_bootstraps() {
        let store = MemoryStore::new();
        let post = PostId::new("p");

        store.update_trending_from_view(&post).await.unwrap();

        let aggregate = store.get_post_stats(&post).await.unwrap().unwrap();
        assert_eq!(aggregate.view_count, 1);
        assert_eq!(aggregate.score, 0.1);

        store.update_trending_from_view(&post).await.unwrap();
        let aggregate = store.get_post_stats(&post).await.unwrap().unwrap();
        assert_eq!(aggregate.view_count, 2);
        // Raw weighted sum: 2 views · 0.1.
        assert!((aggregate.score - 0.2).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_update_trending_from_interaction_seeds() {
        let store = MemoryStore::new();
        let post = PostId::new("p");

        store
            .update_trending_from_interaction(&post, InteractionKind::Comment)
            .await
            .unwrap();

        let aggregate = store.get_post_stats(&post).await.unwrap().unwrap();
        assert_eq!(aggregate.comment_count, 1);
        assert_eq!(aggregate.score, 1.0);

        store
            .update_trending_from_interaction(&post, InteractionKind::Like)
            .await
            .unwrap();
        let aggregate = store.get_post_stats(&post).await.unwrap().unwrap();
        // 1 like + 2·1 comment = 3.0 with raw weights.
        assert!((aggregate.score - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_update_trending_from_interaction_ignores_views() {
        let store = MemoryStore::new();
        let post = PostId::new("p");

        store
            .update_trending_from_interaction(&post, InteractionKind::View)
            .await
            .unwrap();
        assert!(store.get_post_stats(&post).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_trending_from_remix_seeds() {
        let store = MemoryStore::new();
        let post = PostId::new("p");

        store.update_trending_from_remix(&post).await.unwrap();

        let aggregate = store.get_post_stats(&post).await.unwrap().unwrap();
        assert_eq!(aggregate.remix_count, 1);
        assert_eq!(aggregate.score, 2.0);
    }

    #[tokio::test]
    async fn test_recommendations_sorted_by_score() {
        let store = MemoryStore::new();
        let user = UserId::new("u");

        for (post, score) in [("a", 0.2), ("b", 0.9), ("c", 0.5)] {
            store
                .save_recommendation(&Recommendation {
                    user_id: user.clone(),
                    post_id: PostId::new(post),
                    score,
                    reason: String::new(),
                    category: String::new(),
                    generated_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        let recs = store.get_user_recommendations(&user, 2).await.unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].post_id.as_str(), "b");
        assert_eq!(recs[1].post_id.as_str(), "c");
    }

    #[tokio::test]
    async fn test_recommendation_upsert_replaces() {
        let store = MemoryStore::new();
        let user = UserId::new("u");

        let mut rec = Recommendation {
            user_id: user.clone(),
            post_id: PostId::new("p"),
            score: 0.3,
            reason: String::new(),
            category: String::new(),
            generated_at: Utc::now(),
        };
        store.save_recommendation(&rec).await.unwrap();

        rec.score = 0.8;
        store.save_recommendation(&rec).await.unwrap();

        let recs = store.get_user_recommendations(&user, 10).await.unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].score, 0.8);
    }

    #[tokio::test]
    async fn test_stats_track_reads_and_misses() {
        let store = MemoryStore::new();
        let _ = store.get_post_stats(&PostId::new("missing")).await.unwrap();
        store.save_aggregate(&aggregate("p", 1.0)).await.unwrap();
        let _ = store.get_post_stats(&PostId::new("p")).await.unwrap();

        let stats = store.stats();
        assert_eq!(stats.read_misses, 1);
        assert_eq!(stats.documents_written, 1);
        assert_eq!(stats.documents_read, 1);
    }
}
