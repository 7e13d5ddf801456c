// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The document store capability trait.
//!
//! [`DocumentStore`] covers every read and write the engine performs
//! against the five logical collections. Network retries are delegated to
//! the backing client; the engine itself never retries.
//!
//! The `update_trending_from_*` helpers are provided methods composed from
//! the primitive operations. They bump counters with the *instant* score
//! (raw weights, no decay) so the hot path stays a single read-modify-write;
//! the periodic refresher reconciles the value to the canonical formula.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use pulse_core::aggregate::{Content, Recommendation, TrendingScore, UserProfile};
use pulse_core::error::StoreError;
use pulse_core::score;
use pulse_core::types::{InteractionKind, PostId, UserId};

/// The scan bound for the trending top-N query.
///
/// Top-N reads scan at most this many aggregates and sort them in memory,
/// a stand-in for a composite index on the external store. An indexed
/// ordered query replaces this once the aggregate count outgrows a single
/// scan.
pub const TRENDING_SCAN_LIMIT: usize = 100;

// =============================================================================
// Store Statistics
// =============================================================================

/// Lock-free store statistics using atomic counters.
#[derive(Debug, Default)]
pub struct StoreStatsInner {
    /// Documents read (hits).
    pub documents_read: AtomicU64,
    /// Documents written or updated.
    pub documents_written: AtomicU64,
    /// Point reads that found nothing.
    pub read_misses: AtomicU64,
    /// Failed operations.
    pub errors: AtomicU64,
}

impl StoreStatsInner {
    /// Creates new statistics with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a document read.
    #[inline]
    pub fn record_read(&self) {
        self.documents_read.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a point-read miss.
    #[inline]
    pub fn record_miss(&self) {
        self.read_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a document write.
    #[inline]
    pub fn record_write(&self) {
        self.documents_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a failed operation.
    #[inline]
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Creates a snapshot of the statistics.
    pub fn snapshot(&self) -> StoreStats {
        StoreStats {
            documents_read: self.documents_read.load(Ordering::Relaxed),
            documents_written: self.documents_written.load(Ordering::Relaxed),
            read_misses: self.read_misses.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Immutable snapshot of store statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreStats {
    /// Documents read (hits).
    pub documents_read: u64,
    /// Documents written or updated.
    pub documents_written: u64,
    /// Point reads that found nothing.
    pub read_misses: u64,
    /// Failed operations.
    pub errors: u64,
}

// =============================================================================
// DocumentStore Trait
// =============================================================================

/// The capability trait over the external document database.
///
/// Implementations must be thread-safe; concurrent callers follow the
/// single-writer-per-key discipline described in the crate docs.
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    // =========================================================================
    // trending_scores
    // =========================================================================

    /// Replaces or creates the aggregate keyed by its post ID.
    async fn save_aggregate(&self, score: &TrendingScore) -> Result<(), StoreError>;

    /// Fetches an aggregate by post ID.
    async fn get_post_stats(&self, post_id: &PostId) -> Result<Option<TrendingScore>, StoreError>;

    /// Lists aggregates, up to `limit` (0 means no cap).
    async fn list_aggregates(&self, limit: usize) -> Result<Vec<TrendingScore>, StoreError>;

    /// Returns up to `limit` aggregates in non-increasing score order.
    ///
    /// Scans at most [`TRENDING_SCAN_LIMIT`] documents and sorts them in
    /// memory before truncating.
    async fn get_trending_posts(&self, limit: usize) -> Result<Vec<TrendingScore>, StoreError>;

    // =========================================================================
    // recommendations/{user}/items/{post}
    // =========================================================================

    /// Upserts a recommendation under the user's subcollection.
    async fn save_recommendation(&self, rec: &Recommendation) -> Result<(), StoreError>;

    /// Returns up to `limit` recommendations for a user, best first.
    async fn get_user_recommendations(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Recommendation>, StoreError>;

    // =========================================================================
    // posts (owned by the external platform)
    // =========================================================================

    /// Writes a full content record. The platform owns these documents;
    /// the engine uses this for seeding and test fixtures only.
    async fn put_content(&self, content: &Content) -> Result<(), StoreError>;

    /// Fetches a content record by post ID.
    async fn get_content(&self, post_id: &PostId) -> Result<Option<Content>, StoreError>;

    /// Lists content records, up to `limit` (0 means no cap).
    async fn list_content(&self, limit: usize) -> Result<Vec<Content>, StoreError>;

    /// Atomically increments the post's view counter and stamps
    /// `last_viewed_at`.
    async fn increment_view_count(&self, post_id: &PostId) -> Result<(), StoreError>;

    /// Partially updates the derived metadata fields of a post.
    async fn update_content_metadata(
        &self,
        post_id: &PostId,
        keywords: &[String],
        category: &str,
        style: &str,
    ) -> Result<(), StoreError>;

    /// Atomically increments the count field matching the interaction kind
    /// and stamps `updated_at`. A view kind is a no-op here; views go
    /// through [`DocumentStore::increment_view_count`]. Fails with
    /// `NotFound` if the content record does not exist (non-fatal for the
    /// pipeline).
    async fn update_post_analytics(
        &self,
        post_id: &PostId,
        kind: InteractionKind,
    ) -> Result<(), StoreError>;

    // =========================================================================
    // remix_chains/{origin}/remixes/{remix}
    // =========================================================================

    /// Records a remix edge. Idempotent: re-recording the same
    /// (origin, remix) pair keeps the original timestamp.
    async fn track_remix_chain(&self, original: &PostId, remix: &PostId)
        -> Result<(), StoreError>;

    /// Counts the remixes recorded under an origin post.
    async fn get_remix_count(&self, post_id: &PostId) -> Result<usize, StoreError>;

    // =========================================================================
    // users (read-only)
    // =========================================================================

    /// Fetches a user profile.
    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserProfile>, StoreError>;

    /// Writes a user profile (seeding and test fixtures only).
    async fn put_user(&self, profile: &UserProfile) -> Result<(), StoreError>;

    // =========================================================================
    // Hot-path trending helpers (provided)
    // =========================================================================

    /// Bumps the aggregate for a view, creating it on first sight.
    async fn update_trending_from_view(&self, post_id: &PostId) -> Result<(), StoreError> {
        match self.get_post_stats(post_id).await? {
            Some(mut aggregate) => {
                aggregate.view_count += 1;
                aggregate.score = score::instant_score(&aggregate);
                aggregate.calculated_at = Utc::now();
                self.save_aggregate(&aggregate).await
            }
            None => {
                let mut aggregate = TrendingScore::new(post_id.clone());
                aggregate.view_count = 1;
                aggregate.score = 0.1;
                self.save_aggregate(&aggregate).await
            }
        }
    }

    /// Bumps the aggregate for a non-view interaction, creating it on
    /// first sight. A view kind is a no-op.
    async fn update_trending_from_interaction(
        &self,
        post_id: &PostId,
        kind: InteractionKind,
    ) -> Result<(), StoreError> {
        if !kind.is_engagement() {
            return Ok(());
        }

        match self.get_post_stats(post_id).await? {
            Some(mut aggregate) => {
                bump_interaction(&mut aggregate, kind);
                aggregate.score = score::instant_score(&aggregate);
                aggregate.calculated_at = Utc::now();
                self.save_aggregate(&aggregate).await
            }
            None => {
                let mut aggregate = TrendingScore::new(post_id.clone());
                bump_interaction(&mut aggregate, kind);
                aggregate.score = 1.0;
                self.save_aggregate(&aggregate).await
            }
        }
    }

    /// Bumps the origin post's aggregate for a remix, creating it on first
    /// sight.
    async fn update_trending_from_remix(&self, post_id: &PostId) -> Result<(), StoreError> {
        match self.get_post_stats(post_id).await? {
            Some(mut aggregate) => {
                aggregate.remix_count += 1;
                aggregate.score = score::instant_score(&aggregate);
                aggregate.calculated_at = Utc::now();
                self.save_aggregate(&aggregate).await
            }
            None => {
                let mut aggregate = TrendingScore::new(post_id.clone());
                aggregate.remix_count = 1;
                aggregate.score = 2.0;
                self.save_aggregate(&aggregate).await
            }
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns a snapshot of the store statistics.
    fn stats(&self) -> StoreStats;
}

fn bump_interaction(aggregate: &mut TrendingScore, kind: InteractionKind) {
    match kind {
        InteractionKind::Like => aggregate.like_count += 1,
        InteractionKind::Comment => aggregate.comment_count += 1,
        InteractionKind::Share => aggregate.share_count += 1,
        InteractionKind::View => {}
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_inner_counters() {
        let stats = StoreStatsInner::new();
        stats.record_read();
        stats.record_read();
        stats.record_write();
        stats.record_miss();
        stats.record_error();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.documents_read, 2);
        assert_eq!(snapshot.documents_written, 1);
        assert_eq!(snapshot.read_misses, 1);
        assert_eq!(snapshot.errors, 1);
    }

    #[test]
    fn test_bump_interaction() {
        let mut aggregate = TrendingScore::new(PostId::new("p"));
        bump_interaction(&mut aggregate, InteractionKind::Like);
        bump_interaction(&mut aggregate, InteractionKind::Comment);
        bump_interaction(&mut aggregate, InteractionKind::Share);
        bump_interaction(&mut aggregate, InteractionKind::View);

        assert_eq!(aggregate.like_count, 1);
        assert_eq!(aggregate.comment_count, 1);
        assert_eq!(aggregate.share_count, 1);
        assert_eq!(aggregate.view_count, 0);
    }
}
