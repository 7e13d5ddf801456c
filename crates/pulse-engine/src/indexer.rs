// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The bulk post indexer.
//!
//! A one-shot pass that imports every content record into the trending
//! store: existing aggregates are refreshed with the authoritative counts
//! from the content record, missing ones are created. Runs detached at
//! startup and on demand from the admin endpoint.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info};

use pulse_core::aggregate::{Content, TrendingScore};
use pulse_core::score;
use pulse_store::DocumentStore;

// =============================================================================
// IndexReport
// =============================================================================

/// Summary of one indexing pass.
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    /// Aggregates created.
    pub indexed: u64,
    /// Aggregates updated from content counts.
    pub updated: u64,
    /// Content records skipped due to errors.
    pub errors: u64,
    /// Wall-clock duration of the pass.
    pub duration: Duration,
}

// =============================================================================
// PostIndexer
// =============================================================================

/// Imports the content collection into the trending store.
#[derive(Debug)]
pub struct PostIndexer {
    store: Arc<dyn DocumentStore>,
}

impl PostIndexer {
    /// Creates an indexer over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Indexes every content record in one pass.
    pub async fn index_all(&self) -> IndexReport {
        let started = Instant::now();
        let mut report = IndexReport::default();

        let posts = match self.store.list_content(0).await {
            Ok(posts) => posts,
            Err(error) => {
                debug!(error = %error, "indexer scan failed");
                report.errors += 1;
                report.duration = started.elapsed();
                return report;
            }
        };

        for content in posts {
            match self.store.get_post_stats(&content.post_id).await {
                Ok(Some(existing)) => {
                    match self.refresh_from_content(existing, &content).await {
                        Ok(()) => report.updated += 1,
                        Err(()) => report.errors += 1,
                    }
                }
                Ok(None) => match self.create_from_content(&content).await {
                    Ok(()) => report.indexed += 1,
                    Err(()) => report.errors += 1,
                },
                Err(error) => {
                    debug!(post = %content.post_id, error = %error, "failed to read aggregate");
                    report.errors += 1;
                }
            }
        }

        report.duration = started.elapsed();

        info!(
            indexed = report.indexed,
            updated = report.updated,
            errors = report.errors,
            duration = ?report.duration,
            "post indexing complete"
        );

        report
    }

    async fn create_from_content(&self, content: &Content) -> Result<(), ()> {
        let mut aggregate = TrendingScore::new(content.post_id.clone());
        copy_counts(&mut aggregate, content);
        aggregate.score = score::trending_score(&aggregate, content.created_at, Utc::now());

        self.store.save_aggregate(&aggregate).await.map_err(|error| {
            debug!(post = %content.post_id, error = %error, "failed to create aggregate");
        })
    }

    async fn refresh_from_content(
        &self,
        mut aggregate: TrendingScore,
        content: &Content,
    ) -> Result<(), ()> {
        copy_counts(&mut aggregate, content);
        aggregate.score = score::trending_score(&aggregate, content.created_at, Utc::now());
        aggregate.calculated_at = Utc::now();

        self.store.save_aggregate(&aggregate).await.map_err(|error| {
            debug!(post = %content.post_id, error = %error, "failed to update aggregate");
        })
    }
}

fn copy_counts(aggregate: &mut TrendingScore, content: &Content) {
    aggregate.view_count = content.view_count;
    aggregate.like_count = content.like_count;
    aggregate.comment_count = content.comment_count;
    aggregate.share_count = content.share_count;
    aggregate.remix_count = content.remix_count;
}
