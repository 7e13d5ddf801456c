// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The trending refresher.
//!
//! A ticker-driven worker that rescans every aggregate and recomputes its
//! score with the post's current age. Writes are suppressed below a 1%
//! relative change to bound write amplification, which also makes a
//! back-to-back second pass a no-op.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use pulse_core::score;
use pulse_store::DocumentStore;

/// Default tick interval.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Upper bound on aggregates examined per tick.
pub const REFRESH_SCAN_LIMIT: usize = 1000;

/// Minimum relative score change that triggers a write.
const WRITE_THRESHOLD: f64 = 0.01;

// =============================================================================
// RefreshReport
// =============================================================================

/// Summary of one refresher pass.
#[derive(Debug, Clone, Default)]
pub struct RefreshReport {
    /// Aggregates whose score changed enough to rewrite.
    pub updated: u64,
    /// Aggregates skipped due to per-item errors.
    pub errors: u64,
    /// Wall-clock duration of the pass.
    pub duration: Duration,
}

// =============================================================================
// TrendingRefresher
// =============================================================================

/// The periodic re-scoring worker.
#[derive(Debug)]
pub struct TrendingRefresher {
    store: Arc<dyn DocumentStore>,
    interval: Duration,
}

impl TrendingRefresher {
    /// Creates a refresher with the given tick interval.
    pub fn new(store: Arc<dyn DocumentStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Runs until the shutdown token is cancelled. The first pass runs
    /// immediately; ticks never overlap because the pass runs inline.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(interval = ?self.interval, "trending refresher started");

        self.run_once().await;

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        ticker.tick().await; // consume the immediate first tick

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("trending refresher stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_once().await;
                }
            }
        }
    }

    /// Executes one full re-scoring pass.
    pub async fn run_once(&self) -> RefreshReport {
        let started = Instant::now();
        let mut report = RefreshReport::default();

        let aggregates = match self.store.list_aggregates(REFRESH_SCAN_LIMIT).await {
            Ok(aggregates) => aggregates,
            Err(error) => {
                debug!(error = %error, "refresher scan failed");
                report.errors += 1;
                report.duration = started.elapsed();
                return report;
            }
        };

        let now = Utc::now();

        for mut aggregate in aggregates {
            // The post's creation time drives the decay; fall back to the
            // aggregate's own calculation time when the content record is
            // missing (indexing race).
            let created_at = match self.store.get_content(&aggregate.post_id).await {
                Ok(Some(content)) => content.created_at,
                Ok(None) => aggregate.calculated_at,
                Err(error) => {
                    debug!(post = %aggregate.post_id, error = %error, "skipping aggregate");
                    report.errors += 1;
                    continue;
                }
            };

            let new_score = score::trending_score(&aggregate, created_at, now);

            if (new_score - aggregate.score).abs() > aggregate.score * WRITE_THRESHOLD {
                aggregate.score = new_score;
                aggregate.calculated_at = now;

                match self.store.save_aggregate(&aggregate).await {
                    Ok(()) => report.updated += 1,
                    Err(error) => {
                        debug!(post = %aggregate.post_id, error = %error, "failed to save rescored aggregate");
                        report.errors += 1;
                    }
                }
            }
        }

        report.duration = started.elapsed();

        if report.updated > 0 || report.errors > 0 {
            info!(
                updated = report.updated,
                errors = report.errors,
                duration = ?report.duration,
                "trending scores refreshed"
            );
        }

        report
    }
}
