// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The event processor: the orchestrator between ingestion, the bus, the
//! store, and the subscriber hub.
//!
//! On the ingest side, each call stamps missing timestamps, publishes to
//! the appropriate stream, and for side-effectful events also performs the
//! store update directly so the pipeline works before the consumer catches
//! up. The call succeeds iff the publish succeeded; store failures are
//! logged and absorbed.
//!
//! On the consume side, the processor is the bus consumer's
//! [`RecordHandler`]: it applies analytics updates idempotently, persists
//! trending scores with a fresh viral forecast, and raises viral alerts
//! through the hub.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};

use pulse_bus::{EventPublisher, RecordHandler};
use pulse_core::aggregate::{Recommendation, TrendingScore, ViralSignals};
use pulse_core::error::PulseError;
use pulse_core::event::{ContentCreated, InteractionEvent, RemixEvent, StreamRecord, ViewEvent};
use pulse_core::viral;
use pulse_store::DocumentStore;

use crate::enrich::ContentEnricher;
use crate::hub::HubHandle;

/// Viral probability above which an alert is broadcast.
///
/// The alert is informational; the threshold is a heuristic.
pub const VIRAL_ALERT_THRESHOLD: f64 = 0.7;

// =============================================================================
// EventProcessor
// =============================================================================

/// Central orchestrator for ingestion and consumption.
#[derive(Debug)]
pub struct EventProcessor {
    publisher: Arc<dyn EventPublisher>,
    store: Arc<dyn DocumentStore>,
    enricher: Arc<ContentEnricher>,
    hub: Option<HubHandle>,
    /// Whether the ingest path also performs store writes directly.
    ///
    /// Disabled in loopback-analytics mode, where the consumer performs
    /// the same writes; leaving both on would double-count.
    direct_writes: bool,
}

impl EventProcessor {
    /// Creates a processor over the given collaborators.
    pub fn new(
        publisher: Arc<dyn EventPublisher>,
        store: Arc<dyn DocumentStore>,
        enricher: Arc<ContentEnricher>,
    ) -> Self {
        Self {
            publisher,
            store,
            enricher,
            hub: None,
            direct_writes: true,
        }
    }

    /// Attaches the subscriber hub for live notifications.
    pub fn with_hub(mut self, hub: HubHandle) -> Self {
        self.hub = Some(hub);
        self
    }

    /// Enables or disables the ingest path's direct store writes.
    pub fn with_direct_writes(mut self, enabled: bool) -> Self {
        self.direct_writes = enabled;
        self
    }

    /// Returns the document store this processor writes through.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    // =========================================================================
    // Ingest side
    // =========================================================================

    /// Handles an ingested interaction: stamp and forward to the bus.
    pub async fn process_interaction(&self, mut event: InteractionEvent) -> Result<(), PulseError> {
        event.stamp(Utc::now());
        self.publisher.publish_interaction(&event).await?;

        info!(kind = %event.kind, post = %event.post_id, "processed interaction");
        Ok(())
    }

    /// Handles ingested content metadata: enrich, forward, and update the
    /// content record's derived fields.
    ///
    /// Returns the enriched event so the API can echo the derived fields.
    pub async fn process_content(
        &self,
        mut event: ContentCreated,
    ) -> Result<ContentCreated, PulseError> {
        event.stamp(Utc::now());

        let profile = self.enricher.enrich(&event.prompt, event.content_type).await;
        event.keywords = profile.keywords.clone();
        event.category = Some(profile.category.clone());
        event.style = Some(profile.style.clone());

        self.publisher.publish_content(&event).await?;

        if let Err(error) = self
            .store
            .update_content_metadata(
                &event.post_id,
                &profile.keywords,
                &profile.category,
                &profile.style,
            )
            .await
        {
            warn!(post = %event.post_id, error = %error, "failed to update content metadata");
        }

        info!(
            post = %event.post_id,
            keywords = event.keywords.len(),
            "processed content metadata"
        );
        Ok(event)
    }

    /// Handles an ingested view: stamp, forward, and bump the view counter.
    pub async fn process_view(&self, mut event: ViewEvent) -> Result<(), PulseError> {
        event.stamp(Utc::now());
        self.publisher.publish_view(&event).await?;

        if self.direct_writes {
            if let Err(error) = self.store.increment_view_count(&event.post_id).await {
                warn!(post = %event.post_id, error = %error, "failed to increment view count");
            }
        }

        info!(post = %event.post_id, user = %event.user_id, "processed view");
        Ok(())
    }

    /// Handles an ingested remix: validate, stamp, forward, and record the
    /// chain edge.
    pub async fn process_remix(&self, mut event: RemixEvent) -> Result<(), PulseError> {
        if event.is_self_referencing() {
            return Err(PulseError::invalid_input(
                "original_post_id and remix_post_id must differ",
            ));
        }

        event.stamp(Utc::now());
        self.publisher.publish_remix(&event).await?;

        if self.direct_writes {
            if let Err(error) = self
                .store
                .track_remix_chain(&event.original_post_id, &event.remix_post_id)
                .await
            {
                warn!(
                    origin = %event.original_post_id,
                    error = %error,
                    "failed to track remix chain"
                );
            }
        }

        info!(
            origin = %event.original_post_id,
            remix = %event.remix_post_id,
            "processed remix"
        );
        Ok(())
    }

    // =========================================================================
    // Consume side
    // =========================================================================

    /// Applies an interaction to the analytics counters.
    pub async fn interaction_for_analytics(&self, event: &InteractionEvent) {
        match self.store.update_post_analytics(&event.post_id, event.kind).await {
            Ok(()) => {
                if let Err(error) = self
                    .store
                    .update_trending_from_interaction(&event.post_id, event.kind)
                    .await
                {
                    warn!(post = %event.post_id, error = %error, "failed to update trending score");
                }
            }
            Err(error) => {
                warn!(post = %event.post_id, error = %error, "failed to update post analytics");
            }
        }
    }

    /// Applies a view to the analytics counters and the aggregate.
    pub async fn view_for_analytics(&self, event: &ViewEvent) {
        if let Err(error) = self.store.increment_view_count(&event.post_id).await {
            warn!(post = %event.post_id, error = %error, "failed to increment view count");
        }

        if let Err(error) = self.store.update_trending_from_view(&event.post_id).await {
            warn!(post = %event.post_id, error = %error, "failed to update trending score");
        }
    }

    /// Applies a remix to the chain and the origin's aggregate.
    pub async fn remix_for_analytics(&self, event: &RemixEvent) {
        if let Err(error) = self
            .store
            .track_remix_chain(&event.original_post_id, &event.remix_post_id)
            .await
        {
            warn!(origin = %event.original_post_id, error = %error, "failed to track remix chain");
        }

        if let Err(error) = self
            .store
            .update_trending_from_remix(&event.original_post_id)
            .await
        {
            warn!(origin = %event.original_post_id, error = %error, "failed to update trending score");
        }
    }

    /// Persists a trending score with a fresh viral forecast, notifying
    /// subscribers and alerting above the viral threshold.
    pub async fn trending_score(&self, mut score: TrendingScore) {
        let signals = ViralSignals::from_aggregate(&score, Utc::now());
        let forecast = viral::forecast(&signals);
        score.viral_probability = forecast.viral_probability;

        if let Err(error) = self.store.save_aggregate(&score).await {
            warn!(post = %score.post_id, error = %error, "failed to save trending score");
            return;
        }

        info!(
            post = %score.post_id,
            score = score.score,
            viral_probability = score.viral_probability,
            "processed trending score"
        );

        if let Some(hub) = &self.hub {
            hub.broadcast_trending_update(&score.post_id, score.score, score.view_count)
                .await;

            if score.viral_probability > VIRAL_ALERT_THRESHOLD {
                info!(
                    post = %score.post_id,
                    probability = score.viral_probability,
                    "viral alert raised"
                );
                hub.broadcast_viral_alert(&score.post_id, score.viral_probability, score.score)
                    .await;
            }
        }
    }

    /// Persists a recommendation.
    pub async fn recommendation(&self, rec: &Recommendation) {
        if let Err(error) = self.store.save_recommendation(rec).await {
            warn!(user = %rec.user_id, error = %error, "failed to save recommendation");
            return;
        }

        info!(user = %rec.user_id, post = %rec.post_id, score = rec.score, "processed recommendation");
    }
}

#[async_trait]
impl RecordHandler for EventProcessor {
    async fn handle_record(&self, record: StreamRecord) {
        match record {
            StreamRecord::Interaction(event) => self.interaction_for_analytics(&event).await,
            StreamRecord::View(event) => self.view_for_analytics(&event).await,
            StreamRecord::Remix(event) => self.remix_for_analytics(&event).await,
            StreamRecord::Trending(score) => self.trending_score(score).await,
            StreamRecord::Recommendation(rec) => self.recommendation(&rec).await,
            // Content metadata is fully handled on the ingest side.
            StreamRecord::Content(event) => {
                tracing::debug!(post = %event.post_id, "ignoring content record");
            }
        }
    }
}
