// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use pulse_engine::{DashboardAnalytics, EventProcessor, HubHandle, PostIndexer};
use pulse_store::DocumentStore;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// The event processor for ingestion.
    pub processor: Arc<EventProcessor>,
    /// The document store for direct reads.
    pub store: Arc<dyn DocumentStore>,
    /// The read-side projections.
    pub analytics: Arc<DashboardAnalytics>,
    /// The subscriber hub handle.
    pub hub: HubHandle,
    /// The bulk indexer (admin-triggered).
    pub indexer: Arc<PostIndexer>,
}

impl AppState {
    /// Creates a new state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing [`AppState`].
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    processor: Option<Arc<EventProcessor>>,
    store: Option<Arc<dyn DocumentStore>>,
    analytics: Option<Arc<DashboardAnalytics>>,
    hub: Option<HubHandle>,
    indexer: Option<Arc<PostIndexer>>,
}

impl AppStateBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the event processor.
    pub fn processor(mut self, processor: Arc<EventProcessor>) -> Self {
        self.processor = Some(processor);
        self
    }

    /// Sets the document store.
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the analytics projections.
    pub fn analytics(mut self, analytics: Arc<DashboardAnalytics>) -> Self {
        self.analytics = Some(analytics);
        self
    }

    /// Sets the hub handle.
    pub fn hub(mut self, hub: HubHandle) -> Self {
        self.hub = Some(hub);
        self
    }

    /// Sets the bulk indexer.
    pub fn indexer(mut self, indexer: Arc<PostIndexer>) -> Self {
        self.indexer = Some(indexer);
        self
    }

    /// Builds the state; every component except the config is required.
    pub fn build(self) -> ApiResult<AppState> {
        let store = self
            .store
            .ok_or_else(|| ApiError::internal("AppState requires a document store"))?;

        let analytics = match self.analytics {
            Some(analytics) => analytics,
            None => Arc::new(DashboardAnalytics::new(store.clone())),
        };

        let indexer = match self.indexer {
            Some(indexer) => indexer,
            None => Arc::new(PostIndexer::new(store.clone())),
        };

        Ok(AppState {
            config: Arc::new(self.config.unwrap_or_default()),
            processor: self
                .processor
                .ok_or_else(|| ApiError::internal("AppState requires an event processor"))?,
            store,
            analytics,
            hub: self
                .hub
                .ok_or_else(|| ApiError::internal("AppState requires a hub handle"))?,
            indexer,
        })
    }
}
