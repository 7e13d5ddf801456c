// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Service runtime orchestration.
//!
//! Initializes every component in dependency order, starts the background
//! tasks, serves HTTP until shutdown, then tears down in reverse: stop
//! accepting requests (5-second drain), stop the workers, flush the
//! producer (15-second deadline).
//!
//! Shutdown is one [`CancellationToken`] owned by the runtime. The signal
//! listener cancels it on SIGTERM/SIGINT, a failed consumer cancels it
//! from inside its task, and every long-running loop (consumer, refresher,
//! hub) plus the HTTP server's graceful-shutdown future observes the same
//! token.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use pulse_api::{ApiConfig, ApiServer, AppState};
use pulse_bus::{BusConsumer, EventPublisher, KafkaPublisher, TopicRegistry};
use pulse_config::PulseConfig;
use pulse_engine::{
    ContentEnricher, DashboardAnalytics, EventProcessor, PostIndexer, SubscriberHub,
    TrendingRefresher,
};
use pulse_store::{DocumentStore, MemoryStore};

use crate::error::{BinError, BinResult};

// =============================================================================
// ServiceRuntime
// =============================================================================

/// The main runtime that wires and supervises all components.
pub struct ServiceRuntime {
    config: Arc<PulseConfig>,
    shutdown: CancellationToken,
}

impl ServiceRuntime {
    /// Creates a runtime from validated configuration.
    pub fn new(config: PulseConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        }
    }

    /// Runs the service until shutdown.
    pub async fn run(self) -> BinResult<()> {
        info!(
            version = pulse_core::VERSION,
            environment = %self.config.server.environment,
            "starting Pulse"
        );

        let topics = TopicRegistry::new(&self.config.topics);

        // Transport and storage. Failing to construct either is fatal.
        let publisher: Arc<dyn EventPublisher> = Arc::new(
            KafkaPublisher::new(&self.config.bus, topics.clone())
                .map_err(|e| BinError::Initialization(format!("bus producer: {e}")))?,
        );
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());

        // Engine components.
        let enricher = Arc::new(ContentEnricher::new());
        let (hub, hub_handle) = SubscriberHub::channel();
        let processor = Arc::new(
            EventProcessor::new(publisher.clone(), store.clone(), enricher)
                .with_hub(hub_handle.clone())
                .with_direct_writes(!self.config.bus.loopback_analytics),
        );
        let analytics = Arc::new(DashboardAnalytics::new(store.clone()));
        let indexer = Arc::new(PostIndexer::new(store.clone()));
        let refresher = TrendingRefresher::new(
            store.clone(),
            Duration::from_secs(self.config.workers.refresh_interval_secs),
        );

        // Consumer construction is fatal on failure; its subscribe error
        // propagates out of the task and also tears the process down.
        let consumer = BusConsumer::new(&self.config.bus, topics, processor.clone())
            .map_err(|e| BinError::Initialization(format!("bus consumer: {e}")))?;

        // Background tasks, all tied to the shutdown token.
        let hub_task = tokio::spawn(hub.run(self.shutdown.clone()));

        let consumer_token = self.shutdown.clone();
        let consumer_task = tokio::spawn(async move {
            if let Err(e) = consumer.run(consumer_token.clone()).await {
                error!(error = %e, "bus consumer failed");
                consumer_token.cancel();
            }
        });

        let refresher_task = tokio::spawn(refresher.run(self.shutdown.clone()));

        if self.config.workers.index_on_startup {
            let startup_indexer = indexer.clone();
            tokio::spawn(async move {
                startup_indexer.index_all().await;
            });
        }

        // HTTP surface.
        let api_config = ApiConfig {
            port: self.config.server.port,
            environment: self.config.server.environment.clone(),
            allowed_origins: self.config.server.allowed_origins.clone(),
        };
        let state = AppState::builder()
            .config(api_config)
            .processor(processor)
            .store(store)
            .analytics(analytics)
            .hub(hub_handle)
            .indexer(indexer)
            .build()
            .map_err(|e| BinError::Initialization(format!("app state: {e}")))?;

        let server = ApiServer::new(state);
        let server_drain = self.shutdown.clone().cancelled_owned();
        let server_task = tokio::spawn(async move {
            server.run_with_shutdown(server_drain).await
        });

        tokio::spawn(cancel_on_signal(self.shutdown.clone()));

        info!(port = self.config.server.port, "Pulse is ready");

        // Block until the token is cancelled, then unwind.
        self.shutdown.cancelled().await;
        info!("shutdown initiated, draining");

        // The HTTP server drains in-flight requests; don't wait forever.
        match tokio::time::timeout(Duration::from_secs(5), server_task).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => warn!(error = %e, "server exited with error"),
            Ok(Err(e)) => warn!(error = %e, "server task panicked"),
            Err(_) => warn!("server drain deadline elapsed"),
        }

        let _ = consumer_task.await;
        let _ = refresher_task.await;
        let _ = hub_task.await;

        // Flush outstanding bus records last.
        publisher.close().await;

        info!("Pulse shutdown complete");
        Ok(())
    }
}

// =============================================================================
// Signal Wiring
// =============================================================================

/// Cancels the runtime's shutdown token when the process receives a
/// termination signal. Returns quietly if something else cancelled first.
async fn cancel_on_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM"),
            _ = sigint.recv() => info!("received SIGINT"),
            _ = shutdown.cancelled() => return,
        }
    }

    #[cfg(windows)]
    {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.expect("failed to register Ctrl+C handler");
                info!("received Ctrl+C");
            }
            _ = shutdown.cancelled() => return,
        }
    }

    shutdown.cancel();
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancel_on_signal_exits_when_already_cancelled() {
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        // Resolves immediately via the cancelled arm instead of waiting
        // on a signal that never arrives.
        tokio::time::timeout(Duration::from_secs(1), cancel_on_signal(shutdown))
            .await
            .expect("should return once the token is cancelled");
    }

    #[tokio::test]
    async fn test_worker_loops_stop_on_cancel() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let refresher = TrendingRefresher::new(store, Duration::from_secs(300));

        let shutdown = CancellationToken::new();
        let task = tokio::spawn(refresher.run(shutdown.clone()));

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("refresher should stop on cancel")
            .unwrap();
    }
}
