// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The subscriber hub: in-process publish/subscribe to live clients.
//!
//! Register, unregister, and broadcast requests funnel through three
//! channels into one reconciliation loop that owns the client set, so hub
//! broadcasts are globally ordered and the set needs no lock.
//!
//! Each client owns a bounded outbound queue. A broadcast serialises its
//! message once and fans it out without blocking: a client whose queue is
//! full is closed and removed. Slow subscribers are dropped; the message
//! is never delayed for the others.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use pulse_core::types::PostId;

/// Outbound queue slots per client.
pub const CLIENT_QUEUE_CAPACITY: usize = 256;

/// Capacity of the hub's own command channels.
const HUB_CHANNEL_CAPACITY: usize = 256;

/// A registered hub client.
pub type ClientId = Uuid;

/// An outbound frame, serialised once and shared across clients.
pub type Frame = Arc<str>;

// =============================================================================
// Message Envelopes
// =============================================================================

/// A trending-score update pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingUpdate {
    /// Envelope discriminator, always `trending_update`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The post whose score changed.
    pub post_id: PostId,
    /// The new score.
    pub score: f64,
    /// The current view count.
    pub view_count: u64,
    /// RFC-3339 timestamp of the broadcast.
    pub timestamp: String,
}

/// A viral alert pushed to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViralAlert {
    /// Envelope discriminator, always `viral_alert`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The post predicted to go viral.
    pub post_id: PostId,
    /// The viral probability that tripped the alert.
    pub viral_probability: f64,
    /// The post's current score.
    pub score: f64,
    /// Human-readable alert message.
    pub message: String,
    /// RFC-3339 timestamp of the broadcast.
    pub timestamp: String,
}

fn rfc3339_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

// =============================================================================
// SubscriberHub
// =============================================================================

struct Registration {
    id: ClientId,
    sender: mpsc::Sender<Frame>,
}

/// The reconciliation loop that owns the client set.
pub struct SubscriberHub {
    register_rx: mpsc::Receiver<Registration>,
    unregister_rx: mpsc::Receiver<ClientId>,
    broadcast_rx: mpsc::Receiver<Frame>,
    clients: HashMap<ClientId, mpsc::Sender<Frame>>,
    client_gauge: Arc<AtomicUsize>,
}

impl SubscriberHub {
    /// Creates the hub and its cloneable handle.
    pub fn channel() -> (Self, HubHandle) {
        let (register_tx, register_rx) = mpsc::channel(HUB_CHANNEL_CAPACITY);
        let (unregister_tx, unregister_rx) = mpsc::channel(HUB_CHANNEL_CAPACITY);
        let (broadcast_tx, broadcast_rx) = mpsc::channel(HUB_CHANNEL_CAPACITY);
        let client_gauge = Arc::new(AtomicUsize::new(0));

        let hub = Self {
            register_rx,
            unregister_rx,
            broadcast_rx,
            clients: HashMap::new(),
            client_gauge: client_gauge.clone(),
        };

        let handle = HubHandle {
            register_tx,
            unregister_tx,
            broadcast_tx,
            client_gauge,
        };

        (hub, handle)
    }

    /// Runs the reconciliation loop until the shutdown token is
    /// cancelled.
    pub async fn run(mut self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(clients = self.clients.len(), "subscriber hub shutting down");
                    break;
                }
                Some(registration) = self.register_rx.recv() => {
                    self.clients.insert(registration.id, registration.sender);
                    self.client_gauge.store(self.clients.len(), Ordering::Relaxed);
                    info!(client = %registration.id, total = self.clients.len(), "subscriber registered");
                }
                Some(id) = self.unregister_rx.recv() => {
                    if self.clients.remove(&id).is_some() {
                        self.client_gauge.store(self.clients.len(), Ordering::Relaxed);
                        info!(client = %id, total = self.clients.len(), "subscriber unregistered");
                    }
                }
                Some(frame) = self.broadcast_rx.recv() => {
                    self.fan_out(frame);
                }
            }
        }

        // Dropping the senders closes every client's outbound queue.
        self.clients.clear();
        self.client_gauge.store(0, Ordering::Relaxed);
    }

    /// Delivers one frame to every client, evicting the ones whose queue
    /// is full.
    fn fan_out(&mut self, frame: Frame) {
        let mut evicted: Vec<ClientId> = Vec::new();

        for (id, sender) in &self.clients {
            match sender.try_send(frame.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(client = %id, "outbound queue full, evicting slow subscriber");
                    evicted.push(*id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!(client = %id, "subscriber connection gone");
                    evicted.push(*id);
                }
            }
        }

        for id in evicted {
            self.clients.remove(&id);
        }
        self.client_gauge.store(self.clients.len(), Ordering::Relaxed);
    }
}

// =============================================================================
// HubHandle
// =============================================================================

/// Cloneable handle for registering clients and broadcasting messages.
#[derive(Clone)]
pub struct HubHandle {
    register_tx: mpsc::Sender<Registration>,
    unregister_tx: mpsc::Sender<ClientId>,
    broadcast_tx: mpsc::Sender<Frame>,
    client_gauge: Arc<AtomicUsize>,
}

impl HubHandle {
    /// Registers a new client and returns its ID and outbound queue.
    pub async fn register(&self) -> (ClientId, mpsc::Receiver<Frame>) {
        let (sender, receiver) = mpsc::channel(CLIENT_QUEUE_CAPACITY);
        let id = Uuid::now_v7();

        if self.register_tx.send(Registration { id, sender }).await.is_err() {
            warn!("hub is not running, registration dropped");
        }

        (id, receiver)
    }

    /// Unregisters a client.
    pub async fn unregister(&self, id: ClientId) {
        let _ = self.unregister_tx.send(id).await;
    }

    /// Broadcasts a trending-score update to all clients.
    pub async fn broadcast_trending_update(&self, post_id: &PostId, score: f64, view_count: u64) {
        let message = TrendingUpdate {
            kind: "trending_update".to_string(),
            post_id: post_id.clone(),
            score,
            view_count,
            timestamp: rfc3339_now(),
        };

        match serde_json::to_string(&message) {
            Ok(frame) => {
                self.send_frame(frame.into()).await;
                debug!(post = %post_id, score, "broadcast trending update");
            }
            Err(error) => warn!(error = %error, "failed to encode trending update"),
        }
    }

    /// Broadcasts a viral alert to all clients.
    pub async fn broadcast_viral_alert(&self, post_id: &PostId, viral_probability: f64, score: f64) {
        let message = ViralAlert {
            kind: "viral_alert".to_string(),
            post_id: post_id.clone(),
            viral_probability,
            score,
            message: "Content is predicted to go viral!".to_string(),
            timestamp: rfc3339_now(),
        };

        match serde_json::to_string(&message) {
            Ok(frame) => {
                self.send_frame(frame.into()).await;
                info!(post = %post_id, probability = viral_probability, "broadcast viral alert");
            }
            Err(error) => warn!(error = %error, "failed to encode viral alert"),
        }
    }

    /// Current registered client count.
    pub fn client_count(&self) -> usize {
        self.client_gauge.load(Ordering::Relaxed)
    }

    async fn send_frame(&self, frame: Frame) {
        if self.broadcast_tx.send(frame).await.is_err() {
            warn!("hub is not running, broadcast dropped");
        }
    }
}

impl std::fmt::Debug for HubHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubHandle")
            .field("clients", &self.client_count())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn settle() {
        // Let the hub loop drain its channels.
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[tokio::test]
    async fn test_register_broadcast_receive() {
        let (hub, handle) = SubscriberHub::channel();
        let shutdown = CancellationToken::new();
        tokio::spawn(hub.run(shutdown.clone()));

        let (_id, mut rx) = handle.register().await;
        settle().await;
        assert_eq!(handle.client_count(), 1);

        handle
            .broadcast_trending_update(&PostId::new("p1"), 42.0, 100)
            .await;

        let frame = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();

        let update: TrendingUpdate = serde_json::from_str(&frame).unwrap();
        assert_eq!(update.kind, "trending_update");
        assert_eq!(update.post_id.as_str(), "p1");
        assert_eq!(update.score, 42.0);
        assert_eq!(update.view_count, 100);
    }

    #[tokio::test]
    async fn test_unregister_stops_delivery() {
        let (hub, handle) = SubscriberHub::channel();
        let shutdown = CancellationToken::new();
        tokio::spawn(hub.run(shutdown.clone()));

        let (id, mut rx) = handle.register().await;
        settle().await;

        handle.unregister(id).await;
        settle().await;
        assert_eq!(handle.client_count(), 0);

        // The hub dropped its sender, so the queue closes once drained.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_viral_alert_envelope() {
        let (hub, handle) = SubscriberHub::channel();
        let shutdown = CancellationToken::new();
        tokio::spawn(hub.run(shutdown.clone()));

        let (_id, mut rx) = handle.register().await;
        settle().await;

        handle
            .broadcast_viral_alert(&PostId::new("p9"), 0.95, 210.0)
            .await;

        let frame = rx.recv().await.unwrap();
        let alert: ViralAlert = serde_json::from_str(&frame).unwrap();
        assert_eq!(alert.kind, "viral_alert");
        assert_eq!(alert.viral_probability, 0.95);
        assert!(!alert.message.is_empty());
    }

    #[tokio::test]
    async fn test_slow_client_evicted_on_full_queue() {
        const BROADCASTS: usize = CLIENT_QUEUE_CAPACITY + 10;

        let (hub, handle) = SubscriberHub::channel();
        let shutdown = CancellationToken::new();
        tokio::spawn(hub.run(shutdown.clone()));

        let (_slow, slow_rx) = handle.register().await;
        let (_healthy, mut healthy_rx) = handle.register().await;
        settle().await;

        // The healthy client drains concurrently; the slow one never
        // reads, so its queue fills at capacity and the next broadcast
        // evicts it.
        let drain = tokio::spawn(async move {
            let mut count = 0;
            while healthy_rx.recv().await.is_some() {
                count += 1;
            }
            count
        });

        for _ in 0..BROADCASTS {
            handle
                .broadcast_trending_update(&PostId::new("p"), 1.0, 1)
                .await;
            tokio::task::yield_now().await;
        }
        settle().await;

        assert_eq!(handle.client_count(), 1);

        // Stop the hub so the drain task sees its channel close.
        shutdown.cancel();
        assert_eq!(drain.await.unwrap(), BROADCASTS);

        drop(slow_rx);
    }

    #[tokio::test]
    async fn test_shutdown_closes_clients() {
        let (hub, handle) = SubscriberHub::channel();
        let shutdown = CancellationToken::new();
        let task = tokio::spawn(hub.run(shutdown.clone()));

        let (_id, mut rx) = handle.register().await;
        settle().await;

        shutdown.cancel();
        task.await.unwrap();

        assert!(rx.recv().await.is_none());
        assert_eq!(handle.client_count(), 0);
    }
}
