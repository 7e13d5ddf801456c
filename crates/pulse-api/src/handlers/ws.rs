// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! WebSocket handler: the live subscriber surface.
//!
//! Each connection runs two pumps. The write pump drains the client's hub
//! queue (coalescing backlog into one frame, newline-separated) and pings
//! every 54 seconds; the read pump enforces the 60-second pong window and
//! the 512-byte inbound frame cap. When either pump ends the client is
//! unregistered from the hub.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

use pulse_engine::hub::Frame;

use crate::state::AppState;

/// Time allowed to write one frame to the peer.
const WRITE_WAIT: Duration = Duration::from_secs(10);

/// The peer must pong (or send anything) within this window.
const PONG_WAIT: Duration = Duration::from_secs(60);

/// Ping period; must stay below [`PONG_WAIT`].
const PING_INTERVAL: Duration = Duration::from_secs(54);

/// Maximum inbound frame size in bytes.
const MAX_INBOUND_FRAME_BYTES: usize = 512;

/// `GET /ws`
pub async fn websocket(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.max_message_size(MAX_INBOUND_FRAME_BYTES)
        .on_upgrade(move |socket| client_session(state, socket))
}

/// Runs one client from upgrade to disconnect.
async fn client_session(state: AppState, socket: WebSocket) {
    let (id, outbound) = state.hub.register().await;
    info!(client = %id, "websocket client connected");

    let (sink, stream) = socket.split();
    let writer = tokio::spawn(write_pump(sink, outbound));

    read_pump(stream).await;

    state.hub.unregister(id).await;
    writer.abort();
    info!(client = %id, "websocket client disconnected");
}

/// Pumps hub frames to the socket and keeps the connection alive.
async fn write_pump(mut sink: SplitSink<WebSocket, Message>, mut outbound: mpsc::Receiver<Frame>) {
    let mut ping = tokio::time::interval(PING_INTERVAL);
    ping.tick().await; // the first tick fires immediately

    loop {
        tokio::select! {
            maybe_frame = outbound.recv() => {
                match maybe_frame {
                    Some(frame) => {
                        // Coalesce the queued backlog into one socket
                        // write, newline-separated.
                        let mut payload = frame.to_string();
                        while let Ok(next) = outbound.try_recv() {
                            payload.push('\n');
                            payload.push_str(&next);
                        }

                        let send = sink.send(Message::Text(payload.into()));
                        match tokio::time::timeout(WRITE_WAIT, send).await {
                            Ok(Ok(())) => {}
                            _ => break,
                        }
                    }
                    None => {
                        // The hub dropped this client (evicted or shut
                        // down); say goodbye.
                        let _ = sink.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
            _ = ping.tick() => {
                let send = sink.send(Message::Ping(Default::default()));
                if tokio::time::timeout(WRITE_WAIT, send).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Reads from the socket, enforcing the pong deadline.
async fn read_pump(mut stream: SplitStream<WebSocket>) {
    loop {
        match tokio::time::timeout(PONG_WAIT, stream.next()).await {
            Err(_) => {
                debug!("pong window elapsed, dropping client");
                break;
            }
            Ok(None) | Ok(Some(Err(_))) => break,
            Ok(Some(Ok(message))) => match message {
                Message::Close(_) => break,
                Message::Pong(_) => {}
                Message::Text(text) => {
                    debug!(len = text.len(), "inbound client frame");
                }
                _ => {}
            },
        }
    }
}
