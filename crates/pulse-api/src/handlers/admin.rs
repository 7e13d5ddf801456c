// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Admin handlers.

use axum::extract::State;
use tracing::info;

use crate::response::Envelope;
use crate::state::AppState;

/// `POST /api/admin/index-posts`
///
/// Triggers the bulk indexer and returns immediately; the pass runs
/// detached and reports through its own summary log.
pub async fn index_posts(State(state): State<AppState>) -> Envelope<()> {
    let indexer = state.indexer.clone();

    info!("bulk post indexing triggered");
    tokio::spawn(async move {
        indexer.index_all().await;
    });

    Envelope::success()
}
