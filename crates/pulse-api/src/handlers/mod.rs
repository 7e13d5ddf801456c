// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request handlers.

mod admin;
mod analytics;
mod events;
mod health;
mod ws;

pub use admin::index_posts;
pub use analytics::{
    content_types, dashboard_metrics, engagement_trends, post_stats, top_creators, trending,
    user_recommendations,
};
pub use events::{ingest_content, ingest_interaction, ingest_remix, ingest_view};
pub use health::health;
pub use ws::websocket;
