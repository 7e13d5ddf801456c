// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Seeded store fixtures.

use std::sync::Arc;

use pulse_core::types::ContentType;
use pulse_store::{DocumentStore, MemoryStore};

use super::builders::{user_profile, AggregateBuilder, ContentBuilder};

/// An empty in-memory store.
pub fn empty_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// A store seeded with three creators and four displayable posts.
///
/// Layout:
///
/// | post | creator | type  | score | views |
/// |------|---------|-------|-------|-------|
/// | p1   | alice   | image | 120.0 | 1000  |
/// | p2   | alice   | video |  80.0 |  400  |
/// | p3   | bob     | video |  50.0 |  200  |
/// | p4   | carol   | music |  10.0 |   50  |
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());

    let posts = [
        ("p1", "alice", ContentType::Image, 120.0, 1000u64, 80u64),
        ("p2", "alice", ContentType::Video, 80.0, 400, 30),
        ("p3", "bob", ContentType::Video, 50.0, 200, 20),
        ("p4", "carol", ContentType::Music, 10.0, 50, 5),
    ];

    for (post, user, content_type, score, views, likes) in posts {
        let content = ContentBuilder::new(post, user, content_type)
            .displayable()
            .counts(views, likes, likes / 2, likes / 4, 0)
            .age_hours(12)
            .build();
        store.put_content(&content).await.unwrap();

        let aggregate = AggregateBuilder::new(post)
            .score(score)
            .counts(views, likes, likes / 2, likes / 4, 0)
            .build();
        store.save_aggregate(&aggregate).await.unwrap();
    }

    for (user, followers) in [("alice", 5000u64), ("bob", 900), ("carol", 120)] {
        store.put_user(&user_profile(user, followers)).await.unwrap();
    }

    store
}
