// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Background worker and projection tests: the trending refresher, the
//! bulk indexer, and the dashboard analytics.

use pulse_core::score;
use pulse_core::types::{ContentType, PostId};
use pulse_engine::{DashboardAnalytics, PostIndexer, TrendingRefresher};
use pulse_store::DocumentStore;
use pulse_tests::common::assertions::{assert_close, assert_sorted_by_score_desc};
use pulse_tests::common::builders::{AggregateBuilder, ContentBuilder};
use pulse_tests::common::fixtures::{empty_store, seeded_store};

use std::time::Duration;

// =============================================================================
// Refresher
// =============================================================================

#[tokio::test]
async fn refresher_reconciles_stale_scores() {
    let store = empty_store();

    let content = ContentBuilder::new("p1", "u1", ContentType::Image)
        .counts(500, 20, 0, 0, 0)
        .age_hours(48)
        .build();
    store.put_content(&content).await.unwrap();

    // A stale aggregate whose stored score no longer matches its counts.
    let aggregate = AggregateBuilder::new("p1")
        .score(100.0)
        .counts(500, 20, 0, 0, 0)
        .build();
    store.save_aggregate(&aggregate).await.unwrap();

    let refresher = TrendingRefresher::new(store.clone(), Duration::from_secs(300));
    let report = refresher.run_once().await;
    assert_eq!(report.updated, 1);
    assert_eq!(report.errors, 0);

    let expected = score::trending_score(&aggregate, content.created_at, chrono::Utc::now());
    let stored = store
        .get_post_stats(&PostId::new("p1"))
        .await
        .unwrap()
        .unwrap();
    assert_close(stored.score, expected, expected * 0.01);
}

#[tokio::test]
async fn second_back_to_back_refresh_writes_nothing() {
    let store = seeded_store().await;
    let refresher = TrendingRefresher::new(store.clone(), Duration::from_secs(300));

    let first = refresher.run_once().await;
    assert!(first.updated > 0);

    let second = refresher.run_once().await;
    assert_eq!(second.updated, 0, "nothing changed by ≥1% within one tick");
    assert_eq!(second.errors, 0);
}

#[tokio::test]
async fn refresher_falls_back_to_calculated_at_without_content() {
    let store = empty_store();

    // An aggregate with no content record: age falls back to its own
    // calculation time.
    let aggregate = AggregateBuilder::new("orphan")
        .score(1000.0)
        .counts(10, 1, 0, 0, 0)
        .calculated_at(chrono::Utc::now() - chrono::Duration::hours(2))
        .build();
    store.save_aggregate(&aggregate).await.unwrap();

    let refresher = TrendingRefresher::new(store.clone(), Duration::from_secs(300));
    let report = refresher.run_once().await;
    assert_eq!(report.updated, 1);

    let stored = store
        .get_post_stats(&PostId::new("orphan"))
        .await
        .unwrap()
        .unwrap();
    assert!(stored.score < 1000.0);
}

// =============================================================================
// Indexer
// =============================================================================

#[tokio::test]
async fn indexer_creates_missing_aggregates() {
    let store = empty_store();

    for post in ["p1", "p2"] {
        let content = ContentBuilder::new(post, "u1", ContentType::Video)
            .counts(100, 10, 5, 2, 1)
            .age_hours(3)
            .build();
        store.put_content(&content).await.unwrap();
    }

    let indexer = PostIndexer::new(store.clone());
    let report = indexer.index_all().await;

    assert_eq!(report.indexed, 2);
    assert_eq!(report.updated, 0);
    assert_eq!(report.errors, 0);

    let aggregate = store
        .get_post_stats(&PostId::new("p1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(aggregate.view_count, 100);
    assert_eq!(aggregate.remix_count, 1);
    assert!(aggregate.score > 0.0);
}

#[tokio::test]
async fn indexer_updates_existing_aggregates_from_content_counts() {
    let store = empty_store();

    let content = ContentBuilder::new("p1", "u1", ContentType::Image)
        .counts(999, 50, 0, 0, 0)
        .age_hours(1)
        .build();
    store.put_content(&content).await.unwrap();

    // A stale aggregate lags behind the authoritative content counts.
    let aggregate = AggregateBuilder::new("p1").counts(10, 1, 0, 0, 0).build();
    store.save_aggregate(&aggregate).await.unwrap();

    let indexer = PostIndexer::new(store.clone());
    let report = indexer.index_all().await;

    assert_eq!(report.indexed, 0);
    assert_eq!(report.updated, 1);

    let stored = store
        .get_post_stats(&PostId::new("p1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.view_count, 999);
    assert_eq!(stored.like_count, 50);
}

#[tokio::test]
async fn indexer_pass_is_idempotent() {
    let store = seeded_store().await;
    let indexer = PostIndexer::new(store.clone());

    let first = indexer.index_all().await;
    assert_eq!(first.indexed, 0);
    assert_eq!(first.updated, 4);

    let second = indexer.index_all().await;
    assert_eq!(second.updated, 4);
    assert_eq!(second.errors, 0);
}

// =============================================================================
// Analytics Projections
// =============================================================================

#[tokio::test]
async fn trending_feed_filters_posts_without_content() {
    let store = empty_store();

    // P1 has displayable content; P2 is an aggregate-only orphan.
    let content = ContentBuilder::new("P1", "u1", ContentType::Image)
        .displayable()
        .build();
    store.put_content(&content).await.unwrap();
    store
        .save_aggregate(&AggregateBuilder::new("P1").score(50.0).build())
        .await
        .unwrap();
    store
        .save_aggregate(&AggregateBuilder::new("P2").score(90.0).build())
        .await
        .unwrap();

    let analytics = DashboardAnalytics::new(store.clone());

    let feed = analytics.trending_with_content(10).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].post_id.as_str(), "P1");
    assert!(feed[0].has_content());

    // Both aggregates still count toward the totals.
    let metrics = analytics.dashboard_metrics().await.unwrap();
    assert_eq!(metrics.total_posts, 2);
}

#[tokio::test]
async fn trending_feed_is_sorted_and_limited() {
    let store = seeded_store().await;
    let analytics = DashboardAnalytics::new(store);

    let feed = analytics.trending_with_content(3).await.unwrap();
    assert_eq!(feed.len(), 3);
    assert_sorted_by_score_desc(&feed);
    assert_eq!(feed[0].post_id.as_str(), "p1");
}

#[tokio::test]
async fn trending_by_content_type_filters() {
    let store = seeded_store().await;
    let analytics = DashboardAnalytics::new(store);

    let videos = analytics.trending_by_content_type("video", 10).await.unwrap();
    assert_eq!(videos.len(), 2);
    for post in &videos {
        assert_eq!(post.content_type.as_deref(), Some("video"));
    }
    assert_sorted_by_score_desc(&videos);
}

#[tokio::test]
async fn dashboard_metrics_aggregate_the_store() {
    let store = seeded_store().await;
    let analytics = DashboardAnalytics::new(store);

    let metrics = analytics.dashboard_metrics().await.unwrap();
    assert_eq!(metrics.total_posts, 4);
    assert_eq!(metrics.total_views, 1650);
    assert_eq!(metrics.active_users, 3);
    assert_eq!(metrics.viral_posts, 1); // only p1 has score > 100
    assert_eq!(metrics.top_posts.len(), 3);
    assert_eq!(metrics.top_content_types["video"], 2);
    assert!(metrics.average_score > 0.0);
    assert!(metrics.engagement_rate > 0.0);
}

#[tokio::test]
async fn top_creators_rollup_sorts_by_total_score() {
    let store = seeded_store().await;
    let analytics = DashboardAnalytics::new(store);

    let creators = analytics.top_creators(10).await.unwrap();
    assert_eq!(creators.len(), 3);

    // alice owns p1 + p2 (score 200), bob p3 (50), carol p4 (10).
    assert_eq!(creators[0].user_id, "alice");
    assert_close(creators[0].total_score, 200.0, 1e-9);
    assert_eq!(creators[0].post_count, 2);
    assert_eq!(creators[0].follower_count, 5000);
    assert_eq!(creators[0].viral_post_count, 1);
    assert_eq!(creators[1].user_id, "bob");
    assert_eq!(creators[2].user_id, "carol");
}

#[tokio::test]
async fn content_type_breakdown_skips_private_posts() {
    let store = seeded_store().await;

    let hidden = ContentBuilder::new("hidden", "alice", ContentType::Image)
        .counts(10_000, 100, 0, 0, 0)
        .private()
        .build();
    store.put_content(&hidden).await.unwrap();

    let analytics = DashboardAnalytics::new(store);
    let breakdown = analytics.content_type_breakdown().await.unwrap();

    assert_eq!(breakdown["image"].count, 1); // p1 only
    assert_eq!(breakdown["video"].count, 2);
    assert_eq!(breakdown["music"].count, 1);
    assert_close(breakdown["video"].avg_views, 300.0, 1e-9);
}

#[tokio::test]
async fn engagement_trends_are_chronological_and_bucketed() {
    let store = empty_store();

    // Two posts today, one two days ago.
    for (post, age_hours) in [("a", 0i64), ("b", 1), ("c", 48)] {
        let content = ContentBuilder::new(post, "u1", ContentType::Text)
            .counts(10, 2, 1, 0, 0)
            .age_hours(age_hours)
            .build();
        store.put_content(&content).await.unwrap();
    }

    let analytics = DashboardAnalytics::new(store);
    let trends = analytics.engagement_trends(7).await.unwrap();

    assert_eq!(trends.len(), 7);
    for window in trends.windows(2) {
        assert!(window[0].date < window[1].date, "chronological order");
    }

    let today = trends.last().unwrap();
    assert!(today.post_count >= 1);

    let total_posts: u64 = trends.iter().map(|t| t.post_count).sum();
    assert!(total_posts >= 2, "recent posts land in the window");
}

#[tokio::test]
async fn empty_store_yields_empty_projections() {
    let store = empty_store();
    let analytics = DashboardAnalytics::new(store);

    let metrics = analytics.dashboard_metrics().await.unwrap();
    assert_eq!(metrics.total_posts, 0);
    assert_eq!(metrics.average_score, 0.0);
    assert_eq!(metrics.engagement_rate, 0.0);
    assert!(metrics.top_posts.is_empty());

    assert!(analytics.trending_with_content(10).await.unwrap().is_empty());
    assert!(analytics.top_creators(10).await.unwrap().is_empty());
    assert!(analytics.content_type_breakdown().await.unwrap().is_empty());
}
