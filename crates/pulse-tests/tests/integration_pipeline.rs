// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! End-to-end pipeline tests: ingestion through the processor into the
//! store, and the consume-side analytics handlers.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio_util::sync::CancellationToken;

use pulse_core::error::PulseError;
use pulse_core::event::StreamRecord;
use pulse_core::types::{ContentType, InteractionKind, PostId};
use pulse_engine::{ContentEnricher, EventProcessor, SubscriberHub};
use pulse_store::DocumentStore;
use pulse_tests::common::builders::{
    content_created, interaction, remix, view, AggregateBuilder, ContentBuilder,
};
use pulse_tests::common::fixtures::empty_store;
use pulse_tests::common::mocks::MemoryPublisher;

fn processor(
    publisher: Arc<MemoryPublisher>,
    store: Arc<dyn DocumentStore>,
) -> EventProcessor {
    EventProcessor::new(publisher, store, Arc::new(ContentEnricher::new()))
}

#[tokio::test]
async fn ingested_interaction_reaches_the_bus() {
    let publisher = Arc::new(MemoryPublisher::new());
    let store = empty_store();
    let processor = processor(publisher.clone(), store);

    processor
        .process_interaction(interaction("p1", "u1", InteractionKind::Like))
        .await
        .unwrap();

    let records = publisher.records();
    assert_eq!(records.len(), 1);
    match &records[0] {
        StreamRecord::Interaction(event) => {
            assert_eq!(event.post_id.as_str(), "p1");
            assert!(event.timestamp.is_some());
        }
        other => panic!("unexpected record: {other:?}"),
    }
}

#[tokio::test]
async fn publish_failure_fails_the_ingest_call() {
    let publisher = Arc::new(MemoryPublisher::new());
    publisher.fail_all(true);
    let processor = processor(publisher.clone(), empty_store());

    let result = processor
        .process_interaction(interaction("p1", "u1", InteractionKind::Share))
        .await;

    assert!(matches!(result, Err(PulseError::Bus(_))));
    assert!(publisher.is_empty());
}

#[tokio::test]
async fn missing_timestamp_is_stamped_on_ingest() {
    let publisher = Arc::new(MemoryPublisher::new());
    let processor = processor(publisher.clone(), empty_store());

    let mut event = view("p1", "u1");
    event.viewed_at = None;
    processor.process_view(event).await.unwrap();

    match &publisher.records()[0] {
        StreamRecord::View(event) => assert!(event.viewed_at.is_some()),
        other => panic!("unexpected record: {other:?}"),
    }
}

#[tokio::test]
async fn self_referencing_remix_is_rejected_before_publish() {
    let publisher = Arc::new(MemoryPublisher::new());
    let processor = processor(publisher.clone(), empty_store());

    let result = processor.process_remix(remix("a", "a", "u1")).await;

    assert!(matches!(result, Err(PulseError::InvalidInput { .. })));
    assert!(publisher.is_empty());
}

#[tokio::test]
async fn content_ingest_enriches_and_updates_the_record() {
    let publisher = Arc::new(MemoryPublisher::new());
    let store = empty_store();
    let content = ContentBuilder::new("p1", "u1", ContentType::Image).build();
    store.put_content(&content).await.unwrap();

    let processor = processor(publisher.clone(), store.clone());

    let enriched = processor
        .process_content(content_created("p1", "u1", "misty forest at dawn"))
        .await
        .unwrap();

    assert!(enriched.keywords.contains(&"image".to_string()));
    assert!(enriched.keywords.contains(&"misty".to_string()));
    assert_eq!(enriched.category.as_deref(), Some("image"));
    assert_eq!(enriched.style.as_deref(), Some("general"));

    // The content record picked up the derived fields.
    let stored = store.get_content(&PostId::new("p1")).await.unwrap().unwrap();
    assert_eq!(stored.keywords, enriched.keywords);
    assert_eq!(stored.category.as_deref(), Some("image"));

    // And the event went to the bus with the enrichment applied.
    match &publisher.records()[0] {
        StreamRecord::Content(event) => assert!(!event.keywords.is_empty()),
        other => panic!("unexpected record: {other:?}"),
    }
}

#[tokio::test]
async fn n_view_events_produce_view_count_n() {
    let publisher = Arc::new(MemoryPublisher::new());
    let store = empty_store();
    let content = ContentBuilder::new("p1", "u1", ContentType::Video).build();
    store.put_content(&content).await.unwrap();

    let processor = processor(publisher, store.clone());

    const N: u64 = 25;
    for i in 0..N {
        let event = view("p1", &format!("viewer-{i}"));
        processor.view_for_analytics(&event).await;
    }

    let aggregate = store
        .get_post_stats(&PostId::new("p1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(aggregate.view_count, N);

    let content = store.get_content(&PostId::new("p1")).await.unwrap().unwrap();
    assert_eq!(content.view_count, N);
}

#[tokio::test]
async fn viral_burst_accumulates_and_raises_an_alert() {
    // Scenario: 50 views, 30 likes, 15 comments, 10 shares land on a
    // fresh post within its first minute.
    let publisher = Arc::new(MemoryPublisher::new());
    let store = empty_store();
    let content = ContentBuilder::new("post_viral_001", "creator", ContentType::Video)
        .displayable()
        .build();
    store.put_content(&content).await.unwrap();

    let (hub, handle) = SubscriberHub::channel();
    let shutdown = CancellationToken::new();
    tokio::spawn(hub.run(shutdown.clone()));

    let processor = EventProcessor::new(
        publisher,
        store.clone(),
        Arc::new(ContentEnricher::new()),
    )
    .with_hub(handle.clone());

    let (_client, mut frames) = handle.register().await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    for i in 0..50 {
        processor
            .view_for_analytics(&view("post_viral_001", &format!("v{i}")))
            .await;
    }
    for i in 0..30 {
        processor
            .interaction_for_analytics(&interaction(
                "post_viral_001",
                &format!("l{i}"),
                InteractionKind::Like,
            ))
            .await;
    }
    for i in 0..15 {
        processor
            .interaction_for_analytics(&interaction(
                "post_viral_001",
                &format!("c{i}"),
                InteractionKind::Comment,
            ))
            .await;
    }
    for i in 0..10 {
        processor
            .interaction_for_analytics(&interaction(
                "post_viral_001",
                &format!("s{i}"),
                InteractionKind::Share,
            ))
            .await;
    }

    let aggregate = store
        .get_post_stats(&PostId::new("post_viral_001"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(aggregate.view_count, 50);
    assert_eq!(aggregate.like_count, 30);
    assert_eq!(aggregate.comment_count, 15);
    assert_eq!(aggregate.share_count, 10);
    assert_eq!(aggregate.total_engagement(), 55);

    // The stream processor's aggregate arrives one minute in, carrying a
    // velocity of 550 engagements/hour (55 within the clamped 0.1 h).
    let streamed = AggregateBuilder::new("post_viral_001")
        .score(aggregate.score)
        .counts(50, 30, 15, 10, 0)
        .velocity(550.0)
        .calculated_at(Utc::now() - Duration::minutes(1))
        .build();

    processor.trending_score(streamed).await;

    let stored = store
        .get_post_stats(&PostId::new("post_viral_001"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.viral_probability, 1.0);

    // The hub saw a trending update and then the viral alert.
    let mut saw_alert = false;
    while let Ok(frame) = frames.try_recv() {
        if frame.contains("\"viral_alert\"") {
            saw_alert = true;
            assert!(frame.contains("post_viral_001"));
        }
    }
    assert!(saw_alert, "expected a viral_alert frame");
}

#[tokio::test]
async fn remix_chain_counts_follow_the_graph() {
    // remix(A→B), remix(A→C), remix(B→D)
    let publisher = Arc::new(MemoryPublisher::new());
    let store = empty_store();
    let processor = processor(publisher, store.clone());

    processor.remix_for_analytics(&remix("A", "B", "u1")).await;
    processor.remix_for_analytics(&remix("A", "C", "u2")).await;
    processor.remix_for_analytics(&remix("B", "D", "u3")).await;

    assert_eq!(store.get_remix_count(&PostId::new("A")).await.unwrap(), 2);
    assert_eq!(store.get_remix_count(&PostId::new("B")).await.unwrap(), 1);
    assert_eq!(store.get_remix_count(&PostId::new("C")).await.unwrap(), 0);
    assert_eq!(store.get_remix_count(&PostId::new("D")).await.unwrap(), 0);

    // Replaying an edge does not double-count (at-least-once delivery).
    processor.remix_for_analytics(&remix("A", "B", "u1")).await;
    assert_eq!(store.get_remix_count(&PostId::new("A")).await.unwrap(), 2);

    // The origin's aggregate took the remix bumps.
    let aggregate = store
        .get_post_stats(&PostId::new("A"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(aggregate.remix_count, 3);
}

#[tokio::test]
async fn interaction_analytics_requires_the_post_but_trending_does_not() {
    let publisher = Arc::new(MemoryPublisher::new());
    let store = empty_store();
    let processor = processor(publisher, store.clone());

    // No content record exists: the post-analytics update fails quietly
    // and the trending bump is skipped with it.
    processor
        .interaction_for_analytics(&interaction("ghost", "u1", InteractionKind::Like))
        .await;
    assert!(store
        .get_post_stats(&PostId::new("ghost"))
        .await
        .unwrap()
        .is_none());

    // Views bootstrap the aggregate even without content (indexing race).
    processor.view_for_analytics(&view("ghost", "u1")).await;
    let aggregate = store
        .get_post_stats(&PostId::new("ghost"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(aggregate.view_count, 1);
}

#[tokio::test]
async fn recommendation_records_are_persisted() {
    let publisher = Arc::new(MemoryPublisher::new());
    let store = empty_store();
    let processor = processor(publisher, store.clone());

    let rec = pulse_tests::common::builders::recommendation("u1", "p1", 0.9);
    processor.recommendation(&rec).await;

    let recs = store
        .get_user_recommendations(&pulse_core::types::UserId::new("u1"), 10)
        .await
        .unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].post_id.as_str(), "p1");
}
