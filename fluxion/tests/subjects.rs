// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;

use fluxion_rx::prelude::*;
use fluxion_test_utils::RecordingObserver;

#[tokio::test]
async fn replay_subject_replays_history_to_every_late_subscriber() {
    let scheduler = Arc::new(TokioScheduler::new());
    let source = Observable::from_iterable(vec![1, 2, 3], scheduler);
    let connectable = source.replay();
    let _upstream = connectable.connect().await;
    tokio::time::sleep(core::time::Duration::from_millis(20)).await;

    let first = Arc::new(RecordingObserver::<i32>::new());
    let second = Arc::new(RecordingObserver::<i32>::new());
    connectable.observable().subscribe(first.clone()).await;
    connectable.observable().subscribe(second.clone()).await;

    assert_eq!(first.items(), vec![1, 2, 3]);
    assert_eq!(second.items(), vec![1, 2, 3]);
}

#[tokio::test]
async fn behavior_subject_seeds_new_subscribers_with_the_latest_value() {
    let subject = BehaviorSubject::new(0);
    subject.on_next(1).await;
    subject.on_next(2).await;

    let recorder = Arc::new(RecordingObserver::<i32>::new());
    subject.as_observable().subscribe(recorder.clone()).await;
    subject.on_complete().await;

    assert_eq!(recorder.items(), vec![2]);
    assert_eq!(recorder.complete_count(), 1);
}

#[tokio::test]
async fn publish_subject_only_delivers_events_emitted_after_subscribing() {
    let subject = PublishSubject::new();
    subject.on_next("dropped").await;

    let recorder = Arc::new(RecordingObserver::<&'static str>::new());
    subject.as_observable().subscribe(recorder.clone()).await;
    subject.on_next("kept").await;
    subject.on_complete().await;

    assert_eq!(recorder.items(), vec!["kept"]);
}
