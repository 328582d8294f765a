// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The three subject kinds, each [`SubjectCore`] instantiated with the cache
//! strategy that gives it its name.

use std::sync::Arc;

use crate::cache::{BehaviorCache, PublishCache, ReplayCache};
use crate::subject_core::SubjectCore;

/// Broadcasts live events only; a late subscriber sees nothing emitted
/// before it joined.
pub type PublishSubject<T> = SubjectCore<T, PublishCache>;

/// Caches the most recently emitted item (or an initial value); a new
/// subscriber sees that one cached item immediately, then live events.
pub type BehaviorSubject<T> = SubjectCore<T, BehaviorCache<T>>;

/// Caches every item ever emitted; a new subscriber sees the full history,
/// then live events.
pub type ReplaySubject<T> = SubjectCore<T, ReplayCache<T>>;

impl<T: Clone + Send + Sync + 'static> PublishSubject<T> {
    /// Creates an empty publish subject with no subscribers.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(SubjectCore::new(PublishCache))
    }
}

impl<T: Clone + Send + Sync + 'static> BehaviorSubject<T> {
    /// Creates a behavior subject seeded with `initial`.
    #[must_use]
    pub fn new(initial: T) -> Arc<Self> {
        Arc::new(SubjectCore::new(BehaviorCache::new(initial)))
    }
}

impl<T: Clone + Send + Sync + 'static> ReplaySubject<T> {
    /// Creates an empty replay subject with no history.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(SubjectCore::new(ReplayCache::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxion_test_utils::RecordingObserver;

    #[tokio::test]
    async fn behavior_subject_new_seeds_the_initial_value() {
        let subject = BehaviorSubject::new(42);
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        subject.as_observable().subscribe(recorder.clone()).await;
        assert_eq!(recorder.items(), vec![42]);
    }
}
