// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! [`RecordingObserver`] and [`StoppingObserver`]: the `Observer` test
//! doubles used throughout this workspace's own test suites, promoted here
//! so integration tests across crates share one implementation.

use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, FluxionError};
use fluxion_observable::Observer;
use parking_lot::Mutex;

/// Records every item, terminal call, and error it receives, always
/// acknowledging `Ack::Continue`.
pub struct RecordingObserver<T> {
    items: Mutex<Vec<T>>,
    complete_count: Mutex<usize>,
    errors: Mutex<Vec<FluxionError>>,
}

impl<T> RecordingObserver<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            complete_count: Mutex::new(0),
            errors: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn complete_count(&self) -> usize {
        *self.complete_count.lock()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.lock().len()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<FluxionError> {
        self.errors.lock().clone()
    }
}

impl<T: Clone> RecordingObserver<T> {
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.items.lock().clone()
    }
}

impl<T> Default for RecordingObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for RecordingObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        self.items.lock().push(item);
        Ack::Continue
    }

    async fn on_complete(&self) {
        *self.complete_count.lock() += 1;
    }

    async fn on_error(&self, error: FluxionError) {
        self.errors.lock().push(error);
    }
}

/// Like [`RecordingObserver`], but acknowledges `Ack::Done` once `limit`
/// items have been recorded — useful for exercising early-unsubscribe
/// behavior in sources and operators.
pub struct StoppingObserver<T> {
    inner: RecordingObserver<T>,
    limit: usize,
}

impl<T> StoppingObserver<T> {
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            inner: RecordingObserver::new(),
            limit,
        }
    }

    #[must_use]
    pub fn items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.items()
    }

    #[must_use]
    pub fn complete_count(&self) -> usize {
        self.inner.complete_count()
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for StoppingObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        self.inner.on_next(item).await;
        if self.inner.items.lock().len() >= self.limit {
            Ack::Done
        } else {
            Ack::Continue
        }
    }

    async fn on_complete(&self) {
        self.inner.on_complete().await;
    }

    async fn on_error(&self, error: FluxionError) {
        self.inner.on_error(error).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxion_observable::Observable;
    use fluxion_runtime::TokioScheduler;

    #[tokio::test]
    async fn records_items_in_order_and_completes() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        let source = Observable::from_iterable(vec![1, 2, 3], Arc::new(TokioScheduler::new()));
        source.subscribe(recorder.clone()).await;

        assert_eq!(recorder.items(), vec![1, 2, 3]);
        assert_eq!(recorder.complete_count(), 1);
        assert_eq!(recorder.error_count(), 0);
    }

    #[tokio::test]
    async fn stopping_observer_acknowledges_done_at_the_limit() {
        let stopping = Arc::new(StoppingObserver::<i32>::new(2));
        let source = Observable::from_iterable(vec![1, 2, 3, 4], Arc::new(TokioScheduler::new()));
        source.subscribe(stopping.clone()).await;

        assert_eq!(stopping.items(), vec![1, 2]);
    }
}
