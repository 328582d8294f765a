// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! In-crate test double. Kept separate from `fluxion-test-utils` (which
//! exposes the same shape for downstream crates) to avoid a dev-dependency
//! cycle, since `fluxion-test-utils` itself will eventually want to depend
//! on `fluxion-observable`'s public types for richer fixtures.

#![cfg(test)]

use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, FluxionError};
use parking_lot::Mutex;

use crate::Observer;

/// Records every call it receives, in order, for assertions in tests.
pub struct RecordingObserver<T> {
    items: Mutex<Vec<T>>,
    complete_count: Mutex<usize>,
    errors: Mutex<Vec<FluxionError>>,
}

impl<T> RecordingObserver<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            complete_count: Mutex::new(0),
            errors: Mutex::new(Vec::new()),
        }
    }

    pub fn complete_count(&self) -> usize {
        *self.complete_count.lock()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().len()
    }
}

impl<T: Clone> RecordingObserver<T> {
    pub fn items(&self) -> Vec<T> {
        self.items.lock().clone()
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

/// Like [`RecordingObserver`], but every `on_next` resolves to `Ack::Done`
/// after `limit` items have been recorded — used to test that operators
/// respect a downstream that wants to stop early.
pub struct StoppingObserver<T> {
    inner: RecordingObserver<T>,
    limit: usize,
}

impl<T> StoppingObserver<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            inner: RecordingObserver::new(),
            limit,
        }
    }

    pub fn items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.inner.items()
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for StoppingObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        let ack = self.inner.on_next(item).await;
        if self.inner.items.lock().len() >= self.limit {
            return Ack::Done;
        }
        ack
    }

    async fn on_complete(&self) {
        self.inner.on_complete().await;
    }

    async fn on_error(&self, error: FluxionError) {
        self.inner.on_error(error).await;
    }
}

pub fn arc<T>(observer: impl Observer<T> + 'static) -> Arc<dyn Observer<T>> {
    Arc::new(observer)
}
