// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! [`SafeObserver`]: enforces the observer grammar over an arbitrary inner
//! observer.

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, FluxionError};

use crate::Observer;

/// Wraps an observer so that, regardless of what the caller does, at most
/// one terminal event reaches it and no event is delivered after one.
///
/// Every operator's output observer should be wrapped in a `SafeObserver`
/// (directly or transitively) before being handed a subscription — the
/// combinators in this crate all do this internally.
pub struct SafeObserver<T> {
    inner: Arc<dyn Observer<T>>,
    done: AtomicBool,
}

impl<T> SafeObserver<T> {
    /// Wraps `inner`.
    pub fn new(inner: Arc<dyn Observer<T>>) -> Self {
        Self {
            inner,
            done: AtomicBool::new(false),
        }
    }

    /// `true` once a terminal event has been delivered (or suppressed).
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    /// Transitions from live to done; returns `true` only for the caller
    /// that performed the transition.
    fn mark_done(&self) -> bool {
        !self.done.swap(true, Ordering::AcqRel)
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for SafeObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        if self.is_done() {
            return Ack::Done;
        }
        self.inner.on_next(item).await
    }

    async fn on_complete(&self) {
        if self.mark_done() {
            self.inner.on_complete().await;
        }
    }

    async fn on_error(&self, error: FluxionError) {
        if self.mark_done() {
            self.inner.on_error(error).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingObserver;

    #[tokio::test]
    async fn suppresses_events_after_complete() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        let safe = SafeObserver::new(recorder.clone());

        safe.on_complete().await;
        safe.on_complete().await;
        assert_eq!(safe.on_next(1).await, Ack::Done);
        safe.on_error(FluxionError::stream_error("late")).await;

        assert_eq!(recorder.complete_count(), 1);
        assert_eq!(recorder.items(), Vec::<i32>::new());
        assert_eq!(recorder.error_count(), 0);
    }

    #[tokio::test]
    async fn forwards_events_while_live() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        let safe = SafeObserver::new(recorder.clone());

        assert_eq!(safe.on_next(1).await, Ack::Continue);
        assert_eq!(safe.on_next(2).await, Ack::Continue);
        safe.on_complete().await;

        assert_eq!(recorder.items(), vec![1, 2]);
        assert_eq!(recorder.complete_count(), 1);
    }

    #[tokio::test]
    async fn only_first_terminal_event_wins() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        let safe = SafeObserver::new(recorder.clone());

        safe.on_error(FluxionError::stream_error("boom")).await;
        safe.on_complete().await;

        assert_eq!(recorder.error_count(), 1);
        assert_eq!(recorder.complete_count(), 0);
    }
}
