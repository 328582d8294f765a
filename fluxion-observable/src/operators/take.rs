// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `take`, `take_right`, `take_while`: bound the items an observable emits.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, FluxionError};
use parking_lot::Mutex;

use crate::operators::guard;
use crate::{Observable, Observer};

struct TakeObserver<T> {
    downstream: Arc<dyn Observer<T>>,
    remaining: AtomicUsize,
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for TakeObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        if self.remaining.load(Ordering::Acquire) == 0 {
            return Ack::Done;
        }
        let ack = self.downstream.on_next(item).await;
        let left = self.remaining.fetch_sub(1, Ordering::AcqRel) - 1;
        if left == 0 {
            self.downstream.on_complete().await;
            return Ack::Done;
        }
        ack
    }

    async fn on_complete(&self) {
        self.downstream.on_complete().await;
    }

    async fn on_error(&self, error: FluxionError) {
        self.downstream.on_error(error).await;
    }
}

struct TakeRightObserver<T> {
    downstream: Arc<dyn Observer<T>>,
    limit: usize,
    ring: Mutex<VecDeque<T>>,
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for TakeRightObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        let mut ring = self.ring.lock();
        if ring.len() == self.limit {
            ring.pop_front();
        }
        ring.push_back(item);
        Ack::Continue
    }

    async fn on_complete(&self) {
        let buffered = core::mem::take(&mut *self.ring.lock());
        for item in buffered {
            if self.downstream.on_next(item).await.is_done() {
                return;
            }
        }
        self.downstream.on_complete().await;
    }

    async fn on_error(&self, error: FluxionError) {
        self.downstream.on_error(error).await;
    }
}

struct TakeWhileObserver<T, F> {
    downstream: Arc<dyn Observer<T>>,
    predicate: F,
    stopped: AtomicBool,
}

#[async_trait]
impl<T, F> Observer<T> for TakeWhileObserver<T, F>
where
    T: Send + Sync + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    async fn on_next(&self, item: T) -> Ack {
        if self.stopped.load(Ordering::Acquire) {
            return Ack::Done;
        }
        match guard(|| (self.predicate)(&item)) {
            Ok(true) => self.downstream.on_next(item).await,
            Ok(false) => {
                self.stopped.store(true, Ordering::Release);
                self.downstream.on_complete().await;
                Ack::Done
            }
            Err(error) => {
                self.stopped.store(true, Ordering::Release);
                self.downstream.on_error(error).await;
                Ack::Done
            }
        }
    }

    async fn on_complete(&self) {
        self.downstream.on_complete().await;
    }

    async fn on_error(&self, error: FluxionError) {
        self.downstream.on_error(error).await;
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    /// Forwards the first `n` items, then completes downstream and stops
    /// upstream production.
    pub fn take(&self, n: usize) -> Observable<T> {
        let source = self.clone();
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let source = source.clone();
            async move {
                if n == 0 {
                    observer.on_complete().await;
                    return Box::new(fluxion_core::NoopCancelable) as fluxion_core::BoxCancelable;
                }
                let forwarding = Arc::new(TakeObserver {
                    downstream: observer,
                    remaining: AtomicUsize::new(n),
                });
                source.subscribe(forwarding).await
            }
        })
    }

    /// Buffers the last `n` items in a ring; on upstream completion, emits
    /// them in order, then completes.
    pub fn take_right(&self, n: usize) -> Observable<T> {
        let source = self.clone();
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let source = source.clone();
            async move {
                let forwarding = Arc::new(TakeRightObserver {
                    downstream: observer,
                    limit: n,
                    ring: Mutex::new(VecDeque::with_capacity(n)),
                });
                source.subscribe(forwarding).await
            }
        })
    }

    /// Forwards items while `predicate` holds; on the first item where it
    /// doesn't, completes downstream and stops upstream production.
    pub fn take_while<F>(&self, predicate: F) -> Observable<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let source = source.clone();
            let predicate = predicate.clone();
            async move {
                let forwarding = Arc::new(TakeWhileObserver {
                    downstream: observer,
                    predicate: move |item: &T| predicate(item),
                    stopped: AtomicBool::new(false),
                });
                source.subscribe(forwarding).await
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::RecordingObserver;
    use crate::Observable;
    use std::sync::Arc;
    use fluxion_runtime::TokioScheduler;

    #[tokio::test]
    async fn take_stops_after_n_items() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        Observable::from_iterable(vec![1, 2, 3, 4, 5], Arc::new(TokioScheduler::new()))
            .take(3)
            .subscribe(recorder.clone())
            .await;
        tokio::time::sleep(core::time::Duration::from_millis(20)).await;
        assert_eq!(recorder.items(), vec![1, 2, 3]);
        assert_eq!(recorder.complete_count(), 1);
    }

    #[tokio::test]
    async fn take_right_emits_only_the_trailing_items_in_order() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        Observable::from_iterable(vec![1, 2, 3, 4, 5], Arc::new(TokioScheduler::new()))
            .take_right(2)
            .subscribe(recorder.clone())
            .await;
        tokio::time::sleep(core::time::Duration::from_millis(20)).await;
        assert_eq!(recorder.items(), vec![4, 5]);
        assert_eq!(recorder.complete_count(), 1);
    }

    #[tokio::test]
    async fn take_while_stops_at_the_first_failing_item() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        Observable::from_iterable(vec![1, 2, 3, 1, 1], Arc::new(TokioScheduler::new()))
            .take_while(|x| *x < 3)
            .subscribe(recorder.clone())
            .await;
        tokio::time::sleep(core::time::Duration::from_millis(20)).await;
        assert_eq!(recorder.items(), vec![1, 2]);
        assert_eq!(recorder.complete_count(), 1);
    }
}
