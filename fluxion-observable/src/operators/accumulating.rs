// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `scan`, `fold_left`, `reduce`: accumulate across the stream.

use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, FluxionError};
use parking_lot::Mutex;

use crate::operators::guard;
use crate::{Observable, Observer};

struct ScanObserver<T, A, F> {
    downstream: Arc<dyn Observer<A>>,
    op: F,
    acc: Mutex<A>,
    _marker: std::marker::PhantomData<fn(T)>,
}

#[async_trait]
impl<T, A, F> Observer<T> for ScanObserver<T, A, F>
where
    T: Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
    F: Fn(A, T) -> A + Send + Sync + 'static,
{
    async fn on_next(&self, item: T) -> Ack {
        let previous = self.acc.lock().clone();
        match guard(|| (self.op)(previous, item)) {
            Ok(next) => {
                *self.acc.lock() = next.clone();
                self.downstream.on_next(next).await
            }
            Err(error) => {
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

struct FoldLeftObserver<T, A, F> {
    downstream: Arc<dyn Observer<A>>,
    op: F,
    acc: Mutex<A>,
    _marker: std::marker::PhantomData<fn(T)>,
}

#[async_trait]
impl<T, A, F> Observer<T> for FoldLeftObserver<T, A, F>
where
    T: Send + Sync + 'static,
    A: Clone + Send + Sync + 'static,
    F: Fn(A, T) -> A + Send + Sync + 'static,
{
    async fn on_next(&self, item: T) -> Ack {
        let previous = self.acc.lock().clone();
        match guard(|| (self.op)(previous, item)) {
            Ok(next) => {
                *self.acc.lock() = next;
                Ack::Continue
            }
            Err(error) => {
                self.downstream.on_error(error).await;
                Ack::Done
            }
        }
    }

    async fn on_complete(&self) {
        let result = self.acc.lock().clone();
        if self.downstream.on_next(result).await == Ack::Continue {
            self.downstream.on_complete().await;
        }
    }

    async fn on_error(&self, error: FluxionError) {
        self.downstream.on_error(error).await;
    }
}

struct ReduceObserver<T, F> {
    downstream: Arc<dyn Observer<T>>,
    op: F,
    acc: Mutex<Option<T>>,
}

#[async_trait]
impl<T, F> Observer<T> for ReduceObserver<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(T, T) -> T + Send + Sync + 'static,
{
    async fn on_next(&self, item: T) -> Ack {
        let previous = self.acc.lock().take();
        match previous {
            None => {
                *self.acc.lock() = Some(item);
                Ack::Continue
            }
            Some(acc) => match guard(|| (self.op)(acc, item)) {
                Ok(next) => {
                    *self.acc.lock() = Some(next);
                    Ack::Continue
                }
                Err(error) => {
                    self.downstream.on_error(error).await;
                    Ack::Done
                }
            },
        }
    }

    async fn on_complete(&self) {
        if let Some(result) = self.acc.lock().take() {
            if self.downstream.on_next(result).await == Ack::Continue {
                self.downstream.on_complete().await;
            }
        } else {
            self.downstream.on_complete().await;
        }
    }

    async fn on_error(&self, error: FluxionError) {
        self.downstream.on_error(error).await;
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    /// Emits the running accumulator `op(acc, item)` per input, seeded by `z`.
    pub fn scan<A, F>(&self, z: A, op: F) -> Observable<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(A, T) -> A + Send + Sync + 'static,
    {
        let source = self.clone();
        let op = Arc::new(op);
        Observable::create(move |observer: Arc<dyn Observer<A>>| {
            let source = source.clone();
            let op = op.clone();
            let z = z.clone();
            async move {
                let forwarding = Arc::new(ScanObserver {
                    downstream: observer,
                    op: move |a: A, t: T| op(a, t),
                    acc: Mutex::new(z),
                    _marker: std::marker::PhantomData,
                });
                source.subscribe(forwarding).await
            }
        })
    }

    /// Accumulates silently, emitting a single value at completion.
    pub fn fold_left<A, F>(&self, z: A, op: F) -> Observable<A>
    where
        A: Clone + Send + Sync + 'static,
        F: Fn(A, T) -> A + Send + Sync + 'static,
    {
        let source = self.clone();
        let op = Arc::new(op);
        Observable::create(move |observer: Arc<dyn Observer<A>>| {
            let source = source.clone();
            let op = op.clone();
            let z = z.clone();
            async move {
                let forwarding = Arc::new(FoldLeftObserver {
                    downstream: observer,
                    op: move |a: A, t: T| op(a, t),
                    acc: Mutex::new(z),
                    _marker: std::marker::PhantomData,
                });
                source.subscribe(forwarding).await
            }
        })
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    /// Like [`Observable::fold_left`] but seeded by the first element; emits
    /// nothing if upstream is empty.
    pub fn reduce<F>(&self, op: F) -> Observable<T>
    where
        F: Fn(T, T) -> T + Send + Sync + 'static,
    {
        let source = self.clone();
        let op = Arc::new(op);
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let source = source.clone();
            let op = op.clone();
            async move {
                let forwarding = Arc::new(ReduceObserver {
                    downstream: observer,
                    op: move |a: T, b: T| op(a, b),
                    acc: Mutex::new(None),
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
    use fluxion_runtime::TokioScheduler;
    use std::sync::Arc;

    #[tokio::test]
    async fn scan_emits_the_running_total() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        Observable::from_iterable(vec![1, 2, 3], Arc::new(TokioScheduler::new()))
            .scan(0, |acc, x| acc + x)
            .subscribe(recorder.clone())
            .await;
        tokio::time::sleep(core::time::Duration::from_millis(20)).await;
        assert_eq!(recorder.items(), vec![1, 3, 6]);
    }

    #[tokio::test]
    async fn fold_left_emits_only_the_final_total() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        Observable::from_iterable(vec![1, 2, 3], Arc::new(TokioScheduler::new()))
            .fold_left(0, |acc, x| acc + x)
            .subscribe(recorder.clone())
            .await;
        tokio::time::sleep(core::time::Duration::from_millis(20)).await;
        assert_eq!(recorder.items(), vec![6]);
        assert_eq!(recorder.complete_count(), 1);
    }

    #[tokio::test]
    async fn reduce_emits_nothing_on_an_empty_source() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        Observable::<i32>::empty()
            .reduce(|a, b| a + b)
            .subscribe(recorder.clone())
            .await;
        assert!(recorder.items().is_empty());
        assert_eq!(recorder.complete_count(), 1);
    }
}
