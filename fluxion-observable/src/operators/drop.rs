// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `drop`, `drop_while`: swallow a prefix of the stream.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, FluxionError};

use crate::operators::guard;
use crate::{Observable, Observer};

struct DropObserver<T> {
    downstream: Arc<dyn Observer<T>>,
    remaining: AtomicUsize,
    _marker: std::marker::PhantomData<fn(T)>,
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for DropObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        loop {
            let left = self.remaining.load(Ordering::Acquire);
            if left == 0 {
                return self.downstream.on_next(item).await;
            }
            if self
                .remaining
                .compare_exchange(left, left - 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Ack::Continue;
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

struct DropWhileObserver<T, F> {
    downstream: Arc<dyn Observer<T>>,
    predicate: F,
    dropping: AtomicBool,
}

#[async_trait]
impl<T, F> Observer<T> for DropWhileObserver<T, F>
where
    T: Send + Sync + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    async fn on_next(&self, item: T) -> Ack {
        if !self.dropping.load(Ordering::Acquire) {
            return self.downstream.on_next(item).await;
        }
        match guard(|| (self.predicate)(&item)) {
            Ok(true) => Ack::Continue,
            Ok(false) => {
                self.dropping.store(false, Ordering::Release);
                self.downstream.on_next(item).await
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

impl<T: Send + Sync + 'static> Observable<T> {
    /// Swallows the first `n` items, forwarding the rest unchanged.
    pub fn drop(&self, n: usize) -> Observable<T> {
        let source = self.clone();
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let source = source.clone();
            async move {
                let forwarding = Arc::new(DropObserver {
                    downstream: observer,
                    remaining: AtomicUsize::new(n),
                    _marker: std::marker::PhantomData,
                });
                source.subscribe(forwarding).await
            }
        })
    }

    /// Swallows items while `predicate` holds, forwarding from the first
    /// failing item onward without testing the predicate again.
    pub fn drop_while<F>(&self, predicate: F) -> Observable<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let source = source.clone();
            let predicate = predicate.clone();
            async move {
                let forwarding = Arc::new(DropWhileObserver {
                    downstream: observer,
                    predicate: move |item: &T| predicate(item),
                    dropping: AtomicBool::new(true),
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
    async fn drop_swallows_a_prefix() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        Observable::from_iterable(vec![1, 2, 3, 4], Arc::new(TokioScheduler::new()))
            .drop(2)
            .subscribe(recorder.clone())
            .await;
        tokio::time::sleep(core::time::Duration::from_millis(20)).await;
        assert_eq!(recorder.items(), vec![3, 4]);
    }

    #[tokio::test]
    async fn drop_while_stops_testing_after_the_first_false() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        Observable::from_iterable(vec![1, 2, 3, 1, 1], Arc::new(TokioScheduler::new()))
            .drop_while(|x| *x < 3)
            .subscribe(recorder.clone())
            .await;
        tokio::time::sleep(core::time::Duration::from_millis(20)).await;
        assert_eq!(recorder.items(), vec![3, 1, 1]);
    }
}
