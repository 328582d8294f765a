// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! [`Observable`]: a deferred, cold computation that starts a fresh
//! production for every `subscribe` call.

use core::future::Future;
use core::time::Duration;
use std::sync::Arc;

use fluxion_core::{Ack, BoxCancelable, BoxFuture, FluxionError, NoopCancelable};
use fluxion_runtime::{ScheduleExt, Scheduler};

use crate::{Observer, SafeObserver};

type SubscribeFn<T> = dyn Fn(Arc<dyn Observer<T>>) -> BoxFuture<'static, BoxCancelable> + Send + Sync;

/// A deferred computation that, given an observer, starts a stream.
///
/// Observables are cold: cloning one and subscribing twice starts two
/// independent productions. Each combinator in this crate returns a new
/// `Observable` that installs a forwarding observer upstream when
/// subscribed; nothing runs before `subscribe` is called.
pub struct Observable<T> {
    subscribe_fn: Arc<SubscribeFn<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe_fn: self.subscribe_fn.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    /// Builds an observable from a raw subscription function.
    ///
    /// If `f` itself panics before returning its future, the caller sees no
    /// observer callback at all — combinators built on top of `create`
    /// should catch construction failures and route them to `on_error`
    /// instead, per the subscribeFn failure mode.
    pub fn create<F, Fut>(f: F) -> Self
    where
        F: Fn(Arc<dyn Observer<T>>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = BoxCancelable> + Send + 'static,
    {
        Self {
            subscribe_fn: Arc::new(move |observer| Box::pin(f(observer))),
        }
    }

    /// Subscribes `observer`, wrapping it in a [`SafeObserver`] so the
    /// grammar holds even if something upstream misbehaves.
    pub async fn subscribe(&self, observer: Arc<dyn Observer<T>>) -> BoxCancelable {
        let safe: Arc<dyn Observer<T>> = Arc::new(SafeObserver::new(observer));
        (self.subscribe_fn)(safe).await
    }

    /// An observable that completes immediately without emitting anything.
    #[must_use]
    pub fn empty() -> Self {
        Self::create(|observer| async move {
            observer.on_complete().await;
            Box::new(NoopCancelable) as BoxCancelable
        })
    }

    /// An observable that emits `error` immediately and terminates.
    #[must_use]
    pub fn error(error: FluxionError) -> Self {
        Self::create(move |observer| {
            let error = error.clone();
            async move {
                observer.on_error(error).await;
                Box::new(NoopCancelable) as BoxCancelable
            }
        })
    }

    /// An observable that never emits anything and never completes.
    #[must_use]
    pub fn never() -> Self {
        Self::create(|_observer| async move { Box::new(NoopCancelable) as BoxCancelable })
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    /// An observable that emits a single value, then completes.
    #[must_use]
    pub fn unit(value: T) -> Self {
        Self::create(move |observer| {
            let value = value.clone();
            async move {
                if observer.on_next(value).await == Ack::Continue {
                    observer.on_complete().await;
                }
                Box::new(NoopCancelable) as BoxCancelable
            }
        })
    }

    /// An observable that emits `value` over and over, as fast as the
    /// downstream keeps returning `Ack::Continue`, with no upper bound.
    ///
    /// Production is spawned on `scheduler` so `subscribe` returns promptly;
    /// the returned cancelable aborts it.
    #[must_use]
    pub fn continuous(value: T, scheduler: Arc<dyn Scheduler>) -> Self {
        Self::create(move |observer| {
            let value = value.clone();
            let scheduler = scheduler.clone();
            async move {
                scheduler.spawn_after(Duration::ZERO, async move {
                    loop {
                        if observer.on_next(value.clone()).await.is_done() {
                            return;
                        }
                    }
                })
            }
        })
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    /// An observable over an already-owned sequence of items, emitted in
    /// order, honoring back-pressure.
    ///
    /// Production is spawned on `scheduler`.
    pub fn from_iterable<I>(items: I, scheduler: Arc<dyn Scheduler>) -> Self
    where
        I: IntoIterator<Item = T> + Send + 'static,
        I::IntoIter: Send,
    {
        Self::create(move |observer| {
            let items = items.into_iter().collect::<Vec<_>>();
            let scheduler = scheduler.clone();
            async move {
                scheduler.spawn_after(Duration::ZERO, async move {
                    for item in items {
                        if observer.on_next(item).await.is_done() {
                            return;
                        }
                    }
                    observer.on_complete().await;
                })
            }
        })
    }

    /// An observable resolving a fresh future built by `make_future` for
    /// every subscription: emits its success value then completes, or emits
    /// its error. `make_future` is called once per `subscribe`, so the
    /// observable stays cold even though futures themselves can only be
    /// polled once.
    pub fn from_future<F, Fut>(make_future: F, scheduler: Arc<dyn Scheduler>) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, FluxionError>> + Send + 'static,
    {
        Self::create(move |observer| {
            let scheduler = scheduler.clone();
            let fut = make_future();
            async move {
                scheduler.spawn_after(Duration::ZERO, async move {
                    match fut.await {
                        Ok(value) => {
                            if observer.on_next(value).await == Ack::Continue {
                                observer.on_complete().await;
                            }
                        }
                        Err(error) => observer.on_error(error).await,
                    }
                })
            }
        })
    }
}

impl Observable<i64> {
    /// An observable emitting the half-open range `start..end` in order.
    #[must_use]
    pub fn range(start: i64, end: i64, scheduler: Arc<dyn Scheduler>) -> Self {
        Self::from_iterable(start..end, scheduler)
    }
}

impl Observable<u64> {
    /// An observable emitting `0, 1, 2, ...` every `period`, forever, until
    /// the downstream stops or the returned cancelable is canceled.
    #[must_use]
    pub fn interval(period: Duration, scheduler: Arc<dyn Scheduler>) -> Self {
        Self::create(move |observer| {
            let scheduler = scheduler.clone();
            async move {
                let counter = Arc::new(core::sync::atomic::AtomicU64::new(0));
                scheduler.spawn_periodic(period, period, move || {
                    let observer = observer.clone();
                    let counter = counter.clone();
                    async move {
                        let n = counter.fetch_add(1, core::sync::atomic::Ordering::SeqCst);
                        let _ = observer.on_next(n).await;
                    }
                })
            }
        })
    }
}
