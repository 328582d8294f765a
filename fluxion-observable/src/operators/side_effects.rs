// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `do_on_complete`, `do_on_error`, `do_on_subscribe`: run a side effect at a
//! lifecycle point. `materialize`: reify terminal events as values.

use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, FluxionError, Notification};
use fluxion_runtime::Scheduler;

use crate::operators::guard;
use crate::{Observable, Observer};

struct DoOnCompleteObserver<T, F> {
    downstream: Arc<dyn Observer<T>>,
    scheduler: Arc<dyn Scheduler>,
    callback: F,
}

#[async_trait]
impl<T, F> Observer<T> for DoOnCompleteObserver<T, F>
where
    T: Send + Sync + 'static,
    F: Fn() + Send + Sync + 'static,
{
    async fn on_next(&self, item: T) -> Ack {
        self.downstream.on_next(item).await
    }

    async fn on_complete(&self) {
        self.downstream.on_complete().await;
        report_side_effect(&self.scheduler, &self.callback);
    }

    async fn on_error(&self, error: FluxionError) {
        self.downstream.on_error(error).await;
    }
}

struct DoOnErrorObserver<T, F> {
    downstream: Arc<dyn Observer<T>>,
    scheduler: Arc<dyn Scheduler>,
    callback: F,
}

#[async_trait]
impl<T, F> Observer<T> for DoOnErrorObserver<T, F>
where
    T: Send + Sync + 'static,
    F: Fn(&FluxionError) + Send + Sync + 'static,
{
    async fn on_next(&self, item: T) -> Ack {
        self.downstream.on_next(item).await
    }

    async fn on_complete(&self) {
        self.downstream.on_complete().await;
    }

    async fn on_error(&self, error: FluxionError) {
        self.downstream.on_error(error.clone()).await;
        let error_for_callback = error;
        let callback_result = guard(|| (self.callback)(&error_for_callback));
        if callback_result.is_err() {
            self.scheduler
                .report_failure(FluxionError::stream_error("do_on_error callback panicked"));
        }
    }
}

struct MaterializeObserver<T> {
    downstream: Arc<dyn Observer<Notification<T>>>,
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for MaterializeObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        self.downstream.on_next(Notification::OnNext(item)).await
    }

    async fn on_complete(&self) {
        if self
            .downstream
            .on_next(Notification::OnComplete)
            .await
            .is_continue()
        {
            self.downstream.on_complete().await;
        }
    }

    async fn on_error(&self, error: FluxionError) {
        if self
            .downstream
            .on_next(Notification::OnError(error))
            .await
            .is_continue()
        {
            self.downstream.on_complete().await;
        }
    }
}

fn report_side_effect(scheduler: &Arc<dyn Scheduler>, callback: &(impl Fn() + Send + Sync)) {
    if guard(callback).is_err() {
        scheduler.report_failure(FluxionError::stream_error("do_on_complete callback panicked"));
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    /// Runs `callback` after the downstream has observed completion. A
    /// panicking callback is reported to `scheduler`'s failure reporter,
    /// never streamed.
    pub fn do_on_complete<F>(&self, callback: F, scheduler: Arc<dyn Scheduler>) -> Observable<T>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let source = self.clone();
        let callback = Arc::new(callback);
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let source = source.clone();
            let scheduler = scheduler.clone();
            let callback = callback.clone();
            async move {
                let forwarding = Arc::new(DoOnCompleteObserver {
                    downstream: observer,
                    scheduler,
                    callback: move || callback(),
                });
                source.subscribe(forwarding).await
            }
        })
    }

    /// Runs `callback` with a reference to the error after the downstream
    /// has observed it.
    pub fn do_on_error<F>(&self, callback: F, scheduler: Arc<dyn Scheduler>) -> Observable<T>
    where
        F: Fn(&FluxionError) + Send + Sync + 'static,
    {
        let source = self.clone();
        let callback = Arc::new(callback);
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let source = source.clone();
            let scheduler = scheduler.clone();
            let callback = callback.clone();
            async move {
                let forwarding = Arc::new(DoOnErrorObserver {
                    downstream: observer,
                    scheduler,
                    callback: move |e: &FluxionError| callback(e),
                });
                source.subscribe(forwarding).await
            }
        })
    }

    /// Runs `callback` synchronously, on the subscribing task, before the
    /// subscription is installed upstream.
    pub fn do_on_subscribe<F>(&self, callback: F) -> Observable<T>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let source = self.clone();
        let callback = Arc::new(callback);
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let source = source.clone();
            let callback = callback.clone();
            async move {
                let _ = guard(|| callback());
                source.subscribe(observer).await
            }
        })
    }

    /// Converts every event into a [`Notification`] value, followed by a
    /// single `on_complete` once the terminal notification itself is
    /// accepted downstream.
    pub fn materialize(&self) -> Observable<Notification<T>> {
        let source = self.clone();
        Observable::create(move |observer: Arc<dyn Observer<Notification<T>>>| {
            let source = source.clone();
            async move {
                let forwarding = Arc::new(MaterializeObserver { downstream: observer });
                source.subscribe(forwarding).await
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::RecordingObserver;
    use crate::Observable;
    use fluxion_core::Notification;
    use fluxion_runtime::TokioScheduler;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn do_on_complete_runs_after_downstream_completes() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        Observable::from_iterable(vec![1], Arc::new(TokioScheduler::new()))
            .do_on_complete(move || flag.store(true, Ordering::SeqCst), Arc::new(TokioScheduler::new()))
            .subscribe(recorder.clone())
            .await;
        tokio::time::sleep(core::time::Duration::from_millis(20)).await;
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn materialize_reifies_the_complete_event() {
        let recorder = Arc::new(RecordingObserver::<Notification<i32>>::new());
        Observable::from_iterable(vec![1, 2], Arc::new(TokioScheduler::new()))
            .materialize()
            .subscribe(recorder.clone())
            .await;
        tokio::time::sleep(core::time::Duration::from_millis(20)).await;
        let items = recorder.items();
        assert_eq!(
            items,
            vec![
                Notification::OnNext(1),
                Notification::OnNext(2),
                Notification::OnComplete
            ]
        );
        assert_eq!(recorder.complete_count(), 1);
    }
}
