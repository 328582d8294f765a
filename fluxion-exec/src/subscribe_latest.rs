// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Switch-latest callback subscription: at most one handler runs at a time;
//! an item that arrives while one is running replaces whatever item was
//! still waiting to be picked up, so only the most recent value ever gets
//! processed once the handler is free again.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use event_listener::Event;
use fluxion_core::{Ack, CancellationToken, FluxionError, Result};
use futures_channel::oneshot;
use parking_lot::Mutex;

use fluxion_observable::{Observable, Observer};

struct QueueState<T> {
    pending: Option<T>,
    draining: bool,
}

struct LatestQueue<T> {
    state: Mutex<QueueState<T>>,
    idle: Event,
}

impl<T> LatestQueue<T> {
    fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                pending: None,
                draining: false,
            }),
            idle: Event::new(),
        }
    }

    /// Replaces the pending item. Returns `true` if nothing is currently
    /// draining the queue and a new drain loop should be started.
    fn offer(&self, item: T) -> bool {
        let mut state = self.state.lock();
        state.pending = Some(item);
        if state.draining {
            false
        } else {
            state.draining = true;
            true
        }
    }

    fn take(&self) -> Option<T> {
        self.state.lock().pending.take()
    }

    /// Returns `true` if another item arrived while the handler was
    /// running, so the drain loop should keep going.
    fn finish_one(&self) -> bool {
        let mut state = self.state.lock();
        if state.pending.is_some() {
            true
        } else {
            state.draining = false;
            false
        }
    }

    async fn wait_idle(&self) {
        loop {
            if !self.state.lock().draining {
                return;
            }
            self.idle.listen().await;
        }
    }

    fn notify_idle(&self) {
        self.idle.notify(usize::MAX);
    }
}

struct LatestObserver<T, F, OnError> {
    queue: Arc<LatestQueue<T>>,
    on_next_func: F,
    on_error_callback: OnError,
    cancellation_token: CancellationToken,
    done: Mutex<Option<oneshot::Sender<Result<()>>>>,
}

impl<T, F, OnError> LatestObserver<T, F, OnError> {
    fn finish(&self, outcome: Result<()>) {
        if let Some(done) = self.done.lock().take() {
            let _ = done.send(outcome);
        }
    }
}

#[async_trait]
impl<T, F, Fut, E, OnError> Observer<T> for LatestObserver<T, F, OnError>
where
    T: Send + Sync + 'static,
    F: Fn(T, CancellationToken) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
    E: Send + 'static,
    OnError: Fn(E) + Clone + Send + Sync + 'static,
{
    async fn on_next(&self, item: T) -> Ack {
        if self.cancellation_token.is_cancelled() {
            return Ack::Done;
        }

        if self.queue.offer(item) {
            let queue = self.queue.clone();
            let on_next_func = self.on_next_func.clone();
            let on_error_callback = self.on_error_callback.clone();
            let token = self.cancellation_token.clone();

            tokio::spawn(async move {
                loop {
                    let Some(item) = queue.take() else {
                        break;
                    };
                    if token.is_cancelled() {
                        break;
                    }
                    if let Err(error) = on_next_func(item, token.clone()).await {
                        on_error_callback(error);
                    }
                    if !queue.finish_one() {
                        break;
                    }
                }
                queue.notify_idle();
            });
        }

        Ack::Continue
    }

    async fn on_complete(&self) {
        self.queue.wait_idle().await;
        self.finish(Ok(()));
    }

    async fn on_error(&self, error: FluxionError) {
        self.queue.wait_idle().await;
        self.finish(Err(error));
    }
}

/// Subscribes with a switch-latest callback: only the most recent
/// not-yet-started item survives a burst.
#[async_trait]
pub trait SubscribeLatestExt<T> {
    /// Like [`SubscribeExt::subscribe_with`](crate::SubscribeExt::subscribe_with),
    /// but an item that arrives while `on_next_func` is running for an
    /// earlier item replaces any item still waiting, rather than queuing
    /// behind it. Resolves once the observable completes or errors, and
    /// once the handler is idle.
    async fn subscribe_latest<F, Fut, E, OnError>(
        &self,
        on_next_func: F,
        on_error_callback: OnError,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        OnError: Fn(E) + Clone + Send + Sync + 'static,
        T: Send + Sync + 'static,
        E: Send + 'static;
}

#[async_trait]
impl<T: Send + Sync + 'static> SubscribeLatestExt<T> for Observable<T> {
    async fn subscribe_latest<F, Fut, E, OnError>(
        &self,
        on_next_func: F,
        on_error_callback: OnError,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        OnError: Fn(E) + Clone + Send + Sync + 'static,
        E: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let token = cancellation_token.unwrap_or_default();
        let observer = Arc::new(LatestObserver {
            queue: Arc::new(LatestQueue::new()),
            on_next_func,
            on_error_callback,
            cancellation_token: token,
            done: Mutex::new(Some(tx)),
        });
        let _cancelable = self.subscribe(observer).await;
        rx.await.unwrap_or(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxion_runtime::TokioScheduler;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn drops_items_queued_behind_a_still_running_handler() {
        let source = Observable::from_iterable(vec![1, 2, 3], Arc::new(TokioScheduler::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        source
            .subscribe_latest(
                move |item: i32, _token| {
                    let seen = seen_clone.clone();
                    let calls = calls_clone.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        if calls.load(Ordering::SeqCst) == 1 {
                            tokio::time::sleep(Duration::from_millis(30)).await;
                        }
                        seen.lock().push(item);
                        Ok::<(), std::io::Error>(())
                    }
                },
                |_: std::io::Error| unreachable!("handler never fails in this test"),
                None,
            )
            .await
            .unwrap();

        // Item 1 starts immediately and sleeps; items 2 and 3 arrive while
        // it's running and 2 gets discarded in favor of 3.
        assert_eq!(*seen.lock(), vec![1, 3]);
    }
}
