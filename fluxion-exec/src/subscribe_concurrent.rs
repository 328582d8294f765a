// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Concurrent callback subscription: every item's handler is spawned on its
//! own detached task as soon as it arrives, so a slow handler never delays
//! delivery of the next item. Unlike [`subscribe_with`](crate::SubscribeExt::subscribe_with),
//! handler completion order isn't guaranteed.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, CancellationToken, FluxionError, Result};
use futures_channel::oneshot;
use parking_lot::Mutex;

use fluxion_observable::{Observable, Observer};

struct ConcurrentObserver<F, OnError> {
    on_next_func: F,
    on_error_callback: OnError,
    cancellation_token: CancellationToken,
    done: Mutex<Option<oneshot::Sender<Result<()>>>>,
}

impl<F, OnError> ConcurrentObserver<F, OnError> {
    fn finish(&self, outcome: Result<()>) {
        if let Some(done) = self.done.lock().take() {
            let _ = done.send(outcome);
        }
    }
}

#[async_trait]
impl<T, F, Fut, E, OnError> Observer<T> for ConcurrentObserver<F, OnError>
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

        let on_next_func = self.on_next_func.clone();
        let on_error_callback = self.on_error_callback.clone();
        let token = self.cancellation_token.clone();
        tokio::spawn(async move {
            if let Err(error) = on_next_func(item, token).await {
                on_error_callback(error);
            }
        });

        Ack::Continue
    }

    async fn on_complete(&self) {
        self.finish(Ok(()));
    }

    async fn on_error(&self, error: FluxionError) {
        self.finish(Err(error));
    }
}

/// Subscribes with a concurrent, fire-and-forget handler per item.
#[async_trait]
pub trait SubscribeConcurrentExt<T> {
    /// Spawns `on_next_func` on its own task for every item instead of
    /// awaiting it in line; the subscription resolves once the observable
    /// itself completes or errors, independent of whether spawned handlers
    /// have finished.
    async fn subscribe_concurrent<F, Fut, E, OnError>(
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
impl<T: Send + Sync + 'static> SubscribeConcurrentExt<T> for Observable<T> {
    async fn subscribe_concurrent<F, Fut, E, OnError>(
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
        let observer = Arc::new(ConcurrentObserver {
            on_next_func,
            on_error_callback,
            cancellation_token: token,
            done: Mutex::new(Some(tx)),
        });
        let _cancelable = self.subscribe(observer).await;
        rx.await.unwrap_or(Ok(()))
    }
}
