// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sequential callback subscription: each item's handler is awaited to
//! completion before the next item is delivered upstream, so this is the
//! natural fit whenever handler order matters.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{CancellationToken, Result};
use futures_channel::oneshot;

use fluxion_observable::Observable;

use crate::callback::CallbackObserver;

/// Subscribes with plain callbacks instead of a hand-rolled [`Observer`](fluxion_observable::Observer).
#[async_trait]
pub trait SubscribeExt<T> {
    /// Subscribes to this observable, awaiting `on_next_func` for every item
    /// before requesting the next one. Errors returned by `on_next_func` are
    /// routed to `on_error_callback` without terminating the subscription;
    /// only an upstream `on_error` (or `cancellation_token.cancel()`) stops
    /// it early.
    ///
    /// Resolves once the observable completes or errors.
    async fn subscribe_with<F, Fut, E, OnError>(
        &self,
        on_next_func: F,
        on_error_callback: OnError,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        OnError: Fn(E) + Send + Sync + 'static,
        T: Send + Sync + 'static,
        E: Send + 'static;
}

#[async_trait]
impl<T: Send + Sync + 'static> SubscribeExt<T> for Observable<T> {
    async fn subscribe_with<F, Fut, E, OnError>(
        &self,
        on_next_func: F,
        on_error_callback: OnError,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<()>
    where
        F: Fn(T, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = core::result::Result<(), E>> + Send + 'static,
        OnError: Fn(E) + Send + Sync + 'static,
        E: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let token = cancellation_token.unwrap_or_default();
        let observer = Arc::new(CallbackObserver::new(
            on_next_func,
            on_error_callback,
            token,
            tx,
        ));
        let _cancelable = self.subscribe(observer).await;
        rx.await.unwrap_or(Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxion_runtime::TokioScheduler;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[tokio::test]
    async fn processes_items_in_order_before_resolving() {
        let source = Observable::from_iterable(vec![1, 2, 3], Arc::new(TokioScheduler::new()));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        source
            .subscribe_with(
                move |item: i32, _token| {
                    let seen = seen_clone.clone();
                    async move {
                        seen.lock().push(item);
                        Ok::<(), std::io::Error>(())
                    }
                },
                |_: std::io::Error| unreachable!("handler never fails in this test"),
                None,
            )
            .await
            .unwrap();

        assert_eq!(*seen.lock(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn routes_handler_errors_to_the_error_callback_without_stopping() {
        let source = Observable::from_iterable(vec![1, 2, 3], Arc::new(TokioScheduler::new()));
        let failures = Arc::new(Mutex::new(Vec::new()));
        let failures_clone = failures.clone();

        source
            .subscribe_with(
                move |item: i32, _token| async move {
                    if item == 2 {
                        Err(format!("bad item {item}"))
                    } else {
                        Ok(())
                    }
                },
                move |error: String| failures_clone.lock().push(error),
                None,
            )
            .await
            .unwrap();

        assert_eq!(*failures.lock(), vec!["bad item 2".to_string()]);
    }
}
