// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! [`CallbackObserver`]: adapts a plain async closure plus an error callback
//! into an [`Observer`], and signals a oneshot once the subscription reaches
//! a terminal state so `subscribe_with`/`subscribe_latest` can `.await`
//! completion.

use std::future::Future;

use async_trait::async_trait;
use fluxion_core::{Ack, CancellationToken, FluxionError, Result};
use futures_channel::oneshot;
use parking_lot::Mutex;

use fluxion_observable::Observer;

pub(crate) struct CallbackObserver<F, OnError> {
    on_next_func: F,
    on_error_callback: OnError,
    cancellation_token: CancellationToken,
    done: Mutex<Option<oneshot::Sender<Result<()>>>>,
}

impl<F, OnError> CallbackObserver<F, OnError> {
    pub(crate) fn new(
        on_next_func: F,
        on_error_callback: OnError,
        cancellation_token: CancellationToken,
        done: oneshot::Sender<Result<()>>,
    ) -> Self {
        Self {
            on_next_func,
            on_error_callback,
            cancellation_token,
            done: Mutex::new(Some(done)),
        }
    }

    fn finish(&self, outcome: Result<()>) {
        if let Some(done) = self.done.lock().take() {
            let _ = done.send(outcome);
        }
    }
}

#[async_trait]
impl<T, F, Fut, E, OnError> Observer<T> for CallbackObserver<F, OnError>
where
    T: Send + Sync + 'static,
    F: Fn(T, CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = core::result::Result<(), E>> + Send,
    OnError: Fn(E) + Send + Sync,
{
    async fn on_next(&self, item: T) -> Ack {
        if self.cancellation_token.is_cancelled() {
            return Ack::Done;
        }

        if let Err(error) = (self.on_next_func)(item, self.cancellation_token.clone()).await {
            (self.on_error_callback)(error);
        }

        if self.cancellation_token.is_cancelled() {
            Ack::Done
        } else {
            Ack::Continue
        }
    }

    async fn on_complete(&self) {
        self.finish(Ok(()));
    }

    async fn on_error(&self, error: FluxionError) {
        self.finish(Err(error));
    }
}
