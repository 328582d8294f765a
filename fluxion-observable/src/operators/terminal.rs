// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `as_future`: drain an observable down to its first item.

use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, BoxFuture, FluxionError};
use futures_channel::oneshot;
use parking_lot::Mutex;

use crate::{Observable, Observer};

enum FirstItem<T> {
    Item(T),
    Empty,
    Error(FluxionError),
}

struct AsFutureObserver<T> {
    result: Mutex<Option<oneshot::Sender<FirstItem<T>>>>,
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for AsFutureObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        if let Some(tx) = self.result.lock().take() {
            let _ = tx.send(FirstItem::Item(item));
        }
        Ack::Done
    }

    async fn on_complete(&self) {
        if let Some(tx) = self.result.lock().take() {
            let _ = tx.send(FirstItem::Empty);
        }
    }

    async fn on_error(&self, error: FluxionError) {
        if let Some(tx) = self.result.lock().take() {
            let _ = tx.send(FirstItem::Error(error));
        }
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    /// Subscribes, takes the first item (requesting `Done` upstream right
    /// after), and resolves with it — `Ok(None)` if the source completed
    /// without emitting, `Err` if it errored before emitting.
    pub fn as_future(&self) -> BoxFuture<'static, Result<Option<T>, FluxionError>> {
        let source = self.clone();
        Box::pin(async move {
            let (tx, rx) = oneshot::channel();
            let observer = Arc::new(AsFutureObserver {
                result: Mutex::new(Some(tx)),
            });
            let _ = source.subscribe(observer).await;
            match rx.await {
                Ok(FirstItem::Item(item)) => Ok(Some(item)),
                Ok(FirstItem::Empty) | Err(_) => Ok(None),
                Ok(FirstItem::Error(error)) => Err(error),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::Observable;
    use fluxion_core::FluxionError;
    use fluxion_runtime::TokioScheduler;
    use std::sync::Arc;

    #[tokio::test]
    async fn resolves_with_the_first_item() {
        let source = Observable::from_iterable(vec![1, 2, 3], Arc::new(TokioScheduler::new()));
        assert_eq!(source.as_future().await, Ok(Some(1)));
    }

    #[tokio::test]
    async fn resolves_with_none_on_an_empty_source() {
        let source: Observable<i32> = Observable::empty();
        assert_eq!(source.as_future().await, Ok(None));
    }

    #[tokio::test]
    async fn resolves_with_the_error_when_the_source_errors_before_emitting() {
        let source: Observable<i32> = Observable::error(FluxionError::stream_error("boom"));
        assert_eq!(
            source.as_future().await,
            Err(FluxionError::stream_error("boom"))
        );
    }
}
