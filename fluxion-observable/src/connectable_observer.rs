// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! [`ConnectableObserver`]: buffers events until `connect()`, then forwards
//! transparently.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use core::sync::atomic::{AtomicBool, Ordering};
use fluxion_core::{Ack, FluxionError, Notification};
use parking_lot::Mutex;

use crate::Observer;

/// An observer that queues every event it receives until [`connect`](Self::connect)
/// is called, then drains the queue onto the wrapped observer in order
/// (honoring back-pressure) before becoming a direct pass-through.
///
/// Subjects use this to deliver cached history to a late subscriber
/// atomically: the subscriber is registered, handed a `ConnectableObserver`,
/// and `connect()` is called once the cache has been copied into it, so no
/// live event can be interleaved ahead of the cache.
pub struct ConnectableObserver<T> {
    inner: Arc<dyn Observer<T>>,
    connected: AtomicBool,
    buffer: Mutex<VecDeque<Notification<T>>>,
}

impl<T: Send + Sync + 'static> ConnectableObserver<T> {
    /// Wraps `inner`, initially buffering.
    pub fn new(inner: Arc<dyn Observer<T>>) -> Self {
        Self {
            inner,
            connected: AtomicBool::new(false),
            buffer: Mutex::new(VecDeque::new()),
        }
    }

    /// Drains whatever is buffered onto `inner`, in order, then marks this
    /// observer connected so subsequent events pass straight through.
    ///
    /// Stops early if `inner` returns `Ack::Done` or a terminal event is
    /// drained. Loops to pick up events that arrived while draining, so no
    /// event is ever lost to the race between "buffer emptied" and
    /// "connected flag set".
    pub async fn connect(&self) {
        loop {
            let batch = {
                let mut buffer = self.buffer.lock();
                core::mem::take(&mut *buffer)
            };

            if batch.is_empty() {
                let buffer = self.buffer.lock();
                if buffer.is_empty() {
                    self.connected.store(true, Ordering::Release);
                    return;
                }
                continue;
            }

            for event in batch {
                match event {
                    Notification::OnNext(item) => {
                        if self.inner.on_next(item).await.is_done() {
                            return;
                        }
                    }
                    Notification::OnComplete => {
                        self.inner.on_complete().await;
                        return;
                    }
                    Notification::OnError(error) => {
                        self.inner.on_error(error).await;
                        return;
                    }
                }
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for ConnectableObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        if self.is_connected() {
            self.inner.on_next(item).await
        } else {
            self.buffer.lock().push_back(Notification::OnNext(item));
            Ack::Continue
        }
    }

    async fn on_complete(&self) {
        if self.is_connected() {
            self.inner.on_complete().await;
        } else {
            self.buffer.lock().push_back(Notification::OnComplete);
        }
    }

    async fn on_error(&self, error: FluxionError) {
        if self.is_connected() {
            self.inner.on_error(error).await;
        } else {
            self.buffer.lock().push_back(Notification::OnError(error));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingObserver;

    #[tokio::test]
    async fn buffers_until_connect_then_drains_in_order() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        let connectable = ConnectableObserver::new(recorder.clone());

        connectable.on_next(1).await;
        connectable.on_next(2).await;
        connectable.on_complete().await;

        assert!(recorder.items().is_empty());

        connectable.connect().await;

        assert_eq!(recorder.items(), vec![1, 2]);
        assert_eq!(recorder.complete_count(), 1);
    }

    #[tokio::test]
    async fn events_after_connect_pass_straight_through() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        let connectable = ConnectableObserver::new(recorder.clone());

        connectable.connect().await;
        connectable.on_next(1).await;

        assert_eq!(recorder.items(), vec![1]);
    }
}
