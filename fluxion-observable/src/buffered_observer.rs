// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! [`BufferedObserver`]: decouples a producer from a possibly-slow consumer
//! through an unbounded queue and a single draining task.

use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, FluxionError, Notification};
use fluxion_runtime::Scheduler;
use futures_util::StreamExt;
use parking_lot::Mutex;

use crate::Observer;

struct Shared<T> {
    sender: futures_channel::mpsc::UnboundedSender<Notification<T>>,
    receiver: Mutex<Option<futures_channel::mpsc::UnboundedReceiver<Notification<T>>>>,
    inner: Arc<dyn Observer<T>>,
    scheduler: Arc<dyn Scheduler>,
    drain_started: core::sync::atomic::AtomicBool,
}

impl<T: Send + Sync + 'static> Shared<T> {
    fn ensure_draining(self: &Arc<Self>) {
        use core::sync::atomic::Ordering;
        if self.drain_started.swap(true, Ordering::AcqRel) {
            return;
        }
        let receiver = self
            .receiver
            .lock()
            .take()
            .expect("drain starts exactly once");
        let this = self.clone();
        self.scheduler
            .schedule_now(Box::pin(async move { this.drain(receiver).await }));
    }

    async fn drain(
        &self,
        mut receiver: futures_channel::mpsc::UnboundedReceiver<Notification<T>>,
    ) {
        while let Some(event) = receiver.next().await {
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

/// An observer that absorbs every push from its producer without
/// back-pressure, forwarding them to `inner` one at a time in the order
/// received.
///
/// `on_next` always returns `Ack::Continue` synchronously; the caller is
/// never slowed down, even if `inner` is. This has no bound on memory: a
/// producer that outruns `inner` forever grows the queue forever. Policy
/// for bounding it is left to the caller, per the component's design notes.
pub struct BufferedObserver<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Send + Sync + 'static> BufferedObserver<T> {
    /// Wraps `inner`, draining the internal queue on `scheduler`.
    pub fn new(inner: Arc<dyn Observer<T>>, scheduler: Arc<dyn Scheduler>) -> Self {
        let (sender, receiver) = futures_channel::mpsc::unbounded();
        Self {
            shared: Arc::new(Shared {
                sender,
                receiver: Mutex::new(Some(receiver)),
                inner,
                scheduler,
                drain_started: core::sync::atomic::AtomicBool::new(false),
            }),
        }
    }
}

impl<T> Clone for BufferedObserver<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for BufferedObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        self.shared.ensure_draining();
        let _ = self.shared.sender.unbounded_send(Notification::OnNext(item));
        Ack::Continue
    }

    async fn on_complete(&self) {
        self.shared.ensure_draining();
        let _ = self.shared.sender.unbounded_send(Notification::OnComplete);
    }

    async fn on_error(&self, error: FluxionError) {
        self.shared.ensure_draining();
        let _ = self
            .shared
            .sender
            .unbounded_send(Notification::OnError(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingObserver;
    use fluxion_runtime::TokioScheduler;

    #[tokio::test]
    async fn on_next_never_awaits_the_downstream() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        let buffered = BufferedObserver::new(recorder.clone(), Arc::new(TokioScheduler::new()));

        for i in 0..5 {
            assert_eq!(buffered.on_next(i).await, Ack::Continue);
        }
        buffered.on_complete().await;

        tokio::time::sleep(core::time::Duration::from_millis(20)).await;
        assert_eq!(recorder.items(), vec![0, 1, 2, 3, 4]);
        assert_eq!(recorder.complete_count(), 1);
    }

    #[tokio::test]
    async fn terminal_events_preserve_fifo_order() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        let buffered = BufferedObserver::new(recorder.clone(), Arc::new(TokioScheduler::new()));

        buffered.on_next(1).await;
        buffered.on_next(2).await;
        buffered.on_error(FluxionError::stream_error("boom")).await;
        buffered.on_next(3).await;

        tokio::time::sleep(core::time::Duration::from_millis(20)).await;
        assert_eq!(recorder.items(), vec![1, 2]);
        assert_eq!(recorder.error_count(), 1);
    }
}
