// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `observe_on`, `subscribe_on`: hop execution context onto a scheduler.

use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, Acknowledgement, FluxionError};
use fluxion_runtime::{ScheduleExt, Scheduler};
use futures_channel::oneshot;

use crate::{MergeAckBuffer, Observable, Observer};

struct ObserveOnObserver<T> {
    downstream: Arc<dyn Observer<T>>,
    scheduler: Arc<dyn Scheduler>,
    chain: MergeAckBuffer,
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for ObserveOnObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        let downstream = self.downstream.clone();
        let (tx, rx) = oneshot::channel();
        let ack = self
            .chain
            .schedule_next(Acknowledgement::later(async move {
                let result = downstream.on_next(item).await;
                let _ = tx.send(result);
                result
            }));
        // Driving `ack` on `self.scheduler` is what actually hops the
        // downstream call's execution there; this task just waits for its
        // own turn in the chain, so back-pressure upstream is preserved.
        self.scheduler.spawn(async move {
            ack.await;
        });
        rx.await.unwrap_or(Ack::Done)
    }

    async fn on_complete(&self) {
        let barrier = self.chain.barrier();
        let downstream = self.downstream.clone();
        let (tx, rx) = oneshot::channel();
        self.scheduler.spawn(async move {
            barrier.await;
            downstream.on_complete().await;
            let _ = tx.send(());
        });
        let _ = rx.await;
    }

    async fn on_error(&self, error: FluxionError) {
        let barrier = self.chain.barrier();
        let downstream = self.downstream.clone();
        let (tx, rx) = oneshot::channel();
        self.scheduler.spawn(async move {
            barrier.await;
            downstream.on_error(error).await;
            let _ = tx.send(());
        });
        let _ = rx.await;
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    /// Re-schedules every downstream call onto `scheduler`, serializing them
    /// through a chained acknowledgement so ordering is preserved across the
    /// hop.
    pub fn observe_on(&self, scheduler: Arc<dyn Scheduler>) -> Observable<T> {
        let source = self.clone();
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let source = source.clone();
            let scheduler = scheduler.clone();
            async move {
                let forwarding = Arc::new(ObserveOnObserver {
                    downstream: observer,
                    scheduler,
                    chain: MergeAckBuffer::new(),
                });
                source.subscribe(forwarding).await
            }
        })
    }

    /// Defers the subscription itself — the call into `subscribeFn` — onto
    /// `scheduler`, rather than running it on the subscriber's own task.
    pub fn subscribe_on(&self, scheduler: Arc<dyn Scheduler>) -> Observable<T> {
        let source = self.clone();
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let source = source.clone();
            let scheduler = scheduler.clone();
            async move {
                scheduler.spawn_after(core::time::Duration::ZERO, async move {
                    source.subscribe(observer).await;
                })
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
    async fn observe_on_preserves_order_across_the_hop() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        Observable::from_iterable(vec![1, 2, 3], Arc::new(TokioScheduler::new()))
            .observe_on(Arc::new(TokioScheduler::new()))
            .subscribe(recorder.clone())
            .await;
        tokio::time::sleep(core::time::Duration::from_millis(30)).await;
        assert_eq!(recorder.items(), vec![1, 2, 3]);
        assert_eq!(recorder.complete_count(), 1);
    }

    #[tokio::test]
    async fn subscribe_on_still_delivers_every_item() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        Observable::from_iterable(vec![1, 2, 3], Arc::new(TokioScheduler::new()))
            .subscribe_on(Arc::new(TokioScheduler::new()))
            .subscribe(recorder.clone())
            .await;
        tokio::time::sleep(core::time::Duration::from_millis(30)).await;
        assert_eq!(recorder.items(), vec![1, 2, 3]);
    }
}
