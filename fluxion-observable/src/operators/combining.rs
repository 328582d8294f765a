// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `concat`, `merge`, `zip`: combine several observables into one.

use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, Acknowledgement, BoxCancelable, FluxionError, NoopCancelable};
use futures_channel::oneshot;
use parking_lot::Mutex;

use crate::{MergeAckBuffer, Observable, Observer};

// ---------------------------------------------------------------- concat --

struct ConcatLinkObserver<T> {
    downstream: Arc<dyn Observer<T>>,
    done: Mutex<Option<oneshot::Sender<bool>>>,
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for ConcatLinkObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        self.downstream.on_next(item).await
    }

    async fn on_complete(&self) {
        if let Some(tx) = self.done.lock().take() {
            let _ = tx.send(true);
        }
    }

    async fn on_error(&self, error: FluxionError) {
        self.downstream.on_error(error).await;
        if let Some(tx) = self.done.lock().take() {
            let _ = tx.send(false);
        }
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    /// Subscribes to each source in turn, only moving to the next once the
    /// previous has completed; preserves full order across sources.
    pub fn concat(sources: Vec<Observable<T>>) -> Observable<T> {
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let sources = sources.clone();
            async move {
                for source in sources {
                    let (tx, rx) = oneshot::channel();
                    let link = Arc::new(ConcatLinkObserver {
                        downstream: observer.clone(),
                        done: Mutex::new(Some(tx)),
                    });
                    let _ = source.subscribe(link).await;
                    match rx.await {
                        Ok(true) => continue,
                        _ => return Box::new(NoopCancelable) as BoxCancelable,
                    }
                }
                observer.on_complete().await;
                Box::new(NoopCancelable) as BoxCancelable
            }
        })
    }
}

// ----------------------------------------------------------------- merge --

struct MergeInnerObserver<T> {
    downstream: Arc<dyn Observer<T>>,
    buffer: Arc<MergeAckBuffer>,
    outstanding: Arc<AtomicUsize>,
    terminated: Arc<AtomicBool>,
}

#[async_trait]
impl<T: Send + Sync + 'static> Observer<T> for MergeInnerObserver<T> {
    async fn on_next(&self, item: T) -> Ack {
        let downstream = self.downstream.clone();
        let ack = self
            .buffer
            .schedule_next(Acknowledgement::later(async move {
                downstream.on_next(item).await
            }));
        ack.await
    }

    async fn on_complete(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) != 1 {
            return;
        }
        if self.terminated.swap(true, Ordering::AcqRel) {
            return;
        }
        let last = self.buffer.schedule_next(Acknowledgement::continue_now());
        last.await;
        self.downstream.on_complete().await;
    }

    async fn on_error(&self, error: FluxionError) {
        if self.terminated.swap(true, Ordering::AcqRel) {
            return;
        }
        let downstream = self.downstream.clone();
        let ack = self
            .buffer
            .schedule_next(Acknowledgement::later(async move {
                downstream.on_error(error).await;
                Ack::Done
            }));
        ack.await;
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    /// Subscribes to every source as it's given, serializing their outputs
    /// through a single acknowledgement chain; completes once every source
    /// has completed (reference-counted), or as soon as any errors.
    pub fn merge(sources: Vec<Observable<T>>) -> Observable<T> {
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let sources = sources.clone();
            async move {
                if sources.is_empty() {
                    observer.on_complete().await;
                    return Box::new(NoopCancelable) as BoxCancelable;
                }
                let buffer = Arc::new(MergeAckBuffer::new());
                let outstanding = Arc::new(AtomicUsize::new(sources.len()));
                let terminated = Arc::new(AtomicBool::new(false));
                for source in sources {
                    let inner = Arc::new(MergeInnerObserver {
                        downstream: observer.clone(),
                        buffer: buffer.clone(),
                        outstanding: outstanding.clone(),
                        terminated: terminated.clone(),
                    });
                    let _ = source.subscribe(inner).await;
                }
                Box::new(NoopCancelable) as BoxCancelable
            }
        })
    }
}

// ------------------------------------------------------------------- zip --

struct ZipQueues<A, B> {
    pending_a: VecDeque<(A, oneshot::Sender<Ack>)>,
    pending_b: VecDeque<(B, oneshot::Sender<Ack>)>,
}

struct ZipCore<A, B> {
    downstream: Arc<dyn Observer<(A, B)>>,
    queues: Mutex<ZipQueues<A, B>>,
    finished: AtomicBool,
}

impl<A: Send + Sync + 'static, B: Send + Sync + 'static> ZipCore<A, B> {
    async fn finish(&self) {
        if !self.finished.swap(true, Ordering::AcqRel) {
            self.downstream.on_complete().await;
        }
    }
}

struct ZipLeftObserver<A, B> {
    core: Arc<ZipCore<A, B>>,
}

#[async_trait]
impl<A: Send + Sync + 'static, B: Send + Sync + 'static> Observer<A> for ZipLeftObserver<A, B> {
    async fn on_next(&self, item: A) -> Ack {
        let paired = {
            let mut queues = self.core.queues.lock();
            queues.pending_b.pop_front()
        };
        if let Some((b, b_tx)) = paired {
            let ack = self.core.downstream.on_next((item, b)).await;
            let _ = b_tx.send(ack);
            ack
        } else {
            let (tx, rx) = oneshot::channel();
            self.core.queues.lock().pending_a.push_back((item, tx));
            rx.await.unwrap_or(Ack::Done)
        }
    }

    async fn on_complete(&self) {
        self.core.finish().await;
    }

    async fn on_error(&self, error: FluxionError) {
        self.core.downstream.on_error(error).await;
    }
}

struct ZipRightObserver<A, B> {
    core: Arc<ZipCore<A, B>>,
}

#[async_trait]
impl<A: Send + Sync + 'static, B: Send + Sync + 'static> Observer<B> for ZipRightObserver<A, B> {
    async fn on_next(&self, item: B) -> Ack {
        let paired = {
            let mut queues = self.core.queues.lock();
            queues.pending_a.pop_front()
        };
        if let Some((a, a_tx)) = paired {
            let ack = self.core.downstream.on_next((a, item)).await;
            let _ = a_tx.send(ack);
            ack
        } else {
            let (tx, rx) = oneshot::channel();
            self.core.queues.lock().pending_b.push_back((item, tx));
            rx.await.unwrap_or(Ack::Done)
        }
    }

    async fn on_complete(&self) {
        self.core.finish().await;
    }

    async fn on_error(&self, error: FluxionError) {
        self.core.downstream.on_error(error).await;
    }
}

impl<A: Send + Sync + 'static> Observable<A> {
    /// Pairs items from this observable and `other` strictly by position;
    /// completes as soon as either side completes.
    pub fn zip<B: Send + Sync + 'static>(&self, other: &Observable<B>) -> Observable<(A, B)> {
        let left = self.clone();
        let right = other.clone();
        Observable::create(move |observer: Arc<dyn Observer<(A, B)>>| {
            let left = left.clone();
            let right = right.clone();
            async move {
                let core = Arc::new(ZipCore {
                    downstream: observer,
                    queues: Mutex::new(ZipQueues {
                        pending_a: VecDeque::new(),
                        pending_b: VecDeque::new(),
                    }),
                    finished: AtomicBool::new(false),
                });
                let _ = left
                    .subscribe(Arc::new(ZipLeftObserver { core: core.clone() }))
                    .await;
                let _ = right
                    .subscribe(Arc::new(ZipRightObserver { core: core.clone() }))
                    .await;
                Box::new(NoopCancelable) as BoxCancelable
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
    async fn concat_preserves_full_order_across_sources() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        let a = Observable::from_iterable(vec![1, 2], Arc::new(TokioScheduler::new()));
        let b = Observable::from_iterable(vec![3, 4], Arc::new(TokioScheduler::new()));
        Observable::concat(vec![a, b])
            .subscribe(recorder.clone())
            .await;
        tokio::time::sleep(core::time::Duration::from_millis(30)).await;
        assert_eq!(recorder.items(), vec![1, 2, 3, 4]);
        assert_eq!(recorder.complete_count(), 1);
    }

    #[tokio::test]
    async fn merge_completes_only_after_every_source_completes() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        let a = Observable::from_iterable(vec![1, 2], Arc::new(TokioScheduler::new()));
        let b = Observable::from_iterable(vec![3, 4], Arc::new(TokioScheduler::new()));
        Observable::merge(vec![a, b])
            .subscribe(recorder.clone())
            .await;
        tokio::time::sleep(core::time::Duration::from_millis(30)).await;
        let mut items = recorder.items();
        items.sort_unstable();
        assert_eq!(items, vec![1, 2, 3, 4]);
        assert_eq!(recorder.complete_count(), 1);
    }

    #[tokio::test]
    async fn zip_pairs_items_strictly_by_position() {
        let recorder = Arc::new(RecordingObserver::<(i32, &'static str)>::new());
        let a = Observable::from_iterable(vec![1, 2, 3], Arc::new(TokioScheduler::new()));
        let b = Observable::from_iterable(vec!["a", "b"], Arc::new(TokioScheduler::new()));
        a.zip(&b).subscribe(recorder.clone()).await;
        tokio::time::sleep(core::time::Duration::from_millis(30)).await;
        assert_eq!(recorder.items(), vec![(1, "a"), (2, "b")]);
        assert_eq!(recorder.complete_count(), 1);
    }
}
