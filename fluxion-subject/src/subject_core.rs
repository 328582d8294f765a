// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! [`SubjectCore`]: the atomic state machine shared by every subject kind.
//! Parametrized over a [`SubjectCache`] strategy rather than duplicated per
//! kind — `PublishSubject`, `BehaviorSubject`, and `ReplaySubject` are all
//! just `SubjectCore` with a different cache.

use std::sync::Arc;

use async_trait::async_trait;
use core::sync::atomic::{AtomicBool, Ordering};
use fluxion_core::{Ack, AtomicCell, AtomicCounter, BoxCancelable, Cancelable, FluxionError};
use fluxion_observable::{ConnectableObserver, Observable, Observer, Subject};

use crate::cache::SubjectCache;

type SubscriberId = i64;
type SubscriberList<T> = Vec<(SubscriberId, Arc<dyn Observer<T>>)>;

#[derive(Clone)]
enum State<T, C> {
    Empty(C),
    Active(SubscriberList<T>, C),
    Complete(C, Option<FluxionError>),
}

/// The subscribers a transition affected, and what a new subscriber must be
/// shown before it sees anything live.
enum SubscribeOutcome<T> {
    Joined(Vec<T>),
    JoinedComplete(Vec<T>, Option<FluxionError>),
}

/// A subject's shared state machine: both the ingestion side (`Observer<T>`)
/// and the registry of subscribers fanned events out to.
///
/// Transitions follow `Empty -> Active -> Complete` or `Empty -> Complete`,
/// never backwards — even once every subscriber has left, an `Active` state
/// stays `Active` with an empty subscriber list rather than reverting to
/// `Empty`, so a subject that has seen its first subscriber never replays
/// cache semantics meant for a time before anyone joined.
pub struct SubjectCore<T, C> {
    state: AtomicCell<State<T, C>>,
    next_id: AtomicCounter,
}

impl<T, C> SubjectCore<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: SubjectCache<T>,
{
    pub(crate) fn new(cache: C) -> Self {
        Self {
            state: AtomicCell::new(State::Empty(cache)),
            next_id: AtomicCounter::new(0),
        }
    }

    fn remove_subscriber(&self, id: SubscriberId) {
        self.state.transform(|state| match state {
            State::Active(subs, cache) => {
                let kept = subs.iter().filter(|(sid, _)| *sid != id).cloned().collect();
                State::Active(kept, cache.clone())
            }
            other => other.clone(),
        });
    }
}

#[async_trait]
impl<T, C> Observer<T> for SubjectCore<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: SubjectCache<T>,
{
    async fn on_next(&self, item: T) -> Ack {
        let subscribers = self.state.transform_and_extract(|state| match state {
            State::Empty(cache) => {
                let mut cache = cache.clone();
                cache.record(&item);
                (State::Empty(cache), None)
            }
            State::Active(subs, cache) => {
                let mut cache = cache.clone();
                cache.record(&item);
                (State::Active(subs.clone(), cache), Some(subs.clone()))
            }
            State::Complete(cache, error) => {
                (State::Complete(cache.clone(), error.clone()), None)
            }
        });

        let Some(subscribers) = subscribers else {
            return Ack::Continue;
        };

        let mut done = Vec::new();
        for (id, subscriber) in &subscribers {
            if subscriber.on_next(item.clone()).await.is_done() {
                done.push(*id);
            }
        }
        for id in done {
            self.remove_subscriber(id);
        }
        Ack::Continue
    }

    async fn on_complete(&self) {
        let subscribers = self.state.transform_and_extract(|state| match state {
            State::Complete(cache, error) => {
                (State::Complete(cache.clone(), error.clone()), None)
            }
            State::Empty(cache) => (State::Complete(cache.clone(), None), Some(Vec::new())),
            State::Active(subs, cache) => {
                (State::Complete(cache.clone(), None), Some(subs.clone()))
            }
        });
        if let Some(subscribers) = subscribers {
            for (_, subscriber) in subscribers {
                subscriber.on_complete().await;
            }
        }
    }

    async fn on_error(&self, error: FluxionError) {
        let subscribers = self.state.transform_and_extract(|state| match state {
            State::Complete(cache, existing) => {
                (State::Complete(cache.clone(), existing.clone()), None)
            }
            State::Empty(cache) => {
                (State::Complete(cache.clone(), Some(error.clone())), Some(Vec::new()))
            }
            State::Active(subs, cache) => (
                State::Complete(cache.clone(), Some(error.clone())),
                Some(subs.clone()),
            ),
        });
        if let Some(subscribers) = subscribers {
            for (_, subscriber) in subscribers {
                subscriber.on_error(error.clone()).await;
            }
        }
    }
}

struct SubscriberCancelable<T, C> {
    core: Arc<SubjectCore<T, C>>,
    id: SubscriberId,
    canceled: AtomicBool,
}

impl<T, C> Cancelable for SubscriberCancelable<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: SubjectCache<T>,
{
    fn cancel(&self) {
        if !self.canceled.swap(true, Ordering::AcqRel) {
            self.core.remove_subscriber(self.id);
        }
    }

    fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }
}

impl<T, C> Subject<T> for SubjectCore<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: SubjectCache<T>,
{
    fn as_observable(self: &Arc<Self>) -> Observable<T> {
        let core = self.clone();
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let core = core.clone();
            async move { core.subscribe(observer).await }
        })
    }
}

impl<T, C> SubjectCore<T, C>
where
    T: Clone + Send + Sync + 'static,
    C: SubjectCache<T>,
{
    /// Registers `observer`, delivering the cache it's entitled to (and the
    /// terminal event, if the subject has already completed) before live
    /// events — all through the same [`ConnectableObserver`] buffer, so
    /// nothing delivered concurrently with registration can jump ahead of
    /// the cache.
    async fn subscribe(self: &Arc<Self>, observer: Arc<dyn Observer<T>>) -> BoxCancelable {
        let id = self.next_id.increment_and_get();
        let connectable = Arc::new(ConnectableObserver::new(observer));
        let as_subscriber: Arc<dyn Observer<T>> = connectable.clone();

        let outcome = self.state.transform_and_extract(|state| match state {
            State::Empty(cache) => {
                let history = cache.history();
                (
                    State::Active(vec![(id, as_subscriber.clone())], cache.clone()),
                    SubscribeOutcome::Joined(history),
                )
            }
            State::Active(subs, cache) => {
                let mut subs = subs.clone();
                subs.push((id, as_subscriber.clone()));
                (
                    State::Active(subs, cache.clone()),
                    SubscribeOutcome::Joined(cache.history()),
                )
            }
            State::Complete(cache, error) => (
                State::Complete(cache.clone(), error.clone()),
                SubscribeOutcome::JoinedComplete(cache.history(), error.clone()),
            ),
        });

        match outcome {
            SubscribeOutcome::Joined(history) => {
                for item in history {
                    if connectable.on_next(item).await.is_done() {
                        break;
                    }
                }
            }
            SubscribeOutcome::JoinedComplete(history, error) => {
                for item in history {
                    if connectable.on_next(item).await.is_done() {
                        break;
                    }
                }
                match error {
                    Some(error) => connectable.on_error(error).await,
                    None => connectable.on_complete().await,
                }
            }
        }
        connectable.connect().await;

        Box::new(SubscriberCancelable {
            core: self.clone(),
            id,
            canceled: AtomicBool::new(false),
        })
    }
}
