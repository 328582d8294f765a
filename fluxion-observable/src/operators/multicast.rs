// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `multicast`: share one subscription to an upstream source across many
//! subscribers of a [`Subject`].
//!
//! The concrete subject types (`PublishSubject`, `BehaviorSubject`,
//! `ReplaySubject`) live in a separate crate built on top of this one, to
//! avoid a dependency cycle; this module only defines the trait they
//! implement and the generic `multicast` wiring.

use std::sync::Arc;

use fluxion_core::BoxCancelable;

use crate::{Observable, Observer};

/// Something that is both an ingestion point (an [`Observer`]) and a
/// broadcast source (an [`Observable`]) — e.g. `PublishSubject`.
pub trait Subject<T>: Observer<T> + Send + Sync + 'static {
    /// The observable side: subscribing here registers a new listener
    /// without triggering a fresh upstream subscription.
    fn as_observable(self: &Arc<Self>) -> Observable<T>;
}

/// The result of [`Observable::multicast`]: an observable view over the
/// subject plus an explicit `connect()` to start the shared upstream
/// subscription.
pub struct Connectable<T> {
    observable: Observable<T>,
    connect: Arc<dyn Fn() -> fluxion_core::BoxFuture<'static, BoxCancelable> + Send + Sync>,
}

impl<T: Send + Sync + 'static> Connectable<T> {
    /// The shared observable; subscribing here never starts production on
    /// its own — only [`Self::connect`] does.
    #[must_use]
    pub fn observable(&self) -> Observable<T> {
        self.observable.clone()
    }

    /// Subscribes the underlying subject to the source, starting the single
    /// shared upstream production.
    pub async fn connect(&self) -> BoxCancelable {
        (self.connect)().await
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    /// Routes this observable's single upstream subscription through
    /// `subject`, so every subscriber of the returned [`Connectable`] shares
    /// it instead of starting an independent production.
    pub fn multicast<S: Subject<T>>(&self, subject: Arc<S>) -> Connectable<T> {
        let source = self.clone();
        let observable = subject.as_observable();
        let connect = Arc::new(move || {
            let source = source.clone();
            let subject: Arc<dyn Observer<T>> = subject.clone();
            Box::pin(async move { source.subscribe(subject).await })
                as fluxion_core::BoxFuture<'static, BoxCancelable>
        });
        Connectable { observable, connect }
    }
}
