// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `map`: apply a function per item, preserving order and back-pressure.

use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, FluxionError};

use crate::operators::guard;
use crate::{Observable, Observer};

struct MapObserver<T, U, F> {
    downstream: Arc<dyn Observer<U>>,
    f: F,
    _marker: std::marker::PhantomData<fn(T)>,
}

#[async_trait]
impl<T, U, F> Observer<T> for MapObserver<T, U, F>
where
    T: Send + Sync + 'static,
    U: Send + Sync + 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
{
    async fn on_next(&self, item: T) -> Ack {
        match guard(|| (self.f)(item)) {
            Ok(mapped) => self.downstream.on_next(mapped).await,
            Err(error) => {
                self.downstream.on_error(error).await;
                Ack::Done
            }
        }
    }

    async fn on_complete(&self) {
        self.downstream.on_complete().await;
    }

    async fn on_error(&self, error: FluxionError) {
        self.downstream.on_error(error).await;
    }
}

impl<T: Send + Sync + 'static> Observable<T> {
    /// Transforms every item with `f`. If `f` panics on an item, that item
    /// is replaced by an `on_error` downstream and upstream production stops.
    pub fn map<U, F>(&self, f: F) -> Observable<U>
    where
        U: Send + Sync + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Observable::create(move |observer: Arc<dyn Observer<U>>| {
            let source = source.clone();
            let f = f.clone();
            async move {
                let forwarding = Arc::new(MapObserver {
                    downstream: observer,
                    f: move |item| f(item),
                    _marker: std::marker::PhantomData,
                });
                source.subscribe(forwarding).await
            }
        })
    }
}
