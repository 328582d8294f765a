// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `filter`: forward items where the predicate holds, otherwise acknowledge
//! `Continue` without bothering the downstream.

use std::sync::Arc;

use async_trait::async_trait;
use fluxion_core::{Ack, FluxionError};

use crate::operators::guard;
use crate::{Observable, Observer};

struct FilterObserver<T, F> {
    downstream: Arc<dyn Observer<T>>,
    predicate: F,
}

#[async_trait]
impl<T, F> Observer<T> for FilterObserver<T, F>
where
    T: Send + Sync + 'static,
    F: Fn(&T) -> bool + Send + Sync + 'static,
{
    async fn on_next(&self, item: T) -> Ack {
        match guard(|| (self.predicate)(&item)) {
            Ok(true) => self.downstream.on_next(item).await,
            Ok(false) => Ack::Continue,
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
    /// Forwards only the items for which `predicate` returns `true`.
    pub fn filter<F>(&self, predicate: F) -> Observable<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Observable::create(move |observer: Arc<dyn Observer<T>>| {
            let source = source.clone();
            let predicate = predicate.clone();
            async move {
                let forwarding = Arc::new(FilterObserver {
                    downstream: observer,
                    predicate: move |item: &T| predicate(item),
                });
                source.subscribe(forwarding).await
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::RecordingObserver;
    use crate::Observable;
    use std::sync::Arc;

    #[tokio::test]
    async fn drops_items_that_fail_the_predicate() {
        let recorder = Arc::new(RecordingObserver::<i32>::new());
        Observable::from_iterable(
            vec![1, 2, 3, 4, 5],
            Arc::new(fluxion_runtime::TokioScheduler::new()),
        )
        .filter(|x| x % 2 == 0)
        .subscribe(recorder.clone())
        .await;
        tokio::time::sleep(core::time::Duration::from_millis(20)).await;
        assert_eq!(recorder.items(), vec![2, 4]);
        assert_eq!(recorder.complete_count(), 1);
    }
}
