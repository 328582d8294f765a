// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! `publish`/`behavior`/`replay`: convenience constructors over
//! [`Observable::multicast`] and the three subject kinds.

use fluxion_observable::{Connectable, Observable};

use crate::subjects::{BehaviorSubject, PublishSubject, ReplaySubject};

/// Multicast convenience methods, one per subject kind.
pub trait ObservableSubjectExt<T: Clone + Send + Sync + 'static> {
    /// Shares this observable's production through a fresh [`PublishSubject`].
    fn publish(&self) -> Connectable<T>;

    /// Shares this observable's production through a fresh [`BehaviorSubject`]
    /// seeded with `initial`.
    fn behavior(&self, initial: T) -> Connectable<T>;

    /// Shares this observable's production through a fresh [`ReplaySubject`].
    fn replay(&self) -> Connectable<T>;
}

impl<T: Clone + Send + Sync + 'static> ObservableSubjectExt<T> for Observable<T> {
    fn publish(&self) -> Connectable<T> {
        self.multicast(PublishSubject::new())
    }

    fn behavior(&self, initial: T) -> Connectable<T> {
        self.multicast(BehaviorSubject::new(initial))
    }

    fn replay(&self) -> Connectable<T> {
        self.multicast(ReplaySubject::new())
    }
}
