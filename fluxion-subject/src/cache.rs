// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The three caching strategies a subject's state carries: nothing
//! (`PublishCache`), the most recent item (`BehaviorCache`), or everything
//! (`ReplayCache`). A new subscriber is handed `history()` before live
//! events, so this one trait is what distinguishes the three subject kinds.

/// What a subject remembers, and what it hands a newly-subscribing observer
/// before switching it over to live events.
pub trait SubjectCache<T>: Clone + Send + Sync + 'static {
    /// Folds a freshly emitted item into the cache.
    fn record(&mut self, item: &T);

    /// The items to replay to a subscriber joining right now, oldest first.
    fn history(&self) -> Vec<T>;
}

/// Caches nothing. `PublishSubject`'s strategy: late subscribers only see
/// events emitted after they subscribe.
#[derive(Clone, Copy, Debug, Default)]
pub struct PublishCache;

impl<T: Clone + Send + Sync + 'static> SubjectCache<T> for PublishCache {
    fn record(&mut self, _item: &T) {}

    fn history(&self) -> Vec<T> {
        Vec::new()
    }
}

/// Caches the most recently emitted item, seeded with an initial value.
/// `BehaviorSubject`'s strategy.
#[derive(Clone, Debug)]
pub struct BehaviorCache<T> {
    last: T,
}

impl<T> BehaviorCache<T> {
    /// Seeds the cache with `initial`, visible to any subscriber that joins
    /// before the first `on_next`.
    pub fn new(initial: T) -> Self {
        Self { last: initial }
    }
}

impl<T: Clone + Send + Sync + 'static> SubjectCache<T> for BehaviorCache<T> {
    fn record(&mut self, item: &T) {
        self.last = item.clone();
    }

    fn history(&self) -> Vec<T> {
        vec![self.last.clone()]
    }
}

/// Caches every item ever emitted. `ReplaySubject`'s strategy.
#[derive(Clone, Debug, Default)]
pub struct ReplayCache<T> {
    history: Vec<T>,
}

impl<T> ReplayCache<T> {
    /// An empty replay cache.
    pub fn new() -> Self {
        Self { history: Vec::new() }
    }
}

impl<T: Clone + Send + Sync + 'static> SubjectCache<T> for ReplayCache<T> {
    fn record(&mut self, item: &T) {
        self.history.push(item.clone());
    }

    fn history(&self) -> Vec<T> {
        self.history.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_cache_never_remembers_anything() {
        let mut cache = PublishCache;
        cache.record(&1);
        cache.record(&2);
        assert_eq!(cache.history(), Vec::<i32>::new());
    }

    #[test]
    fn behavior_cache_remembers_only_the_latest_item() {
        let mut cache = BehaviorCache::new(0);
        assert_eq!(cache.history(), vec![0]);
        cache.record(&1);
        cache.record(&2);
        assert_eq!(cache.history(), vec![2]);
    }

    #[test]
    fn replay_cache_remembers_every_item_in_order() {
        let mut cache = ReplayCache::new();
        cache.record(&1);
        cache.record(&2);
        cache.record(&3);
        assert_eq!(cache.history(), vec![1, 2, 3]);
    }
}
