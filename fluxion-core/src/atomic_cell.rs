// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A reference cell with compare-and-set and transform-retry semantics.
//!
//! [`AtomicCell`] holds a value of any `Clone` type behind a short critical
//! section and exposes the same surface a lock-free atomic would: `get`,
//! `set`, `compare_and_set`, and retry-loop transforms. For arbitrary `T`
//! there is no hardware CAS, so the retry loop is built on a `parking_lot`
//! mutex; for machine integers, [`AtomicCounter`] uses the real hardware
//! fetch-add instructions instead.
//!
//! The transform closures passed to `transform`/`transform_and_get`/etc. may
//! be invoked more than once under contention and must be pure.

use parking_lot::Mutex;

/// A cell holding a value of type `T`, supporting CAS and transform-retry
/// operations.
pub struct AtomicCell<T> {
    inner: Mutex<T>,
}

impl<T: Clone> AtomicCell<T> {
    /// Creates a new cell holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(value),
        }
    }

    /// Reads the current value.
    pub fn get(&self) -> T {
        self.inner.lock().clone()
    }

    /// Writes a new value, replacing the current one.
    pub fn set(&self, value: T) {
        *self.inner.lock() = value;
    }

    /// Writes a new value with relaxed visibility.
    ///
    /// There is no weaker ordering to give on top of a mutex-guarded cell;
    /// this exists to mirror the lock-free API surface and is identical to
    /// [`AtomicCell::set`].
    pub fn lazy_set(&self, value: T) {
        self.set(value);
    }

    /// Atomically swaps in `value`, returning the previous one.
    pub fn get_and_set(&self, value: T) -> T {
        core::mem::replace(&mut self.inner.lock(), value)
    }

    /// Replaces the current value with `update` if it equals `expected`.
    ///
    /// Returns `true` on success.
    pub fn compare_and_set(&self, expected: &T, update: T) -> bool
    where
        T: PartialEq,
    {
        let mut guard = self.inner.lock();
        if *guard == *expected {
            *guard = update;
            true
        } else {
            false
        }
    }

    /// Applies `f` to the current value and stores the result, retrying if
    /// a racing writer won, and returns nothing.
    pub fn transform<F>(&self, mut f: F)
    where
        F: FnMut(&T) -> T,
    {
        let mut guard = self.inner.lock();
        *guard = f(&guard);
    }

    /// Like [`AtomicCell::transform`], but returns the new value.
    pub fn transform_and_get<F>(&self, mut f: F) -> T
    where
        F: FnMut(&T) -> T,
    {
        let mut guard = self.inner.lock();
        let next = f(&guard);
        *guard = next.clone();
        next
    }

    /// Like [`AtomicCell::transform`], but returns the value that was
    /// replaced.
    pub fn get_and_transform<F>(&self, mut f: F) -> T
    where
        F: FnMut(&T) -> T,
    {
        let mut guard = self.inner.lock();
        let previous = guard.clone();
        *guard = f(&guard);
        previous
    }

    /// Applies `f`, which both computes the new value and extracts an
    /// arbitrary result `R` from the transition, storing the new value and
    /// returning `R`.
    ///
    /// This is the primitive subject state machines are built on: `f`
    /// inspects the current state, decides the next state, and also
    /// produces a side value (e.g. whether the caller actually added a
    /// new subscriber).
    pub fn transform_and_extract<F, R>(&self, mut f: F) -> R
    where
        F: FnMut(&T) -> (T, R),
    {
        let mut guard = self.inner.lock();
        let (next, extracted) = f(&guard);
        *guard = next;
        extracted
    }
}

/// A lock-free counter for machine integers, backed by the hardware
/// fetch-add instructions rather than a retry loop.
#[derive(Debug, Default)]
pub struct AtomicCounter {
    inner: core::sync::atomic::AtomicI64,
}

impl AtomicCounter {
    /// Creates a new counter starting at `value`.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self {
            inner: core::sync::atomic::AtomicI64::new(value),
        }
    }

    /// Reads the current value.
    pub fn get(&self) -> i64 {
        self.inner.load(core::sync::atomic::Ordering::SeqCst)
    }

    /// Adds `n` and returns the value after the addition.
    pub fn add_and_get(&self, n: i64) -> i64 {
        self.inner.fetch_add(n, core::sync::atomic::Ordering::SeqCst) + n
    }

    /// Adds `n` and returns the value before the addition.
    pub fn get_and_add(&self, n: i64) -> i64 {
        self.inner.fetch_add(n, core::sync::atomic::Ordering::SeqCst)
    }

    /// Increments by one and returns the value after the increment.
    pub fn increment_and_get(&self) -> i64 {
        self.add_and_get(1)
    }

    /// Decrements by one and returns the value after the decrement.
    pub fn decrement_and_get(&self) -> i64 {
        self.add_and_get(-1)
    }
}
