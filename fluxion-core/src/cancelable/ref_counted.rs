// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::Cancelable;

struct Inner {
    // Starts at 1, representing the "held" reference for the external
    // cancel. Each `acquire()` adds one; each child cancel and the external
    // cancel each subtract one. The completion action fires exactly once,
    // the instant this reaches zero.
    outstanding: AtomicI64,
    external_canceled: AtomicBool,
    fired: AtomicBool,
    on_complete: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Inner {
    fn release(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            if !self.fired.swap(true, Ordering::AcqRel) {
                if let Some(action) = self.on_complete.lock().take() {
                    action();
                }
            }
        }
    }
}

/// A cancelable that completes only once an external `cancel()` has been
/// called *and* every child acquired via [`RefCountCancelable::acquire`] has
/// itself been canceled.
///
/// This models the "outer subscription holds the line open until every
/// inner subscription it spawned has finished" pattern used by fan-out
/// operators (merge, a multicast fan-out waiting on every subscriber).
pub struct RefCountCancelable {
    inner: Arc<Inner>,
}

/// A child handle acquired from a [`RefCountCancelable`].
///
/// Canceling a child releases its reference on the parent; it does not
/// cancel the parent's other children.
pub struct ChildCancelable {
    inner: Arc<Inner>,
    released: AtomicBool,
}

impl RefCountCancelable {
    /// Creates a ref-counted cancelable with no completion action.
    #[must_use]
    pub fn new() -> Self {
        Self::with_completion(|| {})
    }

    /// Creates a ref-counted cancelable that runs `on_complete` exactly once,
    /// when the external cancel has fired and every acquired child has been
    /// canceled.
    pub fn with_completion(on_complete: impl FnOnce() + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                outstanding: AtomicI64::new(1),
                external_canceled: AtomicBool::new(false),
                fired: AtomicBool::new(false),
                on_complete: Mutex::new(Some(Box::new(on_complete))),
            }),
        }
    }

    /// Acquires a new child reference. The completion action cannot fire
    /// until this child (and every other outstanding reference) is canceled.
    #[must_use]
    pub fn acquire(&self) -> ChildCancelable {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        ChildCancelable {
            inner: self.inner.clone(),
            released: AtomicBool::new(false),
        }
    }
}

impl Default for RefCountCancelable {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancelable for RefCountCancelable {
    fn cancel(&self) {
        if self.inner.external_canceled.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.release();
    }

    fn is_canceled(&self) -> bool {
        self.inner.external_canceled.load(Ordering::Acquire)
    }
}

impl Cancelable for ChildCancelable {
    fn cancel(&self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        self.inner.release();
    }

    fn is_canceled(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}
