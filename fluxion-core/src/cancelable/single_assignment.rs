// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::sync::atomic::{AtomicBool, Ordering};
use parking_lot::Mutex;

use super::{BoxCancelable, Cancelable};

/// A cancelable forward-reference: the target is settable exactly once.
///
/// Used where a subscription needs to hand back a cancelable before the
/// real cancelable it wraps is known — e.g. an operator that builds its
/// cancelable result only after the upstream `subscribe` call returns.
///
/// Setting the target after this handle was already canceled cancels the
/// target immediately instead of storing it.
pub struct SingleAssignmentCancelable {
    canceled: AtomicBool,
    target: Mutex<Option<BoxCancelable>>,
}

impl SingleAssignmentCancelable {
    /// Creates an empty, unassigned handle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            canceled: AtomicBool::new(false),
            target: Mutex::new(None),
        }
    }

    /// Assigns the target cancelable.
    ///
    /// # Panics
    ///
    /// Panics if a target has already been assigned — this is a contract
    /// violation by the caller, not a runtime race, since assignment is
    /// expected to happen exactly once per handle.
    pub fn set(&self, target: BoxCancelable) {
        if self.canceled.load(Ordering::Acquire) {
            target.cancel();
            return;
        }

        let mut guard = self.target.lock();
        assert!(
            guard.is_none(),
            "SingleAssignmentCancelable::set called more than once"
        );
        *guard = Some(target);

        // A cancel may have raced in between our first check and taking the
        // lock; re-check before releasing it so we never leave an assigned
        // target un-canceled.
        if self.canceled.load(Ordering::Acquire) {
            if let Some(t) = guard.take() {
                t.cancel();
            }
        }
    }
}

impl Default for SingleAssignmentCancelable {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancelable for SingleAssignmentCancelable {
    fn cancel(&self) {
        if self.canceled.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(target) = self.target.lock().take() {
            target.cancel();
        }
    }

    fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }
}
