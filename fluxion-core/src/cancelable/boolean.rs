// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::sync::atomic::{AtomicBool, Ordering};
use parking_lot::Mutex;

use super::Cancelable;

/// A cancelable wrapping a single action, run at most once at cancel time.
///
/// `BooleanCancelable` is the simplest variant: it has no children, no
/// forward reference, just a flag and an optional cleanup action.
pub struct BooleanCancelable {
    canceled: AtomicBool,
    action: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl BooleanCancelable {
    /// Creates a cancelable with no action; `cancel()` only flips the flag.
    #[must_use]
    pub fn new() -> Self {
        Self {
            canceled: AtomicBool::new(false),
            action: Mutex::new(None),
        }
    }

    /// Creates a cancelable that runs `action` the first time it is canceled.
    pub fn from_action(action: impl FnOnce() + Send + 'static) -> Self {
        Self {
            canceled: AtomicBool::new(false),
            action: Mutex::new(Some(Box::new(action))),
        }
    }
}

impl Default for BooleanCancelable {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancelable for BooleanCancelable {
    fn cancel(&self) {
        if self.canceled.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(action) = self.action.lock().take() {
            action();
        }
    }

    fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }
}
