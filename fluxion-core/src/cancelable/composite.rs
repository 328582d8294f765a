// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::collections::HashMap;

use parking_lot::Mutex;

use super::{BoxCancelable, Cancelable};

/// A handle returned by [`CompositeCancelable::push`], usable to remove the
/// corresponding child before the composite itself is canceled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelableToken(u64);

/// A cancelable holding a dynamic set of children, all canceled together.
///
/// Children can be added and removed while the composite is alive; once the
/// composite itself is canceled, any further child handed to `push` is
/// canceled immediately instead of being retained.
pub struct CompositeCancelable {
    canceled: AtomicBool,
    next_id: AtomicU64,
    children: Mutex<HashMap<u64, BoxCancelable>>,
}

impl CompositeCancelable {
    /// Creates an empty composite.
    #[must_use]
    pub fn new() -> Self {
        Self {
            canceled: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
            children: Mutex::new(HashMap::new()),
        }
    }

    /// Adds a child, returning a token that can later be passed to
    /// [`CompositeCancelable::remove`].
    ///
    /// If the composite has already been canceled, `child` is canceled
    /// immediately and the returned token refers to nothing.
    pub fn push(&self, child: BoxCancelable) -> CancelableToken {
        if self.canceled.load(Ordering::Acquire) {
            child.cancel();
            return CancelableToken(0);
        }

        let id = self.next_id.fetch_add(1, Ordering::AcqRel);
        self.children.lock().insert(id, child);

        // The composite may have been canceled between our check and the
        // insert; re-check so we never strand a live child in a canceled
        // composite.
        if self.canceled.load(Ordering::Acquire) {
            if let Some(c) = self.children.lock().remove(&id) {
                c.cancel();
            }
        }

        CancelableToken(id)
    }

    /// Removes a child without canceling it.
    pub fn remove(&self, token: CancelableToken) {
        self.children.lock().remove(&token.0);
    }

    /// Number of children currently tracked.
    pub fn len(&self) -> usize {
        self.children.lock().len()
    }

    /// `true` if no children are currently tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CompositeCancelable {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancelable for CompositeCancelable {
    fn cancel(&self) {
        if self.canceled.swap(true, Ordering::AcqRel) {
            return;
        }
        for (_, child) in self.children.lock().drain() {
            child.cancel();
        }
    }

    fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }
}

impl core::ops::AddAssign<BoxCancelable> for CompositeCancelable {
    fn add_assign(&mut self, child: BoxCancelable) {
        let _ = self.push(child);
    }
}

impl core::ops::SubAssign<CancelableToken> for CompositeCancelable {
    fn sub_assign(&mut self, token: CancelableToken) {
        self.remove(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancelable::BooleanCancelable;
    use std::sync::Arc;

    fn counting(n: &Arc<AtomicU64>) -> BoxCancelable {
        let flag = n.clone();
        Box::new(BooleanCancelable::from_action(move || {
            flag.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[test]
    fn cancel_cancels_all_children_and_clears() {
        let composite = CompositeCancelable::new();
        let count = Arc::new(AtomicU64::new(0));
        composite.push(counting(&count));
        composite.push(counting(&count));
        assert_eq!(composite.len(), 2);

        composite.cancel();

        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert!(composite.is_empty());
    }

    #[test]
    fn push_after_cancel_cancels_immediately() {
        let composite = CompositeCancelable::new();
        composite.cancel();

        let count = Arc::new(AtomicU64::new(0));
        composite.push(counting(&count));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(composite.is_empty());
    }

    #[test]
    fn remove_drops_child_without_canceling() {
        let composite = CompositeCancelable::new();
        let count = Arc::new(AtomicU64::new(0));
        let token = composite.push(counting(&count));
        composite.remove(token);

        assert!(composite.is_empty());
        composite.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn add_assign_and_sub_assign_operators() {
        let mut composite = CompositeCancelable::new();
        let count = Arc::new(AtomicU64::new(0));
        composite += counting(&count);
        assert_eq!(composite.len(), 1);
        composite.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
