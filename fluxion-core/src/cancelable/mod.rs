// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Cancelable handles: idempotent, composable cancellation tokens.
//!
//! [`Cancelable`] is the contract every variant implements: `cancel()` is
//! idempotent and `is_canceled()` reflects the current state. The variants
//! cover the shapes the observer protocol needs:
//!
//! - [`BooleanCancelable`] — a single action run at most once.
//! - [`SingleAssignmentCancelable`] — a forward-reference settable exactly once.
//! - [`CompositeCancelable`] — a dynamic set of children, canceled together.
//! - [`RefCountCancelable`] — completes only once an external cancel *and*
//!   every acquired child has canceled.

mod boolean;
mod composite;
mod ref_counted;
mod single_assignment;

pub use boolean::BooleanCancelable;
pub use composite::{CancelableToken, CompositeCancelable};
pub use ref_counted::RefCountCancelable;
pub use single_assignment::SingleAssignmentCancelable;

/// A handle over an idempotent cancellation operation.
pub trait Cancelable: Send + Sync {
    /// Cancels this handle. Calling this more than once has no additional
    /// effect.
    fn cancel(&self);

    /// Returns `true` if this handle has been canceled.
    fn is_canceled(&self) -> bool;
}

/// A type-erased, heap-allocated [`Cancelable`].
pub type BoxCancelable = Box<dyn Cancelable>;

impl Cancelable for BoxCancelable {
    fn cancel(&self) {
        (**self).cancel();
    }

    fn is_canceled(&self) -> bool {
        (**self).is_canceled()
    }
}

/// A cancelable that has nothing to cancel; already in the canceled state.
///
/// Useful as the return value when `subscribe_fn` fails before any real
/// production was started.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCancelable;

impl Cancelable for NoopCancelable {
    fn cancel(&self) {}

    fn is_canceled(&self) -> bool {
        true
    }
}
