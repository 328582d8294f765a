// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! [`MergeAckBuffer`]: the single-writer acknowledgement chain `merge`
//! builds its fan-in on.

use core::sync::atomic::{AtomicBool, Ordering};

use fluxion_core::{Ack, Acknowledgement, BoxFuture};
use futures::future::{FutureExt, Shared};
use parking_lot::Mutex;

/// Chains a series of acknowledgements from concurrent inner producers into
/// one total order, so that once any of them resolves to `Ack::Done`, every
/// subsequently scheduled ack also resolves to `Done` — and a registered
/// terminal action runs exactly once, after every previously scheduled ack
/// has resolved.
pub struct MergeAckBuffer {
    last: Mutex<Shared<BoxFuture<'static, Ack>>>,
    terminal_scheduled: AtomicBool,
}

impl MergeAckBuffer {
    /// Creates a buffer whose initial state is `Continue`.
    #[must_use]
    pub fn new() -> Self {
        let initial: BoxFuture<'static, Ack> = Box::pin(async { Ack::Continue });
        Self {
            last: Mutex::new(initial.shared()),
            terminal_scheduled: AtomicBool::new(false),
        }
    }

    /// Chains `ack` after whatever was last scheduled, returning a shared
    /// future that resolves to `Done` if either the previous chain or this
    /// ack resolves to `Done`.
    pub fn schedule_next(&self, ack: Acknowledgement) -> Shared<BoxFuture<'static, Ack>> {
        let mut guard = self.last.lock();
        let previous = guard.clone();
        let chained: BoxFuture<'static, Ack> = Box::pin(async move {
            if previous.await.is_done() {
                return Ack::Done;
            }
            ack.resolve().await
        });
        let shared = chained.shared();
        *guard = shared.clone();
        shared
    }

    /// Returns the currently-last scheduled future without chaining
    /// anything new after it — lets a caller wait for everything scheduled
    /// so far to resolve before taking its own action.
    pub fn barrier(&self) -> Shared<BoxFuture<'static, Ack>> {
        self.last.lock().clone()
    }

    /// Chains `terminal_action` after every previously scheduled ack,
    /// running it exactly once. Any `schedule_next` call made after this
    /// one chains after the terminal action and resolves to `Done`.
    pub fn schedule_done(&self, terminal_action: impl FnOnce() + Send + 'static) {
        if self.terminal_scheduled.swap(true, Ordering::AcqRel) {
            return;
        }
        let mut guard = self.last.lock();
        let previous = guard.clone();
        let chained: BoxFuture<'static, Ack> = Box::pin(async move {
            previous.await;
            terminal_action();
            Ack::Done
        });
        *guard = chained.shared();
    }
}

impl Default for MergeAckBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[tokio::test]
    async fn acks_resolve_continue_until_a_done_is_scheduled() {
        let buffer = MergeAckBuffer::new();
        let a = buffer.schedule_next(Acknowledgement::continue_now());
        let b = buffer.schedule_next(Acknowledgement::continue_now());

        assert_eq!(a.await, Ack::Continue);
        assert_eq!(b.await, Ack::Continue);
    }

    #[tokio::test]
    async fn a_done_ack_poisons_every_later_schedule() {
        let buffer = MergeAckBuffer::new();
        let first = buffer.schedule_next(Acknowledgement::done_now());
        let second = buffer.schedule_next(Acknowledgement::continue_now());

        assert_eq!(first.await, Ack::Done);
        assert_eq!(second.await, Ack::Done);
    }

    #[tokio::test]
    async fn terminal_action_runs_exactly_once_after_prior_acks() {
        let buffer = MergeAckBuffer::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let tracked = {
            let order = order.clone();
            buffer.schedule_next(Acknowledgement::later(async move {
                order.lock().push(1);
                Ack::Continue
            }))
        };

        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        buffer.schedule_done(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        // Calling schedule_done twice must not run the action twice.
        let counter = runs.clone();
        buffer.schedule_done(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tracked.await;
        // Drive the terminal chain by scheduling one more (poisoned) ack.
        let after = buffer.schedule_next(Acknowledgement::continue_now());
        assert_eq!(after.await, Ack::Done);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
