// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Tokio-backed task spawning with cooperative cancellation.

use crate::CancellationToken;
use core::future::Future;

/// A spawned background task, canceled automatically when dropped.
///
/// `FluxionTask` is the primitive `fluxion-runtime`'s scheduler and
/// `fluxion-observable`'s `observe_on`/`subscribe_on` operators are built on:
/// the spawned future receives a [`CancellationToken`] and is expected to
/// check it at its own checkpoints (between items, at the top of a loop) to
/// exit promptly when asked.
///
/// # Examples
///
/// ```
/// use fluxion_core::FluxionTask;
///
/// # #[tokio::main]
/// # async fn main() {
/// let task = FluxionTask::spawn(|cancel| async move {
///     while !cancel.is_cancelled() {
///         tokio::task::yield_now().await;
///     }
/// });
///
/// task.cancel();
/// # }
/// ```
#[derive(Debug)]
pub struct FluxionTask {
    cancel: CancellationToken,
}

impl FluxionTask {
    /// Spawns `f` on the Tokio runtime, passing it a fresh cancellation
    /// token. Dropping the returned handle cancels the token; it does not
    /// await the task's completion.
    pub fn spawn<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        tokio::spawn(f(cancel.clone()));
        Self { cancel }
    }

    /// Requests cancellation without waiting for the task to observe it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// `true` once `cancel()` has been called (or the handle was dropped).
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for FluxionTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn cancel_is_observed_by_the_spawned_future() {
        let observed = Arc::new(AtomicBool::new(false));
        let flag = observed.clone();
        let task = FluxionTask::spawn(move |cancel| async move {
            cancel.cancelled().await;
            flag.store(true, Ordering::SeqCst);
        });

        task.cancel();
        // Give the spawned task a chance to run.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert!(observed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn drop_cancels() {
        let observed = Arc::new(AtomicBool::new(false));
        let flag = observed.clone();
        let task = FluxionTask::spawn(move |cancel| async move {
            cancel.cancelled().await;
            flag.store(true, Ordering::SeqCst);
        });
        drop(task);
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        assert!(observed.load(Ordering::SeqCst));
    }
}
