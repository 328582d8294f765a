// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The scheduler collaborator: submits work, reports failures, measures time.
//!
//! Every operator that needs to hop execution context (`observe_on`,
//! `subscribe_on`), delay a task (`interval`), or report an otherwise
//! unobservable failure (an ack future that panics with no observer left to
//! tell) is written against [`Scheduler`] rather than against Tokio
//! directly. [`TokioScheduler`] is the crate's own default implementation,
//! used by the doctests and the default `Observable` constructors.

use core::future::Future;
use core::time::Duration;
use std::sync::Arc;

use fluxion_core::{BoxCancelable, BoxFuture, Cancelable, FluxionError};

/// Submits work for execution and reports scheduler-level failures.
///
/// Every method takes an already-boxed future rather than a generic one, so
/// the trait stays dyn-compatible: operators and observers hold their
/// collaborator as `Arc<dyn Scheduler>` rather than threading a type
/// parameter through the whole operator algebra. [`IntoSchedule`] below
/// hides the boxing from callers.
pub trait Scheduler: Send + Sync + 'static {
    /// Runs `task` as soon as possible, not necessarily synchronously.
    fn schedule_now(&self, task: BoxFuture<'static, ()>);

    /// Runs `task` after `delay` elapses. Canceling the returned handle
    /// before the delay elapses prevents `task` from running at all.
    fn schedule_after(&self, delay: Duration, task: BoxFuture<'static, ()>) -> BoxCancelable;

    /// Runs `task` once after `initial_delay`, then again every `period`
    /// until the returned handle is canceled.
    ///
    /// `task` is called fresh for each tick since ticks may in principle
    /// overlap if a previous tick's future is still pending when the next
    /// one fires; callers that need at-most-one-in-flight semantics should
    /// serialize inside `task`.
    fn schedule_periodic(
        &self,
        initial_delay: Duration,
        period: Duration,
        task: Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>,
    ) -> BoxCancelable;

    /// Reports a failure that has no subscriber left to observe it —
    /// e.g. an ack future that resolved to an error after the downstream
    /// had already unsubscribed.
    fn report_failure(&self, error: FluxionError);
}

/// Extension methods providing the ergonomic generic call sites that
/// [`Scheduler`]'s dyn-compatible core methods can't offer directly.
pub trait ScheduleExt: Scheduler {
    /// Runs `task` as soon as possible, boxing it for the caller.
    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.schedule_now(Box::pin(task));
    }

    /// Runs `task` after `delay`, boxing it for the caller.
    fn spawn_after<F>(&self, delay: Duration, task: F) -> BoxCancelable
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.schedule_after(delay, Box::pin(task))
    }

    /// Runs `task` periodically, boxing its per-tick futures for the caller.
    fn spawn_periodic<F, Fut>(
        &self,
        initial_delay: Duration,
        period: Duration,
        task: F,
    ) -> BoxCancelable
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.schedule_periodic(
            initial_delay,
            period,
            Arc::new(move || Box::pin(task()) as BoxFuture<'static, ()>),
        )
    }
}

impl<S: Scheduler + ?Sized> ScheduleExt for S {}

/// The Tokio-backed [`Scheduler`] this crate uses by default.
///
/// Failures reported via [`Scheduler::report_failure`] are logged through
/// `tracing` when the `tracing` feature is enabled, and otherwise dropped —
/// there is no supervisor to forward them to outside of what the caller
/// wires up itself.
#[derive(Debug, Clone, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    /// Creates a new handle. Cheap: this type carries no state of its own,
    /// it only submits work to the ambient Tokio runtime.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_now(&self, task: BoxFuture<'static, ()>) {
        tokio::spawn(task);
    }

    fn schedule_after(&self, delay: Duration, task: BoxFuture<'static, ()>) -> BoxCancelable {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
        Box::new(JoinHandleCancelable(handle))
    }

    fn schedule_periodic(
        &self,
        initial_delay: Duration,
        period: Duration,
        task: Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>,
    ) -> BoxCancelable {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(initial_delay).await;
            loop {
                task().await;
                tokio::time::sleep(period).await;
            }
        });
        Box::new(JoinHandleCancelable(handle))
    }

    fn report_failure(&self, error: FluxionError) {
        #[cfg(feature = "tracing")]
        tracing::error!(error = %error, "unhandled scheduler failure");
        #[cfg(not(feature = "tracing"))]
        let _ = error;
    }
}

struct JoinHandleCancelable(tokio::task::JoinHandle<()>);

impl Cancelable for JoinHandleCancelable {
    fn cancel(&self) {
        self.0.abort();
    }

    fn is_canceled(&self) -> bool {
        self.0.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn schedule_now_runs_the_task() {
        let scheduler = TokioScheduler::new();
        let ran = Arc::new(AtomicUsize::new(0));
        let flag = ran.clone();
        scheduler.spawn(async move {
            flag.fetch_add(1, Ordering::SeqCst);
        });
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn schedule_after_can_be_canceled_before_it_fires() {
        let scheduler = TokioScheduler::new();
        let ran = Arc::new(AtomicUsize::new(0));
        let flag = ran.clone();
        let handle = scheduler.spawn_after(Duration::from_millis(50), async move {
            flag.fetch_add(1, Ordering::SeqCst);
        });
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn schedule_periodic_ticks_until_canceled() {
        let scheduler = TokioScheduler::new();
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let handle = scheduler.spawn_periodic(Duration::from_millis(1), Duration::from_millis(5), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(30)).await;
        handle.cancel();
        let seen = ticks.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
        assert!(seen >= 2);
    }
}
