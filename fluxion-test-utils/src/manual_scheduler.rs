// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! [`ManualScheduler`]: a [`Scheduler`] driven by virtual time instead of
//! the wall clock, so tests can assert exactly what ran at exactly which
//! tick instead of racing real timers.

use core::time::Duration;
use std::sync::Arc;

use fluxion_core::{BooleanCancelable, BoxCancelable, BoxFuture, Cancelable, FluxionError};
use fluxion_runtime::Scheduler;
use parking_lot::Mutex;

enum Task {
    Once(BoxFuture<'static, ()>),
    Periodic {
        period: Duration,
        make: Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>,
    },
}

struct Entry {
    due: Duration,
    cancel: Arc<BooleanCancelable>,
    task: Task,
}

struct State {
    now: Duration,
    entries: Vec<Entry>,
    failures: Vec<FluxionError>,
}

/// A [`Scheduler`] with no wall-clock dependency: nothing runs until the
/// test explicitly calls [`ManualScheduler::run_ready`] or
/// [`ManualScheduler::advance`].
///
/// `schedule_now` work becomes due at the current virtual time; `advance`
/// moves that clock forward and runs everything that falls due, including
/// rescheduling periodic tasks for their next tick.
pub struct ManualScheduler {
    state: Mutex<State>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                now: Duration::ZERO,
                entries: Vec::new(),
                failures: Vec::new(),
            }),
        }
    }

    /// Runs every task already due without moving virtual time forward.
    pub async fn run_ready(&self) {
        let now = self.state.lock().now;
        self.drain_due(now).await;
    }

    /// Moves virtual time forward by `by`, then runs everything now due.
    pub async fn advance(&self, by: Duration) {
        let now = {
            let mut state = self.state.lock();
            state.now += by;
            state.now
        };
        self.drain_due(now).await;
    }

    /// Errors reported via [`Scheduler::report_failure`], in report order.
    pub fn failures(&self) -> Vec<FluxionError> {
        self.state.lock().failures.clone()
    }

    async fn drain_due(&self, now: Duration) {
        loop {
            let ready = {
                let mut state = self.state.lock();
                let mut ready = Vec::new();
                let mut i = 0;
                while i < state.entries.len() {
                    if state.entries[i].due <= now {
                        ready.push(state.entries.remove(i));
                    } else {
                        i += 1;
                    }
                }
                ready
            };
            if ready.is_empty() {
                return;
            }

            for entry in ready {
                if entry.cancel.is_canceled() {
                    continue;
                }
                match entry.task {
                    Task::Once(fut) => fut.await,
                    Task::Periodic { period, make } => {
                        make().await;
                        let mut state = self.state.lock();
                        state.entries.push(Entry {
                            due: now + period,
                            cancel: entry.cancel,
                            task: Task::Periodic { period, make },
                        });
                    }
                }
            }
        }
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

struct SharedCancelable(Arc<BooleanCancelable>);

impl Cancelable for SharedCancelable {
    fn cancel(&self) {
        self.0.cancel();
    }

    fn is_canceled(&self) -> bool {
        self.0.is_canceled()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_now(&self, task: BoxFuture<'static, ()>) {
        let mut state = self.state.lock();
        let due = state.now;
        state.entries.push(Entry {
            due,
            cancel: Arc::new(BooleanCancelable::new()),
            task: Task::Once(task),
        });
    }

    fn schedule_after(&self, delay: Duration, task: BoxFuture<'static, ()>) -> BoxCancelable {
        let cancel = Arc::new(BooleanCancelable::new());
        let mut state = self.state.lock();
        let due = state.now + delay;
        state.entries.push(Entry {
            due,
            cancel: cancel.clone(),
            task: Task::Once(task),
        });
        drop(state);
        Box::new(SharedCancelable(cancel))
    }

    fn schedule_periodic(
        &self,
        initial_delay: Duration,
        period: Duration,
        task: Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>,
    ) -> BoxCancelable {
        let cancel = Arc::new(BooleanCancelable::new());
        let mut state = self.state.lock();
        let due = state.now + initial_delay;
        state.entries.push(Entry {
            due,
            cancel: cancel.clone(),
            task: Task::Periodic {
                period,
                make: task,
            },
        });
        drop(state);
        Box::new(SharedCancelable(cancel))
    }

    fn report_failure(&self, error: FluxionError) {
        self.state.lock().failures.push(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluxion_runtime::ScheduleExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn schedule_now_waits_for_run_ready() {
        let scheduler = ManualScheduler::new();
        let ran = Arc::new(AtomicUsize::new(0));
        let flag = ran.clone();
        scheduler.spawn(async move {
            flag.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(ran.load(Ordering::SeqCst), 0);
        scheduler.run_ready().await;
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn schedule_after_waits_for_the_virtual_clock_to_reach_it() {
        let scheduler = ManualScheduler::new();
        let ran = Arc::new(AtomicUsize::new(0));
        let flag = ran.clone();
        scheduler.spawn_after(Duration::from_secs(10), async move {
            flag.fetch_add(1, Ordering::SeqCst);
        });

        scheduler.advance(Duration::from_secs(5)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);

        scheduler.advance(Duration::from_secs(5)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn canceling_a_delayed_task_before_it_is_due_skips_it() {
        let scheduler = ManualScheduler::new();
        let ran = Arc::new(AtomicUsize::new(0));
        let flag = ran.clone();
        let cancelable = scheduler.spawn_after(Duration::from_secs(10), async move {
            flag.fetch_add(1, Ordering::SeqCst);
        });

        cancelable.cancel();
        scheduler.advance(Duration::from_secs(10)).await;
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn periodic_tasks_fire_once_per_elapsed_period() {
        let scheduler = ManualScheduler::new();
        let ticks = Arc::new(AtomicUsize::new(0));
        let flag = ticks.clone();
        let _cancelable = scheduler.spawn_periodic(Duration::ZERO, Duration::from_secs(1), move || {
            let flag = flag.clone();
            async move {
                flag.fetch_add(1, Ordering::SeqCst);
            }
        });

        scheduler.advance(Duration::from_millis(1)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 1);

        scheduler.advance(Duration::from_secs(3)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn report_failure_is_observable() {
        let scheduler = ManualScheduler::new();
        scheduler.report_failure(FluxionError::stream_error("boom"));
        assert_eq!(scheduler.failures().len(), 1);
    }
}
