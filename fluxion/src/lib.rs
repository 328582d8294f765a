// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Fluxion
//!
//! A reactive streams core: the `Observer`/`Ack` push-with-backpressure
//! protocol, a cold and re-subscribable `Observable` with an operator
//! algebra on top of it, and multicast subjects for sharing one production
//! across many subscribers.
//!
//! ## Overview
//!
//! Every item flows from an [`Observable`] to an [`Observer`] one at a time:
//! the observable calls `on_next`, waits for the returned [`Ack`] before
//! sending the next item, and calls `on_complete` or `on_error` exactly once
//! to end the stream. That's the back-pressure contract the whole crate is
//! built on — an observer that is still busy with one item is never handed
//! another.
//!
//! - **Sources**: [`Observable::create`], [`Observable::from_iterable`]
//! - **Operators**: `map`, `filter`, `scan`, `take`, `drop`, `merge`,
//!   `concat`, `zip`, `observe_on`/`subscribe_on`, `materialize`, and more —
//!   all inherent methods on [`Observable`]
//! - **Multicast**: [`ObservableSubjectExt::publish`],
//!   [`ObservableSubjectExt::behavior`], [`ObservableSubjectExt::replay`], or
//!   construct a [`PublishSubject`], [`BehaviorSubject`], or [`ReplaySubject`]
//!   directly
//! - **Callback subscription**: [`SubscribeExt::subscribe_with`],
//!   [`SubscribeConcurrentExt::subscribe_concurrent`],
//!   [`SubscribeLatestExt::subscribe_latest`] for callers who don't want to
//!   hand-write an [`Observer`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fluxion_rx::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let scheduler = Arc::new(TokioScheduler::new());
//!     let source = Observable::from_iterable(vec![1, 2, 3], scheduler)
//!         .map(|n| n * 2)
//!         .filter(|n| *n > 2);
//!
//!     source
//!         .subscribe_with(
//!             |item: i32, _token| async move {
//!                 println!("{item}");
//!                 Ok::<(), std::convert::Infallible>(())
//!             },
//!             |_: std::convert::Infallible| {},
//!             None,
//!         )
//!         .await
//!         .unwrap();
//! }
//! ```

pub use fluxion_core::{
    Ack, Acknowledgement, BooleanCancelable, BoxCancelable, BoxFuture, Cancelable,
    CancellationToken, FluxionError, Notification, Result, ResultExt,
};
pub use fluxion_exec::{SubscribeConcurrentExt, SubscribeExt, SubscribeLatestExt};
pub use fluxion_observable::{
    BufferedObserver, Connectable, ConnectableObserver, Observable, Observer, SafeObserver,
    Subject,
};
pub use fluxion_runtime::{ScheduleExt, Scheduler, TokioScheduler};
pub use fluxion_subject::{BehaviorSubject, ObservableSubjectExt, PublishSubject, ReplaySubject};

/// Convenient glob import covering the traits and types most call sites need:
/// the observable/observer protocol, the subject constructors and their
/// `publish`/`behavior`/`replay` convenience methods, the default scheduler,
/// and the callback subscription extensions.
pub mod prelude {
    pub use crate::{
        Ack, BehaviorSubject, Cancelable, CancellationToken, Connectable, FluxionError,
        Observable, Observer, ObservableSubjectExt, PublishSubject, ReplaySubject, Result,
        ScheduleExt, Scheduler, Subject, SubscribeConcurrentExt, SubscribeExt,
        SubscribeLatestExt, TokioScheduler,
    };
}
