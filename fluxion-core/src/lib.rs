// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]

//! Core types shared by every Fluxion crate: the acknowledgement
//! back-pressure signal, the cancelable family, the atomic state cell, the
//! cancellation token, reified notifications, and the crate-wide error type.
//!
//! Nothing here depends on a scheduler or an observer implementation — those
//! live in `fluxion-runtime` and `fluxion-observable` respectively. This
//! crate is the vocabulary the rest of the workspace is written against.

pub mod ack;
pub mod atomic_cell;
pub mod cancelable;
pub mod cancellation_token;
pub mod error;
pub mod fluxion_mutex;
pub mod fluxion_task;
pub mod notification;

pub use ack::{Ack, Acknowledgement, BoxFuture};
pub use atomic_cell::{AtomicCell, AtomicCounter};
pub use cancelable::{
    BooleanCancelable, BoxCancelable, CancelableToken, Cancelable, CompositeCancelable,
    NoopCancelable, RefCountCancelable, SingleAssignmentCancelable,
};
pub use cancellation_token::{Cancelled, CancellationToken};
pub use error::{FluxionError, IntoFluxionError, Result, ResultExt};
pub use fluxion_task::FluxionTask;
pub use notification::Notification;
