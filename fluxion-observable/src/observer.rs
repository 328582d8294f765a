// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The `Observer` contract: `on_next`/`on_complete`/`on_error` with an
//! awaited back-pressure acknowledgement.

use async_trait::async_trait;
use fluxion_core::{Ack, FluxionError};

/// A receiver of a stream's events.
///
/// The grammar every implementor (and every wrapper in this crate) upholds:
/// any number of `on_next` calls, each awaited for its [`Ack`] before the
/// next is issued, followed by at most one terminal call to `on_complete`
/// or `on_error`. After a terminal call, or after any `on_next` resolves to
/// [`Ack::Done`], no further calls are made.
#[async_trait]
pub trait Observer<T>: Send + Sync {
    /// Delivers the next item, returning whether the caller should continue
    /// producing.
    async fn on_next(&self, item: T) -> Ack;

    /// Signals successful completion. Terminal.
    async fn on_complete(&self);

    /// Signals failure. Terminal.
    async fn on_error(&self, error: FluxionError);
}
