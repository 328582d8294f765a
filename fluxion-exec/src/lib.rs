// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Callback-style subscription helpers over [`fluxion_observable::Observable`]:
//! sequential ([`SubscribeExt::subscribe_with`]), concurrent fire-and-forget
//! ([`SubscribeConcurrentExt::subscribe_concurrent`]), and switch-latest
//! ([`SubscribeLatestExt::subscribe_latest`]).
//!
//! Every variant resolves a plain `Result<()>` once the underlying
//! observable reaches a terminal state, so callers who just want "run this
//! async closure per item" don't need to hand-write an
//! [`fluxion_observable::Observer`].

#![allow(clippy::multiple_crate_versions)]
#[macro_use]
mod logging;
mod callback;
mod subscribe;
mod subscribe_concurrent;
mod subscribe_latest;

pub use subscribe::SubscribeExt;
pub use subscribe_concurrent::SubscribeConcurrentExt;
pub use subscribe_latest::SubscribeLatestExt;
