// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The acknowledgement back-pressure signal.
//!
//! Every `Observer::on_next` call returns an [`Acknowledgement`]: the
//! consumer's way of telling the producer "send me the next item" ([`Ack::Continue`])
//! or "stop, I'm done" ([`Ack::Done`]). The signal may resolve immediately or
//! asynchronously; [`Acknowledgement`] keeps the synchronous case allocation-free.

use core::future::Future;
use core::pin::Pin;

/// A boxed, type-erased future — used throughout the observer protocol for
/// anything that must be able to suspend (acks, terminal notifications).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The two-valued back-pressure signal a consumer returns from `on_next`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ack {
    /// The consumer is ready for the next item.
    Continue,
    /// The consumer is done; the producer must stop emitting.
    Done,
}

impl Ack {
    /// Returns `true` if this is [`Ack::Done`].
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Ack::Done)
    }

    /// Returns `true` if this is [`Ack::Continue`].
    #[must_use]
    pub const fn is_continue(self) -> bool {
        matches!(self, Ack::Continue)
    }
}

/// An [`Ack`] that may resolve synchronously or be backed by a pending future.
///
/// This is the tight representation design notes §9 calls for: the hot path
/// (a synchronously-ready ack) never allocates, while a consumer that must
/// suspend can still return a boxed future.
pub enum Acknowledgement {
    /// The ack is already known.
    Now(Ack),
    /// The ack will resolve later.
    Later(BoxFuture<'static, Ack>),
}

impl Acknowledgement {
    /// Builds an already-resolved `Continue` acknowledgement.
    #[must_use]
    pub const fn continue_now() -> Self {
        Self::Now(Ack::Continue)
    }

    /// Builds an already-resolved `Done` acknowledgement.
    #[must_use]
    pub const fn done_now() -> Self {
        Self::Now(Ack::Done)
    }

    /// Wraps a future that will resolve to an [`Ack`] later.
    pub fn later(fut: impl Future<Output = Ack> + Send + 'static) -> Self {
        Self::Later(Box::pin(fut))
    }

    /// Resolves this acknowledgement, awaiting the inner future if necessary.
    pub async fn resolve(self) -> Ack {
        match self {
            Self::Now(ack) => ack,
            Self::Later(fut) => fut.await,
        }
    }

    /// `true` if this ack is already known to be `Done` without awaiting.
    ///
    /// Used by fast paths that want to avoid spawning work when the previous
    /// ack is synchronously known to have ended the stream.
    #[must_use]
    pub fn is_done_now(&self) -> bool {
        matches!(self, Self::Now(Ack::Done))
    }
}

impl From<Ack> for Acknowledgement {
    fn from(ack: Ack) -> Self {
        Self::Now(ack)
    }
}

/// Chains two acknowledgements so the overall result is their logical
/// conjunction: `Done` if either resolves to `Done`, `Continue` only if both do.
///
/// This is the building block behind the merge acknowledgement buffer
/// (`fluxion-observable::merge_ack_buffer`) and subject fan-out, where the
/// caller must observe acceptance across multiple downstream branches as a
/// single acknowledgement.
pub async fn chain(first: Acknowledgement, second: Acknowledgement) -> Ack {
    if first.resolve().await.is_done() {
        return Ack::Done;
    }
    second.resolve().await
}
