// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The Fluxion Observable/Observer protocol and its operator algebra.
//!
//! This crate defines the push-with-backpressure contract ([`Observer`],
//! [`Ack`]) and the cold, re-subscribable [`Observable`] built on top of it,
//! along with the operators that transform one `Observable` into another.

pub mod buffered_observer;
pub mod connectable_observer;
pub mod merge_ack_buffer;
pub mod observable;
pub mod observer;
pub mod operators;
pub mod safe_observer;

#[cfg(test)]
mod testing;

pub use buffered_observer::BufferedObserver;
pub use connectable_observer::ConnectableObserver;
pub use merge_ack_buffer::MergeAckBuffer;
pub use observable::Observable;
pub use observer::Observer;
pub use operators::{Connectable, Subject};
pub use safe_observer::SafeObserver;

pub use fluxion_core::{Ack, Acknowledgement, FluxionError, Notification};
