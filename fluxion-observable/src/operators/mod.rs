// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The operator algebra: extension methods on [`crate::Observable`] that
//! each install a forwarding observer upstream when subscribed.

pub mod accumulating;
pub mod combining;
pub mod drop;
pub mod filter;
pub mod map;
pub mod multicast;
pub mod scheduling;
pub mod side_effects;
pub mod take;
pub mod terminal;

pub use multicast::{Connectable, Subject};

use std::panic::{catch_unwind, AssertUnwindSafe};

use fluxion_core::FluxionError;

/// Runs a user-supplied closure, catching a panic and turning it into a
/// [`FluxionError`] instead of unwinding across the observer boundary.
///
/// This is how operators honor the "a user predicate/mapping must not leak
/// to upstream" rule: the closure runs to completion (or panics) entirely
/// before any downstream call begins, so on failure the operator can always
/// route the error to `on_error` itself and return `Done` upstream.
pub(crate) fn guard<R>(f: impl FnOnce() -> R) -> Result<R, FluxionError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "user closure panicked".to_string());
        FluxionError::stream_error(message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_passes_through_the_returned_value() {
        assert_eq!(guard(|| 1 + 1).unwrap(), 2);
    }

    #[test]
    fn guard_converts_a_panic_into_a_stream_error() {
        let result = guard(|| -> i32 { panic!("boom") });
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("boom"));
    }
}
