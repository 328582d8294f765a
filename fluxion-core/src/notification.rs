// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Reified observer events.
//!
//! [`Notification`] turns the three observer callbacks (`on_next`,
//! `on_complete`, `on_error`) into a single value, the way `materialize()`
//! needs to hand terminal events to a downstream observer as ordinary items.

use crate::error::FluxionError;

/// A single reified observer event: an item, successful completion, or an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification<T> {
    /// Corresponds to an `on_next(value)` call.
    OnNext(T),
    /// Corresponds to an `on_complete()` call. Terminal.
    OnComplete,
    /// Corresponds to an `on_error(error)` call. Terminal.
    OnError(FluxionError),
}

impl<T> Notification<T> {
    /// `true` for `OnComplete` or `OnError` — the two terminal variants.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::OnNext(_))
    }

    /// Maps the item carried by `OnNext`, leaving terminal notifications
    /// unchanged.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Notification<U> {
        match self {
            Self::OnNext(value) => Notification::OnNext(f(value)),
            Self::OnComplete => Notification::OnComplete,
            Self::OnError(e) => Notification::OnError(e),
        }
    }

    /// The carried value, if this is `OnNext`.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::OnNext(value) => Some(value),
            _ => None,
        }
    }

    /// The carried error, if this is `OnError`.
    pub fn error(&self) -> Option<&FluxionError> {
        match self {
            Self::OnError(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_on_next_is_non_terminal() {
        assert!(!Notification::<i32>::OnNext(1).is_terminal());
        assert!(Notification::<i32>::OnComplete.is_terminal());
        assert!(Notification::<i32>::OnError(FluxionError::stream_error("x")).is_terminal());
    }

    #[test]
    fn map_transforms_only_on_next() {
        let mapped = Notification::OnNext(1).map(|v| v + 1);
        assert_eq!(mapped.into_value(), Some(2));

        let mapped = Notification::<i32>::OnComplete.map(|v| v + 1);
        assert!(matches!(mapped, Notification::OnComplete));
    }
}
