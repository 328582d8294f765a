// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the Fluxion reactive streaming library.
//!
//! This module defines a root [`FluxionError`] type with variants for the
//! failure modes the observer protocol actually produces: a user-supplied
//! predicate/mapping throwing, a `subscribeFn` constructor failing, a
//! timeout on a time-bounded operator, or several of the above aggregated
//! from a fan-in operator.
//!
//! # Examples
//!
//! ```
//! use fluxion_core::{FluxionError, Result};
//!
//! fn process_data() -> Result<()> {
//!     Err(FluxionError::stream_error("stream not ready"))
//! }
//! ```

/// Root error type for all Fluxion operations.
#[derive(Debug, thiserror::Error)]
pub enum FluxionError {
    /// General stream-processing failure that doesn't fit a more specific variant.
    #[error("stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong.
        context: String,
    },

    /// A user-provided function (map/filter/scan/... closure) returned an error or panicked.
    #[error("user error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Several errors occurred concurrently, e.g. from a fan-in operator.
    #[error("{count} errors occurred")]
    MultipleErrors {
        /// Number of errors aggregated.
        count: usize,
        /// The individual errors.
        errors: Vec<FluxionError>,
    },

    /// A time-bounded operation exceeded its deadline.
    #[error("operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// How long was waited.
        duration: std::time::Duration,
    },

    /// `Observable::subscribe_fn` itself failed while wiring up the subscription.
    #[error("subscription error: {context}")]
    SubscriptionError {
        /// Details about the subscription failure.
        context: String,
    },

    /// A channel backing a subject or buffered observer was unexpectedly closed.
    #[error("channel closed: {context}")]
    ChannelClosed {
        /// Which channel closed.
        context: String,
    },
}

impl FluxionError {
    /// Creates a stream-processing error with the given context.
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Creates a subscription error with the given context.
    pub fn subscription_error(context: impl Into<String>) -> Self {
        Self::SubscriptionError {
            context: context.into(),
        }
    }

    /// Creates a channel-closed error with the given context.
    pub fn channel_closed(context: impl Into<String>) -> Self {
        Self::ChannelClosed {
            context: context.into(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(operation: impl Into<String>, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Wraps a user error.
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Aggregates multiple errors into a single `MultipleErrors` variant.
    pub fn from_user_errors<E>(errors: Vec<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let count = errors.len();
        let errors = errors.into_iter().map(Self::user_error).collect();
        Self::MultipleErrors { count, errors }
    }

    /// Whether this error indicates a transient failure that could succeed on retry.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Whether this error indicates a permanent failure.
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::StreamProcessingError { .. } | Self::UserError(_) | Self::ChannelClosed { .. }
        )
    }
}

impl Clone for FluxionError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            // A boxed `dyn Error` can't be cloned; fold it into the string context instead.
            Self::UserError(e) => Self::StreamProcessingError {
                context: format!("user error: {e}"),
            },
            Self::MultipleErrors { count, errors } => Self::MultipleErrors {
                count: *count,
                errors: errors.clone(),
            },
            Self::Timeout {
                operation,
                duration,
            } => Self::Timeout {
                operation: operation.clone(),
                duration: *duration,
            },
            Self::SubscriptionError { context } => Self::SubscriptionError {
                context: context.clone(),
            },
            Self::ChannelClosed { context } => Self::ChannelClosed {
                context: context.clone(),
            },
        }
    }
}

impl PartialEq for FluxionError {
    /// Structural variants compare field-by-field via their rendered message;
    /// good enough for assertions in tests, not meant as a hash key.
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

/// Specialized `Result` type for Fluxion operations.
pub type Result<T> = std::result::Result<T, FluxionError>;

/// Extension trait for converting arbitrary errors into [`FluxionError`].
pub trait IntoFluxionError {
    /// Converts this error into a [`FluxionError`].
    fn into_fluxion(self) -> FluxionError;
}

impl<E: std::error::Error + Send + Sync + 'static> IntoFluxionError for E {
    fn into_fluxion(self) -> FluxionError {
        FluxionError::user_error(self)
    }
}

/// Helper trait for adding context to `Result`s in a fluent style.
pub trait ResultExt<T> {
    /// Adds context to an error, preserving structured variants unchanged.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<FluxionError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| match e.into() {
            FluxionError::UserError(inner) => FluxionError::StreamProcessingError {
                context: format!("{}: {inner}", context.into()),
            },
            other => other,
        })
    }
}
