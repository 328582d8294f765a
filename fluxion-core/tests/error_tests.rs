// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use fluxion_core::{FluxionError, IntoFluxionError, ResultExt};
use std::io;
use std::time::Duration;

#[test]
fn displays_each_variant() {
    let err = FluxionError::stream_error("processing failed");
    assert_eq!(err.to_string(), "stream processing error: processing failed");

    let err = FluxionError::timeout("zip", Duration::from_millis(50));
    assert!(err.to_string().contains("zip"));
}

#[test]
fn is_recoverable_only_for_timeout() {
    assert!(FluxionError::timeout("op", Duration::from_secs(1)).is_recoverable());
    assert!(!FluxionError::stream_error("x").is_recoverable());
}

#[test]
fn is_permanent_covers_structural_failures() {
    assert!(FluxionError::stream_error("x").is_permanent());
    assert!(FluxionError::channel_closed("subject").is_permanent());
    assert!(!FluxionError::timeout("op", Duration::from_secs(1)).is_permanent());
}

#[test]
fn into_fluxion_wraps_std_errors() {
    let io_err = io::Error::new(io::ErrorKind::Other, "boom");
    let wrapped = io_err.into_fluxion();
    assert!(matches!(wrapped, FluxionError::UserError(_)));
    assert!(wrapped.to_string().contains("boom"));
}

#[test]
fn context_preserves_structured_variants() {
    let result: Result<(), FluxionError> = Err(FluxionError::channel_closed("replay buffer"));
    let with_context = result.context("while draining");
    assert!(matches!(
        with_context,
        Err(FluxionError::ChannelClosed { .. })
    ));
}

#[test]
fn from_user_errors_aggregates_count() {
    let errors = vec![
        io::Error::new(io::ErrorKind::Other, "a"),
        io::Error::new(io::ErrorKind::Other, "b"),
    ];
    let aggregated = FluxionError::from_user_errors(errors);
    match aggregated {
        FluxionError::MultipleErrors { count, errors } => {
            assert_eq!(count, 2);
            assert_eq!(errors.len(), 2);
        }
        other => panic!("expected MultipleErrors, got {other:?}"),
    }
}

#[test]
fn clone_folds_user_error_into_context_string() {
    let err = FluxionError::user_error(io::Error::new(io::ErrorKind::Other, "boom"));
    let cloned = err.clone();
    assert!(matches!(cloned, FluxionError::StreamProcessingError { .. }));
}
