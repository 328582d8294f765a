// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Multicast subjects: `PublishSubject`, `BehaviorSubject`, `ReplaySubject`.
//!
//! Every subject is both an [`fluxion_observable::Observer`] (the ingestion
//! side) and — via [`fluxion_observable::Subject::as_observable`] — an
//! [`fluxion_observable::Observable`] (the subscription side), sharing one
//! atomic state machine ([`subject_core::SubjectCore`]) parametrized by
//! which of the three caching strategies it uses.

mod cache;
mod convenience;
mod subject_core;
mod subjects;

pub use convenience::ObservableSubjectExt;
pub use subject_core::SubjectCore;
pub use subjects::{BehaviorSubject, PublishSubject, ReplaySubject};
