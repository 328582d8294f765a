// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test doubles shared across the Fluxion workspace: an `Observer` that
//! records what it receives, and a `Scheduler` driven by virtual time.

#![allow(clippy::multiple_crate_versions)]
pub mod manual_scheduler;
pub mod recording_observer;

pub use manual_scheduler::ManualScheduler;
pub use recording_observer::{RecordingObserver, StoppingObserver};
