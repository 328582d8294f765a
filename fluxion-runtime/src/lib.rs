// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The scheduler abstraction the observer protocol is written against, plus
//! the Tokio-backed default implementation the rest of the workspace uses.

pub mod scheduler;

pub use scheduler::{ScheduleExt, Scheduler, TokioScheduler};
