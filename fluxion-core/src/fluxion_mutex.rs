// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! The mutex used throughout the crate for short critical sections.
//!
//! Re-exported from one place so the rest of the crate depends on
//! `fluxion_core::fluxion_mutex::Mutex` rather than on `parking_lot`
//! directly, should the backing implementation ever need to change.

pub use parking_lot::Mutex;
