// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared batch pipeline for geofence volumes
//!
//! The core and geometry crates are single-threaded and side-effect free.
//! This crate fans their operations out over a rayon pool and reports
//! progress through `tracing`.

pub mod batch;
pub mod config;
pub mod error;

pub use batch::BatchProcessor;
pub use config::Config;
pub use error::{Error, Result};
