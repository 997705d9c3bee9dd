// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch configuration loaded from environment variables.

use serde::{Deserialize, Serialize};

use geofence_core::{DEFAULT_PRECISION, MAX_PRECISION};
use geofence_geometry::DEFAULT_VALIDATION_TOLERANCE;

/// Batch processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Decimal places for encoded surface coordinates.
    pub precision: usize,
    /// Vertex welding tolerance (meters) for watertightness checks.
    pub validation_tolerance: f64,
    /// Distance (meters) under which a point counts as on the surface.
    pub boundary_tolerance: f64,
    /// Number of worker threads for parallel processing.
    pub worker_threads: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Missing, unparsable or out-of-range values fall back to their defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            precision: var("GEOFENCE_PRECISION")
                .and_then(|v| v.trim().parse().ok())
                .filter(|&p: &usize| p <= MAX_PRECISION)
                .unwrap_or(DEFAULT_PRECISION),
            validation_tolerance: var("GEOFENCE_VALIDATION_TOLERANCE")
                .and_then(|v| v.trim().parse().ok())
                .filter(|t: &f64| t.is_finite() && *t > 0.0)
                .unwrap_or(DEFAULT_VALIDATION_TOLERANCE),
            boundary_tolerance: var("GEOFENCE_BOUNDARY_TOLERANCE")
                .and_then(|v| v.trim().parse().ok())
                .filter(|t: &f64| t.is_finite() && *t >= 0.0)
                .unwrap_or(1e-3),
            worker_threads: var("GEOFENCE_WORKER_THREADS")
                .and_then(|v| v.trim().parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or_else(num_cpus::get),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
