// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JavaScript API for Geofence-Lite
//!
//! Origins and triangle lists cross the boundary as JSON strings:
//!
//! ```json
//! { "longitude": 13.405, "latitude": 52.52, "altitude": 34.0 }
//! [ { "v0": { "longitude": .., "latitude": .., "altitude": .. }, "v1": .., "v2": .. } ]
//! ```
//!
//! Errors are thrown as strings.

mod analysis;
mod projection;
mod surface;

use geofence_geometry::{Containment, GeoPoint, GeoTriangle, ValidationReport};
use wasm_bindgen::prelude::*;

use crate::error::{ApiError, Result};

/// Point classification exposed to JavaScript
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainmentJs {
    /// True for interior and boundary points
    pub inside: bool,
    #[wasm_bindgen(js_name = onBoundary)]
    pub on_boundary: bool,
    /// Ray crossings, 0 for boundary points
    #[wasm_bindgen(js_name = intersectionCount)]
    pub intersection_count: usize,
}

impl From<Containment> for ContainmentJs {
    fn from(c: Containment) -> Self {
        Self {
            inside: c.inside,
            on_boundary: c.on_boundary,
            intersection_count: c.intersection_count,
        }
    }
}

/// Watertightness report exposed to JavaScript
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct ValidationReportJs {
    #[wasm_bindgen(js_name = isValid)]
    pub is_valid: bool,
    #[wasm_bindgen(js_name = triangleCount)]
    pub triangle_count: usize,
    #[wasm_bindgen(js_name = nonManifoldEdgeCount)]
    pub non_manifold_edge_count: usize,
    #[wasm_bindgen(skip)]
    pub errors: Vec<String>,
    #[wasm_bindgen(skip)]
    pub summary: String,
}

#[wasm_bindgen]
impl ValidationReportJs {
    /// Error messages, empty when valid
    #[wasm_bindgen(getter)]
    pub fn errors(&self) -> Vec<String> {
        self.errors.clone()
    }

    /// One-line human readable summary
    #[wasm_bindgen(js_name = toString)]
    pub fn to_js_string(&self) -> String {
        self.summary.clone()
    }
}

impl From<ValidationReport> for ValidationReportJs {
    fn from(report: ValidationReport) -> Self {
        let summary = report.to_string();
        Self {
            is_valid: report.is_valid,
            triangle_count: report.triangle_count,
            non_manifold_edge_count: report.non_manifold_edge_count,
            errors: report.errors,
            summary,
        }
    }
}

/// Main Geofence-Lite API
#[wasm_bindgen]
pub struct GeofenceAPI {
    initialized: bool,
}

#[wasm_bindgen]
impl GeofenceAPI {
    /// Create and initialize the API
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        crate::utils::set_panic_hook();

        Self { initialized: true }
    }

    /// Check if API is initialized
    #[wasm_bindgen(getter)]
    pub fn is_ready(&self) -> bool {
        self.initialized
    }

    /// Get version string
    #[wasm_bindgen(getter)]
    pub fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

impl Default for GeofenceAPI {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn parse_origin(json: &str) -> Result<GeoPoint> {
    serde_json::from_str(json).map_err(ApiError::json("origin"))
}

pub(crate) fn parse_triangles(json: &str) -> Result<Vec<GeoTriangle>> {
    serde_json::from_str(json).map_err(ApiError::json("triangles"))
}

pub(crate) fn triangles_to_json(triangles: &[GeoTriangle]) -> Result<String> {
    serde_json::to_string(triangles).map_err(ApiError::json("triangles"))
}
