// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Validation and containment methods for Geofence-Lite API

use super::{parse_origin, parse_triangles, ContainmentJs, GeofenceAPI, ValidationReportJs};
use crate::error::Result;
use geofence_geometry::{
    coords_in_triangles, point_in_volume, point_on_surface, validate, Containment, GeoPoint,
    MeshView, DEFAULT_VALIDATION_TOLERANCE,
};
use wasm_bindgen::prelude::*;

fn classify_coords(
    coords: &GeoPoint,
    triangles_json: &str,
    origin_json: &str,
) -> Result<Containment> {
    let triangles = parse_triangles(triangles_json)?;
    let origin = parse_origin(origin_json)?;
    Ok(coords_in_triangles(coords, &triangles, &origin))
}

#[wasm_bindgen]
impl GeofenceAPI {
    /// Check that a local-space mesh is closed (every edge shared by two
    /// triangles). Vertices closer than `tolerance` meters are merged.
    #[wasm_bindgen(js_name = validateMesh)]
    pub fn validate_mesh(
        &self,
        positions: &[f32],
        indices: Option<Vec<u32>>,
        tolerance: Option<f64>,
    ) -> ValidationReportJs {
        let mesh = MeshView::new(positions, indices.as_deref());
        validate(&mesh, tolerance.unwrap_or(DEFAULT_VALIDATION_TOLERANCE)).into()
    }

    /// Classify a local-space point against a closed local-space mesh.
    /// Points on the surface count as inside.
    ///
    /// Example:
    /// ```javascript
    /// const api = new GeofenceAPI();
    /// const result = api.pointInVolume(0, 0, 0, geometry.positions, geometry.index);
    /// if (result.inside && !result.onBoundary) { ... }
    /// ```
    #[wasm_bindgen(js_name = pointInVolume)]
    pub fn point_in_volume(
        &self,
        x: f64,
        y: f64,
        z: f64,
        positions: &[f32],
        indices: Option<Vec<u32>>,
    ) -> std::result::Result<ContainmentJs, JsValue> {
        let mesh = MeshView::new(positions, indices.as_deref());
        let result = point_in_volume(&[x, y, z], &mesh).map_err(crate::ApiError::from)?;
        Ok(result.into())
    }

    /// True if the point lies within `tolerance` meters (default 1e-3) of the surface
    #[wasm_bindgen(js_name = pointOnSurface)]
    pub fn point_on_surface(
        &self,
        x: f64,
        y: f64,
        z: f64,
        positions: &[f32],
        indices: Option<Vec<u32>>,
        tolerance: Option<f64>,
    ) -> std::result::Result<bool, JsValue> {
        let mesh = MeshView::new(positions, indices.as_deref());
        Ok(point_on_surface(&[x, y, z], &mesh, tolerance.unwrap_or(1e-3))
            .map_err(crate::ApiError::from)?)
    }

    /// Classify a geographic coordinate against a JSON triangle list
    #[wasm_bindgen(js_name = coordsInTriangles)]
    pub fn coords_in_triangles(
        &self,
        longitude: f64,
        latitude: f64,
        altitude: Option<f64>,
        triangles_json: &str,
        origin_json: &str,
    ) -> std::result::Result<ContainmentJs, JsValue> {
        let coords = GeoPoint {
            longitude,
            latitude,
            altitude,
        };
        Ok(classify_coords(&coords, triangles_json, origin_json)?.into())
    }
}
