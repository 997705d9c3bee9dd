// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! POLYHEDRALSURFACE methods for Geofence-Lite API

use super::{parse_origin, parse_triangles, triangles_to_json, GeofenceAPI};
use crate::error::Result;
use crate::mesh_data::MeshDataJs;
use geofence_geometry::{
    decode, encode, extract_triangles, mesh_from_triangles, Mesh, MeshView, DEFAULT_PRECISION,
};
use wasm_bindgen::prelude::*;

fn extract_json(positions: &[f32], indices: Option<&[u32]>, origin_json: &str) -> Result<String> {
    let origin = parse_origin(origin_json)?;
    let triangles = extract_triangles(&MeshView::new(positions, indices), &origin)?;
    triangles_to_json(&triangles)
}

fn encode_json(triangles_json: &str, precision: Option<usize>) -> Result<String> {
    let triangles = parse_triangles(triangles_json)?;
    Ok(encode(&triangles, precision.unwrap_or(DEFAULT_PRECISION))?)
}

fn decode_json(text: &str) -> Result<String> {
    triangles_to_json(&decode(text)?)
}

fn rebuild_mesh(triangles_json: &str, origin_json: &str) -> Result<Mesh> {
    let triangles = parse_triangles(triangles_json)?;
    let origin = parse_origin(origin_json)?;
    Ok(mesh_from_triangles(&triangles, &origin)?)
}

#[wasm_bindgen]
impl GeofenceAPI {
    /// Convert a local-space mesh to a JSON list of geographic triangles
    ///
    /// Example:
    /// ```javascript
    /// const api = new GeofenceAPI();
    /// const origin = JSON.stringify({ longitude: 13.405, latitude: 52.52, altitude: 34 });
    /// const triangles = api.extractTriangles(geometry.positions, geometry.index, origin);
    /// const wkt = api.encodeSurface(triangles);
    /// ```
    #[wasm_bindgen(js_name = extractTriangles)]
    pub fn extract_triangles(
        &self,
        positions: &[f32],
        indices: Option<Vec<u32>>,
        origin_json: &str,
    ) -> std::result::Result<String, JsValue> {
        Ok(extract_json(positions, indices.as_deref(), origin_json)?)
    }

    /// Encode a JSON triangle list as `POLYHEDRALSURFACE Z` text
    /// (8 decimals unless `precision` is given, at most 17)
    #[wasm_bindgen(js_name = encodeSurface)]
    pub fn encode_surface(
        &self,
        triangles_json: &str,
        precision: Option<usize>,
    ) -> std::result::Result<String, JsValue> {
        Ok(encode_json(triangles_json, precision)?)
    }

    /// Parse `POLYHEDRALSURFACE` text into a JSON triangle list
    #[wasm_bindgen(js_name = decodeSurface)]
    pub fn decode_surface(&self, text: &str) -> std::result::Result<String, JsValue> {
        Ok(decode_json(text)?)
    }

    /// Rebuild a local-space triangle soup (with normals) around an origin
    #[wasm_bindgen(js_name = meshFromTriangles)]
    pub fn mesh_from_triangles(
        &self,
        triangles_json: &str,
        origin_json: &str,
    ) -> std::result::Result<MeshDataJs, JsValue> {
        Ok(rebuild_mesh(triangles_json, origin_json)?.into())
    }
}
