// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinate conversion methods for Geofence-Lite API

use super::GeofenceAPI;
use geofence_core::{to_geo, to_local, GeoPoint};
use wasm_bindgen::prelude::*;

fn geo_point(longitude: f64, latitude: f64, altitude: Option<f64>) -> GeoPoint {
    GeoPoint {
        longitude,
        latitude,
        altitude,
    }
}

#[wasm_bindgen]
impl GeofenceAPI {
    /// Convert a geographic coordinate to local meters around an origin.
    /// Returns `[x, y, z]` with +X east, +Y up, +Z south.
    ///
    /// Example:
    /// ```javascript
    /// const api = new GeofenceAPI();
    /// const [x, y, z] = api.toLocal(13.406, 52.521, 40, 13.405, 52.52, 34);
    /// ```
    #[wasm_bindgen(js_name = toLocal)]
    pub fn to_local(
        &self,
        longitude: f64,
        latitude: f64,
        altitude: Option<f64>,
        origin_longitude: f64,
        origin_latitude: f64,
        origin_altitude: Option<f64>,
    ) -> Vec<f64> {
        let point = geo_point(longitude, latitude, altitude);
        let origin = geo_point(origin_longitude, origin_latitude, origin_altitude);
        to_local(&point, &origin).to_vec()
    }

    /// Convert local meters back to `[longitude, latitude, altitude]`.
    ///
    /// Uses only the origin's Mercator scale, so it is not an exact
    /// inverse of `toLocal` far from the origin.
    #[wasm_bindgen(js_name = toGeo)]
    pub fn to_geo(
        &self,
        x: f64,
        y: f64,
        z: f64,
        origin_longitude: f64,
        origin_latitude: f64,
        origin_altitude: Option<f64>,
    ) -> Vec<f64> {
        let origin = geo_point(origin_longitude, origin_latitude, origin_altitude);
        let geo = to_geo(&[x, y, z], &origin);
        vec![geo.longitude, geo.latitude, geo.altitude_or_zero()]
    }
}
