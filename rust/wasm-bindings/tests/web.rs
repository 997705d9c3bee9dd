// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![cfg(target_arch = "wasm32")]

use geofence_wasm::GeofenceAPI;
use wasm_bindgen_test::*;

const ORIGIN: &str = r#"{"longitude": 13.405, "latitude": 52.52, "altitude": 34.0}"#;

fn tetrahedron() -> (Vec<f32>, Vec<u32>) {
    (
        vec![0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 5.0],
        vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3],
    )
}

#[wasm_bindgen_test]
fn origin_maps_to_zero() {
    let api = GeofenceAPI::new();
    let local = api.to_local(13.405, 52.52, Some(34.0), 13.405, 52.52, Some(34.0));
    assert_eq!(local, vec![0.0, 0.0, 0.0]);
}

#[wasm_bindgen_test]
fn surface_round_trip_stays_watertight() {
    let api = GeofenceAPI::new();
    let (positions, indices) = tetrahedron();

    let triangles = api
        .extract_triangles(&positions, Some(indices.clone()), ORIGIN)
        .unwrap();
    let text = api.encode_surface(&triangles, None).unwrap();
    let decoded = api.decode_surface(&text).unwrap();
    let mesh = api.mesh_from_triangles(&decoded, ORIGIN).unwrap();
    assert_eq!(mesh.triangle_count(), 4);

    let report = api.validate_mesh(&positions, Some(indices), None);
    assert!(report.is_valid);
}

#[wasm_bindgen_test]
fn boundary_points_are_inside() {
    let api = GeofenceAPI::new();
    let (positions, indices) = tetrahedron();

    let on_face = api
        .point_in_volume(1.0, 1.0, 0.0, &positions, Some(indices.clone()))
        .unwrap();
    assert!(on_face.inside && on_face.on_boundary);

    let inside = api
        .point_in_volume(1.0, 1.0, 1.0, &positions, Some(indices))
        .unwrap();
    assert!(inside.inside && !inside.on_boundary);
}

#[wasm_bindgen_test]
fn bad_json_throws() {
    let api = GeofenceAPI::new();
    assert!(api.encode_surface("not json", None).is_err());
}
