// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#![allow(dead_code)]

use geofence_geometry::{GeoPoint, Mesh};

/// Zurich, Lindenhof
pub fn origin() -> GeoPoint {
    GeoPoint::with_altitude(8.5417, 47.3730, 408.0)
}

/// Axis-aligned box centered on the local origin, 12 triangles
pub fn centered_box(size: f32) -> Mesh {
    let h = size / 2.0;
    let mut positions = Vec::with_capacity(24);
    for i in 0..8 {
        positions.push(if i & 1 == 0 { -h } else { h });
        positions.push(if i & 2 == 0 { -h } else { h });
        positions.push(if i & 4 == 0 { -h } else { h });
    }

    let quads: [[u32; 4]; 6] = [
        [0, 2, 6, 4], // -X
        [1, 5, 7, 3], // +X
        [0, 4, 5, 1], // -Y
        [2, 3, 7, 6], // +Y
        [0, 1, 3, 2], // -Z
        [4, 6, 7, 5], // +Z
    ];
    let mut indices = Vec::with_capacity(36);
    for [a, b, c, d] in quads {
        indices.extend_from_slice(&[a, b, c, a, c, d]);
    }

    Mesh::indexed(positions, indices)
}

/// West/east longitudes of the geographic test box
pub const BOX_LON: (f64, f64) = (8.5410, 8.5420);
/// South/north latitudes of the geographic test box
pub const BOX_LAT: (f64, f64) = (47.3725, 47.3735);
/// Floor/roof altitudes of the geographic test box
pub const BOX_ALT: (f64, f64) = (400.0, 420.0);

/// One closed polygon `((lon lat alt, ..., first))`
pub fn face(corners: &[(f64, f64, f64)]) -> String {
    let pts: Vec<String> = corners
        .iter()
        .chain(corners.first())
        .map(|&(lon, lat, alt)| format!("{} {} {}", lon, lat, alt))
        .collect();
    format!("(({}))", pts.join(", "))
}

/// Faces of the geographic box, one quadrilateral ring each
pub fn box_faces() -> Vec<String> {
    let (w, e) = BOX_LON;
    let (s, n) = BOX_LAT;
    let (lo, hi) = BOX_ALT;

    vec![
        face(&[(w, s, lo), (w, n, lo), (e, n, lo), (e, s, lo)]),
        face(&[(w, s, hi), (e, s, hi), (e, n, hi), (w, n, hi)]),
        face(&[(w, s, lo), (e, s, lo), (e, s, hi), (w, s, hi)]),
        face(&[(w, n, lo), (w, n, hi), (e, n, hi), (e, n, lo)]),
        face(&[(w, s, lo), (w, s, hi), (w, n, hi), (w, n, lo)]),
        face(&[(e, s, lo), (e, n, lo), (e, n, hi), (e, s, hi)]),
    ]
}

pub fn surface_text(faces: &[String]) -> String {
    format!("SRID=4326;POLYHEDRALSURFACE Z ({})", faces.join(", "))
}

/// Geographic box with one quadrilateral ring per face
pub fn quad_faced_box_text() -> String {
    surface_text(&box_faces())
}
