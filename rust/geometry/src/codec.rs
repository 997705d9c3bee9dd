// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polyhedral surface codec
//!
//! Moves geofence volumes between local-space meshes, geographic triangle
//! lists and `POLYHEDRALSURFACE Z` text:
//!
//! ```text
//! Mesh (local m) --extract_triangles--> [GeoTriangle] --encode--> text
//! Mesh (local m) <--mesh_from_triangles-- [GeoTriangle] <--decode-- text
//! ```
//!
//! Every step takes an explicit origin; text and triangle lists are
//! origin-independent.

use geofence_core::{
    parse_polyhedral_surface, to_geo, to_local, to_local_with_cache, write_polyhedral_surface,
    Dimension, GeoPoint, GeoTriangle, GeoVertex, MercatorScaleCache, DEFAULT_PRECISION,
    MAX_PRECISION,
};

use crate::mesh::{calculate_normals, local_triangles, LocalTriangle, Mesh, TriangleMesh};
use crate::triangulation::triangulate_ring;
use crate::{Error, Point3, Result, Vector3};

/// Decoded surface with its header metadata
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSurface {
    pub srid: Option<i32>,
    pub dimension: Dimension,
    pub triangles: Vec<GeoTriangle>,
}

/// Convert every triangle of a local-space mesh to geographic coordinates
pub fn extract_triangles<M: TriangleMesh + ?Sized>(
    mesh: &M,
    origin: &GeoPoint,
) -> Result<Vec<GeoTriangle>> {
    let triangles = local_triangles(mesh)?;

    Ok(triangles
        .iter()
        .map(|[a, b, c]| {
            let geo = |p: &Point3<f64>| to_geo(&[p.x, p.y, p.z], origin).to_vertex();
            GeoTriangle::new(geo(a), geo(b), geo(c))
        })
        .collect())
}

/// Encode triangles as `POLYHEDRALSURFACE Z` with `precision` decimals.
///
/// An empty list is rejected; write the `EMPTY` literal explicitly if an
/// empty surface is intended. `precision` may not exceed [`MAX_PRECISION`].
pub fn encode(triangles: &[GeoTriangle], precision: usize) -> Result<String> {
    if triangles.is_empty() {
        return Err(Error::EmptyInput(
            "cannot encode a surface with zero triangles".to_string(),
        ));
    }
    if precision > MAX_PRECISION {
        return Err(Error::InvalidPrecision {
            precision,
            max: MAX_PRECISION,
        });
    }
    Ok(write_polyhedral_surface(triangles, precision))
}

/// [`encode`] with the default 8 decimal places
pub fn encode_default(triangles: &[GeoTriangle]) -> Result<String> {
    encode(triangles, DEFAULT_PRECISION)
}

/// Parse surface text into triangles
pub fn decode(text: &str) -> Result<Vec<GeoTriangle>> {
    Ok(decode_surface(text)?.triangles)
}

/// Parse surface text, keeping SRID and dimension.
///
/// Each ring loses its closing vertex and is triangulated in a metric
/// frame anchored at its first vertex. Output triangles reuse the parsed
/// vertices verbatim.
pub fn decode_surface(text: &str) -> Result<DecodedSurface> {
    let surface = parse_polyhedral_surface(text)?;

    let mut triangles = Vec::with_capacity(surface.rings.len());
    for ring in &surface.rings {
        let open = &ring[..ring.len() - 1];
        triangles.extend(triangulate_geo_ring(open)?);
    }

    Ok(DecodedSurface {
        srid: surface.srid,
        dimension: surface.dimension,
        triangles,
    })
}

fn triangulate_geo_ring(ring: &[GeoVertex]) -> Result<Vec<GeoTriangle>> {
    let anchor: GeoPoint = ring[0].into();
    let local: Vec<Point3<f64>> = ring
        .iter()
        .map(|v| Point3::from(to_local(&(*v).into(), &anchor)))
        .collect();

    Ok(triangulate_ring(&local)?
        .into_iter()
        .map(|[a, b, c]| GeoTriangle::new(ring[a], ring[b], ring[c]))
        .collect())
}

/// Convert geographic triangles into local-space triangles around `origin`
pub fn geo_triangles_to_local(
    triangles: &[GeoTriangle],
    origin: &GeoPoint,
    cache: Option<&MercatorScaleCache>,
) -> Vec<LocalTriangle> {
    let local = |v: &GeoVertex| {
        let point: GeoPoint = (*v).into();
        Point3::from(match cache {
            Some(cache) => to_local_with_cache(&point, origin, cache),
            None => to_local(&point, origin),
        })
    };

    triangles
        .iter()
        .map(|tri| [local(&tri.v0), local(&tri.v1), local(&tri.v2)])
        .collect()
}

/// Rebuild a non-indexed local-space mesh (with flat normals) from triangles
pub fn mesh_from_triangles(triangles: &[GeoTriangle], origin: &GeoPoint) -> Result<Mesh> {
    if triangles.is_empty() {
        return Err(Error::EmptyInput(
            "cannot build a mesh from zero triangles".to_string(),
        ));
    }

    let local = geo_triangles_to_local(triangles, origin, None);
    let mut mesh = Mesh::with_capacity(local.len() * 3, 0);
    for tri in &local {
        for p in tri {
            mesh.add_vertex(*p, Vector3::zeros());
        }
    }
    calculate_normals(&mut mesh);

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn origin() -> GeoPoint {
        GeoPoint::with_altitude(13.4050, 52.5200, 34.0)
    }

    fn tetrahedron() -> Mesh {
        Mesh::indexed(
            vec![
                0.0, 0.0, 0.0, //
                10.0, 0.0, 0.0, //
                0.0, 10.0, 0.0, //
                0.0, 0.0, 10.0,
            ],
            vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3],
        )
    }

    #[test]
    fn test_extract_maps_origin_vertex_to_origin() {
        let tris = extract_triangles(&tetrahedron(), &origin()).unwrap();
        assert_eq!(tris.len(), 4);
        let v = tris[0].v0;
        assert_abs_diff_eq!(v.longitude, 13.4050, epsilon = 1e-12);
        assert_abs_diff_eq!(v.latitude, 52.5200, epsilon = 1e-12);
        assert_abs_diff_eq!(v.altitude, 34.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extract_rejects_malformed_soup() {
        let mut mesh = Mesh::new();
        mesh.positions = vec![0.0; 12];
        assert!(matches!(
            extract_triangles(&mesh, &origin()),
            Err(Error::Structural(_))
        ));
    }

    #[test]
    fn test_encode_empty_rejected() {
        assert!(matches!(encode(&[], 8), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn test_encode_precision_capped() {
        let tris = extract_triangles(&tetrahedron(), &origin()).unwrap();
        assert!(encode(&tris, MAX_PRECISION).is_ok());
        assert!(matches!(
            encode(&tris, MAX_PRECISION + 1),
            Err(Error::InvalidPrecision { precision: 18, max: 17 })
        ));
        assert!(matches!(
            encode(&tris, usize::MAX),
            Err(Error::InvalidPrecision { .. })
        ));
    }

    #[test]
    fn test_decode_huge_latitude_does_not_panic() {
        // Finite but far outside [-90, 90]; the result is meaningless but bounded
        let text = "POLYHEDRALSURFACE Z (((0 0 0, 0 1e300 0, 1 0 0, 0 0 0)))";
        let triangles = decode(text).unwrap();
        assert_eq!(triangles.len(), 1);
        assert_eq!(triangles[0].v1.latitude, 1e300);
    }

    #[test]
    fn test_decode_empty_surface() {
        assert!(decode("POLYHEDRALSURFACE Z EMPTY").unwrap().is_empty());
    }

    #[test]
    fn test_decode_quad_face_triangulated() {
        let text = "SRID=4326;POLYHEDRALSURFACE Z (((13.40 52.52 0, 13.41 52.52 0, \
                    13.41 52.53 0, 13.40 52.53 0, 13.40 52.52 0)))";
        let surface = decode_surface(text).unwrap();
        assert_eq!(surface.srid, Some(4326));
        assert_eq!(surface.triangles.len(), 2);
        for tri in &surface.triangles {
            for v in tri.vertices() {
                assert_eq!(v.altitude, 0.0);
            }
        }
    }

    #[test]
    fn test_decode_collinear_face_rejected() {
        let text = "POLYHEDRALSURFACE Z (((0 0 0, 0 0 1, 0 0 2, 0 0 0)))";
        assert!(matches!(decode(text), Err(Error::DegenerateGeometry(_))));
    }

    #[test]
    fn test_decode_surfaces_core_errors() {
        let err = decode("POLYHEDRALSURFACE Z (((0 0 0, 1 0 0, 0 1 0, 0 0 5)))").unwrap_err();
        assert!(matches!(
            err,
            Error::Surface(geofence_core::Error::RingNotClosed { .. })
        ));
    }

    #[test]
    fn test_mesh_from_triangles_round_trip() {
        let o = origin();
        let tris = extract_triangles(&tetrahedron(), &o).unwrap();
        let mesh = mesh_from_triangles(&tris, &o).unwrap();

        assert!(!mesh.is_indexed());
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.normals.len(), mesh.positions.len());

        let original = local_triangles(&tetrahedron()).unwrap();
        let rebuilt = local_triangles(&mesh).unwrap();
        for (a, b) in original.iter().zip(&rebuilt) {
            for (p, q) in a.iter().zip(b) {
                assert!((p - q).norm() < 5e-3);
            }
        }
    }

    #[test]
    fn test_mesh_from_zero_triangles_rejected() {
        assert!(matches!(
            mesh_from_triangles(&[], &origin()),
            Err(Error::EmptyInput(_))
        ));
    }

    #[test]
    fn test_cached_local_conversion_matches() {
        let o = origin();
        let tris = extract_triangles(&tetrahedron(), &o).unwrap();
        let cache = MercatorScaleCache::new();
        assert_eq!(
            geo_triangles_to_local(&tris, &o, Some(&cache)),
            geo_triangles_to_local(&tris, &o, None)
        );
    }
}
