//! Geofence-Lite Geometry Processing
//!
//! Closed 3D geofence volumes: earcutr triangulation of surface faces,
//! the `POLYHEDRALSURFACE Z` codec, watertightness validation and
//! point-in-volume tests, with nalgebra for the vector math.
//!
//! ```rust
//! use geofence_geometry::{extract_triangles, decode, encode, Mesh, GeoPoint};
//!
//! // Unit tetrahedron in local meters
//! let mesh = Mesh::indexed(
//!     vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
//!     vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3],
//! );
//! let origin = GeoPoint::with_altitude(2.3522, 48.8566, 35.0);
//!
//! let text = encode(&extract_triangles(&mesh, &origin)?, 8)?;
//! assert_eq!(decode(&text)?.len(), 4);
//! # Ok::<(), geofence_geometry::Error>(())
//! ```

pub mod codec;
pub mod containment;
pub mod error;
pub mod mesh;
pub mod triangulation;
pub mod validate;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use geofence_core::{
    GeoPoint, GeoTriangle, GeoVertex, LocalPoint, DEFAULT_PRECISION, MAX_PRECISION,
};

pub use codec::{
    decode, decode_surface, encode, encode_default, extract_triangles, geo_triangles_to_local,
    mesh_from_triangles, DecodedSurface,
};
pub use containment::{
    coords_in_triangles, coords_in_volume, point_in_triangles, point_in_volume, point_on_surface,
    Containment, ContainmentOptions, LocalVolume,
};
pub use error::{Error, Result};
pub use mesh::{calculate_normals, LocalTriangle, Mesh, MeshView, TriangleMesh};
pub use triangulation::{triangulate_polygon, triangulate_ring};
pub use validate::{validate, ValidationReport, DEFAULT_VALIDATION_TOLERANCE};
