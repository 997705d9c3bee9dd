// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point-in-volume classification
//!
//! Ray casting against a closed triangle surface, with a proximity test in
//! front of it: any point within `boundary_tolerance` of a triangle is
//! reported as inside and on the boundary. Only the parity of the
//! crossings along a single fixed ray is used, so the surface must be
//! watertight (see [`crate::validate`]) for the answer to be meaningful.
//! Open surfaces never panic, they just classify arbitrarily.

use geofence_core::{to_local, GeoPoint, GeoTriangle, LocalPoint};

use crate::codec::geo_triangles_to_local;
use crate::mesh::{local_triangles, LocalTriangle, TriangleMesh};
use crate::{Point3, Result, Vector3};

/// Classification of a single point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Containment {
    /// True for interior and boundary points
    pub inside: bool,
    pub on_boundary: bool,
    /// Raw crossing count along the ray, 0 when on the boundary
    pub intersection_count: usize,
}

impl Containment {
    const BOUNDARY: Self = Self {
        inside: true,
        on_boundary: true,
        intersection_count: 0,
    };
}

/// Tuning knobs for [`LocalVolume::classify_with`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainmentOptions {
    /// Distance in meters under which a point counts as on the surface
    pub boundary_tolerance: f64,
    /// Ray direction, kept off the coordinate axes and face diagonals
    pub ray_direction: Vector3<f64>,
    /// Minimum distance ahead of the query point for a hit to count
    pub hit_epsilon: f64,
}

impl Default for ContainmentOptions {
    fn default() -> Self {
        Self {
            boundary_tolerance: 1e-3,
            ray_direction: Vector3::new(1.0, 1.1e-4, 1.7e-4).normalize(),
            hit_epsilon: 1e-12,
        }
    }
}

/// Closest point on triangle `abc` to `p` (Ericson, Real-Time Collision
/// Detection 5.1.5)
pub fn closest_point_on_triangle(
    p: &Point3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Point3<f64> {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return a + ab * (d1 / (d1 - d3));
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return a + ac * (d2 / (d2 - d6));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    // Face region
    let denom = 1.0 / (va + vb + vc);
    a + ab * (vb * denom) + ac * (vc * denom)
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the hit point, `None` if the ray misses or runs parallel.
fn ray_triangle_hit(
    origin: &Point3<f64>,
    dir: &Vector3<f64>,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Option<Point3<f64>> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = dir.cross(&edge2);
    let a = edge1.dot(&h);
    if a.abs() < 1e-12 {
        return None;
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * dir.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    Some(origin + dir * t)
}

/// Closed surface prepared for repeated containment queries
#[derive(Debug, Clone, Default)]
pub struct LocalVolume {
    triangles: Vec<LocalTriangle>,
}

impl LocalVolume {
    pub fn new(triangles: Vec<LocalTriangle>) -> Self {
        Self { triangles }
    }

    /// Read the triangles of a local-space mesh
    pub fn from_mesh<M: TriangleMesh + ?Sized>(mesh: &M) -> Result<Self> {
        Ok(Self::new(local_triangles(mesh)?))
    }

    /// Project geographic triangles into the local frame of `origin`
    pub fn from_geo_triangles(triangles: &[GeoTriangle], origin: &GeoPoint) -> Self {
        Self::new(geo_triangles_to_local(triangles, origin, None))
    }

    pub fn triangles(&self) -> &[LocalTriangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Classify with [`ContainmentOptions::default`]
    pub fn classify(&self, point: &LocalPoint) -> Containment {
        self.classify_with(point, &ContainmentOptions::default())
    }

    pub fn classify_with(&self, point: &LocalPoint, options: &ContainmentOptions) -> Containment {
        if self.is_on_surface(point, options.boundary_tolerance) {
            return Containment::BOUNDARY;
        }

        let origin = Point3::from(*point);
        let dir = &options.ray_direction;

        let intersection_count = self
            .triangles
            .iter()
            .filter_map(|[v0, v1, v2]| ray_triangle_hit(&origin, dir, v0, v1, v2))
            .filter(|hit| (hit - origin).dot(dir) > options.hit_epsilon)
            .count();

        Containment {
            inside: intersection_count % 2 == 1,
            on_boundary: false,
            intersection_count,
        }
    }

    /// True if any triangle lies within `tolerance` of `point`
    pub fn is_on_surface(&self, point: &LocalPoint, tolerance: f64) -> bool {
        let p = Point3::from(*point);
        self.triangles
            .iter()
            .any(|[a, b, c]| (closest_point_on_triangle(&p, a, b, c) - p).norm() <= tolerance)
    }
}

/// Classify a local-space point against a local-space mesh
pub fn point_in_volume<M: TriangleMesh + ?Sized>(
    point: &LocalPoint,
    mesh: &M,
) -> Result<Containment> {
    Ok(LocalVolume::from_mesh(mesh)?.classify(point))
}

/// Classify a local-space point against geographic triangles placed at `origin`
pub fn point_in_triangles(
    point: &LocalPoint,
    triangles: &[GeoTriangle],
    origin: &GeoPoint,
) -> Containment {
    LocalVolume::from_geo_triangles(triangles, origin).classify(point)
}

/// True if `point` lies within `tolerance` meters of the mesh surface
pub fn point_on_surface<M: TriangleMesh + ?Sized>(
    point: &LocalPoint,
    mesh: &M,
    tolerance: f64,
) -> Result<bool> {
    Ok(LocalVolume::from_mesh(mesh)?.is_on_surface(point, tolerance))
}

/// Classify a geographic coordinate against a local-space mesh placed at `origin`
pub fn coords_in_volume<M: TriangleMesh + ?Sized>(
    coords: &GeoPoint,
    mesh: &M,
    origin: &GeoPoint,
) -> Result<Containment> {
    point_in_volume(&to_local(coords, origin), mesh)
}

/// Classify a geographic coordinate against geographic triangles
pub fn coords_in_triangles(
    coords: &GeoPoint,
    triangles: &[GeoTriangle],
    origin: &GeoPoint,
) -> Containment {
    point_in_triangles(&to_local(coords, origin), triangles, origin)
}
