// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Wrapper around earcutr for 2D polygon triangulation, plus projection of
//! near-planar 3D rings onto their own plane.

use crate::{Error, Point2, Point3, Result, Vector3};

/// Cross-product magnitude below which three points count as collinear
pub const MIN_TRIANGLE_AREA: f64 = 1e-12;

/// 2D turn magnitude at or below which a ring vertex lies on its edge
const COLLINEAR_TURN: f64 = 1e-10;

/// Check if a polygon is strictly convex (all cross products have the same
/// sign, none of them zero)
#[inline]
fn is_convex(points: &[Point2<f64>]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let n = points.len();
    let mut sign = 0i8;

    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];

        // Cross product of edges
        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);

        if cross.abs() <= 1e-10 {
            return false;
        }
        let current_sign = if cross > 0.0 { 1i8 } else { -1i8 };
        if sign == 0 {
            sign = current_sign;
        } else if sign != current_sign {
            return false; // Sign changed - not convex
        }
    }

    true
}

/// Simple fan triangulation for convex polygons
#[inline]
fn fan_triangulate(n: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity((n - 2) * 3);
    for i in 1..n - 1 {
        indices.push(0);
        indices.push(i);
        indices.push(i + 1);
    }
    indices
}

/// Triangulate a simple polygon (no holes)
/// Returns triangle indices into the input points
#[inline]
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();

    if n < 3 {
        return Err(Error::Triangulation(
            "Need at least 3 points to triangulate".to_string(),
        ));
    }

    // FAST PATH: Triangle - no triangulation needed
    if n == 3 {
        return Ok(vec![0, 1, 2]);
    }

    // FAST PATH: Convex polygon - use fan triangulation
    if n <= 8 && is_convex(points) {
        return Ok(fan_triangulate(n));
    }

    // Flatten points for earcutr
    let mut vertices = Vec::with_capacity(n * 2);
    for p in points {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    let indices = earcutr::earcut(&vertices, &[], 2)
        .map_err(|e| Error::Triangulation(format!("{:?}", e)))?;

    Ok(indices)
}

/// Orthonormal frame on the plane of a ring
#[derive(Debug, Clone, Copy)]
pub struct PlaneBasis {
    pub origin: Point3<f64>,
    pub normal: Vector3<f64>,
    pub u_axis: Vector3<f64>,
    pub v_axis: Vector3<f64>,
}

impl PlaneBasis {
    /// Fit a plane to `points`, anchored at the first point.
    ///
    /// The normal comes from the first consecutive pair whose cross
    /// product (relative to the anchor) is not degenerate, so collinear
    /// leading vertices are skipped.
    pub fn fit(points: &[Point3<f64>]) -> Result<Self> {
        let origin = *points.first().ok_or_else(|| {
            Error::Triangulation("Need at least 3 points to build a plane".to_string())
        })?;

        let normal = points
            .windows(2)
            .skip(1)
            .map(|pair| (pair[0] - origin).cross(&(pair[1] - origin)))
            .find(|n| n.norm() > MIN_TRIANGLE_AREA)
            .ok_or_else(|| {
                Error::DegenerateGeometry(format!(
                    "all {} ring vertices are collinear or coincident",
                    points.len()
                ))
            })?
            .normalize();

        // World X as helper unless the normal is nearly parallel to it
        let helper = if normal.x.abs() > 0.9 {
            Vector3::y()
        } else {
            Vector3::x()
        };
        let u_axis = normal.cross(&helper).normalize();
        let v_axis = normal.cross(&u_axis);

        Ok(Self {
            origin,
            normal,
            u_axis,
            v_axis,
        })
    }

    /// Project a point onto the (u, v) plane
    #[inline]
    pub fn project(&self, p: &Point3<f64>) -> Point2<f64> {
        let v = p - self.origin;
        Point2::new(v.dot(&self.u_axis), v.dot(&self.v_axis))
    }
}

/// Triangulate an open ring of 3D points (near-planar polygon, no holes).
///
/// Returns index triples into `points`.
pub fn triangulate_ring(points: &[Point3<f64>]) -> Result<Vec<[usize; 3]>> {
    let n = points.len();
    if n < 3 {
        return Err(Error::Triangulation(format!(
            "Need at least 3 points to triangulate, got {}",
            n
        )));
    }

    if n == 3 {
        let area = (points[1] - points[0]).cross(&(points[2] - points[0])).norm();
        if area <= MIN_TRIANGLE_AREA {
            return Err(Error::DegenerateGeometry(
                "triangle vertices are collinear or coincident".to_string(),
            ));
        }
        return Ok(vec![[0, 1, 2]]);
    }

    let basis = PlaneBasis::fit(points)?;
    let projected: Vec<Point2<f64>> = points.iter().map(|p| basis.project(p)).collect();

    // Triangulate corners only; vertices lying on a straight edge are dropped
    let corners: Vec<usize> = (0..n)
        .filter(|&i| {
            let (a, b, c) = (projected[(i + n - 1) % n], projected[i], projected[(i + 1) % n]);
            ((b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x)).abs() > COLLINEAR_TURN
        })
        .collect();
    if corners.len() < 3 {
        return Err(Error::DegenerateGeometry(format!(
            "ring of {} vertices has only {} corners",
            n,
            corners.len()
        )));
    }
    let corner_points: Vec<Point2<f64>> = corners.iter().map(|&i| projected[i]).collect();

    let indices = triangulate_polygon(&corner_points)?;
    if indices.is_empty() || indices.len() % 3 != 0 {
        return Err(Error::Triangulation(format!(
            "ring of {} vertices produced {} indices; it may be self-intersecting",
            n,
            indices.len()
        )));
    }

    let triangles: Vec<[usize; 3]> = indices
        .chunks_exact(3)
        .map(|tri| [corners[tri[0]], corners[tri[1]], corners[tri[2]]])
        .filter(|&[a, b, c]| {
            (points[b] - points[a]).cross(&(points[c] - points[a])).norm() > MIN_TRIANGLE_AREA
        })
        .collect();
    if triangles.is_empty() {
        return Err(Error::DegenerateGeometry(format!(
            "ring of {} vertices produced only zero-area triangles",
            n
        )));
    }

    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn area_2d(points: &[Point2<f64>], tris: &[usize]) -> f64 {
        tris.chunks_exact(3)
            .map(|t| {
                let (a, b, c) = (points[t[0]], points[t[1]], points[t[2]]);
                ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs() * 0.5
            })
            .sum()
    }

    fn area_3d(points: &[Point3<f64>], tris: &[[usize; 3]]) -> f64 {
        tris.iter()
            .map(|t| {
                (points[t[1]] - points[t[0]])
                    .cross(&(points[t[2]] - points[t[0]]))
                    .norm()
                    * 0.5
            })
            .sum()
    }

    #[test]
    fn test_triangulate_square() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];

        let indices = triangulate_polygon(&points).unwrap();

        // Square should be split into 2 triangles = 6 indices
        assert_eq!(indices.len(), 6);
    }

    #[test]
    fn test_triangulate_insufficient_points() {
        let points = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(triangulate_polygon(&points).is_err());
    }

    #[test]
    fn test_concave_quad_not_fanned_through_reflex_vertex() {
        // Arrow head: vertex 3 is reflex, a fan from vertex 0 would leave the polygon
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(0.0, 2.0),
            Point2::new(0.5, 1.0),
        ];
        let indices = triangulate_polygon(&points).unwrap();
        assert_eq!(indices.len(), 6);
        // Shoelace area of the arrow head is 1.5
        assert_relative_eq!(area_2d(&points, &indices), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn test_triangulate_l_shape() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let indices = triangulate_polygon(&points).unwrap();
        assert_eq!(indices.len(), 12);
        assert_relative_eq!(area_2d(&points, &indices), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ring_single_triangle() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        assert_eq!(triangulate_ring(&points).unwrap(), vec![[0, 1, 2]]);
    }

    #[test]
    fn test_ring_degenerate_triangle() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        ];
        assert!(matches!(
            triangulate_ring(&points),
            Err(Error::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_ring_too_few_points() {
        let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        assert!(matches!(
            triangulate_ring(&points),
            Err(Error::Triangulation(_))
        ));
    }

    #[test]
    fn test_ring_collinear_polygon() {
        let points: Vec<Point3<f64>> = (0..5).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        assert!(matches!(
            triangulate_ring(&points),
            Err(Error::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_ring_vertical_square_with_collinear_lead() {
        // Wall face in the XY plane; first three vertices are collinear
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
        ];
        let tris = triangulate_ring(&points).unwrap();
        assert_eq!(tris.len(), 2);
        for t in &tris {
            assert!(!t.contains(&1), "edge vertex used as a corner: {:?}", t);
            assert!(area_3d(&points, &[*t]) > 1.0, "{:?}", t);
        }
        assert_relative_eq!(area_3d(&points, &tris), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_collinear_vertex_is_not_fanned() {
        // Rectangle with an extra vertex on its top edge
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        assert!(!is_convex(&points));
        let indices = triangulate_polygon(&points).unwrap();
        for t in indices.chunks_exact(3) {
            assert!(area_2d(&points, t) > 1e-9, "{:?}", t);
        }
        assert_relative_eq!(area_2d(&points, &indices), 8.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ring_plane_normal_along_x() {
        // Face in the YZ plane exercises the world-Y helper axis
        let points = [
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
            Point3::new(3.0, 4.0, 4.0),
            Point3::new(3.0, 2.0, 2.0),
            Point3::new(3.0, 0.0, 4.0),
        ];
        let tris = triangulate_ring(&points).unwrap();
        assert_eq!(tris.len(), 3);
        // Square 16 minus the notch triangle (0,4)-(2,2)-(4,4) of area 4
        assert_relative_eq!(area_3d(&points, &tris), 12.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ring_nearly_planar_noise() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1e-12, 0.0),
            Point3::new(1.0, -1e-12, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let tris = triangulate_ring(&points).unwrap();
        assert_eq!(tris.len(), 2);
        assert_relative_eq!(area_3d(&points, &tris), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_plane_basis_is_orthonormal() {
        let points = [
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(4.0, 2.0, 3.0),
            Point3::new(4.0, 5.0, 7.0),
        ];
        let basis = PlaneBasis::fit(&points).unwrap();
        assert_relative_eq!(basis.u_axis.norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(basis.v_axis.norm(), 1.0, epsilon = 1e-12);
        assert!(basis.u_axis.dot(&basis.v_axis).abs() < 1e-12);
        assert!(basis.normal.dot(&basis.u_axis).abs() < 1e-12);
    }
}
