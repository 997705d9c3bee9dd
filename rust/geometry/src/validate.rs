// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Watertightness validation
//!
//! A geofence volume is only meaningful for ray casting when it is closed:
//! every edge must be shared by exactly two triangles. Vertices are welded
//! on a tolerance grid first so that triangle soups (where neighbouring
//! faces carry their own copies of each corner) are judged by geometry,
//! not by buffer layout.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::mesh::{local_triangles, structural_issues, TriangleMesh};
use crate::Point3;

/// Default vertex welding tolerance in meters
pub const DEFAULT_VALIDATION_TOLERANCE: f64 = 1e-6;

/// Squared cross-product magnitude at or below which a triangle is degenerate
const DEGENERATE_AREA_SQ: f64 = 1e-12;

/// Outcome of [`validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub triangle_count: usize,
    /// Edges used by anything other than exactly two triangles
    pub non_manifold_edge_count: usize,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>, triangle_count: usize, non_manifold: usize) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            triangle_count,
            non_manifold_edge_count: non_manifold,
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid {
            return write!(f, "valid ({} triangles)", self.triangle_count);
        }
        write!(
            f,
            "invalid ({} triangles, {} non-manifold edges): {}",
            self.triangle_count,
            self.non_manifold_edge_count,
            self.errors.join("; ")
        )
    }
}

/// Welds positions onto the `round(coord / tolerance)` grid
struct VertexWelder {
    inv_tolerance: f64,
    ids: FxHashMap<(i64, i64, i64), u32>,
}

impl VertexWelder {
    fn new(tolerance: f64, capacity: usize) -> Self {
        let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
            tolerance
        } else {
            DEFAULT_VALIDATION_TOLERANCE
        };
        Self {
            inv_tolerance: 1.0 / tolerance,
            ids: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    fn id(&mut self, p: &Point3<f64>) -> u32 {
        let key = (
            (p.x * self.inv_tolerance).round() as i64,
            (p.y * self.inv_tolerance).round() as i64,
            (p.z * self.inv_tolerance).round() as i64,
        );
        let next = self.ids.len() as u32;
        *self.ids.entry(key).or_insert(next)
    }
}

#[inline]
fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Check that `mesh` is a closed, non-degenerate surface.
///
/// All applicable errors are collected. Structural problems (missing or
/// malformed buffers) are reported alone since no triangles can be read.
pub fn validate<M: TriangleMesh + ?Sized>(mesh: &M, tolerance: f64) -> ValidationReport {
    let issues = structural_issues(mesh);
    if !issues.is_empty() {
        return ValidationReport::from_errors(issues, 0, 0);
    }

    let triangles = match local_triangles(mesh) {
        Ok(triangles) => triangles,
        Err(e) => return ValidationReport::from_errors(vec![e.to_string()], 0, 0),
    };

    let mut errors = Vec::new();
    for (i, tri) in triangles.iter().enumerate() {
        for (k, p) in tri.iter().enumerate() {
            if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
                errors.push(format!(
                    "triangle {} vertex {} has non-finite coordinates ({}, {}, {})",
                    i, k, p.x, p.y, p.z
                ));
            }
        }
    }
    // Non-finite vertices end validation before area and welding
    if !errors.is_empty() {
        return ValidationReport::from_errors(errors, triangles.len(), 0);
    }

    for (i, [a, b, c]) in triangles.iter().enumerate() {
        let cross = (b - a).cross(&(c - a));
        if cross.norm_squared() <= DEGENERATE_AREA_SQ {
            errors.push(format!(
                "triangle {} is degenerate (area {:.3e})",
                i,
                cross.norm() * 0.5
            ));
        }
    }

    let mut welder = VertexWelder::new(tolerance, triangles.len() * 3);
    let mut edge_usage: FxHashMap<(u32, u32), u32> =
        FxHashMap::with_capacity_and_hasher(triangles.len() * 3, Default::default());

    for tri in &triangles {
        let ids = [welder.id(&tri[0]), welder.id(&tri[1]), welder.id(&tri[2])];
        for k in 0..3 {
            *edge_usage
                .entry(edge_key(ids[k], ids[(k + 1) % 3]))
                .or_insert(0) += 1;
        }
    }

    let non_manifold = edge_usage.values().filter(|&&count| count != 2).count();
    if non_manifold > 0 {
        errors.push(format!(
            "mesh is not watertight: {} edges are not shared by exactly two triangles",
            non_manifold
        ));
    }

    ValidationReport::from_errors(errors, triangles.len(), non_manifold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Mesh, MeshView};

    fn tetrahedron() -> Mesh {
        Mesh::indexed(
            vec![
                0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0,
            ],
            vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3],
        )
    }

    /// Same tetrahedron as a soup with every corner duplicated
    fn tetrahedron_soup() -> Mesh {
        let indexed = tetrahedron();
        let mut soup = Mesh::new();
        for &i in &indexed.indices {
            let i = i as usize * 3;
            soup.positions.extend_from_slice(&indexed.positions[i..i + 3]);
        }
        soup
    }

    #[test]
    fn test_closed_tetrahedron_is_valid() {
        let report = validate(&tetrahedron(), DEFAULT_VALIDATION_TOLERANCE);
        assert!(report.is_valid, "{}", report);
        assert_eq!(report.triangle_count, 4);
        assert_eq!(report.non_manifold_edge_count, 0);
    }

    #[test]
    fn test_soup_is_welded() {
        let report = validate(&tetrahedron_soup(), DEFAULT_VALIDATION_TOLERANCE);
        assert!(report.is_valid, "{}", report);
    }

    #[test]
    fn test_open_surface_reports_boundary_edges() {
        let mut mesh = tetrahedron();
        mesh.indices.truncate(9);
        let report = validate(&mesh, DEFAULT_VALIDATION_TOLERANCE);
        assert!(!report.is_valid);
        // Removing one face exposes its three edges
        assert_eq!(report.non_manifold_edge_count, 3);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("3 edges"));
    }

    #[test]
    fn test_degenerate_triangle_reported_by_index() {
        let mesh = Mesh::indexed(
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0],
            vec![0, 1, 2],
        );
        let report = validate(&mesh, DEFAULT_VALIDATION_TOLERANCE);
        assert!(!report.is_valid);
        assert!(report.errors[0].starts_with("triangle 0 is degenerate"));
        // A lone triangle also leaves three boundary edges
        assert_eq!(report.non_manifold_edge_count, 3);
    }

    #[test]
    fn test_non_finite_vertices_are_reported() {
        for bad in [
            [f64::NAN, f64::NAN, f64::NAN],
            [f64::INFINITY, 1.0, 1.0],
            [1.0, f64::NEG_INFINITY, 1.0],
        ] {
            let mut mesh = tetrahedron();
            mesh.positions[9..12].copy_from_slice(&bad.map(|c| c as f32));

            let report = validate(&mesh, DEFAULT_VALIDATION_TOLERANCE);
            assert!(!report.is_valid, "{:?}", bad);
            assert_eq!(report.triangle_count, 4);
            // Vertex 3 appears in three of the four faces
            assert_eq!(report.errors.len(), 3, "{}", report);
            assert!(report
                .errors
                .iter()
                .all(|e| e.contains("non-finite coordinates")));
        }
    }

    #[test]
    fn test_degenerate_threshold_is_squared_cross_magnitude() {
        let sliver = |height: f32| {
            Mesh::indexed(
                vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.5, height, 0.0],
                vec![0, 1, 2],
            )
        };
        // |cross| = 8e-7, squared below 1e-12
        let report = validate(&sliver(8e-7), 1e-9);
        assert!(report.errors[0].starts_with("triangle 0 is degenerate"), "{}", report);

        // |cross| = 1.5e-6, squared above 1e-12; only the open edges remain
        let report = validate(&sliver(1.5e-6), 1e-9);
        assert_eq!(report.errors.len(), 1, "{}", report);
        assert!(report.errors[0].starts_with("mesh is not watertight"));
    }

    #[test]
    fn test_structural_errors_abort_early() {
        let positions = [0.0f32; 12];
        let report = validate(&MeshView::new(&positions, None), DEFAULT_VALIDATION_TOLERANCE);
        assert!(!report.is_valid);
        assert_eq!(report.triangle_count, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("divisible by 9"));
    }

    #[test]
    fn test_coarse_tolerance_welds_gap() {
        let mut soup = tetrahedron_soup();
        soup.positions[0] += 1e-4;
        assert!(!validate(&soup, DEFAULT_VALIDATION_TOLERANCE).is_valid);
        assert!(validate(&soup, 1e-2).is_valid);
    }

    #[test]
    fn test_input_not_mutated() {
        let mesh = tetrahedron();
        let before = mesh.positions.clone();
        let _ = validate(&mesh, DEFAULT_VALIDATION_TOLERANCE);
        assert_eq!(mesh.positions, before);
    }

    #[test]
    fn test_display() {
        let report = validate(&tetrahedron(), DEFAULT_VALIDATION_TOLERANCE);
        assert_eq!(report.to_string(), "valid (4 triangles)");
    }
}
