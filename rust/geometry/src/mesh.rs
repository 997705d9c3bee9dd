// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures
//!
//! Geofence operations accept any [`TriangleMesh`]: something with a flat
//! position buffer and an optional index buffer. [`Mesh`] is the owned
//! implementation produced by this crate, [`MeshView`] borrows buffers
//! owned elsewhere (typed arrays from JavaScript, GPU staging copies, ...).

use nalgebra::{Point3, Vector3};

/// Triangle in local meters
pub type LocalTriangle = [Point3<f64>; 3];

/// Flat vertex positions plus the number of components per vertex
#[derive(Debug, Clone, Copy)]
pub struct PositionAttribute<'a> {
    pub array: &'a [f32],
    pub item_size: usize,
}

/// Indexed or non-indexed triangle mesh with 3D positions
pub trait TriangleMesh {
    /// Position buffer, `None` if the mesh has no position data
    fn position_attribute(&self) -> Option<PositionAttribute<'_>>;

    /// Triangle indices, `None` for a non-indexed triangle soup
    fn index(&self) -> Option<&[u32]>;
}

/// Triangle mesh
///
/// An empty `indices` buffer means the positions are a triangle soup
/// (every 9 floats form one triangle).
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Indexed mesh from flat positions and indices, normals computed
    pub fn indexed(positions: Vec<f32>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            positions,
            normals: Vec::new(),
            indices,
        };
        calculate_normals(&mut mesh);
        mesh
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        if self.is_indexed() {
            self.indices.len() / 3
        } else {
            self.positions.len() / 9
        }
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl TriangleMesh for Mesh {
    fn position_attribute(&self) -> Option<PositionAttribute<'_>> {
        Some(PositionAttribute {
            array: &self.positions,
            item_size: 3,
        })
    }

    fn index(&self) -> Option<&[u32]> {
        self.is_indexed().then_some(self.indices.as_slice())
    }
}

/// Borrowed mesh buffers with an explicit component count
#[derive(Debug, Clone, Copy)]
pub struct MeshView<'a> {
    pub positions: Option<&'a [f32]>,
    pub item_size: usize,
    pub indices: Option<&'a [u32]>,
}

impl<'a> MeshView<'a> {
    /// View over xyz positions with optional indices
    pub fn new(positions: &'a [f32], indices: Option<&'a [u32]>) -> Self {
        Self {
            positions: Some(positions),
            item_size: 3,
            indices,
        }
    }
}

impl TriangleMesh for MeshView<'_> {
    fn position_attribute(&self) -> Option<PositionAttribute<'_>> {
        self.positions.map(|array| PositionAttribute {
            array,
            item_size: self.item_size,
        })
    }

    fn index(&self) -> Option<&[u32]> {
        self.indices
    }
}

/// Structural problems that prevent reading triangles from `mesh`
pub fn structural_issues<M: TriangleMesh + ?Sized>(mesh: &M) -> Vec<String> {
    let Some(attr) = mesh.position_attribute() else {
        return vec!["mesh has no position attribute".to_string()];
    };

    let mut issues = Vec::new();
    if attr.item_size != 3 {
        issues.push(format!(
            "position attribute must have 3 components per vertex, found {}",
            attr.item_size
        ));
        return issues;
    }

    let len = attr.array.len();
    if len % 3 != 0 {
        issues.push(format!("position array length {} is not divisible by 3", len));
    }

    match mesh.index() {
        Some(index) => {
            if index.len() % 3 != 0 {
                issues.push(format!("index array length {} is not divisible by 3", index.len()));
            }
            let vertex_count = len / 3;
            if let Some(&bad) = index.iter().find(|&&i| i as usize >= vertex_count) {
                issues.push(format!(
                    "index {} is out of range for {} vertices",
                    bad, vertex_count
                ));
            }
        }
        None => {
            if len % 9 != 0 {
                issues.push(format!(
                    "non-indexed position array length {} is not divisible by 9",
                    len
                ));
            }
        }
    }

    issues
}

#[inline]
fn vertex_at(array: &[f32], i: usize) -> Point3<f64> {
    Point3::new(
        array[i * 3] as f64,
        array[i * 3 + 1] as f64,
        array[i * 3 + 2] as f64,
    )
}

/// Read every triangle of `mesh` in f64 local coordinates
pub fn local_triangles<M: TriangleMesh + ?Sized>(mesh: &M) -> crate::Result<Vec<LocalTriangle>> {
    if let Some(issue) = structural_issues(mesh).into_iter().next() {
        return Err(crate::Error::Structural(issue));
    }
    let Some(attr) = mesh.position_attribute() else {
        return Err(crate::Error::Structural("mesh has no position attribute".to_string()));
    };
    let positions = attr.array;

    let triangles = match mesh.index() {
        Some(index) => index
            .chunks_exact(3)
            .map(|tri| {
                [
                    vertex_at(positions, tri[0] as usize),
                    vertex_at(positions, tri[1] as usize),
                    vertex_at(positions, tri[2] as usize),
                ]
            })
            .collect(),
        None => (0..positions.len() / 9)
            .map(|t| {
                [
                    vertex_at(positions, t * 3),
                    vertex_at(positions, t * 3 + 1),
                    vertex_at(positions, t * 3 + 2),
                ]
            })
            .collect(),
    };

    Ok(triangles)
}

/// Calculate vertex normals for a mesh.
///
/// Indexed meshes get area-weighted smooth normals; triangle soups get
/// the flat normal of their face.
pub fn calculate_normals(mesh: &mut Mesh) {
    let vertex_count = mesh.vertex_count();
    if vertex_count == 0 {
        return;
    }

    let mut normals = vec![Vector3::zeros(); vertex_count];

    let face_normal = |positions: &[f32], i0: usize, i1: usize, i2: usize| {
        let v0 = vertex_at(positions, i0);
        let v1 = vertex_at(positions, i1);
        let v2 = vertex_at(positions, i2);
        (v1 - v0).cross(&(v2 - v0))
    };

    if mesh.is_indexed() {
        for tri in mesh.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            if i0.max(i1).max(i2) >= vertex_count {
                continue;
            }
            let normal = face_normal(&mesh.positions, i0, i1, i2);
            normals[i0] += normal;
            normals[i1] += normal;
            normals[i2] += normal;
        }
    } else {
        for t in 0..vertex_count / 3 {
            let base = t * 3;
            let normal = face_normal(&mesh.positions, base, base + 1, base + 2);
            normals[base] = normal;
            normals[base + 1] = normal;
            normals[base + 2] = normal;
        }
    }

    // Normalize and write back
    mesh.normals.clear();
    mesh.normals.reserve(vertex_count * 3);

    for normal in normals {
        let normalized = normal.try_normalize(1e-12).unwrap_or_else(Vector3::zeros);
        mesh.normals.push(normalized.x as f32);
        mesh.normals.push(normalized.y as f32);
        mesh.normals.push(normalized.z as f32);
    }
}
