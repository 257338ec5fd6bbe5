//! # Mesh Data Structure
//!
//! Core mesh representation with vertices, triangles, and optional
//! normal/UV buffers.

use config::constants::DEGENERATE_AREA_EPSILON;
use glam::{DMat3, DVec2, DVec3};
use std::collections::HashMap;

/// A triangle mesh with vertices and indices.
///
/// All geometry calculations use f64 internally. Export to f32 only
/// happens at the STL writer and the WASM boundary.
///
/// # Example
///
/// ```rust
/// use sculpture_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions (f64 for precision)
    vertices: Vec<DVec3>,
    /// Triangle indices (3 indices per triangle)
    triangles: Vec<[u32; 3]>,
    /// Optional vertex normals
    normals: Option<Vec<DVec3>>,
    /// Optional texture coordinates
    uvs: Option<Vec<DVec2>>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
            normals: None,
            uvs: None,
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Replaces the triangle list. Vertex buffers are untouched.
    pub fn set_triangles(&mut self, triangles: Vec<[u32; 3]>) {
        self.triangles = triangles;
    }

    /// Returns the vertex at the given index.
    #[inline]
    pub fn vertex(&self, index: u32) -> DVec3 {
        self.vertices[index as usize]
    }

    /// Returns the vertex normals.
    pub fn normals(&self) -> Option<&[DVec3]> {
        self.normals.as_deref()
    }

    /// Sets texture coordinates.
    pub fn set_uvs(&mut self, uvs: Vec<DVec2>) {
        self.uvs = Some(uvs);
    }

    /// Returns the texture coordinates.
    pub fn uvs(&self) -> Option<&[DVec2]> {
        self.uvs.as_deref()
    }

    /// Computes and sets area-weighted vertex normals.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![DVec3::ZERO; self.vertices.len()];

        for tri in &self.triangles {
            let v0 = self.vertices[tri[0] as usize];
            let v1 = self.vertices[tri[1] as usize];
            let v2 = self.vertices[tri[2] as usize];

            let normal = (v1 - v0).cross(v2 - v0);

            normals[tri[0] as usize] += normal;
            normals[tri[1] as usize] += normal;
            normals[tri[2] as usize] += normal;
        }

        for normal in &mut normals {
            *normal = normal.normalize_or_zero();
        }

        self.normals = Some(normals);
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        if self.vertices.is_empty() {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let mut min = self.vertices[0];
        let mut max = self.vertices[0];

        for v in &self.vertices[1..] {
            min = min.min(*v);
            max = max.max(*v);
        }

        (min, max)
    }

    /// Rotates all vertices (and normals) by a rotation matrix.
    pub fn rotate(&mut self, rotation: &DMat3) {
        for v in &mut self.vertices {
            *v = *rotation * *v;
        }
        if let Some(normals) = &mut self.normals {
            for n in normals {
                *n = (*rotation * *n).normalize_or_zero();
            }
        }
    }

    /// Merges another mesh into this one.
    ///
    /// Vertices are appended, not welded. Normal and UV buffers survive only
    /// when both meshes carry them.
    pub fn merge(&mut self, other: &Mesh) {
        let self_was_empty = self.vertices.is_empty() && self.triangles.is_empty();
        let offset = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&other.vertices);

        for tri in &other.triangles {
            self.triangles
                .push([tri[0] + offset, tri[1] + offset, tri[2] + offset]);
        }

        if self_was_empty {
            self.normals = other.normals.clone();
            self.uvs = other.uvs.clone();
            return;
        }

        self.normals = match (self.normals.take(), &other.normals) {
            (Some(mut mine), Some(theirs)) => {
                mine.extend_from_slice(theirs);
                Some(mine)
            }
            _ => None,
        };
        self.uvs = match (self.uvs.take(), &other.uvs) {
            (Some(mut mine), Some(theirs)) => {
                mine.extend_from_slice(theirs);
                Some(mine)
            }
            _ => None,
        };
    }

    /// Twice the area of a triangle.
    fn doubled_area(&self, tri: &[u32; 3]) -> f64 {
        let v0 = self.vertices[tri[0] as usize];
        let v1 = self.vertices[tri[1] as usize];
        let v2 = self.vertices[tri[2] as usize];
        (v1 - v0).cross(v2 - v0).length()
    }

    /// Expands the mesh so every triangle owns its three vertices.
    ///
    /// UVs are dropped; normals are recomputed per facet.
    pub fn to_non_indexed(&self) -> Mesh {
        let mut out = Mesh::with_capacity(self.triangles.len() * 3, self.triangles.len());
        for tri in &self.triangles {
            let a = out.add_vertex(self.vertices[tri[0] as usize]);
            let b = out.add_vertex(self.vertices[tri[1] as usize]);
            let c = out.add_vertex(self.vertices[tri[2] as usize]);
            out.add_triangle(a, b, c);
        }
        out.compute_normals();
        out
    }

    /// Counts directed edges that have no opposite partner.
    ///
    /// Zero means every edge is shared by exactly one triangle on each side,
    /// i.e. the mesh is closed. Positions are compared exactly, so
    /// unwelded duplicates of the same point count as the same vertex.
    pub fn open_edge_count(&self) -> usize {
        // `+ 0.0` folds negative zero onto positive zero.
        let key = |v: DVec3| {
            (
                (v.x + 0.0).to_bits(),
                (v.y + 0.0).to_bits(),
                (v.z + 0.0).to_bits(),
            )
        };
        let mut edges: HashMap<(_, _), i32> = HashMap::new();
        for tri in &self.triangles {
            for k in 0..3 {
                let a = key(self.vertices[tri[k] as usize]);
                let b = key(self.vertices[tri[(k + 1) % 3] as usize]);
                if a == b {
                    continue;
                }
                if a < b {
                    *edges.entry((a, b)).or_insert(0) += 1;
                } else {
                    *edges.entry((b, a)).or_insert(0) -= 1;
                }
            }
        }
        edges.values().map(|count| count.unsigned_abs() as usize).sum()
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All triangle indices are valid
    /// - No degenerate triangles (zero area)
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        for tri in &self.triangles {
            if tri[0] >= vertex_count || tri[1] >= vertex_count || tri[2] >= vertex_count {
                return false;
            }

            if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
                return false;
            }

            if self.doubled_area(tri) <= DEGENERATE_AREA_EPSILON {
                return false;
            }
        }

        true
    }

    /// Exports vertices as f32 array for GPU.
    ///
    /// Returns flattened [x, y, z, x, y, z, ...] array.
    pub fn vertices_f32(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.vertices.len() * 3);
        for v in &self.vertices {
            result.extend_from_slice(&[v.x as f32, v.y as f32, v.z as f32]);
        }
        result
    }

    /// Exports triangle indices as u32 array for GPU.
    pub fn indices_u32(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Exports normals as f32 array for GPU.
    pub fn normals_f32(&self) -> Option<Vec<f32>> {
        self.normals.as_ref().map(|normals| {
            let mut result = Vec::with_capacity(normals.len() * 3);
            for n in normals {
                result.extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
            }
            result
        })
    }
}
