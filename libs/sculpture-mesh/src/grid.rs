//! Regular vertex grids and closing them into solids.
//!
//! Terrain and text plaques are both displaced grids whose front surface is
//! closed by walls along the border and a reversed copy behind it.

use crate::mesh::Mesh;
use glam::DVec3;

/// Vertex grid laid out row-major, `rows × cols` vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Grid {
    pub rows: usize,
    pub cols: usize,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> u32 {
        (row * self.cols + col) as u32
    }

    /// Two triangles per cell. With rows advancing along `r` and columns
    /// along `c`, faces point along `r × c`.
    pub fn add_triangles(&self, mesh: &mut Mesh) {
        for row in 0..self.rows - 1 {
            for col in 0..self.cols - 1 {
                let a = self.index(row, col);
                let b = self.index(row, col + 1);
                let c = self.index(row + 1, col);
                let d = self.index(row + 1, col + 1);
                mesh.add_triangle(a, c, b);
                mesh.add_triangle(b, c, d);
            }
        }
    }

    /// Border vertices in the direction the surface's boundary edges run.
    pub fn perimeter(&self) -> Vec<u32> {
        let (last_row, last_col) = (self.rows - 1, self.cols - 1);
        let mut border = Vec::with_capacity(2 * (last_row + last_col));
        border.extend((1..=last_col).rev().map(|col| self.index(0, col)));
        border.extend((0..last_row).map(|row| self.index(row, 0)));
        border.extend((0..last_col).map(|col| self.index(last_row, col)));
        border.extend((1..=last_row).rev().map(|row| self.index(row, last_col)));
        border
    }
}

/// Closes an open grid surface into a solid.
///
/// `project` maps each surface vertex onto the back face. The back face
/// reuses the surface triangles with reversed winding, and each border edge
/// gets a wall quad. Collapsed triangles are dropped.
pub(crate) fn close_surface(surface: &Mesh, perimeter: &[u32], project: impl Fn(DVec3) -> DVec3) -> Mesh {
    let count = surface.vertex_count() as u32;
    let mut solid = Mesh::with_capacity(
        surface.vertex_count() * 2,
        surface.triangle_count() * 2 + perimeter.len() * 2,
    );

    for v in surface.vertices() {
        solid.add_vertex(*v);
    }
    for v in surface.vertices() {
        solid.add_vertex(project(*v));
    }

    for tri in surface.triangles() {
        solid.add_triangle(tri[0], tri[1], tri[2]);
        solid.add_triangle(tri[0] + count, tri[2] + count, tri[1] + count);
    }

    let n = perimeter.len();
    for i in 0..n {
        let u = perimeter[i];
        let v = perimeter[(i + 1) % n];
        solid.add_triangle(v, u, v + count);
        solid.add_triangle(u, u + count, v + count);
    }

    remove_collapsed(&mut solid);
    solid.compute_normals();
    solid
}

/// Drops triangles with two corners at the same position and returns how
/// many were removed.
///
/// Such a triangle carries its only real edge in both directions, so
/// removing it never opens the mesh.
pub(crate) fn remove_collapsed(mesh: &mut Mesh) -> usize {
    let vertices = mesh.vertices();
    let keep: Vec<[u32; 3]> = mesh
        .triangles()
        .iter()
        .copied()
        .filter(|t| {
            let (a, b, c) = (
                vertices[t[0] as usize],
                vertices[t[1] as usize],
                vertices[t[2] as usize],
            );
            a != b && b != c && a != c
        })
        .collect();
    let removed = mesh.triangle_count() - keep.len();
    if removed > 0 {
        mesh.set_triangles(keep);
    }
    removed
}
