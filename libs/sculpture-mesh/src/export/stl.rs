//! Binary STL writer.
//!
//! Layout: an 80-byte header, a little-endian `u32` triangle count, then one
//! 50-byte record per triangle (normal and three corners as `f32` triples,
//! followed by a zero attribute word).
//!
//! Scene space is Y-up; STL consumers expect Z-up, so every position goes
//! through [`to_stl_space`] with the unit scale applied at write time.

use crate::error::{SculptureError, SculptureResult};
use crate::mesh::Mesh;
use crate::sculpture::positive;
use config::constants::{MAX_TRIANGLES, STL_HEADER_LEN, STL_HEADER_TEXT, STL_TRIANGLE_RECORD_LEN};
use glam::DVec3;
use std::io::Write;

/// Serialized STL and its statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StlExport {
    pub bytes: Vec<u8>,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub byte_size: usize,
}

/// Maps a scene position to STL space: `(x, y, z) → (x, -z, y)`, scaled.
#[inline]
pub fn to_stl_space(v: DVec3, scale: f64) -> DVec3 {
    DVec3::new(v.x, -v.z, v.y) * scale
}

fn write_vec3<W: Write>(writer: &mut W, v: DVec3) -> std::io::Result<()> {
    writer.write_all(&(v.x as f32).to_le_bytes())?;
    writer.write_all(&(v.y as f32).to_le_bytes())?;
    writer.write_all(&(v.z as f32).to_le_bytes())
}

/// Streams `mesh` as binary STL, with `scale` output units (millimetres)
/// per scene unit. Returns the number of bytes written.
///
/// # Errors
///
/// Returns [`SculptureError::Config`] unless `scale` is finite and
/// positive, [`SculptureError::Compute`] if the mesh exceeds the triangle
/// limit and [`SculptureError::Io`] if the writer fails.
pub fn write_binary_stl<W: Write>(mesh: &Mesh, mut writer: W, scale: f64) -> SculptureResult<usize> {
    positive("stl_scale", scale)?;
    let triangle_count = mesh.triangle_count();
    if triangle_count > MAX_TRIANGLES {
        return Err(SculptureError::compute(format!(
            "too many triangles for export: {triangle_count} > {MAX_TRIANGLES}"
        )));
    }
    let count = u32::try_from(triangle_count)
        .map_err(|_| SculptureError::compute(format!("triangle count overflows u32: {triangle_count}")))?;

    let mut header = [b' '; STL_HEADER_LEN];
    let text = STL_HEADER_TEXT.as_bytes();
    let len = text.len().min(STL_HEADER_LEN);
    header[..len].copy_from_slice(&text[..len]);
    writer.write_all(&header)?;
    writer.write_all(&count.to_le_bytes())?;

    for tri in mesh.triangles() {
        let [a, b, c] = tri.map(|i| to_stl_space(mesh.vertex(i), scale));
        let normal = (b - a).cross(c - a).normalize_or_zero();
        write_vec3(&mut writer, normal)?;
        write_vec3(&mut writer, a)?;
        write_vec3(&mut writer, b)?;
        write_vec3(&mut writer, c)?;
        writer.write_all(&0u16.to_le_bytes())?;
    }
    writer.flush()?;

    Ok(STL_HEADER_LEN + 4 + STL_TRIANGLE_RECORD_LEN * triangle_count)
}

/// Serializes `mesh` into memory.
///
/// # Errors
///
/// See [`write_binary_stl`].
pub fn export_stl(mesh: &Mesh, scale: f64) -> SculptureResult<StlExport> {
    let expected = STL_HEADER_LEN + 4 + STL_TRIANGLE_RECORD_LEN * mesh.triangle_count();
    let mut bytes = Vec::with_capacity(expected);
    let byte_size = write_binary_stl(mesh, &mut bytes, scale)?;
    Ok(StlExport {
        bytes,
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        byte_size,
    })
}
