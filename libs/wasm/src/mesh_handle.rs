//! # Mesh Handles
//!
//! WASM-friendly wrappers for part buffers and exported STL bytes.

use sculpture_mesh::export::StlExport;
use sculpture_mesh::Mesh;
use wasm_bindgen::prelude::*;

/// One named part of the sculpture, ready for a `BufferGeometry`.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const preview = build_preview(JSON.stringify(request), "preview");
/// for (let i = 0; i < preview.part_count; i++) {
///   const part = preview.part(i);
///   const geometry = new THREE.BufferGeometry();
///   geometry.setAttribute('position', new THREE.BufferAttribute(part.vertices(), 3));
///   geometry.setAttribute('normal', new THREE.BufferAttribute(part.normals(), 3));
///   geometry.setIndex(new THREE.BufferAttribute(part.indices(), 1));
/// }
/// ```
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct MeshHandle {
    name: String,
    /// Vertex positions as [x, y, z, x, y, z, ...]
    vertices: Vec<f32>,
    /// Triangle indices as [i0, i1, i2, ...]
    indices: Vec<u32>,
    /// Vertex normals as [nx, ny, nz, ...]; empty when absent
    normals: Vec<f32>,
    vertex_count: u32,
    triangle_count: u32,
}

#[wasm_bindgen]
impl MeshHandle {
    /// Part name: terrain, base, route, markers or text.
    #[wasm_bindgen(getter)]
    pub fn name(&self) -> String {
        self.name.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    #[wasm_bindgen(getter)]
    pub fn triangle_count(&self) -> u32 {
        self.triangle_count
    }

    /// Vertex positions as a Float32Array.
    pub fn vertices(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.vertices[..])
    }

    /// Triangle indices as a Uint32Array.
    pub fn indices(&self) -> js_sys::Uint32Array {
        js_sys::Uint32Array::from(&self.indices[..])
    }

    /// Vertex normals as a Float32Array, empty if the part has none.
    pub fn normals(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.normals[..])
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }
}

impl MeshHandle {
    pub fn from_mesh(name: &str, mesh: &Mesh) -> Self {
        Self {
            name: name.to_string(),
            vertices: mesh.vertices_f32(),
            indices: mesh.indices_u32(),
            normals: mesh.normals_f32().unwrap_or_default(),
            vertex_count: mesh.vertex_count() as u32,
            triangle_count: mesh.triangle_count() as u32,
        }
    }

    pub fn vertex_buffer(&self) -> &[f32] {
        &self.vertices
    }

    pub fn normal_buffer(&self) -> &[f32] {
        &self.normals
    }
}

/// Every part of one preview build.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct PreviewHandle {
    parts: Vec<MeshHandle>,
}

#[wasm_bindgen]
impl PreviewHandle {
    #[wasm_bindgen(getter)]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Part at `index`, or `undefined` past the end.
    pub fn part(&self, index: usize) -> Option<MeshHandle> {
        self.parts.get(index).cloned()
    }
}

impl PreviewHandle {
    pub fn new(parts: Vec<MeshHandle>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[MeshHandle] {
        &self.parts
    }
}

/// Binary STL bytes and their statistics.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct StlHandle {
    export: StlExport,
}

#[wasm_bindgen]
impl StlHandle {
    /// File contents as a Uint8Array.
    pub fn bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(&self.export.bytes[..])
    }

    #[wasm_bindgen(getter)]
    pub fn vertex_count(&self) -> usize {
        self.export.vertex_count
    }

    #[wasm_bindgen(getter)]
    pub fn triangle_count(&self) -> usize {
        self.export.triangle_count
    }

    #[wasm_bindgen(getter)]
    pub fn byte_size(&self) -> usize {
        self.export.byte_size
    }
}

impl StlHandle {
    pub fn new(export: StlExport) -> Self {
        Self { export }
    }

    pub fn export(&self) -> &StlExport {
        &self.export
    }
}
