//! WASM-facing entry points for the route sculpture pipeline.
//!
//! This crate is compiled to a `cdylib` and consumed from JavaScript via
//! `wasm-bindgen`. Native tests drive the `_internal` helpers, which return
//! Rust error types instead of `JsValue`s.
//!
//! Requests are JSON documents:
//!
//! ```json
//! {
//!   "route": [{"lat": 46.0, "lon": 7.0, "elevation": 1200.0}, ...],
//!   "config": {"shape": "circular", "size_cm": 15.0},
//!   "elevation": {"rows": 2, "cols": 2, "samples": [1200, 1210, 1190, 1250]}
//! }
//! ```
//!
//! ```
//! let request = r#"{"route": [{"lat": 0.0, "lon": 0.0}, {"lat": 0.01, "lon": 0.01}]}"#;
//! let preview = sculpture_wasm::build_preview_internal(request, "preview", None).unwrap();
//! assert!(preview.part_count() >= 3);
//! ```

mod mesh_handle;

pub use mesh_handle::{MeshHandle, PreviewHandle, StlHandle};

use sculpture_mesh::text::FontRasterizer;
use sculpture_mesh::{
    ElevationGrid, QualityPreset, RouteData, RoutePoint, SculptureConfig, SculptureError,
    SculptureInput, SculpturePipeline,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Installs a panic hook that forwards Rust panics to the browser console.
///
/// # Examples
/// ```no_run
/// // In JavaScript: import and call once at startup.
/// // import { init_panic_hook } from "sculpture-wasm";
/// // init_panic_hook();
/// ```
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Preview and export request sent by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct SculptureRequest {
    pub route: Vec<RoutePoint>,
    #[serde(default)]
    pub config: SculptureConfig,
    #[serde(default)]
    pub elevation: Option<ElevationGrid>,
}

impl SculptureRequest {
    /// Parses a JSON request.
    ///
    /// # Errors
    ///
    /// Returns [`SculptureError::Input`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, SculptureError> {
        serde_json::from_str(json).map_err(|e| SculptureError::input(format!("Invalid request: {e}")))
    }
}

fn pipeline(quality: &str, font: Option<Vec<u8>>) -> Result<SculpturePipeline, SculptureError> {
    let quality: QualityPreset = quality.parse()?;
    let mut pipeline = SculpturePipeline::new(quality);
    // A font that fails to parse means no text, not a failed build.
    if let Some(rasterizer) = font.and_then(|bytes| FontRasterizer::from_bytes(bytes).ok()) {
        pipeline = pipeline.with_rasterizer(Box::new(rasterizer));
    }
    Ok(pipeline)
}

/// Prefix the host switches on: the route, the settings, or the generator.
pub fn error_kind(err: &SculptureError) -> &'static str {
    match err {
        SculptureError::Input { .. } => "input",
        SculptureError::Config(_) => "config",
        SculptureError::Compute { .. } | SculptureError::Io(_) => "generation",
    }
}

fn to_js_error(err: SculptureError) -> JsValue {
    JsValue::from_str(&format!("{}: {err}", error_kind(&err)))
}

/// Builds every part for the live preview.
///
/// # Errors
/// Returns a JavaScript error string prefixed with `input:` when the route
/// or request is unusable, `config:` for out-of-range settings or an
/// unknown quality name, and `generation:` for internal failures.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const preview = build_preview(JSON.stringify(request), "preview", fontBytes);
/// ```
#[wasm_bindgen]
pub fn build_preview(request: &str, quality: &str, font: Option<Vec<u8>>) -> Result<PreviewHandle, JsValue> {
    build_preview_internal(request, quality, font).map_err(to_js_error)
}

/// Builds, merges and serializes the sculpture to binary STL.
///
/// # Errors
/// Same as [`build_preview`].
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const stl = export_stl(JSON.stringify(request), "high", fontBytes);
/// // download(new Blob([stl.bytes()]), "sculpture.stl");
/// ```
#[wasm_bindgen]
pub fn export_stl(request: &str, quality: &str, font: Option<Vec<u8>>) -> Result<StlHandle, JsValue> {
    export_stl_internal(request, quality, font).map_err(to_js_error)
}

/// Host-only helper behind [`build_preview`].
pub fn build_preview_internal(
    request: &str,
    quality: &str,
    font: Option<Vec<u8>>,
) -> Result<PreviewHandle, SculptureError> {
    let request = SculptureRequest::from_json(request)?;
    let route = RouteData::from_points(request.route);
    let input = SculptureInput {
        route: &route,
        elevation: request.elevation.as_ref(),
        config: &request.config,
    };
    let parts = pipeline(quality, font)?.build_parts(&input)?;
    let handles = parts
        .named()
        .into_iter()
        .map(|(name, mesh)| MeshHandle::from_mesh(name, mesh))
        .collect();
    Ok(PreviewHandle::new(handles))
}

/// Host-only helper behind [`export_stl`].
pub fn export_stl_internal(
    request: &str,
    quality: &str,
    font: Option<Vec<u8>>,
) -> Result<StlHandle, SculptureError> {
    let request = SculptureRequest::from_json(request)?;
    let route = RouteData::from_points(request.route);
    let input = SculptureInput {
        route: &route,
        elevation: request.elevation.as_ref(),
        config: &request.config,
    };
    let export = pipeline(quality, font)?.export(&input)?;
    Ok(StlHandle::new(export))
}
