//! WebAssembly bindings
//!
//! Browser-facing wrappers over the drawing pipeline. Inputs and outputs are
//! JSON strings; failures become JavaScript errors.

use wasm_bindgen::prelude::*;

use crate::core::{RenderOptions, Structure};
use crate::plugins::Orchestrator;

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse(input: &str) -> Result<Structure, JsValue> {
    Orchestrator::new().parse(input).map_err(|e| to_js(format!("{:#}", e)))
}

/// Export structure JSON as a standalone SVG document
#[wasm_bindgen]
pub fn export_svg(input: &str) -> Result<String, JsValue> {
    Orchestrator::new()
        .process(input)
        .map_err(|e| to_js(format!("{:#}", e)))
}

/// Build the primitive scene for a structure, serialized as JSON
///
/// With `editable` set every primitive carries its hit target.
#[wasm_bindgen]
pub fn render_scene(input: &str, editable: bool) -> Result<String, JsValue> {
    let structure = parse(input)?;
    let options = RenderOptions {
        editable,
        ..RenderOptions::default()
    };
    let scene = Orchestrator::new()
        .render(&structure, &options)
        .map_err(|e| to_js(format!("{:#}", e)))?;
    serde_json::to_string(&scene).map_err(to_js)
}

/// Resolved arrows and state positions, serialized as JSON
#[wasm_bindgen]
pub fn resolve_arrows(input: &str) -> Result<String, JsValue> {
    let structure = parse(input)?;
    let inspection = Orchestrator::new()
        .inspect(&structure)
        .map_err(|e| to_js(format!("{:#}", e)))?;
    serde_json::to_string(&inspection).map_err(to_js)
}

/// The built-in sample structures as a JSON array
#[wasm_bindgen]
pub fn sample_structures() -> Result<String, JsValue> {
    serde_json::to_string(&Structure::samples()).map_err(to_js)
}
