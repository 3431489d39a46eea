//! WebAssembly bindings: stateless rendering helpers plus [`MarkApp`], the
//! in-page navigation driver.

mod app;
mod browser;
mod config;

pub use app::MarkApp;
pub use browser::{BrowserFetch, BrowserHistory, read_descriptors};
pub use config::SiteConfig;

use config::from_js;
use mark_nav::{Click, classify};
use mark_render::RenderOptions;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Renders a markdown document.
///
/// Returns `{ metadata, toc, tree, diagnostics }`, with `tree` as tagged
/// render nodes (`{type: "element", tagName, properties, children}`,
/// `{type: "text", value}`).
///
/// # Example (JavaScript)
///
/// ```javascript
/// import { render } from './mark_wasm';
///
/// const doc = render('---\ntitle: "Guide"\n---\n# Guide', { emoji: false });
/// // doc.metadata = { title: "Guide" }
/// // doc.toc = [{ rank: 1, text: "Guide", slug: "guide" }]
/// ```
#[wasm_bindgen]
pub fn render(source: &str, options: JsValue) -> Result<JsValue, JsError> {
    let options: RenderOptions = from_js(options)?;
    to_js(&mark_render::render_document(source, &options))
}

/// Renders a markdown document body to an HTML string.
#[wasm_bindgen(js_name = renderHtml)]
pub fn render_html(source: &str, options: JsValue) -> Result<String, JsError> {
    let options: RenderOptions = from_js(options)?;
    let document = mark_render::render_document(source, &options);
    Ok(mark_render::to_html(&document.tree))
}

/// Renders the heading outline of a document to an HTML string.
#[wasm_bindgen(js_name = renderToc)]
pub fn render_toc(source: &str, options: JsValue) -> Result<String, JsError> {
    let options: RenderOptions = from_js(options)?;
    Ok(mark_render::to_html(&mark_render::render_toc(source, &options)))
}

/// Maps a clean path to its markdown asset (`/guide/` to `/guide/index.md`).
#[wasm_bindgen(js_name = resolveAsset)]
pub fn resolve_asset(path: &str) -> String {
    mark_nav::resolve(path)
}

/// Sanitizes and rewrites a document link to its clean URL.
#[wasm_bindgen(js_name = rewriteLink)]
pub fn rewrite_link(url: &str) -> String {
    mark_core::transform_url(url)
}

/// Classifies a click description into a navigation intent, or `null` when
/// the click keeps its default behavior.
#[wasm_bindgen(js_name = classifyClick)]
pub fn classify_click(click: JsValue) -> Result<JsValue, JsError> {
    let click: Click = serde_wasm_bindgen::from_value(click)
        .map_err(|e| JsError::new(&format!("Invalid click: {}", e)))?;
    to_js(&classify(&click))
}
