use mark_wasm::{classify_click, render, render_html, render_toc, resolve_asset, rewrite_link};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

#[derive(Deserialize, Debug)]
struct Document {
    metadata: Value,
    toc: Vec<HeadingEntry>,
    tree: Vec<Value>,
    diagnostics: Diagnostics,
}

#[derive(Deserialize, Debug)]
struct HeadingEntry {
    rank: u8,
    slug: String,
    text: String,
}

#[derive(Deserialize, Debug)]
struct Diagnostics {
    entries: Vec<Value>,
}

fn options(value: Value) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .expect("options")
}

#[wasm_bindgen_test]
fn render_returns_metadata_toc_and_tree() {
    let source = "---\ntitle: \"Guide\"\ndraft: true\n---\n# Hello World\n\nSee [setup](setup.md).";
    let result = render(source, JsValue::UNDEFINED).expect("render should succeed");
    let document: Document = serde_wasm_bindgen::from_value(result).expect("deserialize result");

    assert_eq!(document.metadata, json!({"title": "Guide", "draft": true}));
    assert_eq!(document.toc.len(), 1);
    assert_eq!(document.toc[0].rank, 1);
    assert_eq!(document.toc[0].slug, "hello-world");
    assert_eq!(document.toc[0].text, "Hello World");
    assert!(document.diagnostics.entries.is_empty());

    assert_eq!(document.tree[0]["type"], "element");
    assert_eq!(document.tree[0]["tagName"], "h1");
    assert_eq!(document.tree[0]["properties"]["id"], "hello-world");
}

#[wasm_bindgen_test]
fn render_reports_metadata_errors() {
    let source = "---\ntitle: nope\n---\nBody";
    let result = render(source, JsValue::NULL).expect("render should succeed");
    let document: Document = serde_wasm_bindgen::from_value(result).expect("deserialize result");
    assert_eq!(document.metadata, json!({}));
    assert_eq!(document.diagnostics.entries.len(), 1);
}

#[wasm_bindgen_test]
fn render_html_honors_options() {
    let html = render_html("Hi :wave:", JsValue::UNDEFINED).expect("render");
    assert_eq!(html, "<p>Hi 👋</p>");

    let html = render_html("Hi :wave:", options(json!({"emoji": false}))).expect("render");
    assert_eq!(html, "<p>Hi :wave:</p>");
}

#[wasm_bindgen_test]
fn invalid_options_are_rejected() {
    assert!(render_html("x", options(json!({"emoji": "yes"}))).is_err());
}

#[wasm_bindgen_test]
fn toc_html_links_headings() {
    let html = render_toc("# A\n\ntext\n\n## B", JsValue::UNDEFINED).expect("toc");
    assert_eq!(
        html,
        "<h1><a href=\"#a\">A</a></h1><h2><a href=\"#b\">B</a></h2>"
    );
}

#[wasm_bindgen_test]
fn links_and_assets() {
    assert_eq!(rewrite_link("guide/index.md#x"), "guide/#x");
    assert_eq!(resolve_asset("/guide/"), "/guide/index.md");
    assert_eq!(resolve_asset(&rewrite_link("/a/b.md")), "/a/b.md");
}

#[wasm_bindgen_test]
fn classify_click_maps_anchors() {
    let click = options(json!({
        "target": {"kind": "anchor", "href": "#usage"},
        "modifiers": {"alt": false, "ctrl": false, "meta": false, "shift": false},
        "defaultPrevented": false
    }));
    let intent: Value =
        serde_wasm_bindgen::from_value(classify_click(click).expect("classify")).expect("intent");
    assert_eq!(intent, json!({"kind": "anchorLink", "fragment": "usage"}));

    let modified = options(json!({
        "target": {"kind": "anchor", "href": "#usage"},
        "modifiers": {"alt": false, "ctrl": true, "meta": false, "shift": false}
    }));
    let intent = classify_click(modified).expect("classify");
    assert!(intent.is_null());
}
