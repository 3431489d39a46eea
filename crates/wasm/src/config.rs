use mark_render::RenderOptions;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsError, JsValue};

/// Configuration accepted by [`crate::MarkApp`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// Options for every rendered document.
    pub render: RenderOptions,
    /// Id of the element receiving the rendered document.
    pub content_id: String,
    /// Id of the element receiving the outline. `None` disables it.
    pub toc_id: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            content_id: "content".to_string(),
            toc_id: Some("toc".to_string()),
        }
    }
}

/// Reads an options object passed from JavaScript. `undefined` and `null`
/// give the defaults.
pub(crate) fn from_js<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: SiteConfig =
            serde_json::from_str(r#"{"contentId": "main", "render": {"rawHtml": true}}"#)
                .expect("config");
        assert_eq!(config.content_id, "main");
        assert_eq!(config.toc_id.as_deref(), Some("toc"));
        assert!(config.render.raw_html);
        assert!(config.render.emoji);
    }

    #[test]
    fn toc_can_be_disabled() {
        let config: SiteConfig = serde_json::from_str(r#"{"tocId": null}"#).expect("config");
        assert_eq!(config.toc_id, None);
        assert_eq!(config.content_id, "content");
    }
}
