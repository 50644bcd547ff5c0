use super::StyleDocument;

const DEFAULT_STYLE_JSON: &str = include_str!("../../assets/default-style.json");

/// The built-in style adopted after a reset.
pub fn default_style() -> StyleDocument {
    StyleDocument::from_json_str(DEFAULT_STYLE_JSON).unwrap_or_else(|e| {
        tracing::error!("built-in default style is invalid: {}", e);
        StyleDocument::empty()
    })
}
