//! Map style document model.
//!
//! Only the keys the editor works with are typed; every other key of the style
//! and of each layer is carried verbatim in a flattened map so documents
//! round-trip without losing data. Edits never mutate in place: each
//! `with_*` / `without_*` method consumes or clones and returns a new document.

mod default;
mod id;

pub use default::default_style;
pub use id::generate_style_id;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

/// Paint properties consulted (in order) when picking a preview colour.
const COLOR_PROPERTIES: &[&str] = &[
    "background-color",
    "fill-color",
    "fill-extrusion-color",
    "line-color",
    "circle-color",
    "text-color",
    "icon-color",
];

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("style document must be a JSON object")]
    NotAnObject,
    #[error("invalid style document: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A single style layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(
        rename = "source-layer",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paint: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Layer {
    /// A layer is visible unless `layout.visibility` is `"none"`.
    pub fn is_visible(&self) -> bool {
        self.layout
            .as_ref()
            .and_then(|l| l.get("visibility"))
            .and_then(Value::as_str)
            != Some("none")
    }

    /// First literal colour found in the paint properties, if any.
    pub fn preview_color(&self) -> Option<&str> {
        let paint = self.paint.as_ref()?;
        COLOR_PROPERTIES
            .iter()
            .find_map(|prop| paint.get(*prop).and_then(Value::as_str))
    }

    fn with_visibility(mut self, visible: bool) -> Self {
        let layout = self.layout.get_or_insert_with(Map::new);
        let value = if visible { "visible" } else { "none" };
        layout.insert("visibility".to_string(), Value::String(value.to_string()));
        self
    }
}

/// An editable map style document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDocument {
    #[serde(default = "default_version")]
    pub version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sources: Map<String, Value>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_version() -> u8 {
    8
}

/// Format a point in time the way style documents record it
/// (`2024-01-02T03:04:05.678Z`).
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl StyleDocument {
    /// A fresh document with no sources and no layers.
    pub fn empty() -> Self {
        Self {
            version: default_version(),
            name: None,
            id: String::new(),
            sources: Map::new(),
            layers: Vec::new(),
            metadata: Map::new(),
            created: None,
            modified: None,
            extra: Map::new(),
        }
        .ensure_metadata()
    }

    pub fn from_value(value: Value) -> Result<Self, StyleError> {
        if !value.is_object() {
            return Err(StyleError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self, StyleError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Assign an id and a creation timestamp when either is missing.
    pub fn ensure_metadata(mut self) -> Self {
        if self.id.trim().is_empty() {
            self.id = generate_style_id();
        }
        if self.created.is_none() {
            self.created = Some(timestamp(Utc::now()));
        }
        self
    }

    pub fn has_layers(&self) -> bool {
        !self.layers.is_empty()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    pub fn with_modified(mut self, modified: String) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Snapshot of this document stamped as modified at `now`.
    ///
    /// The stamp never moves backwards: if the previous `modified` value is
    /// later than `now` (clock skew), it is kept.
    pub fn stamped(&self, now: DateTime<Utc>) -> Self {
        let previous = self
            .modified
            .as_deref()
            .and_then(|m| DateTime::parse_from_rfc3339(m).ok())
            .map(|m| m.with_timezone(&Utc));
        let at = match previous {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        self.clone().with_modified(timestamp(at))
    }

    pub fn with_layers(mut self, layers: Vec<Layer>) -> Self {
        self.layers = layers;
        self
    }

    /// Copy with the visibility of the layer at `index` flipped.
    pub fn with_layer_visibility_toggled(&self, index: usize) -> Self {
        let mut layers = self.layers.clone();
        if let Some(layer) = layers.get_mut(index) {
            let visible = layer.is_visible();
            *layer = layer.clone().with_visibility(!visible);
        }
        self.clone().with_layers(layers)
    }

    pub fn without_layer(&self, index: usize) -> Self {
        let mut layers = self.layers.clone();
        if index < layers.len() {
            layers.remove(index);
        }
        self.clone().with_layers(layers)
    }

    /// Copy with the layer at `from` swapped one step towards the top
    /// (`up == true`, lower index) or the bottom of the stack.
    pub fn with_layer_moved(&self, from: usize, up: bool) -> Self {
        let mut layers = self.layers.clone();
        let to = if up {
            from.checked_sub(1)
        } else {
            Some(from + 1).filter(|&to| to < layers.len())
        };
        if let Some(to) = to {
            if from < layers.len() {
                layers.swap(from, to);
            }
        }
        self.clone().with_layers(layers)
    }

    /// Serialize with 4-space indentation.
    pub fn to_pretty_json(&self) -> Result<String, StyleError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Read and parse a style document from disk.
pub fn load_style_file(path: &Path) -> Result<StyleDocument, StyleError> {
    let contents = std::fs::read_to_string(path).map_err(|source| StyleError::Read {
        path: path.display().to_string(),
        source,
    })?;
    StyleDocument::from_json_str(&contents)
}
