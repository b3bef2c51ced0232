//! Style document model: the in-memory tree of components, subcomponents and
//! editable keys.
//!
//! All key values are stored as strings regardless of semantic type — the
//! snippet engine needs them to round-trip verbatim into source text. Typed
//! reads go through `StyleKey::as_number` / `as_bool`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// StyleType
// ---------------------------------------------------------------------------

/// Semantic type of an editable style property. Drives which editing surface
/// a front end offers (color picker, toggle, stepper, text field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleType {
    Color,
    Font,
    String,
    Number,
    Bool,
}

/// Unknown or missing type tags decode as `String` so pre-typed documents
/// from older exports keep loading.
impl<'de> Deserialize<'de> for StyleType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer).unwrap_or_default();
        Ok(match raw.as_str() {
            "color" => StyleType::Color,
            "font" => StyleType::Font,
            "number" => StyleType::Number,
            "bool" => StyleType::Bool,
            _ => StyleType::String,
        })
    }
}

// ---------------------------------------------------------------------------
// Tree nodes
// ---------------------------------------------------------------------------

/// A single editable style property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleKey {
    /// Dotted or local property name, unique among sibling keys.
    pub id: String,
    /// Human-friendly display name derived from the id.
    pub label: String,
    #[serde(rename = "type")]
    pub style_type: StyleType,
    /// Current value, string-encoded regardless of `style_type`.
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// 1-based line of this property's assignment in the source text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_number: Option<usize>,
}

impl StyleKey {
    /// Last dot segment of the id — the literal property name as it appears
    /// in the source text (flattened keys carry their group path in the id).
    pub fn local_name(&self) -> &str {
        self.id.rsplit('.').next().unwrap_or(&self.id)
    }

    pub fn as_number(&self) -> Option<f64> {
        self.value.parse().ok()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

/// A named nested grouping of keys within a component (e.g. a hover state or
/// an icon block), independently selectable in the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSubcomponent {
    pub id: String,
    pub label: String,
    pub keys: Vec<StyleKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line_number: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line_number: Option<usize>,
}

/// A top-level named style group ("chat", "nav", "dashboard").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleComponent {
    pub id: String,
    pub label: String,
    /// Properties not classified as belonging to a subcomponent.
    pub keys: Vec<StyleKey>,
    #[serde(default)]
    pub subcomponents: Vec<StyleSubcomponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line_number: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line_number: Option<usize>,
}

impl StyleComponent {
    pub fn subcomponent(&self, id: &str) -> Option<&StyleSubcomponent> {
        self.subcomponents.iter().find(|s| s.id == id)
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The full parsed document plus a frozen copy captured at load time,
/// used by reset-to-original.
#[derive(Debug, Clone)]
pub struct StyleDocument {
    pub components: Vec<StyleComponent>,
    original_components: Vec<StyleComponent>,
}

impl StyleDocument {
    pub fn new(components: Vec<StyleComponent>) -> Self {
        Self {
            original_components: components.clone(),
            components,
        }
    }

    pub fn component(&self, id: &str) -> Option<&StyleComponent> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_mut(&mut self, id: &str) -> Option<&mut StyleComponent> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    /// Replace the live components with the load-time snapshot.
    pub fn restore_original(&mut self) {
        self.components = self.original_components.clone();
    }

    pub fn original(&self) -> &[StyleComponent] {
        &self.original_components
    }
}

/// Derive a display label from an identifier: underscores and dots become
/// spaces, each word capitalized.
pub fn label_from_id(id: &str) -> String {
    id.split(['_', '.'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
