//! Document parser: decoded JSON -> forest of style components.
//!
//! Top-level objects become components. Nested objects are classified as
//! subcomponents when they look style-like (own member names carry one of
//! the style markers), otherwise their leaves are flattened into the parent
//! with a dotted id prefix. Non-style data (embedded assets, long strings,
//! nulls) is filtered out before a key is emitted.

use serde_json::Value;
use tracing::{debug, warn};

use crate::index::LineIndex;
use crate::model::{StyleComponent, StyleKey, StyleSubcomponent, StyleType, label_from_id};

/// Raw token data lives under this top-level key; it is never an editable
/// component.
pub const SEMANTIC_TOKENS_KEY: &str = "semantic_tokens";

/// Substrings that mark a nested object as a style group of its own.
const STYLE_MARKERS: [&str; 8] = [
    "color", "background", "border", "font", "padding", "margin", "width", "height",
];

/// Entry names that are state modifiers, never subcomponents, regardless of
/// what they contain.
const STATE_MODIFIERS: [&str; 7] = [
    "__comment", "hover", "active", "disabled", "focused", "selected", "normal",
];

/// Key-name substrings whose values are asset references, not styles.
const ASSET_NAME_MARKERS: [&str; 5] = ["src", "data", "image", "logo", "icon"];

/// Ancestor segments whose entire subtree is asset data.
const ASSET_ANCESTOR_MARKERS: [&str; 2] = ["logo_image", "icons"];

const MAX_VALUE_LEN: usize = 100;

// ---------------------------------------------------------------------------
// Errors + loading
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DocumentLoadError {
    #[error("cannot read style document: {0}")]
    Io(#[from] std::io::Error),
    #[error("style document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("style document root is not a JSON object")]
    NotAnObject,
}

/// A loaded document: the literal source text, the parsed component forest,
/// and the line index built from the same text.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub source_text: String,
    pub components: Vec<StyleComponent>,
    pub index: LineIndex,
}

/// Parse a document from source text: decode, index line positions, build
/// the component forest.
pub fn load_from_str(text: &str) -> Result<ParsedDocument, DocumentLoadError> {
    let root: Value = serde_json::from_str(text)?;
    if !root.is_object() {
        return Err(DocumentLoadError::NotAnObject);
    }
    let index = LineIndex::scan(text);
    let components = parse(&root, &index);
    Ok(ParsedDocument {
        source_text: text.to_string(),
        components,
        index,
    })
}

pub fn load_from_path(path: &std::path::Path) -> Result<ParsedDocument, DocumentLoadError> {
    let text = std::fs::read_to_string(path)?;
    load_from_str(&text)
}

/// Small built-in document used when the real one is missing or malformed,
/// so the editor is never empty. Runs through the same parse+index path,
/// which keeps snippets working against it.
pub const FALLBACK_DOCUMENT: &str = r##"{
  "chatbox": {
    "__comment": "Chat input box styling",
    "background_color": "colors.background.base.level000",
    "text_color": "colors.text.base.level800",
    "border_color": "colors.background.base.level080",
    "border_radius": 8
  },
  "avatar": {
    "__comment": "User avatar styling",
    "background_color": "colors.background.brand.primary.normal",
    "text_color": "#FFFFFF"
  }
}"##;

pub fn fallback_document() -> ParsedDocument {
    load_from_str(FALLBACK_DOCUMENT).expect("built-in fallback document must parse")
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a decoded root object into components, in document order.
/// Pure over the value; line positions come from `index`.
pub fn parse(root: &Value, index: &LineIndex) -> Vec<StyleComponent> {
    let Some(map) = root.as_object() else {
        return Vec::new();
    };

    let mut components = Vec::new();
    for (id, value) in map {
        if id == SEMANTIC_TOKENS_KEY {
            continue;
        }
        let Some(obj) = value.as_object() else {
            debug!(component = %id, "skipping non-object top-level entry");
            continue;
        };
        components.push(parse_component(id, obj, index));
    }
    components
}

fn parse_component(
    id: &str,
    obj: &serde_json::Map<String, Value>,
    index: &LineIndex,
) -> StyleComponent {
    let mut keys = Vec::new();
    let mut subcomponents = Vec::new();
    let mut comment = None;

    for (name, value) in obj {
        if name == "__comment" {
            if let Some(text) = value.as_str() {
                comment = Some(text.to_string());
            }
            continue;
        }
        match value.as_object() {
            Some(nested) if is_subcomponent(name, nested) => {
                subcomponents.push(parse_subcomponent(id, name, nested, index));
            }
            Some(nested) => {
                // Property group: flatten its leaves into the component's
                // direct keys under a dotted prefix.
                collect_keys(id, name, nested, index, &mut keys);
            }
            None => {
                if let Some(key) = make_key(id, name, value, index) {
                    keys.push(key);
                }
            }
        }
    }

    let range = index.component_range(id);
    StyleComponent {
        id: id.to_string(),
        label: label_from_id(id),
        keys,
        subcomponents,
        comment,
        start_line_number: range.map(|(s, _)| s),
        end_line_number: range.map(|(_, e)| e),
    }
}

/// One level of subcomponent nesting only: anything deeper flattens into the
/// subcomponent's direct keys.
fn parse_subcomponent(
    component_id: &str,
    id: &str,
    obj: &serde_json::Map<String, Value>,
    index: &LineIndex,
) -> StyleSubcomponent {
    let scope = format!("{component_id}.{id}");
    let mut keys = Vec::new();
    let mut comment = None;

    for (name, value) in obj {
        if name == "__comment" {
            if let Some(text) = value.as_str() {
                comment = Some(text.to_string());
            }
            continue;
        }
        match value.as_object() {
            Some(nested) => collect_keys(&scope, name, nested, index, &mut keys),
            None => {
                if let Some(key) = make_key(&scope, name, value, index) {
                    keys.push(key);
                }
            }
        }
    }

    let range = index.subcomponent_range(component_id, id);
    StyleSubcomponent {
        id: id.to_string(),
        label: label_from_id(id),
        keys,
        comment,
        start_line_number: range.map(|(s, _)| s),
        end_line_number: range.map(|(_, e)| e),
    }
}

/// A nested object is a subcomponent when any of its own member names
/// carries a style marker, unless the entry name is a state modifier.
fn is_subcomponent(name: &str, obj: &serde_json::Map<String, Value>) -> bool {
    if STATE_MODIFIERS.contains(&name.to_ascii_lowercase().as_str()) {
        return false;
    }
    obj.keys().any(|member| {
        let lower = member.to_ascii_lowercase();
        STYLE_MARKERS.iter().any(|marker| lower.contains(marker))
    })
}

/// Recursively flatten a property group's leaves into `keys`, prefixing ids
/// with the dotted path below `scope`.
fn collect_keys(
    scope: &str,
    prefix: &str,
    obj: &serde_json::Map<String, Value>,
    index: &LineIndex,
    keys: &mut Vec<StyleKey>,
) {
    for (name, value) in obj {
        if name == "__comment" {
            continue;
        }
        let full_id = format!("{prefix}.{name}");
        match value.as_object() {
            Some(nested) => collect_keys(scope, &full_id, nested, index, keys),
            None => {
                if let Some(key) = make_key(scope, &full_id, value, index) {
                    keys.push(key);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Key construction
// ---------------------------------------------------------------------------

/// Build a key for a primitive at `full_id` below `scope`, or None when the
/// skip filter rejects it.
fn make_key(scope: &str, full_id: &str, value: &Value, index: &LineIndex) -> Option<StyleKey> {
    let value_str = match value {
        Value::Null => {
            debug!(key = %full_id, "skipping null value");
            return None;
        }
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            warn!(key = %full_id, "unexpected value shape: {other}");
            return None;
        }
    };

    if should_skip(scope, full_id, &value_str) {
        debug!(key = %full_id, "skip filter rejected key");
        return None;
    }

    let style_type = classify(full_id, &value_str);
    let (label, comment) = label_and_comment(full_id);

    Some(StyleKey {
        id: full_id.to_string(),
        label,
        style_type,
        value: value_str,
        comment,
        line_number: index.key_line(scope, full_id),
    })
}

/// Filter out non-style data: asset URIs, long strings, asset-named keys,
/// and anything under an asset subtree.
fn should_skip(scope: &str, full_id: &str, value: &str) -> bool {
    if value == "nil" || value == "null" {
        return true;
    }
    if value.starts_with("data:image/") || value.len() > MAX_VALUE_LEN {
        return true;
    }

    let local = full_id.rsplit('.').next().unwrap_or(full_id).to_ascii_lowercase();
    if ASSET_NAME_MARKERS.iter().any(|marker| local.contains(marker)) {
        return true;
    }

    // Ancestor segments: everything above the key name, scope included.
    let ancestors = scope
        .split('.')
        .chain(full_id.split('.').rev().skip(1))
        .map(str::to_ascii_lowercase);
    for segment in ancestors {
        if ASSET_ANCESTOR_MARKERS.iter().any(|marker| segment.contains(marker)) {
            return true;
        }
    }
    false
}

/// Type classification. Literal hex colors win outright; then exact
/// booleans and integers; then color-ish names; everything else is a plain
/// string.
fn classify(id: &str, value: &str) -> StyleType {
    if value.starts_with('#') {
        return StyleType::Color;
    }
    if value == "true" || value == "false" {
        return StyleType::Bool;
    }
    if value.parse::<i64>().is_ok() {
        return StyleType::Number;
    }
    let lower = id.to_ascii_lowercase();
    if ["color", "background", "border"].iter().any(|m| lower.contains(m)) {
        return StyleType::Color;
    }
    StyleType::String
}

/// Fixed substring lookup for display labels and help text. First match
/// wins; order runs most-specific first.
const LABEL_TABLE: [(&str, Option<&str>, Option<&str>); 12] = [
    (
        "background_color",
        Some("Background Color"),
        Some("Sets the background color of this element"),
    ),
    (
        "text_color",
        Some("Text Color"),
        Some("Sets the color of the text"),
    ),
    (
        "border_color",
        Some("Border Color"),
        Some("Sets the color of the border"),
    ),
    (
        "border_radius",
        Some("Border Radius"),
        Some("Sets how rounded the corners are"),
    ),
    (
        "border_width",
        Some("Border Width"),
        Some("Sets the thickness of the border"),
    ),
    (
        "font_size",
        Some("Font Size"),
        Some("Sets the size of the text"),
    ),
    (
        "font_family",
        Some("Font Family"),
        Some("Sets the typeface used for the text"),
    ),
    (
        "font_weight",
        Some("Font Weight"),
        Some("Sets how bold the text appears"),
    ),
    ("padding", Some("Padding"), Some("Sets the inner spacing of this element")),
    ("margin", Some("Margin"), Some("Sets the outer spacing around this element")),
    ("hover", None, Some("Style applied when hovering over this element")),
    ("disabled", None, Some("Style applied when this element is disabled")),
];

fn label_and_comment(id: &str) -> (String, Option<String>) {
    let lower = id.to_ascii_lowercase();
    for (pattern, label, comment) in LABEL_TABLE {
        if lower.contains(pattern) {
            let label = label.map(str::to_string).unwrap_or_else(|| label_from_id(id));
            return (label, comment.map(str::to_string));
        }
    }
    (label_from_id(id), None)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
