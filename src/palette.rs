//! Semantic-token palette: dotted paths to literal values.
//!
//! The palette is a read-only nested JSON mapping loaded once at startup
//! (`colors.background.base.level000` -> `"#FFFFFF"`). Resolution walks the
//! mapping one segment at a time; anything that does not land exactly on a
//! string leaf is simply "not found".

use serde_json::{Value, json};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum PaletteLoadError {
    #[error("cannot read token palette: {0}")]
    Io(#[from] std::io::Error),
    #[error("token palette is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token palette root is not a JSON object")]
    NotAnObject,
}

/// Immutable palette of semantic tokens. Small enough that resolution is a
/// plain walk with no caching.
#[derive(Debug, Clone)]
pub struct TokenPalette {
    root: Value,
}

impl TokenPalette {
    pub fn from_str(text: &str) -> Result<Self, PaletteLoadError> {
        let root: Value = serde_json::from_str(text)?;
        if !root.is_object() {
            return Err(PaletteLoadError::NotAnObject);
        }
        Ok(Self { root })
    }

    pub fn from_path(path: &std::path::Path) -> Result<Self, PaletteLoadError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_str(&text)
    }

    /// Load from a file, degrading to the built-in fallback palette when the
    /// file is missing or malformed. Never fails.
    pub fn load_or_fallback(path: Option<&std::path::Path>, bundled: &str) -> Self {
        let result = match path {
            Some(p) => Self::from_path(p),
            None => Self::from_str(bundled),
        };
        result.unwrap_or_else(|e| {
            warn!("token palette unavailable ({e}), using fallback palette");
            Self::fallback()
        })
    }

    /// Built-in palette with a handful of known color tokens.
    pub fn fallback() -> Self {
        Self {
            root: json!({
                "colors": {
                    "background": {
                        "base": {
                            "level000": "#FFFFFF",
                            "level020": "#F8F9FA",
                            "level040": "#F1F3F4",
                            "level060": "#E8EAED",
                            "level080": "#DADCE0",
                            "level100": "#BDC1C6"
                        },
                        "brand": {
                            "primary": {
                                "normal": "#1A73E8",
                                "hover": "#1557B0",
                                "active": "#174EA6"
                            }
                        }
                    },
                    "text": {
                        "base": {
                            "level800": "#202124",
                            "level600": "#5F6368",
                            "level400": "#9AA0A6"
                        }
                    }
                }
            }),
        }
    }

    /// Resolve a dotted path to its literal string value. Returns None when
    /// a segment is missing, an intermediate value is not a mapping, or the
    /// walk does not end exactly on a string leaf.
    pub fn resolve(&self, dotted_path: &str) -> Option<&str> {
        let mut current = &self.root;
        for segment in dotted_path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        current.as_str()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
