//! stylescope: browse and edit a hierarchical JSON style document.
//!
//! The document describes UI component styles (colors, fonts, sizes,
//! booleans). stylescope parses it into components and subcomponents of
//! editable keys, resolves semantic-token values against a palette, tracks
//! edits, and exports line-accurate snippets of the original source text
//! with only the changed lines patched — ready to paste back into the real
//! file.

pub mod color;
pub mod editor;
pub mod index;
pub mod logging;
pub mod model;
pub mod palette;
pub mod parser;
pub mod repl;
pub mod snippet;

/// Default style document bundled with the application.
pub const BUNDLED_STYLES: &str = include_str!("../assets/interface_styles.json");

/// Default semantic-token palette bundled with the application.
pub const BUNDLED_PALETTE: &str = include_str!("../assets/token_palette.json");
