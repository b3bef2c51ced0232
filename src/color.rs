//! Display-only hex color helpers.
//!
//! Used when listing color keys to show the resolved literal alongside an
//! `rgb(r, g, b)` rendering. Never feeds back into the document — values
//! round-trip as the exact strings they arrived in.

/// Parse `#RGB` or `#RRGGBB` into byte components. Alpha channels and
/// anything malformed return None.
pub fn parse_hex(value: &str) -> Option<[u8; 3]> {
    let hex = value.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let nibble = c.to_digit(16)? as u8;
                out[i] = nibble << 4 | nibble;
            }
            Some(out)
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some([r, g, b])
        }
        _ => None,
    }
}

/// Human-readable rendering for REPL output, e.g. `rgb(26, 115, 232)`.
pub fn describe(value: &str) -> Option<String> {
    let [r, g, b] = parse_hex(value)?;
    Some(format!("rgb({r}, {g}, {b})"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
