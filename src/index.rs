//! Line-position index for the source document.
//!
//! A single pass over the raw JSON text records, for every object, the
//! inclusive 1-based line range it spans, and for every scalar member the
//! line its assignment sits on — keyed by dotted path from the document
//! root. The snippet engine uses these to extract the literal original
//! lines instead of re-serializing (which would lose formatting, comments
//! in values, and field order).
//!
//! The scan is structural, not validating: it only tracks strings, escapes
//! and brace depth, so mildly malformed input degrades to missing entries
//! rather than errors.

use std::collections::HashMap;

/// Identifier-to-line lookup table built by [`LineIndex::scan`].
#[derive(Debug, Default, Clone)]
pub struct LineIndex {
    /// Dotted object path -> inclusive (start, end) line range.
    ranges: HashMap<String, (usize, usize)>,
    /// Dotted scalar path -> 1-based line of the member's key.
    key_lines: HashMap<String, usize>,
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

impl LineIndex {
    /// Line range of a top-level component object.
    pub fn component_range(&self, component_id: &str) -> Option<(usize, usize)> {
        self.ranges.get(component_id).copied()
    }

    /// Line range of a subcomponent object inside a component.
    pub fn subcomponent_range(&self, component_id: &str, sub_id: &str) -> Option<(usize, usize)> {
        self.ranges.get(&format!("{component_id}.{sub_id}")).copied()
    }

    /// Line of a scalar member. `key_id` may be a dotted (flattened) id;
    /// the full nesting path is `<scope>.<key_id>` either way.
    pub fn key_line(&self, scope: &str, key_id: &str) -> Option<usize> {
        self.key_lines.get(&format!("{scope}.{key_id}")).copied()
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

enum Frame {
    /// An object; `path` is empty for the root and for objects reached
    /// through an array (those are not addressable by dotted path).
    Object {
        path: Option<String>,
        start_line: usize,
        pending_key: Option<(String, usize)>,
    },
    Array,
}

impl LineIndex {
    /// Build the index from the original source text.
    pub fn scan(text: &str) -> Self {
        let mut index = LineIndex::default();
        let mut stack: Vec<Frame> = Vec::new();
        let mut line = 1usize;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '\n' => line += 1,
                '"' => {
                    let start_line = line;
                    let content = read_string(&mut chars, &mut line);
                    if let Some(Frame::Object { path, pending_key, .. }) = stack.last_mut() {
                        match pending_key.take() {
                            // A string value completes the pending member.
                            Some((key, key_line)) => {
                                index.record_key(path.as_deref(), &key, key_line);
                            }
                            None => *pending_key = Some((content, start_line)),
                        }
                    }
                }
                '{' => {
                    let path = match stack.last_mut() {
                        Some(Frame::Object { path, pending_key, .. }) => pending_key
                            .take()
                            .map(|(key, _)| join_path(path.as_deref(), &key)),
                        Some(Frame::Array) => None,
                        None => Some(String::new()),
                    };
                    // Normalize: the root object is tracked but never recorded.
                    let path = match path {
                        Some(p) if p.is_empty() && !stack.is_empty() => None,
                        other => other,
                    };
                    stack.push(Frame::Object {
                        path,
                        start_line: line,
                        pending_key: None,
                    });
                }
                '}' => {
                    if let Some(Frame::Object { path, start_line, .. }) = stack.pop() {
                        if let Some(p) = path {
                            if !p.is_empty() {
                                index.ranges.insert(p, (start_line, line));
                            }
                        }
                    }
                }
                '[' => {
                    if let Some(Frame::Object { pending_key, .. }) = stack.last_mut() {
                        // Arrays are not editable nodes; discard the member.
                        pending_key.take();
                    }
                    stack.push(Frame::Array);
                }
                ']' => {
                    if matches!(stack.last(), Some(Frame::Array)) {
                        stack.pop();
                    }
                }
                ':' | ',' => {}
                c if c.is_whitespace() => {}
                // Bare scalar: number, true, false, null.
                _ => {
                    while let Some(&next) = chars.peek() {
                        if matches!(next, ',' | '}' | ']') || next.is_whitespace() {
                            break;
                        }
                        chars.next();
                    }
                    if let Some(Frame::Object { path, pending_key, .. }) = stack.last_mut() {
                        if let Some((key, key_line)) = pending_key.take() {
                            index.record_key(path.as_deref(), &key, key_line);
                        }
                    }
                }
            }
        }

        index
    }

    fn record_key(&mut self, scope: Option<&str>, key: &str, key_line: usize) {
        if let Some(scope) = scope {
            self.key_lines.insert(join_path(Some(scope), key), key_line);
        }
    }
}

/// Consume a JSON string body (opening quote already taken), handling
/// escapes; returns the unescaped-enough content (escapes are kept verbatim
/// — identifiers in these documents never contain them).
fn read_string(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, line: &mut usize) -> String {
    let mut out = String::new();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '\n' => {
                *line += 1;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn join_path(scope: Option<&str>, key: &str) -> String {
    match scope {
        Some("") | None => key.to_string(),
        Some(scope) => format!("{scope}.{key}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
