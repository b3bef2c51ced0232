//! Snippet engine: line-accurate excerpts of the source document.
//!
//! A snippet is the literal original text of a component or subcomponent's
//! line range with only the changed value lines substituted in place —
//! never re-serialized JSON, so comments, quoting and member order survive
//! untouched. Also builds the structured changed-tokens summary for export.

use std::collections::BTreeSet;

use serde_json::json;

use crate::model::StyleKey;

/// Re-extract `range` from `source_text` and patch the lines of changed
/// keys in place.
///
/// Degrades to an empty string when the range is missing or out of bounds
/// for the current text — an empty panel, not an error.
pub fn render_snippet(
    keys: &[StyleKey],
    changed: &BTreeSet<String>,
    range: Option<(usize, usize)>,
    source_text: &str,
) -> String {
    let Some((start, end)) = range else {
        return String::new();
    };

    let lines: Vec<&str> = source_text.lines().collect();
    if start == 0 || start > end || end > lines.len() {
        return String::new();
    }

    // 1-based inclusive range.
    let mut extracted: Vec<String> = lines[start - 1..end].iter().map(|l| l.to_string()).collect();

    for key in keys {
        if !changed.contains(&key.id) {
            continue;
        }
        patch_key_line(&mut extracted, key, start);
    }

    extracted.join("\n")
}

/// Substitute `key`'s current value into its line, keeping the original
/// indentation and trailing-comma shape.
///
/// Keys carry the absolute line number recorded at parse time; that line is
/// patched directly, so two members with the same local name (a direct key
/// and a flattened `hover.background_color`, say) never collide. Keys built
/// without a recorded line fall back to the first textual match.
fn patch_key_line(lines: &mut [String], key: &StyleKey, range_start: usize) {
    let needle = format!("\"{}\":", key.local_name());
    if let Some(line_number) = key.line_number {
        if let Some(line) = line_number
            .checked_sub(range_start)
            .and_then(|offset| lines.get_mut(offset))
        {
            if line.trim_start().starts_with(&needle) {
                *line = substitute_value(line, key);
            }
            return;
        }
    }
    for line in lines.iter_mut() {
        if line.trim_start().starts_with(&needle) {
            *line = substitute_value(line, key);
            return;
        }
    }
}

fn substitute_value(line: &str, key: &StyleKey) -> String {
    let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
    let comma = if line.trim_end().ends_with(',') { "," } else { "" };
    format!("{indent}\"{}\": \"{}\"{comma}", key.local_name(), key.value)
}

/// Build the changed-tokens export: a small JSON object keyed by component,
/// holding only the edited keys' current values. Independent of line
/// positions. Empty when nothing in scope changed.
pub fn changed_tokens_summary(
    component_id: &str,
    keys: &[StyleKey],
    changed: &BTreeSet<String>,
) -> String {
    let mut updates = serde_json::Map::new();
    for key in keys {
        if changed.contains(&key.id) {
            updates.insert(key.id.clone(), json!(key.value));
        }
    }
    if updates.is_empty() {
        return String::new();
    }

    let summary = json!({
        "component_updates": {
            component_id: updates
        }
    });
    serde_json::to_string_pretty(&summary).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StyleType;

    const SOURCE: &str = "{\n  \"chat\": {\n    \"background_color\": \"#112233\",\n    \"padding\": 12,\n    \"text_color\": \"#202124\"\n  }\n}";

    fn key(id: &str, value: &str) -> StyleKey {
        StyleKey {
            id: id.into(),
            label: id.into(),
            style_type: StyleType::Color,
            value: value.into(),
            comment: None,
            line_number: None,
        }
    }

    fn keyed_line(id: &str, value: &str, line: usize) -> StyleKey {
        StyleKey {
            line_number: Some(line),
            ..key(id, value)
        }
    }

    fn changed(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unchanged_snippet_is_byte_identical_to_extract() {
        let keys = vec![key("background_color", "#112233")];
        let out = render_snippet(&keys, &BTreeSet::new(), Some((2, 6)), SOURCE);
        assert_eq!(
            out,
            "  \"chat\": {\n    \"background_color\": \"#112233\",\n    \"padding\": 12,\n    \"text_color\": \"#202124\"\n  }"
        );
    }

    #[test]
    fn patched_line_preserves_indentation_and_comma() {
        let keys = vec![key("background_color", "#445566")];
        let out = render_snippet(&keys, &changed(&["background_color"]), Some((2, 6)), SOURCE);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "    \"background_color\": \"#445566\",");
        // Every other line stays byte-identical.
        assert_eq!(lines[0], "  \"chat\": {");
        assert_eq!(lines[2], "    \"padding\": 12,");
        assert_eq!(lines[3], "    \"text_color\": \"#202124\"");
        assert_eq!(lines[4], "  }");
    }

    #[test]
    fn last_property_keeps_no_trailing_comma() {
        let keys = vec![key("text_color", "#FF0000")];
        let out = render_snippet(&keys, &changed(&["text_color"]), Some((2, 6)), SOURCE);
        assert!(out.contains("    \"text_color\": \"#FF0000\"\n"));
        assert!(!out.contains("\"#FF0000\","));
    }

    #[test]
    fn missing_range_renders_empty() {
        let keys = vec![key("background_color", "#445566")];
        assert_eq!(render_snippet(&keys, &changed(&["background_color"]), None, SOURCE), "");
    }

    #[test]
    fn out_of_bounds_range_renders_empty() {
        let five_lines = "a\nb\nc\nd\ne";
        assert_eq!(render_snippet(&[], &BTreeSet::new(), Some((3, 8)), five_lines), "");
        assert_eq!(render_snippet(&[], &BTreeSet::new(), Some((0, 2)), five_lines), "");
        assert_eq!(render_snippet(&[], &BTreeSet::new(), Some((4, 3)), five_lines), "");
    }

    #[test]
    fn only_first_matching_line_is_patched() {
        let text = "{\n  \"c\": {\n    \"color\": \"#111\",\n    \"color\": \"#222\"\n  }\n}";
        let keys = vec![key("color", "#999")];
        let out = render_snippet(&keys, &changed(&["color"]), Some((2, 5)), text);
        assert!(out.contains("\"color\": \"#999\","));
        assert!(out.contains("\"color\": \"#222\""));
    }

    #[test]
    fn flattened_key_matches_its_local_name() {
        let text = "{\n  \"b\": {\n    \"hover\": {\n      \"background_color\": \"#EEE\"\n    }\n  }\n}";
        let keys = vec![key("hover.background_color", "#CCC")];
        let out = render_snippet(&keys, &changed(&["hover.background_color"]), Some((2, 6)), text);
        assert!(out.contains("      \"background_color\": \"#CCC\""));
    }

    #[test]
    fn colliding_local_names_patch_their_own_lines() {
        // A direct key and a flattened state-modifier key share a local
        // name; the edit lands on the flattened key's recorded line and
        // the earlier line keeps its bytes.
        let text = "{\n  \"chat\": {\n    \"background_color\": \"#FFFFFF\",\n    \"hover\": {\n      \"background_color\": \"#EEEEEE\"\n    }\n  }\n}";
        let keys = vec![
            keyed_line("background_color", "#FFFFFF", 3),
            keyed_line("hover.background_color", "#000000", 5),
        ];
        let out = render_snippet(&keys, &changed(&["hover.background_color"]), Some((2, 7)), text);
        assert!(out.contains("    \"background_color\": \"#FFFFFF\",\n"));
        assert!(out.contains("      \"background_color\": \"#000000\"\n"));
        assert!(!out.contains("\"#EEEEEE\""));
    }

    #[test]
    fn recorded_line_wins_over_textual_order() {
        let text = "{\n  \"c\": {\n    \"color\": \"#111\",\n    \"color\": \"#222\"\n  }\n}";
        let keys = vec![keyed_line("color", "#999", 4)];
        let out = render_snippet(&keys, &changed(&["color"]), Some((2, 5)), text);
        assert!(out.contains("\"color\": \"#111\","));
        assert!(out.contains("\"color\": \"#999\""));
    }

    #[test]
    fn tab_indentation_survives() {
        let text = "{\n\t\"c\": {\n\t\t\"text_color\": \"#111\",\n\t\t\"padding\": 4\n\t}\n}";
        let keys = vec![key("text_color", "#333")];
        let out = render_snippet(&keys, &changed(&["text_color"]), Some((2, 5)), text);
        assert!(out.contains("\t\t\"text_color\": \"#333\","));
    }

    #[test]
    fn summary_contains_only_changed_keys() {
        let keys = vec![key("background_color", "#445566"), key("text_color", "#202124")];
        let out = changed_tokens_summary("chat", &keys, &changed(&["background_color"]));
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(
            parsed["component_updates"]["chat"]["background_color"],
            "#445566"
        );
        assert!(parsed["component_updates"]["chat"].get("text_color").is_none());
    }

    #[test]
    fn summary_is_empty_without_changes() {
        let keys = vec![key("background_color", "#445566")];
        assert_eq!(changed_tokens_summary("chat", &keys, &BTreeSet::new()), "");
    }
}
