//! Editor session: selection state, value mutation, change tracking and
//! reset over a loaded style document.
//!
//! All mutation happens on the single command thread in response to
//! discrete user actions; there is no background work and no locking.
//! Selection holds component/subcomponent ids, never node copies — nodes
//! are value-like and replaced wholesale on reset, so every access
//! re-resolves by id.

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::index::LineIndex;
use crate::model::{StyleComponent, StyleDocument, StyleKey, StyleSubcomponent};
use crate::palette::TokenPalette;
use crate::parser::ParsedDocument;
use crate::snippet;

pub struct EditorSession {
    document: StyleDocument,
    palette: TokenPalette,
    source_text: String,
    index: LineIndex,
    selected_component: Option<String>,
    selected_subcomponent: Option<String>,
    /// Scoped paths (`component[.sub].key`) of every key edited since load
    /// or reset. Scoping keeps a subcomponent's `background_color` distinct
    /// from its parent's.
    changed: BTreeSet<String>,
    /// Cached snippet for the current selection, refreshed on every
    /// selection change or edit.
    current_snippet: String,
}

impl EditorSession {
    pub fn new(parsed: ParsedDocument, palette: TokenPalette) -> Self {
        Self {
            document: StyleDocument::new(parsed.components),
            palette,
            source_text: parsed.source_text,
            index: parsed.index,
            selected_component: None,
            selected_subcomponent: None,
            changed: BTreeSet::new(),
            current_snippet: String::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    pub fn components(&self) -> &[StyleComponent] {
        &self.document.components
    }

    pub fn selected_component(&self) -> Option<&StyleComponent> {
        self.document.component(self.selected_component.as_deref()?)
    }

    pub fn selected_subcomponent(&self) -> Option<&StyleSubcomponent> {
        self.selected_component()?
            .subcomponent(self.selected_subcomponent.as_deref()?)
    }

    /// Select a component and clear any subcomponent selection. Unknown ids
    /// leave the selection untouched.
    pub fn select_component(&mut self, id: &str) -> bool {
        if self.document.component(id).is_none() {
            warn!(component = %id, "select_component: unknown id");
            return false;
        }
        self.selected_component = Some(id.to_string());
        self.selected_subcomponent = None;
        self.refresh_snippet();
        true
    }

    /// Select a subcomponent of the currently selected component.
    pub fn select_subcomponent(&mut self, id: &str) -> bool {
        let Some(component) = self.selected_component() else {
            warn!("select_subcomponent: no component selected");
            return false;
        };
        if component.subcomponent(id).is_none() {
            warn!(subcomponent = %id, "select_subcomponent: unknown id");
            return false;
        }
        self.selected_subcomponent = Some(id.to_string());
        self.refresh_snippet();
        true
    }

    /// Drop back from a subcomponent to its parent component's scope.
    pub fn clear_subcomponent(&mut self) {
        self.selected_subcomponent = None;
        self.refresh_snippet();
    }

    /// Keys of the currently selected node: the subcomponent's when one is
    /// selected, else the component's direct keys.
    pub fn keys_in_scope(&self) -> &[StyleKey] {
        if let Some(sub) = self.selected_subcomponent() {
            &sub.keys
        } else if let Some(component) = self.selected_component() {
            &component.keys
        } else {
            &[]
        }
    }

    // -----------------------------------------------------------------------
    // Mutation & resolution
    // -----------------------------------------------------------------------

    /// Overwrite a key's value and track the change. The selected
    /// subcomponent's keys are searched first; a miss falls through to the
    /// component's direct keys. Unknown ids are a no-op: a caller bug,
    /// logged but never fatal.
    pub fn update_value(&mut self, key_id: &str, new_value: &str) -> bool {
        let Some(component_id) = self.selected_component.clone() else {
            warn!(key = %key_id, "update_value: no selection");
            return false;
        };
        let sub_id = self.selected_subcomponent.clone();
        let Some(component) = self.document.component_mut(&component_id) else {
            return false;
        };

        if let Some(sub) = sub_id.as_deref() {
            let key = component
                .subcomponents
                .iter_mut()
                .find(|s| s.id == sub)
                .and_then(|s| s.keys.iter_mut().find(|k| k.id == key_id));
            if let Some(key) = key {
                key.value = new_value.to_string();
                info!(key = %key_id, value = %new_value, "updated style value");
                self.changed.insert(format!("{component_id}.{sub}.{key_id}"));
                self.refresh_snippet();
                return true;
            }
        }

        if let Some(key) = component.keys.iter_mut().find(|k| k.id == key_id) {
            key.value = new_value.to_string();
            info!(key = %key_id, value = %new_value, "updated style value");
            self.changed.insert(format!("{component_id}.{key_id}"));
            self.refresh_snippet();
            return true;
        }

        warn!(key = %key_id, "update_value: key not found in selection scope");
        false
    }

    /// Resolve a key's display value: literal hex values come back verbatim,
    /// semantic tokens go through the palette. Lookup follows the same
    /// subcomponent-first order as `update_value`. None when unresolvable.
    pub fn resolve_display_value(&self, key_id: &str) -> Option<String> {
        let key = self
            .selected_subcomponent()
            .and_then(|s| s.keys.iter().find(|k| k.id == key_id))
            .or_else(|| {
                self.selected_component()
                    .and_then(|c| c.keys.iter().find(|k| k.id == key_id))
            })?;
        if key.value.starts_with('#') {
            return Some(key.value.clone());
        }
        self.palette.resolve(&key.value).map(str::to_string)
    }

    /// Restore the load-time snapshot, clear the changed-set, and re-resolve
    /// the selection by id — it survives only if the same ids still exist.
    pub fn reset_to_original(&mut self) {
        self.document.restore_original();
        self.changed.clear();

        if let Some(id) = self.selected_component.clone() {
            if self.document.component(&id).is_none() {
                self.selected_component = None;
                self.selected_subcomponent = None;
            } else if let Some(sub) = self.selected_subcomponent.clone() {
                let gone = self
                    .document
                    .component(&id)
                    .is_some_and(|c| c.subcomponent(&sub).is_none());
                if gone {
                    self.selected_subcomponent = None;
                }
            }
        }
        self.refresh_snippet();
        info!("reset to original document");
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    pub fn current_snippet(&self) -> &str {
        &self.current_snippet
    }

    pub fn changed_keys(&self) -> &BTreeSet<String> {
        &self.changed
    }

    /// Changed-tokens summary for the current selection scope.
    pub fn changed_tokens_summary(&self) -> String {
        let Some(component) = self.selected_component() else {
            return String::new();
        };
        let component_id = component.id.clone();
        let keys = self.keys_in_scope();
        let node_changed = self.changed_in_scope(keys);
        snippet::changed_tokens_summary(&component_id, keys, &node_changed)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Scoped path for a key id under the current selection.
    fn scope_path(&self, key_id: &str) -> Option<String> {
        let component = self.selected_component.as_deref()?;
        Some(match self.selected_subcomponent.as_deref() {
            Some(sub) => format!("{component}.{sub}.{key_id}"),
            None => format!("{component}.{key_id}"),
        })
    }

    /// Project the scoped changed-set down to plain key ids for the given
    /// node's keys.
    fn changed_in_scope(&self, keys: &[StyleKey]) -> BTreeSet<String> {
        keys.iter()
            .filter_map(|k| {
                let scoped = self.scope_path(&k.id)?;
                self.changed.contains(&scoped).then(|| k.id.clone())
            })
            .collect()
    }

    fn refresh_snippet(&mut self) {
        let component_id = self.selected_component.clone();
        self.current_snippet = match (component_id, self.selected_subcomponent.clone()) {
            (Some(comp), Some(sub)) => {
                let range = self.index.subcomponent_range(&comp, &sub);
                let keys = self.keys_in_scope();
                let changed = self.changed_in_scope(keys);
                snippet::render_snippet(keys, &changed, range, &self.source_text)
            }
            (Some(comp), None) => {
                let range = self.index.component_range(&comp);
                let keys = self.keys_in_scope();
                let changed = self.changed_in_scope(keys);
                snippet::render_snippet(keys, &changed, range, &self.source_text)
            }
            _ => String::new(),
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::load_from_str;

    const SOURCE: &str = r##"{
  "chat": {
    "background_color": "#112233",
    "text_color": "colors.text.base.level800",
    "header": {
      "title_color": "#202124",
      "background_color": "#F8F9FA"
    },
    "hover": {
      "background_color": "#EEEEEE"
    }
  },
  "nav": {
    "background_color": "#FFFFFF"
  }
}"##;

    fn session() -> EditorSession {
        let parsed = load_from_str(SOURCE).unwrap();
        EditorSession::new(parsed, TokenPalette::fallback())
    }

    #[test]
    fn select_component_clears_subcomponent() {
        let mut s = session();
        assert!(s.select_component("chat"));
        assert!(s.select_subcomponent("header"));
        assert!(s.selected_subcomponent().is_some());
        assert!(s.select_component("nav"));
        assert!(s.selected_subcomponent().is_none());
    }

    #[test]
    fn unknown_selection_is_a_no_op() {
        let mut s = session();
        assert!(!s.select_component("missing"));
        assert!(s.selected_component().is_none());
        assert!(s.select_component("chat"));
        assert!(!s.select_subcomponent("missing"));
        assert!(s.selected_subcomponent().is_none());
    }

    #[test]
    fn update_value_tracks_changes_and_refreshes_snippet() {
        let mut s = session();
        s.select_component("chat");
        assert!(s.update_value("background_color", "#445566"));
        assert!(s.changed_keys().contains("chat.background_color"));
        assert!(s.current_snippet().contains("\"background_color\": \"#445566\","));
    }

    #[test]
    fn update_unknown_key_changes_nothing() {
        let mut s = session();
        s.select_component("chat");
        let before = s.current_snippet().to_string();
        assert!(!s.update_value("no_such_key", "#000"));
        assert!(s.changed_keys().is_empty());
        assert_eq!(s.current_snippet(), before);
    }

    #[test]
    fn subcomponent_scope_takes_precedence() {
        let mut s = session();
        s.select_component("chat");
        s.select_subcomponent("header");
        // Both chat and header carry background_color; the edit lands on
        // the header's.
        assert!(s.update_value("background_color", "#ABCDEF"));
        assert!(s.changed_keys().contains("chat.header.background_color"));
        // Last member of the header object: no trailing comma to preserve.
        assert!(s.current_snippet().contains("\"background_color\": \"#ABCDEF\"\n"));

        // Back at the parent, its own key and snippet are untouched.
        s.select_component("chat");
        assert!(s.current_snippet().contains("\"background_color\": \"#112233\","));
    }

    #[test]
    fn subcomponent_miss_falls_back_to_parent_keys() {
        let mut s = session();
        s.select_component("chat");
        s.select_subcomponent("header");
        // text_color lives on chat, not on the header: the edit falls
        // through to the component's direct keys.
        assert!(s.update_value("text_color", "#010203"));
        assert!(s.changed_keys().contains("chat.text_color"));
        assert_eq!(s.resolve_display_value("text_color").as_deref(), Some("#010203"));
        // The header's own snippet is untouched by the parent-level edit.
        assert!(!s.current_snippet().contains("#010203"));

        s.select_component("chat");
        assert!(s.current_snippet().contains("\"text_color\": \"#010203\","));
    }

    #[test]
    fn flattened_key_edit_leaves_parent_line_alone() {
        let mut s = session();
        s.select_component("chat");
        // chat carries both a direct background_color and the flattened
        // hover.background_color; only the hover line may change.
        assert!(s.update_value("hover.background_color", "#000000"));
        let snippet = s.current_snippet();
        assert!(snippet.contains("\"background_color\": \"#112233\","));
        assert!(snippet.contains("      \"background_color\": \"#000000\"\n"));
        assert!(!snippet.contains("#EEEEEE"));
    }

    #[test]
    fn parent_snippet_excludes_subcomponent_edits() {
        let mut s = session();
        s.select_component("chat");
        s.select_subcomponent("header");
        s.update_value("title_color", "#FF0000");
        s.select_component("chat");
        // The parent's extracted range still holds the original line.
        assert!(s.current_snippet().contains("\"title_color\": \"#202124\","));
    }

    #[test]
    fn resolve_display_value_hex_and_token() {
        let mut s = session();
        s.select_component("chat");
        assert_eq!(s.resolve_display_value("background_color").as_deref(), Some("#112233"));
        assert_eq!(s.resolve_display_value("text_color").as_deref(), Some("#202124"));
        assert_eq!(s.resolve_display_value("missing"), None);
    }

    #[test]
    fn unresolvable_token_yields_none() {
        let mut s = session();
        s.select_component("chat");
        s.update_value("text_color", "colors.text.base.missing");
        assert_eq!(s.resolve_display_value("text_color"), None);
    }

    #[test]
    fn reset_restores_values_and_clears_changes() {
        let mut s = session();
        let original: Vec<_> = s
            .components()
            .iter()
            .flat_map(|c| c.keys.iter().map(|k| (k.id.clone(), k.value.clone())))
            .collect();

        s.select_component("chat");
        s.update_value("background_color", "#445566");
        s.update_value("text_color", "#000000");
        s.reset_to_original();

        let after: Vec<_> = s
            .components()
            .iter()
            .flat_map(|c| c.keys.iter().map(|k| (k.id.clone(), k.value.clone())))
            .collect();
        assert_eq!(original, after);
        assert!(s.changed_keys().is_empty());
        // Selection survives: the id still exists.
        assert_eq!(s.selected_component().map(|c| c.id.clone()).as_deref(), Some("chat"));
        assert!(s.current_snippet().contains("\"background_color\": \"#112233\","));
    }

    #[test]
    fn summary_scopes_to_selected_node() {
        let mut s = session();
        s.select_component("chat");
        s.update_value("background_color", "#445566");
        let summary = s.changed_tokens_summary();
        let parsed: serde_json::Value = serde_json::from_str(&summary).unwrap();
        assert_eq!(parsed["component_updates"]["chat"]["background_color"], "#445566");

        s.select_subcomponent("header");
        // Nothing changed in the header: empty summary.
        assert_eq!(s.changed_tokens_summary(), "");
    }

    #[test]
    fn snippet_without_selection_is_empty() {
        let s = session();
        assert_eq!(s.current_snippet(), "");
    }
}
