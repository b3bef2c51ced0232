//! Interactive style editor command layer.
//!
//! Commands: list, open, sub, back, keys, get, set, snippet, summary,
//! changed, copy, reset, help, exit. Command execution produces tagged
//! output lines; the caller decides how to render them (the binary prints
//! to stdout).

use crate::color;
use crate::editor::EditorSession;
use crate::model::{StyleKey, StyleType};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Output line styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplOutputKind {
    Info,
    Success,
    Error,
    Value,
}

pub type ReplLine = (String, ReplOutputKind);

/// What the `copy` command exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyTarget {
    Snippet,
    Summary,
}

/// Self-contained REPL state: command history plus the exit flag. Document
/// state lives in the `EditorSession` passed to `execute`.
pub struct StyleRepl {
    history: Vec<String>,
    done: bool,
}

impl Default for StyleRepl {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl StyleRepl {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            done: false,
        }
    }

    /// True once `exit` has run; the caller should stop its input loop.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Execute one command line against the session.
    pub fn execute(&mut self, line: &str, session: &mut EditorSession) -> Vec<ReplLine> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }
        self.history.push(line.to_string());

        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts[0] {
            "help" => cmd_help(),
            "exit" | "quit" => {
                self.done = true;
                Vec::new()
            }
            "list" => cmd_list(session),
            "open" => match parts.get(1) {
                Some(id) => cmd_open(session, id),
                None => usage("Usage: open <component>"),
            },
            "sub" => match parts.get(1) {
                Some(id) => cmd_sub(session, id),
                None => usage("Usage: sub <subcomponent>"),
            },
            "back" => {
                session.clear_subcomponent();
                vec![("Back at component scope".into(), ReplOutputKind::Info)]
            }
            "keys" => cmd_keys(session),
            "get" => match parts.get(1) {
                Some(id) => cmd_get(session, id),
                None => usage("Usage: get <key>"),
            },
            "set" => {
                if parts.len() < 3 {
                    usage("Usage: set <key> <value>")
                } else {
                    let value = parts[2..].join(" ");
                    cmd_set(session, parts[1], &value)
                }
            }
            "snippet" => cmd_snippet(session),
            "summary" => cmd_summary(session),
            "changed" => cmd_changed(session),
            "reset" => {
                session.reset_to_original();
                vec![("Reset to original document".into(), ReplOutputKind::Success)]
            }
            "copy" => {
                let target = match parts.get(1).copied() {
                    None | Some("snippet") => CopyTarget::Snippet,
                    Some("summary") => CopyTarget::Summary,
                    Some(other) => {
                        return usage(&format!("Unknown copy target: `{other}` (snippet | summary)"));
                    }
                };
                cmd_copy(session, target)
            }
            other => usage(&format!("Unknown command: `{other}`. Type `help` for usage.")),
        }
    }
}

fn usage(msg: &str) -> Vec<ReplLine> {
    vec![(msg.to_string(), ReplOutputKind::Error)]
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_help() -> Vec<ReplLine> {
    let lines = [
        ("list", "Show all components"),
        ("open <component>", "Select a component"),
        ("sub <subcomponent>", "Select a subcomponent of the open component"),
        ("back", "Return from subcomponent to component scope"),
        ("keys", "Show editable keys in the current scope"),
        ("get <key>", "Show a key's value and resolved color"),
        ("set <key> <value>", "Edit a key (e.g. set background_color #445566)"),
        ("snippet", "Show the patched source snippet for the selection"),
        ("summary", "Show the changed-tokens JSON summary"),
        ("changed", "List edited keys"),
        ("copy [snippet|summary]", "Copy an export to the clipboard"),
        ("reset", "Discard all edits, restore the loaded document"),
        ("help", "Show this help"),
        ("exit", "Quit"),
    ];
    let mut out = vec![("Commands:".to_string(), ReplOutputKind::Info)];
    for (cmd, desc) in lines {
        out.push((format!("  {cmd:<24} {desc}"), ReplOutputKind::Value));
    }
    out
}

fn cmd_list(session: &EditorSession) -> Vec<ReplLine> {
    let components = session.components();
    if components.is_empty() {
        return vec![("No components loaded".into(), ReplOutputKind::Error)];
    }
    let mut out = Vec::new();
    for component in components {
        let subs = if component.subcomponents.is_empty() {
            String::new()
        } else {
            let names: Vec<&str> = component.subcomponents.iter().map(|s| s.id.as_str()).collect();
            format!("  [{}]", names.join(", "))
        };
        out.push((
            format!("  {:<20} {} key(s){}", component.id, component.keys.len(), subs),
            ReplOutputKind::Value,
        ));
    }
    out
}

fn cmd_open(session: &mut EditorSession, id: &str) -> Vec<ReplLine> {
    if !session.select_component(id) {
        return vec![(format!("Unknown component: `{id}`"), ReplOutputKind::Error)];
    }
    let Some(component) = session.selected_component() else {
        return Vec::new();
    };
    let mut out = vec![(format!("Opened {}", component.label), ReplOutputKind::Success)];
    if let Some(comment) = &component.comment {
        out.push((format!("  {comment}"), ReplOutputKind::Info));
    }
    out
}

fn cmd_sub(session: &mut EditorSession, id: &str) -> Vec<ReplLine> {
    if session.selected_component().is_none() {
        return vec![("Open a component first".into(), ReplOutputKind::Error)];
    }
    if !session.select_subcomponent(id) {
        return vec![(format!("Unknown subcomponent: `{id}`"), ReplOutputKind::Error)];
    }
    match session.selected_subcomponent() {
        Some(sub) => vec![(format!("Opened {}", sub.label), ReplOutputKind::Success)],
        None => Vec::new(),
    }
}

fn cmd_keys(session: &EditorSession) -> Vec<ReplLine> {
    let keys = session.keys_in_scope();
    if keys.is_empty() {
        return vec![("No keys in the current scope".into(), ReplOutputKind::Info)];
    }
    keys.iter()
        .map(|key| (describe_key(session, key), ReplOutputKind::Value))
        .collect()
}

fn cmd_get(session: &EditorSession, id: &str) -> Vec<ReplLine> {
    match session.keys_in_scope().iter().find(|k| k.id == id) {
        Some(key) => vec![(describe_key(session, key), ReplOutputKind::Value)],
        None => vec![(format!("Unknown key: `{id}`"), ReplOutputKind::Error)],
    }
}

fn cmd_set(session: &mut EditorSession, id: &str, value: &str) -> Vec<ReplLine> {
    if session.update_value(id, value) {
        vec![(format!("{id} = {value}"), ReplOutputKind::Success)]
    } else {
        vec![(
            format!("Unknown key in current scope: `{id}`"),
            ReplOutputKind::Error,
        )]
    }
}

fn cmd_snippet(session: &EditorSession) -> Vec<ReplLine> {
    let snippet = session.current_snippet();
    if snippet.is_empty() {
        return vec![("Nothing to show — open a component first".into(), ReplOutputKind::Info)];
    }
    snippet
        .lines()
        .map(|l| (l.to_string(), ReplOutputKind::Value))
        .collect()
}

fn cmd_summary(session: &EditorSession) -> Vec<ReplLine> {
    let summary = session.changed_tokens_summary();
    if summary.is_empty() {
        return vec![("No changes in the current scope".into(), ReplOutputKind::Info)];
    }
    summary
        .lines()
        .map(|l| (l.to_string(), ReplOutputKind::Value))
        .collect()
}

fn cmd_changed(session: &EditorSession) -> Vec<ReplLine> {
    if session.changed_keys().is_empty() {
        return vec![("No edits since load/reset".into(), ReplOutputKind::Info)];
    }
    session
        .changed_keys()
        .iter()
        .map(|path| (format!("  {path}"), ReplOutputKind::Value))
        .collect()
}

fn cmd_copy(session: &EditorSession, target: CopyTarget) -> Vec<ReplLine> {
    let (text, what) = match target {
        CopyTarget::Snippet => (session.current_snippet().to_string(), "snippet"),
        CopyTarget::Summary => (session.changed_tokens_summary(), "summary"),
    };
    if text.is_empty() {
        return vec![(format!("Nothing to copy — the {what} is empty"), ReplOutputKind::Info)];
    }

    match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text)) {
        Ok(()) => vec![(format!("Copied {what} to clipboard"), ReplOutputKind::Success)],
        Err(e) => vec![(format!("Clipboard unavailable: {e}"), ReplOutputKind::Error)],
    }
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// One line per key: id, type, value, resolved literal where it differs,
/// rgb rendering for colors, change marker.
fn describe_key(session: &EditorSession, key: &StyleKey) -> String {
    let mut line = format!("  {:<28} {:<8} {}", key.id, type_name(key.style_type), key.value);

    if let Some(resolved) = session.resolve_display_value(&key.id) {
        if resolved != key.value {
            line.push_str(&format!("  -> {resolved}"));
        }
        if let Some(rgb) = color::describe(&resolved) {
            line.push_str(&format!("  {rgb}"));
        }
    }
    if let Some(comment) = &key.comment {
        line.push_str(&format!("  ({comment})"));
    }
    line
}

fn type_name(style_type: StyleType) -> &'static str {
    match style_type {
        StyleType::Color => "color",
        StyleType::Font => "font",
        StyleType::String => "string",
        StyleType::Number => "number",
        StyleType::Bool => "bool",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
