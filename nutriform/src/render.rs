//! Flattening of nested report data into an indented list of display lines.
//!
//! The traversal is pure: it produces `(depth, text)` lines and never touches
//! a presentation layer. Adapters (HTML, terminal) materialise the lines.

use serde_json::Value;

/// Text of the marker emitted for absent or empty data.
pub const NO_DATA: &str = "No data available";

/// What a rendered line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Label of a nested mapping; its children follow at `depth + 1`.
    Category,
    /// A terminal `key: value` pair.
    Item,
    /// The "no data available" marker.
    Empty,
}

/// One line of flattened output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderLine {
    pub depth: usize,
    pub kind: LineKind,
    pub text: String,
}

impl RenderLine {
    fn new(depth: usize, kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            depth,
            kind,
            text: text.into(),
        }
    }
}

/// Render `data` into a fresh list of lines starting at depth 0.
pub fn render(data: &Value) -> Vec<RenderLine> {
    let mut lines = Vec::new();
    render_into(Some(data), &mut lines, 0);
    lines
}

/// Append the lines for `data` to `container`, starting at `indent`.
///
/// Keys are visited in insertion order. Nested mappings (and arrays, keyed by
/// index) emit a category line and recurse one level deeper into the same
/// container. Everything else, `null` included, is a terminal `key: value`.
pub fn render_into(data: Option<&Value>, container: &mut Vec<RenderLine>, indent: usize) {
    match data {
        None | Some(Value::Null) => push_empty(container, indent),
        Some(Value::Object(map)) if map.is_empty() => push_empty(container, indent),
        Some(Value::Array(items)) if items.is_empty() => push_empty(container, indent),
        Some(Value::String(s)) if s.is_empty() => push_empty(container, indent),
        Some(Value::Object(map)) => {
            for (key, value) in map {
                render_entry(key, value, container, indent);
            }
        }
        Some(Value::Array(items)) => {
            for (idx, value) in items.iter().enumerate() {
                render_entry(&idx.to_string(), value, container, indent);
            }
        }
        Some(scalar) => container.push(RenderLine::new(indent, LineKind::Item, scalar_text(scalar))),
    }
}

fn render_entry(key: &str, value: &Value, container: &mut Vec<RenderLine>, indent: usize) {
    if is_nested(value) {
        container.push(RenderLine::new(indent, LineKind::Category, key));
        render_into(Some(value), container, indent + 1);
    } else {
        container.push(RenderLine::new(
            indent,
            LineKind::Item,
            format!("{key}: {}", scalar_text(value)),
        ));
    }
}

fn push_empty(container: &mut Vec<RenderLine>, indent: usize) {
    container.push(RenderLine::new(indent, LineKind::Empty, NO_DATA));
}

fn is_nested(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
