//! Presentation layer: textual renderings of a `DecisionTree`.
//!
//! Renderers only read the tree's public structure.

mod ascii;
mod dot;
mod mermaid;
mod text;

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::domain::DecisionTree;

pub use ascii::TreeNodeConvert;

/// Shown by the text and ASCII renderers for a rootless tree.
pub const EMPTY_TREE: &str = "(empty tree)";

/// Output format of a rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Node-by-node listing
    Text,
    /// Indented tree drawn from the root
    #[default]
    Ascii,
    /// Mermaid flowchart
    Mermaid,
    /// Graphviz DOT
    Dot,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Format::Text => "text",
            Format::Ascii => "ascii",
            Format::Mermaid => "mermaid",
            Format::Dot => "dot",
        };
        f.write_str(s)
    }
}

/// Renders trees in the supported formats.
#[derive(Debug, Clone)]
pub struct TreeVisualizer {
    /// Spaces per indent level in the text format
    pub indent_size: usize,
}

impl Default for TreeVisualizer {
    fn default() -> Self {
        Self::new(2)
    }
}

impl TreeVisualizer {
    pub fn new(indent_size: usize) -> Self {
        Self { indent_size }
    }

    pub fn to_text(&self, tree: &DecisionTree) -> String {
        text::render(tree, self.indent_size)
    }

    pub fn to_ascii(&self, tree: &DecisionTree) -> String {
        ascii::render(tree)
    }

    pub fn to_mermaid(&self, tree: &DecisionTree) -> String {
        mermaid::render(tree)
    }

    pub fn to_dot(&self, tree: &DecisionTree) -> String {
        dot::render(tree)
    }

    #[instrument(level = "debug", skip(self, tree), fields(tree = %tree.name()))]
    pub fn render(&self, tree: &DecisionTree, format: Format) -> String {
        match format {
            Format::Text => self.to_text(tree),
            Format::Ascii => self.to_ascii(tree),
            Format::Mermaid => self.to_mermaid(tree),
            Format::Dot => self.to_dot(tree),
        }
    }
}

/// Strings print bare, other values as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Cuts `s` to `max` characters, marking the cut with `...`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("äöüß", 2), "äö...");
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!("done")), "done");
        assert_eq!(display_value(&json!(3)), "3");
        assert_eq!(display_value(&json!(true)), "true");
    }

    #[test]
    fn test_format_display_matches_serde() {
        for format in [Format::Text, Format::Ascii, Format::Mermaid, Format::Dot] {
            let json = serde_json::to_value(format).unwrap();
            assert_eq!(json, json!(format.to_string()));
        }
    }
}
