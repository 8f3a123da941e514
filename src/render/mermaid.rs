use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{is_truthy, DecisionTree, Node, NodeKind};
use crate::render::{display_value, truncate};

const QUESTION_WIDTH: usize = 30;

fn id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid regex"))
}

/// Mermaid node ids allow word characters only.
fn mermaid_id(id: &str) -> String {
    id_regex().replace_all(id, "_").into_owned()
}

fn quote(text: &str) -> String {
    text.replace('"', "'")
}

fn shape(node: &Node) -> String {
    let id = mermaid_id(&node.id);
    let mut text = node.id.clone();
    match node.kind {
        NodeKind::Leaf => {
            if let Some(outcome) = node.outcome().filter(|v| is_truthy(v)) {
                text.push_str(&format!(": {}", display_value(outcome)));
            }
        }
        NodeKind::Action | NodeKind::Decision => {
            if let Some(question) = node.question.as_deref().filter(|q| !q.is_empty()) {
                text.push_str(&format!(": {}", truncate(question, QUESTION_WIDTH)));
            }
        }
    }
    let text = quote(&text);
    match node.kind {
        NodeKind::Decision => format!("{id}{{\"{text}\"}}"),
        NodeKind::Action | NodeKind::Leaf => format!("{id}[\"{text}\"]"),
    }
}

pub(super) fn render(tree: &DecisionTree) -> String {
    let mut lines = vec!["graph TD".to_string()];

    for node in tree.nodes() {
        lines.push(format!("    {}", shape(node)));

        let from = mermaid_id(&node.id);
        for (answer, child_id) in node.edges.iter() {
            lines.push(format!(
                "    {from} -- {} --> {}",
                quote(answer),
                mermaid_id(child_id)
            ));
        }
        if let Some(default) = &node.default_child {
            lines.push(format!("    {from} -. default .-> {}", mermaid_id(default)));
        }
    }

    lines.join("\n")
}
