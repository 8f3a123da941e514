use crate::domain::{DecisionTree, NodeKind};

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

pub(super) fn render(tree: &DecisionTree) -> String {
    let mut lines = vec![
        "digraph decision_tree {".to_string(),
        "    rankdir=TB;".to_string(),
        "    node [shape=box];".to_string(),
    ];

    for node in tree.nodes() {
        let id = escape(&node.id);
        let style = match node.kind {
            NodeKind::Leaf => "shape=ellipse, style=filled, fillcolor=lightgreen",
            NodeKind::Action => "shape=diamond, style=filled, fillcolor=lightyellow",
            NodeKind::Decision => "shape=box",
        };
        lines.push(format!("    \"{id}\" [{style}];"));

        for (answer, child_id) in node.edges.iter() {
            lines.push(format!(
                "    \"{id}\" -> \"{}\" [label=\"{}\"];",
                escape(child_id),
                escape(answer)
            ));
        }
        if let Some(default) = &node.default_child {
            lines.push(format!(
                "    \"{id}\" -> \"{}\" [label=\"default\", style=dashed];",
                escape(default)
            ));
        }
    }

    lines.push("}".to_string());
    lines.join("\n")
}
