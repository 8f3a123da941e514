use crate::domain::{is_truthy, DecisionTree};
use crate::render::{display_value, EMPTY_TREE};

const RULE_WIDTH: usize = 50;

pub(super) fn render(tree: &DecisionTree, indent_size: usize) -> String {
    let one = " ".repeat(indent_size);
    let two = " ".repeat(indent_size * 2);

    let mut lines = vec![
        format!("Decision Tree: {}", tree.name()),
        "=".repeat(RULE_WIDTH),
    ];

    let Some(root_id) = tree.root_id() else {
        lines.push(EMPTY_TREE.to_string());
        return lines.join("\n");
    };

    lines.push(format!("\nRoot: {root_id}"));
    lines.push(format!("Nodes: {}", tree.len()));
    lines.push("\nNode Details:".to_string());
    lines.push("-".repeat(RULE_WIDTH));

    for node in tree.nodes() {
        lines.push(format!("\n[{}] ({})", node.id, node.kind));

        if let Some(question) = node.question.as_deref().filter(|q| !q.is_empty()) {
            lines.push(format!("{one}Question: {question}"));
        }
        if let Some(action) = &node.action {
            lines.push(format!("{one}Action: {}", action.name()));
        }
        if let Some(outcome) = node.outcome().filter(|v| is_truthy(v)) {
            lines.push(format!("{one}Outcome: {}", display_value(outcome)));
        }
        if !node.edges.is_empty() {
            lines.push(format!("{one}Children:"));
            for (answer, child_id) in node.edges.iter() {
                lines.push(format!("{two}{answer} -> {child_id}"));
            }
        }
        if let Some(default) = &node.default_child {
            lines.push(format!("{two}default -> {default}"));
        }
    }

    lines.join("\n")
}
