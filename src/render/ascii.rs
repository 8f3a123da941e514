use termtree::Tree;
use tracing::instrument;

use crate::domain::{is_truthy, DecisionTree, Node, NodeKind};
use crate::render::{display_value, truncate, EMPTY_TREE};

const QUESTION_WIDTH: usize = 50;

/// Conversion into a `termtree::Tree` for indented display.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for DecisionTree {
    #[instrument(level = "debug", skip(self), fields(tree = %self.name()))]
    fn to_tree_string(&self) -> Tree<String> {
        match self.root() {
            Some(root) => {
                let mut ancestors = Vec::new();
                build_tree(self, root, &mut ancestors)
            }
            None => Tree::new(EMPTY_TREE.to_string()),
        }
    }
}

fn label(node: &Node) -> String {
    let mut label = match node.kind {
        NodeKind::Leaf => {
            let mut l = format!("🎯 {}", node.id);
            if let Some(outcome) = node.outcome().filter(|v| is_truthy(v)) {
                l.push_str(&format!(" = {}", display_value(outcome)));
            }
            l
        }
        NodeKind::Action => format!("⚡ {}", node.id),
        NodeKind::Decision => format!("❓ {}", node.id),
    };
    if let Some(question) = node.question.as_deref().filter(|q| !q.is_empty()) {
        label.push_str(&format!(" ({})", truncate(question, QUESTION_WIDTH)));
    }
    label
}

// `ancestors` holds the ids on the current branch; revisiting one ends the branch.
fn build_tree<'a>(tree: &'a DecisionTree, node: &'a Node, ancestors: &mut Vec<&'a str>) -> Tree<String> {
    let mut out = Tree::new(label(node));
    ancestors.push(node.id.as_str());

    for child_id in node.edges.targets() {
        if ancestors.contains(&child_id) {
            out.push(Tree::new(format!("↻ {child_id}")));
            continue;
        }
        if let Some(child) = tree.get_node(child_id) {
            out.push(build_tree(tree, child, ancestors));
        }
    }

    ancestors.pop();
    out
}

pub(super) fn render(tree: &DecisionTree) -> String {
    tree.to_tree_string().to_string().trim_end().to_string()
}
