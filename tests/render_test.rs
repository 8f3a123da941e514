//! Rendering through TreeVisualizer

use rstest::{fixture, rstest};

use dtree::domain::{ConstAction, DecisionTree, TreeBuilder};
use dtree::render::{Format, TreeVisualizer};

#[fixture]
fn tree() -> DecisionTree {
    TreeBuilder::new("render")
        .root("start", "Is everything ok?", "")
        .add_leaf("done", "finished", Some("ok"))
        .unwrap()
        .add_action("escalate", ConstAction::new("Escalated"), None)
        .unwrap()
        .set_default("start", "escalate")
        .unwrap()
        .build()
        .unwrap()
}

#[rstest]
fn given_tree_when_rendering_text_then_lists_every_node(tree: DecisionTree) {
    let out = TreeVisualizer::default().render(&tree, Format::Text);

    assert!(out.starts_with("Decision Tree: render"));
    assert!(out.contains("Root: start"));
    assert!(out.contains("[done] (leaf)"));
    assert!(out.contains("[escalate] (action)"));
    assert!(out.contains("ok -> done"));
}

#[rstest]
fn given_tree_when_rendering_ascii_then_draws_from_root(tree: DecisionTree) {
    let out = TreeVisualizer::default().render(&tree, Format::Ascii);

    let first = out.lines().next().unwrap();
    assert!(first.contains("start"));
    assert!(out.contains("🎯 done = finished"));
}

#[rstest]
fn given_tree_when_rendering_mermaid_then_emits_flowchart(tree: DecisionTree) {
    let out = TreeVisualizer::default().render(&tree, Format::Mermaid);

    assert!(out.starts_with("graph TD"));
    assert!(out.contains("start -- ok --> done"));
    assert!(out.contains("start -. default .-> escalate"));
}

#[rstest]
fn given_tree_when_rendering_dot_then_emits_digraph(tree: DecisionTree) {
    let out = TreeVisualizer::default().render(&tree, Format::Dot);

    assert!(out.starts_with("digraph decision_tree {"));
    assert!(out.contains("\"start\" -> \"done\""));
    assert!(out.trim_end().ends_with('}'));
}

#[rstest]
#[case(Format::Text)]
#[case(Format::Ascii)]
#[case(Format::Mermaid)]
#[case(Format::Dot)]
fn given_cyclic_tree_when_rendering_then_terminates(#[case] format: Format) {
    let tree = TreeBuilder::new("loop")
        .root("a", "?", "")
        .add_decision("next", "b", "?")
        .unwrap()
        .connect("b", "back", "a")
        .unwrap()
        .build()
        .unwrap();

    let out = TreeVisualizer::default().render(&tree, format);

    assert!(!out.is_empty());
}
