//! Tree definition files on disk

use std::fs;
use std::path::Path;

use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

use dtree::application::{load_tree, ApplicationError};
use dtree::domain::DomainError;

const SUPPORT: &str = r#"
name = "support_ticket"
root = "start"
max_steps = 10

[[nodes]]
id = "start"
kind = "decision"
question = "Is everything ok?"
default = "escalate"
edges = [{ answer = "ok", to = "done" }]

[[nodes]]
id = "escalate"
kind = "action"
returns = "Escalated"

[[nodes]]
id = "done"
kind = "leaf"
outcome = "finished"
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn given_definition_file_when_loading_then_traverses_both_branches() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "support.toml", SUPPORT);

    let tree = load_tree(&path).unwrap();

    assert_eq!(tree.name(), "support_ticket");
    assert_eq!(tree.max_steps(), 10);

    let ok = tree.run(&json!({"ok": true}));
    assert_eq!(ok.path, vec!["start", "done"]);
    assert_eq!(ok.outcome, Some(json!("finished")));

    let escalated = tree.run(&json!({"ok": false}));
    assert_eq!(escalated.path, vec!["start", "escalate"]);
    assert_eq!(escalated.outcome, Some(json!("Escalated")));
    assert!(escalated.reached_leaf);
}

#[test]
fn given_missing_file_when_loading_then_operation_failed() {
    let err = load_tree(Path::new("/nonexistent/tree.toml")).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}

#[rstest]
#[case::bad_toml("name = ")]
#[case::unknown_field("[[nodes]]\nid = \"a\"\ncolour = \"red\"\n")]
#[case::bad_kind("[[nodes]]\nid = \"a\"\nkind = \"branch\"\n")]
#[case::zero_step_bound("max_steps = 0\nroot = \"l\"\n[[nodes]]\nid = \"l\"\nkind = \"leaf\"\n")]
#[case::unknown_edge_field("[[nodes]]\nid = \"a\"\nedges = [{ answer = \"x\", target = \"b\" }]\n")]
fn given_malformed_definition_when_loading_then_definition_error(#[case] content: &str) {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.toml", content);

    let err = load_tree(&path).unwrap_err();

    match err {
        ApplicationError::Definition { path: p, .. } => assert_eq!(p, path),
        other => panic!("expected definition error, got {other:?}"),
    }
}

#[test]
fn given_unknown_root_when_loading_then_not_found() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "ghost.toml", "root = \"ghost\"\n[[nodes]]\nid = \"a\"\n");

    let err = load_tree(&path).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::NotFound(ref id)) if id == "ghost"
    ));
}
