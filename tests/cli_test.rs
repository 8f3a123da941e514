//! Command dispatch end to end

use std::fs;

use clap::Parser;
use tempfile::TempDir;

use dtree::cli::args::Cli;
use dtree::cli::commands::execute_command;
use dtree::exitcode;

const CYCLIC: &str = r#"
root = "a"

[[nodes]]
id = "a"
edges = [{ answer = "next", to = "b" }]

[[nodes]]
id = "b"
edges = [{ answer = "back", to = "a" }]
"#;

const LINEAR: &str = r#"
root = "start"

[[nodes]]
id = "start"
edges = [{ answer = "ok", to = "done" }]

[[nodes]]
id = "done"
kind = "leaf"
outcome = "finished"
"#;

fn run(args: &[&str]) -> Result<(), i32> {
    let cli = Cli::try_parse_from(args).map_err(|_| exitcode::USAGE)?;
    execute_command(&cli).map_err(|e| e.exit_code())
}

#[test]
fn given_cyclic_definition_when_listing_paths_then_data_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cyclic.toml");
    fs::write(&path, CYCLIC).unwrap();

    let code = run(&["dtree", "paths", path.to_str().unwrap()]).unwrap_err();

    assert_eq!(code, exitcode::DATAERR);
}

#[test]
fn given_cyclic_definition_when_traversing_then_succeeds_within_bound() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cyclic.toml");
    fs::write(&path, CYCLIC).unwrap();

    assert!(run(&["dtree", "traverse", path.to_str().unwrap(), "--max-steps", "5"]).is_ok());
}

#[test]
fn given_linear_definition_when_running_commands_then_all_succeed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("linear.toml");
    fs::write(&path, LINEAR).unwrap();
    let file = path.to_str().unwrap();

    assert!(run(&["dtree", "paths", file]).is_ok());
    assert!(run(&["dtree", "render", file, "--format", "dot"]).is_ok());
    assert!(run(&["dtree", "traverse", file, "-s", "ok=true", "--json"]).is_ok());
}

#[test]
fn given_missing_definition_when_rendering_then_noinput() {
    let code = run(&["dtree", "render", "/nonexistent/tree.toml"]).unwrap_err();

    assert_eq!(code, exitcode::NOINPUT);
}

#[test]
fn given_zero_step_bound_when_traversing_then_usage() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("linear.toml");
    fs::write(&path, LINEAR).unwrap();

    let code = run(&["dtree", "traverse", path.to_str().unwrap(), "--max-steps", "0"]).unwrap_err();

    assert_eq!(code, exitcode::USAGE);
}

#[test]
fn given_zero_step_bound_in_definition_when_traversing_then_data_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zero.toml");
    fs::write(&path, format!("max_steps = 0\n{LINEAR}")).unwrap();

    let code = run(&["dtree", "traverse", path.to_str().unwrap()]).unwrap_err();

    assert_eq!(code, exitcode::DATAERR);
}
