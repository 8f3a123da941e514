//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::application::{load_tree, TreeDefinition};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{DecisionTree, DomainError, TraversalResult};
use crate::render::{display_value, Format, TreeVisualizer};

/// Execute a CLI command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "effective settings");

    match &cli.command {
        Some(Commands::Render { file, format }) => cmd_render(&settings, file, *format),
        Some(Commands::Traverse {
            file,
            context,
            set,
            max_steps,
            json,
        }) => cmd_traverse(&settings, file, context.as_deref(), set, *max_steps, *json),
        Some(Commands::Paths { file }) => cmd_paths(file),
        Some(Commands::Config { command }) => cmd_config(&settings, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| CliError::Usage(e.to_string()))?;
            Ok(())
        }
    }
}

#[instrument(level = "debug", skip(settings))]
fn cmd_render(settings: &Settings, file: &Path, format: Option<Format>) -> CliResult<()> {
    let tree = load_tree(file)?;
    let visualizer = TreeVisualizer::new(settings.indent_size);
    output::info(&visualizer.render(&tree, format.unwrap_or(settings.format)));
    Ok(())
}

/// Parses `KEY=VALUE`; the value is read as JSON when possible, else as a string.
pub fn parse_assignment(assignment: &str) -> CliResult<(String, Value)> {
    let (key, raw) = assignment
        .split_once('=')
        .ok_or_else(|| CliError::InvalidArgs(format!("expected KEY=VALUE, got '{assignment}'")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::InvalidArgs(format!(
            "empty key in '{assignment}'"
        )));
    }
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Builds the traversal context from `--context` JSON and `--set` entries.
pub fn build_context(json: Option<&str>, assignments: &[String]) -> CliResult<Value> {
    let mut context = match json {
        Some(text) => serde_json::from_str(text)
            .map_err(|e| CliError::InvalidArgs(format!("--context is not valid JSON: {e}")))?,
        None => Value::Object(Map::new()),
    };

    if assignments.is_empty() {
        return Ok(context);
    }
    let object = context.as_object_mut().ok_or_else(|| {
        CliError::Usage("--set requires --context to be a JSON object".to_string())
    })?;
    for assignment in assignments {
        let (key, value) = parse_assignment(assignment)?;
        object.insert(key, value);
    }
    Ok(context)
}

fn print_result(result: &TraversalResult) {
    output::field("Path", &result.path.iter().join(" -> "));
    let outcome = result
        .outcome
        .as_ref()
        .map(display_value)
        .unwrap_or_else(|| "-".to_string());
    output::field("Outcome", &outcome);
    output::field("Nodes", &result.node_count);
    if result.reached_leaf {
        output::success("reached leaf");
    } else {
        output::failure("stopped before a leaf");
    }
}

#[instrument(level = "debug", skip(settings))]
fn cmd_traverse(
    settings: &Settings,
    file: &Path,
    context: Option<&str>,
    assignments: &[String],
    max_steps: Option<usize>,
    json: bool,
) -> CliResult<()> {
    let definition = TreeDefinition::load(file)?;
    let definition_bound = definition.max_steps;
    let mut tree = definition.into_tree()?;
    apply_step_bound(&mut tree, settings, definition_bound, max_steps)?;
    let context = build_context(context, assignments)?;

    let result = tree.traverse(&context, None, false);
    if result.is_no_root() {
        output::warning(&format!("tree '{}' has no root", tree.name()));
    }

    if json {
        let text = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::Usage(format!("cannot serialize result: {e}")))?;
        output::info(&text);
    } else {
        print_result(&result);
    }
    Ok(())
}

// Precedence: --max-steps, then the definition's own bound, then config.
fn apply_step_bound(
    tree: &mut DecisionTree,
    settings: &Settings,
    definition_bound: Option<usize>,
    max_steps: Option<usize>,
) -> CliResult<()> {
    let bound = match max_steps {
        Some(0) => {
            return Err(CliError::InvalidArgs(
                "--max-steps must be at least 1".to_string(),
            ))
        }
        Some(n) => n,
        None => definition_bound.unwrap_or(settings.max_steps),
    };
    tree.set_max_steps(bound);
    Ok(())
}

#[instrument(level = "debug")]
fn cmd_paths(file: &Path) -> CliResult<()> {
    let tree = load_tree(file)?;
    if let Some(node) = tree.find_cycle() {
        return Err(DomainError::CycleDetected(node).into());
    }
    let paths = tree.get_all_paths();
    if paths.is_empty() {
        output::warning(&format!("tree '{}' has no paths", tree.name()));
    }
    for path in paths {
        output::info(&path.join(" -> "));
    }
    Ok(())
}

fn cmd_config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(path) => output::field("global", &path.display()),
                None => output::field("global", "(no config directory)"),
            }
        }
    }
    Ok(())
}
