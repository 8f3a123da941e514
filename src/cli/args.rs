//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::render::Format;

/// Decision tree modeling: render, traverse and enumerate decision trees
#[derive(Parser, Debug)]
#[command(name = "dtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, env = "DTREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a tree definition
    Render {
        /// Tree definition (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Output format (default: from config)
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },

    /// Walk a tree from its root against a context
    Traverse {
        /// Tree definition (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Context as JSON, e.g. '{"ok": true}'
        #[arg(long)]
        context: Option<String>,
        /// Context entry KEY=VALUE (VALUE parsed as JSON, else taken as string); repeatable
        #[arg(short, long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
        /// Step bound (default: tree definition, then config)
        #[arg(long)]
        max_steps: Option<usize>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every root-to-leaf path
    Paths {
        /// Tree definition (TOML)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a config template
    Template,
    /// Show config file locations
    Path,
}
