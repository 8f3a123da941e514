//! Tree definition files.
//!
//! A TOML document describing a tree, so trees can be rendered and traversed
//! without writing Rust:
//!
//! ```toml
//! name = "support_ticket"
//! root = "start"
//!
//! [[nodes]]
//! id = "start"
//! kind = "decision"
//! question = "Is everything ok?"
//! default = "escalate"
//! edges = [{ answer = "ok", to = "done" }]
//!
//! [[nodes]]
//! id = "escalate"
//! kind = "action"
//! returns = "Escalated"
//!
//! [[nodes]]
//! id = "done"
//! kind = "leaf"
//! outcome = "finished"
//! ```
//!
//! Edges are an array so their order survives parsing. Actions declared here
//! return their `returns` value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::application::error_ext::IoResultExt;
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{ConstAction, DecisionTree, Node, NodeKind, DEFAULT_TREE_NAME, OUTCOME_KEY};

fn default_name() -> String {
    DEFAULT_TREE_NAME.to_string()
}

/// One `answer -> to` edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeDefinition {
    pub answer: String,
    pub to: String,
}

/// One `[[nodes]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDefinition {
    pub id: String,
    #[serde(default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub edges: Vec<EdgeDefinition>,
    #[serde(default)]
    pub default: Option<String>,
    /// Leaf outcome, stored as `metadata.outcome`
    #[serde(default)]
    pub outcome: Option<toml::Value>,
    /// Constant return value of an action node
    #[serde(default)]
    pub returns: Option<toml::Value>,
    #[serde(default)]
    pub metadata: toml::Table,
}

/// Whole-file definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TreeDefinition {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub max_steps: Option<usize>,
    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
}

fn to_json(value: &toml::Value) -> ApplicationResult<Value> {
    serde_json::to_value(value).map_err(|e| ApplicationError::OperationFailed {
        context: format!("convert value {value}"),
        source: Box::new(e),
    })
}

impl NodeDefinition {
    fn into_node(self) -> ApplicationResult<Node> {
        let mut metadata = Map::new();
        for (key, value) in &self.metadata {
            metadata.insert(key.clone(), to_json(value)?);
        }
        if let Some(outcome) = &self.outcome {
            metadata.insert(OUTCOME_KEY.to_string(), to_json(outcome)?);
        }

        let mut node = Node::new(self.id, self.kind);
        node.question = self.question;
        node.default_child = self.default;
        node.metadata = metadata;
        for edge in self.edges {
            node.edges.insert(edge.answer, edge.to);
        }
        if let Some(returns) = &self.returns {
            node = node.with_action(ConstAction::new(to_json(returns)?));
        }
        Ok(node)
    }
}

impl TreeDefinition {
    /// Parses and validates a definition; `origin` names the source in errors.
    pub fn from_toml_str(content: &str, origin: &Path) -> ApplicationResult<Self> {
        let definition: Self = toml::from_str(content).map_err(|e| ApplicationError::Definition {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
        definition.validate(origin)?;
        Ok(definition)
    }

    fn validate(&self, origin: &Path) -> ApplicationResult<()> {
        if self.max_steps == Some(0) {
            return Err(ApplicationError::Definition {
                path: origin.to_path_buf(),
                message: "max_steps must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let content = std::fs::read_to_string(path).with_path_context("read definition", path)?;
        Self::from_toml_str(&content, path)
    }

    /// Assembles the tree. A `root` naming no node fails with `NotFound`.
    #[instrument(level = "debug", skip(self), fields(name = %self.name))]
    pub fn into_tree(self) -> ApplicationResult<DecisionTree> {
        self.validate(Path::new(&self.name))?;
        let mut tree = DecisionTree::new(self.name);
        if let Some(max_steps) = self.max_steps {
            tree.set_max_steps(max_steps);
        }
        for node in self.nodes {
            tree.add_node(node.into_node()?);
        }
        if let Some(root) = &self.root {
            tree.set_root(root)?;
        }
        debug!("loaded {}", tree);
        Ok(tree)
    }
}

/// Reads and assembles a tree definition file.
pub fn load_tree(path: impl Into<PathBuf>) -> ApplicationResult<DecisionTree> {
    TreeDefinition::load(&path.into())?.into_tree()
}
