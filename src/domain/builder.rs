//! Fluent builder for assembling decision trees.
//!
//! Branch helpers (`add_decision`, and `add_action`/`add_leaf` with an answer)
//! always hang the new node off the root. Deeper wiring uses `connect` and
//! `set_default`.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{Action, Node, NodeKind, OUTCOME_KEY};
use crate::domain::tree::{DecisionTree, DEFAULT_TREE_NAME};

/// Collects nodes in insertion order and produces a `DecisionTree`.
#[derive(Debug)]
pub struct TreeBuilder {
    name: String,
    nodes: Vec<Node>,
    positions: HashMap<String, usize>,
    root_id: Option<String>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_TREE_NAME)
    }
}

impl TreeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            positions: HashMap::new(),
            root_id: None,
        }
    }

    fn put(&mut self, node: Node) {
        match self.positions.get(&node.id) {
            Some(&pos) => self.nodes[pos] = node,
            None => {
                self.positions.insert(node.id.clone(), self.nodes.len());
                self.nodes.push(node);
            }
        }
    }

    fn node_mut(&mut self, id: &str) -> DomainResult<&mut Node> {
        let pos = *self
            .positions
            .get(id)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))?;
        Ok(&mut self.nodes[pos])
    }

    fn link_from_root(&mut self, answer: &str, child_id: &str) -> DomainResult<()> {
        let root_id = self
            .root_id
            .clone()
            .ok_or_else(|| DomainError::Precondition("must create root node first".to_string()))?;
        self.node_mut(&root_id)?.edges.insert(answer, child_id);
        Ok(())
    }

    pub fn root_id(&self) -> Option<&str> {
        self.root_id.as_deref()
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.positions.get(id).map(|&pos| &self.nodes[pos])
    }

    /// Creates the decision root; `description` is kept in its metadata.
    #[instrument(level = "debug", skip(self))]
    pub fn root(mut self, id: &str, question: &str, description: &str) -> Self {
        let node = Node::decision(id, question).with_metadata("description", description);
        self.put(node);
        self.root_id = Some(id.to_string());
        self
    }

    /// Creates a decision node and connects it from the root under `answer`.
    #[instrument(level = "debug", skip(self))]
    pub fn add_decision(mut self, answer: &str, next_id: &str, question: &str) -> DomainResult<Self> {
        if self.root_id.is_none() {
            return Err(DomainError::Precondition(
                "must create root node first".to_string(),
            ));
        }
        self.put(Node::decision(next_id, question));
        self.link_from_root(answer, next_id)?;
        Ok(self)
    }

    /// Creates an action node; with an answer and an existing root it is
    /// connected from the root.
    #[instrument(level = "debug", skip(self, action))]
    pub fn add_action(
        mut self,
        id: &str,
        action: impl Action + 'static,
        answer: Option<&str>,
    ) -> DomainResult<Self> {
        self.put(Node::new(id, NodeKind::Action).with_action(action));
        self.link_optional(id, answer)?;
        Ok(self)
    }

    /// Creates a leaf carrying `outcome`; connected like `add_action`.
    #[instrument(level = "debug", skip(self, outcome))]
    pub fn add_leaf(
        mut self,
        id: &str,
        outcome: impl Into<Value>,
        answer: Option<&str>,
    ) -> DomainResult<Self> {
        self.put(Node::new(id, NodeKind::Leaf).with_metadata(OUTCOME_KEY, outcome));
        self.link_optional(id, answer)?;
        Ok(self)
    }

    fn link_optional(&mut self, id: &str, answer: Option<&str>) -> DomainResult<()> {
        match (answer.filter(|a| !a.is_empty()), self.root_id.is_some()) {
            (Some(answer), true) => self.link_from_root(answer, id),
            _ => Ok(()),
        }
    }

    /// Adds an arbitrary pre-built node without wiring it.
    pub fn add_node(mut self, node: Node) -> Self {
        self.put(node);
        self
    }

    /// Adds the edge `from --answer--> to`; both ids must exist, `from` is checked first.
    #[instrument(level = "debug", skip(self))]
    pub fn connect(mut self, from: &str, answer: &str, to: &str) -> DomainResult<Self> {
        if !self.positions.contains_key(from) {
            return Err(DomainError::NotFound(from.to_string()));
        }
        if !self.positions.contains_key(to) {
            return Err(DomainError::NotFound(to.to_string()));
        }
        self.node_mut(from)?.edges.insert(answer, to);
        Ok(self)
    }

    /// Sets the fallback child of `from`. Only `from` must exist.
    #[instrument(level = "debug", skip(self))]
    pub fn set_default(mut self, from: &str, to: &str) -> DomainResult<Self> {
        self.node_mut(from)?.default_child = Some(to.to_string());
        Ok(self)
    }

    /// Produces the tree through `add_node`/`set_root`.
    #[instrument(level = "debug", skip(self), fields(name = %self.name, nodes = self.nodes.len()))]
    pub fn build(self) -> DomainResult<DecisionTree> {
        let root_id = self
            .root_id
            .ok_or_else(|| DomainError::Precondition("must create root node first".to_string()))?;

        let mut tree = DecisionTree::new(self.name);
        for node in self.nodes {
            tree.add_node(node);
        }
        tree.set_root(&root_id)?;
        debug!("built {}", tree);
        Ok(tree)
    }
}
