use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Mutex;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::Node;
use crate::domain::traversal::TraversalResult;

/// Step bound applied by `traverse` unless overridden.
pub const DEFAULT_MAX_STEPS: usize = 100;

/// Default tree name.
pub const DEFAULT_TREE_NAME: &str = "decision_tree";

/// Decision graph: nodes keyed by id, a root, and a name.
///
/// Nodes live in a generational arena; `order` records insertion order for
/// iteration. Edges may name ids that are not present, and cycles are allowed.
/// Neither is validated here.
pub struct DecisionTree {
    name: String,
    arena: Arena<Node>,
    index: HashMap<String, Index>,
    order: Vec<Index>,
    root: Option<Index>,
    max_steps: usize,
    pub(crate) cache: Mutex<HashMap<String, TraversalResult>>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new(DEFAULT_TREE_NAME)
    }
}

impl fmt::Debug for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionTree")
            .field("name", &self.name)
            .field("root", &self.root_id())
            .field("nodes", &self.nodes().collect::<Vec<_>>())
            .field("max_steps", &self.max_steps)
            .finish()
    }
}

impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DecisionTree(name='{}', nodes={})", self.name, self.len())
    }
}

impl DecisionTree {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arena: Arena::new(),
            index: HashMap::new(),
            order: Vec::new(),
            root: None,
            max_steps: DEFAULT_MAX_STEPS,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a tree whose root is `root`, registering it as a node.
    pub fn with_root(name: impl Into<String>, root: Node) -> Self {
        let mut tree = Self::new(name);
        let idx = tree.insert(root);
        tree.root = Some(idx);
        tree
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn set_max_steps(&mut self, max_steps: usize) {
        self.max_steps = max_steps;
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn insert(&mut self, node: Node) -> Index {
        match self.index.get(&node.id) {
            Some(&idx) => {
                self.arena[idx] = node;
                idx
            }
            None => {
                let id = node.id.clone();
                let idx = self.arena.insert(node);
                self.index.insert(id, idx);
                self.order.push(idx);
                idx
            }
        }
    }

    /// Inserts or replaces the node under its id. Edge targets are not checked.
    #[instrument(level = "trace", skip(self, node), fields(id = %node.id))]
    pub fn add_node(&mut self, node: Node) -> &mut Self {
        self.insert(node);
        self
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).and_then(|&idx| self.arena.get(idx))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Rebinds the root. Fails with `NotFound` and keeps the old root when `id` is unknown.
    #[instrument(level = "debug", skip(self))]
    pub fn set_root(&mut self, id: &str) -> DomainResult<&mut Self> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| DomainError::NotFound(id.to_string()))?;
        self.root = Some(idx);
        debug!("root set to '{}'", id);
        Ok(self)
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.and_then(|idx| self.arena.get(idx))
    }

    pub fn root_id(&self) -> Option<&str> {
        self.root().map(|n| n.id.as_str())
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|&idx| self.arena.get(idx))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Finds a node closing a cycle reachable from the root.
    ///
    /// `get_all_paths` does not terminate on such trees; callers that accept
    /// untrusted input check here first.
    #[instrument(level = "debug", skip(self))]
    pub fn find_cycle(&self) -> Option<String> {
        let root = self.root()?;
        let mut done: HashSet<&str> = HashSet::new();
        let mut on_path: HashSet<&str> = HashSet::new();
        // (node, entered): a node is pushed twice, once to enter and once to leave
        let mut stack: Vec<(&Node, bool)> = vec![(root, false)];

        while let Some((node, entered)) = stack.pop() {
            if entered {
                on_path.remove(node.id.as_str());
                done.insert(node.id.as_str());
                continue;
            }
            if done.contains(node.id.as_str()) {
                continue;
            }
            on_path.insert(node.id.as_str());
            stack.push((node, true));

            if node.is_leaf() {
                continue;
            }
            for child_id in node.edges.targets() {
                if on_path.contains(child_id) {
                    return Some(child_id.to_string());
                }
                if let Some(child) = self.get_node(child_id) {
                    stack.push((child, false));
                }
            }
        }
        None
    }
}
