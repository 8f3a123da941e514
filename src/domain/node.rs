//! Node records: kinds, ordered edges, metadata and the action capability.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::context::Context;

/// Metadata key read by the engine and the renderers.
pub const OUTCOME_KEY: &str = "outcome";

/// Role a node plays in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Branch point; an evaluator picks the outgoing edge
    #[default]
    Decision,
    /// Runs its action against the context and records the return value
    Action,
    /// Terminal node carrying an outcome in its metadata
    Leaf,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Decision => "decision",
            NodeKind::Action => "action",
            NodeKind::Leaf => "leaf",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side-effecting callable attached to an action node.
pub trait Action: Send + Sync {
    fn invoke(&self, context: &dyn Context) -> Value;

    /// Label shown by the text renderer.
    fn name(&self) -> &str {
        "action"
    }
}

/// Adapts a closure into an [`Action`] with a display name.
pub struct FnAction<F> {
    name: String,
    func: F,
}

impl<F> FnAction<F>
where
    F: Fn(&dyn Context) -> Value + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Action for FnAction<F>
where
    F: Fn(&dyn Context) -> Value + Send + Sync,
{
    fn invoke(&self, context: &dyn Context) -> Value {
        (self.func)(context)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Action returning a fixed value; used for actions declared in definition files.
#[derive(Debug, Clone)]
pub struct ConstAction {
    value: Value,
}

impl ConstAction {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Action for ConstAction {
    fn invoke(&self, _context: &dyn Context) -> Value {
        self.value.clone()
    }

    fn name(&self) -> &str {
        "returns"
    }
}

/// Answer label to child id mapping, kept in insertion order.
///
/// Re-inserting an existing answer replaces the target in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Edges {
    entries: Vec<(String, String)>,
}

impl Edges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, answer: impl Into<String>, child_id: impl Into<String>) {
        let answer = answer.into();
        let child_id = child_id.into();
        match self.entries.iter_mut().find(|(a, _)| *a == answer) {
            Some(entry) => entry.1 = child_id,
            None => self.entries.push((answer, child_id)),
        }
    }

    pub fn get(&self, answer: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(a, _)| a == answer)
            .map(|(_, c)| c.as_str())
    }

    pub fn contains(&self, answer: &str) -> bool {
        self.get(answer).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }

    pub fn answers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(a, _)| a.as_str())
    }

    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, c)| c.as_str())
    }

    pub fn first_answer(&self) -> Option<&str> {
        self.entries.first().map(|(a, _)| a.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A, C> FromIterator<(A, C)> for Edges
where
    A: Into<String>,
    C: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (A, C)>>(iter: T) -> Self {
        let mut edges = Edges::new();
        for (answer, child) in iter {
            edges.insert(answer, child);
        }
        edges
    }
}

/// One point in the decision graph.
#[derive(Clone, Default)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    /// Informational; never evaluated by the engine
    pub question: Option<String>,
    pub action: Option<Arc<dyn Action>>,
    pub edges: Edges,
    pub default_child: Option<String>,
    pub metadata: Map<String, Value>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("question", &self.question)
            .field("action", &self.action.as_ref().map(|a| a.name()))
            .field("edges", &self.edges)
            .field("default_child", &self.default_child)
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn decision(id: impl Into<String>, question: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Decision).with_question(question)
    }

    pub fn action<F>(id: impl Into<String>, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&dyn Context) -> Value + Send + Sync + 'static,
    {
        Self::new(id, NodeKind::Action).with_action(FnAction::new(name, func))
    }

    pub fn leaf(id: impl Into<String>, outcome: impl Into<Value>) -> Self {
        Self::new(id, NodeKind::Leaf).with_metadata(OUTCOME_KEY, outcome)
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    pub fn with_action(mut self, action: impl Action + 'static) -> Self {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn with_edge(mut self, answer: impl Into<String>, child_id: impl Into<String>) -> Self {
        self.edges.insert(answer, child_id);
        self
    }

    pub fn with_default(mut self, child_id: impl Into<String>) -> Self {
        self.default_child = Some(child_id.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Structural leaf test: declared `Leaf`, or no outgoing edges at all.
    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Leaf || self.edges.is_empty()
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    /// Child for an answer, falling back to the default child.
    pub fn child_for(&self, answer: Option<&str>) -> Option<&str> {
        answer
            .and_then(|a| self.edges.get(a))
            .or(self.default_child.as_deref())
    }

    pub fn outcome(&self) -> Option<&Value> {
        self.metadata.get(OUTCOME_KEY)
    }
}
