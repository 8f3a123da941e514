//! Traversal engine: walks a `DecisionTree` from its root against a context.
//!
//! The walk is best-effort. A missing root, dangling edges, unresolved answers
//! and cycles all end the walk and are reported through the returned
//! `TraversalResult`, never as errors. The step bound (`max_steps`) is the
//! only protection against cycles.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::domain::context::{is_truthy, Context};
use crate::domain::node::{Node, NodeKind};
use crate::domain::tree::DecisionTree;

/// Outcome reported when the tree has no root.
pub const NO_ROOT_OUTCOME: &str = "No root node";

/// Record of one traversal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraversalResult {
    /// Visited node ids, in order
    pub path: Vec<String>,
    /// Last value set by an action or a reached leaf
    pub outcome: Option<Value>,
    pub reached_leaf: bool,
    pub node_count: usize,
}

impl TraversalResult {
    fn no_root() -> Self {
        Self {
            outcome: Some(Value::String(NO_ROOT_OUTCOME.to_string())),
            ..Default::default()
        }
    }

    fn add_step(&mut self, node_id: &str) {
        self.path.push(node_id.to_string());
        self.node_count += 1;
    }

    /// True for the sentinel result of a rootless tree.
    pub fn is_no_root(&self) -> bool {
        self.path.is_empty()
            && matches!(&self.outcome, Some(Value::String(s)) if s == NO_ROOT_OUTCOME)
    }

    pub fn last_node(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }
}

/// Chooses the answer label at a decision point.
pub trait Evaluator<C> {
    fn evaluate(&self, node: &Node, context: &C) -> Option<String>;
}

impl<C, F> Evaluator<C> for F
where
    F: Fn(&Node, &C) -> Option<String>,
{
    fn evaluate(&self, node: &Node, context: &C) -> Option<String> {
        self(node, context)
    }
}

/// Evaluator used when the caller supplies none.
///
/// 1. key lookup: first edge answer (insertion order) whose key is truthy
/// 2. field lookup: first edge answer whose field exists and is truthy
/// 3. the default child id, else the first answer, else nothing
///
/// Step 3 returns the default child's *id* as the answer; it resolves to the
/// default child because it is normally not an answer label itself.
pub fn default_evaluate(node: &Node, context: &dyn Context) -> Option<String> {
    if let Some(keyed) = context.as_keyed() {
        let hit = node
            .edges
            .answers()
            .find(|answer| keyed.get_key(answer).is_some_and(|v| is_truthy(&v)));
        if let Some(answer) = hit {
            return Some(answer.to_string());
        }
    }

    if let Some(fields) = context.as_fields() {
        let hit = node
            .edges
            .answers()
            .find(|answer| fields.get_field(answer).is_some_and(|v| is_truthy(&v)));
        if let Some(answer) = hit {
            return Some(answer.to_string());
        }
    }

    if node.edges.is_empty() {
        return None;
    }
    node.default_child
        .clone()
        .or_else(|| node.edges.first_answer().map(str::to_string))
}

impl DecisionTree {
    /// Walks the tree from the root.
    ///
    /// With `use_cache`, a result stored under the same `Context::cache_key`
    /// is returned as-is and no node (and so no action) is visited.
    #[instrument(level = "debug", skip(self, context, evaluator), fields(tree = %self.name()))]
    pub fn traverse<C>(
        &self,
        context: &C,
        evaluator: Option<&dyn Evaluator<C>>,
        use_cache: bool,
    ) -> TraversalResult
    where
        C: Context,
    {
        let Some(root) = self.root() else {
            debug!("no root node");
            return TraversalResult::no_root();
        };

        let cache_key = use_cache.then(|| context.cache_key());
        if let Some(key) = &cache_key {
            if let Some(hit) = self.cached(key) {
                debug!(key = %key, "cache hit");
                return hit;
            }
        }

        let result = self.walk(root, context, evaluator);

        if let Some(key) = cache_key {
            self.store(key, result.clone());
        }
        result
    }

    /// Traversal with the default evaluator and no cache.
    pub fn run<C>(&self, context: &C) -> TraversalResult
    where
        C: Context,
    {
        self.traverse(context, None, false)
    }

    fn walk<C>(
        &self,
        root: &Node,
        context: &C,
        evaluator: Option<&dyn Evaluator<C>>,
    ) -> TraversalResult
    where
        C: Context,
    {
        let mut result = TraversalResult::default();
        let mut current = Some(root);
        let mut steps = 0;

        while let Some(node) = current {
            if steps >= self.max_steps() {
                debug!(steps, "step bound reached");
                break;
            }
            steps += 1;
            result.add_step(&node.id);
            debug!(node = %node.id, kind = %node.kind, "visit");

            if node.kind == NodeKind::Action {
                if let Some(action) = &node.action {
                    let value = action.invoke(context);
                    trace!(node = %node.id, outcome = %value, "action");
                    result.outcome = Some(value);
                }
            }

            if node.is_leaf() {
                if let Some(outcome) = node.outcome().filter(|v| is_truthy(v)) {
                    result.outcome = Some(outcome.clone());
                }
                result.reached_leaf = true;
                debug!(node = %node.id, "leaf reached");
                break;
            }

            let answer = match evaluator {
                Some(evaluator) => evaluator.evaluate(node, context),
                None => default_evaluate(node, context),
            };

            let Some(next_id) = node.child_for(answer.as_deref()) else {
                debug!(node = %node.id, answer = ?answer, "dead end");
                break;
            };

            current = self.get_node(next_id);
            if current.is_none() {
                debug!(node = %node.id, next = %next_id, "dangling edge");
            }
        }

        result
    }

    fn cached(&self, key: &str) -> Option<TraversalResult> {
        match self.cache.lock() {
            Ok(cache) => cache.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        }
    }

    fn store(&self, key: String, result: TraversalResult) {
        match self.cache.lock() {
            Ok(mut cache) => {
                cache.insert(key, result);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(key, result);
            }
        }
    }

    /// Drops all memoized traversal results.
    pub fn clear_cache(&self) {
        match self.cache.lock() {
            Ok(mut cache) => cache.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    pub fn cached_len(&self) -> usize {
        match self.cache.lock() {
            Ok(cache) => cache.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
