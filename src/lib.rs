//! Decision tree modeling.
//!
//! Trees are graphs of decision, action and leaf nodes keyed by string ids.
//! A traversal walks from the root against a caller-supplied context and
//! reports the visited path, the last outcome and whether a leaf was reached.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod render;
pub mod util;

pub use domain::{
    Context, DecisionTree, DomainError, Evaluator, Node, NodeKind, TraversalResult, TreeBuilder,
};
pub use render::{Format, TreeVisualizer};
