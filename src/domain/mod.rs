//! Domain layer: node/tree model, traversal engine, path enumeration, builder
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod context;
pub mod error;
pub mod node;
pub mod paths;
pub mod traversal;
pub mod tree;

pub use builder::TreeBuilder;
pub use context::{is_truthy, Context, FieldLookup, KeyLookup};
pub use error::{DomainError, DomainResult};
pub use node::{Action, ConstAction, Edges, FnAction, Node, NodeKind, OUTCOME_KEY};
pub use traversal::{default_evaluate, Evaluator, TraversalResult, NO_ROOT_OUTCOME};
pub use tree::{DecisionTree, DEFAULT_MAX_STEPS, DEFAULT_TREE_NAME};
