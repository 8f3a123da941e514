//! Application layer: tree definition files and file-level use cases
//!
//! This layer turns external input into domain trees.

pub mod definition;
pub mod error;
pub mod error_ext;

pub use definition::{load_tree, EdgeDefinition, NodeDefinition, TreeDefinition};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
