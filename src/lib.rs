//! A greedy binary decision tree learner.
//!
//! Trees are grown by exhaustive single feature/threshold search, pruned by
//! depth and training-set size, and evaluated by root-to-leaf traversal.
mod prune;

// Modules
pub mod constants;
pub mod data;
pub mod errors;
pub mod estimator;
pub mod impurity;
pub mod metric;
pub mod node;
pub mod splitter;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use data::Matrix;
pub use errors::TreeError;
pub use estimator::config::{ImportanceMethod, TreeConfig, TreeIO};
pub use estimator::core::DecisionTree;
pub use impurity::Criterion;
pub use metric::Metric;
pub use node::Node;
pub use tree::tree::Tree;
