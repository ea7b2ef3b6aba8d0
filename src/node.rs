use crate::errors::TreeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of a binary decision tree.
///
/// The node owns its children. A node is a leaf exactly when `split_feature`
/// is `None`, in which case both children are `None` as well. The `label` is
/// set on every node, so any node can be turned into a usable leaf.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Node {
    /// Column used to route rows, `None` on leaves.
    pub split_feature: Option<usize>,
    /// Rows with `row[split_feature] <= threshold` go left.
    pub threshold: Option<f64>,
    /// Majority class or mean of the training rows reaching the node.
    pub label: f64,
    /// Impurity reduction of the best split found at this node.
    pub gain: f64,
    /// Number of training rows reaching the node.
    pub sample_count: usize,
    /// Distance from the root.
    pub depth: usize,
    pub left: Option<Box<Node>>,
    pub right: Option<Box<Node>>,
}

impl Node {
    /// Create an empty node at the given depth, filled in by `build`.
    pub fn new(depth: usize) -> Self {
        Node {
            split_feature: None,
            threshold: None,
            label: f64::NAN,
            gain: 0.0,
            sample_count: 0,
            depth,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.split_feature.is_none()
    }

    /// Drop the split and both subtrees, keeping the stored label.
    pub fn make_leaf(&mut self) {
        self.left = None;
        self.right = None;
        self.split_feature = None;
    }

    /// Get the child a value should travel down to.
    pub fn get_child(&self, v: f64) -> Result<&Node, TreeError> {
        let (feature, threshold) = match (self.split_feature, self.threshold) {
            (Some(f), Some(t)) => (f, t),
            (Some(f), None) => return Err(TreeError::MissingChild(self.depth, f)),
            (None, _) => return Ok(self),
        };
        let child = if v <= threshold { &self.left } else { &self.right };
        child.as_deref().ok_or(TreeError::MissingChild(self.depth, feature))
    }

    /// Visit this node and every node below it, parents before children.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a Node),
    {
        visit(self);
        if let Some(left) = &self.left {
            left.walk(visit);
        }
        if let Some(right) = &self.right {
            right.walk(visit);
        }
    }
}

impl fmt::Display for Node {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.split_feature, self.threshold) {
            (Some(feature), Some(threshold)) => write!(
                f,
                "[{} <= {}] label={},gain={},samples={}",
                feature, threshold, self.label, self.gain, self.sample_count
            ),
            _ => write!(f, "leaf={},samples={}", self.label, self.sample_count),
        }
    }
}
