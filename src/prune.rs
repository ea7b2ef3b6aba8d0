use crate::{node::Node, tree::tree::Tree};
use log::debug;

impl Node {
    /// Truncate subtrees that break the depth or sample-count limits.
    ///
    /// Children are pruned first. A split node is then turned into a leaf when
    /// `depth >= max_depth` or when `min_samples > n_samples`. `n_samples` is the
    /// row count of the whole training set and is passed down unchanged, so the
    /// sample-count test gives the same answer at every node.
    pub fn prune(&mut self, max_depth: usize, min_samples: usize, n_samples: usize) {
        if self.is_leaf() {
            return;
        }

        if let Some(left) = self.left.as_mut() {
            left.prune(max_depth, min_samples, n_samples);
        }
        if let Some(right) = self.right.as_mut() {
            right.prune(max_depth, min_samples, n_samples);
        }

        if self.depth >= max_depth || min_samples > n_samples {
            self.make_leaf();
        }
    }
}

impl Tree {
    /// Prune the tree in place against the training row count of the root.
    pub fn prune(&mut self, max_depth: usize, min_samples: usize) {
        let old_n_nodes = self.n_nodes();
        let n_samples = self.root.sample_count;
        self.root.prune(max_depth, min_samples, n_samples);
        debug!("pruning: n_nodes: {} -> {}", old_n_nodes, self.n_nodes());
    }

    /// Return a pruned copy, leaving this tree untouched.
    pub fn pruned(&self, max_depth: usize, min_samples: usize) -> Tree {
        let mut tree = self.clone();
        tree.prune(max_depth, min_samples);
        tree
    }
}
