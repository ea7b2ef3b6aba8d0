use crate::estimator::core::DecisionTree;
use crate::impurity::Criterion;

impl DecisionTree {
    // Set methods for paramters

    /// Set the criterion on the estimator.
    /// * `criterion` - The impurity criterion used to score splits.
    pub fn set_criterion(mut self, criterion: Criterion) -> Self {
        self.cfg.criterion = criterion;
        self
    }

    /// Set the maximum depth on the estimator.
    /// * `max_depth` - Nodes at this depth become leaves.
    pub fn set_max_depth(mut self, max_depth: usize) -> Self {
        self.cfg.max_depth = max_depth;
        self
    }

    /// Set the minimum number of training rows on the estimator.
    /// * `min_samples` - When the training set has fewer rows, the fitted tree is a single leaf.
    pub fn set_min_samples(mut self, min_samples: usize) -> Self {
        self.cfg.min_samples = min_samples;
        self
    }

    /// Set the number of threads on the estimator.
    /// * `num_threads` - Set the number of threads to be used during fitting and prediction.
    pub fn set_num_threads(mut self, num_threads: Option<usize>) -> Self {
        self.cfg.num_threads = num_threads;
        self
    }
}
