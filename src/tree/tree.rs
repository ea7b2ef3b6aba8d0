use crate::constants::PARALLEL_MIN_ROWS;
use crate::data::Matrix;
use crate::errors::TreeError;
use crate::impurity::Criterion;
use crate::node::Node;
use crate::splitter::{partition, ExhaustiveSplitter};
use crate::utils::{is_constant, validate_positive_usize_parameter, validate_target};
use hashbrown::HashMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A fitted binary decision tree.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Tree {
    pub root: Node,
    pub criterion: Criterion,
    /// Number of feature columns the tree was fitted on.
    pub n_features: usize,
}

/// Shared, read-only state of one tree growth.
struct TreeBuilder<'a> {
    data: &'a Matrix<'a, f64>,
    y: &'a [f64],
    splitter: ExhaustiveSplitter,
    max_depth: usize,
    parallel: bool,
}

impl<'a> TreeBuilder<'a> {
    fn grow(&self, node: &mut Node, index: &mut [usize]) {
        node.sample_count = index.len();
        let target: Vec<f64> = index.iter().map(|i| self.y[*i]).collect();

        if let Some(first) = target.first() {
            if is_constant(&target) {
                node.label = *first;
                return;
            }
        }

        let criterion = self.splitter.criterion;
        node.label = criterion.node_label(&target);
        let node_impurity = criterion.impurity(&target);

        let split = match self.splitter.best_split(self.data, self.y, index, node_impurity) {
            Some(split) => split,
            None => return,
        };
        node.split_feature = Some(split.split_feature);
        node.threshold = Some(split.split_value);
        node.gain = split.split_gain;

        if node.depth >= self.max_depth {
            node.split_feature = None;
            return;
        }

        debug!(
            "split depth={}, feature={}, threshold={}, gain={}, rows={}",
            node.depth, split.split_feature, split.split_value, split.split_gain, node.sample_count
        );

        let n_left = partition(self.data, index, &split);
        let (left_index, right_index) = index.split_at_mut(n_left);
        let mut left = Node::new(node.depth + 1);
        let mut right = Node::new(node.depth + 1);
        if self.parallel && node.sample_count >= PARALLEL_MIN_ROWS {
            rayon::join(
                || self.grow(&mut left, left_index),
                || self.grow(&mut right, right_index),
            );
        } else {
            self.grow(&mut left, left_index);
            self.grow(&mut right, right_index);
        }
        node.left = Some(Box::new(left));
        node.right = Some(Box::new(right));
    }
}

impl Tree {
    /// Grow a full tree from the training data.
    ///
    /// * `data` - Feature matrix, one row per sample.
    /// * `y` - Target values, class labels for classification criteria.
    /// * `criterion` - Impurity used to score splits and the label rule.
    /// * `max_depth` - Nodes at this depth are not split further.
    /// * `parallel` - Grow sibling subtrees on the rayon pool of the caller.
    pub fn fit(
        data: &Matrix<f64>,
        y: &[f64],
        criterion: Criterion,
        max_depth: usize,
        parallel: bool,
    ) -> Result<Self, TreeError> {
        validate_training_data(data, y)?;
        validate_positive_usize_parameter(max_depth, "max_depth")?;

        let builder = TreeBuilder {
            data,
            y,
            splitter: ExhaustiveSplitter::new(criterion),
            max_depth,
            parallel,
        };
        let mut index = data.index.to_owned();
        let mut root = Node::new(0);
        builder.grow(&mut root, &mut index);

        Ok(Tree {
            root,
            criterion,
            n_features: data.cols,
        })
    }

    pub fn n_nodes(&self) -> usize {
        let mut n = 0;
        self.root.walk(&mut |_| n += 1);
        n
    }

    pub fn n_leaves(&self) -> usize {
        let mut n = 0;
        self.root.walk(&mut |node| {
            if node.is_leaf() {
                n += 1
            }
        });
        n
    }

    /// Depth of the deepest node, a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        self.root.walk(&mut |node| depth = depth.max(node.depth));
        depth
    }

    fn calc_feature_node_stats<F>(&self, calc_stat: &F, stats: &mut HashMap<usize, (f64, usize)>)
    where
        F: Fn(&Node) -> f64,
    {
        self.root.walk(&mut |node| {
            if let Some(feature) = node.split_feature {
                stats
                    .entry(feature)
                    .and_modify(|(v, c)| {
                        *v += calc_stat(node);
                        *c += 1;
                    })
                    .or_insert((calc_stat(node), 1));
            }
        });
    }

    pub fn calculate_importance_weight(&self, stats: &mut HashMap<usize, (f64, usize)>) {
        self.calc_feature_node_stats(&|_: &Node| 1., stats);
    }

    pub fn calculate_importance_gain(&self, stats: &mut HashMap<usize, (f64, usize)>) {
        self.calc_feature_node_stats(&|n: &Node| n.gain, stats);
    }
}

/// Reject data the tree cannot be grown from.
pub fn validate_training_data(data: &Matrix<f64>, y: &[f64]) -> Result<(), TreeError> {
    if data.rows == 0 || data.cols == 0 {
        return Err(TreeError::InvalidInput("feature matrix is empty".to_string()));
    }
    if data.data.len() != data.rows * data.cols {
        return Err(TreeError::InvalidInput(format!(
            "buffer of length {} cannot hold a {} x {} matrix",
            data.data.len(),
            data.rows,
            data.cols
        )));
    }
    if y.len() != data.rows {
        return Err(TreeError::InvalidInput(format!(
            "feature matrix has {} rows but target has {} values",
            data.rows,
            y.len()
        )));
    }
    data.check_finite()?;
    validate_target(y)
}

impl Display for Tree {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut print_buffer: Vec<&Node> = vec![&self.root];
        let mut r = String::new();
        while let Some(node) = print_buffer.pop() {
            r += format!("{}{}\n", "      ".repeat(node.depth).as_str(), node).as_str();
            if let Some(right) = &node.right {
                print_buffer.push(right);
            }
            if let Some(left) = &node.left {
                print_buffer.push(left);
            }
        }
        write!(f, "{}", r)
    }
}

// Unit-testing
#[cfg(test)]
mod tests {
    use super::*;
    use crate::impurity::majority_class;
    use crate::utils::{mean, precision_round};

    fn step_data() -> (Vec<f64>, Vec<f64>) {
        (vec![1., 2., 3., 4.], vec![0., 0., 1., 1.])
    }

    /// Two features, the target depends on both.
    fn xor_like() -> (Vec<f64>, Vec<f64>) {
        let x0 = [0., 0., 1., 1., 0., 0., 1., 1.];
        let x1 = [0., 1., 0., 1., 0., 1., 0., 1.];
        let y = vec![0., 1., 1., 0., 0., 1., 1., 0.];
        let mut data = x0.to_vec();
        data.extend_from_slice(&x1);
        (data, y)
    }

    #[test]
    fn test_tree_fit_classification_stump() {
        let (x, y) = step_data();
        let data = Matrix::new(&x, 4, 1);
        let tree = Tree::fit(&data, &y, Criterion::Gini, 1, false).unwrap();
        let root = &tree.root;
        assert_eq!(root.split_feature, Some(0));
        assert_eq!(root.threshold, Some(2.5));
        assert_eq!(root.gain, 0.5);
        assert_eq!(root.sample_count, 4);
        assert_eq!(root.label, 0.);
        let left = root.left.as_ref().unwrap();
        let right = root.right.as_ref().unwrap();
        assert!(left.is_leaf() && right.is_leaf());
        assert_eq!((left.label, right.label), (0., 1.));
        assert_eq!((left.depth, right.depth), (1, 1));
        assert_eq!((left.sample_count, right.sample_count), (2, 2));
    }

    #[test]
    fn test_tree_fit_regression_stump() {
        let x = vec![1., 2., 3., 4.];
        let y = vec![1., 1., 10., 10.];
        let data = Matrix::new(&x, 4, 1);
        let tree = Tree::fit(&data, &y, Criterion::Mse, 1, false).unwrap();
        assert_eq!(tree.root.threshold, Some(2.5));
        assert_eq!(tree.root.label, 5.5);
        assert_eq!(tree.root.left.as_ref().unwrap().label, 1.);
        assert_eq!(tree.root.right.as_ref().unwrap().label, 10.);
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let (x, _) = xor_like();
        let y = vec![7.; 8];
        let data = Matrix::new(&x, 8, 2);
        for max_depth in [1, 3, 100] {
            let tree = Tree::fit(&data, &y, Criterion::Entropy, max_depth, false).unwrap();
            assert!(tree.root.is_leaf());
            assert_eq!(tree.root.threshold, None);
            assert_eq!(tree.root.label, 7.);
            assert_eq!(tree.n_nodes(), 1);
        }
    }

    #[test]
    fn test_max_depth_demotes_to_leaf() {
        let (x, y) = xor_like();
        let data = Matrix::new(&x, 8, 2);
        let tree = Tree::fit(&data, &y, Criterion::Gini, 1, false).unwrap();
        assert_eq!(tree.depth(), 1);
        let left = tree.root.left.as_ref().unwrap();
        // A split was found at depth 1, only the feature is cleared.
        assert!(left.is_leaf());
        assert!(left.threshold.is_some());
        assert!(left.left.is_none() && left.right.is_none());
    }

    #[test]
    fn test_xor_is_solved_with_depth() {
        let (x, y) = xor_like();
        let data = Matrix::new(&x, 8, 2);
        let tree = Tree::fit(&data, &y, Criterion::Gini, 3, false).unwrap();
        // Root has zero gain on both features, the first one is chosen.
        assert_eq!(tree.root.split_feature, Some(0));
        assert_eq!(tree.root.gain, 0.0);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.n_leaves(), 4);
        let preds = tree.predict(&data, false).unwrap();
        assert_eq!(preds, y);
    }

    #[test]
    fn test_constant_features_leave_leaf() {
        let x = vec![1., 1., 1., 1.];
        let y = vec![0., 1., 1., 2.];
        let data = Matrix::new(&x, 4, 1);
        let tree = Tree::fit(&data, &y, Criterion::Mse, 5, false).unwrap();
        assert!(tree.root.is_leaf());
        assert_eq!(tree.root.threshold, None);
        assert_eq!(tree.root.label, 1.);
    }

    /// Check every node's label against the training rows that reach it.
    fn check_labels(node: &Node, rows: Vec<usize>, data: &Matrix<f64>, y: &[f64], criterion: Criterion) {
        let subset: Vec<f64> = rows.iter().map(|i| y[*i]).collect();
        assert_eq!(node.sample_count, rows.len());
        if criterion.is_classification() {
            assert!(subset.contains(&node.label));
            assert_eq!(node.label, majority_class(&subset));
        } else {
            assert_eq!(node.label, mean(&subset));
        }
        if let (Some(left), Some(right), Some(feature), Some(threshold)) =
            (&node.left, &node.right, node.split_feature, node.threshold)
        {
            let (l, r): (Vec<usize>, Vec<usize>) = rows.iter().partition(|i| data.get(**i, feature) <= &threshold);
            check_labels(left, l, data, y, criterion);
            check_labels(right, r, data, y, criterion);
        }
    }

    #[test]
    fn test_labels_are_set_everywhere() {
        let x: Vec<f64> = (0..40).map(|i| ((i * 7) % 13) as f64).collect();
        let y: Vec<f64> = (0..20).map(|i| (i % 3) as f64).collect();
        let data = Matrix::new(&x, 20, 2);
        for criterion in [
            Criterion::Gini,
            Criterion::Entropy,
            Criterion::Mse,
            Criterion::MaeComplement,
            Criterion::Unrecognised,
        ] {
            let tree = Tree::fit(&data, &y, criterion, 6, false).unwrap();
            assert!(tree.depth() > 1);
            check_labels(&tree.root, (0..20).collect(), &data, &y, criterion);
        }
    }

    #[test]
    fn test_child_depth_and_counts() {
        let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..30).map(|i| ((i / 4) % 2) as f64).collect();
        let data = Matrix::new(&x, 30, 1);
        let tree = Tree::fit(&data, &y, Criterion::Gini, 10, false).unwrap();
        assert_eq!(tree.root.sample_count, 30);
        tree.root.walk(&mut |n| {
            if let (Some(l), Some(r)) = (&n.left, &n.right) {
                assert_eq!(l.depth, n.depth + 1);
                assert_eq!(r.depth, n.depth + 1);
                assert_eq!(l.sample_count + r.sample_count, n.sample_count);
            } else {
                assert!(n.is_leaf());
            }
        });
    }

    #[test]
    fn test_fit_is_deterministic() {
        let x: Vec<f64> = (0..600).map(|i| ((i * 31) % 97) as f64 / 7.0).collect();
        let y: Vec<f64> = (0..200).map(|i| ((i * 13) % 17) as f64).collect();
        let data = Matrix::new(&x, 200, 3);
        let t1 = Tree::fit(&data, &y, Criterion::Mse, 8, false).unwrap();
        let t2 = Tree::fit(&data, &y, Criterion::Mse, 8, false).unwrap();
        assert_eq!(t1, t2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let n = 3000;
        let x: Vec<f64> = (0..n * 2).map(|i| ((i * 37) % 101) as f64).collect();
        let y: Vec<f64> = (0..n).map(|i| ((i * 7) % 5) as f64).collect();
        let data = Matrix::new(&x, n, 2);
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let parallel = pool.install(|| Tree::fit(&data, &y, Criterion::Gini, 4, true).unwrap());
        let sequential = Tree::fit(&data, &y, Criterion::Gini, 4, false).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_fit_rejects_invalid_input() {
        let x = vec![1., 2., 3.];
        let data = Matrix::new(&x, 3, 1);
        assert!(matches!(
            Tree::fit(&data, &[0., 1.], Criterion::Gini, 3, false),
            Err(TreeError::InvalidInput(_))
        ));
        let bad = Matrix::new(&x, 2, 2);
        assert!(matches!(
            Tree::fit(&bad, &[0., 1.], Criterion::Gini, 3, false),
            Err(TreeError::InvalidInput(_))
        ));
        let empty: Vec<f64> = Vec::new();
        let data = Matrix::new(&empty, 0, 1);
        assert!(matches!(
            Tree::fit(&data, &[], Criterion::Gini, 3, false),
            Err(TreeError::InvalidInput(_))
        ));
        let x = vec![1., f64::NAN];
        let data = Matrix::new(&x, 2, 1);
        assert!(Tree::fit(&data, &[0., 1.], Criterion::Gini, 3, false).is_err());
    }

    #[test]
    fn test_importance() {
        let (x, y) = xor_like();
        let data = Matrix::new(&x, 8, 2);
        let tree = Tree::fit(&data, &y, Criterion::Gini, 3, false).unwrap();
        let mut stats = HashMap::new();
        tree.calculate_importance_weight(&mut stats);
        assert_eq!(stats[&0], (1., 1));
        assert_eq!(stats[&1], (2., 2));
        let mut stats = HashMap::new();
        tree.calculate_importance_gain(&mut stats);
        assert_eq!(stats[&0].0, 0.0);
        assert_eq!(precision_round(stats[&1].0, 6), 1.0);
    }

    #[test]
    fn test_display() {
        let (x, y) = step_data();
        let data = Matrix::new(&x, 4, 1);
        let tree = Tree::fit(&data, &y, Criterion::Gini, 1, false).unwrap();
        let s = tree.to_string();
        let lines: Vec<&str> = s.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "[0 <= 2.5] label=0,gain=0.5,samples=4");
        assert_eq!(lines[1], "      leaf=0,samples=2");
        assert_eq!(lines[2], "      leaf=1,samples=2");
    }
}
