use crate::data::Matrix;
use crate::errors::TreeError;
use crate::estimator::config::{ImportanceMethod, TreeConfig, TreeIO};
use crate::impurity::Criterion;
use crate::tree::tree::Tree;
use crate::utils::validate_positive_usize_parameter;
use hashbrown::HashMap;
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Instant;

type ImportanceFn = fn(&Tree, &mut HashMap<usize, (f64, usize)>);

/// Decision tree estimator.
///
/// One implementation serves both classification and regression, the
/// criterion in the configuration decides how nodes are scored and labelled.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct DecisionTree {
    pub cfg: TreeConfig,
    /// The fitted tree, `None` until `fit` succeeds.
    pub tree: Option<Tree>,
}

impl DecisionTree {
    /// Decision tree object
    ///
    /// * `criterion` - The tag of the impurity criterion. Valid options are:
    ///   "gini" and "entropy" for classification, the node label is the majority class,
    ///   "mse" and "mae" for regression, the node label is the mean target.
    ///   Any other tag is scored as "gini".
    /// * `max_depth` - Maximum depth of the tree, must be positive.
    /// * `min_samples` - Minimum number of training rows, must be positive. When the
    ///   training set is smaller, the fitted tree is a single leaf.
    pub fn new(criterion: &str, max_depth: usize, min_samples: usize) -> Result<Self, TreeError> {
        let cfg = TreeConfig {
            criterion: Criterion::from_tag(criterion),
            max_depth,
            min_samples,
            num_threads: None,
        };
        let model = DecisionTree { cfg, tree: None };
        model.validate_parameters()?;
        Ok(model)
    }

    /// Classification preset, gini impurity and majority-class labels.
    pub fn classifier() -> Self {
        DecisionTree {
            cfg: TreeConfig::classifier(),
            tree: None,
        }
    }

    /// Regression preset, mean squared error and mean labels.
    pub fn regressor() -> Self {
        DecisionTree {
            cfg: TreeConfig::regressor(),
            tree: None,
        }
    }

    pub fn validate_parameters(&self) -> Result<(), TreeError> {
        validate_positive_usize_parameter(self.cfg.max_depth, "max_depth")?;
        validate_positive_usize_parameter(self.cfg.min_samples, "min_samples")?;
        if let Some(num_threads) = self.cfg.num_threads {
            validate_positive_usize_parameter(num_threads, "num_threads")?;
        }
        Ok(())
    }

    pub fn is_fitted(&self) -> bool {
        self.tree.is_some()
    }

    pub fn reset(&mut self) {
        self.tree = None;
    }

    pub(crate) fn thread_pool(&self) -> Result<rayon::ThreadPool, TreeError> {
        let num_threads = match self.cfg.num_threads {
            Some(num_threads) => num_threads,
            None => std::thread::available_parallelism().map_or(1, |n| n.get()),
        };
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| TreeError::ThreadPool(e.to_string()))
    }

    /// Fit the decision tree on a provided dataset.
    ///
    /// Grows the full tree, then prunes it with `max_depth` and `min_samples`.
    /// Any previously fitted tree is discarded, also when fitting fails.
    ///
    /// * `data` - Feature matrix, one row per sample.
    /// * `y` - Target values, one per row.
    pub fn fit(&mut self, data: &Matrix<f64>, y: &[f64]) -> Result<(), TreeError> {
        self.reset();
        self.validate_parameters()?;

        let start = Instant::now();
        let pool = self.thread_pool()?;
        let parallel = pool.current_num_threads() > 1;
        let cfg = &self.cfg;

        let mut tree = pool.install(|| Tree::fit(data, y, cfg.criterion, cfg.max_depth, parallel))?;
        tree.prune(cfg.max_depth, cfg.min_samples);

        info!(
            "Finished fitting a {} tree with {} nodes, {} leaves and depth {} in {} seconds.",
            cfg.criterion,
            tree.n_nodes(),
            tree.n_leaves(),
            tree.depth(),
            start.elapsed().as_secs_f32()
        );

        self.tree = Some(tree);
        Ok(())
    }

    /// Fit on row-major nested rows.
    pub fn fit_rows(&mut self, rows: &[Vec<f64>], y: &[f64]) -> Result<(), TreeError> {
        self.reset();
        let (data, n_rows, n_cols) = crate::data::flatten_rows(rows)?;
        let matrix = Matrix::try_new(&data, n_rows, n_cols)?;
        self.fit(&matrix, y)
    }

    /// The fitted tree.
    pub fn get_tree(&self) -> Result<&Tree, TreeError> {
        self.tree.as_ref().ok_or(TreeError::NotFitted)
    }

    /// Calculate feature importance measure for the features
    /// used to split the fitted tree.
    ///
    /// * `method` - variable importance method to use.
    /// * `normalize` - whether to normalize the importance values so they sum to one.
    pub fn calculate_feature_importance(
        &self,
        method: ImportanceMethod,
        normalize: bool,
    ) -> Result<HashMap<usize, f64>, TreeError> {
        let tree = self.get_tree()?;
        let (average, importance_fn): (bool, ImportanceFn) = match method {
            ImportanceMethod::Weight => (false, Tree::calculate_importance_weight),
            ImportanceMethod::Gain => (true, Tree::calculate_importance_gain),
            ImportanceMethod::TotalGain => (false, Tree::calculate_importance_gain),
        };
        let mut stats = HashMap::new();
        importance_fn(tree, &mut stats);

        let importance = stats
            .iter()
            .map(|(k, (v, c))| if average { (*k, v / (*c as f64)) } else { (*k, *v) })
            .collect::<HashMap<usize, f64>>();

        if normalize {
            // Sum in sorted order so the total does not depend on map iteration order.
            let mut values: Vec<f64> = importance.values().copied().collect();
            values.sort_by(|a, b| a.total_cmp(b));
            let total: f64 = values.iter().sum();
            Ok(importance.iter().map(|(k, v)| (*k, v / total)).collect())
        } else {
            Ok(importance)
        }
    }
}

impl TreeIO for DecisionTree {}
