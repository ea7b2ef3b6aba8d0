//! Tree Prediction Methods
//!
//! Root-to-leaf traversal of a fitted tree for single rows and whole datasets.
use super::tree::Tree;
use crate::errors::TreeError;
use crate::node::Node;
use crate::Matrix;
use rayon::prelude::*;

impl Node {
    /// Walk down from this node to the leaf a sample lands in.
    ///
    /// * `value` - Returns the sample's value for a feature column, or `None`
    ///   when the sample has no such column.
    pub fn find_leaf<F>(&self, value: F) -> Result<&Node, TreeError>
    where
        F: Fn(usize) -> Option<f64>,
    {
        let mut node = self;
        while let Some(feature) = node.split_feature {
            let v = value(feature).ok_or_else(|| {
                TreeError::InvalidInput(format!("sample has no value for split feature {}", feature))
            })?;
            node = node.get_child(v)?;
        }
        Ok(node)
    }

    /// Predict a single row, given as a slice of feature values.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, TreeError> {
        self.find_leaf(|f| row.get(f).copied()).map(|leaf| leaf.label)
    }
}

impl Tree {
    fn predict_matrix_row(&self, data: &Matrix<f64>, row: usize) -> Result<f64, TreeError> {
        self.root
            .find_leaf(|f| if f < data.cols { Some(*data.get(row, f)) } else { None })
            .map(|leaf| leaf.label)
    }

    /// Predict from a pre-sliced row (no matrix lookup).
    pub fn predict_row_from_row_slice(&self, row: &[f64]) -> Result<f64, TreeError> {
        self.root.predict_row(row)
    }

    fn predict_single_threaded(&self, data: &Matrix<f64>) -> Result<Vec<f64>, TreeError> {
        data.index.iter().map(|i| self.predict_matrix_row(data, *i)).collect()
    }

    fn predict_parallel(&self, data: &Matrix<f64>) -> Result<Vec<f64>, TreeError> {
        data.index
            .par_iter()
            .map(|i| self.predict_matrix_row(data, *i))
            .collect()
    }

    /// Generate predictions for a full dataset, one per row in row order.
    ///
    /// * `data` - Feature matrix with the same number of columns the tree was fitted on.
    /// * `parallel` - Predict rows on the rayon pool.
    pub fn predict(&self, data: &Matrix<f64>, parallel: bool) -> Result<Vec<f64>, TreeError> {
        if data.cols != self.n_features {
            return Err(TreeError::InvalidInput(format!(
                "tree was fitted on {} features but data has {}",
                self.n_features, data.cols
            )));
        }
        if parallel {
            self.predict_parallel(data)
        } else {
            self.predict_single_threaded(data)
        }
    }
}
