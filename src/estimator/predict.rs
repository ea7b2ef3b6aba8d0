//! Estimator Prediction Methods
//!
//! Prediction and scoring on a fitted `DecisionTree`.
use crate::data::{flatten_rows, Matrix};
use crate::errors::TreeError;
use crate::estimator::core::DecisionTree;
use crate::metric::{metric_callables, Metric};

impl DecisionTree {
    /// Generate predictions on data using the fitted tree.
    ///
    /// * `data` -  Feature matrix with the columns the tree was fitted on.
    /// * `parallel` -  Predict rows in parallel on the configured number of threads.
    pub fn predict(&self, data: &Matrix<f64>, parallel: bool) -> Result<Vec<f64>, TreeError> {
        let tree = self.get_tree()?;
        data.check_finite()?;
        if parallel {
            self.thread_pool()?.install(|| tree.predict(data, true))
        } else {
            tree.predict(data, false)
        }
    }

    /// Predict row-major nested rows, one output per row in the same order.
    pub fn predict_rows(&self, rows: &[Vec<f64>], parallel: bool) -> Result<Vec<f64>, TreeError> {
        self.get_tree()?;
        let (data, n_rows, n_cols) = flatten_rows(rows)?;
        let matrix = Matrix::try_new(&data, n_rows, n_cols)?;
        self.predict(&matrix, parallel)
    }

    /// Predict a single row.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, TreeError> {
        self.get_tree()?.predict_row_from_row_slice(row)
    }

    /// Evaluate predictions on `data` against `y` with the given metric.
    pub fn score(&self, data: &Matrix<f64>, y: &[f64], metric: Metric) -> Result<f64, TreeError> {
        if y.len() != data.rows {
            return Err(TreeError::InvalidInput(format!(
                "feature matrix has {} rows but target has {} values",
                data.rows,
                y.len()
            )));
        }
        let yhat = self.predict(data, false)?;
        let metric_fn = metric_callables(&metric);
        Ok(metric_fn(y, &yhat))
    }
}
