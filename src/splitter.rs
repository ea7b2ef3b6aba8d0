//! Splitter
//!
//! Exhaustive search for the best single feature/threshold split of a node.
use crate::data::Matrix;
use crate::impurity::Criterion;

/// The winning split of a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitInfo {
    pub split_feature: usize,
    pub split_value: f64,
    pub split_gain: f64,
}

/// Midpoints between consecutive sorted unique values.
///
/// A column with `k` unique values yields `k - 1` thresholds.
pub fn candidate_thresholds(values: &mut Vec<f64>) -> Vec<f64> {
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    values.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
}

/// Evaluates every midpoint threshold of every feature.
pub struct ExhaustiveSplitter {
    pub criterion: Criterion,
}

impl ExhaustiveSplitter {
    pub fn new(criterion: Criterion) -> Self {
        ExhaustiveSplitter { criterion }
    }

    /// Find the split with the largest impurity reduction over the rows in `index`.
    ///
    /// Features are scanned in column order and thresholds in ascending order.
    /// The first candidate always becomes the incumbent, even with a zero or
    /// negative gain, afterwards only a strictly greater gain replaces it.
    /// Returns `None` when every column is constant over these rows.
    pub fn best_split(&self, data: &Matrix<f64>, y: &[f64], index: &[usize], node_impurity: f64) -> Option<SplitInfo> {
        let n = index.len() as f64;
        let mut best: Option<SplitInfo> = None;
        let mut values = Vec::with_capacity(index.len());
        let mut y_left = Vec::with_capacity(index.len());
        let mut y_right = Vec::with_capacity(index.len());

        for col in 0..data.cols {
            let feature = data.get_col(col);
            values.clear();
            values.extend(index.iter().map(|i| feature[*i]));

            for threshold in candidate_thresholds(&mut values) {
                y_left.clear();
                y_right.clear();
                for i in index {
                    if feature[*i] <= threshold {
                        y_left.push(y[*i]);
                    } else {
                        y_right.push(y[*i]);
                    }
                }
                let impurity_left = self.criterion.impurity(&y_left);
                let impurity_right = self.criterion.impurity(&y_right);
                let gain = node_impurity
                    - (y_left.len() as f64 / n * impurity_left + y_right.len() as f64 / n * impurity_right);

                match best {
                    Some(b) if gain <= b.split_gain => {}
                    _ => {
                        best = Some(SplitInfo {
                            split_feature: col,
                            split_value: threshold,
                            split_gain: gain,
                        })
                    }
                }
            }
        }
        best
    }
}

/// Reorder `index` so rows going left come first, keeping the relative
/// order on each side. Returns the number of rows going left.
pub fn partition(data: &Matrix<f64>, index: &mut [usize], split: &SplitInfo) -> usize {
    let feature = data.get_col(split.split_feature);
    let (left, right): (Vec<usize>, Vec<usize>) = index.iter().partition(|i| feature[**i] <= split.split_value);
    let n_left = left.len();
    index[..n_left].copy_from_slice(&left);
    index[n_left..].copy_from_slice(&right);
    n_left
}
