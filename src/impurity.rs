//! Impurity
//!
//! Node impurity scores and the node label rule for every supported criterion.
use crate::utils::{items_to_strings, mean, sorted_value_counts};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Criterion used to score the purity of a set of rows.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Criterion {
    /// Gini impurity, for classification.
    #[default]
    Gini,
    /// Shannon entropy in bits, for classification.
    Entropy,
    /// `1 - mean(|y - mean(y)|)`, for regression.
    MaeComplement,
    /// Variance of the target, for regression.
    Mse,
    /// Fallback for tags outside the known set: scored with gini impurity,
    /// nodes labelled with the mean.
    Unrecognised,
}

impl Criterion {
    /// Map a criterion tag onto a criterion.
    ///
    /// Tags are matched exactly: `gini`, `entropy`, `mae` and `mse`. Any
    /// other tag, including a differently cased one, maps to
    /// [`Criterion::Unrecognised`] instead of failing.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "gini" => Criterion::Gini,
            "entropy" => Criterion::Entropy,
            "mae" => Criterion::MaeComplement,
            "mse" => Criterion::Mse,
            _ => {
                warn!(
                    "Unrecognised criterion {}, expected one of {}scoring with gini and labelling with the mean.",
                    tag,
                    items_to_strings(vec!["gini", "entropy", "mae", "mse"])
                );
                Criterion::Unrecognised
            }
        }
    }

    /// The canonical tag of the criterion.
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Gini => "gini",
            Criterion::Entropy => "entropy",
            Criterion::MaeComplement => "mae",
            Criterion::Mse => "mse",
            Criterion::Unrecognised => "unrecognised",
        }
    }

    /// Classification criteria label nodes with the majority class,
    /// everything else with the mean.
    pub fn is_classification(&self) -> bool {
        matches!(self, Criterion::Gini | Criterion::Entropy)
    }

    /// Impurity of a set of target values, lower is purer.
    pub fn impurity(&self, y: &[f64]) -> f64 {
        match self {
            Criterion::Gini | Criterion::Unrecognised => gini(y),
            Criterion::Entropy => entropy(y),
            Criterion::MaeComplement => mae_complement(y),
            Criterion::Mse => mse(y),
        }
    }

    /// Prediction stored on a node holding these target values.
    pub fn node_label(&self, y: &[f64]) -> f64 {
        if self.is_classification() {
            majority_class(y)
        } else {
            mean(y)
        }
    }
}

impl From<&str> for Criterion {
    fn from(tag: &str) -> Self {
        Criterion::from_tag(tag)
    }
}

impl Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `1 - sum(p_c^2)` over the observed classes.
pub fn gini(y: &[f64]) -> f64 {
    let n = y.len() as f64;
    1.0 - sorted_value_counts(y)
        .iter()
        .map(|(_, c)| {
            let p = *c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

/// `-sum(p_c * log2(p_c))` over the observed classes.
pub fn entropy(y: &[f64]) -> f64 {
    let n = y.len() as f64;
    let mut entropy = 0.0;
    for (_, c) in sorted_value_counts(y) {
        let p = c as f64 / n;
        if p > 0.0 {
            entropy -= p * p.log2();
        }
    }
    entropy
}

/// `1 - mean(|y - mean(y)|)`.
///
/// This is not a dispersion measure, it shrinks as the spread grows.
pub fn mae_complement(y: &[f64]) -> f64 {
    let y_hat = mean(y);
    1.0 - y.iter().map(|v| (v - y_hat).abs()).sum::<f64>() / y.len() as f64
}

/// `mean((y - mean(y))^2)`.
pub fn mse(y: &[f64]) -> f64 {
    let y_hat = mean(y);
    y.iter().map(|v| (v - y_hat) * (v - y_hat)).sum::<f64>() / y.len() as f64
}

/// Most frequent class, ties go to the smallest class value.
pub fn majority_class(y: &[f64]) -> f64 {
    let mut best: Option<(f64, usize)> = None;
    for (class, count) in sorted_value_counts(y) {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((class, count)),
        }
    }
    best.map_or(f64::NAN, |(class, _)| class)
}
