//! Estimator Configuration
//!
//! Configuration of the decision tree estimator, the classifier and regressor
//! presets and JSON IO shared by the configuration and fitted models.
use crate::constants::{DEFAULT_MAX_DEPTH, DEFAULT_MIN_SAMPLES};
use crate::errors::TreeError;
use crate::impurity::Criterion;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Method to calculate variable importance.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub enum ImportanceMethod {
    /// The number of times a feature is used to split the data.
    Weight,
    /// The average split gain across all splits the feature is used in.
    Gain,
    /// The total gain across all splits the feature is used in.
    TotalGain,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
fn default_min_samples() -> usize {
    DEFAULT_MIN_SAMPLES
}
fn default_num_threads() -> Option<usize> {
    None
}

/// Configuration for the `DecisionTree` estimator.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TreeConfig {
    /// Impurity criterion, also decides between majority-class and mean labels.
    #[serde(default)]
    pub criterion: Criterion,
    /// Maximum depth of the tree, the root has depth 0.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// The whole tree collapses to its root when this exceeds the training row count.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Number of threads for growing and prediction, all cores when `None`.
    #[serde(default = "default_num_threads")]
    pub num_threads: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig::classifier()
    }
}

impl TreeConfig {
    /// Classification preset, gini impurity.
    pub fn classifier() -> Self {
        TreeConfig {
            criterion: Criterion::Gini,
            max_depth: DEFAULT_MAX_DEPTH,
            min_samples: DEFAULT_MIN_SAMPLES,
            num_threads: None,
        }
    }

    /// Regression preset, mean squared error.
    pub fn regressor() -> Self {
        TreeConfig {
            criterion: Criterion::Mse,
            ..TreeConfig::classifier()
        }
    }
}

/// IO
pub trait TreeIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save the model.
    fn save_model<P: AsRef<Path>>(&self, path: P) -> Result<(), TreeError> {
        fs::write(path, self.json_dump()?).map_err(|e| TreeError::UnableToWrite(e.to_string()))
    }

    /// Dump as a json object
    fn json_dump(&self) -> Result<String, TreeError> {
        serde_json::to_string(self).map_err(|e| TreeError::UnableToWrite(e.to_string()))
    }

    /// Load from Json string
    ///
    /// * `json_str` - String object, which can be serialized to json.
    fn from_json(json_str: &str) -> Result<Self, TreeError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| TreeError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    ///
    /// * `path` - Path to load the model from.
    fn load_model<P: AsRef<Path>>(path: P) -> Result<Self, TreeError> {
        let json_str = fs::read_to_string(path).map_err(|e| TreeError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl TreeIO for TreeConfig {}
