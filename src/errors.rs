//! Errors
//!
//! Custom error types used throughout the `splittree` crate.
use thiserror::Error;

/// Errors that can occur while fitting or using a decision tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The training or prediction data is malformed.
    #[error("Invalid input data: {0}")]
    InvalidInput(String),
    /// A split node is missing one of its children.
    #[error("Node at depth {0} splits on feature {1} but is missing a child.")]
    MissingChild(usize, usize),
    /// Prediction was requested before a tree was fitted.
    #[error("The estimator has not been fitted, call fit before predict.")]
    NotFitted,
    /// Unable to write model to file.
    #[error("Unable to write model to file: {0}")]
    UnableToWrite(String),
    /// Unable to read model from file.
    #[error("Unable to read model from a file {0}")]
    UnableToRead(String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// The worker pool could not be created.
    #[error("Unable to build thread pool: {0}")]
    ThreadPool(String),
}
