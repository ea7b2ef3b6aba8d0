use crate::errors::TreeError;
use crate::utils::items_to_strings;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type MetricFn = fn(&[f64], &[f64]) -> f64;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub enum Metric {
    Accuracy,
    MeanSquaredError,
    RootMeanSquaredError,
    MeanAbsoluteError,
}

impl FromStr for Metric {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Accuracy" => Ok(Metric::Accuracy),
            "MeanSquaredError" => Ok(Metric::MeanSquaredError),
            "RootMeanSquaredError" => Ok(Metric::RootMeanSquaredError),
            "MeanAbsoluteError" => Ok(Metric::MeanAbsoluteError),

            _ => Err(TreeError::ParseString(
                s.to_string(),
                "Metric".to_string(),
                items_to_strings(vec![
                    "Accuracy",
                    "MeanSquaredError",
                    "RootMeanSquaredError",
                    "MeanAbsoluteError",
                ]),
            )),
        }
    }
}

pub fn metric_callables(metric_type: &Metric) -> MetricFn {
    match metric_type {
        Metric::Accuracy => AccuracyMetric::calculate_metric,
        Metric::MeanSquaredError => MeanSquaredErrorMetric::calculate_metric,
        Metric::RootMeanSquaredError => RootMeanSquaredErrorMetric::calculate_metric,
        Metric::MeanAbsoluteError => MeanAbsoluteErrorMetric::calculate_metric,
    }
}

pub trait EvaluationMetric {
    fn calculate_metric(y: &[f64], yhat: &[f64]) -> f64;
}

pub struct AccuracyMetric {}
impl EvaluationMetric for AccuracyMetric {
    fn calculate_metric(y: &[f64], yhat: &[f64]) -> f64 {
        let hits = y.iter().zip(yhat).filter(|(y_, yhat_)| y_ == yhat_).count();
        hits as f64 / y.len() as f64
    }
}

pub struct MeanSquaredErrorMetric {}
impl EvaluationMetric for MeanSquaredErrorMetric {
    fn calculate_metric(y: &[f64], yhat: &[f64]) -> f64 {
        y.iter().zip(yhat).map(|(y_, yhat_)| (y_ - yhat_) * (y_ - yhat_)).sum::<f64>() / y.len() as f64
    }
}

pub struct RootMeanSquaredErrorMetric {}
impl EvaluationMetric for RootMeanSquaredErrorMetric {
    fn calculate_metric(y: &[f64], yhat: &[f64]) -> f64 {
        MeanSquaredErrorMetric::calculate_metric(y, yhat).sqrt()
    }
}

pub struct MeanAbsoluteErrorMetric {}
impl EvaluationMetric for MeanAbsoluteErrorMetric {
    fn calculate_metric(y: &[f64], yhat: &[f64]) -> f64 {
        y.iter().zip(yhat).map(|(y_, yhat_)| (y_ - yhat_).abs()).sum::<f64>() / y.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::precision_round;

    #[test]
    fn test_accuracy() {
        let y = vec![0., 1., 1., 2.];
        let yhat = vec![0., 1., 2., 2.];
        assert_eq!(AccuracyMetric::calculate_metric(&y, &yhat), 0.75);
    }

    #[test]
    fn test_regression_metrics() {
        let y = vec![1., 2., 3., 4.];
        let yhat = vec![1., 3., 3., 6.];
        assert_eq!(MeanSquaredErrorMetric::calculate_metric(&y, &yhat), 1.25);
        assert_eq!(
            precision_round(RootMeanSquaredErrorMetric::calculate_metric(&y, &yhat), 6),
            precision_round(1.25_f64.sqrt(), 6)
        );
        assert_eq!(MeanAbsoluteErrorMetric::calculate_metric(&y, &yhat), 0.75);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(Metric::from_str("Accuracy").unwrap(), Metric::Accuracy);
        assert_eq!("MeanAbsoluteError".parse::<Metric>().unwrap(), Metric::MeanAbsoluteError);
        assert!(matches!("AUC".parse::<Metric>(), Err(TreeError::ParseString(..))));
    }

    #[test]
    fn test_callables() {
        let f = metric_callables(&Metric::Accuracy);
        assert_eq!(f(&[1., 0.], &[1., 1.]), 0.5);
        let f = metric_callables(&Metric::RootMeanSquaredError);
        assert_eq!(f(&[1., 3.], &[1., 1.]), 2.0_f64.sqrt());
        let f = metric_callables(&Metric::MeanAbsoluteError);
        assert_eq!(f(&[1., 3.], &[2., 1.]), 1.5);
    }
}
