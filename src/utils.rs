use crate::errors::TreeError;

/// Create a string of all available items.
pub fn items_to_strings(items: Vec<&str>) -> String {
    let mut s = String::new();
    for i in items {
        s.push_str(i);
        s.push_str(&String::from(", "));
    }
    s
}

// Validation
pub fn validate_positive_usize_parameter(value: usize, parameter: &str) -> Result<(), TreeError> {
    if value == 0 {
        Err(TreeError::InvalidParameter(
            parameter.to_string(),
            "positive integer".to_string(),
            value.to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Fail on the first NaN or infinite target value.
pub fn validate_target(y: &[f64]) -> Result<(), TreeError> {
    match y.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(TreeError::InvalidInput(format!("non-finite target value {} at row {}", y[i], i))),
        None => Ok(()),
    }
}

/// Arithmetic mean, `NaN` for an empty slice.
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// True when every value equals the first one.
#[inline]
pub fn is_constant(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => true,
    }
}

/// Sort a copy of the values and return `(value, count)` pairs in ascending order.
pub fn sorted_value_counts(values: &[f64]) -> Vec<(f64, usize)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mut counts: Vec<(f64, usize)> = Vec::new();
    for v in sorted {
        match counts.last_mut() {
            Some((last, c)) if *last == v => *c += 1,
            _ => counts.push((v, 1)),
        }
    }
    counts
}

pub fn precision_round(n: f64, precision: i32) -> f64 {
    let p = (10.0_f64).powi(precision);
    (n * p).round() / p
}
