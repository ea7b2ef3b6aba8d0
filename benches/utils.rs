#![allow(dead_code)]
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Column-major features with a noisy linear regression target.
pub(crate) fn create_data(n_samples: usize, n_features: usize) -> (Vec<f64>, Vec<f64>) {
    // reproducible seed
    let mut rng = StdRng::seed_from_u64(1903);

    let feature_distribution = Uniform::new(0.0, 1.0);
    let noise_distribution = Uniform::new(-0.1, 0.1);
    let weight_distribution = Uniform::new(-1.0, 1.0);

    let weights: Vec<f64> = (0..n_features).map(|_| rng.sample(weight_distribution)).collect();
    let data: Vec<f64> = (0..n_samples * n_features)
        .map(|_| rng.sample(feature_distribution))
        .collect();

    let y = (0..n_samples)
        .map(|i| {
            let linear: f64 = (0..n_features).map(|j| data[j * n_samples + i] * weights[j]).sum();
            linear + rng.sample(noise_distribution)
        })
        .collect();
    (data, y)
}

/// Same features, with the target thresholded into two classes.
pub(crate) fn create_classification_data(n_samples: usize, n_features: usize) -> (Vec<f64>, Vec<f64>) {
    let (data, y) = create_data(n_samples, n_features);
    let y = y.iter().map(|v| if *v > 0.0 { 1.0 } else { 0.0 }).collect();
    (data, y)
}
