//! Noise port: Trait for the random source behind the bootstrap interval.
//!
//! This trait abstracts the random number generator from the uncertainty
//! estimator so that tests and reproducible runs can inject a seeded source.

/// Source of Gaussian noise.
///
/// Implementations decide whether draws are reproducible (seeded) or
/// drawn from OS entropy.
pub trait NoiseSource {
    /// Draw one sample from `N(mean, std_dev^2)`.
    ///
    /// A non-positive or non-finite `std_dev` returns `mean` unchanged.
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64;
}

impl<N: NoiseSource + ?Sized> NoiseSource for &mut N {
    fn gaussian(&mut self, mean: f64, std_dev: f64) -> f64 {
        (**self).gaussian(mean, std_dev)
    }
}
