//! Per-arm posterior beliefs used by the Bayesian policies.

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};
use statrs::distribution::ContinuousCDF;

use crate::error::{Result, ensure_positive};

/// Belief over the mean reward of one arm.
pub trait Posterior: Clone + Send + Sync {
    /// Whether the belief is undefined before the first observation, so
    /// policies must pull every arm once before consulting it.
    const REQUIRES_WARM_UP: bool = false;

    /// Restores the prior.
    fn reset(&mut self);

    /// Conditions the belief on one observed reward.
    fn update(&mut self, obs: f64, rng: &mut dyn RngCore);

    /// Draws a mean from the belief.
    fn sample(&self, rng: &mut dyn RngCore) -> f64;

    /// Quantile of order `p` in `(0, 1)`.
    fn quantile(&self, p: f64) -> f64;
}

/// Beta posterior for rewards in `[0, 1]`.
///
/// Non-binary rewards are binarised: an observation `r` counts as a success
/// with probability `r`, which keeps the Beta family conjugate.
#[derive(Clone, Debug, PartialEq)]
pub struct BetaPosterior {
    prior_a: f64,
    prior_b: f64,
    a: f64,
    b: f64,
}

impl BetaPosterior {
    /// Creates a posterior starting from the `Beta(a, b)` prior.
    pub fn new(a: f64, b: f64) -> Result<Self> {
        ensure_positive("prior a", a)?;
        ensure_positive("prior b", b)?;
        Ok(Self {
            prior_a: a,
            prior_b: b,
            a,
            b,
        })
    }

    /// Current `(a, b)` parameters.
    pub fn params(&self) -> (f64, f64) {
        (self.a, self.b)
    }

    pub fn mean(&self) -> f64 {
        self.a / (self.a + self.b)
    }
}

impl Default for BetaPosterior {
    /// The uniform prior `Beta(1, 1)`.
    fn default() -> Self {
        Self {
            prior_a: 1.0,
            prior_b: 1.0,
            a: 1.0,
            b: 1.0,
        }
    }
}

impl Posterior for BetaPosterior {
    fn reset(&mut self) {
        self.a = self.prior_a;
        self.b = self.prior_b;
    }

    fn update(&mut self, obs: f64, rng: &mut dyn RngCore) {
        if rng.random::<f64>() <= obs {
            self.a += 1.0;
        } else {
            self.b += 1.0;
        }
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        match rand_distr::Beta::new(self.a, self.b) {
            Ok(dist) => dist.sample(rng),
            Err(_) => self.mean(),
        }
    }

    fn quantile(&self, p: f64) -> f64 {
        match statrs::distribution::Beta::new(self.a, self.b) {
            Ok(dist) => dist.inverse_cdf(p),
            Err(_) => self.mean(),
        }
    }
}

/// Flat-prior Gaussian posterior with unit observation variance.
///
/// After `n` observations summing to `s` the belief is `N(s / n, 1 / n)`.
/// Before any observation the belief is improper; sampling and quantiles then
/// return `+inf` so an unobserved arm always looks best.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImproperGaussian {
    cum_reward: f64,
    nb_samples: usize,
}

impl ImproperGaussian {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nb_samples(&self) -> usize {
        self.nb_samples
    }

    fn belief(&self) -> Option<(f64, f64)> {
        if self.nb_samples == 0 {
            return None;
        }
        let n = self.nb_samples as f64;
        Some((self.cum_reward / n, 1.0 / n.sqrt()))
    }
}

impl Posterior for ImproperGaussian {
    const REQUIRES_WARM_UP: bool = true;

    fn reset(&mut self) {
        self.cum_reward = 0.0;
        self.nb_samples = 0;
    }

    fn update(&mut self, obs: f64, _rng: &mut dyn RngCore) {
        self.nb_samples += 1;
        self.cum_reward += obs;
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let Some((mean, sd)) = self.belief() else {
            return f64::INFINITY;
        };
        match Normal::new(mean, sd) {
            Ok(dist) => dist.sample(rng),
            Err(_) => mean,
        }
    }

    fn quantile(&self, p: f64) -> f64 {
        let Some((mean, sd)) = self.belief() else {
            return f64::INFINITY;
        };
        match statrs::distribution::Normal::new(mean, sd) {
            Ok(dist) => dist.inverse_cdf(p),
            Err(_) => mean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_beta_posterior_binary_updates() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut posterior = BetaPosterior::default();

        posterior.update(1.0, &mut rng);
        posterior.update(1.0, &mut rng);
        posterior.update(0.0, &mut rng);
        assert_eq!(posterior.params(), (3.0, 2.0));
        assert_abs_diff_eq!(posterior.mean(), 0.6);

        posterior.reset();
        assert_eq!(posterior.params(), (1.0, 1.0));
    }

    #[test]
    fn test_beta_posterior_reset_restores_custom_prior() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut posterior = BetaPosterior::new(2.0, 5.0).unwrap();
        posterior.update(1.0, &mut rng);
        posterior.reset();
        assert_eq!(posterior.params(), (2.0, 5.0));
        assert!(BetaPosterior::new(0.0, 1.0).is_err());
    }

    #[test]
    fn test_beta_posterior_binarises_fractional_rewards() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut posterior = BetaPosterior::default();
        for _ in 0..10_000 {
            posterior.update(0.3, &mut rng);
        }
        let (a, b) = posterior.params();
        assert_abs_diff_eq!((a - 1.0) / (a + b - 2.0), 0.3, epsilon = 0.02);
    }

    #[test]
    fn test_beta_quantile() {
        let posterior = BetaPosterior::default();
        // Beta(1, 1) is uniform.
        assert_abs_diff_eq!(posterior.quantile(0.25), 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(posterior.quantile(0.9), 0.9, epsilon = 1e-6);

        let posterior = BetaPosterior::new(10.0, 2.0).unwrap();
        assert!(posterior.quantile(0.99) > posterior.quantile(0.5));
        assert!(posterior.quantile(0.99) < 1.0);
    }

    #[test]
    fn test_beta_sample_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(3);
        let posterior = BetaPosterior::new(3.0, 4.0).unwrap();
        for _ in 0..100 {
            let s = posterior.sample(&mut rng);
            assert!((0.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn test_improper_gaussian() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut posterior = ImproperGaussian::new();
        assert!(ImproperGaussian::REQUIRES_WARM_UP);
        assert!(posterior.sample(&mut rng).is_infinite());
        assert!(posterior.quantile(0.9).is_infinite());

        for obs in [1.0, 2.0, 3.0, 2.0] {
            posterior.update(obs, &mut rng);
        }
        assert_eq!(posterior.nb_samples(), 4);
        assert_abs_diff_eq!(posterior.quantile(0.5), 2.0, epsilon = 1e-9);
        // One standard deviation above the mean is 1/sqrt(4).
        assert_abs_diff_eq!(posterior.quantile(0.841_344_746), 2.5, epsilon = 1e-6);

        posterior.reset();
        assert_eq!(posterior.nb_samples(), 0);
    }
}
