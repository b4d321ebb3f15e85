//! Reward sources for simulated arms.
//!
//! A [`RewardSource`] is what the environment pulls when a policy picks an
//! arm: it draws stochastic rewards and reports its true expectation, which is
//! what regret is measured against. Randomness is always supplied by the
//! caller so that independent simulations never share generator state.

use std::fmt;

use rand::{Rng, RngCore};
use rand_distr::{Distribution, Exp, Normal};
use statrs::distribution::{Continuous, ContinuousCDF};

use crate::error::{BanditError, Result, ensure_positive};

/// A stochastic reward generator with a known mean.
pub trait RewardSource: fmt::Debug + Send + Sync {
    /// Draws one reward.
    fn draw(&self, rng: &mut dyn RngCore) -> f64;

    /// The mean of [`RewardSource::draw`]. Constant for the lifetime of the source.
    fn expectation(&self) -> f64;
}

impl<S: RewardSource + ?Sized> RewardSource for Box<S> {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        (**self).draw(rng)
    }

    fn expectation(&self) -> f64 {
        (**self).expectation()
    }
}

/// Bernoulli arm: reward 1 with probability `p`, else 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bernoulli {
    p: f64,
}

impl Bernoulli {
    pub fn new(p: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(BanditError::invalid(format!(
                "bernoulli p must be in [0, 1], got {p}"
            )));
        }
        Ok(Self { p })
    }

    pub fn p(&self) -> f64 {
        self.p
    }
}

impl RewardSource for Bernoulli {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        if rng.random::<f64>() < self.p { 1.0 } else { 0.0 }
    }

    fn expectation(&self) -> f64 {
        self.p
    }
}

/// Beta-distributed arm with rewards in `[0, 1]`.
#[derive(Clone, Copy, Debug)]
pub struct BetaArm {
    a: f64,
    b: f64,
    dist: rand_distr::Beta<f64>,
}

impl BetaArm {
    pub fn new(a: f64, b: f64) -> Result<Self> {
        ensure_positive("beta shape a", a)?;
        ensure_positive("beta shape b", b)?;
        let dist = rand_distr::Beta::new(a, b)
            .map_err(|e| BanditError::invalid(format!("beta arm: {e}")))?;
        Ok(Self { a, b, dist })
    }
}

impl RewardSource for BetaArm {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        self.dist.sample(rng)
    }

    fn expectation(&self) -> f64 {
        self.a / (self.a + self.b)
    }
}

/// Gaussian arm, optionally truncated to `[lower, upper]`.
#[derive(Clone, Copy, Debug)]
pub struct Gaussian {
    mu: f64,
    sigma2: f64,
    truncation: Option<Truncation>,
    dist: Normal<f64>,
    expectation: f64,
}

impl Gaussian {
    /// Creates an untruncated Gaussian arm with mean `mu` and variance `sigma2`.
    pub fn new(mu: f64, sigma2: f64) -> Result<Self> {
        ensure_positive("gaussian variance", sigma2)?;
        if !mu.is_finite() {
            return Err(BanditError::invalid(format!("gaussian mean must be finite, got {mu}")));
        }
        let dist = Normal::new(mu, sigma2.sqrt())
            .map_err(|e| BanditError::invalid(format!("gaussian arm: {e}")))?;
        Ok(Self {
            mu,
            sigma2,
            truncation: None,
            dist,
            expectation: mu,
        })
    }

    /// Creates a Gaussian arm whose draws are conditioned on `[lower, upper]`.
    pub fn truncated(mu: f64, sigma2: f64, lower: f64, upper: f64) -> Result<Self> {
        let base = Self::new(mu, sigma2)?;
        if lower >= upper {
            return Err(BanditError::invalid(format!(
                "truncation interval [{lower}, {upper}] is empty"
            )));
        }
        let sigma = sigma2.sqrt();
        let alpha = (lower - mu) / sigma;
        let beta = (upper - mu) / sigma;
        let truncation = Truncation::new(lower, upper, alpha, beta);
        let mass = truncation.cdf_high - truncation.cdf_low;
        if mass <= 0.0 {
            return Err(BanditError::invalid(format!(
                "truncation interval [{lower}, {upper}] carries no probability mass"
            )));
        }
        let standard = statrs::distribution::Normal::standard();
        let expectation = mu + sigma * (standard.pdf(alpha) - standard.pdf(beta)) / mass;
        Ok(Self {
            truncation: Some(truncation),
            expectation,
            ..base
        })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }
}

impl RewardSource for Gaussian {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        match self.truncation {
            None => self.dist.sample(rng),
            Some(truncation) => {
                let z = truncation.sample(rng.random::<f64>());
                (self.mu + self.sigma2.sqrt() * z).clamp(truncation.lower, truncation.upper)
            }
        }
    }

    fn expectation(&self) -> f64 {
        self.expectation
    }
}

/// Poisson arm, optionally capped at `trunc`.
#[derive(Clone, Copy, Debug)]
pub struct Poisson {
    p: f64,
    trunc: Option<u64>,
    dist: rand_distr::Poisson<f64>,
    expectation: f64,
}

impl Poisson {
    pub fn new(p: f64) -> Result<Self> {
        ensure_positive("poisson rate", p)?;
        let dist = rand_distr::Poisson::new(p)
            .map_err(|e| BanditError::invalid(format!("poisson arm: {e}")))?;
        Ok(Self {
            p,
            trunc: None,
            dist,
            expectation: p,
        })
    }

    /// Creates a Poisson arm whose draws are `min(X, trunc)`.
    pub fn truncated(p: f64, trunc: u64) -> Result<Self> {
        let base = Self::new(p)?;
        Ok(Self {
            trunc: Some(trunc),
            expectation: truncated_poisson_mean(p, trunc),
            ..base
        })
    }

    pub fn rate(&self) -> f64 {
        self.p
    }
}

/// Mean of `min(X, trunc)` for `X ~ Poisson(p)`:
/// `sum_{k < trunc} k q_k + trunc * P(X >= trunc)`.
fn truncated_poisson_mean(p: f64, trunc: u64) -> f64 {
    let mut q = (-p).exp();
    let mut below = q;
    let mut mean = 0.0;
    for k in 1..trunc {
        q *= p / k as f64;
        mean += k as f64 * q;
        below += q;
    }
    mean + trunc as f64 * (1.0 - below).max(0.0)
}

impl RewardSource for Poisson {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        let x: f64 = self.dist.sample(rng);
        match self.trunc {
            Some(trunc) => x.min(trunc as f64),
            None => x,
        }
    }

    fn expectation(&self) -> f64 {
        self.expectation
    }
}

/// Exponential arm with rate `lambda`, optionally truncated to `[0, b / lambda]`.
#[derive(Clone, Copy, Debug)]
pub struct Exponential {
    lambda: f64,
    trunc: Option<f64>,
    dist: Exp<f64>,
    expectation: f64,
}

impl Exponential {
    pub fn new(lambda: f64) -> Result<Self> {
        ensure_positive("exponential rate", lambda)?;
        let dist = Exp::new(lambda)
            .map_err(|e| BanditError::invalid(format!("exponential arm: {e}")))?;
        Ok(Self {
            lambda,
            trunc: None,
            dist,
            expectation: 1.0 / lambda,
        })
    }

    /// Truncates the support to `[0, b / lambda]`, `b` in units of the scale.
    pub fn truncated(lambda: f64, b: f64) -> Result<Self> {
        let base = Self::new(lambda)?;
        ensure_positive("exponential truncation", b)?;
        let tail = (-b).exp();
        let expectation = (1.0 - (b + 1.0) * tail) / (1.0 - tail) / lambda;
        Ok(Self {
            trunc: Some(b),
            expectation,
            ..base
        })
    }
}

impl RewardSource for Exponential {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        match self.trunc {
            None => self.dist.sample(rng),
            Some(b) => {
                let u: f64 = rng.random();
                -(-u * (1.0 - (-b).exp())).ln_1p() / self.lambda
            }
        }
    }

    fn expectation(&self) -> f64 {
        self.expectation
    }
}

/// Pareto arm with unit scale and shape `alpha`.
#[derive(Clone, Copy, Debug)]
pub struct Pareto {
    alpha: f64,
    dist: rand_distr::Pareto<f64>,
}

impl Pareto {
    pub fn new(alpha: f64) -> Result<Self> {
        ensure_positive("pareto shape", alpha)?;
        let dist = rand_distr::Pareto::new(1.0, alpha)
            .map_err(|e| BanditError::invalid(format!("pareto arm: {e}")))?;
        Ok(Self { alpha, dist })
    }
}

impl RewardSource for Pareto {
    fn draw(&self, rng: &mut dyn RngCore) -> f64 {
        self.dist.sample(rng)
    }

    /// Infinite when `alpha <= 1`.
    fn expectation(&self) -> f64 {
        if self.alpha <= 1.0 {
            f64::INFINITY
        } else {
            self.alpha / (self.alpha - 1.0)
        }
    }
}

/// Truncation bounds of a Gaussian arm, sampled by inverting the standard
/// normal CDF. Intervals lying right of the mean are stored mirrored so the
/// CDF values stay near 0, where they keep full relative precision.
#[derive(Clone, Copy, Debug)]
struct Truncation {
    lower: f64,
    upper: f64,
    mirrored: bool,
    cdf_low: f64,
    cdf_high: f64,
}

impl Truncation {
    /// `alpha` and `beta` are the standardised bounds.
    fn new(lower: f64, upper: f64, alpha: f64, beta: f64) -> Self {
        let standard = statrs::distribution::Normal::standard();
        let mirrored = alpha > 0.0;
        let (a, b) = if mirrored { (-beta, -alpha) } else { (alpha, beta) };
        Self {
            lower,
            upper,
            mirrored,
            cdf_low: standard.cdf(a),
            cdf_high: standard.cdf(b),
        }
    }

    /// Standardised draw from a uniform `u` in `[0, 1)`.
    fn sample(&self, u: f64) -> f64 {
        let p = (self.cdf_low + u * (self.cdf_high - self.cdf_low))
            .clamp(self.cdf_low, self.cdf_high);
        let z = statrs::distribution::Normal::standard().inverse_cdf(p);
        if self.mirrored { -z } else { z }
    }
}
