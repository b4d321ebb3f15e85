//! Kullback-Leibler divergences and KL-UCB upper confidence bounds.
//!
//! Each divergence `kl(x, y)` measures how far a distribution with mean `y`
//! lies from one with mean `x` inside a one-parameter exponential family.
//! [`klucb`] inverts it by bisection: it returns the largest `m` in a bracket
//! such that `kl(x, m) <= d`. The per-family wrappers ([`klucb_bern`],
//! [`klucb_poisson`], [`klucb_exp`]) supply analytic brackets that are proven
//! to contain that root, and [`klucb_gauss`] has a closed form.
//!
//! # Precondition
//!
//! `kl(x, ·)` must be non-decreasing on `[max(x, lower_bound), upper_bound]`.
//! A bracket that violates this yields an unspecified value; it is not
//! detected at runtime. The bisection always terminates, even when
//! `precision` is below the float spacing at the bracket's ends.

use crate::error::{BanditError, Result, ensure_positive};

/// Clamp applied to means before evaluating a logarithm.
pub const EPS: f64 = 1e-15;

/// Default absolute precision of the bisection solver.
pub const DEFAULT_PRECISION: f64 = 1e-6;

/// Kullback-Leibler divergence for Bernoulli distributions.
pub fn kl_bern(x: f64, y: f64) -> f64 {
    let x = x.clamp(EPS, 1.0 - EPS);
    let y = y.clamp(EPS, 1.0 - EPS);
    x * (x / y).ln() + (1.0 - x) * ((1.0 - x) / (1.0 - y)).ln()
}

/// Kullback-Leibler divergence for Poisson distributions.
pub fn kl_poisson(x: f64, y: f64) -> f64 {
    let x = x.max(EPS);
    let y = y.max(EPS);
    y - x + x * (x / y).ln()
}

/// Kullback-Leibler divergence for Gamma distributions with shape `a`.
///
/// `a = 1` is the exponential family.
pub fn kl_gamma(x: f64, y: f64, a: f64) -> f64 {
    let x = x.max(EPS);
    let y = y.max(EPS);
    a * (x / y - 1.0 - (x / y).ln())
}

/// Kullback-Leibler divergence for negative binomial distributions with `r` failures.
pub fn kl_neg_bin(x: f64, y: f64, r: f64) -> f64 {
    let x = x.max(EPS);
    let y = y.max(EPS);
    r * ((r + x) / (r + y)).ln() - x * (y * (r + x) / (x * (r + y))).ln()
}

/// Kullback-Leibler divergence for Gaussian distributions with variance `sig2`.
pub fn kl_gauss(x: f64, y: f64, sig2: f64) -> f64 {
    (x - y).powi(2) / (2.0 * sig2)
}

/// Generic KL-UCB index by bisection.
///
/// Searches `[max(x, lower_bound), upper_bound]` for the largest `m` with
/// `kl(x, m) <= d` and stops once the bracket is no wider than `precision`,
/// or once the bracket cannot be split any further in floating point (large
/// means with a tiny precision). The midpoint of the final bracket is
/// returned.
pub fn klucb<F>(x: f64, d: f64, kl: F, upper_bound: f64, lower_bound: f64, precision: f64) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    let mut low = x.max(lower_bound);
    let mut up = upper_bound;
    while up - low > precision {
        let m = (low + up) / 2.0;
        if m <= low || m >= up {
            break;
        }
        if kl(x, m) > d {
            up = m;
        } else {
            low = m;
        }
    }
    (low + up) / 2.0
}

/// KL-UCB index for Gaussian distributions.
///
/// The Gaussian divergence inverts in closed form, so no search is performed.
pub fn klucb_gauss(x: f64, d: f64, sig2: f64) -> f64 {
    x + (2.0 * sig2 * d).sqrt()
}

/// KL-UCB index for Bernoulli distributions.
///
/// Pinsker's inequality bounds the root by the unit-variance Gaussian index,
/// and the mean of a Bernoulli never exceeds one.
pub fn klucb_bern(x: f64, d: f64, precision: f64) -> f64 {
    let upper_bound = klucb_gauss(x, d, 1.0).min(1.0);
    klucb(x, d, kl_bern, upper_bound, f64::NEG_INFINITY, precision)
}

/// KL-UCB index for Poisson distributions.
///
/// The upper bound is the root of the left Gaussian tail of the Poisson
/// deviation, `kl_poisson(x, y) >= (y - x)^2 / (2y)` for `y >= x`.
pub fn klucb_poisson(x: f64, d: f64, precision: f64) -> f64 {
    let upper_bound = x + d + (d * d + 2.0 * x * d).sqrt();
    klucb(x, d, kl_poisson, upper_bound, f64::NEG_INFINITY, precision)
}

/// KL-UCB index for exponential distributions.
///
/// Both brackets are analytic: for `x = y(1 - e)` the exponential divergence
/// satisfies `kl >= e^2 / (2(1 - 2e/3))`, which gives the upper bound for
/// small `d`; for large `d` the root is squeezed between `x e^d` and
/// `x e^(d+1)`.
pub fn klucb_exp(x: f64, d: f64, precision: f64) -> f64 {
    let upper_bound = if d < 0.77 {
        x / (1.0 + 2.0 / 3.0 * d - (4.0 / 9.0 * d * d + 2.0 * d).sqrt())
    } else {
        x * (d + 1.0).exp()
    };
    let lower_bound = if d > 1.61 {
        x * d.exp()
    } else {
        x / (1.0 + d - (d * d + 2.0 * d).sqrt())
    };
    klucb(
        x,
        d,
        |x, y| kl_gamma(x, y, 1.0),
        upper_bound,
        lower_bound,
        precision,
    )
}

/// Reward family whose divergence drives a KL-based policy.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Divergence {
    /// Rewards in `{0, 1}` (or bounded in `[0, 1]`).
    #[default]
    Bernoulli,
    /// Gaussian rewards with known variance.
    Gaussian { sig2: f64 },
    /// Poisson counts.
    Poisson,
    /// Exponential rewards.
    Exponential,
    /// Gamma rewards with known shape. No KL-UCB bracket is available.
    Gamma { a: f64 },
    /// Negative binomial counts with known `r`. No KL-UCB bracket is available.
    NegativeBinomial { r: f64 },
}

impl Divergence {
    /// Evaluates the divergence between means `x` and `y`.
    pub fn kl(&self, x: f64, y: f64) -> f64 {
        match *self {
            Divergence::Bernoulli => kl_bern(x, y),
            Divergence::Gaussian { sig2 } => kl_gauss(x, y, sig2),
            Divergence::Poisson => kl_poisson(x, y),
            Divergence::Exponential => kl_gamma(x, y, 1.0),
            Divergence::Gamma { a } => kl_gamma(x, y, a),
            Divergence::NegativeBinomial { r } => kl_neg_bin(x, y, r),
        }
    }

    /// Largest mean within divergence `d` of `x`, or `None` for families
    /// without a proven bracket.
    pub fn klucb(&self, x: f64, d: f64, precision: f64) -> Option<f64> {
        match *self {
            Divergence::Bernoulli => Some(klucb_bern(x, d, precision)),
            Divergence::Gaussian { sig2 } => Some(klucb_gauss(x, d, sig2)),
            Divergence::Poisson => Some(klucb_poisson(x, d, precision)),
            Divergence::Exponential => Some(klucb_exp(x, d, precision)),
            Divergence::Gamma { .. } | Divergence::NegativeBinomial { .. } => None,
        }
    }

    /// Whether [`Divergence::klucb`] is defined for this family.
    pub fn has_klucb(&self) -> bool {
        !matches!(
            self,
            Divergence::Gamma { .. } | Divergence::NegativeBinomial { .. }
        )
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match *self {
            Divergence::Gaussian { sig2 } => ensure_positive("sig2", sig2),
            Divergence::Gamma { a } => ensure_positive("gamma shape", a),
            Divergence::NegativeBinomial { r } => ensure_positive("r", r),
            _ => Ok(()),
        }
    }

    pub(crate) fn validate_klucb(&self) -> Result<()> {
        self.validate()?;
        if !self.has_klucb() {
            return Err(BanditError::invalid(format!(
                "no KL-UCB bracket is known for {self:?}"
            )));
        }
        Ok(())
    }
}
