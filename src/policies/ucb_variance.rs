//! Variance-aware UCB indices.

use crate::error::Result;
use crate::index::{IndexPolicy, IndexRule, RoundState};

/// UCB-V (Audibert, Munos and Szepesvári): an empirical Bernstein bound.
///
/// `mean + sqrt(2 ln t v / n) + 3 ln t / n`. Arms with fewer than two samples
/// have no variance estimate and score `+inf`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UcbV;

impl IndexRule for UcbV {
    const NAME: &'static str = "UCB-V";

    fn index(&self, state: &RoundState, arm: usize) -> f64 {
        let n = state.nb_draws(arm);
        if n < 2 {
            return f64::INFINITY;
        }
        let n = n as f64;
        let ln_t = (state.t() as f64).ln();
        state.mean(arm) + (2.0 * ln_t * state.variance(arm) / n).sqrt() + 3.0 * ln_t / n
    }
}

/// UCB-Tuned: UCB1 with the exploration width capped by an upper estimate
/// of the variance, never more than the Bernoulli bound of 1/4.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UcbTuned;

impl IndexRule for UcbTuned {
    const NAME: &'static str = "UCB-Tuned";

    fn index(&self, state: &RoundState, arm: usize) -> f64 {
        let n = state.nb_draws(arm) as f64;
        let ln_t = (state.t() as f64).ln();
        let variance_bound = state.variance(arm) + (2.0 * ln_t / n).sqrt();
        state.mean(arm) + (ln_t / n * variance_bound.min(0.25)).sqrt()
    }
}

/// UCB-Normal (Auer et al. 2002) for Gaussian rewards with unknown variance.
///
/// An arm scores `+inf` until it has at least `max(2, ceil(8 ln t))` samples.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UcbNormal;

impl IndexRule for UcbNormal {
    const NAME: &'static str = "UCB-Normal";

    fn index(&self, state: &RoundState, arm: usize) -> f64 {
        let draws = state.nb_draws(arm);
        let t = state.t() as f64;
        if draws < 2 || (draws as f64) < (8.0 * t.ln()).ceil() {
            return f64::INFINITY;
        }
        let n = draws as f64;
        let sum = state.cum_reward(arm);
        let spread = (state.cum_reward2(arm) - sum * sum / n).max(0.0);
        state.mean(arm) + (16.0 * spread / (n - 1.0) * (t - 1.0).ln() / n).sqrt()
    }
}

impl IndexPolicy<UcbV> {
    pub fn ucb_v(nb_arms: usize) -> Result<Self> {
        Self::new(nb_arms, UcbV)
    }
}

impl IndexPolicy<UcbTuned> {
    pub fn ucb_tuned(nb_arms: usize) -> Result<Self> {
        Self::new(nb_arms, UcbTuned)
    }
}

impl IndexPolicy<UcbNormal> {
    pub fn ucb_normal(nb_arms: usize) -> Result<Self> {
        Self::new(nb_arms, UcbNormal)
    }
}
