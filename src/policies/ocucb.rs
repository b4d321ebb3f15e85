use std::f64::consts::E;

use crate::error::{BanditError, Result, ensure_positive};
use crate::index::{IndexPolicy, IndexRule, RoundState};

/// Optimally Confident UCB (Lattimore 2015) for a known horizon.
///
/// `mean + sqrt(alpha / n * ln(psi * horizon / t))`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OcUcb {
    horizon: usize,
    alpha: f64,
    psi: f64,
}

impl OcUcb {
    pub fn new(horizon: usize, alpha: f64, psi: f64) -> Result<Self> {
        if horizon == 0 {
            return Err(BanditError::invalid("horizon must be positive"));
        }
        ensure_positive("alpha", alpha)?;
        ensure_positive("psi", psi)?;
        Ok(Self {
            horizon,
            alpha,
            psi,
        })
    }

    /// Default constants `alpha = 3`, `psi = 2`.
    pub fn with_horizon(horizon: usize) -> Result<Self> {
        Self::new(horizon, 3.0, 2.0)
    }
}

impl IndexRule for OcUcb {
    const NAME: &'static str = "OC-UCB";

    fn index(&self, state: &RoundState, arm: usize) -> f64 {
        let n = state.nb_draws(arm) as f64;
        let level = (self.psi * self.horizon as f64 / state.t() as f64).ln().max(0.0);
        state.mean(arm) + (self.alpha / n * level).sqrt()
    }
}

/// Anytime Optimally Confident UCB (Lattimore 2016).
///
/// `mean + sqrt(2 eta ln B / n)` with
/// `B = max(e, ln t, t ln t / sum_j min(n, n_j^rho n^(1 - rho)))`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OcUcbN {
    eta: f64,
    rho: f64,
}

impl OcUcbN {
    pub fn new(eta: f64, rho: f64) -> Result<Self> {
        ensure_positive("eta", eta)?;
        if !(rho > 0.0 && rho <= 1.0) {
            return Err(BanditError::invalid(format!("rho must be in (0, 1], got {rho}")));
        }
        Ok(Self { eta, rho })
    }

    fn b_term(&self, state: &RoundState, arm: usize) -> f64 {
        let n = state.nb_draws(arm) as f64;
        let t = state.t() as f64;
        let spread: f64 = state
            .draws()
            .iter()
            .map(|&nj| n.min((nj as f64).powf(self.rho) * n.powf(1.0 - self.rho)))
            .sum();
        E.max(t.ln()).max(t * t.ln() / spread)
    }
}

impl Default for OcUcbN {
    fn default() -> Self {
        Self { eta: 2.0, rho: 1.0 }
    }
}

impl IndexRule for OcUcbN {
    const NAME: &'static str = "OC-UCB-n";

    fn index(&self, state: &RoundState, arm: usize) -> f64 {
        let n = state.nb_draws(arm) as f64;
        state.mean(arm) + (2.0 * self.eta * self.b_term(state, arm).ln() / n).sqrt()
    }
}

impl IndexPolicy<OcUcb> {
    pub fn ocucb(nb_arms: usize, horizon: usize) -> Result<Self> {
        Self::new(nb_arms, OcUcb::with_horizon(horizon)?)
    }
}
