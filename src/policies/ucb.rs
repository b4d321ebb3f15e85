use crate::error::{Result, ensure_positive};
use crate::index::{IndexPolicy, IndexRule, RoundState};

/// Upper Confidence Bound (UCB1) index.
///
/// `mean + c * sqrt(2 ln t / n)`. Larger `c` explores more; `c = 1` is the
/// original UCB1 of Auer, Cesa-Bianchi and Fischer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ucb {
    c: f64,
}

impl Ucb {
    pub fn new(c: f64) -> Result<Self> {
        ensure_positive("c", c)?;
        Ok(Self { c })
    }

    pub fn c(&self) -> f64 {
        self.c
    }
}

impl Default for Ucb {
    fn default() -> Self {
        Self { c: 1.0 }
    }
}

impl IndexRule for Ucb {
    const NAME: &'static str = "UCB";

    fn index(&self, state: &RoundState, arm: usize) -> f64 {
        let n = state.nb_draws(arm) as f64;
        let t = state.t() as f64;
        state.mean(arm) + self.c * (2.0 * t.ln() / n).sqrt()
    }
}

impl IndexPolicy<Ucb> {
    /// Creates a UCB1 policy.
    pub fn ucb(nb_arms: usize, c: f64) -> Result<Self> {
        Self::new(nb_arms, Ucb::new(c)?)
    }
}
