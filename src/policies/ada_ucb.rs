use std::f64::consts::E;

use crate::error::{BanditError, Result};
use crate::index::{IndexPolicy, IndexRule, RoundState};

/// AdaUCB (Lattimore 2018): UCB with a confidence level refined by how many
/// arms have been sampled about as often as the current one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdaUcb {
    horizon: usize,
}

impl AdaUcb {
    pub fn new(horizon: usize) -> Result<Self> {
        if horizon == 0 {
            return Err(BanditError::invalid("horizon must be positive"));
        }
        Ok(Self { horizon })
    }
}

/// `ln((x + e) sqrt(ln(x + e)))`, a smoothed logarithm that stays above 1.
fn overline_log(x: f64) -> f64 {
    ((x + E) * (x + E).ln().sqrt()).ln()
}

impl IndexRule for AdaUcb {
    const NAME: &'static str = "AdaUCB";

    fn index(&self, state: &RoundState, arm: usize) -> f64 {
        let n = state.nb_draws(arm) as f64;
        let denom: f64 = state
            .draws()
            .iter()
            .map(|&nj| n.min((n * nj as f64).sqrt()))
            .sum();
        state.mean(arm) + (2.0 / n * overline_log(self.horizon as f64 / denom)).sqrt()
    }
}

impl IndexPolicy<AdaUcb> {
    pub fn ada_ucb(nb_arms: usize, horizon: usize) -> Result<Self> {
        Self::new(nb_arms, AdaUcb::new(horizon)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Policy;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_overline_log() {
        assert_abs_diff_eq!(overline_log(0.0), 1.0, epsilon = 1e-12);
        assert!(overline_log(100.0) > overline_log(10.0));
    }

    #[test]
    fn test_ada_ucb_index() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut policy = IndexPolicy::ada_ucb(2, 100).unwrap();
        policy.get_reward(0, 1.0, &mut rng);
        policy.get_reward(1, 0.0, &mut rng);
        // Both arms pulled once: denominator = 2.
        let expected = 1.0 + (2.0 * overline_log(50.0)).sqrt();
        assert_abs_diff_eq!(policy.index(0), expected, epsilon = 1e-12);
        assert!(AdaUcb::new(0).is_err());
    }
}
