use crate::error::{BanditError, Result, ensure_positive};
use crate::index::{IndexPolicy, IndexRule, RoundState};

/// MOSS index (Audibert and Bubeck), minimax optimal for a known horizon.
///
/// `mean + sqrt(max(0, c ln(horizon / (K n))) / n)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Moss {
    horizon: usize,
    c: f64,
}

impl Moss {
    pub fn new(horizon: usize, c: f64) -> Result<Self> {
        if horizon == 0 {
            return Err(BanditError::invalid("horizon must be positive"));
        }
        ensure_positive("c", c)?;
        Ok(Self { horizon, c })
    }

    /// MOSS with the default exploration constant `c = 4`.
    pub fn with_horizon(horizon: usize) -> Result<Self> {
        Self::new(horizon, 4.0)
    }
}

impl IndexRule for Moss {
    const NAME: &'static str = "MOSS";

    fn index(&self, state: &RoundState, arm: usize) -> f64 {
        let n = state.nb_draws(arm) as f64;
        let k = state.nb_arms() as f64;
        let bonus = (self.c * (self.horizon as f64 / (k * n)).ln()).max(0.0);
        state.mean(arm) + (bonus / n).sqrt()
    }
}

impl IndexPolicy<Moss> {
    pub fn moss(nb_arms: usize, horizon: usize) -> Result<Self> {
        Self::new(nb_arms, Moss::with_horizon(horizon)?)
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
    fn test_moss_index() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut policy = IndexPolicy::moss(2, 100).unwrap();
        policy.get_reward(0, 1.0, &mut rng);
        policy.get_reward(1, 0.0, &mut rng);
        let expected = 1.0 + (4.0 * (100.0f64 / 2.0).ln()).sqrt();
        assert_abs_diff_eq!(policy.index(0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_moss_bonus_vanishes_past_horizon_share() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut policy = IndexPolicy::moss(2, 10).unwrap();
        for _ in 0..6 {
            policy.get_reward(0, 0.5, &mut rng);
        }
        // horizon / (K n) = 10 / 12 < 1, so the bonus is clipped to zero.
        assert_abs_diff_eq!(policy.index(0), 0.5);
    }

    #[test]
    fn test_moss_validation() {
        assert!(Moss::new(0, 4.0).is_err());
        assert!(Moss::new(10, 0.0).is_err());
    }
}
