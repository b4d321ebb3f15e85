use crate::error::Result;
use crate::index::{IndexPolicy, IndexRule, RoundState};
use crate::kullback::Divergence;
use crate::policy::Direction;

/// Indexed Minimum Empirical Divergence (Honda and Takemura 2015).
///
/// Plays the arm minimising `n kl(mean, best_mean) + ln n`. The leader always
/// scores `ln n`, so a challenger is played once its divergence times its
/// count is small enough.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Imed {
    divergence: Divergence,
}

impl Imed {
    pub fn new(divergence: Divergence) -> Result<Self> {
        divergence.validate()?;
        Ok(Self { divergence })
    }
}

impl IndexRule for Imed {
    const NAME: &'static str = "IMED";
    const DIRECTION: Direction = Direction::Minimize;

    fn index(&self, state: &RoundState, arm: usize) -> f64 {
        let n = state.nb_draws(arm) as f64;
        n * self.divergence.kl(state.mean(arm), state.best_mean()) + n.ln()
    }
}

impl IndexPolicy<Imed> {
    pub fn imed(nb_arms: usize, divergence: Divergence) -> Result<Self> {
        Self::new(nb_arms, Imed::new(divergence)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kullback::kl_bern;
    use crate::policy::Policy;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_imed_index() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut policy = IndexPolicy::imed(2, Divergence::Bernoulli).unwrap();
        for (arm, reward) in [(0, 1.0), (0, 1.0), (0, 0.0), (1, 0.0)] {
            policy.get_reward(arm, reward, &mut rng);
        }
        let best = 2.0 / 3.0;
        assert_abs_diff_eq!(policy.index(0), 3.0f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(policy.index(1), kl_bern(0.0, best), epsilon = 1e-12);
    }

    #[test]
    fn test_imed_plays_minimum() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut policy = IndexPolicy::imed(2, Divergence::Bernoulli).unwrap();
        for _ in 0..20 {
            policy.get_reward(0, 0.8, &mut rng);
        }
        policy.get_reward(1, 0.5, &mut rng);
        // The challenger's index is small compared to ln 20.
        assert_eq!(policy.choice(&mut rng), 1);
        assert_eq!(policy.name(), "IMED");
    }

    #[test]
    fn test_imed_validates_divergence() {
        assert!(Imed::new(Divergence::Gamma { a: -1.0 }).is_err());
        assert!(Imed::new(Divergence::Gamma { a: 2.0 }).is_ok());
    }
}
