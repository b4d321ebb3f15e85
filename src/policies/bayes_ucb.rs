use rand::RngCore;

use crate::error::{Result, ensure_arms, ensure_positive};
use crate::policy::{Direction, Policy, select_extreme};
use crate::posterior::{BetaPosterior, Posterior};

/// Bayes-UCB (Kaufmann, Cappé and Garivier 2012).
///
/// After pulling each arm once, plays the largest posterior quantile of
/// order `1 - 1 / t^power`.
#[derive(Clone, Debug)]
pub struct BayesUcb<P> {
    posteriors: Vec<P>,
    power: f64,
    t: usize,
}

impl<P: Posterior> BayesUcb<P> {
    pub fn new(nb_arms: usize, prior: P, power: f64) -> Result<Self> {
        ensure_arms(nb_arms)?;
        ensure_positive("power", power)?;
        Ok(Self {
            posteriors: vec![prior; nb_arms],
            power,
            t: 1,
        })
    }

    /// Quantile order used at the current round.
    pub fn level(&self) -> f64 {
        1.0 - 1.0 / (self.t as f64).powf(self.power)
    }

    pub fn indices(&self) -> Vec<f64> {
        let level = self.level();
        self.posteriors.iter().map(|p| p.quantile(level)).collect()
    }
}

impl BayesUcb<BetaPosterior> {
    /// Bayes-UCB with `Beta(1, 1)` priors and quantile order `1 - 1/t`.
    pub fn beta(nb_arms: usize) -> Result<Self> {
        Self::new(nb_arms, BetaPosterior::default(), 1.0)
    }
}

impl<P: Posterior> Policy for BayesUcb<P> {
    fn name(&self) -> &'static str {
        "BayesUCB"
    }

    fn nb_arms(&self) -> usize {
        self.posteriors.len()
    }

    fn start_game(&mut self) {
        self.t = 1;
        self.posteriors.iter_mut().for_each(Posterior::reset);
    }

    fn choice(&mut self, rng: &mut dyn RngCore) -> usize {
        if self.t <= self.posteriors.len() {
            return self.t - 1;
        }
        select_extreme(&self.indices(), Direction::Maximize, rng)
    }

    fn get_reward(&mut self, arm: usize, reward: f64, rng: &mut dyn RngCore) {
        self.posteriors[arm].update(reward, rng);
        self.t += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bayes_ucb_warm_up_then_best_quantile() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut policy = BayesUcb::beta(2).unwrap();
        for expected in 0..2 {
            let arm = policy.choice(&mut rng);
            assert_eq!(arm, expected);
            policy.get_reward(arm, expected as f64, &mut rng);
        }
        // Beta(1, 2) against Beta(2, 1): the second arm dominates.
        assert_eq!(policy.choice(&mut rng), 1);
    }

    #[test]
    fn test_bayes_ucb_level() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut policy = BayesUcb::new(2, BetaPosterior::default(), 2.0).unwrap();
        policy.get_reward(0, 1.0, &mut rng);
        policy.get_reward(1, 1.0, &mut rng);
        assert_abs_diff_eq!(policy.level(), 1.0 - 1.0 / 9.0);
        assert!(BayesUcb::new(2, BetaPosterior::default(), 0.0).is_err());
    }
}
