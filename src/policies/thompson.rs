use rand::RngCore;

use crate::error::{Result, ensure_arms};
use crate::policy::{Direction, Policy, select_extreme};
use crate::posterior::{BetaPosterior, ImproperGaussian, Posterior};

/// Thompson Sampling: plays the arm whose posterior sample is largest.
///
/// Posteriors that are undefined before the first observation (see
/// [`Posterior::REQUIRES_WARM_UP`]) get a warm-up round over every arm first.
#[derive(Clone, Debug)]
pub struct ThompsonSampling<P> {
    posteriors: Vec<P>,
    t: usize,
}

impl<P: Posterior> ThompsonSampling<P> {
    /// One copy of `prior` per arm.
    pub fn new(nb_arms: usize, prior: P) -> Result<Self> {
        ensure_arms(nb_arms)?;
        Ok(Self {
            posteriors: vec![prior; nb_arms],
            t: 1,
        })
    }

    pub fn posterior(&self, arm: usize) -> &P {
        &self.posteriors[arm]
    }
}

impl ThompsonSampling<BetaPosterior> {
    /// Thompson Sampling with uniform `Beta(1, 1)` priors.
    pub fn beta(nb_arms: usize) -> Result<Self> {
        Self::new(nb_arms, BetaPosterior::default())
    }
}

impl ThompsonSampling<ImproperGaussian> {
    pub fn gaussian(nb_arms: usize) -> Result<Self> {
        Self::new(nb_arms, ImproperGaussian::new())
    }
}

impl<P: Posterior> Policy for ThompsonSampling<P> {
    fn name(&self) -> &'static str {
        "TS"
    }

    fn nb_arms(&self) -> usize {
        self.posteriors.len()
    }

    fn start_game(&mut self) {
        self.t = 1;
        self.posteriors.iter_mut().for_each(Posterior::reset);
    }

    fn choice(&mut self, rng: &mut dyn RngCore) -> usize {
        if P::REQUIRES_WARM_UP && self.t <= self.posteriors.len() {
            return self.t - 1;
        }
        let samples: Vec<f64> = self.posteriors.iter().map(|p| p.sample(rng)).collect();
        select_extreme(&samples, Direction::Maximize, rng)
    }

    fn get_reward(&mut self, arm: usize, reward: f64, rng: &mut dyn RngCore) {
        self.posteriors[arm].update(reward, rng);
        self.t += 1;
    }
}
