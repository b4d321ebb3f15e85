use rand::{Rng, RngCore};

use crate::error::{Result, ensure_arms};
use crate::policy::Policy;

/// Random selection policy - selects arms uniformly at random
#[derive(Clone, Debug)]
pub struct Random {
    nb_arms: usize,
}

impl Random {
    pub fn new(nb_arms: usize) -> Result<Self> {
        ensure_arms(nb_arms)?;
        Ok(Self { nb_arms })
    }
}

impl Policy for Random {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn nb_arms(&self) -> usize {
        self.nb_arms
    }

    fn start_game(&mut self) {
        // Random policy doesn't learn from feedback
    }

    fn choice(&mut self, rng: &mut dyn RngCore) -> usize {
        rng.random_range(0..self.nb_arms)
    }

    fn get_reward(&mut self, _arm: usize, _reward: f64, _rng: &mut dyn RngCore) {}
}
