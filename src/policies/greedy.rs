//! Greedy family: pure exploitation, epsilon-greedy and adaptive greedy.

use rand::{Rng, RngCore};

use crate::error::{BanditError, Result, ensure_positive};
use crate::index::{IndexPolicy, IndexRule, RoundState};
use crate::policy::Policy;

/// Empirical mean as index.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Greedy;

impl IndexRule for Greedy {
    const NAME: &'static str = "Greedy";

    fn index(&self, state: &RoundState, arm: usize) -> f64 {
        state.mean(arm)
    }
}

impl IndexPolicy<Greedy> {
    pub fn greedy(nb_arms: usize) -> Result<Self> {
        Self::new(nb_arms, Greedy)
    }
}

/// Epsilon-greedy policy - explores with probability epsilon, exploits otherwise.
///
/// After the warm-up round over every arm, plays a uniformly random arm with
/// probability `epsilon` and the empirical best otherwise.
#[derive(Clone, Debug)]
pub struct EpsilonGreedy {
    epsilon: f64,
    greedy: IndexPolicy<Greedy>,
}

impl EpsilonGreedy {
    pub fn new(nb_arms: usize, epsilon: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(BanditError::invalid(format!(
                "epsilon must be between 0 and 1, got {epsilon}"
            )));
        }
        Ok(Self {
            epsilon,
            greedy: IndexPolicy::greedy(nb_arms)?,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn mean(&self, arm: usize) -> f64 {
        self.greedy.state().mean(arm)
    }
}

impl Policy for EpsilonGreedy {
    fn name(&self) -> &'static str {
        "EpsilonGreedy"
    }

    fn nb_arms(&self) -> usize {
        self.greedy.nb_arms()
    }

    fn start_game(&mut self) {
        self.greedy.start_game();
    }

    fn choice(&mut self, rng: &mut dyn RngCore) -> usize {
        if let Some(arm) = self.greedy.state().warm_up_arm() {
            return arm;
        }
        if rng.random::<f64>() < self.epsilon {
            rng.random_range(0..self.nb_arms())
        } else {
            self.greedy.choice(rng)
        }
    }

    fn get_reward(&mut self, arm: usize, reward: f64, rng: &mut dyn RngCore) {
        self.greedy.get_reward(arm, reward, rng);
    }
}

/// Adaptive greedy (Chapelle and Li): exploits the empirical best `a` with
/// probability `min(1, c * mean(a))`, otherwise plays a uniform arm.
///
/// Rewards are assumed non-negative so that a confidently good leader is
/// exploited almost always.
#[derive(Clone, Debug)]
pub struct AdaptiveGreedy {
    c: f64,
    greedy: IndexPolicy<Greedy>,
}

impl AdaptiveGreedy {
    pub fn new(nb_arms: usize, c: f64) -> Result<Self> {
        ensure_positive("c", c)?;
        Ok(Self {
            c,
            greedy: IndexPolicy::greedy(nb_arms)?,
        })
    }

    pub fn c(&self) -> f64 {
        self.c
    }
}

impl Policy for AdaptiveGreedy {
    fn name(&self) -> &'static str {
        "AdaptiveGreedy"
    }

    fn nb_arms(&self) -> usize {
        self.greedy.nb_arms()
    }

    fn start_game(&mut self) {
        self.greedy.start_game();
    }

    fn choice(&mut self, rng: &mut dyn RngCore) -> usize {
        if let Some(arm) = self.greedy.state().warm_up_arm() {
            return arm;
        }
        let leader = self.greedy.choice(rng);
        let confidence = (self.c * self.greedy.index(leader)).min(1.0);
        if rng.random::<f64>() <= confidence {
            leader
        } else {
            rng.random_range(0..self.nb_arms())
        }
    }

    fn get_reward(&mut self, arm: usize, reward: f64, rng: &mut dyn RngCore) {
        self.greedy.get_reward(arm, reward, rng);
    }
}
