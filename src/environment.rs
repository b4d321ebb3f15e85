//! Stochastic environments and the play protocol.

use rand::{Rng, RngCore};

use crate::arm::{Bernoulli, RewardSource};
use crate::error::{BanditError, Result};
use crate::policy::Policy;

/// A fixed list of arms.
///
/// Environments hold no mutable state: [`Environment::play`] can be called
/// any number of times, concurrently, and each call starts a fresh game.
#[derive(Debug)]
pub struct Environment {
    arms: Vec<Box<dyn RewardSource>>,
}

impl Environment {
    pub fn new(arms: Vec<Box<dyn RewardSource>>) -> Result<Self> {
        if arms.is_empty() {
            return Err(BanditError::NoArmsAvailable);
        }
        Ok(Self { arms })
    }

    /// Builds an environment from arms of a single type.
    pub fn from_arms<I, S>(arms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: RewardSource + 'static,
    {
        Self::new(
            arms.into_iter()
                .map(|arm| Box::new(arm) as Box<dyn RewardSource>)
                .collect(),
        )
    }

    /// Bernoulli arms with the given success probabilities.
    pub fn bernoulli(probabilities: &[f64]) -> Result<Self> {
        let arms = probabilities
            .iter()
            .map(|&p| Bernoulli::new(p))
            .collect::<Result<Vec<_>>>()?;
        Self::from_arms(arms)
    }

    /// Bernoulli arms whose probabilities are drawn uniformly on `[0, 1)`,
    /// i.e. one problem instance of the uniform Bayesian prior.
    pub fn random_bernoulli(nb_arms: usize, rng: &mut dyn RngCore) -> Result<Self> {
        let probabilities: Vec<f64> = (0..nb_arms).map(|_| rng.random::<f64>()).collect();
        Self::bernoulli(&probabilities)
    }

    pub fn nb_arms(&self) -> usize {
        self.arms.len()
    }

    pub fn arms(&self) -> &[Box<dyn RewardSource>] {
        &self.arms
    }

    pub fn expectations(&self) -> Vec<f64> {
        self.arms.iter().map(|arm| arm.expectation()).collect()
    }

    /// Mean reward of the best arm.
    pub fn best_expectation(&self) -> f64 {
        self.arms
            .iter()
            .map(|arm| arm.expectation())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Plays one game of `horizon` rounds.
    ///
    /// Calls [`Policy::start_game`] first, then alternates `choice`, a draw
    /// from the chosen arm and `get_reward`. The trajectory records the
    /// expectation of each chosen arm alongside the realised reward.
    pub fn play<P>(&self, policy: &mut P, horizon: usize, rng: &mut dyn RngCore) -> Result<Trajectory>
    where
        P: Policy + ?Sized,
    {
        if horizon == 0 {
            return Err(BanditError::invalid("horizon must be positive"));
        }
        if policy.nb_arms() != self.nb_arms() {
            return Err(BanditError::DimensionMismatch {
                message: format!(
                    "policy {} expects {} arms, environment has {}",
                    policy.name(),
                    policy.nb_arms(),
                    self.nb_arms()
                ),
            });
        }

        let mut trajectory = Trajectory::with_capacity(self.nb_arms(), horizon);
        policy.start_game();
        for _ in 0..horizon {
            let choice = policy.choice(rng);
            let arm = &self.arms[choice];
            let reward = arm.draw(rng);
            policy.get_reward(choice, reward, rng);
            trajectory.store(choice, reward, arm.expectation());
        }
        Ok(trajectory)
    }
}

/// Record of one game: the arm chosen at each round, its expectation and the
/// reward actually drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    nb_arms: usize,
    choices: Vec<usize>,
    rewards: Vec<f64>,
    expected_rewards: Vec<f64>,
}

impl Trajectory {
    fn with_capacity(nb_arms: usize, horizon: usize) -> Self {
        Self {
            nb_arms,
            choices: Vec::with_capacity(horizon),
            rewards: Vec::with_capacity(horizon),
            expected_rewards: Vec::with_capacity(horizon),
        }
    }

    fn store(&mut self, choice: usize, reward: f64, expectation: f64) {
        self.choices.push(choice);
        self.rewards.push(reward);
        self.expected_rewards.push(expectation);
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn choices(&self) -> &[usize] {
        &self.choices
    }

    /// Realised rewards.
    pub fn rewards(&self) -> &[f64] {
        &self.rewards
    }

    /// Expectation of the arm chosen at each round.
    pub fn expected_rewards(&self) -> &[f64] {
        &self.expected_rewards
    }

    /// Number of times each arm was played.
    pub fn nb_pulls(&self) -> Vec<usize> {
        let mut pulls = vec![0; self.nb_arms];
        for &choice in &self.choices {
            pulls[choice] += 1;
        }
        pulls
    }

    /// Running sum of expected rewards; entry `t - 1` covers rounds `1..=t`.
    pub fn cumulative_expected(&self) -> Vec<f64> {
        self.expected_rewards
            .iter()
            .scan(0.0, |acc, &r| {
                *acc += r;
                Some(*acc)
            })
            .collect()
    }

    /// `(round, arm, expectation)` triples with rounds counted from 1.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.choices
            .iter()
            .zip(&self.expected_rewards)
            .enumerate()
            .map(|(i, (&arm, &expectation))| (i + 1, arm, expectation))
    }
}
