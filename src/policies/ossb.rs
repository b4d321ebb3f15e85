use rand::RngCore;

use crate::error::{BanditError, Result, ensure_arms};
use crate::index::RoundState;
use crate::kullback::Divergence;
use crate::policy::{Direction, Policy, extreme_positions, select_extreme};

/// Optimal Sampling for Structured Bandits (Combes, Magureanu and Proutière
/// 2017), unstructured case.
///
/// Exploits while every arm has been sampled at the rate the regret lower
/// bound asks for, and otherwise explores the arm furthest behind that rate
/// or, with forced estimation rate `epsilon`, the least sampled arm.
#[derive(Clone, Debug)]
pub struct Ossb {
    divergence: Divergence,
    epsilon: f64,
    gamma: f64,
    state: RoundState,
    exploration_steps: usize,
}

impl Ossb {
    pub fn new(nb_arms: usize, divergence: Divergence, epsilon: f64, gamma: f64) -> Result<Self> {
        ensure_arms(nb_arms)?;
        divergence.validate()?;
        if !(epsilon >= 0.0 && gamma >= 0.0) {
            return Err(BanditError::invalid(format!(
                "epsilon and gamma must be non-negative, got {epsilon} and {gamma}"
            )));
        }
        Ok(Self {
            divergence,
            epsilon,
            gamma,
            state: RoundState::new(nb_arms),
            exploration_steps: 0,
        })
    }

    /// Number of rounds spent outside exploitation in the current game.
    pub fn exploration_steps(&self) -> usize {
        self.exploration_steps
    }

    fn means(&self) -> Vec<f64> {
        (0..self.state.nb_arms()).map(|arm| self.state.mean(arm)).collect()
    }

    /// Sampling rates `1 / kl(best, mean)` solving the lower-bound problem;
    /// zero for the empirical leaders.
    fn sampling_rates(&self, means: &[f64]) -> Vec<f64> {
        let leaders = extreme_positions(means, Direction::Maximize);
        let best = means[leaders[0]];
        means
            .iter()
            .enumerate()
            .map(|(arm, &mean)| {
                if leaders.contains(&arm) {
                    0.0
                } else {
                    1.0 / self.divergence.kl(best, mean)
                }
            })
            .collect()
    }
}

impl Policy for Ossb {
    fn name(&self) -> &'static str {
        "OSSB"
    }

    fn nb_arms(&self) -> usize {
        self.state.nb_arms()
    }

    fn start_game(&mut self) {
        self.state.reset();
        self.exploration_steps = 0;
    }

    fn choice(&mut self, rng: &mut dyn RngCore) -> usize {
        if let Some(arm) = self.state.warm_up_arm() {
            return arm;
        }
        let means = self.means();
        let rates = self.sampling_rates(&means);
        let t = self.state.t() as f64;
        let draws: Vec<f64> = self.state.draws().iter().map(|&n| n as f64).collect();

        let exploit = draws
            .iter()
            .zip(&rates)
            .all(|(&n, &c)| n >= (1.0 + self.gamma) * (t / n).ln() * c);
        if exploit {
            return select_extreme(&means, Direction::Maximize, rng);
        }

        self.exploration_steps += 1;
        let least_sampled = select_extreme(&draws, Direction::Minimize, rng);
        if draws[least_sampled] <= self.epsilon * self.exploration_steps as f64 {
            return least_sampled;
        }
        let lag: Vec<f64> = draws
            .iter()
            .zip(&rates)
            .map(|(&n, &c)| n / (c + 1e-15))
            .collect();
        select_extreme(&lag, Direction::Minimize, rng)
    }

    fn get_reward(&mut self, arm: usize, reward: f64, _rng: &mut dyn RngCore) {
        self.state.record(arm, reward);
    }
}
